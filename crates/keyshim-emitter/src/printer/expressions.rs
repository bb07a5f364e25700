//! Expression printing.
//!
//! Blanks around binary operators depend on the expression's nesting depth
//! and the mix of precedences in it, so that `a + b*c` reads as grouped and
//! deeply nested operands stay compact: `f(a+b, c)`.

use keyshim_parser::{Element, Expr, TypeExpr};
use keyshim_scanner::{SyntaxKind, token_to_string};

use super::{EmitResult, Printer};

const LOWEST_PREC: u8 = 0;
const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;

/// Keys up to this size always share an alignment section.
const SMALL_KEY_SIZE: usize = 40;
/// A key this many times larger or smaller than the geometric mean of the
/// keys above it starts a new alignment section.
const KEY_SIZE_RATIO: f64 = 2.5;

impl Printer {
    // =========================================================================
    // Expressions
    // =========================================================================

    pub(super) fn print_expr(&mut self, expr: &Expr) -> EmitResult<()> {
        self.expr1(expr, LOWEST_PREC, 1)
    }

    fn expr0(&mut self, expr: &Expr, depth: usize) -> EmitResult<()> {
        self.expr1(expr, LOWEST_PREC, depth)
    }

    fn expr1(&mut self, expr: &Expr, prec1: u8, depth: usize) -> EmitResult<()> {
        match expr {
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::BasicLit(lit) => self.write_escaped(&lit.text),
            Expr::Type(ty) => self.print_type(ty)?,
            Expr::Binary { .. } => self.binary_expr(expr, prec1, depth.max(1))?,
            Expr::Unary { op, expr: operand, .. } => {
                if UNARY_PREC < prec1 {
                    self.write("(");
                    self.print_expr(expr)?;
                    self.write(")");
                } else if *op == SyntaxKind::AsteriskToken {
                    self.write("*");
                    self.print_expr(operand)?;
                } else {
                    self.write(op_text(*op));
                    if combines_with_operand(*op, operand) {
                        self.write_blank();
                    }
                    self.expr1(operand, UNARY_PREC, depth)?;
                }
            }
            Expr::Paren { expr: inner, .. } => {
                if matches!(**inner, Expr::Paren { .. }) {
                    self.expr0(inner, depth)?;
                } else {
                    self.write("(");
                    self.expr0(inner, reduce_depth(depth))?;
                    self.write(")");
                }
            }
            Expr::Selector { expr: operand, sel, .. } => {
                self.expr1(operand, HIGHEST_PREC, depth)?;
                self.write(".");
                self.write(&sel.name);
            }
            Expr::TypeAssert { expr: operand, ty, .. } => {
                self.expr1(operand, HIGHEST_PREC, depth)?;
                self.write(".(");
                match ty {
                    Some(ty) => self.print_type(ty)?,
                    None => self.write("type"),
                }
                self.write(")");
            }
            Expr::Index {
                expr: operand,
                indices,
                ..
            } => {
                self.expr1(operand, HIGHEST_PREC, 1)?;
                self.write("[");
                self.write_comma_separated(indices, |p, index| p.expr0(index, depth + 1))?;
                self.write("]");
            }
            Expr::Slice {
                expr: operand,
                low,
                high,
                max,
                ..
            } => {
                self.expr1(operand, HIGHEST_PREC, 1)?;
                self.write("[");
                let mut indices = vec![low.as_deref(), high.as_deref()];
                if max.is_some() {
                    indices.push(max.as_deref());
                }
                let blanks = depth <= 1 && {
                    let present: Vec<&Expr> = indices.iter().flatten().copied().collect();
                    present.len() > 1
                        && present
                            .iter()
                            .any(|index| matches!(index, Expr::Binary { .. }))
                };
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        if blanks && indices[i - 1].is_some() {
                            self.write_blank();
                        }
                        self.write(":");
                        if blanks && index.is_some() {
                            self.write_blank();
                        }
                    }
                    if let Some(index) = index {
                        self.expr0(index, depth + 1)?;
                    }
                }
                self.write("]");
            }
            Expr::Call {
                func,
                args,
                ellipsis,
                ..
            } => {
                let depth = if args.len() > 1 { depth + 1 } else { depth };
                let func_type = matches!(&**func, Expr::Type(ty) if matches!(**ty, TypeExpr::Func(_)));
                if func_type {
                    self.write("(");
                    self.expr1(func, HIGHEST_PREC, depth)?;
                    self.write(")");
                } else {
                    self.expr1(func, HIGHEST_PREC, depth)?;
                }
                self.write("(");
                self.write_comma_separated(args, |p, arg| p.expr0(arg, depth))?;
                if *ellipsis {
                    self.write("...");
                }
                self.write(")");
            }
            Expr::Composite {
                ty,
                elements,
                multiline,
                ..
            } => {
                if let Some(ty) = ty {
                    self.expr1(ty, HIGHEST_PREC, depth)?;
                }
                if *multiline && !elements.is_empty() {
                    self.print_element_lines(elements)?;
                } else {
                    self.write("{");
                    self.write_comma_separated(elements, |p, element| p.print_element(element))?;
                    self.write("}");
                }
            }
            Expr::FuncLit {
                signature, body, ..
            } => {
                self.write("func");
                self.print_signature(signature)?;
                self.write_blank();
                self.write_escaped(&body.text);
            }
        }
        Ok(())
    }

    fn binary_expr(&mut self, expr: &Expr, prec1: u8, depth: usize) -> EmitResult<()> {
        let Expr::Binary {
            op, left, right, ..
        } = expr
        else {
            return self.expr0(expr, depth);
        };
        let prec = op.binary_precedence();
        if prec < prec1 {
            self.write("(");
            self.expr0(expr, reduce_depth(depth))?;
            self.write(")");
            return Ok(());
        }

        let blanks = prec < cutoff(*op, left, right, depth);
        self.expr1(left, prec, depth + diff_prec(left, prec))?;
        if blanks {
            self.write_blank();
        }
        self.write(op_text(*op));
        if blanks {
            self.write_blank();
        }
        self.expr1(right, prec + 1, depth + 1)
    }

    /// `key: value` or `value` on a single line.
    fn print_element(&mut self, element: &Element) -> EmitResult<()> {
        if let Some(key) = &element.key {
            self.print_expr(key)?;
            self.write(": ");
        }
        self.print_expr(&element.value)
    }

    /// The `{ ... }` of a composite literal with one element per line.
    ///
    /// Keys of consecutive single-line elements go in a column so their
    /// values line up. The column is broken up where a key's size differs
    /// too much from the keys above it.
    fn print_element_lines(&mut self, elements: &[Element]) -> EmitResult<()> {
        self.write("{");
        self.increase_indent();
        self.write_formfeed();

        let mut size = 0;
        let mut ln_sum = 0.0_f64;
        let mut count = 0_usize;
        for (i, element) in elements.iter().enumerate() {
            let prev_size = size;
            size = element_size(element).unwrap_or(0);

            let mut use_formfeed = true;
            if prev_size > 0 && size > 0 {
                if count == 0 || (prev_size <= SMALL_KEY_SIZE && size <= SMALL_KEY_SIZE) {
                    use_formfeed = false;
                } else {
                    let geomean = (ln_sum / count as f64).exp();
                    let ratio = size as f64 / geomean;
                    use_formfeed = KEY_SIZE_RATIO * ratio <= 1.0 || KEY_SIZE_RATIO <= ratio;
                }
            }

            if i > 0 {
                self.write(",");
                self.linebreak(use_formfeed);
                if use_formfeed {
                    ln_sum = 0.0;
                    count = 0;
                }
            }

            match &element.key {
                Some(key) if elements.len() > 1 && size > 0 => {
                    self.print_expr(key)?;
                    self.write(":");
                    self.write_vtab();
                    self.print_expr(&element.value)?;
                }
                _ => self.print_element(element)?,
            }

            if size > 0 {
                ln_sum += (size as f64).ln();
                count += 1;
            }
        }

        self.write(",");
        self.decrease_indent();
        self.write_formfeed();
        self.write("}");
        Ok(())
    }
}

/// Size that decides column alignment of an element: the size of its key,
/// or of the whole element when it has none. `None` when the element does
/// not fit on one line.
fn element_size(element: &Element) -> Option<usize> {
    let size = single_line_size(|p| p.print_element(element))?;
    match &element.key {
        Some(key) => single_line_size(|p| p.print_expr(key)),
        None => Some(size),
    }
}

/// Width of what `print` writes, or `None` when it spans several lines.
pub(super) fn single_line_size(
    print: impl FnOnce(&mut Printer) -> EmitResult<()>,
) -> Option<usize> {
    let mut printer = Printer::new();
    print(&mut printer).ok()?;
    let text = printer.finish();
    if text.contains('\n') {
        None
    } else {
        Some(text.len())
    }
}

fn op_text(op: SyntaxKind) -> &'static str {
    token_to_string(op).unwrap_or_default()
}

/// Unary operators that would merge with the operator of their operand
/// into a different token: `- -x`, `& &x`, `& ^x`.
fn combines_with_operand(op: SyntaxKind, operand: &Expr) -> bool {
    let Expr::Unary { op: inner, .. } = operand else {
        return false;
    };
    matches!(
        (op, *inner),
        (SyntaxKind::PlusToken, SyntaxKind::PlusToken)
            | (SyntaxKind::MinusToken, SyntaxKind::MinusToken)
            | (SyntaxKind::AmpersandToken, SyntaxKind::AmpersandToken)
            | (SyntaxKind::AmpersandToken, SyntaxKind::CaretToken)
    )
}

/// Precedence below which a binary operator is printed with blanks.
fn cutoff(op: SyntaxKind, left: &Expr, right: &Expr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(op, left, right);
    if max_problem > 0 {
        return max_problem + 1;
    }
    match (has4 && has5, depth == 1) {
        (true, true) => 5,
        (false, true) => 6,
        _ => 4,
    }
}

/// Whether the operator chain has precedence 4 and 5 operators, and the
/// highest precedence that must keep its blanks to avoid merging tokens.
fn walk_binary(op: SyntaxKind, left: &Expr, right: &Expr) -> (bool, bool, u8) {
    let prec = op.binary_precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    // Operands that get parenthesized do not count.
    if let Expr::Binary {
        op: left_op,
        left: ll,
        right: lr,
        ..
    } = left
        && left_op.binary_precedence() >= prec
    {
        let (h4, h5, problem) = walk_binary(*left_op, ll, lr);
        has4 |= h4;
        has5 |= h5;
        max_problem = max_problem.max(problem);
    }

    match right {
        Expr::Binary {
            op: right_op,
            left: rl,
            right: rr,
            ..
        } if right_op.binary_precedence() > prec => {
            let (h4, h5, problem) = walk_binary(*right_op, rl, rr);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(problem);
        }
        Expr::Unary { op: right_op, .. } => match (op, *right_op) {
            (SyntaxKind::SlashToken, SyntaxKind::AsteriskToken)
            | (SyntaxKind::AmpersandToken, SyntaxKind::AmpersandToken)
            | (SyntaxKind::AmpersandToken, SyntaxKind::CaretToken) => max_problem = 5,
            (SyntaxKind::PlusToken, SyntaxKind::PlusToken)
            | (SyntaxKind::MinusToken, SyntaxKind::MinusToken) => {
                max_problem = max_problem.max(4);
            }
            _ => {}
        },
        _ => {}
    }
    (has4, has5, max_problem)
}

fn diff_prec(expr: &Expr, prec: u8) -> usize {
    match expr {
        Expr::Binary { op, .. } if op.binary_precedence() == prec => 0,
        _ => 1,
    }
}

/// Parentheses undo one level of depth.
fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}
