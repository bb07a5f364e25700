//! Expression parsing (precedence climbing over unary and primary forms).

use keyshim_common::diagnostics::messages;
use keyshim_scanner::SyntaxKind;

use super::ParseResult;
use super::state::ParserState;
use crate::ast::{ChanDir, Element, Expr, TypeExpr};

impl ParserState {
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(1)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let left = self.parse_unary_expr()?;
        self.parse_binary_rest(left, min_prec)
    }

    /// Continue a binary expression whose leftmost operand is parsed.
    pub(super) fn parse_binary_rest(&mut self, mut left: Expr, min_prec: u8) -> ParseResult<Expr> {
        loop {
            let op = self.token();
            let prec = op.binary_precedence();
            if prec == 0 || prec < min_prec {
                return Ok(left);
            }
            self.next_token()?;
            let right = self.parse_binary_expr(prec + 1)?;
            let span = left.span().to(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        let start = self.token_pos();
        match self.token() {
            op @ (SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::CaretToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::TildeToken) => {
                self.next_token()?;
                let expr = self.parse_unary_expr()?;
                Ok(Expr::Unary {
                    op,
                    expr: Box::new(expr),
                    span: self.span_from(start),
                })
            }
            SyntaxKind::LessThanMinusToken => {
                self.next_token()?;
                if self.is_token(SyntaxKind::ChanKeyword) {
                    // `<-chan T` in expression position is a type.
                    self.next_token()?;
                    let elem = self.parse_type()?;
                    let ty = TypeExpr::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(elem),
                        span: self.span_from(start),
                    };
                    return self.parse_primary_suffix(Expr::Type(Box::new(ty)));
                }
                let expr = self.parse_unary_expr()?;
                Ok(Expr::Unary {
                    op: SyntaxKind::LessThanMinusToken,
                    expr: Box::new(expr),
                    span: self.span_from(start),
                })
            }
            _ => self.parse_primary_expr(),
        }
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let operand = self.parse_operand()?;
        self.parse_primary_suffix(operand)
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => Ok(Expr::Ident(self.parse_ident()?)),
            kind if kind.is_literal() => Ok(Expr::BasicLit(self.parse_basic_lit()?)),
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let expr = self.nested(|p| p.parse_expr())?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Ok(Expr::Paren {
                    expr: Box::new(expr),
                    span: self.span_from(start),
                })
            }
            SyntaxKind::FuncKeyword => {
                self.next_token()?;
                let signature = self.parse_signature(start)?;
                if self.is_token(SyntaxKind::OpenBraceToken) {
                    let body = self.parse_func_body()?;
                    return Ok(Expr::FuncLit {
                        signature,
                        body,
                        span: self.span_from(start),
                    });
                }
                Ok(Expr::Type(Box::new(TypeExpr::Func(signature))))
            }
            SyntaxKind::OpenBracketToken
            | SyntaxKind::MapKeyword
            | SyntaxKind::ChanKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::InterfaceKeyword => Ok(Expr::Type(Box::new(self.parse_type()?))),
            _ => Err(self.error_with_found(messages::EXPECTED_OPERAND)),
        }
    }

    /// Selectors, index and slice expressions, type assertions, calls and
    /// composite literals following an operand.
    pub(super) fn parse_primary_suffix(&mut self, mut expr: Expr) -> ParseResult<Expr> {
        let start = expr.span().start;
        loop {
            expr = match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token()?;
                    if self.parse_optional(SyntaxKind::OpenParenToken)? {
                        let ty = if self.is_token(SyntaxKind::TypeKeyword) {
                            self.parse_type_guard()?;
                            None
                        } else {
                            Some(Box::new(self.parse_type()?))
                        };
                        self.parse_expected(SyntaxKind::CloseParenToken)?;
                        Expr::TypeAssert {
                            expr: Box::new(expr),
                            ty,
                            span: self.span_from(start),
                        }
                    } else {
                        let sel = self.parse_ident()?;
                        Expr::Selector {
                            expr: Box::new(expr),
                            sel,
                            span: self.span_from(start),
                        }
                    }
                }
                SyntaxKind::OpenBracketToken => self.parse_index_or_slice(expr, start)?,
                SyntaxKind::OpenParenToken => self.parse_call(expr, start)?,
                SyntaxKind::OpenBraceToken if self.is_literal_type(&expr) => {
                    self.parse_composite_lit(Some(expr), start)?
                }
                _ => return Ok(expr),
            };
        }
    }

    /// The `type` keyword of `x.(type)`.
    fn parse_type_guard(&mut self) -> ParseResult<()> {
        if !self.allow_type_guard {
            return Err(self.error_at(
                self.scanner.get_token_span(),
                messages::TYPE_GUARD_OUTSIDE_SWITCH.to_string(),
            ));
        }
        self.type_guards += 1;
        self.next_token()?;
        Ok(())
    }

    fn parse_index_or_slice(&mut self, expr: Expr, start: u32) -> ParseResult<Expr> {
        self.nested(|p| p.parse_index_or_slice_inner(expr, start))
    }

    fn parse_index_or_slice_inner(&mut self, expr: Expr, start: u32) -> ParseResult<Expr> {
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let low = if self.is_token(SyntaxKind::ColonToken) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if self.parse_optional(SyntaxKind::ColonToken)? {
            let high = if self.is_token(SyntaxKind::ColonToken)
                || self.is_token(SyntaxKind::CloseBracketToken)
            {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            let max = if self.parse_optional(SyntaxKind::ColonToken)? {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.parse_expected(SyntaxKind::CloseBracketToken)?;
            return Ok(Expr::Slice {
                expr: Box::new(expr),
                low: low.map(Box::new),
                high,
                max,
                span: self.span_from(start),
            });
        }

        let mut indices: Vec<Expr> = low.into_iter().collect();
        while self.parse_optional(SyntaxKind::CommaToken)? {
            if self.is_token(SyntaxKind::CloseBracketToken) {
                break;
            }
            indices.push(self.parse_expr()?);
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(Expr::Index {
            expr: Box::new(expr),
            indices,
            span: self.span_from(start),
        })
    }

    fn parse_call(&mut self, func: Expr, start: u32) -> ParseResult<Expr> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let (args, ellipsis) = self.nested(|p| {
            let mut args = Vec::new();
            let mut ellipsis = false;
            while !p.is_token(SyntaxKind::CloseParenToken) {
                args.push(p.parse_expr()?);
                if p.parse_optional(SyntaxKind::DotDotDotToken)? {
                    ellipsis = true;
                }
                if !p.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            Ok((args, ellipsis))
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            ellipsis,
            span: self.span_from(start),
        })
    }

    /// `{ elements }` with the type already parsed (or elided).
    fn parse_composite_lit(&mut self, ty: Option<Expr>, start: u32) -> ParseResult<Expr> {
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let multiline = self.scanner.has_preceding_line_break();
        let elements = self.nested(|p| {
            let mut elements = Vec::new();
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                let first = p.parse_element_value()?;
                let element = if p.parse_optional(SyntaxKind::ColonToken)? {
                    Element {
                        key: Some(first),
                        value: p.parse_element_value()?,
                    }
                } else {
                    Element {
                        key: None,
                        value: first,
                    }
                };
                elements.push(element);
                if !p.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            Ok(elements)
        })?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(Expr::Composite {
            ty: ty.map(Box::new),
            elements,
            multiline,
            span: self.span_from(start),
        })
    }

    /// An element value, which may be a literal with its type elided.
    fn parse_element_value(&mut self) -> ParseResult<Expr> {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            let start = self.token_pos();
            return self.parse_composite_lit(None, start);
        }
        self.parse_expr()
    }
}

impl ParserState {
    /// Can `expr` followed by `{` start a composite literal here? A plain
    /// type name cannot inside a control clause header.
    fn is_literal_type(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Ident(_) | Expr::Selector { .. } | Expr::Index { .. } if self.expr_lev < 0 => {
                false
            }
            _ => is_literal_type(expr),
        }
    }
}

/// Expressions that may be followed by `{` to form a composite literal.
fn is_literal_type(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) => true,
        Expr::Selector { expr, .. } => matches!(**expr, Expr::Ident(_)),
        Expr::Index { expr, .. } => is_literal_type(expr),
        Expr::Type(ty) => matches!(
            **ty,
            TypeExpr::Array { .. }
                | TypeExpr::Slice { .. }
                | TypeExpr::Map { .. }
                | TypeExpr::Struct { .. }
                | TypeExpr::Generic { .. }
                | TypeExpr::Name(_)
                | TypeExpr::Qualified { .. }
        ),
        _ => false,
    }
}
