//! Parser state - statements of function bodies.
//!
//! Bodies are parsed in full so that a syntax error anywhere in the file
//! stops the run. Header clauses of `if`, `for` and `switch` are parsed at a
//! negative expression level (see `ParserState::control_clause`).

use keyshim_common::Span;
use keyshim_common::diagnostics::{format_message, messages};
use keyshim_scanner::{SyntaxKind, token_to_string};

use super::ParseResult;
use super::state::ParserState;
use crate::ast::{Block, CaseClause, CommClause, Expr, FuncBody, Stmt, TypeCaseClause};

/// Where a simple statement appears.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    /// Statement position: `label:` is allowed.
    LabelOk,
    /// `for` header: `k, v := range x` is allowed.
    RangeOk,
}

/// A simple statement, or the range clause of a `for` header.
enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        expr: Expr,
    },
}

enum ForHeader {
    Loop {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        expr: Expr,
    },
}

fn is_assign_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EqualsToken
            | SyntaxKind::ColonEqualsToken
            | SyntaxKind::PlusEqualsToken
            | SyntaxKind::MinusEqualsToken
            | SyntaxKind::AsteriskEqualsToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::PercentEqualsToken
            | SyntaxKind::AmpersandEqualsToken
            | SyntaxKind::BarEqualsToken
            | SyntaxKind::CaretEqualsToken
            | SyntaxKind::LessThanLessThanEqualsToken
            | SyntaxKind::GreaterThanGreaterThanEqualsToken
            | SyntaxKind::AmpersandCaretEqualsToken
    )
}

/// Tokens that can begin an expression, and so a simple statement.
fn starts_simple_stmt(kind: SyntaxKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::FuncKeyword
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::StructKeyword
                | SyntaxKind::MapKeyword
                | SyntaxKind::ChanKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::CaretToken
                | SyntaxKind::AsteriskToken
                | SyntaxKind::AmpersandToken
                | SyntaxKind::LessThanMinusToken
                | SyntaxKind::TildeToken
        )
}

/// `x.(type)` or `v := x.(type)`.
fn is_type_guard(stmt: &Stmt) -> bool {
    fn guard(expr: &Expr) -> bool {
        matches!(expr, Expr::TypeAssert { ty: None, .. })
    }
    match stmt {
        Stmt::Expr(expr) => guard(expr),
        Stmt::Assign {
            lhs,
            op: SyntaxKind::ColonEqualsToken,
            rhs,
            ..
        } => {
            matches!(lhs.as_slice(), [Expr::Ident(_)])
                && matches!(rhs.as_slice(), [expr] if guard(expr))
        }
        _ => false,
    }
}

impl ParserState {
    /// `{ stmts }` of a function declaration or literal.
    pub(super) fn parse_func_body(&mut self) -> ParseResult<FuncBody> {
        let (lev, allow, guards) = (self.expr_lev, self.allow_type_guard, self.type_guards);
        self.expr_lev = 0;
        self.allow_type_guard = false;
        let block = self.parse_block();
        (self.expr_lev, self.allow_type_guard, self.type_guards) = (lev, allow, guards);
        let block = block?;
        Ok(FuncBody {
            text: block.span.slice(self.source()).to_string(),
            block,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let stmts = self.parse_stmt_list()?;
        self.parse_close_brace()?;
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    fn parse_close_brace(&mut self) -> ParseResult<()> {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            return Err(self.error_at(
                self.scanner.get_token_span(),
                messages::UNBALANCED_BODY.to_string(),
            ));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(())
    }

    fn parse_stmt_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !matches!(
            self.token(),
            SyntaxKind::CaseKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken
        ) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        let stmt = match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword | SyntaxKind::TypeKeyword => {
                Stmt::Decl(self.parse_gen_decl()?)
            }
            SyntaxKind::SemicolonToken => {
                let span = self.parse_expected(SyntaxKind::SemicolonToken)?;
                return Ok(Stmt::Empty(span));
            }
            SyntaxKind::GoKeyword | SyntaxKind::DeferKeyword => self.parse_go_or_defer()?,
            SyntaxKind::ReturnKeyword => {
                self.next_token()?;
                let results = if matches!(
                    self.token(),
                    SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken
                ) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                Stmt::Return {
                    results,
                    span: self.span_from(start),
                }
            }
            SyntaxKind::BreakKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::GotoKeyword
            | SyntaxKind::FallthroughKeyword => self.parse_branch()?,
            SyntaxKind::OpenBraceToken => Stmt::Block(self.parse_block()?),
            SyntaxKind::IfKeyword => self.parse_if()?,
            SyntaxKind::SwitchKeyword => self.parse_switch()?,
            SyntaxKind::SelectKeyword => self.parse_select()?,
            SyntaxKind::ForKeyword => self.parse_for()?,
            kind if starts_simple_stmt(kind) => match self.parse_simple(SimpleMode::LabelOk)? {
                // The labeled statement already consumed its terminator.
                Simple::Stmt(stmt @ Stmt::Labeled { .. }) => return Ok(stmt),
                Simple::Stmt(stmt) => stmt,
                Simple::Range { .. } => {
                    return Err(self.error_at(
                        self.span_from(start),
                        "unexpected range clause".to_string(),
                    ));
                }
            },
            _ => return Err(self.error_with_found(messages::EXPECTED_STATEMENT)),
        };
        self.parse_semicolon()?;
        Ok(stmt)
    }

    fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.parse_optional(SyntaxKind::CommaToken)? {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    /// A simple statement outside a `for` header or label position.
    fn parse_simple_stmt(&mut self) -> ParseResult<Stmt> {
        match self.parse_simple(SimpleMode::Basic)? {
            Simple::Stmt(stmt) => Ok(stmt),
            Simple::Range { expr, .. } => Err(self.error_at(
                expr.span(),
                "unexpected range clause".to_string(),
            )),
        }
    }

    fn parse_simple(&mut self, mode: SimpleMode) -> ParseResult<Simple> {
        let start = self.token_pos();
        if mode == SimpleMode::RangeOk && self.parse_optional(SyntaxKind::RangeKeyword)? {
            let expr = self.parse_expr()?;
            return Ok(Simple::Range {
                key: None,
                value: None,
                define: false,
                expr,
            });
        }

        let mut lhs = self.parse_expr_list()?;
        let op = self.token();
        if is_assign_op(op) {
            self.next_token()?;
            let plain = matches!(op, SyntaxKind::EqualsToken | SyntaxKind::ColonEqualsToken);
            if mode == SimpleMode::RangeOk && plain && self.parse_optional(SyntaxKind::RangeKeyword)? {
                if let Some(extra) = lhs.get(2) {
                    return Err(self.error_at(
                        extra.span(),
                        "range clause permits at most two iteration variables".to_string(),
                    ));
                }
                let expr = self.parse_expr()?;
                let mut vars = lhs.into_iter();
                return Ok(Simple::Range {
                    key: vars.next(),
                    value: vars.next(),
                    define: op == SyntaxKind::ColonEqualsToken,
                    expr,
                });
            }
            let rhs = self.parse_expr_list()?;
            if !plain && (lhs.len() > 1 || rhs.len() > 1) {
                let text = token_to_string(op).unwrap_or("=");
                return Err(self.error_at(
                    self.span_from(start),
                    format!("assignment operation {text} requires single-valued expressions"),
                ));
            }
            return Ok(Simple::Stmt(Stmt::Assign {
                lhs,
                op,
                rhs,
                span: self.span_from(start),
            }));
        }

        if lhs.len() > 1 {
            return Err(self.error_expected("':=' or '='"));
        }
        let Some(expr) = lhs.pop() else {
            return Err(self.error_with_found(messages::EXPECTED_OPERAND));
        };

        let stmt = match (self.token(), expr) {
            (SyntaxKind::ColonToken, Expr::Ident(label)) if mode == SimpleMode::LabelOk => {
                self.next_token()?;
                let stmt = if self.is_token(SyntaxKind::CloseBraceToken) {
                    let at = self.token_pos();
                    Stmt::Empty(Span::new(at, at))
                } else {
                    self.parse_stmt()?
                };
                Stmt::Labeled {
                    label,
                    stmt: Box::new(stmt),
                    span: self.span_from(start),
                }
            }
            (SyntaxKind::LessThanMinusToken, chan) => {
                self.next_token()?;
                let value = self.parse_expr()?;
                Stmt::Send {
                    chan,
                    value,
                    span: self.span_from(start),
                }
            }
            (op @ (SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken), expr) => {
                self.next_token()?;
                Stmt::IncDec {
                    expr,
                    op,
                    span: self.span_from(start),
                }
            }
            (_, expr) => Stmt::Expr(expr),
        };
        Ok(Simple::Stmt(stmt))
    }

    /// Unwrap an expression statement where a value is required.
    fn stmt_to_expr(&self, stmt: Stmt, what: &str) -> ParseResult<Expr> {
        match stmt {
            Stmt::Expr(expr) => Ok(expr),
            other => Err(self.error_at(
                other.span(),
                format_message(messages::SIMPLE_STATEMENT_AS_VALUE, &[what]),
            )),
        }
    }

    fn parse_go_or_defer(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        let keyword = self.token();
        self.next_token()?;
        let call = self.parse_expr()?;
        if !matches!(call, Expr::Call { .. }) {
            let name = token_to_string(keyword).unwrap_or("go");
            return Err(self.error_at(
                call.span(),
                format!("expression in {name} must be function call"),
            ));
        }
        let span = self.span_from(start);
        Ok(if keyword == SyntaxKind::GoKeyword {
            Stmt::Go { call, span }
        } else {
            Stmt::Defer { call, span }
        })
    }

    fn parse_branch(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        let keyword = self.token();
        self.next_token()?;
        let label = match keyword {
            SyntaxKind::GotoKeyword => Some(self.parse_ident()?),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword
                if self.is_token(SyntaxKind::Identifier) =>
            {
                Some(self.parse_ident()?)
            }
            _ => None,
        };
        Ok(Stmt::Branch {
            keyword,
            label,
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::IfKeyword)?;
        let (init, cond) = self.control_clause(|p| p.parse_if_header())?;
        let then = self.parse_block()?;
        let otherwise = if self.parse_optional(SyntaxKind::ElseKeyword)? {
            match self.token() {
                SyntaxKind::IfKeyword => Some(Box::new(self.parse_if()?)),
                SyntaxKind::OpenBraceToken => Some(Box::new(Stmt::Block(self.parse_block()?))),
                _ => return Err(self.error_expected("if statement or block")),
            }
        } else {
            None
        };
        Ok(Stmt::If {
            init,
            cond,
            then,
            otherwise,
            span: self.span_from(start),
        })
    }

    fn parse_if_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Expr)> {
        let missing = |p: &Self| {
            p.error_at(
                p.scanner.get_token_span(),
                "missing condition in if statement".to_string(),
            )
        };
        if self.is_token(SyntaxKind::OpenBraceToken) {
            return Err(missing(self));
        }
        let mut init = None;
        let mut cond = if self.is_token(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };
        if self.parse_optional(SyntaxKind::SemicolonToken)? {
            init = cond.take().map(Box::new);
            if self.is_token(SyntaxKind::OpenBraceToken) {
                return Err(missing(self));
            }
            cond = Some(self.parse_simple_stmt()?);
        }
        let Some(cond) = cond else {
            return Err(missing(self));
        };
        Ok((init, self.stmt_to_expr(cond, "boolean expression")?))
    }

    fn parse_switch(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::SwitchKeyword)?;
        let (init, tag) = self.control_clause(|p| p.parse_switch_header())?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;

        let tag = match tag {
            Some(guard) if is_type_guard(&guard) => {
                let mut clauses = Vec::new();
                while matches!(self.token(), SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword) {
                    clauses.push(self.parse_type_case_clause()?);
                }
                self.parse_close_brace()?;
                return Ok(Stmt::TypeSwitch {
                    init,
                    guard: Box::new(guard),
                    clauses,
                    span: self.span_from(start),
                });
            }
            Some(stmt) => Some(self.stmt_to_expr(stmt, "switch expression")?),
            None => None,
        };
        let mut clauses = Vec::new();
        while matches!(self.token(), SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword) {
            clauses.push(self.parse_case_clause()?);
        }
        self.parse_close_brace()?;
        Ok(Stmt::Switch {
            init,
            tag,
            clauses,
            span: self.span_from(start),
        })
    }

    /// `[init;] [tag]`. A type guard is only accepted as the whole tag.
    fn parse_switch_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Option<Stmt>)> {
        let start = self.token_pos();
        let guards_before = self.type_guards;
        let allow = self.allow_type_guard;
        self.allow_type_guard = true;
        let header = self.parse_switch_header_inner();
        self.allow_type_guard = allow;
        let (init, tag) = header?;

        let expected = u32::from(tag.as_ref().is_some_and(is_type_guard));
        if self.type_guards - guards_before != expected {
            let span = tag.as_ref().map_or_else(|| self.span_from(start), Stmt::span);
            return Err(self.error_at(span, messages::TYPE_GUARD_OUTSIDE_SWITCH.to_string()));
        }
        Ok((init, tag))
    }

    fn parse_switch_header_inner(&mut self) -> ParseResult<(Option<Box<Stmt>>, Option<Stmt>)> {
        let mut init = None;
        let mut tag = None;
        if self.is_token(SyntaxKind::OpenBraceToken) {
            return Ok((init, tag));
        }
        if !self.is_token(SyntaxKind::SemicolonToken) {
            tag = Some(self.parse_simple_stmt()?);
        }
        if self.parse_optional(SyntaxKind::SemicolonToken)? {
            init = tag.take().map(Box::new);
            if !self.is_token(SyntaxKind::OpenBraceToken) {
                tag = Some(self.parse_simple_stmt()?);
            }
        }
        Ok((init, tag))
    }

    fn parse_case_clause(&mut self) -> ParseResult<CaseClause> {
        let start = self.token_pos();
        let exprs = if self.parse_optional(SyntaxKind::CaseKeyword)? {
            self.parse_expr_list()?
        } else {
            self.parse_expected(SyntaxKind::DefaultKeyword)?;
            Vec::new()
        };
        self.parse_expected(SyntaxKind::ColonToken)?;
        let body = self.parse_stmt_list()?;
        Ok(CaseClause {
            exprs,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_type_case_clause(&mut self) -> ParseResult<TypeCaseClause> {
        let start = self.token_pos();
        let mut types = Vec::new();
        if self.parse_optional(SyntaxKind::CaseKeyword)? {
            types.push(self.parse_type()?);
            while self.parse_optional(SyntaxKind::CommaToken)? {
                types.push(self.parse_type()?);
            }
        } else {
            self.parse_expected(SyntaxKind::DefaultKeyword)?;
        }
        self.parse_expected(SyntaxKind::ColonToken)?;
        let body = self.parse_stmt_list()?;
        Ok(TypeCaseClause {
            types,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_select(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::SelectKeyword)?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut clauses = Vec::new();
        while matches!(self.token(), SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword) {
            let clause_start = self.token_pos();
            let comm = if self.parse_optional(SyntaxKind::CaseKeyword)? {
                Some(Box::new(self.parse_simple_stmt()?))
            } else {
                self.parse_expected(SyntaxKind::DefaultKeyword)?;
                None
            };
            self.parse_expected(SyntaxKind::ColonToken)?;
            let body = self.parse_stmt_list()?;
            clauses.push(CommClause {
                comm,
                body,
                span: self.span_from(clause_start),
            });
        }
        self.parse_close_brace()?;
        Ok(Stmt::Select {
            clauses,
            span: self.span_from(start),
        })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::ForKeyword)?;
        let header = self.control_clause(|p| p.parse_for_header())?;
        let body = self.parse_block()?;
        let span = self.span_from(start);
        Ok(match header {
            ForHeader::Loop { init, cond, post } => Stmt::For {
                init,
                cond,
                post,
                body,
                span,
            },
            ForHeader::Range {
                key,
                value,
                define,
                expr,
            } => Stmt::Range {
                key,
                value,
                define,
                expr,
                body,
                span,
            },
        })
    }

    fn parse_for_header(&mut self) -> ParseResult<ForHeader> {
        let mut first = None;
        if !self.is_token(SyntaxKind::OpenBraceToken) && !self.is_token(SyntaxKind::SemicolonToken)
        {
            match self.parse_simple(SimpleMode::RangeOk)? {
                Simple::Range {
                    key,
                    value,
                    define,
                    expr,
                } => {
                    return Ok(ForHeader::Range {
                        key,
                        value,
                        define,
                        expr,
                    });
                }
                Simple::Stmt(stmt) => first = Some(stmt),
            }
        }

        if !self.parse_optional(SyntaxKind::SemicolonToken)? {
            // `for {` or `for cond {`
            let cond = match first {
                Some(stmt) => Some(self.stmt_to_expr(stmt, "for loop condition")?),
                None => None,
            };
            return Ok(ForHeader::Loop {
                init: None,
                cond,
                post: None,
            });
        }

        let init = first.map(Box::new);
        let cond = if self.is_token(SyntaxKind::SemicolonToken) {
            None
        } else {
            let stmt = self.parse_simple_stmt()?;
            Some(self.stmt_to_expr(stmt, "for loop condition")?)
        };
        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let post = if self.is_token(SyntaxKind::OpenBraceToken) {
            None
        } else {
            let stmt = self.parse_simple_stmt()?;
            if let Stmt::Assign {
                op: SyntaxKind::ColonEqualsToken,
                span,
                ..
            } = &stmt
            {
                return Err(self.error_at(
                    *span,
                    "cannot declare in post statement of for loop".to_string(),
                ));
            }
            Some(Box::new(stmt))
        };
        Ok(ForHeader::Loop { init, cond, post })
    }
}
