//! Type expressions, parameter lists, struct and interface bodies.

use keyshim_common::diagnostics::messages;
use keyshim_scanner::SyntaxKind;

use super::ParseResult;
use super::state::ParserState;
use crate::ast::{ChanDir, Expr, Field, Ident, IdentList, InterfaceElem, Signature, TypeExpr};

/// Tokens that can begin a type.
fn is_type_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::AsteriskToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::LessThanMinusToken
            | SyntaxKind::MapKeyword
            | SyntaxKind::ChanKeyword
            | SyntaxKind::FuncKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::InterfaceKeyword
    )
}

/// Split the expression read from `[name ...` into a type parameter name
/// and the start of its constraint. `Some(true)` when a constraint was
/// split off, `Some(false)` for a lone name, `None` when the expression
/// can only be an array length. `force` is set when a `,` follows, which
/// rules out an array length.
fn split_type_param(expr: &Expr, force: bool) -> Option<bool> {
    match expr {
        Expr::Ident(_) => Some(false),
        Expr::Binary {
            op: SyntaxKind::AsteriskToken,
            left,
            right,
            ..
        } if matches!(**left, Expr::Ident(_)) && (force || is_type_elem(right)) => Some(true),
        Expr::Binary {
            op: SyntaxKind::BarToken,
            left,
            right,
            ..
        } => split_type_param(left, force || is_type_elem(right)).filter(|&split| split),
        Expr::Call {
            func,
            args,
            ellipsis: false,
            ..
        } if matches!(**func, Expr::Ident(_))
            && args.len() == 1
            && (force || is_type_elem(&args[0])) =>
        {
            Some(true)
        }
        _ => None,
    }
}

/// An expression that can only be a type element, never a value.
fn is_type_elem(expr: &Expr) -> bool {
    match expr {
        Expr::Type(ty) => matches!(
            **ty,
            TypeExpr::Array { .. }
                | TypeExpr::Slice { .. }
                | TypeExpr::Struct { .. }
                | TypeExpr::Func(_)
                | TypeExpr::Interface { .. }
                | TypeExpr::Map { .. }
                | TypeExpr::Chan { .. }
        ),
        Expr::Binary { left, right, .. } => is_type_elem(left) || is_type_elem(right),
        Expr::Unary {
            op: SyntaxKind::TildeToken,
            ..
        } => true,
        Expr::Paren { expr, .. } => is_type_elem(expr),
        _ => false,
    }
}

/// One comma-separated entry of a parameter list before names and types
/// have been told apart.
struct ParamEntry {
    name: Option<Ident>,
    ty: Option<TypeExpr>,
    start: u32,
}

impl ParserState {
    pub(super) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => {
                let ident = self.parse_ident()?;
                self.parse_type_name_rest(ident)
            }
            SyntaxKind::AsteriskToken => {
                self.next_token()?;
                let elem = self.parse_type()?;
                Ok(TypeExpr::Pointer {
                    elem: Box::new(elem),
                    span: self.span_from(start),
                })
            }
            SyntaxKind::OpenBracketToken => self.parse_array_or_slice_type(),
            SyntaxKind::MapKeyword => {
                self.next_token()?;
                self.parse_expected(SyntaxKind::OpenBracketToken)?;
                let key = self.parse_type()?;
                self.parse_expected(SyntaxKind::CloseBracketToken)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                    span: self.span_from(start),
                })
            }
            SyntaxKind::ChanKeyword => {
                self.next_token()?;
                let dir = if self.parse_optional(SyntaxKind::LessThanMinusToken)? {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(elem),
                    span: self.span_from(start),
                })
            }
            SyntaxKind::LessThanMinusToken => {
                self.next_token()?;
                self.parse_expected(SyntaxKind::ChanKeyword)?;
                let elem = self.parse_type()?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(elem),
                    span: self.span_from(start),
                })
            }
            SyntaxKind::FuncKeyword => {
                self.next_token()?;
                Ok(TypeExpr::Func(self.parse_signature(start)?))
            }
            SyntaxKind::StructKeyword => self.parse_struct_type(),
            SyntaxKind::InterfaceKeyword => self.parse_interface_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let elem = self.parse_type()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Ok(TypeExpr::Paren {
                    elem: Box::new(elem),
                    span: self.span_from(start),
                })
            }
            _ => Err(self.error_with_found(messages::EXPECTED_TYPE)),
        }
    }

    /// Continue a type name whose first identifier is already consumed:
    /// `pkg.Name` and type arguments `Name[A, B]`.
    pub(super) fn parse_type_name_rest(&mut self, first: Ident) -> ParseResult<TypeExpr> {
        let start = first.span.start;
        let mut ty = if self.parse_optional(SyntaxKind::DotToken)? {
            let name = self.parse_ident()?;
            TypeExpr::Qualified {
                package: first,
                name,
            }
        } else {
            TypeExpr::Name(first)
        };

        if self.is_token(SyntaxKind::OpenBracketToken) {
            self.next_token()?;
            let mut args = Vec::new();
            while !self.is_token(SyntaxKind::CloseBracketToken) {
                args.push(self.parse_type()?);
                if !self.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBracketToken)?;
            if args.is_empty() {
                return Err(self.error_at(
                    self.span_from(start),
                    "expected type argument list".to_string(),
                ));
            }
            ty = TypeExpr::Generic {
                base: Box::new(ty),
                args,
                span: self.span_from(start),
            };
        }
        Ok(ty)
    }

    /// `[]T`, `[N]T`, `[...]T`
    fn parse_array_or_slice_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        if self.parse_optional(SyntaxKind::CloseBracketToken)? {
            let elem = self.parse_type()?;
            return Ok(TypeExpr::Slice {
                elem: Box::new(elem),
                span: self.span_from(start),
            });
        }
        let len = if self.parse_optional(SyntaxKind::DotDotDotToken)? {
            None
        } else {
            Some(Box::new(self.nested(|p| p.parse_expr())?))
        };
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let elem = self.parse_type()?;
        Ok(TypeExpr::Array {
            len,
            elem: Box::new(elem),
            span: self.span_from(start),
        })
    }

    // =========================================================================
    // Lookahead
    // =========================================================================

    /// At `[` after a type name in a declaration: does a type parameter list
    /// follow, or an array length?
    ///
    /// The bracket contents are read as an expression first, so `[N]`,
    /// `[N * 2]` and `[len(a)]` stay array lengths while `[P any]`,
    /// `[P ~int]` and `[P *C,]` open a parameter list. `[P *C]` alone is an
    /// array length; a trailing comma marks it as a parameter list.
    pub(super) fn looks_like_type_params(&mut self) -> ParseResult<bool> {
        let snapshot = self.snapshot();
        self.next_token()?;
        let result = if self.is_token(SyntaxKind::Identifier) {
            match self.nested(|p| p.parse_bracket_head()) {
                Ok(head) => {
                    let force = self.is_token(SyntaxKind::CommaToken);
                    match split_type_param(&head, force) {
                        Some(split) => split || !self.is_token(SyntaxKind::CloseBracketToken),
                        None => false,
                    }
                }
                // Not an expression, so not an array length either.
                Err(_) => true,
            }
        } else {
            false
        };
        self.restore(snapshot);
        Ok(result)
    }

    /// The expression starting at the first name inside `[`. A second `[`
    /// right after the name ends it: `[P []int]` names a parameter.
    fn parse_bracket_head(&mut self) -> ParseResult<Expr> {
        let name = Expr::Ident(self.parse_ident()?);
        if self.is_token(SyntaxKind::OpenBracketToken) {
            return Ok(name);
        }
        let operand = self.parse_primary_suffix(name)?;
        self.parse_binary_rest(operand, 1)
    }

    /// At `[` after an identifier in a field or parameter: a type starting
    /// right after the matching `]` means `name [N]T`; anything else means
    /// the identifier is a generic type `Name[Args]`.
    fn looks_like_type_instance(&mut self) -> ParseResult<bool> {
        let snapshot = self.snapshot();
        self.skip_balanced()?;
        let result = !is_type_start(self.token());
        self.restore(snapshot);
        Ok(result)
    }

    // =========================================================================
    // Type parameters, parameters and signatures
    // =========================================================================

    /// `[K comparable, V any]`
    pub(super) fn parse_type_params(&mut self) -> ParseResult<Vec<Field>> {
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            let start = self.token_pos();
            let mut names = IdentList::new();
            names.push(self.parse_ident()?);
            while self.parse_optional(SyntaxKind::CommaToken)? {
                names.push(self.parse_ident()?);
            }
            let ty = self.parse_constraint()?;
            params.push(Field {
                names,
                ty,
                tag: None,
                span: self.span_from(start),
            });
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        if params.is_empty() {
            return Err(self.error_expected("type parameter"));
        }
        Ok(params)
    }

    /// A type-set element: `~T`, `A | B`, or a plain type.
    pub(super) fn parse_constraint(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        let first = self.parse_constraint_term()?;
        if !self.is_token(SyntaxKind::BarToken) {
            return Ok(first);
        }
        let mut terms = vec![first];
        while self.parse_optional(SyntaxKind::BarToken)? {
            terms.push(self.parse_constraint_term()?);
        }
        Ok(TypeExpr::Union {
            terms,
            span: self.span_from(start),
        })
    }

    fn parse_constraint_term(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        if self.parse_optional(SyntaxKind::TildeToken)? {
            let elem = self.parse_type()?;
            return Ok(TypeExpr::Tilde {
                elem: Box::new(elem),
                span: self.span_from(start),
            });
        }
        self.parse_type()
    }

    /// `(params) [results]`; `start` is where the enclosing construct began.
    pub(super) fn parse_signature(&mut self, start: u32) -> ParseResult<Signature> {
        let params = self.parse_parameters()?;
        let results = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_parameters()?
        } else if is_type_start(self.token()) {
            let result_start = self.token_pos();
            let ty = self.parse_type()?;
            vec![Field {
                names: IdentList::new(),
                ty,
                tag: None,
                span: self.span_from(result_start),
            }]
        } else {
            Vec::new()
        };
        Ok(Signature {
            params,
            results,
            span: self.span_from(start),
        })
    }

    /// `( [a, b T, c ...U] )` or `( [T, U] )`
    pub(super) fn parse_parameters(&mut self) -> ParseResult<Vec<Field>> {
        let open = self.parse_expected(SyntaxKind::OpenParenToken)?;
        let mut entries = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            entries.push(self.parse_param_entry()?);
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        self.resolve_params(entries, open.start)
    }

    fn parse_param_entry(&mut self) -> ParseResult<ParamEntry> {
        let start = self.token_pos();
        if !self.is_token(SyntaxKind::Identifier) {
            let ty = self.parse_param_type()?;
            return Ok(ParamEntry {
                name: None,
                ty: Some(ty),
                start,
            });
        }

        let ident = self.parse_ident()?;
        match self.token() {
            SyntaxKind::CommaToken | SyntaxKind::CloseParenToken => Ok(ParamEntry {
                name: Some(ident),
                ty: None,
                start,
            }),
            SyntaxKind::DotToken => Ok(ParamEntry {
                name: None,
                ty: Some(self.parse_type_name_rest(ident)?),
                start,
            }),
            SyntaxKind::OpenBracketToken if self.looks_like_type_instance()? => Ok(ParamEntry {
                name: None,
                ty: Some(self.parse_type_name_rest(ident)?),
                start,
            }),
            _ => Ok(ParamEntry {
                name: Some(ident),
                ty: Some(self.parse_param_type()?),
                start,
            }),
        }
    }

    /// A parameter type, possibly variadic.
    fn parse_param_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken)? {
            let elem = self.parse_type()?;
            return Ok(TypeExpr::Ellipsis {
                elem: Box::new(elem),
                span: self.span_from(start),
            });
        }
        self.parse_type()
    }

    /// Decide between the named form `(a, b int)` and the unnamed form
    /// `(int, string)`, grouping names with the type that follows them.
    fn resolve_params(&self, entries: Vec<ParamEntry>, open: u32) -> ParseResult<Vec<Field>> {
        let named = entries.iter().any(|e| e.name.is_some() && e.ty.is_some());
        let mut fields = Vec::with_capacity(entries.len());

        if !named {
            for entry in entries {
                let ty = match (entry.name, entry.ty) {
                    (_, Some(ty)) => ty,
                    (Some(name), None) => TypeExpr::Name(name),
                    (None, None) => continue,
                };
                fields.push(Field {
                    names: IdentList::new(),
                    span: ty.span(),
                    ty,
                    tag: None,
                });
            }
            return Ok(fields);
        }

        let mut pending = IdentList::new();
        let mut group_start = open;
        for entry in entries {
            if pending.is_empty() {
                group_start = entry.start;
            }
            match (entry.name, entry.ty) {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(ty)) => {
                    pending.push(name);
                    let span = keyshim_common::Span::new(group_start, ty.span().end);
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        ty,
                        tag: None,
                        span,
                    });
                }
                (None, Some(ty)) => {
                    return Err(self.error_at(
                        ty.span(),
                        "mixed named and unnamed parameters".to_string(),
                    ));
                }
                (None, None) => {}
            }
        }
        if let Some(last) = pending.last() {
            return Err(self.error_at(last.span, "missing parameter type".to_string()));
        }
        Ok(fields)
    }

    // =========================================================================
    // Struct and interface bodies
    // =========================================================================

    fn parse_struct_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::StructKeyword)?;
        let open = self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut fields = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            fields.push(self.parse_struct_field()?);
            self.parse_semicolon()?;
        }
        let close = self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(TypeExpr::Struct {
            fields,
            one_line: self.on_one_line(open.start, close.start),
            span: self.span_from(start),
        })
    }

    /// Named fields `a, b T`, embedded `T`, `*T`, `pkg.T`, `List[T]`,
    /// each with an optional tag.
    fn parse_struct_field(&mut self) -> ParseResult<Field> {
        let start = self.token_pos();
        let mut names = IdentList::new();
        let ty = if self.is_token(SyntaxKind::AsteriskToken) {
            self.parse_embedded_pointer()?
        } else {
            let first = self.parse_ident()?;
            match self.token() {
                SyntaxKind::DotToken => self.parse_type_name_rest(first)?,
                SyntaxKind::SemicolonToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::StringLiteral
                | SyntaxKind::RawStringLiteral => TypeExpr::Name(first),
                SyntaxKind::OpenBracketToken if self.looks_like_type_instance()? => {
                    self.parse_type_name_rest(first)?
                }
                _ => {
                    names.push(first);
                    while self.parse_optional(SyntaxKind::CommaToken)? {
                        names.push(self.parse_ident()?);
                    }
                    self.parse_type()?
                }
            }
        };

        let tag = if self.token().is_string_literal() {
            Some(self.parse_basic_lit()?)
        } else {
            None
        };

        Ok(Field {
            names,
            ty,
            tag,
            span: self.span_from(start),
        })
    }

    /// `*T` or `*pkg.T` in embedded position.
    fn parse_embedded_pointer(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::AsteriskToken)?;
        let first = self.parse_ident()?;
        let elem = self.parse_type_name_rest(first)?;
        Ok(TypeExpr::Pointer {
            elem: Box::new(elem),
            span: self.span_from(start),
        })
    }

    fn parse_interface_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::InterfaceKeyword)?;
        let open = self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut elems = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            elems.push(self.parse_interface_elem()?);
            self.parse_semicolon()?;
        }
        let close = self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(TypeExpr::Interface {
            elems,
            one_line: self.on_one_line(open.start, close.start),
            span: self.span_from(start),
        })
    }

    fn on_one_line(&self, from: u32, to: u32) -> bool {
        self.source()
            .get(from as usize..to as usize)
            .is_some_and(|text| !text.contains('\n'))
    }

    fn parse_interface_elem(&mut self) -> ParseResult<InterfaceElem> {
        if self.is_token(SyntaxKind::Identifier) {
            let snapshot = self.snapshot();
            let name = self.parse_ident()?;
            if self.is_token(SyntaxKind::OpenParenToken) {
                let signature = self.parse_signature(name.span.start)?;
                return Ok(InterfaceElem::Method { name, signature });
            }
            self.restore(snapshot);
        }
        Ok(InterfaceElem::Embedded(self.parse_constraint()?))
    }
}
