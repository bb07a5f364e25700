//! Source file, declaration and spec parsing.

use keyshim_common::diagnostics::messages;
use keyshim_scanner::SyntaxKind;
use tracing::trace;

use super::ParseResult;
use super::state::ParserState;
use crate::ast::{
    BasicLit, Decl, FuncDecl, GenDecl, GenKind, IdentList, ImportSpec, LitKind, SourceUnit,
    Spec, TypeSpec, ValueSpec,
};

impl ParserState {
    /// `package name; { decl ; }`
    pub fn parse_source_file(&mut self) -> ParseResult<SourceUnit> {
        self.next_token()?;
        if !self.is_token(SyntaxKind::PackageKeyword) {
            return Err(self.error_with_found(messages::MISSING_PACKAGE_CLAUSE));
        }
        self.next_token()?;
        let package = self.parse_ident()?;
        self.parse_semicolon()?;

        let mut decls = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let decl = match self.token() {
                SyntaxKind::ImportKeyword
                | SyntaxKind::TypeKeyword
                | SyntaxKind::VarKeyword
                | SyntaxKind::ConstKeyword => Decl::Gen(self.parse_gen_decl()?),
                SyntaxKind::FuncKeyword => Decl::Func(self.parse_func_decl()?),
                _ => return Err(self.error_with_found(messages::EXPECTED_DECLARATION)),
            };
            if !self.is_token(SyntaxKind::EndOfFileToken) {
                if !self.is_token(SyntaxKind::SemicolonToken) {
                    return Err(self.error_expected("';'"));
                }
                self.next_token()?;
            }
            decls.push(decl);
        }

        trace!(file = %self.file_name, decls = decls.len(), "parsed source file");
        Ok(SourceUnit {
            file_name: self.file_name.clone(),
            package,
            decls,
        })
    }

    pub(super) fn parse_gen_decl(&mut self) -> ParseResult<GenDecl> {
        let start = self.token_pos();
        let Some(kind) = GenKind::from_token(self.token()) else {
            return Err(self.error_with_found(messages::EXPECTED_DECLARATION));
        };
        self.next_token()?;

        let mut specs = Vec::new();
        let grouped = self.parse_optional(SyntaxKind::OpenParenToken)?;
        if grouped {
            while !self.is_token(SyntaxKind::CloseParenToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                specs.push(self.parse_spec(kind, grouped)?);
                self.parse_semicolon()?;
            }
            self.parse_expected(SyntaxKind::CloseParenToken)?;
        } else {
            specs.push(self.parse_spec(kind, grouped)?);
        }

        Ok(GenDecl {
            kind,
            grouped,
            specs,
            span: self.span_from(start),
        })
    }

    fn parse_spec(&mut self, kind: GenKind, grouped: bool) -> ParseResult<Spec> {
        match kind {
            GenKind::Import => self.parse_import_spec().map(Spec::Import),
            GenKind::Type => self.parse_type_spec().map(Spec::Type),
            GenKind::Var | GenKind::Const => {
                self.parse_value_spec(kind, grouped).map(Spec::Value)
            }
        }
    }

    /// `[name | .] "path"`
    fn parse_import_spec(&mut self) -> ParseResult<ImportSpec> {
        let start = self.token_pos();
        let name = match self.token() {
            SyntaxKind::Identifier => Some(self.parse_ident()?),
            SyntaxKind::DotToken => {
                let span = self.parse_expected(SyntaxKind::DotToken)?;
                Some(crate::ast::Ident::new(".", span))
            }
            _ => None,
        };
        if !self.is_token(SyntaxKind::StringLiteral) && !self.is_token(SyntaxKind::RawStringLiteral)
        {
            return Err(self.error_expected("import path"));
        }
        let path = self.parse_basic_lit()?;
        Ok(ImportSpec {
            name,
            path,
            span: self.span_from(start),
        })
    }

    /// `Name [TypeParams] [=] Type`
    fn parse_type_spec(&mut self) -> ParseResult<TypeSpec> {
        let start = self.token_pos();
        let name = self.parse_ident()?;
        let type_params = if self.is_token(SyntaxKind::OpenBracketToken)
            && self.looks_like_type_params()?
        {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        let alias = self.parse_optional(SyntaxKind::EqualsToken)?;
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            type_params,
            alias,
            ty,
            span: self.span_from(start),
        })
    }

    /// `Names [Type] [= Values]`
    ///
    /// A `var` needs a type or values. Constants inside a group may omit
    /// both and repeat the previous expression list.
    fn parse_value_spec(&mut self, kind: GenKind, grouped: bool) -> ParseResult<ValueSpec> {
        let start = self.token_pos();
        let mut names = IdentList::new();
        names.push(self.parse_ident()?);
        while self.parse_optional(SyntaxKind::CommaToken)? {
            names.push(self.parse_ident()?);
        }

        let ty = match self.token() {
            SyntaxKind::EqualsToken => None,
            SyntaxKind::SemicolonToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::EndOfFileToken
                if kind == GenKind::Const =>
            {
                None
            }
            _ => Some(self.parse_type()?),
        };

        let mut values = Vec::new();
        if self.parse_optional(SyntaxKind::EqualsToken)? {
            values.push(self.parse_expr()?);
            while self.parse_optional(SyntaxKind::CommaToken)? {
                values.push(self.parse_expr()?);
            }
        }

        if values.is_empty() && kind == GenKind::Const && (!grouped || ty.is_some()) {
            return Err(self.error_expected("'='"));
        }

        Ok(ValueSpec {
            names,
            ty,
            values,
            span: self.span_from(start),
        })
    }

    /// `func [(recv)] Name [TypeParams] Signature [Body]`
    pub(super) fn parse_func_decl(&mut self) -> ParseResult<FuncDecl> {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::FuncKeyword)?;
        let recv = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_parameters()?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let type_params = if self.is_token(SyntaxKind::OpenBracketToken) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        let signature = self.parse_signature(start)?;
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            Some(self.parse_func_body()?)
        } else {
            None
        };
        Ok(FuncDecl {
            recv,
            name,
            type_params,
            signature,
            body,
            span: self.span_from(start),
        })
    }

    pub(super) fn parse_basic_lit(&mut self) -> ParseResult<BasicLit> {
        let Some(kind) = LitKind::from_token(self.token()) else {
            return Err(self.error_expected("literal"));
        };
        let lit = BasicLit {
            kind,
            text: self.token_text().to_string(),
            span: self.scanner.get_token_span(),
        };
        self.next_token()?;
        Ok(lit)
    }
}
