//! Map-key normalization of whole declarations.
//!
//! The normalizer walks every type and expression position of a declaration
//! top-down in source order. At each map type the key is handed to
//! [`rewrite_first_identifier`], and the walk continues into the map's value
//! only, so `map[A]map[B]C` gets two independent rewrites while a map nested
//! inside a key is left to the key rewrite.
//!
//! Function literal bodies are walked statement by statement. Their printed
//! form is the body's source text, so every key rewrite found inside a body
//! is also spliced into that text.
//!
//! The input declaration is borrowed and never modified; a new tree is built.

use keyshim_common::Span;
use keyshim_parser::{
    Block, CaseClause, CommClause, Element, Expr, Field, FuncBody, GenDecl, InterfaceElem,
    Signature, Spec, Stmt, TypeCaseClause, TypeExpr, TypeSpec, ValueSpec,
};
use tracing::trace;

use crate::map_key::{KeyRewrite, STRING_TYPE, rewrite_first_identifier};

/// A rewritten declaration with the key rewrites applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub decl: GenDecl,
    pub rewrites: Vec<KeyRewrite>,
}

/// Rewrite every map key in `decl`.
pub fn normalize_decl(decl: &GenDecl) -> Normalized {
    let mut normalizer = MapKeyNormalizer::new();
    let decl = normalizer.normalize_decl(decl);
    Normalized {
        decl,
        rewrites: normalizer.into_rewrites(),
    }
}

/// Outer traversal that applies the key rewrite to every map it meets.
pub struct MapKeyNormalizer {
    rewrites: Vec<KeyRewrite>,
    maps_seen: usize,
}

impl MapKeyNormalizer {
    pub fn new() -> Self {
        Self {
            rewrites: Vec::new(),
            maps_seen: 0,
        }
    }

    /// Number of map types visited so far, rewritten or not.
    pub fn maps_seen(&self) -> usize {
        self.maps_seen
    }

    pub fn rewrites(&self) -> &[KeyRewrite] {
        &self.rewrites
    }

    pub fn into_rewrites(self) -> Vec<KeyRewrite> {
        self.rewrites
    }

    pub fn normalize_decl(&mut self, decl: &GenDecl) -> GenDecl {
        GenDecl {
            kind: decl.kind,
            grouped: decl.grouped,
            specs: decl.specs.iter().map(|spec| self.spec(spec)).collect(),
            span: decl.span,
        }
    }

    fn spec(&mut self, spec: &Spec) -> Spec {
        match spec {
            Spec::Import(import) => Spec::Import(import.clone()),
            Spec::Type(type_spec) => Spec::Type(TypeSpec {
                name: type_spec.name.clone(),
                type_params: self.fields(&type_spec.type_params),
                alias: type_spec.alias,
                ty: self.type_expr(&type_spec.ty),
                span: type_spec.span,
            }),
            Spec::Value(value_spec) => Spec::Value(ValueSpec {
                names: value_spec.names.clone(),
                ty: value_spec.ty.as_ref().map(|ty| self.type_expr(ty)),
                values: value_spec.values.iter().map(|v| self.expr(v)).collect(),
                span: value_spec.span,
            }),
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn type_expr(&mut self, ty: &TypeExpr) -> TypeExpr {
        match ty {
            TypeExpr::Map { key, value, span } => {
                self.maps_seen += 1;
                let (key, rewrite) = rewrite_first_identifier(key);
                if let Some(rewrite) = rewrite {
                    trace!(
                        original = %rewrite.original,
                        span = %rewrite.span,
                        at_key = rewrite.at_key,
                        "rewrote map key"
                    );
                    self.rewrites.push(rewrite);
                }
                TypeExpr::Map {
                    key: Box::new(key),
                    value: self.boxed(value),
                    span: *span,
                }
            }
            TypeExpr::Name(_) | TypeExpr::Qualified { .. } => ty.clone(),
            TypeExpr::Generic { base, args, span } => TypeExpr::Generic {
                base: self.boxed(base),
                args: args.iter().map(|arg| self.type_expr(arg)).collect(),
                span: *span,
            },
            TypeExpr::Pointer { elem, span } => TypeExpr::Pointer {
                elem: self.boxed(elem),
                span: *span,
            },
            TypeExpr::Slice { elem, span } => TypeExpr::Slice {
                elem: self.boxed(elem),
                span: *span,
            },
            TypeExpr::Array { len, elem, span } => TypeExpr::Array {
                len: len.clone(),
                elem: self.boxed(elem),
                span: *span,
            },
            TypeExpr::Chan { dir, elem, span } => TypeExpr::Chan {
                dir: *dir,
                elem: self.boxed(elem),
                span: *span,
            },
            TypeExpr::Func(signature) => TypeExpr::Func(self.signature(signature)),
            TypeExpr::Struct {
                fields,
                one_line,
                span,
            } => TypeExpr::Struct {
                fields: self.fields(fields),
                one_line: *one_line,
                span: *span,
            },
            TypeExpr::Interface {
                elems,
                one_line,
                span,
            } => TypeExpr::Interface {
                elems: elems
                    .iter()
                    .map(|elem| match elem {
                        InterfaceElem::Method { name, signature } => InterfaceElem::Method {
                            name: name.clone(),
                            signature: self.signature(signature),
                        },
                        InterfaceElem::Embedded(ty) => InterfaceElem::Embedded(self.type_expr(ty)),
                    })
                    .collect(),
                one_line: *one_line,
                span: *span,
            },
            TypeExpr::Union { terms, span } => TypeExpr::Union {
                terms: terms.iter().map(|term| self.type_expr(term)).collect(),
                span: *span,
            },
            TypeExpr::Tilde { elem, span } => TypeExpr::Tilde {
                elem: self.boxed(elem),
                span: *span,
            },
            TypeExpr::Paren { elem, span } => TypeExpr::Paren {
                elem: self.boxed(elem),
                span: *span,
            },
            TypeExpr::Ellipsis { elem, span } => TypeExpr::Ellipsis {
                elem: self.boxed(elem),
                span: *span,
            },
        }
    }

    fn boxed(&mut self, ty: &TypeExpr) -> Box<TypeExpr> {
        Box::new(self.type_expr(ty))
    }

    fn fields(&mut self, fields: &[Field]) -> Vec<Field> {
        fields
            .iter()
            .map(|field| Field {
                names: field.names.clone(),
                ty: self.type_expr(&field.ty),
                tag: field.tag.clone(),
                span: field.span,
            })
            .collect()
    }

    fn signature(&mut self, signature: &Signature) -> Signature {
        Signature {
            params: self.fields(&signature.params),
            results: self.fields(&signature.results),
            span: signature.span,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Ident(_) | Expr::BasicLit(_) => expr.clone(),
            Expr::Type(ty) => Expr::Type(self.boxed(ty)),
            Expr::Composite {
                ty,
                elements,
                multiline,
                span,
            } => Expr::Composite {
                ty: ty.as_deref().map(|ty| self.boxed_expr(ty)),
                elements: elements
                    .iter()
                    .map(|element| Element {
                        key: element.key.as_ref().map(|key| self.expr(key)),
                        value: self.expr(&element.value),
                    })
                    .collect(),
                multiline: *multiline,
                span: *span,
            },
            Expr::FuncLit {
                signature,
                body,
                span,
            } => Expr::FuncLit {
                signature: self.signature(signature),
                body: self.func_body(body),
                span: *span,
            },
            Expr::Paren { expr, span } => Expr::Paren {
                expr: self.boxed_expr(expr),
                span: *span,
            },
            Expr::Selector { expr, sel, span } => Expr::Selector {
                expr: self.boxed_expr(expr),
                sel: sel.clone(),
                span: *span,
            },
            Expr::Index {
                expr,
                indices,
                span,
            } => Expr::Index {
                expr: self.boxed_expr(expr),
                indices: indices.iter().map(|index| self.expr(index)).collect(),
                span: *span,
            },
            Expr::Slice {
                expr,
                low,
                high,
                max,
                span,
            } => Expr::Slice {
                expr: self.boxed_expr(expr),
                low: low.as_deref().map(|e| self.boxed_expr(e)),
                high: high.as_deref().map(|e| self.boxed_expr(e)),
                max: max.as_deref().map(|e| self.boxed_expr(e)),
                span: *span,
            },
            Expr::TypeAssert { expr, ty, span } => Expr::TypeAssert {
                expr: self.boxed_expr(expr),
                ty: ty.as_deref().map(|ty| self.boxed(ty)),
                span: *span,
            },
            Expr::Call {
                func,
                args,
                ellipsis,
                span,
            } => Expr::Call {
                func: self.boxed_expr(func),
                args: args.iter().map(|arg| self.expr(arg)).collect(),
                ellipsis: *ellipsis,
                span: *span,
            },
            Expr::Unary { op, expr, span } => Expr::Unary {
                op: *op,
                expr: self.boxed_expr(expr),
                span: *span,
            },
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => Expr::Binary {
                op: *op,
                left: self.boxed_expr(left),
                right: self.boxed_expr(right),
                span: *span,
            },
        }
    }

    fn boxed_expr(&mut self, expr: &Expr) -> Box<Expr> {
        Box::new(self.expr(expr))
    }

    fn exprs(&mut self, exprs: &[Expr]) -> Vec<Expr> {
        exprs.iter().map(|expr| self.expr(expr)).collect()
    }

    // =========================================================================
    // Function bodies
    // =========================================================================

    fn func_body(&mut self, body: &FuncBody) -> FuncBody {
        let first = self.rewrites.len();
        let block = self.block(&body.block);
        let text = splice_rewrites(&body.text, body.span(), &self.rewrites[first..]);
        FuncBody { block, text }
    }

    fn block(&mut self, block: &Block) -> Block {
        Block {
            stmts: self.stmts(&block.stmts),
            span: block.span,
        }
    }

    fn stmts(&mut self, stmts: &[Stmt]) -> Vec<Stmt> {
        stmts.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    fn boxed_stmt(&mut self, stmt: &Stmt) -> Box<Stmt> {
        Box::new(self.stmt(stmt))
    }

    fn stmt(&mut self, stmt: &Stmt) -> Stmt {
        match stmt {
            Stmt::Branch { .. } | Stmt::Empty(_) => stmt.clone(),
            Stmt::Decl(decl) => Stmt::Decl(self.normalize_decl(decl)),
            Stmt::Labeled { label, stmt, span } => Stmt::Labeled {
                label: label.clone(),
                stmt: self.boxed_stmt(stmt),
                span: *span,
            },
            Stmt::Expr(expr) => Stmt::Expr(self.expr(expr)),
            Stmt::Send { chan, value, span } => Stmt::Send {
                chan: self.expr(chan),
                value: self.expr(value),
                span: *span,
            },
            Stmt::IncDec { expr, op, span } => Stmt::IncDec {
                expr: self.expr(expr),
                op: *op,
                span: *span,
            },
            Stmt::Assign { lhs, op, rhs, span } => Stmt::Assign {
                lhs: self.exprs(lhs),
                op: *op,
                rhs: self.exprs(rhs),
                span: *span,
            },
            Stmt::Go { call, span } => Stmt::Go {
                call: self.expr(call),
                span: *span,
            },
            Stmt::Defer { call, span } => Stmt::Defer {
                call: self.expr(call),
                span: *span,
            },
            Stmt::Return { results, span } => Stmt::Return {
                results: self.exprs(results),
                span: *span,
            },
            Stmt::Block(block) => Stmt::Block(self.block(block)),
            Stmt::If {
                init,
                cond,
                then,
                otherwise,
                span,
            } => Stmt::If {
                init: init.as_deref().map(|init| self.boxed_stmt(init)),
                cond: self.expr(cond),
                then: self.block(then),
                otherwise: otherwise.as_deref().map(|other| self.boxed_stmt(other)),
                span: *span,
            },
            Stmt::Switch {
                init,
                tag,
                clauses,
                span,
            } => Stmt::Switch {
                init: init.as_deref().map(|init| self.boxed_stmt(init)),
                tag: tag.as_ref().map(|tag| self.expr(tag)),
                clauses: clauses
                    .iter()
                    .map(|clause| CaseClause {
                        exprs: self.exprs(&clause.exprs),
                        body: self.stmts(&clause.body),
                        span: clause.span,
                    })
                    .collect(),
                span: *span,
            },
            Stmt::TypeSwitch {
                init,
                guard,
                clauses,
                span,
            } => Stmt::TypeSwitch {
                init: init.as_deref().map(|init| self.boxed_stmt(init)),
                guard: self.boxed_stmt(guard),
                clauses: clauses
                    .iter()
                    .map(|clause| TypeCaseClause {
                        types: clause.types.iter().map(|ty| self.type_expr(ty)).collect(),
                        body: self.stmts(&clause.body),
                        span: clause.span,
                    })
                    .collect(),
                span: *span,
            },
            Stmt::Select { clauses, span } => Stmt::Select {
                clauses: clauses
                    .iter()
                    .map(|clause| CommClause {
                        comm: clause.comm.as_deref().map(|comm| self.boxed_stmt(comm)),
                        body: self.stmts(&clause.body),
                        span: clause.span,
                    })
                    .collect(),
                span: *span,
            },
            Stmt::For {
                init,
                cond,
                post,
                body,
                span,
            } => Stmt::For {
                init: init.as_deref().map(|init| self.boxed_stmt(init)),
                cond: cond.as_ref().map(|cond| self.expr(cond)),
                post: post.as_deref().map(|post| self.boxed_stmt(post)),
                body: self.block(body),
                span: *span,
            },
            Stmt::Range {
                key,
                value,
                define,
                expr,
                body,
                span,
            } => Stmt::Range {
                key: key.as_ref().map(|key| self.expr(key)),
                value: value.as_ref().map(|value| self.expr(value)),
                define: *define,
                expr: self.expr(expr),
                body: self.block(body),
                span: *span,
            },
        }
    }
}

/// Replace each rewritten identifier inside `body` with `string` in the
/// body's source text.
fn splice_rewrites(text: &str, body: Span, rewrites: &[KeyRewrite]) -> String {
    let mut edits: Vec<Span> = rewrites
        .iter()
        .map(|rewrite| rewrite.span)
        .filter(|span| body.contains(*span))
        .collect();
    if edits.is_empty() {
        return text.to_string();
    }
    edits.sort_by_key(|span| span.start);

    let mut out = String::with_capacity(text.len() + edits.len() * STRING_TYPE.len());
    let mut cursor = 0;
    for edit in edits {
        let start = (edit.start - body.start) as usize;
        let end = (edit.end - body.start) as usize;
        let Some(before) = text.get(cursor..start) else {
            continue;
        };
        out.push_str(before);
        out.push_str(STRING_TYPE);
        cursor = end;
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    out
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod normalizer_tests;
