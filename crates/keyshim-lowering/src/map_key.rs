//! Map key rewriting.
//!
//! A map key is rewritten by replacing the first identifier-valued type node
//! of the key subtree with `string`. The walk is depth-first in source order
//! and stops at the first identifier, so for a plain key like `int` the key
//! itself is replaced, while composite keys are rewritten inside:
//!
//! | key              | rewritten          |
//! |------------------|--------------------|
//! | `int`            | `string`           |
//! | `pkg.ID`         | `string.ID`        |
//! | `[16]byte`       | `[16]string`       |
//! | `*Node`          | `*string`          |
//! | `Pair[int, int]` | `string[int, int]` |
//! | `struct{}`       | unchanged          |
//!
//! Array lengths and struct field names are not type nodes and are never
//! touched.

use keyshim_common::Span;
use keyshim_parser::{Field, Ident, InterfaceElem, Signature, TypeExpr};

pub const STRING_TYPE: &str = "string";

/// Record of one rewritten map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRewrite {
    /// Name of the identifier that became `string`.
    pub original: String,
    /// Span of that identifier.
    pub span: Span,
    /// Span of the whole key type.
    pub key_span: Span,
    /// The identifier was the key type itself, not something nested in it.
    pub at_key: bool,
}

/// Rewrite the first identifier-valued type node of `key` to `string`.
///
/// Returns the new key and, if an identifier other than `string` was
/// replaced, a record of it. A key whose first identifier already is
/// `string` comes back unchanged with no record.
pub fn rewrite_first_identifier(key: &TypeExpr) -> (TypeExpr, Option<KeyRewrite>) {
    let mut rewriter = FirstIdentRewriter { mark: None };
    let rewritten = rewriter.visit(key);
    let record = rewriter.mark.and_then(|ident| {
        (ident.name != STRING_TYPE).then(|| KeyRewrite {
            at_key: matches!(key, TypeExpr::Name(name) if name.span == ident.span),
            original: ident.name,
            span: ident.span,
            key_span: key.span(),
        })
    });
    (rewritten, record)
}

/// Depth-first copy of a key subtree that replaces the first identifier
/// and copies everything after it unchanged.
struct FirstIdentRewriter {
    /// Set once the first identifier has been seen.
    mark: Option<Ident>,
}

impl FirstIdentRewriter {
    fn visit(&mut self, ty: &TypeExpr) -> TypeExpr {
        if self.mark.is_some() {
            return ty.clone();
        }
        match ty {
            TypeExpr::Name(ident) => TypeExpr::Name(self.replace(ident)),
            TypeExpr::Qualified { package, name } => TypeExpr::Qualified {
                package: self.replace(package),
                name: name.clone(),
            },
            TypeExpr::Generic { base, args, span } => TypeExpr::Generic {
                base: self.visit_boxed(base),
                args: args.iter().map(|arg| self.visit(arg)).collect(),
                span: *span,
            },
            TypeExpr::Pointer { elem, span } => TypeExpr::Pointer {
                elem: self.visit_boxed(elem),
                span: *span,
            },
            TypeExpr::Slice { elem, span } => TypeExpr::Slice {
                elem: self.visit_boxed(elem),
                span: *span,
            },
            TypeExpr::Array { len, elem, span } => TypeExpr::Array {
                len: len.clone(),
                elem: self.visit_boxed(elem),
                span: *span,
            },
            TypeExpr::Map { key, value, span } => TypeExpr::Map {
                key: self.visit_boxed(key),
                value: self.visit_boxed(value),
                span: *span,
            },
            TypeExpr::Chan { dir, elem, span } => TypeExpr::Chan {
                dir: *dir,
                elem: self.visit_boxed(elem),
                span: *span,
            },
            TypeExpr::Func(signature) => TypeExpr::Func(self.visit_signature(signature)),
            TypeExpr::Struct {
                fields,
                one_line,
                span,
            } => TypeExpr::Struct {
                fields: self.visit_fields(fields),
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
                            signature: self.visit_signature(signature),
                        },
                        InterfaceElem::Embedded(ty) => InterfaceElem::Embedded(self.visit(ty)),
                    })
                    .collect(),
                one_line: *one_line,
                span: *span,
            },
            TypeExpr::Union { terms, span } => TypeExpr::Union {
                terms: terms.iter().map(|term| self.visit(term)).collect(),
                span: *span,
            },
            TypeExpr::Tilde { elem, span } => TypeExpr::Tilde {
                elem: self.visit_boxed(elem),
                span: *span,
            },
            TypeExpr::Paren { elem, span } => TypeExpr::Paren {
                elem: self.visit_boxed(elem),
                span: *span,
            },
            TypeExpr::Ellipsis { elem, span } => TypeExpr::Ellipsis {
                elem: self.visit_boxed(elem),
                span: *span,
            },
        }
    }

    fn visit_boxed(&mut self, ty: &TypeExpr) -> Box<TypeExpr> {
        Box::new(self.visit(ty))
    }

    fn visit_fields(&mut self, fields: &[Field]) -> Vec<Field> {
        fields
            .iter()
            .map(|field| Field {
                names: field.names.clone(),
                ty: self.visit(&field.ty),
                tag: field.tag.clone(),
                span: field.span,
            })
            .collect()
    }

    fn visit_signature(&mut self, signature: &Signature) -> Signature {
        Signature {
            params: self.visit_fields(&signature.params),
            results: self.visit_fields(&signature.results),
            span: signature.span,
        }
    }

    /// Mark `ident` as the first identifier and return its replacement.
    fn replace(&mut self, ident: &Ident) -> Ident {
        self.mark = Some(ident.clone());
        Ident::new(STRING_TYPE, ident.span)
    }
}

#[cfg(test)]
#[path = "tests/map_key_tests.rs"]
mod map_key_tests;
