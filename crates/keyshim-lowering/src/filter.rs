//! Declaration filter.

use keyshim_parser::{Decl, GenDecl, GenKind, SourceUnit};
use tracing::trace;

/// Whether a declaration is carried into the shim.
pub fn is_shim_decl(decl: &Decl) -> bool {
    matches!(
        decl,
        Decl::Gen(GenDecl {
            kind: GenKind::Type | GenKind::Var | GenKind::Const,
            ..
        })
    )
}

/// The `type`, `var` and `const` declarations of `unit`, in source order.
///
/// Functions, methods and imports are dropped.
pub fn filter_declarations(unit: &SourceUnit) -> Vec<&GenDecl> {
    unit.decls
        .iter()
        .filter_map(|decl| match decl {
            Decl::Gen(gen_decl) if is_shim_decl(decl) => Some(gen_decl),
            Decl::Gen(gen_decl) => {
                trace!(
                    kind = gen_decl.kind.keyword(),
                    span = %gen_decl.span,
                    "dropping declaration"
                );
                None
            }
            Decl::Func(func) => {
                trace!(name = %func.name.name, span = %func.span, "dropping function");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod filter_tests;
