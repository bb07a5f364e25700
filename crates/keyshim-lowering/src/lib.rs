//! Declaration lowering for keyshim.
//!
//! This crate turns a parsed `SourceUnit` into the declarations that go into
//! the shim:
//! - `filter` - keeps the top-level `type`, `var` and `const` declarations
//! - `map_key` - the key rewrite applied to a single map type
//! - `normalizer` - walks a declaration and rewrites every map key it holds

pub mod filter;
pub use filter::filter_declarations;

pub mod map_key;
pub use map_key::{KeyRewrite, rewrite_first_identifier};

pub mod normalizer;
pub use normalizer::{MapKeyNormalizer, Normalized, normalize_decl};
