//! css-devendor: vendor-prefix deduplication for stylesheets
//!
//! This crate provides a single-pass, mutation-in-place cleanup of a
//! parsed stylesheet tree:
//! - Vendor: detection and stripping of vendor prefixes from identifiers
//! - Compare: memoized canonicalization of value text for equality tests
//! - Ast: arena-indexed stylesheet tree with stable node identities
//! - Syntax: parse/stringify boundary around the tree
//! - Cleaner: the walking engine — per-kind dispatch, declaration and
//!   keyframes merging, deferred mark-then-compact removal
//!
//! ```
//! use css_devendor::Cleaner;
//!
//! let mut cleaner = Cleaner::new();
//! let css = cleaner
//!     .clean("a { -webkit-transform: scale(1); transform: scale(1); }")
//!     .unwrap();
//! assert_eq!(css, "a {\n  transform: scale(1);\n}");
//! ```

pub mod ast;
pub mod cleaner;
pub mod compare;
pub mod errors;
pub mod syntax;
pub mod vendor;

// Re-exports for convenience
pub use ast::{Ast, Kind, Node, NodeId, NodeKind};
pub use cleaner::Cleaner;
pub use compare::{normalize_for_comparison, values_equivalent};
pub use errors::ParseError;
pub use syntax::{parse, stringify};
pub use vendor::{devendorize, extract_prefixed, is_vendor_prefixed, PrefixedIdent};
