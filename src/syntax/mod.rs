//! Parser/serializer boundary
//!
//! Turns stylesheet text into an [`Ast`](crate::ast::Ast) and back. The
//! cleaning engine treats both directions as opaque collaborators; only
//! the AST shape is shared.

mod parser;
mod serializer;

pub use parser::parse;
pub use serializer::stringify;
