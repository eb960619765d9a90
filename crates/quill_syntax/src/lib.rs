//! quill_syntax: The syntax tree the semantic core consumes.
//!
//! Lexing and parsing live upstream. This crate only defines the shape of
//! the tree they produce, plus [`SyntaxFactory`] for building trees directly
//! in tests, benchmarks and embedders.

pub mod factory;
pub mod node;
pub mod syntax_kind;

// Re-export key types
pub use factory::SyntaxFactory;
pub use node::*;
pub use syntax_kind::SyntaxKind;
