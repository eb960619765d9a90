//! quill_core: Core utilities shared by every stage of the Quill pipeline.
//!
//! Provides string interning for identifiers, source spans and line maps
//! for diagnostics, an insertion-ordered map for scopes, and the bump
//! arena that syntax trees are allocated from.

pub mod arena;
pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use arena::SyntaxArena;
pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, TextRange, TextSpan};
