//! quill_binder: Name resolution and type checking.
//!
//! Turns a syntax tree into typed IR. Names resolve through a chain of
//! [`Scope`]s rooted at the builtins; conversions follow the lattice in
//! [`Conversion`]; constant folding happens as IR nodes are built.

pub mod binder;
pub mod conversion;
pub mod global_scope;
pub mod scope;

pub use binder::{Binder, MAIN_FUNCTION_NAME, SCRIPT_FUNCTION_NAME};
pub use conversion::Conversion;
pub use global_scope::{BoundGlobalScope, BoundUnit};
pub use scope::Scope;
