//! quill_evaluator: executes lowered programs.
//!
//! The evaluator walks the flat statement list of one activation with an
//! instruction pointer. Globals live in a caller-owned [`GlobalValues`] so
//! they survive from one generation to the next; builtins talk to the
//! outside world through a [`Host`].

mod error;
mod evaluator;
mod globals;
mod host;

pub use error::EvalError;
pub use evaluator::Evaluator;
pub use globals::GlobalValues;
pub use host::{BufferedHost, Host, StdHost};
