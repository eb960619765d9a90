//! quill_cfg: Control-flow graphs over lowered function bodies.
//!
//! Used for two checks after lowering: dropping statements that can never
//! run, and verifying that every path through a value-returning function
//! ends in `return`.

mod graph;
mod reachability;

pub use graph::{BasicBlock, BlockId, BlockKind, ControlFlowGraph, Edge, EdgeCondition};
pub use reachability::{all_paths_return, remove_unreachable};
