//! Terminal 2048 (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as `tui_2048::{core,adapter,term,input,types}`
//! and holds the command-line options shared by the two binaries.

pub mod cli;

pub use tui_2048_adapter as adapter;
pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_term as term;
pub use tui_2048_types as types;
