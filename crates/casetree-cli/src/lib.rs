// casetree command line - loads a fetch payload from disk and shows it the
// way a tree grid would, or drives the column editor non-interactively.

mod args;
mod commands;
mod handlers;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands, FieldAssignment};
pub use commands::{FetchFailed, run};
