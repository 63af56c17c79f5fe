//! Testing infrastructure for casetree integration tests.
//!
//! - `TestWorld`: isolated temp directory with payload and config files
//! - `fixtures`: sample hierarchies and fetch payloads
//! - `assertions`: checks over the CLI's JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::TestWorld;
