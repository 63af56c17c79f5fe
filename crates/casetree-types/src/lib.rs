pub mod column;
pub mod display;
pub mod error;
pub mod event;
pub mod fetch;
pub mod record;
mod tree;

pub use column::*;
pub use display::*;
pub use error::{Error, Result};
pub use event::*;
pub use fetch::*;
pub use record::*;
pub use tree::assemble_preorder;
