//! Markup reading and writing.

mod reader;
mod writer;

pub use reader::parse;
pub use writer::{serialize, serialize_node};
