//! Document model for the WordprocessingML part being templated.
//!
//! The tree is an index arena ([`Document`]); [`run`] layers the run and
//! paragraph text accessors on top of it.

mod name;
pub mod run;
mod tree;

pub use name::{QName, Tag, WORDML_NS, XML_NS};
pub use run::{
    clear_run_text, has_text, paragraph_runs, paragraph_text, run_text, set_run_text,
};
pub use tree::{Attribute, Descendants, Document, Element, NodeId, NodeKind, XmlDeclaration};
