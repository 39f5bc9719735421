//! Document tree for weave.
//!
//! This crate is the tree capability the template compiler consumes: it
//! parses markup into an owned node tree, offers the handful of mutations the
//! compiler needs (attributes, text content, placeholder splicing, deep
//! clone), and serializes the result back to HTML.

pub mod entities;
pub mod node;
pub mod parser;
pub mod serialize;

pub use node::{is_void_element, replace_child, Attribute, ChildSlot, Element, Node, NodeKind};
pub use parser::parse_markup;
