//! Tolerant XML loading for report documents.

pub mod encoding;
pub mod parser;
pub mod tree;

pub use encoding::decode_document;
pub use parser::Document;
pub use tree::{extract_text, Descendants, Element, Node};
