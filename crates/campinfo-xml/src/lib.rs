//! XML tree, parser and serializer used for row templates.
//!
//! - [`Template`] parses markup once and hands out deep copies.
//! - [`Document`] / [`Element`] form a small owned tree with mixed content.
//! - [`to_xml_string`] writes the compact form used for output files.

mod error;
mod node;
mod parse;
mod template;
mod write;

pub use error::{Result, XmlError};
pub use node::{Attribute, Document, Element, Node};
pub use parse::parse_document;
pub use template::{Template, TemplateSource};
pub use write::{to_xml_string, write_document};
