//! Output stage: destination naming, rendering and file writing.

mod error;
mod naming;
mod render;
mod writer;

pub use error::{OutputError, Result};
pub use naming::{destination_dir, safe_name};
pub use render::{PARAGRAPH_SEPARATOR, XML_DECLARATION, apply_fixups, render_document};
pub use writer::OutputWriter;
