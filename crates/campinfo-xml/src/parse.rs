//! Build an owned tree from quick-xml events.
//!
//! Whitespace-only text between elements is dropped, the same way a DOM
//! loader without whitespace preservation behaves. Declarations, processing
//! instructions and doctypes are skipped; comments and CDATA are kept.

use std::str;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, XmlError};
use crate::node::{Document, Element, Node};

/// Parse a complete document with exactly one root element.
pub fn parse_document(source: &str) -> Result<Document> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();
    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|err| XmlError::parse(position, err))?;
        match event {
            Event::Start(start) => {
                builder.flush_text(position)?;
                builder.open.push(element_from_start(&start, position)?);
            }
            Event::Empty(start) => {
                builder.flush_text(position)?;
                let element = element_from_start(&start, position)?;
                builder.attach(Node::Element(element), position)?;
            }
            Event::End(end) => {
                builder.flush_text(position)?;
                let element = builder.open.pop().ok_or_else(|| XmlError::UnexpectedEnd {
                    name: String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    position,
                })?;
                builder.attach(Node::Element(element), position)?;
            }
            Event::Text(text) => {
                let raw = utf8(&text, position)?;
                let content = unescape(raw).map_err(|err| XmlError::parse(position, err))?;
                builder.pending.push_str(&content);
            }
            Event::GeneralRef(reference) => {
                let raw = format!("&{};", utf8(&reference, position)?);
                let content = unescape(&raw).map_err(|err| XmlError::parse(position, err))?;
                builder.pending.push_str(&content);
            }
            Event::CData(data) => {
                builder.flush_text(position)?;
                let content = utf8(&data, position)?.to_string();
                builder.attach(Node::CData(content), position)?;
            }
            Event::Comment(comment) => {
                builder.flush_text(position)?;
                let content = utf8(&comment, position)?.to_string();
                if !builder.open.is_empty() {
                    builder.attach(Node::Comment(content), position)?;
                }
            }
            Event::Eof => {
                builder.flush_text(position)?;
                break;
            }
            _ => {}
        }
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<Element>,
    root: Option<Element>,
    pending: String,
}

impl TreeBuilder {
    fn flush_text(&mut self, position: u64) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending);
        if text.trim().is_empty() {
            return Ok(());
        }
        self.attach(Node::Text(text), position)
    }

    fn attach(&mut self, node: Node, position: u64) -> Result<()> {
        if let Some(parent) = self.open.last_mut() {
            parent.push_node(node);
            return Ok(());
        }
        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    return Err(XmlError::MultipleRoots {
                        name: element.name().to_string(),
                        position,
                    });
                }
                self.root = Some(element);
                Ok(())
            }
            _ => Err(XmlError::TextOutsideRoot { position }),
        }
    }

    fn finish(mut self) -> Result<Document> {
        if let Some(open) = self.open.pop() {
            return Err(XmlError::Unclosed {
                name: open.name().to_string(),
            });
        }
        self.root.map(Document::new).ok_or(XmlError::MissingRoot)
    }
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> Result<Element> {
    let qname = start.name();
    let name = utf8(qname.as_ref(), position)?;
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| XmlError::parse(position, err))?;
        let key = utf8(attribute.key.as_ref(), position)?;
        let raw = utf8(&attribute.value, position)?;
        let value = unescape(raw).map_err(|err| XmlError::parse(position, err))?;
        element.set_attribute(key, value);
    }
    Ok(element)
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str> {
    str::from_utf8(bytes).map_err(|err| XmlError::parse(position, err))
}
