//! Compact serialization of the owned tree.
//!
//! Output has no indentation and no XML declaration. Elements without
//! children are written as empty tags (`<Spalte/>`), elements holding an empty
//! text node get an explicit end tag. Tabs in text and attribute values are
//! written as `&#x9;` character references.

use std::borrow::Cow;
use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, XmlError};
use crate::node::{Document, Element, Node};

/// Serialize a document into a writer.
pub fn write_document<W: Write>(writer: W, document: &Document) -> Result<()> {
    let mut xml = Writer::new(writer);
    write_element(&mut xml, document.root())
}

/// Serialize a document into a string.
pub fn to_xml_string(document: &Document) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(&mut buffer, document)?;
    String::from_utf8(buffer)
        .map_err(|err| XmlError::Write(io::Error::new(io::ErrorKind::InvalidData, err)))
}

fn write_element<W: Write>(xml: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name());
    for attribute in element.attributes() {
        let value = escape_attribute(&attribute.value);
        start.push_attribute((attribute.name.as_bytes(), value.as_bytes()));
    }
    if element.children().is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }
    xml.write_event(Event::Start(start))?;
    for child in element.children() {
        match child {
            Node::Element(inner) => write_element(xml, inner)?,
            Node::Text(text) => {
                xml.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
            }
            Node::Comment(comment) => {
                xml.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
            }
            Node::CData(data) => {
                xml.write_event(Event::CData(BytesCData::new(data.as_str())))?;
            }
        }
    }
    xml.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}

fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\t' => Some("&#x9;"),
        _ => None,
    })
}

fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape_with(value, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#x9;"),
        '\n' => Some("&#xA;"),
        '\r' => Some("&#xD;"),
        _ => None,
    })
}

fn escape_with(input: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !input.chars().any(|ch| replacement(ch).is_some()) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match replacement(ch) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}
