//! Final text form of an output document.
//!
//! Layout software downstream expects a few fixed spacing conventions
//! between sibling elements, so the compact serialization is post-processed
//! with literal substitutions before it is written.

use std::sync::LazyLock;

use campinfo_xml::{Document, XmlError, to_xml_string};
use regex::Regex;

/// Declaration written at the top of every output file.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Paragraph separator placed around the rating source phrase.
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';

static LINE_BREAK_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n *").expect("valid line-break regex"));

const SIBLING_SPACING: &[(&str, &str)] = &[
    ("</Street><StreetNo>", "</Street> <StreetNo>"),
    ("</ZipCode><Town>", "</ZipCode> <Town>"),
    (
        "</GeoLatitude><GeoLongitude>",
        "</GeoLatitude>&#x20;&#x20;<GeoLongitude>",
    ),
    ("><Fkk", ">&#x20;&#x20;<Fkk"),
];

const RATING_SOURCE_PHRASE: &str = "lt. Bewertung von";

/// Apply the spacing and escaping substitutions to serialized markup.
pub fn apply_fixups(markup: &str) -> String {
    let mut out = LINE_BREAK_INDENT.replace_all(markup, "").into_owned();
    for (from, to) in SIBLING_SPACING {
        out = out.replace(from, to);
    }
    out = out.replace(
        &format!(" {RATING_SOURCE_PHRASE} "),
        &format!("{PARAGRAPH_SEPARATOR}{RATING_SOURCE_PHRASE}{PARAGRAPH_SEPARATOR}"),
    );
    out.replace("&amp;#x9;", "&#x9;")
}

/// Declaration, newline, then the fixed-up compact serialization.
pub fn render_document(document: &Document) -> Result<String, XmlError> {
    let body = apply_fixups(&to_xml_string(document)?);
    let mut out = String::with_capacity(XML_DECLARATION.len() + 1 + body.len());
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str(&body);
    Ok(out)
}
