//! # XML Document Model
//!
//! A small owned element tree used both for generated descriptors and for the
//! registry document. Attributes live in a `BTreeMap`, so serialization always
//! emits them in lexicographic order and the output is byte-stable.
//!
//! The reader only covers what registry documents contain: elements, attributes,
//! text, entity references, CDATA sections and comments. Comments inside the root
//! element are kept so a rewritten registry still carries disabled tool entries.
//! Declarations, processing instructions, doctypes and comments outside the root
//! are skipped.

use std::collections::BTreeMap;
use thiserror::Error;

/// Indentation unit of the pretty printer.
const INDENT: &str = "\t";

/// Declaration line emitted at the top of every document.
const XML_DECLARATION: &str = "<?xml version=\"1.0\" ?>";

/// Errors raised while reading an XML document.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum XmlError {
    /// The input ended in the middle of a construct.
    #[error("Unexpected end of document at byte {offset}")]
    UnexpectedEof {
        /// Byte offset where more input was expected.
        offset: usize,
    },
    /// A character that does not fit the grammar at this position.
    #[error("Malformed XML at byte {offset}: {reason}")]
    Malformed {
        /// Byte offset of the offending character.
        offset: usize,
        /// What the reader expected.
        reason: String,
    },
    /// A closing tag that does not match the open element.
    #[error("Mismatched closing tag at byte {offset}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        /// Byte offset of the closing tag.
        offset: usize,
        /// The element that was open.
        expected: String,
        /// The closing tag actually found.
        found: String,
    },
    /// The document has no root element.
    #[error("Document has no root element")]
    NoRootElement,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// A nested element.
    Element(XmlElement),
    /// Character data, unescaped. CDATA sections are read into this variant too.
    Text(String),
    /// The raw body of a `<!-- ... -->` comment.
    Comment(String),
}

/// An element with lexicographically ordered attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Builder-style element child.
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder-style bulk append of element children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children
            .extend(children.into_iter().map(XmlNode::Element));
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn push_child(&mut self, child: Self) {
        self.children.push(XmlNode::Element(child));
    }

    /// Iterates over the element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) | XmlNode::Comment(_) => None,
        })
    }

    /// Mutable counterpart of [`Self::elements`].
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Self> {
        self.children.iter_mut().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) | XmlNode::Comment(_) => None,
        })
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) | XmlNode::Comment(_) => None,
            })
            .collect()
    }
}

// --- WRITER ---

/// Serializes `root` as a complete document: declaration line, one tab per depth.
pub fn to_pretty_string(root: &XmlElement) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &XmlElement, depth: usize) {
    let indent = INDENT.repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    match element.children.as_slice() {
        [] => out.push_str("/>\n"),
        [XmlNode::Text(text)] => {
            out.push('>');
            out.push_str(&escape_text(text));
            out.push_str("</");
            out.push_str(&element.name);
            out.push_str(">\n");
        }
        children => {
            out.push_str(">\n");
            for child in children {
                match child {
                    XmlNode::Element(e) => write_element(out, e, depth + 1),
                    XmlNode::Text(t) => {
                        out.push_str(&indent);
                        out.push_str(INDENT);
                        out.push_str(&escape_text(t));
                        out.push('\n');
                    }
                    XmlNode::Comment(c) => {
                        out.push_str(&indent);
                        out.push_str(INDENT);
                        out.push_str("<!--");
                        out.push_str(c);
                        out.push_str("-->\n");
                    }
                }
            }
            out.push_str(&indent);
            out.push_str("</");
            out.push_str(&element.name);
            out.push_str(">\n");
        }
    }
}

fn escape_text(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attr(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// --- READER ---

/// Parses a document and returns its root element.
/// Whitespace-only text between elements is dropped.
pub fn parse_document(input: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader { input, pos: 0 };
    reader.skip_misc()?;
    if reader.at_end() {
        return Err(XmlError::NoRootElement);
    }
    let root = reader.parse_element()?;
    reader.skip_misc()?;
    if !reader.at_end() {
        return Err(reader.malformed("content after the root element"));
    }
    Ok(root)
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or("")
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn malformed(&self, reason: &str) -> XmlError {
        XmlError::Malformed {
            offset: self.pos,
            reason: reason.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// Advances past `terminator`, failing if it never appears.
    fn skip_past(&mut self, terminator: &str) -> Result<(), XmlError> {
        match self.rest().find(terminator) {
            Some(idx) => {
                self.pos += idx + terminator.len();
                Ok(())
            }
            None => Err(XmlError::UnexpectedEof {
                offset: self.input.len(),
            }),
        }
    }

    /// Skips the prolog/epilog constructs that carry no registry data.
    fn skip_misc(&mut self) -> Result<(), XmlError> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if rest.starts_with("<!") {
                self.skip_past(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, c: char) -> Result<(), XmlError> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(_) => Err(self.malformed(&format!("expected '{}'", c))),
            None => Err(XmlError::UnexpectedEof { offset: self.pos }),
        }
    }

    fn parse_name(&mut self) -> Result<String, XmlError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.malformed("expected a name"));
        }
        let name = rest.get(..len).unwrap_or("").to_string();
        self.pos += len;
        Ok(name)
    }

    fn parse_element(&mut self) -> Result<XmlElement, XmlError> {
        self.expect('<')?;
        let mut element = XmlElement::new(self.parse_name()?);

        // Attributes, then either `/>` or `>`.
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.pos += 1;
                    self.expect('>')?;
                    return Ok(element);
                }
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let key = self.parse_name()?;
                    self.skip_whitespace();
                    self.expect('=')?;
                    self.skip_whitespace();
                    let value = self.parse_quoted()?;
                    element.attributes.insert(key, value);
                }
                None => return Err(XmlError::UnexpectedEof { offset: self.pos }),
            }
        }

        // Content.
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(XmlError::UnexpectedEof { offset: self.pos });
            }
            if rest.starts_with("</") {
                let tag_offset = self.pos;
                self.pos += 2;
                let closing = self.parse_name()?;
                self.skip_whitespace();
                self.expect('>')?;
                if closing != element.name {
                    return Err(XmlError::MismatchedTag {
                        offset: tag_offset,
                        expected: element.name,
                        found: closing,
                    });
                }
                return Ok(element);
            } else if let Some(body) = rest.strip_prefix("<!--") {
                let len = body.find("-->").ok_or(XmlError::UnexpectedEof {
                    offset: self.input.len(),
                })?;
                let comment = body.get(..len).unwrap_or("").to_string();
                self.pos += "<!--".len() + len + "-->".len();
                element.children.push(XmlNode::Comment(comment));
            } else if let Some(body) = rest.strip_prefix("<![CDATA[") {
                let len = body.find("]]>").ok_or(XmlError::UnexpectedEof {
                    offset: self.input.len(),
                })?;
                let text = body.get(..len).unwrap_or("").to_string();
                self.pos += "<![CDATA[".len() + len + "]]>".len();
                push_text(&mut element, text);
            } else if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with('<') {
                let child = self.parse_element()?;
                element.push_child(child);
            } else {
                let len = rest.find('<').unwrap_or(rest.len());
                let raw = rest.get(..len).unwrap_or("");
                let text_offset = self.pos;
                self.pos += len;
                if !raw.trim().is_empty() {
                    let text = unescape(raw.trim(), text_offset)?;
                    push_text(&mut element, text);
                }
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String, XmlError> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            Some(_) => return Err(self.malformed("expected a quoted attribute value")),
            None => return Err(XmlError::UnexpectedEof { offset: self.pos }),
        };
        self.pos += 1;
        let start = self.pos;
        let len = self
            .rest()
            .find(quote)
            .ok_or(XmlError::UnexpectedEof {
                offset: self.input.len(),
            })?;
        let raw = self.rest().get(..len).unwrap_or("");
        let value = unescape(raw, start)?;
        self.pos += len + 1;
        Ok(value)
    }
}

/// Appends text to `element`, joining it with a directly preceding text node so that
/// mixed entity and CDATA content stays a single string.
fn push_text(element: &mut XmlElement, text: String) {
    match element.children.last_mut() {
        Some(XmlNode::Text(previous)) => previous.push_str(&text),
        _ => element.children.push(XmlNode::Text(text)),
    }
}

fn unescape(raw: &str, offset: usize) -> Result<String, XmlError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(rest.get(..amp).unwrap_or(""));
        let after = rest.get(amp + 1..).unwrap_or("");
        let semi = after.find(';').ok_or_else(|| XmlError::Malformed {
            offset: offset + raw.len() - rest.len() + amp,
            reason: "unterminated entity reference".to_string(),
        })?;
        let entity = after.get(..semi).unwrap_or("");
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                .and_then(Result::ok)
                .and_then(char::from_u32),
        };
        let c = decoded.ok_or_else(|| XmlError::Malformed {
            offset: offset + raw.len() - rest.len() + amp,
            reason: format!("unknown entity '&{};'", entity),
        })?;
        out.push(c);
        rest = after.get(semi + 1..).unwrap_or("");
    }
    out.push_str(rest);
    Ok(out)
}
