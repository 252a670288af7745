//! Parsed-document abstraction for service responses.
//!
//! The label server's response shapes are inconsistent across operations
//! and not always well-rooted (status bodies can arrive as bare sibling
//! elements). Every response is normalized into one [`Element`] tree before
//! the operation-specific extraction rules run, so test fixtures and live
//! XML go through the same code path.

use std::io;

use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error decoding names, attributes, or text content.
    #[error("failed to parse XML content: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One XML element: name, attributes, accumulated text, child elements.
///
/// Mixed content is supported — the refund response nests `IsApproved` and
/// `ErrorMsg` elements inside a `PICNumber` element that also carries the
/// tracking number as text.
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Parse raw XML into a synthetic root holding all top-level elements.
    ///
    /// The input does not need a single document root; leading text, XML
    /// declarations, and comments are skipped or accumulated as root text.
    pub fn parse(xml: &str) -> Result<Element, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack = vec![Element::default()];
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    stack.push(element_open(&e)?);
                }
                Event::Empty(e) => {
                    let element = element_open(&e)?;
                    attach(&mut stack, element);
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        let element = stack.pop().unwrap_or_default();
                        attach(&mut stack, element);
                    }
                }
                Event::Text(e) => {
                    let decoded = e.decode().map_err(|err| XmlError::Parse(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| XmlError::Parse(err.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(e) => {
                    let decoded = e.decode().map_err(|err| XmlError::Parse(err.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&decoded);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // Fold any unclosed elements into their parents rather than failing;
        // the remote service is the final arbiter of what it sent us.
        while stack.len() > 1 {
            let element = stack.pop().unwrap_or_default();
            attach(&mut stack, element);
        }
        Ok(stack.pop().unwrap_or_default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accumulated text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// First element with the given name anywhere below this one,
    /// depth-first in document order.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Non-empty trimmed text of the first descendant with the given name.
    pub fn descendant_text(&self, name: &str) -> Option<String> {
        let text = self.descendant(name)?.text();
        if text.is_empty() {
            None
        } else {
            Some(text.to_owned())
        }
    }

    /// Follow a chain of direct children by name.
    pub fn path(&self, names: &[&str]) -> Option<&Element> {
        let mut current = self;
        for name in names {
            current = current.child(name)?;
        }
        Some(current)
    }
}

fn element_open(start: &quick_xml::events::BytesStart<'_>) -> Result<Element, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| XmlError::Parse(err.to_string()))?
        .to_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| XmlError::Parse(err.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|err| XmlError::Parse(err.to_string()))?
            .to_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| XmlError::Parse(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(stack: &mut Vec<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    }
}
