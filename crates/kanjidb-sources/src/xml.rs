//! Minimal element trees cut out of a streamed XML document.
//!
//! Both databases are long flat lists of small records, so the reader
//! streams the document and only materialises one record subtree at a time.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use kanjidb_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written, e.g. `g` or `kvg:element`.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::Xml(format!("bad attribute on <{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("bad value for {key} on <{name}>: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes, children: Vec::new() })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Direct child elements, skipping text.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Every element below this one in document order (pre-order).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: self.child_elements().rev().collect() }
    }

    /// First descendant element called `name`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.name == name)
    }

    /// Concatenated text of this element and everything below it.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.child_elements().rev());
        Some(next)
    }
}

/// Calls `f` with the full subtree of every `tag` element in `document`.
///
/// Stops at the first XML error or the first error returned by `f`.
pub fn for_each_element<F>(document: &str, tag: &str, mut f: F) -> Result<()>
where
    F: FnMut(Element) -> Result<()>,
{
    let mut reader = Reader::from_str(document);
    let mut open: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;
        match event {
            Event::Start(e) => {
                if !open.is_empty() || e.name().as_ref() == tag.as_bytes() {
                    open.push(Element::from_start(&e)?);
                }
            }
            Event::Empty(e) => {
                if !open.is_empty() || e.name().as_ref() == tag.as_bytes() {
                    let element = Element::from_start(&e)?;
                    close(&mut open, element, &mut f)?;
                }
            }
            Event::End(_) => {
                if let Some(element) = open.pop() {
                    close(&mut open, element, &mut f)?;
                }
            }
            Event::Text(e) => {
                if let Some(top) = open.last_mut() {
                    let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                    top.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(e) => {
                if let Some(top) = open.last_mut() {
                    top.children.push(Node::Text(String::from_utf8_lossy(&e).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match open.first() {
        Some(unclosed) => Err(Error::Xml(format!("document ended inside <{}>", unclosed.name))),
        None => Ok(()),
    }
}

fn close<F>(open: &mut [Element], element: Element, f: &mut F) -> Result<()>
where
    F: FnMut(Element) -> Result<()>,
{
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None => f(element),
    }
}
