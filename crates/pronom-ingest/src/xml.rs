//! Minimal XML element tree
//!
//! Registry documents are small, so each one is read fully into an
//! [`Element`] tree with `quick-xml` and queried with slash-separated paths.
//! Names are stored by local name only: the registry's default namespace and
//! any prefix are dropped. Comments, processing instructions, and the
//! declaration are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One element with its attributes, children and concatenated text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content directly inside this element (not its descendants)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given local name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All elements matching a relative path such as `a/b/c`, in document order
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let mut current = vec![self];
        for step in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|element| element.children_named(step))
                .collect();
        }
        current
    }

    /// First element matching a relative path, in document order
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("bad attribute on <{}>: {}", name, e))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("bad attribute value on <{}>: {}", name, e))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(format!("second root element <{}>", element.name)),
    }
    Ok(())
}

/// Parse a complete document and return its root element
///
/// Fails on malformed markup, mismatched end tags, non-whitespace text
/// outside the root, more than one root, or a document with no root.
pub fn parse_document(xml: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at position {}: {}", reader.error_position(), e))?;

        match event {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(element, &mut stack, &mut root)?;
            },
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                attach(element, &mut stack, &mut root)?;
            },
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| format!("at position {}: {}", reader.buffer_position(), e))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {},
                    None => return Err("text outside the root element".to_string()),
                }
            },
            Event::CData(data) => {
                let data = data.into_inner();
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&String::from_utf8_lossy(&data)),
                    None => return Err("character data outside the root element".to_string()),
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unexpected end of document inside <{}>", open.name));
    }

    root.ok_or_else(|| "document has no root element".to_string())
}
