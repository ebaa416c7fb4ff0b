//! A minimal owned element tree over `quick-xml` events.
//!
//! Readers only ever look up attributes by name, walk named children in
//! document order, and read text content, so the tree keeps just that.

use std::str::{self, FromStr};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::color::Color;
use crate::error::{Error, Result};

/// An XML element with its attributes, child elements and text content.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse_document(text: &str) -> Result<Element> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => {
                    let element = element_from_start(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    let Some(element) = stack.pop() else {
                        return Err(Error::missing("matching start tag"));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Text(t) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&t.decode()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&c.decode()?);
                    }
                }
                Event::GeneralRef(r) => {
                    if let Some(current) = stack.last_mut() {
                        let name = r.decode()?;
                        match resolve_entity(&name) {
                            Some(Entity::Char(ch)) => current.text.push(ch),
                            Some(Entity::Text(text)) => current.text.push_str(text),
                            None => return Err(Error::format("entity reference", name.to_string())),
                        }
                    }
                }
                Event::Eof => {
                    return Err(match stack.last() {
                        Some(open) => Error::missing(format!("closing tag for <{}>", open.name)),
                        None => Error::missing("root element"),
                    })
                }
                _ => {}
            }
        }
    }

    /// Raw attribute lookup.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn string_attr(&self, name: &str, default: &str) -> String {
        self.attribute(name).unwrap_or(default).to_owned()
    }

    /// Parse a numeric attribute, falling back to `default` when it is absent.
    ///
    /// A present but malformed value is an error rather than the default.
    pub fn number_attr<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        match self.attribute(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| Error::format(format!("{} attribute '{}'", self.name, name), value)),
            None => Ok(default),
        }
    }

    pub fn int_attr(&self, name: &str, default: i32) -> Result<i32> {
        self.number_attr(name, default)
    }

    pub fn double_attr(&self, name: &str, default: f64) -> Result<f64> {
        self.number_attr(name, default)
    }

    /// Booleans are written as `1`/`0`, though `true`/`false` also occur.
    pub fn bool_attr(&self, name: &str, default: bool) -> Result<bool> {
        match self.attribute(name).map(str::trim) {
            Some("1") | Some("true") => Ok(true),
            Some("0") | Some("false") => Ok(false),
            Some(value) => Err(Error::format(
                format!("{} attribute '{}'", self.name, name),
                value,
            )),
            None => Ok(default),
        }
    }

    /// Colors default to the zero value when the attribute is absent.
    pub fn color_attr(&self, name: &str) -> Result<Color> {
        match self.attribute(name) {
            Some(value) => Color::parse(value),
            None => Ok(Color::default()),
        }
    }

    /// Parse an enumerated attribute, `None` when it is absent.
    pub fn enum_attr<T: FromStr<Err = Error>>(&self, name: &str) -> Result<Option<T>> {
        self.attribute(name).map(str::parse).transpose()
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// All child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Concatenated text content directly inside this element.
    pub fn text(&self) -> &str {
        &self.text
    }
}

enum Entity {
    Char(char),
    Text(&'static str),
}

/// Resolve `&name;` where `name` is a predefined entity or `#N`/`#xN` character reference.
fn resolve_entity(name: &str) -> Option<Entity> {
    if let Some(reference) = name.strip_prefix('#') {
        let code = match reference.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => reference.parse().ok()?,
        };
        return char::from_u32(code).map(Entity::Char);
    }
    resolve_predefined_entity(name).map(Entity::Text)
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let name = str::from_utf8(e.name().as_ref())
        .map_err(|_| Error::format("element name", String::from_utf8_lossy(e.name().as_ref())))?
        .to_owned();

    let mut attributes = Vec::new();
    for attribute in e.attributes() {
        let attribute = attribute?;
        let key = str::from_utf8(attribute.key.as_ref())
            .map_err(|_| {
                Error::format("attribute name", String::from_utf8_lossy(attribute.key.as_ref()))
            })?
            .to_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}
