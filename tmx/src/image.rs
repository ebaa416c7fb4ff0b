use crate::color::Color;
use crate::error::{Error, Result};
use crate::xml::Element;

/// Reference to an external image file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    /// Path as written in the document, relative to it.
    pub source: String,
    pub transparent_color: Color,
    pub width: i32,
    pub height: i32,
}

impl Image {
    pub(crate) fn from_element(element: &Element) -> Result<Image> {
        let Some(source) = element.attribute("source") else {
            return Err(Error::Unsupported("embedded image data".into()));
        };
        Ok(Image {
            source: source.to_owned(),
            transparent_color: element.color_attr("trans")?,
            width: element.int_attr("width", 0)?,
            height: element.int_attr("height", 0)?,
        })
    }
}
