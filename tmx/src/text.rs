use crate::color::Color;
use crate::error::Result;
use crate::xml::Element;

attribute_enum! {
    pub enum HAlign("text halign") {
        #[default]
        Left => "left",
        Center => "center",
        Right => "right",
        Justify => "justify",
    }
}

attribute_enum! {
    pub enum VAlign("text valign") {
        #[default]
        Top => "top",
        Center => "center",
        Bottom => "bottom",
    }
}

/// A text object's content and styling.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub font_family: String,
    pub pixel_size: i32,
    pub wrap: bool,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub kerning: bool,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Default for Text {
    fn default() -> Self {
        Text {
            text: String::new(),
            font_family: "sans-serif".to_owned(),
            pixel_size: 16,
            wrap: false,
            color: Color::default(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            kerning: true,
            halign: HAlign::default(),
            valign: VAlign::default(),
        }
    }
}

impl Text {
    pub(crate) fn from_element(element: &Element) -> Result<Text> {
        let defaults = Text::default();
        Ok(Text {
            text: element.text().to_owned(),
            font_family: element.string_attr("fontfamily", &defaults.font_family),
            pixel_size: element.int_attr("pixelsize", defaults.pixel_size)?,
            wrap: element.bool_attr("wrap", defaults.wrap)?,
            color: element.color_attr("color")?,
            bold: element.bool_attr("bold", defaults.bold)?,
            italic: element.bool_attr("italic", defaults.italic)?,
            underline: element.bool_attr("underline", defaults.underline)?,
            strikeout: element.bool_attr("strikeout", defaults.strikeout)?,
            kerning: element.bool_attr("kerning", defaults.kerning)?,
            halign: element.enum_attr("halign")?.unwrap_or_default(),
            valign: element.enum_attr("valign")?.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults() {
        let text = Text::from_element(&Element::parse_document("<text>Hello</text>").unwrap()).unwrap();
        assert_eq!(text.text, "Hello");
        assert_eq!(text.font_family, "sans-serif");
        assert_eq!(text.pixel_size, 16);
        assert!(text.kerning);
        assert!(!text.wrap && !text.bold);
        assert_eq!(text.halign, HAlign::Left);
        assert_eq!(text.valign, VAlign::Top);
    }

    #[test]
    fn styled() {
        let element = Element::parse_document(
            r##"<text fontfamily="Mono" pixelsize="9" wrap="1" color="#00ff00" bold="1" kerning="0" halign="justify" valign="bottom">a &amp; b</text>"##,
        )
        .unwrap();
        let text = Text::from_element(&element).unwrap();
        assert_eq!(text.text, "a & b");
        assert_eq!(text.font_family, "Mono");
        assert_eq!(text.pixel_size, 9);
        assert!(text.wrap && text.bold && !text.kerning);
        assert_eq!(text.color, Color::rgba(0, 0xff, 0, 0xff));
        assert_eq!(text.halign, HAlign::Justify);
        assert_eq!(text.valign, VAlign::Bottom);
    }

    #[test]
    fn unknown_alignment() {
        let element = Element::parse_document(r#"<text halign="middle">x</text>"#).unwrap();
        match Text::from_element(&element) {
            Err(Error::Format { what, value }) => {
                assert_eq!(what, "text halign");
                assert_eq!(value, "middle");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
