use std::str::FromStr;

use crate::error::{Error, Result};

/// An RGBA color. The default is fully transparent black, which is also what
/// an absent color attribute reads as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#AARRGGBB` or `#RRGGBB`; the `#` is optional.
    ///
    /// The six digit form is fully opaque.
    pub fn parse(text: &str) -> Result<Color> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(text.to_owned()));
        }

        let bytes = digits.as_bytes();
        let channel = |i: usize| (hex_value(bytes[i]) << 4) | hex_value(bytes[i + 1]);
        let color = match digits.len() {
            6 => Color::rgba(channel(0), channel(2), channel(4), 0xff),
            8 => Color::rgba(channel(2), channel(4), channel(6), channel(0)),
            _ => return Err(Error::InvalidColor(text.to_owned())),
        };
        Ok(color)
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}
