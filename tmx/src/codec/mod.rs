//! Tile layer data codec.
//!
//! Turns the text of a `<data>` element into a [`CellGrid`]. CSV text is
//! tokenized directly; base64 text is unpacked, optionally decompressed, and
//! read as little-endian `u32` cells. Which base64 and compression codecs are
//! available is decided by Cargo features.

pub mod binary;
pub mod compression;
pub mod csv;

use log::{trace, warn};

use crate::error::{Error, Result, Unsupported};
use crate::grid::CellGrid;

/// How the cells of a `<data>` element are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Csv,
    Base64,
}

impl Encoding {
    /// Parse the `encoding` attribute of the data element of `layer`.
    pub fn parse(layer: &str, value: &str) -> Result<Encoding> {
        match value {
            "csv" => Ok(Encoding::Csv),
            "base64" => Ok(Encoding::Base64),
            other => Err(Error::UnsupportedEncoding {
                layer: layer.to_owned(),
                encoding: other.to_owned(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Csv => "csv",
            Encoding::Base64 => "base64",
        }
    }

    /// Whether this build can decode the encoding.
    pub fn is_supported(self) -> bool {
        match self {
            Encoding::Csv => true,
            Encoding::Base64 => cfg!(feature = "base64"),
        }
    }
}

/// Compression applied to base64 data before encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    None,
    Zlib,
    Gzip,
    Zstd,
}

impl Compression {
    /// Parse the `compression` attribute; empty means uncompressed.
    pub fn parse(layer: &str, value: &str) -> Result<Compression> {
        match value {
            "" => Ok(Compression::None),
            "zlib" => Ok(Compression::Zlib),
            "gzip" => Ok(Compression::Gzip),
            "zstd" => Ok(Compression::Zstd),
            other => Err(Error::UnsupportedCompression {
                layer: layer.to_owned(),
                compression: other.to_owned(),
                reason: Unsupported::Unknown,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Zlib => "zlib",
            Compression::Gzip => "gzip",
            Compression::Zstd => "zstd",
        }
    }

    /// Whether this build can decompress the codec.
    pub fn is_supported(self) -> bool {
        match self {
            Compression::None => true,
            Compression::Zlib => cfg!(feature = "zlib"),
            Compression::Gzip => cfg!(feature = "gzip"),
            Compression::Zstd => cfg!(feature = "zstd"),
        }
    }
}

/// Decode the data payload of `layer` into a `width` x `height` grid.
///
/// `width` and `height` must both be positive; the layer reader checks them.
/// Every cell must be present in the payload: short CSV text or a short
/// binary buffer is an error. The payload is measured against the declared
/// size before the grid is allocated.
pub fn decode(
    layer: &str,
    width: u32,
    height: u32,
    encoding: &str,
    compression: &str,
    raw: &str,
) -> Result<CellGrid> {
    let encoding = Encoding::parse(layer, encoding)?;
    let compression = Compression::parse(layer, compression)?;
    let cells = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::data_shape(layer, format!("layer size {width}x{height} is too large")))?;

    let grid = match encoding {
        Encoding::Csv => {
            if compression != Compression::None {
                warn!(
                    "layer '{}': ignoring {} compression on csv data",
                    layer,
                    compression.as_str()
                );
            }
            csv::check_length(layer, raw, cells)?;
            let mut grid = CellGrid::new(width, height);
            csv::decode_into(layer, raw, &mut grid)?;
            grid
        }
        Encoding::Base64 => {
            let needed = cells.checked_mul(4).ok_or_else(|| {
                Error::data_shape(layer, format!("layer size {width}x{height} is too large"))
            })?;
            let bytes = binary::unpack(layer, raw, compression, needed)?;
            binary::check_length(layer, &bytes, needed)?;
            let mut grid = CellGrid::new(width, height);
            binary::decode_into(layer, &bytes, &mut grid)?;
            grid
        }
    };

    trace!(
        "decoded layer '{}': {}x{} {} {}",
        layer,
        width,
        height,
        encoding.as_str(),
        compression.as_str()
    );
    Ok(grid)
}
