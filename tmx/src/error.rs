use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading a map or tileset.
///
/// Errors are terminal: a failed parse never yields a partial map.
#[derive(Debug, Error)]
pub enum Error {
    #[error("xml parse failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("xml encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing {0}")]
    Missing(String),

    #[error("invalid {what} '{value}'")]
    Format { what: String, value: String },

    #[error("unknown color format '{0}'")]
    InvalidColor(String),

    #[error("wrong data format for layer '{layer}': {reason}")]
    DataShape { layer: String, reason: String },

    #[error("corrupt data in layer '{layer}': {reason}")]
    CorruptData { layer: String, reason: String },

    #[error("layer '{layer}' uses unsupported encoding '{encoding}'")]
    UnsupportedEncoding { layer: String, encoding: String },

    #[error("layer '{layer}' stores its data as XML elements, which is unsupported")]
    LegacyLayerData { layer: String },

    /// `compression` names the codec; for [`Unsupported::NotCompiledIn`] it
    /// may also be the `base64` encoding.
    #[error("layer '{layer}' {}", unsupported_message(.compression, .reason))]
    UnsupportedCompression {
        layer: String,
        compression: String,
        reason: Unsupported,
    },

    #[error("index {axis} = {value} is out of range ({bound} = {limit})")]
    OutOfRange {
        axis: char,
        value: i64,
        bound: &'static str,
        limit: u32,
    },

    #[error("attempt to extract {expected} while storing {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Why a layer's codec could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// The name is not a codec this reader knows.
    Unknown,
    /// A known codec left out of this build by Cargo features. `kind` is
    /// `"encoding"` or `"compression"`.
    NotCompiledIn { kind: &'static str },
}

fn unsupported_message(compression: &str, reason: &Unsupported) -> String {
    match reason {
        Unsupported::Unknown => format!("uses unsupported compression '{compression}'"),
        Unsupported::NotCompiledIn { kind } => {
            format!("uses {compression} {kind} but support for it was not compiled in")
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Error::Missing(what.into())
    }

    pub(crate) fn format(what: impl Into<String>, value: impl Into<String>) -> Self {
        Error::Format {
            what: what.into(),
            value: value.into(),
        }
    }

    pub(crate) fn data_shape(layer: &str, reason: impl Into<String>) -> Self {
        Error::DataShape {
            layer: layer.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupt(layer: &str, reason: impl ToString) -> Self {
        Error::CorruptData {
            layer: layer.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_compiled_in(layer: &str, kind: &'static str, codec: &'static str) -> Self {
        Error::UnsupportedCompression {
            layer: layer.to_owned(),
            compression: codec.to_owned(),
            reason: Unsupported::NotCompiledIn { kind },
        }
    }
}
