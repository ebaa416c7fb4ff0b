#![cfg_attr(not(feature = "base64"), allow(dead_code))]

#[cfg(any(feature = "zlib", feature = "gzip", feature = "zstd"))]
use std::io::Read;

use crate::error::{Error, Result};

pub use super::Compression;

/// Undo `compression` on the base64-decoded payload of `layer`.
///
/// At most `limit` bytes of output are produced; the caller needs no more
/// than that and a stream that would inflate further is cut off there.
pub fn decompress(
    layer: &str,
    compression: Compression,
    bytes: Vec<u8>,
    limit: usize,
) -> Result<Vec<u8>> {
    if !compression.is_supported() {
        return Err(unavailable(layer, compression));
    }
    match compression {
        Compression::None => Ok(bytes),
        Compression::Zlib => inflate_zlib(layer, &bytes, limit),
        Compression::Gzip => inflate_gzip(layer, &bytes, limit),
        Compression::Zstd => decompress_zstd(layer, &bytes, limit),
    }
}

/// Error for a compression recognized by name but left out of this build.
fn unavailable(layer: &str, compression: Compression) -> Error {
    Error::not_compiled_in(layer, "compression", compression.as_str())
}

#[cfg(any(feature = "zlib", feature = "gzip", feature = "zstd"))]
fn read_limited(layer: &str, codec: &str, reader: impl Read, limit: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reader
        .take(limit as u64)
        .read_to_end(&mut out)
        .map_err(|e| Error::corrupt(layer, format!("{codec} error: {e}")))?;
    Ok(out)
}

#[cfg(feature = "zlib")]
fn inflate_zlib(layer: &str, bytes: &[u8], limit: usize) -> Result<Vec<u8>> {
    read_limited(layer, "zlib", ::flate2::read::ZlibDecoder::new(bytes), limit)
}

#[cfg(not(feature = "zlib"))]
fn inflate_zlib(layer: &str, _bytes: &[u8], _limit: usize) -> Result<Vec<u8>> {
    Err(unavailable(layer, Compression::Zlib))
}

#[cfg(feature = "gzip")]
fn inflate_gzip(layer: &str, bytes: &[u8], limit: usize) -> Result<Vec<u8>> {
    read_limited(layer, "gzip", ::flate2::read::GzDecoder::new(bytes), limit)
}

#[cfg(not(feature = "gzip"))]
fn inflate_gzip(layer: &str, _bytes: &[u8], _limit: usize) -> Result<Vec<u8>> {
    Err(unavailable(layer, Compression::Gzip))
}

#[cfg(feature = "zstd")]
fn decompress_zstd(layer: &str, bytes: &[u8], limit: usize) -> Result<Vec<u8>> {
    let decoder = ::zstd::stream::read::Decoder::new(bytes)
        .map_err(|e| Error::corrupt(layer, format!("zstd error: {e}")))?;
    read_limited(layer, "zstd", decoder, limit)
}

#[cfg(not(feature = "zstd"))]
fn decompress_zstd(layer: &str, _bytes: &[u8], _limit: usize) -> Result<Vec<u8>> {
    Err(unavailable(layer, Compression::Zstd))
}
