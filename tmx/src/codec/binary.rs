use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::grid::CellGrid;

use super::compression::Compression;

/// Base64-decode `text` and undo `compression`, yielding the raw cell bytes.
///
/// Leading and trailing whitespace around the payload is ignored.
/// Decompressed output stops after `limit` bytes.
#[cfg(feature = "base64")]
pub fn unpack(layer: &str, text: &str, compression: Compression, limit: usize) -> Result<Vec<u8>> {
    use ::base64::engine::general_purpose::STANDARD;
    use ::base64::Engine;

    let trimmed = text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
    let bytes = STANDARD
        .decode(trimmed)
        .map_err(|e| Error::corrupt(layer, format!("invalid base64: {e}")))?;
    super::compression::decompress(layer, compression, bytes, limit)
}

#[cfg(not(feature = "base64"))]
pub fn unpack(
    layer: &str,
    _text: &str,
    _compression: Compression,
    _limit: usize,
) -> Result<Vec<u8>> {
    Err(Error::not_compiled_in(layer, "encoding", "base64"))
}

/// Reject a buffer shorter than `needed` bytes.
pub fn check_length(layer: &str, bytes: &[u8], needed: usize) -> Result<()> {
    if bytes.len() < needed {
        return Err(Error::data_shape(
            layer,
            format!("expected at least {needed} bytes, found {}", bytes.len()),
        ));
    }
    Ok(())
}

/// Fill `grid` from little-endian `u32` cells in row-major order.
///
/// `bytes` must hold at least `width * height * 4` bytes; anything past that
/// is ignored.
pub fn decode_into(layer: &str, bytes: &[u8], grid: &mut CellGrid) -> Result<()> {
    let needed = grid.width() as usize * grid.height() as usize * 4;
    check_length(layer, bytes, needed)?;

    let mut chunks = bytes[..needed].chunks_exact(4);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if let Some(b) = chunks.next() {
                grid.set(x, y, Cell(u32::from_le_bytes([b[0], b[1], b[2], b[3]])));
            }
        }
    }
    Ok(())
}
