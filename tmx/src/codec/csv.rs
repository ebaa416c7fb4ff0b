use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::grid::CellGrid;

/// Reject text too short to hold `total` cells.
///
/// Each cell takes at least one digit and every pair is separated by a
/// comma, so fewer than `2 * total - 1` bytes can never decode.
pub fn check_length(layer: &str, text: &str, total: usize) -> Result<()> {
    let shortest = total.saturating_mul(2).saturating_sub(1);
    if text.len() < shortest {
        return Err(Error::data_shape(
            layer,
            format!(
                "expected {total} cells, but {} bytes of text hold at most {}",
                text.len(),
                (text.len() + 1) / 2
            ),
        ));
    }
    Ok(())
}

/// Fill `grid` from comma-separated decimal cell values in row-major order.
///
/// Exactly one comma separates each pair of adjacent cells, with any amount
/// of whitespace around it. Nothing but whitespace may follow the last cell.
pub fn decode_into(layer: &str, text: &str, grid: &mut CellGrid) -> Result<()> {
    let total = grid.width() as usize * grid.height() as usize;
    let mut tokens = Tokens::new(text);
    let mut index = 0usize;

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let value = tokens.number().map_err(|e| e.into_error(layer, index, total))?;
            grid.set(x, y, Cell(value));
            index += 1;
            if index < total {
                tokens
                    .delimiter()
                    .map_err(|e| e.into_error(layer, index, total))?;
            }
        }
    }

    tokens.skip_whitespace();
    if !tokens.at_end() {
        return Err(Error::data_shape(
            layer,
            format!("unexpected data after the last of {total} cells"),
        ));
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum TokenError {
    End,
    Malformed(char),
    Overflow,
    MissingDelimiter(char),
}

impl TokenError {
    /// `index` counts the cells read successfully so far.
    fn into_error(self, layer: &str, index: usize, total: usize) -> Error {
        let reason = match self {
            TokenError::End => format!("expected {total} cells, found {index}"),
            TokenError::Malformed(c) => format!("unexpected '{c}' in cell {index}"),
            TokenError::Overflow => format!("cell {index} does not fit in 32 bits"),
            TokenError::MissingDelimiter(c) => {
                format!("expected ',' after cell {}, found '{c}'", index - 1)
            }
        };
        Error::data_shape(layer, reason)
    }
}

struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn number(&mut self) -> Result<u32, TokenError> {
        self.skip_whitespace();
        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(TokenError::Overflow)?;
            digits += 1;
            self.pos += 1;
        }
        match (digits, self.peek()) {
            (0, None) => Err(TokenError::End),
            (0, Some(c)) => Err(TokenError::Malformed(c)),
            _ => Ok(value),
        }
    }

    fn delimiter(&mut self) -> Result<(), TokenError> {
        self.skip_whitespace();
        match self.peek() {
            Some(',') => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(TokenError::MissingDelimiter(c)),
            None => Err(TokenError::End),
        }
    }
}
