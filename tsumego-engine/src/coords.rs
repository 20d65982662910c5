//! Conversions between `(row, col)` points and coordinate labels like `"C5"`.
//!
//! The letter selects the column and the number the row, with `"A1"` at the
//! top-left of the board. By convention there is no `I` column.

use crate::Point;
use crate::error::GoError;

/// Column letters, skipping `I`.
const ALPHABET: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Labels exist for rows and columns in `0..MAX_COORD`.
pub const MAX_COORD: u8 = 25;

/// Convert a point to its label, e.g. `(4, 2)` → `"C5"`.
pub fn to_label((row, col): Point) -> Result<String, GoError> {
    if row >= MAX_COORD || col >= MAX_COORD {
        return Err(GoError::OutOfRange { row, col });
    }
    Ok(format!("{}{}", ALPHABET[col as usize] as char, row + 1))
}

/// Parse a label like `"K10"` back to a point.
pub fn from_label(label: &str) -> Result<Point, GoError> {
    let invalid = || GoError::InvalidLabel(label.to_string());

    let mut chars = label.chars();
    let letter = chars.next().ok_or_else(invalid)?;
    let col = ALPHABET
        .iter()
        .position(|&c| c as char == letter)
        .ok_or_else(invalid)? as u8;

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let number: u32 = digits.parse().map_err(|_| invalid())?;
    if number == 0 || number > MAX_COORD as u32 {
        return Err(invalid());
    }

    Ok(((number - 1) as u8, col))
}

/// Parse a two-letter SGF coordinate (column letter then row letter, `a` = 0).
/// Letters are case-insensitive.
pub fn from_sgf(coords: &str) -> Result<Point, GoError> {
    let invalid = || GoError::InvalidLabel(coords.to_string());

    let bytes = coords.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    let col = bytes[0].to_ascii_lowercase() - b'a';
    let row = bytes[1].to_ascii_lowercase() - b'a';
    Ok((row, col))
}
