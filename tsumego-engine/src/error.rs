use std::fmt;

use crate::Point;

/// Why a move was rejected by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    Occupied,
    KoRecapture,
    SelfCapture,
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMove::Occupied => write!(f, "occupied"),
            IllegalMove::KoRecapture => write!(f, "ko recapture"),
            IllegalMove::SelfCapture => write!(f, "self-capture"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    InvalidSize(usize),
    InvalidFormat(String),
    OutOfBounds { point: Point, size: u8 },
    IllegalMove { point: Point, reason: IllegalMove },
    InvalidTsumego(String),
    InvalidState,
    OutOfRange { row: u8, col: u8 },
    InvalidLabel(String),
}

impl GoError {
    /// The rejection reason, if this is an illegal move.
    pub fn illegal_move(&self) -> Option<IllegalMove> {
        match self {
            GoError::IllegalMove { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::InvalidSize(size) => {
                write!(f, "board size must be between 2 and 25, was {size}")
            }
            GoError::InvalidFormat(msg) => write!(f, "invalid board: {msg}"),
            GoError::OutOfBounds {
                point: (row, col),
                size,
            } => write!(
                f,
                "row = {row}, col = {col} is out of bounds for board size {size}"
            ),
            GoError::IllegalMove {
                point: (row, col),
                reason,
            } => write!(f, "illegal move at row = {row}, col = {col}: {reason}"),
            GoError::InvalidTsumego(msg) => write!(f, "invalid tsumego: {msg}"),
            GoError::InvalidState => write!(f, "tsumego is already complete"),
            GoError::OutOfRange { row, col } => write!(
                f,
                "row and column must be between 0 and 24, was row = {row}, col = {col}"
            ),
            GoError::InvalidLabel(label) => write!(f, "invalid coordinates: '{label}'"),
        }
    }
}

impl std::error::Error for GoError {}
