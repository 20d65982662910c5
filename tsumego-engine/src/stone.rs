use std::fmt;

/// The colour of a stone, and of the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Stone::Black),
            'w' => Some(Stone::White),
            _ => None,
        }
    }

    /// The character used for this colour in the board text format.
    pub fn to_char(self) -> char {
        match self {
            Stone::Black => 'b',
            Stone::White => 'w',
        }
    }

    pub fn opp(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "Black"),
            Stone::White => write!(f, "White"),
        }
    }
}

/// What occupies a single point of the board.
///
/// `KoBan` is an empty point where the player to move may not recapture.
/// It counts as a liberty and lasts for exactly one ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    KoBan,
    Black,
    White,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::KoBan),
            'b' => Some(Cell::Black),
            'w' => Some(Cell::White),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::KoBan => '#',
            Cell::Black => 'b',
            Cell::White => 'w',
        }
    }

    /// True for points that give a liberty to adjacent chains.
    pub fn is_vacant(self) -> bool {
        matches!(self, Cell::Empty | Cell::KoBan)
    }
}

impl From<Stone> for Cell {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => Cell::Black,
            Stone::White => Cell::White,
        }
    }
}
