//! Conversion of problems from the community JSON format into puzzles.
//!
//! Each input file describes one problem with SGF-style fields: `SZ` (board
//! size), `AB` / `AW` (setup stones as two-letter SGF coordinates) and `SOL`
//! (the solution line, one `[colour, coords, ...]` step per move).

use serde::Deserialize;
use serde_json::Value;

use crate::Point;
use crate::coords;
use crate::error::GoError;
use crate::goban::{Goban, MAX_SIZE, MIN_SIZE};
use crate::stone::{Cell, Stone};
use crate::tree::VariationTree;
use crate::tsumego::{Tsumego, TsumegoData};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoardSize {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawProblem {
    #[serde(rename = "SZ")]
    size: BoardSize,
    #[serde(rename = "AB", default)]
    black: Vec<String>,
    #[serde(rename = "AW", default)]
    white: Vec<String>,
    #[serde(rename = "SOL", default)]
    solution: Vec<Vec<String>>,
}

/// A named problem: its starting position and solution tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub name: String,
    pub goban: Goban,
    pub tree: VariationTree,
}

impl Problem {
    pub fn from_input(name: &str, value: &Value) -> Result<Self, GoError> {
        let raw = RawProblem::deserialize(value)
            .map_err(|e| GoError::InvalidTsumego(format!("malformed problem: {e}")))?;

        let size = match &raw.size {
            BoardSize::Number(n) => usize::try_from(*n).unwrap_or(usize::MAX),
            BoardSize::Text(s) => s.trim().parse().map_err(|_| {
                GoError::InvalidTsumego(format!("board size must be a number, was '{s}'"))
            })?,
        };
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GoError::InvalidSize(size));
        }

        let first = raw
            .solution
            .first()
            .ok_or_else(|| GoError::InvalidTsumego("problem has no solution".to_string()))?;
        let next = match first.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("b") => Stone::Black,
            Some("w") => Stone::White,
            other => {
                return Err(GoError::InvalidTsumego(format!(
                    "next player must be 'b' or 'w', was {other:?}"
                )));
            }
        };

        let mut cells = vec![Cell::Empty; size * size];
        for (stones, stone) in [(&raw.black, Stone::Black), (&raw.white, Stone::White)] {
            for sgf in stones {
                let (row, col) = on_board(sgf, size)?;
                cells[row as usize * size + col as usize] = stone.into();
            }
        }
        let goban = Goban::from_cells(size, next, cells)?;

        let moves = raw
            .solution
            .iter()
            .map(|step| match step.get(1) {
                Some(sgf) => on_board(sgf, size),
                None => Err(GoError::InvalidTsumego(format!(
                    "solution step has no coordinates: {step:?}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Problem {
            name: name.to_string(),
            goban,
            tree: VariationTree::from_line(&moves),
        })
    }

    /// The same problem with colours swapped if White is to play, so that
    /// every problem starts with Black. The tree is unchanged.
    pub fn black_to_play(self) -> Self {
        if self.goban.next_player() == Stone::Black {
            return self;
        }
        Problem {
            goban: self.goban.swap_colours(),
            ..self
        }
    }

    pub fn to_data(&self) -> Result<TsumegoData, GoError> {
        Ok(TsumegoData {
            id: None,
            name: Some(self.name.clone()),
            board: self.goban.to_string(),
            tree: self.tree.to_value()?,
        })
    }

    /// Build the playable puzzle, checking every move of the solution.
    pub fn to_tsumego(&self) -> Result<Tsumego, GoError> {
        Tsumego::from_data(&self.to_data()?)
    }
}

fn on_board(sgf: &str, size: usize) -> Result<Point, GoError> {
    let point = coords::from_sgf(sgf)?;
    if point.0 as usize >= size || point.1 as usize >= size {
        return Err(GoError::OutOfBounds {
            point,
            size: size as u8,
        });
    }
    Ok(point)
}
