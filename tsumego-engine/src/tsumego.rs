use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Point;
use crate::error::GoError;
use crate::goban::Goban;
use crate::tree::VariationTree;

/// A stored puzzle: the board text and the raw variation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsumegoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub board: String,
    pub tree: Value,
}

/// A puzzle in progress: the current position and the part of the
/// variation tree that applies to it.
///
/// Playing returns a new `Tsumego`; earlier ones stay valid, which is all
/// an undo needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tsumego {
    goban: Goban,
    tree: VariationTree,
}

impl Tsumego {
    pub fn from_json(json: &str) -> Result<Self, GoError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| GoError::InvalidTsumego(format!("malformed JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Build a puzzle from a JSON record with `board` and `tree` fields.
    pub fn from_value(value: &Value) -> Result<Self, GoError> {
        let board = value.get("board").and_then(Value::as_str).ok_or_else(|| {
            GoError::InvalidTsumego("must have 'board' property of type 'string'".to_string())
        })?;
        let tree = value.get("tree").ok_or_else(|| {
            GoError::InvalidTsumego(
                "must have 'tree' property which is a valid variation tree".to_string(),
            )
        })?;
        Self::from_parts(board, tree)
    }

    pub fn from_data(data: &TsumegoData) -> Result<Self, GoError> {
        Self::from_parts(&data.board, &data.tree)
    }

    fn from_parts(board: &str, tree: &Value) -> Result<Self, GoError> {
        let goban: Goban = board.parse()?;
        let tree = VariationTree::from_value(&goban, tree).inspect_err(|e| {
            tracing::debug!("Rejected variation tree: {e}");
        })?;
        Ok(Tsumego { goban, tree })
    }

    /// The stored form of this puzzle, from its current position.
    pub fn to_data(&self) -> Result<TsumegoData, GoError> {
        Ok(TsumegoData {
            id: None,
            name: None,
            board: self.goban.to_string(),
            tree: self.tree.to_value()?,
        })
    }

    // -- Accessors --

    pub fn goban(&self) -> &Goban {
        &self.goban
    }

    pub fn tree(&self) -> &VariationTree {
        &self.tree
    }

    pub fn is_complete(&self) -> bool {
        self.tree.is_leaf()
    }

    pub fn is_won(&self) -> bool {
        self.tree == VariationTree::Win
    }

    /// The authored continuations from the current position.
    pub fn moves(&self) -> Vec<Point> {
        self.tree.moves()
    }

    // -- Puzzle actions --

    /// Play a move. A legal move that the tree does not cover loses the puzzle.
    pub fn play(&self, point: Point) -> Result<Tsumego, GoError> {
        let VariationTree::Moves(children) = &self.tree else {
            return Err(GoError::InvalidState);
        };

        let goban = self.goban.play(point)?;
        let tree = children.get(&point).cloned().unwrap_or(VariationTree::Lose);
        Ok(Tsumego { goban, tree })
    }

    /// Play one of the authored continuations, chosen uniformly.
    pub fn play_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Tsumego, GoError> {
        let moves = self.moves();
        if moves.is_empty() {
            return Err(GoError::InvalidState);
        }
        let point = moves[rng.random_range(0..moves.len())];
        self.play(point)
    }
}
