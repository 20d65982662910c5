use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Point;
use crate::coords;
use crate::error::GoError;
use crate::goban::Goban;

/// The authored continuations of a puzzle from some position.
///
/// Leaves say whether the line was solved. A `Moves` node maps each authored
/// move to the tree for the position after it, and always has at least one
/// entry. Keys are ordered row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariationTree {
    Win,
    Lose,
    Moves(BTreeMap<Point, VariationTree>),
}

impl VariationTree {
    /// A single line of play ending in a win.
    pub fn from_line(moves: &[Point]) -> Self {
        moves.iter().rev().fold(VariationTree::Win, |tree, &point| {
            VariationTree::Moves(BTreeMap::from([(point, tree)]))
        })
    }

    /// Decode a JSON tree, checking every move against the position it is
    /// played from. Keys are coordinate labels like `"C5"`.
    pub fn from_value(goban: &Goban, value: &Value) -> Result<Self, GoError> {
        let mut path = Vec::new();
        Self::decode(goban, value, &mut path)
    }

    fn decode(goban: &Goban, value: &Value, path: &mut Vec<String>) -> Result<Self, GoError> {
        let entries = match value {
            Value::String(s) if s == "win" => return Ok(VariationTree::Win),
            Value::String(s) if s == "lose" => return Ok(VariationTree::Lose),
            Value::Object(entries) => entries,
            other => {
                return Err(invalid(
                    path,
                    format!("tree must be 'win', 'lose' or an object, was {other}"),
                ));
            }
        };

        if entries.is_empty() {
            return Err(invalid(
                path,
                "tree object must have at least one entry".to_string(),
            ));
        }

        let mut children = BTreeMap::new();
        for (label, child) in entries {
            let point = coords::from_label(label)
                .map_err(|_| invalid(path.as_slice(), format!("invalid coordinates '{label}'")))?;
            if !goban.is_legal(point) {
                return Err(invalid(path, format!("tree contains illegal move '{label}'")));
            }
            if children.contains_key(&point) {
                return Err(invalid(path, format!("duplicate move '{label}'")));
            }

            let next = goban.play(point)?;
            path.push(label.clone());
            let subtree = Self::decode(&next, child, path)?;
            path.pop();
            children.insert(point, subtree);
        }

        Ok(VariationTree::Moves(children))
    }

    /// Encode as `"win"`, `"lose"` or an object keyed by coordinate labels.
    pub fn to_value(&self) -> Result<Value, GoError> {
        match self {
            VariationTree::Win => Ok(Value::from("win")),
            VariationTree::Lose => Ok(Value::from("lose")),
            VariationTree::Moves(children) => {
                let mut map = Map::new();
                for (&point, child) in children {
                    map.insert(coords::to_label(point)?, child.to_value()?);
                }
                Ok(Value::Object(map))
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, VariationTree::Moves(_))
    }

    /// The authored moves from this node, row-major. Empty for leaves.
    pub fn moves(&self) -> Vec<Point> {
        match self {
            VariationTree::Moves(children) => children.keys().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn child(&self, point: Point) -> Option<&VariationTree> {
        match self {
            VariationTree::Moves(children) => children.get(&point),
            _ => None,
        }
    }
}

/// Describe a rejected node by the moves leading to it.
fn invalid(path: &[String], msg: String) -> GoError {
    if path.is_empty() {
        GoError::InvalidTsumego(msg)
    } else {
        GoError::InvalidTsumego(format!("{msg} (after {})", path.join(" ")))
    }
}

impl Serialize for VariationTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}
