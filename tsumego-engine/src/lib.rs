pub mod coords;
pub mod error;
pub mod goban;
pub mod problem;
pub mod stone;
pub mod tree;
pub mod tsumego;

/// A board point as `(row, col)`, with `(0, 0)` at the top-left.
pub type Point = (u8, u8);

pub use error::{GoError, IllegalMove};
pub use goban::Goban;
pub use problem::Problem;
pub use stone::{Cell, Stone};
pub use tree::VariationTree;
pub use tsumego::{Tsumego, TsumegoData};
