use rand::SeedableRng;
use rand::rngs::StdRng;
use tsumego_engine::{Tsumego, coords};
use wasm_bindgen::prelude::*;

/// Convert `(row, col)` to a label like `"C5"`.
#[wasm_bindgen]
pub fn to_label(row: u8, col: u8) -> Result<String, JsError> {
    Ok(coords::to_label((row, col))?)
}

/// Parse a label like `"C5"` to `[row, col]`.
#[wasm_bindgen]
pub fn from_label(label: &str) -> Result<Vec<u8>, JsError> {
    let (row, col) = coords::from_label(label)?;
    Ok(vec![row, col])
}

/// A puzzle being attempted, with its earlier positions kept for undo.
#[wasm_bindgen]
pub struct WasmTsumego {
    current: Tsumego,
    history: Vec<Tsumego>,
}

#[wasm_bindgen]
impl WasmTsumego {
    /// Load a puzzle from JSON `{ "board": ..., "tree": ... }`.
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str) -> Result<WasmTsumego, JsError> {
        Ok(Self {
            current: Tsumego::from_json(json)?,
            history: Vec::new(),
        })
    }

    // -- Puzzle actions --

    /// Play a move for the player to move. Returns false if it is illegal
    /// or the puzzle is already complete.
    pub fn try_play(&mut self, row: u8, col: u8) -> bool {
        match self.current.play((row, col)) {
            Ok(next) => {
                self.advance(next);
                true
            }
            Err(_) => false,
        }
    }

    /// Play the opponent's reply, chosen from the authored continuations.
    /// The host supplies the seed, e.g. from `Math.random()`.
    pub fn play_random(&mut self, seed: u64) -> bool {
        let mut rng = StdRng::seed_from_u64(seed);
        match self.current.play_random(&mut rng) {
            Ok(next) => {
                self.advance(next);
                true
            }
            Err(_) => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    fn advance(&mut self, next: Tsumego) {
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
    }

    // -- Puzzle state --

    pub fn is_complete(&self) -> bool {
        self.current.is_complete()
    }

    pub fn is_won(&self) -> bool {
        self.current.is_won()
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Labels of the authored continuations from the current position.
    pub fn moves(&self) -> Result<js_sys::Array, JsError> {
        let labels = js_sys::Array::new();
        for point in self.current.moves() {
            labels.push(&JsValue::from_str(&coords::to_label(point)?));
        }
        Ok(labels)
    }

    /// The current puzzle state as JSON `{ "board": ..., "tree": ... }`.
    pub fn tsumego_json(&self) -> Result<String, JsError> {
        let data = self.current.to_data()?;
        Ok(serde_json::to_string(&data)?)
    }

    // -- Board accessors (WASM-friendly types) --

    /// The board in its text form.
    pub fn board(&self) -> String {
        self.current.goban().to_string()
    }

    pub fn size(&self) -> u8 {
        self.current.goban().size()
    }

    /// `"b"` or `"w"`.
    pub fn next_player(&self) -> String {
        self.current.goban().next_player().to_char().to_string()
    }

    /// One of `"b"`, `"w"`, `"."`, `"#"`, or an empty string off the board.
    pub fn cell(&self, row: u8, col: u8) -> String {
        self.current
            .goban()
            .at((row, col))
            .map(|cell| cell.to_char().to_string())
            .unwrap_or_default()
    }

    pub fn is_legal(&self, row: u8, col: u8) -> bool {
        self.current.goban().is_legal((row, col))
    }

    pub fn has_ko(&self) -> bool {
        self.current.goban().ko_ban().is_some()
    }

    pub fn ko_row(&self) -> i8 {
        match self.current.goban().ko_ban() {
            Some((row, _)) => row as i8,
            None => -1,
        }
    }

    pub fn ko_col(&self) -> i8 {
        match self.current.goban().ko_ban() {
            Some((_, col)) => col as i8,
            None => -1,
        }
    }
}
