use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Point;
use crate::error::{GoError, IllegalMove};
use crate::stone::{Cell, Stone};

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 25;

/// An immutable board position: a square grid of cells and the player to move.
///
/// New positions are only produced by [`Goban::play`]; a position is never
/// changed in place, so earlier positions can be kept around freely.
///
/// The text form is one line holding `b` or `w` for the player to move,
/// followed by `size` rows of `size` characters from `b`, `w`, `.` (empty)
/// and `#` (ko ban).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Goban {
    cells: Vec<Cell>,
    size: u8,
    next: Stone,
}

impl Goban {
    /// An empty board with Black to play.
    pub fn empty(size: usize) -> Result<Self, GoError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GoError::InvalidSize(size));
        }
        Self::from_cells(size, Stone::Black, vec![Cell::Empty; size * size])
    }

    /// Build a position from row-major cells.
    pub fn from_cells(size: usize, next: Stone, cells: Vec<Cell>) -> Result<Self, GoError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GoError::InvalidSize(size));
        }
        if cells.len() != size * size {
            return Err(GoError::InvalidFormat(format!(
                "expected {} cells for board size {size}, was {}",
                size * size,
                cells.len()
            )));
        }
        if cells.iter().filter(|&&c| c == Cell::KoBan).count() > 1 {
            return Err(GoError::InvalidFormat(
                "board position has more than one ko ban".to_string(),
            ));
        }

        Ok(Goban {
            cells,
            size: size as u8,
            next,
        })
    }

    // -- Accessors --

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn next_player(&self) -> Stone {
        self.next
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// What is at the given point.
    pub fn at(&self, point: Point) -> Result<Cell, GoError> {
        if !self.on_board(point) {
            return Err(GoError::OutOfBounds {
                point,
                size: self.size,
            });
        }
        Ok(self.cells[self.idx(point)])
    }

    pub fn on_board(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    /// The point where the player to move may not recapture, if any.
    pub fn ko_ban(&self) -> Option<Point> {
        self.cells
            .iter()
            .position(|&c| c == Cell::KoBan)
            .map(|i| self.point(i))
    }

    /// Whether the player to move may play at the given point.
    pub fn is_legal(&self, point: Point) -> bool {
        self.on_board(point)
            && self.cells[self.idx(point)] == Cell::Empty
            && self.resolve(point).is_ok()
    }

    // -- Game actions --

    /// Play a stone for the player to move. Returns the resulting position,
    /// with captures removed and the opponent to move.
    pub fn play(&self, point: Point) -> Result<Goban, GoError> {
        if !self.on_board(point) {
            return Err(GoError::OutOfBounds {
                point,
                size: self.size,
            });
        }
        let (next, captures) = self
            .resolve(point)
            .map_err(|reason| GoError::IllegalMove { point, reason })?;
        tracing::trace!(
            "{} played row = {}, col = {}, captured {captures}",
            self.next,
            point.0,
            point.1
        );
        Ok(next)
    }

    /// The same position with every stone and the player to move swapped.
    pub fn swap_colours(&self) -> Goban {
        let cells = self
            .cells
            .iter()
            .map(|&c| match c {
                Cell::Black => Cell::White,
                Cell::White => Cell::Black,
                other => other,
            })
            .collect();
        Goban {
            cells,
            size: self.size,
            next: self.next.opp(),
        }
    }

    /// Place a stone, resolve captures, check self-capture and ko. Returns
    /// the new position and the number of stones captured.
    /// `point` must be on the board.
    fn resolve(&self, point: Point) -> Result<(Goban, usize), IllegalMove> {
        match self.cells[self.idx(point)] {
            Cell::Empty => {}
            Cell::KoBan => return Err(IllegalMove::KoRecapture),
            Cell::Black | Cell::White => return Err(IllegalMove::Occupied),
        }

        let stone = self.next;
        let opponent = stone.opp();

        // Ko bans only last for one ply
        let mut cells: Vec<Cell> = self
            .cells
            .iter()
            .map(|&c| if c == Cell::KoBan { Cell::Empty } else { c })
            .collect();
        cells[self.idx(point)] = stone.into();

        let mut captures = 0;
        for n in self.neighbors(point) {
            if cells[self.idx(n)] == Cell::from(opponent) {
                captures += self.remove_captures(&mut cells, n, opponent);
            }
        }

        if captures == 0 && self.remove_captures(&mut cells, point, stone) > 0 {
            return Err(IllegalMove::SelfCapture);
        }

        if captures == 1 {
            self.mark_ko_ban(&mut cells, point, stone);
        }

        let next = Goban {
            cells,
            size: self.size,
            next: opponent,
        };
        Ok((next, captures))
    }

    // -- Graph algorithms --

    /// Get the 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (row, col): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if row > 0 {
            result.push((row - 1, col));
        }
        if row + 1 < self.size {
            result.push((row + 1, col));
        }
        if col > 0 {
            result.push((row, col - 1));
        }
        if col + 1 < self.size {
            result.push((row, col + 1));
        }
        result
    }

    /// Flood-fill the chain of `stone` containing `start`. If it has no
    /// liberties, clear it from `cells` and return how many stones were
    /// removed; otherwise leave `cells` untouched and return 0.
    fn remove_captures(&self, cells: &mut [Cell], start: Point, stone: Stone) -> usize {
        let colour = Cell::from(stone);
        let mut visited = vec![false; cells.len()];
        let mut chain = vec![start];
        let mut stack = vec![start];
        visited[self.idx(start)] = true;

        while let Some(p) = stack.pop() {
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if visited[ni] {
                    continue;
                }
                let cell = cells[ni];
                if cell == colour {
                    visited[ni] = true;
                    chain.push(n);
                    stack.push(n);
                } else if cell.is_vacant() {
                    return 0;
                }
            }
        }

        for &p in &chain {
            cells[self.idx(p)] = Cell::Empty;
        }
        chain.len()
    }

    /// After a single-stone capture: if the placed stone stands alone with
    /// exactly one liberty, that liberty becomes a ko ban.
    fn mark_ko_ban(&self, cells: &mut [Cell], point: Point, stone: Stone) {
        let mut liberty = None;
        for n in self.neighbors(point) {
            let cell = cells[self.idx(n)];
            if cell == Cell::from(stone) {
                return;
            }
            if cell.is_vacant() {
                if liberty.is_some() {
                    return;
                }
                liberty = Some(n);
            }
        }

        if let Some(p) = liberty {
            cells[self.idx(p)] = Cell::KoBan;
        }
    }

    // -- Internal helpers --

    #[inline]
    fn idx(&self, (row, col): Point) -> usize {
        row as usize * self.size as usize + col as usize
    }

    #[inline]
    fn point(&self, idx: usize) -> Point {
        let size = self.size as usize;
        ((idx / size) as u8, (idx % size) as u8)
    }
}

impl FromStr for Goban {
    type Err = GoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.split('\n');
        let header = lines.next().unwrap_or_default();
        let mut chars = header.chars();
        let next = match (chars.next().and_then(Stone::from_char), chars.next()) {
            (Some(stone), None) => stone,
            _ => {
                return Err(GoError::InvalidFormat(format!(
                    "invalid next player; expected 'b' or 'w', was '{header}'"
                )));
            }
        };

        let rows: Vec<&str> = lines.collect();
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);

        for row in &rows {
            let width = row.chars().count();
            if width != size {
                return Err(GoError::InvalidFormat(format!(
                    "row length should equal board height; expected width {size}, was {width}"
                )));
            }
            for c in row.chars() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    GoError::InvalidFormat(format!(
                        "invalid character '{c}'; expected only 'b', 'w', '.', '#'"
                    ))
                })?;
                cells.push(cell);
            }
        }

        Goban::from_cells(size, next, cells)
    }
}

impl fmt::Display for Goban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.next.to_char())?;
        for row in self.cells.chunks(self.size as usize) {
            writeln!(f)?;
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

impl Serialize for Goban {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Goban {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn goban(text: &str) -> Goban {
        text.parse().unwrap()
    }

    /// Log output collected by a test subscriber.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Run `f` with trace-level logs written to the returned buffer.
    fn with_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    fn reason(result: Result<Goban, GoError>) -> Option<IllegalMove> {
        result.err().and_then(|e| e.illegal_move())
    }

    const CAPTURE: &str = "b\nwb...\n.b...\n.b...\nbb...\n.....";
    const MULTI_CAPTURE: &str = "b\n.....\nbbb..\nwww.w\nbbbwb\n...b.";
    const KO: &str = "b\n.....\n.bw..\nbw.w.\n.bw..\n.....";
    const SELF_CAPTURE: &str = "b\nbw...\nbw...\n.w...\nw.w..\n.w...";

    #[test]
    fn creates_empty_board() {
        let goban = Goban::empty(4).unwrap();
        assert_eq!(goban.size(), 4);
        assert_eq!(goban.next_player(), Stone::Black);
        assert!(goban.cells().iter().all(|&c| c == Cell::Empty));
        assert_eq!(goban.to_string(), "b\n....\n....\n....\n....");
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert_eq!(Goban::empty(0), Err(GoError::InvalidSize(0)));
        assert_eq!(Goban::empty(1), Err(GoError::InvalidSize(1)));
        assert_eq!(Goban::empty(26), Err(GoError::InvalidSize(26)));
        assert!(Goban::empty(2).is_ok());
        assert!(Goban::empty(25).is_ok());
    }

    #[test]
    fn parses_board() {
        let goban = goban(CAPTURE);
        assert_eq!(goban.size(), 5);
        assert_eq!(goban.next_player(), Stone::Black);
        assert_eq!(goban.at((0, 0)), Ok(Cell::White));
        assert_eq!(goban.at((0, 1)), Ok(Cell::Black));
        assert_eq!(goban.at((1, 0)), Ok(Cell::Empty));
    }

    #[test]
    fn text_round_trip() {
        for text in [CAPTURE, MULTI_CAPTURE, KO, SELF_CAPTURE, "w\n#b\nb."] {
            assert_eq!(goban(text).to_string(), text);
        }
    }

    #[test]
    fn rejects_bad_header() {
        for text in ["x\n..\n..", "B\n..\n..", "bw\n..\n..", "\n..\n.."] {
            assert!(matches!(
                text.parse::<Goban>(),
                Err(GoError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn rejects_non_square_board() {
        let result = "b\n.....\n.....\n.....".parse::<Goban>();
        assert!(matches!(result, Err(GoError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_uneven_rows() {
        let result = "b\n.....\n....\n.....\n.....\n.....".parse::<Goban>();
        assert!(matches!(result, Err(GoError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_invalid_character() {
        let result = "b\n.....\n..q..\n.....\n.....\n.....".parse::<Goban>();
        assert!(matches!(result, Err(GoError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_trailing_newline() {
        let result = format!("{CAPTURE}\n").parse::<Goban>();
        assert!(matches!(result, Err(GoError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        assert_eq!("b".parse::<Goban>(), Err(GoError::InvalidSize(0)));
        assert_eq!("b\n.".parse::<Goban>(), Err(GoError::InvalidSize(1)));
        let row = ".".repeat(26);
        let text = format!("b{}", format!("\n{row}").repeat(26));
        assert_eq!(text.parse::<Goban>(), Err(GoError::InvalidSize(26)));
    }

    #[test]
    fn rejects_two_ko_bans() {
        let result = "b\n#.\n.#".parse::<Goban>();
        assert!(matches!(result, Err(GoError::InvalidFormat(_))));
    }

    #[test]
    fn at_out_of_bounds() {
        let goban = Goban::empty(5).unwrap();
        assert_eq!(
            goban.at((5, 0)),
            Err(GoError::OutOfBounds {
                point: (5, 0),
                size: 5
            })
        );
        assert!(goban.at((0, 5)).is_err());
        assert!(!goban.is_legal((0, 5)));
        assert!(matches!(
            goban.play((7, 7)),
            Err(GoError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn play_alternates_players() {
        let goban = Goban::empty(4).unwrap();
        let goban = goban.play((1, 1)).unwrap();
        assert_eq!(goban.at((1, 1)), Ok(Cell::Black));
        assert_eq!(goban.next_player(), Stone::White);
        let goban = goban.play((2, 2)).unwrap();
        assert_eq!(goban.at((2, 2)), Ok(Cell::White));
        assert_eq!(goban.next_player(), Stone::Black);
    }

    #[test]
    fn prevents_overwrite() {
        let goban = Goban::empty(4).unwrap().play((0, 0)).unwrap();
        assert_eq!(reason(goban.play((0, 0))), Some(IllegalMove::Occupied));
        assert!(!goban.is_legal((0, 0)));
    }

    #[test]
    fn captures_single_stone() {
        let goban = goban(CAPTURE).play((1, 0)).unwrap();
        assert_eq!(goban.at((0, 0)), Ok(Cell::Empty));
        assert_eq!(goban.at((1, 0)), Ok(Cell::Black));
        assert_eq!(goban.ko_ban(), None);
        assert_eq!(goban.to_string(), "w\n.b...\nbb...\n.b...\nbb...\n.....");
    }

    #[test]
    fn captures_whole_chain() {
        let goban = goban(MULTI_CAPTURE).play((2, 3)).unwrap();
        for col in 0..3 {
            assert_eq!(goban.at((2, col)), Ok(Cell::Empty));
        }
        assert_eq!(goban.at((2, 3)), Ok(Cell::Black));
        assert_eq!(goban.at((2, 4)), Ok(Cell::White));
        // Surrounded on all four sides once (2, 3) is filled
        assert_eq!(goban.at((3, 3)), Ok(Cell::Empty));
        assert_eq!(goban.next_player(), Stone::White);
        assert_eq!(goban.ko_ban(), None);
    }

    #[test]
    fn capture_overrides_self_capture() {
        let goban = goban("w\n.bw..\nbw...\nw....\n.....\n.....");
        let goban = goban.play((0, 0)).unwrap();
        assert_eq!(goban.at((0, 0)), Ok(Cell::White));
        assert_eq!(goban.at((0, 1)), Ok(Cell::Empty));
        assert_eq!(goban.at((1, 0)), Ok(Cell::Empty));
        assert_eq!(goban.ko_ban(), None);
    }

    #[test]
    fn creates_and_expires_ko_ban() {
        let goban = goban(KO).play((2, 2)).unwrap();
        assert_eq!(goban.at((2, 1)), Ok(Cell::KoBan));
        assert_eq!(goban.ko_ban(), Some((2, 1)));
        assert_eq!(goban.to_string(), "w\n.....\n.bw..\nb#bw.\n.bw..\n.....");

        assert_eq!(reason(goban.play((2, 1))), Some(IllegalMove::KoRecapture));
        assert!(!goban.is_legal((2, 1)));

        // White plays elsewhere, then Black
        let goban = goban.play((0, 4)).unwrap();
        assert_eq!(goban.at((2, 1)), Ok(Cell::Empty));
        assert_eq!(goban.ko_ban(), None);
        let goban = goban.play((4, 4)).unwrap();

        assert!(goban.is_legal((2, 1)));
        let goban = goban.play((2, 1)).unwrap();
        assert_eq!(goban.at((2, 2)), Ok(Cell::KoBan));
    }

    #[test]
    fn capture_by_connected_stone_is_not_ko() {
        let goban = goban("b\n.bb..\nw.wb.\n.wb..\n.....\n.....");
        let goban = goban.play((1, 1)).unwrap();
        assert_eq!(goban.at((1, 2)), Ok(Cell::Empty));
        assert_eq!(goban.ko_ban(), None);
    }

    #[test]
    fn prevents_self_capture() {
        let goban = goban(SELF_CAPTURE);
        let before = goban.to_string();

        assert_eq!(reason(goban.play((3, 1))), Some(IllegalMove::SelfCapture));
        assert_eq!(reason(goban.play((2, 0))), Some(IllegalMove::SelfCapture));
        assert!(!goban.is_legal((3, 1)));
        assert!(!goban.is_legal((2, 0)));

        assert_eq!(goban.to_string(), before);
        assert!(goban.is_legal((0, 2)));
    }

    #[test]
    fn parsed_ko_ban_lasts_one_ply() {
        let goban = goban("b\n.....\n.....\n..#..\n.....\n.....");
        assert_eq!(goban.ko_ban(), Some((2, 2)));
        assert!(!goban.is_legal((2, 2)));

        let goban = goban.play((0, 0)).unwrap();
        assert_eq!(goban.ko_ban(), None);
        assert!(goban.is_legal((2, 2)));
    }

    #[test]
    fn play_does_not_mutate() {
        let before = goban(KO);
        let snapshot = before.clone();
        let _ = before.play((2, 2)).unwrap();
        let _ = before.play((0, 0)).unwrap();
        assert_eq!(before, snapshot);
        for row in 0..5 {
            for col in 0..5 {
                assert_eq!(before.at((row, col)), snapshot.at((row, col)));
            }
        }
    }

    #[test]
    fn is_legal_agrees_with_play() {
        for text in [CAPTURE, MULTI_CAPTURE, KO, SELF_CAPTURE] {
            let goban = goban(text);
            for row in 0..6 {
                for col in 0..6 {
                    assert_eq!(
                        goban.is_legal((row, col)),
                        goban.play((row, col)).is_ok(),
                        "{text} at ({row}, {col})"
                    );
                }
            }
        }
    }

    #[test]
    fn only_played_moves_are_logged() {
        let goban = goban(CAPTURE);
        let logs = with_logs(|| {
            assert!(goban.is_legal((1, 0)));
            assert!(goban.is_legal((4, 4)));
        });
        assert!(!logs.contains("played"), "{logs}");

        let logs = with_logs(|| {
            goban.play((1, 0)).unwrap();
        });
        assert!(logs.contains("Black played row = 1, col = 0, captured 1"), "{logs}");
    }

    #[test]
    fn swaps_colours() {
        let goban = goban("w\n#b\nw.").swap_colours();
        assert_eq!(goban.to_string(), "b\n#w\nb.");
    }

    #[test]
    fn neighbors_at_edges() {
        let goban = Goban::empty(3).unwrap();
        assert_eq!(goban.neighbors((0, 0)).len(), 2);
        assert_eq!(goban.neighbors((0, 1)).len(), 3);
        assert_eq!(goban.neighbors((1, 1)).len(), 4);
        assert_eq!(goban.neighbors((2, 2)).as_slice(), &[(1, 2), (2, 1)]);
    }

    #[test]
    fn serializes_as_text() {
        let goban = goban(KO);
        let json = serde_json::to_string(&goban).unwrap();
        assert_eq!(json, serde_json::to_string(KO).unwrap());
        let restored: Goban = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, goban);
        assert!(serde_json::from_str::<Goban>(r#""q\n..\n..""#).is_err());
    }
}
