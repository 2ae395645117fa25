//! Grid model: cells, candidate masks, houses, and the two text notations.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitset::{CellMap, DigitSet};

/// House index convention: 0..9 = rows, 9..18 = columns, 18..27 = boxes.
pub const HOUSE_ROW_BASE: usize = 0;
pub const HOUSE_COL_BASE: usize = 9;
pub const HOUSE_BOX_BASE: usize = 18;

/// A (row, col) coordinate on the 9x9 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < 9 && col < 9);
        Self { row, col }
    }

    /// Linear cell index 0..81, row-major.
    #[inline]
    pub fn index(&self) -> usize {
        self.row * 9 + self.col
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        debug_assert!(idx < 81);
        Self {
            row: idx / 9,
            col: idx % 9,
        }
    }

    /// Box index 0..9, left-to-right then top-to-bottom.
    #[inline]
    pub fn box_index(&self) -> usize {
        (self.row / 3) * 3 + self.col / 3
    }

    /// All 81 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..81).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row + 1, self.col + 1)
    }
}

/// Get the 9 cell indices belonging to a house.
pub fn house_cells(house: usize) -> [usize; 9] {
    debug_assert!(house < 27);
    if house < HOUSE_COL_BASE {
        let row = house;
        std::array::from_fn(|col| row * 9 + col)
    } else if house < HOUSE_BOX_BASE {
        let col = house - HOUSE_COL_BASE;
        std::array::from_fn(|row| row * 9 + col)
    } else {
        let box_idx = house - HOUSE_BOX_BASE;
        let base = (box_idx / 3) * 27 + (box_idx % 3) * 3;
        std::array::from_fn(|i| base + (i / 3) * 9 + i % 3)
    }
}

/// Short house name: r1..r9, c1..c9, b1..b9.
pub fn house_name(house: usize) -> String {
    if house < HOUSE_COL_BASE {
        format!("r{}", house + 1)
    } else if house < HOUSE_BOX_BASE {
        format!("c{}", house - HOUSE_COL_BASE + 1)
    } else {
        format!("b{}", house - HOUSE_BOX_BASE + 1)
    }
}

/// Read-only structural tables, computed once at process start and shared by
/// every analysis pass.
pub struct Topology {
    /// The 3 houses each cell belongs to: [row, col, box].
    pub houses_of: [[usize; 3]; 81],
    /// The 20 peers of each cell (same row/col/box, excluding self).
    pub peers: [[u8; 20]; 81],
    /// Peer set of each cell as a CellMap.
    pub peer_map: [CellMap; 81],
    /// Cell set of each house.
    pub house_map: [CellMap; 27],
}

impl Topology {
    fn build() -> Self {
        let mut houses_of = [[0usize; 3]; 81];
        let mut peers = [[0u8; 20]; 81];
        let mut peer_map = [CellMap::empty(); 81];
        let mut house_map = [CellMap::empty(); 27];

        for house in 0..27 {
            house_map[house] = house_cells(house).into_iter().collect();
        }

        for idx in 0..81 {
            let pos = Position::from_index(idx);
            houses_of[idx] = [
                HOUSE_ROW_BASE + pos.row,
                HOUSE_COL_BASE + pos.col,
                HOUSE_BOX_BASE + pos.box_index(),
            ];
            let mut set = CellMap::empty();
            for &h in &houses_of[idx] {
                set = set.union(&house_map[h]);
            }
            set.remove(idx);
            peer_map[idx] = set;
            for (slot, peer) in set.iter().enumerate() {
                peers[idx][slot] = peer as u8;
            }
        }

        Self {
            houses_of,
            peers,
            peer_map,
            house_map,
        }
    }

    /// Process-wide shared instance.
    pub fn get() -> &'static Topology {
        static TOPOLOGY: OnceLock<Topology> = OnceLock::new();
        TOPOLOGY.get_or_init(Topology::build)
    }

    /// Check if two cells share a row, column, or box.
    #[inline]
    pub fn sees(&self, a: usize, b: usize) -> bool {
        a != b
            && (self.houses_of[a][0] == self.houses_of[b][0]
                || self.houses_of[a][1] == self.houses_of[b][1]
                || self.houses_of[a][2] == self.houses_of[b][2])
    }

    /// Cells seeing both `a` and `b`.
    pub fn common_peers(&self, a: usize, b: usize) -> CellMap {
        self.peer_map[a].intersect(&self.peer_map[b])
    }
}

/// One cell: either solved (with a given flag) or open with candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    value: Option<u8>,
    given: bool,
    candidates: DigitSet,
}

impl Cell {
    fn open(candidates: DigitSet) -> Self {
        Self {
            value: None,
            given: false,
            candidates,
        }
    }

    fn solved(value: u8, given: bool) -> Self {
        Self {
            value: Some(value),
            given,
            candidates: DigitSet::empty(),
        }
    }

    #[inline]
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    #[inline]
    pub fn is_given(&self) -> bool {
        self.given
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.value.is_some()
    }

    /// Candidate mask; always empty for solved cells.
    #[inline]
    pub fn candidates(&self) -> DigitSet {
        self.candidates
    }

    pub fn remove_candidate(&mut self, digit: u8) {
        self.candidates.remove(digit);
    }
}

/// Error parsing one of the grid text notations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("expected 81 cells, found {0}")]
    BadLength(usize),
    #[error("invalid character {0:?} at cell {1}")]
    BadCharacter(char, usize),
    #[error("invalid pencil-mark token {0:?} at cell {1}")]
    BadToken(String, usize),
}

/// A 9x9 grid with per-cell candidate masks. Value semantics: clone before
/// mutating so prior states stay inspectable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// Fully open grid: every cell empty with all nine candidates.
    pub fn empty() -> Self {
        Self {
            cells: vec![Cell::open(DigitSet::full()); 81],
        }
    }

    #[inline]
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.index()]
    }

    #[inline]
    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.index()]
    }

    #[inline]
    pub fn value(&self, pos: Position) -> Option<u8> {
        self.cells[pos.index()].value
    }

    #[inline]
    pub fn candidates(&self, pos: Position) -> DigitSet {
        self.cells[pos.index()].candidates
    }

    /// Collapse a cell to solved state and retract the digit from all peers.
    ///
    /// Fails silently if a retraction empties a peer's candidate set; the
    /// pipeline inspects the resulting state via [`Grid::contradiction`]
    /// instead of an error path.
    pub fn set_digit(&mut self, pos: Position, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        let given = self.cells[pos.index()].given;
        self.cells[pos.index()] = Cell::solved(digit, given);
        let topo = Topology::get();
        for peer in topo.peer_map[pos.index()].iter() {
            self.cells[peer].candidates.remove(digit);
        }
    }

    /// Place a given clue. Candidates of peers are retracted as in
    /// [`Grid::set_digit`].
    pub fn set_given(&mut self, pos: Position, digit: u8) {
        self.set_digit(pos, digit);
        self.cells[pos.index()].given = true;
    }

    /// Reopen a cell with no candidates; call
    /// [`Grid::recalculate_candidates`] afterwards.
    pub fn clear_cell(&mut self, pos: Position) {
        self.cells[pos.index()] = Cell::open(DigitSet::empty());
    }

    /// Recompute every open cell's candidates from the placed values.
    pub fn recalculate_candidates(&mut self) {
        let topo = Topology::get();
        for idx in 0..81 {
            if self.cells[idx].value.is_some() {
                self.cells[idx].candidates = DigitSet::empty();
                continue;
            }
            let mut cands = DigitSet::full();
            for peer in topo.peer_map[idx].iter() {
                if let Some(v) = self.cells[peer].value {
                    cands.remove(v);
                }
            }
            self.cells[idx].candidates = cands;
        }
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_some())
    }

    pub fn solved_count(&self) -> usize {
        self.cells.iter().filter(|c| c.value.is_some()).count()
    }

    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|c| c.given).count()
    }

    /// Open cells as a CellMap.
    pub fn empty_cells(&self) -> CellMap {
        (0..81).filter(|&i| self.cells[i].value.is_none()).collect()
    }

    /// First open cell whose candidate mask is empty, if any.
    pub fn contradiction(&self) -> Option<Position> {
        (0..81)
            .find(|&i| self.cells[i].value.is_none() && self.cells[i].candidates.is_empty())
            .map(Position::from_index)
    }

    // ==================== Text notations ====================

    /// Parse the one-line 81-character notation. `.` and `0` are
    /// placeholders for empty cells; every parsed value becomes a given.
    pub fn from_line(s: &str) -> Result<Self, ParseGridError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 81 {
            return Err(ParseGridError::BadLength(chars.len()));
        }
        let mut grid = Grid::empty();
        for (idx, &ch) in chars.iter().enumerate() {
            match ch {
                '.' | '0' => {}
                '1'..='9' => {
                    grid.set_given(Position::from_index(idx), ch as u8 - b'0');
                }
                other => return Err(ParseGridError::BadCharacter(other, idx)),
            }
        }
        grid.recalculate_candidates();
        Ok(grid)
    }

    /// Format as one-line 81-character notation (`.` for empty cells).
    pub fn to_line(&self) -> String {
        self.cells
            .iter()
            .map(|c| match c.value {
                Some(v) => (b'0' + v) as char,
                None => '.',
            })
            .collect()
    }

    /// Format as pencil-mark notation: 81 whitespace-separated tokens.
    ///
    /// `5` is a given, `+5` a solved non-given, `[137]` an open cell with
    /// those candidates, `[]` an open cell with none (contradiction).
    pub fn to_pencilmarks(&self) -> String {
        let mut tokens = Vec::with_capacity(81);
        for cell in &self.cells {
            let token = match cell.value {
                Some(v) if cell.given => format!("{}", v),
                Some(v) => format!("+{}", v),
                None => {
                    let digits: String = cell.candidates.iter().map(|d| (b'0' + d) as char).collect();
                    format!("[{}]", digits)
                }
            };
            tokens.push(token);
        }
        tokens.join(" ")
    }

    /// Parse the pencil-mark notation produced by [`Grid::to_pencilmarks`].
    pub fn from_pencilmarks(s: &str) -> Result<Self, ParseGridError> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 81 {
            return Err(ParseGridError::BadLength(tokens.len()));
        }
        let mut grid = Grid::empty();
        for (idx, token) in tokens.iter().enumerate() {
            let pos = Position::from_index(idx);
            let bad = || ParseGridError::BadToken(token.to_string(), idx);
            if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                let mut cands = DigitSet::empty();
                for ch in inner.chars() {
                    match ch {
                        '1'..='9' => cands.insert(ch as u8 - b'0'),
                        _ => return Err(bad()),
                    }
                }
                grid.cells[pos.index()] = Cell::open(cands);
            } else if let Some(rest) = token.strip_prefix('+') {
                let v = rest.parse::<u8>().map_err(|_| bad())?;
                if !(1..=9).contains(&v) {
                    return Err(bad());
                }
                grid.cells[pos.index()] = Cell::solved(v, false);
            } else {
                let v = token.parse::<u8>().map_err(|_| bad())?;
                if !(1..=9).contains(&v) {
                    return Err(bad());
                }
                grid.cells[pos.index()] = Cell::solved(v, true);
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl std::str::FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::from_line(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASY: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_house_cells() {
        assert_eq!(house_cells(0), [0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(house_cells(9), [0, 9, 18, 27, 36, 45, 54, 63, 72]);
        assert_eq!(house_cells(18), [0, 1, 2, 9, 10, 11, 18, 19, 20]);
        assert_eq!(house_cells(26), [60, 61, 62, 69, 70, 71, 78, 79, 80]);
    }

    #[test]
    fn test_topology_peers() {
        let topo = Topology::get();
        assert_eq!(topo.peer_map[0].len(), 20);
        assert!(topo.sees(0, 5)); // same row
        assert!(topo.sees(0, 9)); // same col
        assert!(topo.sees(0, 10)); // same box
        assert!(!topo.sees(0, 40));
        assert!(!topo.sees(0, 0));
    }

    #[test]
    fn test_parse_line() {
        let grid = Grid::from_line(EASY).unwrap();
        assert_eq!(grid.value(Position::new(0, 0)), Some(5));
        assert_eq!(grid.value(Position::new(0, 2)), None);
        assert_eq!(grid.given_count(), 30);
        // Candidates exclude peer values.
        assert!(!grid.candidates(Position::new(0, 2)).contains(5));
        assert!(!grid.candidates(Position::new(0, 2)).contains(6));
    }

    #[test]
    fn test_parse_line_errors() {
        assert_eq!(Grid::from_line("12"), Err(ParseGridError::BadLength(2)));
        let mut s = EASY.to_string();
        s.replace_range(0..1, "x");
        assert_eq!(
            Grid::from_line(&s),
            Err(ParseGridError::BadCharacter('x', 0))
        );
    }

    #[test]
    fn test_line_roundtrip() {
        let grid = Grid::from_line(EASY).unwrap();
        let formatted = grid.to_line();
        assert_eq!(formatted.replace('.', "0"), EASY);
        assert_eq!(Grid::from_line(&formatted).unwrap(), grid);
    }

    #[test]
    fn test_pencilmark_roundtrip() {
        let mut grid = Grid::from_line(EASY).unwrap();
        // Introduce a solved non-given and an elimination to widen the state.
        grid.set_digit(Position::new(0, 2), 4);
        grid.cell_mut(Position::new(8, 0)).remove_candidate(3);
        let text = grid.to_pencilmarks();
        let parsed = Grid::from_pencilmarks(&text).unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_pencilmark_roundtrip_contradiction() {
        let mut grid = Grid::from_line(EASY).unwrap();
        let pos = Position::new(0, 2);
        let cands: Vec<u8> = grid.candidates(pos).iter().collect();
        for d in cands {
            grid.cell_mut(pos).remove_candidate(d);
        }
        assert_eq!(grid.contradiction(), Some(pos));
        let parsed = Grid::from_pencilmarks(&grid.to_pencilmarks()).unwrap();
        assert_eq!(parsed, grid);
        assert_eq!(parsed.contradiction(), Some(pos));
    }

    #[test]
    fn test_set_digit_retracts_peers() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        grid.set_digit(Position::new(4, 4), 5);
        assert!(!grid.candidates(Position::new(4, 0)).contains(5));
        assert!(!grid.candidates(Position::new(0, 4)).contains(5));
        assert!(!grid.candidates(Position::new(3, 3)).contains(5));
        assert!(grid.candidates(Position::new(0, 0)).contains(5));
    }

    #[test]
    fn test_set_digit_silent_on_emptying_peer() {
        // Two cells in one row, each reduced to candidate {5}; placing 5 in
        // one empties the other without panicking.
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        for pos in [Position::new(0, 0), Position::new(0, 1)] {
            for d in 1..=9u8 {
                if d != 5 {
                    grid.cell_mut(pos).remove_candidate(d);
                }
            }
        }
        grid.set_digit(Position::new(0, 0), 5);
        assert_eq!(grid.contradiction(), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let grid = Grid::from_line(EASY).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
