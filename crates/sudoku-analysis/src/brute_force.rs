//! Exact-cover brute-force solver (dancing links over an index arena).
//!
//! Sudoku decomposes into 324 exact-cover constraints in four families of
//! 81: every cell filled, every row/column/box holding each digit once.
//! Each of the up-to-729 (cell, digit) placements covers exactly one
//! constraint from each family. The dancing-links structure is an arena of
//! nodes addressed by index; cover/uncover are O(1) link swaps, and the
//! column with the fewest candidate rows is chosen first to minimize
//! branching.
//!
//! This solver is the ground-truth oracle the analysis pipeline and the
//! generator trust for solvability and uniqueness.

use crate::grid::{Grid, Position};

/// Outcome of a uniqueness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solutions {
    /// No assignment satisfies the givens.
    None,
    /// Exactly one solution (the probe tried one extra branch past it).
    Unique(Grid),
    /// A second solution exists; enumeration stopped there.
    Multiple,
}

const COLUMNS: usize = 324;

/// Constraint column indices for a (cell, digit) placement, 0-based.
fn constraint_columns(cell: usize, digit: u8) -> [usize; 4] {
    let row = cell / 9;
    let col = cell % 9;
    let boxi = (row / 3) * 3 + col / 3;
    let d = (digit - 1) as usize;
    [
        cell,
        81 + row * 9 + d,
        162 + col * 9 + d,
        243 + boxi * 9 + d,
    ]
}

#[derive(Clone, Copy)]
struct Node {
    left: u32,
    right: u32,
    up: u32,
    down: u32,
    /// Column header index for data nodes; self for headers.
    column: u32,
    /// Row identity: `cell * 9 + digit - 1` for data nodes.
    row: u32,
}

/// Dancing-links matrix. Index 0 is the root header, 1..=324 the column
/// headers, the rest data nodes.
struct Matrix {
    nodes: Vec<Node>,
    /// Live row count per column header index (1-based like the arena).
    size: Vec<u32>,
}

impl Matrix {
    fn new() -> Self {
        let mut nodes = Vec::with_capacity(1 + COLUMNS + 729 * 4);
        // Root + column headers, circularly linked left-right.
        for i in 0..=(COLUMNS as u32) {
            nodes.push(Node {
                left: if i == 0 { COLUMNS as u32 } else { i - 1 },
                right: if i == COLUMNS as u32 { 0 } else { i + 1 },
                up: i,
                down: i,
                column: i,
                row: 0,
            });
        }
        Self {
            nodes,
            size: vec![0; COLUMNS + 1],
        }
    }

    /// Append a row covering the four constraints of one placement.
    fn add_row(&mut self, cell: usize, digit: u8) {
        let row_id = (cell * 9 + digit as usize - 1) as u32;
        let first = self.nodes.len() as u32;
        for (i, &col0) in constraint_columns(cell, digit).iter().enumerate() {
            let header = (col0 + 1) as u32;
            let idx = first + i as u32;
            let up = self.nodes[header as usize].up;
            self.nodes.push(Node {
                left: if i == 0 { first + 3 } else { idx - 1 },
                right: if i == 3 { first } else { idx + 1 },
                up,
                down: header,
                column: header,
                row: row_id,
            });
            self.nodes[up as usize].down = idx;
            self.nodes[header as usize].up = idx;
            self.size[header as usize] += 1;
        }
    }

    fn cover(&mut self, header: u32) {
        let (l, r) = (self.nodes[header as usize].left, self.nodes[header as usize].right);
        self.nodes[l as usize].right = r;
        self.nodes[r as usize].left = l;
        let mut i = self.nodes[header as usize].down;
        while i != header {
            let mut j = self.nodes[i as usize].right;
            while j != i {
                let (u, d) = (self.nodes[j as usize].up, self.nodes[j as usize].down);
                self.nodes[u as usize].down = d;
                self.nodes[d as usize].up = u;
                self.size[self.nodes[j as usize].column as usize] -= 1;
                j = self.nodes[j as usize].right;
            }
            i = self.nodes[i as usize].down;
        }
    }

    fn uncover(&mut self, header: u32) {
        let mut i = self.nodes[header as usize].up;
        while i != header {
            let mut j = self.nodes[i as usize].left;
            while j != i {
                let (u, d) = (self.nodes[j as usize].up, self.nodes[j as usize].down);
                self.size[self.nodes[j as usize].column as usize] += 1;
                self.nodes[u as usize].down = j;
                self.nodes[d as usize].up = j;
                j = self.nodes[j as usize].left;
            }
            i = self.nodes[i as usize].up;
        }
        let (l, r) = (self.nodes[header as usize].left, self.nodes[header as usize].right);
        self.nodes[l as usize].right = header;
        self.nodes[r as usize].left = header;
    }

    /// Active column with the fewest rows, or `None` when the matrix is
    /// fully covered.
    fn choose_column(&self) -> Option<u32> {
        let mut best = None;
        let mut best_size = u32::MAX;
        let mut c = self.nodes[0].right;
        while c != 0 {
            let s = self.size[c as usize];
            if s < best_size {
                best_size = s;
                best = Some(c);
                if s == 0 {
                    break;
                }
            }
            c = self.nodes[c as usize].right;
        }
        best
    }

    /// Recursive search, stopping once `limit` solutions are found. The
    /// first solution's rows are kept in `first_solution`.
    fn search(
        &mut self,
        stack: &mut Vec<u32>,
        first_solution: &mut Option<Vec<u32>>,
        found: &mut usize,
        limit: usize,
    ) {
        let Some(column) = self.choose_column() else {
            if first_solution.is_none() {
                *first_solution = Some(stack.clone());
            }
            *found += 1;
            return;
        };
        if self.size[column as usize] == 0 {
            return;
        }

        self.cover(column);
        let mut r = self.nodes[column as usize].down;
        while r != column {
            stack.push(self.nodes[r as usize].row);
            let mut j = self.nodes[r as usize].right;
            while j != r {
                self.cover(self.nodes[j as usize].column);
                j = self.nodes[j as usize].right;
            }

            self.search(stack, first_solution, found, limit);

            let mut j = self.nodes[r as usize].left;
            while j != r {
                self.uncover(self.nodes[j as usize].column);
                j = self.nodes[j as usize].left;
            }
            stack.pop();

            if *found >= limit {
                break;
            }
            r = self.nodes[r as usize].down;
        }
        self.uncover(column);
    }
}

/// Build the matrix for a grid: solved cells contribute their single row,
/// open cells all nine digit rows. Conflicts with placed peers fall out of
/// the shared house columns during the search.
fn build_matrix(grid: &Grid) -> Matrix {
    let mut matrix = Matrix::new();
    for pos in Position::all() {
        let cell = pos.index();
        match grid.value(pos) {
            Some(v) => matrix.add_row(cell, v),
            None => {
                for digit in 1..=9u8 {
                    matrix.add_row(cell, digit);
                }
            }
        }
    }
    matrix
}

fn solution_grid(grid: &Grid, rows: &[u32]) -> Grid {
    let mut solved = grid.clone();
    for &row in rows {
        let cell = row as usize / 9;
        let digit = (row % 9) as u8 + 1;
        let pos = Position::from_index(cell);
        if solved.value(pos).is_none() {
            solved.set_digit(pos, digit);
        }
    }
    solved.recalculate_candidates();
    solved
}

/// Count solutions, stopping at `limit`.
pub fn count_solutions(grid: &Grid, limit: usize) -> usize {
    let mut matrix = build_matrix(grid);
    let mut stack = Vec::with_capacity(81);
    let mut first = None;
    let mut found = 0;
    matrix.search(&mut stack, &mut first, &mut found, limit);
    found
}

/// Find any one solution.
pub fn solve_any(grid: &Grid) -> Option<Grid> {
    let mut matrix = build_matrix(grid);
    let mut stack = Vec::with_capacity(81);
    let mut first = None;
    let mut found = 0;
    matrix.search(&mut stack, &mut first, &mut found, 1);
    first.map(|rows| solution_grid(grid, &rows))
}

/// Uniqueness probe: the unique solution, `None`, or `Multiple` as soon as
/// a second solution turns up.
pub fn solve_unique(grid: &Grid) -> Solutions {
    let mut matrix = build_matrix(grid);
    let mut stack = Vec::with_capacity(81);
    let mut first = None;
    let mut found = 0;
    matrix.search(&mut stack, &mut first, &mut found, 2);
    match found {
        0 => Solutions::None,
        1 => Solutions::Unique(solution_grid(grid, &first.expect("one solution recorded"))),
        _ => Solutions::Multiple,
    }
}
