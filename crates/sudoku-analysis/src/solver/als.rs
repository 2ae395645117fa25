//! ALS-XZ: two almost-locked sets joined by a restricted common candidate.
//!
//! An almost-locked set (ALS) is N open cells of one house holding N+1
//! distinct candidates. When digit X of two disjoint ALSes is restricted
//! (every X cell of one set sees every X cell of the other), X can live in
//! at most one set; the other collapses to a locked set, so any shared
//! digit Z leaves every outside cell seeing all Z cells of both sets.

use std::collections::HashSet;

use super::{combinations, AnalysisContext};
use crate::bitset::{CellMap, DigitSet};
use crate::grid::{house_cells, Position};
use crate::step::{Conclusion, Step, StepKind, Technique, View};

/// Largest ALS considered, in cells.
const MAX_ALS_CELLS: usize = 4;

struct Als {
    cells: CellMap,
    digits: DigitSet,
}

/// Collect every ALS of 1..=MAX_ALS_CELLS cells, deduplicated across the
/// houses that see the same cell set.
fn collect_als(ctx: &AnalysisContext) -> Vec<Als> {
    let mut seen: HashSet<CellMap> = HashSet::new();
    let mut result = Vec::new();
    for house in 0..27 {
        let open: Vec<usize> = house_cells(house)
            .into_iter()
            .filter(|&c| ctx.empty.contains(c))
            .collect();
        for size in 1..=MAX_ALS_CELLS.min(open.len()) {
            for combo in combinations(&open, size) {
                let mut digits = DigitSet::empty();
                for &cell in &combo {
                    digits = digits.union(&ctx.candidates(cell));
                }
                if digits.len() != size + 1 {
                    continue;
                }
                let cells: CellMap = combo.iter().copied().collect();
                if seen.insert(cells) {
                    result.push(Als { cells, digits });
                }
            }
        }
    }
    result
}

/// Cells of `als` holding `digit`.
fn digit_cells_of(ctx: &AnalysisContext, als: &Als, digit: u8) -> CellMap {
    als.cells.intersect(&ctx.digit_cells[(digit - 1) as usize])
}

/// Every cell of `a` sees every cell of `b`. Callers pass disjoint sets.
fn fully_linked(ctx: &AnalysisContext, a: &CellMap, b: &CellMap) -> bool {
    a.iter().all(|x| b.iter().all(|y| ctx.topo.sees(x, y)))
}

pub(crate) fn find_als_xz(ctx: &mut AnalysisContext) {
    let sets = collect_als(ctx);
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            if !a.cells.intersect(&b.cells).is_empty() {
                continue;
            }
            let common = a.digits.intersect(&b.digits);
            if common.len() < 2 {
                continue;
            }
            for x in common.iter() {
                let ax = digit_cells_of(ctx, a, x);
                let bx = digit_cells_of(ctx, b, x);
                if !fully_linked(ctx, &ax, &bx) {
                    continue;
                }
                for z in common.iter() {
                    if z == x {
                        continue;
                    }
                    let az = digit_cells_of(ctx, a, z);
                    let bz = digit_cells_of(ctx, b, z);
                    let z_cells = az.union(&bz);
                    // Victims: z candidates outside both sets seeing every
                    // z cell of A and B.
                    let mut victims = ctx.digit_cells[(z - 1) as usize]
                        .difference(&a.cells)
                        .difference(&b.cells);
                    for zc in z_cells.iter() {
                        victims = victims.intersect(&ctx.topo.peer_map[zc]);
                    }
                    if victims.is_empty() {
                        continue;
                    }
                    let conclusions: Vec<Conclusion> = victims
                        .iter()
                        .map(|cell| Conclusion::Eliminate {
                            pos: Position::from_index(cell),
                            digit: z,
                        })
                        .collect();
                    let step = Step::new(
                        Technique::AlsXz,
                        StepKind::Als {
                            set_a: a.cells,
                            set_b: b.cells,
                            restricted: x,
                            z,
                        },
                        conclusions,
                        vec![View::Cells(a.cells.union(&b.cells))],
                    );
                    if ctx.emit(step) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::solver::{AnalysisOptions, SearchMode};

    fn all_steps(grid: &Grid) -> Vec<Step> {
        let options = AnalysisOptions::default();
        let mut ctx = AnalysisContext::new(grid, &options, SearchMode::AllSteps);
        find_als_xz(&mut ctx);
        ctx.steps
    }

    fn restrict(grid: &mut Grid, pos: Position, keep: &[u8]) {
        for d in 1..=9u8 {
            if !keep.contains(&d) {
                grid.cell_mut(pos).remove_candidate(d);
            }
        }
    }

    #[test]
    fn test_als_xz_bivalue_against_pair() {
        // A = r1c1 {1,2} (one cell, two digits); B = r3c2/r3c3 holding
        // {1,3}/{2,3}. X = 1 is restricted (r1c1 sees r3c2 in box 1), so
        // Z = 2 leaves the box cells seeing r1c1 and r3c3.
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        restrict(&mut grid, Position::new(0, 0), &[1, 2]);
        restrict(&mut grid, Position::new(2, 1), &[1, 3]);
        restrict(&mut grid, Position::new(2, 2), &[2, 3]);

        let steps = all_steps(&grid);
        let step = steps
            .iter()
            .find(|s| matches!(&s.kind, StepKind::Als { restricted: 1, z: 2, .. }))
            .expect("als-xz with restricted 1 eliminating 2");
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.digit(), 2);
            // All victims sit in box 1, seeing both z cells.
            assert!(conclusion.pos().row < 3 && conclusion.pos().col < 3);
        }
        assert!(!step.conclusions.is_empty());
    }

    #[test]
    fn test_no_als_xz_on_empty_grid() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        assert!(all_steps(&grid).is_empty());
    }
}
