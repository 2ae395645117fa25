//! Fish patterns: X-Wing, Swordfish, Jellyfish, and their finned variants.
//!
//! A size-N fish on one digit picks N base lines whose candidates all fall
//! into N cover lines of the other orientation; the digit then leaves every
//! cover-line cell outside the base lines. Finned variants tolerate up to
//! two extra base candidates sharing a box, restricting the eliminations to
//! that box.

use super::{combinations, AnalysisContext};
use crate::bitset::CellMap;
use crate::grid::{Position, HOUSE_COL_BASE};
use crate::step::{Conclusion, Step, StepKind, Technique, View};

const MAX_FINS: usize = 2;

fn technique_for(size: usize, finned: bool) -> Technique {
    match (size, finned) {
        (2, false) => Technique::XWing,
        (2, true) => Technique::FinnedXWing,
        (3, false) => Technique::Swordfish,
        (3, true) => Technique::FinnedSwordfish,
        (4, false) => Technique::Jellyfish,
        _ => Technique::FinnedJellyfish,
    }
}

/// Cover-line house of a cell: the column when bases are rows, else the row.
#[inline]
fn cover_line(ctx: &AnalysisContext, cell: usize, base_are_rows: bool) -> usize {
    if base_are_rows {
        ctx.topo.houses_of[cell][1]
    } else {
        ctx.topo.houses_of[cell][0]
    }
}

fn build_step(
    ctx: &AnalysisContext,
    digit: u8,
    size: usize,
    base_houses: &[usize],
    cover_houses: &[usize],
    fins: CellMap,
    eliminations: CellMap,
) -> Step {
    let conclusions: Vec<Conclusion> = eliminations
        .iter()
        .map(|cell| Conclusion::Eliminate {
            pos: Position::from_index(cell),
            digit,
        })
        .collect();
    let mut pattern = CellMap::empty();
    for &base in base_houses {
        pattern = pattern.union(&ctx.house_digit(base, digit));
    }
    let mut houses: Vec<usize> = base_houses.to_vec();
    houses.extend_from_slice(cover_houses);
    Step::new(
        technique_for(size, !fins.is_empty()),
        StepKind::Fish {
            digit,
            size,
            base_houses: base_houses.to_vec(),
            cover_houses: cover_houses.to_vec(),
            fins,
        },
        conclusions,
        vec![View::Cells(pattern), View::Houses(houses)],
    )
}

fn find_fish(ctx: &mut AnalysisContext, size: usize) {
    for digit in 1..=9u8 {
        for base_are_rows in [true, false] {
            let base_range = if base_are_rows {
                0..HOUSE_COL_BASE
            } else {
                HOUSE_COL_BASE..18
            };
            let lines: Vec<usize> = base_range
                .filter(|&house| {
                    let n = ctx.house_digit(house, digit).len();
                    n >= 2 && n <= size + MAX_FINS
                })
                .collect();
            if lines.len() < size {
                continue;
            }
            for base in combinations(&lines, size) {
                let mut spots = CellMap::empty();
                for &house in &base {
                    spots = spots.union(&ctx.house_digit(house, digit));
                }
                let mut cover_set: Vec<usize> = spots
                    .iter()
                    .map(|cell| cover_line(ctx, cell, base_are_rows))
                    .collect();
                cover_set.sort_unstable();
                cover_set.dedup();
                if cover_set.len() < size || cover_set.len() > size + MAX_FINS {
                    continue;
                }

                if cover_set.len() == size {
                    let eliminations = basic_eliminations(ctx, digit, &cover_set, &spots);
                    if !eliminations.is_empty()
                        && ctx.emit(build_step(
                            ctx,
                            digit,
                            size,
                            &base,
                            &cover_set,
                            CellMap::empty(),
                            eliminations,
                        ))
                    {
                        return;
                    }
                    continue;
                }

                for cover in combinations(&cover_set, size) {
                    let mut fins = CellMap::empty();
                    for cell in spots.iter() {
                        if !cover.contains(&cover_line(ctx, cell, base_are_rows)) {
                            fins.insert(cell);
                        }
                    }
                    if fins.is_empty() || fins.len() > MAX_FINS {
                        continue;
                    }
                    let fin_cells: Vec<usize> = fins.iter().collect();
                    let fin_box = ctx.topo.houses_of[fin_cells[0]][2];
                    if !fin_cells
                        .iter()
                        .all(|&c| ctx.topo.houses_of[c][2] == fin_box)
                    {
                        continue;
                    }
                    // Eliminations must see every fin, so they stay inside
                    // the fin box.
                    let mut eliminations = basic_eliminations(ctx, digit, &cover, &spots);
                    eliminations = eliminations.intersect(&ctx.topo.house_map[fin_box]);
                    if !eliminations.is_empty()
                        && ctx.emit(build_step(
                            ctx, digit, size, &base, &cover, fins, eliminations,
                        ))
                    {
                        return;
                    }
                }
            }
        }
    }
}

/// Digit candidates in the cover lines outside the base-line spots.
fn basic_eliminations(
    ctx: &AnalysisContext,
    digit: u8,
    cover: &[usize],
    spots: &CellMap,
) -> CellMap {
    let mut cover_cells = CellMap::empty();
    for &house in cover {
        cover_cells = cover_cells.union(&ctx.house_digit(house, digit));
    }
    cover_cells.difference(spots)
}

pub(crate) fn find_x_wings(ctx: &mut AnalysisContext) {
    find_fish(ctx, 2);
}

pub(crate) fn find_swordfish(ctx: &mut AnalysisContext) {
    find_fish(ctx, 3);
}

pub(crate) fn find_jellyfish(ctx: &mut AnalysisContext) {
    find_fish(ctx, 4);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::solver::{AnalysisOptions, SearchMode};

    fn all_steps(grid: &Grid, run: fn(&mut AnalysisContext)) -> Vec<Step> {
        let options = AnalysisOptions::default();
        let mut ctx = AnalysisContext::new(grid, &options, SearchMode::AllSteps);
        run(&mut ctx);
        ctx.steps
    }

    /// Restrict digit 5 in two rows to the same two columns.
    fn x_wing_grid() -> Grid {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        for row in [1, 4] {
            for col in 0..9 {
                if col != 2 && col != 6 {
                    grid.cell_mut(Position::new(row, col)).remove_candidate(5);
                }
            }
        }
        grid
    }

    #[test]
    fn test_x_wing() {
        let grid = x_wing_grid();
        let steps = all_steps(&grid, find_x_wings);
        let step = steps
            .iter()
            .find(|s| {
                matches!(&s.kind, StepKind::Fish { digit: 5, size: 2, base_houses, .. }
                    if base_houses == &vec![1, 4])
            })
            .expect("x-wing on 5 in rows 2 and 5");
        assert_eq!(step.technique, Technique::XWing);
        // 5 leaves columns 3 and 7 outside the base rows.
        assert_eq!(step.conclusions.len(), 14);
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.digit(), 5);
            assert!(conclusion.pos().col == 2 || conclusion.pos().col == 6);
            assert!(conclusion.pos().row != 1 && conclusion.pos().row != 4);
        }
    }

    #[test]
    fn test_finned_x_wing() {
        // As the X-Wing grid, but row 5 keeps an extra 5 at r5c8 (same box
        // as the r5c7 corner): eliminations shrink to box 6.
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        for col in 0..9 {
            if col != 2 && col != 6 {
                grid.cell_mut(Position::new(1, col)).remove_candidate(5);
            }
            if col != 2 && col != 6 && col != 7 {
                grid.cell_mut(Position::new(4, col)).remove_candidate(5);
            }
        }
        let steps = all_steps(&grid, find_x_wings);
        let step = steps
            .iter()
            .find(|s| {
                matches!(&s.kind, StepKind::Fish { digit: 5, fins, .. } if !fins.is_empty())
            })
            .expect("finned x-wing on 5");
        assert_eq!(step.technique, Technique::FinnedXWing);
        // The fin at r5c8 sits in box 6 (rows 4-6, cols 6-8); eliminations
        // stay in column 7 within that box.
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.digit(), 5);
            assert_eq!(conclusion.pos().col, 6);
            assert!(conclusion.pos().row == 3 || conclusion.pos().row == 5);
        }
        assert!(!step.conclusions.is_empty());
    }

    #[test]
    fn test_no_fish_on_empty_grid() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        assert!(all_steps(&grid, find_x_wings).is_empty());
        assert!(all_steps(&grid, find_swordfish).is_empty());
        assert!(all_steps(&grid, find_jellyfish).is_empty());
    }
}
