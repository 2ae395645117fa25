//! Locked subsets: naked and hidden pairs, triples, and quads.

use super::{combinations, AnalysisContext};
use crate::bitset::{CellMap, DigitSet};
use crate::grid::{house_cells, Position};
use crate::step::{Conclusion, Step, StepKind, Technique, View};

fn naked_technique(size: usize) -> Technique {
    match size {
        2 => Technique::NakedPair,
        3 => Technique::NakedTriple,
        _ => Technique::NakedQuad,
    }
}

fn hidden_technique(size: usize) -> Technique {
    match size {
        2 => Technique::HiddenPair,
        3 => Technique::HiddenTriple,
        _ => Technique::HiddenQuad,
    }
}

/// N open cells in a house whose combined candidates are exactly N digits:
/// those digits leave every other cell of the house.
fn find_naked(ctx: &mut AnalysisContext, size: usize) {
    for house in 0..27 {
        let open: Vec<usize> = house_cells(house)
            .into_iter()
            .filter(|&c| ctx.empty.contains(c) && ctx.candidates(c).len() <= size)
            .collect();
        if open.len() < size {
            continue;
        }
        for combo in combinations(&open, size) {
            let mut digits = DigitSet::empty();
            for &cell in &combo {
                digits = digits.union(&ctx.candidates(cell));
            }
            if digits.len() != size {
                continue;
            }
            let cells: CellMap = combo.iter().copied().collect();
            let mut conclusions = Vec::new();
            for other in ctx.topo.house_map[house].difference(&cells).iter() {
                if !ctx.empty.contains(other) {
                    continue;
                }
                for digit in ctx.candidates(other).intersect(&digits).iter() {
                    conclusions.push(Conclusion::Eliminate {
                        pos: Position::from_index(other),
                        digit,
                    });
                }
            }
            if conclusions.is_empty() {
                continue;
            }
            let step = Step::new(
                naked_technique(size),
                StepKind::Subset {
                    house,
                    cells,
                    digits,
                    hidden: false,
                },
                conclusions,
                vec![View::Cells(cells), View::Houses(vec![house])],
            );
            if ctx.emit(step) {
                return;
            }
        }
    }
}

/// N digits confined to N cells of a house: every other candidate leaves
/// those cells.
fn find_hidden(ctx: &mut AnalysisContext, size: usize) {
    for house in 0..27 {
        let open_count = ctx.topo.house_map[house].intersect(&ctx.empty).len();
        // A hidden subset of all open cells is just the naked complement.
        if open_count <= size {
            continue;
        }
        let live: Vec<usize> = (1..=9u8)
            .filter(|&d| {
                let n = ctx.house_digit(house, d).len();
                n >= 2 && n <= size
            })
            .map(|d| d as usize)
            .collect();
        if live.len() < size {
            continue;
        }
        for combo in combinations(&live, size) {
            let mut cells = CellMap::empty();
            let mut digits = DigitSet::empty();
            for &d in &combo {
                digits.insert(d as u8);
                cells = cells.union(&ctx.house_digit(house, d as u8));
            }
            if cells.len() != size {
                continue;
            }
            let mut conclusions = Vec::new();
            for cell in cells.iter() {
                for digit in ctx.candidates(cell).difference(&digits).iter() {
                    conclusions.push(Conclusion::Eliminate {
                        pos: Position::from_index(cell),
                        digit,
                    });
                }
            }
            if conclusions.is_empty() {
                continue;
            }
            let step = Step::new(
                hidden_technique(size),
                StepKind::Subset {
                    house,
                    cells,
                    digits,
                    hidden: true,
                },
                conclusions,
                vec![View::Cells(cells), View::Houses(vec![house])],
            );
            if ctx.emit(step) {
                return;
            }
        }
    }
}

pub(crate) fn find_naked_pairs(ctx: &mut AnalysisContext) {
    find_naked(ctx, 2);
}

pub(crate) fn find_naked_triples(ctx: &mut AnalysisContext) {
    find_naked(ctx, 3);
}

pub(crate) fn find_naked_quads(ctx: &mut AnalysisContext) {
    find_naked(ctx, 4);
}

pub(crate) fn find_hidden_pairs(ctx: &mut AnalysisContext) {
    find_hidden(ctx, 2);
}

pub(crate) fn find_hidden_triples(ctx: &mut AnalysisContext) {
    find_hidden(ctx, 3);
}

pub(crate) fn find_hidden_quads(ctx: &mut AnalysisContext) {
    find_hidden(ctx, 4);
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

    #[test]
    fn test_naked_pair_in_row() {
        // Row 1: givens leave r1c1/r1c2 with {1,2} and r1c9 with {1,2,3}.
        let mut grid = Grid::empty();
        for (col, digit) in [(2, 4), (3, 5), (4, 6), (5, 7), (6, 8), (7, 9)] {
            grid.set_given(Position::new(0, col), digit);
        }
        // A 3 at r2c1 strips 3 from r1c1 (column) and r1c2 (box).
        grid.set_given(Position::new(1, 0), 3);
        grid.recalculate_candidates();
        assert_eq!(grid.candidates(Position::new(0, 0)).len(), 2);
        assert_eq!(grid.candidates(Position::new(0, 1)).len(), 2);

        let steps = all_steps(&grid, find_naked_pairs);
        let step = steps
            .iter()
            .find(|s| {
                matches!(&s.kind, StepKind::Subset { house: 0, cells, .. }
                    if cells.contains(0) && cells.contains(1))
            })
            .expect("naked pair in row 1");
        assert!(step.conclusions.contains(&Conclusion::Eliminate {
            pos: Position::new(0, 8),
            digit: 1,
        }));
        assert!(step.conclusions.contains(&Conclusion::Eliminate {
            pos: Position::new(0, 8),
            digit: 2,
        }));
    }

    #[test]
    fn test_hidden_pair_in_row() {
        // In row 1, digits 1 and 2 are excluded from all cells but
        // r1c1/r1c2 by placements in the other two row-1 boxes and in the
        // columns; the pair {1,2} is hidden behind wider candidate masks.
        let mut grid = Grid::empty();
        grid.set_given(Position::new(1, 3), 1);
        grid.set_given(Position::new(2, 6), 1);
        grid.set_given(Position::new(4, 2), 1);
        grid.set_given(Position::new(1, 6), 2);
        grid.set_given(Position::new(2, 3), 2);
        grid.set_given(Position::new(7, 2), 2);
        grid.recalculate_candidates();

        let steps = all_steps(&grid, find_hidden_pairs);
        let step = steps
            .iter()
            .find(|s| {
                matches!(&s.kind, StepKind::Subset { house: 0, digits, hidden: true, .. }
                    if digits.contains(1) && digits.contains(2))
            })
            .expect("hidden pair in row 1");
        // Cells r1c1/r1c2 lose everything except 1 and 2.
        for conclusion in &step.conclusions {
            assert!(conclusion.pos().row == 0 && conclusion.pos().col < 3);
            assert!(conclusion.digit() > 2);
        }
    }

    #[test]
    fn test_no_subsets_on_empty_grid() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        for run in [
            find_naked_pairs,
            find_naked_triples,
            find_naked_quads,
            find_hidden_pairs,
            find_hidden_triples,
            find_hidden_quads,
        ] as [fn(&mut AnalysisContext); 6]
        {
            assert!(all_steps(&grid, run).is_empty());
        }
    }
}
