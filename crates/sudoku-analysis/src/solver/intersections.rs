//! Locked candidates: box/line intersections.

use super::AnalysisContext;
use crate::grid::{Position, HOUSE_BOX_BASE};
use crate::step::{Conclusion, Step, StepKind, Technique, View};

/// Emit eliminations for a digit locked into the intersection of
/// `base_house` and `cover_house`: the digit leaves the rest of the cover.
fn emit_locked(
    ctx: &mut AnalysisContext,
    technique: Technique,
    digit: u8,
    base_house: usize,
    cover_house: usize,
) -> bool {
    let locked = ctx.house_digit(base_house, digit);
    let outside = ctx.house_digit(cover_house, digit).difference(&locked);
    if outside.is_empty() {
        return false;
    }
    let conclusions: Vec<Conclusion> = outside
        .iter()
        .map(|cell| Conclusion::Eliminate {
            pos: Position::from_index(cell),
            digit,
        })
        .collect();
    let step = Step::new(
        technique,
        StepKind::Intersection {
            digit,
            base_house,
            cover_house,
        },
        conclusions,
        vec![
            View::Cells(locked),
            View::Houses(vec![base_house, cover_house]),
        ],
    );
    ctx.emit(step)
}

/// Digit confined to one line within a box: it leaves the rest of the line.
pub(crate) fn find_pointing(ctx: &mut AnalysisContext) {
    for box_house in HOUSE_BOX_BASE..27 {
        for digit in 1..=9u8 {
            let spots = ctx.house_digit(box_house, digit);
            if spots.len() < 2 {
                continue;
            }
            let cells: Vec<usize> = spots.iter().collect();
            let lines = [ctx.topo.houses_of[cells[0]][0], ctx.topo.houses_of[cells[0]][1]];
            for line in lines {
                if cells.iter().all(|&c| ctx.topo.houses_of[c].contains(&line))
                    && emit_locked(ctx, Technique::PointingPair, digit, box_house, line)
                {
                    return;
                }
            }
        }
    }
}

/// Digit confined to one box within a line: it leaves the rest of the box.
pub(crate) fn find_box_line(ctx: &mut AnalysisContext) {
    for line in 0..HOUSE_BOX_BASE {
        for digit in 1..=9u8 {
            let spots = ctx.house_digit(line, digit);
            if spots.len() < 2 {
                continue;
            }
            let cells: Vec<usize> = spots.iter().collect();
            let box_house = ctx.topo.houses_of[cells[0]][2];
            if cells.iter().all(|&c| ctx.topo.houses_of[c][2] == box_house)
                && emit_locked(ctx, Technique::BoxLineReduction, digit, line, box_house)
            {
                return;
            }
        }
    }
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
    fn test_pointing_pair() {
        // Rows 2 and 3 of box 1 are filled, so 7 in box 1 is confined to
        // row 1 and must leave the rest of row 1.
        let mut grid = Grid::empty();
        for (idx, digit) in [(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
            .into_iter()
            .zip(1..=6u8)
        {
            grid.set_given(Position::new(idx.0, idx.1), digit);
        }
        grid.recalculate_candidates();

        let steps = all_steps(&grid, find_pointing);
        let step = steps
            .iter()
            .find(|s| {
                matches!(&s.kind, StepKind::Intersection { digit: 7, base_house: 18, cover_house: 0 })
            })
            .expect("pointing pair on 7 in box 1");
        // Eliminations land in row 1 outside box 1 and outside the 7s' own
        // columns.
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.pos().row, 0);
            assert!(conclusion.pos().col >= 3);
            assert_eq!(conclusion.digit(), 7);
        }
        assert!(!step.conclusions.is_empty());
    }

    #[test]
    fn test_box_line_reduction() {
        // In row 1, digit 4 is stripped from columns 4..9 by column givens,
        // confining it to the box-1 cells of the row.
        let mut grid = Grid::empty();
        grid.set_given(Position::new(3, 3), 4);
        grid.set_given(Position::new(4, 4), 4);
        grid.set_given(Position::new(5, 5), 4);
        grid.set_given(Position::new(6, 6), 4);
        grid.set_given(Position::new(7, 7), 4);
        grid.set_given(Position::new(8, 8), 4);
        grid.recalculate_candidates();

        let steps = all_steps(&grid, find_box_line);
        let step = steps
            .iter()
            .find(|s| {
                matches!(&s.kind, StepKind::Intersection { digit: 4, base_house: 0, cover_house: 18 })
            })
            .expect("box/line reduction on 4 in row 1");
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.digit(), 4);
            assert!(conclusion.pos().row > 0);
            assert!(conclusion.pos().col < 3);
        }
    }

    #[test]
    fn test_no_intersections_on_empty_grid() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        assert!(all_steps(&grid, find_pointing).is_empty());
        assert!(all_steps(&grid, find_box_line).is_empty());
    }
}
