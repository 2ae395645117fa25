//! Single-candidate placements.

use super::AnalysisContext;
use crate::grid::Position;
use crate::step::{Conclusion, Step, StepKind, Technique, View};

/// Cells whose candidate mask has collapsed to one digit.
pub(crate) fn find_naked_singles(ctx: &mut AnalysisContext) {
    for cell in ctx.empty.iter() {
        let Some(digit) = ctx.candidates(cell).only_digit() else {
            continue;
        };
        let pos = Position::from_index(cell);
        let step = Step::new(
            Technique::NakedSingle,
            StepKind::Single {
                pos,
                digit,
                house: None,
            },
            vec![Conclusion::Assign { pos, digit }],
            vec![View::Cells([cell].into_iter().collect())],
        );
        if ctx.emit(step) {
            return;
        }
    }
}

/// Digits with exactly one home left in some house.
pub(crate) fn find_hidden_singles(ctx: &mut AnalysisContext) {
    for house in 0..27 {
        for digit in 1..=9u8 {
            let spots = ctx.house_digit(house, digit);
            let Some(cell) = spots.only_cell() else {
                continue;
            };
            // A naked single in the same spot is the cheaper read.
            if ctx.candidates(cell).len() == 1 {
                continue;
            }
            let pos = Position::from_index(cell);
            let step = Step::new(
                Technique::HiddenSingle,
                StepKind::Single {
                    pos,
                    digit,
                    house: Some(house),
                },
                vec![Conclusion::Assign { pos, digit }],
                vec![View::Cells(spots), View::Houses(vec![house])],
            );
            if ctx.emit(step) {
                return;
            }
        }
    }
}
