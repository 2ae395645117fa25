//! Deadly-pattern deductions: Unique Rectangle types 1 and 2, BUG+1.
//!
//! These searchers assume the puzzle has exactly one solution; the
//! analysis pipeline guarantees that by brute-force pre-validation before
//! any pass runs.

use super::AnalysisContext;
use crate::bitset::{CellMap, DigitSet};
use crate::grid::Position;
use crate::step::{Conclusion, Step, StepKind, Technique, View};

/// Four open cells on two rows and two columns spanning exactly two boxes.
/// If all four could be reduced to the same two digits, the solution could
/// swap them and stay valid, so some corner must break the pattern.
pub(crate) fn find_unique_rectangles(ctx: &mut AnalysisContext) {
    for r1 in 0..8 {
        for r2 in (r1 + 1)..9 {
            for c1 in 0..8 {
                for c2 in (c1 + 1)..9 {
                    let corners = [
                        Position::new(r1, c1),
                        Position::new(r1, c2),
                        Position::new(r2, c1),
                        Position::new(r2, c2),
                    ];
                    if corners.iter().any(|p| !ctx.empty.contains(p.index())) {
                        continue;
                    }
                    let mut boxes: Vec<usize> = corners.iter().map(|p| p.box_index()).collect();
                    boxes.sort_unstable();
                    boxes.dedup();
                    if boxes.len() != 2 {
                        continue;
                    }
                    if check_rectangle(ctx, &corners) {
                        return;
                    }
                }
            }
        }
    }
}

fn check_rectangle(ctx: &mut AnalysisContext, corners: &[Position; 4]) -> bool {
    let masks: Vec<DigitSet> = corners.iter().map(|p| ctx.candidates(p.index())).collect();

    // Type 1: three corners reduced to the same pair, fourth still wider.
    for extra in 0..4 {
        let others: Vec<usize> = (0..4).filter(|&i| i != extra).collect();
        let pair = masks[others[0]];
        if pair.len() != 2
            || others.iter().any(|&i| masks[i] != pair)
            || masks[extra].len() <= 2
            || !pair.is_subset_of(&masks[extra])
        {
            continue;
        }
        let conclusions: Vec<Conclusion> = pair
            .iter()
            .map(|digit| Conclusion::Eliminate {
                pos: corners[extra],
                digit,
            })
            .collect();
        let floor: CellMap = others.iter().map(|&i| corners[i].index()).collect();
        let roof: CellMap = [corners[extra].index()].into_iter().collect();
        let step = Step::new(
            Technique::UniqueRectangle,
            StepKind::Uniqueness {
                floor,
                roof,
                digits: pair,
            },
            conclusions,
            vec![View::Cells(floor.union(&roof))],
        );
        if ctx.emit(step) {
            return true;
        }
    }

    // Type 2: one side reduced to the pair, the opposite side carrying the
    // same single extra digit, which then leaves every cell seeing both
    // roof corners.
    for (floor_idx, roof_idx) in [([0, 1], [2, 3]), ([2, 3], [0, 1]), ([0, 2], [1, 3]), ([1, 3], [0, 2])]
    {
        let pair = masks[floor_idx[0]];
        if pair.len() != 2 || masks[floor_idx[1]] != pair {
            continue;
        }
        let roof_mask = masks[roof_idx[0]];
        if roof_mask != masks[roof_idx[1]]
            || roof_mask.len() != 3
            || !pair.is_subset_of(&roof_mask)
        {
            continue;
        }
        let Some(z) = roof_mask.difference(&pair).only_digit() else {
            continue;
        };
        let (ra, rb) = (corners[roof_idx[0]].index(), corners[roof_idx[1]].index());
        let victims = ctx
            .topo
            .common_peers(ra, rb)
            .intersect(&ctx.digit_cells[(z - 1) as usize]);
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
        let floor: CellMap = floor_idx.iter().map(|&i| corners[i].index()).collect();
        let roof: CellMap = [ra, rb].into_iter().collect();
        let step = Step::new(
            Technique::UniqueRectangle,
            StepKind::Uniqueness {
                floor,
                roof,
                digits: pair,
            },
            conclusions,
            vec![View::Cells(floor.union(&roof))],
        );
        if ctx.emit(step) {
            return true;
        }
    }
    false
}

/// Bivalue Universal Grave + 1: every open cell bivalue except a single
/// trivalue cell. Leaving the odd digit out would complete a deadly
/// multi-solution pattern, so that digit is the cell's value.
pub(crate) fn find_bug_plus_one(ctx: &mut AnalysisContext) {
    let mut odd_cell = None;
    for cell in ctx.empty.iter() {
        match ctx.candidates(cell).len() {
            2 => {}
            3 if odd_cell.is_none() => odd_cell = Some(cell),
            _ => return,
        }
    }
    let Some(cell) = odd_cell else {
        return;
    };

    // The surviving digit is the one whose removal leaves a pure BUG.
    let digit = ctx
        .candidates(cell)
        .iter()
        .find(|&d| leaves_pure_bug(ctx, cell, d));
    let Some(digit) = digit else {
        return;
    };

    let pos = Position::from_index(cell);
    let step = Step::new(
        Technique::BivalueUniversalGrave,
        StepKind::Uniqueness {
            floor: ctx.bivalue,
            roof: [cell].into_iter().collect(),
            digits: ctx.candidates(cell),
        },
        vec![Conclusion::Assign { pos, digit }],
        vec![View::Cells([cell].into_iter().collect())],
    );
    ctx.emit(step);
}

/// True when dropping `digit` from `cell` turns the whole grid into a pure
/// BUG: every remaining candidate digit has exactly two spots in every
/// house it appears in. A local three-count near the odd cell is not
/// enough; a digit crowding any other house breaks the argument.
fn leaves_pure_bug(ctx: &AnalysisContext, cell: usize, digit: u8) -> bool {
    for house in 0..27 {
        let holds_cell = ctx.topo.house_map[house].contains(cell);
        for d in 1..=9u8 {
            let mut spots = ctx.house_digit(house, d).len();
            if holds_cell && d == digit {
                spots -= 1;
            }
            if spots != 0 && spots != 2 {
                return false;
            }
        }
    }
    true
}
