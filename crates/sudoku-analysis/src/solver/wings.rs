//! Bent triples: XY-Wing, XYZ-Wing, and W-Wing.

use super::AnalysisContext;
use crate::bitset::CellMap;
use crate::grid::Position;
use crate::step::{Conclusion, Step, StepKind, Technique, View};

fn eliminate_all(ctx: &AnalysisContext, cells: CellMap, digit: u8) -> Vec<Conclusion> {
    cells
        .intersect(&ctx.digit_cells[(digit - 1) as usize])
        .iter()
        .map(|cell| Conclusion::Eliminate {
            pos: Position::from_index(cell),
            digit,
        })
        .collect()
}

/// Bivalue pivot {x,y} with bivalue pincers {x,z} and {y,z}: z leaves every
/// cell seeing both pincers.
pub(crate) fn find_xy_wings(ctx: &mut AnalysisContext) {
    for pivot in ctx.bivalue.iter() {
        let pivot_digits = ctx.candidates(pivot);
        let peers: Vec<usize> = ctx.bivalue.intersect(&ctx.topo.peer_map[pivot]).iter().collect();
        for (i, &p1) in peers.iter().enumerate() {
            let c1 = ctx.candidates(p1);
            if c1 == pivot_digits || c1.intersect(&pivot_digits).len() != 1 {
                continue;
            }
            for &p2 in &peers[i + 1..] {
                let c2 = ctx.candidates(p2);
                if c2 == pivot_digits || c2 == c1 {
                    continue;
                }
                let Some(z) = c1.intersect(&c2).only_digit() else {
                    continue;
                };
                if pivot_digits.contains(z)
                    || c1.union(&c2).union(&pivot_digits).len() != 3
                {
                    continue;
                }
                let conclusions = eliminate_all(ctx, ctx.topo.common_peers(p1, p2), z);
                if conclusions.is_empty() {
                    continue;
                }
                let pincers: CellMap = [p1, p2].into_iter().collect();
                let step = Step::new(
                    Technique::XYWing,
                    StepKind::Wing {
                        pivot: Position::from_index(pivot),
                        pincers,
                        digit: z,
                    },
                    conclusions,
                    vec![View::Cells(pincers.union(&[pivot].into_iter().collect()))],
                );
                if ctx.emit(step) {
                    return;
                }
            }
        }
    }
}

/// Trivalue pivot {x,y,z} with pincers {x,z} and {y,z}: z leaves every cell
/// seeing all three.
pub(crate) fn find_xyz_wings(ctx: &mut AnalysisContext) {
    for pivot in ctx.empty.iter() {
        let pivot_digits = ctx.candidates(pivot);
        if pivot_digits.len() != 3 {
            continue;
        }
        let peers: Vec<usize> = ctx.bivalue.intersect(&ctx.topo.peer_map[pivot]).iter().collect();
        for (i, &p1) in peers.iter().enumerate() {
            let c1 = ctx.candidates(p1);
            if !c1.is_subset_of(&pivot_digits) {
                continue;
            }
            for &p2 in &peers[i + 1..] {
                let c2 = ctx.candidates(p2);
                if c2 == c1 || !c2.is_subset_of(&pivot_digits) {
                    continue;
                }
                let Some(z) = c1.intersect(&c2).only_digit() else {
                    continue;
                };
                let seen_by_all = ctx
                    .topo
                    .common_peers(p1, p2)
                    .intersect(&ctx.topo.peer_map[pivot]);
                let conclusions = eliminate_all(ctx, seen_by_all, z);
                if conclusions.is_empty() {
                    continue;
                }
                let pincers: CellMap = [p1, p2].into_iter().collect();
                let step = Step::new(
                    Technique::XYZWing,
                    StepKind::Wing {
                        pivot: Position::from_index(pivot),
                        pincers,
                        digit: z,
                    },
                    conclusions,
                    vec![View::Cells(pincers.union(&[pivot].into_iter().collect()))],
                );
                if ctx.emit(step) {
                    return;
                }
            }
        }
    }
}

/// Two bivalue cells with the same {x,y} pair, joined by a strong link on
/// one of the digits: the other digit leaves their common peers.
pub(crate) fn find_w_wings(ctx: &mut AnalysisContext) {
    let bivalue: Vec<usize> = ctx.bivalue.iter().collect();
    for (i, &a) in bivalue.iter().enumerate() {
        let digits = ctx.candidates(a);
        for &b in &bivalue[i + 1..] {
            if ctx.candidates(b) != digits || ctx.topo.sees(a, b) {
                continue;
            }
            for link_digit in digits.iter() {
                let keep = digits.difference(&[link_digit].into_iter().collect());
                let Some(elim_digit) = keep.only_digit() else {
                    continue;
                };
                for house in 0..27 {
                    let spots = ctx.house_digit(house, link_digit);
                    if spots.len() != 2 || spots.contains(a) || spots.contains(b) {
                        continue;
                    }
                    let pair: Vec<usize> = spots.iter().collect();
                    let (s, t) = (pair[0], pair[1]);
                    let bridged = (ctx.topo.sees(s, a) && ctx.topo.sees(t, b))
                        || (ctx.topo.sees(s, b) && ctx.topo.sees(t, a));
                    if !bridged {
                        continue;
                    }
                    let conclusions =
                        eliminate_all(ctx, ctx.topo.common_peers(a, b), elim_digit);
                    if conclusions.is_empty() {
                        continue;
                    }
                    let pincers: CellMap = [b, s, t].into_iter().collect();
                    let step = Step::new(
                        Technique::WWing,
                        StepKind::Wing {
                            pivot: Position::from_index(a),
                            pincers,
                            digit: elim_digit,
                        },
                        conclusions,
                        vec![
                            View::Cells(pincers.union(&[a].into_iter().collect())),
                            View::Houses(vec![house]),
                        ],
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

    fn all_steps(grid: &Grid, run: fn(&mut AnalysisContext)) -> Vec<Step> {
        let options = AnalysisOptions::default();
        let mut ctx = AnalysisContext::new(grid, &options, SearchMode::AllSteps);
        run(&mut ctx);
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
    fn test_xy_wing() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        restrict(&mut grid, Position::new(0, 0), &[1, 2]);
        restrict(&mut grid, Position::new(0, 4), &[1, 3]);
        restrict(&mut grid, Position::new(4, 0), &[2, 3]);

        let steps = all_steps(&grid, find_xy_wings);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].technique, Technique::XYWing);
        assert_eq!(
            steps[0].conclusions,
            vec![Conclusion::Eliminate {
                pos: Position::new(4, 4),
                digit: 3,
            }]
        );
    }

    #[test]
    fn test_xyz_wing() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        restrict(&mut grid, Position::new(0, 0), &[1, 2, 3]);
        restrict(&mut grid, Position::new(0, 1), &[1, 3]);
        restrict(&mut grid, Position::new(0, 4), &[2, 3]);

        let steps = all_steps(&grid, find_xyz_wings);
        let step = steps
            .iter()
            .find(|s| s.technique == Technique::XYZWing)
            .expect("xyz-wing");
        // 3 leaves the rest of row 1.
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.digit(), 3);
            assert_eq!(conclusion.pos().row, 0);
            assert!(![0, 1, 4].contains(&conclusion.pos().col));
        }
        assert_eq!(step.conclusions.len(), 6);
    }

    #[test]
    fn test_w_wing() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        restrict(&mut grid, Position::new(0, 0), &[1, 2]);
        restrict(&mut grid, Position::new(2, 6), &[1, 2]);
        // Strong link on 2 in column 5: only r1c5 and r3c5 keep it.
        for row in 0..9 {
            if row != 0 && row != 2 {
                grid.cell_mut(Position::new(row, 4)).remove_candidate(2);
            }
        }

        let steps = all_steps(&grid, find_w_wings);
        let step = steps
            .iter()
            .find(|s| s.technique == Technique::WWing)
            .expect("w-wing");
        // 1 leaves the common peers of r1c1 and r3c7.
        assert!(!step.conclusions.is_empty());
        for conclusion in &step.conclusions {
            assert_eq!(conclusion.digit(), 1);
            let pos = conclusion.pos();
            assert!(
                (pos.row == 0 && pos.col >= 6)
                    || (pos.row == 2 && pos.col <= 2),
                "unexpected elimination at {}",
                pos
            );
        }
    }

    #[test]
    fn test_no_wings_on_empty_grid() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        assert!(all_steps(&grid, find_xy_wings).is_empty());
        assert!(all_steps(&grid, find_xyz_wings).is_empty());
        assert!(all_steps(&grid, find_w_wings).is_empty());
    }
}
