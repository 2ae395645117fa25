//! Step model: a deduced change plus the rationale behind it.
//!
//! Searchers produce immutable [`Step`]s; applying their conclusions to a
//! grid is the analysis pipeline's responsibility.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bitset::{CandidateMap, CellMap, DigitSet};
use crate::grid::{house_name, Grid, Position};

/// One atomic deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conclusion {
    /// Assign `digit` to the cell.
    Assign { pos: Position, digit: u8 },
    /// Remove `digit` from the cell's candidates.
    Eliminate { pos: Position, digit: u8 },
}

impl Conclusion {
    pub fn pos(&self) -> Position {
        match self {
            Conclusion::Assign { pos, .. } | Conclusion::Eliminate { pos, .. } => *pos,
        }
    }

    pub fn digit(&self) -> u8 {
        match self {
            Conclusion::Assign { digit, .. } | Conclusion::Eliminate { digit, .. } => *digit,
        }
    }

    /// Apply this conclusion to a grid. Assignments retract peer candidates
    /// via [`Grid::set_digit`]; eliminations only touch the named cell.
    pub fn apply(&self, grid: &mut Grid) {
        match *self {
            Conclusion::Assign { pos, digit } => grid.set_digit(pos, digit),
            Conclusion::Eliminate { pos, digit } => grid.cell_mut(pos).remove_candidate(digit),
        }
    }

    /// True when the conclusion is consistent with the grid's current
    /// candidate state (assigning a live candidate / eliminating one).
    pub fn is_consistent_with(&self, grid: &Grid) -> bool {
        let pos = self.pos();
        grid.value(pos).is_none() && grid.candidates(pos).contains(self.digit())
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::Assign { pos, digit } => write!(f, "{}={}", pos, digit),
            Conclusion::Eliminate { pos, digit } => write!(f, "{}<>{}", pos, digit),
        }
    }
}

/// Highlight annotation attached to a step. Opaque to the core; consumed
/// only by rendering layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Cells(CellMap),
    Candidates(CandidateMap),
    Houses(Vec<usize>),
}

/// Solving technique (ordered by difficulty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technique {
    // Singles
    HiddenSingle,
    NakedSingle,

    // Subsets
    NakedPair,
    HiddenPair,
    NakedTriple,
    HiddenTriple,
    NakedQuad,
    HiddenQuad,

    // Intersections
    PointingPair,
    BoxLineReduction,

    // Fish
    XWing,
    FinnedXWing,
    Swordfish,
    FinnedSwordfish,
    Jellyfish,
    FinnedJellyfish,

    // Uniqueness / deadly patterns
    UniqueRectangle,
    BivalueUniversalGrave,

    // Wings
    XYWing,
    XYZWing,
    WWing,

    // Chains
    XChain,
    AlternatingInferenceChain,

    // Exotic structures
    AlsXz,
}

/// Technique category, mirroring the searcher registry grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Singles,
    Subsets,
    Intersections,
    Fish,
    Uniqueness,
    Wings,
    Chains,
    Als,
}

impl Technique {
    pub fn category(&self) -> Category {
        use Technique::*;
        match self {
            NakedSingle | HiddenSingle => Category::Singles,
            NakedPair | HiddenPair | NakedTriple | HiddenTriple | NakedQuad | HiddenQuad => {
                Category::Subsets
            }
            PointingPair | BoxLineReduction => Category::Intersections,
            XWing | FinnedXWing | Swordfish | FinnedSwordfish | Jellyfish | FinnedJellyfish => {
                Category::Fish
            }
            UniqueRectangle | BivalueUniversalGrave => Category::Uniqueness,
            XYWing | XYZWing | WWing => Category::Wings,
            XChain | AlternatingInferenceChain => Category::Chains,
            AlsXz => Category::Als,
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technique::NakedSingle => "Naked Single",
            Technique::HiddenSingle => "Hidden Single",
            Technique::NakedPair => "Naked Pair",
            Technique::HiddenPair => "Hidden Pair",
            Technique::NakedTriple => "Naked Triple",
            Technique::HiddenTriple => "Hidden Triple",
            Technique::NakedQuad => "Naked Quad",
            Technique::HiddenQuad => "Hidden Quad",
            Technique::PointingPair => "Pointing Pair",
            Technique::BoxLineReduction => "Box/Line Reduction",
            Technique::XWing => "X-Wing",
            Technique::FinnedXWing => "Finned X-Wing",
            Technique::Swordfish => "Swordfish",
            Technique::FinnedSwordfish => "Finned Swordfish",
            Technique::Jellyfish => "Jellyfish",
            Technique::FinnedJellyfish => "Finned Jellyfish",
            Technique::UniqueRectangle => "Unique Rectangle",
            Technique::BivalueUniversalGrave => "BUG+1",
            Technique::XYWing => "XY-Wing",
            Technique::XYZWing => "XYZ-Wing",
            Technique::WWing => "W-Wing",
            Technique::XChain => "X-Chain",
            Technique::AlternatingInferenceChain => "AIC",
            Technique::AlsXz => "ALS-XZ",
        };
        f.write_str(name)
    }
}

/// Technique-family payload carried by a step; factors read these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    /// Naked or hidden single; `house` set for hidden singles.
    Single {
        pos: Position,
        digit: u8,
        house: Option<usize>,
    },
    /// Locked set of N cells holding N digits in one house.
    Subset {
        house: usize,
        cells: CellMap,
        digits: DigitSet,
        hidden: bool,
    },
    /// Digit confined to the base/cover house intersection.
    Intersection {
        digit: u8,
        base_house: usize,
        cover_house: usize,
    },
    /// Fish pattern over one digit.
    Fish {
        digit: u8,
        size: usize,
        base_houses: Vec<usize>,
        cover_houses: Vec<usize>,
        fins: CellMap,
    },
    /// Bent triple: pivot plus pincer cells.
    Wing {
        pivot: Position,
        pincers: CellMap,
        digit: u8,
    },
    /// Deadly-pattern deduction relying on solution uniqueness.
    Uniqueness {
        floor: CellMap,
        roof: CellMap,
        digits: DigitSet,
    },
    /// Alternating inference chain as (cell, digit) nodes.
    Chain { nodes: Vec<(usize, u8)> },
    /// Two almost-locked sets linked by a restricted common candidate.
    Als {
        set_a: CellMap,
        set_b: CellMap,
        restricted: u8,
        z: u8,
    },
}

/// An immutable record produced by a step searcher: a non-empty list of
/// conclusions, view annotations, and the technique identity + payload the
/// factor system rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub technique: Technique,
    pub kind: StepKind,
    pub conclusions: Vec<Conclusion>,
    pub views: Vec<View>,
}

impl Step {
    pub fn new(
        technique: Technique,
        kind: StepKind,
        conclusions: Vec<Conclusion>,
        views: Vec<View>,
    ) -> Self {
        debug_assert!(!conclusions.is_empty());
        Self {
            technique,
            kind,
            conclusions,
            views,
        }
    }

    /// De-duplication key: technique identity plus the conclusion set.
    pub fn dedup_key(&self) -> (Technique, Vec<Conclusion>) {
        let mut conclusions = self.conclusions.clone();
        conclusions.sort_unstable();
        conclusions.dedup();
        (self.technique, conclusions)
    }

    /// Apply every conclusion to the grid.
    pub fn apply(&self, grid: &mut Grid) {
        for conclusion in &self.conclusions {
            conclusion.apply(grid);
        }
    }

    /// Human-readable one-line description.
    pub fn describe(&self) -> String {
        let conclusions: Vec<String> = self.conclusions.iter().map(|c| c.to_string()).collect();
        match &self.kind {
            StepKind::Single {
                house: Some(house), ..
            } => format!(
                "{} in {}: {}",
                self.technique,
                house_name(*house),
                conclusions.join(", ")
            ),
            StepKind::Subset { house, digits, .. } => {
                let ds: Vec<String> = digits.iter().map(|d| d.to_string()).collect();
                format!(
                    "{} {{{}}} in {}: {}",
                    self.technique,
                    ds.join(""),
                    house_name(*house),
                    conclusions.join(", ")
                )
            }
            StepKind::Intersection {
                digit,
                base_house,
                cover_house,
            } => format!(
                "{} on {} ({} -> {}): {}",
                self.technique,
                digit,
                house_name(*base_house),
                house_name(*cover_house),
                conclusions.join(", ")
            ),
            StepKind::Fish {
                digit,
                base_houses,
                cover_houses,
                ..
            } => {
                let bases: Vec<String> = base_houses.iter().map(|&h| house_name(h)).collect();
                let covers: Vec<String> = cover_houses.iter().map(|&h| house_name(h)).collect();
                format!(
                    "{} on {} ({} / {}): {}",
                    self.technique,
                    digit,
                    bases.join(""),
                    covers.join(""),
                    conclusions.join(", ")
                )
            }
            StepKind::Chain { nodes } => format!(
                "{} ({} nodes): {}",
                self.technique,
                nodes.len(),
                conclusions.join(", ")
            ),
            _ => format!("{}: {}", self.technique, conclusions.join(", ")),
        }
    }
}

/// Steps are equal when their technique and conclusion sets match; views
/// and payload details do not participate.
impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.dedup_key() == other.dedup_key()
    }
}

impl Eq for Step {}

#[cfg(test)]
mod tests {
    use super::*;

    fn elim(idx: usize, digit: u8) -> Conclusion {
        Conclusion::Eliminate {
            pos: Position::from_index(idx),
            digit,
        }
    }

    #[test]
    fn test_conclusion_apply() {
        let mut grid = Grid::empty();
        grid.recalculate_candidates();
        Conclusion::Assign {
            pos: Position::new(0, 0),
            digit: 7,
        }
        .apply(&mut grid);
        assert_eq!(grid.value(Position::new(0, 0)), Some(7));
        assert!(!grid.candidates(Position::new(0, 8)).contains(7));

        elim(10, 3).apply(&mut grid);
        assert!(!grid.candidates(Position::from_index(10)).contains(3));
    }

    #[test]
    fn test_step_equality_ignores_views_and_order() {
        let kind = StepKind::Intersection {
            digit: 4,
            base_house: 18,
            cover_house: 0,
        };
        let a = Step::new(
            Technique::PointingPair,
            kind.clone(),
            vec![elim(3, 4), elim(4, 4)],
            vec![],
        );
        let b = Step::new(
            Technique::PointingPair,
            kind,
            vec![elim(4, 4), elim(3, 4)],
            vec![View::Houses(vec![18])],
        );
        assert_eq!(a, b);

        let c = Step::new(
            Technique::BoxLineReduction,
            StepKind::Intersection {
                digit: 4,
                base_house: 0,
                cover_house: 18,
            },
            vec![elim(3, 4), elim(4, 4)],
            vec![],
        );
        assert_ne!(a, c);
    }

    #[test]
    fn test_technique_categories() {
        assert_eq!(Technique::NakedSingle.category(), Category::Singles);
        assert_eq!(Technique::FinnedJellyfish.category(), Category::Fish);
        assert_eq!(Technique::AlsXz.category(), Category::Als);
    }
}
