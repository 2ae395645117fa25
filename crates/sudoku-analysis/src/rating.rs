//! Difficulty rating: per-technique base values plus composable factors.
//!
//! A step's total rating is `base + sum(factor)` over the factors declared
//! for its technique family. Factors are stateless functions of the step's
//! own fields and never read other factors' results, so the sum is
//! deterministic and order-independent.

use serde::{Deserialize, Serialize};

use crate::step::{Step, StepKind, Technique};

/// Ratings are integer tenths on the familiar explainer-style scale
/// (a rating of 23 prints as 2.3).
pub type Rating = i32;

/// Base difficulty of a technique family, before factor adjustments.
pub fn base_rating(technique: Technique) -> Rating {
    use Technique::*;
    match technique {
        HiddenSingle => 15,
        NakedSingle => 23,
        PointingPair => 26,
        BoxLineReduction => 28,
        NakedPair | NakedTriple | NakedQuad => 30,
        HiddenPair | HiddenTriple | HiddenQuad => 34,
        XWing | Swordfish | Jellyfish | FinnedXWing | FinnedSwordfish | FinnedJellyfish => 32,
        XYWing => 42,
        XYZWing => 44,
        WWing => 44,
        XChain => 45,
        UniqueRectangle => 46,
        AlsXz => 55,
        BivalueUniversalGrave => 56,
        AlternatingInferenceChain => 60,
    }
}

/// A named, stateless scoring rule. `eval` returns `None` when the factor
/// does not apply to the step's runtime shape.
pub struct Factor {
    pub name: &'static str,
    pub eval: fn(&Step) -> Option<Rating>,
}

fn subset_size(step: &Step) -> Option<Rating> {
    match &step.kind {
        StepKind::Subset { cells, .. } => Some((cells.len() as Rating - 2) * 6),
        _ => None,
    }
}

fn fish_size(step: &Step) -> Option<Rating> {
    match &step.kind {
        StepKind::Fish { size, .. } => Some((*size as Rating - 2) * 6),
        _ => None,
    }
}

fn fish_fins(step: &Step) -> Option<Rating> {
    match &step.kind {
        StepKind::Fish { fins, .. } if !fins.is_empty() => Some(2),
        _ => None,
    }
}

fn chain_length(step: &Step) -> Option<Rating> {
    match &step.kind {
        StepKind::Chain { nodes } => Some((nodes.len().saturating_sub(4) / 2) as Rating),
        _ => None,
    }
}

fn uniqueness_roof(step: &Step) -> Option<Rating> {
    match &step.kind {
        StepKind::Uniqueness { roof, .. } if roof.len() > 2 => Some(roof.len() as Rating - 2),
        _ => None,
    }
}

fn als_size(step: &Step) -> Option<Rating> {
    match &step.kind {
        StepKind::Als { set_a, set_b, .. } => {
            Some((set_a.len() + set_b.len()).saturating_sub(3) as Rating)
        }
        _ => None,
    }
}

static SUBSET_FACTORS: &[Factor] = &[Factor {
    name: "subset size",
    eval: subset_size,
}];

static FISH_FACTORS: &[Factor] = &[
    Factor {
        name: "fish size",
        eval: fish_size,
    },
    Factor {
        name: "fins",
        eval: fish_fins,
    },
];

static CHAIN_FACTORS: &[Factor] = &[Factor {
    name: "chain length",
    eval: chain_length,
}];

static UNIQUENESS_FACTORS: &[Factor] = &[Factor {
    name: "roof candidates",
    eval: uniqueness_roof,
}];

static ALS_FACTORS: &[Factor] = &[Factor {
    name: "set size",
    eval: als_size,
}];

/// Factors declared for a technique. Singles, intersections, and wings
/// carry none; their base value is the whole rating.
pub fn factors_for(technique: Technique) -> &'static [Factor] {
    use Technique::*;
    match technique {
        NakedPair | HiddenPair | NakedTriple | HiddenTriple | NakedQuad | HiddenQuad => {
            SUBSET_FACTORS
        }
        XWing | FinnedXWing | Swordfish | FinnedSwordfish | Jellyfish | FinnedJellyfish => {
            FISH_FACTORS
        }
        XChain | AlternatingInferenceChain => CHAIN_FACTORS,
        UniqueRectangle | BivalueUniversalGrave => UNIQUENESS_FACTORS,
        AlsXz => ALS_FACTORS,
        _ => &[],
    }
}

impl Step {
    /// Total difficulty: base plus every applicable factor.
    pub fn rating(&self) -> Rating {
        let base = base_rating(self.technique);
        let adjust: Rating = factors_for(self.technique)
            .iter()
            .filter_map(|f| (f.eval)(self))
            .sum();
        base + adjust
    }
}

/// Difficulty tier of a whole puzzle, derived from the hardest step on its
/// solve path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Intermediate,
    Hard,
    Expert,
    Master,
    Extreme,
}

impl Difficulty {
    /// Highest step rating admitted at this tier.
    pub fn max_rating(&self) -> Rating {
        match self {
            Difficulty::Beginner => 15,
            Difficulty::Easy => 25,
            Difficulty::Medium => 29,
            Difficulty::Intermediate => 39,
            Difficulty::Hard => 45,
            Difficulty::Expert => 55,
            Difficulty::Master => 70,
            Difficulty::Extreme => Rating::MAX,
        }
    }

    /// Tier containing a given rating.
    pub fn from_rating(rating: Rating) -> Self {
        [
            Difficulty::Beginner,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Intermediate,
            Difficulty::Hard,
            Difficulty::Expert,
            Difficulty::Master,
        ]
        .into_iter()
        .find(|tier| rating <= tier.max_rating())
        .unwrap_or(Difficulty::Extreme)
    }

    pub fn all_levels() -> &'static [Difficulty] {
        &[
            Difficulty::Beginner,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Intermediate,
            Difficulty::Hard,
            Difficulty::Expert,
            Difficulty::Master,
            Difficulty::Extreme,
        ]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Master => "Master",
            Difficulty::Extreme => "Extreme",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::{CellMap, DigitSet};
    use crate::step::Conclusion;
    use crate::Position;

    fn subset_step(size: usize, hidden: bool) -> Step {
        let cells: CellMap = (0..size).collect();
        let digits: DigitSet = (1..=size as u8).collect();
        Step::new(
            match (size, hidden) {
                (2, false) => Technique::NakedPair,
                (3, false) => Technique::NakedTriple,
                (4, false) => Technique::NakedQuad,
                (2, true) => Technique::HiddenPair,
                (3, true) => Technique::HiddenTriple,
                _ => Technique::HiddenQuad,
            },
            StepKind::Subset {
                house: 0,
                cells,
                digits,
                hidden,
            },
            vec![Conclusion::Eliminate {
                pos: Position::new(0, 5),
                digit: 1,
            }],
            vec![],
        )
    }

    #[test]
    fn test_subset_rating_scales_with_size() {
        assert_eq!(subset_step(2, false).rating(), 30);
        assert_eq!(subset_step(3, false).rating(), 36);
        assert_eq!(subset_step(4, false).rating(), 42);
        assert_eq!(subset_step(2, true).rating(), 34);
        assert_eq!(subset_step(4, true).rating(), 46);
    }

    #[test]
    fn test_fish_rating_fins() {
        let base = Step::new(
            Technique::Swordfish,
            StepKind::Fish {
                digit: 5,
                size: 3,
                base_houses: vec![0, 1, 2],
                cover_houses: vec![9, 10, 11],
                fins: CellMap::empty(),
            },
            vec![Conclusion::Eliminate {
                pos: Position::new(4, 0),
                digit: 5,
            }],
            vec![],
        );
        assert_eq!(base.rating(), 38);

        let mut fins = CellMap::empty();
        fins.insert(40);
        let finned = Step::new(
            Technique::FinnedSwordfish,
            StepKind::Fish {
                digit: 5,
                size: 3,
                base_houses: vec![0, 1, 2],
                cover_houses: vec![9, 10, 11],
                fins,
            },
            vec![Conclusion::Eliminate {
                pos: Position::new(4, 0),
                digit: 5,
            }],
            vec![],
        );
        assert_eq!(finned.rating(), 40);
    }

    #[test]
    fn test_singles_have_no_factors() {
        assert!(factors_for(Technique::NakedSingle).is_empty());
        assert!(factors_for(Technique::PointingPair).is_empty());
    }

    #[test]
    fn test_difficulty_tiers() {
        assert_eq!(Difficulty::from_rating(15), Difficulty::Beginner);
        assert_eq!(Difficulty::from_rating(23), Difficulty::Easy);
        assert_eq!(Difficulty::from_rating(30), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_rating(46), Difficulty::Expert);
        assert_eq!(Difficulty::from_rating(100), Difficulty::Extreme);
        assert!(Difficulty::Beginner < Difficulty::Extreme);
    }
}
