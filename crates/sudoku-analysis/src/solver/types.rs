//! Pipeline parameter and result types.

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::grid::{Grid, Position};
use crate::rating::{Difficulty, Rating};
use crate::step::{Step, Technique};

/// Per-pass search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop the pass at the first step found (solving / rating).
    FirstStep,
    /// Collect every step every searcher finds, applying none ("show all
    /// hints").
    AllSteps,
}

/// Caller-tunable knobs for one analysis invocation.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Techniques never emitted.
    pub excluded: Vec<Technique>,
    /// Steps rating above this tier's ceiling are suppressed.
    pub max_difficulty: Option<Difficulty>,
    /// Cooperative cancellation, checked at the top of each pass.
    pub cancel: Option<CancelToken>,
}

impl AnalysisOptions {
    pub fn is_excluded(&self, technique: Technique) -> bool {
        self.excluded.contains(&technique)
    }

    pub fn max_rating(&self) -> Rating {
        self.max_difficulty
            .map(|d| d.max_rating())
            .unwrap_or(Rating::MAX)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

/// Why a grid admits no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsolvableReason {
    /// The brute-force oracle proved zero solutions.
    NoSolution,
    /// A cell's candidate mask emptied without the cell being solved.
    Contradiction { pos: Position },
}

/// Outcome of a full analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisResult {
    /// Every cell solved; `steps` is the ordered deduction path.
    Solved { steps: Vec<Step>, solution: Grid },
    /// No registered searcher can progress but cells remain open. Distinct
    /// from `Unsolvable`: the puzzle may still have a solution beyond the
    /// registered techniques.
    Stuck { steps: Vec<Step>, remaining: Grid },
    Unsolvable { reason: UnsolvableReason },
    MultipleSolutions,
    Cancelled,
}

impl AnalysisResult {
    /// Puzzle rating: the maximum per-step difficulty across the solve
    /// path. `None` unless the grid was solved with at least one step.
    pub fn rating(&self) -> Option<Rating> {
        match self {
            AnalysisResult::Solved { steps, .. } => steps.iter().map(|s| s.rating()).max(),
            _ => None,
        }
    }

    /// Difficulty tier derived from [`AnalysisResult::rating`].
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.rating().map(Difficulty::from_rating)
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, AnalysisResult::Solved { .. })
    }
}
