//! Analysis pipeline: runs the registered step searchers against a grid,
//! applies the found steps, and reports how the solve went.

pub(crate) mod als;
pub(crate) mod chains;
pub(crate) mod fish;
pub(crate) mod intersections;
pub mod registry;
pub(crate) mod singles;
pub(crate) mod subsets;
mod types;
pub(crate) mod uniqueness;
pub(crate) mod wings;

use std::collections::HashSet;

use crate::bitset::CellMap;
use crate::brute_force::{self, Solutions};
use crate::grid::{Grid, Topology};
use crate::step::{Conclusion, Step, Technique};

pub use types::{AnalysisOptions, AnalysisResult, SearchMode, UnsolvableReason};

/// Per-pass parameter bundle handed to every searcher: the current grid,
/// shared read-only topology, per-pass candidate caches, and the step
/// accumulator. Valid only for the lifetime of one pass.
pub struct AnalysisContext<'a> {
    pub grid: &'a Grid,
    pub topo: &'static Topology,
    /// Open cells.
    pub empty: CellMap,
    /// Cells holding each digit as a candidate, indexed by digit - 1.
    pub digit_cells: [CellMap; 9],
    /// Open cells with exactly two candidates.
    pub bivalue: CellMap,
    mode: SearchMode,
    options: &'a AnalysisOptions,
    steps: Vec<Step>,
    seen: HashSet<(Technique, Vec<Conclusion>)>,
    stopped: bool,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(grid: &'a Grid, options: &'a AnalysisOptions, mode: SearchMode) -> Self {
        let topo = Topology::get();
        let empty = grid.empty_cells();
        let mut digit_cells = [CellMap::empty(); 9];
        let mut bivalue = CellMap::empty();
        for cell in empty.iter() {
            let cands = grid.cell(crate::grid::Position::from_index(cell)).candidates();
            for d in cands.iter() {
                digit_cells[(d - 1) as usize].insert(cell);
            }
            if cands.len() == 2 {
                bivalue.insert(cell);
            }
        }
        Self {
            grid,
            topo,
            empty,
            digit_cells,
            bivalue,
            mode,
            options,
            steps: Vec::new(),
            seen: HashSet::new(),
            stopped: false,
        }
    }

    /// Cells of `house` that hold `digit` as a candidate.
    #[inline]
    pub fn house_digit(&self, house: usize, digit: u8) -> CellMap {
        self.digit_cells[(digit - 1) as usize].intersect(&self.topo.house_map[house])
    }

    /// Candidate mask of a cell by linear index.
    #[inline]
    pub fn candidates(&self, cell: usize) -> crate::bitset::DigitSet {
        self.grid
            .cell(crate::grid::Position::from_index(cell))
            .candidates()
    }

    /// Record a found step. Returns `true` when the searcher should stop:
    /// either the pass is in first-step mode and a step was accepted, or a
    /// previous emit already ended the pass.
    ///
    /// Steps excluded by the options, above the difficulty ceiling, or
    /// duplicating an earlier emit in the same pass are dropped silently.
    pub fn emit(&mut self, step: Step) -> bool {
        if self.stopped {
            return true;
        }
        if self.options.is_excluded(step.technique) || step.rating() > self.options.max_rating() {
            return false;
        }
        debug_assert!(
            step.conclusions.iter().all(|c| c.is_consistent_with(self.grid)),
            "searcher emitted a conclusion inconsistent with the grid: {}",
            step.describe()
        );
        let key = step.dedup_key();
        if !self.seen.insert(key) {
            return false;
        }
        self.steps.push(step);
        if self.mode == SearchMode::FirstStep {
            self.stopped = true;
        }
        self.stopped
    }

    /// True once a first-step pass has found its step; searchers poll this
    /// in outer loops to cut scanning short.
    #[inline]
    pub fn done(&self) -> bool {
        self.stopped
    }

    fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

/// Enumerate k-element combinations of `items`, in lexicographic order.
pub(crate) fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    if k == 0 || k > items.len() {
        return result;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            indices[i] += 1;
            if indices[i] <= items.len() - k + i {
                break;
            }
        }
        for j in (i + 1)..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// Stateless analysis entry point; all state is per-call.
#[derive(Debug, Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Run one searcher pass against `grid` and return the steps found.
    fn run_pass(&self, grid: &Grid, options: &AnalysisOptions, mode: SearchMode) -> Vec<Step> {
        let mut ctx = AnalysisContext::new(grid, options, mode);
        for searcher in registry::SEARCHERS {
            if ctx.done() {
                break;
            }
            (searcher.run)(&mut ctx);
        }
        ctx.into_steps()
    }

    /// Single-solution-path analysis: repeatedly find the highest-priority
    /// step, apply it, and rescan until the grid is solved or no searcher
    /// can progress.
    ///
    /// The grid is pre-validated with the brute-force oracle, so
    /// `Unsolvable` and `MultipleSolutions` are reported before any
    /// technique search happens.
    pub fn analyze(&self, grid: &Grid, options: &AnalysisOptions) -> AnalysisResult {
        if let Some(pos) = grid.contradiction() {
            return AnalysisResult::Unsolvable {
                reason: UnsolvableReason::Contradiction { pos },
            };
        }
        match brute_force::solve_unique(grid) {
            Solutions::None => {
                return AnalysisResult::Unsolvable {
                    reason: UnsolvableReason::NoSolution,
                }
            }
            Solutions::Multiple => return AnalysisResult::MultipleSolutions,
            Solutions::Unique(_) => {}
        }
        if grid.is_solved() {
            return AnalysisResult::Solved {
                steps: Vec::new(),
                solution: grid.clone(),
            };
        }

        let mut working = grid.clone();
        let mut steps = Vec::new();

        loop {
            if options.is_cancelled() {
                return AnalysisResult::Cancelled;
            }

            let found = self.run_pass(&working, options, SearchMode::FirstStep);
            let Some(step) = found.into_iter().next() else {
                log::debug!(
                    "stuck after {} steps, {} cells open",
                    steps.len(),
                    working.empty_cells().len()
                );
                return AnalysisResult::Stuck {
                    steps,
                    remaining: working,
                };
            };

            log::debug!("step {}: {}", steps.len() + 1, step.describe());
            step.apply(&mut working);
            steps.push(step);

            if let Some(pos) = working.contradiction() {
                return AnalysisResult::Unsolvable {
                    reason: UnsolvableReason::Contradiction { pos },
                };
            }
            if working.is_solved() {
                return AnalysisResult::Solved {
                    steps,
                    solution: working,
                };
            }
        }
    }

    /// Difficulty tier of a puzzle, or `None` when it cannot be solved by
    /// the registered techniques.
    pub fn rate(&self, grid: &Grid) -> Option<crate::rating::Difficulty> {
        self.analyze(grid, &AnalysisOptions::default()).difficulty()
    }

    /// Exhaustive pass: every step every searcher finds in the current
    /// grid state, applying nothing. Deterministic: output order follows
    /// the registry order.
    pub fn find_all_steps(&self, grid: &Grid, options: &AnalysisOptions) -> Vec<Step> {
        if grid.is_solved() || grid.contradiction().is_some() {
            return Vec::new();
        }
        self.run_pass(grid, options, SearchMode::AllSteps)
    }
}
