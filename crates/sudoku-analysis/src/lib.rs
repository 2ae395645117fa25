//! Human-style Sudoku analysis: technique search, difficulty rating,
//! brute-force validation, and puzzle generation.
//!
//! The heart of the crate is the [`Analyzer`], which solves a grid the way
//! a person would: scanning a fixed registry of technique searchers from
//! cheapest to most involved, applying the first step found, and repeating
//! until the grid is solved or no technique makes progress. Every run is
//! pre-validated by an exact-cover brute-force solver, so uniqueness
//! failures surface before any technique search happens.
//!
//! ```
//! use sudoku_analysis::{AnalysisOptions, AnalysisResult, Analyzer, Grid};
//!
//! let grid: Grid =
//!     "530070000600195000098000060800060003400803001700020006060000280000419005000080079"
//!         .parse()
//!         .unwrap();
//! match Analyzer::new().analyze(&grid, &AnalysisOptions::default()) {
//!     AnalysisResult::Solved { steps, .. } => {
//!         for step in &steps {
//!             println!("{}", step.describe());
//!         }
//!     }
//!     other => println!("{:?}", other),
//! }
//! ```

pub mod bitset;
pub mod brute_force;
pub mod cancel;
pub mod generator;
pub mod grid;
pub mod rating;
pub mod solver;
pub mod step;

pub use bitset::{CandidateMap, CellMap, DigitSet};
pub use brute_force::Solutions;
pub use cancel::CancelToken;
pub use generator::{GenerateError, Generator, GeneratorOptions, SymmetryType};
pub use grid::{Cell, Grid, ParseGridError, Position, Topology};
pub use rating::{Difficulty, Rating};
pub use solver::{AnalysisOptions, AnalysisResult, Analyzer, SearchMode, UnsolvableReason};
pub use step::{Category, Conclusion, Step, StepKind, Technique, View};
