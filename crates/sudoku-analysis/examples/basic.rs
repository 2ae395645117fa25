//! Analyze a puzzle from the command line, print its solve path and
//! rating, then generate a fresh puzzle of similar difficulty.

use sudoku_analysis::{
    AnalysisOptions, AnalysisResult, Analyzer, Generator, GeneratorOptions, Grid,
};

fn main() {
    let line = std::env::args().nth(1).unwrap_or_else(|| {
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079"
            .to_string()
    });

    let grid: Grid = match line.parse() {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("invalid puzzle: {err}");
            std::process::exit(1);
        }
    };

    let analyzer = Analyzer::new();
    let result = analyzer.analyze(&grid, &AnalysisOptions::default());
    match &result {
        AnalysisResult::Solved { steps, solution } => {
            println!("solved in {} steps:", steps.len());
            for (i, step) in steps.iter().enumerate() {
                println!("  {:2}. [{:3}] {}", i + 1, step.rating(), step.describe());
            }
            println!("solution: {}", solution.to_line());
            if let (Some(rating), Some(difficulty)) = (result.rating(), result.difficulty()) {
                println!("rating: {}.{} ({})", rating / 10, rating % 10, difficulty);
            }
        }
        AnalysisResult::Stuck { steps, remaining } => {
            println!("stuck after {} steps, state:", steps.len());
            println!("{}", remaining.to_pencilmarks());
        }
        other => println!("{:?}", other),
    }

    let mut generator = Generator::with_options(GeneratorOptions::default());
    match generator.generate() {
        Ok(puzzle) => println!("generated: {}", puzzle.to_line()),
        Err(err) => eprintln!("generation failed: {err}"),
    }
}
