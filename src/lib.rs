//! Burr Puzzle Solver
//!
//! This library finds the assemblies of interlocking 3D puzzles by
//! exact-cover search and decides for each whether the pieces can be
//! taken apart.

pub mod assembly;
pub mod config;
pub mod disassembly;
pub mod geometry;
pub mod puzzle;
pub mod utils;

pub use config::Settings;
pub use disassembly::{AssemblerOptions, ProblemCache, SolveReport};
pub use puzzle::{load_puzzle_from_file, Puzzle};

use anyhow::{Context, Result};
use assembly::Assembly;
use serde::Serialize;

/// Everything learned about one problem: its assemblies and the
/// disassembly verdict for each.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleReport {
    pub problem: String,
    pub assemblies: Vec<Assembly>,
    /// How many assemblies can be taken apart.
    pub solvable: usize,
    pub reports: Vec<SolveReport>,
}

/// Main entry point: load the configured puzzle and solve it
pub fn solve_puzzle(settings: &Settings) -> Result<PuzzleReport> {
    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)?;
    solve_problem(&puzzle, settings)
}

/// Solve one problem of an already loaded puzzle
pub fn solve_problem(puzzle: &Puzzle, settings: &Settings) -> Result<PuzzleReport> {
    let options = AssemblerOptions {
        max_assemblies: settings.assembler.max_assemblies,
        symmetry_reduction: settings.assembler.symmetry_reduction,
    };
    let mut cache = ProblemCache::new(puzzle, settings.input.problem_index, options)?;

    let reports = if settings.solver.parallel_workers > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.solver.parallel_workers)
            .build()
            .context("Failed to build worker pool")?;
        pool.install(|| cache.solve_all(settings.solver.collect_traces))
    } else {
        cache.solve_all(settings.solver.collect_traces)
    };

    let solvable = reports.iter().filter(|r| r.solvable).count();
    Ok(PuzzleReport {
        problem: cache.problem().name.clone(),
        assemblies: cache.get_assemblies().to_vec(),
        solvable,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliOverrides;
    use crate::puzzle::{example_puzzle, save_puzzle_to_file};
    use tempfile::tempdir;

    #[test]
    fn test_solve_puzzle_end_to_end() {
        let dir = tempdir().unwrap();
        let puzzle_path = dir.path().join("example.yaml");
        save_puzzle_to_file(&example_puzzle(), &puzzle_path).unwrap();

        let mut settings = Settings::default();
        let overrides = CliOverrides {
            puzzle_file: Some(puzzle_path),
            collect_traces: true,
            ..CliOverrides::default()
        };
        settings.merge_with_cli(&overrides);

        let report = solve_puzzle(&settings).unwrap();
        // the slab tiles with two dominoes either way
        assert_eq!(report.assemblies.len(), 2);
        assert_eq!(report.solvable, 2);
        assert!(report.reports.iter().all(|r| r.trace.is_some()));
    }
}
