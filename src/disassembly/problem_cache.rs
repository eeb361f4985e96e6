//! Per-problem derived state and the solving entry points.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::assembly::{dlx, Assembly, CoverMatrix, MatrixStatistics};
use crate::disassembly::movement::SolverCache;
use crate::disassembly::search;
use crate::disassembly::trace::DisassemblyTrace;
use crate::geometry::NUM_ROTATIONS;
use crate::puzzle::{PieceInstance, Problem, Puzzle, PuzzleError};

/// Knobs for assembly enumeration.
#[derive(Debug, Clone, Copy)]
pub struct AssemblerOptions {
    /// Stop enumerating after this many assemblies.
    pub max_assemblies: usize,
    /// Reduce one part's rotations by the result's self-symmetry to
    /// drop rotation-equivalent duplicate assemblies.
    pub symmetry_reduction: bool,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            max_assemblies: 1_000_000,
            symmetry_reduction: true,
        }
    }
}

/// Verdict for one assembly.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub assembly: usize,
    pub solvable: bool,
    pub states_explored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<DisassemblyTrace>,
}

/// Read-mostly state for solving one problem: the validated problem,
/// every piece instance materialized up front (so concurrent solvers
/// share it without locking), and the lazily built matrix and assembly
/// list.
pub struct ProblemCache<'a> {
    puzzle: &'a Puzzle,
    problem: &'a Problem,
    options: AssemblerOptions,
    /// Instance of every shape in every rotation, keyed by
    /// `shape * 24 + rotation`.
    instances: Vec<PieceInstance>,
    matrix: Option<CoverMatrix>,
    assemblies: Option<Vec<Assembly>>,
}

impl<'a> ProblemCache<'a> {
    /// Validates the puzzle and materializes all piece geometry.
    pub fn new(
        puzzle: &'a Puzzle,
        problem_index: usize,
        options: AssemblerOptions,
    ) -> Result<Self, PuzzleError> {
        puzzle.validate()?;
        let problem = puzzle.problem(problem_index)?;
        let mut instances = Vec::with_capacity(puzzle.shapes.len() * NUM_ROTATIONS as usize);
        for shape in &puzzle.shapes {
            for rotation in 0..NUM_ROTATIONS {
                instances.push(PieceInstance::new(shape, rotation));
            }
        }
        Ok(Self {
            puzzle,
            problem,
            options,
            instances,
            matrix: None,
            assemblies: None,
        })
    }

    pub fn problem(&self) -> &Problem {
        self.problem
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.puzzle
    }

    /// Cached geometry for (shape, rotation).
    pub fn instance(&self, shape: usize, rotation: u8) -> &PieceInstance {
        &self.instances[shape * NUM_ROTATIONS as usize + rotation as usize]
    }

    /// The target solid at identity rotation.
    pub fn result_instance(&self) -> &PieceInstance {
        self.instance(self.problem.result, 0)
    }

    fn ensure_matrix(&mut self) {
        if self.matrix.is_none() {
            self.matrix = Some(CoverMatrix::build(
                self.puzzle,
                self.problem,
                self.options.symmetry_reduction,
            ));
        }
    }

    /// Construction statistics of the exact-cover matrix, building it
    /// if needed.
    pub fn matrix_statistics(&mut self) -> &MatrixStatistics {
        self.ensure_matrix();
        match &self.matrix {
            Some(matrix) => matrix.statistics(),
            None => unreachable!(),
        }
    }

    /// All assemblies of the problem, enumerated on first call and
    /// cached after.
    pub fn get_assemblies(&mut self) -> &[Assembly] {
        self.ensure_matrix();
        if self.assemblies.is_none() {
            let matrix = match &self.matrix {
                Some(matrix) => matrix,
                None => unreachable!(),
            };
            let solutions = dlx::search(matrix, self.options.max_assemblies);
            let mut assemblies: Vec<Assembly> = solutions
                .iter()
                .map(|rows| {
                    rows.iter()
                        .map(|&row| matrix.rows()[row].annotation)
                        .collect()
                })
                .collect();
            if self.problem.is_ranged() {
                assemblies = dedup_ranged(assemblies);
            }
            self.assemblies = Some(assemblies);
        }
        self.assemblies.as_deref().unwrap_or_default()
    }

    /// Whether `assembly` can be taken apart.
    pub fn solve(&self, assembly: &Assembly) -> bool {
        let mut cache = SolverCache::new(self);
        search::run(&mut cache, assembly, false).solvable
    }

    /// Like `solve`, returning the separation trace when solvable.
    pub fn solve_with_trace(&self, assembly: &Assembly) -> (bool, Option<DisassemblyTrace>) {
        let mut cache = SolverCache::new(self);
        let outcome = search::run(&mut cache, assembly, true);
        (outcome.solvable, outcome.trace)
    }

    /// Enumerates the assemblies and solves each of them, fanning out
    /// over worker threads. Each worker owns its own scratch state;
    /// reports come back in assembly order.
    pub fn solve_all(&mut self, collect_traces: bool) -> Vec<SolveReport> {
        self.get_assemblies();
        let assemblies = self.assemblies.as_deref().unwrap_or_default();
        let shared: &Self = self;
        assemblies
            .par_iter()
            .enumerate()
            .map_init(
                || SolverCache::new(shared),
                |cache, (index, assembly)| {
                    let outcome = search::run(cache, assembly, collect_traces);
                    SolveReport {
                        assembly: index,
                        solvable: outcome.solvable,
                        states_explored: outcome.states_explored,
                        trace: outcome.trace,
                    }
                },
            )
            .collect()
    }
}

/// Problems with open copy ranges can yield the same placement set
/// through different copy-column choices; keep the first of each.
fn dedup_ranged(assemblies: Vec<Assembly>) -> Vec<Assembly> {
    let mut seen: FxHashSet<Vec<(usize, u8, [i32; 3])>> = FxHashSet::default();
    let mut unique = Vec::with_capacity(assemblies.len());
    for assembly in assemblies {
        let mut signature: Vec<(usize, u8, [i32; 3])> = assembly
            .iter()
            .map(|a| (a.shape, a.rotation, a.offset))
            .collect();
        signature.sort_unstable();
        if seen.insert(signature) {
            unique.push(assembly);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{PieceEntry, Voxel};

    fn two_domino_puzzle() -> Puzzle {
        let slab = Voxel::parse("slab", 2, 2, 1, "####").unwrap();
        let domino = Voxel::parse("domino", 1, 2, 1, "##").unwrap();
        Puzzle {
            shapes: vec![slab, domino],
            problems: vec![Problem {
                name: "main".to_string(),
                result: 0,
                pieces: vec![PieceEntry::fixed(1, 2)],
            }],
        }
    }

    #[test]
    fn test_new_rejects_bad_problem_index() {
        let puzzle = two_domino_puzzle();
        assert!(matches!(
            ProblemCache::new(&puzzle, 5, AssemblerOptions::default()),
            Err(PuzzleError::NoSuchProblem { .. })
        ));
    }

    fn tromino_cube_puzzle() -> Puzzle {
        let slab = Voxel::parse("slab", 2, 2, 1, "####").unwrap();
        let tromino = Voxel::parse("l", 2, 2, 1, "##_#").unwrap();
        let cube = Voxel::parse("cube", 1, 1, 1, "#").unwrap();
        Puzzle {
            shapes: vec![slab, tromino, cube],
            problems: vec![Problem {
                name: "corner".to_string(),
                result: 0,
                pieces: vec![PieceEntry::fixed(1, 1), PieceEntry::fixed(2, 1)],
            }],
        }
    }

    #[test]
    fn test_assemblies_cached_and_reduced() {
        let puzzle = tromino_cube_puzzle();
        let mut cache = ProblemCache::new(&puzzle, 0, AssemblerOptions::default()).unwrap();
        assert_eq!(cache.get_assemblies().len(), 1);
        // second call must not rebuild
        assert_eq!(cache.get_assemblies().len(), 1);

        let mut unreduced = ProblemCache::new(
            &puzzle,
            0,
            AssemblerOptions {
                symmetry_reduction: false,
                ..AssemblerOptions::default()
            },
        )
        .unwrap();
        assert_eq!(unreduced.get_assemblies().len(), 4);
    }

    #[test]
    fn test_solve_all_reports_in_order() {
        let puzzle = two_domino_puzzle();
        let mut cache = ProblemCache::new(
            &puzzle,
            0,
            AssemblerOptions {
                symmetry_reduction: false,
                ..AssemblerOptions::default()
            },
        )
        .unwrap();
        let reports = cache.solve_all(true);
        assert_eq!(reports.len(), 2);
        for (index, report) in reports.iter().enumerate() {
            assert_eq!(report.assembly, index);
            assert!(report.solvable);
            assert!(report.trace.is_some());
        }
    }

    #[test]
    fn test_assembly_covers_result_exactly() {
        let puzzle = two_domino_puzzle();
        let mut cache = ProblemCache::new(&puzzle, 0, AssemblerOptions::default()).unwrap();
        let assemblies = cache.get_assemblies().to_vec();
        for assembly in &assemblies {
            let mut covered = FxHashSet::default();
            for annotation in assembly {
                let instance = cache.instance(annotation.shape, annotation.rotation);
                for (cell, _) in instance.world_map().iter() {
                    let absolute = [
                        cell[0] + annotation.offset[0],
                        cell[1] + annotation.offset[1],
                        cell[2] + annotation.offset[2],
                    ];
                    assert!(covered.insert(absolute), "cell covered twice");
                }
            }
            assert_eq!(covered.len(), 4);
        }
    }

    #[test]
    fn test_ranged_problem_counts_once() {
        // One cube required, up to two allowed, in a 2x1x1 bar: the
        // only full cover uses both cubes and must appear once.
        let bar = Voxel::parse("bar", 2, 1, 1, "##").unwrap();
        let cube = Voxel::parse("cube", 1, 1, 1, "#").unwrap();
        let puzzle = Puzzle {
            shapes: vec![bar, cube],
            problems: vec![Problem {
                name: "ranged".to_string(),
                result: 0,
                pieces: vec![PieceEntry::ranged(1, 1, 2)],
            }],
        };
        let mut cache = ProblemCache::new(&puzzle, 0, AssemblerOptions::default()).unwrap();
        let assemblies = cache.get_assemblies();
        assert_eq!(assemblies.len(), 1);
        assert_eq!(assemblies[0].len(), 2);
    }
}
