//! Breadth-first disassembly search with a parking lot of sub-groups.

use rustc_hash::FxHashSet;

use crate::assembly::Assembly;
use crate::disassembly::movement::SolverCache;
use crate::disassembly::node::NodeHandle;
use crate::disassembly::trace::{phase_from_separation, DisassemblyTrace};

/// Verdict of one disassembly search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub solvable: bool,
    /// Distinct configurations visited across all sub-groups.
    pub states_explored: usize,
    pub trace: Option<DisassemblyTrace>,
}

/// Decides whether `assembly` can be taken apart completely.
///
/// Each group popped from the parking lot runs a level-by-level BFS
/// until it separates; its multi-piece fragments go back on the lot.
/// A group whose BFS exhausts without separating blocks the whole
/// assembly, so the search fails fast. A group of one piece is already
/// apart.
pub fn run(cache: &mut SolverCache, assembly: &Assembly, collect_trace: bool) -> SearchOutcome {
    let mut trace = collect_trace.then(DisassemblyTrace::default);
    if assembly.len() <= 1 {
        return SearchOutcome {
            solvable: true,
            states_explored: 0,
            trace,
        };
    }

    let mut states_explored = 0usize;
    let mut parking: Vec<NodeHandle> = vec![cache.pool.root_from_assembly(assembly)];

    while let Some(start) = parking.pop() {
        // Identities are only comparable within one group, so the
        // closed set restarts with each root.
        let mut closed: FxHashSet<Vec<i32>> = FxHashSet::default();
        closed.insert(cache.pool.get(start).canonical_id());
        states_explored += 1;

        // Every node this group keeps, for recycling once its verdict
        // is in. Rejected duplicates are released immediately instead.
        let mut visited = vec![start];
        let mut frontier = vec![start];
        let mut next_frontier: Vec<NodeHandle> = Vec::new();
        let mut separated = false;

        'bfs: loop {
            let node = match frontier.pop() {
                Some(node) => node,
                None => {
                    std::mem::swap(&mut frontier, &mut next_frontier);
                    match frontier.pop() {
                        Some(node) => node,
                        None => break 'bfs,
                    }
                }
            };
            for candidate in cache.movement_list(node) {
                if separated {
                    cache.pool.release(candidate);
                    continue;
                }
                if !closed.insert(cache.pool.get(candidate).canonical_id()) {
                    cache.pool.release(candidate);
                    continue;
                }
                visited.push(candidate);
                states_explored += 1;
                if cache.pool.get(candidate).is_separation {
                    separated = true;
                    if let Some(trace) = trace.as_mut() {
                        trace
                            .phases
                            .push(phase_from_separation(&cache.pool, candidate));
                    }
                    parking.extend(cache.pool.separate(candidate));
                } else {
                    next_frontier.push(candidate);
                }
            }
            if separated {
                break 'bfs;
            }
        }

        // Traces were captured eagerly and parked sub-roots carry their
        // own details, so this group's nodes are dead either way.
        for handle in visited {
            cache.pool.release(handle);
        }

        if !separated {
            return SearchOutcome {
                solvable: false,
                states_explored,
                trace: None,
            };
        }
    }

    SearchOutcome {
        solvable: true,
        states_explored,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Annotation;
    use crate::disassembly::problem_cache::{AssemblerOptions, ProblemCache};
    use crate::geometry::Point;
    use crate::puzzle::{PieceEntry, Problem, Puzzle, Voxel};

    fn annotation(shape: usize, offset: Point) -> Annotation {
        Annotation {
            part: 0,
            copy: 0,
            shape,
            rotation: 0,
            hotspot: [0, 0, 0],
            offset,
        }
    }

    fn cache_for(puzzle: &Puzzle) -> ProblemCache<'_> {
        ProblemCache::new(puzzle, 0, AssemblerOptions::default()).unwrap()
    }

    fn two_cube_puzzle() -> Puzzle {
        let bar = Voxel::parse("bar", 2, 1, 1, "##").unwrap();
        let cube = Voxel::parse("cube", 1, 1, 1, "#").unwrap();
        Puzzle {
            shapes: vec![bar, cube],
            problems: vec![Problem {
                name: "bar".to_string(),
                result: 0,
                pieces: vec![PieceEntry::fixed(1, 2)],
            }],
        }
    }

    #[test]
    fn test_single_piece_is_trivially_solvable() {
        let puzzle = two_cube_puzzle();
        let problem = cache_for(&puzzle);
        let mut cache = SolverCache::new(&problem);
        let assembly = vec![annotation(0, [0, 0, 0])];
        let outcome = run(&mut cache, &assembly, true);
        assert!(outcome.solvable);
        assert_eq!(outcome.states_explored, 0);
        assert_eq!(outcome.trace, Some(DisassemblyTrace::default()));
    }

    #[test]
    fn test_two_touching_cubes_separate() {
        let puzzle = two_cube_puzzle();
        let problem = cache_for(&puzzle);
        let mut cache = SolverCache::new(&problem);
        let assembly = vec![annotation(1, [0, 0, 0]), annotation(1, [1, 0, 0])];
        let outcome = run(&mut cache, &assembly, true);
        assert!(outcome.solvable);
        let trace = outcome.trace.unwrap();
        assert_eq!(trace.phases.len(), 1);
        let last = trace.phases[0].states.last().unwrap();
        assert_eq!(last.moving.len(), 1);
    }

    #[test]
    fn test_finished_groups_recycle_their_nodes() {
        let puzzle = two_cube_puzzle();
        let problem = cache_for(&puzzle);
        let mut cache = SolverCache::new(&problem);
        let assembly = vec![
            annotation(1, [0, 0, 0]),
            annotation(1, [1, 0, 0]),
            annotation(1, [2, 0, 0]),
        ];
        let outcome = run(&mut cache, &assembly, true);
        assert!(outcome.solvable);
        // Every group's nodes, sub-roots included, went back to the
        // free list when its verdict came in.
        assert_eq!(cache.pool.live_nodes(), 0);
    }

    fn interlocked_rings() -> Puzzle {
        // Ring A: the perimeter of a 3x3 square in the xy plane.
        // Ring B: a matching perimeter in the yz plane threaded through
        // A's hole. Neither can slide in any direction.
        let ring_a = Voxel::parse("ring_a", 3, 3, 1, "###\n#_#\n###").unwrap();
        let ring_b = Voxel::parse("ring_b", 1, 3, 3, "###\n#_#\n###").unwrap();
        Puzzle {
            shapes: vec![ring_a.clone(), ring_a, ring_b],
            problems: vec![Problem {
                name: "rings".to_string(),
                result: 0,
                pieces: vec![PieceEntry::fixed(1, 1), PieceEntry::fixed(2, 1)],
            }],
        }
    }

    #[test]
    fn test_interlocked_rings_are_unsolvable() {
        let puzzle = interlocked_rings();
        let problem = cache_for(&puzzle);
        let mut cache = SolverCache::new(&problem);
        // B threads through A's hole at (1, 1, 0) while A's edge cell
        // (1, 0, 0) sits in B's hole, chain-link style.
        let assembly = vec![
            annotation(1, [0, 0, 0]),
            Annotation {
                part: 1,
                copy: 0,
                shape: 2,
                rotation: 0,
                hotspot: [0, 0, 0],
                offset: [1, -1, -1],
            },
        ];
        let outcome = run(&mut cache, &assembly, true);
        assert!(!outcome.solvable);
        assert!(outcome.trace.is_none());
    }

    #[test]
    fn test_verdict_is_deterministic() {
        let puzzle = interlocked_rings();
        let problem = cache_for(&puzzle);
        for _ in 0..3 {
            let mut cache = SolverCache::new(&problem);
            let assembly = vec![
                annotation(1, [0, 0, 0]),
                Annotation {
                    part: 1,
                    copy: 0,
                    shape: 2,
                    rotation: 0,
                    hotspot: [0, 0, 0],
                    offset: [1, -1, -1],
                },
            ];
            assert!(!run(&mut cache, &assembly, false).solvable);
        }
    }
}
