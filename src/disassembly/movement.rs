//! Pairwise slide distances and move generation.
//!
//! For a fixed arrangement of pieces the engine computes, per axis, how
//! far each piece can slide relative to every other piece before they
//! collide, closes that matrix over indirect blocking chains (Cutler's
//! algorithm) and turns the result into the legal group moves from this
//! configuration.

use rustc_hash::FxHashMap;

use crate::disassembly::node::{NodeHandle, NodePool};
use crate::disassembly::problem_cache::ProblemCache;
use crate::geometry::Point;

/// Slide distance treated as unbounded.
pub const MAX_DISTANCE: i32 = 10_000;

type PairKey = (usize, u8, usize, u8, [i32; 3]);

/// Per-worker scratch state for disassembly searches: the memoized
/// pairwise gap scans, the reusable distance matrix buffer and the node
/// arena. Never shared between workers.
pub struct SolverCache<'a> {
    problem: &'a ProblemCache<'a>,
    pair_cache: FxHashMap<PairKey, [i32; 3]>,
    distance: Vec<i32>,
    pub pool: NodePool,
}

impl<'a> SolverCache<'a> {
    pub fn new(problem: &'a ProblemCache<'a>) -> Self {
        Self {
            problem,
            pair_cache: FxHashMap::default(),
            distance: Vec::new(),
            pool: NodePool::new(),
        }
    }

    /// Maximum distance the second piece can slide in the negative
    /// direction along each axis before hitting the first, with the
    /// second piece placed at relative offset `d`. Saturates at
    /// `MAX_DISTANCE` when nothing is in the way.
    pub fn max_values(
        &mut self,
        shape1: usize,
        rot1: u8,
        shape2: usize,
        rot2: u8,
        d: Point,
    ) -> [i32; 3] {
        let key = (shape1, rot1, shape2, rot2, d);
        if let Some(&cached) = self.pair_cache.get(&key) {
            return cached;
        }
        let s1 = self.problem.instance(shape1, rot1);
        let s2 = self.problem.instance(shape2, rot2);
        let bb1 = *s1.bounding_box();
        let bb2 = s2.bounding_box().translated(d[0], d[1], d[2]);
        let intersection = bb1.intersection(&bb2);
        let union = bb1.union(&bb2);
        let m1 = s1.world_map();
        let m2 = s2.world_map();
        let mut result = [MAX_DISTANCE; 3];

        // One scan per axis: run along the moving axis across the
        // union box, constrained to the intersection box on the other
        // two axes. The gap counts empty cells since the last cell of
        // the fixed piece; hitting a cell of the moving piece closes it.
        for dim in 0..3 {
            let (a, b) = ((dim + 1) % 3, (dim + 2) % 3);
            for u in intersection.min[a]..=intersection.max[a] {
                for v in intersection.min[b]..=intersection.max[b] {
                    let mut gap = MAX_DISTANCE;
                    for w in union.min[dim]..=union.max[dim] {
                        let mut p = [0i32; 3];
                        p[dim] = w;
                        p[a] = u;
                        p[b] = v;
                        if m1.contains(p) {
                            gap = 0;
                        } else if m2.contains([p[0] - d[0], p[1] - d[1], p[2] - d[2]]) {
                            if gap < result[dim] {
                                result[dim] = gap;
                            }
                        } else {
                            gap += 1;
                        }
                    }
                }
            }
        }
        self.pair_cache.insert(key, result);
        result
    }

    /// Fills the distance matrix for `node`: entry (j, i, dim) is how
    /// far piece j can slide negatively along `dim` before hitting
    /// piece i, after accounting for indirect blocking through other
    /// pieces.
    pub fn update_distance_matrix(&mut self, node: NodeHandle) {
        let details = std::rc::Rc::clone(&self.pool.get(node).details);
        let offsets = self.pool.get(node).offsets.clone();
        let n = details.shapes.len();
        self.distance.clear();
        self.distance.resize(n * n * 3, 0);

        for j in 0..n {
            for i in 0..n {
                if i == j {
                    continue;
                }
                let d = [
                    offsets[j][0] - offsets[i][0],
                    offsets[j][1] - offsets[i][1],
                    offsets[j][2] - offsets[i][2],
                ];
                let values = self.max_values(
                    details.shapes[i],
                    details.rotations[i],
                    details.shapes[j],
                    details.rotations[j],
                    d,
                );
                self.distance[(j * n + i) * 3..(j * n + i) * 3 + 3].copy_from_slice(&values);
            }
        }

        // A piece may be stopped earlier by leaning on a third piece:
        // relax with dist(j,i) = min(dist(j,i), dist(k,i) + dist(j,k))
        // until a full pass changes nothing.
        let mut again = true;
        while again {
            again = false;
            for j in 0..n {
                for i in 0..n {
                    if i == j {
                        continue;
                    }
                    for k in 0..n {
                        if k == j || k == i {
                            continue;
                        }
                        for dim in 0..3 {
                            let candidate = self.distance[(k * n + i) * 3 + dim]
                                + self.distance[(j * n + k) * 3 + dim];
                            if candidate < self.distance[(j * n + i) * 3 + dim] {
                                self.distance[(j * n + i) * 3 + dim] = candidate;
                                again = true;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Entry (j, i, dim) of the current distance matrix.
    pub fn distance(&self, n: usize, j: usize, i: usize, dim: usize) -> i32 {
        self.distance[(j * n + i) * 3 + dim]
    }

    /// All legal moves from `node`. A separation short-circuits: the
    /// list then contains exactly that one node.
    pub fn movement_list(&mut self, node: NodeHandle) -> Vec<NodeHandle> {
        self.update_distance_matrix(node);
        let n = self.pool.get(node).piece_count();
        let mut moves = Vec::new();

        for dim in 0..3 {
            for k in 0..n {
                // Pieces co-moving with k: in the negative direction
                // those whose row entry is 0, in the positive direction
                // those whose column entry is 0. The limit is the
                // smallest nonzero distance to the rest.
                let mut neg_group = Vec::new();
                let mut pos_group = Vec::new();
                let mut neg_limit = MAX_DISTANCE + 1;
                let mut pos_limit = MAX_DISTANCE + 1;
                for i in 0..n {
                    let row = self.distance(n, k, i, dim);
                    let col = self.distance(n, i, k, dim);
                    if row == 0 {
                        neg_group.push(i);
                    } else {
                        neg_limit = neg_limit.min(row).min(MAX_DISTANCE);
                    }
                    if col == 0 {
                        pos_group.push(i);
                    } else {
                        pos_limit = pos_limit.min(col).min(MAX_DISTANCE);
                    }
                }

                // Only the smaller side counts as the mover, so each
                // relative move appears once.
                if neg_limit <= MAX_DISTANCE && neg_group.len() <= n / 2 {
                    if neg_limit >= MAX_DISTANCE {
                        let mut translation = [0; 3];
                        translation[dim] = -MAX_DISTANCE;
                        let separation = self.pool.child(node, &neg_group, translation, true);
                        self.release_all(&moves);
                        return vec![separation];
                    }
                    for step in 1..=neg_limit {
                        let mut translation = [0; 3];
                        translation[dim] = -step;
                        moves.push(self.pool.child(node, &neg_group, translation, false));
                    }
                }
                if pos_limit <= MAX_DISTANCE && pos_group.len() <= n / 2 {
                    if pos_limit >= MAX_DISTANCE {
                        let mut translation = [0; 3];
                        translation[dim] = MAX_DISTANCE;
                        let separation = self.pool.child(node, &pos_group, translation, true);
                        self.release_all(&moves);
                        return vec![separation];
                    }
                    for step in 1..=pos_limit {
                        let mut translation = [0; 3];
                        translation[dim] = step;
                        moves.push(self.pool.child(node, &pos_group, translation, false));
                    }
                }
            }
        }
        moves
    }

    fn release_all(&mut self, handles: &[NodeHandle]) {
        for &handle in handles {
            self.pool.release(handle);
        }
    }
}
