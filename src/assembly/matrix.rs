//! Exact-cover matrix construction.
//!
//! Each matrix row is one legal placement of one copy of one piece:
//! the cells it covers, its copy-accounting column and, for multi-copy
//! parts, the permutation-breaking columns that force copies into
//! ascending placement order.

use itertools::iproduct;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{
    bitmap_to_rotations, reduce_rotations, CellKind, Point, ROTATIONS_TO_CHECK,
};
use crate::puzzle::{PieceInstance, Problem, Puzzle};

/// Identity of a matrix row: which copy of which part sits where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Index into the problem's piece list.
    pub part: usize,
    /// Copy number within the part's multiplicity.
    pub copy: u32,
    /// Shape id in the puzzle.
    pub shape: usize,
    pub rotation: u8,
    /// Where the shape's local origin sits in the normalized instance.
    pub hotspot: Point,
    /// Translation of the normalized instance inside the result box.
    pub offset: Point,
}

/// A sparse matrix row: sorted column indices plus its annotation.
#[derive(Debug, Clone)]
pub struct MatrixRow {
    pub columns: Vec<usize>,
    pub annotation: Annotation,
}

/// Per-part construction counters, kept for reporting.
#[derive(Debug, Clone)]
pub struct PartStatistics {
    pub shape: usize,
    pub rotations_tried: usize,
    pub placements: usize,
}

/// What the builder produced, for the analyze command and logs.
#[derive(Debug, Clone)]
pub struct MatrixStatistics {
    pub rows: usize,
    pub primary_columns: usize,
    pub secondary_columns: usize,
    /// Part whose rotations were reduced by the result's symmetry, if
    /// any reduction applied.
    pub symmetry_breaker: Option<usize>,
    pub parts: Vec<PartStatistics>,
}

impl fmt::Display for MatrixStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Matrix: {} rows, {} primary + {} secondary columns",
            self.rows, self.primary_columns, self.secondary_columns
        )?;
        match self.symmetry_breaker {
            Some(part) => writeln!(f, "Symmetry breaker: part {}", part)?,
            None => writeln!(f, "Symmetry breaker: none")?,
        }
        for (idx, part) in self.parts.iter().enumerate() {
            writeln!(
                f,
                "  part {} (shape {}): {} rotations, {} placements",
                idx, part.shape, part.rotations_tried, part.placements
            )?;
        }
        Ok(())
    }
}

/// The full exact-cover matrix for one problem.
///
/// Column layout: mandatory result cells first, then one column per
/// required piece copy (both primary); then optional result cells,
/// columns for optional copies and the permutation staircase (all
/// secondary).
#[derive(Debug, Clone)]
pub struct CoverMatrix {
    rows: Vec<MatrixRow>,
    num_primary: usize,
    num_secondary: usize,
    statistics: MatrixStatistics,
}

struct Placement {
    rotation: u8,
    hotspot: Point,
    offset: Point,
    cell_columns: Vec<usize>,
}

impl CoverMatrix {
    /// Builds the matrix for `problem`. The problem must already have
    /// been validated against the puzzle.
    pub fn build(puzzle: &Puzzle, problem: &Problem, symmetry_reduction: bool) -> Self {
        let result_voxel = &puzzle.shapes[problem.result];
        let result_instance = PieceInstance::new(result_voxel, 0);
        let result_map = result_instance.world_map();

        // Mandatory cells take the low column indices in (z, y, x)
        // order; required copy columns follow them to close the primary
        // block; optional cells open the secondary block.
        let sorted_cells = result_map.sorted_cells();
        let num_filled = sorted_cells
            .iter()
            .filter(|(_, kind)| *kind == CellKind::Filled)
            .count();
        let num_variable = sorted_cells.len() - num_filled;
        let total_min: usize = problem.pieces.iter().map(|e| e.min as usize).sum();
        let num_primary = num_filled + total_min;
        let mut cell_column: FxHashMap<Point, usize> = FxHashMap::default();
        {
            let mut filled_cursor = 0;
            let mut variable_cursor = num_primary;
            for &(p, kind) in &sorted_cells {
                match kind {
                    CellKind::Filled => {
                        cell_column.insert(p, filled_cursor);
                        filled_cursor += 1;
                    }
                    CellKind::Variable => {
                        cell_column.insert(p, variable_cursor);
                        variable_cursor += 1;
                    }
                }
            }
        }

        let mut rotation_sets: Vec<Vec<u8>> = problem
            .pieces
            .iter()
            .map(|entry| {
                let group = puzzle.shapes[entry.shape].self_symmetry_group();
                bitmap_to_rotations(ROTATIONS_TO_CHECK[group])
            })
            .collect();

        let symmetry_breaker = if symmetry_reduction {
            pick_symmetry_breaker(puzzle, problem, result_voxel, &mut rotation_sets)
        } else {
            None
        };

        // First pass: every legal placement per part. All copies of a
        // part share the same placement list.
        let result_size = result_instance
            .bounding_box()
            .size();
        let mut placements_per_part: Vec<Vec<Placement>> = Vec::with_capacity(problem.pieces.len());
        for (part, entry) in problem.pieces.iter().enumerate() {
            let mut placements = Vec::new();
            for &rotation in &rotation_sets[part] {
                let instance = PieceInstance::new(&puzzle.shapes[entry.shape], rotation);
                let piece_size = instance.bounding_box().size();
                let (rx, ry, rz) = (
                    result_size[0] - piece_size[0],
                    result_size[1] - piece_size[1],
                    result_size[2] - piece_size[2],
                );
                if rx < 0 || ry < 0 || rz < 0 {
                    continue;
                }
                for (z, y, x) in iproduct!(0..=rz, 0..=ry, 0..=rx) {
                    let mut cell_columns = Vec::with_capacity(instance.world_map().len());
                    let mut fits = true;
                    for (p, _) in instance.world_map().sorted_cells() {
                        match cell_column.get(&[p[0] + x, p[1] + y, p[2] + z]) {
                            Some(&col) => cell_columns.push(col),
                            None => {
                                fits = false;
                                break;
                            }
                        }
                    }
                    if fits {
                        placements.push(Placement {
                            rotation,
                            hotspot: instance.hotspot(),
                            offset: [x, y, z],
                            cell_columns,
                        });
                    }
                }
            }
            placements_per_part.push(placements);
        }

        // Optional copy and staircase columns extend the secondary
        // block after the optional cells.
        let mut next_column = num_primary + num_variable;
        let mut required_base = Vec::with_capacity(problem.pieces.len());
        let mut optional_base = Vec::with_capacity(problem.pieces.len());
        let mut staircase_base = Vec::with_capacity(problem.pieces.len());
        {
            let mut required_cursor = num_filled;
            for entry in &problem.pieces {
                required_base.push(required_cursor);
                required_cursor += entry.min as usize;
            }
        }
        for entry in &problem.pieces {
            optional_base.push(next_column);
            next_column += (entry.max - entry.min) as usize;
        }
        for (part, entry) in problem.pieces.iter().enumerate() {
            staircase_base.push(next_column);
            if entry.max > 1 {
                next_column += placements_per_part[part].len() * (entry.max as usize - 1);
            }
        }
        let num_secondary = next_column - num_primary;

        // Second pass: emit rows part by part, copy by copy, in
        // placement order.
        let mut rows = Vec::new();
        for (part, entry) in problem.pieces.iter().enumerate() {
            let placements = &placements_per_part[part];
            let num_placements = placements.len();
            for copy in 0..entry.max {
                for (index, placement) in placements.iter().enumerate() {
                    let mut columns: Vec<usize> = placement.cell_columns.clone();
                    columns.push(if copy < entry.min {
                        required_base[part] + copy as usize
                    } else {
                        optional_base[part] + (copy - entry.min) as usize
                    });
                    if entry.max > 1 {
                        // Copies must take strictly ascending placement
                        // indices: as the earlier copy of a pair this row
                        // claims the whole prefix up to its own index, as
                        // the later copy just its own index.
                        if copy + 1 < entry.max {
                            let pair = copy as usize;
                            for t in 0..=index {
                                columns.push(staircase_base[part] + pair * num_placements + t);
                            }
                        }
                        if copy > 0 {
                            let pair = copy as usize - 1;
                            columns.push(staircase_base[part] + pair * num_placements + index);
                        }
                    }
                    columns.sort_unstable();
                    rows.push(MatrixRow {
                        columns,
                        annotation: Annotation {
                            part,
                            copy,
                            shape: entry.shape,
                            rotation: placement.rotation,
                            hotspot: placement.hotspot,
                            offset: placement.offset,
                        },
                    });
                }
            }
        }

        let statistics = MatrixStatistics {
            rows: rows.len(),
            primary_columns: num_primary,
            secondary_columns: num_secondary,
            symmetry_breaker,
            parts: problem
                .pieces
                .iter()
                .enumerate()
                .map(|(part, entry)| PartStatistics {
                    shape: entry.shape,
                    rotations_tried: rotation_sets[part].len(),
                    placements: placements_per_part[part].len(),
                })
                .collect(),
        };

        Self {
            rows,
            num_primary,
            num_secondary,
            statistics,
        }
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn num_primary(&self) -> usize {
        self.num_primary
    }

    pub fn num_secondary(&self) -> usize {
        self.num_secondary
    }

    pub fn statistics(&self) -> &MatrixStatistics {
        &self.statistics
    }
}

/// Chooses the part whose rotation set shrinks the most under the
/// result's self-symmetry and applies the reduction to it. Ties prefer
/// the smaller shape, then the first part seen.
fn pick_symmetry_breaker(
    puzzle: &Puzzle,
    problem: &Problem,
    result_voxel: &crate::puzzle::Voxel,
    rotation_sets: &mut [Vec<u8>],
) -> Option<usize> {
    let result_group = result_voxel.self_symmetry_group();
    let mut best: Option<(usize, usize, u32, Vec<u8>)> = None;
    for (part, entry) in problem.pieces.iter().enumerate() {
        let bitmap = rotation_sets[part]
            .iter()
            .fold(0u32, |acc, &r| acc | (1 << r));
        let reduced = reduce_rotations(result_group, bitmap);
        let reduction = rotation_sets[part].len() - reduced.count_ones() as usize;
        if reduction == 0 {
            continue;
        }
        let size = puzzle.shapes[entry.shape].size();
        let better = match &best {
            None => true,
            Some((_, best_reduction, best_size, _)) => {
                reduction > *best_reduction || (reduction == *best_reduction && size < *best_size)
            }
        };
        if better {
            best = Some((part, reduction, size, bitmap_to_rotations(reduced)));
        }
    }
    best.map(|(part, _, _, reduced)| {
        rotation_sets[part] = reduced;
        part
    })
}
