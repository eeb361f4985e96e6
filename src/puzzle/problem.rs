//! Puzzle and problem definitions.

use crate::puzzle::error::PuzzleError;
use crate::puzzle::voxel::Voxel;

/// One kind of piece used in a problem, with how many copies of it the
/// assembly must or may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceEntry {
    /// Index into the puzzle's shape list.
    pub shape: usize,
    /// Copies that must be used.
    pub min: u32,
    /// Copies that may be used. Fixed-count pieces have `min == max`.
    pub max: u32,
}

impl PieceEntry {
    pub fn fixed(shape: usize, count: u32) -> Self {
        Self {
            shape,
            min: count,
            max: count,
        }
    }

    pub fn ranged(shape: usize, min: u32, max: u32) -> Self {
        Self { shape, min, max }
    }
}

/// A single solving task: fill `result` with the listed pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub name: String,
    /// Index into the puzzle's shape list of the target solid.
    pub result: usize,
    pub pieces: Vec<PieceEntry>,
}

impl Problem {
    /// Largest number of pieces an assembly can contain.
    pub fn max_pieces(&self) -> u32 {
        self.pieces.iter().map(|e| e.max).sum()
    }

    /// Whether any part has an open copy range.
    pub fn is_ranged(&self) -> bool {
        self.pieces.iter().any(|e| e.min != e.max)
    }

    fn validate(&self, shapes: &[Voxel]) -> Result<(), PuzzleError> {
        if self.result >= shapes.len() {
            return Err(PuzzleError::ShapeOutOfRange {
                name: self.name.clone(),
                shape: self.result,
                count: shapes.len(),
            });
        }
        if self.pieces.is_empty() {
            return Err(PuzzleError::EmptyProblem {
                name: self.name.clone(),
            });
        }
        for (idx, entry) in self.pieces.iter().enumerate() {
            if entry.shape >= shapes.len() {
                return Err(PuzzleError::ShapeOutOfRange {
                    name: self.name.clone(),
                    shape: entry.shape,
                    count: shapes.len(),
                });
            }
            if entry.min > entry.max {
                return Err(PuzzleError::InconsistentRange {
                    name: self.name.clone(),
                    piece: idx,
                    min: entry.min,
                    max: entry.max,
                });
            }
            if entry.max == 0 {
                return Err(PuzzleError::ZeroMaximum {
                    name: self.name.clone(),
                    piece: idx,
                });
            }
            if shapes[entry.shape].size() == 0 {
                return Err(PuzzleError::EmptyShape {
                    name: self.name.clone(),
                    piece: idx,
                });
            }
        }
        let capacity: u32 = self
            .pieces
            .iter()
            .map(|e| e.max * shapes[e.shape].size())
            .sum();
        let mandatory = shapes[self.result].filled_size();
        if capacity < mandatory {
            return Err(PuzzleError::NotEnoughPieceCells {
                name: self.name.clone(),
                capacity,
                cells: mandatory,
            });
        }
        Ok(())
    }
}

/// A set of shapes plus the problems defined over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub shapes: Vec<Voxel>,
    pub problems: Vec<Problem>,
}

impl Puzzle {
    /// Checks every problem against the shape list.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        for problem in &self.problems {
            problem.validate(&self.shapes)?;
        }
        Ok(())
    }

    pub fn problem(&self, index: usize) -> Result<&Problem, PuzzleError> {
        self.problems.get(index).ok_or(PuzzleError::NoSuchProblem {
            index,
            count: self.problems.len(),
        })
    }
}
