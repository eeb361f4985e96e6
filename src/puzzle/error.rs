//! Domain errors for puzzle definitions.

use thiserror::Error;

/// Errors raised while parsing or validating puzzle definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("voxel grid '{name}' has non-positive dimensions {x}x{y}x{z}")]
    BadDimensions { name: String, x: i32, y: i32, z: i32 },

    #[error("voxel grid '{name}' expects {expected} cells but the layer string has {actual}")]
    CellCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid cell code '{code}' in voxel grid '{name}' (expected '#', '+' or '_')")]
    BadCellCode { name: String, code: char },

    #[error("problem '{name}' references shape {shape} but the puzzle only has {count} shapes")]
    ShapeOutOfRange {
        name: String,
        shape: usize,
        count: usize,
    },

    #[error("problem '{name}' has no pieces")]
    EmptyProblem { name: String },

    #[error("problem '{name}' piece {piece} has an empty shape")]
    EmptyShape { name: String, piece: usize },

    #[error("problem '{name}' piece {piece} has min {min} > max {max}")]
    InconsistentRange {
        name: String,
        piece: usize,
        min: u32,
        max: u32,
    },

    #[error("problem '{name}' piece {piece} allows zero copies at most")]
    ZeroMaximum { name: String, piece: usize },

    #[error("puzzle has {count} problems, index {index} does not exist")]
    NoSuchProblem { index: usize, count: usize },

    #[error(
        "problem '{name}' has at most {capacity} piece cells for {cells} mandatory result cells"
    )]
    NotEnoughPieceCells {
        name: String,
        capacity: u32,
        cells: u32,
    },
}
