//! Puzzle definitions: voxel shapes, problems and file formats.

pub mod error;
pub mod instance;
pub mod io;
pub mod problem;
pub mod voxel;

pub use error::PuzzleError;
pub use instance::PieceInstance;
pub use io::{example_puzzle, load_puzzle_from_file, parse_puzzle, save_puzzle_to_file};
pub use problem::{PieceEntry, Problem, Puzzle};
pub use voxel::{CellState, Voxel};
