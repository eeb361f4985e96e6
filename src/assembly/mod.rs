//! Assembly enumeration: exact-cover matrix construction and search.

pub mod dlx;
pub mod matrix;

pub use matrix::{Annotation, CoverMatrix, MatrixRow, MatrixStatistics};

/// One complete placement of pieces filling the result shape, as the
/// ordered list of chosen matrix row annotations.
pub type Assembly = Vec<Annotation>;
