//! Geometry primitives: rotations, symmetry tables, bounding boxes and
//! sparse cell sets.

pub mod bounding_box;
pub mod rotation;
pub mod world_map;

pub use bounding_box::BoundingBox;
pub use rotation::{
    bitmap_to_rotations, double_rotate, reduce_rotations, rotate_point, rotations_to_bitmap,
    symmetry_group_index, NUM_ROTATIONS, ROTATIONS_TO_CHECK, ROTATION_SYMMETRY_GROUP,
    SYMMETRY_GROUPS,
};
pub use world_map::{CellKind, Point, WorldMap};
