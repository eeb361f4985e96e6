//! Sparse occupied-cell sets.
//!
//! A `WorldMap` is the working representation of a shape once it has
//! been placed in the world: a map from grid cell to cell kind that can
//! be rotated and translated freely, independent of the dense grid the
//! shape was defined on.

use crate::geometry::bounding_box::BoundingBox;
use crate::geometry::rotation::rotate_point;
use rustc_hash::FxHashMap;

/// A grid cell coordinate.
pub type Point = [i32; 3];

/// Occupancy kind of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Must be covered by exactly one piece.
    Filled,
    /// May be covered by at most one piece.
    Variable,
}

/// Sparse set of occupied cells with their kinds.
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    cells: FxHashMap<Point, CellKind>,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, p: Point, kind: CellKind) {
        self.cells.insert(p, kind);
    }

    pub fn contains(&self, p: Point) -> bool {
        self.cells.contains_key(&p)
    }

    pub fn kind(&self, p: Point) -> Option<CellKind> {
        self.cells.get(&p).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, CellKind)> + '_ {
        self.cells.iter().map(|(&p, &k)| (p, k))
    }

    /// Cells sorted by (z, y, x). Used wherever a deterministic order
    /// matters, e.g. assigning matrix column indices.
    pub fn sorted_cells(&self) -> Vec<(Point, CellKind)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_by_key(|&(p, _)| (p[2], p[1], p[0]));
        cells
    }

    /// Rotate every cell around the origin.
    pub fn rotate(&mut self, rot: u8) {
        let rotated: FxHashMap<Point, CellKind> = self
            .cells
            .iter()
            .map(|(&p, &k)| (rotate_point(p, rot), k))
            .collect();
        self.cells = rotated;
    }

    /// Translate every cell by `(dx, dy, dz)`.
    pub fn translate(&mut self, dx: i32, dy: i32, dz: i32) {
        let translated: FxHashMap<Point, CellKind> = self
            .cells
            .iter()
            .map(|(&p, &k)| ([p[0] + dx, p[1] + dy, p[2] + dz], k))
            .collect();
        self.cells = translated;
    }

    /// Bounding box of the occupied cells. `None` when empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.cells.keys();
        let first = *iter.next()?;
        let mut bb = BoundingBox::from_point(first);
        for &p in iter {
            bb.include(p);
        }
        Some(bb)
    }
}

impl FromIterator<(Point, CellKind)> for WorldMap {
    fn from_iter<T: IntoIterator<Item = (Point, CellKind)>>(iter: T) -> Self {
        Self { cells: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> WorldMap {
        [([0, 0, 0], CellKind::Filled), ([1, 0, 0], CellKind::Filled), ([1, 1, 0], CellKind::Variable)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_membership() {
        let wm = sample_map();
        assert!(wm.contains([1, 1, 0]));
        assert!(!wm.contains([2, 0, 0]));
        assert_eq!(wm.kind([1, 1, 0]), Some(CellKind::Variable));
        assert_eq!(wm.len(), 3);
    }

    #[test]
    fn test_translate() {
        let mut wm = sample_map();
        wm.translate(2, -1, 3);
        assert!(wm.contains([2, -1, 3]));
        assert!(wm.contains([3, 0, 3]));
        assert_eq!(wm.len(), 3);
    }

    #[test]
    fn test_rotate_preserves_cell_count() {
        for rot in 0..24 {
            let mut wm = sample_map();
            wm.rotate(rot);
            assert_eq!(wm.len(), 3, "rotation {} dropped cells", rot);
        }
    }

    #[test]
    fn test_rotate_then_inverse_count() {
        // Rotation 2 is a 180 degree turn: applying it twice restores
        // the original set.
        let mut wm = sample_map();
        wm.rotate(2);
        wm.rotate(2);
        for (p, k) in sample_map().iter() {
            assert_eq!(wm.kind(p), Some(k));
        }
    }

    #[test]
    fn test_bounding_box() {
        let wm = sample_map();
        let bb = wm.bounding_box().unwrap();
        assert_eq!(bb.min, [0, 0, 0]);
        assert_eq!(bb.max, [1, 1, 0]);
        assert!(WorldMap::new().bounding_box().is_none());
    }

    #[test]
    fn test_sorted_cells_order() {
        let wm = sample_map();
        let sorted = wm.sorted_cells();
        let keys: Vec<_> = sorted.iter().map(|&(p, _)| p).collect();
        assert_eq!(keys, vec![[0, 0, 0], [1, 0, 0], [1, 1, 0]]);
    }
}
