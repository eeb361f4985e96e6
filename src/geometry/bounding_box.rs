//! Axis-aligned integer bounding boxes.

use crate::geometry::world_map::Point;

/// Inclusive axis-aligned bounding box over grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Box containing exactly one cell.
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Extend the box to contain `p`.
    pub fn include(&mut self, p: Point) {
        for dim in 0..3 {
            self.min[dim] = self.min[dim].min(p[dim]);
            self.max[dim] = self.max[dim].max(p[dim]);
        }
    }

    /// Edge lengths in cells along each axis.
    pub fn size(&self) -> Point {
        [
            self.max[0] - self.min[0] + 1,
            self.max[1] - self.min[1] + 1,
            self.max[2] - self.min[2] + 1,
        ]
    }

    /// Whether `p` lies inside the box.
    pub fn contains(&self, p: Point) -> bool {
        (0..3).all(|dim| self.min[dim] <= p[dim] && p[dim] <= self.max[dim])
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut min = self.min;
        let mut max = self.max;
        for dim in 0..3 {
            min[dim] = min[dim].min(other.min[dim]);
            max[dim] = max[dim].max(other.max[dim]);
        }
        BoundingBox { min, max }
    }

    /// Largest box contained in both boxes. May be empty (some
    /// `min > max`); scan loops over an empty range simply do nothing.
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        let mut min = self.min;
        let mut max = self.max;
        for dim in 0..3 {
            min[dim] = min[dim].max(other.min[dim]);
            max[dim] = max[dim].min(other.max[dim]);
        }
        BoundingBox { min, max }
    }

    /// Translate the box by `(dx, dy, dz)`.
    pub fn translated(&self, dx: i32, dy: i32, dz: i32) -> BoundingBox {
        BoundingBox {
            min: [self.min[0] + dx, self.min[1] + dy, self.min[2] + dz],
            max: [self.max[0] + dx, self.max[1] + dy, self.max[2] + dz],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_and_size() {
        let mut bb = BoundingBox::from_point([0, 0, 0]);
        bb.include([2, -1, 3]);
        assert_eq!(bb.min, [0, -1, 0]);
        assert_eq!(bb.max, [2, 0, 3]);
        assert_eq!(bb.size(), [3, 2, 4]);
    }

    #[test]
    fn test_union_intersection() {
        let a = BoundingBox { min: [0, 0, 0], max: [2, 2, 2] };
        let b = BoundingBox { min: [1, 1, 1], max: [4, 4, 4] };
        assert_eq!(a.union(&b), BoundingBox { min: [0, 0, 0], max: [4, 4, 4] });
        assert_eq!(
            a.intersection(&b),
            BoundingBox { min: [1, 1, 1], max: [2, 2, 2] }
        );
    }

    #[test]
    fn test_contains() {
        let bb = BoundingBox { min: [0, 0, 0], max: [1, 1, 1] };
        assert!(bb.contains([1, 0, 1]));
        assert!(!bb.contains([2, 0, 0]));
    }
}
