//! Rotated, origin-normalized shape placements.

use crate::geometry::{rotate_point, BoundingBox, Point, WorldMap};
use crate::puzzle::voxel::Voxel;

/// A shape in one of its 24 orientations, translated so its bounding
/// box starts at the origin. The hotspot is where the shape's local
/// origin ended up after rotation and normalization; subtracting it
/// from a placement offset recovers absolute world coordinates.
#[derive(Debug, Clone)]
pub struct PieceInstance {
    rotation: u8,
    world_map: WorldMap,
    bounding_box: BoundingBox,
    hotspot: Point,
}

impl PieceInstance {
    pub fn new(voxel: &Voxel, rotation: u8) -> Self {
        let mut world_map = voxel.world_map();
        world_map.rotate(rotation);
        let bb = world_map
            .bounding_box()
            .unwrap_or(BoundingBox::from_point([0, 0, 0]));
        let shift = [-bb.min[0], -bb.min[1], -bb.min[2]];
        world_map.translate(shift[0], shift[1], shift[2]);
        let origin = rotate_point([0, 0, 0], rotation);
        let hotspot = [
            origin[0] + shift[0],
            origin[1] + shift[1],
            origin[2] + shift[2],
        ];
        Self {
            rotation,
            bounding_box: bb.translated(shift[0], shift[1], shift[2]),
            world_map,
            hotspot,
        }
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn world_map(&self) -> &WorldMap {
        &self.world_map
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn hotspot(&self) -> Point {
        self.hotspot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_instance_is_unmoved() {
        let v = Voxel::parse("l", 2, 2, 1, "##_#").unwrap();
        let inst = PieceInstance::new(&v, 0);
        assert_eq!(inst.hotspot(), [0, 0, 0]);
        assert!(inst.world_map().contains([0, 0, 0]));
        assert!(inst.world_map().contains([1, 1, 0]));
        assert_eq!(inst.bounding_box().min, [0, 0, 0]);
    }

    #[test]
    fn test_rotated_instance_is_normalized() {
        let v = Voxel::parse("bar", 3, 1, 1, "###").unwrap();
        for rot in 0..24 {
            let inst = PieceInstance::new(&v, rot);
            assert_eq!(inst.world_map().len(), 3);
            let bb = inst.world_map().bounding_box().unwrap();
            assert_eq!(bb.min, [0, 0, 0], "rotation {} not normalized", rot);
        }
    }

    #[test]
    fn test_hotspot_recovers_origin() {
        // The cell at the local origin must land on the hotspot.
        let v = Voxel::parse("l", 2, 2, 1, "##_#").unwrap();
        for rot in 0..24 {
            let inst = PieceInstance::new(&v, rot);
            assert!(
                inst.world_map().contains(inst.hotspot()),
                "rotation {} lost the origin cell",
                rot
            );
        }
    }
}
