//! Dense voxel grids and their self-symmetries.

use crate::geometry::rotation::{double_rotate, symmetry_group_index, ROTATION_SYMMETRY_GROUP};
use crate::geometry::{rotate_point, CellKind, Point, WorldMap};
use crate::puzzle::error::PuzzleError;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    /// Mandatory material.
    Filled,
    /// Optional material. Only meaningful on a result shape, where it
    /// marks cells a piece may but need not cover.
    Variable,
}

/// Rotation order probing each symmetry axis family once; together with
/// group closure it discovers the full self-symmetry group without
/// testing all 24 rotations.
const SYMMETRY_PROBE_ORDER: [u8; 16] = [1, 4, 10, 2, 8, 16, 5, 7, 13, 15, 6, 9, 11, 14, 18, 22];

/// A shape on a dense X by Y by Z grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voxel {
    name: String,
    x: i32,
    y: i32,
    z: i32,
    cells: Vec<CellState>,
}

impl Voxel {
    /// Parses a grid from a layer string. The string lists cells with x
    /// varying fastest, then y, then z, using `#` for filled, `+` for
    /// variable and `_` for empty.
    pub fn parse(name: &str, x: i32, y: i32, z: i32, text: &str) -> Result<Self, PuzzleError> {
        if x <= 0 || y <= 0 || z <= 0 {
            return Err(PuzzleError::BadDimensions {
                name: name.to_string(),
                x,
                y,
                z,
            });
        }
        let expected = (x * y * z) as usize;
        let mut cells = Vec::with_capacity(expected);
        for code in text.chars().filter(|c| !c.is_whitespace()) {
            cells.push(match code {
                '#' => CellState::Filled,
                '+' => CellState::Variable,
                '_' => CellState::Empty,
                _ => {
                    return Err(PuzzleError::BadCellCode {
                        name: name.to_string(),
                        code,
                    })
                }
            });
        }
        if cells.len() != expected {
            return Err(PuzzleError::CellCountMismatch {
                name: name.to_string(),
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            x,
            y,
            z,
            cells,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid dimensions along x, y and z.
    pub fn dimensions(&self) -> Point {
        [self.x, self.y, self.z]
    }

    /// State of cell (x, y, z). Coordinates outside the grid are empty.
    pub fn state(&self, x: i32, y: i32, z: i32) -> CellState {
        if x < 0 || y < 0 || z < 0 || x >= self.x || y >= self.y || z >= self.z {
            return CellState::Empty;
        }
        self.cells[(x + y * self.x + z * self.x * self.y) as usize]
    }

    /// Number of occupied cells, variable ones included.
    pub fn size(&self) -> u32 {
        self.cells
            .iter()
            .filter(|c| !matches!(c, CellState::Empty))
            .count() as u32
    }

    /// Number of mandatory cells only.
    pub fn filled_size(&self) -> u32 {
        self.cells
            .iter()
            .filter(|c| matches!(c, CellState::Filled))
            .count() as u32
    }

    /// Total grid capacity.
    pub fn volume(&self) -> u32 {
        (self.x * self.y * self.z) as u32
    }

    /// Sparse view of the occupied cells.
    pub fn world_map(&self) -> WorldMap {
        let mut wm = WorldMap::new();
        for z in 0..self.z {
            for y in 0..self.y {
                for x in 0..self.x {
                    match self.state(x, y, z) {
                        CellState::Filled => wm.insert([x, y, z], CellKind::Filled),
                        CellState::Variable => wm.insert([x, y, z], CellKind::Variable),
                        CellState::Empty => {}
                    }
                }
            }
        }
        wm
    }

    /// Index into `SYMMETRY_GROUPS` of this shape's self-symmetry
    /// group. Probes a fixed rotation sequence and closes the found
    /// rotations under composition, so each rotation is tested at most
    /// once.
    pub fn self_symmetry_group(&self) -> usize {
        let wm = self.world_map();
        let bb = match wm.bounding_box() {
            Some(bb) => bb,
            // An empty shape is symmetric under everything.
            None => return symmetry_group_index(0xFFFFFF).unwrap_or(0),
        };
        let size = bb.size();

        let mut symmetry_bitmap: u32 = 1;
        for &rot in &SYMMETRY_PROBE_ORDER {
            if symmetry_bitmap & (1 << rot) != 0 {
                continue;
            }
            let rmin = rotate_point(bb.min, rot);
            let rmax = rotate_point(bb.max, rot);
            let mut offset = [0i32; 3];
            let mut rsize = [0i32; 3];
            for dim in 0..3 {
                let lo = rmin[dim].min(rmax[dim]);
                let hi = rmin[dim].max(rmax[dim]);
                rsize[dim] = hi - lo + 1;
                offset[dim] = bb.min[dim] - lo;
            }
            if rsize != size {
                continue;
            }
            let symmetric = wm.iter().all(|(p, _)| {
                let r = rotate_point(p, rot);
                wm.contains([r[0] + offset[0], r[1] + offset[1], r[2] + offset[2]])
            });
            if symmetric {
                symmetry_bitmap = close_under_composition(
                    symmetry_bitmap,
                    ROTATION_SYMMETRY_GROUP[rot as usize],
                );
            }
        }
        symmetry_group_index(symmetry_bitmap).unwrap_or_else(|| {
            debug_assert!(
                false,
                "closed rotation set {symmetry_bitmap:#x} matches no known group"
            );
            0
        })
    }
}

/// Extends `bitmap` with every composition of its members with members
/// of `addition`.
fn close_under_composition(bitmap: u32, addition: u32) -> u32 {
    let mut result = bitmap;
    for n in 0..24u8 {
        if addition & (1 << n) == 0 {
            continue;
        }
        for r in 0..24u8 {
            if bitmap & (1 << r) == 0 {
                continue;
            }
            result |= 1 << double_rotate(r, n);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SYMMETRY_GROUPS;

    #[test]
    fn test_parse_and_state() {
        let v = Voxel::parse("l", 2, 2, 1, "##_+").unwrap();
        assert_eq!(v.state(0, 0, 0), CellState::Filled);
        assert_eq!(v.state(1, 0, 0), CellState::Filled);
        assert_eq!(v.state(0, 1, 0), CellState::Empty);
        assert_eq!(v.state(1, 1, 0), CellState::Variable);
        assert_eq!(v.state(5, 0, 0), CellState::Empty);
        assert_eq!(v.size(), 3);
        assert_eq!(v.filled_size(), 2);
        assert_eq!(v.volume(), 4);
    }

    #[test]
    fn test_parse_ignores_whitespace() {
        let v = Voxel::parse("s", 2, 1, 2, "##\n__").unwrap();
        assert_eq!(v.size(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Voxel::parse("b", 2, 1, 1, "#"),
            Err(PuzzleError::CellCountMismatch { .. })
        ));
        assert!(matches!(
            Voxel::parse("b", 2, 1, 1, "#x"),
            Err(PuzzleError::BadCellCode { code: 'x', .. })
        ));
        assert!(matches!(
            Voxel::parse("b", 0, 1, 1, ""),
            Err(PuzzleError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_unit_cube_full_symmetry() {
        let v = Voxel::parse("cube", 1, 1, 1, "#").unwrap();
        let group = v.self_symmetry_group();
        assert_eq!(SYMMETRY_GROUPS[group], 0xFFFFFF);
    }

    #[test]
    fn test_domino_symmetry() {
        // A bar along y keeps the four rotations about y plus the four
        // 180 degree turns reversing it, the even-index rotations.
        let v = Voxel::parse("domino", 1, 2, 1, "##").unwrap();
        let group = v.self_symmetry_group();
        assert_eq!(SYMMETRY_GROUPS[group], 21845);
    }

    #[test]
    fn test_x_bar_symmetry() {
        // The same bar along x is fixed by the rotations about x and
        // the turns reversing it, bitmap 3855.
        let v = Voxel::parse("bar", 2, 1, 1, "##").unwrap();
        let group = v.self_symmetry_group();
        assert_eq!(SYMMETRY_GROUPS[group], 3855);
    }

    #[test]
    fn test_tromino_diagonal_symmetry() {
        // The corner tromino is fixed by one 180 degree rotation about
        // a face diagonal, so its group has two elements.
        let v = Voxel::parse("l", 2, 2, 1, "##_#").unwrap();
        let group = v.self_symmetry_group();
        assert_eq!(SYMMETRY_GROUPS[group].count_ones(), 2);
    }

    #[test]
    fn test_asymmetric_shape() {
        // The planar L tetromino has distinct edge lengths and no
        // fixing rotation, only the identity.
        let v = Voxel::parse("l4", 2, 3, 1, "###_#_").unwrap();
        let group = v.self_symmetry_group();
        assert_eq!(SYMMETRY_GROUPS[group], 1);
    }

    #[test]
    fn test_square_slab_symmetry_order() {
        // A 2x2x1 slab has the 8 symmetries of the square.
        let v = Voxel::parse("slab", 2, 2, 1, "####").unwrap();
        let group = v.self_symmetry_group();
        assert_eq!(SYMMETRY_GROUPS[group].count_ones(), 8);
    }
}
