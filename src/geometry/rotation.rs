//! The 24 proper rotations of the cubic grid and the symmetry-group
//! tables derived from them.
//!
//! A group of rotations is tracked as a 24-bit bitmap (bit `r` set means
//! rotation `r` is a member). The tables below are fixed properties of
//! the cubic rotation group and are used to prune redundant piece
//! placements during matrix construction.

use crate::geometry::world_map::Point;

/// Number of proper rotations of a cube.
pub const NUM_ROTATIONS: u8 = 24;

/// Bitmap covering all 24 rotations.
const FULL_ROTATION_MASK: u32 = 0x00FF_FFFF;

/// Row-major 3x3 rotation matrices, one per rotation index.
const ROTATION_MATRICES: [[i32; 9]; 24] = [
    [1, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, -1, 0, 1, 0],
    [1, 0, 0, 0, -1, 0, 0, 0, -1],
    [1, 0, 0, 0, 0, 1, 0, -1, 0],
    [0, 0, -1, 0, 1, 0, 1, 0, 0],
    [0, -1, 0, 0, 0, -1, 1, 0, 0],
    [0, 0, 1, 0, -1, 0, 1, 0, 0],
    [0, 1, 0, 0, 0, 1, 1, 0, 0],
    [-1, 0, 0, 0, 1, 0, 0, 0, -1],
    [-1, 0, 0, 0, 0, -1, 0, -1, 0],
    [-1, 0, 0, 0, -1, 0, 0, 0, 1],
    [-1, 0, 0, 0, 0, 1, 0, 1, 0],
    [0, 0, 1, 0, 1, 0, -1, 0, 0],
    [0, 1, 0, 0, 0, -1, -1, 0, 0],
    [0, 0, -1, 0, -1, 0, -1, 0, 0],
    [0, -1, 0, 0, 0, 1, -1, 0, 0],
    [0, -1, 0, 1, 0, 0, 0, 0, 1],
    [0, 0, 1, 1, 0, 0, 0, 1, 0],
    [0, 1, 0, 1, 0, 0, 0, 0, -1],
    [0, 0, -1, 1, 0, 0, 0, -1, 0],
    [0, 1, 0, -1, 0, 0, 0, 0, 1],
    [0, 0, -1, -1, 0, 0, 0, 1, 0],
    [0, -1, 0, -1, 0, 0, 0, 0, -1],
    [0, 0, 1, -1, 0, 0, 0, -1, 0],
];

/// For each rotation, the bitmap of the cyclic group it generates.
pub const ROTATION_SYMMETRY_GROUP: [u32; 24] = [
    1, 15, 5, 15, 4369, 8388641, 65, 131201, 257, 513, 1025, 2049, 4369, 532481, 16385, 2129921,
    1115137, 131201, 262145, 532481, 1115137, 2129921, 4194305, 8388641,
];

/// Composition table: `DOUBLE_ROTATIONS[24 * r1 + r2]` is the rotation
/// equivalent to applying `r1` first and `r2` second.
#[rustfmt::skip]
const DOUBLE_ROTATIONS: [u8; 576] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
    1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12, 17, 18, 19, 16, 21, 22, 23, 20,
    2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13, 18, 19, 16, 17, 22, 23, 20, 21,
    3, 0, 1, 2, 7, 4, 5, 6, 11, 8, 9, 10, 15, 12, 13, 14, 19, 16, 17, 18, 23, 20, 21, 22,
    4, 21, 14, 19, 8, 22, 2, 18, 12, 23, 6, 17, 0, 20, 10, 16, 5, 1, 13, 9, 7, 11, 15, 3,
    5, 22, 15, 16, 9, 23, 3, 19, 13, 20, 7, 18, 1, 21, 11, 17, 6, 2, 14, 10, 4, 8, 12, 0,
    6, 23, 12, 17, 10, 20, 0, 16, 14, 21, 4, 19, 2, 22, 8, 18, 7, 3, 15, 11, 5, 9, 13, 1,
    7, 20, 13, 18, 11, 21, 1, 17, 15, 22, 5, 16, 3, 23, 9, 19, 4, 0, 12, 8, 6, 10, 14, 2,
    8, 11, 10, 9, 12, 15, 14, 13, 0, 3, 2, 1, 4, 7, 6, 5, 22, 21, 20, 23, 18, 17, 16, 19,
    9, 8, 11, 10, 13, 12, 15, 14, 1, 0, 3, 2, 5, 4, 7, 6, 23, 22, 21, 20, 19, 18, 17, 16,
    10, 9, 8, 11, 14, 13, 12, 15, 2, 1, 0, 3, 6, 5, 4, 7, 20, 23, 22, 21, 16, 19, 18, 17,
    11, 10, 9, 8, 15, 14, 13, 12, 3, 2, 1, 0, 7, 6, 5, 4, 21, 20, 23, 22, 17, 16, 19, 18,
    12, 17, 6, 23, 0, 16, 10, 20, 4, 19, 14, 21, 8, 18, 2, 22, 15, 11, 7, 3, 13, 1, 5, 9,
    13, 18, 7, 20, 1, 17, 11, 21, 5, 16, 15, 22, 9, 19, 3, 23, 12, 8, 4, 0, 14, 2, 6, 10,
    14, 19, 4, 21, 2, 18, 8, 22, 6, 17, 12, 23, 10, 16, 0, 20, 13, 9, 5, 1, 15, 3, 7, 11,
    15, 16, 5, 22, 3, 19, 9, 23, 7, 18, 13, 20, 11, 17, 1, 21, 14, 10, 6, 2, 12, 0, 4, 8,
    16, 5, 22, 15, 19, 9, 23, 3, 18, 13, 20, 7, 17, 1, 21, 11, 10, 6, 2, 14, 0, 4, 8, 12,
    17, 6, 23, 12, 16, 10, 20, 0, 19, 14, 21, 4, 18, 2, 22, 8, 11, 7, 3, 15, 1, 5, 9, 13,
    18, 7, 20, 13, 17, 11, 21, 1, 16, 15, 22, 5, 19, 3, 23, 9, 8, 4, 0, 12, 2, 6, 10, 14,
    19, 4, 21, 14, 18, 8, 22, 2, 17, 12, 23, 6, 16, 0, 20, 10, 9, 5, 1, 13, 3, 7, 11, 15,
    20, 13, 18, 7, 21, 1, 17, 11, 22, 5, 16, 15, 23, 9, 19, 3, 0, 12, 8, 4, 10, 14, 2, 6,
    21, 14, 19, 4, 22, 2, 18, 8, 23, 6, 17, 12, 20, 10, 16, 0, 1, 13, 9, 5, 11, 15, 3, 7,
    22, 15, 16, 5, 23, 3, 19, 9, 20, 7, 18, 13, 21, 11, 17, 1, 2, 14, 10, 6, 8, 12, 0, 4,
    23, 12, 17, 6, 20, 0, 16, 10, 21, 4, 19, 14, 22, 8, 18, 2, 3, 15, 11, 7, 9, 13, 1, 5,
];

/// Inventory of the 30 possible self-symmetry groups of a voxel shape,
/// each stored as a rotation bitmap.
pub const SYMMETRY_GROUPS: [u32; 30] = [
    1, 5, 15, 65, 257, 513, 1025, 1285, 2049, 2565, 3855, 4369, 16385, 16705, 21845, 131201,
    262145, 532481, 1115137, 2129921, 2392641, 4194305, 4342401, 4457473, 4728897, 5571845,
    8388641, 8669217, 11183525, 16777215,
];

/// For each symmetry group, the bitmap of rotations a solver has to try
/// for a shape with that self-symmetry (one representative per coset).
pub const ROTATIONS_TO_CHECK: [u32; 30] = [
    16777215, 3355443, 1118481, 43967, 983295, 983295, 983295, 196659, 983295, 196659, 65553, 175,
    44783, 175, 35, 831, 22399, 1647, 95, 3279, 15, 24031, 15, 95, 15, 19, 2463, 15, 3, 1,
];

/// Apply rotation `rot` to a point.
pub fn rotate_point(p: Point, rot: u8) -> Point {
    let m = &ROTATION_MATRICES[rot as usize];
    [
        p[0] * m[0] + p[1] * m[1] + p[2] * m[2],
        p[0] * m[3] + p[1] * m[4] + p[2] * m[5],
        p[0] * m[6] + p[1] * m[7] + p[2] * m[8],
    ]
}

/// Rotation equivalent to applying `rot1` first and `rot2` second.
pub fn double_rotate(rot1: u8, rot2: u8) -> u8 {
    DOUBLE_ROTATIONS[24 * rot1 as usize + rot2 as usize]
}

/// Convert a list of rotation indices into a group bitmap.
pub fn rotations_to_bitmap(rotations: &[u8]) -> u32 {
    rotations.iter().fold(0, |acc, &r| acc | (1 << r))
}

/// Expand a group bitmap into its member rotation indices, ascending.
pub fn bitmap_to_rotations(bitmap: u32) -> Vec<u8> {
    (0..NUM_ROTATIONS).filter(|r| bitmap & (1 << r) != 0).collect()
}

/// Index of a group bitmap in [`SYMMETRY_GROUPS`], if it is one of the
/// 30 realizable groups.
pub fn symmetry_group_index(bitmap: u32) -> Option<usize> {
    SYMMETRY_GROUPS.iter().position(|&g| g == bitmap)
}

/// Drop rotations from `candidates` that are equivalent to an earlier
/// candidate modulo the result shape's self-symmetry group.
///
/// Two rotations of a piece produce the same assembly (up to a rotation
/// of the whole result) when they differ by a member of the result's
/// symmetry group, so only one representative per equivalence class has
/// to be tried.
pub fn reduce_rotations(result_group_id: usize, candidates: u32) -> u32 {
    let members = bitmap_to_rotations(SYMMETRY_GROUPS[result_group_id]);
    let mut keep = 0u32;
    let mut skip = 0u32;
    for rot in 0..NUM_ROTATIONS {
        let bit = 1u32 << rot;
        if candidates & bit == 0 || skip & bit != 0 {
            continue;
        }
        keep |= bit;
        // members[0] is always the identity
        for &sym in &members[1..] {
            skip |= 1 << double_rotate(rot, sym);
        }
    }
    keep & FULL_ROTATION_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rotation() {
        assert_eq!(rotate_point([3, -2, 7], 0), [3, -2, 7]);
    }

    #[test]
    fn test_rotations_preserve_length() {
        let p = [1, 2, 3];
        for rot in 0..NUM_ROTATIONS {
            let r = rotate_point(p, rot);
            assert_eq!(
                r[0] * r[0] + r[1] * r[1] + r[2] * r[2],
                p[0] * p[0] + p[1] * p[1] + p[2] * p[2],
                "rotation {} is not orthogonal",
                rot
            );
        }
    }

    #[test]
    fn test_rotations_are_distinct() {
        // No two rotations may map the probe basis identically.
        let probes = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];
        for a in 0..NUM_ROTATIONS {
            for b in (a + 1)..NUM_ROTATIONS {
                let same = probes
                    .iter()
                    .all(|&p| rotate_point(p, a) == rotate_point(p, b));
                assert!(!same, "rotations {} and {} coincide", a, b);
            }
        }
    }

    #[test]
    fn test_double_rotate_matches_matrix_composition() {
        let probes = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];
        for r1 in 0..NUM_ROTATIONS {
            for r2 in 0..NUM_ROTATIONS {
                let composed = double_rotate(r1, r2);
                for &p in &probes {
                    assert_eq!(
                        rotate_point(rotate_point(p, r1), r2),
                        rotate_point(p, composed)
                    );
                }
            }
        }
    }

    #[test]
    fn test_double_rotate_identity() {
        for r in 0..NUM_ROTATIONS {
            assert_eq!(double_rotate(r, 0), r);
            assert_eq!(double_rotate(0, r), r);
        }
    }

    #[test]
    fn test_bitmap_round_trip() {
        let rotations = vec![0u8, 4, 16, 23];
        let bitmap = rotations_to_bitmap(&rotations);
        assert_eq!(bitmap_to_rotations(bitmap), rotations);
    }

    #[test]
    fn test_symmetry_group_lookup() {
        assert_eq!(symmetry_group_index(1), Some(0));
        assert_eq!(symmetry_group_index(16777215), Some(29));
        assert_eq!(symmetry_group_index(2), None);
    }

    #[test]
    fn test_rotations_to_check_sizes() {
        // Each group partitions the 24 rotations into cosets; the check
        // set holds one representative per coset.
        for (i, &group) in SYMMETRY_GROUPS.iter().enumerate() {
            let order = group.count_ones();
            let reps = ROTATIONS_TO_CHECK[i].count_ones();
            assert_eq!(order * reps, 24, "group {} has order {}", i, order);
        }
    }

    #[test]
    fn test_reduce_rotations_identity_group_is_noop() {
        // Group 0 is the identity-only group, so nothing reduces.
        let candidates = rotations_to_bitmap(&[0, 4, 16]);
        assert_eq!(reduce_rotations(0, candidates), candidates);
    }

    #[test]
    fn test_reduce_rotations_full_group_keeps_one() {
        // Group 29 is the full rotation group: all 24 rotations are
        // equivalent, so a full candidate set collapses to one.
        let reduced = reduce_rotations(29, FULL_ROTATION_MASK);
        assert_eq!(reduced.count_ones(), 1);
        assert_eq!(reduced & 1, 1);
    }
}
