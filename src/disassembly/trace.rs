//! Structured separation traces.
//!
//! A trace records, for each sub-group that separated, the moves from
//! that group's starting configuration up to the separating move, in
//! order. Piece numbers refer to positions in the original assembly so
//! the phases of one solve can be stitched together for playback.

use serde::{Deserialize, Serialize};

use crate::disassembly::node::{NodeHandle, NodePool};

/// One intermediate configuration on the way to a separation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveState {
    /// Pieces translated by this move, as original assembly indices.
    pub moving: Vec<usize>,
    pub direction: [i32; 3],
    /// Offsets of every piece of the phase after this move, aligned
    /// with the phase's `pieces` list.
    pub offsets: Vec<[i32; 3]>,
}

/// The moves of one group from its start state to its separation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparationPhase {
    /// Original assembly indices of the pieces in this group.
    pub pieces: Vec<usize>,
    /// Root-to-leaf move states; the last one is the separating move.
    pub states: Vec<MoveState>,
}

/// All separation phases of one solved assembly, in the order they
/// were found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisassemblyTrace {
    pub phases: Vec<SeparationPhase>,
}

/// Builds the phase ending in `separation` by walking its parent chain
/// back to the group's root node.
pub fn phase_from_separation(pool: &NodePool, separation: NodeHandle) -> SeparationPhase {
    let details = &pool.get(separation).details;
    let pieces = details.source.clone();
    let mut states = Vec::new();
    let mut cursor = separation;
    // Root nodes carry no move of their own.
    while !pool.get(cursor).moving.is_empty() {
        let node = pool.get(cursor);
        states.push(MoveState {
            moving: node.moving.iter().map(|&p| details.source[p]).collect(),
            direction: node.direction,
            offsets: node.offsets.clone(),
        });
        match node.parent {
            Some(parent) => cursor = parent,
            None => break,
        }
    }
    states.reverse();
    SeparationPhase { pieces, states }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Annotation;

    fn assembly_of(offsets: &[[i32; 3]]) -> crate::assembly::Assembly {
        offsets
            .iter()
            .map(|&offset| Annotation {
                part: 0,
                copy: 0,
                shape: 0,
                rotation: 0,
                hotspot: [0, 0, 0],
                offset,
            })
            .collect()
    }

    #[test]
    fn test_phase_preserves_move_order() {
        let mut pool = NodePool::new();
        let root = pool.root_from_assembly(&assembly_of(&[[0, 0, 0], [1, 0, 0]]));
        let step = pool.child(root, &[1], [0, 1, 0], false);
        let separation = pool.child(step, &[1], [0, 10_000, 0], true);
        let phase = phase_from_separation(&pool, separation);
        assert_eq!(phase.pieces, vec![0, 1]);
        assert_eq!(phase.states.len(), 2);
        assert_eq!(phase.states[0].direction, [0, 1, 0]);
        assert_eq!(phase.states[1].direction, [0, 10_000, 0]);
        assert_eq!(phase.states[0].offsets[1], [1, 1, 0]);
    }

    #[test]
    fn test_trace_serializes_round_trip() {
        let trace = DisassemblyTrace {
            phases: vec![SeparationPhase {
                pieces: vec![0, 2],
                states: vec![MoveState {
                    moving: vec![2],
                    direction: [1, 0, 0],
                    offsets: vec![[0, 0, 0], [3, 0, 0]],
                }],
            }],
        };
        let json = serde_json::to_string(&trace).unwrap();
        let back: DisassemblyTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
    }
}
