//! Search-tree nodes and their arena.
//!
//! A node is one reachable spatial configuration of a piece group. The
//! piece identities (shapes, rotations, hotspots) never change within
//! one group, so they live in a shared `RootDetails` record; each node
//! carries only its per-piece offsets and the move that produced it.

use std::rc::Rc;

use crate::assembly::Assembly;
use crate::geometry::Point;

/// Immutable per-group piece data shared by every node of one root.
#[derive(Debug)]
pub struct RootDetails {
    /// Shape id of each piece.
    pub shapes: Vec<usize>,
    pub rotations: Vec<u8>,
    pub hotspots: Vec<Point>,
    /// Index of each piece in the original assembly, so traces can
    /// name pieces consistently across separations.
    pub source: Vec<usize>,
}

/// Handle into a `NodePool`.
pub type NodeHandle = usize;

/// One configuration: shared details plus per-piece offsets and the
/// move that led here.
#[derive(Debug)]
pub struct Node {
    pub details: Rc<RootDetails>,
    /// Translation of each piece relative to the assembled state.
    pub offsets: Vec<Point>,
    /// Piece indices (within this group) moved to reach this node.
    pub moving: Vec<usize>,
    pub direction: Point,
    pub is_separation: bool,
    pub parent: Option<NodeHandle>,
}

impl Node {
    pub fn piece_count(&self) -> usize {
        self.details.shapes.len()
    }

    /// Translation-invariant identity: offsets relative to piece 0.
    /// Two nodes reached by different move orders but leaving every
    /// piece in the same relative position share an id.
    pub fn canonical_id(&self) -> Vec<i32> {
        let mut id = Vec::with_capacity(3 * self.offsets.len().saturating_sub(1));
        let base = self.offsets[0];
        for offset in &self.offsets[1..] {
            id.push(offset[0] - base[0]);
            id.push(offset[1] - base[1]);
            id.push(offset[2] - base[2]);
        }
        id
    }
}

/// Arena of recycled nodes, owned by one solving worker. Handles stay
/// valid until the pool itself is dropped; released handles may be
/// handed out again.
#[derive(Debug, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
    free: Vec<NodeHandle>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: NodeHandle) -> &Node {
        &self.nodes[handle]
    }

    fn acquire(&mut self, node: Node) -> NodeHandle {
        match self.free.pop() {
            Some(handle) => {
                self.nodes[handle] = node;
                handle
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Nodes currently checked out of the free list.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Returns a node to the free list. No live node may still reach
    /// `handle` through its parent chain.
    pub fn release(&mut self, handle: NodeHandle) {
        self.nodes[handle].offsets.clear();
        self.nodes[handle].moving.clear();
        self.nodes[handle].parent = None;
        self.free.push(handle);
    }

    /// Root node for a whole assembly, pieces in assembly order.
    pub fn root_from_assembly(&mut self, assembly: &Assembly) -> NodeHandle {
        let mut details = RootDetails {
            shapes: Vec::with_capacity(assembly.len()),
            rotations: Vec::with_capacity(assembly.len()),
            hotspots: Vec::with_capacity(assembly.len()),
            source: Vec::with_capacity(assembly.len()),
        };
        let mut offsets = Vec::with_capacity(assembly.len());
        for (index, annotation) in assembly.iter().enumerate() {
            details.shapes.push(annotation.shape);
            details.rotations.push(annotation.rotation);
            details.hotspots.push(annotation.hotspot);
            details.source.push(index);
            offsets.push(annotation.offset);
        }
        self.acquire(Node {
            details: Rc::new(details),
            offsets,
            moving: Vec::new(),
            direction: [0, 0, 0],
            is_separation: false,
            parent: None,
        })
    }

    /// Child of `parent` with `moving` translated by `translation`.
    pub fn child(
        &mut self,
        parent: NodeHandle,
        moving: &[usize],
        translation: Point,
        is_separation: bool,
    ) -> NodeHandle {
        let parent_node = &self.nodes[parent];
        let details = Rc::clone(&parent_node.details);
        let mut offsets = parent_node.offsets.clone();
        for &piece in moving {
            offsets[piece][0] += translation[0];
            offsets[piece][1] += translation[1];
            offsets[piece][2] += translation[2];
        }
        self.acquire(Node {
            details,
            offsets,
            moving: moving.to_vec(),
            direction: translation,
            is_separation,
            parent: Some(parent),
        })
    }

    /// Splits a separation node into sub-roots for its two piece
    /// groups, keeping only groups with more than one piece (single
    /// pieces are trivially free).
    pub fn separate(&mut self, handle: NodeHandle) -> Vec<NodeHandle> {
        let node = &self.nodes[handle];
        debug_assert!(node.is_separation, "separate called on a plain move");
        let piece_count = node.piece_count();
        let moving = node.moving.clone();
        let mut roots = Vec::new();
        let staying: Vec<usize> = (0..piece_count).filter(|p| !moving.contains(p)).collect();
        if staying.len() > 1 {
            roots.push(self.sub_root(handle, &staying));
        }
        if moving.len() > 1 {
            roots.push(self.sub_root(handle, &moving));
        }
        roots
    }

    fn sub_root(&mut self, handle: NodeHandle, pieces: &[usize]) -> NodeHandle {
        let node = &self.nodes[handle];
        let mut details = RootDetails {
            shapes: Vec::with_capacity(pieces.len()),
            rotations: Vec::with_capacity(pieces.len()),
            hotspots: Vec::with_capacity(pieces.len()),
            source: Vec::with_capacity(pieces.len()),
        };
        let mut offsets = Vec::with_capacity(pieces.len());
        for &piece in pieces {
            details.shapes.push(node.details.shapes[piece]);
            details.rotations.push(node.details.rotations[piece]);
            details.hotspots.push(node.details.hotspots[piece]);
            details.source.push(node.details.source[piece]);
            offsets.push(node.offsets[piece]);
        }
        // Sub-roots start a fresh chain; trace walks stop at them, so
        // the spent parent group can be recycled wholesale.
        self.acquire(Node {
            details: Rc::new(details),
            offsets,
            moving: Vec::new(),
            direction: [0, 0, 0],
            is_separation: false,
            parent: None,
        })
    }
}
