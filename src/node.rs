//! Node arena: index-linked tree nodes shared by every map in the crate.
//!
//! Nodes live in a `SlotMap` owned by the map. Parent and child relations are
//! `Option<NodeId>` indices rather than owning pointers, so rotations are plain
//! index reassignments and a node record never moves when the tree reshapes.
//! Each map defines its own node record (payload plus any extra field-sets)
//! and exposes the tree relations through [`TreeNode`].

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable index of a node inside a map's arena.
    pub struct NodeId;
}

/// Arena holding the node records of one map.
pub type Nodes<N> = SlotMap<NodeId, N>;

/// Which child of a parent a node occupies.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Tree relations of one node. `meta` is owned by the balancing policy
/// (a color for red-black trees, a height for AVL trees).
#[derive(Clone, Debug)]
pub struct Links<M> {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub meta: M,
}

impl<M> Links<M> {
    /// Detached links: no parent, no children.
    pub fn new(meta: M) -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            meta,
        }
    }

    #[inline]
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Number of children (0, 1 or 2).
    #[inline]
    pub fn degree(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }

    /// Forget every relation, keeping `meta` reset to `meta`.
    pub fn reset(&mut self, meta: M) {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.meta = meta;
    }
}

/// A node record that can take part in a balanced tree.
pub trait TreeNode {
    /// Per-node data owned by the balancing policy.
    type Meta: Copy;

    fn links(&self) -> &Links<Self::Meta>;
    fn links_mut(&mut self) -> &mut Links<Self::Meta>;

    /// Exchange the stored entry (key, value and anything that identifies the
    /// entry) with `other`, leaving both nodes' tree relations in place.
    fn swap_payload(&mut self, other: &mut Self);
}
