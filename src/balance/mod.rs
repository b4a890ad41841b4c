//! Rebalancing policies for the tree engine.
//!
//! A policy owns the per-node metadata (`Meta`) and restores its invariants
//! after the engine attaches or unlinks a node. The engine does the plain
//! binary-search-tree work; the policy only recolors and rotates.
//!
//! - [`RedBlack`]: color per node, at most one restructuring per insert and
//!   at most three rotations per delete.
//! - [`Avl`]: height per node, stricter balance at the cost of more
//!   rotations on delete.

mod avl;
mod red_black;

pub use avl::Avl;
pub use red_black::{Color, RedBlack};

use crate::error::InvariantViolation;
use crate::node::{NodeId, Nodes, TreeNode};
use core::fmt::Debug;

mod sealed {
    pub trait Sealed {}
}

/// A balancing strategy usable by [`TreeMap`](crate::TreeMap) and
/// [`TreeSet`](crate::TreeSet).
///
/// Only [`RedBlack`] and [`Avl`] implement it. The hooks operate on the
/// crate's node arena, which is not part of the public API.
#[allow(private_bounds, private_interfaces)]
pub trait Balance: sealed::Sealed {
    #[doc(hidden)]
    type Meta: Copy + Debug + PartialEq;

    /// Metadata for a node that is about to be attached as a leaf.
    #[doc(hidden)]
    fn fresh() -> Self::Meta;

    /// Restore the invariants after `inserted` was attached as a leaf (or as
    /// the root of an empty tree).
    #[doc(hidden)]
    fn after_insert<N: TreeNode<Meta = Self::Meta>>(
        nodes: &mut Nodes<N>,
        root: &mut Option<NodeId>,
        inserted: NodeId,
    );

    /// Restore the invariants after `removed` was spliced out. `replacement`
    /// is the child that took its place (if any) and `parent` its former
    /// parent. `removed` still holds its metadata when this runs.
    #[doc(hidden)]
    fn after_remove<N: TreeNode<Meta = Self::Meta>>(
        nodes: &mut Nodes<N>,
        root: &mut Option<NodeId>,
        removed: NodeId,
        replacement: Option<NodeId>,
        parent: Option<NodeId>,
    );

    /// Verify the policy's invariants for the tree at `root`.
    #[doc(hidden)]
    fn check<N: TreeNode<Meta = Self::Meta>>(
        nodes: &Nodes<N>,
        root: Option<NodeId>,
    ) -> Result<(), InvariantViolation>;
}

impl sealed::Sealed for RedBlack {}
impl sealed::Sealed for Avl {}
