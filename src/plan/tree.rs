//! The immutable plan tree a homogeneity-based planning pass produces: a
//! small AST of INTERNAL/SPAWN/SYNC nodes that the executor replays without
//! re-running any predicate, since
//! every region decision was already made while building the tree.

use crate::geometry::Zoid;

/// One node of a plan tree.
pub enum PlanNode<const N: usize> {
    /// A further space/time cut whose children are plan nodes in their own
    /// right — mirrors the recursive call structure of an un-planned run.
    Internal { children: Vec<PlanNode<N>> },
    /// A leaf that can run as one region-homogeneous unit: `region` is the
    /// index into the [`super::homogeneity_vector::HomogeneityTable`] that
    /// decided this leaf is safe to fuse, `aligned` records whether the
    /// region boundary lines up with the zoid's natural cut points (letting
    /// the executor dispatch the faster "aligned" kernel instead of a
    /// conditional one).
    Spawn {
        zoid: Zoid<N>,
        t: i64,
        lt: i64,
        region: usize,
        aligned: bool,
        /// Whether this leaf touched a physical boundary and needs the
        /// `b`-prefixed kernel variants.
        boundary: bool,
    },
    /// A fork-join barrier: everything queued before a `Sync` node must finish
    /// before anything after it starts.
    Sync,
}

/// The root of a built plan, plus the homogeneity table its `region` indices
/// refer to.
pub struct PlanTree<const N: usize> {
    pub root: PlanNode<N>,
    pub regions: usize,
}

impl<const N: usize> PlanNode<N> {
    /// Counts the SPAWN leaves in this subtree — used by tests checking plan
    /// idempotence.
    pub fn spawn_count(&self) -> usize {
        match self {
            PlanNode::Internal { children } => children.iter().map(PlanNode::spawn_count).sum(),
            PlanNode::Spawn { .. } => 1,
            PlanNode::Sync => 0,
        }
    }
}
