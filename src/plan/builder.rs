//! Builds a [`PlanTree`] by walking the same axis/time recursion the direct
//! drivers use, but recording the decisions instead of executing them.
//! A region's homogeneity vector is whatever [`Kernels::region_label`]
//! returns for a candidate zoid; the planner treats it as opaque and only
//! compares it for equality via the [`HomogeneityTable`], so two zoids that
//! share a label dedup into the same plan-tree region regardless of their
//! own geometry.

use crate::config::Config;
use crate::geometry::{touch_boundary, Zoid};
use crate::kernel::Kernels;
use crate::queue::Color;
use crate::regime::{Regime, ShorterBarRegime};

use super::homogeneity_vector::HomogeneityTable;
use super::tree::{PlanNode, PlanTree};

/// Builds a complete plan for `zoid` over `[t, t+lt)`. The homogeneity
/// predicate is consulted once per candidate region; once it says `true` the
/// planner stops recursing into that subtree and records a SPAWN leaf,
/// before ever attempting a space or time cut on it (§4.6 step 2 runs before
/// steps 3/4).
pub fn build_plan<const N: usize, K: Kernels<N>>(config: &Config<N>, kernels: &K, zoid: &Zoid<N>, t: i64, lt: i64) -> PlanTree<N> {
    let mut table = HomogeneityTable::new();
    let root = build_node(config, kernels, zoid, t, lt, &mut table);
    PlanTree {
        root,
        regions: table.len(),
    }
}

fn spawn_leaf<const N: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
    region: usize,
) -> PlanNode<N> {
    let unroll = kernels.unroll().max(1);
    let shifted_t = t - config.thresholds.time_shift;
    let shifted_end = shifted_t + lt;
    let aligned = shifted_t % unroll == 0 && shifted_end % unroll == 0;
    let boundary = leaf_touches_boundary(config, zoid, lt);
    PlanNode::Spawn { zoid: *zoid, t, lt, region, aligned, boundary }
}

fn build_node<const N: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
    table: &mut HomogeneityTable,
) -> PlanNode<N> {
    zoid.check_invariant(lt);

    // Step 2: a homogeneous region is always a SPAWN leaf, with no further
    // conjunction on `lt` — a region that's homogeneous over its whole time
    // span doesn't need to wait for `lt` to shrink before being recorded.
    let label = kernels.region_label(zoid, t, lt);
    if kernels.is_homogeneous(&label) {
        let region = table.index_of(&label);
        return spawn_leaf(config, kernels, zoid, t, lt, region);
    }

    // Step 3: attempt a space cut on a non-homogeneous region, using the
    // planner's own homogeneity-stop thresholds (`dx_homo`) rather than the
    // interior/boundary ones the direct drivers use.
    for axis in 0..N {
        if !homogeneity_can_cut(axis, zoid, lt, config) {
            continue;
        }
        let regime: &dyn Regime<N> = &ShorterBarRegime;
        let lb = zoid.lb(axis);
        let tb = zoid.tb(axis, lt);
        let cut_lb = lb < tb;
        // `ShorterBarRegime`'s own geometry already branches on `cut_lb` vs
        // `cut_tb` internally; pass whichever regime matches the wider bar so
        // the produced children have the grounded shape for that case.
        let children = if cut_lb {
            regime.cut(axis, zoid, lt, config.sigma[axis], Color::A)
        } else {
            crate::regime::LongerBarRegime.cut(axis, zoid, lt, config.sigma[axis], Color::A)
        };

        let mut a_nodes = Vec::new();
        let mut b_nodes = Vec::new();
        for child in &children {
            let node = build_node(config, kernels, &child.zoid, t, lt, table);
            match child.color {
                Color::A => a_nodes.push(node),
                Color::B => b_nodes.push(node),
            }
        }
        let mut nodes = a_nodes;
        if !b_nodes.is_empty() {
            nodes.push(PlanNode::Sync);
            nodes.append(&mut b_nodes);
        }
        return PlanNode::Internal { children: nodes };
    }

    // Step 4: no axis could cut; time-halve while there's still room.
    if lt > config.thresholds.dt_homo && lt > config.thresholds.lcm_unroll {
        let half = (lt / 2).max(1);
        let bottom = build_node(config, kernels, zoid, t, half, table);
        if half >= lt {
            return bottom;
        }
        let top_zoid = zoid.shifted(half);
        let top = build_node(config, kernels, &top_zoid, t + half, lt - half, table);
        return PlanNode::Internal {
            children: vec![bottom, PlanNode::Sync, top],
        };
    }

    // Step 5: record a SPAWN leaf even though `label` is not homogeneous, so
    // the executor dispatches the mixed-region slow path.
    log::warn!("build_plan: no axis could cut a non-homogeneous region at t={t} lt={lt}, recording a single SPAWN leaf");
    let region = table.index_of(&label);
    spawn_leaf(config, kernels, zoid, t, lt, region)
}

/// The planner homogeneity predicate (§4.2's "planner homogeneity" row):
/// `cut_lb ? lb >= 2*thres && tb > dx_homo[axis] : tb >= 2*thres && lb > dx_homo[axis]`,
/// with the boundary threshold substituted in when the zoid touches a
/// physical edge.
fn homogeneity_can_cut<const N: usize>(axis: usize, zoid: &Zoid<N>, lt: i64, config: &Config<N>) -> bool {
    let lb = zoid.lb(axis);
    let tb = zoid.tb(axis, lt);
    let thres = config.sigma[axis] * lt;
    let cut_lb = lb < tb;
    let dx_homo = if leaf_touches_boundary(config, zoid, lt) {
        config.thresholds.dx_recursive_boundary[axis]
    } else {
        config.thresholds.dx_homo[axis]
    };
    if cut_lb {
        lb >= 2 * thres && tb > dx_homo
    } else {
        tb >= 2 * thres && lb > dx_homo
    }
}

/// Whether any axis of `zoid` touches a physical boundary over `[t, t+lt)`;
/// probes a copy so the planner's own geometry is never canonicalized as a
/// side effect.
fn leaf_touches_boundary<const N: usize>(config: &Config<N>, zoid: &Zoid<N>, lt: i64) -> bool {
    let mut probe = *zoid;
    let mut touches = false;
    for axis in 0..N {
        touches |= touch_boundary(axis, lt, &mut probe, &config.grid);
    }
    touches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecursionThresholds;

    struct AlwaysHomogeneous;
    impl Kernels<1> for AlwaysHomogeneous {
        fn apply(&self, _zoid: &Zoid<1>, _t: i64, _lt: i64) {}
    }

    fn thresholds() -> RecursionThresholds<1> {
        RecursionThresholds {
            dt_recursive: 8,
            dt_recursive_boundary: 8,
            dt_homo: 8,
            lcm_unroll: 1,
            time_shift: 0,
            dx_recursive: [4],
            dx_recursive_boundary: [4],
            dx_homo: [4],
        }
    }

    #[test]
    fn fully_homogeneous_domain_is_one_spawn_leaf() {
        let config = Config::<1>::new::<6>([1], [32], [true], thresholds(), 1, 8).unwrap();
        let zoid: Zoid<1> = Zoid::new([0], [32], [0], [0]);
        let plan = build_plan(&config, &AlwaysHomogeneous, &zoid, 0, 4);
        assert_eq!(plan.root.spawn_count(), 1);
        assert_eq!(plan.regions, 1);
    }

    struct TwoRegions;
    impl Kernels<1> for TwoRegions {
        fn apply(&self, _zoid: &Zoid<1>, _t: i64, _lt: i64) {}
        fn region_label(&self, _zoid: &Zoid<1>, t: i64, _lt: i64) -> Vec<i64> {
            vec![if t < 4 { 0 } else { 1 }]
        }
    }

    #[test]
    fn distinct_regions_at_the_same_geometry_still_dedup() {
        let config = Config::<1>::new::<6>([1], [32], [true], thresholds(), 1, 8).unwrap();
        let zoid: Zoid<1> = Zoid::new([0], [32], [0], [0]);
        // Two leaves at the same zoid geometry but different `t` share a
        // region label iff the label (not t/lt/geometry) says so.
        let plan = build_plan(&config, &TwoRegions, &zoid, 0, 4);
        let plan2 = build_plan(&config, &TwoRegions, &zoid, 4, 4);
        assert_eq!(plan.regions, 1);
        assert_eq!(plan2.regions, 1);
    }
}
