//! Replays a [`PlanTree`] built by [`super::builder::build_plan`]: no
//! predicate is consulted again, only the recorded SPAWN/SYNC/INTERNAL
//! structure. Region indices dispatch to whichever kernel variant the
//! caller registered for that region; an aligned leaf uses the plain kernel
//! call, an unaligned one uses the conditional (boundary-checked) call.
//! Siblings between `Sync` markers are independent by construction (the
//! builder only inserts a `Sync` between an `A`-colored batch and a
//! `B`-colored one), so they fork-join the same way [`crate::space_cut::schedule_children`]
//! does for the direct drivers.

use crate::kernel::{Kernels, RunStats};

use super::tree::PlanNode;
use super::tree::PlanTree;

/// Runs `plan` against `kernels`.
pub fn execute_plan<const N: usize, K: Kernels<N>>(plan: &PlanTree<N>, kernels: &K, stats: &mut RunStats) {
    execute_node(&plan.root, kernels, stats);
}

fn execute_node<const N: usize, K: Kernels<N>>(node: &PlanNode<N>, kernels: &K, stats: &mut RunStats) {
    match node {
        PlanNode::Internal { children } => execute_batches(children, kernels, stats),
        PlanNode::Spawn { zoid, t, lt, region, aligned, boundary } => {
            log::trace!("execute_plan: region {region} aligned={aligned} boundary={boundary} t={t} lt={lt}");
            crate::bump_stat!(stats, base_cases);
            match (*boundary, *aligned) {
                (false, true) => kernels.apply_region(*region, zoid, *t, *lt),
                (false, false) => kernels.conditional_interior_region(*region, zoid, *t, *lt),
                (true, true) => kernels.boundary_region(*region, zoid, *t, *lt),
                (true, false) => kernels.conditional_boundary_region(*region, zoid, *t, *lt),
            }
        }
        PlanNode::Sync => {
            // Reached only when a batch is a lone `Sync` with nothing on
            // either side (an empty generation) — nothing to join.
        }
    }
}

/// Splits `children` into runs separated by `Sync` markers and executes each
/// run as a fork-join batch, joining before moving on to the next run —
/// exactly the barrier a `Sync` node records.
fn execute_batches<const N: usize, K: Kernels<N>>(children: &[PlanNode<N>], kernels: &K, stats: &mut RunStats) {
    for batch in children.split(|node| matches!(node, PlanNode::Sync)) {
        execute_batch(batch, kernels, stats);
    }
}

#[cfg(feature = "disable-par")]
fn execute_batch<const N: usize, K: Kernels<N>>(batch: &[PlanNode<N>], kernels: &K, stats: &mut RunStats) {
    for child in batch {
        execute_node(child, kernels, stats);
    }
}

#[cfg(not(feature = "disable-par"))]
fn execute_batch<const N: usize, K: Kernels<N>>(batch: &[PlanNode<N>], kernels: &K, stats: &mut RunStats) {
    match batch.len() {
        0 => {}
        1 => execute_node(&batch[0], kernels, stats),
        _ => {
            let partials: Vec<RunStats> = rayon::scope(|s| {
                let (tx, rx) = std::sync::mpsc::channel();
                for child in batch {
                    let tx = tx.clone();
                    s.spawn(move |_| {
                        let mut local = RunStats::default();
                        execute_node(child, kernels, &mut local);
                        let _ = tx.send(local);
                    });
                }
                drop(tx);
                rx.into_iter().collect()
            });
            for partial in &partials {
                stats.merge(partial);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RecursionThresholds};
    use crate::geometry::Zoid;
    use crate::plan::builder::build_plan;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingKernel(AtomicU64);
    impl Kernels<1> for CountingKernel {
        fn apply(&self, _zoid: &Zoid<1>, _t: i64, _lt: i64) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
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
    fn executing_a_plan_visits_every_spawn_leaf() {
        let config = Config::<1>::new::<6>([1], [32], [true], thresholds(), 1, 8).unwrap();
        let zoid: Zoid<1> = Zoid::new([0], [32], [0], [0]);
        let kernel = CountingKernel(AtomicU64::new(0));
        let plan = build_plan(&config, &kernel, &zoid, 0, 4);
        let expected = plan.root.spawn_count() as u64;
        let mut stats = RunStats::default();
        execute_plan(&plan, &kernel, &mut stats);
        assert_eq!(kernel.0.load(Ordering::SeqCst), expected);
    }

    struct RegionCountingKernel {
        region0: AtomicU64,
        region1: AtomicU64,
    }
    impl Kernels<1> for RegionCountingKernel {
        fn apply(&self, _zoid: &Zoid<1>, _t: i64, _lt: i64) {
            self.region0.fetch_add(1, Ordering::SeqCst);
        }
        fn apply_region(&self, region: usize, _zoid: &Zoid<1>, _t: i64, _lt: i64) {
            if region == 0 {
                self.region0.fetch_add(1, Ordering::SeqCst);
            } else {
                self.region1.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn region_label(&self, _zoid: &Zoid<1>, t: i64, _lt: i64) -> Vec<i64> {
            vec![if t < 4 { 0 } else { 1 }]
        }
    }

    #[test]
    fn per_region_dispatch_routes_to_the_matching_region() {
        let config = Config::<1>::new::<6>([1], [32], [true], thresholds(), 1, 8).unwrap();
        let zoid: Zoid<1> = Zoid::new([0], [32], [0], [0]);
        let kernel = RegionCountingKernel { region0: AtomicU64::new(0), region1: AtomicU64::new(0) };
        let plan = build_plan(&config, &kernel, &zoid, 4, 4);
        let mut stats = RunStats::default();
        execute_plan(&plan, &kernel, &mut stats);
        assert_eq!(kernel.region0.load(Ordering::SeqCst), 0);
        assert!(kernel.region1.load(Ordering::SeqCst) >= 1);
    }
}
