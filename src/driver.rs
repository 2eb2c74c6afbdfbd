//! The multi-axis space-time cut state machine: sweeps a zoid
//! through axes `0..N` trying a space cut on each (the "shorter bar" regime,
//! the "longer bar" regime, the interior/boundary "modified" split, or the
//! adaptive-boundary predicate, selected per zoid shape and per driver), and
//! falls through to a time bisection once no axis has room left to cut. The
//! level loop is expressed as a queue drain across fixed-capacity
//! [`ColorQueues`].

use crate::config::Config;
use crate::geometry::{touch_boundary, PhysicalGrid, Zoid};
use crate::kernel::{Kernels, RunStats};
use crate::queue::{Color, ColorQueues, QueueEntry};
use crate::regime::{AdaptiveRegime, ColoredZoid, LongerBarRegime, ModifiedRegime, Regime, ShorterBarRegime};
use crate::space_cut::schedule_children;

/// Which predicate family a driver consults. [`run_bicut`] uses [`RegimeKind::Standard`]
/// (the plain interior/boundary split); [`run_adaptive`] uses [`RegimeKind::Adaptive`],
/// which additionally stops cutting once `lt` nears the unroll floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegimeKind {
    Standard,
    Adaptive,
}

/// Picks the regime appropriate to `kind`, the zoid's current shape on
/// `axis`, and whether boundary handling is active for this run.
fn regime_for<'g, const N: usize>(
    kind: RegimeKind,
    axis: usize,
    zoid: &Zoid<N>,
    lt: i64,
    use_boundary: bool,
    grid: &'g PhysicalGrid<N>,
) -> Box<dyn Regime<N> + 'g> {
    match kind {
        RegimeKind::Adaptive => Box::new(AdaptiveRegime::new(use_boundary)),
        RegimeKind::Standard if use_boundary => Box::new(ModifiedRegime::for_boundary(grid, true)),
        RegimeKind::Standard => {
            if zoid.lb(axis) >= zoid.tb(axis, lt) {
                Box::new(LongerBarRegime)
            } else {
                Box::new(ShorterBarRegime)
            }
        }
    }
}

/// Drains one `ALGOR_QUEUE_SIZE`-capacity pair of color queues across axis
/// levels `0..=N`: every zoid that survives the sweep with no axis willing to
/// cut it either recurses into a fresh time-bisected sweep (when `lt` is
/// still above the regime's stop threshold) or is dispatched to the base
/// case directly — mirroring the decide/SPACE/TIME/LEAF state machine, where
/// SPACE is attempted unconditionally before TIME-vs-LEAF is decided.
fn space_time_cut_kind<const N: usize, const CAP: usize, K: Kernels<N>>(
    kind: RegimeKind,
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
    use_boundary: bool,
    stats: &mut RunStats,
) {
    zoid.check_invariant(lt);
    log::trace!("space_time_cut: t={t} lt={lt} use_boundary={use_boundary}");

    // N_RANK == 1 special case: a single-axis zoid with lt <= 1 has no room
    // left for a space cut and no room left for a time cut either.
    if N == 1 && lt <= 1 {
        base_case(config, kernels, zoid, t, lt, use_boundary, stats);
        return;
    }

    let mut queues: ColorQueues<N, CAP> = ColorQueues::new();
    queues.a.push(QueueEntry { zoid: *zoid, level: 0 });

    for level in 0..N {
        let mut batch: Vec<ColoredZoid<N>> = Vec::new();
        while let Some(entry) = queues.a.pop() {
            batch.push(ColoredZoid { zoid: entry.zoid, color: Color::A });
        }
        while let Some(entry) = queues.b.pop() {
            batch.push(ColoredZoid { zoid: entry.zoid, color: Color::B });
        }

        for item in &batch {
            let regime = regime_for(kind, level, &item.zoid, lt, use_boundary, &config.grid);
            let can_cut = regime.can_cut(level, &item.zoid, lt, config.sigma[level], &config.thresholds);

            if !can_cut {
                queues.queue(item.color).push(QueueEntry {
                    zoid: item.zoid,
                    level: level as i64 + 1,
                });
                continue;
            }

            let children = regime.cut(level, &item.zoid, lt, config.sigma[level], item.color);
            crate::bump_stat!(stats, space_cuts);
            for child in &children {
                queues.queue(child.color).push(QueueEntry {
                    zoid: child.zoid,
                    level: level as i64 + 1,
                });
            }
        }
    }

    let mut survivors: Vec<(Zoid<N>, Color)> = Vec::new();
    while let Some(entry) = queues.a.pop() {
        survivors.push((entry.zoid, Color::A));
    }
    while let Some(entry) = queues.b.pop() {
        survivors.push((entry.zoid, Color::B));
    }

    let grouped: Vec<ColoredZoid<N>> = survivors
        .into_iter()
        .map(|(zoid, color)| ColoredZoid { zoid, color })
        .collect();

    let dt_stop = if use_boundary {
        config.thresholds.dt_recursive_boundary
    } else {
        config.thresholds.dt_recursive
    };

    schedule_children(&grouped, |child| {
        let mut local_stats = RunStats::default();
        if lt > dt_stop {
            time_cut::<N, CAP, K>(kind, config, kernels, &child.zoid, t, lt, use_boundary, &mut local_stats);
        } else {
            base_case(config, kernels, &child.zoid, t, lt, use_boundary, &mut local_stats);
        }
        // stats aggregation across parallel branches would need a Mutex or
        // atomics; left to the `stats` feature's call sites at the leaves.
        let _ = local_stats;
    });
}

/// Bisects the time span: the bottom half must finish before the top half's
/// data dependencies are satisfied, so (unlike a space cut) the two halves
/// always run in sequence, never concurrently.
fn time_cut<const N: usize, const CAP: usize, K: Kernels<N>>(
    kind: RegimeKind,
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
    use_boundary: bool,
    stats: &mut RunStats,
) {
    crate::bump_stat!(stats, time_cuts);
    let half = (lt / 2).max(1).min(lt);
    let aligned = align_down(half, config.thresholds.lcm_unroll).max(1);

    space_time_cut_kind::<N, CAP, K>(kind, config, kernels, zoid, t, aligned, use_boundary, stats);
    if aligned < lt {
        let top = zoid.shifted(aligned);
        space_time_cut_kind::<N, CAP, K>(kind, config, kernels, &top, t + aligned, lt - aligned, use_boundary, stats);
    }
}

#[inline]
fn align_down(value: i64, unroll: i64) -> i64 {
    if unroll <= 1 {
        value
    } else {
        value - value % unroll
    }
}

/// Handles a zoid that reached the base-case time threshold: applies the
/// kernel directly when interior, or walks points individually against
/// `touch_boundary` canonicalization when the boundary flag is set.
fn base_case<const N: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
    use_boundary: bool,
    stats: &mut RunStats,
) {
    crate::bump_stat!(stats, base_cases);
    if use_boundary {
        let mut canon = *zoid;
        for axis in 0..N {
            touch_boundary(axis, lt, &mut canon, &config.grid);
        }
        if t % kernels.unroll() == 0 && lt % kernels.unroll() == 0 {
            kernels.boundary(&canon, t, lt);
        } else {
            kernels.conditional_boundary(&canon, t, lt);
        }
    } else if t % kernels.unroll() == 0 && lt % kernels.unroll() == 0 {
        kernels.apply(zoid, t, lt);
    } else {
        kernels.conditional_interior(zoid, t, lt);
    }
}

/// Runs the standard two-color parallel recursion with no homogeneity
/// planning.
pub fn run_bicut<const N: usize, const CAP: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
) -> RunStats {
    let mut stats = RunStats::default();
    let boundary = needs_boundary_handling(&config.grid, zoid, lt);
    space_time_cut_kind::<N, CAP, K>(RegimeKind::Standard, config, kernels, zoid, t, lt, boundary, &mut stats);
    stats
}

/// Runs the same recursion as [`run_bicut`], but every space cut consults
/// [`crate::regime::AdaptiveRegime`] instead of the plain interior/boundary
/// split, trading a slightly larger leaf for one fewer recursion level once
/// `lt` nears the unroll floor.
pub fn run_adaptive<const N: usize, const CAP: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
) -> RunStats {
    let mut stats = RunStats::default();
    let boundary = needs_boundary_handling(&config.grid, zoid, lt);
    space_time_cut_kind::<N, CAP, K>(RegimeKind::Adaptive, config, kernels, zoid, t, lt, boundary, &mut stats);
    stats
}

/// Same recursion as [`run_bicut`], but installed on a `rayon` pool whose
/// worker threads are pinned one-per-core first. Gated behind the
/// `affinity` feature since it pulls in `core_affinity` and only pays off
/// on a dedicated machine.
#[cfg(feature = "affinity")]
pub fn run_bicut_pinned<const N: usize, const CAP: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
) -> RunStats {
    let core_ids = core_affinity::get_core_ids().expect("core_affinity::get_core_ids");
    let mut stats = RunStats::default();
    let boundary = needs_boundary_handling(&config.grid, zoid, lt);
    rayon::ThreadPoolBuilder::new()
        .build_scoped(
            move |thread| {
                core_affinity::set_for_current(core_ids[thread.index() % core_ids.len()]);
                thread.run();
            },
            |pool| {
                pool.install(|| {
                    space_time_cut_kind::<N, CAP, K>(RegimeKind::Standard, config, kernels, zoid, t, lt, boundary, &mut stats);
                });
            },
        )
        .expect("building pinned thread pool");
    stats
}

fn needs_boundary_handling<const N: usize>(grid: &PhysicalGrid<N>, zoid: &Zoid<N>, lt: i64) -> bool {
    let mut probe = *zoid;
    let mut touches = false;
    for axis in 0..N {
        touches |= !touch_boundary(axis, lt, &mut probe, grid);
    }
    touches
}
