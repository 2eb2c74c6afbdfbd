//! `walk_serial`: the plain recursive reference walker. No
//! dependency coloring, no queues, no parallelism — just bisect the longest
//! axis (space or time) until the base case fires. Exists solely as the
//! comparison oracle for the round-trip testable property: any
//! `run_bicut`/`run_adaptive` schedule must visit every point exactly as many
//! times, with the same kernel inputs, as this walker does.

use crate::config::Config;
use crate::geometry::Zoid;
use crate::kernel::{Kernels, RunStats};

/// Walks `zoid` over `[t, t+lt)` serially, splitting on whichever axis or the
/// time dimension has the most room, until every axis and the time span are
/// at or below their configured thresholds.
pub fn walk_serial<const N: usize, K: Kernels<N>>(
    config: &Config<N>,
    kernels: &K,
    zoid: &Zoid<N>,
    t: i64,
    lt: i64,
    stats: &mut RunStats,
) {
    zoid.check_invariant(lt);

    if lt > config.thresholds.dt_recursive {
        let half = lt / 2;
        if half > 0 {
            log::trace!("walk_serial: time split at t={t} lt={lt} -> half={half}");
            crate::bump_stat!(stats, time_cuts);
            walk_serial(config, kernels, zoid, t, half, stats);
            let top = zoid.shifted(half);
            walk_serial(config, kernels, &top, t + half, lt - half, stats);
            return;
        }
    }

    for axis in 0..N {
        let lb = zoid.lb(axis);
        if lb > 2 * config.thresholds.dx_recursive[axis] {
            let mid = (zoid.x0[axis] + zoid.x1[axis]) / 2;
            crate::bump_stat!(stats, space_cuts);
            log::trace!("walk_serial: space split axis={axis} at {mid}");

            let mut left = *zoid;
            left.x1[axis] = mid;
            let mut right = *zoid;
            right.x0[axis] = mid;

            walk_serial(config, kernels, &left, t, lt, stats);
            walk_serial(config, kernels, &right, t, lt, stats);
            return;
        }
    }

    crate::bump_stat!(stats, base_cases);
    kernels.apply(zoid, t, lt);
}
