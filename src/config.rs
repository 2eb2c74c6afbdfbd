//! Validated run configuration: slopes, recursion thresholds, and the physical
//! grid a run is scheduled over.

use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{KleinRemap, PhysicalGrid};

/// Recursion thresholds that decide when a zoid is cut further versus handed
/// to the base-case kernel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecursionThresholds<const N: usize> {
    /// Time span below which recursion stops cutting in time and falls through
    /// to the base case, for zoids that never touched a physical boundary.
    pub dt_recursive: i64,
    /// Same as `dt_recursive`, but for zoids that touched a physical boundary
    /// (or, during planning, crossed a region color) — `space_time_cut`'s
    /// `dt_stop` is this when boundary handling is active, `dt_recursive`
    /// otherwise.
    pub dt_recursive_boundary: i64,
    /// Time span below which the homogeneity planner stops attempting a time
    /// cut on a non-homogeneous region and records a mixed-region SPAWN leaf.
    pub dt_homo: i64,
    /// Smallest common multiple of unroll factors the time bisection point is
    /// aligned to, so the base-case kernel never sees a fractional unroll.
    pub lcm_unroll: i64,
    /// Offset applied (modulo `lcm_unroll`) when checking whether a leaf's
    /// `t0`/`t1` line up with a region's unroll factor; `0` unless a caller's
    /// regions are phase-shifted relative to the global clock.
    pub time_shift: i64,
    /// Per-axis space-cut threshold: a zoid is no longer cut on `axis` once
    /// its bottom bar width drops below this, for zoids that never touched a
    /// physical boundary.
    pub dx_recursive: [i64; N],
    /// Same as `dx_recursive`, but for zoids that touched a physical
    /// boundary on `axis`.
    pub dx_recursive_boundary: [i64; N],
    /// Per-axis homogeneity-planner stop width: below this, the planner
    /// stops attempting a space cut on `axis` for a non-homogeneous region.
    pub dx_homo: [i64; N],
}

/// The coarsening factor applied when the homogeneity planner fuses adjacent
/// abnormal-region triangles into a single base-case call.
pub type NumTriangles = NonZeroU32;

/// A fully validated run configuration. Constructed only through
/// [`Config::new`], so every other module can assume its invariants hold.
#[derive(Clone)]
pub struct Config<const N: usize> {
    /// Per-axis slope magnitude; a zoid's `dx0`/`dx1` on axis `i` are each one
    /// of `{-sigma[i], 0, sigma[i]}`.
    pub sigma: [i64; N],
    pub thresholds: RecursionThresholds<N>,
    pub num_triangles: NumTriangles,
    pub grid: PhysicalGrid<N>,
}

/// The serializable projection of [`Config`]: everything except the
/// `dyn KleinRemap` trait object, which has no serde impl and is reattached
/// by the caller after deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot<const N: usize> {
    pub sigma: [i64; N],
    pub thresholds: RecursionThresholds<N>,
    pub num_triangles: u32,
    pub length: [i64; N],
    pub periodic: [bool; N],
    pub max_lt: i64,
}

impl<const N: usize> Config<N> {
    /// Validates and builds a configuration. `max_lt` is the longest time span
    /// any zoid will ever be cut over; it sizes the boundary padding in the
    /// [`PhysicalGrid`].
    ///
    /// `CAP` is the caller's chosen `CircularQueue` capacity; it must satisfy
    /// `CAP >= 3*N + 3` or the two-color generation queues can overflow
    /// mid-run.
    pub fn new<const CAP: usize>(
        sigma: [i64; N],
        length: [i64; N],
        periodic: [bool; N],
        thresholds: RecursionThresholds<N>,
        num_triangles: u32,
        max_lt: i64,
    ) -> Result<Self, ConfigError> {
        let required = 3 * N + 3;
        if CAP < required {
            return Err(ConfigError::QueueTooSmall {
                capacity: CAP,
                required,
            });
        }
        for axis in 0..N {
            if sigma[axis] <= 0 {
                return Err(ConfigError::NonPositiveSlope {
                    axis,
                    slope: sigma[axis],
                });
            }
            if length[axis] <= 0 {
                return Err(ConfigError::NonPositiveLength {
                    axis,
                    length: length[axis],
                });
            }
        }
        if thresholds.dt_recursive <= 0 {
            return Err(ConfigError::NonPositiveDtRecursive {
                value: thresholds.dt_recursive,
            });
        }
        if thresholds.dt_recursive_boundary <= 0 {
            return Err(ConfigError::NonPositiveDtRecursive {
                value: thresholds.dt_recursive_boundary,
            });
        }
        if thresholds.dt_homo <= 0 {
            return Err(ConfigError::NonPositiveDtRecursive {
                value: thresholds.dt_homo,
            });
        }
        if thresholds.lcm_unroll <= 0 {
            return Err(ConfigError::NonPositiveUnroll {
                lcm_unroll: thresholds.lcm_unroll,
            });
        }
        let num_triangles = NonZeroU32::new(num_triangles).ok_or(ConfigError::NonPositiveUnroll {
            lcm_unroll: num_triangles as i64,
        })?;

        let grid = PhysicalGrid::new(length, periodic, sigma, max_lt);
        log::trace!("validated config for {N} axes, queue capacity {CAP} (needs >= {required})");
        Ok(Config {
            sigma,
            thresholds,
            num_triangles,
            grid,
        })
    }

    pub fn with_klein(mut self, remap: Arc<dyn KleinRemap<N>>) -> Self {
        self.grid = self.grid.with_klein(remap);
        self
    }

    pub fn snapshot(&self) -> ConfigSnapshot<N> {
        ConfigSnapshot {
            sigma: self.sigma,
            thresholds: self.thresholds,
            num_triangles: self.num_triangles.get(),
            length: self.grid.length,
            periodic: self.grid.periodic,
            max_lt: {
                // uub was built as length[i] - sigma[i]*max_lt; recover max_lt from axis 0.
                if N == 0 {
                    0
                } else {
                    (self.grid.length[0] - self.grid.uub[0]) / self.sigma[0].max(1)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> RecursionThresholds<2> {
        RecursionThresholds {
            dt_recursive: 4,
            dt_recursive_boundary: 4,
            dt_homo: 4,
            lcm_unroll: 2,
            time_shift: 0,
            dx_recursive: [2, 2],
            dx_recursive_boundary: [2, 2],
            dx_homo: [2, 2],
        }
    }

    #[test]
    fn rejects_queue_too_small() {
        let err = Config::<2>::new::<4>([1, 1], [64, 64], [true, true], thresholds(), 4, 8).unwrap_err();
        assert_eq!(
            err,
            ConfigError::QueueTooSmall {
                capacity: 4,
                required: 9
            }
        );
    }

    #[test]
    fn accepts_well_formed_config() {
        let cfg = Config::<2>::new::<9>([1, 1], [64, 64], [true, true], thresholds(), 4, 8).unwrap();
        assert_eq!(cfg.num_triangles.get(), 4);
    }

    #[test]
    fn rejects_non_positive_slope() {
        let err = Config::<2>::new::<9>([0, 1], [64, 64], [true, true], thresholds(), 4, 8).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveSlope { axis: 0, slope: 0 }
        );
    }
}
