//! The adaptive-boundary regime: as the shorter/longer-bar predicates, but
//! uses `dx_recursive_boundary` whenever the zoid touches a physical
//! boundary (or, during planning, crosses region colors), refusing to cut
//! once the remaining time span is so short that a further space cut would
//! produce pieces finer than the base case can use anyway.

use crate::config::RecursionThresholds;
use crate::geometry::Zoid;
use crate::queue::Color;

use super::{LongerBarRegime, Regime, ShorterBarRegime, SplitResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct AdaptiveRegime {
    pub touches_boundary: bool,
}

impl AdaptiveRegime {
    pub fn new(touches_boundary: bool) -> Self {
        AdaptiveRegime { touches_boundary }
    }

    fn boundary_thresholds<const N: usize>(&self, thresholds: &RecursionThresholds<N>) -> RecursionThresholds<N> {
        if self.touches_boundary {
            let mut boundary = *thresholds;
            boundary.dx_recursive = thresholds.dx_recursive_boundary;
            boundary
        } else {
            *thresholds
        }
    }
}

impl<const N: usize> Regime<N> for AdaptiveRegime {
    fn can_cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, thresholds: &RecursionThresholds<N>) -> bool {
        if lt <= thresholds.lcm_unroll {
            return false;
        }
        let effective = self.boundary_thresholds(thresholds);
        let lb = zoid.lb(axis);
        let tb = zoid.tb(axis, lt);
        if lb >= tb {
            LongerBarRegime.can_cut(axis, zoid, lt, sigma, &effective)
        } else {
            ShorterBarRegime.can_cut(axis, zoid, lt, sigma, &effective)
        }
    }

    fn cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N> {
        if zoid.lb(axis) >= zoid.tb(axis, lt) {
            LongerBarRegime.cut(axis, zoid, lt, sigma, color)
        } else {
            ShorterBarRegime.cut(axis, zoid, lt, sigma, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_cut_once_lt_drops_to_the_unroll_floor() {
        let zoid: Zoid<1> = Zoid::new([0], [64], [1], [-1]);
        let thresholds = RecursionThresholds {
            dt_recursive: 1,
            dt_recursive_boundary: 1,
            dt_homo: 1,
            lcm_unroll: 4,
            time_shift: 0,
            dx_recursive: [1],
            dx_recursive_boundary: [1],
            dx_homo: [1],
        };
        assert!(!AdaptiveRegime::default().can_cut(0, &zoid, 3, 1, &thresholds));
        assert!(AdaptiveRegime::default().can_cut(0, &zoid, 8, 1, &thresholds));
    }

    #[test]
    fn uses_boundary_threshold_when_touching_boundary() {
        let zoid: Zoid<1> = Zoid::new([0], [64], [1], [-1]);
        let thresholds = RecursionThresholds {
            dt_recursive: 1,
            dt_recursive_boundary: 1,
            dt_homo: 1,
            lcm_unroll: 1,
            time_shift: 0,
            dx_recursive: [1],
            dx_recursive_boundary: [1000],
            dx_homo: [1],
        };
        assert!(AdaptiveRegime::new(false).can_cut(0, &zoid, 8, 1, &thresholds));
        assert!(!AdaptiveRegime::new(true).can_cut(0, &zoid, 8, 1, &thresholds));
    }
}
