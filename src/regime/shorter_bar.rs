//! The "shorter bar" space cut (`shorter_duo_sim_obase_space_cut` in the
//! original): cuts a zoid on `axis` when the top bar is the wider of the two,
//! `tb > lb`. Unlike [`super::LongerBarRegime`], this is not a mirror of the
//! longer-bar construction: the dependency cone sits in the *middle* of the
//! bottom bar, so the three pieces are a same-color gray triangle straddling
//! the cone flanked by two next-color trapezoids that can run as soon as
//! their own predecessors are ready, independently of the gray triangle.

use crate::config::RecursionThresholds;
use crate::geometry::Zoid;
use crate::queue::Color;

use super::{ColoredZoid, Regime, SplitResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct ShorterBarRegime;

impl<const N: usize> Regime<N> for ShorterBarRegime {
    fn can_cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, thresholds: &RecursionThresholds<N>) -> bool {
        let lb = zoid.lb(axis);
        let tb = zoid.tb(axis, lt);
        let thres = sigma * lt;
        let pad = 2 * sigma;
        let cut_lb = lb < tb;
        if cut_lb {
            lb >= 2 * thres && tb + pad > thresholds.dx_recursive[axis]
        } else {
            tb >= 2 * thres && lb + pad > thresholds.dx_recursive[axis]
        }
    }

    fn cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N> {
        let l_start = zoid.x0[axis];
        let l_end = zoid.x1[axis];
        let thres = sigma * lt;

        if zoid.lb(axis) < zoid.tb(axis, lt) {
            // cut_lb: mid is the bottom bar's own midpoint.
            let mid = (l_end - l_start) / 2;

            let mut gray = *zoid;
            gray.x0[axis] = l_start + mid - thres;
            gray.x1[axis] = l_start + mid + thres;
            gray.dx0[axis] = sigma;
            gray.dx1[axis] = -sigma;

            let mut left = *zoid;
            left.x1[axis] = l_start + mid - thres;
            left.dx1[axis] = sigma;

            let mut right = *zoid;
            right.x0[axis] = l_start + mid + thres;
            right.dx0[axis] = -sigma;

            gray.check_invariant(lt);
            left.check_invariant(lt);
            right.check_invariant(lt);

            let mut result = SplitResult::new();
            result.push(ColoredZoid { zoid: gray, color });
            result.push(ColoredZoid { zoid: left, color: color.flip() });
            result.push(ColoredZoid { zoid: right, color: color.flip() });
            result
        } else {
            // cut_tb: mid is the top bar's own midpoint, measured from the
            // top-left corner `ul_start`.
            let ul_start = zoid.x0[axis] + zoid.dx0[axis] * lt;
            let mid = zoid.tb(axis, lt) / 2;

            let mut left = *zoid;
            left.x1[axis] = ul_start + mid;
            left.dx1[axis] = -sigma;

            let mut right = *zoid;
            right.x0[axis] = ul_start + mid;
            right.dx0[axis] = sigma;

            let mut spike = *zoid;
            spike.x0[axis] = ul_start + mid;
            spike.x1[axis] = ul_start + mid;
            spike.dx0[axis] = -sigma;
            spike.dx1[axis] = sigma;

            left.check_invariant(lt);
            right.check_invariant(lt);
            spike.check_invariant(lt);

            let mut result = SplitResult::new();
            result.push(ColoredZoid { zoid: left, color });
            result.push(ColoredZoid { zoid: right, color });
            result.push(ColoredZoid { zoid: spike, color: color.flip() });
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_a_diverging_trapezoid_into_three() {
        let zoid: Zoid<1> = Zoid::new([4], [12], [-1], [1]);
        let children = ShorterBarRegime.cut(0, &zoid, 4, 1, Color::A);
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].color, Color::A);
        assert_eq!(children[1].color, Color::B);
        assert_eq!(children[2].color, Color::B);
        for child in &children {
            child.zoid.check_invariant(4);
        }
    }

    #[test]
    fn refuses_to_cut_below_threshold() {
        let zoid: Zoid<1> = Zoid::new([4], [12], [-1], [1]);
        let thresholds = RecursionThresholds {
            dt_recursive: 1,
            dt_recursive_boundary: 1,
            dt_homo: 1,
            lcm_unroll: 1,
            time_shift: 0,
            dx_recursive: [16],
            dx_recursive_boundary: [16],
            dx_homo: [16],
        };
        assert!(!ShorterBarRegime.can_cut(0, &zoid, 4, 1, &thresholds));
    }
}
