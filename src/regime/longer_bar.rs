//! The "longer bar" (duo) space cut: cuts a zoid on `axis` when the bottom
//! bar is the wider of the two, `lb >= tb`, into two same-color trapezoids
//! flanking a next-color zero-width gap.

use crate::config::RecursionThresholds;
use crate::geometry::Zoid;
use crate::queue::Color;

use super::{cut_on_bottom, cut_on_top, Regime, SplitResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct LongerBarRegime;

impl<const N: usize> Regime<N> for LongerBarRegime {
    fn can_cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, thresholds: &RecursionThresholds<N>) -> bool {
        let lb = zoid.lb(axis);
        let tb = zoid.tb(axis, lt);
        let thres = sigma * lt;
        let pad = 2 * sigma;
        let cut_lb = lb < tb;
        if !cut_lb {
            lb >= 2 * thres && lb + pad > thresholds.dx_recursive[axis]
        } else {
            tb >= 2 * thres && tb + pad > thresholds.dx_recursive[axis]
        }
    }

    /// The `lb >= tb` branch (this regime's usual selection condition) is the
    /// grounded shape: two same-color trapezoids flanking a next-color gap.
    /// The `lb < tb` branch is unreachable through the driver's own regime
    /// selection (a zoid with `lb < tb` is always routed to
    /// [`super::ShorterBarRegime`] instead); it falls back to the
    /// time-mirrored construction so the regime stays total.
    fn cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N> {
        if zoid.lb(axis) >= zoid.tb(axis, lt) {
            cut_on_bottom(axis, zoid, lt, sigma, color)
        } else {
            cut_on_top(axis, zoid, lt, sigma, color)
        }
    }
}
