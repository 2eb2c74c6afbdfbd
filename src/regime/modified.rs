//! The "modified cut" regime: two fixed same-color converging triangles
//! flanking a next-color middle gap, with up to two extra next-color edge
//! slivers when the parent's own edges did not already carry the cut's
//! slope — plus `touch_boundary` canonicalization on zoids that straddle a
//! physical (non-periodic) edge.

use crate::config::RecursionThresholds;
use crate::geometry::{touch_boundary, PhysicalGrid, Zoid};
use crate::queue::Color;

use super::{ColoredZoid, Regime, SplitResult};

/// Boundary-aware cut: interior zoids use `dx_recursive`; zoids that touch a
/// physical (non-periodic) edge use `dx_recursive_boundary` instead, and any
/// clamped-off remnant is queued as its own same-color sibling.
pub struct ModifiedRegime<'g, const N: usize> {
    pub grid: &'g PhysicalGrid<N>,
    pub touches_boundary: bool,
}

impl<'g, const N: usize> ModifiedRegime<'g, N> {
    pub fn new(grid: &'g PhysicalGrid<N>) -> Self {
        ModifiedRegime { grid, touches_boundary: false }
    }

    pub fn for_boundary(grid: &'g PhysicalGrid<N>, touches_boundary: bool) -> Self {
        ModifiedRegime { grid, touches_boundary }
    }
}

impl<'g, const N: usize> Regime<N> for ModifiedRegime<'g, N> {
    /// `CAN_CUT_I`/`CAN_CUT_B`: no `pad` term, unlike the shorter/longer-bar
    /// predicates — the modified cut's own geometry already reserves the
    /// `2*thres` margin on both sides.
    fn can_cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, thresholds: &RecursionThresholds<N>) -> bool {
        let lb = zoid.lb(axis);
        let tb = zoid.tb(axis, lt);
        let thres = sigma * lt;
        let cut_lb = lb < tb;
        let dx_rec = if self.touches_boundary {
            thresholds.dx_recursive_boundary[axis]
        } else {
            thresholds.dx_recursive[axis]
        };
        if cut_lb {
            lb >= 2 * thres && lb > dx_rec
        } else {
            tb >= 2 * thres && lb > dx_rec
        }
    }

    fn cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N> {
        let mut probe = *zoid;
        let straddles = !touch_boundary(axis, lt, &mut probe, self.grid);

        let lb = zoid.lb(axis);
        let tb = zoid.tb(axis, lt);
        let thres = sigma * lt;
        let l_start = zoid.x0[axis];
        let l_end = zoid.x1[axis];
        let next = color.flip();

        let mut result = if lb < tb {
            cut_lb_children(axis, zoid, lt, sigma, thres, l_start, l_end, lb, color, next)
        } else {
            // `cut_tb`: two same-color trapezoids flanking a next-color
            // center, doubled to a next-color spike pair when `tb >= 4*thres`.
            let offset = 2 * thres;
            let mut left = *zoid;
            left.x1[axis] = l_start + offset;
            left.dx1[axis] = -sigma;
            let mut right = *zoid;
            right.x0[axis] = l_end - offset;
            right.dx0[axis] = sigma;

            let mut out = SplitResult::new();
            if tb - offset * 2 >= 0 {
                let mut spike_left = *zoid;
                spike_left.x0[axis] = l_start + offset;
                spike_left.x1[axis] = l_start + offset;
                spike_left.dx0[axis] = -sigma;
                spike_left.dx1[axis] = sigma;

                let mut spike_right = *zoid;
                spike_right.x0[axis] = l_end - offset;
                spike_right.x1[axis] = l_end - offset;
                spike_right.dx0[axis] = -sigma;
                spike_right.dx1[axis] = sigma;

                let mut center = *zoid;
                center.x0[axis] = l_start + offset;
                center.x1[axis] = l_end - offset;
                center.dx0[axis] = sigma;
                center.dx1[axis] = -sigma;

                out.push(ColoredZoid { zoid: left, color });
                out.push(ColoredZoid { zoid: right, color });
                out.push(ColoredZoid { zoid: spike_left, color: next });
                out.push(ColoredZoid { zoid: spike_right, color: next });
                out.push(ColoredZoid { zoid: center, color });
            } else {
                let mut center = *zoid;
                center.x0[axis] = l_start + offset;
                center.x1[axis] = l_end - offset;
                center.dx0[axis] = -sigma;
                center.dx1[axis] = sigma;

                out.push(ColoredZoid { zoid: left, color });
                out.push(ColoredZoid { zoid: right, color });
                out.push(ColoredZoid { zoid: center, color: next });
            }
            for piece in &out {
                piece.zoid.check_invariant(lt);
            }
            out
        };

        if straddles {
            log::warn!("modified cut axis {axis}: zoid straddles a physical boundary, queuing a clamp remnant");
            let mut remnant = *zoid;
            remnant.x0[axis] = probe.x0[axis];
            remnant.x1[axis] = probe.x1[axis];
            result.push(ColoredZoid { zoid: remnant, color: Color::B });
        }

        result
    }
}

/// The `cut_lb` branch: two fixed same-color inverted-triangle pieces at
/// `offset = 2*thres` from each edge, a next-color middle trapezoid between
/// them, and — when the parent's own edge slope didn't already equal the
/// cut's slope — a next-color zero-width sliver at that edge. `lb < 4*thres`
/// collapses the two inner triangles into a single same-color trapezoid
/// spanning the whole bottom bar instead.
#[allow(clippy::too_many_arguments)]
fn cut_lb_children<const N: usize>(
    axis: usize,
    zoid: &Zoid<N>,
    lt: i64,
    sigma: i64,
    thres: i64,
    l_start: i64,
    l_end: i64,
    lb: i64,
    color: Color,
    next: Color,
) -> SplitResult<N> {
    let mut out = SplitResult::new();

    if zoid.dx0[axis] != sigma {
        let mut edge_left = *zoid;
        edge_left.x1[axis] = l_start;
        edge_left.dx1[axis] = sigma;
        out.push(ColoredZoid { zoid: edge_left, color: next });
    }
    if zoid.dx1[axis] != -sigma {
        let mut edge_right = *zoid;
        edge_right.x0[axis] = l_end;
        edge_right.dx0[axis] = -sigma;
        out.push(ColoredZoid { zoid: edge_right, color: next });
    }

    let offset = 2 * thres;
    if lb - 4 * thres >= 0 {
        let mut tri_left = *zoid;
        tri_left.x1[axis] = l_start + offset;
        tri_left.dx0[axis] = sigma;
        tri_left.dx1[axis] = -sigma;

        let mut tri_right = *zoid;
        tri_right.x0[axis] = l_end - offset;
        tri_right.dx0[axis] = sigma;
        tri_right.dx1[axis] = -sigma;

        let mut middle = *zoid;
        middle.x0[axis] = l_start + offset;
        middle.x1[axis] = l_end - offset;
        middle.dx0[axis] = -sigma;
        middle.dx1[axis] = sigma;

        out.push(ColoredZoid { zoid: tri_left, color });
        out.push(ColoredZoid { zoid: tri_right, color });
        out.push(ColoredZoid { zoid: middle, color: next });
    } else {
        let mut whole = *zoid;
        whole.dx0[axis] = sigma;
        whole.dx1[axis] = -sigma;
        out.push(ColoredZoid { zoid: whole, color });
    }

    for piece in &out {
        piece.zoid.check_invariant(lt);
    }
    out
}
