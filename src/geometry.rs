//! Zoid geometry: the trapezoidal space-time region data model.

use std::sync::Arc;

/// An N-dimensional trapezoidal region over a time range `[t0, t1)`.
///
/// For axis `i`, the bottom edge is `[x0[i], x1[i])`; over a time span `lt`
/// the top edge is `[x0[i] + dx0[i]*lt, x1[i] + dx1[i]*lt)`. `dx0`/`dx1` are
/// the per-axis slopes, each constrained to `{-sigma[i], 0, sigma[i]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoid<const N: usize> {
    pub x0: [i64; N],
    pub x1: [i64; N],
    pub dx0: [i64; N],
    pub dx1: [i64; N],
}

impl<const N: usize> Zoid<N> {
    pub fn new(x0: [i64; N], x1: [i64; N], dx0: [i64; N], dx1: [i64; N]) -> Self {
        let z = Zoid { x0, x1, dx0, dx1 };
        z.debug_check();
        z
    }

    /// Bottom bar width on `axis`.
    #[inline]
    pub fn lb(&self, axis: usize) -> i64 {
        self.x1[axis] - self.x0[axis]
    }

    /// Top bar width on `axis` over a time span of `lt`.
    #[inline]
    pub fn tb(&self, axis: usize, lt: i64) -> i64 {
        (self.x1[axis] + self.dx1[axis] * lt) - (self.x0[axis] + self.dx0[axis] * lt)
    }

    /// Zoid shifted to the top of a `lt`-long time span: the grid passed to the
    /// top half of a time cut.
    pub fn shifted(&self, lt: i64) -> Self {
        let mut shifted = *self;
        for i in 0..N {
            shifted.x0[i] = self.x0[i] + self.dx0[i] * lt;
            shifted.x1[i] = self.x1[i] + self.dx1[i] * lt;
        }
        shifted
    }

    #[inline]
    fn debug_check(&self) {
        for i in 0..N {
            debug_assert!(
                self.x0[i] <= self.x1[i],
                "axis {i}: x0 ({}) > x1 ({})",
                self.x0[i],
                self.x1[i]
            );
        }
    }

    /// Checks the bottom-and-top ordering invariant over a span of `lt`; used by
    /// tests and by the boundary canonicalization postcondition.
    pub fn check_invariant(&self, lt: i64) {
        for i in 0..N {
            debug_assert!(self.x0[i] <= self.x1[i]);
            let top0 = self.x0[i] + self.dx0[i] * lt;
            let top1 = self.x1[i] + self.dx1[i] * lt;
            debug_assert!(top0 <= top1, "axis {i}: top edge inverted ({top0} > {top1})");
        }
    }
}

/// Out-of-scope collaborator: remaps a zoid that has wrapped
/// around a Klein-bottle axis back into canonical coordinates. The plain
/// periodic case (the default, `None` in [`PhysicalGrid`]) just subtracts the
/// axis length; this hook lets a caller plug in the actual topology.
pub trait KleinRemap<const N: usize>: Send + Sync {
    fn remap(&self, zoid: &mut Zoid<N>, grid: &PhysicalGrid<N>);
}

/// The containing N-rectangle `[0, L[i])` per axis, plus the boundary
/// thresholds `touch_boundary` needs.
#[derive(Clone)]
pub struct PhysicalGrid<const N: usize> {
    /// Axis lengths `L[i]`.
    pub length: [i64; N],
    /// Upper threshold: a zoid whose bottom and top both lie at or above this
    /// value has wrapped past the periodic seam.
    pub uub: [i64; N],
    /// Upper bound of the lower interior region.
    pub ulb: [i64; N],
    /// Lower bound of the upper interior region.
    pub lub: [i64; N],
    /// `true` for axes that wrap (periodic); `false` for axes with open
    /// (non-periodic) physical boundaries.
    pub periodic: [bool; N],
    /// Optional Klein-bottle remap, consulted instead of the plain subtraction
    /// when set.
    pub klein: Option<Arc<dyn KleinRemap<N>>>,
}

impl<const N: usize> PhysicalGrid<N> {
    /// Builds the boundary thresholds the straightforward way: a zoid is
    /// "interior" once it is `pad[i]` cells clear of either physical edge,
    /// where `pad[i]` is the slope-scaled margin the recursion needs to stay
    /// clear of the domain edge for the longest time span it will ever see.
    pub fn new(length: [i64; N], periodic: [bool; N], sigma: [i64; N], max_lt: i64) -> Self {
        let mut uub = [0; N];
        let mut ulb = [0; N];
        let mut lub = [0; N];
        for i in 0..N {
            let pad = sigma[i] * max_lt;
            uub[i] = length[i] - pad;
            ulb[i] = length[i] - pad;
            lub[i] = pad;
        }
        PhysicalGrid {
            length,
            uub,
            ulb,
            lub,
            periodic,
            klein: None,
        }
    }

    pub fn with_klein(mut self, remap: Arc<dyn KleinRemap<N>>) -> Self {
        self.klein = Some(remap);
        self
    }
}

/// Reports whether the zoid over `[t, t+lt)` straddles a boundary region of
/// `axis`. Side effect: when the zoid has migrated past the upper
/// periodic threshold, it is canonicalized in place (subtract the axis length,
/// or run the Klein remap). Idempotent on zoids already interior.
pub fn touch_boundary<const N: usize>(axis: usize, lt: i64, zoid: &mut Zoid<N>, grid: &PhysicalGrid<N>) -> bool {
    let interior = if grid.periodic[axis] && zoid.x0[axis] >= grid.uub[axis] && zoid.x0[axis] + zoid.dx0[axis] * lt >= grid.uub[axis] {
        match &grid.klein {
            Some(remap) => remap.remap(zoid, grid),
            None => {
                zoid.x0[axis] -= grid.length[axis];
                zoid.x1[axis] -= grid.length[axis];
            }
        }
        log::debug!("touch_boundary canonicalized axis {axis} past the periodic seam over lt={lt}");
        true
    } else if zoid.x1[axis] <= grid.ulb[axis]
        && zoid.x1[axis] + zoid.dx1[axis] * lt <= grid.ulb[axis]
        && zoid.x0[axis] >= grid.lub[axis]
        && zoid.x0[axis] + zoid.dx0[axis] * lt >= grid.lub[axis]
    {
        true
    } else {
        false
    };
    !interior
}

/// `true` if any axis of `zoid` straddles a boundary region over `[t, t+lt)`.
pub fn within_boundary<const N: usize>(lt: i64, zoid: &mut Zoid<N>, grid: &PhysicalGrid<N>) -> bool {
    let mut touches = false;
    for axis in 0..N {
        touches |= touch_boundary(axis, lt, zoid, grid);
    }
    !touches
}
