//! Space-cut regimes: the different ways a zoid's bottom/top bar geometry on
//! one axis decides how it splits into sub-zoids.
//!
//! Each regime corresponds to one space-cut family: the "shorter bar" cut,
//! the "longer bar" cut, the "modified" interior/boundary split, and the
//! adaptive-boundary predicate. They share one shape: given a zoid and the
//! time span it is cut over, decide whether
//! `axis` can still be cut (`can_cut`), and if so produce the 2-5 child
//! zoids, each tagged with the [`crate::queue::Color`] of the generation it
//! belongs to.

mod adaptive;
mod longer_bar;
mod modified;
mod shorter_bar;

pub use adaptive::AdaptiveRegime;
pub use longer_bar::LongerBarRegime;
pub use modified::ModifiedRegime;
pub use shorter_bar::ShorterBarRegime;

use smallvec::SmallVec;

use crate::config::RecursionThresholds;
use crate::geometry::Zoid;
use crate::queue::Color;

/// A child zoid produced by a space cut, tagged with the generation it runs
/// in relative to its siblings.
#[derive(Debug, Clone, Copy)]
pub struct ColoredZoid<const N: usize> {
    pub zoid: Zoid<N>,
    pub color: Color,
}

/// Up to five children per cut (the "modified cut" interior case is the
/// widest: two bottom triangles, two side trapezoids, one top triangle).
pub type SplitResult<const N: usize> = SmallVec<[ColoredZoid<N>; 5]>;

/// A space-cut strategy for one axis of the recursion.
pub trait Regime<const N: usize> {
    /// Whether `axis` can still be cut for a zoid of this shape over a time
    /// span `lt`, given the configured per-axis threshold and the axis slope
    /// `sigma` (used to compute `thres = sigma*lt` and `pad = 2*sigma`).
    /// `false` means the recursion should either try the next axis or fall
    /// through to the base case.
    fn can_cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, thresholds: &RecursionThresholds<N>) -> bool;

    /// Splits `zoid` on `axis` over time span `lt` into its dependency-colored
    /// children. `color` is the generation color of `zoid` itself: children
    /// that are independent of their siblings inherit it unchanged, children
    /// that must wait for the others get `color.flip()`.
    fn cut(&self, axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N>;
}

/// The three-piece space cut shared by [`LongerBarRegime`] and
/// [`ShorterBarRegime`]: two same-orientation trapezoids flanking the bottom
/// bar, computed in parallel (`Color::A`), plus one opposite-orientation
/// sliver filling the gap they leave at the far edge, computed once both
/// neighbors have produced the data it reads (`Color::B`).
///
/// `cut_on_bottom` assumes the parent's bottom bar is the one with room to
/// cut (the "longer bar" case, `lb >= tb`); `cut_on_top` handles the
/// complementary case by running the same construction against the
/// time-reversal of the zoid and reversing the result back, which is valid
/// because a trapezoid decomposition and its time-reversal are both valid
/// decompositions of their respective (also time-reversed) parents.
pub(crate) fn cut_on_bottom<const N: usize>(axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N> {
    let mid = (zoid.x0[axis] + zoid.x1[axis]) / 2;

    let mut left = *zoid;
    left.x1[axis] = mid;
    left.dx1[axis] = -sigma;

    let mut right = *zoid;
    right.x0[axis] = mid;
    right.dx0[axis] = sigma;

    let mut gap = *zoid;
    gap.x0[axis] = mid;
    gap.x1[axis] = mid;
    gap.dx0[axis] = -sigma;
    gap.dx1[axis] = sigma;

    left.check_invariant(lt);
    right.check_invariant(lt);
    gap.check_invariant(lt);

    let mut result = SplitResult::new();
    result.push(ColoredZoid { zoid: left, color });
    result.push(ColoredZoid { zoid: right, color });
    result.push(ColoredZoid { zoid: gap, color: color.flip() });
    result
}

pub(crate) fn cut_on_top<const N: usize>(axis: usize, zoid: &Zoid<N>, lt: i64, sigma: i64, color: Color) -> SplitResult<N> {
    let reversed = zoid.shifted(lt);
    let mut reversed = reversed;
    reversed.dx0[axis] = -zoid.dx0[axis];
    reversed.dx1[axis] = -zoid.dx1[axis];

    let mut pieces = cut_on_bottom(axis, &reversed, lt, sigma, color);
    for piece in pieces.iter_mut() {
        let shifted = piece.zoid.shifted(lt);
        piece.zoid.x0[axis] = shifted.x0[axis];
        piece.zoid.x1[axis] = shifted.x1[axis];
        piece.zoid.dx0[axis] = -piece.zoid.dx0[axis];
        piece.zoid.dx1[axis] = -piece.zoid.dx1[axis];
    }
    pieces
}
