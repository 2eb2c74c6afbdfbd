//! The user-supplied stencil kernel and base-case dispatch surface.

use crate::geometry::Zoid;

/// What a caller implements to plug a stencil computation into the
/// scheduler. The core is polymorphic over four kernel capabilities: `apply` (the aligned interior kernel, the only required
/// method), `boundary` (dispatched instead of `apply` once a leaf zoid
/// touched a physical edge), and `conditional_interior`/`conditional_boundary`
/// (the unaligned slow path the plan executor falls back to when a region's
/// `unroll` doesn't divide a leaf's time span). Implementors that
/// have no boundary-specific or unaligned-specific code simply inherit the
/// defaults, which all route to `apply`.
pub trait Kernels<const N: usize>: Send + Sync {
    /// Applies the stencil update to every point in `zoid` across the time
    /// span `[t, t + lt)`. Leaf-level work; called once per aligned interior
    /// base case.
    fn apply(&self, zoid: &Zoid<N>, t: i64, lt: i64);

    /// Aligned boundary kernel: the leaf touched a physical edge and was
    /// canonicalized by `touch_boundary` before this call.
    fn boundary(&self, zoid: &Zoid<N>, t: i64, lt: i64) {
        self.apply(zoid, t, lt)
    }

    /// Unaligned interior kernel: `t` or `t + lt` does not land on this
    /// region's `unroll` boundary (mod `time_shift`), so the kernel must
    /// bounds-check instead of assuming a full unrolled stride.
    fn conditional_interior(&self, zoid: &Zoid<N>, t: i64, lt: i64) {
        self.apply(zoid, t, lt)
    }

    /// Unaligned boundary kernel: both the boundary and the alignment
    /// fallback apply at once.
    fn conditional_boundary(&self, zoid: &Zoid<N>, t: i64, lt: i64) {
        self.boundary(zoid, t, lt)
    }

    /// Homogeneity predicate consulted while building a plan tree: `region` identifies a coloring key, and a `true` result lets the
    /// planner keep merging adjacent zoids into the same plan-tree leaf.
    fn is_homogeneous(&self, _region: &[i64]) -> bool {
        true
    }

    /// The homogeneity vector (`color_region` in the original) a candidate
    /// zoid belongs to: callers with more than one region override this to
    /// return the label identifying which combination of kernels is active
    /// over `zoid`. Two zoids with equal labels are the same region and fuse
    /// into one plan-tree leaf; the planner never inspects the geometry of
    /// `zoid`/`t`/`lt` itself, only this label, so the dedup table actually
    /// dedups instead of treating every leaf as unique. Defaults to a single
    /// universal region.
    fn region_label(&self, _zoid: &Zoid<N>, _t: i64, _lt: i64) -> Vec<i64> {
        vec![0]
    }

    /// This region's time-dimension unroll factor.
    /// A leaf whose `t`/`t + lt` isn't a multiple of this is dispatched
    /// through the `conditional_*` methods instead of the aligned ones.
    fn unroll(&self) -> i64 {
        1
    }

    /// Region-indexed aligned interior dispatch: the plan executor calls
    /// this instead of [`Kernels::apply`] so a caller backing several
    /// regions with one `Kernels` impl can switch on `region` internally
    /// (`opks[region_n]` in the original). Defaults to ignoring `region` and
    /// calling `apply`, which is correct for single-region callers.
    fn apply_region(&self, region: usize, zoid: &Zoid<N>, t: i64, lt: i64) {
        let _ = region;
        self.apply(zoid, t, lt);
    }

    fn boundary_region(&self, region: usize, zoid: &Zoid<N>, t: i64, lt: i64) {
        let _ = region;
        self.boundary(zoid, t, lt);
    }

    fn conditional_interior_region(&self, region: usize, zoid: &Zoid<N>, t: i64, lt: i64) {
        let _ = region;
        self.conditional_interior(zoid, t, lt);
    }

    fn conditional_boundary_region(&self, region: usize, zoid: &Zoid<N>, t: i64, lt: i64) {
        let _ = region;
        self.conditional_boundary(zoid, t, lt);
    }
}

/// Optional run counters collected when profiling is enabled. Zero-cost
/// when the `stats` feature is off: every call site compiles to nothing.
#[cfg(feature = "stats")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub space_cuts: u64,
    pub time_cuts: u64,
    pub boundary_cuts: u64,
    pub base_cases: u64,
    pub points_visited: u64,
}

#[cfg(feature = "stats")]
impl RunStats {
    pub fn merge(&mut self, other: &RunStats) {
        self.space_cuts += other.space_cuts;
        self.time_cuts += other.time_cuts;
        self.boundary_cuts += other.boundary_cuts;
        self.base_cases += other.base_cases;
        self.points_visited += other.points_visited;
    }
}

#[cfg(not(feature = "stats"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats;

#[cfg(not(feature = "stats"))]
impl RunStats {
    #[inline]
    pub fn merge(&mut self, _other: &RunStats) {}
}

/// Increments a [`RunStats`] field when the `stats` feature is enabled;
/// compiles away entirely otherwise. Keeps the counting out of the recursion's
/// hot path when nobody asked for it.
#[macro_export]
macro_rules! bump_stat {
    ($stats:expr, $field:ident) => {
        #[cfg(feature = "stats")]
        {
            $stats.$field += 1;
        }
    };
    ($stats:expr, $field:ident, $by:expr) => {
        #[cfg(feature = "stats")]
        {
            $stats.$field += $by;
        }
    };
}
