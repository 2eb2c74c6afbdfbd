//! Error taxonomy for the scheduler's configuration surface.
//!
//! Queue overflow and zoid-invariant violations are *not* represented here:
//! per the propagation policy, those are programming errors the recursion
//! guarantees away by construction, and they stay `assert!`/`debug_assert!`
//! panics rather than values a caller could "handle" mid-plan.

use thiserror::Error;

/// Errors raised while validating a [`crate::config::Config`] before a run starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("axis {axis} has non-positive slope {slope}")]
    NonPositiveSlope { axis: usize, slope: i64 },

    #[error("axis {axis} physical length {length} is not positive")]
    NonPositiveLength { axis: usize, length: i64 },

    #[error("ALGOR_QUEUE_SIZE {capacity} is smaller than the required 3*N+3 = {required}")]
    QueueTooSmall { capacity: usize, required: usize },

    #[error("time threshold {value} must be positive")]
    NonPositiveDtRecursive { value: i64 },

    #[error("lcm_unroll {lcm_unroll} must be positive")]
    NonPositiveUnroll { lcm_unroll: i64 },
}
