//! Cache-oblivious stencil scheduler core: a recursive space-time
//! decomposition engine that partitions a rectangular N-dimensional iteration
//! space over a time interval into trapezoidal subzones ("zoids") and
//! dispatches a kernel functor at each leaf, subject to the stencil's causal
//! (dependency) ordering.
//!
//! The crate exposes four entry points, per the external interface summary:
//! [`run_bicut`] and [`run_adaptive`] run the decomposition directly against
//! the kernel; [`build_plan`]/[`execute_plan`] build a region-homogeneous plan
//! tree once and replay it as many times as the caller needs. Everything else
//! — stencil kernel code generation, boundary-value handling, array storage,
//! the Klein-bottle remap itself, timing/statistics collection, and the
//! top-level driver that decides what to schedule — is the embedding
//! program's responsibility; this crate only schedules.

pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod plan;
pub mod queue;
pub mod regime;
pub mod space_cut;
pub mod walk;

pub use config::{Config, ConfigSnapshot, NumTriangles, RecursionThresholds};
pub use driver::{run_adaptive, run_bicut};
#[cfg(feature = "affinity")]
pub use driver::run_bicut_pinned;
pub use error::ConfigError;
pub use geometry::{touch_boundary, within_boundary, KleinRemap, PhysicalGrid, Zoid};
pub use kernel::{Kernels, RunStats};
pub use plan::{build_plan, execute_plan, PlanNode, PlanTree};
pub use queue::{CircularQueue, Color, ColorQueues, QueueEntry};
pub use walk::walk_serial;
