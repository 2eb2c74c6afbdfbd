//! The homogeneity planner and its replay executor:
//! build a [`tree::PlanTree`] once by walking the same axis/time recursion the
//! direct drivers use, consulting a region predicate instead of a kernel, then
//! replay it as many times as the caller likes without re-evaluating any
//! predicate.

mod builder;
mod executor;
mod homogeneity_vector;
mod tree;

pub use builder::build_plan;
pub use executor::execute_plan;
pub use homogeneity_vector::{Homogeneity, HomogeneityTable};
pub use tree::{PlanNode, PlanTree};
