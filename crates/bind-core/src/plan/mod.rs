//! Planes de binding: metadata por (shape, source kind), derivada una vez.

mod build;
mod cache;
mod types;

pub use cache::{default_plan_cache, PlanCache};
pub use types::{BindingPlan, FieldDescriptor, KeyClaims};
