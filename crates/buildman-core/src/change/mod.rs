//! Applying builds to the live account.

pub mod attribute;
pub mod orchestrator;
pub mod plan;
pub mod wire;

pub use orchestrator::ChangeOrchestrator;
pub use plan::{ChangeMode, ChangePlan};
