//! Business logic services (use cases).
//!
//! Services own the build list, the active selection and the path from a
//! saved build to the live account. They depend on traits (ports), never
//! on concrete infrastructure implementations.

pub mod build;
pub mod current;
pub mod manager;
pub mod validate;

pub use build::{BuildRepository, Removed};
pub use current::ActiveBuildTracker;
pub use manager::{BuildManager, LiveFields};
