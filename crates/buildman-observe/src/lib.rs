//! Observability for buildman: subscriber setup and the span vocabulary of
//! build changes.

pub mod change_attrs;
pub mod tracing_setup;
