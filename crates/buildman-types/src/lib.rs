//! Shared domain types for buildman.
//!
//! This crate contains the core domain types used across the build manager:
//! Build presets, the active selection, observed live account state,
//! storage keys, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod build;
pub mod config;
pub mod current;
pub mod error;
pub mod live;
pub mod storage;
