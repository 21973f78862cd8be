//! Business logic and port definitions for buildman.
//!
//! This crate defines the "ports" (the `KvStore` and `GameClient` traits)
//! that the infrastructure layer implements, plus everything that can be
//! decided without I/O: catalogs, change plans, page extraction. It depends
//! only on `buildman-types`, never on `buildman-infra`.

pub mod catalog;
pub mod change;
pub mod game;
pub mod import;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
