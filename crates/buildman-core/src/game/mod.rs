//! Port to the live game server.

pub mod client;
pub mod request;
