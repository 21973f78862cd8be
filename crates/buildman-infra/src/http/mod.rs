//! HTTP adapters for the game server.

pub mod client;

pub use client::HttpGameClient;
