//! Configuration types for org adapters.
//!
//! # Security
//! These configuration structs intentionally do NOT store access tokens.
//! Tokens are handled separately through the [`auth`](crate::auth) module.

mod connection;

pub use connection::{ConnectionConfig, DEFAULT_API_VERSION};
