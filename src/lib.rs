//! Signage - digital signage player and asset server
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod content;
pub mod seed;
pub mod server;
pub mod slides;
pub mod store;
pub mod templates;
