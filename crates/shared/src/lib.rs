//! Shared library for the AniChart seasonal listing workspace.
//!
//! This crate provides common functionality used by the listing core and
//! its binary:
//! - Configuration management
//! - Domain models (media records, seasons, sort keys)
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
