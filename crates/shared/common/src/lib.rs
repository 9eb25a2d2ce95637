//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with HTTP response mapping
//! - Shared configuration structures for the record store

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};

/// Response header set when a list was served from a failed store read.
/// Its value is the read error.
pub const STORE_WARNING_HEADER: &str = "x-store-warning";
