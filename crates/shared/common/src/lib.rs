//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling for the HTTP surface
//! - The response envelope
//! - Configuration structures

pub mod config;
pub mod error;
pub mod response;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use response::{ApiResponse, Created};
