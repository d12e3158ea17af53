//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling and the HTTP exception handler
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{handle_exception, AppError, AppResult, FieldErrors};
