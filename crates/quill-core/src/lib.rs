//! # quill-core
//!
//! Core crate for Quill CMS. Contains the configuration schemas, shared
//! types (principal, content record, API envelope), the content-store
//! trait with its in-memory reference implementation, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Quill crates.

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use error::{AppError, ErrorKind};

/// Convenience alias used throughout the workspace.
pub type AppResult<T> = Result<T, AppError>;
