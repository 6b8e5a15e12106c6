//! Shared domain types used across the workspace.

pub mod content;
pub mod principal;
pub mod response;

pub use content::{ContentRecord, ContentStatus, UserRecord};
pub use principal::Principal;
pub use response::ApiResponse;
