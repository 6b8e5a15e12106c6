//! The content-store trait.
//!
//! Durable state that crosses requests — content records, users, and
//! site options such as the enabled-addon list — lives in an external
//! store. This subsystem only performs simple point lookups against it,
//! re-read at the start of each request.

pub mod memory;

use async_trait::async_trait;

use crate::error::AppError;
use crate::types::{ContentRecord, UserRecord};

pub use memory::MemoryStore;

/// Option key holding the JSON array of enabled addon keys.
///
/// When the option is absent every installed addon is treated as enabled.
pub const OPTION_ACTIVE_ADDONS: &str = "active_addons";

/// Option key holding the active admin theme name.
pub const OPTION_ADMIN_THEME: &str = "admin_theme";

/// Read-mostly access to the external content store.
///
/// Implementations must be cheap point lookups; this subsystem never
/// requires transactions or scans from the store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a content record by id.
    async fn content(&self, id: i64) -> Result<Option<ContentRecord>, AppError>;

    /// Insert or replace a content record.
    async fn upsert_content(&self, record: ContentRecord) -> Result<(), AppError>;

    /// Look up a user by login name.
    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    /// Read a site option value.
    async fn option_value(&self, name: &str) -> Result<Option<String>, AppError>;

    /// Write a site option value.
    async fn set_option(&self, name: &str, value: &str) -> Result<(), AppError>;
}
