//! Content record surface of the external content store.
//!
//! The persistent store itself (tables, editor, media) is outside this
//! subsystem; these types describe the slice the registry needs for
//! ownership checks and handler rendering.

use serde::{Deserialize, Serialize};

/// Publication state of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Not yet visible to visitors.
    Draft,
    /// Publicly visible.
    Published,
}

/// A content record as seen by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Record id.
    pub id: i64,
    /// Id of the user who authored the record. Ownership checks compare
    /// this against the principal id.
    pub author_id: i64,
    /// Record title.
    pub title: String,
    /// Publication state.
    pub status: ContentStatus,
}

/// A user record as seen by this subsystem (role lookup at the edge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Role name.
    pub role: String,
}
