//! Event context — the mutable payload passed through a trigger chain.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutable context shared by every listener of one trigger.
///
/// Listeners receive the context by mutable reference: a listener may
/// set or rewrite fields and later listeners observe the mutation. This
/// is the data-filtering seam of the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContext {
    /// Arbitrary data keyed by string.
    data: HashMap<String, serde_json::Value>,
    /// Id of the user whose action triggered the event, if any.
    pub actor_id: Option<i64>,
    /// When the context was created.
    pub timestamp: DateTime<Utc>,
}

impl EventContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            actor_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the acting user id.
    pub fn with_actor(mut self, actor_id: i64) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Inserts a value.
    pub fn with_value(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_str(self, key: &str, value: &str) -> Self {
        self.with_value(key, serde_json::json!(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_value(key, serde_json::json!(value))
    }

    /// Sets a value on an existing context.
    pub fn set(&mut self, key: &str, value: serde_json::Value) {
        self.data.insert(key.to_string(), value);
    }

    /// Appends a fragment to a string value, creating it if absent.
    ///
    /// Used by the `admin_head` / `admin_footer` extension points where
    /// every listener contributes markup.
    pub fn append_str(&mut self, key: &str, fragment: &str) {
        let combined = match self.get_str(key) {
            Some(existing) => format!("{existing}{fragment}"),
            None => fragment.to_string(),
        };
        self.set(key, serde_json::json!(combined));
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(|v| v.as_bool())
    }
}

impl Default for EventContext {
    fn default() -> Self {
        Self::new()
    }
}
