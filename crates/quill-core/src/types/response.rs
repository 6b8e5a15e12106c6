//! JSON envelope for API routes.

use serde::{Deserialize, Serialize};

/// Standard JSON API response body: `{"success": bool, "data"|"error": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// A success envelope carrying `data`.
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failure envelope carrying an error message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Serialize into a `serde_json::Value`.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({ "success": false }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let ok = ApiResponse::ok(serde_json::json!({ "id": 7 })).to_value();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"]["id"], 7);
        assert!(ok.get("error").is_none());

        let err = ApiResponse::err("nope").to_value();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "nope");
    }
}
