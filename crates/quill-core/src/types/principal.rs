//! The authenticated (or anonymous) actor making a request.

use serde::{Deserialize, Serialize};

/// The actor behind the current request.
///
/// A principal is sourced once per request at the edge (session, token,
/// or none) and passed explicitly into dispatch, authorization, and
/// handlers — never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User id; `0` for the anonymous principal.
    pub id: i64,
    /// Login name; `"anonymous"` for the anonymous principal.
    pub username: String,
    /// Role name, or `None` when the principal carries no role.
    pub role: Option<String>,
}

impl Principal {
    /// An authenticated principal with the given role.
    pub fn authenticated(id: i64, username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            role: Some(role.into()),
        }
    }

    /// The anonymous principal. Holds no capabilities and owns nothing.
    pub fn anonymous() -> Self {
        Self {
            id: 0,
            username: "anonymous".to_string(),
            role: None,
        }
    }

    /// Whether this principal is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.id != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_not_authenticated() {
        assert!(!Principal::anonymous().is_authenticated());
        assert!(Principal::authenticated(3, "vera", "editor").is_authenticated());
    }
}
