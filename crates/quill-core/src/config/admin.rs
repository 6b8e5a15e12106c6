//! Admin surface configuration.

use serde::{Deserialize, Serialize};

/// Admin surface settings: where the admin lives and which theme renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// URL prefix under which every registered admin route is reachable.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Active admin theme (a folder name under the theme directory).
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            theme: default_theme(),
        }
    }
}

fn default_base_path() -> String {
    "/admin".to_string()
}

fn default_theme() -> String {
    "admin-default".to_string()
}
