//! Site identity configuration.

use serde::{Deserialize, Serialize};

/// Site identity settings shown in admin chrome and page titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Short site description.
    #[serde(default)]
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: String::new(),
        }
    }
}

fn default_name() -> String {
    "Quill CMS".to_string()
}
