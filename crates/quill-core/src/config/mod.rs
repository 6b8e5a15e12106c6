//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod admin;
pub mod logging;
pub mod server;
pub mod site;

use serde::{Deserialize, Serialize};

use self::admin::AdminConfig;
use self::logging::LoggingConfig;
use self::server::ServerConfig;
use self::site::SiteConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Site identity settings.
    #[serde(default)]
    pub site: SiteConfig,
    /// Admin surface settings.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Theme lookup settings.
    #[serde(default)]
    pub themes: ThemeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Whether the instance runs in production mode. In production,
    /// internal error details are never leaked into response bodies.
    #[serde(default)]
    pub production: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            admin: AdminConfig::default(),
            themes: ThemeConfig::default(),
            logging: LoggingConfig::default(),
            production: false,
        }
    }
}

/// Theme lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Directory containing theme folders.
    #[serde(default = "default_theme_directory")]
    pub directory: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            directory: default_theme_directory(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `QUILL`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("QUILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_theme_directory() -> String {
    "themes".to_string()
}
