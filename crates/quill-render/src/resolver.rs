//! View resolution — logical view names to concrete template paths.

use std::path::{Path, PathBuf};

use quill_core::AppError;

/// The built-in theme every resolution falls back to.
pub const DEFAULT_THEME: &str = "admin-default";

/// Template file extension.
const VIEW_EXTENSION: &str = "html";

/// Resolves logical view names against the active theme with fallback
/// to the default theme.
///
/// Resolution order, first hit wins: the active theme's `views/{name}`,
/// its `partials/{name}` (legacy alias), its root `{name}`; then the
/// same three locations in the default theme.
#[derive(Debug, Clone)]
pub struct ViewResolver {
    themes_dir: PathBuf,
    active_theme: String,
}

impl ViewResolver {
    /// Creates a resolver over `themes_dir` with the given active theme.
    pub fn new(themes_dir: impl Into<PathBuf>, active_theme: &str) -> Self {
        Self {
            themes_dir: themes_dir.into(),
            active_theme: active_theme.to_string(),
        }
    }

    /// The active theme name.
    pub fn active_theme(&self) -> &str {
        &self.active_theme
    }

    /// Resolves a view name to an existing template path.
    ///
    /// View names are logical: no extension, and path traversal segments
    /// are rejected before any filesystem access.
    pub fn resolve(&self, view: &str) -> Result<PathBuf, AppError> {
        validate_view_name(view)?;

        for candidate in self.candidates(view) {
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(AppError::not_found(format!("View not found: {view}")))
    }

    /// Candidate paths in resolution order.
    fn candidates(&self, view: &str) -> Vec<PathBuf> {
        let file = format!("{view}.{VIEW_EXTENSION}");
        let mut themes: Vec<&str> = vec![&self.active_theme];
        if self.active_theme != DEFAULT_THEME {
            themes.push(DEFAULT_THEME);
        }

        let mut paths = Vec::with_capacity(themes.len() * 3);
        for theme in themes {
            let theme_root = self.themes_dir.join(theme);
            paths.push(theme_root.join("views").join(&file));
            paths.push(theme_root.join("partials").join(&file));
            paths.push(theme_root.join(&file));
        }
        paths
    }
}

/// Rejects names that could escape the theme directory.
fn validate_view_name(view: &str) -> Result<(), AppError> {
    if view.is_empty() {
        return Err(AppError::validation("View name is empty"));
    }
    if view.starts_with('/') || view.contains('\\') || Path::new(view).is_absolute() {
        return Err(AppError::validation(format!(
            "View name '{view}' must be relative"
        )));
    }
    if view.split('/').any(|segment| segment == "..") {
        return Err(AppError::validation(format!(
            "View name '{view}' contains a path traversal segment"
        )));
    }
    Ok(())
}
