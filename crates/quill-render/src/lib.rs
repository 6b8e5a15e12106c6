//! # quill-render
//!
//! Theme-agnostic rendering for the admin surface: logical view names
//! resolve to template files through an ordered fallback chain (active
//! theme, then the built-in default), and page content is spliced into
//! the theme layout through a placeholder token.

pub mod renderer;
pub mod resolver;

pub use renderer::{AdminRenderer, CONTENT_PLACEHOLDER, LAYOUT_VIEW};
pub use resolver::{DEFAULT_THEME, ViewResolver};
