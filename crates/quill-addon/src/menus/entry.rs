//! Menu entry records and the rendered tree node.

use serde::Serialize;

/// Registration-time description of a menu entry.
#[derive(Debug, Clone)]
pub struct MenuSpec {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) icon: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) capability: Option<String>,
    pub(crate) weight: i32,
}

impl MenuSpec {
    /// A menu entry with the given id and label.
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: None,
            url: None,
            capability: None,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Sets the icon name.
    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Overrides the target URL. Defaults to `{admin_base}/{id}` for
    /// top-level entries and `{admin_base}/{parent}/{id}` for submenus.
    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Requires a capability to see this entry.
    pub fn capability(mut self, capability: &str) -> Self {
        self.capability = Some(capability.to_string());
        self
    }

    /// Sets the ordering weight (lower appears first). Entries without
    /// an explicit weight keep registration order among themselves.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }
}

/// Default ordering weight.
pub const DEFAULT_WEIGHT: i32 = 100;

/// Icon used when a registration supplies none.
pub const DEFAULT_ICON: &str = "extension";

/// A registered menu entry.
#[derive(Debug, Clone)]
pub struct MenuEntry {
    /// Entry id, unique within the registry.
    pub id: String,
    /// Parent entry id; `None` for top-level entries.
    pub parent_id: Option<String>,
    /// Display label.
    pub label: String,
    /// Icon name.
    pub icon: String,
    /// Target URL.
    pub url: String,
    /// Capability required to see the entry, if any.
    pub capability: Option<String>,
    /// Ordering weight (lower first).
    pub weight: i32,
    /// Addon that registered this entry.
    pub registered_by: String,
    /// Registration order, breaks weight ties.
    pub(crate) seq: u64,
}

/// A node of the rendered navigation tree, consumed by the admin theme.
#[derive(Debug, Clone, Serialize)]
pub struct MenuNode {
    /// Entry id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Icon name.
    pub icon: String,
    /// Target URL.
    pub url: String,
    /// Whether the current request path falls under this entry.
    pub active: bool,
    /// Visible children, already filtered and ordered.
    pub children: Vec<MenuNode>,
}
