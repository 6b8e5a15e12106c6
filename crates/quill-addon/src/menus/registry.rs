//! Menu registry — addons register capability-gated admin navigation;
//! the theme renders the tree a principal is allowed to see.

use tracing::{debug, warn};

use quill_auth::CapabilityStore;
use quill_core::types::Principal;

use super::entry::{DEFAULT_ICON, MenuEntry, MenuNode, MenuSpec};

/// Registry of admin navigation entries for one request.
pub struct MenuRegistry {
    base_path: String,
    entries: Vec<MenuEntry>,
    next_seq: u64,
}

impl MenuRegistry {
    /// Creates an empty registry for menus under `base_path`.
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Registers a top-level menu entry on behalf of an addon.
    pub fn register_menu(&mut self, registered_by: &str, spec: MenuSpec) {
        let url = spec
            .url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.base_path, spec.id));
        self.insert(registered_by, None, spec, url);
    }

    /// Registers a submenu under an existing top-level entry.
    ///
    /// The parent does not have to exist yet (addons load in priority
    /// order); an entry whose parent is still absent at render time is
    /// dropped from the visible tree.
    pub fn register_submenu(&mut self, registered_by: &str, parent_id: &str, spec: MenuSpec) {
        let url = spec
            .url
            .clone()
            .unwrap_or_else(|| format!("{}/{}/{}", self.base_path, parent_id, spec.id));
        self.insert(registered_by, Some(parent_id.to_string()), spec, url);
    }

    fn insert(
        &mut self,
        registered_by: &str,
        parent_id: Option<String>,
        spec: MenuSpec,
        url: String,
    ) {
        if let Some(existing) = self.entries.iter().position(|e| e.id == spec.id) {
            let previous = &self.entries[existing];
            if previous.registered_by != registered_by {
                warn!(
                    menu_id = %spec.id,
                    previous = %previous.registered_by,
                    addon = %registered_by,
                    "Menu id conflict: last registration wins"
                );
            } else {
                debug!(menu_id = %spec.id, addon = %registered_by, "Menu re-registered");
            }
            self.entries.remove(existing);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(MenuEntry {
            id: spec.id,
            parent_id,
            label: spec.label,
            icon: spec.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            url,
            capability: spec.capability,
            weight: spec.weight,
            registered_by: registered_by.to_string(),
            seq,
        });
    }

    /// Removes every entry registered by the given addon.
    ///
    /// Idempotent; returns the number of entries removed. Submenus whose
    /// parent disappears in the same pass stay registered but are
    /// dropped from the visible tree until their parent returns.
    pub fn unregister_by(&mut self, registered_by: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.registered_by != registered_by);
        before - self.entries.len()
    }

    /// Number of registered entries (all levels).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the navigation tree the principal is allowed to see.
    ///
    /// Every node is filtered through the capability store; a submenu
    /// whose parent is hidden or absent is never shown. Within a level,
    /// entries order by ascending weight, ties broken by registration
    /// order. `active` marks nodes whose URL prefixes the current path.
    pub fn visible_tree(
        &self,
        principal: &Principal,
        capabilities: &CapabilityStore,
        current_path: &str,
    ) -> Vec<MenuNode> {
        let visible = |entry: &MenuEntry| match &entry.capability {
            Some(capability) => capabilities.authorize(principal, capability, None),
            None => true,
        };

        let mut top: Vec<&MenuEntry> = self
            .entries
            .iter()
            .filter(|e| e.parent_id.is_none())
            .collect();
        top.sort_by_key(|e| (e.weight, e.seq));

        top.into_iter()
            .filter(|e| visible(e))
            .map(|parent| {
                let mut children: Vec<&MenuEntry> = self
                    .entries
                    .iter()
                    .filter(|e| e.parent_id.as_deref() == Some(parent.id.as_str()))
                    .collect();
                children.sort_by_key(|e| (e.weight, e.seq));

                MenuNode {
                    id: parent.id.clone(),
                    label: parent.label.clone(),
                    icon: parent.icon.clone(),
                    url: parent.url.clone(),
                    active: path_is_under(current_path, &parent.url),
                    children: children
                        .into_iter()
                        .filter(|e| visible(e))
                        .map(|child| MenuNode {
                            id: child.id.clone(),
                            label: child.label.clone(),
                            icon: child.icon.clone(),
                            url: child.url.clone(),
                            active: path_is_under(current_path, &child.url),
                            children: Vec::new(),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

/// Prefix match on segment boundaries: `/admin/content` is under
/// `/admin/content` and `/admin`, but not under `/admin/cont`.
fn path_is_under(path: &str, url: &str) -> bool {
    let path = path.trim_end_matches('/');
    let url = url.trim_end_matches('/');
    path == url || path.starts_with(&format!("{url}/"))
}
