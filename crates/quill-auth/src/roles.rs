//! Role definitions — named sets of capability strings.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::caps;

/// The set of capabilities granted to one role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleSet {
    /// Capability names; may contain the `*` wildcard.
    capabilities: HashSet<String>,
}

impl RoleSet {
    /// Builds a role set from capability names.
    pub fn from_caps<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    /// A role set holding every capability implicitly.
    pub fn wildcard() -> Self {
        Self::from_caps([caps::WILDCARD])
    }

    /// Whether this role grants the capability.
    pub fn grants(&self, capability: &str) -> bool {
        self.capabilities.contains(caps::WILDCARD) || self.capabilities.contains(capability)
    }
}

/// The role name → capability set mapping for one request.
///
/// Role definitions are data: hosts and tests may install a custom
/// mapping, and the built-in matrix below ships as the default.
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    roles: HashMap<String, RoleSet>,
}

impl RoleMap {
    /// An empty mapping (no role grants anything).
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in role matrix.
    ///
    /// `administrator` (alias `admin`) holds the wildcard; `editor`
    /// manages all content; `author` manages only their own; and
    /// `subscriber` has no admin capabilities.
    pub fn builtin() -> Self {
        let mut map = Self::new();

        map.define("administrator", RoleSet::wildcard());
        map.define("admin", RoleSet::wildcard());

        map.define(
            "editor",
            RoleSet::from_caps([
                caps::VIEW_DASHBOARD,
                caps::EDIT_CONTENT,
                caps::EDIT_OTHERS_CONTENT,
                caps::DELETE_CONTENT,
                caps::DELETE_OTHERS_CONTENT,
                caps::PUBLISH_CONTENT,
                caps::UPLOAD_MEDIA,
                caps::DELETE_MEDIA,
                caps::DELETE_OTHERS_MEDIA,
                caps::MANAGE_MENUS,
                caps::MODERATE_COMMENTS,
            ]),
        );

        map.define(
            "author",
            RoleSet::from_caps([
                caps::VIEW_DASHBOARD,
                caps::EDIT_CONTENT,
                caps::DELETE_CONTENT,
                caps::PUBLISH_CONTENT,
                caps::UPLOAD_MEDIA,
                caps::DELETE_MEDIA,
            ]),
        );

        map.define("subscriber", RoleSet::from_caps::<[&str; 0], _>([]));

        map
    }

    /// Defines (or replaces) a role.
    pub fn define(&mut self, role: impl Into<String>, set: RoleSet) {
        self.roles.insert(role.into(), set);
    }

    /// Looks up a role's capability set.
    pub fn role(&self, name: &str) -> Option<&RoleSet> {
        self.roles.get(name)
    }

    /// Whether the named role grants the capability. Unknown roles grant
    /// nothing.
    pub fn role_grants(&self, role: &str, capability: &str) -> bool {
        self.roles
            .get(role)
            .map(|set| set.grants(capability))
            .unwrap_or(false)
    }
}
