//! The addon module contract.
//!
//! An addon is an independently loadable unit of behavior that registers
//! listeners, routes, and menus into the core without modifying core
//! files. Loading is an explicit function call — the lifecycle invokes
//! [`Addon::register`] with a context that attributes every registration
//! to the addon's key, so teardown by key is always total.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use quill_core::AppError;

use crate::events::{DEFAULT_PRIORITY, EventBus, EventListener};
use crate::menus::{MenuRegistry, MenuSpec};
use crate::routes::{RouteRegistry, RouteSpec};

/// Identity and load metadata of an addon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonManifest {
    /// Unique slug; the `registered_by` key on every record the addon
    /// contributes.
    pub key: String,
    /// Human-readable addon name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// Short description.
    pub description: String,
    /// Author or maintainer.
    pub author: String,
    /// Whether the addon was enabled for the current load.
    pub enabled: bool,
    /// Load priority (lower loads first); declaration order breaks ties.
    pub priority: i32,
}

impl AddonManifest {
    /// A manifest with defaults for the optional metadata.
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            version: "0.1.0".to_string(),
            description: String::new(),
            author: String::new(),
            enabled: true,
            priority: DEFAULT_LOAD_PRIORITY,
        }
    }

    /// Sets the version string.
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the author.
    pub fn author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    /// Sets the load priority.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Default addon load priority.
pub const DEFAULT_LOAD_PRIORITY: i32 = 50;

/// Trait every addon implements.
///
/// `register` runs during the load phase of each request and must be
/// reconstructible: the registries hold no addon state beyond what the
/// registration calls supply, so re-running it after a disable/enable
/// cycle rebuilds the addon completely.
pub trait Addon: Send + Sync {
    /// The addon's identity and load metadata.
    fn manifest(&self) -> AddonManifest;

    /// Performs the addon's registrations. An error here marks the
    /// addon failed for this request; partial registrations are purged.
    fn register(&self, ctx: &mut RegistrationContext<'_>) -> Result<(), AppError>;
}

/// Registration surface handed to [`Addon::register`].
///
/// Every call is attributed to the registering addon automatically.
pub struct RegistrationContext<'a> {
    addon_key: String,
    events: &'a mut EventBus,
    routes: &'a mut RouteRegistry,
    menus: &'a mut MenuRegistry,
}

impl<'a> RegistrationContext<'a> {
    /// Creates a context attributing registrations to `addon_key`.
    pub fn new(
        addon_key: &str,
        events: &'a mut EventBus,
        routes: &'a mut RouteRegistry,
        menus: &'a mut MenuRegistry,
    ) -> Self {
        Self {
            addon_key: addon_key.to_string(),
            events,
            routes,
            menus,
        }
    }

    /// The key registrations are attributed to.
    pub fn addon_key(&self) -> &str {
        &self.addon_key
    }

    /// Subscribes a listener to an event at the default priority.
    pub fn on(&mut self, event: &str, listener: Arc<dyn EventListener>) {
        self.on_with_priority(event, DEFAULT_PRIORITY, listener);
    }

    /// Subscribes a listener to an event with an explicit priority
    /// (lower runs first).
    pub fn on_with_priority(
        &mut self,
        event: &str,
        priority: i32,
        listener: Arc<dyn EventListener>,
    ) {
        self.events.on(event, priority, &self.addon_key, listener);
    }

    /// Registers a route.
    pub fn route(&mut self, spec: RouteSpec) -> Result<(), AppError> {
        self.routes.register(&self.addon_key, spec)
    }

    /// Registers a top-level menu entry.
    pub fn menu(&mut self, spec: MenuSpec) {
        self.menus.register_menu(&self.addon_key, spec);
    }

    /// Registers a submenu under an existing top-level entry.
    pub fn submenu(&mut self, parent_id: &str, spec: MenuSpec) {
        self.menus.register_submenu(&self.addon_key, parent_id, spec);
    }
}
