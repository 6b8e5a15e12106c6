//! Addon lifecycle — building the per-request registries from the
//! installed addon set and the stored enabled-addon list, and applying
//! enable/disable without a process restart.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};

use quill_core::store::{ContentStore, OPTION_ACTIVE_ADDONS};
use quill_core::AppError;

use crate::addon::{Addon, AddonManifest, RegistrationContext};
use crate::events::EventBus;
use crate::menus::MenuRegistry;
use crate::routes::RouteRegistry;

/// The per-request registries, built fresh by [`AddonHost::load_enabled`].
pub struct Registries {
    /// The event bus.
    pub events: EventBus,
    /// The route registry.
    pub routes: RouteRegistry,
    /// The menu registry.
    pub menus: MenuRegistry,
    manifests: Vec<AddonManifest>,
}

impl Registries {
    fn new(base_path: &str) -> Self {
        Self {
            events: EventBus::new(),
            routes: RouteRegistry::new(base_path),
            menus: MenuRegistry::new(base_path),
            manifests: Vec::new(),
        }
    }

    /// Manifests of every installed addon, in load order, with their
    /// enabled state for this request.
    pub fn manifests(&self) -> &[AddonManifest] {
        &self.manifests
    }

    /// The manifest for one addon key.
    pub fn manifest(&self, key: &str) -> Option<&AddonManifest> {
        self.manifests.iter().find(|m| m.key == key)
    }

    /// Removes every record the addon contributed, across all three
    /// registries. Idempotent; returns the total number removed.
    pub fn unregister_addon(&mut self, key: &str) -> usize {
        self.events.unregister_by(key)
            + self.routes.unregister_by(key)
            + self.menus.unregister_by(key)
    }

    fn set_enabled(&mut self, key: &str, enabled: bool) {
        if let Some(manifest) = self.manifests.iter_mut().find(|m| m.key == key) {
            manifest.enabled = enabled;
        }
    }
}

/// The installed addon set and the logic that loads it.
///
/// The host constructs one `AddonHost` at startup (compiled-in addons
/// are installed explicitly) and calls [`AddonHost::load_enabled`] at
/// the start of each request. Durable enabled/disabled state lives in
/// the content store's `active_addons` option; the registries themselves
/// never survive a request.
pub struct AddonHost {
    base_path: String,
    addons: Vec<Arc<dyn Addon>>,
}

impl AddonHost {
    /// Creates a host serving addons under the given admin base path.
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.to_string(),
            addons: Vec::new(),
        }
    }

    /// Installs an addon. Installation order is the tie-break for equal
    /// load priorities.
    pub fn install(&mut self, addon: Arc<dyn Addon>) {
        self.addons.push(addon);
    }

    /// Keys of every installed addon, in declaration order.
    pub fn installed_keys(&self) -> Vec<String> {
        self.addons.iter().map(|a| a.manifest().key).collect()
    }

    /// Builds fresh registries by running every enabled addon's
    /// registration code in `(priority, installation)` order.
    ///
    /// An addon whose registration fails is logged, its partial
    /// registrations are purged, and it is excluded from dispatch for
    /// this request; remaining addons load normally.
    pub async fn load_enabled(&self, store: &dyn ContentStore) -> Registries {
        let enabled_keys = self.enabled_keys(store).await;
        let mut registries = Registries::new(&self.base_path);

        let mut ordered: Vec<&Arc<dyn Addon>> = self.addons.iter().collect();
        ordered.sort_by_key(|a| a.manifest().priority);

        for addon in ordered {
            let mut manifest = addon.manifest();
            manifest.enabled = enabled_keys
                .as_ref()
                .map(|keys| keys.contains(&manifest.key))
                .unwrap_or(true);

            if manifest.enabled {
                let loaded = self.run_registration(addon.as_ref(), &manifest.key, &mut registries);
                if !loaded {
                    manifest.enabled = false;
                }
            }
            registries.manifests.push(manifest);
        }

        registries
    }

    /// Disables an addon: persists the change and reverses every
    /// registration attributed to it in the live registries.
    pub async fn disable(
        &self,
        store: &dyn ContentStore,
        registries: &mut Registries,
        key: &str,
    ) -> Result<usize, AppError> {
        if !self.addons.iter().any(|a| a.manifest().key == key) {
            return Err(AppError::not_found(format!("Addon '{key}' is not installed")));
        }

        let mut enabled = self.currently_enabled(store, registries).await;
        enabled.retain(|k| k != key);
        self.persist_enabled(store, &enabled).await?;

        let removed = registries.unregister_addon(key);
        registries.set_enabled(key, false);
        info!(addon = %key, removed = removed, "Addon disabled");
        Ok(removed)
    }

    /// Enables an addon: persists the change and re-runs the addon's
    /// registration code so its records are rebuilt.
    pub async fn enable(
        &self,
        store: &dyn ContentStore,
        registries: &mut Registries,
        key: &str,
    ) -> Result<(), AppError> {
        let addon = self
            .addons
            .iter()
            .find(|a| a.manifest().key == key)
            .ok_or_else(|| AppError::not_found(format!("Addon '{key}' is not installed")))?;

        let mut enabled = self.currently_enabled(store, registries).await;
        if !enabled.iter().any(|k| k == key) {
            enabled.push(key.to_string());
        }
        self.persist_enabled(store, &enabled).await?;

        // Drop any stale records before re-running registration.
        registries.unregister_addon(key);
        if self.run_registration(addon.as_ref(), key, registries) {
            registries.set_enabled(key, true);
            info!(addon = %key, "Addon enabled");
            Ok(())
        } else {
            registries.set_enabled(key, false);
            Err(AppError::addon_load(format!(
                "Addon '{key}' failed to register"
            )))
        }
    }

    fn run_registration(
        &self,
        addon: &dyn Addon,
        key: &str,
        registries: &mut Registries,
    ) -> bool {
        let result = {
            let Registries {
                events,
                routes,
                menus,
                ..
            } = &mut *registries;
            let mut ctx = RegistrationContext::new(key, events, routes, menus);
            addon.register(&mut ctx)
        };

        match result {
            Ok(()) => {
                info!(addon = %key, "Addon registered");
                true
            }
            Err(e) => {
                error!(
                    addon = %key,
                    error = %e,
                    "Addon failed to register; purging its partial registrations"
                );
                registries.unregister_addon(key);
                false
            }
        }
    }

    /// Reads the stored enabled set. Absent or unparseable values mean
    /// "all installed addons enabled" (the backward-compatible default).
    async fn enabled_keys(&self, store: &dyn ContentStore) -> Option<HashSet<String>> {
        let raw = match store.option_value(OPTION_ACTIVE_ADDONS).await {
            Ok(value) => value?,
            Err(e) => {
                warn!(error = %e, "Could not read the enabled-addon list; loading all addons");
                return None;
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(keys) => Some(keys.into_iter().collect()),
            Err(e) => {
                warn!(error = %e, "Malformed enabled-addon list; loading all addons");
                None
            }
        }
    }

    /// The enabled key list to base an update on: the stored list, or
    /// every key currently enabled in the live registries when no list
    /// has been stored yet.
    async fn currently_enabled(
        &self,
        store: &dyn ContentStore,
        registries: &Registries,
    ) -> Vec<String> {
        match self.enabled_keys(store).await {
            Some(keys) => {
                // Preserve installation order for a stable stored list.
                self.installed_keys()
                    .into_iter()
                    .filter(|k| keys.contains(k))
                    .collect()
            }
            None => registries
                .manifests()
                .iter()
                .filter(|m| m.enabled)
                .map(|m| m.key.clone())
                .collect(),
        }
    }

    async fn persist_enabled(
        &self,
        store: &dyn ContentStore,
        enabled: &[String],
    ) -> Result<(), AppError> {
        let value = serde_json::to_string(enabled)?;
        store.set_option(OPTION_ACTIVE_ADDONS, &value).await
    }
}
