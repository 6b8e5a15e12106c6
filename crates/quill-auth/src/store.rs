//! Capability resolution for the current principal.

use quill_core::types::{ContentRecord, Principal};

use crate::caps::{broader_form, narrower_form};
use crate::roles::RoleMap;

/// Resolves whether a principal holds a capability and whether they own
/// a given content record.
///
/// Constructed once per request from the current role definitions and
/// consumed by the route and menu registries for gating. All checks
/// return `bool`; callers turn `false` into a 403.
#[derive(Debug, Clone, Default)]
pub struct CapabilityStore {
    roles: RoleMap,
}

impl CapabilityStore {
    /// A store backed by the built-in role matrix.
    pub fn new() -> Self {
        Self {
            roles: RoleMap::builtin(),
        }
    }

    /// A store backed by a custom role mapping.
    pub fn with_roles(roles: RoleMap) -> Self {
        Self { roles }
    }

    /// Whether the principal's role grants the capability directly.
    ///
    /// Anonymous principals hold no capabilities.
    pub fn can(&self, principal: &Principal, capability: &str) -> bool {
        match &principal.role {
            Some(role) => self.roles.role_grants(role, capability),
            None => false,
        }
    }

    /// Whether the principal authored the record.
    pub fn owns(&self, principal: &Principal, record: &ContentRecord) -> bool {
        principal.is_authenticated() && principal.id == record.author_id
    }

    /// Full authorization check.
    ///
    /// Holding the capability itself is sufficient; failing that, holding
    /// its broader `*_others_*` form is sufficient; otherwise the
    /// principal must own the record and hold the narrower per-self form.
    /// Without a record the ownership path cannot apply.
    pub fn authorize(
        &self,
        principal: &Principal,
        capability: &str,
        record: Option<&ContentRecord>,
    ) -> bool {
        if self.can(principal, capability) {
            return true;
        }

        if let Some(broader) = broader_form(capability) {
            if self.can(principal, &broader) {
                return true;
            }
        }

        let Some(record) = record else {
            return false;
        };
        let Some(narrower) = narrower_form(capability) else {
            // The per-self form was already checked above.
            return false;
        };

        self.owns(principal, record) && self.can(principal, &narrower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::types::ContentStatus;

    fn record(id: i64, author_id: i64) -> ContentRecord {
        ContentRecord {
            id,
            author_id,
            title: "Post".to_string(),
            status: ContentStatus::Published,
        }
    }

    #[test]
    fn anonymous_holds_nothing() {
        let store = CapabilityStore::new();
        let anon = Principal::anonymous();
        assert!(!store.can(&anon, "edit_content"));
        assert!(!store.authorize(&anon, "edit_content", Some(&record(1, 0))));
        assert!(!store.owns(&anon, &record(1, 0)));
    }

    #[test]
    fn administrator_wildcard_short_circuits() {
        let store = CapabilityStore::new();
        let admin = Principal::authenticated(1, "root", "administrator");
        assert!(store.can(&admin, "edit_others_content"));
        assert!(store.authorize(&admin, "some_addon_capability", None));
    }

    #[test]
    fn ownership_substitutes_for_the_broader_form() {
        let store = CapabilityStore::new();
        // author holds edit_content but not edit_others_content
        let author = Principal::authenticated(5, "ana", "author");

        let own = record(7, 5);
        let foreign = record(8, 2);

        assert!(store.authorize(&author, "edit_others_content", Some(&own)));
        assert!(!store.authorize(&author, "edit_others_content", Some(&foreign)));
        // Without a record the ownership path cannot apply.
        assert!(!store.authorize(&author, "edit_others_content", None));
    }

    #[test]
    fn broader_capability_covers_the_narrow_gate() {
        let store = CapabilityStore::new();
        let editor = Principal::authenticated(3, "vera", "editor");
        let foreign = record(8, 2);

        // editor holds the broad form, so the narrow gate passes even for
        // records they do not own.
        assert!(store.authorize(&editor, "edit_content", Some(&foreign)));
        assert!(store.authorize(&editor, "edit_others_content", Some(&foreign)));
    }

    #[test]
    fn granting_the_broader_capability_is_monotonic() {
        use crate::roles::{RoleMap, RoleSet};

        let mut narrow_roles = RoleMap::new();
        narrow_roles.define("editor", RoleSet::from_caps(["edit_content"]));
        let narrow = CapabilityStore::with_roles(narrow_roles);

        let mut broad_roles = RoleMap::new();
        broad_roles.define(
            "editor",
            RoleSet::from_caps(["edit_content", "edit_others_content"]),
        );
        let broad = CapabilityStore::with_roles(broad_roles);

        let editor = Principal::authenticated(3, "vera", "editor");
        let records = [record(1, 3), record(2, 9)];

        for rec in &records {
            for cap in ["edit_content", "edit_others_content"] {
                let before = narrow.authorize(&editor, cap, Some(rec));
                let after = broad.authorize(&editor, cap, Some(rec));
                // Every dispatch that succeeded before still succeeds.
                assert!(!before || after, "{cap} regressed on record {}", rec.id);
            }
        }
    }
}
