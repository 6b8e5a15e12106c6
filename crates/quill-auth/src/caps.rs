//! Capability name constants and the broader/narrower relation.
//!
//! Capabilities are plain strings so addons can register their own. The
//! constants below are the core set consumed by the built-in admin
//! surface.

/// View the admin dashboard.
pub const VIEW_DASHBOARD: &str = "view_dashboard";

/// Edit own content.
pub const EDIT_CONTENT: &str = "edit_content";
/// Edit content authored by other users.
pub const EDIT_OTHERS_CONTENT: &str = "edit_others_content";
/// Delete own content.
pub const DELETE_CONTENT: &str = "delete_content";
/// Delete content authored by other users.
pub const DELETE_OTHERS_CONTENT: &str = "delete_others_content";
/// Publish content.
pub const PUBLISH_CONTENT: &str = "publish_content";

/// Upload media files.
pub const UPLOAD_MEDIA: &str = "upload_media";
/// Delete own media files.
pub const DELETE_MEDIA: &str = "delete_media";
/// Delete media files uploaded by other users.
pub const DELETE_OTHERS_MEDIA: &str = "delete_others_media";

/// Manage user accounts.
pub const MANAGE_USERS: &str = "manage_users";
/// Manage site settings.
pub const MANAGE_SETTINGS: &str = "manage_settings";
/// Enable, disable, and configure addons.
pub const MANAGE_ADDONS: &str = "manage_addons";
/// Switch and configure themes.
pub const MANAGE_THEMES: &str = "manage_themes";
/// Manage navigation menus.
pub const MANAGE_MENUS: &str = "manage_menus";

/// Moderate visitor comments and messages.
pub const MODERATE_COMMENTS: &str = "moderate_comments";

/// Wildcard capability held by the administrator role.
pub const WILDCARD: &str = "*";

/// Marker segment distinguishing the cross-ownership form of a
/// capability (`edit_others_content`) from the per-self form
/// (`edit_content`).
const OTHERS_SEGMENT: &str = "others";

/// Returns the broader cross-ownership form of a capability, if one can
/// be derived.
///
/// `edit_content` → `edit_others_content`. Capabilities that already
/// carry the marker, or that have no object part, have no broader form.
pub fn broader_form(capability: &str) -> Option<String> {
    let (verb, rest) = capability.split_once('_')?;
    if rest == OTHERS_SEGMENT || rest.starts_with("others_") {
        return None;
    }
    Some(format!("{verb}_{OTHERS_SEGMENT}_{rest}"))
}

/// Returns the narrower per-self form of a cross-ownership capability,
/// if the capability carries the ownership marker.
///
/// `edit_others_content` → `edit_content`.
pub fn narrower_form(capability: &str) -> Option<String> {
    let (verb, rest) = capability.split_once('_')?;
    let object = rest.strip_prefix("others_")?;
    Some(format!("{verb}_{object}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broader_and_narrower_are_inverses() {
        assert_eq!(
            broader_form("edit_content").as_deref(),
            Some("edit_others_content")
        );
        assert_eq!(
            narrower_form("edit_others_content").as_deref(),
            Some("edit_content")
        );
        assert_eq!(
            broader_form("delete_media").as_deref(),
            Some("delete_others_media")
        );
    }

    #[test]
    fn forms_without_a_counterpart() {
        // Already the broad form.
        assert_eq!(broader_form("edit_others_content"), None);
        // No ownership marker to strip.
        assert_eq!(narrower_form("manage_settings"), None);
        // No object part at all.
        assert_eq!(broader_form("administer"), None);
    }
}
