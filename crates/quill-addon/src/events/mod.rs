//! Named-hook pub/sub: addons subscribe listeners to lifecycle and
//! content events, the core triggers them at fixed extension points.

pub mod bus;
pub mod context;

pub use bus::{DEFAULT_PRIORITY, EventBus, EventListener, FnListener};
pub use context::EventContext;

/// Core extension-point event names.
///
/// Addons are free to trigger and subscribe to their own event names;
/// these are the points the built-in admin surface fires.
pub mod names {
    /// Fired while assembling the `<head>` of an admin page. Listeners
    /// append markup to the `html` context key.
    pub const ADMIN_HEAD: &str = "admin_head";
    /// Fired while assembling the footer of an admin page. Listeners
    /// append markup to the `html` context key.
    pub const ADMIN_FOOTER: &str = "admin_footer";
    /// Fired after a content record is saved.
    pub const CONTENT_SAVED: &str = "content_saved";
    /// Fired after a content record is deleted.
    pub const CONTENT_DELETED: &str = "content_deleted";
    /// Fired after a route has been dispatched, before the response is
    /// returned to the host.
    pub const REQUEST_DISPATCHED: &str = "request_dispatched";
}
