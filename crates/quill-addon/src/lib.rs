//! # quill-addon
//!
//! The addon extension framework for Quill CMS: the mechanism by which
//! independently loaded addons register event listeners, admin routes,
//! and admin menus into a running request, and by which those
//! registrations are resolved (dispatch, menu trees) or cleanly reversed
//! (addon disabled) without restarting the process.
//!
//! Registries are request-scoped by construction: [`lifecycle::AddonHost`]
//! rebuilds them from addon registration code at the start of each
//! request, so no cross-request registry state needs synchronization.

pub mod addon;
pub mod events;
pub mod lifecycle;
pub mod menus;
pub mod routes;

pub use addon::{Addon, AddonManifest, RegistrationContext};
pub use events::{EventBus, EventContext, EventListener, FnListener};
pub use lifecycle::{AddonHost, Registries};
pub use menus::{MenuNode, MenuRegistry, MenuSpec};
pub use routes::{
    Dispatched, DispatchContext, FnHandler, HandlerOutput, ResponseBody, RouteHandler,
    RouteRegistry, RouteRequest, RouteSpec,
};
