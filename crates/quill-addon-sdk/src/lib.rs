//! # quill-addon-sdk
//!
//! SDK for developing addons for Quill CMS.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quill_addon_sdk::prelude::*;
//!
//! struct MyAddon;
//!
//! impl Addon for MyAddon {
//!     fn manifest(&self) -> AddonManifest {
//!         AddonManifest::new("my-addon", "My Addon").version("1.0.0")
//!     }
//!
//!     fn register(&self, ctx: &mut RegistrationContext<'_>) -> Result<(), AppError> {
//!         ctx.menu(MenuSpec::new("my-addon", "My Addon").icon("settings"));
//!         ctx.route(RouteSpec::get(
//!             "my-addon",
//!             FnHandler::wrap(|_req| Ok(HandlerOutput::html("<h1>Hello</h1>"))),
//!         ))?;
//!         ctx.on(names::CONTENT_SAVED, FnListener::wrap(|_ctx| Ok(())));
//!         Ok(())
//!     }
//! }
//! ```

/// Prelude for convenient imports.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use http::{Method, StatusCode};

    pub use quill_addon::addon::{Addon, AddonManifest, RegistrationContext};
    pub use quill_addon::events::{names, EventContext, EventListener, FnListener};
    pub use quill_addon::menus::MenuSpec;
    pub use quill_addon::routes::{
        FnHandler, HandlerOutput, RouteHandler, RouteRequest, RouteSpec,
    };
    pub use quill_auth::caps;
    pub use quill_core::store::ContentStore;
    pub use quill_core::types::{ApiResponse, ContentRecord, Principal};
    pub use quill_core::{AppError, AppResult};
}
