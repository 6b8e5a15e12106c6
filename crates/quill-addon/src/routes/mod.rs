//! Route registration and dispatch for the admin surface.

pub mod entry;
pub mod error_pages;
pub mod pattern;
pub mod registry;

pub use entry::{
    FnHandler, HandlerOutput, ResponseBody, RouteEntry, RouteHandler, RouteRequest, RouteSpec,
};
pub use pattern::RoutePattern;
pub use registry::{DispatchContext, Dispatched, RouteRegistry};
