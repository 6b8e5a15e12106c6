//! Route entries, handler traits, and handler request/response types.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};

use quill_core::AppError;
use quill_core::types::Principal;

use super::pattern::RoutePattern;
use super::registry::DispatchContext;

/// Body of a dispatched response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// An HTML fragment or page.
    Html(String),
    /// A JSON value (API routes).
    Json(serde_json::Value),
    /// No body (redirects).
    Empty,
}

/// What a route handler produces.
#[derive(Debug, Clone)]
pub struct HandlerOutput {
    /// Response status; defaults to 200.
    pub status: StatusCode,
    /// Response body.
    pub body: ResponseBody,
    /// Page title for layout wrapping, if the handler wants one.
    pub page_title: Option<String>,
    /// Redirect target; the host turns this into a `Location` header.
    pub redirect_to: Option<String>,
}

impl HandlerOutput {
    /// An HTML response.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Html(body.into()),
            page_title: None,
            redirect_to: None,
        }
    }

    /// A JSON response.
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Json(value),
            page_title: None,
            redirect_to: None,
        }
    }

    /// A redirect response.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FOUND,
            body: ResponseBody::Empty,
            page_title: None,
            redirect_to: Some(to.into()),
        }
    }

    /// Overrides the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets the page title used when the route is layout-wrapped.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.page_title = Some(title.into());
        self
    }
}

/// The request a matched handler receives: bound pattern parameters,
/// parsed query string, the principal, and the per-request services.
pub struct RouteRequest<'a> {
    /// Normalized request path (admin-base-relative).
    pub path: String,
    /// Request method.
    pub method: Method,
    /// Values bound by the pattern's dynamic segments.
    pub params: HashMap<String, String>,
    /// Parsed query-string pairs.
    pub query: HashMap<String, String>,
    /// Parsed JSON request body, when the host supplied one.
    pub body: Option<serde_json::Value>,
    /// The actor making the request.
    pub principal: &'a Principal,
    /// Per-request services (capability store, event bus, content store).
    pub ctx: &'a DispatchContext<'a>,
}

impl RouteRequest<'_> {
    /// A bound pattern parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// A bound pattern parameter parsed as an id.
    pub fn param_i64(&self, name: &str) -> Option<i64> {
        self.param(name).and_then(|v| v.parse().ok())
    }

    /// A query-string value.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// A query-string value parsed as an id.
    pub fn query_i64(&self, name: &str) -> Option<i64> {
        self.query_value(name).and_then(|v| v.parse().ok())
    }
}

/// Trait for route handler implementations.
///
/// Handlers are resolved at registration time and stored directly in the
/// route entry, so an unknown handler is impossible at dispatch time.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Handles a matched request.
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError>;
}

/// A closure-based handler for routes that need no services or awaiting.
pub struct FnHandler {
    f: Box<dyn for<'a> Fn(&RouteRequest<'a>) -> Result<HandlerOutput, AppError> + Send + Sync>,
}

impl FnHandler {
    /// Wraps a closure into an `Arc<dyn RouteHandler>`.
    pub fn wrap<F>(f: F) -> Arc<dyn RouteHandler>
    where
        F: for<'a> Fn(&RouteRequest<'a>) -> Result<HandlerOutput, AppError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self { f: Box::new(f) })
    }
}

#[async_trait]
impl RouteHandler for FnHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        (self.f)(&req)
    }
}

/// Registration-time description of a route.
#[derive(Clone)]
pub struct RouteSpec {
    pub(crate) pattern: String,
    pub(crate) methods: Vec<Method>,
    pub(crate) handler: Arc<dyn RouteHandler>,
    pub(crate) capability: Option<String>,
    pub(crate) wrap_layout: bool,
}

impl RouteSpec {
    /// A route serving the given methods.
    pub fn new(methods: Vec<Method>, pattern: &str, handler: Arc<dyn RouteHandler>) -> Self {
        Self {
            pattern: pattern.to_string(),
            methods,
            handler,
            capability: None,
            wrap_layout: true,
        }
    }

    /// A GET route.
    pub fn get(pattern: &str, handler: Arc<dyn RouteHandler>) -> Self {
        Self::new(vec![Method::GET], pattern, handler)
    }

    /// A POST route.
    pub fn post(pattern: &str, handler: Arc<dyn RouteHandler>) -> Self {
        Self::new(vec![Method::POST], pattern, handler)
    }

    /// Requires a capability to dispatch this route.
    pub fn capability(mut self, capability: &str) -> Self {
        self.capability = Some(capability.to_string());
        self
    }

    /// Serves the handler output as-is instead of wrapping it in the
    /// admin layout.
    pub fn bare(mut self) -> Self {
        self.wrap_layout = false;
        self
    }
}

/// A registered route.
pub struct RouteEntry {
    /// The parsed pattern, admin-base-relative.
    pub pattern: RoutePattern,
    /// Methods this entry serves.
    pub methods: Vec<Method>,
    /// The handler invoked on match.
    pub handler: Arc<dyn RouteHandler>,
    /// Capability required to dispatch, if any.
    pub capability: Option<String>,
    /// Whether HTML output is wrapped in the admin layout.
    pub wrap_layout: bool,
    /// Addon that registered this entry.
    pub registered_by: String,
    /// Registration order, used by the last-registered-wins tie-break.
    pub(crate) seq: u64,
}

impl RouteEntry {
    /// Whether this entry belongs to the JSON API surface. API routes
    /// receive envelope-style error bodies instead of HTML pages.
    pub fn is_api(&self) -> bool {
        self.pattern.starts_with_literal("api")
    }
}
