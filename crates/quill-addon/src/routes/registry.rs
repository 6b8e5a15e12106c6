//! Route registry — addons register URL patterns at load time; the core
//! matches the current request path against all registered patterns and
//! dispatches the best match.

use std::borrow::Cow;
use std::collections::HashMap;

use http::{Method, StatusCode};
use tracing::{debug, error, warn};

use quill_auth::CapabilityStore;
use quill_core::store::ContentStore;
use quill_core::types::Principal;
use quill_core::ErrorKind;

use crate::addon::AddonManifest;
use crate::events::EventBus;

use super::entry::{ResponseBody, RouteEntry, RouteRequest, RouteSpec};
use super::error_pages;
use super::pattern::{split_path, RoutePattern};

/// Per-request services available to dispatch and handlers.
///
/// Assembled once at the edge and passed by reference; handlers never
/// reach for ambient state.
pub struct DispatchContext<'a> {
    /// Capability resolution for the current principal.
    pub capabilities: &'a CapabilityStore,
    /// The event bus, for triggering extension points mid-request.
    pub events: &'a EventBus,
    /// The external content store.
    pub store: &'a dyn ContentStore,
    /// Manifests of the installed addons, for the addon-manager surface.
    pub addons: &'a [AddonManifest],
    /// Whether internal error details must be suppressed.
    pub production: bool,
}

/// The outcome of one dispatch.
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// Response status.
    pub status: StatusCode,
    /// Response body; error outcomes carry a rendered page or a JSON
    /// envelope, never an empty body.
    pub body: ResponseBody,
    /// Whether the host should wrap an HTML body in the admin layout.
    pub wrap_layout: bool,
    /// Page title supplied by the handler for layout wrapping.
    pub page_title: Option<String>,
    /// Redirect target, if the handler issued one.
    pub redirect_to: Option<String>,
}

impl Dispatched {
    fn bare(status: StatusCode, body: ResponseBody) -> Self {
        Self {
            status,
            body,
            wrap_layout: false,
            page_title: None,
            redirect_to: None,
        }
    }
}

/// Registry of admin routes for one request.
pub struct RouteRegistry {
    /// URL prefix under which every entry is reachable.
    base_path: String,
    entries: Vec<RouteEntry>,
    next_seq: u64,
}

impl RouteRegistry {
    /// Creates an empty registry serving routes under `base_path`.
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Registers a route on behalf of an addon.
    ///
    /// An identical `(pattern, method)` pair already claimed by a
    /// *different* addon is replaced with a conflict log; re-registration
    /// by the same addon replaces silently.
    pub fn register(
        &mut self,
        registered_by: &str,
        spec: RouteSpec,
    ) -> Result<(), quill_core::AppError> {
        let relative = self.strip_base(&spec.pattern).unwrap_or(&spec.pattern);
        let pattern = RoutePattern::parse(relative)?;

        for existing in &mut self.entries {
            if existing.pattern != pattern {
                continue;
            }
            let overlap: Vec<Method> = existing
                .methods
                .iter()
                .filter(|m| spec.methods.contains(*m))
                .cloned()
                .collect();
            if overlap.is_empty() {
                continue;
            }
            if existing.registered_by != registered_by {
                warn!(
                    pattern = %pattern,
                    methods = ?overlap,
                    previous = %existing.registered_by,
                    addon = %registered_by,
                    "Route conflict: last registration wins"
                );
            } else {
                debug!(
                    pattern = %pattern,
                    addon = %registered_by,
                    "Route re-registered by its own addon"
                );
            }
            existing.methods.retain(|m| !spec.methods.contains(m));
        }
        self.entries.retain(|e| !e.methods.is_empty());

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(RouteEntry {
            pattern,
            methods: spec.methods,
            handler: spec.handler,
            capability: spec.capability,
            wrap_layout: spec.wrap_layout,
            registered_by: registered_by.to_string(),
            seq,
        });

        Ok(())
    }

    /// Removes every entry registered by the given addon.
    ///
    /// Idempotent; returns the number of entries removed. Runs in O(n)
    /// over current entries without re-executing addon code.
    pub fn unregister_by(&mut self, registered_by: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.registered_by != registered_by);
        before - self.entries.len()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The registered entries, in registration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Finds the best-matching entry for a normalized relative path.
    ///
    /// Specificity tie-break: the pattern with the most literal segments
    /// wins; a remaining tie goes to the most recent registration and is
    /// logged as an ambiguity.
    pub fn find_match(
        &self,
        relative_path: &str,
        method: &Method,
    ) -> Option<(&RouteEntry, HashMap<String, String>)> {
        let segments = split_path(relative_path);

        let mut candidates: Vec<(&RouteEntry, HashMap<String, String>)> = self
            .entries
            .iter()
            .filter(|e| e.methods.contains(method))
            .filter_map(|e| e.pattern.matches(&segments).map(|params| (e, params)))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let max_literals = candidates
            .iter()
            .map(|(e, _)| e.pattern.literal_count())
            .max()
            .unwrap_or(0);
        candidates.retain(|(e, _)| e.pattern.literal_count() == max_literals);

        if candidates.len() > 1 {
            let patterns: Vec<&str> = candidates
                .iter()
                .map(|(e, _)| e.pattern.as_str())
                .collect();
            warn!(
                path = %relative_path,
                patterns = ?patterns,
                "Ambiguous route match; picking the most recent registration"
            );
        }

        candidates.into_iter().max_by_key(|(e, _)| e.seq)
    }

    /// Dispatches a request.
    ///
    /// Sequence: find the best match for `(path, method)`; no match is a
    /// 404; a failed capability check is a 403; otherwise the handler
    /// runs with bound parameters, and a handler error is converted to a
    /// status without escaping to the host.
    pub async fn dispatch(
        &self,
        path_and_query: &str,
        method: Method,
        principal: &Principal,
        ctx: &DispatchContext<'_>,
    ) -> Dispatched {
        self.dispatch_with_body(path_and_query, method, None, principal, ctx)
            .await
    }

    /// Dispatches a request carrying a parsed JSON body.
    pub async fn dispatch_with_body(
        &self,
        path_and_query: &str,
        method: Method,
        body: Option<serde_json::Value>,
        principal: &Principal,
        ctx: &DispatchContext<'_>,
    ) -> Dispatched {
        let (raw_path, raw_query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path_and_query, None),
        };

        let decoded = percent_decode(raw_path);
        let Some(relative) = self.strip_base(&decoded) else {
            return Dispatched::bare(
                StatusCode::NOT_FOUND,
                error_pages::not_found(&decoded, false),
            );
        };
        let relative = relative.trim_matches('/').to_string();
        let api_path = relative == "api" || relative.starts_with("api/");

        let Some((entry, params)) = self.find_match(&relative, &method) else {
            debug!(path = %decoded, method = %method, "No route matched");
            return Dispatched::bare(
                StatusCode::NOT_FOUND,
                error_pages::not_found(&decoded, api_path),
            );
        };

        if let Some(capability) = &entry.capability {
            if !ctx.capabilities.authorize(principal, capability, None) {
                warn!(
                    path = %decoded,
                    capability = %capability,
                    principal = %principal.username,
                    "Capability check failed for route"
                );
                return Dispatched::bare(
                    StatusCode::FORBIDDEN,
                    error_pages::forbidden(principal, entry.is_api()),
                );
            }
        }

        let request = RouteRequest {
            path: relative.clone(),
            method,
            params,
            query: parse_query(raw_query),
            body,
            principal,
            ctx,
        };

        match entry.handler.handle(request).await {
            Ok(output) => Dispatched {
                status: output.status,
                body: output.body,
                wrap_layout: entry.wrap_layout,
                page_title: output.page_title,
                redirect_to: output.redirect_to,
            },
            Err(e) => self.failed(entry, &relative, principal, e, ctx.production),
        }
    }

    /// Converts a handler error into a response without letting it
    /// escape to the host.
    fn failed(
        &self,
        entry: &RouteEntry,
        path: &str,
        principal: &Principal,
        err: quill_core::AppError,
        production: bool,
    ) -> Dispatched {
        let api = entry.is_api();
        match err.kind {
            ErrorKind::Forbidden => {
                Dispatched::bare(StatusCode::FORBIDDEN, error_pages::forbidden(principal, api))
            }
            ErrorKind::NotFound => {
                Dispatched::bare(StatusCode::NOT_FOUND, error_pages::not_found(path, api))
            }
            ErrorKind::Validation => Dispatched::bare(
                StatusCode::BAD_REQUEST,
                error_pages::server_error(Some(&err.message), api),
            ),
            _ => {
                error!(
                    path = %path,
                    addon = %entry.registered_by,
                    error = %err,
                    "Route handler failed"
                );
                let detail = if production {
                    None
                } else {
                    Some(err.message.as_str())
                };
                Dispatched::bare(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_pages::server_error(detail, api),
                )
            }
        }
    }

    /// Strips the admin base prefix, returning the relative remainder,
    /// or `None` when the path lives outside the admin surface.
    fn strip_base<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.base_path.is_empty() {
            return Some(path);
        }
        if path == self.base_path {
            return Some("");
        }
        path.strip_prefix(&self.base_path)
            .filter(|rest| rest.starts_with('/'))
    }
}

fn percent_decode(input: &str) -> String {
    urlencoding::decode(input)
        .unwrap_or(Cow::Borrowed(input))
        .into_owned()
}

/// Parses a query string into decoded key/value pairs.
fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    let Some(raw) = raw else {
        return pairs;
    };
    for piece in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = piece.split_once('=').unwrap_or((piece, ""));
        pairs.insert(percent_decode(key), percent_decode(value));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::routes::entry::{FnHandler, HandlerOutput};
    use quill_core::store::MemoryStore;
    use quill_core::AppError;

    struct Harness {
        capabilities: CapabilityStore,
        events: EventBus,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                capabilities: CapabilityStore::new(),
                events: EventBus::new(),
                store: MemoryStore::new(),
            }
        }

        fn ctx(&self, production: bool) -> DispatchContext<'_> {
            DispatchContext {
                capabilities: &self.capabilities,
                events: &self.events,
                store: &self.store,
                addons: &[],
                production,
            }
        }
    }

    fn echo_handler(tag: &'static str) -> std::sync::Arc<dyn crate::routes::RouteHandler> {
        FnHandler::wrap(move |req| {
            let id = req.param("id").unwrap_or("-").to_string();
            Ok(HandlerOutput::html(format!("{tag}:{id}")))
        })
    }

    fn html_of(dispatched: &Dispatched) -> &str {
        match &dispatched.body {
            ResponseBody::Html(s) => s,
            other => panic!("expected html body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn binds_named_segments_into_params() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register("demo", RouteSpec::get("content/:id/edit", echo_handler("edit")))
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/content/42/edit", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::OK);
        assert_eq!(html_of(&out), "edit:42");
    }

    #[tokio::test]
    async fn unmatched_paths_return_a_rendered_404() {
        let harness = Harness::new();
        let registry = RouteRegistry::new("/admin");
        let admin = Principal::authenticated(1, "root", "administrator");

        let out = registry
            .dispatch("/admin/nothing", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::NOT_FOUND);
        assert!(html_of(&out).contains("404"));

        // Paths outside the admin base never match.
        let out = registry
            .dispatch("/blog/post", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn literal_pattern_beats_dynamic_on_the_same_path() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register("demo", RouteSpec::get("a/:id", echo_handler("dynamic")))
            .unwrap();
        registry
            .register("demo", RouteSpec::get("a/literal", echo_handler("literal")))
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/a/literal", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(html_of(&out), "literal:-");

        let out = registry
            .dispatch("/admin/a/123", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(html_of(&out), "dynamic:123");
    }

    #[tokio::test]
    async fn equally_specific_patterns_go_to_the_latest_registration() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register("first", RouteSpec::get("report/:kind", echo_handler("first")))
            .unwrap();
        registry
            .register("second", RouteSpec::get("report/:name", echo_handler("second")))
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/report/weekly", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert!(html_of(&out).starts_with("second"));
    }

    #[tokio::test]
    async fn capability_gate_returns_403_with_a_body() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register(
                "demo",
                RouteSpec::get("settings", echo_handler("settings")).capability("manage_settings"),
            )
            .unwrap();

        let subscriber = Principal::authenticated(9, "sam", "subscriber");
        let out = registry
            .dispatch("/admin/settings", Method::GET, &subscriber, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::FORBIDDEN);
        assert!(html_of(&out).contains("403"));

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/settings", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn method_mismatch_is_not_found() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register("demo", RouteSpec::post("api/contact", echo_handler("contact")).bare())
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/api/contact", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::NOT_FOUND);
        // API paths get the JSON envelope, not an HTML page.
        assert!(matches!(out.body, ResponseBody::Json(_)));
    }

    #[tokio::test]
    async fn handler_errors_become_statuses_without_leaking_in_production() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register(
                "demo",
                RouteSpec::get(
                    "broken",
                    FnHandler::wrap(|_| Err(AppError::internal("database password is hunter2"))),
                ),
            )
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");

        let out = registry
            .dispatch("/admin/broken", Method::GET, &admin, &harness.ctx(true))
            .await;
        assert_eq!(out.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!html_of(&out).contains("hunter2"));

        let out = registry
            .dispatch("/admin/broken", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert!(html_of(&out).contains("hunter2"));
    }

    #[tokio::test]
    async fn handler_forbidden_and_not_found_map_to_their_statuses() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register(
                "demo",
                RouteSpec::get("gone", FnHandler::wrap(|_| Err(AppError::not_found("record")))),
            )
            .unwrap();
        registry
            .register(
                "demo",
                RouteSpec::get("mine", FnHandler::wrap(|_| Err(AppError::forbidden("not yours")))),
            )
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/gone", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::NOT_FOUND);
        let out = registry
            .dispatch("/admin/mine", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn conflicting_registration_from_another_addon_wins() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register("first", RouteSpec::get("tools", echo_handler("first")))
            .unwrap();
        registry
            .register("second", RouteSpec::get("tools", echo_handler("second")))
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/tools", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert!(html_of(&out).starts_with("second"));
        // The superseded pair is gone entirely.
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn unregister_by_reverts_dispatch_to_404() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register("a", RouteSpec::get("a-page", echo_handler("a")))
            .unwrap();
        registry
            .register("b", RouteSpec::get("b-page", echo_handler("b")))
            .unwrap();

        assert_eq!(registry.unregister_by("a"), 1);
        assert_eq!(registry.unregister_by("a"), 0);
        assert_eq!(registry.unregister_by("unknown"), 0);

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch("/admin/a-page", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::NOT_FOUND);
        let out = registry
            .dispatch("/admin/b-page", Method::GET, &admin, &harness.ctx(false))
            .await;
        assert_eq!(out.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn query_string_is_parsed_and_decoded() {
        let harness = Harness::new();
        let mut registry = RouteRegistry::new("/admin");
        registry
            .register(
                "demo",
                RouteSpec::get(
                    "search",
                    FnHandler::wrap(|req| {
                        Ok(HandlerOutput::html(format!(
                            "q={} id={}",
                            req.query_value("q").unwrap_or(""),
                            req.query_i64("id").unwrap_or(0)
                        )))
                    }),
                ),
            )
            .unwrap();

        let admin = Principal::authenticated(1, "root", "administrator");
        let out = registry
            .dispatch(
                "/admin/search?q=hello%20world&id=7",
                Method::GET,
                &admin,
                &harness.ctx(false),
            )
            .await;
        assert_eq!(html_of(&out), "q=hello world id=7");
    }
}
