//! Quill CMS Server
//!
//! Main entry point: loads configuration, seeds the demo store, installs
//! the bundled addons, and serves the admin surface. Registries are
//! rebuilt per request, so addon enable/disable takes effect on the next
//! request without a restart.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, header};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use quill_addon::events::names;
use quill_addon::{AddonHost, DispatchContext, Dispatched, EventContext, Registries, ResponseBody};
use quill_auth::CapabilityStore;
use quill_core::AppError;
use quill_core::config::AppConfig;
use quill_core::store::{ContentStore, MemoryStore, OPTION_ADMIN_THEME};
use quill_core::types::{ContentRecord, ContentStatus, Principal, UserRecord};
use quill_render::{AdminRenderer, ViewResolver};

use quill_cms::system::SystemAddon;

/// Header the demo host reads the acting user from. A real deployment
/// replaces this edge with its session or token layer.
const USER_HEADER: &str = "x-quill-user";

const MAX_BODY_BYTES: usize = 1024 * 1024;

struct AppState {
    config: AppConfig,
    store: Arc<MemoryStore>,
    capabilities: CapabilityStore,
    host: AddonHost,
}

#[tokio::main]
async fn main() {
    let env = std::env::var("QUILL_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Quill CMS v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(MemoryStore::new());
    seed_demo_data(store.as_ref()).await?;

    let mut host = AddonHost::new(&config.admin.base_path);
    host.install(Arc::new(SystemAddon));
    host.install(Arc::new(addon_contact::ContactAddon));
    host.install(Arc::new(addon_seo::SeoAddon));
    tracing::info!(addons = ?host.installed_keys(), "Addons installed");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState {
        config,
        store,
        capabilities: CapabilityStore::new(),
        host,
    });

    let app = axum::Router::new()
        .fallback(handle_request)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Could not bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {e}")))?;

    Ok(())
}

/// Catch-all request handler: source the principal at the edge, rebuild
/// the registries, dispatch, and wrap layout-bound HTML output.
async fn handle_request(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let principal = principal_from_headers(&state, &parts.headers).await;
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());
    let json_body = read_json_body(body).await;

    let registries = state.host.load_enabled(state.store.as_ref()).await;
    let ctx = DispatchContext {
        capabilities: &state.capabilities,
        events: &registries.events,
        store: state.store.as_ref(),
        addons: registries.manifests(),
        production: state.config.production,
    };

    let dispatched = registries
        .routes
        .dispatch_with_body(&path_and_query, parts.method, json_body, &principal, &ctx)
        .await;

    respond(&state, &registries, &principal, &path_and_query, dispatched).await
}

/// Resolve the acting user once, at the edge.
async fn principal_from_headers(state: &AppState, headers: &HeaderMap) -> Principal {
    let Some(username) = headers.get(USER_HEADER).and_then(|v| v.to_str().ok()) else {
        return Principal::anonymous();
    };
    match state.store.user_by_username(username).await {
        Ok(Some(user)) => Principal::authenticated(user.id, user.username, user.role),
        Ok(None) => Principal::anonymous(),
        Err(e) => {
            tracing::warn!(error = %e, "User lookup failed; treating request as anonymous");
            Principal::anonymous()
        }
    }
}

async fn read_json_body(body: Body) -> Option<serde_json::Value> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await.ok()?;
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(&bytes).ok()
}

/// Convert a dispatch outcome into an HTTP response, wrapping HTML
/// bodies in the admin layout where the route asked for it.
async fn respond(
    state: &AppState,
    registries: &Registries,
    principal: &Principal,
    path: &str,
    dispatched: Dispatched,
) -> Response {
    if let Some(location) = dispatched.redirect_to {
        return (dispatched.status, [(header::LOCATION, location)]).into_response();
    }

    match dispatched.body {
        ResponseBody::Json(value) => (dispatched.status, axum::Json(value)).into_response(),
        ResponseBody::Empty => dispatched.status.into_response(),
        ResponseBody::Html(content) => {
            let html = if dispatched.wrap_layout {
                wrap_in_layout(state, registries, principal, path, &content, dispatched.page_title)
                    .await
            } else {
                content
            };
            (
                dispatched.status,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                html,
            )
                .into_response()
        }
    }
}

/// Render the admin chrome around a page fragment: theme layout, menu
/// tree, and the markup contributed by `admin_head` / `admin_footer`
/// listeners.
async fn wrap_in_layout(
    state: &AppState,
    registries: &Registries,
    principal: &Principal,
    path: &str,
    content: &str,
    page_title: Option<String>,
) -> String {
    let theme = match state.store.option_value(OPTION_ADMIN_THEME).await {
        Ok(Some(theme)) => theme,
        _ => state.config.admin.theme.clone(),
    };
    let renderer = AdminRenderer::new(ViewResolver::new(&state.config.themes.directory, &theme));

    let mut head = EventContext::new();
    registries.events.trigger(names::ADMIN_HEAD, &mut head).await;
    let mut footer = EventContext::new();
    registries.events.trigger(names::ADMIN_FOOTER, &mut footer).await;

    let menu = registries
        .menus
        .visible_tree(principal, &state.capabilities, path);

    let layout_data = serde_json::json!({
        "site_name": state.config.site.name,
        "page_title": page_title.unwrap_or_else(|| state.config.site.name.clone()),
        "current_page": path,
        "user": {
            "username": principal.username,
            "role": principal.role,
            "authenticated": principal.is_authenticated(),
        },
        "menu": menu,
        "head_html": head.get_str("html").unwrap_or(""),
        "footer_html": footer.get_str("html").unwrap_or(""),
    });

    renderer.wrap(content, &layout_data)
}

/// Demo users and content for the in-memory store.
async fn seed_demo_data(store: &MemoryStore) -> Result<(), AppError> {
    for user in [
        UserRecord {
            id: 1,
            username: "admin".to_string(),
            role: "administrator".to_string(),
        },
        UserRecord {
            id: 2,
            username: "vera".to_string(),
            role: "editor".to_string(),
        },
        UserRecord {
            id: 3,
            username: "ana".to_string(),
            role: "author".to_string(),
        },
    ] {
        store.insert_user(user).await;
    }

    for record in [
        ContentRecord {
            id: 1,
            author_id: 3,
            title: "Welcome to Quill".to_string(),
            status: ContentStatus::Published,
        },
        ContentRecord {
            id: 7,
            author_id: 2,
            title: "Editorial Guidelines".to_string(),
            status: ContentStatus::Draft,
        },
    ] {
        store.upsert_content(record).await?;
    }

    Ok(())
}
