//! Shared harness for the integration tests: an in-memory store seeded
//! with demo users and content, the bundled addons installed, and a
//! dispatch helper that assembles the per-request context.

use std::sync::Arc;

use http::Method;

use addon_contact::ContactAddon;
use addon_seo::SeoAddon;
use quill_addon::{AddonHost, DispatchContext, Dispatched, Registries};
use quill_auth::CapabilityStore;
use quill_cms::system::SystemAddon;
use quill_core::store::{ContentStore, MemoryStore};
use quill_core::types::{ContentRecord, ContentStatus, Principal, UserRecord};

pub struct TestApp {
    pub store: MemoryStore,
    pub capabilities: CapabilityStore,
    pub host: AddonHost,
}

impl TestApp {
    /// A fully installed app over a freshly seeded store.
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        seed(&store).await;

        let mut host = AddonHost::new("/admin");
        host.install(Arc::new(SystemAddon));
        host.install(Arc::new(ContactAddon));
        host.install(Arc::new(SeoAddon));

        Self {
            store,
            capabilities: CapabilityStore::new(),
            host,
        }
    }

    /// Builds the per-request registries, as the server does at the
    /// start of each request.
    pub async fn load(&self) -> Registries {
        self.host.load_enabled(&self.store).await
    }

    /// The principal for a seeded username; anonymous when unknown.
    pub async fn principal(&self, username: &str) -> Principal {
        match self.store.user_by_username(username).await.unwrap() {
            Some(user) => Principal::authenticated(user.id, user.username, user.role),
            None => Principal::anonymous(),
        }
    }

    /// Dispatches a GET request.
    pub async fn get(
        &self,
        registries: &Registries,
        principal: &Principal,
        path: &str,
    ) -> Dispatched {
        self.dispatch(registries, principal, Method::GET, path, None)
            .await
    }

    /// Dispatches a POST request with a JSON body.
    pub async fn post_json(
        &self,
        registries: &Registries,
        principal: &Principal,
        path: &str,
        body: serde_json::Value,
    ) -> Dispatched {
        self.dispatch(registries, principal, Method::POST, path, Some(body))
            .await
    }

    pub async fn dispatch(
        &self,
        registries: &Registries,
        principal: &Principal,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Dispatched {
        let ctx = DispatchContext {
            capabilities: &self.capabilities,
            events: &registries.events,
            store: &self.store,
            addons: registries.manifests(),
            production: false,
        };
        registries
            .routes
            .dispatch_with_body(path, method, body, principal, &ctx)
            .await
    }
}

async fn seed(store: &MemoryStore) {
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
        store.upsert_content(record).await.unwrap();
    }
}

/// Unwraps an HTML body.
#[allow(dead_code)]
pub fn html(dispatched: &Dispatched) -> &str {
    match &dispatched.body {
        quill_addon::ResponseBody::Html(s) => s,
        other => panic!("expected an HTML body, got {other:?}"),
    }
}

/// Unwraps a JSON body.
#[allow(dead_code)]
pub fn json(dispatched: &Dispatched) -> &serde_json::Value {
    match &dispatched.body {
        quill_addon::ResponseBody::Json(v) => v,
        other => panic!("expected a JSON body, got {other:?}"),
    }
}
