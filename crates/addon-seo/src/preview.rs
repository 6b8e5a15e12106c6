//! Search preview endpoint for content records.

use async_trait::async_trait;

use quill_addon_sdk::prelude::*;

/// Handles `GET api/seo/preview/:id`.
///
/// Reads the record from the content store and answers with the meta
/// title and description a search engine would see.
pub struct PreviewHandler;

#[async_trait]
impl RouteHandler for PreviewHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        let id = req
            .param_i64("id")
            .ok_or_else(|| AppError::validation("'id' must be numeric"))?;

        let record = req
            .ctx
            .store
            .content(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content {id} does not exist")))?;

        let description = format!("{} — published on this site", record.title);
        Ok(HandlerOutput::json(
            ApiResponse::ok(serde_json::json!({
                "id": record.id,
                "meta_title": record.title,
                "meta_description": description,
            }))
            .to_value(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use quill_addon::{AddonHost, DispatchContext, ResponseBody};
    use quill_auth::CapabilityStore;
    use quill_core::store::{ContentStore, MemoryStore};
    use quill_core::types::{ContentRecord, ContentStatus};
    use std::sync::Arc;

    #[tokio::test]
    async fn preview_reads_the_store_and_binds_the_id_param() {
        let store = MemoryStore::new();
        store
            .upsert_content(ContentRecord {
                id: 7,
                author_id: 1,
                title: "Launch Notes".to_string(),
                status: ContentStatus::Published,
            })
            .await
            .unwrap();

        let mut host = AddonHost::new("/admin");
        host.install(Arc::new(crate::SeoAddon));
        let registries = host.load_enabled(&store).await;

        let capabilities = CapabilityStore::new();
        let ctx = DispatchContext {
            capabilities: &capabilities,
            events: &registries.events,
            store: &store,
            addons: registries.manifests(),
            production: false,
        };
        let editor = Principal::authenticated(3, "vera", "editor");

        let out = registries
            .routes
            .dispatch("/admin/api/seo/preview/7", Method::GET, &editor, &ctx)
            .await;
        assert_eq!(out.status, StatusCode::OK);
        let ResponseBody::Json(value) = out.body else {
            panic!("expected json");
        };
        assert_eq!(value["data"]["meta_title"], "Launch Notes");

        // Unknown record ids surface as an API 404 envelope.
        let out = registries
            .routes
            .dispatch("/admin/api/seo/preview/99", Method::GET, &editor, &ctx)
            .await;
        assert_eq!(out.status, StatusCode::NOT_FOUND);
    }
}
