//! JSON intake endpoint for visitor contact messages.

use async_trait::async_trait;
use tracing::info;

use quill_addon_sdk::prelude::*;

use crate::CONTACT_MESSAGE_RECEIVED;

/// Handles `POST api/contact`.
///
/// Validates the submission, announces it on the
/// [`CONTACT_MESSAGE_RECEIVED`] event, and answers with the standard
/// JSON envelope. Persistence is left to event listeners.
pub struct IntakeHandler;

#[async_trait]
impl RouteHandler for IntakeHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        let body = req
            .body
            .as_ref()
            .ok_or_else(|| AppError::validation("Expected a JSON body"))?;

        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("'message' is required"))?;
        let name = body
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("anonymous");
        let email = body.get("email").and_then(|v| v.as_str()).unwrap_or("");

        let mut event = EventContext::new()
            .with_str("name", name)
            .with_str("email", email)
            .with_str("message", message);
        if req.principal.is_authenticated() {
            event = event.with_actor(req.principal.id);
        }
        req.ctx.events.trigger(CONTACT_MESSAGE_RECEIVED, &mut event).await;

        info!(name = %name, "Contact message received");

        Ok(HandlerOutput::json(
            ApiResponse::ok(serde_json::json!({ "received": true })).to_value(),
        ))
    }
}
