//! The built-in system addon.
//!
//! Core admin behavior — dashboard, content editing, the addon manager —
//! registered through the same addon interface third-party addons use.
//! It loads first (priority 0) and the toggle API refuses to disable it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use quill_addon::addon::{Addon, AddonManifest, RegistrationContext};
use quill_addon::events::names;
use quill_addon::routes::{FnHandler, HandlerOutput, RouteHandler, RouteRequest, RouteSpec};
use quill_addon::{EventContext, MenuSpec};
use quill_auth::caps;
use quill_core::store::{OPTION_ACTIVE_ADDONS, OPTION_ADMIN_THEME};
use quill_core::types::ApiResponse;
use quill_core::AppError;

/// Key of the system addon; the toggle API treats it as protected.
pub const SYSTEM_ADDON_KEY: &str = "system";

/// The system addon.
pub struct SystemAddon;

impl Addon for SystemAddon {
    fn manifest(&self) -> AddonManifest {
        AddonManifest::new(SYSTEM_ADDON_KEY, "System")
            .version(env!("CARGO_PKG_VERSION"))
            .description("Core admin pages and the addon manager")
            .author("Quill CMS Team")
            .priority(0)
    }

    fn register(&self, ctx: &mut RegistrationContext<'_>) -> Result<(), AppError> {
        // Pages
        ctx.route(
            RouteSpec::get("", FnHandler::wrap(dashboard)).capability(caps::VIEW_DASHBOARD),
        )?;
        ctx.route(
            RouteSpec::get("dashboard", FnHandler::wrap(dashboard))
                .capability(caps::VIEW_DASHBOARD),
        )?;
        ctx.route(
            RouteSpec::get("content", FnHandler::wrap(content_list))
                .capability(caps::EDIT_CONTENT),
        )?;
        ctx.route(
            RouteSpec::get("content/edit", Arc::new(ContentEditHandler))
                .capability(caps::EDIT_CONTENT),
        )?;
        ctx.route(
            RouteSpec::get("users", FnHandler::wrap(users_page)).capability(caps::MANAGE_USERS),
        )?;
        ctx.route(
            RouteSpec::get("themes", Arc::new(ThemesPageHandler))
                .capability(caps::MANAGE_THEMES),
        )?;
        ctx.route(
            RouteSpec::get("settings", FnHandler::wrap(settings_page))
                .capability(caps::MANAGE_SETTINGS),
        )?;
        ctx.route(
            RouteSpec::get("addons", FnHandler::wrap(addons_page))
                .capability(caps::MANAGE_ADDONS),
        )?;

        // APIs
        ctx.route(
            RouteSpec::post("api/content/:id/save", Arc::new(ContentSaveHandler))
                .capability(caps::EDIT_CONTENT)
                .bare(),
        )?;
        ctx.route(
            RouteSpec::post("api/addons/:key/toggle", Arc::new(AddonToggleHandler))
                .capability(caps::MANAGE_ADDONS)
                .bare(),
        )?;

        // Navigation
        ctx.menu(MenuSpec::new("dashboard", "Dashboard").icon("dashboard").weight(0));
        ctx.menu(MenuSpec::new("content", "Content").icon("article").weight(10));
        ctx.menu(
            MenuSpec::new("users", "Users")
                .icon("group")
                .capability(caps::MANAGE_USERS)
                .weight(60),
        );
        ctx.menu(
            MenuSpec::new("addons", "Addons")
                .icon("extension")
                .capability(caps::MANAGE_ADDONS)
                .weight(70),
        );
        ctx.menu(
            MenuSpec::new("themes", "Themes")
                .icon("palette")
                .capability(caps::MANAGE_THEMES)
                .weight(75),
        );
        ctx.menu(
            MenuSpec::new("settings", "Settings")
                .icon("settings")
                .capability(caps::MANAGE_SETTINGS)
                .weight(90),
        );

        Ok(())
    }
}

fn dashboard(req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    let body = format!(
        "<h1>Dashboard</h1>\n<p>Signed in as <strong>{}</strong>.</p>\n\
         <p>Use the navigation to manage content, addons, and themes.</p>",
        req.principal.username
    );
    Ok(HandlerOutput::html(body).with_title("Dashboard"))
}

fn content_list(_req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    let body = "<h1>Content</h1>\n\
                <p>Open a record with <code>content/edit?id=&lt;id&gt;</code>. \
                Records you do not own require the broader edit capability.</p>";
    Ok(HandlerOutput::html(body).with_title("Content"))
}

fn users_page(_req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    Ok(HandlerOutput::html("<h1>Users</h1>\n<p>User accounts and their roles.</p>")
        .with_title("Users"))
}

fn settings_page(_req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    Ok(HandlerOutput::html("<h1>Settings</h1>\n<p>Site configuration.</p>")
        .with_title("Settings"))
}

/// Renders the addon manager from the manifests of the current load.
fn addons_page(req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    let mut rows = String::new();
    for manifest in req.ctx.addons {
        let state = if manifest.enabled { "enabled" } else { "disabled" };
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            manifest.name, manifest.version, manifest.author, state
        ));
    }
    let body = format!(
        "<h1>Addons</h1>\n<table>\n<tr><th>Name</th><th>Version</th>\
         <th>Author</th><th>Status</th></tr>\n{rows}</table>"
    );
    Ok(HandlerOutput::html(body).with_title("Addons"))
}

/// Handles `GET content/edit?id=N`.
///
/// The route gate only checks `edit_content`; editing a specific record
/// someone else authored additionally needs `edit_others_content` or
/// ownership, checked here with the record in hand.
struct ContentEditHandler;

#[async_trait]
impl RouteHandler for ContentEditHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        let id = req
            .query_i64("id")
            .ok_or_else(|| AppError::validation("The 'id' query parameter is required"))?;

        let record = req
            .ctx
            .store
            .content(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content {id} does not exist")))?;

        if !req
            .ctx
            .capabilities
            .authorize(req.principal, caps::EDIT_OTHERS_CONTENT, Some(&record))
        {
            return Err(AppError::forbidden(format!(
                "You cannot edit content {id}: it belongs to another author"
            )));
        }

        let body = format!(
            "<h1>Edit: {title}</h1>\n\
             <form method=\"post\" data-save-url=\"api/content/{id}/save\">\n\
             <label>Title <input name=\"title\" value=\"{title}\"></label>\n\
             <button type=\"submit\">Save</button>\n</form>",
            title = record.title,
            id = record.id,
        );
        Ok(HandlerOutput::html(body).with_title(format!("Edit: {}", record.title)))
    }
}

/// Handles `POST api/content/:id/save`.
struct ContentSaveHandler;

#[async_trait]
impl RouteHandler for ContentSaveHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        let id = req
            .param_i64("id")
            .ok_or_else(|| AppError::validation("'id' must be numeric"))?;
        let title = req
            .body
            .as_ref()
            .and_then(|b| b.get("title"))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("'title' is required"))?;

        let mut record = req
            .ctx
            .store
            .content(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content {id} does not exist")))?;

        if !req
            .ctx
            .capabilities
            .authorize(req.principal, caps::EDIT_OTHERS_CONTENT, Some(&record))
        {
            return Err(AppError::forbidden(format!(
                "You cannot edit content {id}: it belongs to another author"
            )));
        }

        record.title = title.to_string();
        req.ctx.store.upsert_content(record).await?;

        let mut event = EventContext::new()
            .with_actor(req.principal.id)
            .with_int("content_id", id)
            .with_str("title", title);
        req.ctx.events.trigger(names::CONTENT_SAVED, &mut event).await;

        Ok(HandlerOutput::json(
            ApiResponse::ok(json!({ "id": id, "title": title })).to_value(),
        ))
    }
}

/// Handles `POST api/addons/:key/toggle`.
///
/// Only flips the stored `active_addons` option; the next registry load
/// reflects the change. The system addon itself cannot be toggled.
struct AddonToggleHandler;

#[async_trait]
impl RouteHandler for AddonToggleHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        let key = req
            .param("key")
            .ok_or_else(|| AppError::validation("'key' is required"))?;

        if key == SYSTEM_ADDON_KEY {
            return Err(AppError::validation(
                "The system addon is required and cannot be toggled",
            ));
        }
        if !req.ctx.addons.iter().any(|m| m.key == key) {
            return Err(AppError::not_found(format!("Addon '{key}' is not installed")));
        }

        // Base the update on the stored list, or on the current load
        // when no list has been stored yet.
        let stored = req.ctx.store.option_value(OPTION_ACTIVE_ADDONS).await?;
        let mut enabled: Vec<String> = match stored
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        {
            Some(keys) => keys,
            None => req
                .ctx
                .addons
                .iter()
                .filter(|m| m.enabled)
                .map(|m| m.key.clone())
                .collect(),
        };

        let now_enabled = if enabled.iter().any(|k| k == key) {
            enabled.retain(|k| k != key);
            false
        } else {
            enabled.push(key.to_string());
            true
        };

        let value = serde_json::to_string(&enabled)?;
        req.ctx.store.set_option(OPTION_ACTIVE_ADDONS, &value).await?;

        Ok(HandlerOutput::json(
            ApiResponse::ok(json!({ "addon": key, "enabled": now_enabled })).to_value(),
        ))
    }
}

/// Handles `GET themes`.
struct ThemesPageHandler;

#[async_trait]
impl RouteHandler for ThemesPageHandler {
    async fn handle(&self, req: RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
        let active = req
            .ctx
            .store
            .option_value(OPTION_ADMIN_THEME)
            .await?
            .unwrap_or_else(|| "admin-default".to_string());
        let body = format!(
            "<h1>Themes</h1>\n<p>Active admin theme: <strong>{active}</strong></p>"
        );
        Ok(HandlerOutput::html(body).with_title("Themes"))
    }
}
