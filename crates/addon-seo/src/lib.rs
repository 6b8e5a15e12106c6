//! SEO addon — meta tag injection into the admin head, an SEO settings
//! page, and a JSON preview endpoint for content records.

mod preview;

use std::sync::Arc;

use quill_addon_sdk::prelude::*;

use crate::preview::PreviewHandler;

/// The SEO addon.
pub struct SeoAddon;

impl Addon for SeoAddon {
    fn manifest(&self) -> AddonManifest {
        AddonManifest::new("seo", "SEO Toolkit")
            .version("2.0.1")
            .description("Meta tags, sitemaps, and search previews")
            .author("Quill CMS Team")
            .priority(60)
    }

    fn register(&self, ctx: &mut RegistrationContext<'_>) -> Result<(), AppError> {
        ctx.menu(
            MenuSpec::new("seo", "SEO")
                .icon("travel_explore")
                .capability(caps::MANAGE_SETTINGS)
                .weight(80),
        );
        ctx.submenu(
            "seo",
            MenuSpec::new("seo-sitemap", "Sitemap").capability(caps::MANAGE_SETTINGS),
        );

        ctx.route(
            RouteSpec::get("seo", FnHandler::wrap(settings_page))
                .capability(caps::MANAGE_SETTINGS),
        )?;
        ctx.route(
            RouteSpec::get("api/seo/preview/:id", Arc::new(PreviewHandler))
                .capability(caps::EDIT_CONTENT)
                .bare(),
        )?;

        // Early priority so other addons can extend what the tags emit.
        ctx.on_with_priority(
            names::ADMIN_HEAD,
            5,
            FnListener::wrap(|event| {
                event.append_str(
                    "html",
                    "<meta name=\"generator\" content=\"Quill CMS SEO Toolkit\">",
                );
                Ok(())
            }),
        );

        Ok(())
    }
}

/// The SEO settings page body.
fn settings_page(_req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    let body = "<h1>SEO Settings</h1>\n\
                <p>Configure meta tags and sitemap generation. Search previews for \
                individual records are available from the content editor.</p>";
    Ok(HandlerOutput::html(body).with_title("SEO Settings"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_addon::{EventBus, EventContext, MenuRegistry, RouteRegistry};

    #[test]
    fn registers_menu_tree_routes_and_head_listener() {
        let mut events = EventBus::new();
        let mut routes = RouteRegistry::new("/admin");
        let mut menus = MenuRegistry::new("/admin");
        let mut ctx = RegistrationContext::new("seo", &mut events, &mut routes, &mut menus);

        SeoAddon.register(&mut ctx).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(menus.len(), 2);
        assert!(events.has_listeners(names::ADMIN_HEAD));
    }

    #[tokio::test]
    async fn head_listener_contributes_the_generator_tag() {
        let mut events = EventBus::new();
        let mut routes = RouteRegistry::new("/admin");
        let mut menus = MenuRegistry::new("/admin");
        let mut ctx = RegistrationContext::new("seo", &mut events, &mut routes, &mut menus);
        SeoAddon.register(&mut ctx).unwrap();

        let mut event = EventContext::new();
        events.trigger(names::ADMIN_HEAD, &mut event).await;
        assert!(event.get_str("html").unwrap().contains("generator"));
    }
}
