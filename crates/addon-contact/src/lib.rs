//! Contact form addon — a JSON intake endpoint for visitor messages and
//! an admin page for reviewing them.

mod intake;

use std::sync::Arc;

use quill_addon_sdk::prelude::*;

use crate::intake::IntakeHandler;

/// Event fired after a contact message passes validation. Listeners
/// receive `name`, `email`, and `message` in the context.
pub const CONTACT_MESSAGE_RECEIVED: &str = "contact_message_received";

/// The contact form addon.
pub struct ContactAddon;

impl Addon for ContactAddon {
    fn manifest(&self) -> AddonManifest {
        AddonManifest::new("contact", "Contact Form")
            .version("1.2.0")
            .description("Visitor contact form with an admin review page")
            .author("Quill CMS Team")
    }

    fn register(&self, ctx: &mut RegistrationContext<'_>) -> Result<(), AppError> {
        ctx.menu(
            MenuSpec::new("contact-messages", "Messages")
                .icon("mail")
                .capability(caps::MODERATE_COMMENTS)
                .weight(40),
        );

        ctx.route(
            RouteSpec::get("contact-messages", FnHandler::wrap(messages_page))
                .capability(caps::MODERATE_COMMENTS),
        )?;
        ctx.route(RouteSpec::post("api/contact", Arc::new(IntakeHandler)).bare())?;

        ctx.on(
            names::ADMIN_FOOTER,
            FnListener::wrap(|event| {
                event.append_str("html", "<!-- contact form 1.2.0 -->");
                Ok(())
            }),
        );

        Ok(())
    }
}

/// The admin review page body.
fn messages_page(_req: &RouteRequest<'_>) -> Result<HandlerOutput, AppError> {
    let body = "<h1>Contact Messages</h1>\n\
                <p class=\"empty-state\">Messages arrive through the site contact form. \
                Incoming messages are announced on the <code>contact_message_received</code> \
                event for addons that store or forward them.</p>";
    Ok(HandlerOutput::html(body).with_title("Contact Messages"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_addon::{EventBus, MenuRegistry, RouteRegistry};

    #[test]
    fn registers_routes_menu_and_listener() {
        let mut events = EventBus::new();
        let mut routes = RouteRegistry::new("/admin");
        let mut menus = MenuRegistry::new("/admin");
        let mut ctx = RegistrationContext::new("contact", &mut events, &mut routes, &mut menus);

        ContactAddon.register(&mut ctx).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(menus.len(), 1);
        assert!(events.has_listeners(names::ADMIN_FOOTER));
    }
}
