//! Admin renderer — view rendering and layout wrapping.

use minijinja::Environment;
use tracing::{error, warn};

use crate::resolver::ViewResolver;

/// Placeholder token in the layout template that the rendered view
/// content is spliced over.
pub const CONTENT_PLACEHOLDER: &str = "<!-- quill:content -->";

/// Logical name of the theme layout template.
pub const LAYOUT_VIEW: &str = "admin-layout";

/// Renders admin views through the theme's templates.
///
/// Rendering never propagates template failures to the caller: a missing
/// or failing view degrades to an inline error fragment so the rest of
/// the page still renders, and a missing layout degrades to a minimal
/// HTML shell around the content.
pub struct AdminRenderer {
    resolver: ViewResolver,
    env: Environment<'static>,
}

impl AdminRenderer {
    /// Creates a renderer over the given resolver.
    pub fn new(resolver: ViewResolver) -> Self {
        let mut env = Environment::new();
        let loader_resolver = resolver.clone();
        env.set_loader(move |name| match loader_resolver.resolve(name) {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(source) => Ok(Some(source)),
                Err(e) => Err(minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("Could not read template '{}': {e}", path.display()),
                )),
            },
            Err(_) => Ok(None),
        });

        Self { resolver, env }
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &ViewResolver {
        &self.resolver
    }

    /// Renders a view with data.
    ///
    /// A view that cannot be resolved or fails mid-render yields a
    /// visible error fragment instead of an error.
    pub fn render(&self, view: &str, data: &serde_json::Value) -> String {
        let template = match self.env.get_template(view) {
            Ok(template) => template,
            Err(e) => {
                warn!(view = %view, error = %e, "View could not be resolved");
                return error_fragment(&format!("View not found: {view}"));
            }
        };

        match template.render(data) {
            Ok(html) => html,
            Err(e) => {
                error!(view = %view, error = %e, "View failed while rendering");
                error_fragment(&format!("Rendering error in view '{view}'"))
            }
        }
    }

    /// Renders a complete admin page: the view first, then the layout,
    /// splicing the view output over the layout's content placeholder.
    ///
    /// The two-phase render keeps page data and chrome data separate —
    /// the layout sees `layout_data` (page title, current page, user)
    /// without the view needing to know about it.
    pub fn render_page(
        &self,
        view: &str,
        data: &serde_json::Value,
        layout_data: &serde_json::Value,
    ) -> String {
        let content = self.render(view, data);
        self.wrap(&content, layout_data)
    }

    /// Wraps already-rendered content in the theme layout.
    ///
    /// Used directly by the host for route handlers that produce their
    /// own HTML fragments.
    pub fn wrap(&self, content: &str, layout_data: &serde_json::Value) -> String {
        let layout = match self.env.get_template(LAYOUT_VIEW) {
            Ok(template) => template,
            Err(e) => {
                error!(error = %e, "Admin layout template is missing");
                return minimal_shell(layout_data, content);
            }
        };

        match layout.render(layout_data) {
            Ok(shell) if shell.contains(CONTENT_PLACEHOLDER) => {
                shell.replace(CONTENT_PLACEHOLDER, content)
            }
            Ok(shell) => {
                warn!("Admin layout is missing the content placeholder; appending content");
                format!("{shell}\n{content}")
            }
            Err(e) => {
                error!(error = %e, "Admin layout failed while rendering");
                minimal_shell(layout_data, content)
            }
        }
    }
}

/// Inline fragment shown in place of a view that could not render.
fn error_fragment(message: &str) -> String {
    format!(
        "<div class=\"render-error\">\n  <strong>Rendering error</strong>\n  <p>{message}</p>\n</div>"
    )
}

/// Bare-bones page used when the layout itself is unavailable: legible,
/// never blank.
fn minimal_shell(layout_data: &serde_json::Value, content: &str) -> String {
    let title = layout_data
        .get("page_title")
        .and_then(|v| v.as_str())
        .unwrap_or("Admin");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n{content}\n</body>\n</html>"
    )
}
