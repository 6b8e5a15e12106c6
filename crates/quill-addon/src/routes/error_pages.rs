//! Fallback bodies for 403/404/500 outcomes.
//!
//! Dispatch never answers with a bare status code: page routes get a
//! small self-contained HTML document, API routes get the standard JSON
//! envelope.

use quill_core::types::{ApiResponse, Principal};

use super::entry::ResponseBody;

/// Wraps a title and message in the minimal standalone error document.
fn error_document(title: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>body{{font-family:sans-serif;background:#f8f8f8;display:flex;\
         align-items:center;justify-content:center;min-height:100vh;margin:0}}\
         .panel{{text-align:center;max-width:28rem;padding:2rem}}\
         h1{{color:#1a1a1a;margin-bottom:.5rem}}p{{color:#555}}</style>\n\
         </head>\n<body>\n<div class=\"panel\">\n<h1>{title}</h1>\n<p>{message}</p>\n\
         <p><a href=\"/\">Go home</a></p>\n</div>\n</body>\n</html>"
    )
}

/// Body for an unmatched path.
pub fn not_found(path: &str, api: bool) -> ResponseBody {
    if api {
        ResponseBody::Json(ApiResponse::err(format!("No route matches '{path}'")).to_value())
    } else {
        ResponseBody::Html(error_document(
            "404 Not Found",
            "The page you requested does not exist.",
        ))
    }
}

/// Body for a failed capability or ownership check.
pub fn forbidden(principal: &Principal, api: bool) -> ResponseBody {
    if api {
        ResponseBody::Json(
            ApiResponse::err("Permission denied. You do not have access to this feature.")
                .to_value(),
        )
    } else {
        let role = principal.role.as_deref().unwrap_or("none");
        ResponseBody::Html(error_document(
            "403 Forbidden",
            &format!(
                "You don't have permission to access this area. Your role: <strong>{role}</strong>"
            ),
        ))
    }
}

/// Body for a handler failure. `detail` is only shown outside production.
pub fn server_error(detail: Option<&str>, api: bool) -> ResponseBody {
    let message = detail.unwrap_or("An internal error occurred.");
    if api {
        ResponseBody::Json(ApiResponse::err(message).to_value())
    } else {
        ResponseBody::Html(error_document("500 Server Error", message))
    }
}
