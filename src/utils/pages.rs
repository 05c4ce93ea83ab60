use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Tera};

pub fn render_template(templates: &Tera, name: &str, ctx: &Context) -> Response {
    match templates.render(name, ctx) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("template {} failed to render: {}", name, e);
            error_page(templates, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Renders the status-code-named error template. Codes without a template of
/// their own fall back to 500.
pub fn error_page(templates: &Tera, status: StatusCode) -> Response {
    let status = match status.as_u16() {
        401 | 404 | 500 => status,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let name = format!("{}.html.tera", status.as_u16());
    match templates.render(&name, &Context::new()) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("error template {} failed to render: {}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
