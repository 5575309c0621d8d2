//! Status page handler.
//!
//! Opens a status viewer on the configured source, waits for it to settle and
//! renders the resulting view state. The retry button on the error view simply
//! requests the page again, which opens a fresh viewer.

use axum::{extract::State, response::Html, Extension};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequestId;
use crate::state::AppState;
use crate::viewer::{StatusViewer, ViewState, LOADING_TEXT};

/// Renders the status page for a settled (or given) view state.
pub fn render_page(state: &AppState, view: &ViewState) -> Result<String, AppError> {
    let mut context = tera::Context::new();
    context.insert("config", &state.config.ui);
    context.insert("view", view);
    context.insert("loading_text", LOADING_TEXT);
    Ok(state.tera.render("home.html", &context)?)
}

/// Home page handler showing deployment status.
#[instrument(name = "home::index", skip(state, request_id), fields(request_id = %request_id.0))]
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppError> {
    let mut viewer = StatusViewer::open(state.page_source.clone());
    let view = viewer.settle().await;
    tracing::debug!(loaded = view.snapshot().is_some(), "Status viewer settled");

    let html = render_page(&state, view)?;
    Ok(Html(html))
}
