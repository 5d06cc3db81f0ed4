//! Interactive page and its htmx endpoints

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use formgen_core::Props;
use serde::Deserialize;
use serde_json::Value;
use tower_cookies::Cookies;

use crate::routes::session_for;
use crate::templates;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/api/actions", post(activate))
}

async fn index(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let (_, session) = session_for(&state, &cookies).await;
    Html(templates::page_html(&session))
}

#[derive(Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub query: String,
}

/// Run one generation for the caller's session.
///
/// Always answers 200 so htmx swaps the fragment; failures travel in the
/// notice area and the previous UI is sent back unchanged.
async fn generate(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(form): Form<GenerateForm>,
) -> impl IntoResponse {
    let (id, current) = session_for(&state, &cookies).await;

    if let Err(e) = formgen_requester::validate_query(&form.query) {
        return Html(templates::generated_fragment(&current, Some(e.user_notice())));
    }

    // Settles the session even if this future is dropped mid-request
    let guard = match state.sessions.begin_guarded(&id).await {
        Ok(guard) => guard,
        Err(e) => {
            tracing::info!(session = %id, "submission rejected, generation in flight");
            return Html(templates::generated_fragment(&current, Some(e.user_notice())));
        }
    };

    let outcome = state.requester.generate(&form.query).await;
    match &outcome {
        Ok(ui) => tracing::info!(session = %id, components = ui.len(), "ui generated"),
        Err(e) => tracing::warn!(session = %id, error = %e, "generation failed"),
    }

    let settled = guard.finish(outcome).await;
    Html(templates::generated_fragment(&settled, settled.error_message()))
}

/// Button activation. The form fields are the button's props.
async fn activate(Form(fields): Form<HashMap<String, String>>) -> Response {
    let props: Props = fields
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    match formgen_render::dispatch(&props) {
        Some(ack) => Html(templates::acknowledgement_html(&ack)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
