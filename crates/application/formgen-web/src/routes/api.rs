use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use formgen_core::UiDescription;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::error::ApiError;
use crate::routes::session_for;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/schema_generator", post(schema_generator))
        .route("/api/ui", get(current_ui))
}

#[derive(Deserialize)]
pub struct SchemaRequest {
    #[serde(default)]
    pub query: String,
}

/// Stateless generation: query in, bare descriptor array out
async fn schema_generator(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SchemaRequest>, JsonRejection>,
) -> Result<Json<UiDescription>, ApiError> {
    let Json(req) = payload?;
    let ui = state.requester.generate(&req.query).await?;
    Ok(Json(ui))
}

/// The caller's current description
async fn current_ui(State(state): State<Arc<AppState>>, cookies: Cookies) -> impl IntoResponse {
    let (_, session) = session_for(&state, &cookies).await;
    Json(session.ui().clone())
}
