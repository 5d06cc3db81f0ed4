//! formgen web server
//!
//! One page, server-rendered, driven by htmx:
//!
//! - `GET /` shows the query box and the session's current UI
//! - `POST /generate` runs a generation and swaps the UI fragment in place
//! - `POST /api/actions` receives button activations
//!
//! plus the stateless `POST /api/schema_generator` JSON endpoint.

pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// How often idle sessions are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::pages::router())
        .merge(routes::api::router())
        .merge(routes::health::router())
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server and the session sweeper
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            tick.tick().await;
            let pruned = sessions.cleanup_expired().await;
            if pruned > 0 {
                tracing::debug!(pruned, "expired sessions removed");
            }
        }
    });

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("formgen listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use formgen_core::{Error, Result, UiDescription};
    use formgen_requester::{CompletionService, SchemaRequester};
    use formgen_session::SessionStore;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    const MEAL_FORM: &str = r#"[
        {"type":"text","props":{"text":"Meal Log","className":"text-2xl mb-4"}},
        {"type":"input","props":{"type":"text","name":"food","placeholder":"Food Item","className":"mb-4"}},
        {"type":"button","props":{"text":"Add Entry","action":"add-entry","className":"mb-4"}}
    ]"#;

    /// Hands out queued replies in order and counts calls
    struct Scripted {
        replies: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for Scripted {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.calls.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("no reply scripted".into())))
        }
    }

    /// First call never answers; later calls reply with the meal form
    struct StallsOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionService for StallsOnce {
        fn model(&self) -> &str {
            "stalling"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(MEAL_FORM.to_string())
        }
    }

    fn app_with(service: Arc<dyn CompletionService>) -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(
            SchemaRequester::new(service),
            SessionStore::default(),
        ));
        (create_router(state.clone()), state)
    }

    async fn wait_for_loading(state: &AppState, id: &str, loading: bool) {
        for _ in 0..200 {
            if state.sessions.state(id).await.unwrap().is_loading() == loading {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session {id} never reached loading={loading}");
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let raw = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie set")
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn json_post(query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/schema_generator")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "query": query }).to_string()))
            .unwrap()
    }

    async fn open_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        session_cookie(&response)
    }

    async fn current_ui(app: &Router, cookie: &str) -> UiDescription {
        let response = app
            .clone()
            .oneshot(
                Request::get("/api/ui")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn index_shows_default_form_and_sets_cookie() {
        let (app, _) = app_with(Scripted::new(vec![]));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).starts_with("formgen_session="));

        let html = body_text(response).await;
        assert!(html.contains("Generate App"));
        assert!(html.contains("name=\"calories\""));
    }

    #[tokio::test]
    async fn schema_generator_returns_bare_array() {
        let service = Scripted::new(vec![Ok(MEAL_FORM.to_string())]);
        let (app, _) = app_with(service.clone());

        let response = app.oneshot(json_post("meal logging form")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1]["props"]["name"], "food");
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn schema_generator_error_statuses() {
        let cases = [
            ("", vec![], StatusCode::BAD_REQUEST),
            ("form", vec![Ok("not json at all".to_string())], StatusCode::INTERNAL_SERVER_ERROR),
            ("form", vec![Ok(r#"{"type":"text"}"#.to_string())], StatusCode::INTERNAL_SERVER_ERROR),
            ("form", vec![Err(Error::Transport("API error 401".into()))], StatusCode::BAD_GATEWAY),
        ];

        for (query, replies, expected) in cases {
            let (app, _) = app_with(Scripted::new(replies));
            let response = app.oneshot(json_post(query)).await.unwrap();
            assert_eq!(response.status(), expected, "query {query:?}");
            let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn blank_query_makes_no_call_and_keeps_ui() {
        let service = Scripted::new(vec![]);
        let (app, _) = app_with(service.clone());
        let cookie = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(form_post("/generate", "query=+++", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Please enter a query!"));
        assert!(html.contains("name=\"food\""));

        assert_eq!(service.call_count(), 0);
        assert_eq!(current_ui(&app, &cookie).await, UiDescription::default_form());
    }

    #[tokio::test]
    async fn generate_replaces_ui_then_failure_keeps_it() {
        let service = Scripted::new(vec![
            Ok(MEAL_FORM.to_string()),
            Ok("Sorry, I can't do that".to_string()),
        ]);
        let (app, _) = app_with(service.clone());
        let cookie = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(form_post("/generate", "query=meal+logging+form", Some(&cookie)))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Meal Log"));
        assert!(html.contains(">Add Entry</button>"));
        assert!(html.contains("hx-post=\"/api/actions\""));
        let generated = current_ui(&app, &cookie).await;
        assert_eq!(generated.len(), 3);

        let response = app
            .clone()
            .oneshot(form_post("/generate", "query=another+form", Some(&cookie)))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Something went wrong while generating the UI."));
        assert!(html.contains("Meal Log"));
        assert_eq!(current_ui(&app, &cookie).await, generated);
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test]
    async fn submission_rejected_while_loading() {
        let service = Scripted::new(vec![Ok(MEAL_FORM.to_string())]);
        let (app, state) = app_with(service.clone());
        let cookie = open_session(&app).await;
        let id = cookie.trim_start_matches("formgen_session=");
        state.sessions.begin_generation(id).await.unwrap();

        let response = app
            .clone()
            .oneshot(form_post("/generate", "query=meal+form", Some(&cookie)))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("still loading"));
        assert_eq!(service.call_count(), 0);
        assert!(state.sessions.state(id).await.unwrap().is_loading());
    }

    #[tokio::test]
    async fn dropped_generate_request_frees_session() {
        let service = Arc::new(StallsOnce {
            calls: AtomicUsize::new(0),
        });
        let (app, state) = app_with(service.clone());
        let cookie = open_session(&app).await;
        let id = cookie.trim_start_matches("formgen_session=").to_string();

        let in_flight = tokio::spawn(
            app.clone()
                .oneshot(form_post("/generate", "query=meal+form", Some(&cookie))),
        );
        wait_for_loading(&state, &id, true).await;

        in_flight.abort();
        assert!(in_flight.await.unwrap_err().is_cancelled());
        wait_for_loading(&state, &id, false).await;
        assert_eq!(state.sessions.state(&id).await.unwrap().label(), "error");

        let response = app
            .clone()
            .oneshot(form_post("/generate", "query=meal+form", Some(&cookie)))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Meal Log"));
        assert!(!html.contains("still loading"));
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn schema_generator_body_rejections_are_json() {
        let (app, _) = app_with(Scripted::new(vec![]));
        let no_type = Request::builder()
            .method("POST")
            .uri("/api/schema_generator")
            .body(Body::from(r#"{"query":"form"}"#))
            .unwrap();
        let bad_json = Request::builder()
            .method("POST")
            .uri("/api/schema_generator")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        for (req, expected) in [
            (no_type, StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (bad_json, StatusCode::BAD_REQUEST),
        ] {
            let response = app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), expected);
            let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
            assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
        }
    }

    #[tokio::test]
    async fn registered_action_acknowledged() {
        let (app, _) = app_with(Scripted::new(vec![]));
        let response = app
            .oneshot(form_post(
                "/api/actions",
                "text=Add+Entry&action=add-entry&className=mb-4",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Entry added!"));
        assert!(html.contains("data-action=\"add-entry\""));
    }

    #[tokio::test]
    async fn unregistered_action_is_no_content() {
        let (app, _) = app_with(Scripted::new(vec![]));
        for body in ["text=Launch&action=unregistered-action", "text=Add+Entry", ""] {
            let response = app
                .clone()
                .oneshot(form_post("/api/actions", body, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT, "body {body:?}");
        }
    }

    #[tokio::test]
    async fn health_reports_model() {
        let (app, _) = app_with(Scripted::new(vec![]));
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "formgen-web");
        assert_eq!(body["model"], "scripted");
        assert!(body["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn stylesheet_served_as_css() {
        let (app, _) = app_with(Scripted::new(vec![]));
        let response = app
            .oneshot(Request::get("/static/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert!(body_text(response).await.contains("#stage.htmx-request"));
    }
}
