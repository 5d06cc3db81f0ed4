pub mod api;
pub mod health;
pub mod pages;

use formgen_session::SessionState;
use tower_cookies::{Cookie, Cookies};

use crate::AppState;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "formgen_session";

/// Resolve the caller's session, opening one (and setting the cookie) when
/// the request carries no live id.
pub async fn session_for(state: &AppState, cookies: &Cookies) -> (String, SessionState) {
    let presented = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (id, session) = state.sessions.open(presented.as_deref()).await;

    if presented.as_deref() != Some(id.as_str()) {
        let mut cookie = Cookie::new(SESSION_COOKIE, id.clone());
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
        cookies.add(cookie);
    }
    (id, session)
}
