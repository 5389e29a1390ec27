//! services/cms/src/web/middleware.rs
//!
//! Session middleware that runs in front of every route.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::web::session::{session_cookie, session_id_from_cookie};
use crate::web::state::AppState;

/// Middleware that resumes the caller's session from its cookie, or starts one.
///
/// The `SessionHandle` is inserted into request extensions for handlers to use.
/// A new session gets its cookie on the way out, but only if the handler
/// left something in it.
pub async fn load_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Find our session id among the cookie headers
    let existing = req
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(session_id_from_cookie);

    // 2. Resume it, or start a new session
    let (handle, is_new) = state.sessions.resume_or_start(existing).await;
    let id = handle.id();

    // 3. Insert the handle into request extensions
    req.extensions_mut().insert(handle);

    // 4. Continue to the handler
    let mut response = next.run(req).await;

    // 5. Hand the cookie to a new client whose session was kept
    if is_new && state.sessions.contains(id).await {
        debug!("Started session {}", id);
        match HeaderValue::from_str(&session_cookie(id)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => error!("Failed to build session cookie: {:?}", e),
        }
    }
    response
}
