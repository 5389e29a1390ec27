//! services/cms/src/web/router.rs
//!
//! Builds the complete application router.

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::web::{
    auth::{
        signin_form_handler, signin_handler, signout_handler, signup_form_handler, signup_handler,
    },
    documents::{
        create_handler, destroy_handler, duplicate_handler, edit_form_handler, index_handler,
        new_document_form_handler, update_handler, view_handler,
    },
    images::{image_form_handler, upload_image_handler},
    middleware::load_session,
    state::AppState,
};

/// Uploads and edits larger than this are rejected before reaching a handler.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Maps every route to its handler.
///
/// Protected handlers guard themselves with the `RequireUser` extractor, so
/// viewing a document and editing it can share the `/{file_name}` path.
pub fn build_router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/users/signin", get(signin_form_handler).post(signin_handler))
        .route("/users/signout", post(signout_handler))
        .route("/users/signup", get(signup_form_handler).post(signup_handler));

    let document_routes = Router::new()
        .route("/", get(index_handler))
        .route("/new", get(new_document_form_handler))
        .route("/create", post(create_handler))
        .route("/img", get(image_form_handler).post(upload_image_handler))
        .route("/{file_name}", get(view_handler).post(update_handler))
        .route("/{file_name}/edit", get(edit_form_handler))
        .route("/{file_name}/destroy", post(destroy_handler))
        .route("/{file_name}/duplicate", post(duplicate_handler));

    Router::new()
        .merge(user_routes)
        .merge(document_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), load_session))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
