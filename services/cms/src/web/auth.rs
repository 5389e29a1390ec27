//! services/cms/src/web/auth.rs
//!
//! Authentication endpoints for sign-in, sign-up and sign-out, plus the
//! `RequireUser` extractor that guards protected routes.

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use cms_core::domain::{
    validate_password, validate_username, SignupError, INVALID_CREDENTIALS_MESSAGE,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::web::session::SessionHandle;
use crate::web::state::AppState;
use crate::web::views;

pub const SIGNIN_PATH: &str = "/users/signin";

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SigninForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

//=========================================================================================
// Route Guard
//=========================================================================================

/// The signed-in username.
///
/// Extracting it from an anonymous request leaves the "You must login."
/// flash and redirects to the sign-in page before the handler body runs.
pub struct RequireUser(pub String);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionHandle::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.require_authenticated().await {
            Ok(username) => Ok(RequireUser(username)),
            Err(_) => {
                info!("Anonymous request to {} sent to sign in", parts.uri.path());
                Err(Redirect::to(SIGNIN_PATH).into_response())
            }
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /users/signin - Show the sign-in form
#[utoipa::path(
    get,
    path = "/users/signin",
    responses((status = 200, description = "Sign-in form", body = String, content_type = "text/html"))
)]
pub async fn signin_form_handler(session: SessionHandle) -> Html<String> {
    let flash = session.take_flash().await;
    Html(views::signin_page(flash.as_deref(), ""))
}

/// POST /users/signin - Sign in with a stored credential
#[utoipa::path(
    post,
    path = "/users/signin",
    request_body(content = SigninForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in, redirected to the document list"),
        (status = 200, description = "Invalid credentials, form shown again", body = String, content_type = "text/html")
    )
)]
pub async fn signin_handler(
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Form(form): Form<SigninForm>,
) -> Result<Response, AppError> {
    if state
        .credentials
        .verify(&form.username, &form.password)
        .await?
    {
        session.login(&form.username).await;
        info!("{} signed in", form.username);
        return Ok(Redirect::to("/").into_response());
    }

    warn!("Rejected sign-in for '{}'", form.username);
    Ok(Html(views::signin_page(
        Some(INVALID_CREDENTIALS_MESSAGE),
        &form.username,
    ))
    .into_response())
}

/// POST /users/signout - Forget the signed-in user
#[utoipa::path(
    post,
    path = "/users/signout",
    responses((status = 303, description = "Signed out, redirected to the sign-in form"))
)]
pub async fn signout_handler(session: SessionHandle) -> Redirect {
    if let Some(username) = session.username().await {
        info!("{} signed out", username);
    }
    session.logout().await;
    Redirect::to(SIGNIN_PATH)
}

/// GET /users/signup - Show the sign-up form
#[utoipa::path(
    get,
    path = "/users/signup",
    responses((status = 200, description = "Sign-up form", body = String, content_type = "text/html"))
)]
pub async fn signup_form_handler(session: SessionHandle) -> Html<String> {
    let flash = session.take_flash().await;
    Html(views::signup_page(flash.as_deref(), ""))
}

/// POST /users/signup - Register a new user
#[utoipa::path(
    post,
    path = "/users/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Account created, redirected to the sign-in form"),
        (status = 422, description = "Rejected, form shown again with the reason")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    let checked = match validate_username(username) {
        Ok(()) => {
            if state.credentials.username_available(username).await? {
                validate_password(&form.password, &form.password_confirmation)
            } else {
                Err(SignupError::UsernameTaken)
            }
        }
        Err(e) => Err(e),
    };

    if let Err(rejection) = checked {
        warn!("Rejected sign-up for '{}': {}", username, rejection);
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::signup_page(Some(&rejection.to_string()), &form.username)),
        )
            .into_response());
    }

    state.credentials.append(username, &form.password).await?;
    info!("Registered user {}", username);
    session
        .flash("Your account has been created. Please sign in.")
        .await;
    Ok(Redirect::to(SIGNIN_PATH).into_response())
}
