//! services/cms/src/web/session.rs
//!
//! Server-held session storage. Each browser is identified by a random
//! session id carried in a cookie; the id maps to a `SessionContext` holding
//! the signed-in username and the pending flash message.
//!
//! Only sessions that carry state are stored. A visitor who never signs in
//! and never receives a flash message costs nothing, and a session is dropped
//! again as soon as it is empty.

use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use cms_core::domain::AuthRequired;
use cms_core::SessionContext;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "cms_session";

//=========================================================================================
// SessionStore (Shared Across All Requests)
//=========================================================================================

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes the session named by the cookie, or starts a fresh one.
    ///
    /// The boolean is true when a new session was started. A new session is
    /// not stored until something is written to it, so the client only needs
    /// a cookie if [`SessionStore::contains`] says so after the request.
    pub async fn resume_or_start(&self, id: Option<Uuid>) -> (SessionHandle, bool) {
        if let Some(id) = id {
            if self.contains(id).await {
                return (self.handle(id), false);
            }
        }
        (self.handle(Uuid::new_v4()), true)
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    /// A copy of the stored context, if the session exists.
    pub async fn get(&self, id: Uuid) -> Option<SessionContext> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn handle(&self, id: Uuid) -> SessionHandle {
        SessionHandle {
            id,
            store: self.clone(),
        }
    }
}

//=========================================================================================
// SessionHandle (Specific to One Request)
//=========================================================================================

/// The per-request view of one session. Every mutation is written straight
/// back to the store.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    store: SessionStore,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&SessionContext) -> R + Send,
    {
        let sessions = self.store.sessions.read().await;
        match sessions.get(&self.id) {
            Some(context) => f(context),
            None => f(&SessionContext::default()),
        }
    }

    /// Applies `f` to the stored context, storing it if needed and removing
    /// it again once it holds nothing.
    async fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut SessionContext) -> R + Send,
    {
        let mut sessions = self.store.sessions.write().await;
        let context = sessions.entry(self.id).or_default();
        let result = f(&mut *context);
        if context.is_empty() {
            sessions.remove(&self.id);
        }
        result
    }

    pub async fn is_authenticated(&self) -> bool {
        self.read(|s| s.is_authenticated()).await
    }

    pub async fn username(&self) -> Option<String> {
        self.read(|s| s.username.clone()).await
    }

    pub async fn login(&self, username: &str) {
        self.with(|s| s.login(username)).await
    }

    pub async fn logout(&self) {
        self.with(|s| s.logout()).await
    }

    pub async fn require_authenticated(&self) -> Result<String, AuthRequired> {
        self.with(|s| s.require_authenticated()).await
    }

    pub async fn flash(&self, message: impl Into<String> + Send) {
        self.with(|s| s.set_flash(message)).await
    }

    pub async fn take_flash(&self) -> Option<String> {
        self.with(|s| s.take_flash()).await
    }
}

/// Reads the handle that `load_session` placed in the request extensions.
impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session middleware is not installed".to_string()))
    }
}

/// Pulls the session id out of a `Cookie` header value.
pub fn session_id_from_cookie(cookie_header: &str) -> Option<Uuid> {
    cookie_header.split(';').find_map(|c| {
        let c = c.trim();
        c.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
    })
}

/// The `Set-Cookie` value for a freshly started session.
pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, id)
}
