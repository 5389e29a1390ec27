//! crates/cms_core/src/credentials.rs
//!
//! Verifies and registers users against a `CredentialStore`, hashing through
//! a `PasswordHasher`. Every call reads the store afresh.

use crate::ports::{CredentialStore, PasswordHasher, PortResult};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl Credentials {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn load_all(&self) -> PortResult<HashMap<String, String>> {
        self.store.load_all().await
    }

    /// Fails closed: an unknown username never verifies.
    pub async fn verify(&self, username: &str, password: &str) -> PortResult<bool> {
        let users = self.store.load_all().await?;
        Ok(users
            .get(username)
            .is_some_and(|hash| self.hasher.verify(password, hash)))
    }

    pub async fn username_available(&self, username: &str) -> PortResult<bool> {
        if username.is_empty() {
            return Ok(false);
        }
        Ok(!self.store.load_all().await?.contains_key(username))
    }

    /// Hashes `password` and appends a new record for `username`.
    pub async fn append(&self, username: &str, password: &str) -> PortResult<()> {
        let hash = self.hasher.hash(password)?;
        self.store.append(username, &hash).await
    }
}
