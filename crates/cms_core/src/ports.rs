//! crates/cms_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core relies on.
//! These traits form the boundary of the hexagonal architecture: the core never
//! knows whether documents live on a local disk or how passwords are hashed.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Raw storage for documents under a single root.
///
/// There is no locking: concurrent writers race and the last one wins.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Names of every document, in whatever order the storage yields them.
    async fn list(&self) -> PortResult<Vec<String>>;

    async fn exists(&self, name: &str) -> PortResult<bool>;

    /// Fails with `NotFound` when the document is absent.
    async fn read(&self, name: &str) -> PortResult<Bytes>;

    /// Overwrites the document, creating it when absent.
    async fn write(&self, name: &str, content: &[u8]) -> PortResult<()>;

    /// Fails with `NotFound` when the document is absent.
    async fn delete(&self, name: &str) -> PortResult<()>;
}

/// Persistent `username -> password hash` records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Re-reads every record from storage; implementations must not cache.
    async fn load_all(&self) -> PortResult<HashMap<String, String>>;

    /// Adds one record without rewriting the existing ones.
    async fn append(&self, username: &str, password_hash: &str) -> PortResult<()>;
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> PortResult<String>;

    /// Constant-time comparison of `password` against a stored hash.
    /// A malformed hash never verifies.
    fn verify(&self, password: &str, password_hash: &str) -> bool;
}

pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}
