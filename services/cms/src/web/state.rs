//! services/cms/src/web/state.rs
//!
//! Defines the application's shared state and how it is assembled at startup.

use crate::adapters::{Argon2Hasher, FileCredentialStore, FsDocumentRepository, PulldownRenderer};
use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::web::session::SessionStore;
use cms_core::{Credentials, Documents};
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub documents: Documents,
    pub credentials: Credentials,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires the filesystem, credential file, hasher and markdown adapters
    /// together.
    ///
    /// The data directory is created when absent. A missing or malformed
    /// credential file is a configuration error.
    pub async fn from_config(config: Arc<Config>) -> Result<Arc<Self>, AppError> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|e| {
                ConfigError::DataDir(config.data_dir.display().to_string(), e.to_string())
            })?;
        info!("Serving documents from {}", config.data_dir.display());

        let credential_store = FileCredentialStore::open(&config.users_file)
            .await
            .map_err(|e| {
                ConfigError::CredentialFile(config.users_file.display().to_string(), e.to_string())
            })?;
        info!("Loaded credentials from {}", credential_store.path().display());

        let documents = Documents::new(
            Arc::new(FsDocumentRepository::new(config.data_dir.clone())),
            Arc::new(PulldownRenderer),
        );
        let credentials = Credentials::new(Arc::new(credential_store), Arc::new(Argon2Hasher));

        Ok(Arc::new(Self {
            config,
            documents,
            credentials,
            sessions: SessionStore::new(),
        }))
    }
}
