//! services/cms/src/adapters/fs_documents.rs
//!
//! The filesystem adapter, the concrete implementation of the
//! `DocumentRepository` port. Every document is a regular file directly
//! inside one root directory.

use async_trait::async_trait;
use bytes::Bytes;
use cms_core::domain::is_plain_file_name;
use cms_core::ports::{DocumentRepository, PortError, PortResult};
use std::io::ErrorKind;
use std::path::PathBuf;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Debug)]
pub struct FsDocumentRepository {
    root: PathBuf,
}

impl FsDocumentRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a document name to its path, refusing anything that would leave the root.
    fn resolve(&self, name: &str) -> PortResult<PathBuf> {
        if !is_plain_file_name(name) {
            return Err(PortError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

fn storage_error(name: &str, err: std::io::Error) -> PortError {
    match err.kind() {
        ErrorKind::NotFound => PortError::NotFound(name.to_string()),
        _ => PortError::Storage(format!("{}: {}", name, err)),
    }
}

//=========================================================================================
// `DocumentRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentRepository for FsDocumentRepository {
    async fn list(&self) -> PortResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| PortError::Storage(format!("{}: {}", self.root.display(), e)))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PortError::Storage(e.to_string()))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            // Names that are not valid UTF-8 cannot be addressed through a URL anyway.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn exists(&self, name: &str) -> PortResult<bool> {
        let path = match self.resolve(name) {
            Ok(path) => path,
            Err(_) => return Ok(false),
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error(name, e)),
        }
    }

    async fn read(&self, name: &str) -> PortResult<Bytes> {
        let path = self.resolve(name)?;
        let content = tokio::fs::read(&path)
            .await
            .map_err(|e| storage_error(name, e))?;
        Ok(Bytes::from(content))
    }

    async fn write(&self, name: &str, content: &[u8]) -> PortResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| storage_error(name, e))
    }

    async fn delete(&self, name: &str) -> PortResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| storage_error(name, e))
    }
}
