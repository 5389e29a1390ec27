//! services/cms/src/adapters/credentials_file.rs
//!
//! A flat-file implementation of the `CredentialStore` port.
//!
//! The file is a YAML mapping of usernames to password hashes. New users are
//! appended as one more `username: hash` entry, so existing records are never
//! rewritten. The file is re-read on every call so users added by another
//! process show up at once.

use async_trait::async_trait;
use cms_core::ports::{CredentialStore, PortError, PortResult};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Opens the store, parsing the file once so a missing or malformed file
    /// is reported at startup instead of on the first sign-in.
    pub async fn open(path: impl Into<PathBuf>) -> PortResult<Self> {
        let store = Self { path: path.into() };
        store.load_all().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses the record file into a map. An empty document holds no users.
pub fn parse_records(text: &str) -> PortResult<HashMap<String, String>> {
    let has_content = text.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(HashMap::new());
    }

    let records: Option<HashMap<String, Option<String>>> = serde_yaml::from_str(text)
        .map_err(|e| PortError::Unexpected(format!("malformed credential file: {}", e)))?;

    let mut users = HashMap::new();
    for (username, hash) in records.unwrap_or_default() {
        match hash {
            Some(hash) if !username.is_empty() && !hash.is_empty() => {
                users.insert(username, hash);
            }
            _ => {
                return Err(PortError::Unexpected(format!(
                    "record '{}': username and hash must not be empty",
                    username
                )))
            }
        }
    }
    Ok(users)
}

/// Renders one record as a YAML entry, quoting whatever YAML would misread.
fn format_record(username: &str, password_hash: &str) -> PortResult<String> {
    let record = BTreeMap::from([(username, password_hash)]);
    serde_yaml::to_string(&record).map_err(|e| PortError::Unexpected(e.to_string()))
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load_all(&self) -> PortResult<HashMap<String, String>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PortError::Storage(format!("{}: {}", self.path.display(), e)))?;
        parse_records(&text)
    }

    async fn append(&self, username: &str, password_hash: &str) -> PortResult<()> {
        let existing = tokio::fs::read(&self.path)
            .await
            .map_err(|e| PortError::Storage(format!("{}: {}", self.path.display(), e)))?;

        let mut record = String::new();
        if existing.last().is_some_and(|b| *b != b'\n') {
            record.push('\n');
        }
        record.push_str(&format_record(username, password_hash)?);

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| PortError::Storage(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(record.as_bytes())
            .await
            .map_err(|e| PortError::Storage(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| PortError::Storage(e.to_string()))
    }
}
