//! Common test utilities and helpers
//!
//! Every test gets its own temporary data directory and credential file,
//! seeded with the `admin` / `secret` user, and a server that keeps cookies
//! between requests like a browser would.

#![allow(dead_code)]

use axum::http::{header, StatusCode};
use axum_test::{TestResponse, TestServer};
use cms_core::ports::PasswordHasher;
use cms_lib::adapters::Argon2Hasher;
use cms_lib::config::{Config, Environment};
use cms_lib::web::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub data_dir: PathBuf,
    pub users_file: PathBuf,
    _root: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = root.path().join("data");
    let users_file = root.path().join("users.yml");

    let hash = Argon2Hasher
        .hash(ADMIN_PASSWORD)
        .expect("Failed to hash fixture password");
    std::fs::write(&users_file, format!("{}: {}\n", ADMIN, hash))
        .expect("Failed to write credential fixture");

    let config = Config {
        bind_address: "127.0.0.1:0".parse().expect("valid address"),
        log_level: tracing::Level::INFO,
        environment: Environment::Test,
        data_dir: data_dir.clone(),
        users_file: users_file.clone(),
    };
    let state = AppState::from_config(Arc::new(config))
        .await
        .expect("Failed to build app state");

    let server = TestServer::builder()
        .save_cookies()
        .build(build_router(state.clone()))
        .expect("Failed to start test server");

    TestApp {
        server,
        state,
        data_dir,
        users_file,
        _root: root,
    }
}

impl TestApp {
    pub fn create_document(&self, name: &str, content: &str) {
        std::fs::write(self.data_dir.join(name), content).expect("Failed to write document");
    }

    pub fn document(&self, name: &str) -> Option<Vec<u8>> {
        std::fs::read(self.data_dir.join(name)).ok()
    }

    pub fn document_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.data_dir)
            .expect("data dir exists")
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    pub async fn sign_in(&self) {
        let response = self
            .server
            .post("/users/signin")
            .form(&[("username", ADMIN), ("password", ADMIN_PASSWORD)])
            .await;
        assert_redirect(&response, "/");
    }

    /// Requests the page a redirect points at.
    pub async fn follow(&self, response: &TestResponse) -> TestResponse {
        let location = location(response);
        self.server.get(&location).await
    }
}

pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response has a Location header")
        .to_str()
        .expect("Location is ASCII")
        .to_string()
}

pub fn assert_redirect(response: &TestResponse, to: &str) {
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

pub fn content_type(response: &TestResponse) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
