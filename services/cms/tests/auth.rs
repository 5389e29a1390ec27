//! Sign-in, sign-out and sign-up flows.

mod common;

use axum::http::{header, StatusCode};
use common::{assert_redirect, spawn_app};

#[tokio::test]
async fn signed_out_visitors_are_sent_to_sign_in() {
    let app = spawn_app().await;

    let response = app.server.get("/").await;
    assert_redirect(&response, "/users/signin");

    let page = app.follow(&response).await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("Username"));
    assert!(page.text().contains("You must login."));
}

#[tokio::test]
async fn sign_in_form_is_public() {
    let app = spawn_app().await;

    let response = app.server.get("/users/signin").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Username:"));
}

#[tokio::test]
async fn invalid_credentials_keep_the_session_anonymous() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/signin")
        .form(&[("username", "foo"), ("password", "bar")])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Invalid Credentials"));
    assert!(response.text().contains(r#"value="foo""#));

    let response = app
        .server
        .post("/users/signin")
        .form(&[("username", "admin"), ("password", "wrong")])
        .await;
    assert!(response.text().contains("Invalid Credentials"));

    assert_redirect(&app.server.get("/").await, "/users/signin");
}

#[tokio::test]
async fn successful_sign_in_welcomes_once() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/signin")
        .form(&[("username", "admin"), ("password", "secret")])
        .await;
    assert_redirect(&response, "/");

    let page = app.follow(&response).await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("Welcome!"));
    assert!(page.text().contains("Signed in as admin."));

    let again = app.server.get("/").await;
    assert!(!again.text().contains("Welcome!"));
}

#[tokio::test]
async fn sign_out_forgets_the_user() {
    let app = spawn_app().await;
    app.sign_in().await;

    let response = app.server.post("/users/signout").await;
    assert_redirect(&response, "/users/signin");

    let page = app.follow(&response).await;
    assert!(page.text().contains("You have been logged out."));
    assert!(page.text().contains("Username:"));

    assert_redirect(&app.server.get("/").await, "/users/signin");
}

#[tokio::test]
async fn anonymous_visits_store_no_session() {
    let app = spawn_app().await;
    app.create_document("about.txt", "Public page.");

    for _ in 0..50 {
        let response = app.server.get("/about.txt").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
    let form = app.server.get("/users/signin").await;
    assert!(form.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(app.state.sessions.len().await, 0);
}

#[tokio::test]
async fn session_cookie_is_issued_once_there_is_state() {
    let app = spawn_app().await;

    let response = app.server.get("/").await;
    assert!(response.headers().get(header::SET_COOKIE).is_some());
    assert_eq!(app.state.sessions.len().await, 1);

    // Showing the flash empties the session, so it is dropped.
    app.follow(&response).await;
    assert_eq!(app.state.sessions.len().await, 0);

    let response = app
        .server
        .post("/users/signin")
        .form(&[("username", "admin"), ("password", "secret")])
        .await;
    assert!(response.headers().get(header::SET_COOKIE).is_some());

    let index = app.server.get("/").await;
    assert_eq!(index.status_code(), StatusCode::OK);
    assert!(index.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(app.state.sessions.len().await, 1);
}

#[tokio::test]
async fn sign_up_registers_a_user_who_can_sign_in() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/signup")
        .form(&[
            ("username", "bob"),
            ("password", "hunter22"),
            ("password_confirmation", "hunter22"),
        ])
        .await;
    assert_redirect(&response, "/users/signin");

    let page = app.follow(&response).await;
    assert!(page
        .text()
        .contains("Your account has been created. Please sign in."));

    let records = std::fs::read_to_string(&app.users_file).unwrap();
    assert!(records.starts_with("admin: "));
    assert!(records.contains("\nbob: "));
    assert!(app.state.credentials.load_all().await.unwrap()["bob"].starts_with("$argon2"));
    assert!(!records.contains("hunter22"));

    let response = app
        .server
        .post("/users/signin")
        .form(&[("username", "bob"), ("password", "hunter22")])
        .await;
    assert_redirect(&response, "/");
}

#[tokio::test]
async fn sign_up_rejections_leave_the_store_untouched() {
    let app = spawn_app().await;
    let before = std::fs::read_to_string(&app.users_file).unwrap();

    let cases = [
        ("", "hunter22", "hunter22", "Please enter a username."),
        ("bob smith", "hunter22", "hunter22", "Usernames may not contain spaces or colons."),
        ("admin", "hunter22", "hunter22", "That username is already taken."),
        ("bob", "", "", "Please enter a password."),
        ("bob", "short", "short", "Password must be longer than 6 characters."),
        ("bob", "hunter22", "hunter23", "Passwords do not match."),
    ];

    for (username, password, confirmation, message) in cases {
        let response = app
            .server
            .post("/users/signup")
            .form(&[
                ("username", username),
                ("password", password),
                ("password_confirmation", confirmation),
            ])
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "case {username:?}"
        );
        assert!(response.text().contains(message), "expected {message:?}");
    }

    assert_eq!(std::fs::read_to_string(&app.users_file).unwrap(), before);
}

#[tokio::test]
async fn users_added_to_the_file_can_sign_in_without_restart() {
    use cms_core::ports::PasswordHasher;
    use cms_lib::adapters::Argon2Hasher;
    use std::io::Write;

    let app = spawn_app().await;
    let hash = Argon2Hasher.hash("letmein1").unwrap();
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&app.users_file)
        .unwrap();
    writeln!(file, "carol: {}", hash).unwrap();

    let response = app
        .server
        .post("/users/signin")
        .form(&[("username", "carol"), ("password", "letmein1")])
        .await;
    assert_redirect(&response, "/");
}
