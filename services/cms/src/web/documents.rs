//! services/cms/src/web/documents.rs
//!
//! Handlers for listing, viewing, creating, editing, duplicating and deleting
//! documents. Everything except viewing requires a signed-in user.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use cms_core::{DocumentError, DocumentKind, Rendered};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::web::auth::RequireUser;
use crate::web::session::SessionHandle;
use crate::web::state::AppState;
use crate::web::views;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct NewDocumentForm {
    #[serde(default)]
    pub new_file: String,
}

#[derive(Deserialize, ToSchema)]
pub struct EditDocumentForm {
    #[serde(default)]
    pub file_contents: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Leaves a flash message and sends the browser back to the document list.
async fn back_to_index(session: &SessionHandle, message: String) -> Response {
    session.flash(message).await;
    Redirect::to("/").into_response()
}

async fn does_not_exist(session: &SessionHandle, name: &str) -> Response {
    back_to_index(session, format!("{} does not exist.", name)).await
}

/// Handles the outcomes every document route shares: missing documents are
/// reported with a redirect, anything else is a server error.
async fn recover(session: &SessionHandle, name: &str, err: DocumentError) -> Result<Response, AppError> {
    if err.is_missing() {
        return Ok(does_not_exist(session, name).await);
    }
    error!("Document operation on {} failed: {}", name, err);
    Err(err.into())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - List every document
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Document list", body = String, content_type = "text/html"),
        (status = 303, description = "Not signed in, redirected to the sign-in form")
    )
)]
pub async fn index_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
) -> Result<Html<String>, AppError> {
    let documents = state.documents.list().await?;
    let flash = session.take_flash().await;
    Ok(Html(views::index_page(&documents, &username, flash.as_deref())))
}

/// GET /{file_name} - View a document
///
/// Text is served as-is, markdown is rendered to HTML and images are sent as
/// their bytes. This is the only document route open to anonymous visitors.
#[utoipa::path(
    get,
    path = "/{file_name}",
    params(("file_name" = String, Path, description = "The document name, including its extension.")),
    responses(
        (status = 200, description = "The document, as text/plain, text/html or an image type"),
        (status = 303, description = "Missing or undisplayable document, redirected to the list")
    )
)]
pub async fn view_handler(
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let rendered = match state.documents.render(&file_name).await {
        Ok(rendered) => rendered,
        Err(DocumentError::Unsupported(e)) => {
            warn!("Refused to display {}", file_name);
            return Ok(back_to_index(&session, e.to_string()).await);
        }
        Err(e) => return recover(&session, &file_name, e).await,
    };

    let response = match rendered {
        Rendered::Html(fragment) => {
            let flash = session.take_flash().await;
            Html(views::markdown_page(&file_name, &fragment, flash.as_deref())).into_response()
        }
        Rendered::Text(bytes) => ([(header::CONTENT_TYPE, "text/plain")], bytes).into_response(),
        Rendered::Image {
            content_type,
            bytes,
        } => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
    };
    Ok(response)
}

/// GET /new - Show the form for a new document
#[utoipa::path(
    get,
    path = "/new",
    responses((status = 200, description = "New document form", body = String, content_type = "text/html"))
)]
pub async fn new_document_form_handler(
    RequireUser(username): RequireUser,
    session: SessionHandle,
) -> Html<String> {
    let flash = session.take_flash().await;
    Html(views::new_document_page(flash.as_deref(), "", &username))
}

/// POST /create - Create an empty document
#[utoipa::path(
    post,
    path = "/create",
    request_body(content = NewDocumentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirected to the list"),
        (status = 422, description = "Invalid name, form shown again with the reason")
    )
)]
pub async fn create_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Form(form): Form<NewDocumentForm>,
) -> Result<Response, AppError> {
    match state.documents.create(&form.new_file).await {
        Ok(name) => {
            info!("{} created {}", username, name);
            Ok(back_to_index(&session, format!("{} was created.", name)).await)
        }
        Err(DocumentError::Name(rejection)) => {
            warn!("Rejected new document '{}': {}", form.new_file, rejection);
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::new_document_page(
                    Some(&rejection.to_string()),
                    &form.new_file,
                    &username,
                )),
            )
                .into_response())
        }
        Err(e) => {
            error!("Failed to create '{}': {}", form.new_file, e);
            Err(e.into())
        }
    }
}

/// GET /{file_name}/edit - Show the editor for a text or markdown document
#[utoipa::path(
    get,
    path = "/{file_name}/edit",
    params(("file_name" = String, Path, description = "The document name, including its extension.")),
    responses(
        (status = 200, description = "Edit form", body = String, content_type = "text/html"),
        (status = 303, description = "Missing or non-text document, redirected to the list")
    )
)]
pub async fn edit_form_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    if !DocumentKind::from_name(&file_name).is_editable() {
        return Ok(back_to_index(&session, format!("{} cannot be edited.", file_name)).await);
    }
    let content = match state.documents.read(&file_name).await {
        Ok(content) => content,
        Err(e) => return recover(&session, &file_name, e.into()).await,
    };

    let flash = session.take_flash().await;
    Ok(Html(views::edit_page(
        &file_name,
        &String::from_utf8_lossy(&content),
        flash.as_deref(),
        &username,
    ))
    .into_response())
}

/// POST /{file_name} - Overwrite a document's content
///
/// A name that does not exist yet is created.
#[utoipa::path(
    post,
    path = "/{file_name}",
    params(("file_name" = String, Path, description = "The document name, including its extension.")),
    request_body(content = EditDocumentForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Saved, redirected to the list"))
)]
pub async fn update_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Path(file_name): Path<String>,
    Form(form): Form<EditDocumentForm>,
) -> Result<Response, AppError> {
    if !DocumentKind::from_name(&file_name).is_editable() {
        return Ok(back_to_index(&session, format!("{} cannot be edited.", file_name)).await);
    }
    if let Err(e) = state
        .documents
        .write(&file_name, form.file_contents.as_bytes())
        .await
    {
        return recover(&session, &file_name, e.into()).await;
    }

    info!("{} updated {}", username, file_name);
    Ok(back_to_index(&session, format!("{} has been updated.", file_name)).await)
}

/// POST /{file_name}/destroy - Delete a document
#[utoipa::path(
    post,
    path = "/{file_name}/destroy",
    params(("file_name" = String, Path, description = "The document name, including its extension.")),
    responses((status = 303, description = "Deleted (or reported missing), redirected to the list"))
)]
pub async fn destroy_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    if let Err(e) = state.documents.delete(&file_name).await {
        return recover(&session, &file_name, e.into()).await;
    }

    info!("{} deleted {}", username, file_name);
    Ok(back_to_index(&session, format!("{} was deleted.", file_name)).await)
}

/// POST /{file_name}/duplicate - Copy a document to `<stem>_copy.<ext>`
#[utoipa::path(
    post,
    path = "/{file_name}/duplicate",
    params(("file_name" = String, Path, description = "The document name, including its extension.")),
    responses((status = 303, description = "Duplicated (or reported missing), redirected to the list"))
)]
pub async fn duplicate_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    match state.documents.duplicate(&file_name).await {
        Ok(copy) => {
            info!("{} duplicated {} as {}", username, file_name, copy);
            Ok(back_to_index(&session, format!("{} was duplicated as {}.", file_name, copy)).await)
        }
        Err(e) => recover(&session, &file_name, e).await,
    }
}
