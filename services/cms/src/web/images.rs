//! services/cms/src/web/images.rs
//!
//! Image attachment upload. Uploaded images live next to the documents and
//! are viewed through the regular document route.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use cms_core::DocumentError;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::web::auth::RequireUser;
use crate::web::session::SessionHandle;
use crate::web::state::AppState;
use crate::web::views;

/// The multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// GET /img - Show the upload form
#[utoipa::path(
    get,
    path = "/img",
    responses((status = 200, description = "Upload form", body = String, content_type = "text/html"))
)]
pub async fn image_form_handler(
    RequireUser(username): RequireUser,
    session: SessionHandle,
) -> Html<String> {
    let flash = session.take_flash().await;
    Html(views::image_upload_page(flash.as_deref(), &username))
}

/// POST /img - Upload a .jpg or .png image
///
/// Accepts a multipart/form-data request with an `image` file part.
#[utoipa::path(
    post,
    path = "/img",
    request_body(content_type = "multipart/form-data", description = "The image to upload."),
    responses(
        (status = 303, description = "Uploaded, redirected to the list"),
        (status = 422, description = "Empty upload or unsupported image type")
    )
)]
pub async fn upload_image_handler(
    RequireUser(username): RequireUser,
    State(state): State<Arc<AppState>>,
    session: SessionHandle,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((name, data));
        break;
    }
    let (name, data) = upload.unwrap_or_default();

    match state.documents.upload_image(&name, &data).await {
        Ok(name) => {
            info!("{} uploaded {} ({} bytes)", username, name, data.len());
            session.flash(format!("{} was uploaded.", name)).await;
            Ok(Redirect::to("/").into_response())
        }
        Err(DocumentError::Upload(rejection)) => {
            warn!("Rejected upload '{}': {}", name, rejection);
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::image_upload_page(Some(&rejection.to_string()), &username)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
