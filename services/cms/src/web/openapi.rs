//! services/cms/src/web/openapi.rs
//!
//! The master definition for the OpenAPI description of every route.

use utoipa::OpenApi;

use crate::web::{auth, documents, images};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signin_form_handler,
        auth::signin_handler,
        auth::signout_handler,
        auth::signup_form_handler,
        auth::signup_handler,
        documents::index_handler,
        documents::new_document_form_handler,
        documents::create_handler,
        documents::view_handler,
        documents::edit_form_handler,
        documents::update_handler,
        documents::destroy_handler,
        documents::duplicate_handler,
        images::image_form_handler,
        images::upload_image_handler,
    ),
    components(
        schemas(
            auth::SigninForm,
            auth::SignupForm,
            documents::NewDocumentForm,
            documents::EditDocumentForm,
        )
    ),
    tags(
        (name = "CMS", description = "Browser routes for managing text, markdown and image documents.")
    )
)]
pub struct ApiDoc;
