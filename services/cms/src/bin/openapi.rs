//! services/cms/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 description of the routes
//! and saves it to a file named `openapi.json`.

use cms_lib::web::openapi::ApiDoc;
use utoipa::OpenApi;

/// Generates the OpenAPI description and writes it to a file.
fn generate_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = api_doc.to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    println!("OpenAPI description generated at {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    generate_spec(ApiDoc::openapi(), "openapi.json")?;
    Ok(())
}
