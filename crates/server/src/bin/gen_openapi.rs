//! Write the OpenAPI document to `openapi.json` in the working directory.

use utoipa::OpenApi;

fn main() {
    let doc = server::openapi::ApiDoc::openapi()
        .to_pretty_json()
        .expect("failed to serialize OpenAPI document");
    std::fs::write("openapi.json", &doc).expect("failed to write openapi.json");
    println!("Wrote openapi.json ({} bytes)", doc.len());
}
