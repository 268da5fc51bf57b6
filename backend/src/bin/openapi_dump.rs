//! Print the OpenAPI document as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]

use recipe_backend::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
