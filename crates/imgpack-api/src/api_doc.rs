//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgpack API",
        version = "0.1.0",
        description = "Batch image converter: upload JPEG, PNG, WebP or AVIF images and download them re-encoded as progressive JPEG, WebP and AVIF in a single zip archive."
    ),
    paths(
        handlers::convert::convert_files,
        handlers::health::health,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "files", description = "Image conversion"),
        (name = "health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;
