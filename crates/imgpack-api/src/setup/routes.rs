//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{DOCS_PATH, FILES_PATH, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use imgpack_core::Config;
use imgpack_infra::request_id_middleware;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::constants::{ENCODE_FAILURES_HEADER, FAILED_ENCODINGS_HEADER, SKIPPED_FILES_HEADER};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_upload_size_bytes();

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit(),
        body_limit_bytes = body_limit,
        "HTTP limits configured"
    );

    let app = Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health))
        .route(
            FILES_PATH,
            post(handlers::convert::convert_files)
                .fallback(handlers::convert::method_not_allowed),
        )
        .route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .merge(RapiDoc::new(OPENAPI_PATH).path(DOCS_PATH))
        // Multipart reads its own limit; lift axum's 2 MB default to the configured ceiling.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    // The upload form reads the archive name and batch results from these.
    let exposed = [
        axum::http::header::CONTENT_DISPOSITION,
        HeaderName::from_static(SKIPPED_FILES_HEADER),
        HeaderName::from_static(FAILED_ENCODINGS_HEADER),
        HeaderName::from_static(ENCODE_FAILURES_HEADER),
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(exposed)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(exposed)
    };
    Ok(cors)
}
