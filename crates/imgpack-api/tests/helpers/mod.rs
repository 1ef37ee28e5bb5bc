//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p imgpack-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use imgpack_api::setup::routes;
use imgpack_api::state::AppState;
use imgpack_core::Config;
use imgpack_processing::FormatEncoder;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Default config with the fastest AVIF speed to keep tests quick.
pub fn test_config() -> Config {
    Config {
        avif_speed: 10,
        ..Config::default()
    }
}

/// Test server backed by the real codecs.
pub fn setup_test_app() -> TestServer {
    setup_test_app_with_config(test_config())
}

pub fn setup_test_app_with_config(config: Config) -> TestServer {
    let state = Arc::new(AppState::new(config.clone()));
    build_server(&config, state)
}

/// Test server with a substitute encoder.
pub fn setup_test_app_with_encoder(config: Config, encoder: Arc<dyn FormatEncoder>) -> TestServer {
    let state = Arc::new(AppState::with_encoder(config.clone(), encoder));
    build_server(&config, state)
}

fn build_server(config: &Config, state: Arc<AppState>) -> TestServer {
    let router = routes::setup_routes(config, state).expect("router");
    TestServer::new(router).expect("test server")
}

/// Entry names of a zip archive, in archive order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

/// Contents of one zip entry.
pub fn zip_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut content = Vec::new();
    entry.read_to_end(&mut content).expect("read entry");
    content
}
