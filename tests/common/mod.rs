//! Shared helpers for api-harness integration tests
//!
//! The request manager uses a blocking client, so every call made against a
//! wiremock server runs on tokio's blocking pool via [`run_blocking`].

#![allow(dead_code)]

use api_harness::logging::CaptureWriter;
use api_harness::{ErrorHandlerDispatcher, Logger, RequestManager};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Logger backed by memory plus a dispatcher reporting through it
pub fn test_logging(name: &str) -> (Arc<Logger>, Arc<ErrorHandlerDispatcher>, CaptureWriter) {
    let (logger, sink) = Logger::in_memory(name);
    let logger = Arc::new(logger);
    let dispatcher = Arc::new(ErrorHandlerDispatcher::with_logger(logger.clone()));
    (logger, dispatcher, sink)
}

/// Default JSON content type headers, as produced by `environment.json`
pub fn json_headers() -> HashMap<String, String> {
    HashMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

/// Manager pointed at `base_url` with in-memory logging
pub fn create_manager(base_url: &str) -> (RequestManager, CaptureWriter) {
    let (logger, dispatcher, sink) = test_logging("api_harness::api");
    let manager = RequestManager::with_logging(base_url, json_headers(), logger, dispatcher)
        .expect("failed to build request manager");
    (manager, sink)
}

/// Write `configuration.json` selecting `environment` and an `environment.json` entry for it
pub fn write_config_files(dir: &Path, environment: &str, api_url: &str) {
    fs::write(
        dir.join("configuration.json"),
        format!(r#"{{"environment": "{}"}}"#, environment),
    )
    .expect("failed to write configuration.json");

    fs::write(
        dir.join("environment.json"),
        format!(
            r#"{{"{}": {{"api-url": "{}", "headers": "application/json"}}, "unused": {{"api-url": "http://unused.invalid"}}}}"#,
            environment, api_url
        ),
    )
    .expect("failed to write environment.json");
}

/// Run a blocking closure from an async test
pub async fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}
