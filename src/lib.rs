//! API Harness - helpers for automated HTTP API tests
//!
//! Provides a request manager configured from JSON files, error handler
//! strategies selected by error kind, colorized console and file logging, and
//! scenario hooks for BDD-style test runs.

// Core modules
pub mod error;
pub mod logging;

// Main functionality modules
pub mod api;
pub mod config;
pub mod error_handling;
pub mod scenario;

// Re-export main types for convenience
pub use api::{ApiResponse, HttpMethod, ManagerCell, RequestManager, RequestOptions};
pub use config::{get_json, Configuration, EnvironmentDescriptor, JsonReader, Settings};
pub use error::{ErrorKind, HarnessError, Result};
pub use error_handling::{ErrorHandlerDispatcher, ErrorHandlerStrategy};
pub use logging::{Level, Logger};
pub use scenario::{ScenarioContext, ScenarioHooks, ScenarioReport, ScenarioStatus, StepReport};
