//! JSON configuration loading
//!
//! - `types`: configuration, settings and environment descriptors
//! - `loader`: `JsonReader` file access with error reporting

pub mod loader;
pub mod types;

pub use loader::{get_json, JsonReader};
pub use types::{
    Configuration, EnvironmentDescriptor, HeaderSpec, Settings, CONFIGURATION_FILE,
    DEFAULT_CONTENT_TYPE, DEFAULT_ENVIRONMENT, ENVIRONMENT_FILE,
};
