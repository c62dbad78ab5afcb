use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key-value content of a JSON configuration file
pub type Configuration = serde_json::Map<String, serde_json::Value>;

/// File holding the selected environment name
pub const CONFIGURATION_FILE: &str = "configuration.json";

/// File mapping environment names to their descriptors
pub const ENVIRONMENT_FILE: &str = "environment.json";

pub const DEFAULT_ENVIRONMENT: &str = "test";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Values read from `configuration.json`.
///
/// Built leniently by [`Settings::from_configuration`]: a missing or non-string
/// `environment` falls back to the default instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub environment: String,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
        }
    }
}

impl Settings {
    /// Pick known keys out of a loaded configuration, falling back to defaults
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let environment = configuration
            .get("environment")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or_else(default_environment);

        Self { environment }
    }
}

/// Default headers for an environment: either a bare content type or a full map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderSpec {
    ContentType(String),
    Map(HashMap<String, String>),
}

impl Default for HeaderSpec {
    fn default() -> Self {
        Self::ContentType(DEFAULT_CONTENT_TYPE.to_string())
    }
}

impl HeaderSpec {
    pub fn to_headers(&self) -> HashMap<String, String> {
        match self {
            Self::ContentType(content_type) => {
                HashMap::from([("Content-Type".to_string(), content_type.clone())])
            }
            Self::Map(headers) => headers.clone(),
        }
    }
}

/// One entry of `environment.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    #[serde(rename = "api-url", default)]
    pub api_url: String,
    #[serde(default)]
    pub headers: HeaderSpec,
}
