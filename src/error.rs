use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for api-harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Error types for configuration loading and request execution
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("File not found: {}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode JSON from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read response body from {url}: {source}")]
    BodyDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out after {}s", timeout.as_secs_f32())]
    Timeout {
        url: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String, body: String },

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Unsupported HTTP method: {method}")]
    InvalidMethod { method: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {message}")]
    General { message: String },
}

/// Tag used to select an error handler strategy for a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingFile,
    Decode,
    Timeout,
    HttpStatus,
    Request,
    Unclassified,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing-file",
            Self::Decode => "decode",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http-status",
            Self::Request => "request",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HarnessError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Classify a file read failure, keeping "not found" distinct from other I/O faults
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile { path, source }
        } else {
            Self::Io(source)
        }
    }

    /// Classify a failed send, separating timeouts and body decoding from other request faults
    pub fn from_request(source: reqwest::Error, url: &str, timeout: Duration) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout,
                source,
            }
        } else if source.is_decode() || source.is_body() {
            Self::BodyDecode {
                url: url.to_string(),
                source,
            }
        } else {
            Self::Request(source)
        }
    }

    /// The kind used for strategy lookup. Exact variant match, no hierarchy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFile { .. } => ErrorKind::MissingFile,
            Self::Decode { .. } | Self::BodyDecode { .. } => ErrorKind::Decode,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Request(_) => ErrorKind::Request,
            Self::UrlParse(_)
            | Self::InvalidMethod { .. }
            | Self::InvalidConfig { .. }
            | Self::Io(_)
            | Self::General { .. } => ErrorKind::Unclassified,
        }
    }
}
