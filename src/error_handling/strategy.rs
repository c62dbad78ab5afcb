use crate::error::HarnessError;
use crate::logging::Logger;

/// A stateless policy for reporting one kind of failure.
///
/// Every strategy logs a single error-level line and hands the same error
/// back so the caller can propagate it with `?`.
pub trait ErrorHandlerStrategy: Send + Sync {
    /// Short identifier, stable across runs
    fn name(&self) -> &'static str;

    /// Kind-specific message logged for `error`
    fn describe(&self, error: &HarnessError) -> String;

    /// Log `error` and return it unchanged
    fn handle(&self, logger: &Logger, error: HarnessError) -> HarnessError {
        logger.error(self.describe(&error));
        error
    }
}

/// Missing configuration or data files
#[derive(Debug, Default, Clone, Copy)]
pub struct FileNotFoundHandler;

impl ErrorHandlerStrategy for FileNotFoundHandler {
    fn name(&self) -> &'static str {
        "missing-file"
    }

    fn describe(&self, error: &HarnessError) -> String {
        match error {
            HarnessError::MissingFile { path, .. } => format!("File not found: {}", path.display()),
            other => format!("File not found: {}", other),
        }
    }
}

/// Malformed JSON in files or response bodies
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecodeHandler;

impl ErrorHandlerStrategy for JsonDecodeHandler {
    fn name(&self) -> &'static str {
        "decode"
    }

    fn describe(&self, error: &HarnessError) -> String {
        format!("Error decoding JSON: {}", error)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutHandler;

impl ErrorHandlerStrategy for TimeoutHandler {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn describe(&self, error: &HarnessError) -> String {
        format!("Request timeout: {}", error)
    }
}

/// Responses with a 4xx/5xx status; logs status code and body
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpStatusHandler;

impl ErrorHandlerStrategy for HttpStatusHandler {
    fn name(&self) -> &'static str {
        "http-status"
    }

    fn describe(&self, error: &HarnessError) -> String {
        match error {
            HarnessError::HttpStatus { status, body, .. } => format!("HTTP error. {} - {}", status, body),
            other => format!("HTTP error. {}", other),
        }
    }
}

/// Connection, redirect and other transport failures
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestErrorHandler;

impl ErrorHandlerStrategy for RequestErrorHandler {
    fn name(&self) -> &'static str {
        "request"
    }

    fn describe(&self, error: &HarnessError) -> String {
        format!("Request error: {}", error)
    }
}

/// Fallback for anything without a dedicated strategy
#[derive(Debug, Default, Clone, Copy)]
pub struct GeneralErrorHandler;

impl ErrorHandlerStrategy for GeneralErrorHandler {
    fn name(&self) -> &'static str {
        "general"
    }

    fn describe(&self, error: &HarnessError) -> String {
        format!("Unexpected error: {}", error)
    }
}
