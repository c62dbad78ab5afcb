use super::strategy::{
    ErrorHandlerStrategy, FileNotFoundHandler, GeneralErrorHandler, HttpStatusHandler,
    JsonDecodeHandler, RequestErrorHandler, TimeoutHandler,
};
use crate::error::{ErrorKind, HarnessError};
use crate::logging::{self, Logger};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the registry logger used by [`ErrorHandlerDispatcher::new`]
pub const LOGGER_NAME: &str = "api_harness::error_handling";

/// Selects a strategy by error kind and lets it report the failure.
///
/// Lookup is an exact match on [`ErrorKind`]; kinds without an entry use the
/// generic strategy. The dispatcher never suppresses or transforms an error.
pub struct ErrorHandlerDispatcher {
    logger: Arc<Logger>,
    handlers: HashMap<ErrorKind, Arc<dyn ErrorHandlerStrategy>>,
    fallback: Arc<dyn ErrorHandlerStrategy>,
}

impl fmt::Debug for ErrorHandlerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.handlers.keys().map(ErrorKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ErrorHandlerDispatcher")
            .field("logger", &self.logger.name())
            .field("kinds", &kinds)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl ErrorHandlerDispatcher {
    /// Dispatcher with the default strategy table, logging through the registry logger
    pub fn new() -> Self {
        Self::with_logger(logging::logger(LOGGER_NAME))
    }

    /// Dispatcher with the default strategy table, logging through `logger`
    pub fn with_logger(logger: Arc<Logger>) -> Self {
        let mut dispatcher = Self {
            logger,
            handlers: HashMap::new(),
            fallback: Arc::new(GeneralErrorHandler),
        };

        dispatcher.register(ErrorKind::MissingFile, Arc::new(FileNotFoundHandler));
        dispatcher.register(ErrorKind::Decode, Arc::new(JsonDecodeHandler));
        dispatcher.register(ErrorKind::Timeout, Arc::new(TimeoutHandler));
        dispatcher.register(ErrorKind::HttpStatus, Arc::new(HttpStatusHandler));
        dispatcher.register(ErrorKind::Request, Arc::new(RequestErrorHandler));
        dispatcher
    }

    /// Add or replace the strategy for `kind`
    pub fn register(&mut self, kind: ErrorKind, strategy: Arc<dyn ErrorHandlerStrategy>) {
        self.handlers.insert(kind, strategy);
    }

    /// Strategy selected for `error`
    pub fn handler_for(&self, error: &HarnessError) -> &dyn ErrorHandlerStrategy {
        &**self.handlers.get(&error.kind()).unwrap_or(&self.fallback)
    }

    /// Report `error` through its strategy and return it for propagation
    pub fn dispatch(&self, error: HarnessError) -> HarnessError {
        self.handler_for(&error).handle(&self.logger, error)
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl Default for ErrorHandlerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{CaptureWriter, Level};
    use std::path::PathBuf;

    fn dispatcher() -> (ErrorHandlerDispatcher, CaptureWriter) {
        let (logger, sink) = Logger::in_memory("dispatcher");
        (ErrorHandlerDispatcher::with_logger(Arc::new(logger)), sink)
    }

    fn missing_file() -> HarnessError {
        HarnessError::MissingFile {
            path: PathBuf::from("configuration.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
    }

    fn malformed_json() -> HarnessError {
        HarnessError::Decode {
            origin: "environment.json".to_string(),
            source: serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err(),
        }
    }

    #[test]
    fn test_selects_missing_file_strategy() {
        let (dispatcher, _) = dispatcher();
        assert_eq!(dispatcher.handler_for(&missing_file()).name(), "missing-file");
    }

    #[test]
    fn test_selects_decode_strategy() {
        let (dispatcher, _) = dispatcher();
        assert_eq!(dispatcher.handler_for(&malformed_json()).name(), "decode");
    }

    #[test]
    fn test_unclassified_falls_back_to_general() {
        let (dispatcher, _) = dispatcher();

        assert_eq!(dispatcher.handler_for(&HarnessError::general("runtime fault")).name(), "general");
        assert_eq!(
            dispatcher.handler_for(&HarnessError::invalid_config("bad")).name(),
            "general"
        );
    }

    #[test]
    fn test_selects_http_status_strategy() {
        let (dispatcher, _) = dispatcher();
        let error = HarnessError::HttpStatus {
            status: 500,
            url: "http://localhost".to_string(),
            body: String::new(),
        };
        assert_eq!(dispatcher.handler_for(&error).name(), "http-status");
    }

    #[test]
    fn test_dispatch_returns_original_error_after_one_line() {
        let (dispatcher, sink) = dispatcher();

        let returned = dispatcher.dispatch(malformed_json());

        match &returned {
            HarnessError::Decode { origin, source } => {
                assert_eq!(origin, "environment.json");
                assert!(source.is_eof());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(sink.lines().len(), 1);
        assert_eq!(sink.lines_at(Level::Error).len(), 1);
        assert!(sink.lines()[0].contains("Error decoding JSON"));
    }

    struct Silent;

    impl ErrorHandlerStrategy for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn describe(&self, _error: &HarnessError) -> String {
            "handled quietly".to_string()
        }
    }

    #[test]
    fn test_register_replaces_only_its_kind() {
        let (mut dispatcher, sink) = dispatcher();
        dispatcher.register(ErrorKind::Unclassified, Arc::new(Silent));

        assert_eq!(dispatcher.handler_for(&HarnessError::general("x")).name(), "silent");
        assert_eq!(dispatcher.handler_for(&missing_file()).name(), "missing-file");

        let _ = dispatcher.dispatch(HarnessError::general("x"));
        assert!(sink.lines()[0].ends_with("=>>> handled quietly"));
    }
}
