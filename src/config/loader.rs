use crate::config::types::{
    Configuration, EnvironmentDescriptor, Settings, CONFIGURATION_FILE, ENVIRONMENT_FILE,
};
use crate::error::{HarnessError, Result};
use crate::error_handling::ErrorHandlerDispatcher;
use crate::logging::{self, Logger};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Name of the registry logger used by the default constructors
pub const LOGGER_NAME: &str = "api_harness::config";

/// Reads JSON files relative to a root directory.
///
/// Without an explicit root, paths resolve against the working directory at
/// the time of each read.
#[derive(Debug)]
pub struct JsonReader {
    root: Option<PathBuf>,
    logger: Arc<Logger>,
    dispatcher: Arc<ErrorHandlerDispatcher>,
    reads: AtomicUsize,
}

impl JsonReader {
    /// Reader resolving against the current working directory
    pub fn new() -> Self {
        Self::with_logging(
            None,
            logging::logger(LOGGER_NAME),
            Arc::new(ErrorHandlerDispatcher::new()),
        )
    }

    /// Reader resolving against `root`
    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_logging(
            Some(root.into()),
            logging::logger(LOGGER_NAME),
            Arc::new(ErrorHandlerDispatcher::new()),
        )
    }

    pub fn with_logging(
        root: Option<PathBuf>,
        logger: Arc<Logger>,
        dispatcher: Arc<ErrorHandlerDispatcher>,
    ) -> Self {
        Self {
            root,
            logger,
            dispatcher,
            reads: AtomicUsize::new(0),
        }
    }

    /// Absolute location for `path`; leading slashes are stripped so the path stays relative
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => env::current_dir()?,
        };
        Ok(root.join(path.trim_start_matches('/')))
    }

    /// Number of read attempts made through this reader
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn dispatcher(&self) -> &Arc<ErrorHandlerDispatcher> {
        &self.dispatcher
    }

    /// Load a JSON object file.
    ///
    /// A missing file, malformed content or a non-object top level is reported
    /// through the dispatcher and returned; there is no silent default.
    pub fn get_json(&self, path: &str) -> Result<Configuration> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let configuration = self
            .read_object(path)
            .map_err(|err| self.dispatcher.dispatch(err))?;

        self.logger
            .info(format!("Successfully read JSON file: \"{}\"", path));
        Ok(configuration)
    }

    fn read_object(&self, path: &str) -> Result<Configuration> {
        let location = self.resolve(path)?;
        let content =
            fs::read_to_string(&location).map_err(|err| HarnessError::from_io(location.clone(), err))?;

        serde_json::from_str(&content).map_err(|source| HarnessError::Decode {
            origin: path.to_string(),
            source,
        })
    }

    /// Settings from `configuration.json`
    pub fn load_settings(&self) -> Result<Settings> {
        let configuration = self.get_json(CONFIGURATION_FILE)?;
        Ok(Settings::from_configuration(&configuration))
    }

    /// Descriptor for `name` from `environment.json`; unknown names get defaults
    pub fn load_environment(&self, name: &str) -> Result<EnvironmentDescriptor> {
        let environments = self.get_json(ENVIRONMENT_FILE)?;

        match environments.get(name) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|source| {
                self.dispatcher.dispatch(HarnessError::Decode {
                    origin: format!("{} [{}]", ENVIRONMENT_FILE, name),
                    source,
                })
            }),
            None => {
                self.logger.warning(format!(
                    "Environment \"{}\" not found in {}, using defaults",
                    name, ENVIRONMENT_FILE
                ));
                Ok(EnvironmentDescriptor::default())
            }
        }
    }
}

impl Default for JsonReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a JSON object file relative to the current working directory
pub fn get_json(path: &str) -> Result<Configuration> {
    JsonReader::new().get_json(path)
}
