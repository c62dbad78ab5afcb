use crate::api::method::HttpMethod;
use crate::api::response::ApiResponse;
use crate::config::JsonReader;
use crate::error::{HarnessError, Result};
use crate::error_handling::ErrorHandlerDispatcher;
use crate::logging::{self, Logger};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Deadline applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Name of the registry logger used by the default constructors
pub const LOGGER_NAME: &str = "api_harness::api";

/// Optional per-call inputs: query parameters, JSON body and header overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub params: Option<Vec<(String, String)>>,
    pub data: Option<serde_json::Value>,
    pub headers: Option<HashMap<String, String>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.params
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Join a base URL and an endpoint with exactly one separating slash
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Merge default headers with overrides; overrides win, names compare case-insensitively.
///
/// Overrides apply in byte order of their names, so when one map holds two
/// spellings of a header (`X-Id` and `x-id`) the later one in that order wins.
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    overrides: Option<&HashMap<String, String>>,
) -> HashMap<String, String> {
    let mut merged = defaults.clone();

    if let Some(overrides) = overrides {
        let mut ordered: Vec<_> = overrides.iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(b.0));

        for (name, value) in ordered {
            merged.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            merged.insert(name.clone(), value.clone());
        }
    }

    merged
}

/// Sends requests against one configured base URL with default headers.
///
/// Every failure is reported through the dispatcher before it is returned, so
/// callers get one error line per failed call without logging it themselves.
pub struct RequestManager {
    base_url: String,
    headers: HashMap<String, String>,
    timeout: Duration,
    client: Client,
    logger: Arc<Logger>,
    dispatcher: Arc<ErrorHandlerDispatcher>,
}

impl fmt::Debug for RequestManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestManager")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RequestManager {
    /// Manager logging through the registry loggers
    pub fn new<S: Into<String>>(base_url: S, headers: HashMap<String, String>) -> Result<Self> {
        Self::with_logging(
            base_url,
            headers,
            logging::logger(LOGGER_NAME),
            Arc::new(ErrorHandlerDispatcher::new()),
        )
    }

    pub fn with_logging<S: Into<String>>(
        base_url: S,
        headers: HashMap<String, String>,
        logger: Arc<Logger>,
        dispatcher: Arc<ErrorHandlerDispatcher>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| dispatcher.dispatch(HarnessError::Request(err)))?;

        Ok(Self {
            base_url: base_url.into(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            client,
            logger,
            dispatcher,
        })
    }

    /// Build a manager from `configuration.json` and `environment.json` under the reader's root
    pub fn from_reader(reader: &JsonReader, logger: Arc<Logger>) -> Result<Self> {
        let settings = reader.load_settings()?;
        let environment = reader.load_environment(&settings.environment)?;

        let manager = Self::with_logging(
            environment.api_url,
            environment.headers.to_headers(),
            logger,
            reader.dispatcher().clone(),
        )?;

        manager.logger.debug(format!(
            "Request manager ready for environment \"{}\" at {}",
            settings.environment, manager.base_url
        ));
        Ok(manager)
    }

    /// Process-wide manager configured from the working directory, built on first use
    pub fn instance() -> Result<&'static RequestManager> {
        static INSTANCE: ManagerCell = ManagerCell::new();

        INSTANCE.get_or_try_init(|| {
            RequestManager::from_reader(&JsonReader::new(), logging::logger(LOGGER_NAME))
        })
    }

    /// Replace the request deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Dispatcher every failure of this manager is reported through
    pub fn dispatcher(&self) -> &Arc<ErrorHandlerDispatcher> {
        &self.dispatcher
    }

    /// Fully qualified URL for `endpoint`
    pub fn url_for(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    /// Send a request and return the response only on full success.
    ///
    /// Network faults, timeouts, unreadable bodies and 4xx/5xx statuses are
    /// all reported through the dispatcher and returned as errors.
    pub fn send_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        self.execute(method, endpoint, &options)
            .map_err(|err| self.dispatcher.dispatch(err))
    }

    fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let url = self.url_for(endpoint);
        let headers = merge_headers(&self.headers, options.headers.as_ref());

        self.logger
            .info(format!("Sending {} request to {}", method, url));

        let parsed = Url::parse(&url)?;
        let mut request = self
            .client
            .request(method.into(), parsed)
            .timeout(self.timeout);

        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(params) = &options.params {
            request = request.query(params);
        }

        if let Some(data) = &options.data {
            request = request.json(data);
        }

        let response = request
            .send()
            .map_err(|err| HarnessError::from_request(err, &url, self.timeout))?;

        let response = ApiResponse::from_blocking(response).map_err(|err| match err {
            HarnessError::BodyDecode { url, source } if source.is_timeout() => HarnessError::Timeout {
                url,
                timeout: self.timeout,
                source,
            },
            other => other,
        })?;

        if response.is_error() {
            return Err(HarnessError::HttpStatus {
                status: response.status,
                url: response.url,
                body: response.body,
            });
        }

        Ok(response)
    }
}

/// Holder that builds a [`RequestManager`] at most once.
///
/// Concurrent first calls race safely: one initializer runs and the others
/// wait for its result. A failed initialization leaves the cell empty.
#[derive(Debug, Default)]
pub struct ManagerCell {
    cell: OnceCell<RequestManager>,
}

impl ManagerCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Option<&RequestManager> {
        self.cell.get()
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Result<&RequestManager>
    where
        F: FnOnce() -> Result<RequestManager>,
    {
        self.cell.get_or_try_init(init)
    }

    /// Build from the reader's configuration files on first call; later calls reuse it
    pub fn get_or_init_from(&self, reader: &JsonReader, logger: Arc<Logger>) -> Result<&RequestManager> {
        self.get_or_try_init(|| RequestManager::from_reader(reader, logger))
    }
}
