use api_harness::{ErrorHandlerDispatcher, HarnessError, HttpMethod, RequestOptions, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;

#[derive(Parser)]
#[command(name = "api-harness")]
#[command(
    author,
    version,
    about = "Send requests against the environment configured in the working directory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a request to the configured API
    Send {
        /// HTTP method (GET, POST, PUT, DELETE)
        #[clap(value_parser = parse_method)]
        method: HttpMethod,

        /// Endpoint appended to the environment's api-url
        endpoint: String,

        /// Query parameter as key=value (repeatable)
        #[clap(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// JSON request body
        #[clap(short, long)]
        data: Option<String>,

        /// Header override as name:value (repeatable)
        #[clap(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },

    /// Print a JSON file from the working directory
    Config {
        /// Path relative to the working directory
        path: String,
    },
}

/// Turn parsed `send` arguments into request options.
///
/// A `--data` value that is not JSON is reported through `dispatcher` before
/// it is returned, like any failure raised inside the request manager.
pub fn build_options(
    dispatcher: &ErrorHandlerDispatcher,
    params: Vec<(String, String)>,
    data: Option<String>,
    headers: Vec<(String, String)>,
) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();
    if !params.is_empty() {
        options.params = Some(params);
    }
    if let Some(data) = data {
        let body = serde_json::from_str(&data).map_err(|source| {
            dispatcher.dispatch(HarnessError::Decode {
                origin: "--data".to_string(),
                source,
            })
        })?;
        options = options.data(body);
    }
    if !headers.is_empty() {
        options.headers = Some(headers.into_iter().collect::<HashMap<_, _>>());
    }
    Ok(options)
}

fn parse_method(value: &str) -> std::result::Result<HttpMethod, HarnessError> {
    value.parse()
}

fn parse_param(value: &str) -> std::result::Result<(String, String), String> {
    split_pair(value, '=')
}

fn parse_header(value: &str) -> std::result::Result<(String, String), String> {
    split_pair(value, ':')
}

fn split_pair(value: &str, separator: char) -> std::result::Result<(String, String), String> {
    value
        .split_once(separator)
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected KEY{}VALUE, got '{}'", separator, value))
}
