mod cli;

use api_harness::{logging, HarnessError, JsonReader, RequestManager, Result};
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Send {
            method,
            endpoint,
            params,
            data,
            headers,
        } => send(method, &endpoint, params, data, headers),
        Commands::Config { path } => show_config(&path),
    };

    logging::shutdown();

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err);
        process::exit(1);
    }
}

fn send(
    method: api_harness::HttpMethod,
    endpoint: &str,
    params: Vec<(String, String)>,
    data: Option<String>,
    headers: Vec<(String, String)>,
) -> Result<()> {
    let manager = RequestManager::instance()?;

    let options = cli::build_options(manager.dispatcher(), params, data, headers)?;

    let response = manager.send_request(method, endpoint, options)?;

    println!("{} {}", response.status.to_string().green().bold(), response.url);
    match response.json_value() {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value).unwrap_or(response.body)),
        Err(_) => println!("{}", response.body),
    }
    Ok(())
}

fn show_config(path: &str) -> Result<()> {
    let configuration = JsonReader::new().get_json(path)?;
    let rendered = serde_json::to_string_pretty(&configuration).map_err(|source| HarnessError::Decode {
        origin: path.to_string(),
        source,
    })?;
    println!("{}", rendered);
    Ok(())
}
