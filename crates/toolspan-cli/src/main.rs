use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde_json::{Map, Value};
use std::sync::Arc;

use toolspan_core::config::register_from_file;
use toolspan_core::{ReqwestTransport, ToolRegistry};

#[derive(Parser, Debug)]
#[clap(
    name = "Toolspan",
    author,
    version = "0.1.0",
    about = "Invoke an agent tool defined in a YAML file"
)]
struct Cli {
    #[clap(long, short, help = "Path to a tool definition YAML file")]
    config: String,

    #[clap(
        long = "arg",
        short,
        value_parser = parse_key_value,
        help = "Tool argument as key=value; the value is parsed as JSON, falling back to a plain string"
    )]
    args: Vec<(String, Value)>,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

/// Parse `key=value`, interpreting the value as JSON where possible so
/// numbers, booleans, and structured values survive the command line.
fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("invalid log level '{}'", cli.log_level))?;
    env_logger::Builder::new().filter_level(level).init();

    let mut registry = ToolRegistry::new();
    let transport = Arc::new(ReqwestTransport::new());
    let tool = register_from_file(&mut registry, &cli.config, transport)
        .await
        .with_context(|| format!("failed to load tool definition {}", cli.config))?;

    let arguments: Map<String, Value> = cli.args.into_iter().collect();
    let output = tool
        .execute(Value::Object(arguments))
        .await
        .context("tool invocation failed")?;

    println!("{output}");
    Ok(())
}
