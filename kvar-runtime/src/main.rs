mod output;
mod telemetry;

use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use kvar_consul::ConsulClient;
use kvar_core::{config::Config, metric, types::SharedClient};
use kvar_resolver::{TaskRunner, VariableResolver};
use prometheus::Encoder;

const VARIABLES_TASK_NAME: &str = "kvar.runtime.variables";

#[derive(Parser)]
#[command(name = "kvar-runtime", about = "Resolve Consul-backed variables")]
struct Cli {
    /// Dump prometheus metrics to stderr once the command completes
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve all configured variables and print them as JSON
    Resolve,
    /// Fetch a single key
    Get { key: String },
    /// Write a single key
    Set { key: String, value: String },
}

async fn run(
    command: Command,
    config: &Config,
    resolver: &VariableResolver,
) -> anyhow::Result<()> {
    match command {
        Command::Resolve => {
            let rendered = resolve_variables(config, resolver).await?;
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        Command::Get { key } => match resolver.get_by_key(&key).await? {
            Some(value) => println!("{}", output::render_value(&value)),
            None => bail!("key '{}' is not set", key),
        },
        Command::Set { key, value } => {
            resolver.set_by_key(&key, value).await?;
            tracing::info!("wrote key: '{}'", key);
        }
    }

    Ok(())
}

/// Runs the configured variables as a startup task and renders every cached
/// value.
async fn resolve_variables(
    config: &Config,
    resolver: &VariableResolver,
) -> anyhow::Result<serde_json::Value> {
    let runner = TaskRunner::new().with_task(
        resolver
            .task(config.variables.clone())
            .named(VARIABLES_TASK_NAME),
    );

    runner.run_all().await?;

    Ok(output::render_snapshot(&resolver.snapshot())?)
}

fn dump_metrics() -> anyhow::Result<()> {
    let registry = prometheus::Registry::new();
    metric::register(&registry)?;

    let mut buffer = vec![];
    prometheus::TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    eprintln!("{}", String::from_utf8(buffer)?);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let config = Config::new()?;

    telemetry::setup(&config)?;

    let client: SharedClient = Arc::new(ConsulClient::new(&config.consul)?);
    let resolver = VariableResolver::new(client);

    let result = run(cli.command.unwrap_or(Command::Resolve), &config, &resolver).await;

    if cli.metrics {
        dump_metrics()?;
    }

    result
}
