//! Command-line interface for schema-push
//!
//! Exits with the push result code: 0 on success, 999 when the schema
//! directory cannot be read, 998 when producing fails.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use schema_push::{run_push, PushArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-push")]
#[command(version)]
#[command(about = "Push Avro schemas to a schema registry by producing records to Kafka")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    push: PushArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.push.validate() {
        Cli::command().error(ErrorKind::ArgumentConflict, e).exit();
    }

    tracing::info!("starting");
    let result = run_push(&cli.push).await;
    tracing::info!(result = %result, "done");

    std::process::exit(result.code());
}
