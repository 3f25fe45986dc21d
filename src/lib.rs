//! schema-push
//!
//! Registers Avro schemas with a schema registry by producing one empty
//! marker record per (topic, schema file) pair to Kafka. The value encoder
//! registers or looks up each schema as it serializes the record.
//!
//! # CLI Usage
//!
//! ```bash
//! # Push every .avsc file under ./schemas to two topics
//! schema-push -b broker:9092 -r http://registry:8080 -d ./schemas -t orders -t payments
//!
//! # TLS broker with a PKCS#12 trust store, reusing already registered schemas
//! schema-push -b https://broker:9093 -r https://registry -d ./schemas -t orders \
//!   -j truststore.p12 -p changeit -P auto.register.schemas=false
//! ```
//!
//! # Crates
//!
//! - `push_types` - connection info, naming strategies, work items, results
//! - `producer_config` - producer configuration builder
//! - `registry_client` - schema registry clients
//! - `schema_codec` - schema parsing and the schema-registration codec
//! - `schema_dispatch` - broker clients, dispatch engine, result aggregation

use clap::Parser;
use producer_config::ProducerConfig;
use push_types::{ConnectionInfo, NamingStrategy, PushResult, StoreMaterial, WorkItem};
use registry_client::InMemoryRegistry;
use schema_codec::SchemaRegistrationCodec;
use schema_dispatch::{
    aggregate, AggregationMode, BrokerFactory, DispatchEngine, DryRunBrokerFactory,
    KafkaBrokerFactory,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub mod discovery;

pub use discovery::list_schema_files;

/// Push options, flattened into the command line.
#[derive(Parser, Clone, Debug)]
pub struct PushArgs {
    /// Kafka bootstrap server URL; an https:// URL enables TLS
    #[arg(short = 'b', long, env = "SCHEMA_PUSH_BOOTSTRAP_URL")]
    pub bootstrap_url: String,

    /// Schema registry URL
    #[arg(short = 'r', long, env = "SCHEMA_PUSH_REGISTRY_URL")]
    pub registry_url: String,

    /// Subject naming strategy: TOPIC, RECORD or TOPIC_RECORD
    #[arg(
        short = 'n',
        long,
        default_value = "TOPIC_RECORD",
        env = "SCHEMA_PUSH_NAMING_STRATEGY"
    )]
    pub naming_strategy: NamingStrategy,

    /// Directory searched recursively for schema files
    #[arg(short = 'd', long, env = "SCHEMA_PUSH_DIRECTORY")]
    pub directory: PathBuf,

    /// Topic to produce to, repeatable
    #[arg(short = 't', long = "topic", required = true)]
    pub topics: Vec<String>,

    /// Schema file extension, repeatable
    #[arg(short = 'e', long = "extension", default_value = "avsc")]
    pub extensions: Vec<String>,

    /// PKCS#12 trust store for the broker connection
    #[arg(
        short = 'j',
        long,
        env = "SCHEMA_PUSH_TRUSTSTORE_PATH",
        requires = "truststore_password"
    )]
    pub truststore_path: Option<PathBuf>,

    /// Trust store password
    #[arg(
        short = 'p',
        long,
        env = "SCHEMA_PUSH_TRUSTSTORE_PASSWORD",
        hide_env_values = true,
        requires = "truststore_path"
    )]
    pub truststore_password: Option<String>,

    /// PKCS#12 key store with the client certificate
    #[arg(
        short = 'k',
        long,
        env = "SCHEMA_PUSH_KEYSTORE_PATH",
        requires = "keystore_password"
    )]
    pub keystore_path: Option<PathBuf>,

    /// Key store password
    #[arg(
        short = 'w',
        long,
        env = "SCHEMA_PUSH_KEYSTORE_PASSWORD",
        hide_env_values = true,
        requires = "keystore_path"
    )]
    pub keystore_password: Option<String>,

    /// Extra producer property, repeatable (format: KEY=VALUE)
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Exit with PRODUCER_ERROR when any single schema fails
    #[arg(long)]
    pub fail_on_item_error: bool,

    /// Register against an in-memory registry and log records instead of producing them
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("For multiple topics, please use the default topic_record strategy.")]
    MultipleTopicsNeedTopicRecord,
}

impl PushArgs {
    /// Checks clap cannot express.
    pub fn validate(&self) -> Result<(), ArgsError> {
        if self.topics.len() > 1 && self.naming_strategy != NamingStrategy::TopicRecord {
            return Err(ArgsError::MultipleTopicsNeedTopicRecord);
        }
        Ok(())
    }

    pub fn connection_info(&self) -> ConnectionInfo {
        let mut info = ConnectionInfo::new(
            self.bootstrap_url.as_str(),
            self.registry_url.as_str(),
            self.naming_strategy,
        );
        for (key, value) in &self.properties {
            info = info.with_custom_property(key.as_str(), value.as_str());
        }
        if let (Some(path), Some(password)) = (&self.truststore_path, &self.truststore_password) {
            info = info.with_trust_material(StoreMaterial::new(path, password.as_str()));
        }
        if let (Some(path), Some(password)) = (&self.keystore_path, &self.keystore_password) {
            info = info.with_key_material(StoreMaterial::new(path, password.as_str()));
        }
        info
    }

    pub fn aggregation_mode(&self) -> AggregationMode {
        if self.fail_on_item_error {
            AggregationMode::Strict
        } else {
            AggregationMode::Lenient
        }
    }
}

/// Run one push: discover schema files, dispatch them, aggregate the outcome.
pub async fn run_push(args: &PushArgs) -> PushResult {
    let files = match list_schema_files(&args.directory, &args.extensions).await {
        Ok(files) => files,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Failed to list schema files");
            return PushResult::DirectoryError;
        }
    };
    info!(
        files = files.len(),
        topics = args.topics.len(),
        directory = %args.directory.display(),
        "Found schema files"
    );

    let items = WorkItem::cross(&args.topics, &files);
    let config = producer_config::build(&args.connection_info());

    let engine = match dispatch_engine(config, args.dry_run) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Failed to configure the schema registration codec");
            return PushResult::ProducerError;
        }
    };

    let outcome = engine.push(&items).await;
    if let Err(e) = &outcome {
        error!(error = %e, "Push failed");
    }
    aggregate(&outcome, args.aggregation_mode())
}

fn dispatch_engine(
    config: ProducerConfig,
    dry_run: bool,
) -> Result<DispatchEngine, schema_codec::CodecError> {
    let (codec, factory) = if dry_run {
        let registry = Arc::new(InMemoryRegistry::new());
        let factory: Arc<dyn BrokerFactory> = Arc::new(DryRunBrokerFactory);
        (SchemaRegistrationCodec::with_registry(&config, registry)?, factory)
    } else {
        let factory: Arc<dyn BrokerFactory> = Arc::new(KafkaBrokerFactory);
        (SchemaRegistrationCodec::configure(&config)?, factory)
    };
    Ok(DispatchEngine::new(config, codec, factory))
}
