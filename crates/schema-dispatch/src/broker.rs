//! The broker client seam.

use producer_config::ProducerConfig;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Could not load trust store '{path}': {reason}")]
    TrustStore { path: String, reason: String },

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Broker client is closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

/// Invoked exactly once with the delivery result of an accepted record.
pub type DeliveryCallback = Box<dyn FnOnce(Result<(), BrokerError>) + Send + 'static>;

/// A record ready to be handed to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRecord {
    pub topic: String,
    pub key: Option<String>,
    pub payload: Vec<u8>,
}

impl OutgoingRecord {
    pub fn new(topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            payload,
        }
    }
}

/// A producing client shared by every topic worker of one run.
pub trait BrokerClient: Send + Sync {
    /// Enqueue a record without waiting for acknowledgment. When the record
    /// is rejected up front the error is returned and `on_delivery` is
    /// dropped without being called.
    fn send(&self, record: OutgoingRecord, on_delivery: DeliveryCallback)
        -> Result<(), BrokerError>;

    /// Block until every accepted record has been acknowledged or failed.
    fn flush(&self) -> Result<(), BrokerError>;

    /// Release the client. Sends after close fail with [`BrokerError::Closed`].
    fn close(&self) -> Result<(), BrokerError>;
}

/// Opens one broker client per run.
pub trait BrokerFactory: Send + Sync {
    fn open(&self, config: &ProducerConfig) -> Result<Arc<dyn BrokerClient>, BrokerError>;
}
