use crate::broker::BrokerError;
use schema_codec::{CodecError, SchemaError};
use thiserror::Error;

/// Broker client lifecycle failures; these end a dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to open broker client: {0}")]
    Open(#[source] BrokerError),

    #[error("Failed to flush broker client: {0}")]
    Flush(#[source] BrokerError),

    #[error("Failed to close broker client: {0}")]
    Close(#[source] BrokerError),
}

/// Why a single work item failed before it reached the broker.
#[derive(Error, Debug)]
pub(crate) enum ItemError {
    #[error("Could not read schema file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Could not encode record: {0}")]
    Encode(#[from] CodecError),

    #[error("Broker rejected record: {0}")]
    Send(#[from] BrokerError),
}
