use crate::schema::SchemaError;
use producer_config::ConfigValueError;
use push_types::ParseNamingStrategyError;
use registry_client::{RegistryError, SchemaId};
use thiserror::Error;

/// Registry operation being attempted when encoding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    LookupId,
    LookupById,
    LookupLatestVersion,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Register => "registering schema",
            Operation::LookupId => "retrieving schema id",
            Operation::LookupById => "retrieving schema by id",
            Operation::LookupLatestVersion => "retrieving latest schema version",
        })
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Error {operation} for subject '{subject}': {source}")]
    Registry {
        operation: Operation,
        subject: String,
        #[source]
        source: RegistryError,
    },

    #[error("Schema {id} under subject '{subject}' cannot read data written with the local schema")]
    Incompatible { subject: String, id: SchemaId },

    #[error("Schema {id} returned by the registry is unusable: {source}")]
    RemoteSchema {
        id: SchemaId,
        #[source]
        source: SchemaError,
    },

    #[error("Missing producer property '{0}'")]
    MissingProperty(&'static str),

    #[error(transparent)]
    InvalidProperty(#[from] ConfigValueError),

    #[error(transparent)]
    NamingStrategy(#[from] ParseNamingStrategyError),

    #[error("Could not create registry client: {0}")]
    Client(#[source] RegistryError),
}

impl CodecError {
    /// Operation that failed, for registry errors.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            CodecError::Registry { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
