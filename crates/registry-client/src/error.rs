use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Incompatible schema: {0}")]
    IncompatibleSchema(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Registry returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Registry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid registry URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
