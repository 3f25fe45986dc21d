//! Schema registry access for schema-push.
//!
//! The [`SchemaRegistry`] trait is the seam between the schema-registration
//! codec and the registry. Three implementations live here:
//!
//! - [`HttpRegistry`] talks to a Confluent-compatible REST API (Confluent
//!   Schema Registry, or Apicurio Registry under `/apis/ccompat/v6`)
//! - [`CachedRegistry`] wraps any registry and remembers ids and schemas it
//!   has already resolved, so repeated sends do not repeat registry calls
//! - [`InMemoryRegistry`] keeps everything in process, used for dry runs and
//!   tests

mod cached;
mod error;
mod http;
mod memory;

pub use cached::CachedRegistry;
pub use error::{RegistryError, Result};
pub use http::{HttpRegistry, HttpRegistryConfig};
pub use memory::InMemoryRegistry;

use async_trait::async_trait;

/// Registry-assigned schema identifier.
pub type SchemaId = i32;

/// A schema as stored under a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSchema {
    pub subject: String,
    pub id: SchemaId,
    pub version: i32,
    /// Schema text as the registry returned it
    pub schema: String,
}

/// Operations the codec needs from a schema registry.
///
/// Implementations must be safe to share across concurrently running topic
/// workers.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// Register `schema` under `subject` and return its id. Registering a
    /// schema the subject already holds returns the existing id.
    async fn register(&self, subject: &str, schema: &str, normalize: bool) -> Result<SchemaId>;

    /// Id of `schema` under `subject`; fails if the subject does not hold it.
    async fn get_id(&self, subject: &str, schema: &str, normalize: bool) -> Result<SchemaId>;

    /// Latest version registered under `subject`.
    async fn lookup_latest_version(&self, subject: &str) -> Result<RegisteredSchema>;

    /// Schema text registered with `id`.
    async fn lookup_by_id(&self, id: SchemaId) -> Result<String>;
}
