//! Producer configuration for schema-push.
//!
//! [`build`] turns a [`push_types::ConnectionInfo`] into a [`ProducerConfig`]:
//! a flat, ordered property map in the vocabulary of Kafka client properties.
//! The same map configures both the schema-registration codec (registry URL,
//! naming strategy, registration flags) and the broker client (everything
//! else), mirroring how a Kafka producer hands its properties to its
//! serializers.
//!
//! Custom properties are applied first and the fixed properties afterwards,
//! so a custom value for a fixed key is always replaced.

mod builder;
mod config;
pub mod keys;
pub mod url;

pub use builder::build;
pub use config::{ConfigValueError, ProducerConfig};
