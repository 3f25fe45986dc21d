//! Avro schema handling and the schema-registration value codec.
//!
//! A schema file is parsed with a fresh [`SchemaParser`], turned into an
//! empty [`TypedRecord`], and encoded by [`SchemaRegistrationCodec`]. The
//! codec resolves the record's schema id with the registry using one
//! [`RegistrationStrategy`] and writes only the 5-byte schema reference.

mod codec;
mod error;
mod schema;
mod strategy;

pub use codec::{wire_bytes, SchemaRegistrationCodec, MAGIC_BYTE, WIRE_LEN};
pub use error::{CodecError, Operation};
pub use schema::{SchemaDescriptor, SchemaError, SchemaParser, TypedRecord};
pub use strategy::RegistrationStrategy;
