use crate::error::{CodecError, Operation};
use crate::schema::{SchemaDescriptor, SchemaError, TypedRecord};
use crate::strategy::RegistrationStrategy;
use apache_avro::schema_compatibility::SchemaCompatibility;
use apache_avro::Schema;
use producer_config::{keys, ProducerConfig};
use push_types::NamingStrategy;
use registry_client::{
    CachedRegistry, HttpRegistry, HttpRegistryConfig, RegistryError, SchemaId, SchemaRegistry,
};
use std::sync::Arc;
use tracing::debug;

/// First byte of every encoded value.
pub const MAGIC_BYTE: u8 = 0;

/// Length of an encoded value: magic byte plus a 4-byte schema id.
pub const WIRE_LEN: usize = 5;

/// Encode a schema reference: the magic byte, then the id as big-endian.
pub fn wire_bytes(id: SchemaId) -> [u8; WIRE_LEN] {
    let mut out = [MAGIC_BYTE; WIRE_LEN];
    out[1..].copy_from_slice(&id.to_be_bytes());
    out
}

/// Value encoder that resolves the schema id of each record with the
/// registry and writes only the schema reference.
pub struct SchemaRegistrationCodec {
    registry: Arc<dyn SchemaRegistry>,
    naming: NamingStrategy,
    registration: RegistrationStrategy,
}

impl SchemaRegistrationCodec {
    pub fn new(
        registry: Arc<dyn SchemaRegistry>,
        naming: NamingStrategy,
        registration: RegistrationStrategy,
    ) -> Self {
        Self {
            registry,
            naming,
            registration,
        }
    }

    /// Configure against the HTTP registry named by `schema.registry.url`,
    /// with a cache in front of it.
    pub fn configure(config: &ProducerConfig) -> Result<Self, CodecError> {
        let url = config
            .get(keys::SCHEMA_REGISTRY_URL)
            .ok_or(CodecError::MissingProperty(keys::SCHEMA_REGISTRY_URL))?;

        let mut client_config = HttpRegistryConfig::new(url);
        let source = config.get(keys::BASIC_AUTH_CREDENTIALS_SOURCE);
        if source.is_some_and(|source| source.eq_ignore_ascii_case("USER_INFO")) {
            if let Some(user_info) = config.get(keys::BASIC_AUTH_USER_INFO) {
                client_config = client_config.with_user_info(user_info);
            }
        }

        let client = HttpRegistry::new(client_config).map_err(CodecError::Client)?;
        Self::with_registry(config, Arc::new(CachedRegistry::new(client)))
    }

    /// Configure against an existing registry handle.
    pub fn with_registry(
        config: &ProducerConfig,
        registry: Arc<dyn SchemaRegistry>,
    ) -> Result<Self, CodecError> {
        let naming = match config.get(keys::VALUE_SUBJECT_NAME_STRATEGY) {
            Some(name) => name.parse()?,
            None => NamingStrategy::default(),
        };
        let registration = RegistrationStrategy::from_config(config)?;

        debug!(
            naming_strategy = %naming,
            registration = ?registration,
            "Configured schema registration codec"
        );
        Ok(Self::new(registry, naming, registration))
    }

    pub fn naming_strategy(&self) -> NamingStrategy {
        self.naming
    }

    pub fn registration(&self) -> RegistrationStrategy {
        self.registration
    }

    pub fn subject(&self, topic: &str, record: &TypedRecord) -> String {
        self.naming.subject(topic, record.full_name())
    }

    /// Resolve the record's schema id under the subject for `topic` and
    /// return the encoded value.
    pub async fn encode(&self, topic: &str, record: &TypedRecord) -> Result<Vec<u8>, CodecError> {
        let subject = self.subject(topic, record);
        let id = self.resolve_id(&subject, record.descriptor()).await?;
        debug!(topic, subject = %subject, schema_id = id, "Encoded schema reference");
        Ok(wire_bytes(id).to_vec())
    }

    async fn resolve_id(
        &self,
        subject: &str,
        local: &SchemaDescriptor,
    ) -> Result<SchemaId, CodecError> {
        match self.registration {
            RegistrationStrategy::AutoRegister { normalize } => self
                .registry
                .register(subject, local.text(), normalize)
                .await
                .map_err(registry_error(Operation::Register, subject)),

            RegistrationStrategy::UseSchemaId { id, strict } => {
                let pinned = self
                    .registry
                    .lookup_by_id(id)
                    .await
                    .map_err(registry_error(Operation::LookupById, subject))?;
                if strict {
                    ensure_readable(local, &pinned, subject, id)?;
                }
                self.registry
                    .get_id(subject, &pinned, false)
                    .await
                    .map_err(registry_error(Operation::LookupId, subject))
            }

            RegistrationStrategy::UseLatestVersion { strict } => {
                let latest = self
                    .registry
                    .lookup_latest_version(subject)
                    .await
                    .map_err(registry_error(Operation::LookupLatestVersion, subject))?;
                if strict {
                    ensure_readable(local, &latest.schema, subject, latest.id)?;
                }
                Ok(latest.id)
            }

            RegistrationStrategy::Lookup { normalize } => self
                .registry
                .get_id(subject, local.text(), normalize)
                .await
                .map_err(registry_error(Operation::LookupId, subject)),
        }
    }
}

fn registry_error(
    operation: Operation,
    subject: &str,
) -> impl FnOnce(RegistryError) -> CodecError + '_ {
    move |source| CodecError::Registry {
        operation,
        subject: subject.to_string(),
        source,
    }
}

/// The registry's schema must be able to read data written with the local one.
fn ensure_readable(
    local: &SchemaDescriptor,
    remote: &str,
    subject: &str,
    id: SchemaId,
) -> Result<(), CodecError> {
    let reader = Schema::parse_str(remote).map_err(|e| CodecError::RemoteSchema {
        id,
        source: SchemaError::Parse(e),
    })?;
    if SchemaCompatibility::can_read(local.schema(), &reader) {
        Ok(())
    } else {
        Err(CodecError::Incompatible {
            subject: subject.to_string(),
            id,
        })
    }
}
