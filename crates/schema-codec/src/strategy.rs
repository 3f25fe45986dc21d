use producer_config::{keys, ConfigValueError, ProducerConfig};
use registry_client::SchemaId;

/// How the codec obtains the schema id for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStrategy {
    /// Register the local schema under the subject.
    AutoRegister { normalize: bool },
    /// Use the schema pinned by id, optionally requiring it can read the local schema.
    UseSchemaId { id: SchemaId, strict: bool },
    /// Use the subject's latest version, optionally requiring it can read the local schema.
    UseLatestVersion { strict: bool },
    /// Look up the local schema, which must already be registered under the subject.
    Lookup { normalize: bool },
}

impl RegistrationStrategy {
    /// Pick the strategy from codec flags. Earlier strategies win:
    /// auto-register, then a pinned schema id, then the latest version,
    /// then a plain lookup.
    pub fn from_config(config: &ProducerConfig) -> Result<Self, ConfigValueError> {
        let normalize = config.get_bool(keys::NORMALIZE_SCHEMAS, false)?;

        if config.get_bool(keys::AUTO_REGISTER_SCHEMAS, true)? {
            return Ok(Self::AutoRegister { normalize });
        }

        let id = config.get_i32(keys::USE_SCHEMA_ID, -1)?;
        if id >= 0 {
            let strict = config.get_bool(keys::ID_COMPATIBILITY_STRICT, true)?;
            return Ok(Self::UseSchemaId { id, strict });
        }

        if config.get_bool(keys::USE_LATEST_VERSION, false)? {
            let strict = config.get_bool(keys::LATEST_COMPATIBILITY_STRICT, true)?;
            return Ok(Self::UseLatestVersion { strict });
        }

        Ok(Self::Lookup { normalize })
    }
}
