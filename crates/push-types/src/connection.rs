use crate::NamingStrategy;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A PKCS#12 store on disk together with the password that opens it.
///
/// Location and password only exist as a pair, so a half-specified store
/// cannot reach the configuration builder.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreMaterial {
    pub path: PathBuf,
    pub password: String,
}

impl StoreMaterial {
    pub fn new(path: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs.
impl fmt::Debug for StoreMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreMaterial")
            .field("path", &self.path)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to reach the broker and the registry for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Broker bootstrap URL, e.g. `https://broker:9093`
    pub broker_url: String,
    /// Registry base URL; the compatibility API path is appended by the builder
    pub registry_url: String,
    pub naming_strategy: NamingStrategy,
    /// Extra client properties, applied before the fixed ones
    pub custom_properties: BTreeMap<String, String>,
    pub trust_material: Option<StoreMaterial>,
    pub key_material: Option<StoreMaterial>,
}

impl ConnectionInfo {
    pub fn new(
        broker_url: impl Into<String>,
        registry_url: impl Into<String>,
        naming_strategy: NamingStrategy,
    ) -> Self {
        Self {
            broker_url: broker_url.into(),
            registry_url: registry_url.into(),
            naming_strategy,
            custom_properties: BTreeMap::new(),
            trust_material: None,
            key_material: None,
        }
    }

    pub fn with_custom_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_trust_material(mut self, material: StoreMaterial) -> Self {
        self.trust_material = Some(material);
        self
    }

    pub fn with_key_material(mut self, material: StoreMaterial) -> Self {
        self.key_material = Some(material);
        self
    }
}
