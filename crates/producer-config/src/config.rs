use std::collections::btree_map;
use std::collections::BTreeMap;
use thiserror::Error;

/// A property in the configuration holds a value of the wrong shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value '{value}' for property '{key}': expected {expected}")]
pub struct ConfigValueError {
    pub key: String,
    pub value: String,
    pub expected: &'static str,
}

/// Finalized client configuration: an ordered map of property name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerConfig {
    properties: BTreeMap<String, String>,
}

impl ProducerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Boolean property, `default` when absent. Accepts `true`/`false` in any case.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigValueError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ConfigValueError {
                    key: key.to_string(),
                    value: raw.to_string(),
                    expected: "a boolean",
                }),
            },
        }
    }

    /// 32-bit integer property, `default` when absent.
    pub fn get_i32(&self, key: &str, default: i32) -> Result<i32, ConfigValueError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| ConfigValueError {
                key: key.to_string(),
                value: raw.to_string(),
                expected: "a 32-bit integer",
            }),
        }
    }
}

impl<'a> IntoIterator for &'a ProducerConfig {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
