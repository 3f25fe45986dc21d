use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rule mapping a (topic, record type) pair to a registry subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingStrategy {
    /// `{topic}-value`, e.g. `orders-value`
    Topic,
    /// The fully-qualified record name, e.g. `com.example.Order`
    Record,
    /// `{topic}-{fully-qualified record name}`, e.g. `orders-com.example.Order`
    #[default]
    TopicRecord,
}

impl NamingStrategy {
    pub const ALL: [NamingStrategy; 3] = [
        NamingStrategy::Topic,
        NamingStrategy::Record,
        NamingStrategy::TopicRecord,
    ];

    /// Name used on the command line and in the producer configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topic => "TOPIC",
            Self::Record => "RECORD",
            Self::TopicRecord => "TOPIC_RECORD",
        }
    }

    /// Derive the subject for a value produced to `topic` with the given record type.
    pub fn subject(&self, topic: &str, record_full_name: &str) -> String {
        match self {
            Self::Topic => format!("{topic}-value"),
            Self::Record => record_full_name.to_string(),
            Self::TopicRecord => format!("{topic}-{record_full_name}"),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown naming strategy '{0}', expected one of TOPIC, RECORD, TOPIC_RECORD")]
pub struct ParseNamingStrategyError(pub String);

impl FromStr for NamingStrategy {
    type Err = ParseNamingStrategyError;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| ParseNamingStrategyError(s.to_string()))
    }
}
