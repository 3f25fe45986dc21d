use crate::config::ProducerConfig;
use crate::keys;
use crate::url::{compat_endpoint, is_secured, trim_trailing_slash};
use push_types::{ConnectionInfo, StoreMaterial};

/// Build the producer configuration for a run.
///
/// Custom properties go in first; every fixed property below is written
/// afterwards and wins on collision. Inputs are not validated.
pub fn build(info: &ConnectionInfo) -> ProducerConfig {
    let mut config = ProducerConfig::new();

    for (key, value) in &info.custom_properties {
        config.set(key.as_str(), value.as_str());
    }

    let broker_url = trim_trailing_slash(&info.broker_url);
    let registry_url = compat_endpoint(trim_trailing_slash(&info.registry_url));

    config
        .set(keys::BOOTSTRAP_SERVERS, broker_url)
        .set(keys::SCHEMA_REGISTRY_URL, registry_url)
        .set(keys::ACKS, keys::ACKS_ALL)
        .set(keys::RETRIES, keys::NO_RETRIES)
        .set(keys::KEY_SERIALIZER, keys::STRING_ENCODER)
        .set(keys::VALUE_SERIALIZER, keys::SCHEMA_REGISTRATION_CODEC)
        .set(
            keys::VALUE_SUBJECT_NAME_STRATEGY,
            info.naming_strategy.as_str(),
        );

    if is_secured(broker_url) {
        config.set(keys::SECURITY_PROTOCOL, keys::PROTOCOL_SSL);
        if let Some(trust) = &info.trust_material {
            set_store(
                &mut config,
                trust,
                keys::SSL_TRUSTSTORE_LOCATION,
                keys::SSL_TRUSTSTORE_PASSWORD,
                keys::SSL_TRUSTSTORE_TYPE,
            );
        }
        if let Some(key) = &info.key_material {
            set_store(
                &mut config,
                key,
                keys::SSL_KEYSTORE_LOCATION,
                keys::SSL_KEYSTORE_PASSWORD,
                keys::SSL_KEYSTORE_TYPE,
            );
        }
    } else {
        config.set(keys::SECURITY_PROTOCOL, keys::PROTOCOL_PLAINTEXT);
        if info.trust_material.is_some() || info.key_material.is_some() {
            tracing::warn!(
                broker_url = %broker_url,
                "Ignoring TLS store material for an unsecured broker URL"
            );
        }
    }

    tracing::debug!(properties = config.len(), "Built producer configuration");
    config
}

fn set_store(
    config: &mut ProducerConfig,
    store: &StoreMaterial,
    location_key: &str,
    password_key: &str,
    type_key: &str,
) {
    config
        .set(location_key, store.path.to_string_lossy())
        .set(password_key, store.password.as_str())
        .set(type_key, keys::STORE_TYPE_PKCS12);
}

#[cfg(test)]
mod tests {
    use super::*;
    use push_types::NamingStrategy;

    const SSL_KEYS: [&str; 6] = [
        keys::SSL_TRUSTSTORE_LOCATION,
        keys::SSL_TRUSTSTORE_PASSWORD,
        keys::SSL_TRUSTSTORE_TYPE,
        keys::SSL_KEYSTORE_LOCATION,
        keys::SSL_KEYSTORE_PASSWORD,
        keys::SSL_KEYSTORE_TYPE,
    ];

    fn info(broker: &str, strategy: NamingStrategy) -> ConnectionInfo {
        ConnectionInfo::new(broker, "http://registry:8080/", strategy)
    }

    #[test]
    fn test_fixed_properties() {
        let config = build(&info("broker:9092", NamingStrategy::TopicRecord));

        assert_eq!(config.get(keys::BOOTSTRAP_SERVERS), Some("broker:9092"));
        assert_eq!(
            config.get(keys::SCHEMA_REGISTRY_URL),
            Some("http://registry:8080/apis/ccompat/v6")
        );
        assert_eq!(config.get(keys::ACKS), Some("all"));
        assert_eq!(config.get(keys::RETRIES), Some("0"));
        assert_eq!(config.get(keys::KEY_SERIALIZER), Some(keys::STRING_ENCODER));
        assert_eq!(
            config.get(keys::VALUE_SERIALIZER),
            Some(keys::SCHEMA_REGISTRATION_CODEC)
        );
    }

    #[test]
    fn test_scheme_and_strategy_combinations() {
        let cases = [
            ("https://broker:9093", keys::PROTOCOL_SSL),
            ("http://broker:9092", keys::PROTOCOL_PLAINTEXT),
            ("broker:9092", keys::PROTOCOL_PLAINTEXT),
        ];

        for (broker, protocol) in cases {
            for strategy in NamingStrategy::ALL {
                let config = build(&info(broker, strategy));
                assert_eq!(
                    config.get(keys::SCHEMA_REGISTRY_URL),
                    Some("http://registry:8080/apis/ccompat/v6"),
                    "{broker} {strategy}"
                );
                assert_eq!(config.get(keys::SECURITY_PROTOCOL), Some(protocol));
                assert_eq!(
                    config.get(keys::VALUE_SUBJECT_NAME_STRATEGY),
                    Some(strategy.as_str())
                );
            }
        }
    }

    #[test]
    fn test_broker_url_trailing_slash_is_trimmed() {
        let config = build(&info("https://broker:9093/", NamingStrategy::Topic));
        assert_eq!(
            config.get(keys::BOOTSTRAP_SERVERS),
            Some("https://broker:9093")
        );
        assert_eq!(config.get(keys::SECURITY_PROTOCOL), Some("SSL"));
    }

    #[test]
    fn test_fixed_keys_override_custom_properties() {
        let info = info("broker:9092", NamingStrategy::TopicRecord)
            .with_custom_property(keys::BOOTSTRAP_SERVERS, "elsewhere:9092")
            .with_custom_property(keys::ACKS, "1")
            .with_custom_property(keys::SECURITY_PROTOCOL, "SASL_SSL")
            .with_custom_property("linger.ms", "10")
            .with_custom_property(keys::AUTO_REGISTER_SCHEMAS, "false");

        let config = build(&info);

        assert_eq!(config.get(keys::BOOTSTRAP_SERVERS), Some("broker:9092"));
        assert_eq!(config.get(keys::ACKS), Some("all"));
        assert_eq!(config.get(keys::SECURITY_PROTOCOL), Some("PLAINTEXT"));
        // non-colliding custom keys survive
        assert_eq!(config.get("linger.ms"), Some("10"));
        assert_eq!(config.get(keys::AUTO_REGISTER_SCHEMAS), Some("false"));
    }

    #[test]
    fn test_secured_broker_with_stores() {
        let info = info("https://broker:9093", NamingStrategy::TopicRecord)
            .with_trust_material(StoreMaterial::new("/certs/trust.p12", "trustpw"))
            .with_key_material(StoreMaterial::new("/certs/key.p12", "keypw"));

        let config = build(&info);

        assert_eq!(config.get(keys::SECURITY_PROTOCOL), Some("SSL"));
        assert_eq!(
            config.get(keys::SSL_TRUSTSTORE_LOCATION),
            Some("/certs/trust.p12")
        );
        assert_eq!(config.get(keys::SSL_TRUSTSTORE_PASSWORD), Some("trustpw"));
        assert_eq!(config.get(keys::SSL_TRUSTSTORE_TYPE), Some("PKCS12"));
        assert_eq!(config.get(keys::SSL_KEYSTORE_LOCATION), Some("/certs/key.p12"));
        assert_eq!(config.get(keys::SSL_KEYSTORE_PASSWORD), Some("keypw"));
        assert_eq!(config.get(keys::SSL_KEYSTORE_TYPE), Some("PKCS12"));
    }

    #[test]
    fn test_secured_broker_without_stores_sets_no_store_properties() {
        let config = build(&info("https://broker:9093", NamingStrategy::Topic));
        assert_eq!(config.get(keys::SECURITY_PROTOCOL), Some("SSL"));
        for key in SSL_KEYS {
            assert!(!config.contains_key(key), "{key} should be absent");
        }
    }

    #[test]
    fn test_unsecured_broker_ignores_stores() {
        let info = info("http://broker:9092", NamingStrategy::TopicRecord)
            .with_trust_material(StoreMaterial::new("/certs/trust.p12", "trustpw"))
            .with_key_material(StoreMaterial::new("/certs/key.p12", "keypw"));

        let config = build(&info);

        assert_eq!(config.get(keys::SECURITY_PROTOCOL), Some("PLAINTEXT"));
        for key in SSL_KEYS {
            assert!(!config.contains_key(key), "{key} should be absent");
        }
    }
}
