//! rdkafka-backed broker client.

use crate::broker::{BrokerClient, BrokerError, BrokerFactory, DeliveryCallback, OutgoingRecord};
use openssl::pkcs12::Pkcs12;
use parking_lot::RwLock;
use producer_config::{keys, ProducerConfig};
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::error::KafkaError;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::util::Timeout;
use rdkafka::{ClientConfig, ClientContext};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, trace, warn};

/// librdkafka property carrying CA certificates in PEM form.
const SSL_CA_PEM: &str = "ssl.ca.pem";

/// Store settings librdkafka has no equivalent for.
const STORE_KEYS: &[&str] = &[
    keys::SSL_TRUSTSTORE_LOCATION,
    keys::SSL_TRUSTSTORE_PASSWORD,
    keys::SSL_TRUSTSTORE_TYPE,
    keys::SSL_KEYSTORE_TYPE,
];

/// Routes librdkafka logs to tracing and runs per-record delivery callbacks.
struct DeliveryContext;

impl ClientContext for DeliveryContext {
    fn log(&self, level: RDKafkaLogLevel, fac: &str, log_message: &str) {
        match level {
            RDKafkaLogLevel::Emerg
            | RDKafkaLogLevel::Alert
            | RDKafkaLogLevel::Critical
            | RDKafkaLogLevel::Error => error!(facility = fac, "{log_message}"),
            RDKafkaLogLevel::Warning => warn!(facility = fac, "{log_message}"),
            RDKafkaLogLevel::Notice | RDKafkaLogLevel::Info => info!(facility = fac, "{log_message}"),
            RDKafkaLogLevel::Debug => debug!(facility = fac, "{log_message}"),
        }
    }

    fn error(&self, error: KafkaError, reason: &str) {
        error!(error = %error, "librdkafka: {reason}");
    }
}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = Box<Mutex<DeliveryCallback>>;

    fn delivery(&self, result: &DeliveryResult<'_>, callback: Self::DeliveryOpaque) {
        let outcome = match result {
            Ok(_) => Ok(()),
            Err((err, _)) => Err(BrokerError::Delivery(err.to_string())),
        };
        let callback = callback.into_inner().unwrap_or_else(|e| e.into_inner());
        callback(outcome);
    }
}

/// Opens [`KafkaBroker`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct KafkaBrokerFactory;

impl BrokerFactory for KafkaBrokerFactory {
    fn open(&self, config: &ProducerConfig) -> Result<Arc<dyn BrokerClient>, BrokerError> {
        let client_config = client_config(config)?;
        let producer: ThreadedProducer<DeliveryContext> =
            client_config.create_with_context(DeliveryContext)?;
        info!(
            bootstrap_servers = client_config.get(keys::BOOTSTRAP_SERVERS).unwrap_or_default(),
            "Created Kafka producer"
        );
        Ok(Arc::new(KafkaBroker {
            producer: RwLock::new(Some(producer)),
        }))
    }
}

/// Kafka producer polled on its own thread; delivery callbacks run there.
pub struct KafkaBroker {
    producer: RwLock<Option<ThreadedProducer<DeliveryContext>>>,
}

impl BrokerClient for KafkaBroker {
    fn send(
        &self,
        record: OutgoingRecord,
        on_delivery: DeliveryCallback,
    ) -> Result<(), BrokerError> {
        let guard = self.producer.read();
        let producer = guard.as_ref().ok_or(BrokerError::Closed)?;

        let mut base = BaseRecord::<str, Vec<u8>, Box<Mutex<DeliveryCallback>>>::with_opaque_to(
            &record.topic,
            Box::new(Mutex::new(on_delivery)),
        )
        .payload(&record.payload);
        if let Some(key) = record.key.as_deref() {
            base = base.key(key);
        }

        producer.send(base).map_err(|(err, _)| BrokerError::Kafka(err))?;
        trace!(topic = %record.topic, bytes = record.payload.len(), "Enqueued record");
        Ok(())
    }

    fn flush(&self) -> Result<(), BrokerError> {
        let guard = self.producer.read();
        let producer = guard.as_ref().ok_or(BrokerError::Closed)?;
        // message.timeout.ms bounds how long this can take
        producer.flush(Timeout::Never)?;
        Ok(())
    }

    fn close(&self) -> Result<(), BrokerError> {
        if let Some(producer) = self.producer.write().take() {
            let in_flight = producer.in_flight_count();
            if in_flight > 0 {
                warn!(in_flight, "Closing Kafka producer with undelivered records");
            }
            drop(producer);
            debug!("Closed Kafka producer");
        }
        Ok(())
    }
}

/// Translate the producer configuration into librdkafka settings.
pub fn client_config(config: &ProducerConfig) -> Result<ClientConfig, BrokerError> {
    let mut client = ClientConfig::new();

    for (key, value) in config {
        let key = key.as_str();
        if keys::CLIENT_SIDE_KEYS.contains(&key) || STORE_KEYS.contains(&key) {
            continue;
        }
        if key == keys::BOOTSTRAP_SERVERS {
            client.set(key, strip_schemes(value));
        } else {
            client.set(key, value);
        }
    }

    if let Some(location) = config.get(keys::SSL_TRUSTSTORE_LOCATION) {
        let password = config.get(keys::SSL_TRUSTSTORE_PASSWORD).unwrap_or_default();
        client.set(SSL_CA_PEM, truststore_pem(location, password)?);
    }

    Ok(client)
}

/// Drop `http://` and `https://` prefixes from a comma-separated server list.
fn strip_schemes(servers: &str) -> String {
    servers
        .split(',')
        .map(|server| {
            let server = server.trim();
            let server = server
                .strip_prefix("https://")
                .or_else(|| server.strip_prefix("http://"))
                .unwrap_or(server);
            server.trim_end_matches('/')
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Read every certificate out of a PKCS#12 trust store as concatenated PEM.
fn truststore_pem(location: &str, password: &str) -> Result<String, BrokerError> {
    let failed = |reason: String| BrokerError::TrustStore {
        path: location.to_string(),
        reason,
    };

    let der = std::fs::read(location).map_err(|e| failed(e.to_string()))?;
    let store = Pkcs12::from_der(&der)
        .and_then(|store| store.parse2(password))
        .map_err(|e| failed(e.to_string()))?;

    let mut pem = Vec::new();
    if let Some(cert) = &store.cert {
        pem.extend(cert.to_pem().map_err(|e| failed(e.to_string()))?);
    }
    if let Some(ca) = &store.ca {
        for cert in ca {
            pem.extend(cert.to_pem().map_err(|e| failed(e.to_string()))?);
        }
    }
    if pem.is_empty() {
        return Err(failed("no certificates found".to_string()));
    }

    String::from_utf8(pem).map_err(|e| failed(e.to_string()))
}
