use crate::broker::{BrokerClient, BrokerError, BrokerFactory, DeliveryCallback, OutgoingRecord};
use producer_config::ProducerConfig;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// Opens [`DryRunBroker`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunBrokerFactory;

impl BrokerFactory for DryRunBrokerFactory {
    fn open(&self, _config: &ProducerConfig) -> Result<Arc<dyn BrokerClient>, BrokerError> {
        info!("Dry run: no records will reach a broker");
        Ok(Arc::new(DryRunBroker::default()))
    }
}

/// Logs every record and acknowledges it on the spot.
#[derive(Debug, Default)]
pub struct DryRunBroker {
    sent: AtomicUsize,
    closed: AtomicBool,
}

impl DryRunBroker {
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

impl BrokerClient for DryRunBroker {
    fn send(
        &self,
        record: OutgoingRecord,
        on_delivery: DeliveryCallback,
    ) -> Result<(), BrokerError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BrokerError::Closed);
        }
        info!(
            topic = %record.topic,
            payload = ?record.payload,
            "[DRY-RUN] Would produce record"
        );
        self.sent.fetch_add(1, Ordering::Relaxed);
        on_delivery(Ok(()));
        Ok(())
    }

    fn flush(&self) -> Result<(), BrokerError> {
        Ok(())
    }

    fn close(&self) -> Result<(), BrokerError> {
        self.closed.store(true, Ordering::Release);
        info!(sent = self.sent(), "[DRY-RUN] Closed");
        Ok(())
    }
}
