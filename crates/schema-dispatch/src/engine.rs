use crate::broker::{BrokerClient, BrokerError, BrokerFactory, DeliveryCallback, OutgoingRecord};
use crate::error::{DispatchError, ItemError};
use crate::report::{DispatchReport, ItemOutcome};
use producer_config::ProducerConfig;
use push_types::WorkItem;
use schema_codec::{SchemaParser, SchemaRegistrationCodec, TypedRecord};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

pub type DispatchOutcome = Result<DispatchReport, DispatchError>;

/// Work items sharing one topic, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TopicGroup {
    topic: String,
    items: Vec<WorkItem>,
}

/// Partition items by topic, keeping the order in which topics first appear.
fn group_by_topic(items: &[WorkItem]) -> Vec<TopicGroup> {
    let mut groups: Vec<TopicGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match index.get(item.topic.as_str()) {
            Some(&position) => groups[position].items.push(item.clone()),
            None => {
                index.insert(item.topic.as_str(), groups.len());
                groups.push(TopicGroup {
                    topic: item.topic.clone(),
                    items: vec![item.clone()],
                });
            }
        }
    }
    groups
}

/// Sends one empty record per work item through a single broker client.
///
/// Topics are processed concurrently, items of one topic sequentially. Item
/// failures are recorded in the report; only broker client lifecycle
/// failures are returned as errors.
pub struct DispatchEngine {
    config: ProducerConfig,
    codec: Arc<SchemaRegistrationCodec>,
    factory: Arc<dyn BrokerFactory>,
    parallelism: usize,
}

impl DispatchEngine {
    pub fn new(
        config: ProducerConfig,
        codec: SchemaRegistrationCodec,
        factory: Arc<dyn BrokerFactory>,
    ) -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            config,
            codec: Arc::new(codec),
            factory,
            parallelism,
        }
    }

    /// Cap on topics processed at the same time.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub async fn push(&self, items: &[WorkItem]) -> DispatchOutcome {
        // opening may read a trust store from disk
        let broker = {
            let factory = self.factory.clone();
            let config = self.config.clone();
            tokio::task::spawn_blocking(move || factory.open(&config))
                .await
                .unwrap_or_else(|e| Err(BrokerError::Other(format!("open task failed: {e}"))))
                .map_err(DispatchError::Open)?
        };

        let groups = group_by_topic(items);
        info!(
            items = items.len(),
            topics = groups.len(),
            parallelism = self.parallelism,
            "Dispatching schema records"
        );

        let (outcomes_tx, mut outcomes_rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(self.parallelism));
        let mut workers = Vec::with_capacity(groups.len());

        for group in groups {
            let worker = TopicWorker {
                codec: self.codec.clone(),
                broker: broker.clone(),
                outcomes: outcomes_tx.clone(),
                progress: Arc::new(AtomicUsize::new(0)),
            };
            let progress = worker.progress.clone();
            let permits = permits.clone();
            let items = group.items.clone();

            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                worker.run(&items).await;
            });
            workers.push((handle, group, progress));
        }

        for (handle, group, progress) in workers {
            if let Err(err) = handle.await {
                let done = progress.load(Ordering::Acquire).min(group.items.len());
                error!(
                    topic = %group.topic,
                    error = %err,
                    unfinished = group.items.len() - done,
                    "Topic worker did not finish"
                );
                for item in &group.items[done..] {
                    let _ = outcomes_tx.send(ItemOutcome::failed(
                        item,
                        format!("topic worker did not finish: {err}"),
                    ));
                }
            }
        }
        drop(outcomes_tx);

        let flushed = {
            let broker = broker.clone();
            tokio::task::spawn_blocking(move || broker.flush())
                .await
                .unwrap_or_else(|e| Err(BrokerError::Other(format!("flush task failed: {e}"))))
        };
        let closed = broker.close();

        if let Err(err) = flushed {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close broker client after flush failure");
            }
            return Err(DispatchError::Flush(err));
        }
        closed.map_err(DispatchError::Close)?;

        // flush has run every delivery callback
        let mut outcomes = Vec::with_capacity(items.len());
        while let Ok(outcome) = outcomes_rx.try_recv() {
            outcomes.push(outcome);
        }
        let report = DispatchReport::new(outcomes);

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Dispatch finished"
        );
        Ok(report)
    }
}

struct TopicWorker {
    codec: Arc<SchemaRegistrationCodec>,
    broker: Arc<dyn BrokerClient>,
    outcomes: mpsc::UnboundedSender<ItemOutcome>,
    /// Items handled so far, counted whether or not they succeeded
    progress: Arc<AtomicUsize>,
}

impl TopicWorker {
    async fn run(&self, items: &[WorkItem]) {
        for item in items {
            if let Err(err) = self.dispatch(item).await {
                error!(
                    topic = %item.topic,
                    file = %item.file_name(),
                    error = %err,
                    "Failed to send schema record"
                );
                let _ = self.outcomes.send(ItemOutcome::failed(item, err.to_string()));
            }
            self.progress.fetch_add(1, Ordering::Release);
        }
    }

    async fn dispatch(&self, item: &WorkItem) -> Result<(), ItemError> {
        let text = tokio::fs::read_to_string(&item.schema_path).await?;
        let descriptor = SchemaParser::new().parse(&text)?;
        let record = TypedRecord::empty(descriptor)?;
        let payload = self.codec.encode(&item.topic, &record).await?;

        self.broker.send(
            OutgoingRecord::new(item.topic.as_str(), payload),
            self.on_delivery(item),
        )?;
        debug!(
            topic = %item.topic,
            file = %item.file_name(),
            record = record.full_name(),
            "Submitted schema record"
        );
        Ok(())
    }

    fn on_delivery(&self, item: &WorkItem) -> DeliveryCallback {
        let outcomes = self.outcomes.clone();
        let item = item.clone();
        Box::new(move |result| {
            let outcome = match result {
                Ok(()) => {
                    info!(
                        topic = %item.topic,
                        file = %item.file_name(),
                        "Schema record delivered"
                    );
                    ItemOutcome::succeeded(&item)
                }
                Err(err) => {
                    error!(
                        topic = %item.topic,
                        file = %item.file_name(),
                        error = %err,
                        "Schema record delivery failed"
                    );
                    ItemOutcome::failed(&item, err.to_string())
                }
            };
            let _ = outcomes.send(outcome);
        })
    }
}
