//! Schema record dispatch.
//!
//! [`DispatchEngine`] turns each (topic, schema file) work item into an empty
//! record, encodes it with the schema-registration codec and sends it through
//! one broker client. [`aggregate`] reduces the outcome to a [`PushResult`].
//!
//! [`PushResult`]: push_types::PushResult

mod aggregate;
mod broker;
mod dry_run;
mod engine;
mod error;
mod kafka;
mod report;

pub use aggregate::{aggregate, AggregationMode};
pub use broker::{BrokerClient, BrokerError, BrokerFactory, DeliveryCallback, OutgoingRecord};
pub use dry_run::{DryRunBroker, DryRunBrokerFactory};
pub use engine::{DispatchEngine, DispatchOutcome};
pub use error::DispatchError;
pub use kafka::{client_config, KafkaBroker, KafkaBrokerFactory};
pub use report::{DispatchReport, ItemOutcome};
