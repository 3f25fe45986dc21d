//! Value types shared by every schema-push crate.
//!
//! Nothing in here performs I/O. The types describe what a run is asked to do
//! (`ConnectionInfo`, `WorkItem`), how registry subjects are named
//! (`NamingStrategy`), and how a run ends (`PushResult`).

mod connection;
mod naming;
mod result;
mod work;

pub use connection::{ConnectionInfo, StoreMaterial};
pub use naming::{NamingStrategy, ParseNamingStrategyError};
pub use result::PushResult;
pub use work::WorkItem;
