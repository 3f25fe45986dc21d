use crate::engine::DispatchOutcome;
use push_types::PushResult;

/// How item failures affect the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Only broker client lifecycle failures fail the run.
    #[default]
    Lenient,
    /// Any failed item fails the run as well.
    Strict,
}

/// Collapse a dispatch outcome into the process-level result.
///
/// Never yields [`PushResult::DirectoryError`]; enumeration happens before
/// dispatch.
pub fn aggregate(outcome: &DispatchOutcome, mode: AggregationMode) -> PushResult {
    match (outcome, mode) {
        (Err(_), _) => PushResult::ProducerError,
        (Ok(report), AggregationMode::Strict) if report.failed() > 0 => PushResult::ProducerError,
        (Ok(_), _) => PushResult::Success,
    }
}
