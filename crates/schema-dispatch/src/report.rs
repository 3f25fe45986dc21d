use push_types::WorkItem;
use std::path::PathBuf;

/// What happened to one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub topic: String,
    pub schema_path: PathBuf,
    /// `None` on success, otherwise the failure message
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn succeeded(item: &WorkItem) -> Self {
        Self {
            topic: item.topic.clone(),
            schema_path: item.schema_path.clone(),
            error: None,
        }
    }

    pub fn failed(item: &WorkItem, error: impl Into<String>) -> Self {
        Self {
            topic: item.topic.clone(),
            schema_path: item.schema_path.clone(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Every item outcome of one dispatch, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    outcomes: Vec<ItemOutcome>,
}

impl DispatchReport {
    pub fn new(outcomes: Vec<ItemOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}
