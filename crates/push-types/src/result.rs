use std::fmt;

/// Terminal status of one push run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushResult {
    /// Every lifecycle step of the broker client completed
    Success,
    /// Listing the schema directory failed before anything was sent
    DirectoryError,
    /// The broker client could not be opened, flushed or closed
    ProducerError,
}

impl PushResult {
    /// Process exit status for this result.
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::DirectoryError => 999,
            Self::ProducerError => 998,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for PushResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::DirectoryError => "DIRECTORY_ERROR",
            Self::ProducerError => "PRODUCER_ERROR",
        };
        write!(f, "{name} ({})", self.code())
    }
}
