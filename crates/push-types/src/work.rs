use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// One schema file to be pushed to one topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub topic: String,
    pub schema_path: PathBuf,
}

impl WorkItem {
    pub fn new(topic: impl Into<String>, schema_path: impl Into<PathBuf>) -> Self {
        Self {
            topic: topic.into(),
            schema_path: schema_path.into(),
        }
    }

    /// Cross product of topics and schema files, topic-major.
    pub fn cross(topics: &[String], schema_paths: &[PathBuf]) -> Vec<WorkItem> {
        topics
            .iter()
            .flat_map(|topic| {
                schema_paths
                    .iter()
                    .map(move |path| WorkItem::new(topic.clone(), path.clone()))
            })
            .collect()
    }

    /// File name used in log lines.
    pub fn file_name(&self) -> Cow<'_, str> {
        file_name(&self.schema_path)
    }
}

fn file_name(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}
