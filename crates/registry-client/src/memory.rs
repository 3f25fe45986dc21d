use crate::error::{RegistryError, Result};
use crate::{RegisteredSchema, SchemaId, SchemaRegistry};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct State {
    /// Schema text by id; ids are `index + 1`
    schemas: Vec<String>,
    /// Per-subject list of ids, oldest version first
    subjects: HashMap<String, Vec<SchemaId>>,
}

impl State {
    fn id_of(&self, schema: &str) -> Option<SchemaId> {
        self.schemas
            .iter()
            .position(|s| s == schema)
            .map(|index| index as SchemaId + 1)
    }

    fn schema(&self, id: SchemaId) -> Option<&String> {
        id.checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.schemas.get(index))
    }
}

/// Process-local registry.
///
/// Ids are global: the same schema text gets the same id under every
/// subject. Schemas are compared verbatim, so `normalize` has no effect.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<State>,
    requests: AtomicUsize,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Subjects with at least one version, sorted.
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = self.state.lock().subjects.keys().cloned().collect();
        subjects.sort();
        subjects
    }

    fn count(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl SchemaRegistry for InMemoryRegistry {
    async fn register(&self, subject: &str, schema: &str, _normalize: bool) -> Result<SchemaId> {
        self.count();
        let mut state = self.state.lock();

        let id = match state.id_of(schema) {
            Some(id) => id,
            None => {
                state.schemas.push(schema.to_string());
                state.schemas.len() as SchemaId
            }
        };

        let versions = state.subjects.entry(subject.to_string()).or_default();
        if !versions.contains(&id) {
            versions.push(id);
        }
        Ok(id)
    }

    async fn get_id(&self, subject: &str, schema: &str, _normalize: bool) -> Result<SchemaId> {
        self.count();
        let state = self.state.lock();

        let versions = state
            .subjects
            .get(subject)
            .ok_or_else(|| RegistryError::SubjectNotFound(subject.to_string()))?;
        state
            .id_of(schema)
            .filter(|id| versions.contains(id))
            .ok_or_else(|| {
                RegistryError::SchemaNotFound(format!("schema not registered under {subject}"))
            })
    }

    async fn lookup_latest_version(&self, subject: &str) -> Result<RegisteredSchema> {
        self.count();
        let state = self.state.lock();

        let versions = state
            .subjects
            .get(subject)
            .ok_or_else(|| RegistryError::SubjectNotFound(subject.to_string()))?;
        let (index, id) = versions
            .iter()
            .copied()
            .enumerate()
            .last()
            .ok_or_else(|| RegistryError::VersionNotFound(subject.to_string()))?;
        let schema = state
            .schema(id)
            .cloned()
            .ok_or_else(|| RegistryError::SchemaNotFound(id.to_string()))?;

        Ok(RegisteredSchema {
            subject: subject.to_string(),
            id,
            version: index as i32 + 1,
            schema,
        })
    }

    async fn lookup_by_id(&self, id: SchemaId) -> Result<String> {
        self.count();
        self.state
            .lock()
            .schema(id)
            .cloned()
            .ok_or_else(|| RegistryError::SchemaNotFound(id.to_string()))
    }
}
