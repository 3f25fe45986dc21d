use crate::error::Result;
use crate::{RegisteredSchema, SchemaId, SchemaRegistry};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SubjectSchema {
    subject: String,
    schema: String,
    normalize: bool,
}

impl SubjectSchema {
    fn new(subject: &str, schema: &str, normalize: bool) -> Self {
        Self {
            subject: subject.to_string(),
            schema: schema.to_string(),
            normalize,
        }
    }
}

/// Remembers resolved ids and schemas in front of another registry.
///
/// The schema cache only holds text the registry returned, never the text a
/// caller sent. Latest-version lookups are never cached since the answer can
/// change between calls.
pub struct CachedRegistry<R> {
    inner: R,
    ids: RwLock<HashMap<SubjectSchema, SchemaId>>,
    schemas: RwLock<HashMap<SchemaId, String>>,
}

impl<R: SchemaRegistry> CachedRegistry<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            ids: RwLock::new(HashMap::new()),
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn cached_id(&self, key: &SubjectSchema) -> Option<SchemaId> {
        self.ids.read().get(key).copied()
    }

    fn remember(&self, key: SubjectSchema, id: SchemaId) {
        self.ids.write().insert(key, id);
    }
}

#[async_trait]
impl<R: SchemaRegistry> SchemaRegistry for CachedRegistry<R> {
    async fn register(&self, subject: &str, schema: &str, normalize: bool) -> Result<SchemaId> {
        let key = SubjectSchema::new(subject, schema, normalize);
        if let Some(id) = self.cached_id(&key) {
            return Ok(id);
        }
        let id = self.inner.register(subject, schema, normalize).await?;
        self.remember(key, id);
        Ok(id)
    }

    async fn get_id(&self, subject: &str, schema: &str, normalize: bool) -> Result<SchemaId> {
        let key = SubjectSchema::new(subject, schema, normalize);
        if let Some(id) = self.cached_id(&key) {
            return Ok(id);
        }
        let id = self.inner.get_id(subject, schema, normalize).await?;
        self.remember(key, id);
        Ok(id)
    }

    async fn lookup_latest_version(&self, subject: &str) -> Result<RegisteredSchema> {
        let latest = self.inner.lookup_latest_version(subject).await?;
        self.schemas
            .write()
            .entry(latest.id)
            .or_insert_with(|| latest.schema.clone());
        Ok(latest)
    }

    async fn lookup_by_id(&self, id: SchemaId) -> Result<String> {
        let cached = self.schemas.read().get(&id).cloned();
        if let Some(schema) = cached {
            return Ok(schema);
        }
        let schema = self.inner.lookup_by_id(id).await?;
        self.schemas.write().insert(id, schema.clone());
        Ok(schema)
    }
}
