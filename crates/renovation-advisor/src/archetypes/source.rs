use std::collections::HashMap;
use std::future::Future;

use serde_json::Value;

use super::domain::{ArchetypeKey, ArchetypeRecord};
use super::payload::ArchetypePayload;

/// Transport-level failure talking to the archetype-data service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("archetype service unreachable: {0}")]
    Transport(String),
    #[error("archetype service responded with status {status}")]
    Status { status: u16 },
    #[error("malformed archetype payload: {0}")]
    Decode(String),
    #[error("archetype not found upstream")]
    NotFound,
}

/// Upstream provider of the archetype listing and per-archetype payloads.
///
/// The catalog is generic over this trait so the HTTP client can be swapped
/// for an in-memory source in tests and offline demos.
pub trait ArchetypeSource: Send + Sync {
    fn list_archetypes(
        &self,
    ) -> impl Future<Output = Result<Vec<ArchetypeRecord>, SourceError>> + Send;

    fn fetch_archetype(
        &self,
        key: &ArchetypeKey,
    ) -> impl Future<Output = Result<ArchetypePayload, SourceError>> + Send;
}

/// Source backed by raw `{building, system}` documents held in memory.
///
/// Payloads are ingested on every fetch, exactly as an HTTP response would be.
#[derive(Debug, Clone, Default)]
pub struct StaticArchetypeSource {
    records: Vec<ArchetypeRecord>,
    payloads: HashMap<String, Value>,
}

impl StaticArchetypeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_archetype(mut self, record: ArchetypeRecord, detail: Value) -> Self {
        self.payloads.insert(record.key().cache_key(), detail);
        self.records.push(record);
        self
    }

    /// List a record without a detail payload; fetching it reports not found.
    pub fn with_listing_only(mut self, record: ArchetypeRecord) -> Self {
        self.records.push(record);
        self
    }
}

impl ArchetypeSource for StaticArchetypeSource {
    fn list_archetypes(
        &self,
    ) -> impl Future<Output = Result<Vec<ArchetypeRecord>, SourceError>> + Send {
        let records = self.records.clone();
        async move { Ok(records) }
    }

    fn fetch_archetype(
        &self,
        key: &ArchetypeKey,
    ) -> impl Future<Output = Result<ArchetypePayload, SourceError>> + Send {
        let raw = self.payloads.get(&key.cache_key()).cloned();
        async move {
            match raw {
                Some(raw) => ArchetypePayload::ingest(raw),
                None => Err(SourceError::NotFound),
            }
        }
    }
}
