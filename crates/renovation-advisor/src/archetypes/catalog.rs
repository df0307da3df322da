use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    ArchetypeDetails, ArchetypeKey, ArchetypeRecord, BuildingOptions, CatalogStatus,
};
use super::source::{ArchetypeSource, SourceError};

/// Failure surfaced by the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Upstream unreachable or returned something unusable; safe to retry.
    #[error(transparent)]
    Retrieval(SourceError),
    #[error("no archetype matches {key}")]
    NotFound { key: ArchetypeKey },
}

#[derive(Debug, Clone)]
struct CachedListing {
    records: Arc<[ArchetypeRecord]>,
    fetched_at: DateTime<Utc>,
}

/// Memoizing front for an [`ArchetypeSource`].
///
/// Entries are only ever added; [`ArchetypeCatalog::reset`] is the single way
/// to drop them. Locks are never held across a fetch, so two concurrent misses
/// on the same key both hit the source and the later write wins.
#[derive(Debug)]
pub struct ArchetypeCatalog<S> {
    source: S,
    listing: RwLock<Option<CachedListing>>,
    details: RwLock<HashMap<String, Arc<ArchetypeDetails>>>,
}

impl<S> ArchetypeCatalog<S>
where
    S: ArchetypeSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            listing: RwLock::new(None),
            details: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Full listing, fetched once and then served from memory.
    pub async fn list_all(&self) -> Result<Arc<[ArchetypeRecord]>, CatalogError> {
        if let Some(cached) = self.cached_listing() {
            return Ok(cached);
        }

        debug!("archetype listing cache miss");
        let records = self.source.list_archetypes().await.map_err(|err| {
            warn!(error = %err, "archetype listing fetch failed");
            CatalogError::Retrieval(err)
        })?;

        let records: Arc<[ArchetypeRecord]> = records.into();
        let mut guard = self.listing.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedListing {
            records: Arc::clone(&records),
            fetched_at: Utc::now(),
        });
        info!(count = records.len(), "archetype listing cached");

        Ok(records)
    }

    /// Listing restricted to a country and/or category.
    pub async fn list_filtered(
        &self,
        country: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<ArchetypeRecord>, CatalogError> {
        let records = self.list_all().await?;
        Ok(records
            .iter()
            .filter(|record| country.map_or(true, |c| record.country == c))
            .filter(|record| category.map_or(true, |c| record.category == c))
            .cloned()
            .collect())
    }

    /// Number of archetypes in `category` whose name encodes `period`.
    ///
    /// Archetypes without a parseable period only count when no period is given.
    pub async fn count_matching(
        &self,
        category: Option<&str>,
        period: Option<&str>,
    ) -> Result<usize, CatalogError> {
        let records = self.list_all().await?;
        Ok(records
            .iter()
            .filter(|record| category.map_or(true, |c| record.category == c))
            .filter(|record| match period {
                Some(period) => record.construction_period().as_deref() == Some(period),
                None => true,
            })
            .count())
    }

    pub async fn building_options(&self) -> Result<BuildingOptions, CatalogError> {
        let records = self.list_all().await?;
        Ok(BuildingOptions::from_records(&records))
    }

    /// Details for one archetype, fetched and derived on first request.
    pub async fn get_details(
        &self,
        key: &ArchetypeKey,
    ) -> Result<Arc<ArchetypeDetails>, CatalogError> {
        let cache_key = key.cache_key();
        if let Some(details) = self.cached_details(&cache_key) {
            debug!(archetype = %cache_key, "archetype details cache hit");
            return Ok(details);
        }

        debug!(archetype = %cache_key, "archetype details cache miss");
        let payload = match self.source.fetch_archetype(key).await {
            Ok(payload) => payload,
            Err(SourceError::NotFound) => {
                return Err(CatalogError::NotFound { key: key.clone() })
            }
            Err(err) => {
                warn!(archetype = %cache_key, error = %err, "archetype detail fetch failed");
                return Err(CatalogError::Retrieval(err));
            }
        };

        let record = ArchetypeRecord {
            category: key.category.clone(),
            country: key.country.clone(),
            name: key.name.clone(),
        };
        let details = Arc::new(ArchetypeDetails::derive(record, payload.bui, payload.system));

        let mut guard = self.details.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(cache_key, Arc::clone(&details));

        Ok(details)
    }

    /// Drop every cached entry; the next call refetches.
    pub fn reset(&self) {
        *self.listing.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.details
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        info!("archetype catalog cache cleared");
    }

    pub fn status(&self) -> CatalogStatus {
        let listing = self.listing.read().unwrap_or_else(PoisonError::into_inner);
        let details = self.details.read().unwrap_or_else(PoisonError::into_inner);

        CatalogStatus {
            listing_cached: listing.is_some(),
            listing_size: listing.as_ref().map_or(0, |cached| cached.records.len()),
            details_cached: details.len(),
            listing_fetched_at: listing.as_ref().map(|cached| cached.fetched_at),
        }
    }

    fn cached_listing(&self) -> Option<Arc<[ArchetypeRecord]>> {
        self.listing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| Arc::clone(&cached.records))
    }

    fn cached_details(&self, cache_key: &str) -> Option<Arc<ArchetypeDetails>> {
        self.details
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cache_key)
            .cloned()
    }
}
