//! Archetype matching: category is a hard filter, construction period a soft
//! filter, and distance to the country reference point the final tie-break.

mod reference;

pub use reference::{country_distance_km, haversine_km, reference_point, EARTH_RADIUS_KM};

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::archetypes::{
    ArchetypeCatalog, ArchetypeDetails, ArchetypeRecord, ArchetypeSource, CatalogError,
    Coordinates,
};

/// Record picked from the listing, with the filters that actually narrowed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSelection {
    pub record: ArchetypeRecord,
    pub period_filter_applied: bool,
    pub geographic_match_applied: bool,
    pub distance_km: Option<f64>,
}

/// Best archetype for a building, with its derived details.
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeMatch {
    pub details: Arc<ArchetypeDetails>,
    pub period_filter_applied: bool,
    pub geographic_match_applied: bool,
    pub distance_km: Option<f64>,
}

/// Pick one record from `records` without fetching anything.
///
/// A period that matches nothing in the category is ignored rather than
/// producing an empty result. Distance ties resolve to catalog order.
pub fn select_candidate(
    records: &[ArchetypeRecord],
    category: &str,
    period: Option<&str>,
    coordinates: Option<Coordinates>,
) -> Option<CandidateSelection> {
    let in_category: Vec<&ArchetypeRecord> = records
        .iter()
        .filter(|record| record.category == category)
        .collect();
    if in_category.is_empty() {
        return None;
    }

    let (candidates, period_filter_applied) = match period {
        Some(period) => {
            let narrowed: Vec<&ArchetypeRecord> = in_category
                .iter()
                .copied()
                .filter(|record| record.construction_period().as_deref() == Some(period))
                .collect();
            if narrowed.is_empty() {
                debug!(category, period, "no archetype for period, ignoring period filter");
                (in_category, false)
            } else {
                (narrowed, true)
            }
        }
        None => (in_category, false),
    };

    let Some(origin) = coordinates else {
        debug!(category, "no coordinates supplied, taking first candidate");
        return Some(CandidateSelection {
            record: candidates[0].clone(),
            period_filter_applied,
            geographic_match_applied: false,
            distance_km: None,
        });
    };

    let mut best = candidates[0];
    let mut best_distance = country_distance_km(origin, &best.country);
    for &candidate in candidates.iter().skip(1) {
        let distance = country_distance_km(origin, &candidate.country);
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }

    let geographic_match_applied = best_distance.is_finite();
    Some(CandidateSelection {
        record: best.clone(),
        period_filter_applied,
        geographic_match_applied,
        distance_km: geographic_match_applied.then_some(best_distance),
    })
}

/// Distinct categories; with coordinates, nearest first (unmapped countries last).
pub fn order_categories(
    records: &[ArchetypeRecord],
    coordinates: Option<Coordinates>,
) -> Vec<String> {
    let mut categories: Vec<(String, f64)> = Vec::new();
    for record in records {
        let distance = coordinates
            .map(|origin| country_distance_km(origin, &record.country))
            .unwrap_or(f64::INFINITY);
        match categories.iter_mut().find(|(name, _)| *name == record.category) {
            Some((_, nearest)) => *nearest = nearest.min(distance),
            None => categories.push((record.category.clone(), distance)),
        }
    }

    if coordinates.is_some() {
        categories.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    }

    categories.into_iter().map(|(name, _)| name).collect()
}

/// Matcher over a shared catalog.
#[derive(Debug)]
pub struct GeoMatcher<S> {
    catalog: Arc<ArchetypeCatalog<S>>,
}

impl<S> Clone for GeoMatcher<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<S> GeoMatcher<S>
where
    S: ArchetypeSource,
{
    pub fn new(catalog: Arc<ArchetypeCatalog<S>>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<ArchetypeCatalog<S>> {
        &self.catalog
    }

    /// Best archetype for the building, or `None` when nothing in the category
    /// exists (or its details are missing upstream).
    pub async fn find_best(
        &self,
        category: &str,
        period: Option<&str>,
        coordinates: Option<Coordinates>,
    ) -> Result<Option<ArchetypeMatch>, CatalogError> {
        let records = self.catalog.list_all().await?;
        let Some(selection) = select_candidate(&records, category, period, coordinates) else {
            return Ok(None);
        };

        let key = selection.record.key();
        match self.catalog.get_details(&key).await {
            Ok(details) => Ok(Some(ArchetypeMatch {
                details,
                period_filter_applied: selection.period_filter_applied,
                geographic_match_applied: selection.geographic_match_applied,
                distance_km: selection.distance_km,
            })),
            Err(CatalogError::NotFound { key }) => {
                debug!(archetype = %key, "selected archetype has no details upstream");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn available_categories(
        &self,
        coordinates: Option<Coordinates>,
    ) -> Result<Vec<String>, CatalogError> {
        let records = self.catalog.list_all().await?;
        Ok(order_categories(&records, coordinates))
    }
}
