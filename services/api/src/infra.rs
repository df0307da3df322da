use metrics_exporter_prometheus::PrometheusHandle;
use renovation_advisor::archetypes::{ArchetypeCatalog, ArchetypeSource, Coordinates};
use renovation_advisor::error::AppError;
use renovation_advisor::matching::GeoMatcher;
use renovation_advisor::ranking::{CriteriaValues, ScenarioEvaluation, ScenarioRanker};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog and matcher shared by every request.
pub(crate) struct AdvisorService<S> {
    matcher: GeoMatcher<S>,
}

impl<S> AdvisorService<S>
where
    S: ArchetypeSource,
{
    pub(crate) fn new(source: S) -> Self {
        Self {
            matcher: GeoMatcher::new(Arc::new(ArchetypeCatalog::new(source))),
        }
    }

    pub(crate) fn catalog(&self) -> &ArchetypeCatalog<S> {
        self.matcher.catalog().as_ref()
    }

    pub(crate) fn matcher(&self) -> &GeoMatcher<S> {
        &self.matcher
    }
}

/// Latitude and longitude are optional but only as a pair.
pub(crate) fn coordinates_from_parts(
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Option<Coordinates>, String> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => checked_coordinates(Coordinates::new(lat, lon)).map(Some),
        _ => Err("latitude and longitude must be supplied together".to_string()),
    }
}

pub(crate) fn checked_coordinates(coordinates: Coordinates) -> Result<Coordinates, String> {
    if coordinates.is_valid() {
        Ok(coordinates)
    } else {
        Err(format!(
            "coordinates ({}, {}) are outside the valid range",
            coordinates.lat, coordinates.lon
        ))
    }
}

/// Scenario batch as posted to the API or read from a file by the CLI.
#[derive(Debug, Deserialize)]
pub(crate) struct RankRequest {
    pub(crate) scenarios: Vec<ScenarioEvaluation>,
    pub(crate) baseline_energy: f64,
    #[serde(default)]
    pub(crate) weights: Option<CriteriaValues>,
}

impl RankRequest {
    pub(crate) fn ranker(&self) -> Result<ScenarioRanker, String> {
        let Some(weights) = self.weights else {
            return Ok(ScenarioRanker::default());
        };

        let values = weights.to_array();
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("weights must be finite and non-negative".to_string());
        }
        if values.iter().all(|w| *w == 0.0) {
            return Err("at least one weight must be positive".to_string());
        }
        Ok(ScenarioRanker::new(weights))
    }
}

pub(crate) fn read_rank_request(path: &Path) -> Result<RankRequest, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::BadRequest(format!(
            "failed to parse scenarios from {}: {err}",
            path.display()
        ))
    })
}
