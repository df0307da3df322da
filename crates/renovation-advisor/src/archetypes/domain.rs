use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::payload::{BuildingPayload, SystemPayload};

/// One entry of the upstream archetype listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypeRecord {
    pub category: String,
    pub country: String,
    pub name: String,
}

impl ArchetypeRecord {
    pub fn key(&self) -> ArchetypeKey {
        ArchetypeKey::new(&self.category, &self.country, &self.name)
    }

    /// Construction period encoded in the archetype name, e.g. `SFH_Greece_1961_1980`.
    pub fn construction_period(&self) -> Option<String> {
        construction_period(&self.name)
    }
}

/// Identifies a single archetype; the triple is unique across the listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypeKey {
    pub category: String,
    pub country: String,
    pub name: String,
}

impl ArchetypeKey {
    pub fn new(
        category: impl Into<String>,
        country: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            country: country.into(),
            name: name.into(),
        }
    }

    /// Cache key in `country:category:name` form.
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.country, self.category, self.name)
    }
}

impl fmt::Display for ArchetypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.country, self.category, self.name)
    }
}

impl From<&ArchetypeRecord> for ArchetypeKey {
    fn from(record: &ArchetypeRecord) -> Self {
        record.key()
    }
}

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Extract a `YYYY-YYYY` period from the first `dddd_dddd` run in `name`.
pub fn construction_period(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    if bytes.len() < 9 {
        return None;
    }

    (0..=bytes.len() - 9).find_map(|start| {
        let window = &bytes[start..start + 9];
        let digits = |range: std::ops::Range<usize>| window[range].iter().all(u8::is_ascii_digit);
        if digits(0..4) && window[4] == b'_' && digits(5..9) {
            Some(format!("{}-{}", &name[start..start + 4], &name[start + 5..start + 9]))
        } else {
            None
        }
    })
}

/// Archetype summary plus the full technical payload, derived once per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDetails {
    #[serde(flatten)]
    pub record: ArchetypeRecord,
    pub floor_area: f64,
    pub number_of_floors: u32,
    pub building_height: f64,
    pub total_window_area: f64,
    pub wall_u_value: Option<f64>,
    pub roof_u_value: Option<f64>,
    pub window_u_value: Option<f64>,
    pub heating_setpoint: Option<f64>,
    pub heating_setback: Option<f64>,
    pub cooling_setpoint: Option<f64>,
    pub cooling_setback: Option<f64>,
    pub location: Option<Coordinates>,
    pub bui: BuildingPayload,
    pub system: SystemPayload,
}

impl ArchetypeDetails {
    /// Derive the summary fields from the ingested payload.
    pub fn derive(record: ArchetypeRecord, bui: BuildingPayload, system: SystemPayload) -> Self {
        let wall_u_value = bui
            .opaque_surfaces()
            .find(|surface| surface.name_contains("wall"))
            .map(|surface| surface.u_value);
        let roof_u_value = bui
            .opaque_surfaces()
            .find(|surface| surface.name_contains("roof"))
            .map(|surface| surface.u_value);
        let window_u_value = bui.transparent_surfaces().next().map(|surface| surface.u_value);
        let total_window_area = bui.transparent_surfaces().map(|surface| surface.area).sum();

        let building = &bui.building;
        let setpoints = &bui.building_parameters.temperature_setpoints;
        let location = match (building.latitude, building.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };

        Self {
            record,
            floor_area: building.net_floor_area,
            number_of_floors: building.floor_count(),
            building_height: building.height,
            total_window_area,
            wall_u_value,
            roof_u_value,
            window_u_value,
            heating_setpoint: setpoints.heating_setpoint,
            heating_setback: setpoints.heating_setback,
            cooling_setpoint: setpoints.cooling_setpoint,
            cooling_setback: setpoints.cooling_setback,
            location,
            bui,
            system,
        }
    }

    pub fn key(&self) -> ArchetypeKey {
        self.record.key()
    }
}

/// Dropdown lists offered to the building-selection step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildingOptions {
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub periods: Vec<String>,
}

impl BuildingOptions {
    pub fn from_records(records: &[ArchetypeRecord]) -> Self {
        let mut countries: Vec<String> = records.iter().map(|r| r.country.clone()).collect();
        let mut categories: Vec<String> = records.iter().map(|r| r.category.clone()).collect();
        let mut periods: Vec<String> = records
            .iter()
            .filter_map(ArchetypeRecord::construction_period)
            .collect();

        for list in [&mut countries, &mut categories, &mut periods] {
            list.sort();
            list.dedup();
        }

        Self {
            countries,
            categories,
            periods,
        }
    }
}

/// Snapshot of what the catalog currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatus {
    pub listing_cached: bool,
    pub listing_size: usize,
    pub details_cached: usize,
    pub listing_fetched_at: Option<DateTime<Utc>>,
}
