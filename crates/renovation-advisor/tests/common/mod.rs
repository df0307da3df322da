#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use renovation_advisor::archetypes::{
    ArchetypeKey, ArchetypePayload, ArchetypeRecord, ArchetypeSource, SourceError,
};
use serde_json::{json, Value};

/// In-memory source that counts upstream calls and can simulate an outage.
#[derive(Default)]
pub struct CountingSource {
    records: Vec<ArchetypeRecord>,
    payloads: HashMap<String, Value>,
    pub listing_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub offline: AtomicBool,
}

impl CountingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: &str, country: &str, name: &str, floor_area: f64) -> Self {
        let record = record(category, country, name);
        self.payloads
            .insert(record.key().cache_key(), detail(name, floor_area));
        self.records.push(record);
        self
    }

    pub fn listed_only(mut self, category: &str, country: &str, name: &str) -> Self {
        self.records.push(record(category, country, name));
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

impl ArchetypeSource for CountingSource {
    fn list_archetypes(
        &self,
    ) -> impl Future<Output = Result<Vec<ArchetypeRecord>, SourceError>> + Send {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.offline.load(Ordering::SeqCst) {
            Err(SourceError::Transport("connection refused".to_string()))
        } else {
            Ok(self.records.clone())
        };
        async move { result }
    }

    fn fetch_archetype(
        &self,
        key: &ArchetypeKey,
    ) -> impl Future<Output = Result<ArchetypePayload, SourceError>> + Send {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.offline.load(Ordering::SeqCst) {
            Err(SourceError::Transport("connection refused".to_string()))
        } else {
            match self.payloads.get(&key.cache_key()) {
                Some(raw) => ArchetypePayload::ingest(raw.clone()),
                None => Err(SourceError::NotFound),
            }
        };
        async move { result }
    }
}

pub fn record(category: &str, country: &str, name: &str) -> ArchetypeRecord {
    ArchetypeRecord {
        category: category.to_string(),
        country: country.to_string(),
        name: name.to_string(),
    }
}

pub fn detail(name: &str, floor_area: f64) -> Value {
    json!({
        "building": {
            "building": {
                "name": name,
                "net_floor_area": floor_area,
                "n_floors": 2,
                "height": 6.0,
                "exposed_perimeter": 44.0,
                "latitude": 12.0,
                "longitude": -40.0
            },
            "building_surface": [
                {"name": "Roof", "type": "opaque", "area": 60.0, "u_value": 2.2},
                {"name": "North wall", "type": "opaque", "area": 50.0, "u_value": 1.4},
                {"name": "South wall", "type": "opaque", "area": 50.0, "u_value": 1.3},
                {"name": "Ground slab", "type": "opaque", "area": 60.0, "u_value": 1.1},
                {"name": "South glazing", "type": "transparent", "area": 12.0, "u_value": 5.0},
                {"name": "North glazing", "type": "transparent", "area": 4.0, "u_value": 5.0}
            ],
            "building_parameters": {
                "temperature_setpoints": {
                    "heating_setpoint": 20.0,
                    "heating_setback": 17.0,
                    "cooling_setpoint": 26.0,
                    "cooling_setback": 30.0
                },
                "airflow_rates": {"infiltration_rate": 0.8}
            }
        },
        "system": {"heating_system": {"generator": "oil_boiler"}}
    })
}

/// Greek and Italian single-family houses plus an apartment block in Spain.
pub fn southern_europe() -> CountingSource {
    CountingSource::new()
        .with("Single Family House", "Italy", "SFH_Italy_1961_1980", 140.0)
        .with("Single Family House", "Greece", "SFH_Greece_1961_1980", 120.0)
        .with("Single Family House", "Greece", "SFH_Greece_1981_2000", 130.0)
        .with("Apartment Block", "Spain", "AB_Spain_1961_1980", 900.0)
        .listed_only("Office", "Italy", "Office_Italy_1990_2000")
}
