use serde_json::{json, Value};

use super::domain::{ArchetypeDetails, ArchetypeRecord};
use super::payload::ArchetypePayload;

pub(crate) fn greek_single_family_record() -> ArchetypeRecord {
    ArchetypeRecord {
        category: "Single Family House".to_string(),
        country: "Greece".to_string(),
        name: "SFH_Greece_1961_1980".to_string(),
    }
}

pub(crate) fn greek_single_family_detail() -> Value {
    json!({
        "building": {
            "building": {
                "name": "SFH_Greece_1961_1980",
                "net_floor_area": 120.0,
                "n_floors": 2,
                "height": 6.0,
                "exposed_perimeter": 44.0,
                "construction_class": "class_i",
                "latitude": 38.1,
                "longitude": 23.5,
                "wall_thickness": 0.3
            },
            "building_surface": [
                {"name": "Roof surface", "type": "opaque", "area": 60.0, "u_value": 2.2,
                 "orientation": {"azimuth": 0.0, "tilt": 0.0}, "sky_view_factor": 1.0},
                {"name": "North wall", "type": "opaque", "area": 30.0, "u_value": 1.4,
                 "orientation": {"azimuth": 0.0, "tilt": 90.0}},
                {"name": "South wall", "type": "opaque", "area": 30.0, "u_value": 1.4,
                 "orientation": {"azimuth": 180.0, "tilt": 90.0}},
                {"name": "East facade", "type": "opaque", "area": 20.0, "u_value": 1.5,
                 "orientation": {"azimuth": 90.0, "tilt": 90.0}},
                {"name": "West facade", "type": "opaque", "area": 20.0, "u_value": 1.5,
                 "orientation": {"azimuth": 270.0, "tilt": 90.0}},
                {"name": "Ground floor slab", "type": "opaque", "area": 60.0, "u_value": 1.1,
                 "orientation": {"azimuth": 0.0, "tilt": 180.0}},
                {"name": "Window south", "type": "transparent", "area": 10.0, "u_value": 5.2,
                 "g_value": 0.7},
                {"name": "Window north", "type": "transparent", "area": 6.0, "u_value": 4.8,
                 "g_value": 0.7}
            ],
            "building_parameters": {
                "temperature_setpoints": {
                    "heating_setpoint": 20.0,
                    "heating_setback": 17.0,
                    "cooling_setpoint": 26.0,
                    "cooling_setback": 30.0
                },
                "system_capacities": {"heating_capacity": 10000000.0, "cooling_capacity": 12000000.0},
                "airflow_rates": {"infiltration_rate": 1.0},
                "internal_gains": [{"name": "occupants", "full_load": 4.2}]
            }
        },
        "system": {
            "heating_system": {"generator": "gas_boiler", "efficiency": 0.88},
            "emitter": {"type": "radiator"}
        }
    })
}

pub(crate) fn greek_single_family() -> ArchetypeDetails {
    let payload = ArchetypePayload::ingest(greek_single_family_detail()).expect("fixture ingests");
    ArchetypeDetails::derive(greek_single_family_record(), payload.bui, payload.system)
}
