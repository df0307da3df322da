use crate::infra::{coordinates_from_parts, AdvisorService};
use clap::Args;
use renovation_advisor::archetypes::{ArchetypeRecord, StaticArchetypeSource};
use renovation_advisor::error::AppError;
use renovation_advisor::ranking::{
    FinancialResult, ScenarioEvaluation, ScenarioOutcome, ScenarioRanker,
};
use renovation_advisor::transform::{apply_all, validate, BuildingModifications};
use serde_json::{json, Value};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Building category to match
    #[arg(long, default_value = "Single Family House")]
    pub(crate) category: String,
    /// Construction period (YYYY-YYYY)
    #[arg(long)]
    pub(crate) period: Option<String>,
    /// Building latitude (defaults to central Athens)
    #[arg(long, default_value_t = 37.98, allow_negative_numbers = true)]
    pub(crate) lat: f64,
    /// Building longitude (defaults to central Athens)
    #[arg(long, default_value_t = 23.73, allow_negative_numbers = true)]
    pub(crate) lon: f64,
    /// Net floor area of the user's building in m²
    #[arg(long, default_value_t = 95.0)]
    pub(crate) floor_area: f64,
    /// Target wall U-value after insulation in W/m²K
    #[arg(long, default_value_t = 0.35)]
    pub(crate) wall_u_value: f64,
}

struct SampleArchetype {
    category: &'static str,
    country: &'static str,
    name: &'static str,
    floor_area: f64,
    wall_u: f64,
    roof_u: f64,
    window_u: f64,
    location: (f64, f64),
}

const SAMPLE_ARCHETYPES: &[SampleArchetype] = &[
    SampleArchetype {
        category: "Single Family House",
        country: "Italy",
        name: "SFH_Italy_1946_1960",
        floor_area: 110.0,
        wall_u: 1.6,
        roof_u: 2.0,
        window_u: 5.0,
        location: (41.9, 12.5),
    },
    SampleArchetype {
        category: "Single Family House",
        country: "Greece",
        name: "SFH_Greece_1961_1980",
        floor_area: 120.0,
        wall_u: 1.4,
        roof_u: 2.2,
        window_u: 5.2,
        location: (38.1, 23.5),
    },
    SampleArchetype {
        category: "Single Family House",
        country: "Germany",
        name: "SFH_Germany_1961_1980",
        floor_area: 140.0,
        wall_u: 1.1,
        roof_u: 0.9,
        window_u: 2.8,
        location: (52.5, 13.4),
    },
    SampleArchetype {
        category: "Apartment Block",
        country: "Spain",
        name: "AB_Spain_1981_2000",
        floor_area: 850.0,
        wall_u: 0.9,
        roof_u: 0.8,
        window_u: 3.3,
        location: (40.4, -3.7),
    },
];

/// Built-in archetypes for offline runs.
pub(crate) fn sample_source() -> StaticArchetypeSource {
    SAMPLE_ARCHETYPES
        .iter()
        .fold(StaticArchetypeSource::new(), |source, sample| {
            let record = ArchetypeRecord {
                category: sample.category.to_string(),
                country: sample.country.to_string(),
                name: sample.name.to_string(),
            };
            source.with_archetype(record, sample_payload(sample))
        })
}

fn sample_payload(sample: &SampleArchetype) -> Value {
    let footprint = sample.floor_area / 2.0;
    let side = footprint.sqrt();
    let facade = side * 3.0;
    json!({
        "building": {
            "building": {
                "name": sample.name,
                "net_floor_area": sample.floor_area,
                "n_floors": 2,
                "height": 6.0,
                "exposed_perimeter": side * 4.0,
                "construction_class": "class_i",
                "latitude": sample.location.0,
                "longitude": sample.location.1
            },
            "building_surface": [
                {"name": "Roof", "type": "opaque", "area": footprint, "u_value": sample.roof_u,
                 "orientation": {"azimuth": 0.0, "tilt": 0.0}},
                {"name": "North wall", "type": "opaque", "area": facade * 2.0, "u_value": sample.wall_u,
                 "orientation": {"azimuth": 0.0, "tilt": 90.0}},
                {"name": "South wall", "type": "opaque", "area": facade * 2.0, "u_value": sample.wall_u,
                 "orientation": {"azimuth": 180.0, "tilt": 90.0}},
                {"name": "East wall", "type": "opaque", "area": facade * 2.0, "u_value": sample.wall_u,
                 "orientation": {"azimuth": 90.0, "tilt": 90.0}},
                {"name": "West wall", "type": "opaque", "area": facade * 2.0, "u_value": sample.wall_u,
                 "orientation": {"azimuth": 270.0, "tilt": 90.0}},
                {"name": "Slab to ground", "type": "opaque", "area": footprint, "u_value": 1.2,
                 "orientation": {"azimuth": 0.0, "tilt": 180.0}},
                {"name": "Transparent south surface", "type": "transparent", "area": facade * 0.6,
                 "u_value": sample.window_u, "g_value": 0.7,
                 "orientation": {"azimuth": 180.0, "tilt": 90.0}},
                {"name": "Transparent north surface", "type": "transparent", "area": facade * 0.3,
                 "u_value": sample.window_u, "g_value": 0.7,
                 "orientation": {"azimuth": 0.0, "tilt": 90.0}}
            ],
            "building_parameters": {
                "temperature_setpoints": {
                    "heating_setpoint": 20.0,
                    "heating_setback": 17.0,
                    "cooling_setpoint": 26.0,
                    "cooling_setback": 30.0
                },
                "system_capacities": {"heating_capacity": 1.0e6, "cooling_capacity": 1.2e6},
                "airflow_rates": {"infiltration_rate": 1.0},
                "internal_gains": [
                    {"name": "occupants", "full_load": 4.2, "weekday": [0.6, 0.6, 0.3, 0.8]}
                ]
            }
        },
        "system": {
            "heating_system": {"generator": "gas_boiler", "efficiency": 0.86},
            "emitter": {"type": "radiator", "flow_temperature": 70.0}
        }
    })
}

/// Outcomes the simulation and financial services would report for the demo building.
fn sample_scenarios() -> Vec<ScenarioEvaluation> {
    let scenario = |id: &str, measures: &[&str], energy: f64, epc: &str, comfort: f64| {
        ScenarioEvaluation {
            id: id.to_string(),
            measures: measures.iter().map(|m| m.to_string()).collect(),
            outcome: ScenarioOutcome {
                annual_energy_needs: energy,
                epc_class: epc.to_string(),
                comfort_index: comfort,
            },
            financial: None,
        }
    };

    vec![
        ScenarioEvaluation {
            financial: Some(FinancialResult { roi: 0.35, npv: 4_000.0 }),
            ..scenario("windows", &["window_replacement"], 15_500.0, "D", 68.0)
        },
        ScenarioEvaluation {
            financial: Some(FinancialResult { roi: 0.8, npv: 21_000.0 }),
            ..scenario(
                "envelope",
                &["wall_insulation", "roof_insulation"],
                10_200.0,
                "A",
                82.0,
            )
        },
        ScenarioEvaluation {
            financial: Some(FinancialResult { roi: 0.55, npv: 12_500.0 }),
            ..scenario(
                "heat-pump-pv",
                &["heat_pump", "pv"],
                11_800.0,
                "B",
                74.0,
            )
        },
    ]
}

const DEMO_BASELINE_ENERGY: f64 = 19_000.0;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        category,
        period,
        lat,
        lon,
        floor_area,
        wall_u_value,
    } = args;
    let coordinates =
        coordinates_from_parts(Some(lat), Some(lon)).map_err(AppError::BadRequest)?;

    println!("Renovation advisor demo (offline archetype data)");
    let service = AdvisorService::new(sample_source());

    let options = service.catalog().building_options().await?;
    println!(
        "- {} countries | {} categories | periods {}",
        options.countries.len(),
        options.categories.len(),
        options.periods.join(", ")
    );

    let Some(found) = service
        .matcher()
        .find_best(&category, period.as_deref(), coordinates)
        .await?
    else {
        println!("No archetype available for category '{category}'");
        return Ok(());
    };
    let details = &found.details;
    println!(
        "\nMatched archetype {} ({}, {})",
        details.record.name, details.record.country, details.record.category
    );
    println!(
        "  period filter: {} | geographic match: {} | distance: {}",
        yes_no(found.period_filter_applied),
        yes_no(found.geographic_match_applied),
        found
            .distance_km
            .map(|km| format!("{km:.0} km"))
            .unwrap_or_else(|| "n/a".to_string())
    );
    println!(
        "  {:.0} m² over {} floors | U wall {} | U roof {} | U window {}",
        details.floor_area,
        details.number_of_floors,
        format_u(details.wall_u_value),
        format_u(details.roof_u_value),
        format_u(details.window_u_value)
    );

    let modifications = BuildingModifications {
        floor_area: Some(floor_area),
        wall_u_value: Some(wall_u_value),
        roof_u_value: Some(0.25),
        window_u_value: Some(1.4),
        heating_setpoint: Some(20.0),
        cooling_setpoint: Some(26.0),
        ..BuildingModifications::default()
    };
    let validation = validate(&modifications, details);
    if !validation.is_valid {
        println!("\nModifications rejected:");
        for error in &validation.errors {
            println!("  - {}: {}", error.field, error.message);
        }
        return Ok(());
    }

    let modified = apply_all(details, &modifications);
    println!(
        "\nModified payload: {:.0} m² | exposed perimeter {:.1} m -> {:.1} m",
        modified.bui.building.net_floor_area,
        details.bui.building.exposed_perimeter,
        modified.bui.building.exposed_perimeter
    );
    for surface in &modified.bui.building_surface {
        println!(
            "  - {:<28} {:<6} {:>7.1} m² U={:.2}",
            surface.name,
            surface.role.label(),
            surface.area,
            surface.u_value
        );
    }

    let scenarios = sample_scenarios();
    let ranked = ScenarioRanker::default().rank_scenarios(&scenarios, DEMO_BASELINE_ENERGY);
    println!("\nScenario ranking (equal weights, baseline {DEMO_BASELINE_ENERGY:.0} kWh)");
    for entry in &ranked {
        println!(
            "  {}. {:<14} closeness {:.3} | energy {:.2} | comfort {:.2} | financial {:.2}",
            entry.rank,
            entry.scenario_id,
            entry.closeness,
            entry.criteria.energy_efficiency,
            entry.criteria.user_comfort,
            entry.criteria.financial
        );
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn format_u(value: Option<f64>) -> String {
    value
        .map(|u| format!("{u:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use renovation_advisor::archetypes::{ArchetypeKey, SurfaceRole};
    use renovation_advisor::transform::MAX_WINDOW_TO_WALL_RATIO;

    #[tokio::test]
    async fn sample_archetypes_ingest_cleanly() {
        let service = AdvisorService::new(sample_source());
        for sample in SAMPLE_ARCHETYPES {
            let key = ArchetypeKey::new(sample.category, sample.country, sample.name);
            let details = service
                .catalog()
                .get_details(&key)
                .await
                .expect("sample archetype loads");

            assert_eq!(details.wall_u_value, Some(sample.wall_u));
            assert_eq!(details.roof_u_value, Some(sample.roof_u));
            assert_eq!(details.window_u_value, Some(sample.window_u));
            let window_ratio = details.total_window_area / details.bui.total_wall_area();
            assert!(window_ratio < MAX_WINDOW_TO_WALL_RATIO);
            assert!(details
                .bui
                .building_surface
                .iter()
                .all(|s| s.role != SurfaceRole::Other));
        }
    }

    #[test]
    fn envelope_scenario_leads_demo_ranking() {
        let ranked =
            ScenarioRanker::default().rank_scenarios(&sample_scenarios(), DEMO_BASELINE_ENERGY);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].scenario_id, "envelope");
        assert_eq!(ranked[2].scenario_id, "windows");
    }

    #[tokio::test]
    async fn demo_runs_with_default_arguments() {
        let args = DemoArgs {
            category: "Single Family House".to_string(),
            period: None,
            lat: 37.98,
            lon: 23.73,
            floor_area: 95.0,
            wall_u_value: 0.35,
        };
        run_demo(args).await.expect("demo completes");
    }
}
