mod common;

use std::sync::Arc;

use common::southern_europe;
use renovation_advisor::archetypes::{ArchetypeCatalog, Coordinates, SurfaceRole};
use renovation_advisor::matching::GeoMatcher;
use renovation_advisor::ranking::{ScenarioEvaluation, ScenarioRanker};
use renovation_advisor::transform::{apply_all, validate, BuildingModifications};
use serde_json::json;

const ATHENS: Coordinates = Coordinates::new(37.98, 23.73);
const ROME: Coordinates = Coordinates::new(41.90, 12.50);
const MADRID: Coordinates = Coordinates::new(40.42, -3.70);

fn matcher() -> GeoMatcher<common::CountingSource> {
    GeoMatcher::new(Arc::new(ArchetypeCatalog::new(southern_europe())))
}

#[tokio::test]
async fn building_near_athens_matches_greek_archetype() {
    let matcher = matcher();

    let found = matcher
        .find_best("Single Family House", Some("1961-1980"), Some(ATHENS))
        .await
        .expect("lookup succeeds")
        .expect("archetype exists");

    assert_eq!(found.details.record.country, "Greece");
    assert_eq!(found.details.record.name, "SFH_Greece_1961_1980");
    assert!(found.period_filter_applied);
    assert!(found.geographic_match_applied);
    assert!(found.distance_km.expect("distance reported") < 5.0);
}

#[tokio::test]
async fn nearest_country_wins_without_period() {
    let matcher = matcher();

    let near_rome = matcher
        .find_best("Single Family House", None, Some(ROME))
        .await
        .expect("lookup")
        .expect("archetype");
    assert_eq!(near_rome.details.record.country, "Italy");
    assert!(!near_rome.period_filter_applied);

    let near_athens = matcher
        .find_best("Single Family House", None, Some(ATHENS))
        .await
        .expect("lookup")
        .expect("archetype");
    assert_eq!(near_athens.details.record.name, "SFH_Greece_1961_1980");
}

#[tokio::test]
async fn unmatched_period_falls_back_to_category() {
    let found = matcher()
        .find_best("Single Family House", Some("1850-1900"), None)
        .await
        .expect("lookup")
        .expect("category still matches");

    assert_eq!(found.details.record.name, "SFH_Italy_1961_1980");
    assert!(!found.period_filter_applied);
    assert!(!found.geographic_match_applied);
    assert_eq!(found.distance_km, None);
}

#[tokio::test]
async fn unknown_category_or_missing_details_yield_none() {
    let matcher = matcher();

    assert!(matcher
        .find_best("Castle", None, Some(ATHENS))
        .await
        .expect("lookup")
        .is_none());
    assert!(matcher
        .find_best("Office", None, None)
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn categories_are_ordered_by_proximity() {
    let matcher = matcher();

    let unordered = matcher.available_categories(None).await.expect("categories");
    assert_eq!(
        unordered,
        vec!["Single Family House", "Apartment Block", "Office"]
    );

    let near_madrid = matcher
        .available_categories(Some(MADRID))
        .await
        .expect("categories");
    assert_eq!(
        near_madrid,
        vec!["Apartment Block", "Single Family House", "Office"]
    );
    assert_eq!(matcher.catalog().source().listing_calls(), 1);
}

#[tokio::test]
async fn modifications_never_touch_cached_archetype() {
    let matcher = matcher();
    let found = matcher
        .find_best("Single Family House", Some("1961-1980"), Some(ATHENS))
        .await
        .expect("lookup")
        .expect("archetype");

    let modifications: BuildingModifications = serde_json::from_value(json!({
        "floor_area": 60.0,
        "wall_u_value": 0.3,
        "window_u_value": 1.2,
        "heating_setpoint": 21.0,
        "cooling_setpoint": 25.0
    }))
    .expect("modifications decode");

    let validation = validate(&modifications, &found.details);
    assert!(validation.is_valid, "{:?}", validation.errors);

    let modified = apply_all(&found.details, &modifications);
    assert_eq!(modified.bui.building.net_floor_area, 60.0);
    let expected_perimeter = 44.0 * 0.5_f64.sqrt();
    assert!((modified.bui.building.exposed_perimeter - expected_perimeter).abs() < 1e-9);
    for surface in &modified.bui.building_surface {
        match surface.role {
            SurfaceRole::Wall => assert_eq!(surface.u_value, 0.3),
            SurfaceRole::Window => assert_eq!(surface.u_value, 1.2),
            _ => {}
        }
    }
    let setpoints = &modified.bui.building_parameters.temperature_setpoints;
    assert_eq!(setpoints.heating_setback, Some(18.0));
    assert_eq!(setpoints.cooling_setback, Some(29.0));

    let cached = matcher
        .catalog()
        .get_details(&found.details.key())
        .await
        .expect("cached details");
    assert!(Arc::ptr_eq(&cached, &found.details));
    assert_eq!(cached.floor_area, 120.0);
    assert_eq!(cached.bui.building.exposed_perimeter, 44.0);
    assert_eq!(cached.wall_u_value, Some(1.4));
    assert_eq!(matcher.catalog().source().detail_calls(), 1);
}

#[tokio::test]
async fn modified_payload_keeps_passthrough_fields() {
    let matcher = matcher();
    let found = matcher
        .find_best("Apartment Block", None, Some(MADRID))
        .await
        .expect("lookup")
        .expect("archetype");

    let modified = apply_all(&found.details, &BuildingModifications::default());
    let body = serde_json::to_value(&modified).expect("payload serializes");

    assert_eq!(
        body["bui"]["building_parameters"]["airflow_rates"]["infiltration_rate"],
        json!(0.8)
    );
    assert_eq!(body["bui"]["building"]["name"], json!("AB_Spain_1961_1980"));
    assert_eq!(
        body["system"]["heating_system"]["generator"],
        json!("oil_boiler")
    );
    assert!(body["bui"]["building_surface"][0].get("role").is_none());
}

#[test]
fn scenarios_rank_by_closeness() {
    let scenarios: Vec<ScenarioEvaluation> = serde_json::from_value(json!([
        {
            "id": "baseline-plus-windows",
            "annual_energy_needs": 18_000.0,
            "epc_class": "D",
            "comfort_index": 60.0
        },
        {
            "id": "deep-retrofit",
            "measures": ["wall_insulation", "roof_insulation", "heat_pump", "pv"],
            "annual_energy_needs": 7_000.0,
            "epc_class": "A",
            "comfort_index": 88.0,
            "financial": {"roi": 0.9, "npv": 42_000.0}
        },
        {
            "id": "heat-pump",
            "annual_energy_needs": 12_000.0,
            "epc_class": "C",
            "comfort_index": 70.0,
            "financial": {"roi": 0.4, "npv": 5_000.0}
        }
    ]))
    .expect("scenarios decode");

    let ranked = ScenarioRanker::default().rank_scenarios(&scenarios, 20_000.0);
    let order: Vec<&str> = ranked.iter().map(|r| r.scenario_id.as_str()).collect();
    assert_eq!(
        order,
        vec!["deep-retrofit", "heat-pump", "baseline-plus-windows"]
    );
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].index, 1);
    assert!((ranked[0].closeness - 1.0).abs() < 1e-12);
    assert!(ranked[2].closeness.abs() < 1e-12);
}
