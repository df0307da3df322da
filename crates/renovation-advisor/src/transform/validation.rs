use serde::Serialize;

use super::modifications::BuildingModifications;
use crate::archetypes::ArchetypeDetails;

pub const FLOOR_AREA_RANGE: (f64, f64) = (10.0, 1000.0);
pub const FLOORS_RANGE: (u32, u32) = (1, 20);
pub const HEIGHT_RANGE: (f64, f64) = (2.0, 100.0);
pub const U_VALUE_RANGE: (f64, f64) = (0.1, 5.0);
pub const HEATING_SETPOINT_RANGE: (f64, f64) = (15.0, 22.0);
pub const COOLING_SETPOINT_RANGE: (f64, f64) = (24.0, 30.0);
pub const OCCUPANTS_RANGE: (u32, u32) = (1, 500);
pub const MAX_WINDOW_TO_WALL_RATIO: f64 = 0.4;

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every violated constraint for a set of modifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModificationValidation {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl ModificationValidation {
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }

    fn range(&mut self, field: &'static str, value: Option<f64>, (min, max): (f64, f64), unit: &str) {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.push(
                    field,
                    format!("must be between {min} and {max} {unit}, got {value}"),
                );
            }
        }
    }

    fn count_range(&mut self, field: &'static str, value: Option<u32>, (min, max): (u32, u32)) {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.push(field, format!("must be between {min} and {max}, got {value}"));
            }
        }
    }
}

/// Check every modification against its bounds and the archetype envelope.
///
/// Nothing short-circuits: the result lists all violations at once.
pub fn validate(
    modifications: &BuildingModifications,
    details: &ArchetypeDetails,
) -> ModificationValidation {
    let mut collector = Collector { errors: Vec::new() };

    collector.range("floor_area", modifications.floor_area, FLOOR_AREA_RANGE, "m²");
    collector.count_range("number_of_floors", modifications.number_of_floors, FLOORS_RANGE);
    collector.range(
        "building_height",
        modifications.building_height,
        HEIGHT_RANGE,
        "m",
    );
    for (field, value) in [
        ("wall_u_value", modifications.wall_u_value),
        ("roof_u_value", modifications.roof_u_value),
        ("window_u_value", modifications.window_u_value),
    ] {
        collector.range(field, value, U_VALUE_RANGE, "W/m²K");
    }
    collector.range(
        "heating_setpoint",
        modifications.heating_setpoint,
        HEATING_SETPOINT_RANGE,
        "°C",
    );
    collector.range(
        "cooling_setpoint",
        modifications.cooling_setpoint,
        COOLING_SETPOINT_RANGE,
        "°C",
    );
    collector.count_range("occupants", modifications.occupants, OCCUPANTS_RANGE);

    if let Some(window_area) = modifications.window_area {
        let wall_area = details.bui.total_wall_area();
        let limit = wall_area * MAX_WINDOW_TO_WALL_RATIO;
        if window_area < 0.0 {
            collector.push("window_area", format!("must not be negative, got {window_area}"));
        } else if window_area > limit {
            collector.push(
                "window_area",
                format!(
                    "must not exceed 40% of the wall area ({limit:.1} m² of {wall_area:.1} m²), got {window_area}"
                ),
            );
        }
    }

    if let Some(distribution) = modifications.window_distribution {
        let total = distribution.total();
        if (total - 100.0).abs() > 0.5 {
            collector.push(
                "window_distribution",
                format!("facade shares must sum to 100%, got {total:.1}%"),
            );
        }
    }

    if modifications.heating_setpoint.is_some() || modifications.cooling_setpoint.is_some() {
        let heating = modifications.heating_setpoint.or(details.heating_setpoint);
        let cooling = modifications.cooling_setpoint.or(details.cooling_setpoint);
        if let (Some(heating), Some(cooling)) = (heating, cooling) {
            if cooling <= heating {
                collector.push(
                    "cooling_setpoint",
                    format!("must be above the heating setpoint ({heating} °C), got {cooling}"),
                );
            }
        }
    }

    let errors = collector.errors;
    ModificationValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
