//! Parametric modification of archetype payloads.
//!
//! Every public operation takes a borrowed payload and returns a new one; the
//! cached archetype defaults are never touched.

mod modifications;
mod validation;

pub use modifications::{BuildingModifications, WindowDistribution};
pub use validation::{
    validate, FieldError, ModificationValidation, COOLING_SETPOINT_RANGE, FLOORS_RANGE,
    FLOOR_AREA_RANGE, HEATING_SETPOINT_RANGE, HEIGHT_RANGE, MAX_WINDOW_TO_WALL_RATIO,
    OCCUPANTS_RANGE, U_VALUE_RANGE,
};

use serde::Serialize;
use tracing::{debug, warn};

use crate::archetypes::{ArchetypeDetails, BuildingPayload, SurfaceRole, SystemPayload};

/// Heating setback sits this many degrees below the heating setpoint.
pub const HEATING_SETBACK_OFFSET: f64 = 3.0;
/// Cooling setback sits this many degrees above the cooling setpoint.
pub const COOLING_SETBACK_OFFSET: f64 = 4.0;

/// Payload pair ready for submission to the simulation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifiedPayload {
    pub bui: BuildingPayload,
    pub system: SystemPayload,
}

/// Thermal transmittance overrides in W/m²K.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThermalOverrides {
    pub wall: Option<f64>,
    pub roof: Option<f64>,
    pub window: Option<f64>,
}

impl From<&BuildingModifications> for ThermalOverrides {
    fn from(modifications: &BuildingModifications) -> Self {
        Self {
            wall: modifications.wall_u_value,
            roof: modifications.roof_u_value,
            window: modifications.window_u_value,
        }
    }
}

/// Set the floor area and rescale the envelope to match.
///
/// All surfaces scale by `new / original`; the exposed perimeter scales by its
/// square root. A non-positive or non-finite `new_area` leaves the payload as is.
pub fn apply_floor_area(payload: &BuildingPayload, new_area: f64) -> BuildingPayload {
    let mut next = payload.clone();
    scale_floor_area(&mut next, new_area);
    next
}

pub fn apply_thermal(payload: &BuildingPayload, overrides: ThermalOverrides) -> BuildingPayload {
    let mut next = payload.clone();
    override_u_values(&mut next, overrides);
    next
}

/// Set setpoints; each one also resets its setback.
pub fn apply_setpoints(
    payload: &BuildingPayload,
    heating: Option<f64>,
    cooling: Option<f64>,
) -> BuildingPayload {
    let mut next = payload.clone();
    override_setpoints(&mut next, heating, cooling);
    next
}

/// Apply every modification to a copy of the archetype payload.
///
/// Order is floor area, geometry overrides, thermal, then setpoints.
pub fn apply_all(details: &ArchetypeDetails, modifications: &BuildingModifications) -> ModifiedPayload {
    let mut bui = details.bui.clone();

    if let Some(area) = modifications.floor_area {
        scale_floor_area(&mut bui, area);
    }
    if let Some(floors) = modifications.number_of_floors {
        bui.building.n_floors = f64::from(floors);
    }
    if let Some(height) = modifications.building_height {
        bui.building.height = height;
    }

    override_u_values(&mut bui, ThermalOverrides::from(modifications));
    override_setpoints(
        &mut bui,
        modifications.heating_setpoint,
        modifications.cooling_setpoint,
    );

    if let Some(occupants) = modifications.occupants {
        bui.building_parameters.occupants = Some(occupants);
    }

    ModifiedPayload {
        bui,
        system: details.system.clone(),
    }
}

fn scale_floor_area(payload: &mut BuildingPayload, new_area: f64) {
    if !(new_area.is_finite() && new_area > 0.0) {
        warn!(new_area, "requested floor area unusable, payload left unchanged");
        return;
    }

    let original = payload.building.net_floor_area;
    payload.building.net_floor_area = new_area;

    if !(original.is_finite() && original > 0.0) {
        warn!(original, new_area, "archetype floor area unusable, envelope left unscaled");
        return;
    }

    let scale = new_area / original;
    for surface in &mut payload.building_surface {
        surface.area *= scale;
    }
    payload.building.exposed_perimeter *= scale.sqrt();
    debug!(original, new_area, scale, "envelope rescaled to new floor area");
}

fn override_u_values(payload: &mut BuildingPayload, overrides: ThermalOverrides) {
    for surface in &mut payload.building_surface {
        let replacement = match surface.role {
            SurfaceRole::Roof => overrides.roof,
            SurfaceRole::Wall => overrides.wall,
            SurfaceRole::Window => overrides.window,
            SurfaceRole::Floor | SurfaceRole::Other => None,
        };
        if let Some(u_value) = replacement {
            surface.u_value = u_value;
        }
    }
}

fn override_setpoints(payload: &mut BuildingPayload, heating: Option<f64>, cooling: Option<f64>) {
    let setpoints = &mut payload.building_parameters.temperature_setpoints;
    if let Some(heating) = heating {
        setpoints.heating_setpoint = Some(heating);
        setpoints.heating_setback = Some(heating - HEATING_SETBACK_OFFSET);
    }
    if let Some(cooling) = cooling {
        setpoints.cooling_setpoint = Some(cooling);
        setpoints.cooling_setback = Some(cooling + COOLING_SETBACK_OFFSET);
    }
}
