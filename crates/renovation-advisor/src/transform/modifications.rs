use serde::{Deserialize, Serialize};

/// User-facing overrides; `None` keeps the archetype default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingModifications {
    pub floor_area: Option<f64>,
    pub number_of_floors: Option<u32>,
    pub building_height: Option<f64>,
    pub window_area: Option<f64>,
    pub window_distribution: Option<WindowDistribution>,
    pub wall_u_value: Option<f64>,
    pub roof_u_value: Option<f64>,
    pub window_u_value: Option<f64>,
    pub heating_setpoint: Option<f64>,
    pub cooling_setpoint: Option<f64>,
    pub occupants: Option<u32>,
}

/// Share of the window area per facade, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowDistribution {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl WindowDistribution {
    pub fn total(&self) -> f64 {
        self.north + self.south + self.east + self.west
    }
}
