//! Typed view over the upstream building/system payload.
//!
//! Only the fields the engine reads or rewrites are typed. Every record keeps
//! the remaining upstream fields in a flattened map so a payload serializes
//! back with all of its technical data intact.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::source::SourceError;

const CARDINAL_DIRECTIONS: [&str; 4] = ["north", "south", "east", "west"];

/// Upstream `type` tag partitioning the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Opaque,
    Transparent,
}

/// Envelope role assigned at ingestion.
///
/// The upstream service does not tag roles, so [`SurfaceRole::classify`] maps
/// free-text surface names onto roles. The mapping is best-effort: a surface
/// whose name uses none of the known words stays [`SurfaceRole::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceRole {
    Wall,
    Roof,
    Window,
    Floor,
    #[default]
    Other,
}

impl SurfaceRole {
    pub fn classify(name: &str, kind: SurfaceKind) -> Self {
        if kind == SurfaceKind::Transparent {
            return Self::Window;
        }

        let name = name.to_lowercase();
        if name.contains("roof") {
            Self::Roof
        } else if name.contains("wall") || CARDINAL_DIRECTIONS.iter().any(|dir| name.contains(dir))
        {
            Self::Wall
        } else if ["floor", "slab", "ground"]
            .iter()
            .any(|word| name.contains(word))
        {
            Self::Floor
        } else {
            Self::Other
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Roof => "roof",
            Self::Window => "window",
            Self::Floor => "floor",
            Self::Other => "other",
        }
    }
}

/// Full building description sent to the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingPayload {
    pub building: BuildingRecord,
    #[serde(default)]
    pub building_surface: Vec<BuildingSurface>,
    #[serde(default)]
    pub building_parameters: BuildingParameters,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BuildingPayload {
    /// Decode a raw upstream payload and check surface invariants.
    pub fn ingest(raw: Value) -> Result<Self, SourceError> {
        let payload: Self = serde_json::from_value(raw)
            .map_err(|err| SourceError::Decode(format!("building payload: {err}")))?;

        for surface in &payload.building_surface {
            if !(surface.area.is_finite() && surface.area >= 0.0) {
                return Err(SourceError::Decode(format!(
                    "surface '{}' has invalid area {}",
                    surface.name, surface.area
                )));
            }
            if !(surface.u_value.is_finite() && surface.u_value >= 0.0) {
                return Err(SourceError::Decode(format!(
                    "surface '{}' has invalid U-value {}",
                    surface.name, surface.u_value
                )));
            }
        }

        Ok(payload)
    }

    pub fn opaque_surfaces(&self) -> impl Iterator<Item = &BuildingSurface> {
        self.building_surface
            .iter()
            .filter(|surface| surface.kind == SurfaceKind::Opaque)
    }

    pub fn transparent_surfaces(&self) -> impl Iterator<Item = &BuildingSurface> {
        self.building_surface
            .iter()
            .filter(|surface| surface.kind == SurfaceKind::Transparent)
    }

    /// Opaque envelope area excluding roofs, slabs and ground contact.
    pub fn total_wall_area(&self) -> f64 {
        self.opaque_surfaces()
            .filter(|surface| {
                !["roof", "slab", "ground"]
                    .iter()
                    .any(|word| surface.name_contains(word))
            })
            .map(|surface| surface.area)
            .sum()
    }
}

/// Building-level geometry and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub net_floor_area: f64,
    #[serde(default)]
    pub n_floors: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub exposed_perimeter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BuildingRecord {
    pub fn floor_count(&self) -> u32 {
        if self.n_floors.is_finite() && self.n_floors > 0.0 {
            self.n_floors.round() as u32
        } else {
            0
        }
    }
}

/// One envelope surface. Decoding always classifies the role from the name,
/// so a payload read back from JSON behaves like a freshly ingested one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBuildingSurface")]
pub struct BuildingSurface {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SurfaceKind,
    pub area: f64,
    pub u_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<SurfaceOrientation>,
    #[serde(skip_serializing)]
    pub role: SurfaceRole,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawBuildingSurface {
    name: String,
    #[serde(rename = "type")]
    kind: SurfaceKind,
    area: f64,
    u_value: f64,
    #[serde(default)]
    orientation: Option<SurfaceOrientation>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawBuildingSurface> for BuildingSurface {
    fn from(raw: RawBuildingSurface) -> Self {
        Self {
            role: SurfaceRole::classify(&raw.name, raw.kind),
            name: raw.name,
            kind: raw.kind,
            area: raw.area,
            u_value: raw.u_value,
            orientation: raw.orientation,
            extra: raw.extra,
        }
    }
}

impl BuildingSurface {
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOrientation {
    pub azimuth: f64,
    pub tilt: f64,
}

/// Setpoints plus the capacities, airflow rates and gain profiles kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingParameters {
    #[serde(default)]
    pub temperature_setpoints: TemperatureSetpoints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupants: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSetpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_setpoint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_setback: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_setpoint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_setback: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HVAC parameters, forwarded to the simulator untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemPayload(pub Map<String, Value>);

impl SystemPayload {
    pub fn ingest(raw: Value) -> Result<Self, SourceError> {
        match raw {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(SourceError::Decode(format!(
                "system payload must be an object, found {other}"
            ))),
        }
    }
}

/// Detail response for a single archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypePayload {
    pub bui: BuildingPayload,
    pub system: SystemPayload,
}

impl ArchetypePayload {
    /// Split a `{building, system}` response and ingest both halves.
    pub fn ingest(raw: Value) -> Result<Self, SourceError> {
        let Value::Object(mut body) = raw else {
            return Err(SourceError::Decode(
                "archetype detail must be a JSON object".to_string(),
            ));
        };

        let building = body
            .remove("building")
            .ok_or_else(|| SourceError::Decode("archetype detail missing 'building'".into()))?;
        let system = body.remove("system").unwrap_or(Value::Null);

        Ok(Self {
            bui: BuildingPayload::ingest(building)?,
            system: SystemPayload::ingest(system)?,
        })
    }
}
