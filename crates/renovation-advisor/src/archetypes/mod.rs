//! Archetype retrieval, ingestion and caching.

mod catalog;
pub mod domain;
#[cfg(test)]
pub(crate) mod fixtures;
mod http;
pub mod payload;
mod source;

pub use catalog::{ArchetypeCatalog, CatalogError};
pub use domain::{
    construction_period, ArchetypeDetails, ArchetypeKey, ArchetypeRecord, BuildingOptions,
    CatalogStatus, Coordinates,
};
pub use http::HttpArchetypeSource;
pub use payload::{
    ArchetypePayload, BuildingPayload, BuildingSurface, SurfaceKind, SurfaceRole, SystemPayload,
};
pub use source::{ArchetypeSource, SourceError, StaticArchetypeSource};
