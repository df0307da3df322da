//! Decision support for building renovation.
//!
//! The crate retrieves reference building archetypes, matches a user's building
//! to the closest one, applies parametric modifications to the archetype's
//! technical payload, and ranks renovation scenarios with TOPSIS.

pub mod archetypes;
pub mod config;
pub mod error;
pub mod matching;
pub mod ranking;
pub mod telemetry;
pub mod transform;
