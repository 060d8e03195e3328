//! Restricted-zone overlap detection.
//!
//! Parcels come in as (latitude, longitude) vertices, zone boundaries as
//! (longitude, latitude) pairs. Both are normalized to x = longitude,
//! y = latitude before any geometry runs.

mod geometry;
mod index;
mod radar;
mod scoring;

pub use radar::RiskRadar;
pub use scoring::{base_severity, severity_score, MAX_SEVERITY};
