//! Core data models for survey conversion and risk analysis.

pub mod coordinate;
pub mod extraction;
pub mod verdict;
pub mod zone;

pub use coordinate::{GeoEnvelope, GeographicCoordinate, PlanarCoordinate, ProjectedZone, SurveyPoint};
pub use extraction::ExtractionRecord;
pub use verdict::{IntersectionResult, RiskStatus, RiskVerdict};
pub use zone::{builtin_registry, RestrictedZone, SeverityLevel, ZoneType};
