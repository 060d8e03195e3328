//! Omo Radar - survey plan due diligence for Lagos land parcels
//!
//! This library converts Minna-datum survey coordinates to WGS84 and checks
//! the resulting parcels against a registry of restricted zones.

pub mod config;
pub mod error;
pub mod models;
pub mod risk;
pub mod transform;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{ExtractionRecord, GeographicCoordinate, ProjectedZone, RiskStatus, RiskVerdict};
pub use risk::RiskRadar;
pub use transform::CoordinateTransformer;
