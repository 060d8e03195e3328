use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::models::{builtin_registry, GeoEnvelope, RestrictedZone};
use crate::transform::{DatumShift, PlanarBounds};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub transform: TransformConfig,
    pub risk: RiskConfig,
    /// Replaces the built-in registry when present
    pub zones: Option<Vec<RestrictedZone>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TransformConfig {
    /// Minna to WGS84 geocentric translation (dx, dy, dz) in meters
    pub datum_shift: [f64; 3],
    pub planar_bounds: PlanarBounds,
    /// Converted points outside this envelope are logged as suspicious
    pub plausible_envelope: GeoEnvelope,
}

impl Default for TransformConfig {
    fn default() -> Self {
        let shift = DatumShift::MINNA_TO_WGS84;
        Self {
            datum_shift: [shift.dx, shift.dy, shift.dz],
            planar_bounds: PlanarBounds::default(),
            plausible_envelope: GeoEnvelope {
                min_lon: 2.0,
                max_lon: 16.0,
                min_lat: 3.0,
                max_lat: 15.0,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RiskConfig {
    /// Overlap percentage above which any zone is a DANGER
    pub danger_threshold: f64,
    /// Overlap percentage above which severity is bumped
    pub caution_threshold: f64,
    /// Parcel vertices outside this envelope are rejected
    pub boundary_envelope: GeoEnvelope,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            danger_threshold: 20.0,
            caution_threshold: 5.0,
            boundary_envelope: GeoEnvelope {
                min_lon: 2.5,
                max_lon: 16.0,
                min_lat: 3.0,
                max_lat: 15.0,
            },
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Zone registry to run against: the configured table, or the built-in one
    pub fn registry(&self) -> Vec<RestrictedZone> {
        self.zones.clone().unwrap_or_else(builtin_registry)
    }
}
