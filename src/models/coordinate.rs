//! Planar and geographic coordinate types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransformationError;

/// Raw surveyed point as read off a survey plan, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyPoint {
    pub easting: f64,
    pub northing: f64,
}

impl SurveyPoint {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }
}

/// Validated point in a projected (Minna) reference frame, in meters.
///
/// Only constructed through [`PlanarBounds::validate`](crate::transform::PlanarBounds::validate),
/// so every instance is finite and inside the configured ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanarCoordinate {
    easting: f64,
    northing: f64,
}

impl PlanarCoordinate {
    pub(crate) fn new_unchecked(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }
}

/// Converted point: WGS84 position paired with the planar input it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicCoordinate {
    pub easting: f64,
    pub northing: f64,
    pub longitude: f64,
    pub latitude: f64,
}

impl GeographicCoordinate {
    /// (latitude, longitude) pair, the order the risk radar consumes
    pub fn lat_lon(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Supported projected zones of the Minna datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ProjectedZone {
    /// Minna / UTM zone 31N (EPSG:26331), western Lagos
    West,
    /// Minna / UTM zone 32N (EPSG:26332), eastern Lagos
    East,
}

impl ProjectedZone {
    pub fn all() -> &'static [ProjectedZone] {
        &[ProjectedZone::West, ProjectedZone::East]
    }

    /// EPSG code of the projected CRS
    pub fn epsg(&self) -> u32 {
        match self {
            ProjectedZone::West => 26331,
            ProjectedZone::East => 26332,
        }
    }

    /// Convert an EPSG code to a zone
    pub fn from_epsg(code: u32) -> Result<Self, TransformationError> {
        match code {
            26331 => Ok(ProjectedZone::West),
            26332 => Ok(ProjectedZone::East),
            other => Err(TransformationError::UnsupportedZone {
                requested: other.to_string(),
            }),
        }
    }

    /// UTM zone number
    pub fn utm_zone(&self) -> u8 {
        match self {
            ProjectedZone::West => 31,
            ProjectedZone::East => 32,
        }
    }

    /// Central meridian in degrees
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.utm_zone()) * 6.0 - 183.0
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectedZone::West => "Lagos West (Zone 31N)",
            ProjectedZone::East => "Lagos East (Zone 32N)",
        }
    }
}

impl fmt::Display for ProjectedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for ProjectedZone {
    type Err = TransformationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix("epsg:").unwrap_or(&normalized);
        match normalized {
            "west" | "31n" | "31" | "26331" => Ok(ProjectedZone::West),
            "east" | "32n" | "32" | "26332" => Ok(ProjectedZone::East),
            _ => Err(TransformationError::UnsupportedZone {
                requested: s.to_string(),
            }),
        }
    }
}

/// Longitude/latitude rectangle, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoEnvelope {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoEnvelope {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        [self.min_lon, self.max_lon, self.min_lat, self.max_lat]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lon < self.max_lon
            && self.min_lat < self.max_lat
    }
}
