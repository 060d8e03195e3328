//! Error taxonomy shared by the transformer and the risk radar.
//!
//! `ValidationError` means the caller handed us bad data and can fix it.
//! `TransformationError` and `RiskAnalysisError` mean the operation itself
//! could not complete. Callers branch on [`Error`] to render the two
//! families differently.

use std::fmt;

use thiserror::Error;

use crate::models::SurveyPoint;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transformation(#[from] TransformationError),

    #[error(transparent)]
    RiskAnalysis(#[from] RiskAnalysisError),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Planar axis named in validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarAxis {
    Easting,
    Northing,
}

impl fmt::Display for PlanarAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanarAxis::Easting => write!(f, "easting"),
            PlanarAxis::Northing => write!(f, "northing"),
        }
    }
}

/// Geographic axis named in validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoAxis {
    Longitude,
    Latitude,
}

impl fmt::Display for GeoAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoAxis::Longitude => write!(f, "longitude"),
            GeoAxis::Latitude => write!(f, "latitude"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{axis} value {raw:?} is not numeric; please re-check the survey plan reading")]
    NotNumeric { axis: PlanarAxis, raw: String },

    #[error("{axis} coordinate {value} is not a valid number")]
    NotFinite { axis: PlanarAxis, value: f64 },

    #[error(
        "{axis} coordinate {value:.2} is outside valid range ({min} - {max} meters). \
         Please verify the coordinate value."
    )]
    OutOfRange {
        axis: PlanarAxis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("at least 3 vertices are required to form a polygon, got {0}")]
    TooFewVertices(usize),

    #[error("invalid {axis} {value} at index {index}")]
    VertexNotFinite {
        axis: GeoAxis,
        index: usize,
        value: f64,
    },

    #[error("{axis} {value} at index {index} is outside the supported region ({min}-{max})")]
    VertexOutOfBounds {
        axis: GeoAxis,
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("land coordinates form an invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("missing required field '{0}' in extraction record")]
    MissingField(&'static str),

    #[error("'{field}' must be a list, got {found}")]
    NotAList { field: &'static str, found: String },

    #[error("coordinate {index} must be an object with 'easting' and 'northing' keys")]
    MalformedCoordinate { index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformationError {
    #[error("invalid zone {requested:?}; valid zones are 26331 (West, Zone 31N) and 26332 (East, Zone 32N)")]
    UnsupportedZone { requested: String },

    #[error("invalid projection definition for {crs}: {reason}")]
    InvalidDefinition { crs: String, reason: String },

    #[error("coordinate transformation failed for ({x}, {y}) in {crs}: no finite result")]
    Projection { crs: String, x: f64, y: f64 },

    #[error("failed to convert {failed} out of {total} coordinates:\n{}", format_failures(.failures))]
    Batch {
        failed: usize,
        total: usize,
        failures: Vec<BatchFailure>,
    },
}

impl TransformationError {
    /// Indices that failed in a batch conversion (empty for other variants)
    pub fn failed_indices(&self) -> Vec<usize> {
        match self {
            TransformationError::Batch { failures, .. } => {
                failures.iter().map(|f| f.index).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// One failing item of a batch conversion
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub index: usize,
    pub input: SurveyPoint,
    pub error: Box<Error>,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error converting coordinate {} (easting={}, northing={}): {}",
            self.index, self.input.easting, self.input.northing, self.error
        )
    }
}

fn format_failures(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskAnalysisError {
    #[error("risk analysis failed: {0}")]
    Geometry(String),

    #[error("invalid risk configuration: {0}")]
    InvalidConfig(String),
}
