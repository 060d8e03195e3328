//! Risk verdict returned by the radar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{SeverityLevel, ZoneType};

/// Overall risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskStatus {
    Danger,
    Caution,
    Safe,
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskStatus::Danger => write!(f, "DANGER"),
            RiskStatus::Caution => write!(f, "CAUTION"),
            RiskStatus::Safe => write!(f, "SAFE"),
        }
    }
}

/// One parcel/zone overlap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionResult {
    pub zone_id: String,
    pub zone_name: String,
    pub zone_type: ZoneType,
    /// Static severity class of the zone
    pub severity: SeverityLevel,
    /// Computed 1-5 score for this overlap
    pub severity_score: u8,
    /// Share of the parcel inside the zone, rounded to 2 decimals
    pub overlap_percentage: f64,
    /// Overlap area in square degrees, rounded to 6 decimals
    pub intersection_area: f64,
    pub acquisition_date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub status: RiskStatus,
    pub message: String,
    pub intersections: Vec<IntersectionResult>,
    pub recommendations: Vec<String>,
    /// Highest severity score across intersections (0 when there are none)
    pub max_severity: u8,
}

impl RiskVerdict {
    /// Sum of overlap percentages across every intersecting zone
    pub fn total_overlap(&self) -> f64 {
        self.intersections
            .iter()
            .map(|i| i.overlap_percentage)
            .sum()
    }
}
