//! Restricted-zone registry records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of restriction a zone carries.
///
/// Serialized as the registry's display string. Type strings we do not
/// recognize are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneType {
    GovernmentAcquisition,
    MilitaryReserve,
    WaterfrontRestriction,
    EnvironmentalProtection,
    Other(String),
}

impl ZoneType {
    /// Recognized zone types, in severity order
    pub const KNOWN: [ZoneType; 4] = [
        ZoneType::GovernmentAcquisition,
        ZoneType::MilitaryReserve,
        ZoneType::WaterfrontRestriction,
        ZoneType::EnvironmentalProtection,
    ];

    /// Acquisition-class zones: any overlap at all is a DANGER verdict
    pub fn is_high_severity(&self) -> bool {
        matches!(self, ZoneType::GovernmentAcquisition | ZoneType::MilitaryReserve)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ZoneType::GovernmentAcquisition => "Government Acquisition",
            ZoneType::MilitaryReserve => "Military Reserve",
            ZoneType::WaterfrontRestriction => "Waterfront Restriction",
            ZoneType::EnvironmentalProtection => "Environmental Protection",
            ZoneType::Other(name) => name,
        }
    }
}

impl From<String> for ZoneType {
    fn from(name: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|t| t.as_str() == name)
            .unwrap_or(ZoneType::Other(name))
    }
}

impl From<ZoneType> for String {
    fn from(zone_type: ZoneType) -> Self {
        match zone_type {
            ZoneType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static severity class attached to a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityLevel {
    High,
    Medium,
}

/// A government-restricted area.
///
/// `boundary` is stored as (longitude, latitude) pairs, the order the registry
/// is published in. The radar converts it once, at compile time, into its
/// canonical x = longitude / y = latitude polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedZone {
    pub zone_id: String,
    pub zone_name: String,
    pub zone_type: ZoneType,
    pub acquisition_date: NaiveDate,
    pub severity_level: SeverityLevel,
    pub boundary: Vec<[f64; 2]>,
    pub description: String,
}

/// Date literal for the built-in table below
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("built-in zone table holds a valid date")
}

fn zone(
    zone_id: &str,
    zone_name: &str,
    zone_type: ZoneType,
    acquisition_date: NaiveDate,
    severity_level: SeverityLevel,
    boundary: &[[f64; 2]],
    description: &str,
) -> RestrictedZone {
    RestrictedZone {
        zone_id: zone_id.to_string(),
        zone_name: zone_name.to_string(),
        zone_type,
        acquisition_date,
        severity_level,
        boundary: boundary.to_vec(),
        description: description.to_string(),
    }
}

/// Built-in Lagos registry, in registry (tie-break) order.
pub fn builtin_registry() -> Vec<RestrictedZone> {
    [
        zone(
            "gov_001",
            "Lekki Government Acquisition Zone",
            ZoneType::GovernmentAcquisition,
            date(2006, 1, 1),
            SeverityLevel::High,
            &[[3.503, 6.447], [3.558, 6.447], [3.558, 6.401], [3.503, 6.401]],
            "Federal government acquisition zone covering Lekki Peninsula",
        ),
        zone(
            "gov_002",
            "Victoria Island Waterfront Restriction",
            ZoneType::WaterfrontRestriction,
            date(2010, 5, 15),
            SeverityLevel::Medium,
            &[[3.390, 6.445], [3.410, 6.445], [3.410, 6.465], [3.390, 6.465]],
            "Coastal protection and waterfront development restrictions",
        ),
        zone(
            "gov_003",
            "Ikeja Military Reserve",
            ZoneType::MilitaryReserve,
            date(1995, 3, 20),
            SeverityLevel::High,
            &[[3.320, 6.580], [3.340, 6.580], [3.340, 6.600], [3.320, 6.600]],
            "Nigerian Air Force military installation and buffer zone",
        ),
        zone(
            "gov_004",
            "Badagry Creek Environmental Protection",
            ZoneType::EnvironmentalProtection,
            date(2015, 8, 10),
            SeverityLevel::Medium,
            &[[2.900, 6.400], [2.950, 6.400], [2.950, 6.450], [2.900, 6.450]],
            "Environmental protection zone for Badagry Creek ecosystem",
        ),
    ]
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_order() {
        let ids: Vec<_> = builtin_registry().into_iter().map(|z| z.zone_id).collect();
        assert_eq!(ids, vec!["gov_001", "gov_002", "gov_003", "gov_004"]);
    }

    #[test]
    fn test_builtin_registry_dates() {
        let dates: Vec<_> = builtin_registry()
            .into_iter()
            .map(|z| z.acquisition_date.to_string())
            .collect();
        assert_eq!(dates, vec!["2006-01-01", "2010-05-15", "1995-03-20", "2015-08-10"]);
    }

    #[test]
    fn test_unknown_zone_type_survives_toml() {
        let toml_src = r#"
            zone_id = "t2"
            zone_name = "Flood Basin"
            zone_type = "Flood Plain"
            acquisition_date = "2021-07-01"
            severity_level = "MEDIUM"
            boundary = [[3.0, 6.0], [3.1, 6.0], [3.1, 6.1]]
            description = "synthetic"
        "#;
        let zone: RestrictedZone = toml::from_str(toml_src).unwrap();
        assert_eq!(zone.zone_type.as_str(), "Flood Plain");

        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["zone_type"], "Flood Plain");
    }

    #[test]
    fn test_zone_type_serde_names() {
        let json = serde_json::to_string(&ZoneType::MilitaryReserve).unwrap();
        assert_eq!(json, "\"Military Reserve\"");

        let parsed: ZoneType = serde_json::from_str("\"Flood Plain\"").unwrap();
        assert_eq!(parsed, ZoneType::Other("Flood Plain".to_string()));
        assert_eq!(parsed.to_string(), "Flood Plain");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"Flood Plain\"");
    }

    #[test]
    fn test_high_severity_types() {
        assert!(ZoneType::GovernmentAcquisition.is_high_severity());
        assert!(ZoneType::MilitaryReserve.is_high_severity());
        assert!(!ZoneType::WaterfrontRestriction.is_high_severity());
        assert!(!ZoneType::Other("Flood Plain".to_string()).is_high_severity());
    }

    #[test]
    fn test_registry_toml_shape() {
        let toml_src = r#"
            zone_id = "t1"
            zone_name = "Test"
            zone_type = "Environmental Protection"
            acquisition_date = "2020-02-02"
            severity_level = "MEDIUM"
            boundary = [[3.0, 6.0], [3.1, 6.0], [3.1, 6.1]]
            description = "synthetic"
        "#;
        let zone: RestrictedZone = toml::from_str(toml_src).unwrap();
        assert_eq!(zone.zone_type, ZoneType::EnvironmentalProtection);
        assert_eq!(zone.severity_level, SeverityLevel::Medium);
        assert_eq!(zone.boundary[1], [3.1, 6.0]);
    }
}
