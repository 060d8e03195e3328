//! Record produced by the document-extraction service.
//!
//! The service itself lives outside this crate. We only enforce the shape
//! of its JSON output before any coordinate reaches the transformer.

use serde::Serialize;
use serde_json::Value;

use super::SurveyPoint;
use crate::error::{PlanarAxis, ValidationError};

const REQUIRED_FIELDS: [&str; 5] = [
    "survey_number",
    "surveyor_name",
    "location_text",
    "coordinates",
    "red_flags",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    pub survey_number: String,
    pub surveyor_name: String,
    pub location_text: String,
    pub coordinates: Vec<SurveyPoint>,
    pub red_flags: Vec<String>,
}

impl ExtractionRecord {
    /// Check the extraction JSON against the input contract and build a record.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        for field in REQUIRED_FIELDS {
            if value.get(field).is_none() {
                return Err(ValidationError::MissingField(field));
            }
        }

        let coordinates = match &value["coordinates"] {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| parse_point(index, item))
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(ValidationError::NotAList {
                    field: "coordinates",
                    found: json_type_name(other).to_string(),
                })
            }
        };

        let red_flags = match &value["red_flags"] {
            Value::Array(items) => items.iter().map(text_of).collect(),
            other => {
                return Err(ValidationError::NotAList {
                    field: "red_flags",
                    found: json_type_name(other).to_string(),
                })
            }
        };

        Ok(Self {
            survey_number: text_of(&value["survey_number"]),
            surveyor_name: text_of(&value["surveyor_name"]),
            location_text: text_of(&value["location_text"]),
            coordinates,
            red_flags,
        })
    }

    /// Human-readable listing of the extracted points
    pub fn coordinates_summary(&self) -> String {
        if self.coordinates.is_empty() {
            return "No coordinates found".to_string();
        }

        let mut lines = vec![format!("Total coordinates: {}\n", self.coordinates.len())];
        for (idx, point) in self.coordinates.iter().enumerate() {
            lines.push(format!(
                "  Point {}: E={}, N={}",
                idx + 1,
                point.easting,
                point.northing
            ));
        }
        lines.join("\n")
    }
}

fn parse_point(index: usize, item: &Value) -> Result<SurveyPoint, ValidationError> {
    let (Some(easting), Some(northing)) = (item.get("easting"), item.get("northing")) else {
        return Err(ValidationError::MalformedCoordinate { index });
    };
    Ok(SurveyPoint {
        easting: parse_number(PlanarAxis::Easting, easting)?,
        northing: parse_number(PlanarAxis::Northing, northing)?,
    })
}

/// Accepts JSON numbers and numeric strings ("512345.67", " 700000 ").
fn parse_number(axis: PlanarAxis, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::NotNumeric {
        axis,
        raw: value.to_string(),
    })
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "survey_number": "LS/D/1234",
            "surveyor_name": "Surv. A. Bello",
            "location_text": "Lekki, Lagos",
            "coordinates": [
                {"easting": 543210.5, "northing": 712345.25},
                {"easting": "543300", "northing": "712400.0"}
            ],
            "red_flags": ["Faded seal"]
        })
    }

    #[test]
    fn test_parses_numbers_and_numeric_strings() {
        let record = ExtractionRecord::from_json(&sample()).unwrap();
        assert_eq!(record.coordinates.len(), 2);
        assert_eq!(record.coordinates[1], SurveyPoint::new(543300.0, 712400.0));
        assert_eq!(record.red_flags, vec!["Faded seal".to_string()]);
    }

    #[test]
    fn test_missing_field() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("surveyor_name");
        let err = ExtractionRecord::from_json(&value).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("surveyor_name"));
    }

    #[test]
    fn test_non_list_coordinates() {
        let mut value = sample();
        value["coordinates"] = json!("543210, 712345");
        let err = ExtractionRecord::from_json(&value).unwrap_err();
        assert!(err.to_string().contains("'coordinates' must be a list, got string"));
    }

    #[test]
    fn test_non_list_red_flags() {
        let mut value = sample();
        value["red_flags"] = json!({"seal": "faded"});
        let err = ExtractionRecord::from_json(&value).unwrap_err();
        assert!(matches!(err, ValidationError::NotAList { field: "red_flags", .. }));
    }

    #[test]
    fn test_coordinate_missing_northing() {
        let mut value = sample();
        value["coordinates"][1] = json!({"easting": 543300});
        let err = ExtractionRecord::from_json(&value).unwrap_err();
        assert_eq!(err, ValidationError::MalformedCoordinate { index: 1 });
    }

    #[test]
    fn test_non_numeric_value() {
        let mut value = sample();
        value["coordinates"][0]["easting"] = json!("54321O.5");
        let err = ExtractionRecord::from_json(&value).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotNumeric {
                axis: PlanarAxis::Easting,
                ..
            }
        ));
    }

    #[test]
    fn test_coordinates_summary() {
        let record = ExtractionRecord::from_json(&sample()).unwrap();
        let summary = record.coordinates_summary();
        assert!(summary.starts_with("Total coordinates: 2\n"));
        assert!(summary.contains("  Point 1: E=543210.5, N=712345.25"));

        let empty = ExtractionRecord {
            coordinates: vec![],
            ..record
        };
        assert_eq!(empty.coordinates_summary(), "No coordinates found");
    }
}
