//! Severity scoring and verdict classification.

use crate::config::RiskConfig;
use crate::models::{IntersectionResult, RiskStatus, ZoneType};

/// Highest severity score
pub const MAX_SEVERITY: u8 = 5;

/// Base severity by zone type
pub fn base_severity(zone_type: &ZoneType) -> u8 {
    match zone_type {
        ZoneType::GovernmentAcquisition => 5,
        ZoneType::MilitaryReserve => 5,
        ZoneType::WaterfrontRestriction => 3,
        ZoneType::EnvironmentalProtection => 2,
        ZoneType::Other(_) => 3,
    }
}

/// Per-intersection score in 1..=5, bumped by how much of the parcel overlaps
pub fn severity_score(zone_type: &ZoneType, overlap_percentage: f64, config: &RiskConfig) -> u8 {
    let multiplier = if overlap_percentage > config.danger_threshold {
        1.5
    } else if overlap_percentage > config.caution_threshold {
        1.2
    } else {
        1.0
    };

    let score = (f64::from(base_severity(zone_type)) * multiplier).floor();
    score.min(f64::from(MAX_SEVERITY)) as u8
}

/// Status, message and recommendations for a set of intersections.
///
/// The decision keys off zone type first, then raw overlap. The aggregate
/// severity score is reported on the verdict but not consulted here.
pub(crate) fn classify(
    intersections: &[IntersectionResult],
    config: &RiskConfig,
) -> (RiskStatus, String, Vec<String>) {
    if intersections.is_empty() {
        return (
            RiskStatus::Safe,
            "No intersections with known restricted zones detected.".to_string(),
            recommendations(&[
                "Preliminary risk assessment appears favorable",
                "Recommend verifying with Lagos State Land Bureau for official confirmation",
                "Ensure all necessary permits and approvals are obtained",
            ]),
        );
    }

    // "First" is registry order, not worst severity or largest overlap
    if let Some(hit) = intersections.iter().find(|i| i.zone_type.is_high_severity()) {
        return (
            RiskStatus::Danger,
            format!("CRITICAL: Land overlaps with {}.", hit.zone_name),
            recommendations(&[
                "URGENT: Contact Lagos State Land Bureau immediately",
                "Verify official land status with Federal Ministry of Works",
                "Engage qualified legal counsel specializing in land acquisition",
                "Consider alternative properties outside restricted zones",
            ]),
        );
    }

    if let Some(hit) = intersections
        .iter()
        .find(|i| i.overlap_percentage > config.danger_threshold)
    {
        return (
            RiskStatus::Danger,
            format!(
                "High overlap percentage ({:.1}%) with restricted zone.",
                hit.overlap_percentage
            ),
            recommendations(&[
                "Consult with Lagos State Land Bureau",
                "Engage professional land surveyor for verification",
                "Review property title documentation thoroughly",
                "Consider renegotiating purchase terms",
            ]),
        );
    }

    let total_overlap: f64 = intersections.iter().map(|i| i.overlap_percentage).sum();
    (
        RiskStatus::Caution,
        format!(
            "Potential risk detected. {} zone(s) nearby with {:.1}% total overlap.",
            intersections.len(),
            total_overlap
        ),
        recommendations(&[
            "Verify exact boundaries with official sources",
            "Consult local land registry office",
            "Request additional documentation from seller",
            "Consider professional land survey before purchase",
        ]),
    )
}

fn recommendations(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
