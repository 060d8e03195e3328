//! Parcel overlap checks against the restricted-zone registry.

use geo::{Area, BooleanOps, BoundingRect, Intersects, Polygon};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::geometry::{coord_from_lat_lon, polygon_from_ring, round_to};
use super::index::{CompiledZone, ZoneIndex};
use super::scoring::{classify, severity_score};
use crate::config::RiskConfig;
use crate::error::{Error, GeoAxis, Result, RiskAnalysisError, ValidationError};
use crate::models::{IntersectionResult, RestrictedZone, RiskVerdict, ZoneType};

/// Risk detection engine for land acquisition analysis.
///
/// Zone polygons are compiled once at construction. Every check is a pure
/// read, so one radar can serve any number of threads.
pub struct RiskRadar {
    config: RiskConfig,
    registry: Vec<RestrictedZone>,
    index: ZoneIndex,
}

impl RiskRadar {
    pub fn new(registry: Vec<RestrictedZone>, config: RiskConfig) -> std::result::Result<Self, RiskAnalysisError> {
        check_config(&config)?;
        let index = ZoneIndex::build(&registry);
        if index.is_empty() {
            warn!("No active restricted zones; every parcel will check SAFE");
        } else if index.len() < registry.len() {
            warn!(
                "{} of {} registry zones are inactive",
                registry.len() - index.len(),
                registry.len()
            );
        }
        Ok(Self {
            config,
            registry,
            index,
        })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Full registry, in registry order (including zones that failed to compile)
    pub fn zones(&self) -> &[RestrictedZone] {
        &self.registry
    }

    pub fn zone_info(&self, zone_id: &str) -> Option<&RestrictedZone> {
        self.registry.iter().find(|z| z.zone_id == zone_id)
    }

    pub fn zones_by_type(&self, zone_type: &ZoneType) -> Vec<&RestrictedZone> {
        self.registry
            .iter()
            .filter(|z| &z.zone_type == zone_type)
            .collect()
    }

    /// Number of zones that compiled and take part in checks
    pub fn active_zone_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_active(&self, zone_id: &str) -> bool {
        self.index.get(zone_id).is_some()
    }

    /// Check parcel vertices, given as (latitude, longitude) pairs.
    pub fn validate_boundary(&self, vertices: &[(f64, f64)]) -> std::result::Result<(), ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewVertices(vertices.len()));
        }

        let env = &self.config.boundary_envelope;
        for (index, &(lat, lon)) in vertices.iter().enumerate() {
            for (axis, value, min, max) in [
                (GeoAxis::Latitude, lat, env.min_lat, env.max_lat),
                (GeoAxis::Longitude, lon, env.min_lon, env.max_lon),
            ] {
                if !value.is_finite() {
                    return Err(ValidationError::VertexNotFinite { axis, index, value });
                }
                if !(min..=max).contains(&value) {
                    return Err(ValidationError::VertexOutOfBounds {
                        axis,
                        index,
                        value,
                        min,
                        max,
                    });
                }
            }
        }

        Ok(())
    }

    /// Check a parcel, given as (latitude, longitude) vertices, against the
    /// registry, or against the single zone named by `zone_filter`.
    pub fn check_intersection(
        &self,
        vertices: &[(f64, f64)],
        zone_filter: Option<&str>,
    ) -> Result<RiskVerdict> {
        self.analyze(vertices, zone_filter).map_err(|e| {
            if !e.is_validation() {
                error!("{}", e);
            }
            e
        })
    }

    fn analyze(&self, vertices: &[(f64, f64)], zone_filter: Option<&str>) -> Result<RiskVerdict> {
        self.validate_boundary(vertices)?;

        let parcel = polygon_from_ring(vertices.iter().copied().map(coord_from_lat_lon))
            .map_err(ValidationError::InvalidPolygon)?;

        let parcel_area = parcel.unsigned_area();
        if !parcel_area.is_finite() {
            return Err(RiskAnalysisError::Geometry(format!(
                "parcel area is not finite ({})",
                parcel_area
            ))
            .into());
        }

        let candidates = self.select_zones(&parcel, zone_filter)?;

        let mut intersections = Vec::new();
        let mut max_severity = 0;

        for zone in &candidates {
            match evaluate_zone(&parcel, parcel_area, zone, &self.config) {
                Ok(Some(hit)) => {
                    max_severity = max_severity.max(hit.severity_score);
                    intersections.push(hit);
                }
                Ok(None) => {}
                Err(reason) => {
                    warn!(
                        "Geometry error checking intersection with zone {}: {}",
                        zone.zone.zone_id, reason
                    );
                }
            }
        }

        let (status, message, recommendations) = classify(&intersections, &self.config);

        info!(
            "Risk analysis complete: {} with {} intersections",
            status,
            intersections.len()
        );

        Ok(RiskVerdict {
            status,
            message,
            intersections,
            recommendations,
            max_severity,
        })
    }

    fn select_zones(&self, parcel: &Polygon<f64>, zone_filter: Option<&str>) -> Result<Vec<Arc<CompiledZone>>> {
        if let Some(zone_id) = zone_filter {
            if self.zone_info(zone_id).is_some() {
                return Ok(match self.index.get(zone_id) {
                    Some(zone) => vec![Arc::clone(zone)],
                    None => {
                        warn!("Zone polygon not available for {}", zone_id);
                        Vec::new()
                    }
                });
            }
            debug!("Zone filter {} not in registry, checking all zones", zone_id);
        }

        let rect = parcel.bounding_rect().ok_or_else(|| {
            Error::from(RiskAnalysisError::Geometry(
                "parcel has no bounding rectangle".to_string(),
            ))
        })?;
        Ok(self.index.candidates(rect))
    }
}

/// Overlap of the parcel with one zone, or `None` when they do not meet.
/// Errors are per-zone and never abort the whole check.
fn evaluate_zone(
    parcel: &Polygon<f64>,
    parcel_area: f64,
    compiled: &CompiledZone,
    config: &RiskConfig,
) -> std::result::Result<Option<IntersectionResult>, String> {
    let intersection_area = catch_unwind(AssertUnwindSafe(|| {
        if parcel.intersects(&compiled.polygon) {
            Some(parcel.intersection(&compiled.polygon).unsigned_area())
        } else {
            None
        }
    }))
    .map_err(|_| "geometry kernel panicked".to_string())?;

    let Some(intersection_area) = intersection_area else {
        return Ok(None);
    };
    if !intersection_area.is_finite() {
        return Err(format!("non-finite intersection area {}", intersection_area));
    }

    let overlap = if parcel_area > 0.0 {
        intersection_area / parcel_area * 100.0
    } else {
        0.0
    };

    let zone = &compiled.zone;
    let score = severity_score(&zone.zone_type, overlap, config);

    info!(
        "Intersection detected with {}: {:.2}% overlap",
        zone.zone_name, overlap
    );

    Ok(Some(IntersectionResult {
        zone_id: zone.zone_id.clone(),
        zone_name: zone.zone_name.clone(),
        zone_type: zone.zone_type.clone(),
        severity: zone.severity_level,
        severity_score: score,
        overlap_percentage: round_to(overlap, 2),
        intersection_area: round_to(intersection_area, 6),
        acquisition_date: zone.acquisition_date,
        description: zone.description.clone(),
    }))
}

fn check_config(config: &RiskConfig) -> std::result::Result<(), RiskAnalysisError> {
    let RiskConfig {
        danger_threshold,
        caution_threshold,
        boundary_envelope,
    } = config;

    if !(danger_threshold.is_finite() && caution_threshold.is_finite()) {
        return Err(RiskAnalysisError::InvalidConfig(
            "thresholds must be finite".to_string(),
        ));
    }
    if caution_threshold > danger_threshold {
        return Err(RiskAnalysisError::InvalidConfig(format!(
            "caution threshold {} exceeds danger threshold {}",
            caution_threshold, danger_threshold
        )));
    }
    if !boundary_envelope.is_well_formed() {
        return Err(RiskAnalysisError::InvalidConfig(format!(
            "malformed boundary envelope {:?}",
            boundary_envelope
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{builtin_registry, RiskStatus, SeverityLevel};
    use chrono::NaiveDate;

    fn radar() -> RiskRadar {
        RiskRadar::new(builtin_registry(), RiskConfig::default()).unwrap()
    }

    /// Rectangle as (lat, lon) vertices
    fn parcel(lat: (f64, f64), lon: (f64, f64)) -> Vec<(f64, f64)> {
        vec![(lat.1, lon.0), (lat.1, lon.1), (lat.0, lon.1), (lat.0, lon.0)]
    }

    fn synthetic(id: &str, zone_type: ZoneType, lon: (f64, f64), lat: (f64, f64)) -> RestrictedZone {
        RestrictedZone {
            zone_id: id.to_string(),
            zone_name: format!("Zone {}", id),
            zone_type,
            acquisition_date: NaiveDate::from_ymd_opt(2012, 6, 1).unwrap(),
            severity_level: SeverityLevel::Medium,
            boundary: vec![[lon.0, lat.0], [lon.1, lat.0], [lon.1, lat.1], [lon.0, lat.1]],
            description: "synthetic".to_string(),
        }
    }

    #[test]
    fn test_lekki_example() {
        let vertices = vec![(6.4475, 3.52), (6.4475, 3.53), (6.4445, 3.53), (6.4445, 3.52)];
        let verdict = radar().check_intersection(&vertices, None).unwrap();

        assert_eq!(verdict.status, RiskStatus::Danger);
        assert_eq!(verdict.intersections.len(), 1);
        let hit = &verdict.intersections[0];
        assert_eq!(hit.zone_name, "Lekki Government Acquisition Zone");
        assert_eq!(verdict.message, "CRITICAL: Land overlaps with Lekki Government Acquisition Zone.");
        // The zone's northern edge is latitude 6.447, so the top 0.0005 of the
        // 0.003-tall parcel sits outside it
        assert!((hit.overlap_percentage - 83.33).abs() < 0.01, "{}", hit.overlap_percentage);
        assert!((hit.intersection_area - 0.000025).abs() < 1e-9);
        assert_eq!(hit.severity_score, 5);
        assert_eq!(verdict.max_severity, 5);
    }

    #[test]
    fn test_parcel_strictly_inside_acquisition_zone() {
        let verdict = radar()
            .check_intersection(&parcel((6.42, 6.43), (3.52, 3.53)), None)
            .unwrap();
        assert_eq!(verdict.status, RiskStatus::Danger);
        assert_eq!(verdict.intersections.len(), 1);
        assert!((verdict.intersections[0].overlap_percentage - 100.0).abs() < 1e-6);
        assert_eq!(verdict.intersections[0].zone_id, "gov_001");
    }

    #[test]
    fn test_axis_order_convention() {
        // Same parcel with the pair order flipped lands in open country
        let flipped: Vec<(f64, f64)> = parcel((6.42, 6.43), (3.52, 3.53))
            .into_iter()
            .map(|(lat, lon)| (lon, lat))
            .collect();
        let verdict = radar().check_intersection(&flipped, None).unwrap();
        assert_eq!(verdict.status, RiskStatus::Safe);
    }

    #[test]
    fn test_disjoint_parcel_is_safe() {
        let verdict = radar()
            .check_intersection(&parcel((10.0, 10.1), (8.0, 8.1)), None)
            .unwrap();
        assert_eq!(verdict.status, RiskStatus::Safe);
        assert!(verdict.intersections.is_empty());
        assert_eq!(verdict.recommendations.len(), 3);
        assert_eq!(verdict.max_severity, 0);
    }

    #[test]
    fn test_caution_for_two_minor_overlaps() {
        let registry = vec![
            synthetic("creek", ZoneType::EnvironmentalProtection, (3.092, 3.2), (5.9, 6.2)),
            synthetic("shore", ZoneType::WaterfrontRestriction, (2.9, 3.01), (5.9, 6.2)),
        ];
        let radar = RiskRadar::new(registry, RiskConfig::default()).unwrap();
        let verdict = radar
            .check_intersection(&parcel((6.0, 6.1), (3.0, 3.1)), None)
            .unwrap();

        assert_eq!(verdict.status, RiskStatus::Caution);
        assert_eq!(verdict.intersections.len(), 2);
        assert_eq!(verdict.intersections[0].zone_id, "creek");
        assert!((verdict.intersections[0].overlap_percentage - 8.0).abs() < 0.01);
        assert!((verdict.intersections[1].overlap_percentage - 10.0).abs() < 0.01);
        assert!((verdict.total_overlap() - 18.0).abs() < 0.02);
        assert_eq!(
            verdict.message,
            "Potential risk detected. 2 zone(s) nearby with 18.0% total overlap."
        );
        assert_eq!(verdict.max_severity, 3);
    }

    #[test]
    fn test_danger_for_high_overlap_of_minor_zone() {
        let registry = vec![synthetic("shore", ZoneType::WaterfrontRestriction, (3.05, 3.2), (5.9, 6.2))];
        let radar = RiskRadar::new(registry, RiskConfig::default()).unwrap();
        let verdict = radar
            .check_intersection(&parcel((6.0, 6.1), (3.0, 3.1)), None)
            .unwrap();

        assert_eq!(verdict.status, RiskStatus::Danger);
        assert_eq!(verdict.message, "High overlap percentage (50.0%) with restricted zone.");
        assert_eq!(verdict.intersections[0].severity_score, 4);
    }

    #[test]
    fn test_tie_break_follows_registry_order() {
        let registry = vec![
            synthetic("barracks", ZoneType::MilitaryReserve, (3.09, 3.2), (5.9, 6.2)),
            synthetic("acquired", ZoneType::GovernmentAcquisition, (2.9, 3.05), (5.9, 6.2)),
        ];
        let radar = RiskRadar::new(registry, RiskConfig::default()).unwrap();
        let verdict = radar
            .check_intersection(&parcel((6.0, 6.1), (3.0, 3.1)), None)
            .unwrap();

        // "acquired" overlaps far more, but "barracks" comes first
        assert_eq!(verdict.message, "CRITICAL: Land overlaps with Zone barracks.");
        assert_eq!(verdict.intersections[0].zone_id, "barracks");
        assert_eq!(verdict.intersections[1].zone_id, "acquired");
    }

    #[test]
    fn test_touching_parcel_counts_with_zero_overlap() {
        let registry = vec![synthetic("creek", ZoneType::EnvironmentalProtection, (3.1, 3.2), (6.0, 6.1))];
        let radar = RiskRadar::new(registry, RiskConfig::default()).unwrap();
        let verdict = radar
            .check_intersection(&parcel((6.0, 6.1), (3.0, 3.1)), None)
            .unwrap();

        assert_eq!(verdict.status, RiskStatus::Caution);
        assert_eq!(verdict.intersections.len(), 1);
        assert!(verdict.intersections[0].overlap_percentage.abs() < 1e-6);
    }

    #[test]
    fn test_unrecognized_zone_type_is_reported_verbatim() {
        let flood = ZoneType::Other("Flood Plain".to_string());
        let registry = vec![synthetic("basin", flood.clone(), (3.09, 3.2), (5.9, 6.2))];
        let radar = RiskRadar::new(registry, RiskConfig::default()).unwrap();
        let verdict = radar
            .check_intersection(&parcel((6.0, 6.1), (3.0, 3.1)), None)
            .unwrap();

        assert_eq!(verdict.status, RiskStatus::Caution);
        assert_eq!(verdict.intersections[0].zone_type, flood);
        assert_eq!(verdict.intersections[0].severity_score, 3);
        assert_eq!(radar.zones_by_type(&flood).len(), 1);
    }

    #[test]
    fn test_zone_filter() {
        let radar = radar();
        let inside_lekki = parcel((6.42, 6.43), (3.52, 3.53));

        let only_vi = radar.check_intersection(&inside_lekki, Some("gov_002")).unwrap();
        assert_eq!(only_vi.status, RiskStatus::Safe);

        let only_lekki = radar.check_intersection(&inside_lekki, Some("gov_001")).unwrap();
        assert_eq!(only_lekki.status, RiskStatus::Danger);

        // Unknown filter falls back to the whole registry
        let unknown = radar.check_intersection(&inside_lekki, Some("gov_999")).unwrap();
        assert_eq!(unknown.status, RiskStatus::Danger);
    }

    #[test]
    fn test_invalid_zone_is_skipped() {
        let mut registry = builtin_registry();
        registry[0].boundary = vec![[3.503, 6.447], [3.558, 6.401], [3.558, 6.447], [3.503, 6.401]];
        let radar = RiskRadar::new(registry, RiskConfig::default()).unwrap();
        assert_eq!(radar.active_zone_count(), 3);
        assert_eq!(radar.zones().len(), 4);
        assert!(!radar.is_active("gov_001"));
        assert!(radar.is_active("gov_002"));

        let inside_lekki = parcel((6.42, 6.43), (3.52, 3.53));
        let verdict = radar.check_intersection(&inside_lekki, None).unwrap();
        assert_eq!(verdict.status, RiskStatus::Safe);

        let filtered = radar.check_intersection(&inside_lekki, Some("gov_001")).unwrap();
        assert_eq!(filtered.status, RiskStatus::Safe);
    }

    #[test]
    fn test_too_few_vertices() {
        let err = radar()
            .check_intersection(&[(6.4, 3.5), (6.41, 3.51)], None)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("at least 3"), "{err}");
    }

    #[test]
    fn test_vertex_outside_envelope() {
        let err = radar()
            .validate_boundary(&[(6.4, 3.5), (6.41, 3.51), (2.9, 3.5)])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::VertexOutOfBounds {
                axis: GeoAxis::Latitude,
                index: 2,
                value: 2.9,
                min: 3.0,
                max: 15.0,
            }
        );

        let err = radar()
            .validate_boundary(&[(6.4, 3.5), (6.41, f64::INFINITY), (6.42, 3.5)])
            .unwrap_err();
        assert!(matches!(err, ValidationError::VertexNotFinite { index: 1, .. }));
    }

    #[test]
    fn test_self_intersecting_parcel() {
        let bowtie = vec![(6.42, 3.52), (6.43, 3.53), (6.42, 3.53), (6.43, 3.52)];
        let err = radar().check_intersection(&bowtie, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidPolygon(_))
        ));
    }

    #[test]
    fn test_registry_queries() {
        let radar = radar();
        assert_eq!(
            radar.zone_info("gov_004").map(|z| z.zone_name.as_str()),
            Some("Badagry Creek Environmental Protection")
        );
        assert!(radar.zone_info("nope").is_none());
        let high: Vec<_> = radar
            .zones_by_type(&ZoneType::MilitaryReserve)
            .into_iter()
            .map(|z| z.zone_id.as_str())
            .collect();
        assert_eq!(high, vec!["gov_003"]);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = RiskConfig {
            danger_threshold: 5.0,
            caution_threshold: 20.0,
            ..RiskConfig::default()
        };
        assert!(matches!(
            RiskRadar::new(builtin_registry(), config),
            Err(RiskAnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let radar = radar();
        let inside_lekki = parcel((6.42, 6.43), (3.52, 3.53));
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| radar.check_intersection(&inside_lekki, None).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap().status, RiskStatus::Danger);
            }
        });
    }
}
