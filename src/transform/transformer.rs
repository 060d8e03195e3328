//! Minna projected zones to WGS84 geographic conversion.

use hashbrown::HashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{DatumShift, Ellipsoid, TransverseMercator};
use crate::config::TransformConfig;
use crate::error::{
    BatchFailure, Error, PlanarAxis, Result, TransformationError, ValidationError,
};
use crate::models::{GeoEnvelope, GeographicCoordinate, PlanarCoordinate, ProjectedZone, SurveyPoint};

/// Accepted planar ranges, in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarBounds {
    pub min_easting: f64,
    pub max_easting: f64,
    pub min_northing: f64,
    pub max_northing: f64,
}

impl Default for PlanarBounds {
    fn default() -> Self {
        Self {
            min_easting: 100_000.0,
            max_easting: 900_000.0,
            min_northing: 500_000.0,
            max_northing: 1_600_000.0,
        }
    }
}

impl PlanarBounds {
    /// Validate a raw easting/northing pair into a [`PlanarCoordinate`]
    pub fn validate(
        &self,
        easting: f64,
        northing: f64,
    ) -> std::result::Result<PlanarCoordinate, ValidationError> {
        check_axis(PlanarAxis::Easting, easting, self.min_easting, self.max_easting)?;
        check_axis(PlanarAxis::Northing, northing, self.min_northing, self.max_northing)?;
        Ok(PlanarCoordinate::new_unchecked(easting, northing))
    }
}

fn check_axis(
    axis: PlanarAxis,
    value: f64,
    min: f64,
    max: f64,
) -> std::result::Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { axis, value });
    }
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            axis,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Projection pipeline for one zone: TM inverse, then datum shift to WGS84
#[derive(Debug, Clone)]
struct ZoneProjection {
    zone: ProjectedZone,
    tmerc: TransverseMercator,
    source: Ellipsoid,
    target: Ellipsoid,
    shift: DatumShift,
}

impl ZoneProjection {
    fn new(zone: ProjectedZone, shift: DatumShift) -> std::result::Result<Self, TransformationError> {
        let crs = zone.to_string();
        let source = Ellipsoid::CLARKE_1880_RGS;
        let target = Ellipsoid::WGS84;
        source.check(&crs)?;
        target.check(&crs)?;
        shift.check(&crs)?;

        Ok(Self {
            zone,
            tmerc: TransverseMercator::utm_north(source, zone.central_meridian()),
            source,
            target,
            shift,
        })
    }

    fn to_geographic(&self, easting: f64, northing: f64) -> Option<(f64, f64)> {
        let (lon, lat) = self.tmerc.inverse(easting, northing)?;
        let xyz = self.shift.apply(self.source.to_geocentric(lon, lat, 0.0));
        let (lon, lat, _) = self.target.to_geodetic(xyz);
        (lon.is_finite() && lat.is_finite()).then_some((lon, lat))
    }

    fn to_planar(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let xyz = self.shift.inverse().apply(self.target.to_geocentric(lon, lat, 0.0));
        let (lon, lat, _) = self.source.to_geodetic(xyz);
        self.tmerc.forward(lon, lat)
    }

    fn projection_error(&self, x: f64, y: f64) -> TransformationError {
        TransformationError::Projection {
            crs: self.zone.to_string(),
            x,
            y,
        }
    }
}

/// Converts surveyed Minna coordinates into WGS84 longitude/latitude.
///
/// Holds one prepared projection per zone; safe to share across threads.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    bounds: PlanarBounds,
    plausible: GeoEnvelope,
    projections: HashMap<ProjectedZone, ZoneProjection>,
}

impl CoordinateTransformer {
    pub fn new(config: &TransformConfig) -> std::result::Result<Self, TransformationError> {
        if !config.plausible_envelope.is_well_formed() {
            return Err(TransformationError::InvalidDefinition {
                crs: "EPSG:4326".to_string(),
                reason: format!("malformed plausibility envelope {:?}", config.plausible_envelope),
            });
        }

        let shift = DatumShift::from_array(config.datum_shift);
        let mut projections = HashMap::new();

        for zone in ProjectedZone::all() {
            match ZoneProjection::new(*zone, shift) {
                Ok(projection) => {
                    info!(
                        "Initialized transformer for {} ({})",
                        zone.display_name(),
                        zone
                    );
                    projections.insert(*zone, projection);
                }
                Err(e) => {
                    error!("Failed to initialize coordinate transformers: {}", e);
                    return Err(e);
                }
            }
        }

        Ok(Self {
            bounds: config.planar_bounds,
            plausible: config.plausible_envelope,
            projections,
        })
    }

    pub fn bounds(&self) -> &PlanarBounds {
        &self.bounds
    }

    /// Check an easting/northing pair against the configured ranges
    pub fn validate(
        &self,
        easting: f64,
        northing: f64,
    ) -> std::result::Result<PlanarCoordinate, ValidationError> {
        self.bounds.validate(easting, northing)
    }

    fn projection(&self, zone: ProjectedZone) -> Result<&ZoneProjection> {
        self.projections.get(&zone).ok_or_else(|| {
            let err = TransformationError::UnsupportedZone {
                requested: zone.to_string(),
            };
            error!("{}", err);
            err.into()
        })
    }

    /// Convert one planar pair to (longitude, latitude).
    ///
    /// Results outside the plausible regional envelope are still returned,
    /// with a warning, since they usually mean the wrong zone was chosen.
    pub fn convert_one(&self, easting: f64, northing: f64, zone: ProjectedZone) -> Result<(f64, f64)> {
        let planar = self.validate(easting, northing).map_err(|e| {
            error!("Coordinate validation failed: {}", e);
            e
        })?;
        let projection = self.projection(zone)?;

        let (lon, lat) = projection
            .to_geographic(planar.easting(), planar.northing())
            .ok_or_else(|| {
                let err = projection.projection_error(easting, northing);
                error!("{}", err);
                err
            })?;

        debug!(
            "Converted ({}, {}) in {} to ({:.6}, {:.6}) in WGS84",
            easting, northing, zone, lon, lat
        );

        if !self.plausible.contains(lon, lat) {
            warn!(
                "Converted coordinates ({:.6}, {:.6}) are outside Nigeria's typical bounds. \
                 Please verify input coordinates and zone ({}).",
                lon,
                lat,
                zone.display_name()
            );
        }

        Ok((lon, lat))
    }

    /// Convert a whole boundary. All-or-nothing: any failing point fails the
    /// batch, and the error lists every failing index.
    pub fn convert_batch(
        &self,
        points: &[SurveyPoint],
        zone: ProjectedZone,
    ) -> Result<Vec<GeographicCoordinate>> {
        if points.is_empty() {
            warn!("Empty coordinates list provided to batch conversion");
            return Ok(Vec::new());
        }

        let results: Vec<Result<GeographicCoordinate>> = points
            .par_iter()
            .map(|p| {
                self.convert_one(p.easting, p.northing, zone)
                    .map(|(longitude, latitude)| GeographicCoordinate {
                        easting: p.easting,
                        northing: p.northing,
                        longitude,
                        latitude,
                    })
            })
            .collect();

        let mut converted = Vec::with_capacity(points.len());
        let mut failures = Vec::new();
        for (index, (result, input)) in results.into_iter().zip(points).enumerate() {
            match result {
                Ok(coord) => converted.push(coord),
                Err(e) => failures.push(BatchFailure {
                    index,
                    input: *input,
                    error: Box::new(e),
                }),
            }
        }

        if !failures.is_empty() {
            let err = TransformationError::Batch {
                failed: failures.len(),
                total: points.len(),
                failures,
            };
            error!("{}", err);
            return Err(err.into());
        }

        info!("Successfully converted {} coordinates", converted.len());
        Ok(converted)
    }

    /// Inverse conversion: WGS84 (longitude, latitude) back into the zone's
    /// planar frame. The result must land inside the accepted planar ranges.
    pub fn to_planar(&self, longitude: f64, latitude: f64, zone: ProjectedZone) -> Result<PlanarCoordinate> {
        let projection = self.projection(zone)?;
        let (easting, northing) = projection
            .to_planar(longitude, latitude)
            .ok_or_else(|| Error::from(projection.projection_error(longitude, latitude)))?;
        Ok(self.validate(easting, northing)?)
    }
}
