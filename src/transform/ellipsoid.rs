//! Reference ellipsoids and the geocentric datum shift between them.

use crate::error::TransformationError;

const GEODETIC_MAX_ITER: usize = 20;
const GEODETIC_EPSILON: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub a: f64,
    /// Inverse flattening
    pub inv_f: f64,
}

impl Ellipsoid {
    /// Clarke 1880 (RGS), the ellipsoid of the Minna datum
    pub const CLARKE_1880_RGS: Ellipsoid = Ellipsoid {
        a: 6_378_249.145,
        inv_f: 293.465,
    };

    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        inv_f: 298.257_223_563,
    };

    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_f
    }

    /// First eccentricity squared
    pub fn e2(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Third flattening n = f / (2 - f)
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2.0 - f)
    }

    pub(crate) fn check(&self, crs: &str) -> Result<(), TransformationError> {
        if !(self.a.is_finite() && self.a > 0.0 && self.inv_f.is_finite() && self.inv_f > 1.0) {
            return Err(TransformationError::InvalidDefinition {
                crs: crs.to_string(),
                reason: format!("bad ellipsoid a={} 1/f={}", self.a, self.inv_f),
            });
        }
        Ok(())
    }

    /// Geodetic (degrees, meters) to earth-centred cartesian
    pub fn to_geocentric(&self, lon: f64, lat: f64, h: f64) -> [f64; 3] {
        let e2 = self.e2();
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
        let n = self.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        [
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - e2) + h) * sin_lat,
        ]
    }

    /// Earth-centred cartesian to geodetic (lon degrees, lat degrees, h meters)
    pub fn to_geodetic(&self, [x, y, z]: [f64; 3]) -> (f64, f64, f64) {
        let e2 = self.e2();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - e2));
        let mut h = 0.0;
        for _ in 0..GEODETIC_MAX_ITER {
            let sin_lat = lat.sin();
            let n = self.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
            h = p / lat.cos() - n;
            let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
            let converged = (next - lat).abs() < GEODETIC_EPSILON;
            lat = next;
            if converged {
                break;
            }
        }

        (lon.to_degrees(), lat.to_degrees(), h)
    }
}

/// Three-parameter geocentric translation (the `towgs84` form)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatumShift {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl DatumShift {
    /// Published Minna to WGS84 translation carried by EPSG:26331/26332
    pub const MINNA_TO_WGS84: DatumShift = DatumShift {
        dx: -92.0,
        dy: -93.0,
        dz: 122.0,
    };

    pub fn from_array([dx, dy, dz]: [f64; 3]) -> Self {
        Self { dx, dy, dz }
    }

    pub fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        [x + self.dx, y + self.dy, z + self.dz]
    }

    pub fn inverse(&self) -> DatumShift {
        DatumShift {
            dx: -self.dx,
            dy: -self.dy,
            dz: -self.dz,
        }
    }

    pub(crate) fn check(&self, crs: &str) -> Result<(), TransformationError> {
        if [self.dx, self.dy, self.dz].iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(TransformationError::InvalidDefinition {
                crs: crs.to_string(),
                reason: format!("non-finite datum shift {:?}", self),
            })
        }
    }
}
