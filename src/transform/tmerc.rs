//! Transverse Mercator projection using the 6th-order Krüger series.
//!
//! Accurate to well under a millimetre within a UTM zone, which is far
//! tighter than the 1e-6 degree agreement the converted boundaries need.

use super::Ellipsoid;

const NEWTON_MAX_ITER: usize = 10;
const NEWTON_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    e2: f64,
    /// Rectifying radius A
    a_hat: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let a_hat = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        let e2 = ellipsoid.e2();
        Self {
            lon0: central_meridian,
            k0,
            false_easting,
            false_northing,
            e: e2.sqrt(),
            e2,
            a_hat,
            alpha,
            beta,
        }
    }

    /// UTM north-hemisphere parameters for a central meridian
    pub fn utm_north(ellipsoid: Ellipsoid, central_meridian: f64) -> Self {
        Self::new(ellipsoid, central_meridian, 0.9996, 500_000.0, 0.0)
    }

    fn conformal_tau(&self, tau: f64) -> f64 {
        let sigma = (self.e * (self.e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
    }

    /// Geodetic degrees to (easting, northing) meters
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let phi = lat.to_radians();
        let (sin_l, cos_l) = (lon - self.lon0).to_radians().sin_cos();

        let tau_p = self.conformal_tau(phi.tan());
        let xi_p = tau_p.atan2(cos_l);
        let eta_p = (sin_l / (tau_p * tau_p + cos_l * cos_l).sqrt()).asinh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let x = self.k0 * self.a_hat * eta + self.false_easting;
        let y = self.k0 * self.a_hat * xi + self.false_northing;
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    /// (easting, northing) meters to geodetic degrees (lon, lat)
    pub fn inverse(&self, easting: f64, northing: f64) -> Option<(f64, f64)> {
        let eta = (easting - self.false_easting) / (self.k0 * self.a_hat);
        let xi = (northing - self.false_northing) / (self.k0 * self.a_hat);

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_p.sinh();
        let (sin_xi, cos_xi) = xi_p.sin_cos();
        let tau_p = sin_xi / (sinh_eta * sinh_eta + cos_xi * cos_xi).sqrt();

        // Newton-Raphson on tau = tan(phi)
        let mut tau = tau_p;
        for _ in 0..NEWTON_MAX_ITER {
            let tau_i = self.conformal_tau(tau);
            let delta = (tau_p - tau_i) / (1.0 + tau_i * tau_i).sqrt()
                * (1.0 + (1.0 - self.e2) * tau * tau)
                / ((1.0 - self.e2) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < NEWTON_EPSILON {
                break;
            }
        }

        let lat = tau.atan().to_degrees();
        let lon = self.lon0 + sinh_eta.atan2(cos_xi).to_degrees();
        (lon.is_finite() && lat.is_finite()).then_some((lon, lat))
    }
}
