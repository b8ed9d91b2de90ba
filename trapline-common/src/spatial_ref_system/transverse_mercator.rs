/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::Ellipsoid;
use std::io::{Error, ErrorKind};

const MAX_ITERATIONS: usize = 20;

/// Transverse Mercator projection evaluated with the Krüger n-series to
/// sixth order, which is good to well under a millimetre within a few
/// thousand kilometres of the central meridian.
///
/// References:
/// Karney, C.F.F., 2011. Transverse Mercator with an accuracy of a few
/// nanometers. Journal of Geodesy 85, 475–485.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// degrees
    pub central_meridian: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    /// degrees
    pub latitude_of_origin: f64,
    rectifying_radius: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
    northing_of_origin: f64,
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
        latitude_of_origin: f64,
    ) -> TransverseMercator {
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;
        let rectifying_radius = ellipsoid.semi_major_axis / (1f64 + n)
            * (1f64 + n2 / 4f64 + n4 / 64f64 + n6 / 256f64);
        let alpha = [
            n / 2f64 - 2f64 * n2 / 3f64 + 5f64 * n3 / 16f64 + 41f64 * n4 / 180f64
                - 127f64 * n5 / 288f64
                + 7891f64 * n6 / 37800f64,
            13f64 * n2 / 48f64 - 3f64 * n3 / 5f64 + 557f64 * n4 / 1440f64
                + 281f64 * n5 / 630f64
                - 1983433f64 * n6 / 1935360f64,
            61f64 * n3 / 240f64 - 103f64 * n4 / 140f64
                + 15061f64 * n5 / 26880f64
                + 167603f64 * n6 / 181440f64,
            49561f64 * n4 / 161280f64 - 179f64 * n5 / 168f64 + 6601661f64 * n6 / 7257600f64,
            34729f64 * n5 / 80640f64 - 3418889f64 * n6 / 1995840f64,
            212378941f64 * n6 / 319334400f64,
        ];
        let beta = [
            n / 2f64 - 2f64 * n2 / 3f64 + 37f64 * n3 / 96f64 - n4 / 360f64 - 81f64 * n5 / 512f64
                + 96199f64 * n6 / 604800f64,
            n2 / 48f64 + n3 / 15f64 - 437f64 * n4 / 1440f64 + 46f64 * n5 / 105f64
                - 1118711f64 * n6 / 3870720f64,
            17f64 * n3 / 480f64 - 37f64 * n4 / 840f64 - 209f64 * n5 / 4480f64
                + 5569f64 * n6 / 90720f64,
            4397f64 * n4 / 161280f64 - 11f64 * n5 / 504f64 - 830251f64 * n6 / 7257600f64,
            4583f64 * n5 / 161280f64 - 108847f64 * n6 / 3991680f64,
            20648693f64 * n6 / 638668800f64,
        ];
        let mut tm = TransverseMercator {
            ellipsoid,
            central_meridian,
            scale_factor,
            false_easting,
            false_northing,
            latitude_of_origin,
            rectifying_radius,
            alpha,
            beta,
            northing_of_origin: 0f64,
        };
        if latitude_of_origin != 0f64 {
            let (_, y0) = tm.project_unscaled(latitude_of_origin.to_radians(), 0f64);
            tm.northing_of_origin = scale_factor * rectifying_radius * y0;
        }
        tm
    }

    /// New Zealand Transverse Mercator 2000 (EPSG:2193).
    pub fn nztm2000() -> TransverseMercator {
        TransverseMercator::new(
            Ellipsoid::GRS80,
            173f64,
            0.9996f64,
            1_600_000f64,
            10_000_000f64,
            0f64,
        )
    }

    /// Returns (eta, xi) on the unit rectifying sphere for a latitude and a
    /// longitude difference from the central meridian, both in radians.
    fn project_unscaled(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let e = self.ellipsoid.eccentricity();
        let tau = phi.tan();
        let sigma = (e * (e * tau / (1f64 + tau * tau).sqrt()).atanh()).sinh();
        let tau_prime = tau * (1f64 + sigma * sigma).sqrt() - sigma * (1f64 + tau * tau).sqrt();
        let xi_prime = tau_prime.atan2(lambda.cos());
        let eta_prime =
            (lambda.sin() / (tau_prime * tau_prime + lambda.cos() * lambda.cos()).sqrt()).asinh();
        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2f64 * (j + 1) as f64;
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }
        (eta, xi)
    }

    /// Projects geographic coordinates (degrees) to easting and northing (metres).
    pub fn forward(&self, latitude: f64, longitude: f64) -> Result<(f64, f64), Error> {
        if !latitude.is_finite() || !longitude.is_finite() || latitude.abs() > 90f64 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid geographic coordinate ({}, {}).", latitude, longitude),
            ));
        }
        let mut lambda = (longitude - self.central_meridian).to_radians();
        // wrap to [-pi, pi]
        lambda = (lambda + std::f64::consts::PI).rem_euclid(2f64 * std::f64::consts::PI)
            - std::f64::consts::PI;
        let (eta, xi) = self.project_unscaled(latitude.to_radians(), lambda);
        let k0a = self.scale_factor * self.rectifying_radius;
        let easting = self.false_easting + k0a * eta;
        let northing = self.false_northing + k0a * xi - self.northing_of_origin;
        Ok((easting, northing))
    }

    /// Converts easting and northing (metres) to latitude and longitude (degrees).
    pub fn inverse(&self, easting: f64, northing: f64) -> Result<(f64, f64), Error> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid projected coordinate ({}, {}).", easting, northing),
            ));
        }
        let e = self.ellipsoid.eccentricity();
        let e2 = e * e;
        let k0a = self.scale_factor * self.rectifying_radius;
        let eta = (easting - self.false_easting) / k0a;
        let xi = (northing - self.false_northing + self.northing_of_origin) / k0a;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2f64 * (j + 1) as f64;
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }
        let sinh_eta_prime = eta_prime.sinh();
        let sin_xi_prime = xi_prime.sin();
        let cos_xi_prime = xi_prime.cos();
        let tau_prime =
            sin_xi_prime / (sinh_eta_prime * sinh_eta_prime + cos_xi_prime * cos_xi_prime).sqrt();

        // Newton-Raphson on tau
        let mut tau = tau_prime;
        for _ in 0..MAX_ITERATIONS {
            let sigma = (e * (e * tau / (1f64 + tau * tau).sqrt()).atanh()).sinh();
            let tau_i = tau * (1f64 + sigma * sigma).sqrt() - sigma * (1f64 + tau * tau).sqrt();
            let delta = (tau_prime - tau_i) / (1f64 + tau_i * tau_i).sqrt()
                * (1f64 + (1f64 - e2) * tau * tau)
                / ((1f64 - e2) * (1f64 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }
        let latitude = tau.atan().to_degrees();
        let longitude = self.central_meridian + sinh_eta_prime.atan2(cos_xi_prime).to_degrees();
        Ok((latitude, longitude))
    }
}
