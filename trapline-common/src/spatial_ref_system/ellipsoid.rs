/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

/// A reference ellipsoid, given by its semi-major axis (metres) and
/// inverse flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub name: &'static str,
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    /// GRS80, the ellipsoid of NZGD2000.
    pub const GRS80: Ellipsoid = Ellipsoid {
        name: "GRS 1980",
        semi_major_axis: 6_378_137.0,
        inverse_flattening: 298.257_222_101,
    };

    pub fn flattening(&self) -> f64 {
        1f64 / self.inverse_flattening
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        let f = self.flattening();
        (f * (2f64 - f)).sqrt()
    }

    /// Third flattening, n = f / (2 - f).
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2f64 - f)
    }
}

#[cfg(test)]
mod test {
    use super::Ellipsoid;

    #[test]
    fn test_grs80_constants() {
        let e = Ellipsoid::GRS80;
        assert!((e.eccentricity() - 0.081_819_191_042_8).abs() < 1e-12);
        assert!((e.third_flattening() - 0.001_679_220_394_6).abs() < 1e-12);
        // semi-minor axis
        let b = e.semi_major_axis * (1.0 - e.flattening());
        assert!((b - 6_356_752.314_140).abs() < 1e-5);
    }
}
