//! Closed-form mean longitudes. Always available, accurate to a few degrees for the
//! inner bodies and far worse for the Moon's true position; meant as a fallback.

use crate::ephemeris::types::{EphemerisError, Longitudes, PositionSource};
use crate::time::days_since_j2000;
use crate::zodiac::{normalize_degrees, CelestialBody};

/// (mean longitude at J2000.0, mean daily motion) in degrees.
const MEAN_ELEMENTS: &[(CelestialBody, f64, f64)] = &[
    (CelestialBody::Sun, 280.461, 0.9856474),
    (CelestialBody::Moon, 218.316, 13.176396),
    (CelestialBody::Mercury, 252.251, 4.092317),
    (CelestialBody::Venus, 181.980, 1.602130),
    (CelestialBody::Mars, 355.433, 0.524032),
    (CelestialBody::Jupiter, 34.352, 0.083056),
    (CelestialBody::Saturn, 50.078, 0.033459),
    (CelestialBody::Uranus, 314.055, 0.011731),
    (CelestialBody::Neptune, 304.349, 0.006027),
    (CelestialBody::Pluto, 238.958, 0.003968),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Mean longitude of `body`; infallible.
    pub fn mean_longitude(&self, body: CelestialBody, julian_day: f64) -> f64 {
        let (base, rate) = MEAN_ELEMENTS
            .iter()
            .find(|(b, _, _)| *b == body)
            .map(|(_, base, rate)| (*base, *rate))
            .unwrap_or((0.0, 0.0));
        normalize_degrees(base + rate * days_since_j2000(julian_day))
    }

    pub fn all_longitudes(&self, julian_day: f64) -> Longitudes {
        CelestialBody::ALL
            .iter()
            .map(|&body| (body, self.mean_longitude(body, julian_day)))
            .collect()
    }
}

impl PositionSource for AnalyticEphemeris {
    fn name(&self) -> &'static str {
        "analytic"
    }

    fn compute_position(
        &self,
        body: CelestialBody,
        julian_day: f64,
    ) -> Result<f64, EphemerisError> {
        Ok(self.mean_longitude(body, julian_day))
    }
}
