use crate::diagnostic::Diagnostic;
use crate::zodiac::CelestialBody;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Ephemeris unavailable: {message}")]
    Unavailable { message: String },
    #[error("Failed to calculate position for {body} at JD {julian_day}: {message}")]
    CalculationFailed {
        body: CelestialBody,
        julian_day: f64,
        message: String,
    },
}

impl EphemerisError {
    /// Whether the error concerns the whole data source rather than a single body.
    pub fn is_provider_level(&self) -> bool {
        matches!(
            self,
            EphemerisError::FileNotFound { .. } | EphemerisError::Unavailable { .. }
        )
    }
}

/// Ecliptic longitude per body, iterated in canonical body order.
pub type Longitudes = BTreeMap<CelestialBody, f64>;

/// Capability shared by every ephemeris strategy.
pub trait PositionSource {
    fn name(&self) -> &'static str;

    /// Geocentric ecliptic longitude in `[0, 360)`.
    fn compute_position(&self, body: CelestialBody, julian_day: f64)
        -> Result<f64, EphemerisError>;

    /// Provider-level readiness, checked once per call before any body is computed.
    fn health_check(&self) -> Result<(), EphemerisError> {
        Ok(())
    }

    fn longitudes_at(&self, julian_day: f64) -> Result<Longitudes, EphemerisError> {
        self.health_check()?;
        CelestialBody::ALL
            .iter()
            .map(|&body| Ok((body, self.compute_position(body, julian_day)?)))
            .collect()
    }
}

/// Where a longitude came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionOrigin {
    Precise,
    Analytic,
}

/// Longitudes for all ten bodies plus any fallbacks taken to produce them.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisReading {
    pub longitudes: Longitudes,
    pub origins: BTreeMap<CelestialBody, PositionOrigin>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EphemerisReading {
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
