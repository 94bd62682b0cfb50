pub mod analytic;
pub mod fallback;
pub mod precise;
pub mod types;

pub use analytic::AnalyticEphemeris;
pub use fallback::FallbackEphemeris;
pub use precise::SwissEphemeris;
pub use types::{
    EphemerisError, EphemerisReading, Longitudes, PositionOrigin, PositionSource,
};

use std::collections::BTreeMap;
use urania_config::EngineSettings;

/// The ephemeris strategy chosen once at startup.
pub enum EphemerisProvider {
    /// Swiss Ephemeris, falling back to the analytic formulas per body or per call.
    Precise(FallbackEphemeris<SwissEphemeris>),
    /// Analytic approximation only.
    Analytic(AnalyticEphemeris),
}

impl EphemerisProvider {
    /// Use the precise ephemeris when enabled and its data initializes, otherwise the
    /// analytic approximation.
    pub fn select(settings: &EngineSettings) -> Self {
        if !settings.use_precise {
            log::info!("Precise ephemeris disabled; using analytic approximation");
            return Self::analytic();
        }

        match SwissEphemeris::new(Some(settings.ephemeris_path.clone())) {
            Ok(swisseph) => {
                log::info!(
                    "Using Swiss Ephemeris data at {}",
                    swisseph.ephemeris_path().display()
                );
                Self::Precise(FallbackEphemeris::new(swisseph))
            }
            Err(e) => {
                log::warn!("Could not load Swiss Ephemeris: {e}");
                log::warn!("Falling back to analytic approximation");
                Self::analytic()
            }
        }
    }

    pub fn analytic() -> Self {
        Self::Analytic(AnalyticEphemeris::new())
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Precise(p) => p.primary().name(),
            Self::Analytic(a) => a.name(),
        }
    }

    /// Longitudes of all ten bodies. Never fails: every failure has an analytic substitute,
    /// recorded in the reading's diagnostics.
    pub fn longitudes_at(&self, julian_day: f64) -> EphemerisReading {
        let reading = match self {
            Self::Precise(p) => p.read(julian_day),
            Self::Analytic(a) => {
                let longitudes = a.all_longitudes(julian_day);
                let origins: BTreeMap<_, _> = longitudes
                    .keys()
                    .map(|&body| (body, PositionOrigin::Analytic))
                    .collect();
                EphemerisReading {
                    longitudes,
                    origins,
                    diagnostics: Vec::new(),
                }
            }
        };
        log::debug!(
            "{} ephemeris at JD {julian_day}: {} bodies, {} fallbacks",
            self.strategy_name(),
            reading.longitudes.len(),
            reading.diagnostics.len()
        );
        reading
    }
}
