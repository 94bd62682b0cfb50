use crate::diagnostic::Diagnostic;
use crate::ephemeris::analytic::AnalyticEphemeris;
use crate::ephemeris::types::{
    EphemerisError, EphemerisReading, Longitudes, PositionOrigin, PositionSource,
};
use crate::zodiac::CelestialBody;
use std::collections::BTreeMap;

/// Wraps a primary source and substitutes the analytic approximation wherever it fails.
///
/// A single body's failure only replaces that body. A provider-level failure, either from
/// the health check or from any body lookup, switches the rest of the call to the
/// analytic path.
pub struct FallbackEphemeris<P> {
    primary: P,
    fallback: AnalyticEphemeris,
}

impl<P: PositionSource> FallbackEphemeris<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: AnalyticEphemeris::new(),
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn read(&self, julian_day: f64) -> EphemerisReading {
        let mut longitudes = Longitudes::new();
        let mut origins = BTreeMap::new();
        let mut diagnostics = Vec::new();

        let mut degraded = match self.primary.health_check() {
            Ok(()) => false,
            Err(e) => {
                log::warn!(
                    "{} ephemeris unavailable: {e}; falling back to analytic positions",
                    self.primary.name()
                );
                diagnostics.push(Diagnostic::EphemerisFallback {
                    body: None,
                    reason: e.to_string(),
                });
                true
            }
        };

        for body in CelestialBody::ALL {
            if !degraded {
                match self.primary.compute_position(body, julian_day) {
                    Ok(lon) => {
                        longitudes.insert(body, lon);
                        origins.insert(body, PositionOrigin::Precise);
                        continue;
                    }
                    Err(e) if e.is_provider_level() => {
                        log::warn!(
                            "{} ephemeris failed at {body}: {e}; using analytic positions for the rest of this chart",
                            self.primary.name()
                        );
                        diagnostics.push(Diagnostic::EphemerisFallback {
                            body: None,
                            reason: e.to_string(),
                        });
                        degraded = true;
                    }
                    Err(e) => {
                        log::warn!("Could not calculate {body}: {e}");
                        diagnostics.push(Diagnostic::EphemerisFallback {
                            body: Some(body),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            longitudes.insert(body, self.fallback.mean_longitude(body, julian_day));
            origins.insert(body, PositionOrigin::Analytic);
        }

        EphemerisReading {
            longitudes,
            origins,
            diagnostics,
        }
    }
}

impl<P: PositionSource> PositionSource for FallbackEphemeris<P> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn compute_position(
        &self,
        body: CelestialBody,
        julian_day: f64,
    ) -> Result<f64, EphemerisError> {
        Ok(self
            .primary
            .compute_position(body, julian_day)
            .unwrap_or_else(|_| self.fallback.mean_longitude(body, julian_day)))
    }

    fn longitudes_at(&self, julian_day: f64) -> Result<Longitudes, EphemerisError> {
        Ok(self.read(julian_day).longitudes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fixed longitudes, with optional failures.
    struct ScriptedSource {
        failing: Vec<CelestialBody>,
        provider_failure_at: Option<CelestialBody>,
        healthy: bool,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn healthy() -> Self {
            Self {
                failing: vec![],
                provider_failure_at: None,
                healthy: true,
                calls: Cell::new(0),
            }
        }
    }

    impl PositionSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn health_check(&self) -> Result<(), EphemerisError> {
            if self.healthy {
                Ok(())
            } else {
                Err(EphemerisError::Unavailable {
                    message: "data file missing".to_string(),
                })
            }
        }

        fn compute_position(
            &self,
            body: CelestialBody,
            julian_day: f64,
        ) -> Result<f64, EphemerisError> {
            self.calls.set(self.calls.get() + 1);
            if self.provider_failure_at == Some(body) {
                return Err(EphemerisError::Unavailable {
                    message: "kernel closed".to_string(),
                });
            }
            if self.failing.contains(&body) {
                return Err(EphemerisError::CalculationFailed {
                    body,
                    julian_day,
                    message: "segment missing".to_string(),
                });
            }
            Ok(body.swisseph_id() as f64 * 10.0 + 1.0)
        }
    }

    #[test]
    fn test_healthy_primary_is_used_for_every_body() {
        let eph = FallbackEphemeris::new(ScriptedSource::healthy());
        let reading = eph.read(2451545.0);
        assert!(!reading.is_degraded());
        assert_eq!(reading.longitudes.len(), 10);
        assert_eq!(reading.longitudes[&CelestialBody::Mars], 41.0);
        assert!(reading
            .origins
            .values()
            .all(|o| *o == PositionOrigin::Precise));
    }

    #[test]
    fn test_single_body_failure_only_replaces_that_body() {
        let source = ScriptedSource {
            failing: vec![CelestialBody::Moon],
            ..ScriptedSource::healthy()
        };
        let eph = FallbackEphemeris::new(source);
        let jd = 2451545.0;
        let reading = eph.read(jd);

        let analytic = AnalyticEphemeris::new();
        assert_eq!(
            reading.longitudes[&CelestialBody::Moon],
            analytic.mean_longitude(CelestialBody::Moon, jd)
        );
        assert_eq!(reading.origins[&CelestialBody::Moon], PositionOrigin::Analytic);
        assert_eq!(reading.longitudes[&CelestialBody::Sun], 1.0);
        assert_eq!(reading.longitudes[&CelestialBody::Pluto], 91.0);
        assert_eq!(
            reading.diagnostics,
            vec![Diagnostic::EphemerisFallback {
                body: Some(CelestialBody::Moon),
                reason: "Failed to calculate position for Moon at JD 2451545: segment missing"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn test_unhealthy_primary_degrades_whole_call() {
        let source = ScriptedSource {
            healthy: false,
            ..ScriptedSource::healthy()
        };
        let eph = FallbackEphemeris::new(source);
        let jd = 2448027.1;
        let reading = eph.read(jd);

        assert_eq!(eph.primary().calls.get(), 0);
        assert_eq!(reading.longitudes, AnalyticEphemeris::new().all_longitudes(jd));
        assert_eq!(reading.diagnostics.len(), 1);
        assert!(matches!(
            reading.diagnostics[0],
            Diagnostic::EphemerisFallback { body: None, .. }
        ));
    }

    #[test]
    fn test_provider_failure_mid_call_switches_remaining_bodies() {
        let source = ScriptedSource {
            provider_failure_at: Some(CelestialBody::Mars),
            ..ScriptedSource::healthy()
        };
        let eph = FallbackEphemeris::new(source);
        let reading = eph.read(2451545.0);

        assert_eq!(reading.origins[&CelestialBody::Venus], PositionOrigin::Precise);
        for body in [
            CelestialBody::Mars,
            CelestialBody::Jupiter,
            CelestialBody::Pluto,
        ] {
            assert_eq!(reading.origins[&body], PositionOrigin::Analytic);
        }
        // Sun..Mars queried, nothing after the provider failed
        assert_eq!(eph.primary().calls.get(), 5);
        assert_eq!(reading.diagnostics.len(), 1);
    }
}
