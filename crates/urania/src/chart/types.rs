use crate::aspects::AspectMatch;
use crate::diagnostic::Diagnostic;
use crate::zodiac::{CelestialBody, ZodiacSign};
use serde::Serialize;
use std::collections::BTreeMap;

/// A body placed in a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub body: CelestialBody,
    /// Ecliptic longitude in `[0, 360)`
    pub longitude: f64,
    pub sign: ZodiacSign,
    /// House 1-12
    pub house: u8,
    pub keywords: Vec<String>,
}

impl Placement {
    /// Degrees within the sign, `[0, 30)`.
    pub fn degree_in_sign(&self) -> f64 {
        self.longitude % 30.0
    }

    /// Whole degrees and arc minutes within the sign, e.g. `(14, 7)` for 14°07'.
    pub fn degrees_minutes(&self) -> (u32, u32) {
        let within = self.degree_in_sign();
        let degrees = within.floor();
        let minutes = ((within - degrees) * 60.0).floor();
        (degrees as u32, minutes as u32)
    }
}

/// Placements keyed by body, iterated in canonical body order.
pub type Placements = BTreeMap<CelestialBody, Placement>;

/// The moment a chart was computed for, as requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentDescriptor {
    pub date: String,
    pub time: String,
    /// Free-text label. It is recorded only; it does not affect positions or houses.
    pub location: String,
    pub julian_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSnapshot {
    pub moment: MomentDescriptor,
    pub placements: Placements,
    /// Aspects between bodies of this chart.
    pub aspects: Vec<AspectMatch>,
    /// Fallbacks taken while computing this chart.
    pub diagnostics: Vec<Diagnostic>,
}

impl ChartSnapshot {
    pub fn placement(&self, body: CelestialBody) -> Option<&Placement> {
        self.placements.get(&body)
    }

    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// A transiting moment compared against a natal chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitComparison {
    pub transit: ChartSnapshot,
    /// Natal-to-transit aspects; `from` is the natal body, `to` the transiting one.
    pub aspects: Vec<AspectMatch>,
}
