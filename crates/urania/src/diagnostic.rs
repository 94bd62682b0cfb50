use crate::time::TimeError;
use crate::zodiac::CelestialBody;
use serde::Serialize;
use std::fmt;

/// A recovered failure that lowered the accuracy of a computed chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The moment could not be parsed; the chart was computed for J2000.0.
    TimeFallback { error: TimeError },
    /// The analytic approximation stood in for the precise ephemeris, for one body
    /// or (`body: None`) for the whole call.
    EphemerisFallback {
        body: Option<CelestialBody>,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TimeFallback { error } => {
                write!(f, "{error}; chart computed for J2000.0")
            }
            Diagnostic::EphemerisFallback {
                body: Some(body),
                reason,
            } => write!(f, "{body}: approximate position used ({reason})"),
            Diagnostic::EphemerisFallback { body: None, reason } => {
                write!(f, "approximate positions used for all bodies ({reason})")
            }
        }
    }
}
