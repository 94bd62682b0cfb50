//! Astrological chart computation: Julian Day conversion, planetary longitudes,
//! sign/house placement and aspect detection for natal and transit charts.

pub mod aspects;
pub mod chart;
pub mod diagnostic;
pub mod engine;
pub mod ephemeris;
pub mod interpret;
pub mod reference;
pub mod time;
pub mod zodiac;

pub use aspects::{AspectDetector, AspectMatch, AspectRule, AspectTable};
pub use chart::{ChartBuilder, ChartSnapshot, Placement, TransitComparison};
pub use diagnostic::Diagnostic;
pub use engine::ChartEngine;
pub use ephemeris::{AnalyticEphemeris, EphemerisProvider};
pub use interpret::Interpreter;
pub use reference::ReferenceData;
pub use time::TimeConverter;
pub use zodiac::{CelestialBody, ZodiacSign};

use urania_config::EngineSettings;

/// Everything loaded once at startup and shared read-only by every computation.
pub struct EngineResources {
    pub ephemeris: EphemerisProvider,
    pub aspects: AspectTable,
    pub reference: ReferenceData,
}

impl EngineResources {
    pub fn load(settings: &EngineSettings) -> Self {
        let reference = ReferenceData::load_dir(&settings.data_dir);
        let aspects = AspectTable::from_keywords(&reference.aspects);
        if aspects.is_empty() {
            log::warn!(
                "No aspect rules loaded from {}; charts will have no aspects",
                settings.data_dir.display()
            );
        }
        for (a, b) in aspects.overlapping_rules() {
            log::warn!(
                "Aspect tolerances overlap: {} and {}; both will be reported",
                a.aspect_type,
                b.aspect_type
            );
        }

        Self {
            ephemeris: EphemerisProvider::select(settings),
            aspects,
            reference,
        }
    }

    pub fn engine(&self) -> ChartEngine<'_> {
        ChartEngine::new(&self.ephemeris, &self.aspects, &self.reference.planets)
    }

    pub fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(&self.reference)
    }
}
