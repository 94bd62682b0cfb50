use crate::chart::houses::HouseCusps;
use crate::chart::types::{ChartSnapshot, MomentDescriptor, Placement, Placements};
use crate::diagnostic::Diagnostic;
use crate::ephemeris::Longitudes;
use crate::reference::KeywordTable;
use crate::zodiac::{normalize_degrees, ZodiacSign};

/// The ascendant is fixed at 0° Aries; house cusps do not depend on time or location.
pub const FIXED_ASCENDANT: f64 = 0.0;

/// Places bodies into signs and equal houses.
pub struct ChartBuilder<'a> {
    planet_keywords: &'a KeywordTable,
    houses: HouseCusps,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(planet_keywords: &'a KeywordTable) -> Self {
        Self {
            planet_keywords,
            houses: HouseCusps::equal(FIXED_ASCENDANT),
        }
    }

    pub fn houses(&self) -> &HouseCusps {
        &self.houses
    }

    /// Snapshot for `moment` with no aspects yet.
    pub fn build(
        &self,
        moment: MomentDescriptor,
        longitudes: &Longitudes,
        diagnostics: Vec<Diagnostic>,
    ) -> ChartSnapshot {
        let placements: Placements = longitudes
            .iter()
            .map(|(&body, &lon)| {
                let longitude = normalize_degrees(lon);
                let keywords = self
                    .planet_keywords
                    .lookup(&body.data_key())
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                (
                    body,
                    Placement {
                        body,
                        longitude,
                        sign: ZodiacSign::from_longitude(longitude),
                        house: self.houses.house_of(longitude),
                        keywords,
                    },
                )
            })
            .collect();

        ChartSnapshot {
            moment,
            placements,
            aspects: Vec::new(),
            diagnostics,
        }
    }
}
