//! Daily forecast lines and the summary over a run of daily transit comparisons.

use super::{count_kind, Interpreter, CHALLENGING, HARMONIOUS};
use crate::aspects::{most_significant, AspectMatch};
use crate::chart::{ChartSnapshot, TransitComparison};
use crate::time::parse_date;
use crate::zodiac::CelestialBody;
use serde::Serialize;

/// Transits shown per day, tightest orb first.
pub const HIGHLIGHT_COUNT: usize = 3;
const DAILY_THEME_COUNT: usize = 3;
const WEEKLY_THEME_COUNT: usize = 5;
const KEY_DATE_COUNT: usize = 3;

/// Bodies whose sign sets the tone of a single day.
const FAST_BODIES: [CelestialBody; 5] = [
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
];

/// Overview of a transit series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub start_date: String,
    pub end_date: String,
    /// Distinct "{aspect} energy bringing {keyword}" lines in first-seen order.
    pub themes: Vec<String>,
    pub key_dates: Vec<String>,
    pub advice: String,
}

impl<'a> Interpreter<'a> {
    /// Sign descriptors of the fast-moving bodies, at most three.
    pub fn daily_themes(&self, chart: &ChartSnapshot) -> Vec<String> {
        FAST_BODIES
            .iter()
            .filter_map(|&body| {
                let placement = chart.placement(body)?;
                let info = self.data.signs.lookup(&placement.sign.data_key())?;
                let descriptor = info.get(3)?;
                Some(format!(
                    "{body} in {}: Focus on {descriptor} energy",
                    placement.sign
                ))
            })
            .take(DAILY_THEME_COUNT)
            .collect()
    }

    /// Interpretations of the tightest transits of one comparison.
    pub fn transit_highlights(&self, comparison: &TransitComparison) -> Vec<String> {
        most_significant(&comparison.aspects, HIGHLIGHT_COUNT)
            .iter()
            .map(|aspect| self.aspect(aspect))
            .collect()
    }

    pub fn daily_guidance(&self, chart: &ChartSnapshot, transits: &[AspectMatch]) -> String {
        let mut parts = Vec::new();

        let mood = chart
            .placement(CelestialBody::Moon)
            .and_then(|moon| self.data.signs.lookup(&moon.sign.data_key()))
            .and_then(|info| info.get(4));
        if let Some(mood) = mood {
            parts.push(format!("Emotional focus: {mood} approach today"));
        }
        if count_kind(transits, &CHALLENGING) > 0 {
            parts.push("Navigate challenges with patience and flexibility".to_string());
        }
        if count_kind(transits, &HARMONIOUS) > 0 {
            parts.push("Take advantage of favorable energy for important activities".to_string());
        }
        if parts.is_empty() {
            parts.push("A stable day for routine activities and steady progress".to_string());
        }

        parts.join(". ") + "."
    }

    pub fn weekly_summary(&self, series: &[TransitComparison]) -> WeeklySummary {
        let date_of = |c: &TransitComparison| c.transit.moment.date.clone();
        let start_date = series.first().map(date_of).unwrap_or_default();
        let end_date = series.last().map(date_of).unwrap_or_default();

        let mut themes: Vec<String> = Vec::new();
        for aspect in series.iter().flat_map(|c| &c.aspects) {
            if let Some(keyword) = aspect.keywords.first() {
                let theme = format!("{} energy bringing {keyword}", aspect.aspect_type);
                if !themes.contains(&theme) {
                    themes.push(theme);
                }
            }
        }
        themes.truncate(WEEKLY_THEME_COUNT);

        WeeklySummary {
            start_date,
            end_date,
            themes,
            key_dates: key_dates(series),
            advice: weekly_advice(series),
        }
    }
}

/// `Monday, March 04` for a `YYYY-MM-DD` date, the raw text otherwise.
pub(crate) fn day_label(date: &str) -> String {
    match parse_date(date) {
        Ok(day) => day.format("%A, %B %d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Days whose transit count is within one of the busiest day, in date order.
fn key_dates(series: &[TransitComparison]) -> Vec<String> {
    let active: Vec<_> = series.iter().filter(|c| !c.aspects.is_empty()).collect();
    let busiest = active.iter().map(|c| c.aspects.len()).max();

    let mut dates: Vec<String> = match busiest {
        Some(most) => active
            .iter()
            .filter(|c| c.aspects.len() + 1 >= most)
            .take(KEY_DATE_COUNT)
            .map(|c| {
                format!(
                    "{}: High astrological activity",
                    day_label(&c.transit.moment.date)
                )
            })
            .collect(),
        None => Vec::new(),
    };
    if dates.is_empty() {
        dates.push("Tuesday: Mid-week energy peak".to_string());
        dates.push("Friday: Prepare for weekend themes".to_string());
    }
    dates
}

fn weekly_advice(series: &[TransitComparison]) -> String {
    let all = || series.iter().flat_map(|c| &c.aspects);
    let parts = if all().next().is_none() {
        [
            "Quiet week perfect for reflection and planning",
            "Use this stable energy to organize and prepare for future goals",
        ]
    } else {
        let challenging = count_kind(all(), &CHALLENGING);
        let harmonious = count_kind(all(), &HARMONIOUS);
        if challenging > harmonious {
            [
                "This week emphasizes growth through challenges",
                "Stay flexible and patient with unexpected developments",
            ]
        } else if harmonious > challenging {
            [
                "Favorable week for pursuing goals and new opportunities",
                "Trust your instincts and take positive action",
            ]
        } else {
            [
                "Balanced week with both opportunities and lessons",
                "Focus on steady progress and mindful decisions",
            ]
        }
    };
    parts.join(". ") + "."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::BodyRef;
    use crate::chart::{MomentDescriptor, Placement, Placements};
    use crate::reference::{KeywordTable, ReferenceData};
    use crate::zodiac::ZodiacSign;

    fn data() -> ReferenceData {
        ReferenceData {
            signs: KeywordTable::parse(
                "ARIES:Fire;Cardinal;Mars;pioneering;bold\nTAURUS:Earth;Fixed;Venus;steady;patient\nGEMINI:Air;Mutable;Mercury",
            ),
            ..ReferenceData::default()
        }
    }

    fn snapshot(date: &str, lons: &[(CelestialBody, f64)]) -> ChartSnapshot {
        let placements: Placements = lons
            .iter()
            .map(|&(body, longitude)| {
                (
                    body,
                    Placement {
                        body,
                        longitude,
                        sign: ZodiacSign::from_longitude(longitude),
                        house: 1,
                        keywords: vec![],
                    },
                )
            })
            .collect();
        ChartSnapshot {
            moment: MomentDescriptor {
                date: date.to_string(),
                time: "12:00".to_string(),
                location: "Porto".to_string(),
                julian_day: 0.0,
            },
            placements,
            aspects: vec![],
            diagnostics: vec![],
        }
    }

    fn transit(kind: &str, orb: f64, keywords: &[&str]) -> AspectMatch {
        AspectMatch {
            from: BodyRef::natal(CelestialBody::Sun),
            to: BodyRef::transit(CelestialBody::Mars),
            separation: orb,
            aspect_type: kind.to_string(),
            exact_angle: 0.0,
            orb,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn day(date: &str, aspects: Vec<AspectMatch>) -> TransitComparison {
        TransitComparison {
            transit: snapshot(date, &[]),
            aspects,
        }
    }

    #[test]
    fn test_highlights_are_the_three_tightest() {
        let data = data();
        let interp = Interpreter::new(&data);
        let comparison = day(
            "2024-03-04",
            vec![
                transit("SQUARE", 5.0, &[]),
                transit("TRINE", 0.5, &[]),
                transit("SEXTILE", 3.0, &[]),
                transit("CONJUNCTION", 1.0, &[]),
            ],
        );
        let lines = interp.transit_highlights(&comparison);
        assert_eq!(lines.len(), HIGHLIGHT_COUNT);
        assert!(lines[0].contains("TRINE"));
        assert!(lines[1].contains("CONJUNCTION"));
        assert!(lines[2].contains("SEXTILE"));
    }

    #[test]
    fn test_daily_themes_use_fast_bodies_with_descriptors() {
        let data = data();
        let interp = Interpreter::new(&data);
        let chart = snapshot(
            "2024-03-04",
            &[
                (CelestialBody::Sun, 10.0),
                (CelestialBody::Moon, 70.0),
                (CelestialBody::Mercury, 40.0),
                (CelestialBody::Venus, 5.0),
                (CelestialBody::Jupiter, 45.0),
            ],
        );
        assert_eq!(
            interp.daily_themes(&chart),
            vec![
                "Sun in Aries: Focus on pioneering energy",
                "Mercury in Taurus: Focus on steady energy",
                "Venus in Aries: Focus on pioneering energy",
            ]
        );
    }

    #[test]
    fn test_daily_guidance() {
        let data = data();
        let interp = Interpreter::new(&data);
        let chart = snapshot("2024-03-04", &[(CelestialBody::Moon, 40.0)]);
        assert_eq!(
            interp.daily_guidance(&chart, &[transit("SQUARE", 1.0, &[]), transit("TRINE", 2.0, &[])]),
            "Emotional focus: patient approach today. Navigate challenges with patience and flexibility. Take advantage of favorable energy for important activities."
        );

        let quiet = snapshot("2024-03-04", &[(CelestialBody::Moon, 70.0)]);
        assert_eq!(
            interp.daily_guidance(&quiet, &[transit("CONJUNCTION", 1.0, &[])]),
            "A stable day for routine activities and steady progress."
        );
    }

    #[test]
    fn test_weekly_summary_collects_themes_dates_and_advice() {
        let data = data();
        let interp = Interpreter::new(&data);
        let series = vec![
            day("2024-03-04", vec![transit("SQUARE", 1.0, &["tension"])]),
            day("2024-03-05", vec![]),
            day(
                "2024-03-06",
                vec![
                    transit("SQUARE", 2.0, &["tension"]),
                    transit("OPPOSITION", 3.0, &["polarity"]),
                    transit("TRINE", 4.0, &[]),
                ],
            ),
            day(
                "2024-03-07",
                vec![
                    transit("SEXTILE", 1.0, &["ease"]),
                    transit("SQUARE", 1.5, &["tension"]),
                ],
            ),
        ];

        let summary = interp.weekly_summary(&series);
        assert_eq!(summary.start_date, "2024-03-04");
        assert_eq!(summary.end_date, "2024-03-07");
        assert_eq!(
            summary.themes,
            vec![
                "SQUARE energy bringing tension",
                "OPPOSITION energy bringing polarity",
                "SEXTILE energy bringing ease",
            ]
        );
        assert_eq!(
            summary.key_dates,
            vec![
                "Wednesday, March 06: High astrological activity",
                "Thursday, March 07: High astrological activity",
            ]
        );
        assert_eq!(
            summary.advice,
            "This week emphasizes growth through challenges. Stay flexible and patient with unexpected developments."
        );
    }

    #[test]
    fn test_quiet_week_uses_default_dates_and_advice() {
        let data = data();
        let interp = Interpreter::new(&data);
        let summary = interp.weekly_summary(&[day("2024-03-04", vec![])]);
        assert!(summary.themes.is_empty());
        assert_eq!(
            summary.key_dates,
            vec!["Tuesday: Mid-week energy peak", "Friday: Prepare for weekend themes"]
        );
        assert!(summary.advice.starts_with("Quiet week"));
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label("2024-02-29"), "Thursday, February 29");
        assert_eq!(day_label("someday"), "someday");
    }
}
