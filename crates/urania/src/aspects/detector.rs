use crate::aspects::types::{AspectMatch, AspectTable, BodyRef, ChartLayer};
use crate::chart::Placements;

/// Minor-arc angle between two longitudes, in `[0, 180]`.
pub fn angular_separation(lon_a: f64, lon_b: f64) -> f64 {
    let raw_diff = (lon_a - lon_b).abs() % 360.0;
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Matches body pairs against an aspect table.
///
/// A pair is tested against every rule and yields one match per rule it satisfies; the
/// detector does not pick a best match when tolerances overlap.
pub struct AspectDetector<'a> {
    table: &'a AspectTable,
}

impl<'a> AspectDetector<'a> {
    pub fn new(table: &'a AspectTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AspectTable {
        self.table
    }

    /// Compare two placement sets. Passing the same set twice (the same reference) compares
    /// every unordered pair within it as a natal chart. Any other pair of sets, including two
    /// equal copies, is treated as natal against transit: every cross pair except a body with
    /// itself. Call [`detect_within`](Self::detect_within) or
    /// [`detect_between`](Self::detect_between) to choose explicitly.
    pub fn detect(&self, a: &Placements, b: &Placements) -> Vec<AspectMatch> {
        if std::ptr::eq(a, b) {
            self.detect_within(a, ChartLayer::Natal)
        } else {
            self.detect_between(a, b)
        }
    }

    /// Aspects between bodies of one chart, pairs in canonical order.
    pub fn detect_within(&self, placements: &Placements, layer: ChartLayer) -> Vec<AspectMatch> {
        let bodies: Vec<_> = placements.values().collect();

        let mut matches = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let p1 = bodies[i];
                let p2 = bodies[j];
                self.match_pair(
                    BodyRef { layer, body: p1.body },
                    p1.longitude,
                    BodyRef { layer, body: p2.body },
                    p2.longitude,
                    &mut matches,
                );
            }
        }
        matches
    }

    /// Aspects from each natal body to each transiting body, skipping a body to itself.
    pub fn detect_between(&self, natal: &Placements, transit: &Placements) -> Vec<AspectMatch> {
        let mut matches = Vec::new();
        for p1 in natal.values() {
            for p2 in transit.values() {
                if p1.body == p2.body {
                    continue;
                }
                self.match_pair(
                    BodyRef::natal(p1.body),
                    p1.longitude,
                    BodyRef::transit(p2.body),
                    p2.longitude,
                    &mut matches,
                );
            }
        }
        matches
    }

    fn match_pair(
        &self,
        from: BodyRef,
        lon_from: f64,
        to: BodyRef,
        lon_to: f64,
        out: &mut Vec<AspectMatch>,
    ) {
        let separation = angular_separation(lon_from, lon_to);
        for rule in self.table.rules() {
            if let Some(orb) = rule.orb_for(separation) {
                out.push(AspectMatch {
                    from,
                    to,
                    separation,
                    aspect_type: rule.aspect_type.clone(),
                    exact_angle: rule.exact_angle,
                    orb,
                    keywords: rule.keywords.clone(),
                });
            }
        }
    }
}

/// The `n` tightest matches, by ascending orb. Ties keep detection order.
pub fn most_significant(matches: &[AspectMatch], n: usize) -> Vec<AspectMatch> {
    let mut sorted = matches.to_vec();
    sorted.sort_by(|a, b| a.orb.total_cmp(&b.orb));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::types::AspectRule;
    use crate::chart::Placement;
    use crate::zodiac::{CelestialBody, ZodiacSign};
    use approx::assert_abs_diff_eq;

    fn placements(lons: &[(CelestialBody, f64)]) -> Placements {
        lons.iter()
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
            .collect()
    }

    #[test]
    fn test_separation_folds_to_minor_arc() {
        assert_abs_diff_eq!(angular_separation(355.0, 5.0), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angular_separation(5.0, 355.0), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angular_separation(5.0, 185.0), 180.0);
        assert_abs_diff_eq!(angular_separation(0.0, 350.0), 10.0);
        assert_eq!(angular_separation(42.0, 42.0), 0.0);
    }

    #[test]
    fn test_sextile_exact() {
        let table = AspectTable::standard();
        let detector = AspectDetector::new(&table);
        let chart = placements(&[(CelestialBody::Sun, 10.0), (CelestialBody::Moon, 70.0)]);
        let matches = detector.detect(&chart, &chart);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].aspect_type, "SEXTILE");
        assert_eq!(matches[0].orb, 0.0);
        assert_eq!(matches[0].from, BodyRef::natal(CelestialBody::Sun));
        assert_eq!(matches[0].to, BodyRef::natal(CelestialBody::Moon));
    }

    #[test]
    fn test_opposition_across_wrap() {
        let table = AspectTable::standard();
        let detector = AspectDetector::new(&table);
        let chart = placements(&[(CelestialBody::Sun, 5.0), (CelestialBody::Mars, 185.0)]);
        let matches = detector.detect(&chart, &chart);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].aspect_type, "OPPOSITION");
        assert_eq!(matches[0].separation, 180.0);
    }

    #[test]
    fn test_overlapping_rules_emit_every_match() {
        let table = AspectTable::new(vec![
            AspectRule::new("SEMISQUARE", 45.0, 5.0, &[]),
            AspectRule::new("SEXTILE", 60.0, 12.0, &[]),
        ]);
        let detector = AspectDetector::new(&table);
        let chart = placements(&[(CelestialBody::Sun, 0.0), (CelestialBody::Moon, 49.0)]);
        let types: Vec<_> = detector
            .detect(&chart, &chart)
            .into_iter()
            .map(|m| m.aspect_type)
            .collect();
        assert_eq!(types, vec!["SEMISQUARE", "SEXTILE"]);
    }

    #[test]
    fn test_natal_pairs_in_canonical_order() {
        let table = AspectTable::new(vec![AspectRule::new("ANY", 90.0, 90.0, &[])]);
        let detector = AspectDetector::new(&table);
        let chart = placements(&[
            (CelestialBody::Mars, 30.0),
            (CelestialBody::Sun, 10.0),
            (CelestialBody::Moon, 20.0),
        ]);
        let pairs: Vec<_> = detector
            .detect(&chart, &chart)
            .into_iter()
            .map(|m| (m.from.body, m.to.body))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (CelestialBody::Sun, CelestialBody::Moon),
                (CelestialBody::Sun, CelestialBody::Mars),
                (CelestialBody::Moon, CelestialBody::Mars),
            ]
        );
    }

    #[test]
    fn test_transit_skips_same_body() {
        let table = AspectTable::standard();
        let detector = AspectDetector::new(&table);
        let natal = placements(&[(CelestialBody::Sun, 10.0), (CelestialBody::Moon, 100.0)]);
        let transit = placements(&[(CelestialBody::Sun, 10.0), (CelestialBody::Moon, 10.0)]);
        let matches = detector.detect(&natal, &transit);
        // Sun/Sun and Moon/Moon skipped; natal Sun conjunct transit Moon, natal Moon square transit Sun
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].from, BodyRef::natal(CelestialBody::Sun));
        assert_eq!(matches[0].to, BodyRef::transit(CelestialBody::Moon));
        assert_eq!(matches[0].aspect_type, "CONJUNCTION");
        assert_eq!(matches[1].aspect_type, "SQUARE");
        assert!(!matches[1].is_intra_chart());
    }

    #[test]
    fn test_equal_copy_is_compared_as_a_second_moment() {
        let table = AspectTable::standard();
        let detector = AspectDetector::new(&table);
        let chart = placements(&[(CelestialBody::Sun, 10.0), (CelestialBody::Moon, 70.0)]);
        let copy = chart.clone();

        let within = detector.detect(&chart, &chart);
        assert_eq!(within.len(), 1);
        assert!(within[0].is_intra_chart());

        let between = detector.detect(&chart, &copy);
        assert_eq!(between.len(), 2);
        assert!(between.iter().all(|m| !m.is_intra_chart()));
        assert_eq!(between, detector.detect_between(&chart, &copy));
    }

    #[test]
    fn test_most_significant_orders_by_orb() {
        let table = AspectTable::standard();
        let detector = AspectDetector::new(&table);
        let chart = placements(&[
            (CelestialBody::Sun, 0.0),
            (CelestialBody::Moon, 95.0),
            (CelestialBody::Venus, 121.0),
        ]);
        let matches = detector.detect(&chart, &chart);
        let top = most_significant(&matches, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].aspect_type, "TRINE");
        assert_abs_diff_eq!(top[0].orb, 1.0);
    }
}
