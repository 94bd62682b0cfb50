use crate::aspects::{AspectDetector, AspectTable, ChartLayer};
use crate::chart::{ChartBuilder, ChartSnapshot, MomentDescriptor, TransitComparison};
use crate::diagnostic::Diagnostic;
use crate::ephemeris::EphemerisProvider;
use crate::reference::KeywordTable;
use crate::time::{parse_date, TimeConverter, TimeError};
use chrono::{Duration, NaiveDate};

/// Computes charts from startup-loaded, read-only resources.
///
/// The engine only borrows the ephemeris and tables, so one set of them can serve any
/// number of engines and calls. Every call allocates its own snapshots.
pub struct ChartEngine<'a> {
    ephemeris: &'a EphemerisProvider,
    aspects: &'a AspectTable,
    planet_keywords: &'a KeywordTable,
}

impl<'a> ChartEngine<'a> {
    pub fn new(
        ephemeris: &'a EphemerisProvider,
        aspects: &'a AspectTable,
        planet_keywords: &'a KeywordTable,
    ) -> Self {
        Self {
            ephemeris,
            aspects,
            planet_keywords,
        }
    }

    pub fn aspect_table(&self) -> &AspectTable {
        self.aspects
    }

    /// Natal chart with intra-chart aspects.
    pub fn compute_chart(&self, date: &str, time: &str, location: &str) -> ChartSnapshot {
        let chart = self.snapshot(date, time, location);
        let aspects =
            AspectDetector::new(self.aspects).detect_within(&chart.placements, ChartLayer::Natal);
        log::debug!(
            "Chart {} {} ({}): {} aspects",
            date,
            time,
            location,
            aspects.len()
        );
        ChartSnapshot { aspects, ..chart }
    }

    /// The chart for a second moment and its aspects to `natal`.
    pub fn compute_transits(
        &self,
        natal: &ChartSnapshot,
        date: &str,
        time: &str,
        location: &str,
    ) -> TransitComparison {
        let detector = AspectDetector::new(self.aspects);
        let chart = self.snapshot(date, time, location);
        let own_aspects = detector.detect_within(&chart.placements, ChartLayer::Transit);
        let aspects = detector.detect_between(&natal.placements, &chart.placements);
        log::debug!(
            "Transits {} {} against natal {}: {} aspects",
            date,
            time,
            natal.moment.date,
            aspects.len()
        );
        TransitComparison {
            transit: ChartSnapshot {
                aspects: own_aspects,
                ..chart
            },
            aspects,
        }
    }

    /// One transit comparison per day for `days` days starting at `start_date`, each at
    /// `time`.
    pub fn compute_transit_series(
        &self,
        natal: &ChartSnapshot,
        start_date: NaiveDate,
        days: u32,
        time: &str,
        location: &str,
    ) -> Vec<TransitComparison> {
        (0..days)
            .map(|offset| {
                let date = start_date + Duration::days(i64::from(offset));
                let date = date.format("%Y-%m-%d").to_string();
                self.compute_transits(natal, &date, time, location)
            })
            .collect()
    }

    /// Like [`compute_transit_series`](Self::compute_transit_series) with the start date
    /// given as `YYYY-MM-DD`.
    pub fn compute_transit_series_from(
        &self,
        natal: &ChartSnapshot,
        start_date: &str,
        days: u32,
        time: &str,
        location: &str,
    ) -> Result<Vec<TransitComparison>, TimeError> {
        let start = parse_date(start_date)?;
        Ok(self.compute_transit_series(natal, start, days, time, location))
    }

    fn snapshot(&self, date: &str, time: &str, location: &str) -> ChartSnapshot {
        let conversion = TimeConverter::to_julian_day(date, time);
        let mut diagnostics = Vec::new();
        if let Some(error) = conversion.diagnostic {
            diagnostics.push(Diagnostic::TimeFallback { error });
        }

        let reading = self.ephemeris.longitudes_at(conversion.julian_day);
        diagnostics.extend(reading.diagnostics);

        let moment = MomentDescriptor {
            date: date.to_string(),
            time: time.to_string(),
            location: location.to_string(),
            julian_day: conversion.julian_day,
        };
        ChartBuilder::new(self.planet_keywords).build(moment, &reading.longitudes, diagnostics)
    }
}
