//! Plain-text chart and transit reports.

use chrono::NaiveDate;
use std::fmt::Write;
use urania::chart::{ChartSnapshot, Placements, TransitComparison};
use urania::interpret::WeeklySummary;
use urania::Interpreter;

const RULE_WIDTH: usize = 60;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

fn positions_table(out: &mut String, placements: &Placements) {
    for placement in placements.values() {
        let (degrees, minutes) = placement.degrees_minutes();
        let _ = writeln!(
            out,
            "{:10} {:2}°{:02}' {:12} House {}",
            placement.body.name(),
            degrees,
            minutes,
            placement.sign.name(),
            placement.house
        );
    }
    out.push('\n');
}

fn diagnostics(out: &mut String, chart: &ChartSnapshot) {
    if chart.diagnostics.is_empty() {
        return;
    }
    heading(out, "ACCURACY NOTES");
    for diagnostic in &chart.diagnostics {
        let _ = writeln!(out, "! {diagnostic}");
    }
    out.push('\n');
}

pub fn birth_chart(chart: &ChartSnapshot, interpreter: &Interpreter<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "BIRTH CHART ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Birth Date: {}", chart.moment.date);
    let _ = writeln!(out, "Birth Time: {}", chart.moment.time);
    let _ = writeln!(out, "Birth Location: {}", chart.moment.location);
    out.push('\n');

    diagnostics(&mut out, chart);

    heading(&mut out, "PLANETARY POSITIONS");
    positions_table(&mut out, &chart.placements);

    heading(&mut out, "PLANETARY SIGN INTERPRETATIONS");
    for placement in chart.placements.values() {
        let _ = writeln!(out, "{}\n", interpreter.planet_in_sign(placement));
    }

    heading(&mut out, "PLANETARY HOUSE INTERPRETATIONS");
    for placement in chart.placements.values() {
        let _ = writeln!(out, "{}\n", interpreter.planet_in_house(placement));
    }

    if !chart.aspects.is_empty() {
        heading(&mut out, "MAJOR ASPECTS");
        for aspect in &chart.aspects {
            let _ = writeln!(out, "{}\n", interpreter.aspect(aspect));
        }
    }

    heading(&mut out, "KEY THEMES");
    for theme in interpreter.summary_themes(chart) {
        let _ = writeln!(out, "• {theme}");
    }
    out
}

pub fn transits(
    natal: &ChartSnapshot,
    comparison: &TransitComparison,
    interpreter: &Interpreter<'_>,
) -> String {
    let current = &comparison.transit;
    let mut out = String::new();
    let _ = writeln!(out, "TRANSIT ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Current Date: {}", current.moment.date);
    let _ = writeln!(out, "Current Time: {}", current.moment.time);
    let _ = writeln!(out, "Current Location: {}", current.moment.location);
    out.push('\n');

    diagnostics(&mut out, current);

    heading(&mut out, "CURRENT PLANETARY POSITIONS");
    positions_table(&mut out, &current.placements);

    heading(&mut out, "MAJOR TRANSITS");
    if comparison.aspects.is_empty() {
        let _ = writeln!(out, "No major transit aspects within orb at this time.\n");
    } else {
        for aspect in &comparison.aspects {
            let _ = writeln!(out, "{}\n", interpreter.aspect(aspect));
        }
    }

    heading(&mut out, "TRANSIT INTERPRETATIONS");
    for (body, transiting) in &current.placements {
        if let Some(birth) = natal.placements.get(body) {
            let _ = writeln!(out, "{}\n", interpreter.planet_transit(transiting, birth));
        }
    }
    out
}

fn long_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format("%A, %B %d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

pub fn daily_forecast(comparison: &TransitComparison, interpreter: &Interpreter<'_>) -> String {
    let today = &comparison.transit;
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "DAILY ASTROLOGICAL FORECAST");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Date: {}", long_date(&today.moment.date));
    let _ = writeln!(out, "Location: {}", today.moment.location);
    out.push('\n');

    diagnostics(&mut out, today);

    heading(&mut out, "PLANETARY POSITIONS FOR TODAY");
    positions_table(&mut out, &today.placements);

    heading(&mut out, "TODAY'S ASTROLOGICAL THEMES");
    for theme in interpreter.daily_themes(today) {
        let _ = writeln!(out, "• {theme}");
    }
    out.push('\n');

    heading(&mut out, "TRANSIT HIGHLIGHTS");
    let highlights = interpreter.transit_highlights(comparison);
    if highlights.is_empty() {
        let _ = writeln!(out, "No major transit aspects active today.\n");
    }
    for line in highlights {
        let _ = writeln!(out, "{line}\n");
    }

    heading(&mut out, "DAILY GUIDANCE");
    let _ = writeln!(
        out,
        "{}",
        interpreter.daily_guidance(today, &comparison.aspects)
    );
    out
}

pub fn weekly_summary(summary: &WeeklySummary, birth_location: &str, location: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "WEEKLY ASTROLOGICAL SUMMARY");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Period: {} - {}",
        long_date(&summary.start_date),
        long_date(&summary.end_date)
    );
    let _ = writeln!(out, "Birth Location: {birth_location}");
    let _ = writeln!(out, "Current Location: {location}");
    out.push('\n');

    heading(&mut out, "WEEKLY OVERVIEW");
    if summary.themes.is_empty() {
        let _ = writeln!(out, "A generally stable week with no major transit aspects.");
    } else {
        let _ = writeln!(out, "Major transit themes this week:");
        for theme in &summary.themes {
            let _ = writeln!(out, "• {theme}");
        }
    }
    out.push('\n');

    heading(&mut out, "KEY DATES THIS WEEK");
    for date in &summary.key_dates {
        let _ = writeln!(out, "• {date}");
    }
    out.push('\n');

    heading(&mut out, "WEEKLY ADVICE");
    let _ = writeln!(out, "{}", summary.advice);
    out
}
