//! Calendar date/time strings to Julian Day.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use thiserror::Error;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00).
pub const J2000_JD: f64 = 2451545.0;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum TimeError {
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },
    #[error("Invalid time '{input}', expected HH:MM")]
    InvalidTime { input: String },
}

/// Result of a conversion. Malformed input still yields a usable Julian Day (J2000.0)
/// together with the error that caused the substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct JulianDayConversion {
    pub julian_day: f64,
    pub diagnostic: Option<TimeError>,
}

impl JulianDayConversion {
    pub fn is_fallback(&self) -> bool {
        self.diagnostic.is_some()
    }
}

pub struct TimeConverter;

impl TimeConverter {
    /// Convert `"YYYY-MM-DD"` and `"HH:MM"` to a Julian Day.
    pub fn to_julian_day(date: &str, time: &str) -> JulianDayConversion {
        match Self::try_julian_day(date, time) {
            Ok(julian_day) => JulianDayConversion {
                julian_day,
                diagnostic: None,
            },
            Err(e) => {
                log::warn!("Error calculating Julian Day: {e}; defaulting to J2000.0");
                JulianDayConversion {
                    julian_day: J2000_JD,
                    diagnostic: Some(e),
                }
            }
        }
    }

    pub fn try_julian_day(date: &str, time: &str) -> Result<f64, TimeError> {
        let date = parse_date(date)?;
        let time = parse_time(time)?;
        Ok(calendar_to_jd(
            date.year(),
            date.month(),
            date.day(),
            time.hour(),
            time.minute(),
        ))
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| TimeError::InvalidDate {
        input: date.to_string(),
    })
}

pub fn parse_time(time: &str) -> Result<NaiveTime, TimeError> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| TimeError::InvalidTime {
        input: time.to_string(),
    })
}

/// Gregorian calendar to Julian Day (Meeus, chapter 7).
pub fn calendar_to_jd(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> f64 {
    let (mut y, mut m) = (year as i64, month as i64);
    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = y.div_euclid(100);
    let b = 2 - a + a.div_euclid(4);

    let jd = (365.25 * (y + 4716) as f64).trunc() + (30.6001 * (m + 1) as f64).trunc()
        + day as f64
        + b as f64
        - 1524.5;
    jd + (hour as f64 + minute as f64 / 60.0) / 24.0
}

/// Days elapsed since J2000.0.
pub fn days_since_j2000(julian_day: f64) -> f64 {
    julian_day - J2000_JD
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_j2000_epoch() {
        let jd = TimeConverter::try_julian_day("2000-01-01", "12:00").unwrap();
        assert_abs_diff_eq!(jd, J2000_JD, epsilon = 1e-9);
    }

    #[test]
    fn test_known_dates() {
        // Sputnik launch date, Meeus example 7.a
        assert_abs_diff_eq!(calendar_to_jd(1957, 10, 4, 19, 26), 2436116.31, epsilon = 1e-3);
        assert_abs_diff_eq!(calendar_to_jd(1987, 1, 27, 0, 0), 2446822.5, epsilon = 1e-9);
        assert_abs_diff_eq!(calendar_to_jd(1988, 6, 19, 12, 0), 2447332.0, epsilon = 1e-9);
    }

    #[test]
    fn test_february_rolls_into_previous_year() {
        let feb = calendar_to_jd(2024, 2, 29, 0, 0);
        let mar = calendar_to_jd(2024, 3, 1, 0, 0);
        assert_abs_diff_eq!(mar - feb, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minutes_are_fractional_day() {
        let a = calendar_to_jd(1990, 5, 15, 14, 0);
        let b = calendar_to_jd(1990, 5, 15, 14, 30);
        assert_abs_diff_eq!(b - a, 30.0 / 1440.0, epsilon = 1e-9);
    }

    #[test]
    fn test_malformed_date_defaults_to_j2000() {
        let conv = TimeConverter::to_julian_day("1990/05/15", "14:30");
        assert_eq!(conv.julian_day, J2000_JD);
        assert!(matches!(conv.diagnostic, Some(TimeError::InvalidDate { .. })));
    }

    #[test]
    fn test_malformed_time_defaults_to_j2000() {
        let conv = TimeConverter::to_julian_day("1990-05-15", "half past two");
        assert_eq!(conv.julian_day, J2000_JD);
        assert!(matches!(conv.diagnostic, Some(TimeError::InvalidTime { .. })));
        assert!(conv.is_fallback());
    }

    #[test]
    fn test_wrong_field_count() {
        assert!(TimeConverter::try_julian_day("1990-05", "14:30").is_err());
        assert!(TimeConverter::try_julian_day("1990-05-15", "14").is_err());
    }
}
