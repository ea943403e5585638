//! Date-range filter for history queries and exports.
//!
//! Precedence when resolving query parameters:
//! 1. `startDate` + `endDate` → that explicit range (wins even when year/month are also given)
//! 2. `year` + `month` → the calendar month
//! 3. `year` → the calendar year
//! 4. otherwise → unfiltered
//!
//! All ranges are half-open `[start, end)` in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{AppError, AppResult};

/// Raw filter parameters as received on the query string.
///
/// Empty strings are treated as absent, matching what HTML forms submit for
/// untouched inputs.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoryFilter {
    /// Four-digit year, e.g. `2024`
    pub year: Option<String>,
    /// Month number `1`-`12` (requires `year`)
    pub month: Option<String>,
    /// Inclusive range start, `YYYY-MM-DD` or RFC 3339
    pub start_date: Option<String>,
    /// Exclusive range end, `YYYY-MM-DD` or RFC 3339
    pub end_date: Option<String>,
}

/// Half-open UTC interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    fn year(year: i32) -> AppResult<Self> {
        Ok(Self {
            start: start_of_month(year, 1)?,
            end: start_of_month(year + 1, 1)?,
        })
    }

    fn month(year: i32, month: u32) -> AppResult<Self> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Ok(Self {
            start: start_of_month(year, month)?,
            end: start_of_month(next_year, next_month)?,
        })
    }
}

impl HistoryFilter {
    /// Resolve the parameters into a concrete range, or `None` for "all records".
    ///
    /// # Errors
    /// Returns a validation error for a malformed year, month or date.
    pub fn resolve(&self) -> AppResult<Option<DateRange>> {
        let year = present(&self.year);
        let month = present(&self.month);
        let start_date = present(&self.start_date);
        let end_date = present(&self.end_date);

        if let (Some(start), Some(end)) = (start_date, end_date) {
            return Ok(Some(DateRange {
                start: parse_instant(start, "startDate")?,
                end: parse_instant(end, "endDate")?,
            }));
        }

        match (year, month) {
            (Some(year), Some(month)) => {
                DateRange::month(parse_year(year)?, parse_month(month)?).map(Some)
            }
            (Some(year), None) => DateRange::year(parse_year(year)?).map(Some),
            _ => Ok(None),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_year(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .ok()
        .filter(|y| (1..=9998).contains(y))
        .ok_or_else(|| AppError::validation(format!("Invalid year: {}", raw)))
}

fn parse_month(raw: &str) -> AppResult<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}", raw)))
}

fn start_of_month(year: i32, month: u32) -> AppResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::validation(format!("Invalid date: {}-{:02}", year, month)))
}

/// Accepts `YYYY-MM-DD` (UTC midnight), RFC 3339, or a zone-less ISO datetime taken as UTC.
fn parse_instant(raw: &str, field: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    Err(AppError::validation(format!("Invalid {}: {}", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(year: &str, month: &str, start: &str, end: &str) -> HistoryFilter {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        HistoryFilter {
            year: opt(year),
            month: opt(month),
            start_date: opt(start),
            end_date: opt(end),
        }
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_params_means_no_filter() {
        assert_eq!(HistoryFilter::default().resolve().unwrap(), None);
    }

    #[test]
    fn test_year_only_covers_whole_year() {
        let range = filter("2024", "", "", "").resolve().unwrap().unwrap();
        assert_eq!(range.start, utc(2024, 1, 1));
        assert_eq!(range.end, utc(2025, 1, 1));
    }

    #[test]
    fn test_year_and_month() {
        let range = filter("2024", "2", "", "").resolve().unwrap().unwrap();
        assert_eq!(range.start, utc(2024, 2, 1));
        assert_eq!(range.end, utc(2024, 3, 1));
    }

    #[test]
    fn test_zero_padded_month_accepted() {
        let range = filter("2024", "02", "", "").resolve().unwrap().unwrap();
        assert_eq!(range.start, utc(2024, 2, 1));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let range = filter("2023", "12", "", "").resolve().unwrap().unwrap();
        assert_eq!(range.start, utc(2023, 12, 1));
        assert_eq!(range.end, utc(2024, 1, 1));
    }

    #[test]
    fn test_explicit_range() {
        let range = filter("", "", "2024-03-05", "2024-03-20")
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(range.start, utc(2024, 3, 5));
        assert_eq!(range.end, utc(2024, 3, 20));
    }

    #[test]
    fn test_explicit_range_wins_over_year_and_month() {
        let range = filter("2020", "6", "2024-03-05", "2024-03-20")
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(range.start, utc(2024, 3, 5));
        assert_eq!(range.end, utc(2024, 3, 20));
    }

    #[test]
    fn test_half_range_falls_back_to_year() {
        let range = filter("2022", "", "2024-03-05", "").resolve().unwrap().unwrap();
        assert_eq!(range.start, utc(2022, 1, 1));
    }

    #[test]
    fn test_month_without_year_is_ignored() {
        assert_eq!(filter("", "5", "", "").resolve().unwrap(), None);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let f = HistoryFilter {
            year: Some("  ".to_string()),
            month: Some(String::new()),
            start_date: None,
            end_date: None,
        };
        assert_eq!(f.resolve().unwrap(), None);
    }

    #[test]
    fn test_rfc3339_bounds() {
        let range = filter("", "", "2024-03-05T12:00:00Z", "2024-03-05T18:30:00+02:00")
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 3, 5, 16, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(filter("20x4", "", "", "").resolve().is_err());
        assert!(filter("2024", "13", "", "").resolve().is_err());
        assert!(filter("2024", "0", "", "").resolve().is_err());
        assert!(filter("", "", "yesterday", "2024-01-01").resolve().is_err());
    }

    #[test]
    fn test_range_is_half_open() {
        let range = filter("2024", "1", "", "").resolve().unwrap().unwrap();
        let inside = |t| t >= range.start && t < range.end;
        assert!(inside(utc(2024, 1, 1)));
        assert!(inside(utc(2024, 1, 31)));
        assert!(!inside(utc(2024, 2, 1)));
    }
}
