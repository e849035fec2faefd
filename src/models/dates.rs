//! Date parsing for form and JSON inputs

use chrono::{DateTime, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

static WARRANTY_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*years?$").expect("warranty pattern is valid")
});

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp (only the date is kept).
pub fn parse_date(field: &str, raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    // `2024-03-01T00:00:00` without an offset
    if let Some((date, _)) = raw.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Ok(date);
        }
    }
    Err(AppError::Validation(format!("Invalid {}: '{}'", field, raw)))
}

/// Like [`parse_date`], treating missing or blank input as `None`.
pub fn parse_optional_date(field: &str, raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(field, raw).map(Some),
        None => Ok(None),
    }
}

/// Warranty expiry: a date, or a duration such as `3 years` / `2.5 years`
/// counted from `today` at 365.25 days per year.
pub fn parse_warranty_expiry(raw: Option<&str>, today: NaiveDate) -> AppResult<Option<NaiveDate>> {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw,
        None => return Ok(None),
    };

    if let Some(caps) = WARRANTY_YEARS.captures(raw) {
        let years: f64 = caps[1]
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid warranty_expiry: '{}'", raw)))?;
        let days = (years * 365.25) as i64;
        return today
            .checked_add_signed(Duration::days(days))
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("warranty_expiry out of range: '{}'", raw)));
    }

    parse_date("warranty_expiry", raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_and_timestamped_dates() {
        assert_eq!(parse_date("d", "2024-03-01").unwrap(), day(2024, 3, 1));
        assert_eq!(parse_date("d", "2024-03-01T10:00:00Z").unwrap(), day(2024, 3, 1));
        assert_eq!(parse_date("d", "2024-03-01T10:00:00+05:00").unwrap(), day(2024, 3, 1));
        assert_eq!(parse_date("d", "2024-03-01T10:00:00").unwrap(), day(2024, 3, 1));
        assert!(parse_date("d", "01/03/2024").is_err());
    }

    #[test]
    fn blank_optional_dates_are_none() {
        assert_eq!(parse_optional_date("d", None).unwrap(), None);
        assert_eq!(parse_optional_date("d", Some("  ")).unwrap(), None);
        assert!(parse_optional_date("d", Some("soon")).is_err());
    }

    #[test]
    fn warranty_in_years() {
        let today = day(2024, 1, 1);
        assert_eq!(parse_warranty_expiry(Some("1 year"), today).unwrap(), Some(day(2024, 12, 31)));
        assert_eq!(parse_warranty_expiry(Some("3 Years"), today).unwrap(), Some(day(2026, 12, 31)));
        assert_eq!(
            parse_warranty_expiry(Some("2.5 years"), today).unwrap(),
            Some(today + Duration::days(913))
        );
    }

    #[test]
    fn warranty_as_date_or_empty() {
        let today = day(2024, 1, 1);
        assert_eq!(parse_warranty_expiry(Some("2027-06-30"), today).unwrap(), Some(day(2027, 6, 30)));
        assert_eq!(parse_warranty_expiry(Some(""), today).unwrap(), None);
        assert_eq!(parse_warranty_expiry(None, today).unwrap(), None);
        assert!(parse_warranty_expiry(Some("forever"), today).is_err());
    }
}
