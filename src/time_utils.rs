//! Time Utilities
//!
//! Heuristic parsing of the date and time strings found in CSV exports from
//! other logging programs, plus the ADIF `QSO_DATE`/`TIME_ON` conversions.
//!
//! Everything normalizes to the canonical `YYYY-MM-DDTHH:MM:SS` form, which is
//! always interpreted as UTC.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LogbookError, Result};

/// Canonical datetime layout produced by every parser in this module
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// How to read `NN/NN/YYYY` when both leading components could be a month.
///
/// Day-first is the default. US-centric loggers write month-first, so this is
/// a setting rather than a fixed rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

impl FromStr for DateOrder {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day-first" | "day_first" | "dmy" => Ok(DateOrder::DayFirst),
            "month-first" | "month_first" | "mdy" => Ok(DateOrder::MonthFirst),
            other => Err(LogbookError::InvalidArgument(format!(
                "unknown date order '{}', expected day-first or month-first",
                other
            ))),
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrder::DayFirst => write!(f, "day-first"),
            DateOrder::MonthFirst => write!(f, "month-first"),
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static date/time pattern"))
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$")
}

fn slash_ymd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{4})/([0-9]{1,2})/([0-9]{1,2})$")
}

fn dmy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{4})$")
}

fn compact_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{4})([0-9]{2})([0-9]{2})$")
}

fn meridiem_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)^([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\s*([AP]M)$")
}

fn hms_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{1,2}):([0-9]{2}):([0-9]{2})$")
}

fn hm_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{1,2}):([0-9]{2})$")
}

fn digit_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[0-9]{3,4}$")
}

fn canonical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^([0-9]{4}-[0-9]{2}-[0-9]{2})T([0-9]{2}:[0-9]{2})(:[0-9]{2})?$")
}

fn split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\s+|T")
}

/// Formats tried last, after the explicit numeric layouts
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%a %b %d %Y",
    "%d.%m.%Y",
    "%Y.%m.%d",
];

// ============================================================================
// Date parsing
// ============================================================================

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Parse a loosely formatted date with the default day-first policy.
///
/// Returns `YYYY-MM-DD`, or `None` when no known layout matches.
pub fn parse_date(input: &str) -> Option<String> {
    parse_date_with(input, DateOrder::default())
}

/// Parse a loosely formatted date, resolving ambiguous `NN/NN/YYYY` with `order`
pub fn parse_date_with(input: &str, order: DateOrder) -> Option<String> {
    parse_naive_date(input, order).map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_naive_date(input: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(c) = iso_date_re().captures(s) {
        return ymd(&c[1], &c[2], &c[3]);
    }

    if let Some(c) = slash_ymd_re().captures(s) {
        return ymd(&c[1], &c[2], &c[3]);
    }

    if let Some(c) = dmy_re().captures(s) {
        let first: u32 = c[1].parse().ok()?;
        let second: u32 = c[2].parse().ok()?;
        let year: i32 = c[3].parse().ok()?;

        let (day, month) = if first > 12 {
            (first, second)
        } else if second > 12 {
            (second, first)
        } else {
            match order {
                DateOrder::DayFirst => (first, second),
                DateOrder::MonthFirst => (second, first),
            }
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(c) = compact_date_re().captures(s) {
        if let Some(date) = ymd(&c[1], &c[2], &c[3]) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ============================================================================
// Time parsing
// ============================================================================

fn hms(hour: u32, minute: &str, second: Option<&str>) -> Option<NaiveTime> {
    let minute: u32 = minute.parse().ok()?;
    let second: u32 = match second {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Parse a loosely formatted time of day.
///
/// Returns `HH:MM:SS`, or `None` when no known layout matches.
pub fn parse_time(input: &str) -> Option<String> {
    parse_naive_time(input).map(|t| t.format("%H:%M:%S").to_string())
}

fn parse_naive_time(input: &str) -> Option<NaiveTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(c) = meridiem_time_re().captures(s) {
        let hour: u32 = c[1].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = c[4].eq_ignore_ascii_case("PM");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        return hms(hour, &c[2], c.get(3).map(|m| m.as_str()));
    }

    if let Some(c) = hms_time_re().captures(s) {
        return hms(c[1].parse().ok()?, &c[2], Some(&c[3]));
    }

    if let Some(c) = hm_time_re().captures(s) {
        return hms(c[1].parse().ok()?, &c[2], None);
    }

    if digit_time_re().is_match(s) {
        let padded = format!("{:0>4}", s);
        return hms(padded[..2].parse().ok()?, &padded[2..4], None);
    }

    None
}

// ============================================================================
// Combined date/time
// ============================================================================

/// Parse a date (and optional separate time) into `YYYY-MM-DDTHH:MM:SS`
/// using the day-first policy.
pub fn parse_date_time(date: &str, time: Option<&str>) -> Result<String> {
    parse_date_time_with(date, time, DateOrder::default())
}

/// Parse a date (and optional separate time) into `YYYY-MM-DDTHH:MM:SS`.
///
/// With a separate time, each part is parsed on its own and a failure names
/// the part that failed. With a single string, already-canonical values are
/// normalized, then the string is split at the first whitespace run or `T`,
/// then it is tried as a bare date at midnight.
pub fn parse_date_time_with(date: &str, time: Option<&str>, order: DateOrder) -> Result<String> {
    if let Some(time) = time {
        let d = parse_naive_date(date, order)
            .ok_or_else(|| LogbookError::InvalidDate(date.to_string()))?;
        let t = parse_naive_time(time)
            .ok_or_else(|| LogbookError::InvalidTime(time.to_string()))?;
        return Ok(format_canonical(&d.and_time(t)));
    }

    let s = date.trim();

    if let Some(c) = canonical_re().captures(s) {
        let seconds = c.get(3).map(|m| m.as_str()).unwrap_or(":00");
        let normalized = format!("{}T{}{}", &c[1], &c[2], seconds);
        if NaiveDateTime::parse_from_str(&normalized, CANONICAL_FORMAT).is_ok() {
            return Ok(normalized);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(format_canonical(&dt.with_timezone(&Utc).naive_utc()));
    }

    let split_error = match split_re().find(s) {
        Some(m) if m.start() > 0 && m.end() < s.len() => {
            match parse_date_time_with(&s[..m.start()], Some(&s[m.end()..]), order) {
                Ok(canonical) => return Ok(canonical),
                Err(e) => Some(e),
            }
        }
        _ => None,
    };

    if let Some(d) = parse_naive_date(s, order) {
        return Ok(format_canonical(&d.and_time(NaiveTime::MIN)));
    }

    Err(split_error.unwrap_or_else(|| LogbookError::InvalidDateTime(date.to_string())))
}

pub fn format_canonical(dt: &NaiveDateTime) -> String {
    dt.format(CANONICAL_FORMAT).to_string()
}

/// Interpret a canonical `YYYY-MM-DDTHH:MM:SS` string as a UTC instant
pub fn canonical_to_utc(canonical: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(canonical, CANONICAL_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| LogbookError::InvalidDateTime(canonical.to_string()))
}

// ============================================================================
// ADIF date/time
// ============================================================================

/// Validate ADIF date format (YYYYMMDD)
pub fn is_valid_adif_date(date_str: &str) -> bool {
    date_str.len() == 8
        && date_str.chars().all(|c| c.is_ascii_digit())
        && ymd(&date_str[..4], &date_str[4..6], &date_str[6..8]).is_some()
}

/// Validate ADIF time format (HHMM or HHMMSS)
pub fn is_valid_adif_time(time_str: &str) -> bool {
    let len = time_str.len();
    if len != 4 && len != 6 {
        return false;
    }
    if !time_str.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let seconds = if len == 6 { Some(&time_str[4..6]) } else { None };
    time_str[..2]
        .parse()
        .ok()
        .and_then(|hour| hms(hour, &time_str[2..4], seconds))
        .is_some()
}

/// Combine ADIF `QSO_DATE` and `TIME_ON` into the canonical form.
///
/// A missing time means midnight (`0000`). Returns `None` if either part is malformed.
pub fn adif_to_canonical(qso_date: &str, time_on: Option<&str>) -> Option<String> {
    let time = time_on.map(str::trim).filter(|t| !t.is_empty()).unwrap_or("0000");
    let date = qso_date.trim();
    if !is_valid_adif_date(date) || !is_valid_adif_time(time) {
        return None;
    }
    let seconds = if time.len() == 6 { &time[4..6] } else { "00" };
    Some(format!(
        "{}-{}-{}T{}:{}:{}",
        &date[..4],
        &date[4..6],
        &date[6..8],
        &time[..2],
        &time[2..4],
        seconds
    ))
}

/// Format an instant as ADIF `QSO_DATE` (YYYYMMDD)
pub fn to_adif_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// Format an instant as ADIF `TIME_ON` (HHMMSS)
pub fn to_adif_time(dt: &DateTime<Utc>) -> String {
    dt.format("%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_iso_and_slashed() {
        assert_eq!(parse_date("2024-01-15").as_deref(), Some("2024-01-15"));
        assert_eq!(parse_date("2024/1/5").as_deref(), Some("2024-01-05"));
        assert_eq!(parse_date(" 2024-01-15 ").as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date("31/01/2024").as_deref(), Some("2024-01-31"));
        assert_eq!(parse_date("01/02/2024").as_deref(), Some("2024-02-01"));
        assert_eq!(parse_date("15-03-2024").as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn test_parse_date_second_component_forces_month_first() {
        assert_eq!(parse_date("02/13/2024").as_deref(), Some("2024-02-13"));
    }

    #[test]
    fn test_parse_date_month_first_policy() {
        assert_eq!(
            parse_date_with("01/02/2024", DateOrder::MonthFirst).as_deref(),
            Some("2024-01-02")
        );
        assert_eq!(
            parse_date_with("31/01/2024", DateOrder::MonthFirst).as_deref(),
            Some("2024-01-31")
        );
    }

    #[test]
    fn test_parse_date_fallbacks() {
        assert_eq!(parse_date("20240115").as_deref(), Some("2024-01-15"));
        assert_eq!(parse_date("15 Jan 2024").as_deref(), Some("2024-01-15"));
        assert_eq!(parse_date("January 15, 2024").as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("13/13/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_parse_time_variants() {
        assert_eq!(parse_time("11:45 PM").as_deref(), Some("23:45:00"));
        assert_eq!(parse_time("12:05 am").as_deref(), Some("00:05:00"));
        assert_eq!(parse_time("12:30:15PM").as_deref(), Some("12:30:15"));
        assert_eq!(parse_time("14:30:05").as_deref(), Some("14:30:05"));
        assert_eq!(parse_time("9:05").as_deref(), Some("09:05:00"));
        assert_eq!(parse_time("0930").as_deref(), Some("09:30:00"));
        assert_eq!(parse_time("930").as_deref(), Some("09:30:00"));
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("13:00 PM"), None);
        assert_eq!(parse_time("2460"), None);
        assert_eq!(parse_time("noon"), None);
    }

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        assert_eq!(parse_time("\u{0661}\u{0662}\u{0663}"), None);
        assert_eq!(parse_time("\u{0661}\u{0662}:\u{0663}\u{0664}"), None);
        assert_eq!(parse_date("\u{0662}\u{0660}\u{0662}\u{0664}-01-15"), None);
        assert!(matches!(
            parse_date_time("2024-01-15", Some("\u{0661}\u{0662}\u{0663}")),
            Err(LogbookError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_parse_date_time_two_parts() {
        assert_eq!(
            parse_date_time("31/01/2024", Some("11:45 PM")).unwrap(),
            "2024-01-31T23:45:00"
        );
        assert!(matches!(
            parse_date_time("bogus", Some("12:00")),
            Err(LogbookError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date_time("2024-01-31", Some("bogus")),
            Err(LogbookError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_parse_date_time_single_string() {
        assert_eq!(parse_date_time("2024-01-15T12:30", None).unwrap(), "2024-01-15T12:30:00");
        assert_eq!(parse_date_time("2024-01-15T12:30:45", None).unwrap(), "2024-01-15T12:30:45");
        assert_eq!(parse_date_time("2024-01-15 1230", None).unwrap(), "2024-01-15T12:30:00");
        assert_eq!(parse_date_time("15/01/2024  09:15", None).unwrap(), "2024-01-15T09:15:00");
        assert_eq!(parse_date_time("2024-01-15", None).unwrap(), "2024-01-15T00:00:00");
        assert_eq!(parse_date_time("15 Jan 2024", None).unwrap(), "2024-01-15T00:00:00");
        assert_eq!(
            parse_date_time("2024-01-15T12:30:00Z", None).unwrap(),
            "2024-01-15T12:30:00"
        );
    }

    #[test]
    fn test_parse_date_time_names_original_input() {
        let err = parse_date_time("whenever", None).unwrap_err();
        assert!(err.to_string().contains("whenever"));
    }

    #[test]
    fn test_canonical_to_utc() {
        let dt = canonical_to_utc("2024-01-15T12:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T12:30:00+00:00");
        assert!(canonical_to_utc("2024-01-15").is_err());
    }

    #[test]
    fn test_adif_to_canonical() {
        assert_eq!(
            adif_to_canonical("20240115", Some("1230")).as_deref(),
            Some("2024-01-15T12:30:00")
        );
        assert_eq!(
            adif_to_canonical("20240115", Some("123045")).as_deref(),
            Some("2024-01-15T12:30:45")
        );
        assert_eq!(
            adif_to_canonical("20240115", None).as_deref(),
            Some("2024-01-15T00:00:00")
        );
        assert_eq!(adif_to_canonical("2024011", Some("1230")), None);
        assert_eq!(adif_to_canonical("20240115", Some("2460")), None);
    }

    #[test]
    fn test_is_valid_adif_date() {
        assert!(is_valid_adif_date("20260108"));
        assert!(!is_valid_adif_date("2026-01-08"));
        assert!(!is_valid_adif_date("20261301"));
        assert!(!is_valid_adif_date("20260230"));
    }

    #[test]
    fn test_is_valid_adif_time() {
        assert!(is_valid_adif_time("1234"));
        assert!(is_valid_adif_time("123456"));
        assert!(!is_valid_adif_time("2400"));
        assert!(!is_valid_adif_time("12345"));
    }

    #[test]
    fn test_date_order_from_str() {
        assert_eq!("month-first".parse::<DateOrder>().unwrap(), DateOrder::MonthFirst);
        assert_eq!("DMY".parse::<DateOrder>().unwrap(), DateOrder::DayFirst);
        assert!("sideways".parse::<DateOrder>().is_err());
    }
}
