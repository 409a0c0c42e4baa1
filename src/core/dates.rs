//! Acquisition time tokens found in product names
//!
//! Each naming convention carries its date differently. Formats without a
//! time of day are anchored at 12:00 so a +/- tolerance window never spills
//! into the neighbouring day; the Sentinel-1 `x` marker is the exception and
//! stays at 00:00.

use crate::types::{FloodError, FloodResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

fn date_error(token: &str, reason: impl ToString) -> FloodError {
    FloodError::DateParse {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

fn noon(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(12)
}

/// `YYYYMMDD`, anchored at 12:00
pub fn parse_day_at_noon(token: &str) -> FloodResult<NaiveDateTime> {
    NaiveDate::parse_from_str(token, "%Y%m%d")
        .map(noon)
        .map_err(|e| date_error(token, e))
}

/// `YYYYDDD` (day of year), anchored at 12:00
pub fn parse_julian_at_noon(token: &str) -> FloodResult<NaiveDateTime> {
    NaiveDate::parse_from_str(token, "%Y%j")
        .map(noon)
        .map_err(|e| date_error(token, e))
}

/// `YYYYMMDD-HHMMSS-mmm`; the trailing millisecond group is dropped
pub fn parse_muscate_stamp(token: &str) -> FloodResult<NaiveDateTime> {
    let without_ms = match token.rfind('-') {
        Some(idx) => &token[..idx],
        None => token,
    };
    NaiveDateTime::parse_from_str(without_ms, "%Y%m%d-%H%M%S").map_err(|e| date_error(token, e))
}

/// `YYYYMMDDTHHMMSS` (the separator is matched case-insensitively)
pub fn parse_compact_datetime(token: &str) -> FloodResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&token.to_uppercase(), "%Y%m%dT%H%M%S")
        .map_err(|e| date_error(token, e))
}

/// Sentinel-1 tiling stamp `YYYYMMDDtHHMMSS`.
///
/// An `x` in the time part (e.g. `20200501txxxxxx`) means the hour is not
/// known: the date is kept at 00:00.
pub fn parse_s1_stamp(token: &str) -> FloodResult<NaiveDateTime> {
    let tail_start = token.len().saturating_sub(5);
    if token.get(tail_start..).map_or(false, |tail| tail.contains('x')) {
        let day = token.split('t').next().unwrap_or(token);
        return NaiveDate::parse_from_str(day, "%Y%m%d")
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|e| date_error(token, e));
    }
    NaiveDateTime::parse_from_str(token, "%Y%m%dt%H%M%S").map_err(|e| date_error(token, e))
}

/// Pleiades dataset stamp `YYYYMMDDHHMMSSd`; the tenth-of-second digit is dropped
pub fn parse_pleiades_stamp(token: &str) -> FloodResult<NaiveDateTime> {
    if token.len() < 2 || !token.is_ascii() {
        return Err(date_error(token, "token too short"));
    }
    let seconds = &token[..token.len() - 1];
    NaiveDateTime::parse_from_str(seconds, "%Y%m%d%H%M%S").map_err(|e| date_error(token, e))
}

/// Sortable key used for pair dates
pub fn format_key(date: &NaiveDateTime) -> String {
    date.format("%Y%m%dT%H%M%S").to_string()
}

/// True when the timestamp carries no time-of-day information
pub fn is_midnight(date: &NaiveDateTime) -> bool {
    date.time() == NaiveTime::MIN
}
