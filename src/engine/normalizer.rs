//! Record normalization: attach a parsed UTC timestamp to every raw record.
//!
//! Unparseable dates are not an error. Such records get a sentinel date far
//! enough in the past that no "today" or "last N days" window can reach it,
//! while still counting toward totals and averages.

use crate::types::transaction::TransactionRecord;
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// How far before the reference day unparseable dates are pinned.
pub const SENTINEL_YEARS_BACK: u32 = 10;

/// Naive date-time layouts tried in order. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
];

/// Offset-bearing layouts not covered by RFC 3339 / RFC 2822.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Date-only layouts, pinned to midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

/// A transaction record plus its parsed timestamp.
///
/// Borrows the raw record; lives only for one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRecord<'a> {
    pub record: &'a TransactionRecord,
    pub parsed_date: DateTime<Utc>,
    /// True when `parsed_date` is the sentinel rather than the record's own date
    pub used_sentinel: bool,
}

impl<'a> NormalizedRecord<'a> {
    /// Defensive risk score for threshold checks (out-of-range and missing count as 0).
    pub fn risk_score(&self) -> i64 {
        self.record.effective_risk_score()
    }

    /// Risk score as received, missing counted as 0. Used for display, ranking and averaging.
    pub fn raw_risk_score(&self) -> i64 {
        self.record.risk_score.unwrap_or(0)
    }

    pub fn customer(&self) -> &'a str {
        &self.record.customer
    }
}

/// Normalize a snapshot of records against `reference`.
pub fn normalize(records: &[TransactionRecord], reference: DateTime<Utc>) -> Vec<NormalizedRecord<'_>> {
    let sentinel = sentinel_date(reference);

    records
        .iter()
        .map(|record| match parse_date_text(&record.date_text) {
            Some(parsed_date) => NormalizedRecord {
                record,
                parsed_date,
                used_sentinel: false,
            },
            None => NormalizedRecord {
                record,
                parsed_date: sentinel,
                used_sentinel: true,
            },
        })
        .collect()
}

/// Permissive, locale-agnostic date parser.
///
/// Offset-bearing inputs are converted to UTC; naive inputs are taken as UTC.
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(midnight_utc(date));
        }
    }

    None
}

/// Start of the reference calendar day, UTC.
pub fn start_of_day(reference: DateTime<Utc>) -> DateTime<Utc> {
    midnight_utc(reference.date_naive())
}

/// Fallback timestamp for records whose date cannot be parsed.
pub fn sentinel_date(reference: DateTime<Utc>) -> DateTime<Utc> {
    let day = reference
        .date_naive()
        .checked_sub_months(Months::new(12 * SENTINEL_YEARS_BACK))
        .unwrap_or(NaiveDate::MIN);
    midnight_utc(day)
}

pub(crate) fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}
