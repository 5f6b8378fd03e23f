//! Small formatting helpers

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};

/// A date given either as epoch milliseconds or as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Millis(i64),
    Text(String),
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::Millis(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Millis(value.timestamp_millis())
    }
}

/// Format a date as `Month D, YYYY`, e.g. `January 5, 2026`.
///
/// The calendar day is taken in UTC, not the host's local zone, so a report
/// carries the same date on every machine. Text accepts RFC 3339 timestamps
/// and plain `YYYY-MM-DD` dates.
pub fn format_date(value: impl Into<DateInput>) -> Result<String> {
    let date = match value.into() {
        DateInput::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| Error::InvalidDate(ms.to_string()))?
            .date_naive(),
        DateInput::Text(text) => parse_text(&text)?,
    };
    Ok(date.format("%B %-d, %Y").to_string())
}

fn parse_text(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| Error::InvalidDate(text.to_string()))
}
