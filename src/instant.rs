//! Timezone-aware points in time.
//!
//! An [`Instant`] is a plain [`chrono`] date-time with a fixed UTC offset. Two instants compare
//! by the moment they denote, the offset only affects how they are displayed.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use serde::Serializer;

use crate::{prelude::*, timezone::Timezone};

pub type Instant = DateTime<FixedOffset>;

/// `2023-09-15T13:28:55+00:00`.
pub const ISO_8601: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Offsets may only follow the date.
const DATE_LENGTH: usize = "YYYY-MM-DD".len();

const DATE_TIME_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// Copy any date-time into an [`Instant`], keeping its offset.
#[must_use]
pub fn to_instant<Tz: TimeZone>(value: &DateTime<Tz>) -> Instant {
    value.fixed_offset()
}

/// Parse a timestamp.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.fraction]]` (with either a space or `T` in
/// between) optionally followed by `Z` or `±HH[:]MM`, and `@<unix seconds>`.
/// Timestamps without an offset are resolved in `default`.
pub fn parse(text: &str, default: impl Into<Timezone>) -> Result<Instant> {
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    let failure = |position: usize| Error::Parse { input: text.to_owned(), position: leading + position };

    if let Some(timestamp) = trimmed.strip_prefix('@') {
        return timestamp
            .parse::<i64>()
            .ok()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .map(|instant| instant.fixed_offset())
            .ok_or_else(|| failure(1));
    }

    let (body, offset) = split_offset(trimmed).map_err(failure)?;
    let naive = parse_naive(body).map_err(failure)?;
    match offset {
        Some(offset) => offset.from_local_datetime(&naive).single().ok_or_else(|| failure(0)),
        None => Timezone::localize(&default.into(), naive),
    }
}

/// Format the instant with a [`chrono::format::strftime`] pattern.
pub fn format(instant: &Instant, pattern: &str) -> Result<String> {
    let mut formatted = String::new();
    write!(formatted, "{}", instant.format(pattern))
        .map_err(|_| Error::Format { pattern: pattern.to_owned() })?;
    Ok(formatted)
}

/// Serialize as [`ISO_8601`], the same way ranges are displayed.
pub fn serialize<S: Serializer>(instant: &Instant, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&instant.format(ISO_8601))
}

/// Split the trailing offset off.
///
/// On failure, returns the position of the offending offset.
fn split_offset(text: &str) -> Result<(&str, Option<FixedOffset>), usize> {
    if let Some(body) = text.strip_suffix(['Z', 'z']) {
        return Ok((body, Some(utc())));
    }
    match text.get(DATE_LENGTH..).and_then(|rest| rest.rfind(['+', '-'])) {
        Some(index) => {
            let index = DATE_LENGTH + index;
            let offset = text[index..].parse::<FixedOffset>().map_err(|_| index)?;
            Ok((text[..index].trim_end(), Some(offset)))
        }
        None => Ok((text, None)),
    }
}

/// Parse the date-time part.
///
/// On failure, returns the position where the longest recognised prefix stops.
fn parse_naive(text: &str) -> Result<NaiveDateTime, usize> {
    let mut position = 0;
    for format in DATE_TIME_FORMATS {
        match NaiveDateTime::parse_and_remainder(text, format) {
            Ok((naive, "")) => return Ok(naive),
            Ok((_, remainder)) => position = position.max(text.len() - remainder.len()),
            Err(_) => {}
        }
    }
    match NaiveDate::parse_and_remainder(text, DATE_FORMAT) {
        Ok((date, "")) => Ok(date.and_time(NaiveTime::MIN)),
        Ok((_, remainder)) => Err(position.max(text.len() - remainder.len())),
        Err(_) => Err(position),
    }
}
