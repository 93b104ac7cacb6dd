//! Timezones of ranges: fixed UTC offsets and named IANA zones.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{
    instant::{self, Instant},
    prelude::*,
};

/// Wall-clock-aware transformation of a date-time.
///
/// Implementors work on any [`TimeZone`], so that calendar arithmetic follows
/// the daylight saving transitions of a named zone.
pub trait Adjust {
    /// Returns [`None`] when the result is not representable.
    fn adjust<Tz: TimeZone>(&self, date_time: DateTime<Tz>) -> Option<DateTime<Tz>>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Timezone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Timezone {
    #[must_use]
    pub fn utc() -> Self {
        Self::Fixed(instant::utc())
    }

    /// UTC offset in effect at the instant.
    #[must_use]
    pub fn offset_at(&self, instant: &Instant) -> FixedOffset {
        match self {
            Self::Fixed(offset) => *offset,
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        }
    }

    /// Same instant, with the offset of this timezone.
    pub fn convert(&self, instant: Instant) -> Instant {
        instant.with_timezone(&self.offset_at(&instant))
    }

    /// Resolve the wall time.
    ///
    /// An ambiguous wall time (when the clocks go back) resolves to the earlier instant.
    pub fn localize(&self, naive: NaiveDateTime) -> Result<Instant> {
        let instant = match self {
            Self::Fixed(offset) => offset.from_local_datetime(&naive).single(),
            Self::Named(tz) => {
                tz.from_local_datetime(&naive).earliest().map(|date_time| date_time.fixed_offset())
            }
        };
        instant.ok_or(Error::Nonexistent { naive, timezone: *self })
    }

    /// Apply the adjustment on the wall clock of this timezone.
    pub fn adjust(&self, instant: Instant, adjustment: &impl Adjust) -> Option<Instant> {
        match self {
            Self::Fixed(offset) => {
                adjustment.adjust(instant.with_timezone(offset)).map(|date_time| date_time.fixed_offset())
            }
            Self::Named(tz) => {
                adjustment.adjust(instant.with_timezone(tz)).map(|date_time| date_time.fixed_offset())
            }
        }
    }
}

impl From<FixedOffset> for Timezone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl From<Tz> for Timezone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

/// `+02:00` or `Europe/Amsterdam`.
impl Display for Timezone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Parse `UTC`, `Z`, `±HH[:]MM`, or an IANA name such as `Europe/Amsterdam`.
impl FromStr for Timezone {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let failure = || Error::Timezone { input: text.to_owned() };
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            Ok(Self::utc())
        } else if trimmed.starts_with(['+', '-']) {
            trimmed.parse::<FixedOffset>().map(Self::Fixed).map_err(|_| failure())
        } else {
            trimmed.parse::<Tz>().map(Self::Named).map_err(|_| failure())
        }
    }
}

impl Serialize for Timezone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
    }
}
