use chrono::{DateTime, NaiveDateTime, TimeZone};

use crate::{
    instant::{self, Instant},
    prelude::*,
    range::Range,
    span::Span,
    timezone::Timezone,
};

const START_KINDS: &str = "Instant or string";
const END_KINDS: &str = "Instant, Span, or string";
const OPERAND_KINDS: &str = "Instant, Range, or string";

/// Start or end of a range to be built.
///
/// Date-times are copied in, nothing keeps a reference to the caller's value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Bound {
    Instant(Instant),

    /// Wall time in the default timezone of the constructor.
    Naive(NaiveDateTime),

    /// Timestamp for [`instant::parse`].
    Text(String),

    /// End only: relative to the resolved start.
    Span(Span),

    Missing,
}

impl Bound {
    pub(super) fn resolve_start(self, timezone: Timezone) -> Result<Instant> {
        match self {
            Self::Instant(instant) => Ok(instant),
            Self::Naive(naive) => timezone.localize(naive),
            Self::Text(text) => instant::parse(&text, timezone),
            Self::Span(_) | Self::Missing => {
                Err(Error::Type { argument: Argument::Start, expected: START_KINDS })
            }
        }
    }

    /// Wall times resolve in the default timezone, a span is added on the range's wall clock.
    pub(super) fn resolve_end(
        self,
        start: Instant,
        default: Timezone,
        timezone: Timezone,
    ) -> Result<Instant> {
        match self {
            Self::Instant(instant) => Ok(instant),
            Self::Naive(naive) => default.localize(naive),
            Self::Text(text) => instant::parse(&text, default),
            Self::Span(span) => timezone.adjust(start, &span).ok_or(Error::Overflow),
            Self::Missing => Err(Error::Type { argument: Argument::End, expected: END_KINDS }),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Bound {
    fn from(date_time: DateTime<Tz>) -> Self {
        Self::Instant(date_time.fixed_offset())
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Bound {
    fn from(date_time: &DateTime<Tz>) -> Self {
        Self::Instant(instant::to_instant(date_time))
    }
}

impl From<NaiveDateTime> for Bound {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl From<&str> for Bound {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Bound {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Span> for Bound {
    fn from(span: Span) -> Self {
        Self::Span(span)
    }
}

impl<T: Into<Self>> From<Option<T>> for Bound {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Argument of the relational queries on [`Range`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    Instant(Instant),

    /// Wall time in the timezone of the queried range.
    Naive(NaiveDateTime),

    /// Timestamp for [`instant::parse`], resolved in the timezone of the queried range.
    Text(String),

    Range(Range),

    Missing,
}

impl Operand {
    /// Resolve into inclusive bounds, a point being a range of zero length.
    pub(super) fn resolve(self, timezone: Timezone) -> Result<(Instant, Instant)> {
        let instant = match self {
            Self::Instant(instant) => instant,
            Self::Naive(naive) => timezone.localize(naive)?,
            Self::Text(text) => instant::parse(&text, timezone)?,
            Self::Range(range) => return Ok((range.start(), range.end())),
            Self::Missing => {
                return Err(Error::Type { argument: Argument::Operand, expected: OPERAND_KINDS });
            }
        };
        Ok((instant, instant))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Operand {
    fn from(date_time: DateTime<Tz>) -> Self {
        Self::Instant(date_time.fixed_offset())
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Operand {
    fn from(date_time: &DateTime<Tz>) -> Self {
        Self::Instant(instant::to_instant(date_time))
    }
}

impl From<NaiveDateTime> for Operand {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl From<&str> for Operand {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Operand {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Range> for Operand {
    fn from(range: Range) -> Self {
        Self::Range(range)
    }
}

impl From<&Range> for Operand {
    fn from(range: &Range) -> Self {
        Self::Range(*range)
    }
}

impl<T: Into<Self>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}
