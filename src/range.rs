mod bound;

use std::{
    fmt::{Debug, Display, Formatter},
    ops::RangeInclusive,
};

use chrono::TimeDelta;
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

pub use self::bound::{Bound, Operand};
use crate::{
    instant::{self, ISO_8601, Instant},
    modifier::Modifier,
    period::{Period, PeriodOption},
    prelude::*,
    span::Span,
    timezone::Timezone,
};

/// Immutable date-time range.
///
/// Both bounds are inclusive, the end is never before the start, and both bounds are
/// expressed in the range's timezone. Every transformation builds a new range.
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
#[must_use]
pub struct Range {
    #[serde(serialize_with = "instant::serialize")]
    start: Instant,

    #[serde(serialize_with = "instant::serialize")]
    end: Instant,

    timezone: Timezone,
}

impl Debug for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

/// `{start} - {end}`, both in ISO 8601.
impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start.format(ISO_8601), self.end.format(ISO_8601))
    }
}

impl Range {
    /// Build a range, resolving timestamps without an offset in UTC.
    ///
    /// The end may also be a [`Span`] relative to the start.
    pub fn new(start: impl Into<Bound>, end: impl Into<Bound>) -> Result<Self> {
        Self::new_in(start, end, Timezone::utc())
    }

    /// Build a range, resolving timestamps without an offset in the timezone.
    ///
    /// The range takes the timezone when the start agrees with it, and the start's own offset
    /// otherwise.
    #[instrument(skip_all, level = Level::TRACE, name = "Building the range…")]
    pub fn new_in(
        start: impl Into<Bound>,
        end: impl Into<Bound>,
        timezone: impl Into<Timezone>,
    ) -> Result<Self> {
        let default = timezone.into();
        let start = start.into().resolve_start(default)?;
        let timezone = if default.offset_at(&start) == *start.offset() {
            default
        } else {
            Timezone::Fixed(*start.offset())
        };
        let end = end.into().resolve_end(start, default, timezone)?;
        Self::from_instants(start, end, timezone)
    }

    fn from_instants(start: Instant, end: Instant, timezone: Timezone) -> Result<Self> {
        if end < start {
            return Err(Error::Range { start, end });
        }
        let (start, end) = (timezone.convert(start), timezone.convert(end));
        trace!(%start, %end, %timezone, "Built the range");
        Ok(Self { start, end, timezone })
    }

    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Instant {
        self.end
    }

    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Same instants, expressed in another timezone.
    pub fn with_timezone(&self, timezone: impl Into<Timezone>) -> Result<Self> {
        Self::from_instants(self.start, self.end, timezone.into())
    }

    /// Shift both bounds forward, on the wall clock of the range's timezone.
    pub fn add(&self, span: Span) -> Result<Self> {
        Self::from_instants(
            self.timezone.adjust(self.start, &span).ok_or(Error::Overflow)?,
            self.timezone.adjust(self.end, &span).ok_or(Error::Overflow)?,
            self.timezone,
        )
    }

    /// Shift both bounds backward, on the wall clock of the range's timezone.
    pub fn sub(&self, span: Span) -> Result<Self> {
        self.add(span.negate())
    }

    /// Apply a relative [`Modifier`] to both bounds.
    ///
    /// Any failure to parse or apply the modifier is reported as [`Error::InvalidModifier`],
    /// without the details.
    pub fn modify(&self, modifier: &str) -> Result<Self> {
        let (start, end) = modifier
            .parse::<Modifier>()
            .ok()
            .and_then(|modifier| {
                Some((
                    self.timezone.adjust(self.start, &modifier)?,
                    self.timezone.adjust(self.end, &modifier)?,
                ))
            })
            .ok_or(Error::InvalidModifier)?;
        Self::from_instants(start, end, self.timezone)
    }

    /// The argument lies entirely within the range, bounds included.
    pub fn in_range(&self, other: impl Into<Operand>) -> Result<bool> {
        let (start, end) = other.into().resolve(self.timezone())?;
        Ok(start >= self.start && end <= self.end)
    }

    /// The argument starts before the range does.
    ///
    /// For a range argument, only its start is compared: it may well overlap with this range.
    pub fn is_before(&self, other: impl Into<Operand>) -> Result<bool> {
        let (start, _) = other.into().resolve(self.timezone())?;
        Ok(start < self.start)
    }

    /// The argument ends after the range does.
    ///
    /// For a range argument, only its end is compared: it may well overlap with this range.
    pub fn is_after(&self, other: impl Into<Operand>) -> Result<bool> {
        let (_, end) = other.into().resolve(self.timezone())?;
        Ok(end > self.end)
    }

    /// Calendar difference between the bounds, on the wall clock of the range's timezone.
    pub fn interval(&self) -> Result<Span> {
        Span::between(self.start.naive_local(), self.end.naive_local())
    }

    /// Exact time between the bounds.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }

    #[instrument(skip_all, level = Level::TRACE, name = "Building the period…", fields(step = %step))]
    pub fn period(&self, step: Span, options: EnumSet<PeriodOption>) -> Result<Period> {
        Ok(Period::new(self.start, step, self.end, options)?.in_timezone(self.timezone))
    }

    /// Format both bounds with a [`chrono::format::strftime`] pattern, as `{start} - {end}`.
    pub fn format(&self, pattern: &str) -> Result<String> {
        Ok(format!(
            "{} - {}",
            instant::format(&self.start, pattern)?,
            instant::format(&self.end, pattern)?,
        ))
    }
}

impl From<Range> for RangeInclusive<Instant> {
    fn from(range: Range) -> Self {
        range.start..=range.end
    }
}

#[derive(Deserialize)]
struct RawRange {
    start: Instant,
    end: Instant,

    /// Defaults to the start's offset.
    timezone: Option<Timezone>,
}

impl TryFrom<RawRange> for Range {
    type Error = Error;

    fn try_from(raw: RawRange) -> Result<Self> {
        let timezone = raw.timezone.unwrap_or(Timezone::Fixed(*raw.start.offset()));
        Self::from_instants(raw.start, raw.end, timezone)
    }
}
