//! Calendar-aware amounts of time, backed by [`jiff::Span`].

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Datelike, Days, Months, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use jiff::{Unit, civil};

use crate::{prelude::*, timezone::Adjust};

/// Calendar amount of time: «1 month» is not a fixed number of seconds.
///
/// All units share one sign, so `P1Y-1M` is not a span. Applying a span to a date-time shifts
/// the calendar months first (clamping to the last day of a shorter month), then the weeks and
/// days on the wall clock, and then the exact time part.
///
/// Spans compare unit by unit: `P1W` is not equal to `P7D`.
///
/// Parsing accepts the ISO 8601 duration format (`P1Y2M3DT4H5M6.5S`) and the friendly one
/// (`1 hour 30 minutes`, `-2 days`, `3 weeks ago`).
#[derive(Copy, Clone, Default)]
#[must_use]
pub struct Span(jiff::Span);

impl Span {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Unit setters.
///
/// Each unit is stored on its own: `weeks(1).days(2)` is nine days in any order.
/// A negative value makes the whole span negative.
///
/// # Panics
///
/// When the value is out of the unit's range, for example more than 19 998 years.
impl Span {
    pub fn years(self, years: i64) -> Self {
        Self(self.0.years(years))
    }

    pub fn months(self, months: i64) -> Self {
        Self(self.0.months(months))
    }

    pub fn weeks(self, weeks: i64) -> Self {
        Self(self.0.weeks(weeks))
    }

    pub fn days(self, days: i64) -> Self {
        Self(self.0.days(days))
    }

    pub fn hours(self, hours: i64) -> Self {
        Self(self.0.hours(hours))
    }

    pub fn minutes(self, minutes: i64) -> Self {
        Self(self.0.minutes(minutes))
    }

    pub fn seconds(self, seconds: i64) -> Self {
        Self(self.0.seconds(seconds))
    }

    pub fn milliseconds(self, milliseconds: i64) -> Self {
        Self(self.0.milliseconds(milliseconds))
    }

    pub fn microseconds(self, microseconds: i64) -> Self {
        Self(self.0.microseconds(microseconds))
    }

    pub fn nanoseconds(self, nanoseconds: i64) -> Self {
        Self(self.0.nanoseconds(nanoseconds))
    }
}

impl Span {
    /// Signed unit values, from years down to nanoseconds.
    #[must_use]
    pub fn units(&self) -> [i64; 10] {
        let span = &self.0;
        [
            span.get_years().into(),
            span.get_months().into(),
            span.get_weeks().into(),
            span.get_days().into(),
            span.get_hours().into(),
            span.get_minutes(),
            span.get_seconds(),
            span.get_milliseconds(),
            span.get_microseconds(),
            span.get_nanoseconds(),
        ]
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn negate(self) -> Self {
        Self(self.0.negate())
    }

    /// Every unit multiplied by the factor.
    #[must_use]
    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).ok().map(Self)
    }

    #[must_use]
    pub fn checked_add_to<Tz: TimeZone>(&self, date_time: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let [
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        ] = self.units();

        let months = years.checked_mul(12)?.checked_add(months)?;
        let shift = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let date_time = if months >= 0 {
            date_time.checked_add_months(shift)?
        } else {
            date_time.checked_sub_months(shift)?
        };

        let days = weeks.checked_mul(7)?.checked_add(days)?;
        let shift = Days::new(days.unsigned_abs());
        let date_time = if days >= 0 {
            date_time.checked_add_days(shift)?
        } else {
            date_time.checked_sub_days(shift)?
        };

        let delta = TimeDelta::try_hours(hours)?
            .checked_add(&TimeDelta::try_minutes(minutes)?)?
            .checked_add(&TimeDelta::try_seconds(seconds)?)?
            .checked_add(&TimeDelta::try_milliseconds(milliseconds)?)?
            .checked_add(&TimeDelta::microseconds(microseconds))?
            .checked_add(&TimeDelta::nanoseconds(nanoseconds))?;
        date_time.checked_add_signed(delta)
    }

    #[must_use]
    pub fn checked_sub_from<Tz: TimeZone>(&self, date_time: DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.negate().checked_add_to(date_time)
    }

    /// Calendar difference between two wall times.
    ///
    /// Larger units are filled first, from years down to nanoseconds, without weeks.
    /// The difference is negative when `end` precedes `start`.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        let span = to_civil(start)?.until((Unit::Year, to_civil(end)?));
        span.map(Self).map_err(|_| Error::Overflow)
    }
}

fn to_civil(naive: NaiveDateTime) -> Result<civil::DateTime> {
    let narrow = |value: u32| i8::try_from(value).map_err(|_| Error::Overflow);
    civil::DateTime::new(
        i16::try_from(naive.year()).map_err(|_| Error::Overflow)?,
        narrow(naive.month())?,
        narrow(naive.day())?,
        narrow(naive.hour())?,
        narrow(naive.minute())?,
        narrow(naive.second())?,
        i32::try_from(naive.nanosecond()).map_err(|_| Error::Overflow)?,
    )
    .map_err(|_| Error::Overflow)
}

impl Adjust for Span {
    fn adjust<Tz: TimeZone>(&self, date_time: DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.checked_add_to(date_time)
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.units() == other.units()
    }
}

impl Eq for Span {}

impl From<jiff::Span> for Span {
    fn from(span: jiff::Span) -> Self {
        Self(span)
    }
}

impl From<Span> for jiff::Span {
    fn from(span: Span) -> Self {
        span.0
    }
}

/// Seconds and nanoseconds.
impl TryFrom<TimeDelta> for Span {
    type Error = Error;

    fn try_from(delta: TimeDelta) -> Result<Self> {
        jiff::Span::new()
            .try_seconds(delta.num_seconds())
            .and_then(|span| span.try_nanoseconds(delta.subsec_nanos()))
            .map(Self)
            .map_err(|_| Error::Overflow)
    }
}

impl TryFrom<std::time::Duration> for Span {
    type Error = Error;

    fn try_from(duration: std::time::Duration) -> Result<Self> {
        jiff::Span::try_from(duration).map(Self).map_err(|_| Error::Overflow)
    }
}

/// ISO 8601 duration, for example `P1Y2M3DT4H5M6.5S`.
impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Span {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        text.trim().parse::<jiff::Span>().map(Self).map_err(|error| Error::ParseSpan {
            input: text.to_owned(),
            reason: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};

    use super::*;
    use crate::instant::{Instant, parse, utc};

    fn at(text: &str) -> Instant {
        parse(text, utc()).unwrap()
    }

    fn naive(text: &str) -> NaiveDateTime {
        at(text).naive_local()
    }

    #[test]
    fn test_parse_iso() -> Result {
        assert_eq!(
            "P1Y2M3DT4H5M6S".parse::<Span>()?,
            Span::new().years(1).months(2).days(3).hours(4).minutes(5).seconds(6),
        );
        assert_eq!("-P3W".parse::<Span>()?, Span::new().weeks(-3));
        assert_eq!(" pt1h ".parse::<Span>()?, Span::new().hours(1));
        Ok(())
    }

    #[test]
    fn test_parse_friendly() -> Result {
        assert_eq!("1 hour 30 minutes".parse::<Span>()?, Span::new().hours(1).minutes(30));
        assert_eq!("2 days ago".parse::<Span>()?, Span::new().days(-2));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_mixed_signs() {
        assert!(matches!("P1Y-1M".parse::<Span>(), Err(Error::ParseSpan { .. })));
    }

    #[test]
    fn test_parse_rejects_fractional_days() {
        assert!(matches!("P1.0D".parse::<Span>(), Err(Error::ParseSpan { .. })));
    }

    #[test]
    fn test_parse_keeps_nanoseconds() -> Result {
        let span = "PT1.1234567S".parse::<Span>()?;
        let shifted = span.checked_add_to(at("2023-09-15 13:28:55Z")).unwrap();
        assert_eq!(shifted, at("2023-09-15 13:28:56.1234567Z"));
        Ok(())
    }

    #[test]
    fn test_display_round_trips() -> Result {
        let span = Span::new().years(1).months(2).days(3).hours(4).minutes(5).seconds(6);
        assert_eq!(span.to_string().parse::<Span>()?, span);
        assert!(Span::new().to_string().eq_ignore_ascii_case("PT0S"));
        Ok(())
    }

    #[test]
    fn test_weeks_and_days_add_up() {
        let start = at("2023-09-01 00:00:00Z");
        let expected = Some(at("2023-09-10 00:00:00Z"));
        assert_eq!(Span::new().weeks(1).days(2).checked_add_to(start), expected);
        assert_eq!(Span::new().days(2).weeks(1).checked_add_to(start), expected);
        assert_eq!(Span::new().weeks(1).days(2), Span::new().days(2).weeks(1));
    }

    #[test]
    fn test_month_end_clamps() {
        let shifted = Span::new().months(1).checked_add_to(at("2023-01-31 12:00:00Z"));
        assert_eq!(shifted, Some(at("2023-02-28 12:00:00Z")));
    }

    #[test]
    fn test_sub() {
        let shifted = Span::new().days(1).hours(2).checked_sub_from(at("2023-03-01 01:00:00Z"));
        assert_eq!(shifted, Some(at("2023-02-27 23:00:00Z")));
    }

    #[test]
    fn test_add_overflow() {
        let max = DateTime::<FixedOffset>::from(DateTime::<chrono::Utc>::MAX_UTC);
        assert_eq!(Span::new().days(1).checked_add_to(max), None);
    }

    #[test]
    fn test_between() -> Result {
        assert_eq!(
            Span::between(naive("2023-09-15 13:28:55Z"), naive("2023-09-15 14:28:55Z"))?,
            Span::new().hours(1),
        );
        assert_eq!(
            Span::between(naive("2023-01-15 10:00:00Z"), naive("2023-03-20 12:30:00Z"))?,
            Span::new().months(2).days(5).hours(2).minutes(30),
        );
        assert_eq!(
            Span::between(naive("2024-03-20 00:00:00Z"), naive("2023-01-15 00:00:00Z"))?,
            Span::new().years(1).months(2).days(5).negate(),
        );
        Ok(())
    }

    #[test]
    fn test_between_leap_second_fails() {
        let leap =
            NaiveDate::from_ymd_opt(2016, 12, 31).unwrap().and_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        assert_eq!(Span::between(leap, leap), Err(Error::Overflow));
    }

    #[test]
    fn test_from_time_delta() -> Result {
        assert_eq!(
            Span::try_from(TimeDelta::milliseconds(-1_500))?,
            Span::new().seconds(-1).nanoseconds(-500_000_000),
        );
        Ok(())
    }

    #[test]
    fn test_from_std_duration() -> Result {
        let span = Span::try_from(std::time::Duration::from_millis(5_400_250))?;
        let shifted = span.checked_add_to(at("2023-09-15 00:00:00Z")).unwrap();
        assert_eq!(shifted, at("2023-09-15 01:30:00.25Z"));
        Ok(())
    }
}
