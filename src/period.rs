use std::iter::FusedIterator;

use enumset::EnumSet;

use crate::{instant::Instant, prelude::*, span::Span, timezone::Timezone};

#[derive(Debug, clap::ValueEnum, enumset::EnumSetType)]
pub enum PeriodOption {
    /// Skip the start instant.
    ExcludeStart,

    /// Yield the end instant if a step lands exactly on it.
    IncludeEnd,
}

/// Instants from `start` towards `end`, `step` apart.
///
/// The start is included and the end is excluded unless told otherwise by the options.
/// Steps are taken on the wall clock of the timezone, the start's offset by default.
/// The sequence is restartable: each [`Period::iter`] call starts over.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[must_use]
pub struct Period {
    start: Instant,
    step: Span,
    end: Instant,
    options: EnumSet<PeriodOption>,
    timezone: Timezone,
}

impl Period {
    /// The step must move forward.
    pub fn new(
        start: Instant,
        step: Span,
        end: Instant,
        options: EnumSet<PeriodOption>,
    ) -> Result<Self> {
        if !step.is_positive() {
            return Err(Error::InvalidStep { step });
        }
        let timezone = Timezone::Fixed(*start.offset());
        Ok(Self { start, step, end, options, timezone })
    }

    /// Step on the wall clock of the timezone.
    pub const fn in_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Instant {
        self.end
    }

    pub const fn step(&self) -> Span {
        self.step
    }

    #[must_use]
    pub const fn options(&self) -> EnumSet<PeriodOption> {
        self.options
    }

    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    pub const fn iter(&self) -> Iter {
        Iter { period: *self, index: 0, is_exhausted: false }
    }
}

impl IntoIterator for &Period {
    type Item = Instant;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Period {
    type Item = Instant;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over a [`Period`].
#[must_use]
pub struct Iter {
    period: Period,
    index: i64,
    is_exhausted: bool,
}

impl Iterator for Iter {
    type Item = Instant;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted {
            return None;
        }
        if self.index == 0 && self.period.options.contains(PeriodOption::ExcludeStart) {
            self.index = 1;
        }

        // Stepping from the start each time, so that month ends do not drift.
        let period = &self.period;
        let current = period
            .step
            .checked_mul(self.index)
            .and_then(|offset| period.timezone.adjust(period.start, &offset));
        match current {
            Some(current)
                if current < self.period.end
                    || (current == self.period.end
                        && self.period.options.contains(PeriodOption::IncludeEnd)) =>
            {
                self.index += 1;
                Some(current)
            }
            _ => {
                self.is_exhausted = true;
                None
            }
        }
    }
}

impl FusedIterator for Iter {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use chrono_tz::Tz;

    use super::*;
    use crate::instant::{parse, utc};

    fn at(text: &str) -> Instant {
        parse(text, utc()).unwrap()
    }

    fn hourly(options: EnumSet<PeriodOption>) -> Period {
        Period::new(
            at("2023-09-15 13:00:00+00:00"),
            Span::new().hours(1),
            at("2023-09-15 16:00:00+00:00"),
            options,
        )
        .unwrap()
    }

    #[test]
    fn test_default_excludes_end() {
        assert_eq!(
            hourly(EnumSet::empty()).iter().collect_vec(),
            [at("2023-09-15 13:00:00Z"), at("2023-09-15 14:00:00Z"), at("2023-09-15 15:00:00Z")],
        );
    }

    #[test]
    fn test_include_end() {
        let instants = hourly(PeriodOption::IncludeEnd.into()).iter().collect_vec();
        assert_eq!(instants.len(), 4);
        assert_eq!(instants.last(), Some(&at("2023-09-15 16:00:00Z")));
    }

    #[test]
    fn test_exclude_start() {
        let instants = hourly(PeriodOption::ExcludeStart | PeriodOption::IncludeEnd)
            .into_iter()
            .collect_vec();
        assert_eq!(
            instants,
            [at("2023-09-15 14:00:00Z"), at("2023-09-15 15:00:00Z"), at("2023-09-15 16:00:00Z")],
        );
    }

    #[test]
    fn test_restartable() {
        let period = hourly(EnumSet::empty());
        let mut first = period.iter();
        assert_eq!(first.next(), Some(at("2023-09-15 13:00:00Z")));
        assert_eq!(period.iter().count(), 3);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn test_months_do_not_drift() -> Result {
        let period = Period::new(
            at("2023-01-31 00:00:00Z"),
            Span::new().months(1),
            at("2023-04-30 00:00:00Z"),
            PeriodOption::IncludeEnd.into(),
        )?;
        assert_eq!(
            period.iter().collect_vec(),
            [
                at("2023-01-31 00:00:00Z"),
                at("2023-02-28 00:00:00Z"),
                at("2023-03-31 00:00:00Z"),
                at("2023-04-30 00:00:00Z"),
            ],
        );
        Ok(())
    }

    #[test]
    fn test_days_follow_named_timezone() -> Result {
        let amsterdam = Timezone::Named(Tz::Europe__Amsterdam);
        let period = Period::new(
            at("2023-03-25 12:00:00+01:00"),
            Span::new().days(1),
            at("2023-03-27 12:00:00+02:00"),
            PeriodOption::IncludeEnd.into(),
        )?
        .in_timezone(amsterdam);
        assert_eq!(
            period.iter().collect_vec(),
            [
                at("2023-03-25 12:00:00+01:00"),
                at("2023-03-26 12:00:00+02:00"),
                at("2023-03-27 12:00:00+02:00"),
            ],
        );
        let offsets = period.iter().map(|instant| instant.offset().local_minus_utc()).collect_vec();
        assert_eq!(offsets, [3600, 7200, 7200]);
        Ok(())
    }

    #[test]
    fn test_invalid_step() {
        let start = at("2023-09-15 13:00:00Z");
        for step in [Span::new(), Span::new().hours(-1), Span::new().days(1).negate()] {
            assert_eq!(
                Period::new(start, step, start, EnumSet::empty()),
                Err(Error::InvalidStep { step }),
            );
        }
    }
}
