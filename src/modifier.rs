//! Relative date/time modifiers such as `-1 hour`, `tomorrow noon`, `next monday`, or
//! `first day of next month`.

use std::{ops::Range, str::FromStr};

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Weekday,
};

use crate::{prelude::*, span::Span, timezone::Adjust};

/// Parsed relative modifier.
///
/// Terms are whitespace-separated, case does not matter:
///
/// - amounts in the ISO 8601 or friendly [`Span`] format: `-1 hour`, `+1 day 2 hours`,
///   `2 weeks ago`, `P1M`;
/// - `now`, `today`, `midnight`, `noon`, `tomorrow`, `yesterday`, and a time `HH:MM[:SS]`;
/// - `next`, `last`, `previous`, or `this`, followed by a unit (`next month`) or a weekday
///   (`last friday`);
/// - a weekday alone, the same as `this monday`;
/// - `first day of` and `last day of`.
///
/// Applying it first sets the wall clock (weekdays imply midnight), then shifts by the amounts
/// in order, then moves to the first or last day of the month, and finally to the weekday.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[must_use]
pub struct Modifier {
    pub time: Option<NaiveTime>,
    pub spans: Vec<Span>,
    pub day_of_month: Option<DayOfMonth>,
    pub weekday: Option<(Weekday, Direction)>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DayOfMonth {
    First,
    Last,
}

impl DayOfMonth {
    fn resolve(self, date: NaiveDate) -> Option<NaiveDate> {
        let first = date.with_day(1)?;
        match self {
            Self::First => Some(first),
            Self::Last => first.checked_add_months(Months::new(1))?.pred_opt(),
        }
    }
}

/// Where to look for a weekday.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Strictly after the date.
    Next,

    /// Strictly before the date.
    Last,

    /// The date itself or after it.
    This,
}

impl Direction {
    fn resolve(self, date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
        let current = i64::from(date.weekday().num_days_from_monday());
        let target = i64::from(weekday.num_days_from_monday());
        let days = match self {
            Self::Next => (target - current + 6).rem_euclid(7) + 1,
            Self::Last => -((current - target + 6).rem_euclid(7) + 1),
            Self::This => (target - current).rem_euclid(7),
        };
        date.checked_add_signed(TimeDelta::days(days))
    }
}

impl Adjust for Modifier {
    fn adjust<Tz: TimeZone>(&self, date_time: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let time = self.time.or_else(|| self.weekday.map(|_| NaiveTime::MIN));
        let mut date_time = match time {
            Some(time) => relocate(&date_time, date_time.date_naive().and_time(time))?,
            None => date_time,
        };
        for span in &self.spans {
            date_time = span.checked_add_to(date_time)?;
        }

        let date = date_time.date_naive();
        let mut target = date;
        if let Some(day_of_month) = self.day_of_month {
            target = day_of_month.resolve(target)?;
        }
        if let Some((weekday, direction)) = self.weekday {
            target = direction.resolve(target, weekday)?;
        }
        if target == date {
            Some(date_time)
        } else {
            relocate(&date_time, target.and_time(date_time.time()))
        }
    }
}

/// Same timezone, another wall time.
fn relocate<Tz: TimeZone>(date_time: &DateTime<Tz>, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    date_time.timezone().from_local_datetime(&naive).earliest()
}

/// Keyword phrase of a modifier.
enum Term {
    Now,
    Time(NaiveTime),

    /// Midnight, some days away.
    Day(i64),

    DayOfMonth(DayOfMonth),
    Weekday(Weekday, Direction),

    /// One unit of the next word forward, backward, or none.
    Unit { sign: i64 },
}

impl Term {
    /// Recognise the keyword phrase at the start of the words, and tell how many words it takes.
    fn recognise(words: &[(usize, &str)]) -> Option<(Self, usize)> {
        let word = |index: usize| words.get(index).map(|(_, word)| *word);
        let term = match word(0)? {
            "now" => (Self::Now, 1),
            "today" | "midnight" => (Self::Time(NaiveTime::MIN), 1),
            "noon" => (Self::Time(NaiveTime::from_hms_opt(12, 0, 0)?), 1),
            "tomorrow" => (Self::Day(1), 1),
            "yesterday" => (Self::Day(-1), 1),
            "first" if word(1) == Some("day") && word(2) == Some("of") => {
                (Self::DayOfMonth(DayOfMonth::First), 3)
            }
            "last" if word(1) == Some("day") && word(2) == Some("of") => {
                (Self::DayOfMonth(DayOfMonth::Last), 3)
            }
            relative @ ("next" | "last" | "previous" | "this") => {
                let (sign, direction) = match relative {
                    "next" => (1, Direction::Next),
                    "this" => (0, Direction::This),
                    _ => (-1, Direction::Last),
                };
                match word(1)?.parse::<Weekday>() {
                    Ok(weekday) => (Self::Weekday(weekday, direction), 2),
                    Err(_) => (Self::Unit { sign }, 2),
                }
            }
            time if time.contains(':') => {
                let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
                    .ok()?;
                (Self::Time(time), 1)
            }
            weekday => (Self::Weekday(weekday.parse().ok()?, Direction::This), 1),
        };
        Some(term)
    }
}

impl FromStr for Modifier {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let failure = |position: usize| Error::ParseModifier { input: text.to_owned(), position };
        let lowercase = text.to_ascii_lowercase();
        let words = split_words(&lowercase);
        if words.is_empty() {
            return Err(failure(text.len()));
        }

        let mut modifier = Self::default();
        let mut amount: Option<Range<usize>> = None;
        let mut index = 0;
        while let Some(&(position, word)) = words.get(index) {
            let Some((term, length)) = Term::recognise(&words[index..]) else {
                if word.starts_with(['+', '-'])
                    && let Some(pending) = amount.take()
                {
                    modifier.spans.push(parse_amount(&lowercase, pending).map_err(failure)?);
                }
                let start = amount.map_or(position, |pending| pending.start);
                amount = Some(start..position + word.len());
                index += 1;
                continue;
            };

            if let Some(pending) = amount.take() {
                modifier.spans.push(parse_amount(&lowercase, pending).map_err(failure)?);
            }
            match term {
                Term::Now => {}
                Term::Time(time) => modifier.time = Some(time),
                Term::Day(days) => {
                    modifier.time = Some(NaiveTime::MIN);
                    modifier.spans.push(Span::new().days(days));
                }
                Term::DayOfMonth(day_of_month) => modifier.day_of_month = Some(day_of_month),
                Term::Weekday(weekday, direction) => modifier.weekday = Some((weekday, direction)),
                Term::Unit { sign } => {
                    let (unit_position, unit) = words[index + 1];
                    let span =
                        format!("1 {unit}").parse::<Span>().map_err(|_| failure(unit_position))?;
                    match sign {
                        0 => {}
                        1 => modifier.spans.push(span),
                        _ => modifier.spans.push(span.negate()),
                    }
                }
            }
            index += length;
        }
        if let Some(pending) = amount {
            modifier.spans.push(parse_amount(&lowercase, pending).map_err(failure)?);
        }

        Ok(modifier)
    }
}

/// Parse the amount, or return its position.
fn parse_amount(text: &str, range: Range<usize>) -> Result<Span, usize> {
    let position = range.start;
    text[range].parse().map_err(|_| position)
}

/// Whitespace-separated words with their byte positions.
fn split_words(text: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    for (index, char_) in text.char_indices() {
        match (char_.is_whitespace(), start) {
            (true, Some(word_start)) => {
                words.push((word_start, &text[word_start..index]));
                start = None;
            }
            (false, None) => start = Some(index),
            _ => {}
        }
    }
    if let Some(word_start) = start {
        words.push((word_start, &text[word_start..]));
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instant::{Instant, parse, utc};

    fn at(text: &str) -> Instant {
        parse(text, utc()).unwrap()
    }

    fn apply(modifier: &str, instant: &str) -> Result<Option<Instant>> {
        Ok(modifier.parse::<Modifier>()?.adjust(at(instant)))
    }

    fn position(text: &str) -> Option<usize> {
        match text.parse::<Modifier>() {
            Err(Error::ParseModifier { position, .. }) => Some(position),
            _ => None,
        }
    }

    #[test]
    fn test_parse_amounts() -> Result {
        assert_eq!("-1 hour".parse::<Modifier>()?.spans, [Span::new().hours(-1)]);
        assert_eq!("+3 days".parse::<Modifier>()?.spans, [Span::new().days(3)]);
        assert_eq!(
            "+1 Day 30 Minutes".parse::<Modifier>()?.spans,
            [Span::new().days(1).minutes(30)],
        );
        assert_eq!(
            "+1 month -1 day".parse::<Modifier>()?.spans,
            [Span::new().months(1), Span::new().days(-1)],
        );
        assert_eq!("P1M".parse::<Modifier>()?.spans, [Span::new().months(1)]);
        Ok(())
    }

    #[test]
    fn test_parse_ago_negates() -> Result {
        assert_eq!(
            "2 weeks 1 day ago".parse::<Modifier>()?.spans,
            [Span::new().weeks(2).days(1).negate()],
        );
        Ok(())
    }

    #[test]
    fn test_parse_relative_units() -> Result {
        assert_eq!("next month".parse::<Modifier>()?.spans, [Span::new().months(1)]);
        assert_eq!("last year".parse::<Modifier>()?.spans, [Span::new().years(-1)]);
        assert_eq!("previous week".parse::<Modifier>()?.spans, [Span::new().weeks(-1)]);
        assert!("this hour".parse::<Modifier>()?.spans.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_keywords() -> Result {
        let modifier = "tomorrow noon".parse::<Modifier>()?;
        assert_eq!(modifier.time, NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(modifier.spans, [Span::new().days(1)]);
        assert_eq!("now".parse::<Modifier>()?, Modifier::default());
        assert_eq!("9:30".parse::<Modifier>()?.time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!("+1 day 23:59:59".parse::<Modifier>()?.time, NaiveTime::from_hms_opt(23, 59, 59));
        Ok(())
    }

    #[test]
    fn test_parse_weekdays() -> Result {
        assert_eq!(
            "next Monday".parse::<Modifier>()?.weekday,
            Some((Weekday::Mon, Direction::Next)),
        );
        assert_eq!("last fri".parse::<Modifier>()?.weekday, Some((Weekday::Fri, Direction::Last)));
        assert_eq!("sunday".parse::<Modifier>()?.weekday, Some((Weekday::Sun, Direction::This)));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(position(""), Some(0));
        assert_eq!(position("   "), Some(3));
        assert_eq!(position("bogus"), Some(0));
        assert_eq!(position("noon +1 parsec"), Some(5));
        assert_eq!(position("next parsec"), Some(5));
        assert_eq!(position("+1 hour -"), Some(8));
    }

    #[test]
    fn test_apply_keywords_then_amounts() -> Result {
        assert_eq!(
            apply("yesterday +1 hour", "2023-09-15 13:28:55+02:00")?,
            Some(at("2023-09-14 01:00:00+02:00")),
        );
        assert_eq!(apply("tomorrow noon", "2023-09-15 13:28:55Z")?, Some(at("2023-09-16 12:00:00Z")));
        Ok(())
    }

    #[test]
    fn test_apply_weekdays() -> Result {
        // 2023-09-15 is a Friday.
        assert_eq!(apply("next monday", "2023-09-15 13:28:55Z")?, Some(at("2023-09-18 00:00:00Z")));
        assert_eq!(apply("next friday", "2023-09-15 13:28:55Z")?, Some(at("2023-09-22 00:00:00Z")));
        assert_eq!(apply("last friday", "2023-09-15 13:28:55Z")?, Some(at("2023-09-08 00:00:00Z")));
        assert_eq!(apply("friday", "2023-09-15 13:28:55Z")?, Some(at("2023-09-15 00:00:00Z")));
        assert_eq!(apply("this sunday noon", "2023-09-15 13:28:55Z")?, Some(at("2023-09-17 12:00:00Z")));
        Ok(())
    }

    #[test]
    fn test_apply_day_of_month() -> Result {
        assert_eq!(
            apply("first day of next month", "2023-01-31 13:28:55Z")?,
            Some(at("2023-02-01 13:28:55Z")),
        );
        assert_eq!(
            apply("last day of next month", "2023-01-31 13:28:55Z")?,
            Some(at("2023-02-28 13:28:55Z")),
        );
        assert_eq!(apply("last day of", "2024-02-10 00:00:00Z")?, Some(at("2024-02-29 00:00:00Z")));
        Ok(())
    }

    #[test]
    fn test_apply_overflow() -> Result {
        let max = Instant::from(DateTime::<chrono::Utc>::MAX_UTC);
        assert_eq!("tomorrow".parse::<Modifier>()?.adjust(max), None);
        Ok(())
    }
}
