use chrono::NaiveDateTime;

use crate::{instant::Instant, span::Span, timezone::Timezone};

/// The operation input that was of an unacceptable kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Argument {
    #[display("start")]
    Start,

    #[display("end")]
    End,

    /// Argument of a relational query.
    #[display("argument")]
    Operand,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{argument} must be of type {expected}")]
    Type { argument: Argument, expected: &'static str },

    #[error("failed to parse time string ({input}) at position {position}")]
    Parse { input: String, position: usize },

    #[error("failed to parse duration ({input}): {reason}")]
    ParseSpan { input: String, reason: String },

    #[error("failed to parse modifier ({input}) at position {position}")]
    ParseModifier { input: String, position: usize },

    #[error("invalid modifier")]
    InvalidModifier,

    #[error("end ({end}) must be same or later than start ({start})")]
    Range { start: Instant, end: Instant },

    #[error("date arithmetic is out of range")]
    Overflow,

    #[error("period step must be positive, got `{step}`")]
    InvalidStep { step: Span },

    #[error("invalid format pattern `{pattern}`")]
    Format { pattern: String },

    #[error("invalid timezone `{input}`")]
    Timezone { input: String },

    #[error("wall time {naive} does not exist in {timezone}")]
    Nonexistent { naive: NaiveDateTime, timezone: Timezone },
}
