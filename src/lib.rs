#![doc = include_str!("../README.md")]

pub mod error;
pub mod instant;
pub mod modifier;
pub mod period;
mod prelude;
pub mod range;
pub mod span;
pub mod timezone;

pub use self::{
    error::{Argument, Error},
    instant::Instant,
    modifier::Modifier,
    period::{Period, PeriodOption},
    prelude::Result,
    range::{Bound, Operand, Range},
    span::Span,
    timezone::{Adjust, Timezone},
};
