use clap::{Parser, Subcommand};
use daterange::{Bound, PeriodOption, Range, Span, Timezone};
use enumset::EnumSet;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    /// Timezone for timestamps without an explicit offset: `UTC`, `+02:00`, or `Europe/Amsterdam`.
    #[clap(long, env = "DATERANGE_TIMEZONE", default_value = "UTC")]
    pub timezone: Timezone,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the range, its calendar interval, and its exact duration.
    #[clap(name = "show")]
    Show(ShowArgs),

    /// Tell whether the instant is before, within, or after the range.
    #[clap(name = "check")]
    Check(CheckArgs),

    /// Shift the range.
    #[clap(name = "shift")]
    Shift(ShiftArgs),

    /// List the instants of the range, `STEP` apart.
    #[clap(name = "period")]
    Period(PeriodArgs),
}

#[derive(Parser)]
pub struct RangeArgs {
    /// Start timestamp.
    pub start: String,

    /// End timestamp, or an ISO 8601 duration relative to the start (`PT1H`).
    pub end: String,
}

impl RangeArgs {
    pub fn build(&self, timezone: Timezone) -> daterange::Result<Range> {
        let end = if self.end.trim_start_matches(['-', '+']).starts_with(['P', 'p']) {
            Bound::Span(self.end.parse()?)
        } else {
            Bound::from(self.end.as_str())
        };
        Range::new_in(self.start.as_str(), end, timezone)
    }
}

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    /// `strftime`-like pattern for both bounds.
    #[clap(long)]
    pub format: Option<String>,
}

#[derive(Parser)]
pub struct CheckArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    /// Timestamp to check.
    pub instant: String,
}

#[derive(Parser)]
pub struct ShiftArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    #[clap(flatten)]
    pub shift: Shift,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
pub struct Shift {
    /// Add the ISO 8601 duration to both bounds.
    #[clap(long)]
    pub add: Option<Span>,

    /// Subtract the ISO 8601 duration from both bounds.
    #[clap(long)]
    pub sub: Option<Span>,

    /// Apply the relative modifier (`-1 hour`, `tomorrow noon`) to both bounds.
    #[clap(long, allow_hyphen_values = true)]
    pub modify: Option<String>,
}

#[derive(Parser)]
pub struct PeriodArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    /// Step: ISO 8601 (`PT15M`, `P1M`) or human-readable (`15min`, `1h 30m`).
    pub step: Span,

    #[clap(long, value_delimiter = ',', num_args = 1..)]
    pub options: Vec<PeriodOption>,
}

impl PeriodArgs {
    #[must_use]
    pub fn options(&self) -> EnumSet<PeriodOption> {
        self.options.iter().copied().collect()
    }
}
