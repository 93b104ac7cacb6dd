mod cli;
mod tables;

use anyhow::{Context, Result, bail};
use clap::{Parser, crate_version};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, CheckArgs, Command, Shift, ShiftArgs, ShowArgs},
    tables::build_period_table,
};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    debug!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let timezone = args.timezone;

    match args.command {
        Command::Show(ShowArgs { range, format }) => {
            let range = range.build(timezone).context("failed to build the range")?;
            match format {
                Some(pattern) => println!("{}", range.format(&pattern)?),
                None => println!("{range}"),
            }
            let duration = range.duration().to_std().context("negative duration")?;
            println!("interval: {}", range.interval()?);
            println!("duration: {}", humantime::format_duration(duration));
        }

        Command::Check(CheckArgs { range, instant }) => {
            let range = range.build(timezone).context("failed to build the range")?;
            let position = if range.is_before(instant.as_str())? {
                "before"
            } else if range.is_after(instant.as_str())? {
                "after"
            } else {
                "within"
            };
            println!("{position}");
        }

        Command::Shift(ShiftArgs { range, shift }) => {
            let range = range.build(timezone).context("failed to build the range")?;
            let shifted = match shift {
                Shift { add: Some(span), .. } => range.add(span)?,
                Shift { sub: Some(span), .. } => range.sub(span)?,
                Shift { modify: Some(modifier), .. } => {
                    range.modify(&modifier).with_context(|| format!("`{modifier}`"))?
                }
                Shift { .. } => bail!("nothing to shift by"),
            };
            println!("{shifted}");
        }

        Command::Period(args) => {
            let range = args.range.build(timezone).context("failed to build the range")?;
            let period = range.period(args.step, args.options())?;
            println!("{}", build_period_table(&period)?);
        }
    }

    Ok(())
}
