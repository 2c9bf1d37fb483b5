use std::{env, path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    calendar::{DateRange, RangeMode},
    error::Error,
    fetch::{FeedSource, DEFAULT_FEED},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y").map_err(|e| format!("expected DD/MM/YYYY: {e}"))
}

/// Builds a calendar of the RAK restaurant menus from its RSS feed.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Feed URL, file:// URL or local path
    #[arg(default_value = DEFAULT_FEED)]
    feed: FeedSource,

    /// Calendar file to write
    #[arg(default_value = "menus.ics")]
    output: PathBuf,

    /// First day to include (DD/MM/YYYY), defaults to today
    #[arg(long, value_parser = parse_date, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day to include (DD/MM/YYYY), defaults to the last day of the feed
    #[arg(long, value_parser = parse_date, requires = "from")]
    to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedSource,
    pub output: PathBuf,
    pub range: RangeMode,
    pub timeout: Duration,
}

fn timeout_from(value: Option<&str>) -> Duration {
    match value.map(str::parse::<u64>) {
        Some(Ok(secs)) if secs > 0 => Duration::from_secs(secs),
        Some(_) => {
            log::warn!("MENU_FETCH_TIMEOUT_SECS is not a positive number of seconds, using default");
            DEFAULT_TIMEOUT
        }
        None => DEFAULT_TIMEOUT,
    }
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, Error> {
        let range = match (cli.from, cli.to) {
            (Some(from), Some(to)) if from > to => return Err(Error::InvalidRange { from, to }),
            (Some(from), Some(to)) => RangeMode::Explicit(DateRange::new(from, to)),
            _ => RangeMode::Upcoming,
        };
        let timeout = timeout_from(env::var("MENU_FETCH_TIMEOUT_SECS").ok().as_deref());
        Ok(Self {
            feed: cli.feed,
            output: cli.output,
            range,
            timeout,
        })
    }
}
