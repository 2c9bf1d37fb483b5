#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod calendar;
mod config;
mod error;
mod fetch;
mod parse;

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{
    calendar::assemble,
    config::{Cli, Config},
    parse::Weeks,
};

pub use error::Result;

/// Loads the feed, builds the events and writes the calendar. Nothing is
/// written unless every step before the write succeeded.
async fn run(config: &Config, today: NaiveDate) -> Result<usize> {
    let raw = fetch::load_feed(&config.feed, config.timeout).await?;
    let weeks = Weeks::from_xml(&raw)?;
    if weeks.is_empty() {
        log::warn!("No menu week found in the feed");
    } else {
        log::info!("Found {} menu weeks in the feed", weeks.len());
    }
    let events = if let Some(range) = config.range.resolve(&weeks, today) {
        log::info!("Building menus from {} to {}", range.start(), range.end());
        assemble(&weeks, range)
    } else {
        log::warn!("The feed has no menu from {today} onwards");
        BTreeSet::new()
    };
    calendar::write_calendar(&config.output, &events).await?;
    log::info!(
        "Wrote {} events to {}",
        events.len(),
        config.output.display()
    );
    Ok(events.len())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let config = Config::from_cli(Cli::parse())?;
    log::debug!("{config:?}");
    run(&config, Local::now().date_naive()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        calendar::{DateRange, RangeMode},
        error::Error,
        fetch::FeedSource,
    };

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_config(feed: &str, output: PathBuf, range: RangeMode) -> Config {
        Config {
            feed: FeedSource::Local(PathBuf::from(feed)),
            output,
            range,
            timeout: config::DEFAULT_TIMEOUT,
        }
    }

    #[tokio::test]
    async fn test_run_explicit_range() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("menus.ics");
        let range = DateRange::new(date(16, 9, 2024), date(29, 9, 2024));
        let config = test_config(
            "./src/parse/feed_examples/menus.xml",
            output.clone(),
            RangeMode::Explicit(range),
        );
        let count = run(&config, date(1, 1, 2024)).await.unwrap();
        // five meals the first week, two on the second monday
        assert_eq!(count, 7);
        let ics = std::fs::read_to_string(output).unwrap();
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 7);
    }

    #[tokio::test]
    async fn test_run_upcoming() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("menus.ics");
        let config = test_config(
            "./src/parse/feed_examples/menus.xml",
            output.clone(),
            RangeMode::Upcoming,
        );
        // from saturday 21/09: saturday lunch and the next monday
        let count = run(&config, date(21, 9, 2024)).await.unwrap();
        assert_eq!(count, 3);
        // nothing announced after the feed ends, an empty calendar is still written
        let count = run(&config, date(1, 10, 2024)).await.unwrap();
        assert_eq!(count, 0);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_run_malformed_feed_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("broken.xml");
        std::fs::write(&feed, "<rss><channel><item></channel>").unwrap();
        let output = dir.path().join("menus.ics");
        let config = test_config(feed.to_str().unwrap(), output.clone(), RangeMode::Upcoming);
        let err = run(&config, date(16, 9, 2024)).await.unwrap_err();
        assert!(matches!(err, Error::MalformedFeed(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_run_missing_feed_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("menus.ics");
        let config = test_config("./does/not/exist.xml", output.clone(), RangeMode::Upcoming);
        let err = run(&config, date(16, 9, 2024)).await.unwrap_err();
        assert!(matches!(err, Error::FeedUnavailable(_)));
        assert!(!output.exists());
    }
}
