use chrono::NaiveDate;

use crate::{fetch, parse};
use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub enum Error {
    FeedUnavailable(fetch::Error),
    MalformedFeed(parse::Error),
    InvalidRange { from: NaiveDate, to: NaiveDate },
    Write(std::io::Error),
}

impl From<fetch::Error> for Error {
    fn from(e: fetch::Error) -> Self {
        Error::FeedUnavailable(e)
    }
}

impl From<parse::Error> for Error {
    fn from(e: parse::Error) -> Self {
        Error::MalformedFeed(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Write(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::FeedUnavailable(e) => write!(f, "Feed unavailable: {}", e),
            Error::MalformedFeed(e) => write!(f, "Malformed feed: {}", e),
            Error::InvalidRange { from, to } => {
                write!(f, "Invalid date range: {from} is after {to}")
            }
            Error::Write(e) => write!(f, "Could not write calendar: {}", e),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
