use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
    str::FromStr,
    time::{Duration, Instant},
};

use reqwest::Client;
use tracing::{instrument, Level};
use url::Url;

pub const DEFAULT_FEED: &str = "http://services.imt-atlantique.fr/rak/rss/menus.xml";

/// Where the feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FromStr for FeedSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| format!("{s} is not a valid file url")),
            // anything else, including windows drive letters parsed as schemes
            _ => Ok(Self::Local(PathBuf::from(s))),
        }
    }
}

impl Display for FeedSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Request(reqwest::Error),
    Read(std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Read(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "HTTP Request Error: {e}"),
            Self::Read(e) => write!(f, "Read Error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

pub fn make_client(timeout: Duration) -> Result<Client, Error> {
    Client::builder()
        .gzip(true)
        .timeout(timeout)
        .build()
        .map_err(From::from)
}

pub async fn fetch_feed(client: &Client, url: Url) -> Result<String, Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

#[instrument(skip_all, fields(source = %source), level = Level::TRACE)]
pub async fn load_feed(source: &FeedSource, timeout: Duration) -> Result<String, Error> {
    let start = Instant::now();
    let text = match source {
        FeedSource::Remote(url) => {
            let client = make_client(timeout)?;
            fetch_feed(&client, url.clone()).await?
        }
        FeedSource::Local(path) => tokio::fs::read_to_string(path).await?,
    };
    log::info!("Loaded feed from {source} in {:?}", start.elapsed());
    Ok(text)
}
