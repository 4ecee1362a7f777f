use clap::Args;
use dataset::RawGame;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const API_BASE: &str = "https://api.chess.com/pub/player";

#[derive(Args, Clone)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[arg(long, value_name = "user-agent", default_value = "move-dataset-fetcher/0.1")]
    user_agent: String,

    /// Timeout of a single request, in seconds
    #[arg(long, value_name = "timeout", default_value = "30")]
    timeout: u64,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Deserialize)]
struct ArchiveList {
    #[serde(default)]
    archives: Vec<String>,
}

#[derive(Deserialize)]
struct MonthArchive {
    #[serde(default)]
    games: Vec<Value>,
}

/// Blocking client for the chess.com public game archives.
/// Requests are sequential; there is no retry.
pub struct ArchiveClient {
    client: reqwest::blocking::Client,
}

impl ArchiveClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(ArchiveClient { client })
    }

    /// URLs of the monthly archives of a player, oldest first
    pub fn archives(&self, username: &str) -> Result<Vec<String>, FetchError> {
        let list: ArchiveList = self.get_json(&archives_url(username))?;
        Ok(list.archives)
    }

    /// Games of one monthly archive
    pub fn month(&self, url: &str) -> Result<Vec<RawGame>, FetchError> {
        let month: MonthArchive = self.get_json(url)?;
        Ok(month.games.into_iter().map(raw_game).collect())
    }

    /// Every archived game of a player. Months that fail are logged and skipped,
    /// only a failure to list the archives is an error.
    /// `on_month` is called after each month with its URL and game count.
    pub fn fetch_games<F>(&self, username: &str, mut on_month: F) -> Result<Vec<RawGame>, FetchError>
    where
        F: FnMut(&str, usize),
    {
        let mut games = vec![];

        for url in self.archives(username)? {
            match self.month(&url) {
                Ok(month) => {
                    debug!("Fetched {} games from {}", month.len(), url);
                    on_month(&url, month.len());
                    games.extend(month);
                }
                Err(err) => {
                    warn!("Failed to fetch month {}: {}", url, err);
                    on_month(&url, 0);
                }
            }
        }

        Ok(games)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.json()?)
    }
}

pub fn archives_url(username: &str) -> String {
    format!("{}/{}/games/archives", API_BASE, username.to_lowercase())
}

/// Entries that are not objects become empty games, rejected later by validation
fn raw_game(entry: Value) -> RawGame {
    serde_json::from_value(entry).unwrap_or_default()
}

/// Reads games saved by `save_games`
pub fn load_games(path: &str) -> Result<Vec<RawGame>, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn save_games(path: &str, games: &[RawGame]) -> Result<(), Box<dyn std::error::Error>> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, games)?;
    Ok(())
}
