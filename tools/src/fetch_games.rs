use crate::fetch::{save_games, ArchiveClient, FetchConfig, FetchError};
use clap::Args;
use dataset::RawGame;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use tracing::info;

#[derive(Args)]
pub struct FetchCommand {
    /// Chess.com username
    #[arg(long, value_name = "username")]
    username: String,

    /// Output .json file to write the games
    #[arg(long, value_name = "output")]
    output: String,

    #[clap(flatten)]
    fetch_config: FetchConfig,
}

pub fn fetch(cmd: FetchCommand) -> Result<(), Box<dyn Error>> {
    let games = download(&cmd.username, &cmd.fetch_config)?;
    save_games(&cmd.output, &games)?;

    info!("Wrote {} games to {}", games.len(), cmd.output);

    Ok(())
}

/// Downloads every archived game of a player, showing progress per month
pub fn download(username: &str, config: &FetchConfig) -> Result<Vec<RawGame>, FetchError> {
    let client = ArchiveClient::new(config)?;

    info!("Fetching archives of {}", username);

    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [Elapsed {elapsed_precise}] [Months {human_pos}] {msg}")
            .unwrap(),
    );

    let mut total = 0;
    let games = client.fetch_games(username, |url, count| {
        total += count;
        bar.inc(1);
        bar.set_message(format!("[Games {}] {}", total, url));
    })?;
    bar.finish();

    info!("Fetched {} games", games.len());

    Ok(games)
}
