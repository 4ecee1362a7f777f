use crate::fetch::{load_games, FetchConfig};
use crate::fetch_games::download;
use crate::sample_writer::{SampleWriter, RECORD_SIZE};
use clap::Args;
use dataset::{Assembler, BuildConfig};
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter};
use tracing::info;
use zstd::Encoder;

#[derive(Args)]
pub struct BuildDatasetCommand {
    /// Chess.com username whose moves are learned
    #[arg(long, value_name = "username")]
    username: String,

    /// .json file written by the `fetch` command. Games are downloaded when missing
    #[arg(long, value_name = "input")]
    input: Option<String>,

    /// Output file to write the samples
    #[arg(long, value_name = "output")]
    output: String,

    /// Whether to compress the output with the ZSTD algorithm
    #[arg(long, default_value = "false")]
    compress: bool,

    /// Only accept games that are at least this many plies long
    #[arg(long, value_name = "min-ply", default_value = "0")]
    min_ply: usize,

    #[clap(flatten)]
    fetch_config: FetchConfig,
}

pub fn build_dataset(cmd: BuildDatasetCommand) -> Result<(), Box<dyn Error>> {
    let raw_games = match &cmd.input {
        Some(path) => load_games(path)?,
        None => download(&cmd.username, &cmd.fetch_config)?,
    };

    // compress output if asked
    let output_file = File::create(&cmd.output)?;
    let writer: Box<dyn io::Write> = if cmd.compress {
        // the encoder is buffered internally
        Box::new(Encoder::new(output_file, 3)?.auto_finish())
    } else {
        Box::new(BufWriter::new(output_file))
    };
    let mut writer = SampleWriter::new(writer);

    info!("Input: {}", cmd.input.as_deref().unwrap_or("chess.com"));
    info!("Output: {}", cmd.output);
    info!("Write compressed: {}", cmd.compress);
    info!("Record size: {} bytes", RECORD_SIZE);

    let assembler = Assembler::new(BuildConfig {
        username: cmd.username.clone(),
        min_ply: cmd.min_ply,
    });

    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [Elapsed {elapsed_precise}] [Games {human_pos} @ {per_sec}] {msg}")
            .unwrap(),
    );

    let mut count = 0;
    let dataset = assembler.build_raw_with(&raw_games, |result| {
        bar.inc(1);
        if let Ok(game) = result {
            count += game.examples.len();
            bar.set_message(format!("[Samples {}]", HumanCount(count as u64)));
        }
    });
    bar.finish();

    for example in &dataset.examples {
        writer.write_example(example)?;
    }
    let written = writer.written();
    writer.into_inner()?;

    info!("{}", dataset.report);
    info!("Done. Written samples: {}", written);

    Ok(())
}
