use crate::error::GameError;
use crate::label::label_move;
use crate::oracle::{MoveOracle, ShakmatyOracle};
use crate::position::{PieceKind, Position};
use crate::record::{validate_records, GameRecord, RawGame};
use crate::replay::replay;
use crate::tensor::Tensor;
use std::fmt;
use tracing::{debug, info, warn};

/// One training pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Position before the user's move
    pub tensor: Tensor,
    /// Square index in [0, 64) the user's piece left
    pub label: u8,
    /// Kind of the piece that left the square
    pub piece: PieceKind,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Player whose moves are learned
    pub username: String,
    /// Games with fewer plies are skipped
    pub min_ply: usize,
}

impl BuildConfig {
    pub fn new(username: &str) -> Self {
        BuildConfig {
            username: username.to_string(),
            min_ply: 0,
        }
    }
}

/// Counters of a dataset build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Entries seen, including rejected ones
    pub games: usize,
    /// Games that went through replay
    pub games_used: usize,
    pub skipped_source: usize,
    pub skipped_replay: usize,
    pub skipped_short: usize,
    /// User-turn positions recorded
    pub positions: usize,
    pub examples: usize,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "games {} (used {}, bad source {}, unplayable {}, too short {}), positions {}, examples {}",
            self.games,
            self.games_used,
            self.skipped_source,
            self.skipped_replay,
            self.skipped_short,
            self.positions,
            self.examples
        )
    }
}

#[derive(Debug, Default)]
pub struct Dataset {
    pub examples: Vec<Example>,
    pub report: BuildReport,
}

/// Examples of one game, and the number of positions they come from
#[derive(Debug)]
pub struct GameExamples {
    pub positions: usize,
    pub examples: Vec<Example>,
}

/// Turns game records into examples
pub struct Assembler<O: MoveOracle = ShakmatyOracle> {
    config: BuildConfig,
    oracle: O,
}

impl Assembler<ShakmatyOracle> {
    pub fn new(config: BuildConfig) -> Self {
        Self::with_oracle(config, ShakmatyOracle)
    }
}

impl<O: MoveOracle> Assembler<O> {
    pub fn with_oracle(config: BuildConfig, oracle: O) -> Self {
        Assembler { config, oracle }
    }

    /// Examples of a single game
    pub fn game_examples(&self, record: &GameRecord) -> Result<GameExamples, GameError> {
        let game = self.oracle.read_game(&record.pgn)?;
        let side = record.user_side(&self.config.username, &game)?;

        if game.plies() < self.config.min_ply {
            return Err(GameError::TooShort {
                plies: game.plies(),
                min_ply: self.config.min_ply,
            });
        }

        let positions = replay(&self.oracle, &game, side)?;

        Ok(GameExamples {
            positions: positions.len(),
            examples: examples_from_positions(&positions),
        })
    }

    pub fn build<'a, I>(&self, records: I) -> Dataset
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        self.build_with(records, |_| {})
    }

    /// Builds the dataset, calling `on_game` with the outcome of every game in order
    pub fn build_with<'a, I, F>(&self, records: I, mut on_game: F) -> Dataset
    where
        I: IntoIterator<Item = &'a GameRecord>,
        F: FnMut(&Result<GameExamples, GameError>),
    {
        let mut dataset = Dataset::default();

        for record in records {
            let result = self.game_examples(record);
            on_game(&result);
            dataset.add(record, result);
        }

        info!("Dataset built: {}", dataset.report);
        dataset
    }

    /// Validates raw archive entries and builds the dataset from the valid ones
    pub fn build_raw(&self, raw: &[RawGame]) -> Dataset {
        self.build_raw_with(raw, |_| {})
    }

    /// Same as `build_raw`, calling `on_game` for every valid entry
    pub fn build_raw_with<F>(&self, raw: &[RawGame], on_game: F) -> Dataset
    where
        F: FnMut(&Result<GameExamples, GameError>),
    {
        let validated = validate_records(raw);
        for (index, anomaly) in &validated.anomalies {
            warn!("Skipping archive entry {}: {}", index, anomaly);
        }

        let mut dataset = self.build_with(&validated.records, on_game);
        dataset.report.games += validated.anomalies.len();
        dataset.report.skipped_source += validated.anomalies.len();
        dataset
    }
}

impl Dataset {
    fn add(&mut self, record: &GameRecord, result: Result<GameExamples, GameError>) {
        let report = &mut self.report;
        report.games += 1;

        let game = match result {
            Ok(game) => game,
            Err(err) => {
                let url = record.url.as_deref().unwrap_or("<no url>");
                match err {
                    GameError::Source(_) => report.skipped_source += 1,
                    GameError::Replay(_) => report.skipped_replay += 1,
                    GameError::TooShort { .. } => report.skipped_short += 1,
                }
                warn!("Skipping game {}: {}", url, err);
                return;
            }
        };

        debug!(
            "Game {:?}: {} positions, {} examples",
            record.url,
            game.positions,
            game.examples.len()
        );

        report.games_used += 1;
        report.positions += game.positions;
        report.examples += game.examples.len();
        self.examples.extend(game.examples);
    }
}

/// Pairs every position with the next one of the same game.
/// The last position has no successor and yields nothing.
pub fn examples_from_positions(positions: &[Position]) -> Vec<Example> {
    positions
        .windows(2)
        .filter_map(|pair| {
            let moved = label_move(&pair[0], &pair[1])?;
            Some(Example {
                tensor: Tensor::encode(&pair[0]),
                label: moved.square,
                piece: moved.piece,
            })
        })
        .collect()
}
