//! Builds move-prediction training data from a player's games.
//!
//! Each game is replayed, the positions right before the player's own moves
//! are turned to the player's point of view and encoded as 12x8x8 tensors. The
//! label of a position is the square the player's piece left on the next move.

pub mod assemble;
pub mod error;
pub mod label;
pub mod oracle;
pub mod position;
pub mod record;
pub mod replay;
pub mod tensor;
pub mod visitor;

pub use assemble::{Assembler, BuildConfig, BuildReport, Dataset, Example};
pub use error::{GameError, OracleError, ReplayError, SourceAnomaly};
pub use position::{PieceKind, Position, Side};
pub use record::{GameRecord, RawGame};
pub use tensor::Tensor;
