use crate::error::{OracleError, ReplayError};
use crate::position::{PieceKind, RawBoard, Side};
use crate::visitor::{parse_game, ParsedGame};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, Position, Role};

/// Move rules used to replay a game.
/// States are values: applying a move returns a new state and leaves the old one untouched.
pub trait MoveOracle {
    type State: Clone;

    /// Reads the main line of a PGN text
    fn read_game(&self, pgn: &str) -> Result<ParsedGame, ReplayError> {
        parse_game(pgn)
    }

    /// Starting state: the initial position, or the given FEN
    fn initial(&self, fen: Option<&str>) -> Result<Self::State, OracleError>;

    /// State after playing a SAN move
    fn apply(&self, state: &Self::State, token: &str) -> Result<Self::State, OracleError>;

    /// Side to move
    fn turn(&self, state: &Self::State) -> Side;

    /// Board of the state, as white sees it
    fn raw_board(&self, state: &Self::State) -> RawBoard;
}

/// Standard chess (and Chess960 starting positions) through `shakmaty`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyOracle;

impl MoveOracle for ShakmatyOracle {
    type State = Chess;

    fn initial(&self, fen: Option<&str>) -> Result<Chess, OracleError> {
        let Some(fen) = fen else {
            return Ok(Chess::default());
        };

        let fen = Fen::from_ascii(fen.as_bytes())
            .map_err(|err| OracleError::InvalidFen(err.to_string()))?;

        fen.clone()
            .into_position::<Chess>(CastlingMode::Standard)
            .or_else(|_| fen.into_position::<Chess>(CastlingMode::Chess960))
            .map_err(|err| OracleError::InvalidFen(err.to_string()))
    }

    fn apply(&self, state: &Chess, token: &str) -> Result<Chess, OracleError> {
        let san: SanPlus = token.parse().map_err(|_| OracleError::Unparseable)?;
        let mov = san
            .san
            .to_move(state)
            .map_err(|err| OracleError::Illegal(err.to_string()))?;

        state
            .clone()
            .play(&mov)
            .map_err(|err| OracleError::Illegal(err.to_string()))
    }

    fn turn(&self, state: &Chess) -> Side {
        state.turn().into()
    }

    fn raw_board(&self, state: &Chess) -> RawBoard {
        let mut grid = [[0i8; 8]; 8];

        for (square, piece) in state.board().clone().into_iter() {
            let code = PieceKind::from(piece.role).code();
            let side: Side = piece.color.into();
            grid[7 - square.rank() as usize][square.file() as usize] = code * side.sign();
        }

        RawBoard(grid)
    }
}

impl From<Role> for PieceKind {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}
