use std::fmt;
use thiserror::Error;

/// An 8x8 grid of signed piece codes, `grid[row][col]`
pub type Grid = [[i8; 8]; 8];

/// Kind of a piece, without color or owner.
/// The discriminant is the piece code stored in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Index of the kind in [0, 6)
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Kind of a signed grid value, regardless of its owner.
    /// Returns `None` for empty squares and out of range values.
    pub fn from_code(code: i8) -> Option<PieceKind> {
        match code.unsigned_abs() {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// The side a player had in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// First mover
    White,
    /// Second mover
    Black,
}

impl Side {
    /// +1 for white, -1 for black
    pub fn sign(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

/// A board as white sees it: white pieces positive, row 0 is rank 8 and column 0 is file a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBoard(pub Grid);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("value {value} at ({row}, {col}) is not a piece code")]
    OutOfRange { row: usize, col: usize, value: i8 },
    #[error("expected one king per owner, found {user} user and {opponent} opponent kings")]
    Kings { user: usize, opponent: usize },
}

/// A board seen from the user's side.
///
/// Positive values are the user's pieces and negative values the opponent's.
/// The user always moves towards row 0: when the user plays black the board is
/// rotated 180 degrees. Squares are indexed `row * 8 + col`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(Grid);

impl Position {
    /// Canonical position of `board` for a user playing `side`
    pub fn canonical(board: &RawBoard, side: Side) -> Position {
        let sign = side.sign();
        let mut grid = [[0i8; 8]; 8];

        for (row, cells) in board.0.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                grid[row][col] = value.saturating_mul(sign);
            }
        }

        let position = Position(grid);
        match side {
            Side::White => position,
            Side::Black => position.mirror(),
        }
    }

    /// Builds a position from rows already in the user's perspective.
    /// Checks piece codes and that each owner has exactly one king.
    pub fn from_rows(grid: Grid) -> Result<Position, PositionError> {
        let (mut user, mut opponent) = (0, 0);

        for (row, cells) in grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if !(-6..=6).contains(&value) {
                    return Err(PositionError::OutOfRange { row, col, value });
                }
                if value == PieceKind::King.code() {
                    user += 1;
                } else if value == -PieceKind::King.code() {
                    opponent += 1;
                }
            }
        }

        if user != 1 || opponent != 1 {
            return Err(PositionError::Kings { user, opponent });
        }

        Ok(Position(grid))
    }

    /// 180 degree rotation (row -> 7 - row, col -> 7 - col). Owners are kept.
    pub fn mirror(&self) -> Position {
        let mut grid = [[0i8; 8]; 8];
        for row in 0..8 {
            for col in 0..8 {
                grid[7 - row][7 - col] = self.0[row][col];
            }
        }
        Position(grid)
    }

    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.0[row][col]
    }

    pub fn rows(&self) -> &Grid {
        &self.0
    }

    /// Every square in row-major order, with its value
    pub fn squares(&self) -> impl Iterator<Item = (usize, i8)> + '_ {
        self.0
            .iter()
            .flatten()
            .copied()
            .enumerate()
    }
}

/// Square name (e.g. `e2`) of a canonical square index, given the user's side
pub fn square_name(square: usize, side: Side) -> String {
    let (row, col) = match side {
        Side::White => (square / 8, square % 8),
        Side::Black => (7 - square / 8, 7 - square % 8),
    };
    let file = (b'a' + col as u8) as char;
    let rank = 8 - row;
    format!("{}{}", file, rank)
}

/// Uppercase letters are the user's pieces, lowercase the opponent's
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cells in self.0.iter() {
            for &value in cells.iter() {
                let c = match PieceKind::from_code(value) {
                    None => '.',
                    Some(kind) if value > 0 => kind.letter().to_ascii_uppercase(),
                    Some(kind) => kind.letter(),
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position")?;
        fmt::Display::fmt(self, f)
    }
}
