use crate::error::{OracleError, ReplayError};
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};

/// Main line of a single PGN game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGame {
    /// `White` header
    pub white: Option<String>,
    /// `Black` header
    pub black: Option<String>,
    /// `FEN` header, for games not starting from the initial position
    pub fen: Option<String>,
    /// SAN moves of the main line, in order
    pub tokens: Vec<String>,
}

impl ParsedGame {
    /// A game from the initial position with the given SAN moves
    pub fn from_tokens(tokens: &[&str]) -> Self {
        ParsedGame {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn plies(&self) -> usize {
        self.tokens.len()
    }
}

/// Collects the headers we care about and the main line moves.
/// Moves are not checked for legality here.
pub struct GameVisitor {
    game: ParsedGame,
}

impl GameVisitor {
    pub fn new() -> Self {
        GameVisitor {
            game: ParsedGame::default(),
        }
    }
}

impl Default for GameVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for GameVisitor {
    type Result = ParsedGame;

    fn begin_game(&mut self) {
        self.game = ParsedGame::default();
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let key = String::from_utf8_lossy(key);
        let value = String::from_utf8_lossy(value.as_bytes()).to_string();

        if key == "White" {
            self.game.white = Some(value);
        } else if key == "Black" {
            self.game.black = Some(value);
        } else if key == "FEN" {
            self.game.fen = Some(value);
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true) // main line only
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.game.tokens.push(san_plus.to_string());
    }

    fn end_game(&mut self) -> Self::Result {
        std::mem::take(&mut self.game)
    }
}

/// Reads the first game of a PGN text.
/// A main line token that is not a SAN move fails the game.
pub fn parse_game(pgn: &str) -> Result<ParsedGame, ReplayError> {
    let mut reader = BufferedReader::new(pgn.as_bytes());
    let mut visitor = GameVisitor::new();

    let game = match reader.read_game(&mut visitor) {
        Ok(Some(game)) => game,
        Ok(None) => return Err(ReplayError::NoGame),
        Err(err) => return Err(ReplayError::Unreadable(err.to_string())),
    };

    if let Some((ply, token)) = unreadable_move(first_movetext(pgn)) {
        return Err(ReplayError::Move {
            ply,
            token,
            source: OracleError::Unparseable,
        });
    }

    Ok(game)
}

/// Movetext of the first game: from the first line after its headers up to an
/// empty line or the next header
fn first_movetext(pgn: &str) -> &str {
    let mut start = None;
    let mut offset = 0;

    for line in pgn.split_inclusive('\n') {
        let content = line.trim();
        match start {
            None => {
                if !(content.is_empty() || content.starts_with('[') || content.starts_with('%')) {
                    start = Some(offset);
                }
            }
            Some(start) => {
                if line.trim_end_matches(['\r', '\n']).is_empty() || line.starts_with('[') {
                    return &pgn[start..offset];
                }
            }
        }
        offset += line.len();
    }

    match start {
        Some(start) => &pgn[start..],
        None => "",
    }
}

/// First main line token that is not a move, with the number of moves before it.
/// Comments, escaped lines, variations, NAGs, move numbers and results are skipped,
/// tokens are delimited the way `pgn_reader` delimits them.
fn unreadable_move(movetext: &str) -> Option<(usize, String)> {
    let bytes = movetext.as_bytes();
    let mut plies = 0;
    let mut i = 0;

    while i < bytes.len() {
        let ch = bytes[i];
        if ch == b'%' && (i == 0 || bytes[i - 1] == b'\n') {
            i = skip_past(bytes, i, b'\n');
            continue;
        }

        match ch {
            b'{' => i = skip_past(bytes, i, b'}'),
            b';' => i = skip_past(bytes, i, b'\n'),
            b'(' => i = skip_variation(bytes, i),
            b'$' => i = token_end(bytes, i + 1),
            b' ' | b'\t' | b'\r' | b'\n' | b'.' | b')' | b'}' | b'!' | b'?' | b'P' => i += 1,
            _ => {
                let end = token_end(bytes, i);
                let token = &bytes[i..end];
                if !is_move_number_or_result(token) {
                    if !is_zero_castle(token) && SanPlus::from_ascii(token).is_err() {
                        return Some((plies, String::from_utf8_lossy(token).to_string()));
                    }
                    plies += 1;
                }
                i = end;
            }
        }
    }

    None
}

/// Index right after the next `delimiter` following `from`, or the end
fn skip_past(bytes: &[u8], from: usize, delimiter: u8) -> usize {
    match bytes[from + 1..].iter().position(|&b| b == delimiter) {
        Some(offset) => from + 1 + offset + 1,
        None => bytes.len(),
    }
}

/// Index right after the `)` closing the variation opened at `from`
fn skip_variation(bytes: &[u8], from: usize) -> usize {
    let mut depth = 0usize;
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => i = skip_past(bytes, i, b'}'),
            b';' => i = skip_past(bytes, i, b'\n'),
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }

    i
}

fn token_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| {
            matches!(
                b,
                b' ' | b'\t' | b'\n' | b'\r' | b'{' | b'}' | b'(' | b')' | b'!' | b'?' | b'$' | b';' | b'.'
            )
        })
        .map_or(bytes.len(), |offset| from + offset)
}

fn is_move_number_or_result(token: &[u8]) -> bool {
    token.iter().all(u8::is_ascii_digit)
        || matches!(token, b"1-0" | b"0-1" | b"1/2-1/2" | b"*")
}

fn is_zero_castle(token: &[u8]) -> bool {
    let token = token.strip_suffix(b"+").or_else(|| token.strip_suffix(b"#")).unwrap_or(token);
    token == b"0-0" || token == b"0-0-0"
}
