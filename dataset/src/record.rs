use crate::error::SourceAnomaly;
use crate::position::Side;
use crate::visitor::ParsedGame;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rules values we know how to replay
const SUPPORTED_RULES: [&str; 2] = ["chess", "chess960"];

/// One game of a monthly archive, as received.
/// Fields are kept as raw JSON since the source does not guarantee their types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub url: Value,
    #[serde(default)]
    pub pgn: Value,
    #[serde(default)]
    pub rules: Value,
    #[serde(default)]
    pub white: Value,
    #[serde(default)]
    pub black: Value,
}

/// A game ready to be replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub pgn: String,
    /// Username of the white player, if the source recorded one
    pub white: Option<String>,
    /// Username of the black player, if the source recorded one
    pub black: Option<String>,
    pub url: Option<String>,
}

impl GameRecord {
    pub fn new(pgn: &str, white: &str, black: &str) -> Self {
        GameRecord {
            pgn: pgn.to_string(),
            white: Some(white.to_string()),
            black: Some(black.to_string()),
            url: None,
        }
    }

    pub fn from_raw(raw: &RawGame) -> Result<Self, SourceAnomaly> {
        let pgn = raw.pgn.as_str().ok_or(SourceAnomaly::MissingPgn)?;

        if let Some(rules) = raw.rules.as_str() {
            if !SUPPORTED_RULES.contains(&rules) {
                return Err(SourceAnomaly::UnsupportedRules(rules.to_string()));
            }
        }

        Ok(GameRecord {
            pgn: pgn.to_string(),
            white: identity(&raw.white),
            black: identity(&raw.black),
            url: raw.url.as_str().map(str::to_string),
        })
    }

    /// Side played by `username`, compared without ASCII case.
    /// Identities missing from the record are taken from the PGN headers.
    pub fn user_side(&self, username: &str, game: &ParsedGame) -> Result<Side, SourceAnomaly> {
        let white = self
            .white
            .as_ref()
            .or(game.white.as_ref())
            .ok_or(SourceAnomaly::MissingIdentity(Side::White))?;
        let black = self
            .black
            .as_ref()
            .or(game.black.as_ref())
            .ok_or(SourceAnomaly::MissingIdentity(Side::Black))?;

        if white.eq_ignore_ascii_case(username) {
            Ok(Side::White)
        } else if black.eq_ignore_ascii_case(username) {
            Ok(Side::Black)
        } else {
            Err(SourceAnomaly::UnknownUser {
                username: username.to_string(),
                white: white.clone(),
                black: black.clone(),
            })
        }
    }
}

/// Player identity: either `{"username": ...}` or a bare string
fn identity(player: &Value) -> Option<String> {
    match player {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => fields
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Result of validating a batch of raw games
#[derive(Debug, Default)]
pub struct Validated {
    pub records: Vec<GameRecord>,
    /// Index in the input and reason of every rejected entry
    pub anomalies: Vec<(usize, SourceAnomaly)>,
}

/// Splits raw games into usable records and anomalies, keeping input order
pub fn validate_records(raw: &[RawGame]) -> Validated {
    let mut validated = Validated::default();

    for (index, game) in raw.iter().enumerate() {
        match GameRecord::from_raw(game) {
            Ok(record) => validated.records.push(record),
            Err(anomaly) => validated.anomalies.push((index, anomaly)),
        }
    }

    validated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawGame {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn from_archive_entry() {
        let game = raw(json!({
            "url": "https://www.chess.com/game/live/1",
            "pgn": "1. e4 e5 *",
            "rules": "chess",
            "time_class": "blitz",
            "white": { "username": "Alice", "rating": 1500 },
            "black": { "username": "bob", "rating": 1480 }
        }));
        let record = GameRecord::from_raw(&game).unwrap();

        assert_eq!(record.pgn, "1. e4 e5 *");
        assert_eq!(record.white.as_deref(), Some("Alice"));
        assert_eq!(record.black.as_deref(), Some("bob"));
        assert_eq!(record.url.as_deref(), Some("https://www.chess.com/game/live/1"));
    }

    #[test]
    fn rejects_bad_pgn_and_variants() {
        let missing = raw(json!({ "white": "a", "black": "b" }));
        let number = raw(json!({ "pgn": 42, "white": "a", "black": "b" }));
        let variant = raw(json!({ "pgn": "*", "rules": "crazyhouse" }));

        assert_eq!(GameRecord::from_raw(&missing), Err(SourceAnomaly::MissingPgn));
        assert_eq!(GameRecord::from_raw(&number), Err(SourceAnomaly::MissingPgn));
        assert_eq!(
            GameRecord::from_raw(&variant),
            Err(SourceAnomaly::UnsupportedRules("crazyhouse".to_string()))
        );
    }

    #[test]
    fn validate_keeps_order() {
        let games = vec![
            raw(json!({ "pgn": "1. d4 *" })),
            raw(json!({ "pgn": null })),
            raw(json!({ "pgn": "1. e4 *" })),
        ];
        let validated = validate_records(&games);

        assert_eq!(validated.records.len(), 2);
        assert_eq!(validated.records[0].pgn, "1. d4 *");
        assert_eq!(validated.records[1].pgn, "1. e4 *");
        assert_eq!(validated.anomalies, vec![(1, SourceAnomaly::MissingPgn)]);
    }

    #[test]
    fn user_side() {
        let record = GameRecord::new("*", "Alice", "bob");
        let game = ParsedGame::default();

        assert_eq!(record.user_side("alice", &game), Ok(Side::White));
        assert_eq!(record.user_side("BOB", &game), Ok(Side::Black));
        assert!(matches!(
            record.user_side("carol", &game),
            Err(SourceAnomaly::UnknownUser { .. })
        ));
    }

    #[test]
    fn user_side_from_headers() {
        let record = GameRecord {
            pgn: "*".to_string(),
            white: None,
            black: Some("bob".to_string()),
            url: None,
        };
        let mut game = ParsedGame::default();

        assert_eq!(
            record.user_side("bob", &game),
            Err(SourceAnomaly::MissingIdentity(Side::White))
        );

        game.white = Some("alice".to_string());
        assert_eq!(record.user_side("alice", &game), Ok(Side::White));
    }
}
