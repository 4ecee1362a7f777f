use crate::error::ReplayError;
use crate::oracle::MoveOracle;
use crate::position::{Position, Side};
use crate::visitor::ParsedGame;

/// Replays a game and returns the canonical position right before each of the user's moves.
///
/// A ply belongs to the user when the user's side is to move. From the
/// initial position these are the even plies for white and the odd ones for
/// black. Any move the oracle rejects fails the whole game.
pub fn replay<O: MoveOracle>(
    oracle: &O,
    game: &ParsedGame,
    side: Side,
) -> Result<Vec<Position>, ReplayError> {
    let mut state = oracle
        .initial(game.fen.as_deref())
        .map_err(ReplayError::Start)?;
    let mut positions = Vec::with_capacity(game.plies() / 2 + 1);

    for (ply, token) in game.tokens.iter().enumerate() {
        if oracle.turn(&state) == side {
            positions.push(Position::canonical(&oracle.raw_board(&state), side));
        }

        state = oracle
            .apply(&state, token)
            .map_err(|source| ReplayError::Move {
                ply,
                token: token.clone(),
                source,
            })?;
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::oracle::ShakmatyOracle;
    use crate::position::tests::start_board;

    const SEVEN_PLIES: [&str; 7] = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"];

    #[test]
    fn no_moves_no_positions() {
        let game = ParsedGame::from_tokens(&[]);

        assert!(replay(&ShakmatyOracle, &game, Side::White).unwrap().is_empty());
        assert!(replay(&ShakmatyOracle, &game, Side::Black).unwrap().is_empty());
    }

    #[test]
    fn counts_user_turns() {
        let game = ParsedGame::from_tokens(&SEVEN_PLIES);

        assert_eq!(replay(&ShakmatyOracle, &game, Side::White).unwrap().len(), 4);
        assert_eq!(replay(&ShakmatyOracle, &game, Side::Black).unwrap().len(), 3);
    }

    #[test]
    fn snapshots_before_the_move() {
        let game = ParsedGame::from_tokens(&["e4", "e5", "Nf3", "Nc6"]);
        let positions = replay(&ShakmatyOracle, &game, Side::White).unwrap();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0], Position::canonical(&start_board(), Side::White));

        // after 1. e4 e5
        assert_eq!(positions[1].get(6, 4), 0);
        assert_eq!(positions[1].get(4, 4), 1);
        assert_eq!(positions[1].get(1, 4), 0);
        assert_eq!(positions[1].get(3, 4), -1);
        assert_eq!(positions[1].get(7, 6), 2);
    }

    #[test]
    fn black_positions_are_rotated() {
        let game = ParsedGame::from_tokens(&["e4", "e5", "Nf3", "Nc6"]);
        let positions = replay(&ShakmatyOracle, &game, Side::Black).unwrap();

        assert_eq!(positions.len(), 2);
        // after 1. e4: e4 maps to row 3, column 3 and e2 to row 1, column 3
        assert_eq!(positions[0].get(3, 3), -1);
        assert_eq!(positions[0].get(1, 3), 0);
        assert_eq!(positions[0].get(6, 3), 1);
        assert_eq!(positions[0].get(7, 3), 6);
    }

    #[test]
    fn illegal_move_fails_the_game() {
        let game = ParsedGame::from_tokens(&["e4", "e5", "Ke3"]);
        let err = replay(&ShakmatyOracle, &game, Side::White).unwrap_err();

        assert!(matches!(
            err,
            ReplayError::Move {
                ply: 2,
                source: OracleError::Illegal(_),
                ..
            }
        ));
    }

    #[test]
    fn fen_start_with_black_to_move() {
        let game = ParsedGame {
            fen: Some("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1".to_string()),
            ..ParsedGame::from_tokens(&["Kd7", "e4", "Kd6"])
        };

        // black moves on plies 0 and 2
        assert_eq!(replay(&ShakmatyOracle, &game, Side::Black).unwrap().len(), 2);
        assert_eq!(replay(&ShakmatyOracle, &game, Side::White).unwrap().len(), 1);
    }
}
