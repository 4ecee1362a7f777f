use crate::position::{PieceKind, Position};

/// The square one of the user's pieces left between two user turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovedFrom {
    /// Square index in [0, 64), row-major
    pub square: u8,
    pub piece: PieceKind,
}

/// Finds the square a user piece vacated between `before` and `after`.
///
/// A square is a candidate when its value changed and it held a user piece
/// in `before`. Squares are scanned in row-major order and the last candidate
/// wins. Two plies separate the snapshots, so an opponent capture on another
/// user square also yields a candidate; this rule does not tell them apart.
pub fn label_move(before: &Position, after: &Position) -> Option<MovedFrom> {
    let mut found = None;

    for ((square, prev), (_, next)) in before.squares().zip(after.squares()) {
        if prev > 0 && prev != next {
            if let Some(piece) = PieceKind::from_code(prev) {
                found = Some(MovedFrom {
                    square: square as u8,
                    piece,
                });
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::tests::start_board;
    use crate::position::Side;

    fn kings() -> [[i8; 8]; 8] {
        let mut grid = [[0i8; 8]; 8];
        grid[7][4] = 6;
        grid[0][4] = -6;
        grid
    }

    #[test]
    fn identical_positions_have_no_label() {
        let pos = Position::canonical(&start_board(), Side::White);
        assert_eq!(label_move(&pos, &pos), None);
    }

    #[test]
    fn pawn_push() {
        let before = Position::canonical(&start_board(), Side::White);
        let mut board = start_board();
        board.0[6][4] = 0;
        board.0[4][4] = 1;
        let after = Position::canonical(&board, Side::White);

        assert_eq!(
            label_move(&before, &after),
            Some(MovedFrom {
                square: 52,
                piece: PieceKind::Pawn
            })
        );
    }

    #[test]
    fn opponent_changes_are_ignored() {
        let mut grid = kings();
        grid[1][3] = -1;
        let before = Position::from_rows(grid).unwrap();
        grid[1][3] = 0;
        grid[3][3] = -1;
        let after = Position::from_rows(grid).unwrap();

        assert_eq!(label_move(&before, &after), None);
    }

    #[test]
    fn last_candidate_wins() {
        let mut grid = kings();
        grid[2][1] = 2; // knight, captured by the opponent
        grid[6][6] = 1; // pawn, moved by the user
        let before = Position::from_rows(grid).unwrap();

        grid[2][1] = -3;
        grid[6][6] = 0;
        grid[5][6] = 1;
        let after = Position::from_rows(grid).unwrap();

        assert_eq!(
            label_move(&before, &after),
            Some(MovedFrom {
                square: 54,
                piece: PieceKind::Pawn
            })
        );

        // the same capture scanned after the move wins instead
        let mut grid = kings();
        grid[1][1] = 1;
        grid[6][6] = 2;
        let before = Position::from_rows(grid).unwrap();
        grid[2][1] = 1;
        grid[1][1] = 0;
        grid[6][6] = -5;
        let after = Position::from_rows(grid).unwrap();

        assert_eq!(
            label_move(&before, &after),
            Some(MovedFrom {
                square: 54,
                piece: PieceKind::Knight
            })
        );
    }

    #[test]
    fn captured_user_piece_alone_is_a_candidate() {
        let mut grid = kings();
        grid[4][4] = 4;
        let before = Position::from_rows(grid).unwrap();
        grid[4][4] = -5;
        let after = Position::from_rows(grid).unwrap();

        assert_eq!(
            label_move(&before, &after),
            Some(MovedFrom {
                square: 36,
                piece: PieceKind::Rook
            })
        );
    }
}
