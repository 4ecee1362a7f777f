use crate::position::{PieceKind, Position};

/// Number of channels: 6 piece kinds for the user, then 6 for the opponent
pub const CHANNELS: usize = 12;

/// Number of entries of a flattened tensor
pub const TENSOR_SIZE: usize = CHANNELS * 8 * 8;

/// Size in bytes of a tensor packed as bit planes (one byte per channel row)
pub const BITPLANES_SIZE: usize = CHANNELS * 8;

/// Binary 12x8x8 encoding of a position, indexed `[channel][row][col]`.
///
/// Channel `k` holds the user's pieces of kind index `k` (pawn, knight, bishop,
/// rook, queen, king), channel `k + 6` the opponent's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor([[[u8; 8]; 8]; CHANNELS]);

impl Tensor {
    pub fn encode(position: &Position) -> Tensor {
        let mut planes = [[[0u8; 8]; 8]; CHANNELS];

        for (row, cells) in position.rows().iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if let Some(channel) = channel_of(value) {
                    planes[channel][row][col] = 1;
                }
            }
        }

        Tensor(planes)
    }

    pub fn get(&self, channel: usize, row: usize, col: usize) -> u8 {
        self.0[channel][row][col]
    }

    /// All entries in (channel, row, col) order
    pub fn as_flat(&self) -> Vec<u8> {
        self.0.iter().flatten().flatten().copied().collect()
    }

    /// Packs every channel row into a byte, bit `col` set when the entry is 1.
    /// Byte `channel * 8 + row` holds row `row` of channel `channel`.
    pub fn to_bitplanes(&self) -> [u8; BITPLANES_SIZE] {
        let mut data = [0u8; BITPLANES_SIZE];

        for (channel, plane) in self.0.iter().enumerate() {
            for (row, cells) in plane.iter().enumerate() {
                for (col, &bit) in cells.iter().enumerate() {
                    data[channel * 8 + row] |= bit << col;
                }
            }
        }

        data
    }
}

/// Channel of a signed grid value, `None` for empty squares
fn channel_of(value: i8) -> Option<usize> {
    let kind = PieceKind::from_code(value)?;
    if value > 0 {
        Some(kind.index())
    } else {
        Some(kind.index() + 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::tests::start_board;
    use crate::position::Side;

    fn assert_one_channel_per_piece(position: &Position, tensor: &Tensor) {
        for row in 0..8 {
            for col in 0..8 {
                let set: u8 = (0..CHANNELS).map(|c| tensor.get(c, row, col)).sum();
                let expected = if position.get(row, col) != 0 { 1 } else { 0 };
                assert_eq!(set, expected, "cell ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn start_position_channels() {
        let pos = Position::canonical(&start_board(), Side::White);
        let tensor = Tensor::encode(&pos);

        assert_one_channel_per_piece(&pos, &tensor);

        // user pawns on row 6, opponent pawns on row 1
        for col in 0..8 {
            assert_eq!(tensor.get(0, 6, col), 1);
            assert_eq!(tensor.get(6, 1, col), 1);
        }
        // kings
        assert_eq!(tensor.get(5, 7, 4), 1);
        assert_eq!(tensor.get(11, 0, 4), 1);
        // rooks on the corners
        assert_eq!(tensor.get(3, 7, 0), 1);
        assert_eq!(tensor.get(9, 0, 7), 1);

        assert_eq!(tensor.as_flat().iter().filter(|&&x| x == 1).count(), 32);
    }

    #[test]
    fn black_user_owns_low_channels() {
        let pos = Position::canonical(&start_board(), Side::Black);
        let tensor = Tensor::encode(&pos);

        assert_one_channel_per_piece(&pos, &tensor);
        assert_eq!(tensor.get(5, 7, 3), 1);
        assert_eq!(tensor.get(11, 0, 3), 1);
        assert_eq!(tensor.get(4, 7, 4), 1);
    }

    #[test]
    fn empty_cells_are_zero() {
        let mut board = start_board();
        board.0[6] = [0; 8];
        let pos = Position::canonical(&board, Side::White);
        let tensor = Tensor::encode(&pos);

        assert_one_channel_per_piece(&pos, &tensor);
        for col in 0..8 {
            assert_eq!(tensor.get(0, 6, col), 0);
        }
    }

    #[test]
    fn flat_layout_is_channel_major() {
        let pos = Position::canonical(&start_board(), Side::White);
        let flat = Tensor::encode(&pos).as_flat();

        assert_eq!(flat.len(), TENSOR_SIZE);
        // user king: channel 5, row 7, col 4
        assert_eq!(flat[5 * 64 + 7 * 8 + 4], 1);
        // opponent queen: channel 10, row 0, col 3
        assert_eq!(flat[10 * 64 + 3], 1);
    }

    #[test]
    fn bitplanes() {
        let pos = Position::canonical(&start_board(), Side::White);
        let data = Tensor::encode(&pos).to_bitplanes();

        assert_eq!(data[0 * 8 + 6], 0xff); // user pawns
        assert_eq!(data[3 * 8 + 7], 0b1000_0001); // user rooks
        assert_eq!(data[5 * 8 + 7], 1 << 4); // user king on e
        assert_eq!(data[11 * 8], 1 << 4); // opponent king
        assert_eq!(data.iter().map(|b| b.count_ones()).sum::<u32>(), 32);
    }
}
