#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};

use super::{piece::PieceId, square::Square};

/// One displacement of a piece, appended to the board's history in play order.
///
/// Castling appends two records, the king's then the rook's.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
pub struct MoveRecord {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
}
impl MoveRecord {
    /// Checks if this record is a two-square push along a file.
    pub fn is_double_step(&self) -> bool {
        self.from.file() == self.to.file() && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_steps() {
        let record = |from: (u8, u8), to: (u8, u8)| MoveRecord {
            piece: PieceId(0),
            from: Square::new(from.0, from.1).unwrap(),
            to: Square::new(to.0, to.1).unwrap(),
        };
        assert!(record((3, 1), (3, 3)).is_double_step());
        assert!(record((4, 6), (4, 4)).is_double_step());
        assert!(!record((4, 6), (4, 5)).is_double_step());
        assert!(!record((0, 7), (2, 5)).is_double_step());
    }
}
