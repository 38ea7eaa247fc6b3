//! Text rendering of a board, as printed between turns.

use super::{
    board::Board,
    colour::Colour,
    square::{Square, BOARD_SIZE},
};

/// Renders the board with White at the bottom, using Unicode glyphs.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let files = "   a b c d e f g h";
        writeln!(f, "{files}")?;
        for rank in 0..BOARD_SIZE {
            let label = BOARD_SIZE - rank;
            write!(f, "{label} ")?;
            for file in 0..BOARD_SIZE {
                let Some(square) = Square::new(file, rank) else {
                    continue;
                };
                let glyph = match self.piece_at(square) {
                    Some(piece) => piece.unicode_symbol(),
                    None if (file + rank) % 2 == 0 => '·',
                    None => ' ',
                };
                write!(f, " {glyph}")?;
            }
            writeln!(f, "  {label}")?;
        }
        write!(f, "{files}")
    }
}

impl Board {
    /// A one-line summary of `colour`'s situation, or `None` when nothing is
    /// threatening its king.
    pub fn status(&self, colour: Colour) -> Option<String> {
        if self.checkmate(colour) {
            Some(format!("Checkmate! {} wins.", colour.inverse()))
        } else if self.in_check(colour) {
            Some(format!("{colour} is in check."))
        } else {
            None
        }
    }
}
