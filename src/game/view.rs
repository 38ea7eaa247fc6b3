//! Read access to a position, shared by the real [`Board`](super::board::Board)
//! and speculative positions.
//!
//! Checking whether a move would leave its own king in check requires looking at
//! the position *after* the move. Instead of playing the move and taking it back,
//! [`Hypothetical`] layers the move over a borrowed view: the board itself is
//! never touched while a candidate move is being judged.

use super::{
    colour::Colour,
    history::MoveRecord,
    piece::{Piece, PieceId},
    square::Square,
};

/// Everything the rules need to know about a position.
pub trait BoardView {
    /// The piece with the given identity, if it is still on the board.
    fn piece(&self, id: PieceId) -> Option<&Piece>;

    /// The piece standing on a square, if any.
    fn piece_at(&self, square: Square) -> Option<&Piece>;

    /// All pieces of a colour, king included.
    fn pieces(&self, colour: Colour) -> impl Iterator<Item = &Piece>;

    /// The king of a colour.
    fn king(&self, colour: Colour) -> &Piece;

    /// The most recent history record.
    fn last_move(&self) -> Option<&MoveRecord>;

    /// Checks if a piece appears as a mover anywhere in the history.
    fn has_moved(&self, id: PieceId) -> bool;

    /// Checks if a square is empty.
    fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }
}

/// A position where one piece has been moved, and possibly one piece captured,
/// on top of an untouched base view.
///
/// History queries are answered by the base: the hypothetical move is never
/// recorded.
pub struct Hypothetical<'a, V: BoardView> {
    base: &'a V,
    moved: Piece,
    vacated: Square,
    captured: Option<PieceId>,
}
impl<'a, V: BoardView> Hypothetical<'a, V> {
    /// Layers `piece` moving to `to` over `base`, removing `captured` if any.
    pub fn new(base: &'a V, piece: &Piece, to: Square, captured: Option<PieceId>) -> Self {
        let mut moved = *piece;
        moved.position = to;
        Self {
            base,
            moved,
            vacated: piece.position,
            captured,
        }
    }

    fn substitute<'s>(&'s self, piece: &'s Piece) -> Option<&'s Piece> {
        if Some(piece.id) == self.captured {
            None
        } else if piece.id == self.moved.id {
            Some(&self.moved)
        } else {
            Some(piece)
        }
    }
}
impl<V: BoardView> BoardView for Hypothetical<'_, V> {
    fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.base.piece(id).and_then(|piece| self.substitute(piece))
    }

    fn piece_at(&self, square: Square) -> Option<&Piece> {
        if square == self.moved.position {
            Some(&self.moved)
        } else if square == self.vacated {
            None
        } else {
            self.base
                .piece_at(square)
                .and_then(|piece| self.substitute(piece))
        }
    }

    fn pieces(&self, colour: Colour) -> impl Iterator<Item = &Piece> {
        self.base
            .pieces(colour)
            .filter_map(move |piece| self.substitute(piece))
    }

    fn king(&self, colour: Colour) -> &Piece {
        let king = self.base.king(colour);
        if king.id == self.moved.id {
            &self.moved
        } else {
            king
        }
    }

    fn last_move(&self) -> Option<&MoveRecord> {
        self.base.last_move()
    }

    fn has_moved(&self, id: PieceId) -> bool {
        self.base.has_moved(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{board::Board, piece::PieceKind};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    #[test]
    fn hypothetical_move_leaves_base_untouched() {
        let board = Board::initial();
        let before = board.clone();
        let pawn = *board.piece_at(sq(4, 6)).unwrap();

        let view = Hypothetical::new(&board, &pawn, sq(4, 4), None);
        assert!(view.is_empty(sq(4, 6)));
        assert_eq!(view.piece_at(sq(4, 4)).map(|p| p.id()), Some(pawn.id()));
        assert_eq!(view.piece(pawn.id()).map(|p| p.position()), Some(sq(4, 4)));
        assert_eq!(view.pieces(Colour::White).count(), 16);

        assert_eq!(board, before);
    }

    #[test]
    fn hypothetical_capture_hides_the_victim() {
        let board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Rook, Colour::White, sq(0, 7)),
            (PieceKind::Knight, Colour::Black, sq(0, 2)),
        ])
        .unwrap();
        let rook = *board.piece_at(sq(0, 7)).unwrap();
        let knight = *board.piece_at(sq(0, 2)).unwrap();

        let view = Hypothetical::new(&board, &rook, sq(0, 2), Some(knight.id()));
        assert_eq!(view.piece(knight.id()), None);
        assert_eq!(view.pieces(Colour::Black).count(), 1);
        assert!(view.piece_at(sq(0, 2)).unwrap().is(PieceKind::Rook));
    }

    #[test]
    fn hypothetical_king_move_updates_king_lookup() {
        let board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
        ])
        .unwrap();
        let king = *board.king(Colour::White);

        let view = Hypothetical::new(&board, &king, sq(5, 6), None);
        assert_eq!(view.king(Colour::White).position(), sq(5, 6));
        assert_eq!(view.king(Colour::Black).position(), sq(4, 0));
    }
}
