//! # Committing moves
//! The only place where play changes the board: validated moves, captures,
//! castling and promotions.

use log::{debug, info};
use thiserror::Error;

use super::{
    board::Board,
    piece::{PieceId, PieceKind},
    square::Square,
    validator::MoveValidator,
};

/// What happened when a move was requested.
///
/// A rejected move leaves the board untouched and reports `move_valid: false`.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct MoveResult {
    pub move_valid: bool,
    pub castling: bool,
    /// The moved pawn reached its last rank and must be promoted with
    /// [`MoveCommitter::promote_pawn`].
    pub promote_pawn: bool,
    /// Piece taken off the board by this move. [`MoveResult::capture`]
    /// reduces it to a flag.
    pub captured: Option<PieceId>,
    pub en_passant: bool,
}
impl MoveResult {
    /// Whether the move took a piece.
    pub fn capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Errors that may arise when promoting a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PromotionError {
    #[error("No piece {0} on the board")]
    UnknownPiece(PieceId),
    #[error("{0} is a {1}, only pawns can be promoted")]
    NotAPawn(PieceId, PieceKind),
    #[error("Cannot promote to {0}")]
    InvalidTarget(PieceKind),
}

/// Applies moves to a mutably borrowed board.
pub struct MoveCommitter<'a> {
    board: &'a mut Board,
}
impl<'a> MoveCommitter<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    /// Moves the piece `id` to `to` if the move is legal.
    ///
    /// Captured pieces leave the board. Castling moves the rook too, recording
    /// the king's displacement first. The history only grows on success.
    pub fn move_piece(&mut self, id: PieceId, to: Square) -> MoveResult {
        let validation = MoveValidator::new(&*self.board).valid_move(id, to);
        let Some(piece) = self.board.piece(id).copied() else {
            return MoveResult::default();
        };
        if !validation.move_valid {
            debug!("Rejected move of {piece} to {to}");
            return MoveResult::default();
        }

        if validation.castling {
            self.castle(piece.id(), piece.position(), to);
            return MoveResult {
                move_valid: true,
                castling: true,
                ..MoveResult::default()
            };
        }

        let captured = validation
            .capture
            .and_then(|victim| self.board.capture(victim));
        if let Some(victim) = captured {
            debug!("{piece} takes {victim}");
        }
        self.board.displace(piece.id(), piece.position(), to);

        MoveResult {
            move_valid: true,
            castling: false,
            promote_pawn: piece.is(PieceKind::Pawn) && to.rank() == piece.colour().promotion_rank(),
            captured: captured.map(|victim| victim.id()),
            en_passant: validation.en_passant,
        }
    }

    fn castle(&mut self, king: PieceId, from: Square, to: Square) {
        let towards_h = to.file() > from.file();
        let rook = Square::new(if towards_h { 7 } else { 0 }, from.rank())
            .and_then(|corner| self.board.piece_at(corner))
            .map(|rook| (rook.id(), rook.position()));
        let crossed = from.offset(if towards_h { 1 } else { -1 }, 0);

        self.board.displace(king, from, to);
        if let (Some((rook, corner)), Some(crossed)) = (rook, crossed) {
            self.board.displace(rook, corner, crossed);
        }
        debug!("{king} castles to {to}");
    }

    /// Replaces the pawn `id` with a new piece of kind `kind` on the same
    /// square, returning the new piece's identity.
    ///
    /// The history keeps referring to the pawn's identity.
    pub fn promote_pawn(&mut self, id: PieceId, kind: PieceKind) -> Result<PieceId, PromotionError> {
        if !kind.is_valid_promotion_target() {
            return Err(PromotionError::InvalidTarget(kind));
        }
        let pawn = *self.board.piece(id).ok_or(PromotionError::UnknownPiece(id))?;
        if !pawn.is(PieceKind::Pawn) {
            return Err(PromotionError::NotAPawn(id, pawn.kind()));
        }
        let promoted = self
            .board
            .replace(id, kind)
            .ok_or(PromotionError::UnknownPiece(id))?;
        info!("{} pawn on {} promoted to {kind}", pawn.colour(), pawn.position());
        Ok(promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{colour::Colour, history::MoveRecord};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn id_at(board: &Board, square: Square) -> PieceId {
        board.piece_at(square).unwrap().id()
    }

    #[test]
    fn legal_move_updates_board_and_history() {
        let mut board = Board::initial();
        let pawn = id_at(&board, sq(3, 1));
        let result = board.move_piece(pawn, sq(3, 2));
        assert_eq!(
            result,
            MoveResult {
                move_valid: true,
                ..MoveResult::default()
            }
        );
        assert!(!result.capture());
        assert!(board.piece_at(sq(3, 1)).is_none());
        assert_eq!(board.piece_at(sq(3, 2)).map(|p| p.id()), Some(pawn));
        assert_eq!(
            board.history(),
            &[MoveRecord { piece: pawn, from: sq(3, 1), to: sq(3, 2) }]
        );
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut board = Board::initial();
        let before = board.clone();
        let rook = id_at(&board, sq(0, 7));
        assert_eq!(board.move_piece(rook, sq(0, 4)), MoveResult::default());
        assert_eq!(board.move_piece(PieceId(1000), sq(0, 4)), MoveResult::default());
        assert_eq!(board, before);
    }

    #[test]
    fn captures_remove_the_victim() {
        let mut board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Rook, Colour::White, sq(0, 7)),
            (PieceKind::Bishop, Colour::Black, sq(0, 2)),
        ])
        .unwrap();
        let rook = id_at(&board, sq(0, 7));
        let bishop = id_at(&board, sq(0, 2));
        let result = board.move_piece(rook, sq(0, 2));
        assert!(result.move_valid);
        assert_eq!(result.captured, Some(bishop));
        assert!(board.piece(bishop).is_none());
        assert_eq!(board.opponent_pieces(Colour::White).len(), 1);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Pawn, Colour::Black, sq(2, 4)),
            (PieceKind::Pawn, Colour::White, sq(3, 6)),
        ])
        .unwrap();
        let black = id_at(&board, sq(2, 4));
        let white = id_at(&board, sq(3, 6));
        assert!(board.move_piece(white, sq(3, 4)).move_valid);

        let result = board.move_piece(black, sq(3, 5));
        assert!(result.move_valid && result.en_passant);
        assert_eq!(result.captured, Some(white));
        assert!(board.piece_at(sq(3, 4)).is_none());
        assert_eq!(board.piece_at(sq(3, 5)).map(|p| p.id()), Some(black));
    }

    #[test]
    fn castling_moves_both_pieces() {
        let mut board = Board::setup([
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Rook, Colour::Black, sq(0, 0)),
            (PieceKind::Rook, Colour::Black, sq(7, 0)),
            (PieceKind::King, Colour::White, sq(4, 7)),
        ])
        .unwrap();
        let king = board.king(Colour::Black).id();
        let rook = id_at(&board, sq(0, 0));
        let result = board.move_piece(king, sq(2, 0));
        assert!(result.move_valid && result.castling);
        assert_eq!(board.piece_at(sq(2, 0)).map(|p| p.id()), Some(king));
        assert_eq!(board.piece_at(sq(3, 0)).map(|p| p.id()), Some(rook));
        assert!(board.piece_at(sq(0, 0)).is_none());
        assert_eq!(
            board.history(),
            &[
                MoveRecord { piece: king, from: sq(4, 0), to: sq(2, 0) },
                MoveRecord { piece: rook, from: sq(0, 0), to: sq(3, 0) },
            ]
        );
    }

    #[test]
    fn pawn_reaching_last_rank_asks_for_promotion() {
        let mut board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Pawn, Colour::White, sq(0, 1)),
            (PieceKind::Pawn, Colour::Black, sq(7, 5)),
        ])
        .unwrap();
        let white = id_at(&board, sq(0, 1));
        let black = id_at(&board, sq(7, 5));
        assert!(board.move_piece(white, sq(0, 0)).promote_pawn);
        assert!(!board.move_piece(black, sq(7, 6)).promote_pawn);
        assert!(board.move_piece(black, sq(7, 7)).promote_pawn);

        let queen = board.promote_pawn(white, PieceKind::Queen).unwrap();
        assert_ne!(queen, white);
        let promoted = board.piece_at(sq(0, 0)).unwrap();
        assert_eq!(promoted.id(), queen);
        assert!(promoted.is(PieceKind::Queen));
        assert_eq!(promoted.colour(), Colour::White);
        assert!(board.piece(white).is_none());
        assert_eq!(board.history()[0].piece, white);
    }

    #[test]
    fn promotion_errors() {
        let mut board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Pawn, Colour::White, sq(0, 1)),
            (PieceKind::Rook, Colour::White, sq(7, 7)),
        ])
        .unwrap();
        let pawn = id_at(&board, sq(0, 1));
        let rook = id_at(&board, sq(7, 7));
        assert_eq!(
            board.promote_pawn(pawn, PieceKind::King),
            Err(PromotionError::InvalidTarget(PieceKind::King))
        );
        assert_eq!(
            board.promote_pawn(pawn, PieceKind::Pawn),
            Err(PromotionError::InvalidTarget(PieceKind::Pawn))
        );
        assert_eq!(
            board.promote_pawn(rook, PieceKind::Queen),
            Err(PromotionError::NotAPawn(rook, PieceKind::Rook))
        );
        assert_eq!(
            board.promote_pawn(PieceId(77), PieceKind::Queen),
            Err(PromotionError::UnknownPiece(PieceId(77)))
        );
        assert!(board.piece_at(sq(0, 1)).unwrap().is(PieceKind::Pawn));
    }
}
