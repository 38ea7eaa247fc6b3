//! # Move validation
//! Decides whether a single piece may move to a square, without ever touching
//! the position.
//!
//! A move is judged in order:
//! 1. Trivial rejections: staying in place, landing on an ally or on a king.
//! 2. King safety: a pinned piece may only move along its pin line, and the
//!    position after the move must not leave the mover's king attacked.
//! 3. Pawn rules: forward pushes, diagonal captures and en passant.
//! 4. Castling.
//! 5. The piece's move shape, with an unobstructed path for sliders.

use log::trace;

use super::{
    check::CheckEvaluator,
    geometry::{self, Path},
    piece::{Piece, PieceId, PieceKind},
    square::Square,
    view::{BoardView, Hypothetical},
};

/// Outcome of validating a move.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct Validation {
    pub move_valid: bool,
    /// The move is a king castling towards one of its rooks.
    pub castling: bool,
    /// The captured pawn does not stand on the destination.
    pub en_passant: bool,
    /// Piece removed by the move, if any.
    pub capture: Option<PieceId>,
}
impl Validation {
    /// A rejected move.
    pub const ILLEGAL: Self = Self {
        move_valid: false,
        castling: false,
        en_passant: false,
        capture: None,
    };

    fn legal(capture: Option<PieceId>) -> Self {
        Self {
            move_valid: true,
            capture,
            ..Self::ILLEGAL
        }
    }
}

/// A piece that cannot leave the line between its king and an enemy slider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub pinner: PieceId,
    /// Squares the pinned piece may still move to: the squares between the
    /// king and the pinner, and the pinner's own square.
    pub line: Path,
}
impl Pin {
    pub fn allows(&self, to: Square) -> bool {
        self.line.contains(&to)
    }
}

/// Judges moves against a borrowed position.
pub struct MoveValidator<'a, V: BoardView> {
    view: &'a V,
}
impl<'a, V: BoardView> MoveValidator<'a, V> {
    pub fn new(view: &'a V) -> Self {
        Self { view }
    }

    /// Checks if the piece `id` may move to `to`.
    ///
    /// Unknown pieces are never allowed to move.
    pub fn valid_move(&self, id: PieceId, to: Square) -> Validation {
        let Some(piece) = self.view.piece(id) else {
            trace!("{id} is not on the board");
            return Validation::ILLEGAL;
        };
        if piece.position == to {
            return Validation::ILLEGAL;
        }
        let target = self.view.piece_at(to);
        if let Some(target) = target {
            if !target.is_opponent_of(piece) || target.is(PieceKind::King) {
                trace!("{piece} cannot land on {target}");
                return Validation::ILLEGAL;
            }
        }

        let en_passant = if piece.is(PieceKind::Pawn) {
            self.en_passant_victim(piece, to)
        } else {
            None
        };
        let capture = target.map(Piece::id).or(en_passant);

        if self.endangers_king(piece, to, capture) {
            trace!("{piece} to {to} would leave its king in check");
            return Validation::ILLEGAL;
        }

        if piece.is(PieceKind::Pawn) {
            return self.validate_pawn(piece, to, target, en_passant);
        }

        if self.can_castle(piece, to) {
            return Validation {
                castling: true,
                ..Validation::legal(None)
            };
        }

        if piece.destinations().contains(&to) && self.path_clear(piece, to) {
            Validation::legal(capture)
        } else {
            trace!("{piece} cannot reach {to}");
            Validation::ILLEGAL
        }
    }

    /// The line `piece` is pinned along, if any.
    ///
    /// A piece is pinned when it is the only piece between its king and an
    /// enemy slider lined up with that king. Kings are never pinned.
    pub fn pin(&self, piece: &Piece) -> Option<Pin> {
        if piece.is(PieceKind::King) {
            return None;
        }
        let king = self.view.king(piece.colour).position;
        self.view
            .pieces(piece.colour.inverse())
            .filter(|enemy| geometry::slides_towards(enemy.kind, enemy.position, king))
            .find_map(|enemy| {
                let mut line = geometry::path_between(enemy.position, king);
                let mut blockers = line.iter().filter_map(|&square| self.view.piece_at(square));
                match (blockers.next(), blockers.next()) {
                    (Some(blocker), None) if blocker.id == piece.id => {
                        // Capturing the pinner also keeps the king covered.
                        line.push(enemy.position).ok()?;
                        Some(Pin {
                            pinner: enemy.id,
                            line,
                        })
                    }
                    _ => None,
                }
            })
    }

    /// Checks if every square strictly between the piece and `to` is empty.
    /// Knights and kings jump or step, so nothing can block them.
    pub fn path_clear(&self, piece: &Piece, to: Square) -> bool {
        if matches!(piece.kind, PieceKind::Knight | PieceKind::King) {
            return true;
        }
        geometry::try_path_between(piece.position, to)
            .map(|path| path.iter().all(|&square| self.view.is_empty(square)))
            .unwrap_or(false)
    }

    fn endangers_king(&self, piece: &Piece, to: Square, capture: Option<PieceId>) -> bool {
        if let Some(pin) = self.pin(piece) {
            if piece.is(PieceKind::Knight) || !pin.allows(to) {
                return true;
            }
        }
        let after = Hypothetical::new(self.view, piece, to, capture);
        CheckEvaluator::new(&after).in_check(piece.colour, None)
    }

    fn validate_pawn(
        &self,
        pawn: &Piece,
        to: Square,
        target: Option<&Piece>,
        en_passant: Option<PieceId>,
    ) -> Validation {
        if target.is_none() && pawn.destinations().contains(&to) && self.path_clear(pawn, to) {
            Validation::legal(None)
        } else if target.is_some() && geometry::is_pawn_diagonal(pawn.colour, pawn.position, to) {
            Validation::legal(target.map(Piece::id))
        } else if en_passant.is_some() {
            trace!("{pawn} captures en passant on {to}");
            Validation {
                en_passant: true,
                ..Validation::legal(en_passant)
            }
        } else {
            trace!("{pawn} cannot reach {to}");
            Validation::ILLEGAL
        }
    }

    /// The pawn captured if `pawn` moves diagonally to `to` en passant.
    ///
    /// Only the pawn that has just made a two-square push can be taken, and
    /// the capturing pawn lands on the square it skipped.
    pub fn en_passant_victim(&self, pawn: &Piece, to: Square) -> Option<PieceId> {
        let last = self.view.last_move()?;
        let victim = self.view.piece(last.piece)?;
        let skipped = victim.position.offset(0, pawn.colour.pawn_direction())?;
        let eligible = victim.is(PieceKind::Pawn)
            && victim.is_opponent_of(pawn)
            && last.is_double_step()
            && victim.position == last.to
            && victim.position.rank() == pawn.position.rank()
            && victim.position.file().abs_diff(pawn.position.file()) == 1
            && skipped == to
            && self.view.is_empty(to);
        eligible.then_some(victim.id)
    }

    /// The rook a king castles with when moving to `to`, if the move has the
    /// shape of a castling move.
    fn castling_rook(&self, king: &Piece, to: Square) -> Option<&'a Piece> {
        let from = king.position;
        if !king.is(PieceKind::King) || from.rank() != to.rank() || from.distance(to).0 != 2 {
            return None;
        }
        let corner = if to.file() > from.file() { 7 } else { 0 };
        let rook = self.view.piece_at(Square::new(corner, from.rank())?)?;
        (rook.is(PieceKind::Rook) && !rook.is_opponent_of(king)).then_some(rook)
    }

    /// Checks if `king` may castle by moving to `to`.
    ///
    /// Neither the king nor the rook may have moved, everything between them
    /// must be empty, and no square from the king up to the rook may be
    /// attacked.
    pub fn can_castle(&self, king: &Piece, to: Square) -> bool {
        let Some(rook) = self.castling_rook(king, to) else {
            return false;
        };
        if self.view.has_moved(king.id) || self.view.has_moved(rook.id) {
            trace!("{king} or {rook} has already moved");
            return false;
        }
        let between = geometry::path_between(king.position, rook.position);
        if !between.iter().all(|&square| self.view.is_empty(square)) {
            trace!("pieces stand between {king} and {rook}");
            return false;
        }
        let checks = CheckEvaluator::new(self.view);
        let attacked = std::iter::once(king.position)
            .chain(between.iter().copied())
            .chain(std::iter::once(to))
            .any(|square| checks.in_check(king.colour, Some(square)));
        if attacked {
            trace!("{king} would castle through check");
        }
        !attacked
    }
}
