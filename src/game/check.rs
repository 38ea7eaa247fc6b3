//! # Check and checkmate
//! Attack detection on any [`BoardView`], including speculative positions.

use log::debug;

use super::{
    colour::Colour,
    geometry,
    piece::{Piece, PieceKind},
    square::Square,
    validator::MoveValidator,
    view::BoardView,
};

/// Answers check and checkmate questions about a borrowed position.
pub struct CheckEvaluator<'a, V: BoardView> {
    view: &'a V,
}
impl<'a, V: BoardView> CheckEvaluator<'a, V> {
    pub fn new(view: &'a V) -> Self {
        Self { view }
    }

    /// Checks if `attacker` threatens `target`.
    ///
    /// Pawns threaten the squares diagonally in front of them, not their push
    /// squares. Sliders need a clear line, where the king under attack does not
    /// count as an obstacle: a king cannot escape a slider by stepping away
    /// along its line.
    pub fn threatens(&self, attacker: &Piece, target: Square) -> bool {
        match attacker.kind {
            PieceKind::Pawn => geometry::is_pawn_diagonal(attacker.colour, attacker.position, target),
            PieceKind::Knight | PieceKind::King => attacker.destinations().contains(&target),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                if !geometry::slides_towards(attacker.kind, attacker.position, target) {
                    return false;
                }
                let defender = self.view.king(attacker.colour.inverse()).id;
                geometry::path_between(attacker.position, target)
                    .iter()
                    .filter_map(|&square| self.view.piece_at(square))
                    .all(|blocker| blocker.id == defender)
            }
        }
    }

    /// Checks if `colour`'s king is attacked where it stands, or would be
    /// attacked on `at`.
    pub fn in_check(&self, colour: Colour, at: Option<Square>) -> bool {
        let target = at.unwrap_or(self.view.king(colour).position);
        self.view
            .pieces(colour.inverse())
            .any(|attacker| self.threatens(attacker, target))
    }

    /// Opposing pieces attacking `colour`'s king.
    pub fn threats(&self, colour: Colour) -> Vec<&'a Piece> {
        let king = self.view.king(colour).position;
        self.view
            .pieces(colour.inverse())
            .filter(|attacker| self.threatens(attacker, king))
            .collect()
    }

    /// Checks if `colour` is checkmated: its king is attacked and no legal
    /// move removes the attack.
    pub fn checkmate(&self, colour: Colour) -> bool {
        if !self.in_check(colour, None) {
            return false;
        }
        let validator = MoveValidator::new(self.view);
        let king = self.view.king(colour);
        if let Some(escape) = king
            .destinations()
            .into_iter()
            .find(|&to| validator.valid_move(king.id, to).move_valid)
        {
            debug!("{king} can escape to {escape}");
            return false;
        }

        match self.threats(colour).as_slice() {
            [threat] => !self.can_intercept(&validator, colour, threat),
            _ => true,
        }
    }

    /// Checks if a piece other than the king can capture `threat` or step
    /// into its line.
    fn can_intercept(&self, validator: &MoveValidator<'a, V>, colour: Colour, threat: &Piece) -> bool {
        let king = self.view.king(colour).position;
        // En passant lands behind the checking pawn.
        let behind = if threat.is(PieceKind::Pawn) {
            threat.position.offset(0, colour.pawn_direction())
        } else {
            None
        };
        let targets: Vec<Square> = Square::squares_iter()
            .filter(|&square| {
                square == threat.position
                    || Some(square) == behind
                    || (threat.kind.is_slider() && geometry::is_between(threat.position, king, square))
            })
            .collect();

        let interception = self
            .view
            .pieces(colour)
            .filter(|ally| !ally.is(PieceKind::King))
            .find_map(|ally| {
                targets
                    .iter()
                    .find(|&&to| validator.valid_move(ally.id, to).move_valid)
                    .map(|&to| (ally, to))
            });
        if let Some((ally, to)) = interception {
            debug!("{ally} answers the check from {threat} on {to}");
        }
        interception.is_some()
    }
}
