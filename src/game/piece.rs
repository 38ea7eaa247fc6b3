//! Piece identities and kinds.

#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    colour::Colour,
    geometry::{self, Destinations},
    square::Square,
};

/// Total number of different piece kinds (6).
pub const NUM_PIECES: usize = 6;

const PIECE_SYMBOLS_UNICODE: [char; 12] =
    ['♙', '♘', '♗', '♖', '♕', '♔', '♟', '♞', '♝', '♜', '♛', '♚'];

/// The kind of a piece, one of Pawn, Knight, Bishop, Rook, Queen or King.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}
impl PieceKind {
    /// All piece kinds.
    pub const PIECE_KINDS: [Self; NUM_PIECES] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Pieces that a pawn can promote to.
    pub const PROMOTION_TARGETS: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Bishop,
    ];

    /// Pieces on a side's back rank, from the a-file to the h-file.
    pub const BACK_RANK: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];

    /// Checks if this piece kind is a diagonal slider (bishops and queens).
    #[inline(always)]
    pub fn is_diagonal_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }

    /// Checks if this piece kind is an orthogonal slider (rooks and queens).
    #[inline(always)]
    pub fn is_orthogonal_slider(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    /// Checks if this piece kind moves along rays that other pieces can block.
    #[inline(always)]
    pub fn is_slider(self) -> bool {
        self.is_diagonal_slider() || self.is_orthogonal_slider()
    }

    /// Checks if this piece kind can be promoted to.
    ///
    /// Returns true for all pieces but pawns and kings.
    pub fn is_valid_promotion_target(&self) -> bool {
        !matches!(self, PieceKind::Pawn | PieceKind::King)
    }

    /// Full English name of the piece kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pawn => "Pawn",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Rook => "Rook",
            Self::Queen => "Queen",
            Self::King => "King",
        }
    }
}
impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("Unknown piece kind: {0}")]
pub struct PieceKindParseError(pub String);

impl std::str::FromStr for PieceKind {
    type Err = PieceKindParseError;

    /// Parses a kind from its name ("Queen") or its symbol ("q").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "pawn" | "p" => Self::Pawn,
            "knight" | "n" => Self::Knight,
            "bishop" | "b" => Self::Bishop,
            "rook" | "r" => Self::Rook,
            "queen" | "q" => Self::Queen,
            "king" | "k" => Self::King,
            _ => Err(PieceKindParseError(s.to_string()))?,
        })
    }
}

/// Identity of a piece on a board.
///
/// Identifiers are never reused within a board, so a [`MoveRecord`](super::history::MoveRecord)
/// keeps pointing at the piece that moved even after captures and promotions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "save", serde(transparent))]
pub struct PieceId(pub(crate) u32);
impl PieceId {
    /// Raw value of the identifier.
    pub fn get(self) -> u32 {
        self.0
    }
}
impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece standing on the board.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) kind: PieceKind,
    pub(crate) colour: Colour,
    pub(crate) position: Square,
}
impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, colour: Colour, position: Square) -> Self {
        Self {
            id,
            kind,
            colour,
            position,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn colour(&self) -> Colour {
        self.colour
    }

    #[inline]
    pub fn position(&self) -> Square {
        self.position
    }

    #[inline]
    pub fn is(&self, kind: PieceKind) -> bool {
        self.kind == kind
    }

    /// Checks if `other` belongs to the opposing side.
    #[inline]
    pub fn is_opponent_of(&self, other: &Piece) -> bool {
        self.colour != other.colour
    }

    /// Squares this piece could reach on an empty board.
    pub fn destinations(&self) -> Destinations {
        geometry::pseudo_legal_destinations(self.kind, self.colour, self.position)
    }

    /// Returns the piece's Unicode symbol.
    pub fn unicode_symbol(&self) -> char {
        PIECE_SYMBOLS_UNICODE[self.colour as usize * 6 + self.kind as usize]
    }
}
impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} on {}", self.colour, self.kind, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind_names() {
        assert_eq!("Queen".parse(), Ok(PieceKind::Queen));
        assert_eq!("knight".parse(), Ok(PieceKind::Knight));
        assert_eq!("R".parse(), Ok(PieceKind::Rook));
        assert_eq!(
            "Archbishop".parse::<PieceKind>(),
            Err(PieceKindParseError("Archbishop".to_string()))
        );
    }

    #[test]
    fn sliders() {
        assert!(PieceKind::Queen.is_diagonal_slider() && PieceKind::Queen.is_orthogonal_slider());
        assert!(PieceKind::Rook.is_orthogonal_slider() && !PieceKind::Rook.is_diagonal_slider());
        assert!(PieceKind::Bishop.is_diagonal_slider() && !PieceKind::Bishop.is_orthogonal_slider());
        for kind in [PieceKind::Pawn, PieceKind::Knight, PieceKind::King] {
            assert!(!kind.is_slider());
        }
    }

    #[test]
    fn symbols() {
        let square = Square::new(0, 0).unwrap();
        let rook = Piece::new(PieceId(0), PieceKind::Rook, Colour::Black, square);
        assert_eq!(rook.unicode_symbol(), '♜');
        let king = Piece::new(PieceId(1), PieceKind::King, Colour::White, square);
        assert_eq!(king.unicode_symbol(), '♔');
    }
}
