//! Colours for each players and their pieces.

#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};

/// Number of different colours (2).
pub const NUM_COLOURS: usize = 2;

/// Colour enumeration.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
pub enum Colour {
    White = 0,
    Black = 1,
}
impl Colour {
    /// Both colours, White first.
    pub const COLOURS: [Self; NUM_COLOURS] = [Colour::White, Colour::Black];

    /// Inverts the colour in place.
    #[inline]
    pub fn invert(&mut self) {
        *self = self.inverse()
    }

    /// Returns the inverse of this colour.
    #[inline]
    pub const fn inverse(&self) -> Self {
        if self.is_black() {
            Colour::White
        } else {
            Colour::Black
        }
    }

    /// Checks if the colour variant is black.
    #[inline]
    pub const fn is_black(&self) -> bool {
        matches!(self, Colour::Black)
    }

    /// Index of this colour in per-colour tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank offset of a single pawn push.
    ///
    /// Black pawns walk towards increasing rank indices, white pawns towards
    /// rank 0.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        if self.is_black() {
            1
        } else {
            -1
        }
    }

    /// Rank on which the pieces of this colour are set up.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        if self.is_black() {
            0
        } else {
            7
        }
    }

    /// Rank on which the pawns of this colour start, and may double step from.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        if self.is_black() {
            1
        } else {
            6
        }
    }

    /// Rank on which pawns of this colour may be promoted.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        self.inverse().back_rank()
    }
}
impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.is_black() { "Black" } else { "White" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawns_walk_towards_promotion_rank() {
        for colour in Colour::COLOURS {
            let travelled = colour.promotion_rank() as i8 - colour.pawn_rank() as i8;
            assert_eq!(travelled.signum(), colour.pawn_direction());
            assert_eq!(travelled.abs(), 6);
        }
    }
}
