//! Board coordinates.
//!
//! A [`Square`] is a `(file, rank)` pair, both in `0..8`. Files go from the
//! a-file (0) to the h-file (7). Ranks are counted from the top of the board
//! as printed for White: rank 0 is Black's back rank (chess rank 8) and rank 7
//! is White's back rank (chess rank 1).

#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parsing::PartialFromStr;

/// Side length of the board.
pub const BOARD_SIZE: u8 = 8;
/// Number of squares on the board (64).
pub const NUM_SQUARES: usize = 64;

/// A square of the 8x8 board. Can only be built from on-board coordinates.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "save", serde(try_from = "[u8; 2]", into = "[u8; 2]"))]
pub struct Square(u8);
impl Square {
    /// Instantiates a new square based on file and rank.
    ///
    /// Returns `None` if either coordinate is more than 7.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Self(rank << 3 | file))
        } else {
            None
        }
    }

    /// Instantiates a new square from signed coordinates, as produced by
    /// offsetting another square.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || rank < 0 {
            None
        } else {
            Self::new(file as u8, rank as u8)
        }
    }

    /// Index of the square, `rank * 8 + file`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the file of the square.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    /// Returns the rank of the square.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Translates this square by a file and rank offset.
    ///
    /// Returns `None` if the translation would go out of the board.
    #[inline]
    pub const fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        Self::from_coords(self.file() as i8 + files, self.rank() as i8 + ranks)
    }

    /// Translates this square by a given delta.
    ///
    /// Returns `None` if the translation would go out of the board.
    #[inline]
    pub const fn translate(self, delta: Delta) -> Option<Self> {
        let (files, ranks) = delta.offsets();
        self.offset(files, ranks)
    }

    /// Absolute file and rank distances between two squares.
    #[inline]
    pub const fn distance(self, other: Self) -> (u8, u8) {
        (
            self.file().abs_diff(other.file()),
            self.rank().abs_diff(other.rank()),
        )
    }

    /// An iterator over all squares, ordered by rank then file.
    pub fn squares_iter() -> impl Iterator<Item = Self> {
        (0..NUM_SQUARES as u8).map(Self)
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            BOARD_SIZE - self.rank()
        )
    }
}
impl From<Square> for [u8; 2] {
    fn from(square: Square) -> Self {
        [square.file(), square.rank()]
    }
}
impl TryFrom<[u8; 2]> for Square {
    type Error = SquareParseError;

    fn try_from([file, rank]: [u8; 2]) -> Result<Self, Self::Error> {
        Self::new(file, rank).ok_or(SquareParseError::OutOfBounds(file, rank))
    }
}

/// Errors that may arise when reading squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SquareParseError {
    #[error("Invalid file: {0}")]
    InvalidFile(char),
    #[error("Invalid rank: {0}")]
    InvalidRank(char),
    #[error("Missing coordinates")]
    MissingCoordinates,
    #[error("{0} characters left after the square")]
    TrailingCharacters(usize),
    #[error("Coordinates ({0}, {1}) are off the board")]
    OutOfBounds(u8, u8),
}

impl PartialFromStr for Square {
    type Err = SquareParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let mut chars = s.chars();
        let file = chars.next().ok_or(SquareParseError::MissingCoordinates)?;
        let rank = chars.next().ok_or(SquareParseError::MissingCoordinates)?;

        let file_index = match file.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(SquareParseError::InvalidFile(file)),
        };
        let rank_index = match rank {
            c @ '1'..='8' => BOARD_SIZE - (c as u8 - b'0'),
            _ => return Err(SquareParseError::InvalidRank(rank)),
        };

        let square = Self::new(file_index, rank_index)
            .ok_or(SquareParseError::OutOfBounds(file_index, rank_index))?;
        Ok((square, chars.as_str()))
    }
}
impl std::str::FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (square, rest) = Self::partial_from_str(s.trim())?;
        if rest.is_empty() {
            Ok(square)
        } else {
            Err(SquareParseError::TrailingCharacters(rest.chars().count()))
        }
    }
}

/// Deltas represent directions in which pieces can move.
///
/// North points towards rank 0 (White's direction of travel), east towards
/// the h-file.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Delta {
    North,
    South,
    East,
    West,

    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,

    KnightNorthEast,
    KnightNorthWest,
    KnightSouthEast,
    KnightSouthWest,
    KnightEastNorth,
    KnightWestNorth,
    KnightEastSouth,
    KnightWestSouth,
}
impl Delta {
    pub const KNIGHT_DELTAS: [Self; 8] = [
        Self::KnightNorthEast,
        Self::KnightNorthWest,
        Self::KnightSouthEast,
        Self::KnightSouthWest,
        Self::KnightEastNorth,
        Self::KnightWestNorth,
        Self::KnightEastSouth,
        Self::KnightWestSouth,
    ];
    pub const ORTHOGONAL_DELTAS: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];
    pub const DIAGONAL_DELTAS: [Self; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];
    pub const QUEEN_DELTAS: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// File and rank offsets of a single step in this direction.
    pub const fn offsets(self) -> (i8, i8) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),

            Self::NorthEast => (1, -1),
            Self::NorthWest => (-1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),

            Self::KnightNorthEast => (1, -2),
            Self::KnightNorthWest => (-1, -2),
            Self::KnightSouthEast => (1, 2),
            Self::KnightSouthWest => (-1, 2),
            Self::KnightEastNorth => (2, -1),
            Self::KnightWestNorth => (-2, -1),
            Self::KnightEastSouth => (2, 1),
            Self::KnightWestSouth => (-2, 1),
        }
    }

    /// The unit direction leading from `from` to `to`, if both squares share a
    /// file, rank or diagonal.
    pub fn between(from: Square, to: Square) -> Option<Self> {
        if from == to {
            return None;
        }
        let files = to.file() as i8 - from.file() as i8;
        let ranks = to.rank() as i8 - from.rank() as i8;
        if files != 0 && ranks != 0 && files.abs() != ranks.abs() {
            return None;
        }
        let unit = (files.signum(), ranks.signum());
        Self::QUEEN_DELTAS
            .into_iter()
            .find(|delta| delta.offsets() == unit)
    }
}
