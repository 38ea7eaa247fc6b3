//! # Actions (or moves)

use thiserror::Error;

use super::{
    piece::{PieceKind, PieceKindParseError},
    square::{Square, SquareParseError},
};
use crate::parsing::{skip_whitespace, PartialFromStr};

/// Pure coordinate notation move, as typed by a player: `e2e4`, `e2 e4`, or
/// `a7a8q` to choose the promotion up front.
///
/// Coordinate moves say nothing about legality. They are resolved against a
/// board by looking up the piece standing on `from`.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promoting_to: Option<PieceKind>,
}
impl CoordinateMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promoting_to: None,
        }
    }
}
impl std::fmt::Display for CoordinateMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promoting_to {
            let symbol = match kind {
                PieceKind::Knight => 'n',
                PieceKind::Bishop => 'b',
                PieceKind::Rook => 'r',
                _ => 'q',
            };
            write!(f, "{symbol}")?
        }
        Ok(())
    }
}

/// Errors that may arise when reading a coordinate move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("Invalid origin: {0}")]
    Origin(SquareParseError),
    #[error("Invalid destination: {0}")]
    Destination(SquareParseError),
    #[error(transparent)]
    Promotion(#[from] PieceKindParseError),
    #[error("Cannot promote to {0}")]
    InvalidPromotion(PieceKind),
}

impl PartialFromStr for CoordinateMove {
    type Err = ActionParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let (_, s) = skip_whitespace(s);
        let (from, s) = Square::partial_from_str(s).map_err(ActionParseError::Origin)?;
        let (_, s) = skip_whitespace(s);
        let (to, s) = Square::partial_from_str(s).map_err(ActionParseError::Destination)?;

        let mut chars = s.chars();
        let promoting_to = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {
                let kind: PieceKind = c.to_string().parse()?;
                if !kind.is_valid_promotion_target() {
                    return Err(ActionParseError::InvalidPromotion(kind));
                }
                Some(kind)
            }
            _ => None,
        };
        let rest = if promoting_to.is_some() { chars.as_str() } else { s };

        Ok((
            Self {
                from,
                to,
                promoting_to,
            },
            rest,
        ))
    }
}
impl std::str::FromStr for CoordinateMove {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, rest) = Self::partial_from_str(s.trim())?;
        if rest.is_empty() {
            Ok(action)
        } else {
            Err(ActionParseError::Destination(
                SquareParseError::TrailingCharacters(rest.chars().count()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    #[test]
    fn parse_coordinate_moves() {
        let expected = CoordinateMove::new(sq(4, 6), sq(4, 4));
        assert_eq!("e2e4".parse(), Ok(expected));
        assert_eq!("e2 e4".parse(), Ok(expected));
        assert_eq!("  E2E4 \n".parse(), Ok(expected));
    }

    #[test]
    fn parse_promotions() {
        let action: CoordinateMove = "a7a8q".parse().unwrap();
        assert_eq!(action.promoting_to, Some(PieceKind::Queen));
        assert_eq!(action.to, sq(0, 0));
        assert_eq!(action.to_string(), "a7a8q");
        assert_eq!(
            "a7a8k".parse::<CoordinateMove>(),
            Err(ActionParseError::InvalidPromotion(PieceKind::King))
        );
        assert!(matches!(
            "a7a8x".parse::<CoordinateMove>(),
            Err(ActionParseError::Promotion(_))
        ));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "z2e4".parse::<CoordinateMove>(),
            Err(ActionParseError::Origin(SquareParseError::InvalidFile('z')))
        );
        assert_eq!(
            "e2e9".parse::<CoordinateMove>(),
            Err(ActionParseError::Destination(SquareParseError::InvalidRank('9')))
        );
        assert_eq!(
            "e2".parse::<CoordinateMove>(),
            Err(ActionParseError::Destination(SquareParseError::MissingCoordinates))
        );
        assert!("e2e4 please".parse::<CoordinateMove>().is_err());
    }

    #[test]
    fn partial_parse_leaves_the_rest() {
        let (action, rest) = CoordinateMove::partial_from_str("g1f3 b8c6").unwrap();
        assert_eq!(action, CoordinateMove::new(sq(6, 7), sq(5, 5)));
        assert_eq!(rest, " b8c6");
    }
}
