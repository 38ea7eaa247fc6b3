//! Move shapes of every piece kind and straight-line paths between squares.
//!
//! Everything here is independent of the board's contents: a rook's destinations
//! extend up to the edge of the board whatever stands in the way. Filtering by
//! occupancy is done by the [validator](super::validator).

use thiserror::Error;

use super::{
    colour::Colour,
    piece::PieceKind,
    square::{Delta, Square},
};

/// Squares reachable by a piece, at most 27 (a queen in the centre).
pub type Destinations = heapless::Vec<Square, 32>;
/// Squares strictly between two aligned squares, at most 6.
pub type Path = heapless::Vec<Square, 8>;

/// Requested a path between squares that share no rank, file or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{from} and {to} do not share a rank, file or diagonal")]
pub struct GeometryError {
    pub from: Square,
    pub to: Square,
}

fn push<const N: usize>(squares: &mut heapless::Vec<Square, N>, square: Square) {
    if squares.push(square).is_err() {
        unreachable!("move shapes always fit their buffer")
    }
}

fn extend_rays(from: Square, deltas: &[Delta], destinations: &mut Destinations) {
    for &delta in deltas {
        let mut current = from;
        while let Some(next) = current.translate(delta) {
            push(destinations, next);
            current = next;
        }
    }
}

fn extend_steps(from: Square, deltas: &[Delta], destinations: &mut Destinations) {
    for square in deltas.iter().filter_map(|&delta| from.translate(delta)) {
        push(destinations, square);
    }
}

/// Squares a piece of the given kind and colour could reach from `from`,
/// ignoring occupancy and check.
///
/// Pawns only get their forward pushes: one step, plus two steps from their
/// starting rank. Diagonal captures depend on occupancy and are not part of
/// the move shape.
pub fn pseudo_legal_destinations(kind: PieceKind, colour: Colour, from: Square) -> Destinations {
    let mut destinations = Destinations::new();
    match kind {
        PieceKind::King => extend_steps(from, &Delta::QUEEN_DELTAS, &mut destinations),
        PieceKind::Queen => extend_rays(from, &Delta::QUEEN_DELTAS, &mut destinations),
        PieceKind::Rook => extend_rays(from, &Delta::ORTHOGONAL_DELTAS, &mut destinations),
        PieceKind::Bishop => extend_rays(from, &Delta::DIAGONAL_DELTAS, &mut destinations),
        PieceKind::Knight => extend_steps(from, &Delta::KNIGHT_DELTAS, &mut destinations),
        PieceKind::Pawn => {
            let direction = colour.pawn_direction();
            if let Some(single) = from.offset(0, direction) {
                push(&mut destinations, single);
                if from.rank() == colour.pawn_rank() {
                    if let Some(double) = from.offset(0, 2 * direction) {
                        push(&mut destinations, double);
                    }
                }
            }
        }
    }
    destinations
}

/// The two squares diagonally in front of a pawn, which it attacks whether or
/// not anything stands there.
pub fn pawn_threats(colour: Colour, from: Square) -> heapless::Vec<Square, 2> {
    let mut threats = heapless::Vec::new();
    let direction = colour.pawn_direction();
    for square in [-1, 1]
        .into_iter()
        .filter_map(|files| from.offset(files, direction))
    {
        push(&mut threats, square);
    }
    threats
}

/// Checks if `to` is one of the squares diagonally in front of a pawn of the
/// given colour standing on `from`.
pub fn is_pawn_diagonal(colour: Colour, from: Square, to: Square) -> bool {
    pawn_threats(colour, from).contains(&to)
}

/// Checks if two distinct squares share a rank or a file.
pub fn orthogonally_aligned(from: Square, to: Square) -> bool {
    from != to && (from.file() == to.file() || from.rank() == to.rank())
}

/// Checks if two distinct squares share a diagonal.
pub fn diagonally_aligned(from: Square, to: Square) -> bool {
    let (files, ranks) = from.distance(to);
    files != 0 && files == ranks
}

/// Checks if a slider of the given kind lines up with `to` from `from`, i.e.
/// would attack it on an empty board.
pub fn slides_towards(kind: PieceKind, from: Square, to: Square) -> bool {
    (kind.is_orthogonal_slider() && orthogonally_aligned(from, to))
        || (kind.is_diagonal_slider() && diagonally_aligned(from, to))
}

/// Squares strictly between `from` and `to`, ordered from `from`.
///
/// # Errors
/// Fails when the squares are equal or share no rank, file or diagonal.
pub fn try_path_between(from: Square, to: Square) -> Result<Path, GeometryError> {
    let delta = Delta::between(from, to).ok_or(GeometryError { from, to })?;
    let mut path = Path::new();
    let mut current = from;
    while let Some(next) = current.translate(delta) {
        if next == to {
            return Ok(path);
        }
        push(&mut path, next);
        current = next;
    }
    unreachable!("walking from {from} towards {to} left the board")
}

/// Squares strictly between `from` and `to`, ordered from `from`.
///
/// # Panics
/// Callers must have checked that both squares are aligned (through a move
/// shape), a misaligned pair is a bug in the caller.
#[track_caller]
pub fn path_between(from: Square, to: Square) -> Path {
    match try_path_between(from, to) {
        Ok(path) => path,
        Err(e) => unreachable!("{e}"),
    }
}

/// Checks whether `square` stands strictly between `from` and `to` on a straight
/// line.
pub fn is_between(from: Square, to: Square, square: Square) -> bool {
    try_path_between(from, to)
        .map(|path| path.contains(&square))
        .unwrap_or(false)
}
