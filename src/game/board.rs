//! # Board
//! The authoritative position: which piece stands where, each side's king, and
//! the history of every displacement since the board was set up.
//!
//! The board itself only stores state. Rules live in dedicated services that
//! borrow it:
//! - [`MoveValidator`] decides whether a move is legal.
//! - [`CheckEvaluator`] answers check and checkmate questions.
//! - [`MoveCommitter`] applies validated moves and promotions.
//!
//! The most common operations are also available directly on [`Board`].

use thiserror::Error;

use super::{
    check::CheckEvaluator,
    colour::{Colour, NUM_COLOURS},
    commit::{MoveCommitter, MoveResult, PromotionError},
    history::MoveRecord,
    piece::{Piece, PieceId, PieceKind},
    square::{Square, BOARD_SIZE, NUM_SQUARES},
    validator::{MoveValidator, Validation},
    view::BoardView,
};

/// Errors raised when adding or removing pieces outside of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PlaceError {
    #[error("{0} is already occupied")]
    Occupied(Square),
    #[error("There is no piece on {0}")]
    Empty(Square),
    #[error("{0} already has a king")]
    DuplicateKing(Colour),
    #[error("The king on {0} cannot be removed")]
    KingRemoval(Square),
}

/// Errors raised when finishing a custom setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SetupError {
    #[error(transparent)]
    Place(#[from] PlaceError),
    #[error("{0} has no king")]
    MissingKing(Colour),
}

/// Pieces of both sides and the grid pointing at them.
///
/// The grid and the piece collections are only ever updated together, so a
/// piece's `position` always names the cell that holds its identifier.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct Roster {
    grid: [Option<PieceId>; NUM_SQUARES],
    pieces: [Vec<Piece>; NUM_COLOURS],
    next_id: u32,
}
impl Roster {
    pub(crate) fn new() -> Self {
        Self {
            grid: [None; NUM_SQUARES],
            pieces: [Vec::new(), Vec::new()],
            next_id: 0,
        }
    }

    /// Cells of the grid, by rank then file.
    pub(crate) fn grid(&self) -> &[Option<PieceId>; NUM_SQUARES] {
        &self.grid
    }

    /// All pieces, White's first.
    pub(crate) fn all(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flatten()
    }

    fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().flatten().find(|piece| piece.id == id)
    }

    fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().flatten().find(|piece| piece.id == id)
    }

    fn occupant(&self, square: Square) -> Option<&Piece> {
        self.grid[square.index()].and_then(|id| self.get(id))
    }

    /// Adds a piece with a known identity.
    pub(crate) fn insert(&mut self, piece: Piece) -> Result<(), PlaceError> {
        if self.grid[piece.position.index()].is_some() {
            return Err(PlaceError::Occupied(piece.position));
        }
        self.grid[piece.position.index()] = Some(piece.id);
        self.pieces[piece.colour.index()].push(piece);
        self.next_id = self.next_id.max(piece.id.0 + 1);
        Ok(())
    }

    /// Adds a piece under a fresh identity.
    fn spawn(&mut self, kind: PieceKind, colour: Colour, square: Square) -> Result<PieceId, PlaceError> {
        let id = PieceId(self.next_id);
        self.insert(Piece::new(id, kind, colour, square))?;
        Ok(id)
    }

    /// Makes sure identities issued from now on are at least `next`.
    pub(crate) fn reserve(&mut self, next: u32) {
        self.next_id = self.next_id.max(next);
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }

    fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let colour = self.get(id)?.colour;
        let collection = &mut self.pieces[colour.index()];
        let index = collection.iter().position(|piece| piece.id == id)?;
        let piece = collection.remove(index);
        self.grid[piece.position.index()] = None;
        Some(piece)
    }

    fn relocate(&mut self, id: PieceId, to: Square) {
        let Some(piece) = self.get_mut(id) else {
            return;
        };
        let from = std::mem::replace(&mut piece.position, to);
        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);
    }
}

/// Incrementally places pieces before a board exists.
///
/// Used to build custom positions: unlike [`Board::place_piece`], the builder
/// accepts kings, and [`build`](BoardBuilder::build) checks that each side
/// ends up with exactly one.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    roster: Roster,
    kings: [Option<PieceId>; NUM_COLOURS],
}
impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl BoardBuilder {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            kings: [None; NUM_COLOURS],
        }
    }

    /// Places a piece on an empty square and returns its identity.
    pub fn place(&mut self, kind: PieceKind, colour: Colour, square: Square) -> Result<PieceId, PlaceError> {
        if kind == PieceKind::King && self.kings[colour.index()].is_some() {
            return Err(PlaceError::DuplicateKing(colour));
        }
        let id = self.roster.spawn(kind, colour, square)?;
        if kind == PieceKind::King {
            self.kings[colour.index()] = Some(id);
        }
        Ok(id)
    }

    /// Finishes the setup. Both sides must have a king.
    pub fn build(self) -> Result<Board, SetupError> {
        let [Some(white), Some(black)] = self.kings else {
            let missing = if self.kings[Colour::White.index()].is_none() {
                Colour::White
            } else {
                Colour::Black
            };
            return Err(SetupError::MissingKing(missing));
        };
        Ok(Board::from_parts(self.roster, [white, black], Vec::new()))
    }
}

/// The full state of a game of chess.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    roster: Roster,
    kings: [PieceId; NUM_COLOURS],
    history: Vec<MoveRecord>,
}
impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}
impl Board {
    pub(crate) fn from_parts(roster: Roster, kings: [PieceId; NUM_COLOURS], history: Vec<MoveRecord>) -> Self {
        Self {
            roster,
            kings,
            history,
        }
    }

    /// The standard starting position, with an empty history.
    pub fn initial() -> Self {
        let mut builder = BoardBuilder::new();
        for colour in Colour::COLOURS {
            let ranks = [
                (colour.back_rank(), PieceKind::BACK_RANK),
                (colour.pawn_rank(), [PieceKind::Pawn; BOARD_SIZE as usize]),
            ];
            for (rank, kinds) in ranks {
                let squares = Square::squares_iter().filter(|square| square.rank() == rank);
                for (square, kind) in squares.zip(kinds) {
                    if let Err(e) = builder.place(kind, colour, square) {
                        unreachable!("the starting position is well formed: {e}");
                    }
                }
            }
        }
        match builder.build() {
            Ok(board) => board,
            Err(e) => unreachable!("the starting position is well formed: {e}"),
        }
    }

    /// A custom position with an empty history.
    ///
    /// # Errors
    /// Fails when two pieces share a square or when a side has zero or several
    /// kings.
    pub fn setup(placements: impl IntoIterator<Item = (PieceKind, Colour, Square)>) -> Result<Self, SetupError> {
        let mut builder = BoardBuilder::new();
        for (kind, colour, square) in placements {
            builder.place(kind, colour, square)?;
        }
        builder.build()
    }

    /// Adds a piece on an empty square. Kings cannot be added, each side
    /// already has one.
    pub fn place_piece(&mut self, kind: PieceKind, colour: Colour, square: Square) -> Result<PieceId, PlaceError> {
        if kind == PieceKind::King {
            return Err(PlaceError::DuplicateKing(colour));
        }
        self.roster.spawn(kind, colour, square)
    }

    /// Takes a piece off the board without recording anything in the history.
    pub fn remove_piece(&mut self, square: Square) -> Result<Piece, PlaceError> {
        let piece = *self.piece_at(square).ok_or(PlaceError::Empty(square))?;
        if piece.is(PieceKind::King) {
            return Err(PlaceError::KingRemoval(square));
        }
        self.roster.remove(piece.id).ok_or(PlaceError::Empty(square))
    }

    /// The piece with the given identity, if it is still on the board.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.roster.get(id)
    }

    /// The piece standing on a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.roster.occupant(square)
    }

    /// Pieces of a colour, king included, in placement order.
    pub fn ally_pieces(&self, colour: Colour) -> &[Piece] {
        &self.roster.pieces[colour.index()]
    }

    /// Pieces of the side opposing `colour`.
    pub fn opponent_pieces(&self, colour: Colour) -> &[Piece] {
        self.ally_pieces(colour.inverse())
    }

    /// The king of a colour.
    pub fn king(&self, colour: Colour) -> &Piece {
        match self.roster.get(self.kings[colour.index()]) {
            Some(king) => king,
            None => unreachable!("the {colour} king is always on the board"),
        }
    }

    /// Every displacement since setup, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// A validator borrowing this board.
    pub fn validator(&self) -> MoveValidator<'_, Self> {
        MoveValidator::new(self)
    }

    /// A check evaluator borrowing this board.
    pub fn checks(&self) -> CheckEvaluator<'_, Self> {
        CheckEvaluator::new(self)
    }

    /// See [`MoveValidator::valid_move`].
    pub fn valid_move(&self, id: PieceId, to: Square) -> Validation {
        self.validator().valid_move(id, to)
    }

    /// See [`MoveCommitter::move_piece`].
    pub fn move_piece(&mut self, id: PieceId, to: Square) -> MoveResult {
        MoveCommitter::new(self).move_piece(id, to)
    }

    /// See [`MoveCommitter::promote_pawn`].
    pub fn promote_pawn(&mut self, id: PieceId, kind: PieceKind) -> Result<PieceId, PromotionError> {
        MoveCommitter::new(self).promote_pawn(id, kind)
    }

    /// Checks if the king of `colour` is attacked.
    pub fn in_check(&self, colour: Colour) -> bool {
        self.checks().in_check(colour, None)
    }

    /// Checks if `colour` is checkmated.
    pub fn checkmate(&self, colour: Colour) -> bool {
        self.checks().checkmate(colour)
    }

    pub(crate) fn roster(&self) -> &Roster {
        &self.roster
    }

    pub(crate) fn kings(&self) -> [PieceId; NUM_COLOURS] {
        self.kings
    }

    /// Moves a piece and appends the displacement to the history.
    pub(crate) fn displace(&mut self, id: PieceId, from: Square, to: Square) {
        self.roster.relocate(id, to);
        self.history.push(MoveRecord { piece: id, from, to });
    }

    /// Removes a captured piece. History is left untouched.
    pub(crate) fn capture(&mut self, id: PieceId) -> Option<Piece> {
        self.roster.remove(id)
    }

    /// Swaps a piece for a fresh one of another kind on the same square.
    pub(crate) fn replace(&mut self, id: PieceId, kind: PieceKind) -> Option<PieceId> {
        let old = self.roster.remove(id)?;
        self.roster.spawn(kind, old.colour, old.position).ok()
    }
}
impl BoardView for Board {
    fn piece(&self, id: PieceId) -> Option<&Piece> {
        Board::piece(self, id)
    }

    fn piece_at(&self, square: Square) -> Option<&Piece> {
        Board::piece_at(self, square)
    }

    fn pieces(&self, colour: Colour) -> impl Iterator<Item = &Piece> {
        self.ally_pieces(colour).iter()
    }

    fn king(&self, colour: Colour) -> &Piece {
        Board::king(self, colour)
    }

    fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    fn has_moved(&self, id: PieceId) -> bool {
        self.history.iter().any(|record| record.piece == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn kings_only() -> Board {
        Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
        ])
        .unwrap()
    }

    #[test]
    fn initial_position() {
        let board = Board::initial();
        assert_eq!(board.ally_pieces(Colour::White).len(), 16);
        assert_eq!(board.opponent_pieces(Colour::White).len(), 16);
        assert!(board.history().is_empty());

        assert_eq!(board.king(Colour::White).position(), sq(4, 7));
        assert_eq!(board.king(Colour::Black).position(), sq(4, 0));
        assert!(board.piece_at(sq(3, 7)).unwrap().is(PieceKind::Queen));
        assert!(board.piece_at(sq(0, 0)).unwrap().is(PieceKind::Rook));
        for file in 0..BOARD_SIZE {
            let black = board.piece_at(sq(file, 1)).unwrap();
            let white = board.piece_at(sq(file, 6)).unwrap();
            assert!(black.is(PieceKind::Pawn) && black.colour() == Colour::Black);
            assert!(white.is(PieceKind::Pawn) && white.colour() == Colour::White);
            for rank in 2..6 {
                assert!(board.piece_at(sq(file, rank)).is_none());
            }
        }
    }

    #[test]
    fn identities_are_unique() {
        let board = Board::initial();
        let mut ids: Vec<_> = board.roster.all().map(Piece::id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn grid_agrees_with_positions() {
        let board = Board::initial();
        for piece in board.roster.all() {
            assert_eq!(board.piece_at(piece.position()), Some(piece));
            assert_eq!(board.piece(piece.id()), Some(piece));
        }
    }

    #[test]
    fn setup_requires_one_king_per_side() {
        assert_eq!(
            Board::setup([(PieceKind::King, Colour::White, sq(4, 7))]),
            Err(SetupError::MissingKing(Colour::Black))
        );
        assert_eq!(
            Board::setup([
                (PieceKind::King, Colour::White, sq(4, 7)),
                (PieceKind::King, Colour::White, sq(3, 7)),
            ]),
            Err(SetupError::Place(PlaceError::DuplicateKing(Colour::White)))
        );
        assert_eq!(
            Board::setup([
                (PieceKind::King, Colour::White, sq(4, 7)),
                (PieceKind::Rook, Colour::Black, sq(4, 7)),
            ]),
            Err(SetupError::Place(PlaceError::Occupied(sq(4, 7))))
        );
    }

    #[test]
    fn place_and_remove() {
        let mut board = kings_only();
        let rook = board.place_piece(PieceKind::Rook, Colour::Black, sq(0, 0)).unwrap();
        assert_eq!(board.piece_at(sq(0, 0)).map(Piece::id), Some(rook));
        assert_eq!(
            board.place_piece(PieceKind::Knight, Colour::White, sq(0, 0)),
            Err(PlaceError::Occupied(sq(0, 0)))
        );
        assert_eq!(
            board.place_piece(PieceKind::King, Colour::Black, sq(1, 1)),
            Err(PlaceError::DuplicateKing(Colour::Black))
        );

        let removed = board.remove_piece(sq(0, 0)).unwrap();
        assert_eq!(removed.id(), rook);
        assert!(board.piece(rook).is_none());
        assert_eq!(board.remove_piece(sq(0, 0)), Err(PlaceError::Empty(sq(0, 0))));
        assert_eq!(board.remove_piece(sq(4, 7)), Err(PlaceError::KingRemoval(sq(4, 7))));
        assert!(board.history().is_empty());
    }

    #[test]
    fn identities_are_not_reused() {
        let mut board = kings_only();
        let first = board.place_piece(PieceKind::Pawn, Colour::White, sq(0, 6)).unwrap();
        board.remove_piece(sq(0, 6)).unwrap();
        let second = board.place_piece(PieceKind::Pawn, Colour::White, sq(0, 6)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn displacement_is_recorded() {
        let mut board = Board::initial();
        let knight = board.piece_at(sq(6, 7)).unwrap().id();
        board.displace(knight, sq(6, 7), sq(5, 5));

        assert!(board.piece_at(sq(6, 7)).is_none());
        assert_eq!(board.piece(knight).unwrap().position(), sq(5, 5));
        assert_eq!(
            board.history(),
            &[MoveRecord { piece: knight, from: sq(6, 7), to: sq(5, 5) }]
        );
        assert!(board.has_moved(knight));
    }
}
