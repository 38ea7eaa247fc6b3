//! # Players
//! Both sides of a game are driven through the [`Player`] trait: humans type
//! their moves in a [`Terminal`], the computer picks a random legal move.

use std::borrow::Cow;

use log::{debug, warn};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};

use super::{
    commands::{Command, CommandError, Message},
    console::Terminal,
};
use crate::game::{
    action::CoordinateMove,
    board::Board,
    colour::Colour,
    geometry,
    piece::{Piece, PieceKind},
    square::Square,
};

/// What a player wants to do on their turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Turn {
    Move(CoordinateMove),
    Save,
    Quit,
    /// The player cannot find any legal move.
    Resign,
}

/// Who controls a side.
#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "save", serde(rename_all = "lowercase"))]
pub enum PlayerKind {
    Human,
    Computer,
}

pub trait Player {
    fn colour(&self) -> Colour;

    fn name(&self) -> Cow<'_, str>;

    fn kind(&self) -> PlayerKind;

    /// Picks the next action. Moves are checked by the game, an illegal move
    /// leads to another call.
    fn choose_move(&mut self, board: &Board, terminal: &mut dyn Terminal) -> std::io::Result<Turn>;

    /// Picks what a pawn that reached its last rank becomes.
    fn choose_promotion(&mut self, board: &Board, terminal: &mut dyn Terminal) -> std::io::Result<PieceKind>;
}

/// A player typing commands in the terminal.
pub struct HumanPlayer {
    colour: Colour,
    name: String,
}
impl HumanPlayer {
    pub fn new(colour: Colour, name: impl Into<String>) -> Self {
        Self {
            colour,
            name: name.into(),
        }
    }
}
impl Player for HumanPlayer {
    fn colour(&self) -> Colour {
        self.colour
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Human
    }

    fn choose_move(&mut self, board: &Board, terminal: &mut dyn Terminal) -> std::io::Result<Turn> {
        loop {
            terminal.send_message(Message::MovePrompt)?;
            let Some(line) = terminal.read_line()? else {
                return Ok(Turn::Quit);
            };
            match line.parse::<Command>() {
                Ok(Command::Move(action)) => {
                    let owned = board
                        .piece_at(action.from)
                        .is_some_and(|piece| piece.colour() == self.colour);
                    if owned {
                        return Ok(Turn::Move(action));
                    }
                    terminal.send_message(Message::NotYourPiece(action.from))?
                }
                Ok(Command::Save) => return Ok(Turn::Save),
                Ok(Command::Quit) => return Ok(Turn::Quit),
                Ok(Command::Help) => terminal.send_message(Message::Help)?,
                Err(CommandError::EmptyCommand) => (),
                Err(e) => terminal.send_message(Message::Invalid(Cow::Owned(e.to_string())))?,
            }
        }
    }

    fn choose_promotion(&mut self, _board: &Board, terminal: &mut dyn Terminal) -> std::io::Result<PieceKind> {
        loop {
            terminal.send_message(Message::PromotionPrompt)?;
            let Some(line) = terminal.read_line()? else {
                return Ok(PieceKind::Queen);
            };
            match line.parse::<PieceKind>() {
                Ok(kind) if kind.is_valid_promotion_target() => return Ok(kind),
                Ok(kind) => {
                    terminal.send_message(Message::Invalid(Cow::Owned(format!("Cannot promote to {kind}"))))?
                }
                Err(e) => terminal.send_message(Message::Invalid(Cow::Owned(e.to_string())))?,
            }
        }
    }
}

/// A player moving at random among legal moves.
pub struct ComputerPlayer {
    colour: Colour,
    rng: SmallRng,
}
impl ComputerPlayer {
    /// Creates a computer player. A seed makes its choices reproducible.
    pub fn new(colour: Colour, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { colour, rng }
    }

    /// Squares worth trying for a piece: its move shape, plus castling squares
    /// for kings and capture squares for pawns.
    fn candidates(piece: &Piece) -> Vec<Square> {
        let mut candidates = piece.destinations().to_vec();
        match piece.kind() {
            PieceKind::King => {
                candidates.extend([2, -2].into_iter().filter_map(|files| piece.position().offset(files, 0)))
            }
            PieceKind::Pawn => candidates.extend(geometry::pawn_threats(piece.colour(), piece.position())),
            _ => (),
        }
        candidates
    }

    /// A random legal move for this player's side, if there is one.
    pub fn pick_move(&mut self, board: &Board) -> Option<CoordinateMove> {
        let mut moves: Vec<_> = board
            .ally_pieces(self.colour)
            .iter()
            .flat_map(|piece| Self::candidates(piece).into_iter().map(move |to| (*piece, to)))
            .collect();
        moves.shuffle(&mut self.rng);
        moves
            .into_iter()
            .find(|(piece, to)| board.valid_move(piece.id(), *to).move_valid)
            .map(|(piece, to)| CoordinateMove::new(piece.position(), to))
    }
}
impl Player for ComputerPlayer {
    fn colour(&self) -> Colour {
        self.colour
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("Computer")
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Computer
    }

    fn choose_move(&mut self, board: &Board, _terminal: &mut dyn Terminal) -> std::io::Result<Turn> {
        Ok(match self.pick_move(board) {
            Some(action) => {
                debug!("{} computer picked {action}", self.colour);
                Turn::Move(action)
            }
            None => {
                warn!("{} computer found no legal move", self.colour);
                Turn::Resign
            }
        })
    }

    fn choose_promotion(&mut self, _board: &Board, _terminal: &mut dyn Terminal) -> std::io::Result<PieceKind> {
        Ok(*PieceKind::PROMOTION_TARGETS
            .choose(&mut self.rng)
            .unwrap_or(&PieceKind::Queen))
    }
}
