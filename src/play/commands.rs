//! # Prompt commands and messages
//! Commands typed by a human at the move prompt, and messages the game sends
//! back to the terminal.

use std::{borrow::Cow, path::PathBuf};

use thiserror::Error;

use crate::game::{
    action::{ActionParseError, CoordinateMove},
    board::Board,
    colour::Colour,
    piece::PieceKind,
    square::Square,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Move(#[from] ActionParseError),
}

/// Commands accepted at the move prompt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(CoordinateMove),
    Save,
    Quit,
    Help,
}
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move(action) => write!(f, "{action}"),
            Self::Save => write!(f, "save"),
            Self::Quit => write!(f, "quit"),
            Self::Help => write!(f, "help"),
        }
    }
}
impl std::str::FromStr for Command {
    type Err = CommandError;

    /// Parses a command, case-insensitively. Input starting with a square is
    /// read as a coordinate move.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let verb = s
            .split_whitespace()
            .next()
            .ok_or(CommandError::EmptyCommand)?
            .to_ascii_lowercase();
        match verb.as_str() {
            "save" => Ok(Self::Save),
            "quit" | "exit" => Ok(Self::Quit),
            "help" | "?" => Ok(Self::Help),
            // Squares are a letter and a digit.
            _ if verb.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) => Ok(Self::Move(s.parse()?)),
            _ => Err(CommandError::UnknownCommand(verb)),
        }
    }
}

/// Messages shown to the players.
#[derive(Clone, Debug)]
pub enum Message<'a> {
    Board(&'a Board),
    Turn { colour: Colour, name: Cow<'a, str> },
    MovePrompt,
    PromotionPrompt,
    Played {
        colour: Colour,
        action: CoordinateMove,
        capture: bool,
    },
    Castled(Colour),
    Promoted { square: Square, kind: PieceKind },
    IllegalMove(CoordinateMove),
    NotYourPiece(Square),
    Invalid(Cow<'a, str>),
    Check(Colour),
    Checkmate { winner: Colour, name: Cow<'a, str> },
    NoLegalMove(Colour),
    TurnLimit(u32),
    Saved(PathBuf),
    Loaded(PathBuf),
    Help,
    Goodbye,
}
impl std::fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board(board) => writeln!(f, "\n{board}\n"),
            Self::Turn { colour, name } => writeln!(f, "{name} ({colour}) to move."),
            Self::MovePrompt => write!(f, "Enter a move (e.g. e2e4), `save`, `quit` or `help`: "),
            Self::PromotionPrompt => write!(f, "Promote to (queen, rook, bishop, knight): "),
            Self::Played {
                colour,
                action,
                capture,
            } => {
                let verb = if *capture { "captures on" } else { "to" };
                writeln!(f, "{colour} plays {} {verb} {}.", action.from, action.to)
            }
            Self::Castled(colour) => writeln!(f, "{colour} castles."),
            Self::Promoted { square, kind } => writeln!(f, "The pawn on {square} becomes a {kind}."),
            Self::IllegalMove(action) => writeln!(f, "{action} is not a legal move."),
            Self::NotYourPiece(square) => writeln!(f, "None of your pieces stands on {square}."),
            Self::Invalid(reason) => writeln!(f, "{reason}"),
            Self::Check(colour) => writeln!(f, "{colour} is in check!"),
            Self::Checkmate { winner, name } => {
                writeln!(f, "Checkmate! {name} ({winner}) wins.")
            }
            Self::NoLegalMove(colour) => writeln!(f, "{colour} has no legal move left."),
            Self::TurnLimit(turns) => writeln!(f, "Stopping after {turns} turns."),
            Self::Saved(path) => writeln!(f, "Game saved under {}.", path.display()),
            Self::Loaded(path) => writeln!(f, "Loaded {}.", path.display()),
            Self::Help => {
                writeln!(f, "Moves are typed as two squares, origin then destination: e2e4 or e2 e4.")?;
                writeln!(f, "Add a piece letter to choose a promotion up front: a7a8q.")?;
                writeln!(f, "Castle by moving the king two squares towards a rook: e1g1.")?;
                writeln!(f, "`save` writes the game to disk, `quit` leaves without saving.")
            }
            Self::Goodbye => writeln!(f, "Goodbye."),
        }
    }
}
