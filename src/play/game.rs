//! # Game loop
//! Alternates turns between two players, starting with White, until a side is
//! checkmated or a player leaves.

use std::{borrow::Cow, path::PathBuf};

use log::{info, warn};

use super::{
    commands::Message,
    console::Terminal,
    player::{ComputerPlayer, HumanPlayer, Player, PlayerKind, Turn},
};
use crate::game::{action::CoordinateMove, board::Board, colour::Colour};

/// Settings of a game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub white: PlayerKind,
    pub black: PlayerKind,
    pub white_name: String,
    pub black_name: String,
    /// Seed of the computer players' random choices.
    pub seed: Option<u64>,
    /// Directory where saves are written.
    pub save_dir: PathBuf,
    /// Stops the game after this many turns.
    pub max_turns: Option<u32>,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            white: PlayerKind::Human,
            black: PlayerKind::Computer,
            white_name: "White".to_string(),
            black_name: "Black".to_string(),
            seed: None,
            save_dir: PathBuf::from("saves"),
            max_turns: None,
        }
    }
}
impl GameConfig {
    fn player(&self, colour: Colour, kind: PlayerKind, name: &str) -> Box<dyn Player> {
        match kind {
            PlayerKind::Human => Box::new(HumanPlayer::new(colour, name)),
            // Both computers must not share a random stream.
            PlayerKind::Computer => Box::new(ComputerPlayer::new(
                colour,
                self.seed.map(|seed| seed.wrapping_add(colour.index() as u64)),
            )),
        }
    }

    fn players(&self) -> [Box<dyn Player>; 2] {
        [
            self.player(Colour::White, self.white, &self.white_name),
            self.player(Colour::Black, self.black, &self.black_name),
        ]
    }
}

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Colour },
    /// The side to move could not find a legal move.
    NoLegalMove(Colour),
    Quit,
    TurnLimit,
}

/// A game in progress.
pub struct Game {
    board: Board,
    players: [Box<dyn Player>; 2],
    to_move: Colour,
    turns: u32,
    config: GameConfig,
}
impl Game {
    /// A new game from the starting position.
    pub fn new(config: GameConfig) -> Self {
        Self::resume(Board::initial(), Colour::White, config)
    }

    /// Continues a game on an existing board.
    pub fn resume(board: Board, to_move: Colour, config: GameConfig) -> Self {
        Self {
            board,
            players: config.players(),
            to_move,
            turns: 0,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Colour {
        self.to_move
    }

    fn player(&self, colour: Colour) -> &dyn Player {
        self.players[colour.index()].as_ref()
    }

    /// Plays until the game ends.
    pub fn play(&mut self, terminal: &mut dyn Terminal) -> std::io::Result<Outcome> {
        loop {
            let colour = self.to_move;
            if self.board.checkmate(colour) {
                let winner = colour.inverse();
                terminal.send_message(Message::Board(&self.board))?;
                terminal.send_message(Message::Checkmate {
                    winner,
                    name: self.player(winner).name(),
                })?;
                info!("{winner} wins by checkmate after {} turns", self.turns);
                return Ok(Outcome::Checkmate { winner });
            }
            if self.config.max_turns.is_some_and(|limit| self.turns >= limit) {
                terminal.send_message(Message::TurnLimit(self.turns))?;
                return Ok(Outcome::TurnLimit);
            }

            if let Some(outcome) = self.play_turn(colour, terminal)? {
                return Ok(outcome);
            }
            self.turns += 1;
            self.to_move.invert();
        }
    }

    /// Asks the side to move for actions until one of its moves is played.
    fn play_turn(&mut self, colour: Colour, terminal: &mut dyn Terminal) -> std::io::Result<Option<Outcome>> {
        terminal.send_message(Message::Board(&self.board))?;
        terminal.send_message(Message::Turn {
            colour,
            name: self.player(colour).name(),
        })?;
        if self.board.in_check(colour) {
            terminal.send_message(Message::Check(colour))?;
        }

        loop {
            let turn = self.players[colour.index()].choose_move(&self.board, terminal)?;
            match turn {
                Turn::Move(action) => {
                    if self.apply(colour, action, terminal)? {
                        return Ok(None);
                    }
                    terminal.send_message(Message::IllegalMove(action))?;
                }
                Turn::Save => self.save_to_terminal(terminal)?,
                Turn::Quit => {
                    terminal.send_message(Message::Goodbye)?;
                    return Ok(Some(Outcome::Quit));
                }
                Turn::Resign => {
                    terminal.send_message(Message::NoLegalMove(colour))?;
                    return Ok(Some(Outcome::NoLegalMove(colour)));
                }
            }
        }
    }

    /// Plays a move for `colour`, returning whether it was legal.
    fn apply(&mut self, colour: Colour, action: CoordinateMove, terminal: &mut dyn Terminal) -> std::io::Result<bool> {
        let Some(piece) = self.board.piece_at(action.from).copied() else {
            return Ok(false);
        };
        if piece.colour() != colour {
            return Ok(false);
        }
        let result = self.board.move_piece(piece.id(), action.to);
        if !result.move_valid {
            return Ok(false);
        }
        info!("{colour} played {action}");

        if result.castling {
            terminal.send_message(Message::Castled(colour))?;
        } else {
            terminal.send_message(Message::Played {
                colour,
                action,
                capture: result.captured.is_some(),
            })?;
        }

        if result.promote_pawn {
            let kind = match action.promoting_to {
                Some(kind) => kind,
                None => self.players[colour.index()].choose_promotion(&self.board, terminal)?,
            };
            match self.board.promote_pawn(piece.id(), kind) {
                Ok(_) => terminal.send_message(Message::Promoted {
                    square: action.to,
                    kind,
                })?,
                Err(e) => warn!("Promotion on {} failed: {e}", action.to),
            }
        }
        Ok(true)
    }

    #[cfg(feature = "save")]
    fn save_to_terminal(&self, terminal: &mut dyn Terminal) -> std::io::Result<()> {
        match self.save() {
            Ok(path) => terminal.send_message(Message::Saved(path)),
            Err(e) => {
                warn!("Could not save the game: {e}");
                terminal.send_message(Message::Invalid(Cow::Owned(e.to_string())))
            }
        }
    }

    #[cfg(not(feature = "save"))]
    fn save_to_terminal(&self, terminal: &mut dyn Terminal) -> std::io::Result<()> {
        terminal.send_message(Message::Invalid(Cow::Borrowed(
            "This build cannot save games (feature `save` is disabled)",
        )))
    }
}

#[cfg(feature = "save")]
mod record {
    use std::path::{Path, PathBuf};

    use log::info;
    use serde::{Deserialize, Serialize};

    use super::{Game, GameConfig};
    use crate::{
        game::{
            board::Board,
            colour::Colour,
            save::{self, BoardRecord, LoadError, SaveError},
        },
        play::player::PlayerKind,
    };

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct PlayerRecord {
        pub kind: PlayerKind,
        pub name: String,
    }

    /// Serialized form of a [`Game`]: the board, whose turn it is and who
    /// plays each side.
    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct GameRecord {
        pub board: BoardRecord,
        pub to_move: Colour,
        pub white: PlayerRecord,
        pub black: PlayerRecord,
    }

    impl Game {
        pub fn to_record(&self) -> GameRecord {
            let record = |colour: Colour| {
                let player = self.player(colour);
                PlayerRecord {
                    kind: player.kind(),
                    name: player.name().into_owned(),
                }
            };
            GameRecord {
                board: self.board.to_record(),
                to_move: self.to_move,
                white: record(Colour::White),
                black: record(Colour::Black),
            }
        }

        /// Restores a game. Players come from the record, everything else from
        /// `config`.
        pub fn from_record(record: &GameRecord, config: GameConfig) -> Result<Self, LoadError> {
            let board = Board::from_record(&record.board)?;
            let config = GameConfig {
                white: record.white.kind,
                black: record.black.kind,
                white_name: record.white.name.clone(),
                black_name: record.black.name.clone(),
                ..config
            };
            Ok(Self::resume(board, record.to_move, config))
        }

        /// Writes the game to the next free save file.
        pub fn save(&self) -> Result<PathBuf, SaveError> {
            let path = save::next_save_path(&self.config.save_dir)?;
            save::write_json(&path, &self.to_record())?;
            info!("Saved game to {}", path.display());
            Ok(path)
        }

        pub fn load(path: &Path, config: GameConfig) -> Result<Self, LoadError> {
            let record: GameRecord = save::read_json(path)?;
            let game = Self::from_record(&record, config)?;
            info!("Loaded game from {}", path.display());
            Ok(game)
        }
    }
}
#[cfg(feature = "save")]
pub use record::{GameRecord, PlayerRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{piece::PieceKind, square::Square},
        play::console::Console,
    };

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn humans() -> GameConfig {
        GameConfig {
            white: PlayerKind::Human,
            black: PlayerKind::Human,
            ..GameConfig::default()
        }
    }

    fn play(game: &mut Game, input: &str) -> (Outcome, String) {
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let outcome = game.play(&mut console).unwrap();
        let output = String::from_utf8(console.into_output().unwrap()).unwrap();
        (outcome, output)
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new(humans());
        let (outcome, output) = play(&mut game, "f2f3\ne7e5\ng2g4\nd8h4\n");
        assert_eq!(outcome, Outcome::Checkmate { winner: Colour::Black });
        assert!(output.contains("Checkmate! Black (Black) wins."));
        assert_eq!(game.board().history().len(), 4);
        assert_eq!(game.to_move(), Colour::White);
    }

    #[test]
    fn illegal_moves_are_asked_again() {
        let mut game = Game::new(humans());
        let (outcome, output) = play(&mut game, "e2e5\ne2e4\nquit\n");
        assert_eq!(outcome, Outcome::Quit);
        assert!(output.contains("e2e5 is not a legal move."));
        assert!(output.contains("White plays e2 to e4."));
        assert_eq!(game.board().history().len(), 1);
        assert_eq!(game.to_move(), Colour::Black);
    }

    #[test]
    fn closed_input_quits() {
        let mut game = Game::new(humans());
        let (outcome, _) = play(&mut game, "");
        assert_eq!(outcome, Outcome::Quit);
    }

    #[test]
    fn promotion_from_the_move() {
        let board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(7, 3)),
            (PieceKind::Pawn, Colour::White, sq(0, 1)),
        ])
        .unwrap();
        let mut game = Game::resume(board, Colour::White, humans());
        let (_, output) = play(&mut game, "a7a8n\n");
        assert!(output.contains("The pawn on a8 becomes a Knight."));
        assert!(game.board().piece_at(sq(0, 0)).unwrap().is(PieceKind::Knight));
    }

    #[test]
    fn promotion_prompt() {
        let board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(7, 3)),
            (PieceKind::Pawn, Colour::White, sq(0, 1)),
        ])
        .unwrap();
        let mut game = Game::resume(board, Colour::White, humans());
        play(&mut game, "a7a8\nrook\n");
        assert!(game.board().piece_at(sq(0, 0)).unwrap().is(PieceKind::Rook));
    }

    #[test]
    fn computers_play_until_the_limit() {
        let config = GameConfig {
            white: PlayerKind::Computer,
            black: PlayerKind::Computer,
            seed: Some(42),
            max_turns: Some(20),
            ..GameConfig::default()
        };
        let mut game = Game::new(config);
        let (outcome, _) = play(&mut game, "");
        match outcome {
            Outcome::TurnLimit => assert!(game.board().history().len() >= 20),
            Outcome::Checkmate { .. } | Outcome::NoLegalMove(_) => (),
            Outcome::Quit => panic!("computers never quit"),
        }
    }

    #[cfg(feature = "save")]
    #[test]
    fn game_records_round_trip() {
        let mut game = Game::new(humans());
        play(&mut game, "e2e4\nd7d5\nquit\n");
        let record = game.to_record();
        assert_eq!(record.to_move, Colour::White);
        assert_eq!(record.black.kind, PlayerKind::Human);

        let restored = Game::from_record(&record, GameConfig::default()).unwrap();
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.to_move(), Colour::White);
        assert_eq!(restored.player(Colour::Black).kind(), PlayerKind::Human);
    }
}
