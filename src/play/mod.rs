//! # Playing in the terminal
//! Everything needed to play a game between two players sharing a terminal:
//! prompt commands, the console, human and computer players, and the game
//! loop itself.

pub mod commands;
pub mod console;
pub mod game;
pub mod player;
