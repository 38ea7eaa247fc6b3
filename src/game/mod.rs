//! # Chess API
//! This module contains the rules of chess: the board and its pieces, move
//! validation, check and checkmate detection, and committing moves.

pub mod action;
pub mod board;
pub mod check;
pub mod colour;
pub mod commit;
mod display;
pub mod geometry;
pub mod history;
pub mod piece;
#[cfg(feature = "save")]
pub mod save;
pub mod square;
pub mod validator;
pub mod view;
