//! # Arbiter
//! A chess rules engine: it knows which moves are legal, detects check and
//! checkmate, and handles castling, en passant and promotion.
//!
//! It is usable as both a library to embed into your own projects and a standalone
//! binary to play in the terminal.

pub mod game;
pub mod parsing;
pub mod play;
