//! # Parsing
//! Squares and coordinate moves are parsable from raw strings using the standard
//! Rust [`FromStr`](std::str::FromStr) trait.
//!
//! On top of that, they implement the [`PartialFromStr`] trait, a small parser
//! combinator interface.
//!
//! Unlike [`FromStr`](std::str::FromStr), the `Ok` variant returned by
//! [`PartialFromStr`] contains two values:
//! - The parsed value
//! - A suffix of the input that was not part of the parsed value.
//!
//! A string like "d4rest" would return `Ok((d4, "rest"))` when parsed as a square,
//! so "e2e4" can be read as two squares by successive calls to `partial_from_str`.

pub trait PartialFromStr: Sized {
    type Err;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err>;
}

/// Skips leading whitespace, returning whether any was consumed.
pub fn skip_whitespace(s: &str) -> (bool, &str) {
    let rest = s.trim_start();
    (rest.len() != s.len(), rest)
}
