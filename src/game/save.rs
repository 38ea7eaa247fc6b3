//! # Saved boards
//! A board is saved as a roster of pieces, the grid of identifiers pointing at
//! them, each side's king and the full history. Identities are kept as they
//! are, so history records stay meaningful after a reload.
//!
//! Loading validates everything and either returns a complete board or an
//! error: a partially restored board never escapes.

use std::{
    collections::HashMap,
    fs,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use super::{
    board::{Board, PlaceError, Roster},
    colour::Colour,
    history::MoveRecord,
    piece::{Piece, PieceId, PieceKind, PieceKindParseError},
    square::{Square, BOARD_SIZE},
};

/// One piece of the roster. The kind is stored by name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PieceRecord {
    pub id: PieceId,
    pub kind: String,
    pub colour: Colour,
    pub position: Square,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KingsRecord {
    pub white: PieceId,
    pub black: PieceId,
}

/// Serialized form of a [`Board`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BoardRecord {
    pub pieces: Vec<PieceRecord>,
    /// Rows of the grid by rank, each holding cells by file.
    pub grid: Vec<Vec<Option<PieceId>>>,
    pub kings: KingsRecord,
    pub history: Vec<MoveRecord>,
    /// Identity the next new piece receives.
    #[serde(default)]
    pub next_id: u32,
}

/// Errors that may arise when loading a saved board or game.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read {}: {error}", path.display())]
    Io { path: PathBuf, error: std::io::Error },
    #[error("Malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Kind(#[from] PieceKindParseError),
    #[error("Piece {0} appears twice in the roster")]
    DuplicatePiece(PieceId),
    #[error("The grid must hold 8 rows of 8 cells")]
    MalformedGrid,
    #[error("The grid refers to unknown piece {0}")]
    UnknownPiece(PieceId),
    #[error("Piece {id} claims {claimed} but the grid holds it on {found}")]
    Misplaced {
        id: PieceId,
        claimed: Square,
        found: Square,
    },
    #[error("Piece {0} is missing from the grid")]
    OffGrid(PieceId),
    #[error("The {0} king is missing or is not a {0} king")]
    InvalidKing(Colour),
    #[error("Piece {0} is a king but neither side's")]
    ExtraKing(PieceId),
    #[error(transparent)]
    Place(#[from] PlaceError),
}

/// Errors that may arise when writing a save.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Could not write {}: {error}", path.display())]
    Io { path: PathBuf, error: std::io::Error },
    #[error("Could not serialize: {0}")]
    Json(#[from] serde_json::Error),
}

impl Board {
    /// Snapshot of the board in its serializable form.
    pub fn to_record(&self) -> BoardRecord {
        let pieces = self
            .roster()
            .all()
            .map(|piece| PieceRecord {
                id: piece.id(),
                kind: piece.kind().name().to_string(),
                colour: piece.colour(),
                position: piece.position(),
            })
            .collect();
        let grid = self
            .roster()
            .grid()
            .chunks(BOARD_SIZE as usize)
            .map(<[_]>::to_vec)
            .collect();
        let [white, black] = self.kings();

        BoardRecord {
            pieces,
            grid,
            kings: KingsRecord { white, black },
            history: self.history().to_vec(),
            next_id: self.roster().next_id(),
        }
    }

    /// Rebuilds a board from a record, checking that the roster, the grid and
    /// the kings agree with each other.
    ///
    /// History records are kept as they are, they may name pieces that have
    /// since been captured or promoted.
    pub fn from_record(record: &BoardRecord) -> Result<Self, LoadError> {
        let mut pieces = HashMap::with_capacity(record.pieces.len());
        let mut order = Vec::with_capacity(record.pieces.len());
        for entry in &record.pieces {
            let kind: PieceKind = entry.kind.parse()?;
            let piece = Piece::new(entry.id, kind, entry.colour, entry.position);
            if pieces.insert(entry.id, piece).is_some() {
                return Err(LoadError::DuplicatePiece(entry.id));
            }
            order.push(entry.id);
        }

        if record.grid.len() != BOARD_SIZE as usize
            || record.grid.iter().any(|row| row.len() != BOARD_SIZE as usize)
        {
            return Err(LoadError::MalformedGrid);
        }
        let mut on_grid = HashMap::with_capacity(pieces.len());
        for (square, cell) in Square::squares_iter().zip(record.grid.iter().flatten()) {
            let Some(id) = *cell else {
                continue;
            };
            let piece = pieces.get(&id).ok_or(LoadError::UnknownPiece(id))?;
            if piece.position() != square || on_grid.insert(id, square).is_some() {
                return Err(LoadError::Misplaced {
                    id,
                    claimed: piece.position(),
                    found: square,
                });
            }
        }
        if let Some(&id) = order.iter().find(|id| !on_grid.contains_key(*id)) {
            return Err(LoadError::OffGrid(id));
        }

        let kings = [record.kings.white, record.kings.black];
        for (colour, id) in Colour::COLOURS.into_iter().zip(kings) {
            match pieces.get(&id) {
                Some(king) if king.is(PieceKind::King) && king.colour() == colour => (),
                _ => return Err(LoadError::InvalidKing(colour)),
            }
        }
        if let Some(&id) = order
            .iter()
            .find(|id| pieces[*id].is(PieceKind::King) && !kings.contains(*id))
        {
            return Err(LoadError::ExtraKing(id));
        }

        let mut roster = Roster::new();
        for id in &order {
            roster.insert(pieces[id])?;
        }
        roster.reserve(record.next_id);
        for entry in &record.history {
            roster.reserve(entry.piece.get() + 1);
        }
        Ok(Board::from_parts(roster, kings, record.history.clone()))
    }
}

/// Writes any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveError> {
    let io_error = |error| SaveError::Io {
        path: path.to_path_buf(),
        error,
    };
    let file = fs::File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(io_error)
}

/// Reads a JSON file into any deserializable value.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let file = fs::File::open(path).map_err(|error| LoadError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Save files found in `dir`, sorted by name. A missing directory holds no
/// saves.
pub fn list_saves(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut saves: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
            name.starts_with("save_") && name.ends_with(".json")
        })
        .collect();
    saves.sort();
    saves
}

/// First unused `save_<n>.json` path in `dir`, creating the directory if
/// needed.
pub fn next_save_path(dir: &Path) -> Result<PathBuf, SaveError> {
    fs::create_dir_all(dir).map_err(|error| SaveError::Io {
        path: dir.to_path_buf(),
        error,
    })?;
    let mut n = list_saves(dir).len() + 1;
    loop {
        let path = dir.join(format!("save_{n}.json"));
        if !path.exists() {
            return Ok(path);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn played_board() -> Board {
        let mut board = Board::initial();
        for (from, to) in [
            (sq(4, 6), sq(4, 4)),
            (sq(3, 1), sq(3, 3)),
            (sq(4, 4), sq(3, 3)),
            (sq(6, 0), sq(5, 2)),
        ] {
            let id = board.piece_at(from).unwrap().id();
            assert!(board.move_piece(id, to).move_valid);
        }
        board
    }

    #[test]
    fn records_preserve_identity_and_history() {
        let board = played_board();
        let record = board.to_record();
        assert_eq!(record.pieces.len(), 31);
        assert_eq!(record.history.len(), 4);

        let restored = Board::from_record(&record).unwrap();
        assert_eq!(restored, board);
        assert_eq!(restored.history(), board.history());
        for colour in Colour::COLOURS {
            assert_eq!(restored.king(colour).id(), board.king(colour).id());
        }
    }

    #[test]
    fn json_round_trip_keeps_playing() {
        let board = played_board();
        let json = serde_json::to_string(&board.to_record()).unwrap();
        let record: BoardRecord = serde_json::from_str(&json).unwrap();
        let mut restored = Board::from_record(&record).unwrap();

        let knight = restored.piece_at(sq(6, 7)).unwrap().id();
        assert!(restored.move_piece(knight, sq(5, 5)).move_valid);
        let fresh = restored.place_piece(PieceKind::Queen, Colour::White, sq(0, 4)).unwrap();
        assert!(board.to_record().pieces.iter().all(|piece| piece.id != fresh));
        assert!(record.history.iter().all(|entry| entry.piece != fresh));
    }

    #[test]
    fn restored_history_drives_en_passant() {
        let mut board = Board::setup([
            (PieceKind::King, Colour::White, sq(4, 7)),
            (PieceKind::King, Colour::Black, sq(4, 0)),
            (PieceKind::Pawn, Colour::White, sq(4, 3)),
            (PieceKind::Pawn, Colour::Black, sq(3, 1)),
        ])
        .unwrap();
        let black = board.piece_at(sq(3, 1)).unwrap().id();
        assert!(board.move_piece(black, sq(3, 3)).move_valid);

        let restored = Board::from_record(&board.to_record()).unwrap();
        let white = restored.piece_at(sq(4, 3)).unwrap().id();
        assert!(restored.valid_move(white, sq(3, 2)).en_passant);
    }

    #[test]
    fn unknown_kinds_fail() {
        let mut record = Board::initial().to_record();
        record.pieces[3].kind = "Archbishop".to_string();
        assert!(matches!(Board::from_record(&record), Err(LoadError::Kind(_))));
    }

    #[test]
    fn inconsistent_grids_fail() {
        let board = Board::initial();

        let mut record = board.to_record();
        record.grid.pop();
        assert!(matches!(Board::from_record(&record), Err(LoadError::MalformedGrid)));

        let mut record = board.to_record();
        record.grid[4][4] = Some(PieceId(500));
        assert!(matches!(
            Board::from_record(&record),
            Err(LoadError::UnknownPiece(PieceId(500)))
        ));

        let mut record = board.to_record();
        let moved = record.grid[6][0].take();
        record.grid[5][0] = moved;
        assert!(matches!(Board::from_record(&record), Err(LoadError::Misplaced { .. })));

        let mut record = board.to_record();
        let id = record.grid[6][0].take().unwrap();
        assert!(matches!(Board::from_record(&record), Err(LoadError::OffGrid(off)) if off == id));

        let mut record = board.to_record();
        let duplicate = record.pieces[0].clone();
        record.pieces.push(duplicate);
        assert!(matches!(Board::from_record(&record), Err(LoadError::DuplicatePiece(_))));
    }

    #[test]
    fn kings_must_match() {
        let board = Board::initial();
        let mut record = board.to_record();
        std::mem::swap(&mut record.kings.white, &mut record.kings.black);
        assert!(matches!(
            Board::from_record(&record),
            Err(LoadError::InvalidKing(Colour::White))
        ));

        let mut record = board.to_record();
        let rook = record.grid[7][0].unwrap();
        record.pieces.iter_mut().find(|piece| piece.id == rook).unwrap().kind = "King".to_string();
        assert!(matches!(Board::from_record(&record), Err(LoadError::ExtraKing(id)) if id == rook));
    }
}
