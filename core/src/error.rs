use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines, requested {mines} but the board only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Level grid is malformed: {0}")]
    MalformedLevel(String),
    #[error("Word to unscramble is empty")]
    EmptyWord,
    #[error("Nothing to play, the content list is empty")]
    NoContent,
    #[error("Answer index {index} is out of range for {options} options")]
    InvalidAnswer { index: usize, options: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not serialize record {key:?}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store backend rejected write to {key:?}: {reason}")]
    Backend { key: String, reason: String },
}
