//! Error types for the shotgun duel engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Invalid duel action: {0}")]
    InvalidAction(String),

    #[error("Invalid player name: {0}")]
    InvalidPlayerName(String),

    #[error("Both seats must be taken before the duel can start")]
    SeatsIncomplete,

    #[error("The duel is not in progress")]
    NotInProgress,

    #[error("The shotgun is empty")]
    EmptyMagazine,

    #[error("No room with this room_id: {0}")]
    RoomNotFound(u32),

    #[error("Room {0} already has two players")]
    RoomFull(u32),

    #[error("Controllers do not match the seated players")]
    ControllerMismatch,

    #[error("Player {0} is not in a room")]
    NotInRoom(i64),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;
