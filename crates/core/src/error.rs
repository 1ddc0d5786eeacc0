//! Error types for egchess-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("widget mode is required (expected \"edit\" or \"play\")")]
    MissingMode,

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid piece code: {0}")]
    InvalidPiece(String),

    #[error("Config parsing failed: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
