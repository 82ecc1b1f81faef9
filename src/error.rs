use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SavestateError>;

#[derive(Debug, Error)]
pub enum SavestateError {
    #[error("savestate file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid savestate file: {0}")]
    MalformedInput(String),
    #[error("invalid savestate name: {0}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
