use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the vault store. Only `VaultUnavailable` at startup is fatal;
/// everything else is surfaced as a status line and the mode stays put.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault unavailable at {}: {source}", .path.display())]
    VaultUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read note '{name}': {source}")]
    NoteReadFailed {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot create note '{name}': {source}")]
    NoteCreateFailed {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid note name '{0}'")]
    InvalidName(String),
    #[error("cannot save note: {0}")]
    SaveFailed(#[from] SaveError),
    #[error("cannot delete note '{name}': {source}")]
    DeleteFailed {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// The step of a save that failed. The file content is indeterminate after
/// any of these except `TruncateFailed`.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("truncate failed: {0}")]
    TruncateFailed(#[source] io::Error),
    #[error("seek failed: {0}")]
    SeekFailed(#[source] io::Error),
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),
    #[error("close failed: {0}")]
    CloseFailed(#[source] io::Error),
}

impl SaveError {
    pub fn step(&self) -> &'static str {
        match self {
            SaveError::TruncateFailed(_) => "truncate",
            SaveError::SeekFailed(_) => "seek",
            SaveError::WriteFailed(_) => "write",
            SaveError::CloseFailed(_) => "close",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid vault directory '{0}': parent traversal is not allowed")]
    InvalidVaultDir(String),
}
