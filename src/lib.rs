//! Totion: a terminal note manager over a flat directory of markdown files.
//!
//! The library holds the mode controller and the vault store; the binary
//! wires them to a crossterm/ratatui terminal.

pub mod app;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod keys;
pub mod list;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod ui;

pub use controller::{Controller, Flow, Mode, Screen};
pub use error::{ConfigError, SaveError, VaultError};
pub use keys::Key;
pub use models::{ModeKind, NoteSummary};
pub use session::{ActiveNote, SaveFailure};
pub use storage::{save_note, CreateOutcome, NoteFile, NoteHandle, NoteStore, VaultStore};
