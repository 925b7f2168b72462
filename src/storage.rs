use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{SaveError, VaultError};
use crate::models::{is_plain_file_name, note_file_name, NoteSummary};

pub const VAULT_DIR: &str = ".vault";

/// The exclusively-owned handle of an open note.
///
/// `close` consumes the handle; on failure the handle is handed back so the
/// caller can keep the note open and retry.
pub trait NoteHandle: Sized {
    fn truncate(&mut self) -> io::Result<()>;
    fn seek_start(&mut self) -> io::Result<()>;
    fn write_content(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn close(self) -> Result<(), (Self, io::Error)>;
}

/// Result of a create request. An existing file is not an error.
#[derive(Debug)]
pub enum CreateOutcome<H> {
    Created(H),
    AlreadyExists,
}

/// Filesystem operations the mode controller needs from a vault.
pub trait NoteStore {
    type Handle: NoteHandle;

    fn list_notes(&self) -> Result<Vec<NoteSummary>, VaultError>;
    /// `base` is the user-supplied name without extension.
    fn create_note(&self, base: &str) -> Result<CreateOutcome<Self::Handle>, VaultError>;
    /// `name` is a full file name as produced by `list_notes`.
    fn open_note(&self, name: &str) -> Result<(Self::Handle, String), VaultError>;
    fn delete_note(&self, name: &str) -> Result<(), VaultError>;
}

#[derive(Debug)]
pub struct NoteFile {
    file: File,
    path: PathBuf,
}

impl NoteFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoteHandle for NoteFile {
    fn truncate(&mut self) -> io::Result<()> {
        self.file.set_len(0)
    }

    fn seek_start(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).map(|_| ())
    }

    fn write_content(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.file.flush()
    }

    fn close(self) -> Result<(), (Self, io::Error)> {
        // Surface deferred write errors before the descriptor is dropped.
        match self.file.sync_all() {
            Ok(()) => Ok(()),
            Err(e) => Err((self, e)),
        }
    }
}

/// Truncate, rewind, write, close. Not atomic: a failure after the truncate
/// leaves the file empty or partially written.
pub fn save_note<H: NoteHandle>(mut handle: H, content: &str) -> Result<(), (H, SaveError)> {
    if let Err(e) = handle.truncate() {
        return Err((handle, SaveError::TruncateFailed(e)));
    }
    if let Err(e) = handle.seek_start() {
        return Err((handle, SaveError::SeekFailed(e)));
    }
    if let Err(e) = handle.write_content(content.as_bytes()) {
        return Err((handle, SaveError::WriteFailed(e)));
    }
    handle
        .close()
        .map_err(|(handle, e)| (handle, SaveError::CloseFailed(e)))
}

/// Flat directory of note files, one file per note.
#[derive(Debug, Clone)]
pub struct VaultStore {
    dir: PathBuf,
}

impl VaultStore {
    /// Binds the store to `dir` and makes sure the directory exists.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let store = Self { dir: dir.into() };
        store.ensure_vault()?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_vault(&self) -> Result<(), VaultError> {
        let unavailable = |source| VaultError::VaultUnavailable {
            path: self.dir.clone(),
            source,
        };
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(unavailable(io::Error::new(
                ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            )));
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(unavailable)?;
            info!(
                "event=vault_create module=storage status=ok dir={}",
                self.dir.display()
            );
        }
        restrict_dir(&self.dir).map_err(unavailable)?;
        Ok(())
    }

    fn note_path(&self, name: &str) -> Result<PathBuf, VaultError> {
        if !is_plain_file_name(name) {
            return Err(VaultError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

impl NoteStore for VaultStore {
    type Handle = NoteFile;

    fn list_notes(&self) -> Result<Vec<NoteSummary>, VaultError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| VaultError::VaultUnavailable {
            path: self.dir.clone(),
            source,
        })?;

        let mut notes = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("event=vault_list module=storage status=skip error={e}");
                    continue;
                }
            };
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("event=vault_list module=storage status=skip error={e}");
                    continue;
                }
            };
            if meta.is_dir() {
                continue;
            }
            let Ok(modified) = meta.modified() else {
                continue;
            };
            // A lossy name could not be opened or deleted again.
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(
                        "event=vault_list module=storage status=skip reason=non_utf8_name bytes={}",
                        raw.len()
                    );
                    continue;
                }
            };
            notes.push(NoteSummary {
                name,
                last_modified: modified,
            });
        }
        notes.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "event=vault_list module=storage status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn create_note(&self, base: &str) -> Result<CreateOutcome<NoteFile>, VaultError> {
        let name = note_file_name(base);
        let path = self.note_path(&name)?;

        let mut options = OpenOptions::new();
        options.read(true).write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        match options.open(&path) {
            Ok(file) => {
                info!("event=note_create module=storage status=ok");
                Ok(CreateOutcome::Created(NoteFile { file, path }))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                info!("event=note_create module=storage status=exists");
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(source) => Err(VaultError::NoteCreateFailed { name, source }),
        }
    }

    fn open_note(&self, name: &str) -> Result<(NoteFile, String), VaultError> {
        let path = self.note_path(name)?;
        let read_failed = |source| VaultError::NoteReadFailed {
            name: name.to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(read_failed)?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(read_failed)?;
        debug!(
            "event=note_open module=storage status=ok bytes={}",
            content.len()
        );
        Ok((NoteFile { file, path }, content))
    }

    fn delete_note(&self, name: &str) -> Result<(), VaultError> {
        let path = self.note_path(name)?;
        fs::remove_file(&path).map_err(|source| VaultError::DeleteFailed {
            name: name.to_string(),
            source,
        })?;
        info!("event=note_delete module=storage status=ok");
        Ok(())
    }
}

fn restrict_dir(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o700);
        fs::set_permissions(path, perms)?;
    }
    // On non-Unix platforms we rely on platform defaults.
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
