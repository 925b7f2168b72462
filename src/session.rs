//! The note currently open for editing.
//!
//! An `ActiveNote` owns the file handle and the content buffer together. It is
//! consumed by `save` and `close`, so a closed handle cannot be used again and
//! a note cannot be closed twice.

use log::warn;

use crate::editor::TextBuffer;
use crate::error::SaveError;
use crate::storage::{save_note, NoteHandle};

#[derive(Debug)]
pub struct ActiveNote<H> {
    name: String,
    handle: H,
    buffer: TextBuffer,
}

/// A save that did not complete. The note comes back untouched so the
/// buffer survives and the user can retry.
#[derive(Debug)]
pub struct SaveFailure<H> {
    pub note: ActiveNote<H>,
    pub error: SaveError,
}

impl<H: NoteHandle> ActiveNote<H> {
    pub fn new(name: impl Into<String>, handle: H) -> Self {
        Self {
            name: name.into(),
            handle,
            buffer: TextBuffer::default(),
        }
    }

    pub fn with_content(name: impl Into<String>, handle: H, content: &str) -> Self {
        let mut note = Self::new(name, handle);
        note.load(content);
        note
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the buffer with `content` and puts the cursor at the start.
    pub fn load(&mut self, content: &str) {
        self.buffer = TextBuffer::from_text(content);
    }

    pub fn current_content(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    /// Writes the buffer over the file and closes the handle.
    pub fn save(self) -> Result<(), SaveFailure<H>> {
        let ActiveNote {
            name,
            handle,
            buffer,
        } = self;
        let content = buffer.text();
        save_note(handle, &content).map_err(|(handle, error)| SaveFailure {
            note: ActiveNote {
                name,
                handle,
                buffer,
            },
            error,
        })
    }

    /// Closes the handle and drops the buffer without writing.
    pub fn close(self) {
        if let Err((_handle, e)) = self.handle.close() {
            // Dropping the returned handle releases the descriptor regardless.
            warn!("event=note_close module=session status=error error={e}");
        }
    }
}
