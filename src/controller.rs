//! Mode controller and input routing.
//!
//! The controller is the only place that decides which surface is active.
//! Each mode variant owns the state of its surface, so a visible list, a
//! filename draft and an open note can never coexist.
//!
//! Global commands are matched first and consume the event. Anything left is
//! forwarded to the single passive widget of the active mode.

use log::{debug, info, warn};

use crate::editor::{LineInput, TextBuffer};
use crate::keys::Key;
use crate::list::NoteList;
use crate::models::{ModeKind, NoteSummary};
use crate::session::{ActiveNote, SaveFailure};
use crate::storage::{CreateOutcome, NoteStore};

pub enum Mode<H> {
    /// Idle: nothing shown but the banner and help line.
    Browse,
    ListOpen(NoteList),
    Creating(LineInput),
    Editing(ActiveNote<H>),
}

impl<H> Mode<H> {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Browse => ModeKind::Browse,
            Mode::ListOpen(_) => ModeKind::ListOpen,
            Mode::Creating(_) => ModeKind::Creating,
            Mode::Editing(_) => ModeKind::Editing,
        }
    }
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What the active surface needs to draw. The controller never renders.
pub enum Screen<'a> {
    Idle,
    Prompt(&'a LineInput),
    Editor {
        name: &'a str,
        buffer: &'a TextBuffer,
    },
    List {
        notes: Vec<&'a NoteSummary>,
        selected: Option<usize>,
        filter: Option<&'a str>,
    },
}

pub struct Controller<S: NoteStore> {
    store: S,
    mode: Mode<S::Handle>,
    status: Option<String>,
}

impl<S: NoteStore> Controller<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            mode: Mode::Browse,
            status: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    pub fn active_note(&self) -> Option<&ActiveNote<S::Handle>> {
        match &self.mode {
            Mode::Editing(note) => Some(note),
            _ => None,
        }
    }

    pub fn current_content(&self) -> Option<String> {
        self.active_note().map(ActiveNote::current_content)
    }

    /// Transient message from the last handled event, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn screen(&self) -> Screen<'_> {
        match &self.mode {
            Mode::Browse => Screen::Idle,
            Mode::Creating(input) => Screen::Prompt(input),
            Mode::Editing(note) => Screen::Editor {
                name: note.name(),
                buffer: note.buffer(),
            },
            Mode::ListOpen(list) => Screen::List {
                notes: list.visible(),
                selected: list.selected_index(),
                filter: list.filter(),
            },
        }
    }

    pub fn handle(&mut self, key: Key) -> Flow {
        self.status = None;
        let before = self.mode.kind();
        let flow = match key {
            Key::Quit => {
                self.quit();
                return Flow::Quit;
            }
            Key::New => self.new_note(),
            Key::List => self.open_list(),
            Key::Confirm => self.confirm(),
            Key::Save => self.save(),
            Key::Cancel => self.cancel(),
            Key::Delete => self.delete_selected(),
            other => self.forward(other),
        };
        let after = self.mode.kind();
        if before != after {
            debug!("event=mode_change module=controller from={before} to={after}");
        }
        flow
    }

    /// Closes any open note without saving. Called on quit and on shutdown.
    pub fn shutdown(self) {
        if let Mode::Editing(note) = self.mode {
            note.close();
        }
    }

    fn quit(&mut self) {
        if let Mode::Editing(note) = std::mem::replace(&mut self.mode, Mode::Browse) {
            note.close();
        }
        info!("event=quit module=controller status=ok");
    }

    fn new_note(&mut self) -> Flow {
        match self.mode {
            Mode::Browse | Mode::ListOpen(_) => self.mode = Mode::Creating(LineInput::default()),
            Mode::Creating(_) | Mode::Editing(_) => {}
        }
        Flow::Continue
    }

    fn open_list(&mut self) -> Flow {
        if !matches!(self.mode, Mode::Browse | Mode::ListOpen(_)) {
            return Flow::Continue;
        }
        match self.store.list_notes() {
            Ok(notes) => match &mut self.mode {
                Mode::ListOpen(list) => list.set_notes(notes),
                _ => self.mode = Mode::ListOpen(NoteList::new(notes)),
            },
            Err(e) => {
                warn!("event=vault_list module=controller status=error error={e}");
                self.mode = Mode::Browse;
                self.status = Some(e.to_string());
            }
        }
        Flow::Continue
    }

    fn confirm(&mut self) -> Flow {
        match &mut self.mode {
            Mode::ListOpen(list) => {
                let Some(name) = list.selected().map(|n| n.name.clone()) else {
                    return Flow::Continue;
                };
                self.open_note(&name);
            }
            Mode::Creating(input) => {
                let base = input.value().to_string();
                if !base.is_empty() {
                    self.create_note(&base);
                }
            }
            Mode::Editing(note) => note.buffer_mut().insert_newline(),
            Mode::Browse => {}
        }
        Flow::Continue
    }

    fn open_note(&mut self, name: &str) {
        match self.store.open_note(name) {
            Ok((handle, content)) => {
                self.mode = Mode::Editing(ActiveNote::with_content(name, handle, &content));
                info!("event=note_open module=controller status=ok");
            }
            Err(e) => {
                warn!("event=note_open module=controller status=error error={e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn create_note(&mut self, base: &str) {
        match self.store.create_note(base) {
            Ok(CreateOutcome::Created(handle)) => {
                let name = crate::models::note_file_name(base);
                self.status = Some(format!("Created {name}"));
                self.mode = Mode::Editing(ActiveNote::new(name, handle));
                info!("event=note_create module=controller status=ok");
            }
            // Collisions are ignored: the prompt stays up with the draft intact.
            Ok(CreateOutcome::AlreadyExists) => {
                info!("event=note_create module=controller status=exists");
            }
            Err(e) => {
                warn!("event=note_create module=controller status=error error={e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn save(&mut self) -> Flow {
        if !self.is_open() {
            return Flow::Continue;
        }
        let Mode::Editing(note) = std::mem::replace(&mut self.mode, Mode::Browse) else {
            return Flow::Continue;
        };
        let name = note.name().to_string();
        match note.save() {
            Ok(()) => {
                info!("event=note_save module=controller status=ok");
                self.status = Some(format!("Saved {name}"));
            }
            Err(SaveFailure { note, error }) => {
                warn!(
                    "event=note_save module=controller status=error step={} error={error}",
                    error.step()
                );
                self.status = Some(format!("Cannot save {name}: {error}"));
                self.mode = Mode::Editing(note);
            }
        }
        Flow::Continue
    }

    fn cancel(&mut self) -> Flow {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Creating(_) | Mode::Browse => {}
            Mode::Editing(note) => {
                note.close();
                info!("event=note_discard module=controller status=ok");
            }
            Mode::ListOpen(mut list) => {
                if list.is_filtering() {
                    list.clear_filter();
                    self.mode = Mode::ListOpen(list);
                }
            }
        }
        Flow::Continue
    }

    fn delete_selected(&mut self) -> Flow {
        let Mode::ListOpen(list) = &self.mode else {
            return Flow::Continue;
        };
        let Some(name) = list.selected().map(|n| n.name.clone()) else {
            return Flow::Continue;
        };
        if let Err(e) = self.store.delete_note(&name) {
            warn!("event=note_delete module=controller status=error error={e}");
            self.status = Some(e.to_string());
            return Flow::Continue;
        }
        self.status = Some(format!("Deleted {name}"));
        self.open_list();
        Flow::Continue
    }

    fn forward(&mut self, key: Key) -> Flow {
        match &mut self.mode {
            Mode::Creating(input) => route_to_input(input, key),
            Mode::Editing(note) => route_to_buffer(note.buffer_mut(), key),
            Mode::ListOpen(list) => route_to_list(list, key),
            Mode::Browse => {}
        }
        Flow::Continue
    }
}

fn route_to_input(input: &mut LineInput, key: Key) {
    match key {
        Key::Char(c) => input.insert_char(c),
        Key::Backspace => input.backspace(),
        Key::DeleteForward => input.delete_forward(),
        Key::Left => input.move_left(),
        Key::Right => input.move_right(),
        Key::Home => input.move_home(),
        Key::End => input.move_end(),
        _ => {}
    }
}

fn route_to_buffer(buffer: &mut TextBuffer, key: Key) {
    match key {
        Key::Char(c) => buffer.insert_char(c),
        Key::Backspace => buffer.backspace(),
        Key::DeleteForward => buffer.delete_forward(),
        Key::Left => buffer.move_left(),
        Key::Right => buffer.move_right(),
        Key::Up => buffer.move_up(),
        Key::Down => buffer.move_down(),
        Key::Home => buffer.move_home(),
        Key::End => buffer.move_end(),
        _ => {}
    }
}

fn route_to_list(list: &mut NoteList, key: Key) {
    if list.is_filtering() {
        match key {
            Key::Char(c) if !c.is_control() => list.push_filter_char(c),
            Key::Backspace => list.pop_filter_char(),
            Key::Up => list.select_previous(),
            Key::Down => list.select_next(),
            _ => {}
        }
        return;
    }
    match key {
        Key::Char('/') => list.start_filter(),
        Key::Up | Key::Char('k') => list.select_previous(),
        Key::Down | Key::Char('j') => list.select_next(),
        Key::Home | Key::Char('g') => list.select_first(),
        Key::End | Key::Char('G') => list.select_last(),
        _ => {}
    }
}
