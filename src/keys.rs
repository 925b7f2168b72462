use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Logical input event delivered to the mode controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    New,
    List,
    Confirm,
    Save,
    Cancel,
    Delete,
    Char(char),
    Backspace,
    DeleteForward,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

pub const HELP_LINE: &str =
    "Ctrl+N: New file . Ctrl+L: List . Esc: Back . Ctrl+S: Save . Ctrl+D: Delete . Ctrl+Q: Quit";

/// Maps a terminal key press to a logical key. Releases and unbound
/// chords map to `None`.
pub fn from_crossterm(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let key = match event.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'q' | 'c' => Key::Quit,
            'n' => Key::New,
            'l' => Key::List,
            's' => Key::Save,
            'd' => Key::Delete,
            _ => return None,
        },
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Tab => Key::Char('\t'),
        KeyCode::Enter => Key::Confirm,
        KeyCode::Esc => Key::Cancel,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::DeleteForward,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(key)
}
