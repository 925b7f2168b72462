use std::fmt;
use std::path::{Component, Path};
use std::time::SystemTime;

use chrono::{DateTime, Local};

pub const NOTE_EXTENSION: &str = "md";

/// One row of the browse list. Rebuilt from the directory on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub name: String,
    pub last_modified: SystemTime,
}

impl NoteSummary {
    pub fn modified_label(&self) -> String {
        let stamp: DateTime<Local> = self.last_modified.into();
        format!("Last modified: {}", stamp.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Which interaction surface is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Browse,
    ListOpen,
    Creating,
    Editing,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModeKind::Browse => "browse",
            ModeKind::ListOpen => "list",
            ModeKind::Creating => "create",
            ModeKind::Editing => "edit",
        };
        f.write_str(label)
    }
}

/// `base` + `.md`.
pub fn note_file_name(base: &str) -> String {
    format!("{base}.{NOTE_EXTENSION}")
}

/// A name is usable when it addresses a single plain entry directly inside the vault.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains('/') {
        return false;
    }
    if cfg!(windows) && name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_appends_markdown_extension() {
        assert_eq!(note_file_name("groceries"), "groceries.md");
        assert_eq!(note_file_name("v1.2"), "v1.2.md");
    }

    #[test]
    fn plain_names_reject_traversal_and_separators() {
        assert!(is_plain_file_name("todo.md"));
        assert!(is_plain_file_name(".hidden"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../escape"));
        assert!(!is_plain_file_name("nested/note"));
    }

    #[test]
    fn backslash_is_a_separator_only_on_windows() {
        assert_eq!(is_plain_file_name("win\\style"), !cfg!(windows));
    }

    #[test]
    fn modified_label_uses_fixed_layout() {
        let summary = NoteSummary {
            name: "a.md".into(),
            last_modified: SystemTime::now(),
        };
        let label = summary.modified_label();
        assert!(label.starts_with("Last modified: "));
        assert_eq!(label.len(), "Last modified: ".len() + "2006-01-02 15:04:05".len());
    }
}
