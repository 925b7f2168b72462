use crate::models::NoteSummary;

/// Browse list with selection and an optional name filter.
///
/// The selection indexes into the *visible* (filtered) entries.
#[derive(Debug, Clone, Default)]
pub struct NoteList {
    notes: Vec<NoteSummary>,
    selected: usize,
    filter: Option<String>,
}

impl NoteList {
    pub fn new(notes: Vec<NoteSummary>) -> Self {
        Self {
            notes,
            selected: 0,
            filter: None,
        }
    }

    /// Swaps in a fresh listing, keeping the filter and clamping the selection.
    pub fn set_notes(&mut self, notes: Vec<NoteSummary>) {
        self.notes = notes;
        self.clamp();
    }

    pub fn visible(&self) -> Vec<&NoteSummary> {
        match &self.filter {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                self.notes
                    .iter()
                    .filter(|n| n.name.to_lowercase().contains(&query))
                    .collect()
            }
            _ => self.notes.iter().collect(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.visible().is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected(&self) -> Option<&NoteSummary> {
        self.visible().get(self.selected).copied()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    pub fn start_filter(&mut self) {
        if self.filter.is_none() {
            self.filter = Some(String::new());
            self.selected = 0;
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.clamp();
    }

    pub fn push_filter_char(&mut self, c: char) {
        if let Some(query) = &mut self.filter {
            query.push(c);
            self.selected = 0;
        }
    }

    pub fn pop_filter_char(&mut self) {
        if let Some(query) = &mut self.filter {
            query.pop();
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible().len().saturating_sub(1);
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn summaries(names: &[&str]) -> Vec<NoteSummary> {
        names
            .iter()
            .map(|n| NoteSummary {
                name: n.to_string(),
                last_modified: SystemTime::UNIX_EPOCH,
            })
            .collect()
    }

    fn list(names: &[&str]) -> NoteList {
        NoteList::new(summaries(names))
    }

    fn visible_names(list: &NoteList) -> Vec<&str> {
        list.visible().iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut l = list(&["a.md", "b.md"]);
        l.select_previous();
        assert_eq!(l.selected_index(), Some(0));
        l.select_next();
        l.select_next();
        assert_eq!(l.selected().map(|n| n.name.as_str()), Some("b.md"));
        l.select_first();
        assert_eq!(l.selected_index(), Some(0));
        l.select_last();
        assert_eq!(l.selected_index(), Some(1));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut l = list(&[]);
        l.select_next();
        assert_eq!(l.selected_index(), None);
        assert!(l.selected().is_none());
    }

    #[test]
    fn filter_matches_case_insensitive_substring() {
        let mut l = list(&["Groceries.md", "ideas.md", "grog.md"]);
        l.start_filter();
        for c in "GRO".chars() {
            l.push_filter_char(c);
        }
        assert_eq!(visible_names(&l), vec!["Groceries.md", "grog.md"]);
        l.select_next();
        assert_eq!(l.selected().map(|n| n.name.as_str()), Some("grog.md"));

        l.pop_filter_char();
        l.pop_filter_char();
        l.pop_filter_char();
        assert!(l.is_filtering());
        assert_eq!(visible_names(&l).len(), 3);

        l.clear_filter();
        assert!(!l.is_filtering());
    }

    #[test]
    fn refresh_clamps_selection() {
        let mut l = list(&["a.md", "b.md", "c.md"]);
        l.select_last();
        l.set_notes(summaries(&["a.md"]));
        assert_eq!(l.selected().map(|n| n.name.as_str()), Some("a.md"));
    }
}
