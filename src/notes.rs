use regex::Regex;
use std::sync::LazyLock;

pub const NOTE_ROWS: usize = 2;
pub const NOTE_COLS: usize = 4;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.").expect("static list marker regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Fixed grid of free-text cells, at most one of which is being edited.
///
/// Edits are written straight into the cell, so committing only clears
/// `editing`.
#[derive(Default)]
pub struct NotesGrid {
    cells: [[String; NOTE_COLS]; NOTE_ROWS],
    editing: Option<CellRef>,
}

impl NotesGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, at: CellRef) -> &str {
        self.cells
            .get(at.row)
            .and_then(|r| r.get(at.col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Display lines with explicit newlines kept.
    pub fn lines(&self, at: CellRef) -> Vec<&str> {
        self.text(at).split('\n').collect()
    }

    pub fn editing(&self) -> Option<CellRef> {
        self.editing
    }

    pub fn is_editing(&self, at: CellRef) -> bool {
        self.editing == Some(at)
    }

    pub fn begin_edit(&mut self, at: CellRef) -> bool {
        if at.row >= NOTE_ROWS || at.col >= NOTE_COLS {
            return false;
        }
        self.editing = Some(at);
        true
    }

    fn editing_text_mut(&mut self) -> Option<&mut String> {
        let at = self.editing?;
        Some(&mut self.cells[at.row][at.col])
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(text) = self.editing_text_mut() {
            text.push(c);
        }
    }

    pub fn insert_str(&mut self, s: &str) {
        if let Some(text) = self.editing_text_mut() {
            text.push_str(s);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.editing_text_mut() {
            text.pop();
        }
    }

    /// Leaves edit mode. Returns the cell that was being edited.
    pub fn commit(&mut self) -> Option<CellRef> {
        self.editing.take()
    }

    /// Confirm key. With a modifier held this appends the next list marker
    /// and stays in edit mode; without one it commits.
    pub fn confirm(&mut self, with_modifier: bool) -> Option<CellRef> {
        if with_modifier {
            self.auto_number();
            None
        } else {
            self.commit()
        }
    }

    fn auto_number(&mut self) {
        if let Some(text) = self.editing_text_mut() {
            let next = next_list_number(text);
            *text = format!("{}\n{}. ", text.trim(), next);
        }
    }
}

/// The number after the `N.` marker on the last line, or 1 without one.
pub fn next_list_number(text: &str) -> u64 {
    let last = text.rsplit('\n').next().unwrap_or("");
    LIST_MARKER
        .captures(last)
        .and_then(|c| c[1].parse::<u64>().ok())
        .map_or(1, |n| n.saturating_add(1))
}
