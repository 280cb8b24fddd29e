use crate::clock::{self, ClockEvent, Cue, SessionState, TOTAL_POMODOROS};
use crate::config::Config;
use crate::notes::{CellRef, NotesGrid, NOTE_COLS, NOTE_ROWS};
use crate::status::{StatusGrid, STATUS_COLUMNS};
use crate::ui::{get_theme, Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Focus {
    Notes,
    Status,
}

impl Focus {
    fn other(self) -> Self {
        match self {
            Self::Notes => Self::Status,
            Self::Status => Self::Notes,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub session: SessionState,
    pub status: StatusGrid,
    pub notes: NotesGrid,
    pub focus: Focus,
    pub notes_cursor: CellRef,
    pub status_cursor: (usize, usize),
    pub theme: Theme,
    pub show_help: bool,
    pub minimized: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            session: SessionState::start(),
            status: StatusGrid::new(),
            notes: NotesGrid::new(),
            focus: Focus::Status,
            notes_cursor: CellRef::new(0, 0),
            status_cursor: (0, 0),
            theme: get_theme(&config.theme),
            show_help: false,
            minimized: false,
        }
    }

    /// Whether the one-second timer should be armed.
    pub fn timer_armed(&self) -> bool {
        self.session.running && !self.session.is_complete()
    }

    pub fn tick(&mut self) -> Vec<Cue> {
        self.apply(ClockEvent::Tick)
    }

    fn apply(&mut self, event: ClockEvent) -> Vec<Cue> {
        let step = clock::step(self.session, event);
        if let Some(expired) = step.expired {
            self.status.mark_expired(expired);
            log::info!(
                "pomodoro {}: {} finished, now {}",
                expired.row + 1,
                expired.phase.name(),
                step.state.phase.name()
            );
        }
        self.session = step.state;
        step.cues
    }

    pub fn toggle_pause(&mut self) {
        if self.session.is_complete() {
            return;
        }
        let event = if self.session.running { ClockEvent::Pause } else { ClockEvent::Resume };
        self.apply(event);
        log::info!("{} at {}", if self.session.running { "resumed" } else { "paused" }, self.session.title());
    }

    pub fn toggle_selected_status(&mut self) -> bool {
        let (row, col) = self.status_cursor;
        let accepted = self.status.toggle(row, col, self.session.pomodoro_index);
        if accepted {
            log::debug!("status ({}, {}) toggled to {:?}", row, col, self.status.cell(row, col));
        } else {
            log::debug!("status ({}, {}) is locked", row, col);
        }
        accepted
    }

    /// Pasted text lands in the cell being edited, newlines included.
    /// Terminals may deliver line breaks as CR or CRLF.
    pub fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.notes.insert_str(&text);
    }

    fn commit_note(&mut self) {
        if let Some(cell) = self.notes.commit() {
            log::debug!("note ({}, {}) committed, {} bytes", cell.row, cell.col, self.notes.text(cell).len());
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        match self.focus {
            Focus::Notes => {
                let c = &mut self.notes_cursor;
                c.row = step_index(c.row, d_row, NOTE_ROWS);
                c.col = step_index(c.col, d_col, NOTE_COLS);
            }
            Focus::Status => {
                let (row, col) = self.status_cursor;
                self.status_cursor = (
                    step_index(row, d_row, TOTAL_POMODOROS),
                    step_index(col, d_col, STATUS_COLUMNS),
                );
            }
        }
    }
}

fn step_index(value: usize, delta: isize, len: usize) -> usize {
    value.saturating_add_signed(delta).min(len - 1)
}

// ============================================================================
// Event Handlers
// ============================================================================

/// Returns `true` when the app should quit.
pub fn handle_input(key: KeyEvent, app: &mut AppState) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if app.notes.editing().is_some() {
        handle_editing(key, app);
        return false;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return false;
    }

    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        return true;
    }

    if matches!(key.code, KeyCode::Char('m') | KeyCode::Char('M')) {
        app.minimized = !app.minimized;
        return false;
    }

    if app.minimized {
        if key.code == KeyCode::Char(' ') {
            app.toggle_pause();
        }
        return false;
    }

    match key.code {
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.other(),
        KeyCode::Up => app.move_cursor(-1, 0),
        KeyCode::Down => app.move_cursor(1, 0),
        KeyCode::Left => app.move_cursor(0, -1),
        KeyCode::Right => app.move_cursor(0, 1),
        KeyCode::Enter | KeyCode::Char('x') if app.focus == Focus::Status => {
            app.toggle_selected_status();
        }
        KeyCode::Enter | KeyCode::Char('e') if app.focus == Focus::Notes => {
            app.notes.begin_edit(app.notes_cursor);
        }
        _ => {}
    }

    false
}

fn handle_editing(key: KeyEvent, app: &mut AppState) {
    let modified = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            if modified {
                app.notes.confirm(true);
            } else {
                app.commit_note();
            }
        }
        // Many terminals report Ctrl+Enter as Ctrl+J.
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.notes.confirm(true);
        }
        KeyCode::Esc => app.commit_note(),
        KeyCode::Tab | KeyCode::BackTab => {
            app.commit_note();
            app.focus = app.focus.other();
        }
        KeyCode::Backspace => app.notes.backspace(),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.notes.insert_char(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Phase, PRE_WORK_DURATION, WORK_DURATION};
    use crate::status::{ColorTag, StatusCell};

    fn app() -> AppState {
        AppState::new(&Config::default())
    }

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_input(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn press_with(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> bool {
        handle_input(KeyEvent::new(code, modifiers), app)
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn prework_rollover_marks_status_red() {
        let mut app = app();
        let mut cues = Vec::new();
        for _ in 0..=PRE_WORK_DURATION {
            cues.extend(app.tick());
        }
        assert_eq!(app.session.phase, Phase::Work);
        assert_eq!(app.session.seconds_remaining, WORK_DURATION);
        assert_eq!(app.status.cell(0, 0).map(|c| c.color), Some(ColorTag::Red));
        assert_eq!(cues, vec![Cue::Long]);
    }

    #[test]
    fn space_pauses_and_resumes() {
        let mut app = app();
        app.tick();
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session.running);
        assert!(!app.timer_armed());
        let frozen = app.session;
        for _ in 0..10 {
            assert!(app.tick().is_empty());
        }
        assert_eq!(app.session, frozen);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.running);
        assert_eq!(app.session.seconds_remaining, PRE_WORK_DURATION - 1);
    }

    #[test]
    fn pause_is_ignored_once_complete() {
        let mut app = app();
        app.session = SessionState { phase: Phase::Complete, seconds_remaining: 0, pomodoro_index: TOTAL_POMODOROS, running: true };
        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.running);
        assert!(!app.timer_armed());
    }

    #[test]
    fn status_toggle_respects_row_lock() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status.cell(0, 1), Some(StatusCell { checked: true, color: ColorTag::Green }));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.status.cell(1, 1), Some(StatusCell::default()));
    }

    #[test]
    fn status_cursor_stays_in_bounds() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.status_cursor, (0, 0));
        for _ in 0..30 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.status_cursor, (TOTAL_POMODOROS - 1, STATUS_COLUMNS - 1));
    }

    #[test]
    fn notes_auto_number_through_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Notes);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notes.editing(), Some(CellRef::new(0, 0)));

        type_str(&mut app, "1. abc");
        press_with(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "1. abc\n2. ");
        assert!(app.notes.editing().is_some());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notes.editing(), None);
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "1. abc\n2. ");
    }

    #[test]
    fn ctrl_j_auto_numbers() {
        let mut app = app();
        app.focus = Focus::Notes;
        press(&mut app, KeyCode::Char('e'));
        type_str(&mut app, "4. x");
        press_with(&mut app, KeyCode::Char('j'), KeyModifiers::CONTROL);
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "4. x\n5. ");
    }

    #[test]
    fn editing_swallows_global_keys() {
        let mut app = app();
        app.focus = Focus::Notes;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert!(!press(&mut app, KeyCode::Char('q')));
        type_str(&mut app, " m");
        assert!(app.session.running);
        assert!(!app.minimized);
        assert_eq!(app.notes.text(CellRef::new(0, 1)), "q m");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.notes.text(CellRef::new(0, 1)), "q ");
    }

    #[test]
    fn leaving_the_cell_commits() {
        let mut app = app();
        app.focus = Focus::Notes;
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.notes.editing(), None);
        assert_eq!(app.focus, Focus::Status);
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "draft");

        app.focus = Focus::Notes;
        press(&mut app, KeyCode::Enter);
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.notes.editing(), None);
    }

    #[test]
    fn paste_only_reaches_an_editing_cell() {
        let mut app = app();
        app.paste("ignored");
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "");
        app.focus = Focus::Notes;
        press(&mut app, KeyCode::Enter);
        app.paste("1. a\n2. b");
        press_with(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "1. a\n2. b\n3. ");
    }

    #[test]
    fn pasted_carriage_returns_become_line_breaks() {
        let mut app = app();
        app.focus = Focus::Notes;
        press(&mut app, KeyCode::Enter);
        app.paste("1. a\r2. b");
        press_with(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        let cell = CellRef::new(0, 0);
        assert_eq!(app.notes.text(cell), "1. a\n2. b\n3. ");
        app.paste("x\r\ny");
        assert_eq!(app.notes.lines(cell), vec!["1. a", "2. b", "3. x", "y"]);
    }

    #[test]
    fn h_opens_help() {
        let mut app = app();
        press(&mut app, KeyCode::Char('h'));
        assert!(app.show_help);
        assert!(!press(&mut app, KeyCode::Char('h')));
        assert!(!app.show_help);
    }

    #[test]
    fn backtab_switches_focus_and_commits_edits() {
        let mut app = app();
        press_with(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.focus, Focus::Notes);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "kept");
        press_with(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.focus, Focus::Status);
        assert_eq!(app.notes.editing(), None);
        assert_eq!(app.notes.text(CellRef::new(0, 0)), "kept");
    }

    #[test]
    fn quit_keys() {
        assert!(press(&mut app(), KeyCode::Char('q')));
        assert!(press(&mut app(), KeyCode::Esc));
        assert!(press_with(&mut app(), KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn help_overlay_closes_without_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(!app.show_help);
    }

    #[test]
    fn minimized_view_still_pauses() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.minimized);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Status);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session.running);
        press(&mut app, KeyCode::Char('m'));
        assert!(!app.minimized);
    }
}
