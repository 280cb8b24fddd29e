//! Session clock: countdown, phase sequencing and pomodoro counting.
//!
//! The clock is a plain value plus a transition function. The run loop owns
//! the one-second timer and feeds [`ClockEvent`]s into [`step`]; everything
//! observable (cues, expired status cells) comes back in the [`Step`].

// ============================================================================
// Constants
// ============================================================================

pub const PRE_WORK_DURATION: i64 = 3 * 60;
pub const WORK_DURATION: i64 = 24 * 60;
pub const REVISION_DURATION: i64 = 3 * 60;
pub const TOTAL_POMODOROS: usize = 20;

// ============================================================================
// Data Models
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Prework,
    Work,
    Revision,
    Complete,
}

impl Phase {
    /// Capitalized label used in the countdown header and the window title.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prework => "Prework",
            Self::Work => "Work",
            Self::Revision => "Revision",
            Self::Complete => "Complete",
        }
    }

    pub fn duration(&self) -> i64 {
        match self {
            Self::Prework => PRE_WORK_DURATION,
            Self::Work => WORK_DURATION,
            Self::Revision => REVISION_DURATION,
            Self::Complete => 0,
        }
    }

    /// Status grid column tracking this phase.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Prework => Some(0),
            Self::Work => Some(1),
            Self::Revision => Some(2),
            Self::Complete => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Once per elapsed minute of work.
    Short,
    /// Every phase transition.
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub seconds_remaining: i64,
    pub phase: Phase,
    /// 1-based, in `1..=TOTAL_POMODOROS`.
    pub pomodoro_index: usize,
    pub running: bool,
}

impl SessionState {
    pub fn start() -> Self {
        Self {
            seconds_remaining: PRE_WORK_DURATION,
            phase: Phase::Prework,
            pomodoro_index: 1,
            running: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn progress_ratio(&self) -> f64 {
        let total = self.phase.duration();
        if total == 0 {
            return 1.0;
        }
        let remaining = self.seconds_remaining.max(0) as f64;
        (1.0 - remaining / total as f64).clamp(0.0, 1.0)
    }

    /// `MM:SS - Phase`
    pub fn title(&self) -> String {
        format!("{} - {}", format_time(self.seconds_remaining), self.phase.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    Tick,
    Pause,
    Resume,
}

/// The phase that ran out, addressed by status grid row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expired {
    pub row: usize,
    pub col: usize,
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub state: SessionState,
    pub cues: Vec<Cue>,
    pub expired: Option<Expired>,
}

impl Step {
    fn unchanged(state: SessionState) -> Self {
        Self { state, cues: Vec::new(), expired: None }
    }
}

// ============================================================================
// Transitions
// ============================================================================

pub fn step(state: SessionState, event: ClockEvent) -> Step {
    match event {
        ClockEvent::Pause => Step::unchanged(SessionState { running: false, ..state }),
        ClockEvent::Resume => Step::unchanged(SessionState { running: true, ..state }),
        ClockEvent::Tick => tick(state),
    }
}

fn tick(state: SessionState) -> Step {
    if !state.running || state.is_complete() {
        return Step::unchanged(state);
    }

    let mut next = SessionState { seconds_remaining: state.seconds_remaining - 1, ..state };
    let mut cues = Vec::new();
    let mut expired = None;

    if next.seconds_remaining < 0 {
        let row = next.pomodoro_index - 1;
        if let Some(col) = next.phase.column() {
            expired = Some(Expired { row, col, phase: next.phase });
        }
        cues.push(Cue::Long);

        next.phase = match next.phase {
            Phase::Prework => Phase::Work,
            Phase::Work => Phase::Revision,
            Phase::Revision if next.pomodoro_index < TOTAL_POMODOROS => {
                next.pomodoro_index += 1;
                Phase::Prework
            }
            Phase::Revision | Phase::Complete => Phase::Complete,
        };
        next.seconds_remaining = next.phase.duration();
    }

    if next.phase == Phase::Work && next.seconds_remaining % 60 == 59 {
        cues.push(Cue::Short);
    }

    Step { state: next, cues, expired }
}

// ============================================================================
// Formatting
// ============================================================================

/// Zero-padded `MM:SS`. Negative values render as `00:00`.
pub fn format_time(seconds: i64) -> String {
    let secs = seconds.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
