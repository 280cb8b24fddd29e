use crate::clock::{Expired, TOTAL_POMODOROS};

pub const STATUS_COLUMNS: usize = 3;
pub const COLUMN_TITLES: [&str; STATUS_COLUMNS] = ["Prework", "Work", "Revision"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorTag {
    #[default]
    None,
    Red,
    Green,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCell {
    pub checked: bool,
    pub color: ColorTag,
}

/// One row per pomodoro, one column per timed phase.
pub struct StatusGrid {
    cells: [[StatusCell; STATUS_COLUMNS]; TOTAL_POMODOROS],
}

impl Default for StatusGrid {
    fn default() -> Self {
        Self { cells: [[StatusCell::default(); STATUS_COLUMNS]; TOTAL_POMODOROS] }
    }
}

impl StatusGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<StatusCell> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[StatusCell; STATUS_COLUMNS]> {
        self.cells.iter()
    }

    /// Rows of pomodoros that have not started yet cannot be toggled.
    pub fn is_locked(row: usize, pomodoro_index: usize) -> bool {
        row >= pomodoro_index
    }

    /// Flips the checkbox and syncs its color. Returns `false` when the row is
    /// locked or out of range, in which case nothing changes.
    pub fn toggle(&mut self, row: usize, col: usize, pomodoro_index: usize) -> bool {
        if Self::is_locked(row, pomodoro_index) {
            return false;
        }
        let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) else {
            return false;
        };
        cell.checked = !cell.checked;
        cell.color = if cell.checked { ColorTag::Green } else { ColorTag::Red };
        true
    }

    /// Rollover marks the finished phase red, overwriting whatever color a
    /// manual toggle left. The checkbox itself is untouched.
    pub fn mark_expired(&mut self, expired: Expired) {
        if let Some(cell) = self.cells.get_mut(expired.row).and_then(|r| r.get_mut(expired.col)) {
            cell.color = ColorTag::Red;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Phase;

    #[test]
    fn starts_unchecked_and_uncolored() {
        let grid = StatusGrid::new();
        assert_eq!(grid.rows().count(), TOTAL_POMODOROS);
        assert!(grid.rows().flatten().all(|c| *c == StatusCell::default()));
    }

    #[test]
    fn toggle_on_current_row_syncs_color() {
        let mut grid = StatusGrid::new();
        assert!(grid.toggle(0, 1, 1));
        assert_eq!(grid.cell(0, 1), Some(StatusCell { checked: true, color: ColorTag::Green }));
        assert!(grid.toggle(0, 1, 1));
        assert_eq!(grid.cell(0, 1), Some(StatusCell { checked: false, color: ColorTag::Red }));
    }

    #[test]
    fn toggle_on_future_row_is_rejected() {
        let mut grid = StatusGrid::new();
        assert!(!grid.toggle(1, 0, 1));
        assert!(!grid.toggle(5, 2, 5));
        assert_eq!(grid.cell(1, 0), Some(StatusCell::default()));
        assert_eq!(grid.cell(5, 2), Some(StatusCell::default()));
        assert!(grid.toggle(4, 2, 5));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut grid = StatusGrid::new();
        assert!(!grid.toggle(0, STATUS_COLUMNS, TOTAL_POMODOROS));
        assert_eq!(grid.cell(TOTAL_POMODOROS, 0), None);
    }

    #[test]
    fn rollover_overwrites_manual_green() {
        let mut grid = StatusGrid::new();
        grid.toggle(0, 0, 1);
        grid.mark_expired(Expired { row: 0, col: 0, phase: Phase::Prework });
        assert_eq!(grid.cell(0, 0), Some(StatusCell { checked: true, color: ColorTag::Red }));
    }

    #[test]
    fn toggle_after_rollover_wins() {
        let mut grid = StatusGrid::new();
        grid.mark_expired(Expired { row: 0, col: 2, phase: Phase::Revision });
        grid.toggle(0, 2, 2);
        assert_eq!(grid.cell(0, 2), Some(StatusCell { checked: true, color: ColorTag::Green }));
    }

    #[test]
    fn lock_boundary_follows_pomodoro_index() {
        assert!(!StatusGrid::is_locked(0, 1));
        assert!(StatusGrid::is_locked(1, 1));
        assert!(!StatusGrid::is_locked(TOTAL_POMODOROS - 1, TOTAL_POMODOROS));
    }
}
