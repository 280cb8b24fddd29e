use crate::app::{AppState, Focus};
use crate::clock::{format_time, Phase, TOTAL_POMODOROS};
use crate::notes::{CellRef, NOTE_COLS, NOTE_ROWS};
use crate::status::{ColorTag, StatusCell, StatusGrid, COLUMN_TITLES};
use ratatui::{prelude::*, widgets::*};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub prework_color: Color,
    pub work_color: Color,
    pub revision_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

impl Theme {
    fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Prework => self.prework_color,
            Phase::Work => self.work_color,
            Phase::Revision => self.revision_color,
            Phase::Complete => self.accent_color,
        }
    }
}

pub fn get_theme(name: &str) -> Theme {
    match name {
        "nord" => Theme {
            prework_color: Color::Rgb(235, 203, 139),
            work_color: Color::Rgb(136, 192, 255),
            revision_color: Color::Rgb(163, 190, 140),
            border_color: Color::Rgb(100, 200, 255),
            accent_color: Color::Rgb(255, 100, 255),
        },
        "dracula" => Theme {
            prework_color: Color::Rgb(241, 250, 140),
            work_color: Color::Rgb(189, 147, 249),
            revision_color: Color::Rgb(80, 250, 123),
            border_color: Color::Rgb(200, 100, 255),
            accent_color: Color::Rgb(255, 0, 255),
        },
        "gruvbox" => Theme {
            prework_color: Color::Rgb(250, 189, 47),
            work_color: Color::Rgb(254, 128, 25),
            revision_color: Color::Rgb(184, 187, 38),
            border_color: Color::Rgb(255, 200, 100),
            accent_color: Color::Rgb(255, 150, 0),
        },
        "solarized" => Theme {
            prework_color: Color::Rgb(181, 137, 0),
            work_color: Color::Rgb(42, 161, 152),
            revision_color: Color::Rgb(133, 153, 0),
            border_color: Color::Rgb(100, 200, 255),
            accent_color: Color::Rgb(255, 200, 0),
        },
        _ => Theme {
            prework_color: Color::Rgb(255, 200, 80),
            work_color: Color::Rgb(100, 181, 246),
            revision_color: Color::Rgb(0, 255, 150),
            border_color: Color::Rgb(0, 200, 255),
            accent_color: Color::Rgb(255, 100, 0),
        },
    }
}

// ============================================================================
// UI Rendering
// ============================================================================

pub fn render_ui(f: &mut Frame, app: &AppState) {
    if app.minimized {
        render_minimized(f, app);
        return;
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(f.size());

    render_timer(f, app, panes[0]);

    let notes_height = notes_row_heights(app).iter().sum::<u16>() + 2;
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(notes_height), Constraint::Min(TOTAL_POMODOROS as u16 + 3)])
        .split(panes[1]);

    render_notes(f, app, right[0]);
    render_status(f, app, right[1]);

    if app.show_help {
        render_help(f, app);
    }
}

fn pane_block<'a>(title: &'a str, focused: bool, app: &AppState) -> Block<'a> {
    let color = if focused { app.theme.accent_color } else { app.theme.border_color };
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn status_line(app: &AppState) -> (String, Color) {
    if app.session.running {
        ("▶ RUNNING".into(), Color::Green)
    } else {
        ("⏸ PAUSED".into(), Color::Yellow)
    }
}

fn render_minimized(f: &mut Frame, app: &AppState) {
    let area = centered_rect(40, 30, f.size());
    let color = app.theme.phase_color(app.session.phase);
    let (status, status_color) = status_line(app);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(app.session.phase.name(), Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            format_time(app.session.seconds_remaining),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(status, Style::default().fg(status_color))),
        Line::from(""),
        Line::from(Span::styled("Press M to restore", Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))),
    ];

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(pane_block(" Pomodoro Timer ", false, app)),
        area,
    );
}

fn render_timer(f: &mut Frame, app: &AppState, area: Rect) {
    let session = &app.session;
    let color = app.theme.phase_color(session.phase);
    let block = pane_block(" Pomodoro Timer ", false, app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(2), Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(format_time(session.seconds_remaining))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[1],
    );

    f.render_widget(
        Paragraph::new(format!("Phase: {}", session.phase.name()))
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        sections[3],
    );

    f.render_widget(
        Paragraph::new(format!("Pomodoro Count: {} / {}", session.pomodoro_index, TOTAL_POMODOROS))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        sections[5],
    );

    let (status, status_color) = if session.is_complete() {
        ("All pomodoros completed!".to_string(), app.theme.accent_color)
    } else {
        status_line(app)
    };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[7],
    );

    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent((session.progress_ratio() * 100.0) as u16),
        sections[9],
    );

    let now = chrono::Local::now();
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(now.format("%A, %B %d, %Y").to_string(), Style::default().fg(Color::Gray))),
            Line::from(Span::styled(now.format("%I:%M %p").to_string(), Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center),
        sections[11],
    );

    let mut first = Vec::new();
    if !session.is_complete() {
        let label = if session.running { " Pause  •  " } else { " Resume  •  " };
        first.extend([span_key("Space", app), Span::raw(label)]);
    }
    first.extend([span_key("Tab", app), Span::raw(" Focus  •  "), span_key("M", app), Span::raw(" Minimize")]);
    let controls = vec![
        Line::from(first),
        Line::from(vec![span_key("H", app), Span::raw(" Help  •  "), span_key("Q", app), Span::raw(" Quit")]),
    ];
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center).style(Style::default().fg(Color::DarkGray)),
        sections[13],
    );
}

fn span_key<'a>(text: &'a str, app: &AppState) -> Span<'a> {
    Span::styled(text, Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD))
}

fn notes_row_heights(app: &AppState) -> [u16; NOTE_ROWS] {
    let mut heights = [1u16; NOTE_ROWS];
    for (row, height) in heights.iter_mut().enumerate() {
        for col in 0..NOTE_COLS {
            let lines = app.notes.lines(CellRef::new(row, col)).len() as u16;
            *height = (*height).max(lines);
        }
    }
    heights
}

fn note_cell<'a>(app: &'a AppState, at: CellRef) -> Cell<'a> {
    let editing = app.notes.is_editing(at);
    let selected = app.focus == Focus::Notes && app.notes_cursor == at;

    let mut lines: Vec<Line> = app.notes.lines(at).into_iter().map(Line::from).collect();
    if editing {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("█", Style::default().fg(Color::Green)));
        }
    }

    let style = if editing {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    Cell::from(Text::from(lines)).style(style)
}

fn render_notes(f: &mut Frame, app: &AppState, area: Rect) {
    let heights = notes_row_heights(app);
    let rows = (0..NOTE_ROWS).map(|row| {
        Row::new((0..NOTE_COLS).map(|col| note_cell(app, CellRef::new(row, col)))).height(heights[row])
    });

    let table = Table::new(rows, [Constraint::Ratio(1, NOTE_COLS as u32); NOTE_COLS])
        .column_spacing(1)
        .block(pane_block(" Notes ", app.focus == Focus::Notes, app));
    f.render_widget(table, area);
}

pub fn checkbox_glyph(cell: StatusCell, locked: bool) -> &'static str {
    match (locked, cell.checked) {
        (true, _) => "[-]",
        (false, true) => "[x]",
        (false, false) => "[ ]",
    }
}

pub fn status_cell_style(cell: StatusCell, locked: bool, selected: bool) -> Style {
    let mut style = match cell.color {
        ColorTag::None => Style::default(),
        ColorTag::Red => Style::default().bg(Color::Red).fg(Color::White),
        ColorTag::Green => Style::default().bg(Color::Green).fg(Color::Black),
    };
    if locked {
        style = style.fg(Color::DarkGray);
    }
    if selected {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    style
}

fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    let header = Row::new(std::iter::once("#").chain(COLUMN_TITLES))
        .style(Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD));

    let rows = app.status.rows().enumerate().map(|(row, cells)| {
        let locked = StatusGrid::is_locked(row, app.session.pomodoro_index);
        let number = Cell::from((row + 1).to_string()).style(Style::default().fg(Color::Gray));
        let checks = cells.iter().enumerate().map(move |(col, &cell)| {
            let selected = app.focus == Focus::Status && app.status_cursor == (row, col);
            Cell::from(checkbox_glyph(cell, locked)).style(status_cell_style(cell, locked, selected))
        });
        Row::new(std::iter::once(number).chain(checks))
    });

    let widths = [Constraint::Length(4), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(pane_block(" Status ", app.focus == Focus::Status, app));
    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, app: &AppState) {
    let area = centered_rect(60, 70, f.size());

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("KEYBOARD SHORTCUTS", Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Timer:"),
        help_line("Space", "Pause / resume"),
        help_line("M", "Minimize to compact view"),
        Line::from(""),
        Line::from("  Grids:"),
        help_line("Tab", "Switch between notes and status"),
        help_line("Arrows", "Move selection"),
        help_line("Enter / X", "Toggle status checkbox"),
        help_line("Enter / E", "Edit notes cell"),
        Line::from(""),
        Line::from("  While editing:"),
        help_line("Enter", "Save cell"),
        help_line("Shift/Alt+Enter, Ctrl+J", "Append next numbered line"),
        help_line("Esc / Tab", "Leave cell (saves)"),
        Line::from(""),
        Line::from("  General:"),
        help_line("H / ?", "Toggle help"),
        help_line("Q / Esc", "Quit"),
        help_line("Ctrl+C", "Force quit"),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(help_text).block(pane_block(" Help ", true, app)),
        area,
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}
