mod app;
mod clock;
mod config;
mod cues;
mod notes;
mod status;
mod ui;

use app::{handle_input, AppState};
use clap::Parser;
use config::{app_path, Config, THEMES};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use cues::CuePlayer;
use ratatui::prelude::*;
use std::{fs, io, path::PathBuf, time::{Duration, Instant}};

// ============================================================================
// Type Aliases & Constants
// ============================================================================

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
const TICK_PERIOD: Duration = Duration::from_secs(1);
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "pomogrid - prework, work and revision in twenty pomodoros")]
struct Args {
    #[arg(short = 't', long)]
    theme: Option<String>,
    #[arg(long)]
    no_sound: bool,
    #[arg(long)]
    no_notify: bool,
    /// Directory holding the short and long cue sounds
    #[arg(short, long)]
    assets: Option<PathBuf>,
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Config {
        let path = self.config.unwrap_or_else(|| app_path("config.json"));
        let mut config = Config::load(&path);
        if let Some(t) = self.theme { config.theme = t; }
        if let Some(a) = self.assets { config.assets_dir = a; }
        if self.no_sound { config.sound_enabled = false; }
        if self.no_notify { config.notifications_enabled = false; }
        config
    }
}

// ============================================================================
// Logging
// ============================================================================

/// The terminal belongs to the UI, so logs only ever go to a file.
fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file {
        Some(p) => p,
        None if std::env::var_os("RUST_LOG").is_some() => app_path("pomogrid.log"),
        None => return Ok(()),
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;

    let config = args.into_config();
    if !THEMES.contains(&config.theme.as_str()) {
        log::warn!("unknown theme {:?}, using default", config.theme);
    }
    log::info!(
        "starting: theme={} sound={} notifications={} assets={}",
        config.theme,
        config.sound_enabled,
        config.notifications_enabled,
        config.assets_dir.display()
    );

    let mut app = AppState::new(&config);
    let cues = CuePlayer::new(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    // Legacy terminals send Shift+Enter as a bare CR, indistinguishable from Enter.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES))?;
    }
    log::info!("keyboard enhancement {}", if enhanced { "enabled" } else { "unavailable" });
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app, &cues);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    log::info!("exiting at {}", app.session.title());
    res
}

/// Arms, keeps or disarms the one-second deadline. Resuming starts a fresh
/// period rather than finishing the paused one.
fn next_deadline(armed: bool, current: Option<Instant>, now: Instant) -> Option<Instant> {
    match (armed, current) {
        (true, None) => Some(now + TICK_PERIOD),
        (true, Some(deadline)) => Some(deadline),
        (false, _) => None,
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState, cues: &CuePlayer) -> Result<()> {
    let mut next_tick = app.timer_armed().then(|| Instant::now() + TICK_PERIOD);
    let mut title = String::new();

    loop {
        let current = app.session.title();
        if current != title {
            execute!(terminal.backend_mut(), SetTitle(&current))?;
            title = current;
        }
        terminal.draw(|f| ui::render_ui(f, app))?;

        let timeout = next_tick
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(REDRAW_INTERVAL, |left| left.min(REDRAW_INTERVAL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_input(key, app) {
                        return Ok(());
                    }
                }
                Event::Paste(text) => app.paste(&text),
                _ => {}
            }
        }

        next_tick = next_deadline(app.timer_armed(), next_tick, Instant::now());

        if let Some(deadline) = next_tick {
            if Instant::now() >= deadline {
                for cue in app.tick() {
                    cues.fire(cue, &app.session);
                }
                next_tick = app.timer_armed().then(|| deadline + TICK_PERIOD);
            }
        }
    }
}
