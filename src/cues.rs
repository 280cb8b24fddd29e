use crate::clock::{Cue, SessionState, TOTAL_POMODOROS};
use crate::config::Config;
use notify_rust::{Notification, Urgency};
use rodio::{source::SineWave, Decoder, OutputStream, Sink, Source};
use std::{fs::File, io::BufReader, path::{Path, PathBuf}, thread, time::Duration};

type BoxError = Box<dyn std::error::Error>;

/// Fire-and-forget audio cues plus the desktop notification on phase changes.
pub struct CuePlayer {
    short: PathBuf,
    long: PathBuf,
    sound: bool,
    notifications: bool,
}

impl CuePlayer {
    pub fn new(config: &Config) -> Self {
        Self {
            short: config.short_cue_path(),
            long: config.long_cue_path(),
            sound: config.sound_enabled,
            notifications: config.notifications_enabled,
        }
    }

    pub fn fire(&self, cue: Cue, state: &SessionState) {
        if cue == Cue::Long && self.notifications {
            notify(state);
        }
        if !self.sound {
            return;
        }

        let path = match cue {
            Cue::Short => self.short.clone(),
            Cue::Long => self.long.clone(),
        };
        let spawned = thread::Builder::new()
            .name("cue".into())
            .spawn(move || {
                if let Err(e) = play(&path, cue) {
                    log::debug!("cue {:?} not played: {}", cue, e);
                }
            });
        if let Err(e) = spawned {
            log::debug!("cue thread not started: {}", e);
        }
    }
}

fn tone_length(cue: Cue) -> Duration {
    match cue {
        Cue::Short => Duration::from_millis(150),
        Cue::Long => Duration::from_millis(900),
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, BoxError> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

fn play(path: &Path, cue: Cue) -> Result<(), BoxError> {
    let (_stream, handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&handle)?;

    match decode(path) {
        Ok(source) => sink.append(source),
        Err(e) => {
            log::debug!("falling back to tone for {}: {}", path.display(), e);
            sink.append(SineWave::new(880.0).take_duration(tone_length(cue)).amplify(0.2));
        }
    }

    sink.sleep_until_end();
    Ok(())
}

fn notify(state: &SessionState) {
    let body = if state.is_complete() {
        "All pomodoros completed!".to_string()
    } else {
        format!("Pomodoro {} / {}", state.pomodoro_index, TOTAL_POMODOROS)
    };
    let _ = Notification::new()
        .summary(&format!("{} time", state.phase.name()))
        .body(&body)
        .appname("pomogrid")
        .icon("alarm-clock")
        .urgency(Urgency::Normal)
        .show();
}
