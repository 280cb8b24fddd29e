use serde::Deserialize;
use std::{fs, io, path::{Path, PathBuf}};

pub const APP_DIR: &str = "pomogrid";
pub const THEMES: &[&str] = &["default", "nord", "dracula", "gruvbox", "solarized"];

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    pub assets_dir: PathBuf,
    pub short_cue: String,
    pub long_cue: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            sound_enabled: true,
            notifications_enabled: true,
            assets_dir: PathBuf::from("assets"),
            short_cue: "beeps.mp3".into(),
            long_cue: "beepl.mp3".into(),
        }
    }
}

impl Config {
    pub fn short_cue_path(&self) -> PathBuf {
        self.assets_dir.join(&self.short_cue)
    }

    pub fn long_cue_path(&self) -> PathBuf {
        self.assets_dir.join(&self.long_cue)
    }

    /// Missing file gives defaults; a file that doesn't parse logs a warning
    /// and also gives defaults.
    pub fn load(path: &Path) -> Self {
        match read_json::<Config>(path) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }
}

pub fn app_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(".");
    path.push(APP_DIR);
    path.push(filename);
    path
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> io::Result<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}
