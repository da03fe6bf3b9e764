use std::path::PathBuf;

use log::warn;

use crate::size::MazeSize;

pub const STORE_ENV: &str = "DRAWMAZE_STORE";
pub const SIZE_ENV: &str = "DRAWMAZE_SIZE";
pub const FPS_ENV: &str = "DRAWMAZE_FPS";
pub const LOG_ENV: &str = "DRAWMAZE_LOG";

pub const DEFAULT_FPS: u64 = 60;
pub const STORE_FILE: &str = ".drawmaze.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub store: PathBuf,
    pub size: MazeSize,
    pub fps: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: default_store_path(None),
            size: MazeSize::DEFAULT,
            fps: DEFAULT_FPS,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let store = lookup(STORE_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_store_path(lookup("HOME")));
        let size = lookup(SIZE_ENV)
            .and_then(|v| match v.parse::<MazeSize>() {
                Ok(size) => Some(size),
                Err(err) => {
                    warn!("ignoring {SIZE_ENV}={v}: {err}");
                    None
                }
            })
            .unwrap_or(MazeSize::DEFAULT);
        let fps = lookup(FPS_ENV)
            .and_then(|v| match v.trim().parse::<u64>() {
                Ok(fps) if fps > 0 => Some(fps),
                _ => {
                    warn!("ignoring {FPS_ENV}={v}");
                    None
                }
            })
            .unwrap_or(DEFAULT_FPS);
        let log_file = lookup(LOG_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            store,
            size,
            fps,
            log_file,
        }
    }

    pub fn frame_time(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / self.fps.max(1))
    }
}

fn default_store_path(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(STORE_FILE),
        None => PathBuf::from(STORE_FILE.trim_start_matches('.')),
    }
}
