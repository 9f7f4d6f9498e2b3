use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Tuning constants for the wheel. Defaults reproduce the stock feel of the picker.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Elastic overscroll past the first/last item, degrees.
    pub max_exceed: f64,
    /// Items further than this from the current angle are hidden, degrees.
    pub visible_range: f64,
    /// Used when the first item reports no height, px.
    pub default_item_height: f64,
    /// Share of an item's height used as the chord of one angular step.
    pub item_chord_ratio: f64,
    /// Finger travel is divided by this while dragging.
    pub drag_resistance: f64,
    /// px/ms²
    pub deceleration: f64,
    pub glide_damping: f64,
    /// Extra duration factor for an inertia glide that was cut at an elastic bound.
    pub overscroll_damping: f64,
    pub velocity_window_ms: f64,
    pub frame_rate: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub snap_transition: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub bound_transition: Duration,
    /// px
    pub perspective: f64,
    pub initial_index: usize,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            max_exceed: 10.0,
            visible_range: 90.0,
            default_item_height: 40.0,
            item_chord_ratio: 0.8,
            drag_resistance: 1.3,
            deceleration: 0.001,
            glide_damping: 6.0,
            overscroll_damping: 0.6,
            velocity_window_ms: 300.0,
            frame_rate: 60.0,
            snap_transition: Duration::from_millis(150),
            bound_transition: Duration::from_millis(300),
            perspective: 1000.0,
            initial_index: 0,
        }
    }
}

impl WheelConfig {
    /// Milliseconds between two animation frames.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("visible_range", self.visible_range),
            ("default_item_height", self.default_item_height),
            ("item_chord_ratio", self.item_chord_ratio),
            ("drag_resistance", self.drag_resistance),
            ("deceleration", self.deceleration),
            ("glide_damping", self.glide_damping),
            ("overscroll_damping", self.overscroll_damping),
            ("frame_rate", self.frame_rate),
            ("perspective", self.perspective),
        ];
        if let Some((field, value)) = positive
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v <= 0.0)
        {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("must be positive, got {value}"),
            });
        }

        let non_negative = [
            ("max_exceed", self.max_exceed),
            ("velocity_window_ms", self.velocity_window_ms),
        ];
        if let Some((field, value)) = non_negative
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("must not be negative, got {value}"),
            });
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "spindle", "spindle").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<WheelConfig, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("SPINDLE").try_parsing(true))
        .build()?;

    let config: WheelConfig = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_default() -> WheelConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default wheel config: {}", e);
            WheelConfig::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Whether a watcher event in the config directory should trigger a reload.
/// Reads and events on sibling files do not.
fn is_reload_event(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Sent by [`run_async_watcher`] whenever the config file changes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigReload;

pub async fn run_async_watcher<E: From<ConfigReload>>(tx: async_channel::Sender<E>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_reload_event(&event, &config_path)
                    && tx.send(E::from(ConfigReload)).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
