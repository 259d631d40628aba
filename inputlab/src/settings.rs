use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SettingsError;

/// Most polls the host can run before one simulation frame is processed.
pub const MAX_POLLS_PER_FRAME: u32 = 32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollingSettings {
    pub polls_per_frame: u32,
    /// Length of the host's pad queue; `qwrite`/`qread` cycle through `0..queue_len`.
    pub queue_len: u8,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            polls_per_frame: 8,
            queue_len: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistorySettings {
    pub action_capacity: usize,
    pub display_rows: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            action_capacity: 64,
            display_rows: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingSettings {
    /// Frames within which a repeated input of a plinkable action counts as one attempt.
    pub plink_window: u32,
    /// Frames an attack stays usable as a base after it ends.
    pub act_out_window: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            plink_window: 3,
            act_out_window: 3,
        }
    }
}

/// Numeric thresholds of the host game's input handling. Stick values are in engine
/// units (`[-1, 1]`), angles in radians, windows in frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub stick_hold_threshold_x: f32,
    pub stick_hold_threshold_y: f32,
    pub x_smash_threshold: f32,
    pub x_smash_frames: u32,
    pub y_smash_threshold: f32,
    pub y_smash_frames: u32,
    pub usmash_threshold: f32,
    pub dsmash_threshold: f32,
    pub ftilt_threshold: f32,
    pub utilt_threshold: f32,
    pub dtilt_threshold: f32,
    pub run_threshold: f32,
    pub squat_threshold: f32,
    pub max_squatwait_threshold: f32,
    pub x_special_threshold: f32,
    pub y_special_threshold: f32,
    pub aerial_threshold_x: f32,
    pub aerial_threshold_y: f32,
    pub angle_50d: f32,
    pub ledge_deadzone: f32,
    pub ledge_attack_cstick_threshold: f32,
    pub ledge_roll_cstick_threshold: f32,
    pub lr_deadzone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            stick_hold_threshold_x: 0.2875,
            stick_hold_threshold_y: 0.2875,
            x_smash_threshold: 0.8,
            x_smash_frames: 2,
            y_smash_threshold: 0.6625,
            y_smash_frames: 2,
            usmash_threshold: 0.6625,
            dsmash_threshold: -0.6625,
            ftilt_threshold: 0.25,
            utilt_threshold: 0.2875,
            dtilt_threshold: -0.2875,
            run_threshold: 0.62,
            squat_threshold: 0.6875,
            max_squatwait_threshold: 0.6125,
            x_special_threshold: 0.2875,
            y_special_threshold: 0.5375,
            aerial_threshold_x: 0.2875,
            aerial_threshold_y: 0.2875,
            angle_50d: 50.0_f32.to_radians(),
            ledge_deadzone: 0.2875,
            ledge_attack_cstick_threshold: 0.7,
            ledge_roll_cstick_threshold: 0.7,
            lr_deadzone: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub tuning: Tuning,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            polling: PollingSettings::default(),
            history: HistorySettings::default(),
            timing: TimingSettings::default(),
            tuning: Tuning::default(),
        }
    }
}

impl TrackerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.polling.polls_per_frame = self.polling.polls_per_frame.clamp(1, MAX_POLLS_PER_FRAME);
        self.polling.queue_len = self.polling.queue_len.max(1);
        self.history.action_capacity = self.history.action_capacity.max(1);
        self
    }

    /// Per-port poll history size: enough for a full pad queue at the maximum poll rate.
    pub fn poll_capacity(&self) -> usize {
        MAX_POLLS_PER_FRAME as usize * usize::from(self.polling.queue_len.max(1))
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("INPUTLAB_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("inputlab");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> TrackerSettings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return TrackerSettings::default(),
        };
        match serde_json::from_slice::<TrackerSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unparsable settings");
                TrackerSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &TrackerSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
