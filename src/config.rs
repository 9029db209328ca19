//! Key/value settings consumed by the orchestrator.
//!
//! Settings are a flat map of string keys to typed values. Every key the
//! runtime reads has a default, so a freshly constructed store is usable
//! as-is; the binary layers command-line flags and `--set key=value`
//! overrides on top.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::NOTIFICATION_DEFAULT_SECS;

pub const SCREENSAVER_TIME: &str = "ScreenSaverTime";
pub const SCREENSAVER_BEHAVIOR: &str = "ScreenSaverBehavior";
pub const SCREENSAVER_CONTROLS: &str = "ScreenSaverControls";
pub const DRAW_FRAMERATE: &str = "DrawFramerate";
pub const DRAW_CLOCK: &str = "DrawClock";
pub const DRAW_LOG: &str = "DrawLog";
pub const SHOW_CONTROLLER_ACTIVITY: &str = "ShowControllerActivity";
pub const DISPLAY_TITLES: &str = "audio.display_titles";
pub const DISPLAY_TITLES_TIME: &str = "audio.display_titles_time";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown screensaver behavior: {0:?}")]
    UnknownBehavior(String),
    #[error("malformed override {0:?}, expected key=value")]
    MalformedOverride(String),
    #[error("setting {key} expects {expected}, got {value:?}")]
    WrongType {
        key: String,
        expected: &'static str,
        value: String,
    },
}

/// What the screensaver shows once the idle threshold is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenSaverBehavior {
    #[default]
    Dim,
    Black,
    Slideshow,
    RandomVideo,
}

impl ScreenSaverBehavior {
    /// Slideshow-like modes let directional input step through items
    /// instead of waking up.
    pub fn is_browsable(self) -> bool {
        matches!(self, Self::Slideshow | Self::RandomVideo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dim => "dim",
            Self::Black => "black",
            Self::Slideshow => "slideshow",
            Self::RandomVideo => "random video",
        }
    }
}

impl fmt::Display for ScreenSaverBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenSaverBehavior {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dim" => Ok(Self::Dim),
            "black" => Ok(Self::Black),
            "slideshow" => Ok(Self::Slideshow),
            "random video" | "random-video" => Ok(Self::RandomVideo),
            _ => Err(SettingsError::UnknownBehavior(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            values: BTreeMap::new(),
        };
        settings.set_int(SCREENSAVER_TIME, 5 * 60 * 1000);
        settings.set_string(SCREENSAVER_BEHAVIOR, ScreenSaverBehavior::Dim.as_str());
        settings.set_bool(SCREENSAVER_CONTROLS, true);
        settings.set_bool(DRAW_FRAMERATE, false);
        settings.set_bool(DRAW_CLOCK, true);
        settings.set_bool(DRAW_LOG, false);
        settings.set_bool(SHOW_CONTROLLER_ACTIVITY, true);
        settings.set_bool(DISPLAY_TITLES, true);
        settings.set_int(DISPLAY_TITLES_TIME, NOTIFICATION_DEFAULT_SECS);
        settings
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(SettingValue::Bool(true)))
    }

    pub fn get_int(&self, key: &str) -> i64 {
        match self.values.get(key) {
            Some(SettingValue::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn get_string(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(SettingValue::Text(v)) => v.as_str(),
            _ => "",
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), SettingValue::Bool(value));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), SettingValue::Int(value));
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_string(), SettingValue::Text(value.into()));
    }

    pub fn toggle(&mut self, key: &str) -> bool {
        let next = !self.get_bool(key);
        self.set_bool(key, next);
        next
    }

    /// Idle threshold in milliseconds; 0 disables the screensaver.
    pub fn screensaver_time_ms(&self) -> u64 {
        self.get_int(SCREENSAVER_TIME).max(0) as u64
    }

    /// Unknown strings fall back to `Dim` so a bad value never disables
    /// the screensaver outright.
    pub fn screensaver_behavior(&self) -> ScreenSaverBehavior {
        self.get_string(SCREENSAVER_BEHAVIOR)
            .parse()
            .unwrap_or_default()
    }

    /// Apply a `key=value` override. The value's type follows the type of
    /// the existing entry; unknown keys are stored as booleans, integers or
    /// text depending on how the value parses.
    pub fn apply_override(&mut self, raw: &str) -> Result<(), SettingsError> {
        let (key, value) = raw
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| SettingsError::MalformedOverride(raw.to_string()))?;
        let wrong_type = |expected| SettingsError::WrongType {
            key: key.to_string(),
            expected,
            value: value.to_string(),
        };
        match self.values.get(key).cloned() {
            Some(SettingValue::Bool(_)) => {
                let parsed = parse_bool(value).ok_or_else(|| wrong_type("a boolean"))?;
                self.set_bool(key, parsed);
            }
            Some(SettingValue::Int(_)) => {
                let parsed = value.parse().map_err(|_| wrong_type("an integer"))?;
                self.set_int(key, parsed);
            }
            Some(SettingValue::Text(_)) => {
                if key == SCREENSAVER_BEHAVIOR {
                    value.parse::<ScreenSaverBehavior>()?;
                }
                self.set_string(key, value);
            }
            None => {
                if let Some(b) = parse_bool(value) {
                    self.set_bool(key, b);
                } else if let Ok(i) = value.parse() {
                    self.set_int(key, i);
                } else {
                    self.set_string(key, value);
                }
            }
        }
        tracing::debug!(key, value, "settings override applied");
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let s = Settings::new();
        assert_eq!(s.screensaver_time_ms(), 300_000);
        assert_eq!(s.screensaver_behavior(), ScreenSaverBehavior::Dim);
        assert!(s.get_bool(SCREENSAVER_CONTROLS));
        assert_eq!(s.get_int(DISPLAY_TITLES_TIME), 10);
    }

    #[test]
    fn override_follows_existing_type() {
        let mut s = Settings::new();
        s.apply_override("DrawFramerate=on").unwrap();
        assert!(s.get_bool(DRAW_FRAMERATE));
        s.apply_override("ScreenSaverTime = 0").unwrap();
        assert_eq!(s.screensaver_time_ms(), 0);
        let err = s.apply_override("ScreenSaverTime=soon").unwrap_err();
        assert!(matches!(err, SettingsError::WrongType { .. }));
    }

    #[test]
    fn override_rejects_bad_input() {
        let mut s = Settings::new();
        assert_eq!(
            s.apply_override("novalue"),
            Err(SettingsError::MalformedOverride("novalue".into()))
        );
        assert!(matches!(
            s.apply_override("ScreenSaverBehavior=fireworks"),
            Err(SettingsError::UnknownBehavior(_))
        ));
        s.apply_override("ScreenSaverBehavior=random video").unwrap();
        assert_eq!(s.screensaver_behavior(), ScreenSaverBehavior::RandomVideo);
    }

    #[test]
    fn toggle_flips_bool() {
        let mut s = Settings::new();
        assert!(s.toggle(DRAW_LOG));
        assert!(!s.toggle(DRAW_LOG));
    }
}
