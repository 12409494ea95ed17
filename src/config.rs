//! # Configuration Management
//!
//! This module handles loading and saving the `status-clock.toml` file and
//! applying individual tuning keys to a [`DisplayConfig`]. Tuning keys are the
//! integer-coded settings a system settings screen hands over one at a time;
//! how they are stored and delivered is up to the environment.

use crate::display::{
    AmPmStyle, ClockPlacement, DateCase, DatePosition, DateVisibility, DisplayConfig,
    DEFAULT_DATE_PATTERN,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "status-clock.toml";

/// Errors from config files and tuning keys.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown tuning key \"{0}\"")]
    UnknownKey(String),

    #[error("invalid value \"{value}\" for tuning key {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),

    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Application configuration loaded from status-clock.toml
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Display settings handed to the clock on every tick
    pub clock: DisplayConfig,
    /// Time zone the clock renders in
    pub zone: ZoneConfig,
}

/// Fixed UTC offset for the clock face
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Minutes east of UTC (e.g. 60 for CET, -300 for EST)
    pub utc_offset_minutes: i32,
}

impl ZoneConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }
}

impl Config {
    /// Load configuration from status-clock.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!(
                        "loaded clock configuration from {} (locale {})",
                        path.display(),
                        config.clock.locale
                    );
                    config
                }
                Err(e) => {
                    log::warn!("invalid config file format in {}: {}", path.display(), e);
                    log::warn!("using default clock configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "no config file at {}, using default clock configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

/// Integer-coded settings keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuningKey {
    ShowClock,
    Seconds,
    AmPmStyle,
    ClockStyle,
    DateShow,
    DateStyle,
    DatePosition,
    DateFormat,
}

impl TuningKey {
    pub const ALL: [TuningKey; 8] = [
        TuningKey::ShowClock,
        TuningKey::Seconds,
        TuningKey::AmPmStyle,
        TuningKey::ClockStyle,
        TuningKey::DateShow,
        TuningKey::DateStyle,
        TuningKey::DatePosition,
        TuningKey::DateFormat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TuningKey::ShowClock => "clock_show",
            TuningKey::Seconds => "clock_seconds",
            TuningKey::AmPmStyle => "clock_am_pm_style",
            TuningKey::ClockStyle => "clock_style",
            TuningKey::DateShow => "clock_date_show",
            TuningKey::DateStyle => "clock_date_style",
            TuningKey::DatePosition => "clock_date_position",
            TuningKey::DateFormat => "clock_date_format",
        }
    }
}

impl FromStr for TuningKey {
    type Err = ConfigError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        TuningKey::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }
}

fn code(key: TuningKey, value: &str) -> Result<i32, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: TuningKey, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.as_str(),
        value: value.to_string(),
    }
}

/// Map a 0/1/2 code onto one of three variants.
fn pick<T: Copy>(key: TuningKey, value: &str, variants: [T; 3]) -> Result<T, ConfigError> {
    match code(key, value)? {
        n @ 0..=2 => Ok(variants[n as usize]),
        _ => Err(invalid(key, value)),
    }
}

impl DisplayConfig {
    /// Apply one tuning key. A `None` value restores that setting's default.
    ///
    /// The AM/PM style is forced to `None` while 24-hour mode is on.
    pub fn apply_tuning(&mut self, key: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let key: TuningKey = key.parse()?;
        match (key, value) {
            (TuningKey::ShowClock, None) => self.show_clock = true,
            (TuningKey::ShowClock, Some(v)) => self.show_clock = code(key, v)? == 1,
            (TuningKey::Seconds, None) => self.show_seconds = false,
            (TuningKey::Seconds, Some(v)) => self.show_seconds = code(key, v)? != 0,
            (TuningKey::AmPmStyle, None) => self.am_pm_style = AmPmStyle::None,
            (TuningKey::AmPmStyle, Some(v)) => {
                let style = pick(key, v, [AmPmStyle::None, AmPmStyle::Small, AmPmStyle::Normal])?;
                self.am_pm_style = if self.hour24 { AmPmStyle::None } else { style };
            }
            (TuningKey::ClockStyle, None) => self.placement = ClockPlacement::Right,
            (TuningKey::ClockStyle, Some(v)) => {
                self.placement = pick(
                    key,
                    v,
                    [ClockPlacement::Right, ClockPlacement::Center, ClockPlacement::Left],
                )?
            }
            (TuningKey::DateShow, None) => self.date_visibility = DateVisibility::None,
            (TuningKey::DateShow, Some(v)) => {
                self.date_visibility = pick(
                    key,
                    v,
                    [DateVisibility::None, DateVisibility::Small, DateVisibility::Normal],
                )?
            }
            (TuningKey::DateStyle, None) => self.date_case = DateCase::AsIs,
            (TuningKey::DateStyle, Some(v)) => {
                self.date_case = pick(key, v, [DateCase::AsIs, DateCase::Lower, DateCase::Upper])?
            }
            (TuningKey::DatePosition, None) => self.date_position = DatePosition::Left,
            (TuningKey::DatePosition, Some(v)) => {
                self.date_position = match code(key, v)? {
                    0 => DatePosition::Left,
                    1 => DatePosition::Right,
                    _ => return Err(invalid(key, v)),
                }
            }
            (TuningKey::DateFormat, None) => self.date_format = DEFAULT_DATE_PATTERN.to_string(),
            (TuningKey::DateFormat, Some(v)) => self.date_format = v.to_string(),
        }
        log::debug!("tuning {} = {:?}", key.as_str(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleTag;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.clock, DisplayConfig::default());
        assert_eq!(config.zone.utc_offset_minutes, 0);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.clock.locale = LocaleTag::new("ko-KR");
        config.clock.am_pm_style = AmPmStyle::Small;
        config.zone.utc_offset_minutes = 540;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [clock]
            hour24 = true
            date_visibility = "small"
            date_case = "upper"
            locale = "de_DE"
            "#,
        )
        .unwrap();
        assert!(parsed.clock.hour24);
        assert_eq!(parsed.clock.date_visibility, DateVisibility::Small);
        assert_eq!(parsed.clock.date_case, DateCase::Upper);
        assert_eq!(parsed.clock.locale.as_str(), "de-DE");
        assert_eq!(parsed.clock.date_format, "EEE");
        assert_eq!(parsed.zone, ZoneConfig::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[clock]\nhour24 = \"sometimes\"\n").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.clock.date_position = DatePosition::Right;
        config.clock.date_format = "d MMM".to_string();
        config.save_to_path(file.path()).unwrap();

        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_zone_offset() {
        let zone = ZoneConfig {
            utc_offset_minutes: -300,
        };
        assert_eq!(zone.offset().unwrap().local_minus_utc(), -18_000);

        let zone = ZoneConfig {
            utc_offset_minutes: 24 * 60,
        };
        assert!(matches!(zone.offset(), Err(ConfigError::InvalidOffset(1440))));
    }

    #[test]
    fn test_tuning_key_names() {
        for key in TuningKey::ALL {
            assert_eq!(key.as_str().parse::<TuningKey>().unwrap(), key);
        }
        assert!(matches!(
            "clock_date_SHOW".parse::<TuningKey>(),
            Ok(TuningKey::DateShow)
        ));
        assert!(matches!(
            "clock_colour".parse::<TuningKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_tuning_codes() {
        let mut config = DisplayConfig::default();
        config.apply_tuning("clock_seconds", Some("1")).unwrap();
        config.apply_tuning("clock_am_pm_style", Some("1")).unwrap();
        config.apply_tuning("clock_style", Some("2")).unwrap();
        config.apply_tuning("clock_date_show", Some("1")).unwrap();
        config.apply_tuning("clock_date_style", Some("2")).unwrap();
        config.apply_tuning("clock_date_position", Some("1")).unwrap();
        config.apply_tuning("clock_date_format", Some("d/M")).unwrap();
        config.apply_tuning("clock_show", Some("0")).unwrap();

        assert!(config.show_seconds);
        assert_eq!(config.am_pm_style, AmPmStyle::Small);
        assert_eq!(config.placement, ClockPlacement::Left);
        assert_eq!(config.date_visibility, DateVisibility::Small);
        assert_eq!(config.date_case, DateCase::Upper);
        assert_eq!(config.date_position, DatePosition::Right);
        assert_eq!(config.date_format, "d/M");
        assert!(!config.show_clock);
    }

    #[test]
    fn test_tuning_reset_to_defaults() {
        let mut config = DisplayConfig {
            show_clock: false,
            show_seconds: true,
            am_pm_style: AmPmStyle::Normal,
            date_format: "d".to_string(),
            ..DisplayConfig::default()
        };
        for key in TuningKey::ALL {
            config.apply_tuning(key.as_str(), None).unwrap();
        }
        assert_eq!(config, DisplayConfig::default());
    }

    #[test]
    fn test_am_pm_forced_off_in_24_hour_mode() {
        let mut config = DisplayConfig {
            hour24: true,
            ..DisplayConfig::default()
        };
        config.apply_tuning("clock_am_pm_style", Some("2")).unwrap();
        assert_eq!(config.am_pm_style, AmPmStyle::None);
    }

    #[test]
    fn test_tuning_rejects_bad_values() {
        let mut config = DisplayConfig::default();
        assert!(matches!(
            config.apply_tuning("clock_date_show", Some("3")),
            Err(ConfigError::InvalidValue { key: "clock_date_show", .. })
        ));
        assert!(config.apply_tuning("clock_date_position", Some("2")).is_err());
        assert!(config.apply_tuning("clock_seconds", Some("yes")).is_err());
        assert!(config.apply_tuning("clock_size", Some("1")).is_err());
        assert_eq!(config, DisplayConfig::default());
    }
}
