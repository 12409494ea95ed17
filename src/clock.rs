//! # Clock Engine
//!
//! Ties the selector and composer together for one display surface. The
//! environment calls [`StatusClock::tick`] on every time tick and forwards
//! locale, zone and tuning changes; the engine keeps the format cache
//! consistent with those changes.
//!
//! ## Demo mode
//! Demo mode freezes the display at a chosen time for screenshots. While it
//! is active, ticks render nothing and only [`DemoCommand::Millis`] or
//! [`DemoCommand::HourMinute`] change what is shown.

use crate::composer;
use crate::config::ConfigError;
use crate::display::{DisplayConfig, RenderResult};
use crate::locale::{BuiltinLocales, LocaleProvider, LocaleTag};
use crate::pattern::PatternError;
use crate::selector::FormatSelector;
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the clock engine.
#[derive(Error, Debug)]
pub enum ClockError {
    /// The locale's time skeleton could not be compiled
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A tuning key or value was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A demo command carried an unusable time
    #[error("invalid demo time \"{0}\"")]
    DemoTime(String),
}

/// Commands accepted while taking screenshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoCommand {
    Enter,
    Exit,
    /// Show the instant at these epoch milliseconds
    Millis(i64),
    /// Show this wall-clock hour and minute on the current day
    HourMinute { hour: u32, minute: u32 },
}

impl DemoCommand {
    /// Parse an `hhmm` string such as `"0930"`.
    pub fn parse_hhmm(value: &str) -> Result<Self, ClockError> {
        let invalid = || ClockError::DemoTime(value.to_string());
        if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour = value[..2].parse().map_err(|_| invalid())?;
        let minute = value[2..].parse().map_err(|_| invalid())?;
        Ok(DemoCommand::HourMinute { hour, minute })
    }
}

/// Delay until the display next needs to change.
pub fn next_tick_delay(now: DateTime<Utc>, show_seconds: bool) -> Duration {
    let millis = u64::from(now.timestamp_subsec_millis().min(999));
    if show_seconds {
        Duration::from_millis(1000 - millis)
    } else {
        let seconds = u64::from(now.second());
        Duration::from_millis((60 - seconds) * 1000 - millis)
    }
}

/// Status bar clock for one display surface.
#[derive(Debug)]
pub struct StatusClock<P = BuiltinLocales> {
    selector: FormatSelector<P>,
    config: DisplayConfig,
    offset: FixedOffset,
    last_instant: DateTime<Utc>,
    demo: bool,
}

impl<P: LocaleProvider> StatusClock<P> {
    pub fn new(config: DisplayConfig, offset: FixedOffset, provider: P) -> Self {
        StatusClock {
            selector: FormatSelector::new(provider),
            config,
            offset,
            last_instant: DateTime::<Utc>::default(),
            demo: false,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn selector(&self) -> &FormatSelector<P> {
        &self.selector
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Replace the display settings.
    pub fn set_config(&mut self, config: DisplayConfig) {
        if config.locale != self.config.locale {
            self.selector.invalidate();
        }
        self.config = config;
    }

    /// Switch locale, dropping formatters compiled for the old one.
    pub fn set_locale(&mut self, locale: LocaleTag) {
        if locale != self.config.locale {
            log::info!("locale changed from {} to {}", self.config.locale, locale);
            self.config.locale = locale;
            self.selector.invalidate();
        }
    }

    pub fn set_utc_offset(&mut self, offset: FixedOffset) {
        self.offset = offset;
    }

    /// Apply one tuning key, see [`DisplayConfig::apply_tuning`].
    pub fn apply_tuning(&mut self, key: &str, value: Option<&str>) -> Result<(), ClockError> {
        self.config.apply_tuning(key, value)?;
        Ok(())
    }

    /// Render an explicit instant in the clock's zone.
    pub fn render_at(&mut self, instant: DateTime<Utc>) -> Result<RenderResult, ClockError> {
        let format = self.selector.resolve(&self.config)?;
        let local = instant.with_timezone(&self.offset);
        Ok(composer::render(&local, &format, &self.config))
    }

    /// Render the current time; `None` while demo mode holds the display.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Option<RenderResult>, ClockError> {
        if self.demo {
            return Ok(None);
        }
        self.last_instant = now;
        self.render_at(now).map(Some)
    }

    /// Handle a demo command, returning the frame to show if it changed.
    ///
    /// Time commands outside demo mode are ignored. After `Exit` the next
    /// tick renders live time again.
    pub fn dispatch_demo(
        &mut self,
        command: DemoCommand,
    ) -> Result<Option<RenderResult>, ClockError> {
        match command {
            DemoCommand::Enter => {
                self.demo = true;
                Ok(None)
            }
            DemoCommand::Exit => {
                self.demo = false;
                Ok(None)
            }
            DemoCommand::Millis(_) | DemoCommand::HourMinute { .. } if !self.demo => Ok(None),
            DemoCommand::Millis(millis) => {
                let instant = DateTime::from_timestamp_millis(millis)
                    .ok_or_else(|| ClockError::DemoTime(millis.to_string()))?;
                self.last_instant = instant;
                self.render_at(instant).map(Some)
            }
            DemoCommand::HourMinute { hour, minute } => {
                let instant = self.demo_wall_time(hour, minute)?;
                self.last_instant = instant;
                self.render_at(instant).map(Some)
            }
        }
    }

    /// 24-hour mode sets the hour of day; 12-hour mode sets the hour within
    /// the current half of the day.
    fn demo_wall_time(&self, hour: u32, minute: u32) -> Result<DateTime<Utc>, ClockError> {
        let invalid = || ClockError::DemoTime(format!("{:02}{:02}", hour, minute));
        let local = self.last_instant.with_timezone(&self.offset);
        let hour_of_day = if self.config.hour24 {
            hour
        } else if hour < 12 {
            hour + if local.hour() >= 12 { 12 } else { 0 }
        } else {
            return Err(invalid());
        };
        local
            .with_hour(hour_of_day)
            .and_then(|t| t.with_minute(minute))
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{AmPmStyle, DateVisibility};
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 17)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
            .and_utc()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn normal_clock() -> StatusClock {
        let config = DisplayConfig {
            am_pm_style: AmPmStyle::Normal,
            ..DisplayConfig::default()
        };
        StatusClock::new(config, utc(), BuiltinLocales)
    }

    #[test]
    fn test_tick_renders_in_zone() {
        let mut clock = normal_clock();
        let result = clock.tick(at(15, 4, 0)).unwrap().unwrap();
        assert_eq!(result.text, "3:04 PM");

        clock.set_utc_offset(FixedOffset::east_opt(2 * 3600).unwrap());
        let result = clock.tick(at(15, 4, 0)).unwrap().unwrap();
        assert_eq!(result.text, "5:04 PM");
    }

    #[test]
    fn test_ticks_reuse_cached_format() {
        let mut clock = normal_clock();
        for minute in 0..5 {
            clock.tick(at(15, minute, 0)).unwrap();
        }
        assert_eq!(clock.selector().compilations(), 1);
    }

    #[test]
    fn test_locale_change_recompiles() {
        let mut clock = normal_clock();
        clock.tick(at(15, 4, 0)).unwrap();
        clock.set_locale(LocaleTag::new("de-DE"));
        clock.set_config(DisplayConfig {
            hour24: true,
            ..clock.config().clone()
        });
        let result = clock.tick(at(15, 4, 0)).unwrap().unwrap();
        assert_eq!(result.text, "15:04");
        assert_eq!(clock.selector().compilations(), 2);

        // Same locale again is not a change.
        clock.set_locale(LocaleTag::new("de_DE"));
        clock.tick(at(15, 5, 0)).unwrap();
        assert_eq!(clock.selector().compilations(), 2);
    }

    #[test]
    fn test_tuning_changes_output() {
        let mut clock = normal_clock();
        clock.apply_tuning("clock_date_show", Some("2")).unwrap();
        clock.apply_tuning("clock_date_position", Some("1")).unwrap();
        clock.apply_tuning("clock_am_pm_style", Some("0")).unwrap();
        let result = clock.tick(at(15, 4, 0)).unwrap().unwrap();
        assert_eq!(result.text, "3:04 Wed");
        assert_eq!(clock.config().date_visibility, DateVisibility::Normal);

        assert!(matches!(
            clock.apply_tuning("clock_date_show", Some("many")),
            Err(ClockError::Config(_))
        ));
    }

    #[test]
    fn test_demo_mode_freezes_ticks() {
        let mut clock = normal_clock();
        clock.tick(at(15, 4, 0)).unwrap();

        assert_eq!(clock.dispatch_demo(DemoCommand::Enter).unwrap(), None);
        assert!(clock.is_demo());
        assert_eq!(clock.tick(at(16, 0, 0)).unwrap(), None);

        let frame = clock
            .dispatch_demo(DemoCommand::parse_hhmm("0930").unwrap())
            .unwrap()
            .unwrap();
        // 12-hour mode keeps the afternoon half of the day.
        assert_eq!(frame.text, "9:30 PM");

        let frame = clock
            .dispatch_demo(DemoCommand::Millis(at(8, 15, 0).timestamp_millis()))
            .unwrap()
            .unwrap();
        assert_eq!(frame.text, "8:15 AM");

        clock.dispatch_demo(DemoCommand::Exit).unwrap();
        let result = clock.tick(at(16, 0, 0)).unwrap().unwrap();
        assert_eq!(result.text, "4:00 PM");
    }

    #[test]
    fn test_demo_hour_in_24_hour_mode() {
        let mut clock = StatusClock::new(
            DisplayConfig {
                hour24: true,
                ..DisplayConfig::default()
            },
            utc(),
            BuiltinLocales,
        );
        clock.tick(at(15, 4, 0)).unwrap();
        clock.dispatch_demo(DemoCommand::Enter).unwrap();
        let frame = clock
            .dispatch_demo(DemoCommand::HourMinute { hour: 9, minute: 30 })
            .unwrap()
            .unwrap();
        assert_eq!(frame.text, "09:30");
    }

    #[test]
    fn test_demo_time_ignored_outside_demo() {
        let mut clock = normal_clock();
        assert_eq!(clock.dispatch_demo(DemoCommand::Millis(0)).unwrap(), None);
    }

    #[test]
    fn test_demo_rejects_bad_times() {
        assert!(DemoCommand::parse_hhmm("930").is_err());
        assert!(DemoCommand::parse_hhmm("9:30").is_err());

        let mut clock = normal_clock();
        clock.dispatch_demo(DemoCommand::Enter).unwrap();
        assert!(matches!(
            clock.dispatch_demo(DemoCommand::HourMinute { hour: 13, minute: 0 }),
            Err(ClockError::DemoTime(_))
        ));
        assert!(matches!(
            clock.dispatch_demo(DemoCommand::HourMinute { hour: 10, minute: 75 }),
            Err(ClockError::DemoTime(_))
        ));
    }

    #[test]
    fn test_next_tick_delay() {
        let now = at(15, 4, 30) + chrono::Duration::milliseconds(250);
        assert_eq!(next_tick_delay(now, true), Duration::from_millis(750));
        assert_eq!(next_tick_delay(now, false), Duration::from_millis(29_750));
        assert_eq!(next_tick_delay(at(15, 4, 0), false), Duration::from_secs(60));
    }
}
