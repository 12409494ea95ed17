//! # Status Clock Core Library
//!
//! This library formats the status bar clock: given the current instant, the
//! locale's time skeletons and a set of display settings, it produces the
//! text to show, the runs of that text that should be drawn smaller, and a
//! plain description for accessibility services.
//!
//! ## Pipeline
//!
//! Every tick runs the same two steps:
//! 1. **Select**: [`selector::FormatSelector`] picks the `hm`/`hms`/`Hm`/`Hms`
//!    skeleton for the locale, brackets the AM/PM token with private-use
//!    markers when it needs special treatment, and compiles the display and
//!    accessibility formatters. Compiled formatters are cached until the
//!    locale, 12/24-hour mode, seconds visibility or AM/PM style changes.
//! 2. **Compose**: [`composer::render`] formats the time, optionally joins a
//!    date segment on either side, strips or resizes the AM/PM run, and
//!    returns a [`RenderResult`] whose span offsets point into the final text.
//!
//! [`clock::StatusClock`] wraps both steps for one display surface and adds
//! zone handling, tuning keys and a screenshot demo mode.
//!
//! ## Example
//! ```
//! use status_clock_lib::{
//!     composer, selector::FormatSelector, AmPmStyle, DateVisibility, DisplayConfig, SpanKind,
//! };
//! use chrono::NaiveDate;
//!
//! let config = DisplayConfig {
//!     am_pm_style: AmPmStyle::Small,
//!     date_visibility: DateVisibility::Normal,
//!     ..DisplayConfig::default()
//! };
//! let mut selector = FormatSelector::default();
//! let format = selector.resolve(&config).unwrap();
//!
//! let now = NaiveDate::from_ymd_opt(2024, 1, 17)
//!     .unwrap()
//!     .and_hms_opt(15, 4, 0)
//!     .unwrap()
//!     .and_utc();
//! let result = composer::render(&now, &format, &config);
//!
//! assert_eq!(result.text, "Wed 3:04 PM");
//! assert_eq!(result.run(SpanKind::AmPmEmphasis), Some(" PM"));
//! assert_eq!(result.accessibility_text, "3:04 PM");
//! ```

// Module declarations
pub mod clock;
pub mod composer;
pub mod config;
pub mod display;
pub mod locale;
pub mod pattern;
pub mod renderer;
pub mod selector;

pub use display::{
    AmPmStyle, ClockPlacement, DateCase, DatePosition, DateVisibility, DisplayConfig,
    RenderResult, Span, SpanAction, SpanKind,
};
pub use locale::{BuiltinLocales, LocaleData, LocaleProvider, LocaleTag};
