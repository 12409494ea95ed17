//! # Display Model
//!
//! The settings the environment hands to the clock on every tick, and the
//! result the clock hands back. Everything in here is plain data: the
//! selector and composer read a [`DisplayConfig`] and produce a
//! [`RenderResult`] without keeping references into either.

use crate::locale::LocaleTag;
use serde::{Deserialize, Serialize};

/// Relative size used for "small" date and AM/PM runs.
pub const SMALL_FACTOR: f32 = 0.7;

/// Date pattern used when the configured one is empty.
pub const DEFAULT_DATE_PATTERN: &str = "EEE";

/// How the AM/PM run is shown in 12-hour patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmPmStyle {
    /// Stripped from the display text, leading whitespace included.
    #[default]
    None,
    /// Kept, but resized to [`SMALL_FACTOR`].
    Small,
    /// Rendered exactly as the locale pattern produces it.
    Normal,
}

/// Whether the date segment is shown, and at what size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateVisibility {
    #[default]
    None,
    Small,
    Normal,
}

/// Case transform applied to the rendered date segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateCase {
    #[default]
    AsIs,
    Lower,
    Upper,
}

impl DateCase {
    pub fn apply(self, date: &str) -> String {
        match self {
            DateCase::AsIs => date.to_string(),
            DateCase::Lower => date.to_lowercase(),
            DateCase::Upper => date.to_uppercase(),
        }
    }
}

/// Which side of the time the date segment sits on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePosition {
    #[default]
    Left,
    Right,
}

/// Status bar slot the clock is placed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPlacement {
    #[default]
    Right,
    Center,
    Left,
}

/// Per-tick display settings, owned by the surrounding environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Whether the clock is shown at all
    pub show_clock: bool,
    /// Status bar slot the clock occupies
    pub placement: ClockPlacement,
    /// 24-hour (`H`) instead of 12-hour (`h`) skeletons
    pub hour24: bool,
    /// Include seconds in the time skeleton
    pub show_seconds: bool,
    pub am_pm_style: AmPmStyle,
    pub date_visibility: DateVisibility,
    pub date_case: DateCase,
    pub date_position: DatePosition,
    /// Pattern for the date segment; empty means [`DEFAULT_DATE_PATTERN`]
    pub date_format: String,
    pub locale: LocaleTag,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            show_clock: true,
            placement: ClockPlacement::Right,
            hour24: false,
            show_seconds: false,
            am_pm_style: AmPmStyle::None,
            date_visibility: DateVisibility::None,
            date_case: DateCase::AsIs,
            date_position: DatePosition::Left,
            date_format: DEFAULT_DATE_PATTERN.to_string(),
            locale: LocaleTag::default(),
        }
    }
}

impl DisplayConfig {
    /// The date pattern actually used, with the empty-string default applied.
    pub fn effective_date_format(&self) -> &str {
        if self.date_format.is_empty() {
            DEFAULT_DATE_PATTERN
        } else {
            &self.date_format
        }
    }

    /// True if the clock should be drawn in the given status bar slot.
    pub fn is_visible_in(&self, slot: ClockPlacement) -> bool {
        self.show_clock && self.placement == slot
    }
}

/// Which run of the display text a span describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    DateEmphasis,
    AmPmEmphasis,
}

/// What the consumer should do with a span's range.
///
/// Deletions are applied to the text before a result is returned, so spans
/// in a [`RenderResult`] only ever carry `Resize`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanAction {
    Resize(f32),
    Delete,
}

/// A styled sub-range of the display text.
///
/// Offsets are byte offsets into [`RenderResult::text`] and always fall on
/// char boundaries; `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    pub action: SpanAction,
}

impl Span {
    pub fn resize(kind: SpanKind, start: usize, end: usize, factor: f32) -> Self {
        Span {
            kind,
            start,
            end,
            action: SpanAction::Resize(factor),
        }
    }

    pub fn delete(kind: SpanKind, start: usize, end: usize) -> Self {
        Span {
            kind,
            start,
            end,
            action: SpanAction::Delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Output of one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Final display text, markers and deleted runs removed
    pub text: String,
    /// At most one span per [`SpanKind`]
    pub spans: Vec<Span>,
    /// Plain time rendered with the unannotated pattern
    pub accessibility_text: String,
}

impl RenderResult {
    pub fn span(&self, kind: SpanKind) -> Option<&Span> {
        self.spans.iter().find(|span| span.kind == kind)
    }

    /// The substring covered by the span of the given kind.
    pub fn run(&self, kind: SpanKind) -> Option<&str> {
        self.span(kind)
            .and_then(|span| self.text.get(span.start..span.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert!(config.show_clock);
        assert!(!config.hour24);
        assert_eq!(config.am_pm_style, AmPmStyle::None);
        assert_eq!(config.date_visibility, DateVisibility::None);
        assert_eq!(config.date_format, "EEE");
        assert_eq!(config.locale.as_str(), "en-US");
    }

    #[test]
    fn test_empty_date_format_uses_default() {
        let config = DisplayConfig {
            date_format: String::new(),
            ..DisplayConfig::default()
        };
        assert_eq!(config.effective_date_format(), "EEE");

        let config = DisplayConfig {
            date_format: "d MMM".to_string(),
            ..DisplayConfig::default()
        };
        assert_eq!(config.effective_date_format(), "d MMM");
    }

    #[test]
    fn test_date_case() {
        assert_eq!(DateCase::AsIs.apply("Wed"), "Wed");
        assert_eq!(DateCase::Lower.apply("Wed"), "wed");
        assert_eq!(DateCase::Upper.apply("wed"), "WED");
    }

    #[test]
    fn test_visibility_by_slot() {
        let mut config = DisplayConfig::default();
        assert!(config.is_visible_in(ClockPlacement::Right));
        assert!(!config.is_visible_in(ClockPlacement::Left));

        config.placement = ClockPlacement::Center;
        assert!(config.is_visible_in(ClockPlacement::Center));

        config.show_clock = false;
        assert!(!config.is_visible_in(ClockPlacement::Center));
    }

    #[test]
    fn test_result_run_lookup() {
        let result = RenderResult {
            text: "3:04 PM".to_string(),
            spans: vec![Span::resize(SpanKind::AmPmEmphasis, 4, 7, SMALL_FACTOR)],
            accessibility_text: "3:04 PM".to_string(),
        };
        assert_eq!(result.run(SpanKind::AmPmEmphasis), Some(" PM"));
        assert_eq!(result.run(SpanKind::DateEmphasis), None);
    }
}
