//! # Format Selector
//!
//! Resolves the time pattern for the current locale and display mode, and
//! keeps the compiled formatters around until one of the inputs changes.
//!
//! ## AM/PM markers
//! When the AM/PM run has to look different from the rest of the time, the
//! selector brackets the first unquoted `a` token (plus any whitespace right
//! before it) with [`MARK_START`] and [`MARK_END`]. Both are private-use code
//! points that no locale symbol contains, so after formatting the composer
//! can find the rendered AM/PM text again and resize or drop it.
//!
//! ## Caching
//! The cache key is `(locale, hour24, show_seconds, am_pm_style)`. A hit hands
//! back the same `Arc` as the previous call; any difference recompiles both
//! formatters. A compilation failure leaves the previous cache entry alone.

use crate::display::{AmPmStyle, DisplayConfig};
use crate::locale::{BuiltinLocales, LocaleData, LocaleProvider, LocaleTag};
use crate::pattern::{PatternError, TimeFormatter};
use std::sync::Arc;

/// Placed before the AM/PM run in an annotated pattern.
pub const MARK_START: char = '\u{EF00}';
/// Placed after the AM/PM run in an annotated pattern.
pub const MARK_END: char = '\u{EF01}';

/// Bracket the first unquoted `a` token with the AM/PM markers.
///
/// Whitespace directly before the token moves inside the brackets. Returns
/// `None` when the pattern has no unquoted `a`.
pub fn inject_am_pm_markers(pattern: &str) -> Option<String> {
    let mut quoted = false;
    let mut token = None;
    for (index, c) in pattern.char_indices() {
        if c == '\'' {
            quoted = !quoted;
        }
        if !quoted && c == 'a' {
            token = Some(index);
            break;
        }
    }
    let token = token?;

    let start = pattern[..token]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map_or(token, |(index, _)| index);
    // `a` is one byte wide
    let end = token + pattern[token..].chars().take_while(|&c| c == 'a').count();

    let mut annotated = String::with_capacity(pattern.len() + 2 * MARK_START.len_utf8());
    annotated.push_str(&pattern[..start]);
    annotated.push(MARK_START);
    annotated.push_str(&pattern[start..end]);
    annotated.push(MARK_END);
    annotated.push_str(&pattern[end..]);
    Some(annotated)
}

/// Compiled output of one resolution.
#[derive(Clone, Debug)]
pub struct ResolvedFormat {
    /// Display pattern, with markers when emphasis applies
    pub pattern: String,
    /// Unmodified locale skeleton
    pub accessibility_pattern: String,
    pub display: TimeFormatter,
    pub accessibility: TimeFormatter,
}

impl ResolvedFormat {
    /// Locale symbols both formatters were compiled against.
    pub fn symbols(&self) -> &Arc<LocaleData> {
        self.display.symbols()
    }

    pub fn has_am_pm_markers(&self) -> bool {
        self.pattern.contains(MARK_START)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CacheKey {
    locale: LocaleTag,
    hour24: bool,
    show_seconds: bool,
    am_pm_style: AmPmStyle,
}

#[derive(Debug)]
struct FormatCache {
    key: CacheKey,
    resolved: Arc<ResolvedFormat>,
}

/// Pattern resolver with a single-entry cache.
///
/// One selector serves one display surface; it is not meant to be shared
/// between threads.
#[derive(Debug)]
pub struct FormatSelector<P = BuiltinLocales> {
    provider: P,
    cache: Option<FormatCache>,
    compilations: u64,
}

impl Default for FormatSelector<BuiltinLocales> {
    fn default() -> Self {
        FormatSelector::new(BuiltinLocales)
    }
}

impl<P: LocaleProvider> FormatSelector<P> {
    pub fn new(provider: P) -> Self {
        FormatSelector {
            provider,
            cache: None,
            compilations: 0,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Number of times formatters have been compiled.
    pub fn compilations(&self) -> u64 {
        self.compilations
    }

    /// Drop the cached formatters so the next resolution recompiles.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            log::debug!("format cache invalidated");
        }
    }

    /// Resolve using the fields of a display config.
    pub fn resolve(&mut self, config: &DisplayConfig) -> Result<Arc<ResolvedFormat>, PatternError> {
        self.resolve_pattern(
            &config.locale,
            config.hour24,
            config.show_seconds,
            config.am_pm_style,
        )
    }

    /// Select, annotate and compile the time pattern.
    pub fn resolve_pattern(
        &mut self,
        locale: &LocaleTag,
        hour24: bool,
        show_seconds: bool,
        am_pm_style: AmPmStyle,
    ) -> Result<Arc<ResolvedFormat>, PatternError> {
        let key = CacheKey {
            locale: locale.clone(),
            hour24,
            show_seconds,
            am_pm_style,
        };
        if let Some(cache) = &self.cache {
            if cache.key == key {
                return Ok(Arc::clone(&cache.resolved));
            }
        }

        let data = Arc::new(self.provider.locale_data(locale));
        let base = data.skeletons.select(show_seconds, hour24).to_string();
        let pattern = match am_pm_style {
            AmPmStyle::Normal => base.clone(),
            AmPmStyle::None | AmPmStyle::Small => {
                inject_am_pm_markers(&base).unwrap_or_else(|| base.clone())
            }
        };

        let accessibility = TimeFormatter::new(&base, Arc::clone(&data))?;
        let display = TimeFormatter::new(&pattern, data)?;
        self.compilations += 1;
        log::debug!(
            "compiled time pattern {:?} for {} (am/pm {:?})",
            pattern,
            locale,
            am_pm_style
        );

        let resolved = Arc::new(ResolvedFormat {
            pattern,
            accessibility_pattern: base,
            display,
            accessibility,
        });
        self.cache = Some(FormatCache {
            key,
            resolved: Arc::clone(&resolved),
        });
        Ok(resolved)
    }
}
