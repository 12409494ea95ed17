//! # Segment Composer
//!
//! Turns an instant plus a [`ResolvedFormat`] into the text the status bar
//! shows. The time segment always renders; the date segment renders when
//! enabled and is joined to the time with a single space on the configured
//! side. Afterwards the AM/PM markers left by the selector are either removed
//! together with the AM/PM run, or removed around a resize span.
//!
//! All edits go through an internal `StyledBuffer`, which keeps already placed spans
//! pointing at the same characters when text in front of them is deleted.
//! A right-hand date span therefore stays on the date even after the AM/PM
//! run earlier in the line has been dropped.

use crate::display::{
    AmPmStyle, DatePosition, DateVisibility, DisplayConfig, RenderResult, Span, SpanAction,
    SpanKind, SMALL_FACTOR,
};
use crate::pattern::TimeFormatter;
use crate::selector::{ResolvedFormat, MARK_END, MARK_START};
use chrono::{DateTime, TimeZone};
use std::ops::Range;

/// Text with resize spans that follow deletions.
#[derive(Clone, Debug, Default)]
pub(crate) struct StyledBuffer {
    text: String,
    spans: Vec<Span>,
}

impl StyledBuffer {
    pub fn new(text: String) -> Self {
        StyledBuffer {
            text,
            spans: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Apply a span: `Delete` removes its range, `Resize` is recorded.
    ///
    /// A resize span replaces an earlier one of the same kind. Ranges must
    /// lie on char boundaries.
    pub fn apply(&mut self, span: Span) {
        match span.action {
            SpanAction::Delete => self.delete(span.start..span.end),
            SpanAction::Resize(_) => {
                self.spans.retain(|existing| existing.kind != span.kind);
                if !span.is_empty() {
                    self.spans.push(span);
                }
            }
        }
    }

    fn delete(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        self.text.replace_range(range.clone(), "");

        let removed = range.end - range.start;
        let shift = |offset: usize| {
            if offset <= range.start {
                offset
            } else if offset >= range.end {
                offset - removed
            } else {
                range.start
            }
        };
        for span in &mut self.spans {
            span.start = shift(span.start);
            span.end = shift(span.end);
        }
        self.spans.retain(|span| !span.is_empty());
    }

    pub fn into_parts(self) -> (String, Vec<Span>) {
        (self.text, self.spans)
    }
}

/// Render the date segment with the configured pattern and case.
///
/// Marker characters are removed so only the time segment can carry them.
pub fn date_text<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    format: &ResolvedFormat,
    config: &DisplayConfig,
) -> String {
    let formatter = TimeFormatter::lenient(
        config.effective_date_format(),
        format.symbols().clone(),
    );
    let date = formatter.format(instant).replace([MARK_START, MARK_END], "");
    config.date_case.apply(&date)
}

/// Join date and time; returns the text and the byte range of the date.
fn join_date(time: &str, date: &str, position: DatePosition) -> (String, Range<usize>) {
    match position {
        DatePosition::Left => (format!("{} {}", date, time), 0..date.len()),
        DatePosition::Right => {
            let start = time.len() + 1;
            (format!("{} {}", time, date), start..start + date.len())
        }
    }
}

/// Produce the display text, emphasis spans and accessibility text for one tick.
pub fn render<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    format: &ResolvedFormat,
    config: &DisplayConfig,
) -> RenderResult {
    let time = format.display.format(instant);
    let accessibility_text = format.accessibility.format(instant);

    let mut buffer = match config.date_visibility {
        DateVisibility::None => StyledBuffer::new(time),
        DateVisibility::Small => {
            let date = date_text(instant, format, config);
            let (text, run) = join_date(&time, &date, config.date_position);
            let mut buffer = StyledBuffer::new(text);
            buffer.apply(Span::resize(
                SpanKind::DateEmphasis,
                run.start,
                run.end,
                SMALL_FACTOR,
            ));
            buffer
        }
        DateVisibility::Normal => {
            let date = date_text(instant, format, config);
            StyledBuffer::new(join_date(&time, &date, config.date_position).0)
        }
    };

    let markers = buffer
        .text()
        .find(MARK_START)
        .zip(buffer.text().find(MARK_END))
        .filter(|(start, end)| start < end);
    if let Some((start, end)) = markers {
        let end_marker = end..end + MARK_END.len_utf8();
        let start_marker = start..start + MARK_START.len_utf8();
        match config.am_pm_style {
            AmPmStyle::None => {
                buffer.apply(Span::delete(SpanKind::AmPmEmphasis, start, end_marker.end))
            }
            AmPmStyle::Small => {
                buffer.apply(Span::resize(
                    SpanKind::AmPmEmphasis,
                    start_marker.end,
                    end,
                    SMALL_FACTOR,
                ));
                strip_markers(&mut buffer, start_marker, end_marker);
            }
            // Normal patterns carry no markers; strip any that appear.
            AmPmStyle::Normal => strip_markers(&mut buffer, start_marker, end_marker),
        }
    }

    let (text, mut spans) = buffer.into_parts();
    spans.sort_by_key(|span| span.start);
    RenderResult {
        text,
        spans,
        accessibility_text,
    }
}

fn strip_markers(buffer: &mut StyledBuffer, start: Range<usize>, end: Range<usize>) {
    // Later range first so the earlier one stays valid.
    buffer.apply(Span::delete(SpanKind::AmPmEmphasis, end.start, end.end));
    buffer.apply(Span::delete(SpanKind::AmPmEmphasis, start.start, start.end));
}
