//! # Terminal Preview
//!
//! Draws a [`RenderResult`] as plain text for development: the display text,
//! a caret line under every resized run, and the accessibility text. Real
//! consumers apply the spans themselves; this only exists so the binary can
//! show what a status bar would do with them.

use crate::display::{RenderResult, SpanAction};

/// Format a result as a multi-line ASCII preview.
pub fn draw_ascii(result: &RenderResult) -> String {
    let mut out = String::new();
    out.push_str(&result.text);
    out.push('\n');

    if !result.spans.is_empty() {
        let marks: String = result
            .text
            .char_indices()
            .map(|(offset, _)| {
                let resized = result.spans.iter().any(|span| {
                    matches!(span.action, SpanAction::Resize(_))
                        && (span.start..span.end).contains(&offset)
                });
                if resized {
                    '^'
                } else {
                    ' '
                }
            })
            .collect();
        out.push_str(marks.trim_end());
        out.push('\n');
    }

    out.push_str("a11y: ");
    out.push_str(&result.accessibility_text);
    out.push('\n');
    out
}
