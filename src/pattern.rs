//! # Date/Time Patterns
//!
//! A small compiler for LDML-style date patterns (`h:mm a`, `EEE d MMM`, ...)
//! and the formatter that renders a compiled pattern against a chrono
//! `DateTime` using a locale's symbol tables.
//!
//! ## Syntax
//! - A run of the same ASCII letter is one field; the run length is its width
//! - Text between apostrophes is literal, `''` is a literal apostrophe
//! - Every other character is literal, which is what lets the selector embed
//!   private-use marker characters in a pattern
//!
//! Two compilation modes exist. [`DatePattern::compile`] is strict and is
//! used for locale time skeletons: an unknown field letter or an open quote
//! is an error. [`DatePattern::compile_lenient`] never fails and is used for
//! the user-supplied date pattern, where unknown letters are kept as text.

use crate::locale::LocaleData;
use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike};
use std::fmt::Write;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while compiling a strict pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A letter that does not name any supported field
    #[error("unknown pattern letter '{letter}' in \"{pattern}\"")]
    UnknownField { letter: char, pattern: String },

    /// An apostrophe opened a literal that never closed
    #[error("unterminated quote in \"{pattern}\"")]
    UnterminatedQuote { pattern: String },
}

/// Calendar field named by a pattern letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// `G`
    Era,
    /// `y`
    Year,
    /// `M` or `L`
    Month,
    /// `d`
    Day,
    /// `E` or `c`
    Weekday,
    /// `a`
    AmPm,
    /// `h`, 1-12
    Hour12,
    /// `H`, 0-23
    Hour23,
    /// `k`, 1-24
    Hour24,
    /// `K`, 0-11
    Hour11,
    /// `m`
    Minute,
    /// `s`
    Second,
    /// `S`
    Millisecond,
    /// `z`
    ZoneName,
    /// `Z`
    ZoneOffset,
}

impl Field {
    fn from_letter(letter: char) -> Option<Self> {
        let field = match letter {
            'G' => Field::Era,
            'y' => Field::Year,
            'M' | 'L' => Field::Month,
            'd' => Field::Day,
            'E' | 'c' => Field::Weekday,
            'a' => Field::AmPm,
            'h' => Field::Hour12,
            'H' => Field::Hour23,
            'k' => Field::Hour24,
            'K' => Field::Hour11,
            'm' => Field::Minute,
            's' => Field::Second,
            'S' => Field::Millisecond,
            'z' => Field::ZoneName,
            'Z' => Field::ZoneOffset,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { field: Field, width: usize },
}

/// A compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    /// Compile a pattern, rejecting unknown letters and open quotes.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        Self::parse(pattern, true)
    }

    /// Compile a pattern without ever failing.
    pub fn compile_lenient(pattern: &str) -> Self {
        match Self::parse(pattern, false) {
            Ok(compiled) => compiled,
            // Lenient parsing has no error path.
            Err(_) => DatePattern {
                source: pattern.to_string(),
                tokens: vec![Token::Literal(pattern.to_string())],
            },
        }
    }

    /// The pattern string this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn parse(pattern: &str, strict: bool) -> Result<Self, PatternError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        literal.push(q);
                    }
                }
                if !closed && strict {
                    return Err(PatternError::UnterminatedQuote {
                        pattern: pattern.to_string(),
                    });
                }
                continue;
            }

            if !c.is_ascii_alphabetic() {
                literal.push(c);
                continue;
            }

            let mut width = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                width += 1;
            }

            match Field::from_letter(c) {
                Some(field) => {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(Token::Field { field, width });
                }
                None if strict => {
                    return Err(PatternError::UnknownField {
                        letter: c,
                        pattern: pattern.to_string(),
                    });
                }
                None => literal.extend(std::iter::repeat(c).take(width)),
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(DatePattern {
            source: pattern.to_string(),
            tokens,
        })
    }

    /// Render `when` using the names in `symbols`.
    pub fn format<Tz: TimeZone>(&self, when: &DateTime<Tz>, symbols: &LocaleData) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field { field, width } => write_field(&mut out, *field, *width, when, symbols),
            }
        }
        out
    }
}

fn write_number(out: &mut String, value: i64, width: usize) {
    let _ = write!(out, "{:0width$}", value, width = width);
}

fn write_name(out: &mut String, short: &str, long: &str, width: usize) {
    match width {
        1..=3 => out.push_str(short),
        4 => out.push_str(long),
        _ => out.extend(long.chars().next()),
    }
}

fn write_field<Tz: TimeZone>(
    out: &mut String,
    field: Field,
    width: usize,
    when: &DateTime<Tz>,
    symbols: &LocaleData,
) {
    let hour = when.hour();
    match field {
        Field::Era => out.push_str(if when.year() > 0 { "AD" } else { "BC" }),
        Field::Year => {
            let year = i64::from(when.year());
            if width == 2 {
                write_number(out, year.rem_euclid(100), 2);
            } else {
                write_number(out, year, width);
            }
        }
        Field::Month => {
            let index = when.month0() as usize;
            if width <= 2 {
                write_number(out, i64::from(when.month()), width);
            } else {
                write_name(
                    out,
                    &symbols.short_months[index],
                    &symbols.long_months[index],
                    width,
                );
            }
        }
        Field::Day => write_number(out, i64::from(when.day()), width),
        Field::Weekday => {
            let index = when.weekday().num_days_from_sunday() as usize;
            write_name(
                out,
                &symbols.short_weekdays[index],
                &symbols.long_weekdays[index],
                width,
            );
        }
        Field::AmPm => out.push_str(&symbols.am_pm[usize::from(hour >= 12)]),
        Field::Hour12 => {
            let h = hour % 12;
            write_number(out, i64::from(if h == 0 { 12 } else { h }), width);
        }
        Field::Hour23 => write_number(out, i64::from(hour), width),
        Field::Hour24 => write_number(out, i64::from(if hour == 0 { 24 } else { hour }), width),
        Field::Hour11 => write_number(out, i64::from(hour % 12), width),
        Field::Minute => write_number(out, i64::from(when.minute()), width),
        Field::Second => write_number(out, i64::from(when.second()), width),
        Field::Millisecond => {
            let millis = (when.nanosecond() % 1_000_000_000) / 1_000_000;
            write_number(out, i64::from(millis), width);
        }
        Field::ZoneName => {
            let seconds = when.offset().fix().local_minus_utc();
            out.push_str("GMT");
            if seconds != 0 {
                let (sign, minutes) = split_offset(seconds);
                let _ = write!(out, "{}{:02}:{:02}", sign, minutes / 60, minutes % 60);
            }
        }
        Field::ZoneOffset => {
            let (sign, minutes) = split_offset(when.offset().fix().local_minus_utc());
            let _ = write!(out, "{}{:02}{:02}", sign, minutes / 60, minutes % 60);
        }
    }
}

fn split_offset(seconds: i32) -> (char, i32) {
    let sign = if seconds < 0 { '-' } else { '+' };
    (sign, seconds.abs() / 60)
}

/// A compiled pattern bound to a locale's symbols.
#[derive(Clone, Debug)]
pub struct TimeFormatter {
    pattern: DatePattern,
    symbols: Arc<LocaleData>,
}

impl TimeFormatter {
    /// Strictly compile `pattern` for the given locale.
    pub fn new(pattern: &str, symbols: Arc<LocaleData>) -> Result<Self, PatternError> {
        Ok(TimeFormatter {
            pattern: DatePattern::compile(pattern)?,
            symbols,
        })
    }

    pub fn lenient(pattern: &str, symbols: Arc<LocaleData>) -> Self {
        TimeFormatter {
            pattern: DatePattern::compile_lenient(pattern),
            symbols,
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.source()
    }

    pub fn symbols(&self) -> &Arc<LocaleData> {
        &self.symbols
    }

    pub fn format<Tz: TimeZone>(&self, when: &DateTime<Tz>) -> String {
        self.pattern.format(when, &self.symbols)
    }
}
