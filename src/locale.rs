//! # Locale Data
//!
//! Supplies the per-locale inputs the clock needs: the four time skeletons
//! (12/24-hour, with and without seconds) and the symbol tables the pattern
//! formatter draws names from. Skeletons are opaque to the rest of the crate;
//! they are only ever handed to [`crate::pattern::DatePattern`].
//!
//! The built-in table covers a handful of locales. Environments with real
//! locale data implement [`LocaleProvider`] themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized locale identifier such as `en-US`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Build a tag, turning POSIX-style `en_US` into `en-US`.
    pub fn new(tag: &str) -> Self {
        LocaleTag(tag.trim().replace('_', "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased primary language subtag (`en` for `en-US`).
    pub fn language(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl Default for LocaleTag {
    fn default() -> Self {
        LocaleTag::new("en-US")
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleTag {
    fn from(tag: &str) -> Self {
        LocaleTag::new(tag)
    }
}

impl From<String> for LocaleTag {
    fn from(tag: String) -> Self {
        LocaleTag::new(&tag)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}

/// The four base time skeletons of a locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSkeletons {
    /// 12-hour, minutes (`hm`)
    pub hm: String,
    /// 12-hour, seconds (`hms`)
    pub hms: String,
    /// 24-hour, minutes (`Hm`)
    pub hm_24: String,
    /// 24-hour, seconds (`Hms`)
    pub hms_24: String,
}

impl TimeSkeletons {
    pub fn new(hm: &str, hms: &str, hm_24: &str, hms_24: &str) -> Self {
        TimeSkeletons {
            hm: hm.to_string(),
            hms: hms.to_string(),
            hm_24: hm_24.to_string(),
            hms_24: hms_24.to_string(),
        }
    }

    /// Pick the skeleton for the given seconds/24-hour combination.
    pub fn select(&self, show_seconds: bool, hour24: bool) -> &str {
        match (show_seconds, hour24) {
            (true, true) => &self.hms_24,
            (true, false) => &self.hms,
            (false, true) => &self.hm_24,
            (false, false) => &self.hm,
        }
    }
}

/// Skeletons plus the symbols needed to render names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleData {
    pub tag: LocaleTag,
    pub skeletons: TimeSkeletons,
    /// AM then PM
    pub am_pm: [String; 2],
    /// Sunday first
    pub short_weekdays: [String; 7],
    /// Sunday first
    pub long_weekdays: [String; 7],
    pub short_months: [String; 12],
    pub long_months: [String; 12],
}

impl LocaleData {
    /// English symbols with caller-supplied skeletons.
    pub fn english(tag: LocaleTag, skeletons: TimeSkeletons) -> Self {
        LocaleData {
            tag,
            skeletons,
            am_pm: ["AM", "PM"].map(String::from),
            short_weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].map(String::from),
            long_weekdays: [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]
            .map(String::from),
            short_months: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]
            .map(String::from),
            long_months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .map(String::from),
        }
    }

    /// Every string this locale can contribute to formatted output.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.am_pm
            .iter()
            .chain(self.short_weekdays.iter())
            .chain(self.long_weekdays.iter())
            .chain(self.short_months.iter())
            .chain(self.long_months.iter())
            .map(String::as_str)
    }
}

/// Source of locale data for a tag.
pub trait LocaleProvider {
    fn locale_data(&self, tag: &LocaleTag) -> LocaleData;
}

impl<F> LocaleProvider for F
where
    F: Fn(&LocaleTag) -> LocaleData,
{
    fn locale_data(&self, tag: &LocaleTag) -> LocaleData {
        self(tag)
    }
}

/// Small built-in locale table.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinLocales;

const BUILTIN_TAGS: [&str; 6] = ["en-US", "en-GB", "de-DE", "fr-FR", "ko-KR", "zh-CN"];

impl BuiltinLocales {
    /// Tags with their own table entry.
    pub fn tags() -> impl Iterator<Item = LocaleTag> {
        BUILTIN_TAGS.iter().map(|tag| LocaleTag::new(tag))
    }

    fn lookup(tag: &str) -> Option<LocaleData> {
        let data = match tag {
            "en-US" => LocaleData::english(
                LocaleTag::new(tag),
                TimeSkeletons::new("h:mm a", "h:mm:ss a", "HH:mm", "HH:mm:ss"),
            ),
            "en-GB" => {
                let mut data = LocaleData::english(
                    LocaleTag::new(tag),
                    TimeSkeletons::new("h:mm a", "h:mm:ss a", "HH:mm", "HH:mm:ss"),
                );
                data.am_pm = ["am", "pm"].map(String::from);
                data
            }
            "de-DE" => LocaleData {
                tag: LocaleTag::new(tag),
                skeletons: TimeSkeletons::new("h:mm a", "h:mm:ss a", "HH:mm", "HH:mm:ss"),
                am_pm: ["AM", "PM"].map(String::from),
                short_weekdays: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."].map(String::from),
                long_weekdays: [
                    "Sonntag",
                    "Montag",
                    "Dienstag",
                    "Mittwoch",
                    "Donnerstag",
                    "Freitag",
                    "Samstag",
                ]
                .map(String::from),
                short_months: [
                    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.",
                    "Nov.", "Dez.",
                ]
                .map(String::from),
                long_months: [
                    "Januar",
                    "Februar",
                    "März",
                    "April",
                    "Mai",
                    "Juni",
                    "Juli",
                    "August",
                    "September",
                    "Oktober",
                    "November",
                    "Dezember",
                ]
                .map(String::from),
            },
            "fr-FR" => LocaleData {
                tag: LocaleTag::new(tag),
                skeletons: TimeSkeletons::new("h:mm a", "h:mm:ss a", "HH:mm", "HH:mm:ss"),
                am_pm: ["AM", "PM"].map(String::from),
                short_weekdays: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."]
                    .map(String::from),
                long_weekdays: [
                    "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
                ]
                .map(String::from),
                short_months: [
                    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.",
                    "oct.", "nov.", "déc.",
                ]
                .map(String::from),
                long_months: [
                    "janvier",
                    "février",
                    "mars",
                    "avril",
                    "mai",
                    "juin",
                    "juillet",
                    "août",
                    "septembre",
                    "octobre",
                    "novembre",
                    "décembre",
                ]
                .map(String::from),
            },
            "ko-KR" => LocaleData {
                tag: LocaleTag::new(tag),
                skeletons: TimeSkeletons::new("a h:mm", "a h:mm:ss", "HH:mm", "HH:mm:ss"),
                am_pm: ["오전", "오후"].map(String::from),
                short_weekdays: ["일", "월", "화", "수", "목", "금", "토"].map(String::from),
                long_weekdays: [
                    "일요일", "월요일", "화요일", "수요일", "목요일", "금요일", "토요일",
                ]
                .map(String::from),
                short_months: numbered_months("월"),
                long_months: numbered_months("월"),
            },
            "zh-CN" => LocaleData {
                tag: LocaleTag::new(tag),
                skeletons: TimeSkeletons::new("ah:mm", "ah:mm:ss", "HH:mm", "HH:mm:ss"),
                am_pm: ["上午", "下午"].map(String::from),
                short_weekdays: ["周日", "周一", "周二", "周三", "周四", "周五", "周六"]
                    .map(String::from),
                long_weekdays: [
                    "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
                ]
                .map(String::from),
                short_months: numbered_months("月"),
                long_months: [
                    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月",
                    "十月", "十一月", "十二月",
                ]
                .map(String::from),
            },
            _ => return None,
        };
        Some(data)
    }
}

fn numbered_months(suffix: &str) -> [String; 12] {
    std::array::from_fn(|i| format!("{}{}", i + 1, suffix))
}

impl LocaleProvider for BuiltinLocales {
    fn locale_data(&self, tag: &LocaleTag) -> LocaleData {
        if let Some(data) = Self::lookup(tag.as_str()) {
            return data;
        }

        let language = tag.language();
        let fallback = BUILTIN_TAGS
            .iter()
            .find(|candidate| LocaleTag::new(candidate).language() == language)
            .copied()
            .unwrap_or("en-US");
        log::debug!("no locale data for {}, using {}", tag, fallback);

        // Every BUILTIN_TAGS entry has a table row.
        Self::lookup(fallback).unwrap_or_else(|| {
            LocaleData::english(
                LocaleTag::default(),
                TimeSkeletons::new("h:mm a", "h:mm:ss a", "HH:mm", "HH:mm:ss"),
            )
        })
    }
}
