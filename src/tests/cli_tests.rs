//! Argument parsing for the preview binary.

use crate::Options;
use chrono::{TimeZone, Utc};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|arg| arg.to_string()).collect()
}

#[test]
fn defaults_without_arguments() {
    let options = Options::parse(args(&[])).unwrap();
    assert_eq!(options, Options::default());
    assert_eq!(options.config_path, "status-clock.toml");
}

#[test]
fn parses_all_flags() {
    let options = Options::parse(args(&[
        "--config",
        "/etc/clock.toml",
        "--at",
        "2024-01-17T15:04:05+02:00",
        "--json",
    ]))
    .unwrap();
    assert_eq!(options.config_path, "/etc/clock.toml");
    assert_eq!(
        options.at,
        Some(Utc.with_ymd_and_hms(2024, 1, 17, 13, 4, 5).unwrap())
    );
    assert!(options.json);
    assert!(!options.follow);
}

#[test]
fn rejects_bad_arguments() {
    assert!(Options::parse(args(&["--bogus"])).is_err());
    assert!(Options::parse(args(&["--config"])).is_err());
    assert!(Options::parse(args(&["--at", "yesterday"])).is_err());
    assert!(Options::parse(args(&["--at", "2024-01-17T15:04:05Z", "--follow"])).is_err());
}
