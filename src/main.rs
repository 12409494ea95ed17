//! # Status Clock Preview
//!
//! Development binary for the status clock formatter. It loads the clock
//! configuration, renders the current time (or a given instant) and prints
//! either an ASCII preview or the raw render result as JSON.
//!
//! ```text
//! status-clock [--config PATH] [--at RFC3339] [--json] [--follow]
//! ```
//!
//! Set `RUST_LOG=debug` to watch format cache hits and misses.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use std::env;
use status_clock_lib::{
    clock::{next_tick_delay, StatusClock},
    config::{Config, DEFAULT_CONFIG_PATH},
    renderer::draw_ascii,
    BuiltinLocales, RenderResult,
};

/// Command line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub config_path: String,
    pub at: Option<DateTime<Utc>>,
    pub json: bool,
    pub follow: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            at: None,
            json: false,
            follow: false,
        }
    }
}

impl Options {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut options = Options::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    options.config_path = args.next().context("--config needs a path")?;
                }
                "--at" => {
                    let value = args.next().context("--at needs an RFC 3339 time")?;
                    let at = DateTime::parse_from_rfc3339(&value)
                        .with_context(|| format!("invalid --at time \"{}\"", value))?;
                    options.at = Some(at.with_timezone(&Utc));
                }
                "--json" => options.json = true,
                "--follow" => options.follow = true,
                other => bail!("unknown argument \"{}\"", other),
            }
        }
        if options.at.is_some() && options.follow {
            bail!("--at and --follow cannot be combined");
        }
        Ok(options)
    }
}

fn print_result(result: &RenderResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        print!("{}", draw_ascii(result));
    }
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = Options::parse(env::args().skip(1))?;
    let config = Config::load_from_path(&options.config_path);
    let offset = config.zone.offset()?;
    let mut clock = StatusClock::new(config.clock, offset, BuiltinLocales);

    if let Some(at) = options.at {
        let result = clock.render_at(at)?;
        return print_result(&result, options.json);
    }

    loop {
        if let Some(result) = clock.tick(Utc::now())? {
            print_result(&result, options.json)?;
        }
        if !options.follow {
            break;
        }
        std::thread::sleep(next_tick_delay(Utc::now(), clock.config().show_seconds));
    }

    Ok(())
}
