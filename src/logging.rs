use crate::error::Result;
use chrono::Local;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter};
use std::io::Write;
use yansi::Paint;

/// Maps a CLI log level string onto a filter, defaulting to Info for
/// anything unrecognized
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initializes logging at the requested level; `RUST_LOG` overrides
pub fn init(log_level: &str) -> Result<()> {
    let level = parse_log_level(log_level);
    let env = Env::default()
        .filter_or("RUST_LOG", level.to_string())
        .write_style_or("RUST_LOG_STYLE", "always");

    Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} [{}] {}",
                Local::now().format("%H:%M:%S%.3f"),
                colored_level(record.level()),
                record.target(),
                record.args()
            )
        })
        .init();

    Ok(())
}

fn colored_level(level: Level) -> Paint<&'static str> {
    match level {
        Level::Error => Paint::red("ERROR").bold(),
        Level::Warn => Paint::yellow("WARN ").bold(),
        Level::Info => Paint::cyan("INFO ").bold(),
        Level::Debug => Paint::blue("DEBUG").bold(),
        Level::Trace => Paint::new("TRACE"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("error"), LevelFilter::Error);
        assert_eq!(parse_log_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_log_level("invalid"), LevelFilter::Info);
    }

    #[test]
    fn test_level_filter_display_is_env_logger_compatible() {
        // init feeds the parsed filter back to env_logger as a string
        assert_eq!(parse_log_level("warn").to_string(), "WARN");
        assert_eq!(parse_log_level("trace").to_string(), "TRACE");
    }
}
