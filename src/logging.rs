//! Logging setup using the `log` facade and `env_logger` backend.
//!
//! Level selection, in priority order:
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only), `-v` (debug), `-vv` (trace)
//! 3. Default: info

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logging from the CLI verbosity flags.
///
/// Call once at startup, before any logging calls.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        writeln!(
            buf,
            "{level_style}{:<5}{level_style:#} {}",
            level,
            record.args()
        )
    });
    builder.init();
}

/// Map CLI flags to a log level.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level() {
        assert_eq!(determine_level(0, false), LevelFilter::Info);
        assert_eq!(determine_level(1, false), LevelFilter::Debug);
        assert_eq!(determine_level(2, false), LevelFilter::Trace);
        assert_eq!(determine_level(0, true), LevelFilter::Error);
        // quiet wins over verbose
        assert_eq!(determine_level(2, true), LevelFilter::Error);
    }
}
