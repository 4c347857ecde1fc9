//! Structured logging setup for the binary.

use tracing::Level;

/// Maps `-v`/`-q` flags to a maximum log level.
///
/// Defaults to WARN so diagnostics stay out of the way of the console report.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init(verbose: u8, quiet: bool) {
    let result = tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if result.is_ok() {
        tracing::debug!("logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(0, false), Level::WARN);
        assert_eq!(level_for(1, false), Level::INFO);
        assert_eq!(level_for(2, false), Level::DEBUG);
        assert_eq!(level_for(7, false), Level::TRACE);
        assert_eq!(level_for(3, true), Level::ERROR);
    }
}
