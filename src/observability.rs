//! Logging setup for binaries and tests that embed the codecs.
//!
//! The kernels only talk to the `log` facade: `trace!` for per-chunk widths,
//! `debug!` for per-call summaries and `error!` before a contract violation is
//! returned. Nothing is printed unless a logger is installed.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Once;

use log::LevelFilter;

use crate::error::DeltapackError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `level`, once per process.
///
/// With `log_file` set, records are appended to that file instead of stderr.
/// Later calls are no-ops, even with different arguments.
pub fn enable_verbose_logging(
    level: LevelFilter,
    log_file: Option<&str>,
) -> Result<(), DeltapackError> {
    if INIT_LOGGER.is_completed() {
        return Ok(());
    }

    let target = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        // Just the level and the message.
        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

/// Routes log output through the test harness's capture.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Trace)
        .try_init();
}
