use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use crate::{config, paths};

/// Start file + stderr logging. Keep the returned handle alive for the whole run;
/// dropping it shuts the logger down.
pub fn init_logging() -> anyhow::Result<LoggerHandle> {
    let log_dir = paths::home_dir()
        .context("cannot determine home directory for logs")?
        .join(config::logging::LOG_DIR_REL);
    paths::ensure_dir(&log_dir)?;

    // stdout carries the framed protocol, so nothing may be logged there.
    // File gets everything at debug; stderr only sees warnings and errors.
    let handle = Logger::try_with_str("debug")?
        .log_to_file(FileSpec::default().directory(log_dir).basename(config::logging::LOG_FILE_NAME))
        .rotate(
            Criterion::Size(config::logging::LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config::logging::LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!("{}", "=".repeat(60));
    log::info!("Things catalog host starting");
    log::info!("Version: {}", config::HOST_VERSION);
    log::info!("Platform: {}", std::env::consts::OS);
    log::info!("{}", "=".repeat(60));

    Ok(handle)
}
