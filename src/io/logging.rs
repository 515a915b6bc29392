use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::model::config::LogConfig;

use super::{parent_dir, paths};

/// Environment variable holding a tracing filter that overrides `[log] level`
pub const LOG_ENV: &str = "JOT_LOG";

/// Install the global subscriber, appending plain-text lines to the log file.
///
/// The TUI owns the terminal and `--json` owns stdout, so logs never go to
/// either. Failing to open the file leaves logging disabled.
pub fn init(config: &LogConfig) -> Result<(), std::io::Error> {
    let path = config.file.clone().unwrap_or_else(paths::default_log_file);
    let writer = open_log(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be set (tests, embedding); keep the first one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(writer))
        .try_init();
    Ok(())
}

fn open_log(path: &Path) -> Result<fs::File, std::io::Error> {
    fs::create_dir_all(parent_dir(path))?;
    OpenOptions::new().create(true).append(true).open(path)
}
