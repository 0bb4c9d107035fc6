//! log4rs setup.
//!
//! A `log4rs.yml` in the working directory wins. Without one, log lines go to
//! stderr at a level picked by the `-v` count.

use crate::config;
use crate::error::AppError;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const LOG_PATTERN: &str = "{d(%H:%M:%S)} - {h({l})} - {m}{n}";

/// Map the `-v` count to a log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn console_config(level: LevelFilter) -> Result<Config, AppError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| AppError::Logging(e.to_string()))
}

/// Initialise the global logger.
pub fn init_logging(verbosity: u8) -> Result<(), AppError> {
    if Path::new(config::LOG_CONFIG_FILE).exists() {
        log4rs::init_file(config::LOG_CONFIG_FILE, Default::default())
            .map_err(|e| AppError::Logging(e.to_string()))?;
        log::debug!("Logging configured from {}", config::LOG_CONFIG_FILE);
        return Ok(());
    }
    let level = level_for_verbosity(verbosity);
    log4rs::init_config(console_config(level)?).map_err(|e| AppError::Logging(e.to_string()))?;
    log::debug!("Logging to stderr at level {level}");
    Ok(())
}
