//! Logging setup for encodehls
//!
//! Configures log4rs with a stderr console appender and an optional run log
//! file. The console only shows records at or above the requested level; the
//! file receives everything at debug level, including the per-event records
//! under [`EVENT_LOG_TARGET`], which never reach the console.

use crate::events::log_handler::EVENT_LOG_TARGET;

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

use std::path::Path;

const CONSOLE_PATTERN: &str = "{h({l})}: {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}";

/// Installs the global logger.
///
/// # Arguments
///
/// * `console_level` - Minimum level printed to stderr
/// * `log_file` - Run log to create; its parent directory is created if needed
pub fn setup_logging(console_level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(console_level)))
            .build("console", Box::new(console)),
    );
    let mut root = Root::builder().appender("console");
    let mut events = Logger::builder().additive(false);

    if let Some(log_file) = log_file {
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(log_file)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
        events = events.appender("file");
    }

    let config = builder
        .logger(events.build(EVENT_LOG_TARGET, LevelFilter::Info))
        .build(root.build(LevelFilter::Debug.max(console_level)))?;

    log4rs::init_config(config)?;
    Ok(())
}
