use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

pub mod filter;
pub mod leveling;
pub mod types;
pub mod validation;

const LOGGING_PATTERN: &str = "{d} {l} {M} - {m}\n";

/// Installs the global log4rs logger.
///
/// Records at or above `log_level` go to stderr and, when `file_path` is set,
/// to that file as well.
///
/// # Arguments
/// * `log_level` - Threshold applied to every appender.
/// * `file_path` - Optional path of a log file to append to.
///
/// # Returns
/// * `Ok(())` once the logger is installed.
/// * `Err(anyhow::Error)` if the log file cannot be opened or a logger is already set.
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&str>) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
            .build(path)?;

        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config_builder.build(root.build(log_level))?;
    log4rs::init_config(config)?;

    Ok(())
}
