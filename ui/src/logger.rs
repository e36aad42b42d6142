use crate::config;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs::OpenOptions;

/// Wire up file logging. A level passed on the command line wins over
/// the configured one.
pub fn setup_logger(cli_level: Option<LevelFilter>) -> Result<(), log::SetLoggerError> {
    let config = config::get_config_or_panic();
    let log_level = cli_level.unwrap_or_else(|| {
        match config.logging().level().to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info, // Default to Info for any other value
        }
    });

    let colors = ColoredLevelConfig::new()
        .trace(Color::BrightBlack)
        .debug(Color::BrightBlue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    // Base configuration for all outputs
    let base_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(log_level);

    // Stdout belongs to the TUI once the alternate screen is up, so logs
    // always go to a file.
    let log_file = config
        .logging()
        .file()
        .unwrap_or_else(|| "themetty.log".to_string());

    match OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => {
            base_config.chain(file).apply()?;
            // Will show before the TUI starts.
            println!("Logging to file: {log_file}");
        }
        Err(e) => {
            eprintln!("Warning: Failed to open log file '{log_file}': {e}");
            eprintln!("Continuing without file logging.");
            base_config.apply()?;
        }
    }

    log::info!("Logger initialized with level: {log_level}");
    Ok(())
}
