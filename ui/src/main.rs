use clap::Parser;
use log::LevelFilter;
use runtime::applier::{RuntimeOptions, ThemeRuntime};
use runtime::assets::{
    DirSource, HttpSource, PaletteSource, parse_trusted_origin, sanitize_base_url,
};
use runtime::catalog::ThemeCatalog;
use runtime::error::Reporter;
use runtime::persistence::Persistence;
use runtime::store::{FileStateStore, MemoryStateStore};
use std::path::PathBuf;
use std::process::exit;
use std::sync::{Arc, mpsc};
use themetty::app::application_lifecycle::ApplicationLifecycle;
use themetty::config::{self, AppConfig, ConfigLoadResult};
use themetty::theme::ThemePainter;
use themetty::{logger, terminal_caps};

/// Terminal theme switcher with live palette previews.
#[derive(Parser, Debug)]
#[command(name = "themetty", version, about)]
struct Cli {
    /// Config file to use instead of the discovered one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory palette files are read from
    #[arg(long, value_name = "DIR")]
    themes_dir: Option<PathBuf>,

    /// Theme to activate, as if it had been picked last session
    #[arg(long, value_name = "ID")]
    theme: Option<String>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(path) = cli.config.clone() {
        config::set_config_path_override(path);
    }

    // First-run setup. Losing it is not fatal: the embedded copies of the
    // config and the palettes keep working.
    if let Err(e) = config::setup::initialize_config_dir() {
        eprintln!("Warning: could not initialize the config directory: {e}");
    }

    let config = load_validated_config();

    if let Err(e) = logger::setup_logger(cli.log_level) {
        eprintln!("Warning: failed to set up logging: {e}");
    }

    log::info!(
        "Terminal advertises {} color support",
        terminal_caps::color_depth()
    );

    // Everything below the UI layer reports through this channel; the
    // model drains it every tick.
    let (tx_reports, rx_reports) = mpsc::channel();
    let reporter = Reporter::new(tx_reports);

    let catalog = load_catalog(&reporter);
    let persistence = build_persistence(reporter.clone());

    // --theme acts like a pick made at launch: persist first, then let
    // normal startup resolution validate it. An unknown id falls back
    // with the same warning a stale persisted id gets.
    if let Some(id) = &cli.theme {
        persistence.write_theme(id);
    }

    let source = palette_source(&cli, config, &reporter);

    let theme_runtime = Arc::new(ThemeRuntime::new(
        catalog,
        persistence,
        source,
        reporter,
        RuntimeOptions {
            load_timeout: config.palette_load_timeout(),
        },
    ));

    // Stamp the surfaces and install the embedded palette before the first
    // draw; init() confirms or replaces it asynchronously.
    theme_runtime.seed();
    ThemePainter::install(theme_runtime.active_palette());

    let mut model = match ApplicationLifecycle::initialize(Arc::clone(&theme_runtime), rx_reports) {
        Ok(model) => model,
        // initialize already told the user what broke.
        Err(_) => exit(1),
    };

    if let Err(e) = ApplicationLifecycle::setup_terminal(&mut model) {
        eprintln!("Failed to prepare the terminal: {e}");
        exit(1);
    }

    ApplicationLifecycle::run_application_loop(&mut model);
    ApplicationLifecycle::shutdown_application(model);
}

fn load_validated_config() -> &'static AppConfig {
    let config = match config::get_config() {
        ConfigLoadResult::Success(config) => config.as_ref(),
        ConfigLoadResult::LoadError(e) => {
            eprintln!("Failed to read configuration: {e}");
            exit(1);
        }
        ConfigLoadResult::DeserializeError(e) => {
            eprintln!("Configuration is malformed: {e}");
            exit(1);
        }
    };

    if let Err(errors) = config.validate() {
        eprintln!("Configuration is not usable:");
        for error in &errors {
            eprintln!("  - {error}");
        }
        exit(1);
    }

    config
}

fn load_catalog(reporter: &Reporter) -> ThemeCatalog {
    match ThemeCatalog::bundled(reporter) {
        Ok(catalog) => catalog,
        Err(e) => {
            // The manifest ships inside the binary; failing to parse it
            // means the build itself is broken.
            eprintln!("Embedded theme catalog is unusable: {e}");
            exit(1);
        }
    }
}

fn build_persistence(reporter: Reporter) -> Persistence {
    match config::setup::get_state_file_path() {
        Ok(path) => Persistence::new(Box::new(FileStateStore::new(path)), reporter),
        Err(e) => {
            // No config dir means no durable state, not no app.
            log::warn!("state file unavailable ({e}); theme choice will not persist");
            Persistence::new(Box::new(MemoryStateStore::new()), reporter)
        }
    }
}

/// Pick where palettes come from, most specific wins.
///
/// A workspace base-url override is honored only when it survives the
/// sanitizer against the configured trusted origin; everything else lands
/// on a themes directory (CLI flag, then config, then the default one).
fn palette_source(cli: &Cli, config: &AppConfig, reporter: &Reporter) -> Box<dyn PaletteSource> {
    if let Some(raw) = config::workspace::read_base_url() {
        let trusted = config
            .sources()
            .registry_url()
            .and_then(|origin| parse_trusted_origin(origin, reporter));
        if let Some(base) = sanitize_base_url(&raw, trusted.as_ref(), reporter) {
            match HttpSource::new(base.clone()) {
                Ok(source) => {
                    log::info!("palettes served from {base}");
                    return Box::new(source);
                }
                Err(e) => {
                    log::warn!("http source unavailable ({e}); using the themes directory");
                }
            }
        }
    }

    let themes_dir = cli
        .themes_dir
        .clone()
        .or_else(|| config.sources().themes_dir())
        .or_else(|| config::setup::get_themes_dir().ok())
        // Last resort; DirSource still answers from the embedded snapshot.
        .unwrap_or_else(|| PathBuf::from("themes"));

    log::info!("palettes served from {}", themes_dir.display());
    Box::new(DirSource::new(themes_dir))
}
