use config::{Config, Environment, File, FileFormat};
use std::path::PathBuf;

pub mod app;
pub mod defaults;
pub mod keys;
pub mod setup;
pub mod validation;
pub mod workspace;

pub use app::AppConfig;
pub use validation::ConfigValidationError;

/// Configuration loading result
#[derive(Clone)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

/// Global configuration loading and access
static CONFIG: std::sync::OnceLock<ConfigLoadResult> = std::sync::OnceLock::new();

/// Reloadable configuration that can be updated at runtime
static RELOADABLE_CONFIG: std::sync::OnceLock<std::sync::RwLock<Option<ConfigLoadResult>>> =
    std::sync::OnceLock::new();

/// Config file path supplied on the command line. Must be set before the
/// first `get_config` call to take effect.
static CONFIG_PATH_OVERRIDE: std::sync::OnceLock<PathBuf> = std::sync::OnceLock::new();

pub fn set_config_path_override(path: PathBuf) {
    if CONFIG_PATH_OVERRIDE.set(path).is_err() {
        log::warn!("config path override already set; ignoring the new value");
    }
}

fn load_config() -> ConfigLoadResult {
    dotenv::dotenv().ok();

    // Embedded defaults first, then the user's file, then environment
    // entries. Later sources override earlier ones key by key, so the app
    // starts with no config file at all. The workspace `.themetty.toml` is
    // deliberately NOT a layer here: it is untrusted input and only its
    // base URL is read, through `workspace::read_base_url`.
    let mut builder =
        Config::builder().add_source(File::from_str(defaults::DEFAULT_CONFIG, FileFormat::Toml));

    if let Some(path) = CONFIG_PATH_OVERRIDE.get() {
        // An explicitly requested file that is missing is an error, unlike
        // the discovered ones below.
        builder = builder.add_source(File::from(path.clone()).required(true));
    } else if let Some(path) = setup::find_config_file() {
        builder = builder.add_source(File::from(path).required(false));
    }

    let env_source = Environment::with_prefix("THEMETTY")
        .prefix_separator("_")
        .separator("__");

    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => ConfigLoadResult::Success(Box::new(app_config)),
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

pub fn get_config() -> &'static ConfigLoadResult {
    // A reloaded config takes precedence over the boot-time one.
    let reloadable_lock = RELOADABLE_CONFIG.get_or_init(|| std::sync::RwLock::new(None));
    if let Ok(guard) = reloadable_lock.read() {
        if let Some(reloaded) = guard.as_ref() {
            return Box::leak(Box::new(reloaded.clone()));
        }
    }

    CONFIG.get_or_init(load_config)
}

/// Force a fresh read from disk and environment. The result replaces what
/// `get_config` hands out from now on; existing `&'static` borrows keep the
/// old values.
pub fn reload_config() -> Result<(), String> {
    let fresh = load_config();

    let reloadable_lock = RELOADABLE_CONFIG.get_or_init(|| std::sync::RwLock::new(None));
    match reloadable_lock.write() {
        Ok(mut guard) => match &fresh {
            ConfigLoadResult::Success(_) => {
                *guard = Some(fresh);
                log::info!("Configuration reloaded successfully");
                Ok(())
            }
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
                log::error!("Configuration reload failed: {msg}");
                Err(msg.clone())
            }
        },
        Err(e) => {
            let error_msg = format!("Failed to acquire write lock for configuration reload: {e}");
            log::error!("{error_msg}");
            Err(error_msg)
        }
    }
}

pub fn get_config_or_panic() -> &'static AppConfig {
    match get_config() {
        ConfigLoadResult::Success(config) => config,
        ConfigLoadResult::LoadError(e) => {
            panic!("Failed to load config: {e}");
        }
        ConfigLoadResult::DeserializeError(e) => {
            panic!("Failed to deserialize config: {e}");
        }
    }
}
