use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to determine config directory: {0}")]
    ConfigDir(String),
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Get the standard configuration directory for the current platform
pub fn get_config_dir() -> Result<PathBuf, SetupError> {
    // Prefer ~/.config/themetty on Unix-like systems, fall back to platform defaults
    if cfg!(unix) {
        if let Some(mut home_path) = dirs::home_dir() {
            home_path.push(".config");
            home_path.push("themetty");
            return Ok(home_path);
        }
    }

    dirs::config_dir()
        .map(|mut path| {
            path.push("themetty");
            path
        })
        .ok_or_else(|| SetupError::ConfigDir("Unable to determine config directory".to_string()))
}

/// Get the standard configuration file path
pub fn get_config_file_path() -> Result<PathBuf, SetupError> {
    let mut config_dir = get_config_dir()?;
    config_dir.push("config.toml");
    Ok(config_dir)
}

/// Get the directory palette files are read from
pub fn get_themes_dir() -> Result<PathBuf, SetupError> {
    let mut config_dir = get_config_dir()?;
    config_dir.push("themes");
    Ok(config_dir)
}

/// Get the path of the persisted state file (active theme and friends)
pub fn get_state_file_path() -> Result<PathBuf, SetupError> {
    let mut config_dir = get_config_dir()?;
    config_dir.push("state.toml");
    Ok(config_dir)
}

/// Check if the config directory exists
pub fn is_config_initialized() -> bool {
    match get_config_dir() {
        Ok(config_dir) => config_dir.exists(),
        Err(_) => false,
    }
}

/// Initialize the config directory structure.
///
/// Creates the directories and, on first run, installs a fully commented
/// copy of the default configuration plus the bundled palette snapshot.
/// Files already on disk are never overwritten, so user edits survive
/// upgrades; deleting an installed file restores the bundled copy.
pub fn initialize_config_dir() -> Result<PathBuf, SetupError> {
    let config_dir = get_config_dir()?;
    let themes_dir = get_themes_dir()?;

    create_dir_if_not_exists(&config_dir)?;
    create_dir_if_not_exists(&themes_dir)?;

    install_bundled_assets(&config_dir, &themes_dir)?;

    log::info!("Config directory initialized: {}", config_dir.display());
    Ok(config_dir)
}

/// Install the embedded defaults into the config directory, skipping any
/// file that already exists.
fn install_bundled_assets(config_dir: &Path, themes_dir: &Path) -> Result<(), SetupError> {
    let config_file = config_dir.join("config.toml");
    if write_file_if_absent(&config_file, &commented_default_config())? {
        log::info!("Created default config: {}", config_file.display());
    }

    let mut installed = 0usize;
    if write_file_if_absent(&themes_dir.join("catalog.toml"), runtime::bundled::CATALOG)? {
        installed += 1;
    }
    if write_file_if_absent(&themes_dir.join("core.toml"), runtime::bundled::CORE_PALETTE)? {
        installed += 1;
    }
    for (asset, source) in runtime::bundled::palettes() {
        if write_file_if_absent(&themes_dir.join(asset), source)? {
            installed += 1;
        }
    }
    if installed > 0 {
        log::info!(
            "Installed {installed} bundled palette files into {}",
            themes_dir.display()
        );
    }

    Ok(())
}

/// The embedded default config with every setting commented out.
///
/// The installed copy documents the knobs without pinning their values,
/// so later releases can change a default without a stale file on disk
/// shadowing it.
fn commented_default_config() -> String {
    super::defaults::DEFAULT_CONFIG
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
                line.to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn create_dir_if_not_exists(path: &Path) -> Result<(), SetupError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| SetupError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write `content` to `path` unless the file exists. Returns whether it wrote.
fn write_file_if_absent(path: &Path, content: &str) -> Result<bool, SetupError> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, content).map_err(|source| SetupError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Find config file using discovery priority
pub fn find_config_file() -> Option<PathBuf> {
    // Priority order:
    // 1. ./config.toml (current directory)
    // 2. Standard OS config directory

    let current_dir_config = PathBuf::from("config.toml");
    if current_dir_config.exists() {
        return Some(current_dir_config);
    }

    match get_config_file_path() {
        Ok(standard_config) if standard_config.exists() => Some(standard_config),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use claims::{assert_ok, assert_some_eq};

    #[test]
    fn config_dir_ends_with_app_name() {
        let result = get_config_dir();
        assert!(result.is_ok());
        let config_dir = result.unwrap();
        assert!(config_dir.to_string_lossy().contains("themetty"));
    }

    #[test]
    fn derived_paths_live_under_the_config_dir() {
        let config_dir = get_config_dir().unwrap();
        assert!(get_themes_dir().unwrap().starts_with(&config_dir));
        assert!(get_state_file_path().unwrap().starts_with(&config_dir));
        assert!(get_config_file_path().unwrap().starts_with(&config_dir));
    }

    #[test]
    fn first_run_installs_config_and_palette_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let themes_dir = dir.path().join("themes");
        fs::create_dir(&themes_dir).unwrap();

        assert_ok!(install_bundled_assets(dir.path(), &themes_dir));

        assert!(dir.path().join("config.toml").exists());
        assert!(themes_dir.join("catalog.toml").exists());
        assert!(themes_dir.join("core.toml").exists());
        for asset in runtime::bundled::palettes().keys() {
            assert!(themes_dir.join(asset).exists(), "missing {asset}");
        }
    }

    #[test]
    fn existing_files_are_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let themes_dir = dir.path().join("themes");
        fs::create_dir(&themes_dir).unwrap();

        let config_file = dir.path().join("config.toml");
        fs::write(&config_file, "tick_interval_millis = 25\n").unwrap();
        let palette_file = themes_dir.join("dracula.toml");
        fs::write(&palette_file, "# my edited dracula\n").unwrap();

        assert_ok!(install_bundled_assets(dir.path(), &themes_dir));

        assert_some_eq!(
            fs::read_to_string(&config_file).ok(),
            "tick_interval_millis = 25\n".to_string()
        );
        assert_some_eq!(
            fs::read_to_string(&palette_file).ok(),
            "# my edited dracula\n".to_string()
        );
    }

    #[test]
    fn installed_config_is_all_comments() {
        let installed = commented_default_config();
        for line in installed.lines() {
            let trimmed = line.trim_start();
            assert!(
                trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('['),
                "uncommented setting in installed config: {line}"
            );
        }

        // Parsing it must hand back pure accessor defaults.
        let config: AppConfig = toml::from_str(&installed).unwrap();
        assert_eq!(config.tick_interval(), AppConfig::default().tick_interval());
        assert_eq!(
            config.max_concurrent_tasks(),
            AppConfig::default().max_concurrent_tasks()
        );
    }
}
