/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error(
        "Invalid palette_load_timeout_ms: {configured} (min: {min_limit}, max: {max_limit})"
    )]
    PaletteLoadTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid max_concurrent_tasks: {configured} (min: 1, max: {limit})")]
    MaxConcurrentTasks { configured: usize, limit: usize },
    #[error("Invalid tick_interval_millis: {configured} (must be greater than zero)")]
    TickInterval { configured: u64 },
    #[error("Invalid sources.registry_url: {configured}")]
    RegistryUrl { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::PaletteLoadTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Palette load timeout out of range!\n\n\
                    Your configured value: {configured} ms\n\
                    Valid range: {min_limit} - {max_limit} ms\n\n\
                    Please update palette_load_timeout_ms in config.toml."
                )
            }
            ConfigValidationError::MaxConcurrentTasks { configured, limit } => {
                format!(
                    "Concurrent task limit out of range!\n\n\
                    Your configured value: {configured}\n\
                    Valid range: 1 - {limit}\n\n\
                    Please update max_concurrent_tasks in config.toml."
                )
            }
            ConfigValidationError::TickInterval { configured } => {
                format!(
                    "Tick interval must be greater than zero!\n\n\
                    Your configured value: {configured} ms\n\n\
                    Please update tick_interval_millis in config.toml."
                )
            }
            ConfigValidationError::RegistryUrl { configured } => {
                format!(
                    "The configured theme registry URL is not usable!\n\n\
                    Your configured value: {configured}\n\n\
                    The registry must be an absolute https URL (plain http is\n\
                    accepted for localhost only). Please update sources.registry_url\n\
                    in config.toml."
                )
            }
        }
    }
}
