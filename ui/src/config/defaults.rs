/// Default base configuration file embedded in the binary
pub const DEFAULT_CONFIG: &str = include_str!("../../../config.default.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use claims::assert_ok;

    #[test]
    fn embedded_defaults_deserialize() {
        let config: Result<AppConfig, _> = toml::from_str(DEFAULT_CONFIG);
        let config = assert_ok!(config);
        assert_ok!(config.validate());
    }

    #[test]
    fn embedded_defaults_match_accessor_defaults() {
        // Keeps the shipped file honest: editing one side without the
        // other shows up here.
        let from_file: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        let from_accessors = AppConfig::default();

        assert_eq!(
            from_file.tick_interval(),
            from_accessors.tick_interval()
        );
        assert_eq!(
            from_file.palette_load_timeout(),
            from_accessors.palette_load_timeout()
        );
        assert_eq!(
            from_file.max_concurrent_tasks(),
            from_accessors.max_concurrent_tasks()
        );
        assert_eq!(from_file.keys().quit(), from_accessors.keys().quit());
    }
}
