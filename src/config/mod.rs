pub mod globe;
pub mod server;

use serde::Deserialize;
use std::path::Path;

pub use globe::GlobeConfig;
pub use server::ServerConfig;

/// Full application configuration: `[globe]` and `[server]` tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub globe: GlobeConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from a TOML file, apply `PORT` / `BASE_URL` from the environment or `./.env`,
    /// and validate.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let mut config = Self::parse(&content, path)?;
        config.server.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate without consulting the environment.
    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config = Self::parse(content, source_path)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str, source_path: &Path) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))
    }

    pub fn validate(&self) -> Result<(), String> {
        let errors: Vec<String> = [self.globe.validate(), self.server.validate()]
            .into_iter()
            .filter_map(Result::err)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_path() -> PathBuf {
        PathBuf::from("test-globe.toml")
    }

    #[test]
    fn valid_config_loads_both_tables() {
        let toml = r#"
            [globe]
            planet_radius = 100.0
            planet_tilt_deg = 0.0
            track_control_points = 12
            surface_texture = "textures/earth_surface.jpg"

            [server]
            port = 9090
            bind = "127.0.0.1"
            base_url = "https://latency.example"
            log_level = "debug"
        "#;
        let config = AppConfig::from_toml_str(toml, &test_path()).unwrap();
        assert_eq!(config.globe.planet_radius, 100.0);
        assert_eq!(config.globe.track_control_points, 12);
        assert_eq!(config.globe.surface_texture, "textures/earth_surface.jpg");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.log_level, "debug");
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config = AppConfig::from_toml_str("", &test_path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn errors_from_both_tables_reported_together() {
        let toml = "[globe]\nplanet_radius = 0.0\n[server]\nport = 10";
        let err = AppConfig::from_toml_str(toml, &test_path()).unwrap_err();
        assert!(err.contains("planet_radius"));
        assert!(err.contains("port"));
    }

    #[test]
    fn malformed_toml_includes_source_path() {
        let err = AppConfig::from_toml_str("[globe\nplanet_radius = 1", &test_path()).unwrap_err();
        assert!(err.contains("test-globe.toml"));
    }

    #[test]
    fn from_file_loads_valid_config() {
        let mut tmp = NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "[globe]\nmarker_radius = 40.0").unwrap();
        let config = AppConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.globe.marker_radius, 40.0);
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/globe.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }
}
