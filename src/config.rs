use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Name of the preset the settings started from
    pub preset: String,
    /// All simulation settings
    pub settings: SimulationSettings,
    /// Fire the opening salvo on start
    #[serde(default)]
    pub opening_salvo: bool,
    /// Target frames per second (app-level)
    pub fps: u32,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.settings.sanitize();
        config.fps = config.fps.clamp(10, 120);
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            preset: "Garden".to_string(),
            settings: SimulationSettings::default(),
            opening_salvo: false,
            fps: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HueRange;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            preset: "Finale".to_string(),
            settings: SimulationSettings {
                burst_particles: 150,
                glow: true,
                spawn_cap: 15,
                drift_probability: 0.3,
                drift_hues: HueRange::new(280.0, 320.0),
                ..Default::default()
            },
            opening_salvo: true,
            fps: 30,
        };

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_sanitizes_values() {
        let mut config = AppConfig::default();
        config.settings.spawn_cap = 10_000;
        config.settings.spawn_probability = 4.0;
        config.settings.trail_particles = 50_000_000;
        config.settings.glow_blur = -1e9;
        config.settings.ambient_speed = 1e30;
        config.fps = 1;

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.settings.spawn_cap, 50);
        assert_eq!(loaded.settings.spawn_probability, 1.0);
        assert_eq!(loaded.settings.trail_particles, 50);
        assert_eq!(loaded.settings.glow_blur, 0.0);
        assert_eq!(loaded.settings.ambient_speed, 10.0);
        assert_eq!(loaded.fps, 10);
    }

    #[test]
    fn test_missing_salvo_defaults_false() {
        let mut value = serde_json::to_value(AppConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("opening_salvo");
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), value.to_string()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert!(!loaded.opening_salvo);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(result.is_err());
    }
}
