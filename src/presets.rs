use crate::color::HueRange;
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A named simulation profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: SimulationSettings,
    /// Fire the staggered opening bursts when the preset starts
    #[serde(default)]
    pub opening_salvo: bool,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: SimulationSettings,
        opening_salvo: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
            opening_salvo,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
    dir: Option<PathBuf>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    /// Manager backed by a specific presets directory (None = built-ins only)
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        let mut manager = Self {
            builtin: builtin_presets(),
            user: Vec::new(),
            dir,
        };
        manager.load_user_presets();
        manager
    }

    /// Get the presets directory path
    fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fireworks-sim").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        let Some(dir) = self.dir.as_deref() else {
            return;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match load_preset(&path) {
                    Ok(mut preset) => {
                        preset.settings.sanitize();
                        self.user.push(preset);
                    }
                    Err(e) => warn!(path = %path.display(), "skipping preset: {}", e),
                }
            }
        }
        self.user.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Save a preset to disk
    pub fn save_preset(&mut self, preset: Preset) -> Result<PathBuf, String> {
        let dir = self.dir.as_deref().ok_or("Could not determine config directory")?;

        fs::create_dir_all(dir).map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let path = dir.join(format!("{}.json", sanitize_filename(&preset.name)));

        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        // Replace an existing user preset with the same name
        match self.user.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.user.push(preset),
        }

        Ok(path)
    }

    /// Delete a user preset
    #[allow(dead_code)]
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = self.dir.as_deref().ok_or("Could not determine config directory")?;

        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", sanitize_filename(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }

        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Preset following `name` in display order, wrapping around
    pub fn next_after(&self, name: &str) -> Option<&Preset> {
        let all: Vec<&Preset> = self.all_presets().collect();
        let pos = all.iter().position(|p| p.name.eq_ignore_ascii_case(name));
        match pos {
            Some(i) => all.get((i + 1) % all.len()).copied(),
            None => all.first().copied(),
        }
    }

    /// Get preset names for display
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

fn load_preset(path: &Path) -> Result<Preset, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read preset: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse preset: {}", e))
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// The presets that ship with the app
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        // Garden - interactive overlay with pointer trails
        Preset::new(
            "Garden",
            "Click to launch, hold and drag to paint trails",
            SimulationSettings::default(),
            false,
        ),
        // Finale - denser, faster, glowing bursts over rising embers
        Preset::new(
            "Finale",
            "Glowing grand finale with rising embers",
            SimulationSettings {
                burst_particles: 150,
                burst_speed_max: 8.0,
                burst_size_max: 5.0,
                glow: true,
                spawn_probability: 0.05,
                spawn_cap: 15,
                drift_probability: 0.3,
                drift_hues: HueRange::new(300.0, 360.0),
                ..Default::default()
            },
            true,
        ),
        // Quiet Night - sparse, slow, long trails
        Preset::new(
            "Quiet Night",
            "Occasional slow bursts with long afterglow",
            SimulationSettings {
                burst_particles: 80,
                burst_speed_max: 5.0,
                spawn_probability: 0.01,
                spawn_cap: 3,
                fade_alpha: 0.05,
                ..Default::default()
            },
            false,
        ),
        // Storm - many small fast bursts, short trails
        Preset::new(
            "Storm",
            "Rapid crackling bursts with short trails",
            SimulationSettings {
                burst_particles: 60,
                burst_speed_min: 3.0,
                burst_speed_max: 9.0,
                burst_size_max: 2.0,
                burst_damping: 0.95,
                spawn_probability: 0.15,
                spawn_cap: 25,
                fade_alpha: 0.2,
                ..Default::default()
            },
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_profiles() {
        let manager = PresetManager::with_dir(None);
        let garden = manager.find("garden").unwrap();
        assert_eq!(garden.settings.burst_particles, 100);
        assert_eq!(garden.settings.spawn_cap, 10);
        assert!(!garden.settings.glow);

        let finale = manager.find("Finale").unwrap();
        assert_eq!(finale.settings.burst_particles, 150);
        assert_eq!(finale.settings.burst_speed_max, 8.0);
        assert_eq!(finale.settings.spawn_probability, 0.05);
        assert_eq!(finale.settings.spawn_cap, 15);
        assert!(finale.settings.glow);
        assert!(finale.opening_salvo);
        assert_eq!(finale.settings.drift_probability, 0.3);
    }

    #[test]
    fn test_save_load_delete() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("presets");
        let mut manager = PresetManager::with_dir(Some(dir.clone()));
        assert!(manager.user.is_empty());

        let preset = Preset::new(
            "My Show/1",
            "custom",
            SimulationSettings {
                spawn_cap: 7,
                ..Default::default()
            },
            true,
        );
        let path = manager.save_preset(preset).unwrap();
        assert_eq!(path.file_name().unwrap(), "My_Show_1.json");

        // A fresh manager sees the saved preset
        let reloaded = PresetManager::with_dir(Some(dir.clone()));
        let found = reloaded.find("my show/1").unwrap();
        assert_eq!(found.settings.spawn_cap, 7);
        assert!(found.opening_salvo);

        manager.delete_preset("My Show/1").unwrap();
        assert!(!path.exists());
        assert!(PresetManager::with_dir(Some(dir)).user.is_empty());
    }

    #[test]
    fn test_invalid_preset_files_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.json"), "{ nope").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();
        let manager = PresetManager::with_dir(Some(tmp.path().to_path_buf()));
        assert!(manager.user.is_empty());
    }

    #[test]
    fn test_save_without_dir_fails() {
        let mut manager = PresetManager::with_dir(None);
        let preset = manager.builtin[0].clone();
        assert!(manager.save_preset(preset).is_err());
    }

    #[test]
    fn test_next_after_wraps() {
        let manager = PresetManager::with_dir(None);
        assert_eq!(manager.next_after("Garden").unwrap().name, "Finale");
        assert_eq!(manager.next_after("Storm").unwrap().name, "Garden");
        assert_eq!(manager.next_after("unknown").unwrap().name, "Garden");
        assert_eq!(manager.preset_names().len(), 4);
    }
}
