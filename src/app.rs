use crate::braille;
use crate::config::AppConfig;
use crate::export::{self, GifRecorder};
use crate::input::{self, InputResponse};
use crate::presets::{Preset, PresetManager};
use crate::simulation::FireworksSimulation;
use crate::surface::PixelCanvas;
use crossterm::event::MouseEvent;
use ratatui::layout::Rect;
use std::path::Path;
use tracing::{info, warn};

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Particles,
    SpawnChance,
    SpawnCap,
    Gravity,
    Damping,
    Fade,
}

impl Focus {
    /// Tab cycles through parameters in sidebar order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None => Focus::Particles,
            Focus::Particles => Focus::SpawnChance,
            Focus::SpawnChance => Focus::SpawnCap,
            Focus::SpawnCap => Focus::Gravity,
            Focus::Gravity => Focus::Damping,
            Focus::Damping => Focus::Fade,
            Focus::Fade => Focus::Particles,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::None => Focus::Fade,
            Focus::Particles => Focus::Fade,
            Focus::SpawnChance => Focus::Particles,
            Focus::SpawnCap => Focus::SpawnChance,
            Focus::Gravity => Focus::SpawnCap,
            Focus::Damping => Focus::Gravity,
            Focus::Fade => Focus::Damping,
        }
    }
}

/// Main application state
pub struct App {
    pub simulation: FireworksSimulation,
    pub canvas: PixelCanvas,
    pub presets: PresetManager,
    pub preset_name: String,
    pub opening_salvo: bool,
    pub focus: Focus,
    pub paused: bool,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub fps: u32,
    /// Last message shown in the status box (errors, saved files)
    pub status_message: Option<String>,
    pub recorder: Option<GifRecorder>,
}

impl App {
    pub fn new(
        canvas_width: u16,
        canvas_height: u16,
        config: AppConfig,
        presets: PresetManager,
        seed: Option<u64>,
    ) -> Self {
        let (w, h) = braille::calculate_surface_size(canvas_width, canvas_height);
        let simulation = match seed {
            Some(seed) => FireworksSimulation::with_seed(w as f32, h as f32, config.settings, seed),
            None => FireworksSimulation::new(w as f32, h as f32, config.settings),
        };
        let mut app = Self {
            simulation,
            canvas: PixelCanvas::new(w, h),
            presets,
            preset_name: config.preset,
            opening_salvo: config.opening_salvo,
            focus: Focus::None,
            paused: false,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            fps: config.fps,
            status_message: None,
            recorder: None,
        };
        if app.opening_salvo {
            app.simulation.launch_opening_salvo();
        }
        app
    }

    /// Run one animation frame
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.simulation.tick(&mut self.canvas);

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.capture(&self.canvas, self.simulation.frame());
            if recorder.is_full() {
                self.stop_recording();
            }
        }
    }

    /// Route a terminal mouse event over `canvas_area` into the simulation
    pub fn handle_mouse(&mut self, event: &MouseEvent, canvas_area: Rect) -> InputResponse {
        match input::map_mouse_event(event, canvas_area) {
            Some(pointer) => self.simulation.handle_pointer(pointer),
            None => InputResponse::default(),
        }
    }

    /// Current configuration, suitable for export
    pub fn config(&self) -> AppConfig {
        AppConfig {
            preset: self.preset_name.clone(),
            settings: self.simulation.settings.clone(),
            opening_salvo: self.opening_salvo,
            fps: self.fps,
            ..Default::default()
        }
    }

    /// Replace the running profile and restart the show
    pub fn apply_preset(&mut self, preset: &Preset) {
        info!(preset = %preset.name, "applying preset");
        self.simulation.settings = preset.settings.clone();
        self.preset_name = preset.name.clone();
        self.opening_salvo = preset.opening_salvo;
        self.reset();
    }

    /// Switch to the next preset in the list
    pub fn cycle_preset(&mut self) {
        if let Some(next) = self.presets.next_after(&self.preset_name).cloned() {
            self.apply_preset(&next);
        }
    }

    /// Save the running settings as a user preset named after the current one
    pub fn save_user_preset(&mut self) {
        let name = format!("{} (custom)", self.preset_name.trim_end_matches(" (custom)"));
        let preset = Preset::new(
            name.clone(),
            "Saved from the running simulation",
            self.simulation.settings.clone(),
            self.opening_salvo,
        );
        match self.presets.save_preset(preset) {
            Ok(path) => {
                self.preset_name = name;
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => self.report_error(e),
        }
    }

    pub fn export_config(&mut self, path: &Path) {
        match self.config().save_to_file(path) {
            Ok(()) => self.set_status(format!("Config written to {}", path.display())),
            Err(e) => self.report_error(e),
        }
    }

    /// Wipe the sky and start over
    pub fn reset(&mut self) {
        self.simulation.clear();
        self.canvas.clear();
        if self.opening_salvo {
            self.simulation.launch_opening_salvo();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_auto_launch(&mut self) {
        self.simulation.toggle_auto_launch();
    }

    pub fn toggle_glow(&mut self) {
        self.simulation.settings.toggle_glow();
    }

    pub fn launch_barrage(&mut self) {
        self.simulation.launch_barrage();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused(&mut self, up: bool) {
        let sign = if up { 1.0 } else { -1.0 };
        let settings = &mut self.simulation.settings;
        match self.focus {
            Focus::None => {}
            Focus::Particles => settings.adjust_burst_particles(if up { 10 } else { -10 }),
            Focus::SpawnChance => settings.adjust_spawn_probability(0.01 * sign),
            Focus::SpawnCap => settings.adjust_spawn_cap(if up { 1 } else { -1 }),
            Focus::Gravity => settings.adjust_burst_gravity(0.01 * sign),
            Focus::Damping => settings.adjust_burst_damping(0.005 * sign),
            Focus::Fade => settings.adjust_fade_alpha(0.01 * sign),
        }
    }

    /// Resize the surface to match a new canvas size.
    /// Live particles keep flying; only spawn bounds change.
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (w, h) = braille::calculate_surface_size(canvas_width, canvas_height);
        self.canvas.resize(w, h);
        self.simulation.resize(w as f32, h as f32);
    }

    pub fn snapshot(&mut self) {
        let path = export::timestamped_path("fireworks", "png");
        match export::save_png(&self.canvas, &path) {
            Ok(()) => self.set_status(format!("Saved {}", path.display())),
            Err(e) => self.report_error(e),
        }
    }

    pub fn toggle_recording(&mut self) {
        if self.recorder.is_some() {
            self.stop_recording();
        } else {
            self.recorder = Some(GifRecorder::new(&self.canvas));
            self.set_status("Recording...".to_string());
        }
    }

    fn stop_recording(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let path = export::timestamped_path("fireworks", "gif");
        match recorder.finish(&path) {
            Ok(frames) => self.set_status(format!("Saved {} ({} frames)", path.display(), frames)),
            Err(e) => self.report_error(e),
        }
    }

    fn set_status(&mut self, message: String) {
        info!("{}", message);
        self.status_message = Some(message);
    }

    fn report_error(&mut self, message: String) {
        warn!("{}", message);
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimulationSettings;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};

    fn quiet_app() -> App {
        let config = AppConfig {
            settings: SimulationSettings {
                auto_launch: false,
                ..Default::default()
            },
            ..Default::default()
        };
        App::new(40, 20, config, PresetManager::with_dir(None), Some(1))
    }

    #[test]
    fn test_surface_matches_canvas() {
        let app = quiet_app();
        assert_eq!((app.canvas.width_px(), app.canvas.height_px()), (80, 80));
        assert_eq!(app.simulation.bounds(), (80.0, 80.0));
    }

    #[test]
    fn test_pause_stops_frames() {
        let mut app = quiet_app();
        app.tick();
        assert_eq!(app.simulation.frame(), 1);
        app.toggle_pause();
        app.tick();
        assert_eq!(app.simulation.frame(), 1);
    }

    #[test]
    fn test_mouse_launches_burst() {
        let mut app = quiet_app();
        let area = Rect::new(1, 1, 40, 20);
        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        let response = app.handle_mouse(&event, area);
        assert_eq!(response.launched, 1);
        assert_eq!(app.simulation.bursts()[0].origin(), (9.0, 10.0));
        assert!(app.simulation.pointer_held());
    }

    #[test]
    fn test_middle_click_is_consumed() {
        let mut app = quiet_app();
        let area = Rect::new(1, 1, 40, 20);
        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Middle),
            column: 5,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        let response = app.handle_mouse(&event, area);
        assert_eq!(response, InputResponse { launched: 1, prevent_default: true });
        assert!(!app.simulation.pointer_held());

        // Outside the canvas nothing happens and nothing is consumed
        let outside = MouseEvent { column: 0, ..event };
        assert_eq!(app.handle_mouse(&outside, area), InputResponse::default());
    }

    #[test]
    fn test_cycle_preset_applies_settings() {
        let mut app = quiet_app();
        app.cycle_preset();
        assert_eq!(app.preset_name, "Finale");
        assert_eq!(app.simulation.settings.burst_particles, 150);
        assert!(app.opening_salvo);
        assert_eq!(app.simulation.pending_launches(), 5);
    }

    #[test]
    fn test_resize_keeps_live_bursts() {
        let mut app = quiet_app();
        app.simulation.spawn_burst_at(10.0, 10.0);
        app.resize(10, 5);
        assert_eq!(app.canvas.width_px(), 20);
        assert_eq!(app.simulation.bounds(), (20.0, 20.0));
        assert_eq!(app.simulation.stats().bursts, 1);
        app.tick();
        assert_eq!(app.simulation.stats().burst_particles, 100);
    }

    #[test]
    fn test_adjust_focused() {
        let mut app = quiet_app();
        app.next_focus();
        assert_eq!(app.focus, Focus::Particles);
        app.adjust_focused(true);
        assert_eq!(app.simulation.settings.burst_particles, 110);
        app.next_focus();
        app.next_focus();
        assert_eq!(app.focus, Focus::SpawnCap);
        app.adjust_focused(false);
        assert_eq!(app.simulation.settings.spawn_cap, 9);
        app.prev_focus();
        assert_eq!(app.focus, Focus::SpawnChance);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut app = quiet_app();
        app.simulation.spawn_burst_at(10.0, 10.0);
        app.tick();
        app.reset();
        assert_eq!(app.simulation.stats().bursts, 0);
        assert!(app.canvas.to_rgb8().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_config_reflects_runtime_changes() {
        let mut app = quiet_app();
        app.toggle_glow();
        let config = app.config();
        assert!(config.settings.glow);
        assert_eq!(config.preset, "Garden");
    }
}
