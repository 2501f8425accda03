use crate::color::HueRange;
use serde::{Deserialize, Serialize};

/// Frame counts used for timed launches, assuming a ~60 fps host
pub const FRAMES_PER_SECOND: u64 = 60;

/// Convert milliseconds to a whole number of frames
pub const fn ms_to_frames(ms: u64) -> u64 {
    ms * FRAMES_PER_SECOND / 1000
}

/// All simulation parameters consolidated into one profile struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    // === Particle Lifetime ===
    /// Frames a particle lives; opacity is life / initial_life
    pub initial_life: i32,

    // === Burst Parameters ===
    /// Particles created by every burst (10-400)
    pub burst_particles: usize,
    /// Minimum initial burst particle speed
    pub burst_speed_min: f32,
    /// Maximum initial burst particle speed (exclusive)
    pub burst_speed_max: f32,
    /// Minimum burst particle radius
    pub burst_size_min: f32,
    /// Maximum burst particle radius (exclusive)
    pub burst_size_max: f32,
    /// Downward acceleration added to burst particles each frame
    pub burst_gravity: f32,
    /// Velocity multiplier applied to burst particles each frame (<1)
    pub burst_damping: f32,
    /// Saturation of burst colors (percent)
    pub burst_saturation: f32,
    /// Lightness of burst colors (percent)
    pub burst_lightness: f32,
    /// Paint a blurred glow under each burst particle
    pub glow: bool,
    /// Blur radius of the glow pass
    pub glow_blur: f32,

    // === Ambient Parameters ===
    /// Ambient particle velocity components are drawn from +/- this value
    pub ambient_speed: f32,
    /// Minimum ambient particle radius
    pub ambient_size_min: f32,
    /// Maximum ambient particle radius (exclusive)
    pub ambient_size_max: f32,
    /// Downward acceleration for ambient particles
    pub ambient_gravity: f32,
    /// Velocity multiplier for ambient particles
    pub ambient_damping: f32,
    /// Ambient particles emitted per frame while the pointer is held
    pub trail_particles: usize,
    /// Lightness of pointer trail colors (percent)
    pub trail_lightness: f32,
    /// Per-frame chance of a drift particle rising from the bottom edge
    pub drift_probability: f32,
    /// Hue window for drift particles
    pub drift_hues: HueRange,

    // === Spawn Policy ===
    /// Randomly launch bursts
    pub auto_launch: bool,
    /// Per-frame chance of a random burst (0.0-1.0)
    pub spawn_probability: f32,
    /// Random launches stop while this many bursts are live
    pub spawn_cap: usize,
    /// Random bursts originate in the top fraction of the surface
    pub sky_fraction: f32,

    // === Surface ===
    /// Alpha of the black wash painted every frame (trail length)
    pub fade_alpha: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_life: 100,

            burst_particles: 100,
            burst_speed_min: 2.0,
            burst_speed_max: 7.0,
            burst_size_min: 1.0,
            burst_size_max: 4.0,
            burst_gravity: 0.1,
            burst_damping: 0.97,
            burst_saturation: 100.0,
            burst_lightness: 60.0,
            glow: false,
            glow_blur: 15.0,

            ambient_speed: 1.5,
            ambient_size_min: 1.0,
            ambient_size_max: 3.0,
            ambient_gravity: 0.05,
            ambient_damping: 0.99,
            trail_particles: 5,
            trail_lightness: 50.0,
            drift_probability: 0.0,
            drift_hues: HueRange::new(300.0, 360.0),

            auto_launch: true,
            spawn_probability: 0.03,
            spawn_cap: 10,
            sky_fraction: 0.5,

            fade_alpha: 0.1,
        }
    }
}

impl SimulationSettings {
    /// Adjust particles per burst (clamped to 10-400)
    pub fn adjust_burst_particles(&mut self, delta: i32) {
        self.burst_particles = (self.burst_particles as i32 + delta).clamp(10, 400) as usize;
    }

    /// Adjust random launch chance (clamped to 0.0-1.0)
    pub fn adjust_spawn_probability(&mut self, delta: f32) {
        self.spawn_probability = (self.spawn_probability + delta).clamp(0.0, 1.0);
    }

    /// Adjust the live burst cap (clamped to 1-50)
    pub fn adjust_spawn_cap(&mut self, delta: i32) {
        self.spawn_cap = (self.spawn_cap as i32 + delta).clamp(1, 50) as usize;
    }

    /// Adjust burst gravity (clamped to 0.0-1.0)
    pub fn adjust_burst_gravity(&mut self, delta: f32) {
        self.burst_gravity = (self.burst_gravity + delta).clamp(0.0, 1.0);
    }

    /// Adjust burst damping (clamped to 0.80-0.999)
    pub fn adjust_burst_damping(&mut self, delta: f32) {
        self.burst_damping = (self.burst_damping + delta).clamp(0.80, 0.999);
    }

    /// Adjust fade alpha (clamped to 0.01-1.0)
    pub fn adjust_fade_alpha(&mut self, delta: f32) {
        self.fade_alpha = (self.fade_alpha + delta).clamp(0.01, 1.0);
    }

    pub fn toggle_glow(&mut self) {
        self.glow = !self.glow;
    }

    pub fn toggle_auto_launch(&mut self) {
        self.auto_launch = !self.auto_launch;
    }

    /// Force every value back into its valid range (used after CLI/JSON input)
    pub fn sanitize(&mut self) {
        let defaults = Self::default();

        self.initial_life = self.initial_life.clamp(1, 1000);

        self.burst_particles = self.burst_particles.clamp(10, 400);
        self.burst_speed_min = bounded(self.burst_speed_min, 0.0, 20.0, defaults.burst_speed_min);
        self.burst_speed_max = bounded(self.burst_speed_max, self.burst_speed_min, 20.0, defaults.burst_speed_max);
        self.burst_size_min = bounded(self.burst_size_min, 0.1, 10.0, defaults.burst_size_min);
        self.burst_size_max = bounded(self.burst_size_max, self.burst_size_min, 10.0, defaults.burst_size_max);
        self.burst_gravity = bounded(self.burst_gravity, 0.0, 1.0, defaults.burst_gravity);
        self.burst_damping = bounded(self.burst_damping, 0.80, 0.999, defaults.burst_damping);
        self.burst_saturation = bounded(self.burst_saturation, 0.0, 100.0, defaults.burst_saturation);
        self.burst_lightness = bounded(self.burst_lightness, 0.0, 100.0, defaults.burst_lightness);
        self.glow_blur = bounded(self.glow_blur, 0.0, 50.0, defaults.glow_blur);

        self.ambient_speed = bounded(self.ambient_speed, 0.0, 10.0, defaults.ambient_speed);
        self.ambient_size_min = bounded(self.ambient_size_min, 0.1, 10.0, defaults.ambient_size_min);
        self.ambient_size_max = bounded(self.ambient_size_max, self.ambient_size_min, 10.0, defaults.ambient_size_max);
        self.ambient_gravity = bounded(self.ambient_gravity, 0.0, 1.0, defaults.ambient_gravity);
        self.ambient_damping = bounded(self.ambient_damping, 0.80, 0.999, defaults.ambient_damping);
        self.trail_particles = self.trail_particles.clamp(0, 50);
        self.trail_lightness = bounded(self.trail_lightness, 0.0, 100.0, defaults.trail_lightness);
        self.drift_probability = bounded(self.drift_probability, 0.0, 1.0, defaults.drift_probability);
        self.drift_hues.start = bounded(self.drift_hues.start, 0.0, 360.0, defaults.drift_hues.start);
        self.drift_hues.end = bounded(self.drift_hues.end, self.drift_hues.start, 360.0, defaults.drift_hues.end);

        self.spawn_probability = bounded(self.spawn_probability, 0.0, 1.0, defaults.spawn_probability);
        self.spawn_cap = self.spawn_cap.clamp(1, 50);
        self.sky_fraction = bounded(self.sky_fraction, 0.05, 1.0, defaults.sky_fraction);

        self.fade_alpha = bounded(self.fade_alpha, 0.01, 1.0, defaults.fade_alpha);
    }
}

/// Clamp into [min, max]; non-finite input falls back to `fallback` (itself clamped)
fn bounded(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    let value = if value.is_finite() { value } else { fallback };
    value.max(min).min(max)
}
