use crate::burst::Burst;
use crate::color::{Hsl, HueRange};
use crate::input::{InputResponse, PointerEvent};
use crate::particle::Particle;
use crate::settings::{ms_to_frames, SimulationSettings};
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Bursts in the opening salvo
const SALVO_BURSTS: usize = 5;
const SALVO_DELAY_MS: u64 = 500;
const SALVO_INTERVAL_MS: u64 = 300;

/// Bursts in a barrage
const BARRAGE_BURSTS: usize = 10;
const BARRAGE_INTERVAL_MS: u64 = 100;
/// Barrage bursts may reach lower than random launches
const BARRAGE_SKY_FRACTION: f32 = 0.7;

/// A random launch released on a later frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledLaunch {
    due_frame: u64,
    sky_fraction: f32,
}

/// Read-only counts for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationStats {
    pub bursts: usize,
    pub burst_particles: usize,
    pub ambient_particles: usize,
}

/// Fireworks simulation state.
///
/// Owns every live burst and ambient particle. The host calls `tick` once per
/// displayed frame and feeds pointer events in between; nothing runs on its
/// own.
pub struct FireworksSimulation {
    pub settings: SimulationSettings,
    bursts: Vec<Burst>,
    ambient: Vec<Particle>,
    scheduled: Vec<ScheduledLaunch>,
    pointer: (f32, f32),
    pointer_held: bool,
    width: f32,
    height: f32,
    frame: u64,
    rng: StdRng,
}

impl FireworksSimulation {
    pub fn new(width: f32, height: f32, settings: SimulationSettings) -> Self {
        Self::with_rng(width, height, settings, StdRng::from_entropy())
    }

    /// Deterministic simulation for a given seed
    pub fn with_seed(width: f32, height: f32, settings: SimulationSettings, seed: u64) -> Self {
        Self::with_rng(width, height, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f32, height: f32, settings: SimulationSettings, rng: StdRng) -> Self {
        Self {
            settings,
            bursts: Vec::new(),
            ambient: Vec::new(),
            scheduled: Vec::new(),
            pointer: (0.0, 0.0),
            pointer_held: false,
            width,
            height,
            frame: 0,
            rng,
        }
    }

    /// Run one animation frame against `surface`
    pub fn tick<S: Surface>(&mut self, surface: &mut S) {
        self.release_scheduled();

        // Wash instead of clear so motion leaves trails
        surface.fade(self.settings.fade_alpha);

        let glow = self.settings.glow.then_some(self.settings.glow_blur);
        self.bursts.retain_mut(|burst| {
            burst.advance();
            burst.draw(surface, glow);
            !burst.is_done()
        });

        if self.settings.auto_launch
            && self.rng.gen::<f32>() < self.settings.spawn_probability
            && self.bursts.len() < self.settings.spawn_cap
        {
            self.spawn_random_burst(self.settings.sky_fraction);
        }

        if self.pointer_held {
            self.emit_trail();
        }

        if self.settings.drift_probability > 0.0 && self.rng.gen::<f32>() < self.settings.drift_probability {
            self.emit_drift();
        }

        self.ambient.retain_mut(|p| {
            p.advance();
            p.draw(surface);
            !p.is_expired()
        });

        self.frame += 1;
    }

    /// Launch a burst at an exact position
    pub fn spawn_burst_at(&mut self, x: f32, y: f32) {
        let burst = Burst::spawn(x, y, &mut self.rng, &self.settings);
        self.bursts.push(burst);
    }

    /// Launch a burst anywhere across the width, within the top `sky_fraction`
    pub fn spawn_random_burst(&mut self, sky_fraction: f32) {
        let x = self.rng.gen::<f32>() * self.width;
        let y = self.rng.gen::<f32>() * self.height * sky_fraction;
        self.spawn_burst_at(x, y);
    }

    /// Apply a pointer event; takes effect on the next frame
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputResponse {
        let (x, y) = event.position();
        match event {
            PointerEvent::Down { .. } => {
                self.pointer = (x, y);
                self.pointer_held = true;
                self.spawn_burst_at(x, y);
                debug!(x, y, "pointer down burst");
                InputResponse {
                    launched: 1,
                    prevent_default: false,
                }
            }
            PointerEvent::Up { .. } => {
                self.pointer_held = false;
                InputResponse::default()
            }
            PointerEvent::Move { .. } => {
                self.pointer = (x, y);
                InputResponse::default()
            }
            PointerEvent::Click { .. } => {
                self.spawn_burst_at(x, y);
                debug!(x, y, "click burst");
                InputResponse {
                    launched: 1,
                    prevent_default: false,
                }
            }
            PointerEvent::TouchStart { .. } => {
                self.pointer = (x, y);
                self.spawn_burst_at(x, y);
                debug!(x, y, "touch burst");
                InputResponse {
                    launched: 1,
                    prevent_default: true,
                }
            }
        }
    }

    /// Queue the five staggered bursts that open a show
    pub fn launch_opening_salvo(&mut self) {
        let start = self.frame + ms_to_frames(SALVO_DELAY_MS);
        for i in 0..SALVO_BURSTS as u64 {
            self.scheduled.push(ScheduledLaunch {
                due_frame: start + i * ms_to_frames(SALVO_INTERVAL_MS),
                sky_fraction: self.settings.sky_fraction,
            });
        }
    }

    /// Queue a rapid run of bursts, the first on the next frame
    pub fn launch_barrage(&mut self) {
        for i in 0..BARRAGE_BURSTS as u64 {
            self.scheduled.push(ScheduledLaunch {
                due_frame: self.frame + i * ms_to_frames(BARRAGE_INTERVAL_MS),
                sky_fraction: BARRAGE_SKY_FRACTION,
            });
        }
    }

    /// Change the spawn area. Particles already in flight keep their course.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Drop every burst, particle and pending launch
    pub fn clear(&mut self) {
        self.bursts.clear();
        self.ambient.clear();
        self.scheduled.clear();
        self.pointer_held = false;
    }

    pub fn toggle_auto_launch(&mut self) {
        self.settings.toggle_auto_launch();
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            bursts: self.bursts.len(),
            burst_particles: self.bursts.iter().map(Burst::len).sum(),
            ambient_particles: self.ambient.len(),
        }
    }

    #[allow(dead_code)]
    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    #[allow(dead_code)]
    pub fn ambient(&self) -> &[Particle] {
        &self.ambient
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    pub fn pending_launches(&self) -> usize {
        self.scheduled.len()
    }

    #[allow(dead_code)]
    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn release_scheduled(&mut self) {
        let frame = self.frame;
        let mut due = Vec::new();
        self.scheduled.retain(|launch| {
            if launch.due_frame <= frame {
                due.push(launch.sky_fraction);
                false
            } else {
                true
            }
        });
        for sky_fraction in due {
            self.spawn_random_burst(sky_fraction);
        }
    }

    fn emit_trail(&mut self) {
        let (x, y) = self.pointer;
        for _ in 0..self.settings.trail_particles {
            let hue = HueRange::FULL.sample(&mut self.rng);
            let color = Hsl::new(hue, 100.0, self.settings.trail_lightness).to_rgb();
            let p = Particle::ambient(x, y, color, &mut self.rng, &self.settings);
            self.ambient.push(p);
        }
    }

    fn emit_drift(&mut self) {
        let x = self.rng.gen::<f32>() * self.width;
        let hue = self.settings.drift_hues.sample(&mut self.rng);
        let color = Hsl::new(hue, 100.0, 60.0).to_rgb();
        let p = Particle::ambient(x, self.height, color, &mut self.rng, &self.settings);
        self.ambient.push(p);
    }
}
