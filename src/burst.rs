use crate::color::{Hsl, HueRange, Rgb};
use crate::particle::{sample, Particle};
use crate::settings::SimulationSettings;
use crate::surface::Surface;
use rand::Rng;
use std::f32::consts::TAU;

/// One firework explosion: particles sharing an origin and a color.
///
/// The particle set is created all at once and only shrinks afterwards.
#[derive(Debug, Clone)]
pub struct Burst {
    x: f32,
    y: f32,
    hue: f32,
    color: Rgb,
    particles: Vec<Particle>,
}

impl Burst {
    /// Explode at (x, y) with a random hue
    pub fn spawn<R: Rng>(x: f32, y: f32, rng: &mut R, settings: &SimulationSettings) -> Self {
        let hue = HueRange::FULL.sample(rng);
        let color = Hsl::new(hue, settings.burst_saturation, settings.burst_lightness).to_rgb();

        let particles = (0..settings.burst_particles)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let speed = sample(rng, settings.burst_speed_min, settings.burst_speed_max);
                let size = sample(rng, settings.burst_size_min, settings.burst_size_max);
                Particle::new(
                    x,
                    y,
                    angle.cos() * speed,
                    angle.sin() * speed,
                    size,
                    color,
                    settings.initial_life,
                    settings.burst_gravity,
                    settings.burst_damping,
                )
            })
            .collect();

        Self {
            x,
            y,
            hue,
            color,
            particles,
        }
    }

    /// Build from an explicit particle set
    #[allow(dead_code)]
    pub fn from_particles(x: f32, y: f32, color: Rgb, particles: Vec<Particle>) -> Self {
        Self {
            x,
            y,
            hue: 0.0,
            color,
            particles,
        }
    }

    /// Advance every particle and drop the expired ones in the same pass
    pub fn advance(&mut self) {
        self.particles.retain_mut(|p| {
            p.advance();
            !p.is_expired()
        });
    }

    pub fn draw<S: Surface>(&self, surface: &mut S, glow: Option<f32>) {
        match glow {
            Some(blur) => {
                for p in &self.particles {
                    p.draw_glow(surface, blur);
                }
            }
            None => {
                for p in &self.particles {
                    p.draw(surface);
                }
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[allow(dead_code)]
    pub fn origin(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[allow(dead_code)]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[allow(dead_code)]
    pub fn hue(&self) -> f32 {
        self.hue
    }

    #[allow(dead_code)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings_with(count: usize) -> SimulationSettings {
        SimulationSettings {
            burst_particles: count,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let settings = settings_with(150);
        let burst = Burst::spawn(30.0, 40.0, &mut rng, &settings);

        assert_eq!(burst.len(), 150);
        assert!(!burst.is_done());
        assert_eq!(burst.origin(), (30.0, 40.0));
        for p in burst.particles() {
            assert_eq!(p.color, burst.color());
            assert_eq!((p.x, p.y), (30.0, 40.0));
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            assert!(speed >= 2.0 - 1e-4 && speed < 7.0 + 1e-4);
            assert!((1.0..4.0).contains(&p.size));
            assert_eq!(p.opacity(), 1.0);
        }
        assert!((0.0..360.0).contains(&burst.hue()));
    }

    #[test]
    fn test_single_step_known_velocity() {
        // speed 4 at angle 0 under burst physics
        let p = Particle::new(100.0, 50.0, 4.0, 0.0, 2.0, Rgb::WHITE, 100, 0.1, 0.97);
        let mut burst = Burst::from_particles(100.0, 50.0, Rgb::WHITE, vec![p]);
        burst.advance();

        let p = &burst.particles()[0];
        assert!((p.vx - 3.88).abs() < 1e-5);
        assert!((p.vy - 0.1).abs() < 1e-6);
        assert!((p.x - 103.88).abs() < 1e-4);
        assert!((p.y - 50.1).abs() < 1e-5);
        assert!((p.opacity() - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_expired_particles_removed_same_frame() {
        let short = Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, Rgb::WHITE, 1, 0.1, 0.97);
        let long = Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, Rgb::WHITE, 3, 0.1, 0.97);
        let mut burst = Burst::from_particles(
            0.0,
            0.0,
            Rgb::WHITE,
            vec![short.clone(), long.clone(), short.clone(), short, long],
        );

        burst.advance();
        assert_eq!(burst.len(), 2);
        // Survivors were advanced exactly once
        assert!(burst.particles().iter().all(|p| p.life() == 2));

        burst.advance();
        burst.advance();
        assert!(burst.is_done());
        assert!(burst.particles().is_empty());
    }

    #[test]
    fn test_done_after_initial_life_frames() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut burst = Burst::spawn(0.0, 0.0, &mut rng, &settings_with(100));
        for _ in 0..99 {
            burst.advance();
        }
        assert_eq!(burst.len(), 100);
        burst.advance();
        assert!(burst.is_done());
    }

    #[test]
    fn test_draw_with_and_without_glow() {
        let mut rng = StdRng::seed_from_u64(3);
        let burst = Burst::spawn(10.0, 10.0, &mut rng, &settings_with(20));

        let mut plain = RecordingSurface::default();
        burst.draw(&mut plain, None);
        assert_eq!(plain.circles(), 20);
        assert_eq!(plain.glows(), 0);

        let mut glowing = RecordingSurface::default();
        burst.draw(&mut glowing, Some(15.0));
        assert_eq!(glowing.circles(), 20);
        assert_eq!(glowing.glows(), 20);
    }
}
