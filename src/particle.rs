use crate::color::Rgb;
use crate::settings::SimulationSettings;
use crate::surface::Surface;
use rand::Rng;

/// Glow core radius relative to the particle
const GLOW_CORE_SCALE: f32 = 0.5;

/// A single decaying point.
///
/// Position and velocity are in surface pixels (per frame). Once created a
/// particle is only changed by `advance`; its opacity falls by
/// `1 / initial_life` every frame until it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: Rgb,
    life: i32,
    initial_life: i32,
    gravity: f32,
    damping: f32,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        size: f32,
        color: Rgb,
        life: i32,
        gravity: f32,
        damping: f32,
    ) -> Self {
        let life = life.max(1);
        Self {
            x,
            y,
            vx,
            vy,
            size,
            color,
            life,
            initial_life: life,
            gravity,
            damping,
        }
    }

    /// Free-floating particle with a small random drift (pointer trail, background)
    pub fn ambient<R: Rng>(x: f32, y: f32, color: Rgb, rng: &mut R, settings: &SimulationSettings) -> Self {
        let speed = settings.ambient_speed.abs();
        let size = sample(rng, settings.ambient_size_min, settings.ambient_size_max);
        let vx = sample(rng, -speed, speed);
        let vy = sample(rng, -speed, speed);
        Self::new(
            x,
            y,
            vx,
            vy,
            size,
            color,
            settings.initial_life,
            settings.ambient_gravity,
            settings.ambient_damping,
        )
    }

    /// Step one frame: damping, then gravity, then move, then age
    pub fn advance(&mut self) {
        self.vx *= self.damping;
        self.vy *= self.damping;
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.life -= 1;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0
    }

    #[allow(dead_code)]
    pub fn life(&self) -> i32 {
        self.life
    }

    #[allow(dead_code)]
    pub fn initial_life(&self) -> i32 {
        self.initial_life
    }

    pub fn opacity(&self) -> f32 {
        (self.life as f32 / self.initial_life as f32).clamp(0.0, 1.0)
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.fill_circle(self.x, self.y, self.size, self.color, self.opacity());
    }

    /// Plain circle plus a smaller blurred circle on top
    pub fn draw_glow<S: Surface>(&self, surface: &mut S, blur: f32) {
        let alpha = self.opacity();
        surface.fill_circle(self.x, self.y, self.size, self.color, alpha);
        surface.glow_circle(self.x, self.y, self.size * GLOW_CORE_SCALE, self.color, alpha, blur);
    }
}

/// Uniform sample from [min, max), tolerating an empty range
pub fn sample<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{DrawCall, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(life: i32) -> Particle {
        Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, Rgb::WHITE, life, 0.05, 0.99)
    }

    #[test]
    fn test_ambient_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = SimulationSettings::default();
        for _ in 0..1000 {
            let p = Particle::ambient(5.0, 6.0, Rgb::WHITE, &mut rng, &settings);
            assert!((1.0..3.0).contains(&p.size));
            assert!((-1.5..1.5).contains(&p.vx));
            assert!((-1.5..1.5).contains(&p.vy));
            assert_eq!(p.life(), 100);
            assert_eq!(p.opacity(), 1.0);
            assert_eq!((p.x, p.y), (5.0, 6.0));
        }
    }

    #[test]
    fn test_advance_update_order() {
        let mut p = Particle::new(10.0, 20.0, 2.0, -1.0, 1.0, Rgb::WHITE, 100, 0.05, 0.99);
        p.advance();
        let vx = 2.0 * 0.99;
        let vy = -1.0 * 0.99 + 0.05;
        assert!((p.vx - vx).abs() < 1e-6);
        assert!((p.vy - vy).abs() < 1e-6);
        assert!((p.x - (10.0 + vx)).abs() < 1e-5);
        assert!((p.y - (20.0 + vy)).abs() < 1e-5);
        assert_eq!(p.life(), 99);
    }

    #[test]
    fn test_opacity_strictly_decreases() {
        let mut p = still(100);
        let mut prev = p.opacity();
        assert_eq!(prev, 1.0);
        while !p.is_expired() {
            p.advance();
            let now = p.opacity();
            assert!((0.0..=1.0).contains(&now));
            assert!((prev - now - 0.01).abs() < 1e-5);
            prev = now;
        }
        assert_eq!(p.opacity(), 0.0);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut p = still(100);
        for _ in 0..99 {
            p.advance();
        }
        assert_eq!(p.life(), 1);
        assert!(!p.is_expired());
        p.advance();
        assert_eq!(p.life(), 0);
        assert!(p.is_expired());
    }

    #[test]
    fn test_draw_is_read_only() {
        let p = Particle::new(3.0, 4.0, 1.0, 1.0, 2.0, Rgb::new(1, 2, 3), 50, 0.1, 0.97);
        let before = p.clone();
        let mut surface = RecordingSurface::default();
        p.draw(&mut surface);
        p.draw_glow(&mut surface, 15.0);
        assert_eq!(p, before);
        assert_eq!(surface.circles(), 2);
        assert_eq!(surface.glows(), 1);
        assert_eq!(
            surface.calls[0],
            DrawCall::Circle { x: 3.0, y: 4.0, radius: 2.0, color: Rgb::new(1, 2, 3), alpha: 1.0 }
        );
        assert_eq!(
            surface.calls[2],
            DrawCall::Glow { x: 3.0, y: 4.0, radius: 1.0, color: Rgb::new(1, 2, 3), alpha: 1.0, blur: 15.0 }
        );
    }

    #[test]
    fn test_zero_life_is_raised() {
        let p = still(0);
        assert_eq!(p.initial_life(), 1);
        assert!(!p.is_expired());
    }
}
