use crate::color::Rgb;

/// 2D paint target the simulation draws into.
///
/// Coordinates are surface-local pixels. Drawing outside the bounds is
/// clipped, never an error.
pub trait Surface {
    /// Paint a translucent black rectangle over the whole surface
    fn fade(&mut self, alpha: f32);

    /// Filled circle blended at `alpha`
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);

    /// Filled circle with a soft halo extending roughly `blur` pixels
    fn glow_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32, blur: f32);
}

/// Halo reach relative to the requested blur radius
const GLOW_SPREAD: f32 = 0.25;
/// Peak alpha of the halo relative to the core
const GLOW_STRENGTH: f32 = 0.35;

/// Persistent RGB pixel buffer. Never cleared by the animation, only faded,
/// which leaves afterglow trails behind moving particles.
pub struct PixelCanvas {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
        }
    }

    pub fn width_px(&self) -> usize {
        self.width
    }

    pub fn height_px(&self) -> usize {
        self.height
    }

    /// Reallocate for new dimensions; existing content is dropped
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![[0.0; 3]; width * height];
        }
    }

    /// Wipe to black
    pub fn clear(&mut self) {
        self.pixels.fill([0.0; 3]);
    }

    /// Pixel at (x, y), or None when out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Perceived brightness of a pixel (0.0-1.0)
    pub fn luminance(&self, x: usize, y: usize) -> f32 {
        self.pixel(x, y)
            .map(|[r, g, b]| 0.299 * r + 0.587 * g + 0.114 * b)
            .unwrap_or(0.0)
    }

    /// Row-major 8-bit RGB bytes
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let c = Rgb::from_f32(px);
            out.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out
    }

    fn blend(&mut self, x: usize, y: usize, color: [f32; 3], alpha: f32) {
        let idx = y * self.width + x;
        let px = &mut self.pixels[idx];
        for ch in 0..3 {
            px[ch] = px[ch] * (1.0 - alpha) + color[ch] * alpha;
        }
    }

    /// Visit every in-bounds pixel whose center lies within `radius` of (cx, cy)
    fn for_each_in_disc(&self, cx: f32, cy: f32, radius: f32, mut f: impl FnMut(usize, usize, f32)) {
        if self.width == 0 || self.height == 0 || radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let min_x = (cx - radius).floor().max(0.0) as usize;
        let min_y = (cy - radius).floor().max(0.0) as usize;
        let max_x = (cx + radius).ceil().min(self.width as f32 - 1.0);
        let max_y = (cy + radius).ceil().min(self.height as f32 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let r_sq = radius * radius;

        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d_sq = dx * dx + dy * dy;
                if d_sq <= r_sq {
                    f(x, y, d_sq.sqrt());
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for px in &mut self.pixels {
            px[0] *= keep;
            px[1] *= keep;
            px[2] *= keep;
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }
        let c = color.to_f32();
        // Sub-pixel particles still light the pixel they sit on
        let radius = radius.max(0.71);
        let mut hits = Vec::new();
        self.for_each_in_disc(x, y, radius, |px, py, _| hits.push((px, py)));
        for (px, py) in hits {
            self.blend(px, py, c, alpha);
        }
    }

    fn glow_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32, blur: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }
        let c = color.to_f32();
        let reach = radius + blur.max(0.0) * GLOW_SPREAD;
        let mut hits = Vec::new();
        self.for_each_in_disc(x, y, reach, |px, py, d| hits.push((px, py, d)));
        for (px, py, d) in hits {
            let a = if d <= radius {
                alpha
            } else {
                // Linear falloff from the core edge to the halo edge
                let t = 1.0 - (d - radius) / (reach - radius).max(f32::EPSILON);
                alpha * GLOW_STRENGTH * t
            };
            self.blend(px, py, c, a);
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// A single recorded paint call
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Fade(f32),
        Circle { x: f32, y: f32, radius: f32, color: Rgb, alpha: f32 },
        Glow { x: f32, y: f32, radius: f32, color: Rgb, alpha: f32, blur: f32 },
    }

    /// Surface that records calls instead of painting
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn circles(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Circle { .. }))
                .count()
        }

        pub fn glows(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Glow { .. }))
                .count()
        }
    }

    impl Surface for RecordingSurface {
        fn fade(&mut self, alpha: f32) {
            self.calls.push(DrawCall::Fade(alpha));
        }

        fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
            self.calls.push(DrawCall::Circle { x, y, radius, color, alpha });
        }

        fn glow_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32, blur: f32) {
            self.calls.push(DrawCall::Glow { x, y, radius, color, alpha, blur });
        }
    }
}
