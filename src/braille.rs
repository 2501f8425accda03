use crate::color::Rgb;
use crate::input::{DOTS_X, DOTS_Y};
use crate::surface::PixelCanvas;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Pixels dimmer than this stay dark
const LIT_THRESHOLD: f32 = 0.06;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Render the surface to Braille characters, one pixel per dot
pub fn render_to_braille(canvas: &PixelCanvas, canvas_width: u16, canvas_height: u16) -> Vec<BrailleCell> {
    let mut cells = Vec::with_capacity(canvas_width as usize * canvas_height as usize / 4);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut total = [0.0f32; 3];
            let mut brightest = 0.0f32;
            let mut dot_count = 0;

            let base_x = cx as usize * DOTS_X as usize;
            let base_y = cy as usize * DOTS_Y as usize;

            for dx in 0..DOTS_X as usize {
                for dy in 0..DOTS_Y as usize {
                    let (px, py) = (base_x + dx, base_y + dy);
                    let lum = canvas.luminance(px, py);
                    if lum > LIT_THRESHOLD {
                        if let Some(rgb) = canvas.pixel(px, py) {
                            pattern |= BRAILLE_DOTS[dx][dy];
                            for ch in 0..3 {
                                total[ch] += rgb[ch];
                            }
                            brightest = brightest.max(lum);
                            dot_count += 1;
                        }
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let n = dot_count as f32;
                let mean = [total[0] / n, total[1] / n, total[2] / n];
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color: boost(mean, brightest).into(),
                });
            }
        }
    }

    cells
}

/// Terminal colors look muddy at low intensity; scale the mean color so its
/// brightest channel tracks the brightest dot in the cell.
fn boost(mean: [f32; 3], brightest: f32) -> Rgb {
    let peak = mean[0].max(mean[1]).max(mean[2]);
    if peak <= 0.0 {
        return Rgb::BLACK;
    }
    let target = (brightest * 1.6).clamp(0.35, 1.0);
    let k = target / peak;
    Rgb::from_f32([mean[0] * k, mean[1] * k, mean[2] * k])
}

/// Surface size in pixels for a canvas of terminal cells
/// Returns (width, height) matching the Braille dot grid
pub fn calculate_surface_size(canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    let width = (canvas_width as usize * DOTS_X as usize).max(1);
    let height = (canvas_height as usize * DOTS_Y as usize).max(1);
    (width, height)
}
