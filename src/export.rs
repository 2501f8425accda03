use crate::surface::PixelCanvas;
use gif::{Encoder, Frame, Repeat};
use image::RgbImage;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Capture every Nth simulation frame while recording
pub const GIF_FRAME_STRIDE: u64 = 4;
/// Stop capturing after this many frames
pub const GIF_MAX_FRAMES: usize = 300;
/// GIF delay units are 1/100 s; 4 frames at 60 fps ~ 7/100 s
const GIF_FRAME_DELAY: u16 = 7;

/// Save the current surface as a PNG
pub fn save_png(canvas: &PixelCanvas, path: &Path) -> Result<(), String> {
    let (w, h) = (canvas.width_px() as u32, canvas.height_px() as u32);
    let img = RgbImage::from_raw(w, h, canvas.to_rgb8())
        .ok_or_else(|| "Surface buffer does not match its dimensions".to_string())?;
    img.save(path).map_err(|e| format!("Failed to write PNG: {}", e))?;
    info!(path = %path.display(), width = w, height = h, "saved snapshot");
    Ok(())
}

/// Timestamped file name in the working directory
pub fn timestamped_path(prefix: &str, ext: &str) -> PathBuf {
    timestamped_path_in(Path::new(""), prefix, ext)
}

/// Millisecond-stamped path in `dir`, suffixed with a counter if already taken
fn timestamped_path_in(dir: &Path, prefix: &str, ext: &str) -> PathBuf {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut path = dir.join(format!("{}-{}.{}", prefix, millis, ext));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}-{}-{}.{}", prefix, millis, n, ext));
        n += 1;
    }
    path
}

/// Buffers surface frames and writes them as an animated GIF
pub struct GifRecorder {
    width: u16,
    height: u16,
    frames: Vec<Vec<u8>>,
}

impl GifRecorder {
    pub fn new(canvas: &PixelCanvas) -> Self {
        Self {
            width: canvas.width_px().min(u16::MAX as usize) as u16,
            height: canvas.height_px().min(u16::MAX as usize) as u16,
            frames: Vec::new(),
        }
    }

    /// Record the surface if `frame` falls on the capture stride.
    /// Frames of a different size (after a resize) are skipped.
    pub fn capture(&mut self, canvas: &PixelCanvas, frame: u64) {
        if frame % GIF_FRAME_STRIDE != 0 || self.is_full() {
            return;
        }
        if canvas.width_px() != self.width as usize || canvas.height_px() != self.height as usize {
            return;
        }
        self.frames.push(canvas.to_rgb8());
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= GIF_MAX_FRAMES
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode everything captured so far into `path`
    pub fn finish(self, path: &Path) -> Result<usize, String> {
        if self.frames.is_empty() {
            return Err("No frames recorded".to_string());
        }
        let file = File::create(path).map_err(|e| format!("Failed to create GIF file: {}", e))?;
        let mut encoder = Encoder::new(file, self.width, self.height, &[])
            .map_err(|e| format!("Failed to start GIF: {}", e))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| format!("Failed to write GIF header: {}", e))?;

        for rgb in &self.frames {
            let mut frame = Frame::from_rgb_speed(self.width, self.height, rgb, 10);
            frame.delay = GIF_FRAME_DELAY;
            encoder
                .write_frame(&frame)
                .map_err(|e| format!("Failed to write GIF frame: {}", e))?;
        }

        let count = self.frames.len();
        info!(path = %path.display(), frames = count, "saved recording");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::surface::Surface;
    use tempfile::TempDir;

    fn painted_canvas() -> PixelCanvas {
        let mut canvas = PixelCanvas::new(16, 12);
        canvas.fill_circle(8.0, 6.0, 3.0, Rgb::new(255, 0, 128), 1.0);
        canvas
    }

    #[test]
    fn test_png_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shot.png");
        save_png(&painted_canvas(), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (16, 12));
        assert_eq!(img.get_pixel(8, 6).0, [255, 0, 128]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_gif_stride_and_size_guard() {
        let mut canvas = painted_canvas();
        let mut recorder = GifRecorder::new(&canvas);
        for frame in 0..20 {
            recorder.capture(&canvas, frame);
        }
        assert_eq!(recorder.frame_count(), 5);

        canvas.resize(32, 32);
        recorder.capture(&canvas, 20);
        assert_eq!(recorder.frame_count(), 5);
    }

    #[test]
    fn test_gif_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("show.gif");
        let canvas = painted_canvas();
        let mut recorder = GifRecorder::new(&canvas);
        recorder.capture(&canvas, 0);
        recorder.capture(&canvas, 4);
        assert_eq!(recorder.finish(&path).unwrap(), 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_timestamped_paths_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let first = timestamped_path_in(tmp.path(), "fireworks", "png");
        std::fs::write(&first, b"x").unwrap();
        let second = timestamped_path_in(tmp.path(), "fireworks", "png");

        assert_ne!(first, second);
        assert!(!second.exists());
        assert_eq!(second.extension().unwrap(), "png");
    }

    #[test]
    fn test_empty_recording_is_error() {
        let tmp = TempDir::new().unwrap();
        let recorder = GifRecorder::new(&painted_canvas());
        assert!(recorder.finish(&tmp.path().join("none.gif")).is_err());
    }
}
