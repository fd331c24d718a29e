use image::RgbaImage;

use super::raster::{self, Rgba};
use crate::types::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

/// Persistent transparent canvas that accumulates strokes across frames.
#[derive(Clone, Debug)]
pub struct OverlaySurface {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    dirty: bool,
}

impl OverlaySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rgba: vec![0u8; (width as usize) * (height as usize) * 4],
            width,
            height,
            dirty: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    pub fn draw_segment(&mut self, segment: Segment, style: StrokeStyle) {
        raster::stroke_segment(
            &mut self.rgba,
            self.width,
            self.height,
            segment.from,
            segment.to,
            style.color,
            style.width,
        );
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.rgba.fill(0);
        self.dirty = true;
    }

    pub fn is_blank(&self) -> bool {
        self.rgba.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Returns whether the surface changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Blends the strokes over an RGBA frame of the same dimensions.
    pub fn composite_onto(&self, frame_rgba: &mut [u8], frame_width: u32, frame_height: u32) {
        if frame_width != self.width || frame_height != self.height {
            log::debug!(
                "skipping overlay composite: frame {frame_width}x{frame_height}, overlay {}x{}",
                self.width,
                self.height
            );
            return;
        }
        raster::blend_over(frame_rgba, &self.rgba);
    }

    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: StrokeStyle = StrokeStyle {
        color: [254, 107, 49, 255],
        width: 4.0,
    };

    #[test]
    fn new_surface_is_blank_and_dirty() {
        let mut surface = OverlaySurface::new(16, 12);
        assert!(surface.is_blank());
        assert_eq!(surface.pixels().len(), 16 * 12 * 4);
        assert!(surface.take_dirty());
        assert!(!surface.take_dirty());
    }

    #[test]
    fn segments_accumulate_until_cleared() {
        let mut surface = OverlaySurface::new(32, 32);
        surface.draw_segment(
            Segment {
                from: Point::new(2.0, 2.0),
                to: Point::new(10.0, 2.0),
            },
            STYLE,
        );
        surface.draw_segment(
            Segment {
                from: Point::new(2.0, 20.0),
                to: Point::new(10.0, 20.0),
            },
            STYLE,
        );
        assert!(!surface.is_blank());
        let idx = (2 * 32 + 6) * 4;
        assert_eq!(&surface.pixels()[idx..idx + 4], &STYLE.color);

        surface.clear();
        assert!(surface.is_blank());
    }

    #[test]
    fn composite_only_touches_stroked_pixels() {
        let mut surface = OverlaySurface::new(4, 1);
        surface.draw_segment(
            Segment {
                from: Point::new(0.0, 0.0),
                to: Point::new(0.0, 0.0),
            },
            StrokeStyle {
                color: [1, 2, 3, 255],
                width: 1.0,
            },
        );
        let mut frame = vec![9u8; 16];
        surface.composite_onto(&mut frame, 4, 1);
        assert_eq!(&frame[0..4], &[1, 2, 3, 255]);
        assert_eq!(&frame[4..8], &[9, 9, 9, 9]);

        let mut mismatched = vec![9u8; 32];
        surface.composite_onto(&mut mismatched, 8, 1);
        assert!(mismatched.iter().all(|b| *b == 9));
    }
}
