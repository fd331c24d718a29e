//! Minimal RGBA raster primitives for strokes and debug markers.

use crate::types::Point;

pub type Rgba = [u8; 4];

/// Larger discs are clamped so a single stamp stays bounded.
const MAX_DISC_RADIUS: f32 = 512.0;

/// Stamps a filled disc of `diameter` at every Bresenham step from `p0` to
/// `p1`, which gives the segment round caps.
pub fn stroke_segment(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    p0: Point,
    p1: Point,
    color: Rgba,
    diameter: f32,
) {
    let radius = (diameter / 2.0).max(0.5);
    let offsets = disc_offsets(radius);

    let (mut x0, mut y0) = (p0.x.round() as i32, p0.y.round() as i32);
    let (x1, y1) = (p1.x.round() as i32, p1.y.round() as i32);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        for &(ox, oy) in &offsets {
            put_pixel_safe(buffer, width, height, x0 + ox, y0 + oy, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

pub fn fill_circle(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    center: Point,
    radius: f32,
    color: Rgba,
) {
    let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
    for (ox, oy) in disc_offsets(radius) {
        put_pixel_safe(buffer, width, height, cx + ox, cy + oy, color);
    }
}

fn disc_offsets(radius: f32) -> Vec<(i32, i32)> {
    // f32::min drops NaN, so NaN and infinity both land on the cap.
    let radius = radius.min(MAX_DISC_RADIUS).max(0.0);
    let r = radius.ceil() as i64;
    let limit = f64::from(radius) * f64::from(radius);
    let side = (2 * r + 1) as usize;
    let mut offsets = Vec::with_capacity(side * side);
    for oy in -r..=r {
        for ox in -r..=r {
            if (ox * ox + oy * oy) as f64 <= limit {
                offsets.push((ox as i32, oy as i32));
            }
        }
    }
    offsets
}

fn put_pixel_safe(buffer: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: Rgba) {
    if x < 0 || y < 0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux >= width || uy >= height {
        return;
    }
    let idx = ((uy * width + ux) as usize) * 4;
    if idx + 3 < buffer.len() {
        buffer[idx..idx + 4].copy_from_slice(&color);
    }
}

/// Source-over blend of `src` onto `dst`, both tightly packed RGBA of equal size.
pub fn blend_over(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        match s[3] {
            0 => {}
            255 => d.copy_from_slice(s),
            alpha => {
                let a = alpha as u32;
                let inv = 255 - a;
                for c in 0..3 {
                    d[c] = ((s[c] as u32 * a + d[c] as u32 * inv + 127) / 255) as u8;
                }
                d[3] = d[3].max(alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> Rgba {
        let idx = ((y * width + x) * 4) as usize;
        [buffer[idx], buffer[idx + 1], buffer[idx + 2], buffer[idx + 3]]
    }

    #[test]
    fn segment_covers_endpoints_and_width() {
        let (w, h) = (40u32, 20u32);
        let mut buf = vec![0u8; (w * h * 4) as usize];
        stroke_segment(&mut buf, w, h, Point::new(5.0, 10.0), Point::new(30.0, 10.0), RED, 6.0);

        assert_eq!(pixel(&buf, w, 5, 10), RED);
        assert_eq!(pixel(&buf, w, 30, 10), RED);
        assert_eq!(pixel(&buf, w, 18, 13), RED);
        assert_eq!(pixel(&buf, w, 18, 17), [0, 0, 0, 0]);
        // round cap extends past the endpoint
        assert_eq!(pixel(&buf, w, 33, 10), RED);
    }

    #[test]
    fn drawing_outside_is_clipped() {
        let (w, h) = (8u32, 8u32);
        let mut buf = vec![0u8; (w * h * 4) as usize];
        stroke_segment(&mut buf, w, h, Point::new(-50.0, -50.0), Point::new(-10.0, 100.0), RED, 4.0);
        assert!(buf.iter().all(|b| *b == 0));
        fill_circle(&mut buf, w, h, Point::new(7.0, 7.0), 2.0, RED);
        assert_eq!(pixel(&buf, w, 7, 7), RED);
    }

    #[test]
    fn oversized_widths_are_clamped() {
        let (w, h) = (4u32, 4u32);
        for diameter in [100_000.0, f32::INFINITY] {
            let mut buf = vec![0u8; (w * h * 4) as usize];
            stroke_segment(&mut buf, w, h, Point::new(1.0, 1.0), Point::new(2.0, 2.0), RED, diameter);
            assert_eq!(pixel(&buf, w, 3, 0), RED, "{diameter}");
        }
        assert!(disc_offsets(f32::INFINITY).len() <= (2 * 512 + 1) * (2 * 512 + 1));
    }

    #[test]
    fn blend_over_respects_alpha() {
        let mut dst = vec![0, 0, 200, 255, 10, 10, 10, 255, 50, 50, 50, 255];
        let src = vec![0, 0, 0, 0, 255, 255, 255, 255, 255, 0, 0, 128];
        blend_over(&mut dst, &src);
        assert_eq!(&dst[0..4], &[0, 0, 200, 255]);
        assert_eq!(&dst[4..8], &[255, 255, 255, 255]);
        assert_eq!(dst[8], 153);
        assert_eq!(dst[9], 25);
    }
}
