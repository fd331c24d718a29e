use super::overlay::{OverlaySurface, Segment, StrokeStyle};
use crate::types::Point;

/// Joins consecutive drawing-hand positions into segments on the overlay.
///
/// A missing point leaves `last_point` untouched, so the next detection
/// reconnects to where the hand was last seen.
#[derive(Debug, Default)]
pub struct StrokeCompositor {
    last_point: Option<Point>,
}

impl StrokeCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn reset(&mut self) {
        self.last_point = None;
    }

    pub fn extend(
        &mut self,
        point: Option<Point>,
        surface: &mut OverlaySurface,
        style: StrokeStyle,
    ) -> Option<Segment> {
        let point = point?;
        let segment = self.last_point.map(|from| Segment { from, to: point });
        if let Some(segment) = segment {
            surface.draw_segment(segment, style);
        }
        self.last_point = Some(point);
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: StrokeStyle = StrokeStyle {
        color: [0, 255, 0, 255],
        width: 2.0,
    };

    #[test]
    fn first_point_only_anchors() {
        let mut surface = OverlaySurface::new(64, 64);
        let mut compositor = StrokeCompositor::new();

        assert_eq!(compositor.extend(Some(Point::new(10.0, 10.0)), &mut surface, STYLE), None);
        assert!(surface.is_blank());
        assert_eq!(compositor.last_point(), Some(Point::new(10.0, 10.0)));

        let segment = compositor.extend(Some(Point::new(20.0, 10.0)), &mut surface, STYLE);
        assert_eq!(
            segment,
            Some(Segment {
                from: Point::new(10.0, 10.0),
                to: Point::new(20.0, 10.0)
            })
        );
        assert!(!surface.is_blank());
    }

    #[test]
    fn absent_point_never_touches_surface() {
        let mut surface = OverlaySurface::new(16, 16);
        let mut compositor = StrokeCompositor::new();
        compositor.extend(Some(Point::new(1.0, 1.0)), &mut surface, STYLE);
        let before = surface.pixels().to_vec();

        for _ in 0..5 {
            assert_eq!(compositor.extend(None, &mut surface, STYLE), None);
        }
        assert_eq!(surface.pixels(), &before[..]);
        assert_eq!(compositor.last_point(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn dropout_reconnects_to_last_known_point() {
        let mut surface = OverlaySurface::new(64, 64);
        let mut compositor = StrokeCompositor::new();
        compositor.extend(Some(Point::new(5.0, 5.0)), &mut surface, STYLE);
        compositor.extend(None, &mut surface, STYLE);
        let segment = compositor.extend(Some(Point::new(50.0, 50.0)), &mut surface, STYLE);
        assert_eq!(segment.map(|s| s.from), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn reset_forgets_last_point() {
        let mut surface = OverlaySurface::new(8, 8);
        let mut compositor = StrokeCompositor::new();
        compositor.extend(Some(Point::new(1.0, 1.0)), &mut surface, STYLE);
        compositor.reset();
        assert_eq!(compositor.last_point(), None);
        assert_eq!(compositor.extend(Some(Point::new(2.0, 2.0)), &mut surface, STYLE), None);
    }
}
