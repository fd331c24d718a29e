use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use thiserror::Error;

use super::{
    compositor::StrokeCompositor,
    export::{ExportError, export_overlay},
    gesture::{self, GestureReading},
    instructions::InstructionPresenter,
    overlay::{OverlaySurface, Segment, StrokeStyle},
    raster::Rgba,
    state::DrawingStateMachine,
};
use crate::types::{DrawingState, Handedness, Point, Pose};

#[derive(Debug, Error, PartialEq)]
#[error("{0:?} is not a colour")]
pub struct ColorError(pub String);

pub fn parse_color(value: &str) -> Result<Rgba, ColorError> {
    csscolorparser::parse(value)
        .map(|c| c.to_rgba8())
        .map_err(|_| ColorError(value.to_string()))
}

/// What a single render tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub reading: GestureReading,
    pub segment: Option<Segment>,
    pub transition: Option<DrawingState>,
}

/// All mutable sketch state, driven from the render tick.
pub struct SketchSession<P> {
    machine: DrawingStateMachine,
    compositor: StrokeCompositor,
    overlay: Option<OverlaySurface>,
    handedness: Handedness,
    style: StrokeStyle,
    presenter: P,
}

impl<P: InstructionPresenter> SketchSession<P> {
    pub fn new(style: StrokeStyle, mut presenter: P, started_at: Instant) -> Self {
        let machine = DrawingStateMachine::new(started_at);
        let handedness = Handedness::default();
        presenter.present(machine.state(), handedness);

        Self {
            machine,
            compositor: StrokeCompositor::new(),
            overlay: None,
            handedness,
            style,
            presenter,
        }
    }

    pub fn state(&self) -> DrawingState {
        self.machine.state()
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn overlay(&self) -> Option<&OverlaySurface> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut OverlaySurface> {
        self.overlay.as_mut()
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.machine.in_cooldown(now)
    }

    /// Matches the overlay to the video frame. A size change starts a fresh
    /// canvas since the old strokes live in a different pixel space.
    pub fn ensure_overlay_size(&mut self, width: u32, height: u32) {
        match &self.overlay {
            Some(surface) if surface.width() == width && surface.height() == height => {}
            Some(surface) => {
                log::info!(
                    "frame size changed from {}x{} to {width}x{height}, resetting canvas",
                    surface.width(),
                    surface.height()
                );
                self.overlay = Some(OverlaySurface::new(width, height));
                self.compositor.reset();
            }
            None => {
                log::debug!("allocating {width}x{height} canvas");
                self.overlay = Some(OverlaySurface::new(width, height));
            }
        }
    }

    /// One render tick: strokes first (when drawing), then the toggle check.
    pub fn tick(&mut self, pose: Option<&Pose>, now: Instant) -> TickOutcome {
        let reading = gesture::classify(pose, self.handedness);

        let segment = match (&mut self.overlay, self.machine.is_drawing()) {
            (Some(surface), true) => {
                self.compositor
                    .extend(reading.drawing_point, surface, self.style)
            }
            _ => None,
        };

        let transition = self.machine.update(reading.toggle, now);
        if let Some(state) = transition {
            self.compositor.reset();
            self.presenter.present(state, self.handedness);
            log::info!(
                "face touch ({:?}), now {}",
                reading.toggle,
                state.label().to_lowercase()
            );
        }

        TickOutcome {
            reading,
            segment,
            transition,
        }
    }

    pub fn last_draw_point(&self) -> Option<Point> {
        self.compositor.last_point()
    }

    pub fn set_handedness(&mut self, handedness: Handedness) {
        self.handedness = handedness;
        self.presenter.present(self.machine.state(), handedness);
        log::info!("handedness set to {}", handedness.label());
    }

    pub fn set_stroke_color(&mut self, value: &str) -> Result<(), ColorError> {
        self.style.color = parse_color(value)?;
        log::debug!("stroke colour set to {value}");
        Ok(())
    }

    pub fn clear_overlay(&mut self) {
        if let Some(surface) = self.overlay.as_mut() {
            surface.clear();
            log::info!("canvas cleared");
        }
    }

    pub fn export_overlay(&self, path: &Path) -> Result<PathBuf, ExportError> {
        export_overlay(self.overlay.as_ref(), path)
    }
}
