use std::time::Instant;

use super::render_util::frame_to_image;
use super::{
    ActiveTheme, AnyElement, AppView, Arc, Button, ButtonVariants, CAMERA_MAX_SIZE,
    CAMERA_MIN_SIZE, Context, DEFAULT_CAMERA_RATIO, DetectorStatus, FluentBuilder,
    InteractiveElement, IntoElement, MouseButton, ObjectFit, ParentElement, RenderImage, SIDE_PANEL_WIDTH,
    Selectable, SharedString, Styled, StyledExt, StyledImage, Tag, Window, div, h_flex, img,
    parse_color, px, v_flex,
};
use crate::{
    sketch::raster::Rgba,
    types::{DrawingState, Handedness},
};

const SWATCHES: &[&str] = &["#FE6B31", "#FACC15", "#22C55E", "#3B82F6", "#A855F7", "#FFFFFF"];

fn rgb_hex(color: Rgba) -> u32 {
    (color[0] as u32) << 16 | (color[1] as u32) << 8 | color[2] as u32
}

impl AppView {
    /// Pulls everything the workers produced since the last render and runs one sketch tick.
    fn advance(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) {
        while let Ok(status) = self.status_rx.try_recv() {
            self.detector_status = Some(status);
        }

        let pose_changed = match self.pose_reader.take_latest() {
            Some(update) => {
                self.latest_pose = Some(update);
                true
            }
            None => false,
        };

        let mut newest_frame = None;
        while let Ok(frame) = self.frame_rx.try_recv() {
            newest_frame = Some(frame);
        }
        let frame_changed = newest_frame.is_some();
        if let Some(frame) = newest_frame {
            self.session.ensure_overlay_size(frame.width, frame.height);
            self.latest_frame = Some(frame);
        }

        let Some(frame) = self.latest_frame.as_ref() else {
            return;
        };

        let pose = self
            .latest_pose
            .as_ref()
            .filter(|u| u.applies_to(frame, self.camera_started_at))
            .and_then(|u| u.primary());

        let outcome = self.session.tick(pose, Instant::now());
        self.hand_tracked = outcome.reading.drawing_point.is_some();
        if outcome.transition == Some(DrawingState::Drawing) {
            self.export_status = None;
        }
        let overlay_dirty = self
            .session
            .overlay_mut()
            .is_some_and(|surface| surface.take_dirty());

        let needs_redraw = frame_changed
            || outcome.segment.is_some()
            || overlay_dirty
            || (self.show_skeleton && pose_changed)
            || std::mem::take(&mut self.redraw_requested);
        if !needs_redraw {
            return;
        }

        let debug_pose = pose.filter(|_| self.show_skeleton);
        if let Some(image) = frame_to_image(frame, self.session.overlay(), debug_pose) {
            self.replace_latest_image(image, window, cx);
        }
    }

    pub(super) fn render_main(
        &mut self,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        self.advance(window, cx);

        let viewport = window.viewport_size();
        let ratio = self.camera_aspect_ratio();
        let camera_width = (f32::from(viewport.width) - SIDE_PANEL_WIDTH - 48.0)
            .clamp(CAMERA_MIN_SIZE.0, CAMERA_MAX_SIZE.0);
        let camera_height = (camera_width / ratio).clamp(CAMERA_MIN_SIZE.1, CAMERA_MAX_SIZE.1);

        let camera_card = self.render_camera_card(camera_width, camera_height, cx);
        let side_panel = v_flex()
            .w(px(SIDE_PANEL_WIDTH))
            .gap_3()
            .child(self.render_instructions(cx))
            .child(self.render_controls(cx));

        v_flex()
            .size_full()
            .bg(gpui::rgb(0x1a2332))
            .child(self.render_status_bar(cx))
            .child(
                h_flex()
                    .flex_1()
                    .gap_4()
                    .p_4()
                    .items_start()
                    .child(camera_card)
                    .child(side_panel),
            )
            .into_any_element()
    }

    fn render_status_bar(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let theme = cx.theme();

        let camera_tag = if self.latest_frame.is_some() {
            Tag::success().rounded_full().child("● Camera")
        } else {
            Tag::secondary().rounded_full().child("○ Waiting for camera")
        };

        let model_tag = match &self.detector_status {
            Some(DetectorStatus::Ready) => Tag::success().rounded_full().child("● Pose model ready"),
            Some(DetectorStatus::Failed(_)) => Tag::danger().rounded_full().child("✗ Pose model failed"),
            Some(DetectorStatus::Loading) | None => {
                Tag::warning().rounded_full().child("⟳ Loading pose model...")
            }
        };

        let state_tag = match self.session.state() {
            DrawingState::Drawing => Tag::success().rounded_full().child("Drawing"),
            DrawingState::Idle => Tag::danger().rounded_full().child("Not drawing"),
        };

        h_flex()
            .w_full()
            .justify_between()
            .items_center()
            .px_4()
            .py_2()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_sm()
                    .font_semibold()
                    .text_color(gpui::rgb(0xe2e8f0))
                    .child("Air Sketch"),
            )
            .child(
                h_flex()
                    .gap_2()
                    .child(camera_tag)
                    .child(model_tag)
                    .child(state_tag)
                    .when(self.hand_tracked, |this| {
                        this.child(Tag::info().rounded_full().child("✋ Hand tracked"))
                    })
                    .when(self.session.in_cooldown(Instant::now()), |this| {
                        this.child(Tag::secondary().rounded_full().child("cooldown"))
                    }),
            )
            .into_any_element()
    }

    fn render_camera_card(
        &mut self,
        width: f32,
        height: f32,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        let frame_view: AnyElement = if let Some(image) = &self.latest_image {
            img(image.clone())
                .size_full()
                .object_fit(ObjectFit::Contain)
                .into_any_element()
        } else {
            div()
                .size_full()
                .flex()
                .items_center()
                .justify_center()
                .text_sm()
                .text_color(gpui::rgb(0x8b95a5))
                .child("Waiting for camera...")
                .into_any_element()
        };

        let camera_label = self
            .selected_camera_idx
            .and_then(|idx| self.available_cameras.get(idx))
            .map(|c| c.label.clone())
            .unwrap_or_else(|| "No camera selected".to_string());
        let frame_status = self
            .latest_frame
            .as_ref()
            .map(|f| format!("{camera_label} {}x{}", f.width, f.height))
            .unwrap_or_else(|| format!("{camera_label}, waiting for frames..."));

        let mut info_row = h_flex().justify_between().items_center().gap_2().child(
            div()
                .text_xs()
                .text_color(gpui::rgb(0x8b95a5))
                .overflow_hidden()
                .text_ellipsis()
                .whitespace_nowrap()
                .child(frame_status),
        );
        if self.available_cameras.len() > 1 {
            info_row = info_row.child(
                Button::new(SharedString::from("camera-picker-toggle"))
                    .outline()
                    .label(if self.camera_picker_open { "Close" } else { "Switch camera" })
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.camera_picker_open = !this.camera_picker_open;
                        cx.notify();
                    })),
            );
        }

        let mut card = div().relative().w(px(width)).child(
            v_flex()
                .w_full()
                .rounded_lg()
                .overflow_hidden()
                .bg(gpui::rgb(0x0f1419))
                .child(
                    div()
                        .w(px(width))
                        .h(px(height))
                        .overflow_hidden()
                        .bg(gpui::rgb(0x000000))
                        .child(frame_view),
                )
                .child(v_flex().gap_2().p_3().child(info_row)),
        );

        let overlay_panel = if self.camera_picker_open && !self.available_cameras.is_empty() {
            Some(self.render_camera_picker_main(cx))
        } else {
            self.camera_error.as_deref().map(Self::error_banner)
        };
        if let Some(panel) = overlay_panel {
            let panel_width = (width * 0.85).min(400.0);
            card = card.child(
                div()
                    .absolute()
                    .top(px(16.0))
                    .left(px((width - panel_width) / 2.0))
                    .w(px(panel_width))
                    .child(panel),
            );
        }

        card.into_any_element()
    }

    fn render_instructions(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let theme = cx.theme();
        let instruction = self.session.presenter().current();
        let accent = gpui::rgb(instruction.tone.rgb());

        let mut steps = v_flex().gap_1();
        for (idx, step) in instruction.steps.iter().enumerate() {
            steps = steps.child(
                div()
                    .text_sm()
                    .text_color(theme.foreground)
                    .child(format!("{}. {step}", idx + 1)),
            );
        }

        v_flex()
            .gap_2()
            .p_4()
            .rounded_lg()
            .bg(gpui::rgb(0x0f1419))
            .border_l_4()
            .border_color(accent)
            .child(
                div()
                    .font_semibold()
                    .text_color(accent)
                    .child(instruction.headline),
            )
            .child(steps)
            .into_any_element()
    }

    fn render_controls(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let handedness = self.session.handedness();
        let current_color = rgb_hex(self.session.style().color);

        let mut swatches = h_flex().gap_2().flex_wrap();
        for &css in SWATCHES {
            let hex = parse_color(css).map(rgb_hex).unwrap_or(0);
            let is_selected = hex == current_color;
            swatches = swatches.child(
                div()
                    .size(px(28.0))
                    .rounded_full()
                    .cursor_pointer()
                    .bg(gpui::rgb(hex))
                    .border_2()
                    .border_color(if is_selected {
                        gpui::rgba(0xe2e8f0ff)
                    } else {
                        gpui::rgba(0x00000000)
                    })
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |this, _, _, cx| {
                            if let Err(err) = this.session.set_stroke_color(css) {
                                log::warn!("{err}");
                            }
                            cx.notify();
                        }),
                    ),
            );
        }

        let hand_button = |id: &'static str, hand: Handedness| {
            Button::new(SharedString::from(id))
                .outline()
                .label(hand.label())
                .selected(handedness == hand)
                .on_click(cx.listener(move |this, _, _, cx| {
                    this.session.set_handedness(hand);
                    cx.notify();
                }))
        };
        let hand_row = h_flex()
            .gap_2()
            .child(hand_button("hand-right", Handedness::Right))
            .child(hand_button("hand-left", Handedness::Left));

        let action_row = h_flex()
            .gap_2()
            .child(
                Button::new(SharedString::from("sketch-clear"))
                    .outline()
                    .label("Clear")
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.session.clear_overlay();
                        this.export_status = None;
                        cx.notify();
                    })),
            )
            .child(
                Button::new(SharedString::from("sketch-save"))
                    .primary()
                    .label("Save")
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.save_sketch();
                        cx.notify();
                    })),
            )
            .child(
                Button::new(SharedString::from("skeleton-toggle"))
                    .ghost()
                    .label("Keypoints")
                    .selected(self.show_skeleton)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.show_skeleton = !this.show_skeleton;
                        this.redraw_requested = true;
                        cx.notify();
                    })),
            );

        let export_line = self.export_status.as_ref().map(|status| match status {
            Ok(path) => div()
                .text_xs()
                .text_color(gpui::rgb(0x86efac))
                .child(format!("Saved to {path}")),
            Err(err) => div()
                .text_xs()
                .text_color(gpui::rgb(0xfca5a5))
                .child(err.clone()),
        });

        v_flex()
            .gap_3()
            .p_4()
            .rounded_lg()
            .bg(gpui::rgb(0x0f1419))
            .child(section_label("Drawing hand"))
            .child(hand_row)
            .child(section_label("Stroke colour"))
            .child(swatches)
            .child(section_label("Sketch"))
            .child(action_row)
            .children(export_line)
            .into_any_element()
    }

    fn save_sketch(&mut self) {
        let path = self.config.export_path.clone();
        self.export_status = Some(
            self.session
                .export_overlay(&path)
                .map(|saved| saved.display().to_string())
                .map_err(|err| {
                    log::warn!("export failed: {err}");
                    format!("Save failed: {err}")
                }),
        );
    }

    fn camera_aspect_ratio(&self) -> f32 {
        match &self.latest_frame {
            Some(frame) if frame.height > 0 => frame.width as f32 / frame.height as f32,
            _ => DEFAULT_CAMERA_RATIO,
        }
    }

    fn replace_latest_image(
        &mut self,
        new_image: Arc<RenderImage>,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) {
        if let Some(old_image) = self.latest_image.replace(new_image) {
            // Drop the previous GPU texture or the sprite atlas keeps every frame.
            cx.drop_image(old_image, Some(window));
        }
    }
}

fn section_label(text: &'static str) -> impl IntoElement {
    div()
        .text_xs()
        .font_semibold()
        .text_color(gpui::rgb(0x8b95a5))
        .child(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatches_are_valid_colours() {
        for css in SWATCHES {
            assert!(crate::sketch::parse_color(css).is_ok(), "{css}");
        }
        assert_eq!(rgb_hex([0xfe, 0x6b, 0x31, 0xff]), 0xfe6b31);
    }
}
