use std::time::Instant;

use super::{
    ActiveTheme, AnyElement, AppView, Button, ButtonVariants, CameraDevice, CameraState, Context,
    DownloadState, FluentBuilder, InteractiveElement, IntoElement, ParentElement, Screen,
    SharedString, Styled, StyledExt, div, h_flex, pipeline, px, v_flex,
};

const PICKER_BG: u32 = 0x0f1419f5;
const PICKER_BORDER: u32 = 0x2d3748ff;

impl AppView {
    fn camera_row(
        device: &CameraDevice,
        idx: usize,
        is_selected: bool,
        cx: &mut Context<'_, Self>,
        on_pick: fn(&mut Self, usize),
    ) -> AnyElement {
        h_flex()
            .w_full()
            .gap_3()
            .items_center()
            .p_3()
            .rounded_lg()
            .cursor_pointer()
            .bg(if is_selected {
                gpui::rgba(0x2d374855)
            } else {
                gpui::rgba(0x1e293b00)
            })
            .border_1()
            .border_color(if is_selected {
                gpui::rgba(0x64748bff)
            } else {
                gpui::rgba(0x33415500)
            })
            .hover(|this| {
                this.bg(gpui::rgba(0x2d374844))
                    .border_color(gpui::rgba(0x475569ff))
            })
            .on_mouse_down(
                gpui::MouseButton::Left,
                cx.listener(move |this, _, _, cx| {
                    on_pick(this, idx);
                    cx.notify();
                }),
            )
            .child(
                div()
                    .flex_1()
                    .text_sm()
                    .text_color(if is_selected {
                        gpui::rgb(0xe2e8f0)
                    } else {
                        gpui::rgb(0xcbd5e1)
                    })
                    .overflow_hidden()
                    .text_ellipsis()
                    .whitespace_nowrap()
                    .child(device.label.clone()),
            )
            .when(is_selected, |this| {
                this.child(
                    div()
                        .text_sm()
                        .flex_shrink_0()
                        .text_color(gpui::rgb(0xa5b4fc))
                        .child("✓"),
                )
            })
            .into_any_element()
    }

    pub(crate) fn error_banner(message: &str) -> AnyElement {
        h_flex()
            .gap_2()
            .items_start()
            .mt_2()
            .p_3()
            .rounded_lg()
            .bg(gpui::rgba(0x7f1d1d33))
            .border_1()
            .border_color(gpui::rgba(0xef4444aa))
            .child(
                div()
                    .flex_1()
                    .text_xs()
                    .text_color(gpui::rgb(0xfca5a5))
                    .overflow_hidden()
                    .child(message.to_string()),
            )
            .into_any_element()
    }

    fn render_camera_picker_startup(
        &mut self,
        cameras: &[CameraDevice],
        selected_idx: usize,
        error_msg: Option<&str>,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        let mut picker = v_flex()
            .gap_2()
            .p_4()
            .rounded_xl()
            .bg(gpui::rgba(PICKER_BG))
            .border_1()
            .border_color(gpui::rgba(PICKER_BORDER))
            .shadow_lg()
            .child(
                div()
                    .mb_2()
                    .text_sm()
                    .font_semibold()
                    .text_color(gpui::rgb(0xe2e8f0))
                    .child("Choose a camera"),
            );

        for (idx, device) in cameras.iter().enumerate() {
            picker = picker.child(Self::camera_row(
                device,
                idx,
                selected_idx == idx,
                cx,
                Self::select_camera,
            ));
        }

        if let Some(err) = error_msg {
            picker = picker.child(Self::error_banner(err));
        }

        picker
            .child(
                Button::new(SharedString::from("camera-confirm"))
                    .primary()
                    .label("Use this camera")
                    .w_full()
                    .mt_2()
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.start_selected_camera();
                        cx.notify();
                    })),
            )
            .into_any_element()
    }

    pub(super) fn render_camera_picker_main(&mut self, cx: &mut Context<'_, Self>) -> AnyElement {
        let mut picker = v_flex()
            .gap_2()
            .p_4()
            .rounded_xl()
            .bg(gpui::rgba(PICKER_BG))
            .border_1()
            .border_color(gpui::rgba(PICKER_BORDER))
            .shadow_lg()
            .child(
                h_flex()
                    .justify_between()
                    .items_center()
                    .w_full()
                    .mb_2()
                    .child(
                        div()
                            .text_sm()
                            .font_semibold()
                            .text_color(gpui::rgb(0xe2e8f0))
                            .child("Switch camera"),
                    )
                    .child(
                        Button::new(SharedString::from("camera-picker-close"))
                            .label("×")
                            .ghost()
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.camera_picker_open = false;
                                cx.notify();
                            })),
                    ),
            );

        let cameras = self.available_cameras.clone();
        for (idx, device) in cameras.iter().enumerate() {
            picker = picker.child(Self::camera_row(
                device,
                idx,
                self.selected_camera_idx == Some(idx),
                cx,
                Self::switch_camera,
            ));
        }

        if let Some(err) = &self.camera_error {
            picker = picker.child(Self::error_banner(err));
        }

        picker.into_any_element()
    }

    pub(super) fn initial_camera_state() -> (CameraState, Vec<CameraDevice>) {
        match pipeline::available_cameras() {
            Ok(cameras) if cameras.is_empty() => (
                CameraState::Unavailable {
                    message: "No camera was found".to_string(),
                },
                Vec::new(),
            ),
            Ok(cameras) => (
                CameraState::Selection {
                    options: cameras.clone(),
                    selected: 0,
                    start_error: None,
                },
                cameras,
            ),
            Err(err) => {
                log::error!("failed to enumerate cameras: {err:?}");
                (
                    CameraState::Unavailable {
                        message: format!("Could not list cameras: {err:#}"),
                    },
                    Vec::new(),
                )
            }
        }
    }

    pub(super) fn render_camera_view(
        &mut self,
        state: &mut CameraState,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        match state {
            CameraState::Unavailable { message } => {
                let theme = cx.theme();
                v_flex()
                    .size_full()
                    .items_center()
                    .justify_center()
                    .bg(theme.background)
                    .child(
                        v_flex()
                            .gap_2()
                            .p_4()
                            .rounded_lg()
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.group_box)
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.accent)
                                    .font_semibold()
                                    .child("No camera available"),
                            )
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(theme.muted_foreground)
                                    .child("Check the connection and camera permissions"),
                            )
                            .child(div().text_color(theme.foreground).child(message.clone())),
                    )
                    .into_any_element()
            }
            CameraState::Selection {
                options,
                selected,
                start_error,
            } => {
                if options.len() == 1 && self.camera_stream.is_none() && start_error.is_none() {
                    match self.start_camera_for_device(&options[0]) {
                        Ok(()) => {
                            self.selected_camera_idx = Some(0);
                            *state = CameraState::Ready;
                            return div().child("Starting camera...").into_any_element();
                        }
                        Err(err) => {
                            *start_error = Some(format!("Could not start the camera: {err}"));
                        }
                    }
                }

                let picker =
                    self.render_camera_picker_startup(options, *selected, start_error.as_deref(), cx);

                div()
                    .size_full()
                    .flex()
                    .items_center()
                    .justify_center()
                    .bg(gpui::rgba(0x1a233288))
                    .child(div().w(px(450.0)).child(picker))
                    .into_any_element()
            }
            CameraState::Ready => div().p_4().child("Starting camera...").into_any_element(),
        }
    }

    pub(super) fn switch_camera(&mut self, idx: usize) {
        let Some(device) = self.available_cameras.get(idx).cloned() else {
            self.camera_error = Some("The selected camera is gone".to_string());
            return;
        };

        match self.start_camera_for_device(&device) {
            Ok(()) => {
                self.selected_camera_idx = Some(idx);
                self.camera_picker_open = false;
            }
            Err(err) => {
                self.camera_error = Some(format!("Could not start the camera: {err}"));
            }
        }
    }

    fn select_camera(&mut self, selected: usize) {
        if let Screen::Camera(CameraState::Selection {
            options,
            selected: current,
            start_error,
        }) = &mut self.screen
        {
            if selected < options.len() {
                *current = selected;
                *start_error = None;
                self.selected_camera_idx = Some(selected);
            }
        }
    }

    fn stop_camera_stream(&mut self) {
        if let Some(stream) = self.camera_stream.take() {
            stream.stop();
        }
    }

    fn start_camera_for_device(&mut self, device: &CameraDevice) -> Result<(), String> {
        self.stop_camera_stream();
        let started_at = Instant::now();

        pipeline::start_camera_stream(
            device.index.clone(),
            self.capture_options(),
            self.frame_tx.clone(),
            self.detector_frame_tx.clone(),
        )
        .map(|stream| {
            log::info!("camera started: {}", device.label);
            self.camera_stream = Some(stream);
            self.latest_frame = None;
            self.latest_pose = None;
            self.pose_reader.take_latest();
            self.camera_started_at = Some(started_at);
            self.latest_image = None;
            self.camera_error = None;
        })
        .map_err(|err| format!("{err:#}"))
    }

    fn start_selected_camera(&mut self) {
        let selected_device = match &self.screen {
            Screen::Camera(CameraState::Selection {
                options, selected, ..
            }) => options.get(*selected).cloned().map(|device| (*selected, device)),
            _ => None,
        };

        let Some((selected_idx, device)) = selected_device else {
            if let Screen::Camera(CameraState::Selection { start_error, .. }) = &mut self.screen {
                *start_error = Some("The selected camera is gone".to_string());
            }
            return;
        };

        match self.start_camera_for_device(&device) {
            Ok(()) => {
                self.selected_camera_idx = Some(selected_idx);
                self.camera_picker_open = false;
                self.screen = Screen::Download(DownloadState::new());
            }
            Err(err) => {
                if let Screen::Camera(CameraState::Selection { start_error, .. }) = &mut self.screen
                {
                    *start_error = Some(format!("Could not start the camera: {err}"));
                }
            }
        }
    }
}
