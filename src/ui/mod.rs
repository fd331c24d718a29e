use std::{mem, sync::Arc, thread, time::Instant};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use gpui::{
    AnyElement, App, AppContext, Context, InteractiveElement, IntoElement, MouseButton, ObjectFit,
    ParentElement, Render, RenderImage, SharedString, Styled, StyledImage, TitlebarOptions,
    Window, WindowOptions, div, img, px,
};
use gpui::prelude::FluentBuilder;
use gpui_component::{
    ActiveTheme, Root, Selectable, StyledExt,
    button::{Button, ButtonVariants},
    h_flex,
    tag::Tag,
    v_flex,
};
use image::{Frame as ImageFrame, ImageBuffer, Rgba};

use crate::{
    config::SketchConfig,
    model_download::{ModelDownloadEvent, ensure_pose_model_ready},
    pipeline::{
        self, CameraDevice, CameraStream, CaptureOptions, DetectorStatus, PoseBackend,
        SlotReader, SlotWriter,
    },
    sketch::{InstructionBoard, SketchSession, StrokeStyle, parse_color},
    types::{Frame, PoseUpdate},
};

mod camera_view;
mod download;
mod main_view;
mod render_util;

const CAMERA_MIN_SIZE: (f32, f32) = (320.0, 240.0);
const CAMERA_MAX_SIZE: (f32, f32) = (960.0, 720.0);
const DEFAULT_CAMERA_RATIO: f32 = 4.0 / 3.0;
const SIDE_PANEL_WIDTH: f32 = 340.0;

pub fn launch_ui(
    app: &mut App,
    config: SketchConfig,
    frame_rx: Receiver<Frame>,
    frame_tx: Sender<Frame>,
) -> gpui::Result<()> {
    let window_options = WindowOptions {
        titlebar: Some(TitlebarOptions {
            title: Some("Air Sketch".into()),
            ..Default::default()
        }),
        ..Default::default()
    };

    app.open_window(window_options, move |window, app| {
        let view = app.new(|_| AppView::new(config, frame_rx, frame_tx));
        app.new(|cx| Root::new(view, window, cx))
    })?;

    Ok(())
}

struct AppView {
    screen: Screen,
    config: SketchConfig,
    frame_rx: Receiver<Frame>,
    frame_tx: Sender<Frame>,
    detector_frame_rx: Option<Receiver<Frame>>,
    detector_frame_tx: Sender<Frame>,
    pose_writer: Option<SlotWriter<PoseUpdate>>,
    pose_reader: SlotReader<PoseUpdate>,
    status_tx: Sender<DetectorStatus>,
    status_rx: Receiver<DetectorStatus>,
    detector_status: Option<DetectorStatus>,
    backend: PoseBackend,
    detector_handle: Option<thread::JoinHandle<()>>,
    camera_stream: Option<CameraStream>,
    available_cameras: Vec<CameraDevice>,
    selected_camera_idx: Option<usize>,
    camera_error: Option<String>,
    latest_frame: Option<Frame>,
    latest_pose: Option<PoseUpdate>,
    camera_started_at: Option<Instant>,
    latest_image: Option<Arc<RenderImage>>,
    download_rx: Receiver<DownloadMessage>,
    _download_handle: thread::JoinHandle<()>,
    session: SketchSession<InstructionBoard>,
    show_skeleton: bool,
    hand_tracked: bool,
    redraw_requested: bool,
    export_status: Option<Result<String, String>>,
    camera_picker_open: bool,
}

enum Screen {
    Camera(CameraState),
    Download(DownloadState),
    Main,
}

enum CameraState {
    Unavailable {
        message: String,
    },
    Selection {
        options: Vec<CameraDevice>,
        selected: usize,
        start_error: Option<String>,
    },
    Ready,
}

struct DownloadState {
    downloaded: u64,
    total: Option<u64>,
    message: String,
    error: Option<String>,
    finished: bool,
}

impl DownloadState {
    fn new() -> Self {
        Self {
            downloaded: 0,
            total: None,
            message: "Checking pose model...".to_string(),
            error: None,
            finished: false,
        }
    }
}

enum DownloadMessage {
    Event(ModelDownloadEvent),
    Error(String),
}

impl AppView {
    fn new(config: SketchConfig, frame_rx: Receiver<Frame>, frame_tx: Sender<Frame>) -> Self {
        let (detector_frame_tx, detector_frame_rx) = bounded(1);
        let (pose_writer, pose_reader) = pipeline::latest_slot();
        let (status_tx, status_rx) = unbounded();
        let (download_tx, download_rx) = unbounded();
        let download_handle = download::spawn_model_download(&config, download_tx);
        let (initial_camera_state, available_cameras) = Self::initial_camera_state();
        let selected_camera_idx = if available_cameras.is_empty() {
            None
        } else {
            Some(0)
        };

        let style = StrokeStyle {
            color: config.stroke_color,
            width: config.stroke_width,
        };

        Self {
            screen: Screen::Camera(initial_camera_state),
            backend: PoseBackend::from_config(&config),
            config,
            frame_rx,
            frame_tx,
            detector_frame_rx: Some(detector_frame_rx),
            detector_frame_tx,
            pose_writer: Some(pose_writer),
            pose_reader,
            status_tx,
            status_rx,
            detector_status: None,
            detector_handle: None,
            camera_stream: None,
            available_cameras,
            selected_camera_idx,
            camera_error: None,
            latest_frame: None,
            latest_pose: None,
            camera_started_at: None,
            latest_image: None,
            download_rx,
            _download_handle: download_handle,
            session: SketchSession::new(style, InstructionBoard::default(), Instant::now()),
            show_skeleton: false,
            hand_tracked: false,
            redraw_requested: false,
            export_status: None,
            camera_picker_open: false,
        }
    }

    fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            mirror: self.config.mirror,
            detector_fps: self.config.detector_fps,
        }
    }

    fn start_detector_if_needed(&mut self) {
        if self.detector_handle.is_some() {
            return;
        }

        let Some(frame_rx) = self.detector_frame_rx.take() else {
            log::warn!("missing frame receiver for pose detector");
            return;
        };
        let Some(poses) = self.pose_writer.take() else {
            log::warn!("missing pose slot for pose detector");
            return;
        };

        let handle = pipeline::start_pose_detector(
            self.backend.clone(),
            frame_rx,
            poses,
            self.status_tx.clone(),
        );
        self.detector_handle = Some(handle);
    }
}

impl Render for AppView {
    fn render(
        &mut self,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) -> impl gpui::IntoElement {
        cx.defer_in(window, |_, _, cx| {
            cx.notify();
        });

        let mut screen = mem::replace(&mut self.screen, Screen::Main);
        let view = match screen {
            Screen::Camera(mut state) => {
                let view = self.render_camera_view(&mut state, cx);
                match state {
                    CameraState::Ready => {
                        screen = Screen::Download(DownloadState::new());
                    }
                    _ => {
                        screen = Screen::Camera(state);
                    }
                }
                view
            }
            Screen::Download(mut state) => {
                self.poll_download_events(&mut state);
                let should_switch = state.finished && state.error.is_none();
                let view = self.render_download_view(&state, cx);
                if should_switch {
                    self.start_detector_if_needed();
                    screen = Screen::Main;
                } else {
                    screen = Screen::Download(state);
                }
                view
            }
            Screen::Main => {
                screen = Screen::Main;
                self.render_main(window, cx)
            }
        };
        self.screen = screen;
        view
    }
}
