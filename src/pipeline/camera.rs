use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    query,
    utils::{
        ApiBackend, CameraIndex, CameraInfo, FrameFormat, RequestedFormat, RequestedFormatType,
    },
};

use super::rgba_converter;
use crate::types::Frame;

// macOS built-in cameras often reject YUYV even though it is advertised.
const PREFERRED_PIXEL_FORMATS: &[FrameFormat] = &[
    FrameFormat::RAWRGB,
    FrameFormat::RAWBGR,
    FrameFormat::GRAY,
    FrameFormat::YUYV,
    FrameFormat::NV12,
    FrameFormat::MJPEG,
];

fn requested_formats() -> [RequestedFormat<'static>; 3] {
    [
        RequestedFormat::with_formats(
            RequestedFormatType::AbsoluteHighestFrameRate,
            PREFERRED_PIXEL_FORMATS,
        ),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

#[derive(Clone, Debug)]
pub struct CameraDevice {
    pub index: CameraIndex,
    pub label: String,
}

#[derive(Clone, Copy, Debug)]
pub struct CaptureOptions {
    pub mirror: bool,
    pub detector_fps: u64,
}

impl CaptureOptions {
    fn detector_interval(&self) -> Duration {
        Duration::from_millis(1_000 / self.detector_fps.max(1))
    }
}

#[derive(Debug)]
pub struct CameraStream {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CameraStream {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    let cameras = query(ApiBackend::Auto)?;
    Ok(cameras
        .into_iter()
        .map(|info| CameraDevice {
            index: info.index().clone(),
            label: format_camera_label(&info),
        })
        .collect())
}

fn format_camera_label(info: &CameraInfo) -> String {
    info.human_name()
}

fn build_camera(index: CameraIndex) -> Result<Camera> {
    let mut last_err = None;

    for requested in requested_formats() {
        match Camera::new(index.clone(), requested) {
            Ok(mut camera) => match camera.open_stream() {
                Ok(()) => return Ok(camera),
                Err(err) => last_err = Some(err.into()),
            },
            Err(err) => last_err = Some(err.into()),
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("failed to open camera with any supported format")))
}

/// Captures on a background thread. Every frame goes to `ui_tx`; `detector_tx`
/// gets at most `detector_fps` frames per second. Both drop frames when full.
pub fn start_camera_stream(
    index: CameraIndex,
    options: CaptureOptions,
    ui_tx: Sender<Frame>,
    detector_tx: Sender<Frame>,
) -> Result<CameraStream> {
    // Fail fast before spawning the capture thread.
    drop(build_camera(index.clone())?);

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let detector_interval = options.detector_interval();

    let handle = thread::spawn(move || {
        let mut camera = match build_camera(index) {
            Ok(cam) => cam,
            Err(err) => {
                log::error!("failed to open camera: {err:?}");
                return;
            }
        };
        log::info!(
            "camera streaming {} (mirror: {})",
            camera.camera_format(),
            options.mirror
        );

        let mut last_detector_frame: Option<Instant> = None;
        while !stop_flag.load(Ordering::Relaxed) {
            let buffer = match camera.frame() {
                Ok(buffer) => buffer,
                Err(err) => {
                    log::warn!("camera frame read failed: {err:?}");
                    continue;
                }
            };

            let converted = match rgba_converter::convert_camera_frame(&buffer, options.mirror) {
                Ok(rgba) => rgba,
                Err(err) => {
                    log::warn!("failed to decode camera frame: {err:?}");
                    continue;
                }
            };

            let frame = Frame {
                rgba: converted.rgba,
                width: converted.width,
                height: converted.height,
                timestamp: Instant::now(),
            };

            let detector_due = last_detector_frame
                .is_none_or(|last| frame.timestamp.duration_since(last) >= detector_interval);
            if detector_due && detector_tx.try_send(frame.clone()).is_ok() {
                last_detector_frame = Some(frame.timestamp);
            }

            let _ = ui_tx.try_send(frame);
        }

        if let Err(err) = camera.stop_stream() {
            log::warn!("failed to stop camera stream: {err:?}");
        }
    });

    Ok(CameraStream {
        stop,
        handle: Some(handle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_interval_follows_fps() {
        let opts = CaptureOptions {
            mirror: true,
            detector_fps: 15,
        };
        assert_eq!(opts.detector_interval(), Duration::from_millis(66));

        let zero = CaptureOptions {
            mirror: false,
            detector_fps: 0,
        };
        assert_eq!(zero.detector_interval(), Duration::from_millis(1_000));
    }
}
