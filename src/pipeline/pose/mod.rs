mod common;
mod movenet;

use std::{path::PathBuf, thread};

use crossbeam_channel::{Receiver, Sender};

use super::slot::SlotWriter;
use crate::{
    config::SketchConfig,
    types::{Frame, Pose, PoseUpdate},
};

pub(crate) trait PoseEngine: Send + 'static {
    fn estimate(&mut self, frame: &Frame) -> anyhow::Result<Vec<Pose>>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetectorStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the pose worker needs to load its model.
#[derive(Clone, Debug)]
pub struct PoseBackend {
    model_path: PathBuf,
    input_size: u32,
    min_pose_score: f32,
}

impl PoseBackend {
    pub fn from_config(config: &SketchConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            input_size: config.input_size,
            min_pose_score: config.min_pose_score,
        }
    }

    pub fn label(&self) -> &'static str {
        "ort-movenet"
    }
}

pub fn start_pose_detector(
    backend: PoseBackend,
    frame_rx: Receiver<Frame>,
    poses: SlotWriter<PoseUpdate>,
    status_tx: Sender<DetectorStatus>,
) -> thread::JoinHandle<()> {
    log::info!("starting pose backend: {}", backend.label());

    thread::spawn(move || {
        let _ = status_tx.send(DetectorStatus::Loading);
        let engine = match movenet::MoveNetEngine::new(&backend) {
            Ok(engine) => {
                log::info!("pose model ready using {}", backend.model_path.display());
                engine
            }
            Err(err) => {
                log::error!("failed to load pose model: {err:?}");
                let _ = status_tx.send(DetectorStatus::Failed(format!("{err:#}")));
                return;
            }
        };
        let _ = status_tx.send(DetectorStatus::Ready);

        run_worker_loop(engine, frame_rx, poses, backend.min_pose_score);
    })
}

fn run_worker_loop<E: PoseEngine>(
    mut engine: E,
    frame_rx: Receiver<Frame>,
    poses: SlotWriter<PoseUpdate>,
    min_pose_score: f32,
) {
    while let Some(frame) = recv_latest_frame(&frame_rx) {
        match engine.estimate(&frame) {
            Ok(mut detected) => {
                detected.retain(|pose| !pose.is_empty() && pose.score >= min_pose_score);
                poses.publish(PoseUpdate {
                    poses: detected,
                    frame_width: frame.width,
                    frame_height: frame.height,
                    timestamp: frame.timestamp,
                });
            }
            Err(err) => {
                log::warn!("pose inference failed: {err:?}");
            }
        }
    }
    log::debug!("frame channel closed, pose worker exiting");
}

fn recv_latest_frame(frame_rx: &Receiver<Frame>) -> Option<Frame> {
    let mut frame = frame_rx.recv().ok()?;
    // Skip frames that queued up while the model was busy.
    while let Ok(newer) = frame_rx.try_recv() {
        frame = newer;
    }
    Some(frame)
}
