use anyhow::{Context, Result, anyhow};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use super::{PoseBackend, PoseEngine, common};
use crate::types::{Frame, Pose};

/// Single-person MoveNet-style model: NHWC float input, `[1, 1, 17, 3]` output.
pub(super) struct MoveNetEngine {
    session: Session,
    input_size: u32,
}

impl MoveNetEngine {
    pub(super) fn new(backend: &PoseBackend) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)?
            .commit_from_file(&backend.model_path)
            .with_context(|| {
                format!(
                    "failed to load ORT session from {}",
                    backend.model_path.display()
                )
            })?;

        Ok(Self {
            session,
            input_size: backend.input_size,
        })
    }
}

impl PoseEngine for MoveNetEngine {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<Pose>> {
        let (input, letterbox) = common::prepare_frame(frame, self.input_size)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run pose session")?;

        if outputs.len() < 1 {
            return Err(anyhow!("pose model returned no outputs"));
        }

        let keypoints = outputs[0].try_extract_array::<f32>()?;
        let flattened: Vec<f32> = keypoints.iter().copied().collect();
        let pose = common::decode_keypoints(&flattened, &letterbox)?;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("pose score {:.2}", pose.score);
            for (part, kp) in pose.iter() {
                log::trace!(
                    "  {part}: ({:.0}, {:.0}) {:.2}",
                    kp.position.x,
                    kp.position.y,
                    kp.confidence
                );
            }
        }

        Ok(vec![pose])
    }
}
