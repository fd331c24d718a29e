pub mod camera;
pub mod pose;
pub mod rgba_converter;
pub mod slot;

// Re-exports for convenience
pub use camera::{CameraDevice, CameraStream, CaptureOptions, available_cameras, start_camera_stream};
pub use pose::{DetectorStatus, PoseBackend, start_pose_detector};
pub use slot::{SlotReader, SlotWriter, latest_slot};
