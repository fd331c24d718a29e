use super::{Arc, ImageBuffer, ImageFrame, RenderImage, Rgba};
use crate::{
    sketch::{overlay::OverlaySurface, skeleton},
    types::{Frame, Pose},
};

/// Builds the displayed image: camera frame, then the sketch, then the
/// optional keypoint debug layer.
pub(super) fn frame_to_image(
    frame: &Frame,
    overlay: Option<&OverlaySurface>,
    debug_pose: Option<&Pose>,
) -> Option<Arc<RenderImage>> {
    let mut rgba = frame.rgba.clone();
    if let Some(surface) = overlay {
        surface.composite_onto(&mut rgba, frame.width, frame.height);
    }
    if let Some(pose) = debug_pose {
        skeleton::draw_pose(&mut rgba, frame.width, frame.height, pose);
    }

    // GPUI expects BGRA; convert in place to avoid the async asset pipeline and flicker.
    for px in rgba.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    let buffer = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(frame.width, frame.height, rgba)?;
    Some(Arc::new(RenderImage::new(vec![ImageFrame::new(buffer)])))
}
