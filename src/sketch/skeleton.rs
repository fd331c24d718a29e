use super::raster::{self, Rgba};
use crate::types::{BodyPart, Pose};

pub const BODY_EDGES: &[(BodyPart, BodyPart)] = &[
    (BodyPart::LeftShoulder, BodyPart::RightShoulder),
    (BodyPart::LeftShoulder, BodyPart::LeftElbow),
    (BodyPart::LeftElbow, BodyPart::LeftWrist),
    (BodyPart::RightShoulder, BodyPart::RightElbow),
    (BodyPart::RightElbow, BodyPart::RightWrist),
    (BodyPart::LeftShoulder, BodyPart::LeftHip),
    (BodyPart::RightShoulder, BodyPart::RightHip),
    (BodyPart::LeftHip, BodyPart::RightHip),
    (BodyPart::LeftHip, BodyPart::LeftKnee),
    (BodyPart::LeftKnee, BodyPart::LeftAnkle),
    (BodyPart::RightHip, BodyPart::RightKnee),
    (BodyPart::RightKnee, BodyPart::RightAnkle),
];

pub const KEYPOINT_MIN_CONFIDENCE: f32 = 0.2;
const MARKER_COLOR: Rgba = [255, 0, 0, 255];
const MARKER_DIAMETER: f32 = 10.0;
const EDGE_THICKNESS: f32 = 2.0;

/// Draws confident keypoints and the limbs between them straight onto a frame.
pub fn draw_pose(buffer: &mut [u8], width: u32, height: u32, pose: &Pose) {
    let confident = |part: BodyPart| {
        pose.get(part)
            .filter(|kp| kp.confidence > KEYPOINT_MIN_CONFIDENCE)
    };

    for &(a, b) in BODY_EDGES {
        if let (Some(ka), Some(kb)) = (confident(a), confident(b)) {
            raster::stroke_segment(
                buffer,
                width,
                height,
                ka.position,
                kb.position,
                MARKER_COLOR,
                EDGE_THICKNESS,
            );
        }
    }

    for (part, _) in pose.iter() {
        if let Some(kp) = confident(part) {
            raster::fill_circle(
                buffer,
                width,
                height,
                kp.position,
                MARKER_DIAMETER / 2.0,
                MARKER_COLOR,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Keypoint;

    #[test]
    fn low_confidence_parts_are_skipped() {
        let (w, h) = (64u32, 64u32);
        let mut buf = vec![0u8; (w * h * 4) as usize];
        let pose = Pose::new()
            .with(BodyPart::Nose, Keypoint::new(10.0, 10.0, 0.1))
            .with(BodyPart::LeftShoulder, Keypoint::new(20.0, 30.0, 0.9))
            .with(BodyPart::RightShoulder, Keypoint::new(40.0, 30.0, 0.9));

        draw_pose(&mut buf, w, h, &pose);

        let alpha = |x: u32, y: u32| buf[((y * w + x) * 4 + 3) as usize];
        assert_eq!(alpha(10, 10), 0);
        assert_eq!(alpha(20, 30), 255);
        assert_eq!(alpha(30, 30), 255);
    }
}
