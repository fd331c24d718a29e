use std::{fmt, time::Instant};

#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub position: Point,
    pub confidence: f32,
}

impl Keypoint {
    pub const fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self {
            position: Point::new(x, y),
            confidence,
        }
    }
}

/// COCO body parts, in the order single-pose models emit them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const COUNT: usize = 17;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "leftEye",
            BodyPart::RightEye => "rightEye",
            BodyPart::LeftEar => "leftEar",
            BodyPart::RightEar => "rightEar",
            BodyPart::LeftShoulder => "leftShoulder",
            BodyPart::RightShoulder => "rightShoulder",
            BodyPart::LeftElbow => "leftElbow",
            BodyPart::RightElbow => "rightElbow",
            BodyPart::LeftWrist => "leftWrist",
            BodyPart::RightWrist => "rightWrist",
            BodyPart::LeftHip => "leftHip",
            BodyPart::RightHip => "rightHip",
            BodyPart::LeftKnee => "leftKnee",
            BodyPart::RightKnee => "rightKnee",
            BodyPart::LeftAnkle => "leftAnkle",
            BodyPart::RightAnkle => "rightAnkle",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keypoints of one detected person. Parts the model did not report are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    keypoints: [Option<Keypoint>; BodyPart::COUNT],
    pub score: f32,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, part: BodyPart, keypoint: Keypoint) -> Self {
        self.set(part, keypoint);
        self
    }

    pub fn set(&mut self, part: BodyPart, keypoint: Keypoint) {
        self.keypoints[part.index()] = Some(keypoint);
    }

    pub fn get(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints[part.index()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &Keypoint)> {
        BodyPart::ALL
            .iter()
            .zip(self.keypoints.iter())
            .filter_map(|(part, kp)| kp.as_ref().map(|kp| (*part, kp)))
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.iter().all(Option::is_none)
    }
}

/// One wholesale result set from the pose worker.
#[derive(Clone, Debug)]
pub struct PoseUpdate {
    pub poses: Vec<Pose>,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Capture time of the frame the poses were estimated from.
    pub timestamp: Instant,
}

impl PoseUpdate {
    /// Whether these poses can be drawn against `frame`: same pixel space and
    /// captured by the stream that started at `stream_started`.
    pub fn applies_to(&self, frame: &Frame, stream_started: Option<Instant>) -> bool {
        self.frame_width == frame.width
            && self.frame_height == frame.height
            && stream_started.is_none_or(|started| self.timestamp >= started)
    }

    /// Single-detection mode: only the first pose drives the sketch.
    pub fn primary(&self) -> Option<&Pose> {
        self.poses.first()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Right => "Right-handed",
            Handedness::Left => "Left-handed",
        }
    }

    pub fn drawing_wrist(&self) -> BodyPart {
        match self {
            Handedness::Right => BodyPart::RightWrist,
            Handedness::Left => BodyPart::LeftWrist,
        }
    }

    pub fn toggle_wrist(&self) -> BodyPart {
        match self {
            Handedness::Right => BodyPart::LeftWrist,
            Handedness::Left => BodyPart::RightWrist,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawingState {
    #[default]
    Idle,
    Drawing,
}

impl DrawingState {
    pub fn toggled(self) -> Self {
        match self {
            DrawingState::Idle => DrawingState::Drawing,
            DrawingState::Drawing => DrawingState::Idle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DrawingState::Idle => "Not drawing",
            DrawingState::Drawing => "Drawing",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn update_at(width: u32, height: u32, timestamp: Instant) -> PoseUpdate {
        PoseUpdate {
            poses: vec![Pose::new()],
            frame_width: width,
            frame_height: height,
            timestamp,
        }
    }

    #[test]
    fn pose_updates_from_an_earlier_stream_are_ignored() {
        let earlier = Instant::now();
        let started = earlier + Duration::from_millis(10);
        let frame = Frame {
            rgba: Vec::new(),
            width: 640,
            height: 480,
            timestamp: started + Duration::from_millis(40),
        };

        let stale = update_at(640, 480, earlier);
        assert!(!stale.applies_to(&frame, Some(started)));
        assert!(stale.applies_to(&frame, None));

        let fresh = update_at(640, 480, started + Duration::from_millis(5));
        assert!(fresh.applies_to(&frame, Some(started)));

        let resized = update_at(1280, 720, started + Duration::from_millis(5));
        assert!(!resized.applies_to(&frame, Some(started)));
    }

    #[test]
    fn body_part_order_matches_index() {
        for (idx, part) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(part.index(), idx);
        }
        assert_eq!(BodyPart::RightWrist.name(), "rightWrist");
    }

    #[test]
    fn pose_reports_only_present_parts() {
        let pose = Pose::new()
            .with(BodyPart::LeftEar, Keypoint::new(1.0, 2.0, 0.4))
            .with(BodyPart::RightWrist, Keypoint::new(3.0, 4.0, 0.9));

        assert!(pose.get(BodyPart::Nose).is_none());
        assert_eq!(pose.get(BodyPart::RightWrist).map(|k| k.confidence), Some(0.9));
        let parts: Vec<_> = pose.iter().map(|(p, _)| p).collect();
        assert_eq!(parts, vec![BodyPart::LeftEar, BodyPart::RightWrist]);
        assert!(Pose::new().is_empty());
    }

    #[test]
    fn handedness_picks_opposite_wrists() {
        assert_eq!(Handedness::Right.drawing_wrist(), BodyPart::RightWrist);
        assert_eq!(Handedness::Right.toggle_wrist(), BodyPart::LeftWrist);
        assert_eq!(Handedness::Left.drawing_wrist(), BodyPart::LeftWrist);
        assert_eq!(Handedness::Left.toggle_wrist(), BodyPart::RightWrist);
    }
}
