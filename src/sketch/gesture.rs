use crate::types::{BodyPart, Handedness, Point, Pose};

pub const DRAWING_MIN_CONFIDENCE: f32 = 0.55;
pub const TOGGLE_MIN_CONFIDENCE: f32 = 0.5;
pub const FACE_TOUCH_DISTANCE: f32 = 20.0;

/// Outcome of the face-touch check for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToggleDecision {
    /// Not enough data to evaluate the gesture this tick.
    NoDecision,
    NotTouching,
    Touching { distance: f32 },
}

impl ToggleDecision {
    pub fn is_touching(&self) -> bool {
        matches!(self, ToggleDecision::Touching { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub drawing_point: Option<Point>,
    pub toggle: ToggleDecision,
}

impl GestureReading {
    pub const EMPTY: GestureReading = GestureReading {
        drawing_point: None,
        toggle: ToggleDecision::NoDecision,
    };
}

pub fn classify(pose: Option<&Pose>, handedness: Handedness) -> GestureReading {
    let Some(pose) = pose else {
        return GestureReading::EMPTY;
    };

    GestureReading {
        drawing_point: drawing_point(pose, handedness),
        toggle: toggle_decision(pose, handedness),
    }
}

fn drawing_point(pose: &Pose, handedness: Handedness) -> Option<Point> {
    pose.get(handedness.drawing_wrist())
        .filter(|kp| kp.confidence > DRAWING_MIN_CONFIDENCE)
        .map(|kp| kp.position)
}

fn toggle_decision(pose: &Pose, handedness: Handedness) -> ToggleDecision {
    let Some(wrist) = pose.get(handedness.toggle_wrist()) else {
        return ToggleDecision::NoDecision;
    };
    let ears = [pose.get(BodyPart::LeftEar), pose.get(BodyPart::RightEar)];
    if ears.iter().all(Option::is_none) {
        return ToggleDecision::NoDecision;
    }
    if wrist.confidence <= TOGGLE_MIN_CONFIDENCE {
        return ToggleDecision::NoDecision;
    }

    let nearest = ears
        .iter()
        .flatten()
        .map(|ear| face_distance(ear.position, wrist.position))
        .filter(|d| !d.is_nan())
        .min_by(f32::total_cmp);

    match nearest {
        Some(distance) if distance < FACE_TOUCH_DISTANCE => ToggleDecision::Touching { distance },
        _ => ToggleDecision::NotTouching,
    }
}

/// `sqrt(dx² - dy²)`: horizontal proximity with the vertical term subtracted.
/// NaN whenever `|dy| > |dx|`; callers drop those.
pub fn face_distance(ear: Point, wrist: Point) -> f32 {
    let dx = ear.x - wrist.x;
    let dy = ear.y - wrist.y;
    (dx * dx - dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Keypoint;

    fn pose_with(parts: &[(BodyPart, f32, f32, f32)]) -> Pose {
        parts.iter().fold(Pose::new(), |pose, &(part, x, y, c)| {
            pose.with(part, Keypoint::new(x, y, c))
        })
    }

    #[test]
    fn drawing_wrist_needs_more_than_055() {
        for c in [0.0, 0.3, 0.5, 0.55] {
            let pose = pose_with(&[(BodyPart::RightWrist, 10.0, 10.0, c)]);
            assert_eq!(classify(Some(&pose), Handedness::Right).drawing_point, None, "c={c}");
        }
        let pose = pose_with(&[(BodyPart::RightWrist, 10.0, 12.0, 0.56)]);
        assert_eq!(
            classify(Some(&pose), Handedness::Right).drawing_point,
            Some(Point::new(10.0, 12.0))
        );
    }

    #[test]
    fn handedness_selects_drawing_wrist() {
        let pose = pose_with(&[
            (BodyPart::RightWrist, 1.0, 1.0, 0.9),
            (BodyPart::LeftWrist, 2.0, 2.0, 0.9),
        ]);
        assert_eq!(
            classify(Some(&pose), Handedness::Left).drawing_point,
            Some(Point::new(2.0, 2.0))
        );
    }

    #[test]
    fn absent_inputs_give_no_decision() {
        assert_eq!(classify(None, Handedness::Right), GestureReading::EMPTY);

        let no_wrist = pose_with(&[(BodyPart::LeftEar, 50.0, 50.0, 0.9)]);
        assert_eq!(
            classify(Some(&no_wrist), Handedness::Right).toggle,
            ToggleDecision::NoDecision
        );

        let no_ears = pose_with(&[(BodyPart::LeftWrist, 50.0, 50.0, 0.9)]);
        assert_eq!(
            classify(Some(&no_ears), Handedness::Right).toggle,
            ToggleDecision::NoDecision
        );

        let weak_wrist = pose_with(&[
            (BodyPart::LeftWrist, 50.0, 50.0, 0.5),
            (BodyPart::LeftEar, 50.0, 50.0, 0.9),
        ]);
        assert_eq!(
            classify(Some(&weak_wrist), Handedness::Right).toggle,
            ToggleDecision::NoDecision
        );
    }

    #[test]
    fn subtracted_metric_touches_near_left_ear() {
        let pose = pose_with(&[
            (BodyPart::LeftEar, 50.0, 50.0, 0.8),
            (BodyPart::RightEar, 200.0, 200.0, 0.8),
            (BodyPart::LeftWrist, 52.0, 48.0, 0.9),
        ]);
        let reading = classify(Some(&pose), Handedness::Right);
        assert_eq!(reading.toggle, ToggleDecision::Touching { distance: 0.0 });
        assert!(reading.toggle.is_touching());
    }

    #[test]
    fn nan_distances_are_ignored() {
        assert!(face_distance(Point::new(0.0, 0.0), Point::new(1.0, 10.0)).is_nan());

        // left ear only yields NaN, right ear is horizontally far
        let pose = pose_with(&[
            (BodyPart::LeftEar, 100.0, 100.0, 0.8),
            (BodyPart::RightEar, 300.0, 100.0, 0.8),
            (BodyPart::LeftWrist, 101.0, 150.0, 0.9),
        ]);
        assert_eq!(
            classify(Some(&pose), Handedness::Right).toggle,
            ToggleDecision::NotTouching
        );
    }

    #[test]
    fn nearest_valid_ear_wins() {
        let pose = pose_with(&[
            (BodyPart::LeftEar, 100.0, 100.0, 0.8),
            (BodyPart::RightEar, 60.0, 100.0, 0.8),
            (BodyPart::RightWrist, 65.0, 100.0, 0.9),
        ]);
        assert_eq!(
            classify(Some(&pose), Handedness::Left).toggle,
            ToggleDecision::Touching { distance: 5.0 }
        );
    }

    #[test]
    fn far_wrist_does_not_touch() {
        let pose = pose_with(&[
            (BodyPart::RightEar, 100.0, 100.0, 0.8),
            (BodyPart::LeftWrist, 130.0, 100.0, 0.9),
        ]);
        assert_eq!(
            classify(Some(&pose), Handedness::Right).toggle,
            ToggleDecision::NotTouching
        );
    }
}
