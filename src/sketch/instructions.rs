use crate::types::{DrawingState, Handedness};

/// Colour cue shown next to the instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Drawing (green).
    Active,
    /// Not drawing (red).
    Inactive,
}

impl Tone {
    pub fn rgb(&self) -> u32 {
        match self {
            Tone::Active => 0x22c55e,
            Tone::Inactive => 0xef4444,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub headline: &'static str,
    pub steps: [&'static str; 2],
    pub tone: Tone,
}

impl Instruction {
    pub fn for_state(state: DrawingState, handedness: Handedness) -> Self {
        let (steps, tone) = match (state, handedness) {
            (DrawingState::Idle, Handedness::Right) => (
                [
                    "Put your right hand at the starting position",
                    "Touch your face with your left hand to start drawing",
                ],
                Tone::Inactive,
            ),
            (DrawingState::Drawing, Handedness::Right) => (
                [
                    "Use your right hand to draw",
                    "Touch your face with your left hand to stop drawing",
                ],
                Tone::Active,
            ),
            (DrawingState::Idle, Handedness::Left) => (
                [
                    "Put your left hand at the starting position",
                    "Touch your face with your right hand to start drawing",
                ],
                Tone::Inactive,
            ),
            (DrawingState::Drawing, Handedness::Left) => (
                [
                    "Use your left hand to draw",
                    "Touch your face with your right hand to stop drawing",
                ],
                Tone::Active,
            ),
        };

        let headline = match state {
            DrawingState::Idle => "[Not drawing]",
            DrawingState::Drawing => "[Drawing]",
        };

        Self {
            headline,
            steps,
            tone,
        }
    }
}

pub trait InstructionPresenter {
    fn present(&mut self, state: DrawingState, handedness: Handedness);
}

/// Keeps the instruction the UI should display.
#[derive(Clone, Debug)]
pub struct InstructionBoard {
    current: Instruction,
}

impl Default for InstructionBoard {
    fn default() -> Self {
        Self {
            current: Instruction::for_state(DrawingState::Idle, Handedness::Right),
        }
    }
}

impl InstructionBoard {
    pub fn current(&self) -> &Instruction {
        &self.current
    }
}

impl InstructionPresenter for InstructionBoard {
    fn present(&mut self, state: DrawingState, handedness: Handedness) {
        self.current = Instruction::for_state(state, handedness);
    }
}
