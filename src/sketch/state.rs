use std::time::{Duration, Instant};

use super::gesture::ToggleDecision;
use crate::types::DrawingState;

pub const TOGGLE_COOLDOWN: Duration = Duration::from_millis(2_000);

/// Idle/Drawing toggle, level-triggered with a cooldown after every
/// transition. The cooldown also runs from startup.
#[derive(Debug)]
pub struct DrawingStateMachine {
    state: DrawingState,
    last_transition: Instant,
    cooldown: Duration,
}

impl DrawingStateMachine {
    pub fn new(started_at: Instant) -> Self {
        Self::with_cooldown(started_at, TOGGLE_COOLDOWN)
    }

    pub fn with_cooldown(started_at: Instant, cooldown: Duration) -> Self {
        Self {
            state: DrawingState::Idle,
            last_transition: started_at,
            cooldown,
        }
    }

    pub fn state(&self) -> DrawingState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == DrawingState::Drawing
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_transition) < self.cooldown
    }

    /// Flips the state when the gesture fires outside the cooldown window.
    /// Returns the new state on a transition.
    pub fn update(&mut self, toggle: ToggleDecision, now: Instant) -> Option<DrawingState> {
        if self.in_cooldown(now) || !toggle.is_touching() {
            return None;
        }

        self.state = self.state.toggled();
        self.last_transition = now;
        Some(self.state)
    }
}
