use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::transcript::{Transcript, Turn};
use crate::dialogue::SlotSet;
use crate::utils::FoodScoutError;

/// Where a session is within the per-turn pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TurnPhase {
    /// No turn in flight
    #[default]
    Idle,
    Extracting,
    StateUpdated,
    PromptComposed,
    AwaitingCompletion,
}

impl TurnPhase {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// One conversation: its slot state and transcript.
///
/// Nothing here is process-wide; hosts create one `Session` per
/// conversation and route every turn for it through the same value.
#[derive(Debug, Clone, Default)]
pub struct Session {
    slots: SlotSet,
    transcript: Transcript,
    phase: TurnPhase,
}

/// A session shared with a concurrent host. The lock is held for a whole
/// turn so extraction, update and append are serialized.
pub type SharedSession = Arc<Mutex<Session>>;

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn slots(&self) -> &SlotSet {
        &self.slots
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub(crate) fn slots_mut(&mut self) -> &mut SlotSet {
        &mut self.slots
    }

    pub(crate) fn set_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }

    /// Append the finished turn and return to `Idle`
    pub(crate) fn finish_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
        self.phase = TurnPhase::Idle;
    }

    /// Reset slots and transcript. Only allowed while no turn is in flight.
    pub fn clear(&mut self) -> Result<(), FoodScoutError> {
        if !self.phase.is_idle() {
            return Err(FoodScoutError::SessionBusy(format!(
                "cannot clear while in {:?}",
                self.phase
            )));
        }
        self.slots.clear();
        self.transcript.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::CandidateSet;

    fn filled_session() -> Session {
        let mut session = Session::new();
        session.slots_mut().apply(&CandidateSet {
            location: vec!["Austin".to_string()],
            mood: vec!["cozy".to_string()],
            ..Default::default()
        });
        session.finish_turn(Turn::new("cozy spot in Austin", "Any cuisine?", false));
        session
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = filled_session();
        session.clear().unwrap();

        assert!(session.slots().is_empty());
        assert_eq!(session.transcript().len(), 0);
        assert!(session.phase().is_idle());
    }

    #[test]
    fn test_clear_rejected_mid_turn() {
        let mut session = filled_session();
        session.set_phase(TurnPhase::AwaitingCompletion);

        let err = session.clear().unwrap_err();
        assert!(matches!(err, FoodScoutError::SessionBusy(_)));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_finish_turn_returns_to_idle() {
        let mut session = Session::new();
        session.set_phase(TurnPhase::AwaitingCompletion);
        session.finish_turn(Turn::new("hi", "hello", false));
        assert!(session.phase().is_idle());
        assert_eq!(session.transcript().len(), 1);
    }
}
