use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One exchange: the user's utterance and the assistant's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
    /// The reply is an apology for a failed completion
    pub failed: bool,
    pub timestamp: DateTime<Local>,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>, failed: bool) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            failed,
            timestamp: Local::now(),
        }
    }
}

/// Append-only list of turns; only a session clear empties it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::new("one", "first", false));
        transcript.push(Turn::new("two", "second", true));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0].user, "one");
        assert_eq!(transcript.last().map(|t| t.failed), Some(true));
    }
}
