use serde_json::{Map, Value};

use super::slots::{SlotName, SlotSet};

/// Renders the dialogue state into the system instruction sent ahead of
/// the transcript. Pure: the same slots always give the same text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Every slot, populated or not
    pub fn collected_info(&self, slots: &SlotSet) -> Value {
        let map: Map<String, Value> = SlotName::ALL
            .into_iter()
            .map(|slot| (slot.as_str().to_string(), slots.slot_json(slot)))
            .collect();
        Value::Object(map)
    }

    /// Only the slots that are still empty
    pub fn missing_info(&self, slots: &SlotSet) -> Value {
        let map: Map<String, Value> = slots
            .missing()
            .into_iter()
            .map(|slot| (slot.as_str().to_string(), slots.slot_json(slot)))
            .collect();
        Value::Object(map)
    }

    pub fn compose(&self, slots: &SlotSet) -> String {
        format!(
            "You are an assistant helping suggest restaurants and eateries. Be conversational and natural, \
but make sure you gather the information needed for a good suggestion. Current status:

Information collected: {collected}
Missing information: {missing}

Guidelines:
1. Acknowledge any new information the user has provided.
2. Ask for missing information naturally within the conversation.
3. Ask for at most one missing item per reply so the user is not overwhelmed.
4. Only suggest restaurants once most of the essential information is known.
5. Keep the conversation engaging while gathering information.

When giving the final recommendation, format each restaurant clearly with its name, details, address, and cost.",
            collected = self.collected_info(slots),
            missing = self.missing_info(slots),
        )
    }
}
