use serde::{Deserialize, Serialize};
use std::fmt;

/// The five preference slots, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    Location,
    CuisineType,
    DietRestrictions,
    Budget,
    Mood,
}

impl SlotName {
    pub const ALL: [SlotName; 5] = [
        SlotName::Location,
        SlotName::CuisineType,
        SlotName::DietRestrictions,
        SlotName::Budget,
        SlotName::Mood,
    ];

    /// Key used in prompts and JSON output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::CuisineType => "cuisine_type",
            Self::DietRestrictions => "diet_restrictions",
            Self::Budget => "budget",
            Self::Mood => "mood",
        }
    }

    /// Human label for the UI
    pub fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::CuisineType => "Cuisine",
            Self::DietRestrictions => "Diet",
            Self::Budget => "Budget",
            Self::Mood => "Mood",
        }
    }

    /// Scalar slots lock on their first value; list slots accumulate
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Location | Self::CuisineType | Self::Budget)
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-utterance extraction result: every match found in one utterance,
/// with no memory of earlier turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub location: Vec<String>,
    pub cuisine_type: Vec<String>,
    pub diet_restrictions: Vec<String>,
    pub budget: Vec<String>,
    pub mood: Vec<String>,
}

impl CandidateSet {
    pub fn get(&self, slot: SlotName) -> &[String] {
        match slot {
            SlotName::Location => &self.location,
            SlotName::CuisineType => &self.cuisine_type,
            SlotName::DietRestrictions => &self.diet_restrictions,
            SlotName::Budget => &self.budget,
            SlotName::Mood => &self.mood,
        }
    }

    pub fn is_empty(&self) -> bool {
        SlotName::ALL.iter().all(|slot| self.get(*slot).is_empty())
    }
}

/// Accumulated dialogue state for one session.
///
/// Scalar slots (`location`, `cuisine_type`, `budget`) are first-seen-wins
/// and never overwritten. List slots (`diet_restrictions`, `mood`) only
/// grow, deduplicated by exact string equality, in order of first
/// appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSet {
    location: Option<String>,
    cuisine_type: Option<String>,
    diet_restrictions: Vec<String>,
    budget: Option<String>,
    mood: Vec<String>,
}

impl SlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn cuisine_type(&self) -> Option<&str> {
        self.cuisine_type.as_deref()
    }

    pub fn budget(&self) -> Option<&str> {
        self.budget.as_deref()
    }

    pub fn diet_restrictions(&self) -> &[String] {
        &self.diet_restrictions
    }

    pub fn mood(&self) -> &[String] {
        &self.mood
    }

    /// Merge one utterance's candidates into the state
    pub fn apply(&mut self, candidates: &CandidateSet) {
        fill_scalar(&mut self.location, &candidates.location);
        fill_scalar(&mut self.cuisine_type, &candidates.cuisine_type);
        fill_scalar(&mut self.budget, &candidates.budget);
        extend_unique(&mut self.diet_restrictions, &candidates.diet_restrictions);
        extend_unique(&mut self.mood, &candidates.mood);
    }

    /// Whether the slot holds no value (scalar unset or list empty)
    pub fn is_missing(&self, slot: SlotName) -> bool {
        match slot {
            SlotName::Location => self.location.is_none(),
            SlotName::CuisineType => self.cuisine_type.is_none(),
            SlotName::DietRestrictions => self.diet_restrictions.is_empty(),
            SlotName::Budget => self.budget.is_none(),
            SlotName::Mood => self.mood.is_empty(),
        }
    }

    /// Slots still empty, in display order
    pub fn missing(&self) -> Vec<SlotName> {
        SlotName::ALL
            .into_iter()
            .filter(|slot| self.is_missing(*slot))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.missing().len() == SlotName::ALL.len()
    }

    /// Display text for a slot, `None` when missing
    pub fn display_value(&self, slot: SlotName) -> Option<String> {
        match slot {
            SlotName::Location => self.location.clone(),
            SlotName::CuisineType => self.cuisine_type.clone(),
            SlotName::Budget => self.budget.clone(),
            SlotName::DietRestrictions if !self.diet_restrictions.is_empty() => {
                Some(self.diet_restrictions.join(", "))
            }
            SlotName::Mood if !self.mood.is_empty() => Some(self.mood.join(", ")),
            _ => None,
        }
    }

    /// JSON view of one slot: string or null for scalars, array for lists
    pub fn slot_json(&self, slot: SlotName) -> serde_json::Value {
        match slot {
            SlotName::Location => serde_json::json!(self.location),
            SlotName::CuisineType => serde_json::json!(self.cuisine_type),
            SlotName::Budget => serde_json::json!(self.budget),
            SlotName::DietRestrictions => serde_json::json!(self.diet_restrictions),
            SlotName::Mood => serde_json::json!(self.mood),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// Later mentions of an already-set scalar are ignored, not applied as
// corrections.
fn fill_scalar(slot: &mut Option<String>, candidates: &[String]) {
    if slot.is_none() {
        if let Some(first) = candidates.first() {
            *slot = Some(first.clone());
        }
    }
}

fn extend_unique(slot: &mut Vec<String>, candidates: &[String]) {
    for candidate in candidates {
        if !slot.contains(candidate) {
            slot.push(candidate.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scalar_first_seen_wins() {
        let mut slots = SlotSet::new();
        slots.apply(&CandidateSet {
            location: strings(&["Austin", "Dallas"]),
            cuisine_type: strings(&["thai"]),
            budget: strings(&["$20"]),
            ..Default::default()
        });
        slots.apply(&CandidateSet {
            location: strings(&["Dallas"]),
            cuisine_type: strings(&["italian"]),
            budget: strings(&["under 50"]),
            ..Default::default()
        });

        assert_eq!(slots.location(), Some("Austin"));
        assert_eq!(slots.cuisine_type(), Some("thai"));
        assert_eq!(slots.budget(), Some("$20"));
    }

    #[test]
    fn test_list_slots_grow_without_duplicates() {
        let mut slots = SlotSet::new();
        let vegan = CandidateSet {
            diet_restrictions: strings(&["vegan"]),
            ..Default::default()
        };
        slots.apply(&vegan);
        slots.apply(&vegan);
        assert_eq!(slots.diet_restrictions(), strings(&["vegan"]).as_slice());

        slots.apply(&CandidateSet {
            diet_restrictions: strings(&["halal"]),
            mood: strings(&["cozy", "quiet"]),
            ..Default::default()
        });
        slots.apply(&CandidateSet {
            mood: strings(&["quiet", "date"]),
            ..Default::default()
        });

        assert_eq!(slots.diet_restrictions(), strings(&["vegan", "halal"]).as_slice());
        assert_eq!(slots.mood(), strings(&["cozy", "quiet", "date"]).as_slice());
    }

    #[test]
    fn test_empty_candidates_change_nothing() {
        let mut slots = SlotSet::new();
        slots.apply(&CandidateSet::default());
        assert!(slots.is_empty());
        assert_eq!(slots.missing(), SlotName::ALL.to_vec());
    }

    #[test]
    fn test_missing_tracks_filled_slots() {
        let mut slots = SlotSet::new();
        slots.apply(&CandidateSet {
            location: strings(&["Austin"]),
            mood: strings(&["casual"]),
            ..Default::default()
        });
        assert_eq!(
            slots.missing(),
            vec![SlotName::CuisineType, SlotName::DietRestrictions, SlotName::Budget]
        );
    }

    #[test]
    fn test_slot_json_shapes() {
        let mut slots = SlotSet::new();
        assert_eq!(slots.slot_json(SlotName::Location), serde_json::Value::Null);
        assert_eq!(slots.slot_json(SlotName::Mood), serde_json::json!([]));

        slots.apply(&CandidateSet {
            location: strings(&["Austin"]),
            ..Default::default()
        });
        assert_eq!(slots.slot_json(SlotName::Location), serde_json::json!("Austin"));
    }

    #[test]
    fn test_clear() {
        let mut slots = SlotSet::new();
        slots.apply(&CandidateSet {
            location: strings(&["Austin"]),
            diet_restrictions: strings(&["vegan"]),
            ..Default::default()
        });
        slots.clear();
        assert_eq!(slots, SlotSet::default());
    }

    #[test]
    fn test_slot_names() {
        assert_eq!(SlotName::CuisineType.as_str(), "cuisine_type");
        assert!(SlotName::Budget.is_scalar());
        assert!(!SlotName::Mood.is_scalar());
        assert_eq!(
            serde_json::to_string(&SlotName::DietRestrictions).unwrap(),
            "\"diet_restrictions\""
        );
    }
}
