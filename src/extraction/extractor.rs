use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::tagger::{EntityTagger, GazetteerTagger};
use crate::app::ExtractionConfig;
use crate::constants::{CUISINE_TYPES, DIET_TERMS, MOOD_TERMS};
use crate::dialogue::CandidateSet;

/// Currency amounts ("$20", "1,200.50") or "under N" / "under $N".
/// Applied to the lowercased utterance.
static BUDGET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?\d+(?:,\d{3})*(?:\.\d{2})?|\bunder\s+\$?\d+").expect("invalid budget regex")
});

/// Maps a raw utterance to per-slot candidates.
///
/// Never fails: no match is just an empty list.
pub struct EntityExtractor {
    tagger: Box<dyn EntityTagger>,
}

impl EntityExtractor {
    pub fn new(tagger: Box<dyn EntityTagger>) -> Self {
        Self { tagger }
    }

    /// Extractor using the gazetteer tagger extended with configured places
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(Box::new(GazetteerTagger::new(&config.extra_locations)))
    }

    pub fn extract(&self, text: &str) -> CandidateSet {
        let lowered = text.to_lowercase();

        let candidates = CandidateSet {
            location: self
                .tagger
                .tag(text)
                .into_iter()
                .filter(|span| span.label.is_location())
                .map(|span| span.text)
                .collect(),
            cuisine_type: keyword_matches(&lowered, CUISINE_TYPES),
            diet_restrictions: keyword_matches(&lowered, DIET_TERMS),
            budget: BUDGET_PATTERN
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string())
                .collect(),
            mood: keyword_matches(&lowered, MOOD_TERMS),
        };

        debug!("Extracted candidates: {:?}", candidates);
        candidates
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(Box::new(GazetteerTagger::default()))
    }
}

/// Substring containment against a closed vocabulary, in vocabulary order
fn keyword_matches(lowered: &str, vocabulary: &[&str]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|term| lowered.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{EntityLabel, TaggedSpan};
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct FixedTagger(Vec<TaggedSpan>);

    impl EntityTagger for FixedTagger {
        fn tag(&self, _text: &str) -> Vec<TaggedSpan> {
            self.0.clone()
        }
    }

    fn span(text: &str, label: EntityLabel) -> TaggedSpan {
        TaggedSpan {
            text: text.to_string(),
            label,
            start: 0,
            end: text.len(),
        }
    }

    #[test]
    fn test_vegan_brunch_in_austin() {
        let extractor = EntityExtractor::default();
        let candidates = extractor.extract("Find vegan brunch in Austin");
        assert_eq!(
            candidates,
            CandidateSet {
                location: strings(&["Austin"]),
                diet_restrictions: strings(&["vegan"]),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_no_terms_gives_empty_record() {
        let extractor = EntityExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("Hello there, can you help me?").is_empty());
    }

    #[test]
    fn test_budget_patterns() {
        let extractor = EntityExtractor::default();
        assert_eq!(
            extractor.extract("Something under $20, or around $1,250.00 total").budget,
            strings(&["under $20", "$1,250.00"])
        );
        assert_eq!(
            extractor.extract("UNDER 50 please").budget,
            strings(&["under 50"])
        );
        assert_eq!(extractor.extract("$15 or $30").budget, strings(&["$15", "$30"]));
        // Bare numbers count as amounts too
        assert_eq!(
            extractor.extract("table for 4 around 30").budget,
            strings(&["4", "30"])
        );
    }

    #[test]
    fn test_keyword_lists_follow_vocabulary_order() {
        let extractor = EntityExtractor::default();
        let candidates =
            extractor.extract("Thai or Italian? Quiet, cozy and Romantic. Halal and Vegetarian.");
        assert_eq!(candidates.cuisine_type, strings(&["italian", "thai"]));
        assert_eq!(candidates.mood, strings(&["romantic", "quiet", "cozy"]));
        assert_eq!(
            candidates.diet_restrictions,
            strings(&["vegetarian", "halal"])
        );
    }

    #[test]
    fn test_containment_is_substring_based() {
        let extractor = EntityExtractor::default();
        let candidates = extractor.extract("family-style gluten-free pasta");
        assert_eq!(candidates.mood, strings(&["family"]));
        assert_eq!(candidates.diet_restrictions, strings(&["gluten-free"]));
    }

    #[test]
    fn test_only_location_labels_are_kept_and_duplicates_survive() {
        let extractor = EntityExtractor::new(Box::new(FixedTagger(vec![
            span("Austin", EntityLabel::Gpe),
            span("Joe", EntityLabel::Other),
            span("Austin", EntityLabel::Gpe),
            span("downtown", EntityLabel::Loc),
        ])));
        assert_eq!(
            extractor.extract("anything").location,
            strings(&["Austin", "Austin", "downtown"])
        );
    }

    #[test]
    fn test_configured_locations() {
        let extractor = EntityExtractor::from_config(&ExtractionConfig {
            extra_locations: strings(&["Hyde Park"]),
        });
        assert_eq!(
            extractor.extract("brunch spots by Hyde Park").location,
            strings(&["Hyde Park"])
        );
    }
}
