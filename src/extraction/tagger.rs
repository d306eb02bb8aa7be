use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::warn;

use crate::constants::{
    CUISINE_TYPES, DIET_TERMS, GENERIC_AREAS, KNOWN_PLACES, LOCATION_PREPOSITIONS, MOOD_TERMS,
    NATIONALITY_ADJECTIVES, VENUE_WORDS,
};

/// Entity label attached to a tagged span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// Geopolitical entity: city, state, country
    Gpe,
    /// Non-political location: neighbourhood, area
    Loc,
    Other,
}

impl EntityLabel {
    /// Only geopolitical and generic location labels feed the location slot
    pub fn is_location(self) -> bool {
        matches!(self, Self::Gpe | Self::Loc)
    }
}

/// A labelled byte range of the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedSpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

impl TaggedSpan {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Named-entity tagging boundary
pub trait EntityTagger: Send + Sync {
    /// Tag `text`, returning spans in text order
    fn tag(&self, text: &str) -> Vec<TaggedSpan>;
}

/// Capitalized phrase directly after a location preposition
static PREPOSITION_PHRASE: Lazy<Regex> = Lazy::new(|| {
    let prepositions = LOCATION_PREPOSITIONS.join("|");
    Regex::new(&format!(
        r"\b(?i:{})\s+([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)",
        prepositions
    ))
    .expect("invalid preposition phrase regex")
});

/// A preposition phrase is not a place when any word is food, diet, mood,
/// nationality or venue vocabulary ("in Italian", "near Joe's Pizzeria")
fn is_non_place_phrase(phrase: &str) -> bool {
    phrase.split_whitespace().any(|word| {
        let word = word
            .trim_end_matches("'s")
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
            .to_lowercase();
        [CUISINE_TYPES, DIET_TERMS, MOOD_TERMS, NATIONALITY_ADJECTIVES, VENUE_WORDS]
            .iter()
            .any(|vocabulary| vocabulary.contains(&word.as_str()))
    })
}

/// Rule-based tagger backed by a gazetteer of place names.
///
/// Place names only match as written ("China" is a place, "fine china" is
/// not). Generic areas like "downtown" match in any case.
pub struct GazetteerTagger {
    places: Option<Regex>,
    areas: Option<Regex>,
}

impl GazetteerTagger {
    /// Build a tagger from the built-in place list plus `extra` names
    pub fn new<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut names: Vec<String> = KNOWN_PLACES
            .iter()
            .map(|s| s.to_string())
            .chain(
                extra
                    .iter()
                    .map(|s| s.as_ref().trim().to_string())
                    .filter(|s| !s.is_empty()),
            )
            .collect();

        // Longest first so alternation prefers "New York City" over "New York"
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        let areas: Vec<String> = GENERIC_AREAS.iter().map(|s| s.to_string()).collect();

        Self {
            places: build_alternation(&names, false),
            areas: build_alternation(&areas, true),
        }
    }

    fn gazetteer_spans(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans: Vec<TaggedSpan> = Vec::new();

        let rules = [
            (&self.places, EntityLabel::Gpe),
            (&self.areas, EntityLabel::Loc),
        ];
        for (regex, label) in rules {
            let Some(regex) = regex else {
                continue;
            };
            for m in regex.find_iter(text) {
                if spans.iter().any(|s| s.overlaps(m.start(), m.end())) {
                    continue;
                }
                spans.push(TaggedSpan {
                    text: m.as_str().to_string(),
                    label,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }

        spans
    }
}

impl Default for GazetteerTagger {
    fn default() -> Self {
        Self::new::<&str>(&[])
    }
}

impl EntityTagger for GazetteerTagger {
    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans = self.gazetteer_spans(text);

        for caps in PREPOSITION_PHRASE.captures_iter(text) {
            let Some(phrase) = caps.get(1) else {
                continue;
            };
            if spans.iter().any(|s| s.overlaps(phrase.start(), phrase.end()))
                || is_non_place_phrase(phrase.as_str())
            {
                continue;
            }
            spans.push(TaggedSpan {
                text: phrase.as_str().to_string(),
                label: EntityLabel::Gpe,
                start: phrase.start(),
                end: phrase.end(),
            });
        }

        spans.sort_by_key(|s| s.start);
        spans
    }
}

fn build_alternation(names: &[String], case_insensitive: bool) -> Option<Regex> {
    if names.is_empty() {
        return None;
    }
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    match RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Failed to build gazetteer pattern: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(spans: &[TaggedSpan]) -> Vec<&str> {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_known_city() {
        let tagger = GazetteerTagger::default();
        let spans = tagger.tag("Find vegan brunch in Austin");
        assert_eq!(texts(&spans), vec!["Austin"]);
        assert_eq!(spans[0].label, EntityLabel::Gpe);
        assert_eq!(spans[0].start, 21);
    }

    #[test]
    fn test_longest_name_wins() {
        let tagger = GazetteerTagger::default();
        let spans = tagger.tag("Best eateries in New York City");
        assert_eq!(texts(&spans), vec!["New York City"]);
    }

    #[test]
    fn test_place_names_are_case_sensitive() {
        let tagger = GazetteerTagger::default();
        assert_eq!(texts(&tagger.tag("Where should I eat in LA?")), vec!["LA"]);
        assert!(tagger.tag("la la land").is_empty());
        assert_eq!(texts(&tagger.tag("dim sum like in China")), vec!["China"]);
        assert!(tagger.tag("a place with fine china and candles").is_empty());
        assert!(tagger.tag("any tacos in san diego?").is_empty());
    }

    #[test]
    fn test_generic_area_is_loc() {
        let tagger = GazetteerTagger::default();
        let spans = tagger.tag("Mexican cuisine near downtown");
        assert_eq!(texts(&spans), vec!["downtown"]);
        assert_eq!(spans[0].label, EntityLabel::Loc);

        let spans = tagger.tag("Somewhere Uptown");
        assert_eq!(texts(&spans), vec!["Uptown"]);
        assert_eq!(spans[0].label, EntityLabel::Loc);
    }

    #[test]
    fn test_food_and_venue_phrases_are_not_places() {
        let tagger = GazetteerTagger::default();
        assert!(tagger.tag("I'm interested in Italian food").is_empty());
        assert!(tagger.tag("Something in Vegan Thai").is_empty());
        assert!(tagger.tag("Anything around Spanish tapas?").is_empty());
        assert!(tagger.tag("Dinner at Olive Garden tonight").is_empty());
        assert!(tagger.tag("lunch near Joe's Pizzeria").is_empty());
        assert_eq!(
            texts(&tagger.tag("Italian near Boise")),
            vec!["Boise"]
        );
    }

    #[test]
    fn test_unknown_place_after_preposition() {
        let tagger = GazetteerTagger::default();
        let spans = tagger.tag("dinner spots around Boise or near Lake Tahoe");
        assert_eq!(texts(&spans), vec!["Boise", "Lake Tahoe"]);
    }

    #[test]
    fn test_extra_locations() {
        let tagger = GazetteerTagger::new(&["Williamsburg"]);
        assert_eq!(
            texts(&tagger.tag("cozy bars on the Williamsburg side")),
            vec!["Williamsburg"]
        );
    }

    #[test]
    fn test_no_places() {
        let tagger = GazetteerTagger::default();
        assert!(tagger.tag("").is_empty());
        assert!(tagger.tag("something cheap and cheerful please").is_empty());
    }

    #[test]
    fn test_spans_in_text_order() {
        let tagger = GazetteerTagger::default();
        let spans = tagger.tag("Flying from Boise to Seattle");
        assert_eq!(texts(&spans), vec!["Boise", "Seattle"]);
    }
}
