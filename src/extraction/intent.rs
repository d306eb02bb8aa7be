use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Tokens of two or more word characters
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("invalid token regex"));

const SMOOTHING_ALPHA: f64 = 1.0;

/// What the user is mostly talking about in one utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BudgetQuery,
    CuisineQuery,
    DietQuery,
    LocationQuery,
    MoodQuery,
    GeneralQuery,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BudgetQuery => "budget_query",
            Self::CuisineQuery => "cuisine_query",
            Self::DietQuery => "diet_query",
            Self::LocationQuery => "location_query",
            Self::MoodQuery => "mood_query",
            Self::GeneralQuery => "general_query",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TRAINING_DATA: &[(Intent, &[&str])] = &[
    (
        Intent::LocationQuery,
        &[
            "Find places to eat in New York",
            "Any good spots around Austin?",
            "Where should I eat in LA?",
            "Restaurants near me",
            "Dinner places in San Francisco",
        ],
    ),
    (
        Intent::CuisineQuery,
        &[
            "I want Thai food",
            "Show me Italian restaurants",
            "Where can I get sushi?",
            "Any good Indian food?",
            "Mexican cuisine near downtown",
        ],
    ),
    (
        Intent::DietQuery,
        &[
            "I'm vegetarian",
            "Gluten-free options please",
            "Looking for halal food",
            "I need vegan choices",
            "Dairy-free meals",
        ],
    ),
    (
        Intent::BudgetQuery,
        &[
            "Cheap eats in Chicago",
            "Fancy dining options",
            "Budget-friendly restaurants",
            "Under $20 per person",
            "Not too expensive",
        ],
    ),
    (
        Intent::MoodQuery,
        &[
            "I want something cozy",
            "Looking for a romantic spot",
            "Trendy places to eat",
            "Chill vibe for dinner",
            "Fun ambiance",
        ],
    ),
];

/// TF-IDF features with a multinomial naive Bayes model, trained once on
/// a small fixed corpus of restaurant requests
pub struct IntentClassifier {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<Intent>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        let samples: Vec<(Intent, &str)> = TRAINING_DATA
            .iter()
            .flat_map(|(intent, phrases)| phrases.iter().map(move |p| (*intent, *p)))
            .collect();

        // Vocabulary in sorted order, like a fitted vectorizer
        let mut terms: Vec<String> = samples
            .iter()
            .flat_map(|(_, phrase)| tokenize(phrase))
            .collect();
        terms.sort();
        terms.dedup();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();

        let n_samples = samples.len() as f64;
        let mut document_frequency = vec![0usize; vocabulary.len()];
        for (_, phrase) in &samples {
            let mut seen: Vec<usize> = tokenize(phrase)
                .iter()
                .filter_map(|t| vocabulary.get(t).copied())
                .collect();
            seen.sort_unstable();
            seen.dedup();
            for index in seen {
                document_frequency[index] += 1;
            }
        }
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|df| ((1.0 + n_samples) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let classes: Vec<Intent> = TRAINING_DATA.iter().map(|(intent, _)| *intent).collect();
        let mut feature_counts = vec![vec![0.0f64; vocabulary.len()]; classes.len()];
        let mut class_counts = vec![0usize; classes.len()];

        for (intent, phrase) in &samples {
            let Some(class_index) = classes.iter().position(|c| c == intent) else {
                continue;
            };
            class_counts[class_index] += 1;
            for (feature, weight) in vectorize(&vocabulary, &idf, phrase) {
                feature_counts[class_index][feature] += weight;
            }
        }

        let n_features = vocabulary.len() as f64;
        let feature_log_prob = feature_counts
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + SMOOTHING_ALPHA * n_features;
                counts
                    .iter()
                    .map(|c| ((c + SMOOTHING_ALPHA) / total).ln())
                    .collect()
            })
            .collect();
        let class_log_prior = class_counts
            .iter()
            .map(|count| (*count as f64 / n_samples).ln())
            .collect();

        Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    /// Most likely intent, or `GeneralQuery` when nothing in the text is
    /// known to the model
    pub fn predict(&self, text: &str) -> Intent {
        let features = vectorize(&self.vocabulary, &self.idf, text);
        if features.is_empty() {
            return Intent::GeneralQuery;
        }

        let mut best: Option<(Intent, f64)> = None;
        for (class_index, intent) in self.classes.iter().enumerate() {
            let score = self.class_log_prior[class_index]
                + features
                    .iter()
                    .map(|(feature, weight)| weight * self.feature_log_prob[class_index][*feature])
                    .sum::<f64>();
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((*intent, score)),
            }
        }

        best.map(|(intent, _)| intent).unwrap_or(Intent::GeneralQuery)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sparse L2-normalised TF-IDF vector of `text`
fn vectorize(vocabulary: &HashMap<String, usize>, idf: &[f64], text: &str) -> Vec<(usize, f64)> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    for token in tokenize(text) {
        if let Some(index) = vocabulary.get(&token) {
            *counts.entry(*index).or_insert(0.0) += 1.0;
        }
    }

    let mut weights: Vec<(usize, f64)> = counts
        .into_iter()
        .map(|(index, tf)| (index, tf * idf[index]))
        .collect();
    let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in weights.iter_mut() {
            *w /= norm;
        }
    }
    weights.sort_by_key(|(index, _)| *index);
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(
            tokenize("I'm on a Gluten-free diet"),
            vec!["on", "gluten", "free", "diet"]
        );
    }

    #[test]
    fn test_predicts_distinctive_phrases() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.predict("Gluten-free options please"), Intent::DietQuery);
        assert_eq!(classifier.predict("a romantic spot"), Intent::MoodQuery);
        assert_eq!(classifier.predict("Show me Italian restaurants"), Intent::CuisineQuery);
        assert_eq!(classifier.predict("Dinner places in San Francisco"), Intent::LocationQuery);
        assert_eq!(classifier.predict("Not too expensive"), Intent::BudgetQuery);
    }

    #[test]
    fn test_unknown_vocabulary_is_general() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.predict(""), Intent::GeneralQuery);
        assert_eq!(classifier.predict("xylophone zebra"), Intent::GeneralQuery);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let classifier = IntentClassifier::new();
        let v = vectorize(&classifier.vocabulary, &classifier.idf, "cheap cheap eats");
        let norm: f64 = v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
}
