use once_cell::sync::Lazy;
use regex::Regex;

use super::expr::Operator;

/// Word tokens (hyphenated compounds stay whole) and digit tokens
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-z]+(?:-[a-z]+)*|\d+(?:\.\d+)?|\.\d+").expect("invalid word token regex")
});

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [(&str, u32); 8] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Value of a spelled-out number: "seven", "twenty", "forty-two"
pub fn parse_number_word(word: &str) -> Option<f64> {
    let word = word.to_lowercase();
    if let Some(value) = UNITS.iter().position(|w| *w == word) {
        return Some(value as f64);
    }
    if let Some((_, value)) = TENS.iter().find(|(w, _)| *w == word) {
        return Some(f64::from(*value));
    }

    let (tens, unit) = word.split_once('-')?;
    let (_, tens_value) = TENS.iter().find(|(w, _)| *w == tens)?;
    let unit_value = UNITS.iter().position(|w| *w == unit).filter(|v| (1..10).contains(v))?;
    Some(f64::from(*tens_value) + unit_value as f64)
}

/// Reduce an inflected verb or plural to the form the keyword table uses
fn lemma(word: &str) -> &str {
    match word {
        "adding" | "added" | "adds" => "add",
        "subtracting" | "subtracted" | "subtracts" => "subtract",
        "multiplying" | "multiplied" | "multiplies" => "multiply",
        "dividing" | "divided" | "divides" => "divide",
        "sums" => "sum",
        "products" => "product",
        "differences" => "difference",
        "quotients" => "quotient",
        other => other,
    }
}

fn operator_for(word: &str) -> Option<Operator> {
    match lemma(word) {
        "add" | "plus" | "sum" => Some(Operator::Add),
        "subtract" | "minus" | "less" | "difference" => Some(Operator::Sub),
        "multiply" | "times" | "product" => Some(Operator::Mul),
        "divide" | "over" | "quotient" => Some(Operator::Div),
        _ => None,
    }
}

/// Numbers and operation found in a word problem
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordProblem {
    pub numbers: Vec<f64>,
    /// Last operation keyword mentioned
    pub operation: Option<Operator>,
}

/// Pull numbers (digits or number words) and an operation out of free text
pub fn extract_word_problem(input: &str) -> WordProblem {
    let lowered = input.to_lowercase();
    let mut problem = WordProblem::default();

    for token in WORD_TOKEN.find_iter(&lowered) {
        let word = token.as_str();
        if let Ok(value) = word.parse::<f64>() {
            problem.numbers.push(value);
        } else if let Some(value) = parse_number_word(word) {
            problem.numbers.push(value);
        } else if let Some(op) = operator_for(word) {
            problem.operation = Some(op);
        }
    }

    problem
}
