use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};
use tracing::debug;

use super::expr::{evaluate, format_number};
use super::quiz::Quiz;
use super::words::extract_word_problem;
use crate::utils::FoodScoutError;

static EXPRESSION_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-*/ ().]+$").expect("invalid expression regex"));

const OPERATOR_CHARS: [char; 4] = ['+', '-', '*', '/'];
const QUESTION_KEYWORDS: [&str; 6] = ["what", "how", "sum", "product", "difference", "quotient"];

pub const HELP_TEXT: &str = "You can ask questions like 'What is the sum of 10 and 5?' or '12 * 4'.";
pub const FALLBACK_TEXT: &str = "Try asking a math question or type 'quiz me'!";
pub const FAREWELL_TEXT: &str = "See you next time!";

/// Reply to one tutor input
pub fn tutor_response(input: &str) -> String {
    let lowered = input.to_lowercase();

    if input.contains(OPERATOR_CHARS) {
        calculate_expression(input)
    } else if QUESTION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        solve_word_problem(input)
    } else if lowered.contains("quiz") {
        Quiz::generate(&mut rand::thread_rng()).to_string()
    } else if lowered.contains("help") {
        HELP_TEXT.to_string()
    } else {
        FALLBACK_TEXT.to_string()
    }
}

fn calculate_expression(input: &str) -> String {
    if !EXPRESSION_CHARS.is_match(input) {
        return "That doesn't look like a valid math expression.".to_string();
    }
    match evaluate(input) {
        Ok(value) => format!("The answer is {}", format_number(value)),
        Err(e) => {
            debug!("Expression {:?} failed: {}", input, e);
            "I couldn't solve that one.".to_string()
        }
    }
}

fn solve_word_problem(input: &str) -> String {
    let problem = extract_word_problem(input);

    match (problem.numbers.as_slice(), problem.operation) {
        ([left, right], Some(op)) => match op.apply(*left, *right) {
            Ok(value) => format!(
                "{} {} {} = {}",
                format_number(*left),
                op,
                format_number(*right),
                format_number(value)
            ),
            Err(e) => {
                debug!("Word problem failed: {}", e);
                "Hmm, I couldn't compute that.".to_string()
            }
        },
        (numbers, _) if numbers.len() < 2 => "I need two numbers to work with!".to_string(),
        _ => "I'm not sure what operation to use.".to_string(),
    }
}

/// Line-oriented tutor session until `exit`, `quit` or end of input
pub fn run_repl<R: BufRead, W: Write>(input: R, mut output: W) -> Result<(), FoodScoutError> {
    let mut lines = input.lines();

    loop {
        write!(output, "You: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            writeln!(output, "Bot: {}", FAREWELL_TEXT)?;
            return Ok(());
        };
        let line = line?;
        let trimmed = line.trim();

        if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit") {
            writeln!(output, "Bot: {}", FAREWELL_TEXT)?;
            return Ok(());
        }
        writeln!(output, "Bot: {}", tutor_response(trimmed))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_expressions() {
        assert_eq!(tutor_response("12 * 4"), "The answer is 48");
        assert_eq!(tutor_response("(1 + 2) / 4"), "The answer is 0.75");
        assert_eq!(
            tutor_response("2 + two"),
            "That doesn't look like a valid math expression."
        );
        assert_eq!(tutor_response("5 / 0"), "I couldn't solve that one.");
        assert_eq!(tutor_response("3 +"), "I couldn't solve that one.");
        let deep = format!("{}5", "-".repeat(100_000));
        assert_eq!(tutor_response(&deep), "I couldn't solve that one.");
    }

    #[test]
    fn test_word_problems() {
        assert_eq!(tutor_response("What is the sum of 10 and 5?"), "10 + 5 = 15");
        assert_eq!(tutor_response("what is seven times six"), "7 * 6 = 42");
        assert_eq!(
            tutor_response("What is the difference between twenty and eight?"),
            "20 - 8 = 12"
        );
        assert_eq!(tutor_response("what is ten over zero"), "Hmm, I couldn't compute that.");
        assert_eq!(tutor_response("what is the sum of 3"), "I need two numbers to work with!");
        assert_eq!(
            tutor_response("how about 3 and 4"),
            "I'm not sure what operation to use."
        );
        assert_eq!(
            tutor_response("what is the sum of 1, 2 and 3"),
            "I'm not sure what operation to use."
        );
    }

    #[test]
    fn test_quiz_help_and_fallback() {
        let quiz = tutor_response("quiz me");
        assert!(quiz.starts_with("What is "));
        assert!(quiz.contains("(Answer: "));

        assert_eq!(tutor_response("help"), HELP_TEXT);
        assert_eq!(tutor_response("hello"), FALLBACK_TEXT);
    }

    #[test]
    fn test_repl_transcript() {
        let input = Cursor::new("2 + 2\nhello\nQuit\nnever read\n");
        let mut output = Vec::new();
        run_repl(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            format!(
                "You: Bot: The answer is 4\nYou: Bot: {}\nYou: Bot: {}\n",
                FALLBACK_TEXT, FAREWELL_TEXT
            )
        );
    }

    #[test]
    fn test_repl_ends_on_eof() {
        let mut output = Vec::new();
        run_repl(Cursor::new(""), &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("You: \nBot: {}\n", FAREWELL_TEXT)
        );
    }
}
