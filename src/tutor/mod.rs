// Gateway module for tutor - follows the Train Station Pattern
// All external access must go through this gateway

mod expr;
mod quiz;
mod responder;
mod words;

pub use expr::{evaluate, format_number, ExprError, Operator};
pub use quiz::Quiz;
pub use responder::{run_repl, tutor_response};
pub use words::{extract_word_problem, parse_number_word, WordProblem};
