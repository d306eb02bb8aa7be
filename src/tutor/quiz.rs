use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use super::expr::{format_number, Operator};

const QUIZ_OPERATORS: [Operator; 3] = [Operator::Add, Operator::Sub, Operator::Mul];
const MIN_OPERAND: i64 = 1;
const MAX_OPERAND: i64 = 12;

/// A randomly drawn practice question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quiz {
    pub left: i64,
    pub right: i64,
    pub operator: Operator,
}

impl Quiz {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            left: rng.gen_range(MIN_OPERAND..=MAX_OPERAND),
            right: rng.gen_range(MIN_OPERAND..=MAX_OPERAND),
            operator: *QUIZ_OPERATORS.choose(rng).unwrap_or(&Operator::Add),
        }
    }

    pub fn answer(&self) -> i64 {
        match self.operator {
            Operator::Add => self.left + self.right,
            Operator::Sub => self.left - self.right,
            // Division is never drawn
            Operator::Mul | Operator::Div => self.left * self.right,
        }
    }

    pub fn question(&self) -> String {
        format!("What is {} {} {}?", self.left, self.operator, self.right)
    }
}

impl fmt::Display for Quiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Answer: {})",
            self.question(),
            format_number(self.answer() as f64)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_quiz_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let quiz = Quiz::generate(&mut rng);
            assert!((MIN_OPERAND..=MAX_OPERAND).contains(&quiz.left));
            assert!((MIN_OPERAND..=MAX_OPERAND).contains(&quiz.right));
            assert_ne!(quiz.operator, Operator::Div);
        }
    }

    #[test]
    fn test_display() {
        let quiz = Quiz {
            left: 7,
            right: 9,
            operator: Operator::Sub,
        };
        assert_eq!(quiz.to_string(), "What is 7 - 9? (Answer: -2)");
    }
}
