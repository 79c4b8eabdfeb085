use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// One entry of the human-readable solution trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub expression: String,
    pub explanation: String,
}

impl Step {
    pub fn new(expression: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            explanation: explanation.into(),
        }
    }
}

/// The record handed to downstream consumers: the restated problem, the
/// final answer, and the steps in exactly the order the solve path
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub problem: String,
    pub answer: String,
    pub steps: Vec<Step>,
}

impl Solution {
    pub fn new(problem: impl Into<String>, answer: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            problem: problem.into(),
            answer: answer.into(),
            steps,
        }
    }
}

/// An equation split on its single `=` sign. Both sides are kept as text
/// and re-evaluated per trial point; no AST is retained here.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub left: String,
    pub right: String,
}

impl Equation {
    /// Splits `text` on `=`. Anything other than exactly one `=` is a
    /// format error, raised before any search begins.
    pub fn parse(text: &str) -> Result<Self, SolveError> {
        let parts: Vec<&str> = text.split('=').collect();
        if parts.len() != 2 {
            return Err(SolveError::Format(text.trim().to_string()));
        }
        Ok(Self {
            left: parts[0].trim().to_string(),
            right: parts[1].trim().to_string(),
        })
    }

    pub fn text(&self) -> String {
        format!("{} = {}", self.left, self.right)
    }
}

/// Rounds to `places` decimal places, normalizing negative zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats a value for an answer line: whole numbers print without a
/// trailing `.0`, negative zero prints as `0`.
pub fn format_value(value: f64) -> String {
    let v = if value == 0.0 { 0.0 } else { value };
    format!("{v}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equation_parse_splits_on_single_equals() {
        let eq = Equation::parse(" 2*x + 1 = 7 ").expect("should parse");
        assert_eq!(eq.left, "2*x + 1");
        assert_eq!(eq.right, "7");
    }

    #[test]
    fn equation_parse_rejects_missing_or_repeated_equals() {
        assert!(matches!(Equation::parse("2+2"), Err(SolveError::Format(_))));
        assert!(matches!(Equation::parse("a=b=c"), Err(SolveError::Format(_))));
    }

    #[test]
    fn format_value_drops_trailing_zero() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(-0.0), "0");
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(0.029999999999999805, 4), 0.03);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(-1e-13, 4), 0.0);
    }

    #[test]
    fn solution_serializes_with_step_order_preserved() {
        let solution = Solution::new(
            "x = 1",
            "x = 1",
            vec![Step::new("a", "first"), Step::new("b", "second")],
        );
        let json = serde_json::to_string(&solution).expect("should serialize");
        let back: Solution = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, solution);
        assert_eq!(back.steps[0].explanation, "first");
    }
}
