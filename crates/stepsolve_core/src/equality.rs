//! Verdicts for equations with no unknowns: both sides are evaluated and
//! compared within tolerance.

use crate::error::SolveError;
use crate::evaluator::CompiledExpr;
use crate::record::{format_value, Equation, Solution, Step};
use crate::TOLERANCE;

/// Evaluates both sides of a constant equation and reports `"True"` or
/// `"False"`. Evaluation failures on either side propagate.
pub fn check_equality(equation: &Equation) -> Result<Solution, SolveError> {
    let left = eval_constant(&equation.left)?;
    let right = eval_constant(&equation.right)?;
    let verdict = if (left - right).abs() < TOLERANCE {
        "True"
    } else {
        "False"
    };
    log::debug!("equality check '{}': {verdict}", equation.text());

    let steps = vec![
        Step::new(equation.text(), "Check whether both sides are equal"),
        Step::new(
            format!("{} = {}", equation.left, format_value(left)),
            "Evaluate the left side",
        ),
        Step::new(
            format!("{} = {}", equation.right, format_value(right)),
            "Evaluate the right side",
        ),
        Step::new(
            format!("{} is {verdict}", equation.text()),
            "Compare both sides within tolerance",
        ),
    ];
    Ok(Solution::new(equation.text(), verdict, steps))
}

fn eval_constant(expression: &str) -> Result<f64, SolveError> {
    let compiled = CompiledExpr::compile(expression, &[])
        .map_err(|e| SolveError::evaluation(expression, e))?;
    compiled
        .eval(&[])
        .map_err(|e| SolveError::evaluation(expression, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Solution {
        let equation = Equation::parse(text).expect("should parse");
        check_equality(&equation).expect("should check")
    }

    #[test]
    fn true_equality() {
        let solution = check("2+2=4");
        assert_eq!(solution.answer, "True");
        assert_eq!(solution.steps.len(), 4);
    }

    #[test]
    fn false_equality() {
        assert_eq!(check("2+2=5").answer, "False");
    }

    #[test]
    fn equality_within_tolerance() {
        assert_eq!(check("1/3 = 0.333333333").answer, "True");
        assert_eq!(check("1/3 = 0.3334").answer, "False");
    }

    #[test]
    fn functions_on_both_sides() {
        assert_eq!(check("sin(0) = tan(0)").answer, "True");
        assert_eq!(check("sqrt(16) = 2^2").answer, "True");
    }

    #[test]
    fn malformed_side_propagates() {
        let equation = Equation::parse("2+ = 4").expect("should parse");
        let err = check_equality(&equation).unwrap_err();
        assert!(matches!(err, SolveError::Evaluation { .. }));
    }

    #[test]
    fn division_by_zero_propagates() {
        let equation = Equation::parse("1/0 = 4").expect("should parse");
        assert!(check_equality(&equation).is_err());
    }
}
