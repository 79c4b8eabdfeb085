//! Entry points consumed by callers: expression evaluation, single
//! equation solving, and simultaneous systems. Dispatch is by the number
//! of unknowns the text contains.

use crate::equality;
use crate::error::SolveError;
use crate::evaluator::CompiledExpr;
use crate::record::{format_value, round_to, Equation, Solution, Step};
use crate::simultaneous::{self, GridOutcome, GridSettings};
use crate::single::{self, SearchSettings};
use crate::variables;

/// Evaluates a constant expression. A trailing `=` (as produced by "2+2="
/// style input) is stripped first. Fails if the cleaned expression does
/// not evaluate.
pub fn evaluate_expression(text: &str) -> Result<Solution, SolveError> {
    let cleaned = text.trim();
    let cleaned = cleaned.strip_suffix('=').unwrap_or(cleaned).trim_end();

    let compiled =
        CompiledExpr::compile(cleaned, &[]).map_err(|e| SolveError::evaluation(cleaned, e))?;
    let value = compiled
        .eval(&[])
        .map_err(|e| SolveError::evaluation(cleaned, e))?;
    let answer = format_value(value);

    let steps = vec![
        Step::new(cleaned, "Evaluate the expression"),
        Step::new(format!("{cleaned} = {answer}"), "Computed value"),
    ];
    Ok(Solution::new(cleaned, answer, steps))
}

/// Solves one equation, dispatching on the number of unknowns: none means
/// an equality check, one means the staged search, more is an error.
/// Multi-line or semicolon-separated input is treated as a system.
pub fn solve_equation(text: &str) -> Result<Solution, SolveError> {
    if text.contains('\n') || text.contains(';') {
        let parts: Vec<&str> = text
            .split(['\n', ';'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        return solve_simultaneous(&parts);
    }

    let equation = Equation::parse(text)?;
    let vars = variables::extract_variables(text);
    match vars.len() {
        0 => equality::check_equality(&equation),
        1 => solve_single(&equation, vars[0]),
        _ => Err(SolveError::AmbiguousVariables {
            equation: text.trim().to_string(),
            variables: join_symbols(&vars),
        }),
    }
}

/// Solves a system of 2 or 3 equations over 2 or 3 shared unknowns by
/// grid search with default settings. Exhausting the grid (or its point
/// budget) is a normal outcome, reported in the answer text rather than
/// as an error.
pub fn solve_simultaneous<S: AsRef<str>>(texts: &[S]) -> Result<Solution, SolveError> {
    solve_simultaneous_with(texts, GridSettings::default())
}

/// Like [`solve_simultaneous`] with caller-supplied grid bounds and point
/// budget.
pub fn solve_simultaneous_with<S: AsRef<str>>(
    texts: &[S],
    settings: GridSettings,
) -> Result<Solution, SolveError> {
    let texts: Vec<&str> = texts.iter().map(|s| s.as_ref().trim()).collect();
    let equations: Vec<Equation> = texts
        .iter()
        .map(|t| Equation::parse(t))
        .collect::<Result<_, _>>()?;

    let vars = variables::extract_system_variables(&texts);
    if !(2..=3).contains(&vars.len()) || equations.len() != vars.len() {
        return Err(SolveError::UnsupportedSystem(format!(
            "{} equation(s) with {} unknown(s); equation and unknown counts must match and be 2 or 3",
            equations.len(),
            vars.len()
        )));
    }

    let compiled: Vec<(CompiledExpr, CompiledExpr)> = equations
        .iter()
        .map(|eq| {
            let left = CompiledExpr::compile(&eq.left, &vars)
                .map_err(|e| SolveError::evaluation(&eq.left, e))?;
            let right = CompiledExpr::compile(&eq.right, &vars)
                .map_err(|e| SolveError::evaluation(&eq.right, e))?;
            Ok((left, right))
        })
        .collect::<Result<_, SolveError>>()?;

    let problem = texts.join("; ");
    match simultaneous::solve(&compiled, vars.len(), settings) {
        GridOutcome::Found(values) => {
            let assignment = vars
                .iter()
                .zip(&values)
                .map(|(v, x)| format!("{v} = {}", format_value(round_to(*x, 3))))
                .collect::<Vec<_>>()
                .join(", ");

            let mut checks = Vec::with_capacity(equations.len());
            for (eq, (left, right)) in equations.iter().zip(&compiled) {
                let l = left
                    .eval(&values)
                    .map_err(|e| SolveError::evaluation(&eq.left, e))?;
                let r = right
                    .eval(&values)
                    .map_err(|e| SolveError::evaluation(&eq.right, e))?;
                checks.push(format!(
                    "{}: left = {}, right = {}",
                    eq.text(),
                    format_value(round_to(l, 3)),
                    format_value(round_to(r, 3))
                ));
            }

            let steps = vec![
                Step::new(problem.clone(), "Solve the system of equations"),
                Step::new(assignment.clone(), "Search the grid for satisfying values"),
                Step::new(checks.join("; "), "Verify every equation at the solution"),
            ];
            Ok(Solution::new(problem, assignment, steps))
        }
        GridOutcome::Exhausted => {
            let answer = format!(
                "No solution found in range {} to {}",
                format_value(settings.min),
                format_value(settings.max)
            );
            let steps = vec![Step::new(
                problem.clone(),
                "Grid search exhausted without a satisfying point",
            )];
            Ok(Solution::new(problem, answer, steps))
        }
        GridOutcome::BudgetSpent { visited, reached } => {
            let reached_at = vars
                .iter()
                .zip(&reached)
                .map(|(v, x)| format!("{v} = {}", format_value(round_to(*x, 3))))
                .collect::<Vec<_>>()
                .join(", ");
            let steps = vec![
                Step::new(problem.clone(), "Solve the system of equations"),
                Step::new(
                    format!("Stopped after {visited} points near {reached_at}"),
                    "The point budget ran out before the range was covered",
                ),
            ];
            Ok(Solution::new(
                problem,
                "Search budget exhausted before covering the range",
                steps,
            ))
        }
    }
}

fn solve_single(equation: &Equation, var: char) -> Result<Solution, SolveError> {
    let left = CompiledExpr::compile(&equation.left, &[var])
        .map_err(|e| SolveError::evaluation(&equation.left, e))?;
    let right = CompiledExpr::compile(&equation.right, &[var])
        .map_err(|e| SolveError::evaluation(&equation.right, e))?;

    match single::solve(&left, &right, SearchSettings::default()) {
        Some(value) => {
            let answer = format!("{var} = {}", format_value(value));
            let steps = vec![
                Step::new(equation.text(), format!("Solve for {var}")),
                Step::new(answer.clone(), "This value satisfies the equation"),
            ];
            Ok(Solution::new(equation.text(), answer, steps))
        }
        None => {
            let steps = vec![Step::new(
                equation.text(),
                "This equation is beyond the numeric search stages",
            )];
            Ok(Solution::new(
                equation.text(),
                "Could not solve equation",
                steps,
            ))
        }
    }
}

fn join_symbols(vars: &[char]) -> String {
    vars.iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_arithmetic() {
        let solution = evaluate_expression("2+3*4").expect("should evaluate");
        assert_eq!(solution.answer, "14");
        assert_eq!(solution.steps.len(), 2);
    }

    #[test]
    fn evaluates_with_trailing_equals() {
        assert_eq!(evaluate_expression("2+3*4 =").expect("should evaluate").answer, "14");
    }

    #[test]
    fn evaluate_rejects_unknowns() {
        let err = evaluate_expression("2*x+1").unwrap_err();
        assert!(matches!(err, SolveError::Evaluation { .. }));
    }

    #[test]
    fn solves_in_the_integer_stage() {
        let solution = solve_equation("5*x+10=25").expect("should solve");
        assert_eq!(solution.answer, "x = 3");
        assert_eq!(solution.steps.len(), 2);
    }

    #[test]
    fn solves_in_the_rational_stage() {
        assert_eq!(solve_equation("2*x=1").expect("should solve").answer, "x = 0.5");
        assert_eq!(solve_equation("x+x=7").expect("should solve").answer, "x = 3.5");
    }

    #[test]
    fn constant_equation_gets_a_verdict() {
        assert_eq!(solve_equation("2+2=4").expect("should check").answer, "True");
        assert_eq!(solve_equation("2+2=5").expect("should check").answer, "False");
    }

    #[test]
    fn multiple_unknowns_in_one_equation_is_an_error() {
        let err = solve_equation("x+y=5").unwrap_err();
        match err {
            SolveError::AmbiguousVariables { variables, .. } => {
                assert_eq!(variables, "x, y");
            }
            other => panic!("expected AmbiguousVariables, got {other:?}"),
        }
    }

    #[test]
    fn missing_equals_is_a_format_error() {
        assert!(matches!(solve_equation("2+2"), Err(SolveError::Format(_))));
        assert!(matches!(solve_equation("1=2=3"), Err(SolveError::Format(_))));
    }

    #[test]
    fn unsolvable_equation_is_a_normal_record() {
        let solution = solve_equation("x^2=2").expect("should not error");
        assert_eq!(solution.answer, "Could not solve equation");
        assert_eq!(solution.steps.len(), 1);
    }

    #[test]
    fn semicolon_input_dispatches_to_the_system_path() {
        let solution = solve_equation("x+y=10; x-y=2").expect("should solve");
        assert_eq!(solution.answer, "x = 6, y = 4");
    }

    #[test]
    fn newline_input_dispatches_to_the_system_path() {
        let solution = solve_equation("x+y=10\nx-y=2").expect("should solve");
        assert_eq!(solution.answer, "x = 6, y = 4");
    }

    #[test]
    fn simultaneous_two_by_two() {
        let solution = solve_simultaneous(&["x+y=10", "x-y=2"]).expect("should solve");
        assert_eq!(solution.answer, "x = 6, y = 4");
        assert_eq!(solution.steps.len(), 3);
        assert!(solution.steps[2].expression.contains("x+y = 10: left = 10, right = 10"));
    }

    #[test]
    fn simultaneous_system_shape_is_validated() {
        let err = solve_simultaneous(&["x+y+z=6", "x-y=0"]).unwrap_err();
        assert!(matches!(err, SolveError::UnsupportedSystem(_)));

        let err = solve_simultaneous(&["x+y=1"]).unwrap_err();
        assert!(matches!(err, SolveError::UnsupportedSystem(_)));
    }

    #[test]
    fn simultaneous_three_by_three_with_default_settings() {
        // A grid-aligned 3-unknown system must be solvable through the
        // public entry point; the default budget covers the whole grid.
        let solution = solve_simultaneous(&["x+y+z=6", "x-y+z=2", "x+y-z=0"])
            .expect("should solve");
        assert_eq!(solution.answer, "x = 1, y = 2, z = 3");
        assert_eq!(solution.steps.len(), 3);
    }

    #[test]
    fn simultaneous_exhaustion_is_a_normal_record() {
        let solution = solve_simultaneous(&["x+y=100", "x-y=0"]).expect("should not error");
        assert_eq!(solution.answer, "No solution found in range -10 to 10");
    }

    #[test]
    fn budget_exhaustion_is_worded_as_a_partial_search() {
        let settings = GridSettings {
            max_points: 100,
            ..GridSettings::default()
        };
        let solution = solve_simultaneous_with(&["x+y=10", "x-y=2"], settings)
            .expect("should not error");
        assert_eq!(
            solution.answer,
            "Search budget exhausted before covering the range"
        );
        assert!(solution.steps[1].expression.contains("100 points"));
        // Not the full-range claim the exhausted grid makes.
        assert_ne!(solution.answer, "No solution found in range -10 to 10");
    }

    #[test]
    fn simultaneous_format_error_names_the_equation() {
        let err = solve_simultaneous(&["x+y=10", "x-y"]).unwrap_err();
        match err {
            SolveError::Format(text) => assert_eq!(text, "x-y"),
            other => panic!("expected Format, got {other:?}"),
        }
    }

    #[test]
    fn identical_input_yields_identical_records() {
        let a = solve_equation("3*x-2=x+4").expect("should solve");
        let b = solve_equation("3*x-2=x+4").expect("should solve");
        assert_eq!(a, b);
    }
}
