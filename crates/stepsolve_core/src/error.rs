use thiserror::Error;

use crate::evaluator::EvalError;

/// Failures surfaced to the caller. Search exhaustion is deliberately not
/// represented here: a "could not solve" outcome is a normal `Solution`
/// record, not an error.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The equation text did not contain exactly one `=`.
    #[error("expected exactly one '=' in equation '{0}'")]
    Format(String),

    /// A single equation contained more than one unknown.
    #[error("equation '{equation}' contains multiple unknowns: {variables}")]
    AmbiguousVariables { equation: String, variables: String },

    /// The evaluator rejected an expression.
    #[error("failed to evaluate '{expression}': {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvalError,
    },

    /// The system shape is outside what the grid search supports.
    #[error("unsupported system: {0}")]
    UnsupportedSystem(String),
}

impl SolveError {
    pub(crate) fn evaluation(expression: &str, source: EvalError) -> Self {
        Self::Evaluation {
            expression: expression.to_string(),
            source,
        }
    }
}
