//! The `stepsolve_core` crate is the numeric equation-solving engine behind
//! the stepsolve tools. Given a cleaned textual expression or equation it
//! determines the unknowns involved and finds satisfying values by staged
//! or gridded search over a bounded domain, producing a reproducible record
//! of the answer and the steps taken.
//!
//! Key components:
//! - **Evaluator**: a bytecode-compiled expression evaluator (`+ - * / ^`,
//!   parentheses, `sin`/`cos`/`tan`/`log`/`ln`/`sqrt`/`exp`).
//! - **Variables**: extraction of the single-letter unknowns in a text.
//! - **Equality**: tolerance-based verdicts for constant equations.
//! - **Single**: staged search (integers, fractions, decimals) for one unknown.
//! - **Simultaneous**: budgeted grid search for 2-3 unknowns at once.
//! - **Engine**: the dispatching entry points and record assembly.

pub mod engine;
pub mod equality;
pub mod error;
pub mod evaluator;
pub mod record;
pub mod simultaneous;
pub mod single;
pub mod variables;

pub use engine::{
    evaluate_expression, solve_equation, solve_simultaneous, solve_simultaneous_with,
};
pub use error::SolveError;
pub use evaluator::EvalError;
pub use record::{Equation, Solution, Step};

/// Threshold below which a numeric difference is treated as equality.
pub const TOLERANCE: f64 = 1e-5;
