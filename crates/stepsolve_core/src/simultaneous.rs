//! Grid search for systems of 2 or 3 equations sharing 2 or 3 unknowns.
//!
//! Every unknown sweeps the same axis; the full Cartesian product is
//! visited in ascending nested order with the first variable outermost.
//! Unlike the single-variable search there is no preference for nicer
//! values: the first grid point satisfying every equation wins.

use serde::{Deserialize, Serialize};

use crate::evaluator::CompiledExpr;
use crate::TOLERANCE;

/// Grid bounds and the iteration budget.
///
/// `max_points` is part of the public contract: once the budget is spent
/// the search stops and reports it rather than blocking its caller
/// indefinitely. The default budget covers the full 3-unknown sweep of
/// the default axis (401^3 ≈ 64.5 million points) with headroom; it
/// exists to bound runaway custom ranges, not to truncate the default
/// grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridSettings {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub tolerance: f64,
    pub max_points: u64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
            step: 0.05,
            tolerance: TOLERANCE,
            max_points: 65_000_000,
        }
    }
}

/// How a grid search ended. Exhausting the grid and running out of
/// budget are different claims: the former says no grid point satisfies
/// the system, the latter only that the search stopped early.
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome {
    /// The first satisfying point, in iteration order.
    Found(Vec<f64>),
    /// Every grid point was visited without a match.
    Exhausted,
    /// The point budget ran out at `reached` after `visited` points.
    BudgetSpent { visited: u64, reached: Vec<f64> },
}

/// Searches the grid for a point satisfying every equation at once.
///
/// `equations` holds the compiled (left, right) sides, each compiled
/// against the same ordered variable list of length `arity`. Returns the
/// first satisfying point in iteration order, or reports whether the grid
/// or the point budget ran out first. Points where any side fails to
/// evaluate are skipped.
pub fn solve(
    equations: &[(CompiledExpr, CompiledExpr)],
    arity: usize,
    settings: GridSettings,
) -> GridOutcome {
    debug_assert!(arity >= 1);
    let count = ((settings.max - settings.min) / settings.step).round() as usize + 1;
    let axis: Vec<f64> = (0..count)
        .map(|i| settings.min + i as f64 * settings.step)
        .collect();

    let mut indices = vec![0usize; arity];
    let mut values = vec![0.0f64; arity];
    let mut visited: u64 = 0;

    loop {
        for k in 0..arity {
            values[k] = axis[indices[k]];
        }

        if visited >= settings.max_points {
            log::warn!(
                "grid search stopped at its budget of {} points, reached {values:?}",
                settings.max_points
            );
            return GridOutcome::BudgetSpent {
                visited,
                reached: values,
            };
        }
        visited += 1;

        if satisfies_all(equations, &values, settings.tolerance) {
            log::debug!("grid search hit after {visited} points: {values:?}");
            return GridOutcome::Found(values);
        }

        // Advance the odometer; the last variable moves fastest so the
        // first variable is the outermost loop.
        let mut k = arity - 1;
        loop {
            indices[k] += 1;
            if indices[k] < count {
                break;
            }
            indices[k] = 0;
            if k == 0 {
                log::debug!("grid search exhausted after {visited} points");
                return GridOutcome::Exhausted;
            }
            k -= 1;
        }
    }
}

fn satisfies_all(equations: &[(CompiledExpr, CompiledExpr)], values: &[f64], tolerance: f64) -> bool {
    equations.iter().all(|(left, right)| {
        match (left.eval(values), right.eval(values)) {
            (Ok(l), Ok(r)) => (l - r).abs() < tolerance,
            _ => false,
        }
    })
}
