//! Staged numeric search for one unknown.
//!
//! Three domains are tried in a fixed priority order: integers, then small
//! fractions, then a fine decimal grid. The ordering is deliberate: an
//! integer or simple-fraction answer is preferred over a raw decimal even
//! when the decimal grid would also land on it. The first value in stage
//! order whose left/right difference falls below tolerance wins.

use serde::{Deserialize, Serialize};

use crate::evaluator::CompiledExpr;
use crate::record::round_to;
use crate::TOLERANCE;

/// Bounds for the staged search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Integer stage tries every integer in `[-integer_bound, integer_bound]`.
    pub integer_bound: i64,
    /// Rational stage tries `n/d` for `n` in `1..=max_numerator`.
    pub max_numerator: u32,
    /// Rational stage tries `n/d` for `d` in `2..=max_denominator`.
    pub max_denominator: u32,
    /// Decimal stage sweeps `[-decimal_bound, decimal_bound]`.
    pub decimal_bound: f64,
    /// Decimal stage grid spacing.
    pub decimal_step: f64,
    pub tolerance: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            integer_bound: 1000,
            max_numerator: 20,
            max_denominator: 20,
            decimal_bound: 10.0,
            decimal_step: 0.01,
            tolerance: TOLERANCE,
        }
    }
}

/// Searches for a value of the single unknown making `left = right`.
///
/// `left` and `right` must be compiled against exactly one variable.
/// Returns `None` when every stage is exhausted; trial points where the
/// evaluator fails (division by zero at that point, say) are skipped, not
/// fatal. Decimal-stage hits are rounded to 4 decimal places.
pub fn solve(left: &CompiledExpr, right: &CompiledExpr, settings: SearchSettings) -> Option<f64> {
    // Stage 1: integers, ascending.
    for i in -settings.integer_bound..=settings.integer_bound {
        let x = i as f64;
        if satisfies(left, right, x, settings.tolerance) {
            log::debug!("integer stage hit at x = {x}");
            return Some(x);
        }
    }

    // Stage 2: fractions n/d, numerator outer, denominator inner, the
    // positive value before the negative one. Duplicate trial values
    // (2/4 after 1/2) are intentional: first hit in this exact order is
    // the contract.
    for n in 1..=settings.max_numerator {
        for d in 2..=settings.max_denominator {
            let val = f64::from(n) / f64::from(d);
            if satisfies(left, right, val, settings.tolerance) {
                log::debug!("rational stage hit at x = {n}/{d}");
                return Some(val);
            }
            if satisfies(left, right, -val, settings.tolerance) {
                log::debug!("rational stage hit at x = -{n}/{d}");
                return Some(-val);
            }
        }
    }

    // Stage 3: decimal grid, ascending.
    let points = (2.0 * settings.decimal_bound / settings.decimal_step).round() as i64;
    for i in 0..=points {
        let x = -settings.decimal_bound + i as f64 * settings.decimal_step;
        if satisfies(left, right, x, settings.tolerance) {
            let x = round_to(x, 4);
            log::debug!("decimal stage hit at x = {x}");
            return Some(x);
        }
    }

    log::debug!(
        "staged search exhausted for '{}' vs '{}'",
        left.source(),
        right.source()
    );
    None
}

fn satisfies(left: &CompiledExpr, right: &CompiledExpr, x: f64, tolerance: f64) -> bool {
    match (left.eval(&[x]), right.eval(&[x])) {
        (Ok(l), Ok(r)) => (l - r).abs() < tolerance,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_for(left: &str, right: &str) -> Option<f64> {
        let left = CompiledExpr::compile(left, &['x']).expect("should compile");
        let right = CompiledExpr::compile(right, &['x']).expect("should compile");
        solve(&left, &right, SearchSettings::default())
    }

    #[test]
    fn integer_stage_finds_linear_root() {
        assert_eq!(solve_for("5*x+10", "25"), Some(3.0));
    }

    #[test]
    fn integer_stage_prefers_ascending_order() {
        // Both -2 and 2 solve x^2 = 4; ascending iteration reaches -2 first.
        assert_eq!(solve_for("x^2", "4"), Some(-2.0));
    }

    #[test]
    fn rational_stage_finds_half() {
        assert_eq!(solve_for("2*x", "1"), Some(0.5));
    }

    #[test]
    fn rational_stage_finds_seven_halves() {
        assert_eq!(solve_for("x+x", "7"), Some(3.5));
    }

    #[test]
    fn rational_stage_tries_positive_sign_first() {
        // x^2 = 0.25 is solved by both signs of 1/2; +1/2 is tried first.
        assert_eq!(solve_for("x^2", "0.25"), Some(0.5));
    }

    #[test]
    fn decimal_stage_finds_off_fraction_value() {
        // 0.03 is neither an integer nor n/d with n,d <= 20.
        assert_eq!(solve_for("x", "0.03"), Some(0.03));
    }

    #[test]
    fn irrational_root_is_not_found() {
        // sqrt(2) lies on none of the staged grids.
        assert_eq!(solve_for("x^2", "2"), None);
    }

    #[test]
    fn stage_boundaries_are_inclusive() {
        assert_eq!(solve_for("x", "1000"), Some(1000.0));
        assert_eq!(solve_for("x", "-1000"), Some(-1000.0));
        assert_eq!(solve_for("x/2", "-1000"), None);
    }

    #[test]
    fn decimal_grid_edges_are_inclusive() {
        // Shrink the earlier stages so the decimal stage is the one that
        // has to reach the +/-10.00 endpoints.
        let settings = SearchSettings {
            integer_bound: 5,
            max_numerator: 5,
            max_denominator: 5,
            ..SearchSettings::default()
        };
        let left = CompiledExpr::compile("x", &['x']).expect("should compile");
        let high = CompiledExpr::compile("10", &['x']).expect("should compile");
        let low = CompiledExpr::compile("-10", &['x']).expect("should compile");
        assert_eq!(solve(&left, &high, settings), Some(10.0));
        assert_eq!(solve(&left, &low, settings), Some(-10.0));
    }

    #[test]
    fn evaluation_failures_at_trial_points_are_skipped() {
        // x = 0 divides by zero during the integer stage; the search
        // continues and lands on 1/4 in the rational stage.
        assert_eq!(solve_for("1/x", "4"), Some(0.25));
    }

    #[test]
    fn search_is_deterministic() {
        assert_eq!(solve_for("3*x-2", "x+4"), solve_for("3*x-2", "x+4"));
    }
}
