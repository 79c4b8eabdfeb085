//! Extraction of the unknowns appearing in an expression or equation.
//!
//! Variables are single letters. The recognized function names are removed
//! from the text first so their letters are never mistaken for unknowns.

/// Function names recognized by the evaluator, longest first so that
/// removal never leaves a partial match behind.
pub const FUNCTION_NAMES: [&str; 7] = ["sqrt", "sin", "cos", "tan", "log", "exp", "ln"];

/// Returns the distinct single-letter symbols in `text`, in order of first
/// appearance. An empty result is valid: the text is constant.
pub fn extract_variables(text: &str) -> Vec<char> {
    scan(text, false)
}

/// Variable extraction for a system of equations: symbols are collected
/// across all equations in order of first appearance, and `e`/`E` is
/// excluded since system input reserves it for scientific notation.
pub fn extract_system_variables(texts: &[&str]) -> Vec<char> {
    let mut vars = Vec::new();
    for text in texts {
        for v in scan(text, true) {
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
    }
    vars
}

fn scan(text: &str, exclude_e: bool) -> Vec<char> {
    let mut stripped = text.to_string();
    for name in FUNCTION_NAMES {
        stripped = stripped.replace(name, " ");
    }

    let mut vars = Vec::new();
    for c in stripped.chars() {
        if !c.is_ascii_alphabetic() {
            continue;
        }
        if exclude_e && (c == 'e' || c == 'E') {
            continue;
        }
        if !vars.contains(&c) {
            vars.push(c);
        }
    }
    vars
}
