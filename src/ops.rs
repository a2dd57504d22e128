//! Static classification of operators and functions: precedence and arity.
//! The table is fixed, nothing here changes at runtime.

use lazy_static::lazy_static;

/// Opening bracket sentinel: it never wins a precedence comparison, so it
/// stops the pop loop of the converter
pub const PRI_BRACKET: i32 = 0;
/// Default priority for function names and unrecognized symbols
pub const PRI_FUNC: i32 = 4;

lazy_static! {
    /// Recognized function names. Any other identifier (except `div`) is
    /// treated as a variable reference
    pub static ref STD_FUNCS: Vec<&'static str> = [
        "sin", "cos", "tan", "sqrt", "abs", "sign", "ln", "lg", "exp", "trunc", "min", "max",
    ]
    .to_vec();
}

pub fn priority(op: &str) -> i32 {
    match op {
        "(" => PRI_BRACKET,
        "+" | "-" => 1,
        "*" | "/" | "%" | "div" => 2,
        "^" => 3,
        _ => PRI_FUNC, // functions
    }
}

pub fn is_func(s: &str) -> bool {
    for fname in STD_FUNCS.iter() {
        if *fname == s {
            return true;
        }
    }
    false
}

/// Operators and functions that pop two values from the operand stack;
/// everything else recognized by the evaluator pops one
pub fn is_binary(op: &str) -> bool {
    match op {
        "+" | "-" | "*" | "/" | "^" | "%" | "div" | "min" | "max" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(priority("(") < priority("+"));
        assert!(priority("+") < priority("*"));
        assert_eq!(priority("*"), priority("div"));
        assert!(priority("*") < priority("^"));
        assert!(priority("^") < priority("sqrt"));
        assert_eq!(priority("+"), priority("-"));
    }

    #[test]
    fn test_classification() {
        assert!(is_func("sqrt"));
        assert!(is_func("max"));
        assert!(!is_func("foo"));
        assert!(!is_func("div"));
        assert!(is_binary("min"));
        assert!(is_binary("div"));
        assert!(!is_binary("sqrt"));
        assert!(!is_binary("#"));
    }
}
