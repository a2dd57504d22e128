//! # RPN expression calculator
//!
//! The library compiles an infix arithmetic expression into Reverse Polish
//! notation (RPN) with the shunting-yard algorithm and then executes the
//! compiled sequence on an operand stack. The two steps are independent:
//! `parse::compile` returns the RPN sequence, `parse::eval` runs both steps
//! in one call.
//!
//! Variables are resolved at compile time against a map supplied by the
//! caller, so a compiled sequence carries no variable names and can be
//! re-evaluated any number of times without the bindings:
//!
//! ```
//! use std::collections::HashMap;
//! use rpncalc_lib::parse::compile;
//!
//! let mut vars = HashMap::new();
//! vars.insert("a".to_string(), 5.0);
//! let compiled = compile("a * 2", &vars).unwrap();
//! assert_eq!(compiled.eval(), Ok(10.0));
//! assert_eq!(compiled.eval(), Ok(10.0));
//! ```
//!
//! Operators (starting from highest priority):
//! * `^` - power
//! * `*`, `/`, `%`, `div` - multiplication, division, remainder, integer quotient
//! * `+`, `-` - addition, subtraction
//!
//! A minus in a position where it cannot be binary (at the expression start
//! or right after an opening bracket) negates its operand: `-x` is compiled
//! as `0 x -`.
//!
//! The list of supported functions:
//! * trigonometric: sin, cos, tan
//! * square root: sqrt
//! * exponent and logarithms: exp, ln, lg
//! * absolute value and sign: abs, sign
//! * rounding towards zero: trunc
//! * smaller and greater of two values: min, max
//!
//! All numbers are 64-bit floats with `.` as the decimal separator
//! regardless of locale. Every failure is reported through a typed error:
//! unbalanced brackets, missing variables, broken literals, and arithmetic
//! errors like division by zero never panic and never print anything.

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod ops;
pub mod parse;
pub mod rpn;
pub mod stack;
