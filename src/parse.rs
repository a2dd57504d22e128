//! Splitting an expression into lexemes and the public entry points that
//! tie lexing, conversion, and evaluation together.

use std::collections::HashMap;

use pest::Parser;

use crate::errors::*;
use crate::rpn::{self, RpnExpr};

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// Raw lexeme produced by the tokenizer. Malformed number literals, e.g.
/// ones with two decimal points, are passed through as-is and rejected by
/// later stages.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    Number(String),
    Ident(String),
    Symbol(char),
}

/// Splits an expression into lexemes in one left-to-right pass. Whitespace
/// is skipped, a run of digits and dots forms one number, a letter followed
/// by letters and digits forms one identifier, and any other character is a
/// single-character symbol. Lexing is total: no input makes it fail, and
/// re-tokenizing the same string yields the same lexemes.
pub fn tokenize(expr: &str) -> Vec<Lexeme> {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        // the grammar ends with a catch-all rule, any input lexes
        Err(..) => return Vec::new(),
    };

    let mut lexemes = Vec::new();
    for pair in pairs {
        let text = pair.as_span().as_str();
        match pair.as_rule() {
            Rule::number => lexemes.push(Lexeme::Number(text.to_string())),
            Rule::ident => lexemes.push(Lexeme::Ident(text.to_string())),
            Rule::symbol => {
                if let Some(c) = text.chars().next() {
                    lexemes.push(Lexeme::Symbol(c));
                }
            }
            _ => {} // EOI
        }
    }
    lexemes
}

/// Compiles an infix expression into an RPN sequence. Variables are
/// resolved against `vars` right away, so the returned sequence can be
/// evaluated any number of times without the bindings.
pub fn compile(expr: &str, vars: &HashMap<String, f64>) -> Result<RpnExpr, CompileError> {
    let lexemes = tokenize(expr);
    rpn::convert(&lexemes, vars)
}

/// Compiles and evaluates an expression in one call
pub fn eval(expr: &str, vars: &HashMap<String, f64>) -> CalcResult {
    let compiled = compile(expr, vars)?;
    let value = compiled.eval()?;
    Ok(value)
}
