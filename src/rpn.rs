//! Shunting-yard conversion of a lexeme sequence into Reverse Polish
//! notation and the stack machine that executes the result.

use std::collections::HashMap;
use std::fmt;
use std::str;

use crate::errors::*;
use crate::ops;
use crate::parse::Lexeme;
use crate::stack::Stack;

/// Denominators with a magnitude below this make a division fail
pub(crate) const DIV_EPSILON: f64 = 1e-9;

/// One entry of a compiled sequence: either the text of a numeric literal
/// or an operator/function symbol. Keeping the two apart removes any
/// ambiguity between a literal and an identically spelled symbol.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Num(String),
    Sym(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Token::Num(text) => write!(f, "{}", text),
            Token::Sym(sym) => write!(f, "{}", sym),
        }
    }
}

const F64_BUF_LEN: usize = 48;
fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

/// A compiled expression in Reverse Polish notation. Every variable
/// reference has already been replaced with its bound value, so evaluation
/// needs no bindings and repeated evaluations return the same result.
#[derive(Clone, Debug, PartialEq)]
pub struct RpnExpr {
    tokens: Vec<Token>,
}

impl fmt::Display for RpnExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if first {
                first = false;
            } else {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl RpnExpr {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Executes the sequence on an operand stack and returns the single
    /// remaining value
    pub fn eval(&self) -> Result<f64, EvalError> {
        let mut values: Stack<f64> = Stack::new();
        for token in &self.tokens {
            match token {
                Token::Num(text) => match text.parse::<f64>() {
                    Ok(v) => values.push(v),
                    // the tokenizer lets broken literals like "1..2" through
                    Err(..) => return Err(EvalError::UnknownOperator(text.clone())),
                },
                Token::Sym(sym) => apply(&mut values, sym)?,
            }
        }
        if values.size() != 1 {
            return Err(EvalError::MalformedExpression);
        }
        match values.pop() {
            Some(v) => Ok(v),
            None => Err(EvalError::MalformedExpression),
        }
    }
}

fn apply(values: &mut Stack<f64>, op: &str) -> Result<(), EvalError> {
    if ops::is_binary(op) {
        if values.size() < 2 {
            return Err(EvalError::InsufficientOperands(op.to_string()));
        }
        // size checked above - unwraps are safe
        let b = values.pop().unwrap();
        let a = values.pop().unwrap();
        values.push(binary(op, a, b)?);
        return Ok(());
    }

    if values.is_empty() {
        return Err(EvalError::InsufficientOperands(op.to_string()));
    }
    let a = values.pop().unwrap();
    values.push(unary(op, a)?);
    Ok(())
}

fn binary(op: &str, a: f64, b: f64) -> Result<f64, EvalError> {
    match op {
        "+" => Ok(a + b),
        "-" => Ok(a - b),
        "*" => Ok(a * b),
        "/" => {
            if b.abs() < DIV_EPSILON {
                return Err(EvalError::DivisionByZero);
            }
            Ok(a / b)
        }
        "^" => Ok(a.powf(b)),
        "%" => Ok(a % b),
        "div" => Ok((a / b).floor()),
        "min" => Ok(a.min(b)),
        "max" => Ok(a.max(b)),
        _ => Err(EvalError::UnknownOperator(op.to_string())),
    }
}

fn unary(op: &str, a: f64) -> Result<f64, EvalError> {
    match op {
        "sqrt" => {
            if a < 0.0 {
                return Err(EvalError::DomainError("sqrt".to_string(), a));
            }
            Ok(a.sqrt())
        }
        "abs" => Ok(a.abs()),
        "sign" => {
            if a > 0.0 {
                Ok(1.0)
            } else if a < 0.0 {
                Ok(-1.0)
            } else {
                Ok(0.0)
            }
        }
        "sin" => Ok(a.sin()),
        "cos" => Ok(a.cos()),
        "tan" => Ok(a.tan()),
        "ln" => {
            if a <= 0.0 {
                return Err(EvalError::DomainError("ln".to_string(), a));
            }
            Ok(a.ln())
        }
        "lg" => {
            if a <= 0.0 {
                return Err(EvalError::DomainError("lg".to_string(), a));
            }
            Ok(a.log10())
        }
        "exp" => Ok(a.exp()),
        "trunc" => Ok(a.trunc()),
        _ => Err(EvalError::UnknownOperator(op.to_string())),
    }
}

/// Shunting-yard state: the growing output sequence and the stack of
/// pending operators. Both live for a single conversion only.
struct Converter<'a> {
    vars: &'a HashMap<String, f64>,
    output: Vec<Token>,
    queue: Stack<String>,
}

impl<'a> Converter<'a> {
    fn new(vars: &'a HashMap<String, f64>) -> Self {
        Converter {
            vars,
            output: Vec::new(),
            queue: Stack::new(),
        }
    }

    fn push(&mut self, lexeme: &Lexeme) -> Result<(), CompileError> {
        match lexeme {
            Lexeme::Number(text) => {
                self.output.push(Token::Num(text.clone()));
                Ok(())
            }
            Lexeme::Ident(name) => self.ident(name),
            Lexeme::Symbol(c) => self.symbol(*c),
        }
    }

    fn ident(&mut self, name: &str) -> Result<(), CompileError> {
        // `div` is spelled like an identifier but acts as a binary operator
        if name == "div" {
            self.operator(name);
            return Ok(());
        }
        if ops::is_func(name) {
            self.queue.push(name.to_string());
            return Ok(());
        }
        match self.vars.get(name) {
            Some(v) => {
                self.output.push(Token::Num(format_f64(*v)));
                Ok(())
            }
            None => Err(CompileError::UndefinedVariable(name.to_string())),
        }
    }

    fn symbol(&mut self, c: char) -> Result<(), CompileError> {
        match c {
            '(' => {
                self.queue.push("(".to_string());
                Ok(())
            }
            ')' => self.close_bracket(),
            _ => {
                self.operator(&c.to_string());
                Ok(())
            }
        }
    }

    fn operator(&mut self, op: &str) {
        // a minus that cannot be binary negates: `-x` becomes `0 x -`
        if op == "-" && (self.output.is_empty() || self.top_is_bracket()) {
            self.output.push(Token::Num("0".to_string()));
        }
        self.pop_while_priority(ops::priority(op));
        self.queue.push(op.to_string());
    }

    fn top_is_bracket(&self) -> bool {
        match self.queue.peek() {
            Some(top) => top == "(",
            None => false,
        }
    }

    // move operators from the queue to the output while the top of the
    // queue has equal or greater priority; `(` has priority 0 and always
    // stops the loop
    fn pop_while_priority(&mut self, priority: i32) {
        loop {
            let pop = match self.queue.peek() {
                Some(top) => ops::priority(top) >= priority,
                None => false,
            };
            if !pop {
                return;
            }
            if let Some(top) = self.queue.pop() {
                self.output.push(Token::Sym(top));
            }
        }
    }

    // move operators to the output until the matching bracket; a function
    // right before the bracket folds its argument group immediately
    fn close_bracket(&mut self) -> Result<(), CompileError> {
        loop {
            match self.queue.pop() {
                None => return Err(CompileError::MismatchedParentheses),
                Some(op) => {
                    if op == "(" {
                        break;
                    }
                    self.output.push(Token::Sym(op));
                }
            }
        }
        let fold = match self.queue.peek() {
            Some(top) => ops::is_func(top),
            None => false,
        };
        if fold {
            if let Some(fname) = self.queue.pop() {
                self.output.push(Token::Sym(fname));
            }
        }
        Ok(())
    }

    // drain the queue after the last lexeme; a leftover `(` means the
    // expression never closed it
    fn finish(mut self) -> Result<RpnExpr, CompileError> {
        while let Some(op) = self.queue.pop() {
            if op == "(" {
                return Err(CompileError::MismatchedParentheses);
            }
            self.output.push(Token::Sym(op));
        }
        Ok(RpnExpr { tokens: self.output })
    }
}

/// Converts a lexeme sequence into RPN, resolving every variable reference
/// against `vars` on the way
pub(crate) fn convert(lexemes: &[Lexeme], vars: &HashMap<String, f64>) -> Result<RpnExpr, CompileError> {
    let mut cnv = Converter::new(vars);
    for lexeme in lexemes {
        cnv.push(lexeme)?;
    }
    cnv.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{compile, tokenize};

    fn num(text: &str) -> Token {
        Token::Num(text.to_string())
    }
    fn sym(text: &str) -> Token {
        Token::Sym(text.to_string())
    }
    fn no_vars() -> HashMap<String, f64> {
        HashMap::new()
    }

    #[test]
    fn test_convert_order() {
        let vars = no_vars();
        let c = compile("3 + 4", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("3"), num("4"), sym("+")]);

        let c = compile("3 + 4 * 2", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("3"), num("4"), num("2"), sym("*"), sym("+")]);

        let c = compile("(3 + 4) * 2", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("3"), num("4"), sym("+"), num("2"), sym("*")]);
        assert_eq!(format!("{}", c), "3 4 + 2 *");
    }

    #[test]
    fn test_unary_minus_rewrite() {
        let vars = no_vars();
        let c = compile("-5 + 3", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("0"), num("5"), sym("-"), num("3"), sym("+")]);
        assert_eq!(c.eval(), Ok(-2.0));

        let c = compile("2 * (-3)", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("2"), num("0"), num("3"), sym("-"), sym("*")]);
        assert_eq!(c.eval(), Ok(-6.0));
    }

    #[test]
    fn test_function_folding() {
        let vars = no_vars();
        let c = compile("sqrt(16)", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("16"), sym("sqrt")]);
        assert_eq!(c.eval(), Ok(4.0));

        // a function folds right after its bracket group closes
        let c = compile("sqrt(16) + 1", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("16"), sym("sqrt"), num("1"), sym("+")]);
    }

    #[test]
    fn test_variable_resolution() {
        let mut vars = HashMap::new();
        vars.insert("a".to_string(), 5.0);
        let c = compile("a * 2", &vars).unwrap();
        assert_eq!(c.tokens(), &[num("5.0"), num("2"), sym("*")]);
        assert_eq!(c.eval(), Ok(10.0));

        let e = compile("a + b", &vars);
        assert_eq!(e, Err(CompileError::UndefinedVariable("b".to_string())));
    }

    #[test]
    fn test_mismatched_brackets() {
        let vars = no_vars();
        assert_eq!(compile("(3 + 4", &vars), Err(CompileError::MismatchedParentheses));
        assert_eq!(compile("3 + 4)", &vars), Err(CompileError::MismatchedParentheses));
        assert_eq!(compile("((1)", &vars), Err(CompileError::MismatchedParentheses));
    }

    #[test]
    fn test_div_is_a_real_operator() {
        let vars = no_vars();
        let c = compile("9 div 2 * 2", &vars).unwrap();
        // equal priority pops left to right: (9 div 2) * 2
        assert_eq!(c.tokens(), &[num("9"), num("2"), sym("div"), num("2"), sym("*")]);
        assert_eq!(c.eval(), Ok(8.0));
    }

    #[test]
    fn test_eval_errors() {
        let vars = no_vars();
        let c = convert(&tokenize("5 / 0"), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::DivisionByZero));

        let c = convert(&tokenize("sqrt(abs(-16))"), &vars).unwrap();
        assert_eq!(c.eval(), Ok(4.0));
        let c = convert(&tokenize("sqrt(0) - sqrt(16)"), &vars).unwrap();
        assert_eq!(c.eval(), Ok(-4.0));

        let c = convert(&tokenize("ln(0)"), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::DomainError("ln".to_string(), 0.0)));

        let c = convert(&tokenize("2 # 3"), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::UnknownOperator("#".to_string())));

        // broken literal passes the tokenizer, dies here
        let c = convert(&tokenize("1..2 + 1"), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::UnknownOperator("1..2".to_string())));

        let c = convert(&tokenize("2 + + 3"), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::InsufficientOperands("+".to_string())));

        let c = convert(&tokenize("3 4"), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::MalformedExpression));
        let c = convert(&tokenize(""), &vars).unwrap();
        assert_eq!(c.eval(), Err(EvalError::MalformedExpression));
    }

    #[test]
    fn test_eval_is_repeatable() {
        let mut vars = HashMap::new();
        vars.insert("a".to_string(), 2.5);
        let c = compile("a * 4 + 1", &vars).unwrap();
        let first = c.eval();
        assert_eq!(first, Ok(11.0));
        // the compiled sequence holds no variable names, evaluating it
        // again needs no bindings and returns the same value
        assert_eq!(c.eval(), first);
        assert_eq!(c.eval(), first);
    }
}
