use std::fmt;

/// Expression evaluation result: either the final value or an error
pub type CalcResult = Result<f64, CalcError>;

/// Errors detected while converting an infix expression to RPN
#[derive(Clone, PartialEq)]
pub enum CompileError {
    UndefinedVariable(String),
    MismatchedParentheses,
}

/// Errors detected while executing a compiled RPN sequence
#[derive(Clone, PartialEq)]
pub enum EvalError {
    InsufficientOperands(String),
    DivisionByZero,
    DomainError(String, f64),
    UnknownOperator(String),
    MalformedExpression,
}

/// Any failure `eval` can surface: compilation and evaluation errors combined
#[derive(Clone, PartialEq)]
pub enum CalcError {
    Compile(CompileError),
    Eval(EvalError),
}

impl From<CompileError> for CalcError {
    fn from(err: CompileError) -> CalcError {
        CalcError::Compile(err)
    }
}

impl From<EvalError> for CalcError {
    fn from(err: EvalError) -> CalcError {
        CalcError::Eval(err)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CompileError::UndefinedVariable(s) => write!(f, "Variable '{}' not found", s),
            CompileError::MismatchedParentheses => write!(f, "Mismatched brackets"),
        }
    }
}

impl fmt::Debug for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CompileError::UndefinedVariable(s) => write!(f, "Variable '{}' not found", s),
            CompileError::MismatchedParentheses => write!(f, "Mismatched brackets"),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            EvalError::InsufficientOperands(s) => write!(f, "Not enough operands for '{}'", s),
            EvalError::DivisionByZero => write!(f, "Divided by zero"),
            EvalError::DomainError(func, val) => write!(f, "Function '{}' is not defined for {}", func, val),
            EvalError::UnknownOperator(s) => write!(f, "Unknown operator '{}'", s),
            EvalError::MalformedExpression => write!(f, "Malformed expression"),
        }
    }
}

impl fmt::Debug for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            EvalError::InsufficientOperands(s) => write!(f, "Not enough operands for '{}'", s),
            EvalError::DivisionByZero => write!(f, "Divided by zero"),
            EvalError::DomainError(func, val) => write!(f, "Function '{}' is not defined for {}", func, val),
            EvalError::UnknownOperator(s) => write!(f, "Unknown operator '{}'", s),
            EvalError::MalformedExpression => write!(f, "Malformed expression"),
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::Compile(e) => write!(f, "{}", e),
            CalcError::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Debug for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::Compile(e) => write!(f, "{:?}", e),
            CalcError::Eval(e) => write!(f, "{:?}", e),
        }
    }
}
