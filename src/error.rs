use thiserror::Error;

/// Failures the evaluation pipeline can report back to the shell.
///
/// None of these are fatal: the session stays usable and the stored answer
/// becomes zero.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Divide by 0")]
    DivisionByZero,
    /// Function argument outside its domain, with a readable description.
    #[error("Invalid input: {0}")]
    Domain(String),
    /// Unbalanced or incomplete expression reaching the parser or evaluator.
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
    #[error("Overflow")]
    Overflow,
}

impl CalcError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        CalcError::Domain(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        CalcError::MalformedExpression(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
