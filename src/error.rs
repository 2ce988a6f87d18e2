//! Error type for parsing and evaluating in one call

use crate::diagnostics::Diagnostic;
use crate::evaluator::EvaluationError;
use crate::parser::ParseError;
use thiserror::Error;

/// Result type alias for [`query`](crate::query)
pub type Result<T> = std::result::Result<T, Error>;

/// Either stage of running a query failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The query text is not a valid path expression
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The expression parsed but could not be evaluated
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl Error {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Parse(e) => e.to_diagnostic(),
            Error::Evaluation(e) => e.to_diagnostic(),
        }
    }
}
