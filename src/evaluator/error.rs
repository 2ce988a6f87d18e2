// Error types for path expression evaluation

use crate::diagnostics::{Diagnostic, DiagnosticBuilder};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur during evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// Function calls have no evaluation semantics
    #[error("function '{name}' is not supported")]
    UnsupportedFunction {
        /// Function name
        name: String,
    },

    /// Relation without evaluation semantics (`matches`, ordering relations)
    #[error("relation '{relation}' is not supported")]
    UnsupportedRelation {
        /// Relation spelling
        relation: String,
    },

    /// Modifier without evaluation semantics (`[n]`, `[d]`, `[l]`)
    #[error("modifier '{modifier}' is not supported")]
    UnsupportedModifier {
        /// Modifier spelling
        modifier: String,
    },
}

impl EvaluationError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let what = match self {
            EvaluationError::UnsupportedFunction { name } => format!("function '{name}'"),
            EvaluationError::UnsupportedRelation { relation } => format!("relation '{relation}'"),
            EvaluationError::UnsupportedModifier { modifier } => format!("modifier '{modifier}'"),
        };
        DiagnosticBuilder::unsupported(&what).build()
    }
}
