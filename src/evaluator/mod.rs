//! Path expression evaluator
//!
//! Walks an outline through the [`Item`](crate::model::Item) and
//! [`Row`](crate::model::Row) traits. Functions, `matches`, the ordering
//! relations and the numeric/date/list modifiers parse but have no
//! evaluation semantics; expressions using them are rejected before any
//! item is visited.

#![warn(missing_docs)]

mod engine;
mod error;

pub use engine::{Evaluator, evaluate};
pub use error::{EvaluationError, EvaluationResult};
