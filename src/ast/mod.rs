//! Abstract Syntax Tree (AST) definitions for outline path expressions
//!
//! Every node is produced bottom-up by the parser and owned by its parent.
//! Recursive branches are boxed; there is no sharing between nodes.

#![warn(missing_docs)]

mod expression;

pub use expression::*;
