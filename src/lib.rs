//! Path expressions for outline documents
//!
//! A small XPath-like language for selecting rows of an outline:
//!
//! ```
//! use bikepath::model::{ItemId, Outline};
//!
//! let mut outline = Outline::new();
//! let inbox = outline.append_heading(ItemId::ROOT, "Inbox");
//! let task = outline.append(inbox, "buy milk");
//! outline.set_attribute(task, "type", "task");
//!
//! let found = bikepath::query("//heading inbox/@type = task", &outline.root()).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].text(), "buy milk");
//! ```
//!
//! Parsing also yields a token stream for syntax highlighting, see
//! [`parser::Parser::tokens`].

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;

pub use ast::PathExpression;
pub use error::{Error, Result};
pub use evaluator::{EvaluationError, evaluate};
pub use model::{Item, Row};
pub use parser::{ParseError, Parser, ParserOptions, Token, TokenType, parse};

/// Parse `text` and evaluate it with `context` as the context item
pub fn query<I: Item>(text: &str, context: &I) -> Result<Vec<I>> {
    let expression = parse(text)?;
    Ok(evaluate(&expression, context)?)
}
