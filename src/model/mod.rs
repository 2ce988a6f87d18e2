// Copyright 2024 BikePath Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Outline model that path expressions are evaluated against
//!
//! The evaluator only needs the tree shape and per-row text and attributes,
//! so any outline store can be queried by implementing [`Item`] and [`Row`].

#![warn(missing_docs)]

pub mod memory;

pub use memory::{ItemId, Outline, OutlineItem, RowData};

use std::hash::Hash;

/// Attribute holding the row kind; `heading` rows match the `heading` step type
pub const TYPE_ATTRIBUTE: &str = "type";

/// Value of [`TYPE_ATTRIBUTE`] for heading rows
pub const HEADING_TYPE: &str = "heading";

/// Content of a single outline row
pub trait Row {
    /// Row text
    fn text(&self) -> &str;

    /// Attribute value, `None` when the row does not carry it
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// Handle to a node in an outline tree.
///
/// Handles are compared by identity: two handles are equal when they refer
/// to the same node.
pub trait Item: Clone + Eq + Hash {
    /// Row type exposed by this item
    type Row: Row + ?Sized;

    /// Parent item, `None` for the root
    fn parent(&self) -> Option<Self>;

    /// Direct children in document order
    fn children(&self) -> Vec<Self>;

    /// All descendants in document order
    fn descendants(&self) -> Vec<Self> {
        let mut result = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(item) = stack.pop() {
            stack.extend(item.children().into_iter().rev());
            result.push(item);
        }
        result
    }

    /// The row content of this item
    fn row(&self) -> &Self::Row;
}
