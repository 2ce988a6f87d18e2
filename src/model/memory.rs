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

//! In-memory outline

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};

use super::{HEADING_TYPE, Item, Row, TYPE_ATTRIBUTE};

/// Index of a row within an [`Outline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    /// Id of the outline root
    pub const ROOT: ItemId = ItemId(0);
}

/// Text and attributes of one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowData {
    text: String,
    attributes: FxHashMap<String, String>,
}

impl RowData {
    /// Create a row without attributes
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: FxHashMap::default(),
        }
    }
}

impl Row for RowData {
    fn text(&self) -> &str {
        &self.text
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    row: RowData,
    parent: Option<ItemId>,
    children: SmallVec<[ItemId; 4]>,
}

/// Tree of rows held in memory.
///
/// The root is an untitled row that is never part of the document text;
/// top-level rows are its children.
#[derive(Debug, Clone)]
pub struct Outline {
    nodes: Vec<Node>,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    /// Create an outline holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Number of rows, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the outline holds no rows besides the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Handle to the root
    pub fn root(&self) -> OutlineItem<'_> {
        self.item(ItemId::ROOT)
    }

    /// Handle to a row.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this outline.
    pub fn item(&self, id: ItemId) -> OutlineItem<'_> {
        assert!(id.0 < self.nodes.len(), "{id:?} is not in this outline");
        OutlineItem { outline: self, id }
    }

    /// Append a row as the last child of `parent`
    pub fn append(&mut self, parent: ItemId, text: impl Into<String>) -> ItemId {
        let id = ItemId(self.nodes.len());
        self.nodes.push(Node {
            row: RowData::new(text),
            parent: Some(parent),
            children: SmallVec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a heading row as the last child of `parent`
    pub fn append_heading(&mut self, parent: ItemId, text: impl Into<String>) -> ItemId {
        let id = self.append(parent, text);
        self.set_attribute(id, TYPE_ATTRIBUTE, HEADING_TYPE);
        id
    }

    /// Set an attribute on a row, replacing any previous value
    pub fn set_attribute(
        &mut self,
        id: ItemId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.nodes[id.0]
            .row
            .attributes
            .insert(name.into(), value.into());
        self
    }
}

/// Borrowed handle to a row in an [`Outline`]
#[derive(Debug, Clone, Copy)]
pub struct OutlineItem<'o> {
    outline: &'o Outline,
    id: ItemId,
}

impl<'o> OutlineItem<'o> {
    /// Id of the row
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Row text
    pub fn text(&self) -> &'o str {
        &self.node().row.text
    }

    fn node(&self) -> &'o Node {
        &self.outline.nodes[self.id.0]
    }
}

impl PartialEq for OutlineItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.outline, other.outline) && self.id == other.id
    }
}

impl Eq for OutlineItem<'_> {}

impl Hash for OutlineItem<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<'o> Item for OutlineItem<'o> {
    type Row = RowData;

    fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| self.outline.item(id))
    }

    fn children(&self) -> Vec<Self> {
        self.node()
            .children
            .iter()
            .map(|&id| self.outline.item(id))
            .collect()
    }

    fn row(&self) -> &RowData {
        &self.node().row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[OutlineItem<'_>]) -> Vec<String> {
        items.iter().map(|i| i.text().to_string()).collect()
    }

    #[test]
    fn test_tree_shape() {
        let mut outline = Outline::new();
        let a = outline.append(ItemId::ROOT, "a");
        let b = outline.append(a, "b");
        outline.append(b, "c");
        outline.append(a, "d");
        outline.append(ItemId::ROOT, "e");

        let root = outline.root();
        assert_eq!(root.parent(), None);
        assert_eq!(texts(&root.children()), ["a", "e"]);
        assert_eq!(texts(&root.descendants()), ["a", "b", "c", "d", "e"]);
        assert_eq!(outline.item(b).parent(), Some(outline.item(a)));
        assert_eq!(outline.len(), 6);
    }

    #[test]
    fn test_attributes() {
        let mut outline = Outline::new();
        let h = outline.append_heading(ItemId::ROOT, "Inbox");
        let t = outline.append(h, "buy milk");
        outline.set_attribute(t, "done", "2023-05-01");

        assert_eq!(outline.item(h).row().attribute("type"), Some("heading"));
        assert_eq!(outline.item(t).row().attribute("done"), Some("2023-05-01"));
        assert_eq!(outline.item(t).row().attribute("type"), None);
        assert_eq!(outline.item(t).row().text(), "buy milk");
    }
}
