//! Tree-walking evaluator
//!
//! Evaluation first checks that the expression only uses constructs with
//! defined semantics, then walks the outline. Every intermediate and final
//! result is kept in document order without duplicates.

use rustc_hash::{FxHashMap, FxHashSet};

use super::error::{EvaluationError, EvaluationResult};
use crate::ast::{
    Axis, LocationExpression, Modifier, NodeType, Path, PathExpression, Predicate, Relation,
    Slice, Step, TEXT_ATTRIBUTE, Value,
};
use crate::model::{HEADING_TYPE, Item, Row, TYPE_ATTRIBUTE};

/// Evaluate `expression` with `context` as the context item
pub fn evaluate<I: Item>(expression: &PathExpression, context: &I) -> EvaluationResult<Vec<I>> {
    Evaluator::new(context).evaluate(expression)
}

/// Evaluator bound to the outline that contains a context item.
///
/// Construction indexes the whole outline once so that document order
/// comparisons and the `following`/`preceding` axes are cheap.
pub struct Evaluator<I: Item> {
    context: I,
    /// Every item in document order, root first
    items: Vec<I>,
    /// Position of each item in `items`
    order: FxHashMap<I, usize>,
    /// For each position, one past the last position of its subtree
    subtree_end: Vec<usize>,
}

impl<I: Item> Evaluator<I> {
    /// Index the outline containing `context`
    pub fn new(context: &I) -> Self {
        let mut root = context.clone();
        while let Some(parent) = root.parent() {
            root = parent;
        }

        let mut items = vec![root.clone()];
        items.extend(root.descendants());
        let order: FxHashMap<I, usize> = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.clone(), position))
            .collect();

        let mut subtree_end: Vec<usize> = (1..=items.len()).collect();
        for position in (1..items.len()).rev() {
            if let Some(parent) = items[position].parent().and_then(|p| order.get(&p).copied()) {
                subtree_end[parent] = subtree_end[parent].max(subtree_end[position]);
            }
        }

        log::trace!("indexed outline of {} items", items.len());
        Self {
            context: context.clone(),
            items,
            order,
            subtree_end,
        }
    }

    /// Evaluate a parsed expression against the context item
    pub fn evaluate(&self, expression: &PathExpression) -> EvaluationResult<Vec<I>> {
        match expression {
            PathExpression::Function(function) => Err(EvaluationError::UnsupportedFunction {
                name: function.name.clone(),
            }),
            PathExpression::Location(location) => {
                check_location(location)?;
                Ok(self.evaluate_location(location, &self.context))
            }
        }
    }

    fn evaluate_location(&self, expression: &LocationExpression, context: &I) -> Vec<I> {
        match expression {
            LocationExpression::Path(path) => self.evaluate_path(path, context),
            LocationExpression::Union(left, right) => {
                let mut items = self.evaluate_location(left, context);
                items.extend(self.evaluate_location(right, context));
                self.sorted(items)
            }
            LocationExpression::Except(left, right) => {
                let right: FxHashSet<I> =
                    self.evaluate_location(right, context).into_iter().collect();
                let mut items = self.evaluate_location(left, context);
                items.retain(|item| !right.contains(item));
                items
            }
            LocationExpression::Intersect(left, right) => {
                let right: FxHashSet<I> =
                    self.evaluate_location(right, context).into_iter().collect();
                let mut items = self.evaluate_location(left, context);
                items.retain(|item| right.contains(item));
                items
            }
        }
    }

    fn evaluate_path(&self, path: &Path, context: &I) -> Vec<I> {
        let start = if path.absolute {
            self.items[0].clone()
        } else {
            context.clone()
        };

        let mut contexts = vec![start];
        for step in &path.steps {
            let mut results = Vec::new();
            for item in &contexts {
                let mut matches = self.step_matches(step, item);
                if let Some(slice) = step.slice {
                    matches = apply_slice(matches, slice);
                }
                results.extend(matches);
            }
            log::trace!(
                "{} step over {} context items matched {}",
                step.axis,
                contexts.len(),
                results.len()
            );
            contexts = self.sorted(results);
        }
        contexts
    }

    /// Items reached from `item` along the step's axis that pass its tests
    fn step_matches(&self, step: &Step, item: &I) -> Vec<I> {
        self.axis_items(step.axis, item)
            .into_iter()
            .filter(|candidate| {
                matches_type(step.node_type, candidate)
                    && matches_predicate(&step.predicate, candidate)
            })
            .collect()
    }

    /// Items on `axis` from `item`, in document order
    fn axis_items(&self, axis: Axis, item: &I) -> Vec<I> {
        let Some(&position) = self.order.get(item) else {
            return Vec::new();
        };
        let end = self.subtree_end[position];

        match axis {
            Axis::Child => item.children(),
            Axis::Descendant | Axis::DescendantShortcut => self.items[position + 1..end].to_vec(),
            Axis::DescendantOrSelf | Axis::DescendantOrSelfShortcut => {
                self.items[position..end].to_vec()
            }
            Axis::Parent | Axis::ParentShortcut => item.parent().into_iter().collect(),
            Axis::SelfAxis | Axis::SelfShortcut => vec![item.clone()],
            Axis::Ancestor => {
                let mut ancestors = Vec::new();
                let mut current = item.parent();
                while let Some(ancestor) = current {
                    current = ancestor.parent();
                    ancestors.push(ancestor);
                }
                ancestors.reverse();
                ancestors
            }
            Axis::AncestorOrSelf => {
                let mut items = self.axis_items(Axis::Ancestor, item);
                items.push(item.clone());
                items
            }
            Axis::FollowingSibling => self.siblings(item, |sibling| sibling > position),
            Axis::PrecedingSibling => self.siblings(item, |sibling| sibling < position),
            Axis::Following => self.items[end..].to_vec(),
            Axis::Preceding => self.items[..position]
                .iter()
                .enumerate()
                .filter(|&(other, _)| self.subtree_end[other] <= position)
                .map(|(_, item)| item.clone())
                .collect(),
        }
    }

    fn siblings(&self, item: &I, keep: impl Fn(usize) -> bool) -> Vec<I> {
        let Some(parent) = item.parent() else {
            return Vec::new();
        };
        parent
            .children()
            .into_iter()
            .filter(|sibling| self.order.get(sibling).is_some_and(|&p| keep(p)))
            .collect()
    }

    /// Sort into document order and drop duplicates
    fn sorted(&self, mut items: Vec<I>) -> Vec<I> {
        items.sort_by_key(|item| self.order.get(item).copied().unwrap_or(usize::MAX));
        items.dedup();
        items
    }
}

fn apply_slice<I>(items: Vec<I>, slice: Slice) -> Vec<I> {
    let len = items.len() as i64;
    let resolve = |index: i64| if index < 0 { len + index } else { index };

    let (start, end) = if slice.range {
        let start = slice.start.map_or(0, resolve).clamp(0, len);
        let end = slice.end.map_or(len, resolve).clamp(0, len);
        (start, end)
    } else {
        match slice.start.map(resolve) {
            Some(index) if (0..len).contains(&index) => (index, index + 1),
            _ => return Vec::new(),
        }
    };

    if start >= end {
        return Vec::new();
    }
    items
        .into_iter()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect()
}

fn matches_type<I: Item>(node_type: NodeType, item: &I) -> bool {
    match node_type {
        NodeType::Any => true,
        NodeType::Heading => item.row().attribute(TYPE_ATTRIBUTE) == Some(HEADING_TYPE),
    }
}

fn matches_predicate<I: Item>(predicate: &Predicate, item: &I) -> bool {
    match predicate {
        Predicate::Any => true,
        Predicate::Not(inner) => !matches_predicate(inner, item),
        Predicate::And(left, right) => {
            matches_predicate(left, item) && matches_predicate(right, item)
        }
        Predicate::Or(left, right) => {
            matches_predicate(left, item) || matches_predicate(right, item)
        }
        Predicate::Comparison {
            left,
            relation,
            modifier,
            right,
        } => {
            let row = item.row();
            let Some(left) = resolve_value(left, row) else {
                return false;
            };
            let (Some(relation), Some(right)) = (relation, right) else {
                return true;
            };
            let Some(right) = resolve_value(right, row) else {
                return false;
            };
            compare(left, *relation, *modifier, right)
        }
    }
}

fn resolve_value<'r, R: Row + ?Sized>(value: &'r Value, row: &'r R) -> Option<&'r str> {
    match value {
        Value::Literal(literal) => Some(literal.as_str()),
        Value::GetAttribute(name) if name == TEXT_ATTRIBUTE => Some(row.text()),
        Value::GetAttribute(name) => row.attribute(name),
        Value::Function(_) => None,
    }
}

fn compare(left: &str, relation: Relation, modifier: Modifier, right: &str) -> bool {
    let (left, right) = match modifier {
        Modifier::CaseInsensitive => (left.to_lowercase(), right.to_lowercase()),
        _ => (left.to_string(), right.to_string()),
    };
    match relation {
        Relation::BeginsWith => left.starts_with(&right),
        Relation::EndsWith => left.ends_with(&right),
        Relation::Contains => left.contains(&right),
        Relation::Equal => left == right,
        Relation::NotEqual => left != right,
        // rejected by check_location
        _ => false,
    }
}

fn check_location(expression: &LocationExpression) -> EvaluationResult<()> {
    match expression {
        LocationExpression::Path(path) => path
            .steps
            .iter()
            .try_for_each(|step| check_predicate(&step.predicate)),
        LocationExpression::Union(left, right)
        | LocationExpression::Except(left, right)
        | LocationExpression::Intersect(left, right) => {
            check_location(left)?;
            check_location(right)
        }
    }
}

fn check_predicate(predicate: &Predicate) -> EvaluationResult<()> {
    match predicate {
        Predicate::Any => Ok(()),
        Predicate::Not(inner) => check_predicate(inner),
        Predicate::And(left, right) | Predicate::Or(left, right) => {
            check_predicate(left)?;
            check_predicate(right)
        }
        Predicate::Comparison {
            left,
            relation,
            modifier,
            right,
        } => {
            check_value(left)?;
            if let Some(right) = right {
                check_value(right)?;
            }
            let Some(relation) = relation else {
                return Ok(());
            };
            match relation {
                Relation::BeginsWith
                | Relation::EndsWith
                | Relation::Contains
                | Relation::Equal
                | Relation::NotEqual => {}
                other => {
                    return Err(EvaluationError::UnsupportedRelation {
                        relation: other.to_string(),
                    });
                }
            }
            match modifier {
                Modifier::CaseSensitive | Modifier::CaseInsensitive => Ok(()),
                other => Err(EvaluationError::UnsupportedModifier {
                    modifier: other.to_string(),
                }),
            }
        }
    }
}

fn check_value(value: &Value) -> EvaluationResult<()> {
    match value {
        Value::Function(function) => Err(EvaluationError::UnsupportedFunction {
            name: function.name.clone(),
        }),
        _ => Ok(()),
    }
}
