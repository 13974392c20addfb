// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Physical plan nodes
//!
//! A plan is an immutable tree of [`PlanNode`] values held through
//! [`PlanNodeRef`] handles. Rewrites never mutate a node: they build new
//! nodes and reuse untouched subtrees by cloning the handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::expression::Expression;
use crate::types::{Schema, Value};

/// Shared handle to an immutable plan node
pub type PlanNodeRef = Arc<PlanNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// One sort key of a `Sort` node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub direction: OrderDirection,
    pub expression: Expression,
}

impl OrderBy {
    pub fn asc(expression: Expression) -> Self {
        Self {
            direction: OrderDirection::Asc,
            expression,
        }
    }

    pub fn desc(expression: Expression) -> Self {
        Self {
            direction: OrderDirection::Desc,
            expression,
        }
    }
}

/// A physical plan operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlanNode {
    /// Literal rows
    Values {
        schema: Schema,
        rows: Vec<Vec<Expression>>,
    },

    /// Full table scan, optionally filtering rows
    SeqScan {
        schema: Schema,
        table_name: String,
        filter_predicate: Option<Expression>,
    },

    /// Index scan. With empty `pred_keys` it walks the whole index in key
    /// order; otherwise it performs one point lookup per key.
    IndexScan {
        schema: Schema,
        table_name: String,
        index_name: String,
        filter_predicate: Option<Expression>,
        pred_keys: Vec<Value>,
    },

    Filter {
        schema: Schema,
        predicate: Expression,
        input: PlanNodeRef,
    },

    Projection {
        schema: Schema,
        expressions: Vec<Expression>,
        input: PlanNodeRef,
    },

    NestedLoopJoin {
        schema: Schema,
        join_type: JoinType,
        predicate: Expression,
        left: PlanNodeRef,
        right: PlanNodeRef,
    },

    /// Join probing an index of `inner_table` with `key_predicate`
    /// evaluated over each left row
    NestedIndexJoin {
        schema: Schema,
        join_type: JoinType,
        key_predicate: Expression,
        inner_table: String,
        index_name: String,
        inner_schema: Schema,
        left: PlanNodeRef,
    },

    Sort {
        schema: Schema,
        order_bys: Vec<OrderBy>,
        input: PlanNodeRef,
    },

    Limit {
        schema: Schema,
        limit: usize,
        input: PlanNodeRef,
    },
}

impl PlanNode {
    /// Output schema of this node
    pub fn schema(&self) -> &Schema {
        match self {
            PlanNode::Values { schema, .. }
            | PlanNode::SeqScan { schema, .. }
            | PlanNode::IndexScan { schema, .. }
            | PlanNode::Filter { schema, .. }
            | PlanNode::Projection { schema, .. }
            | PlanNode::NestedLoopJoin { schema, .. }
            | PlanNode::NestedIndexJoin { schema, .. }
            | PlanNode::Sort { schema, .. }
            | PlanNode::Limit { schema, .. } => schema,
        }
    }

    pub fn children(&self) -> Vec<&PlanNodeRef> {
        match self {
            PlanNode::Values { .. } | PlanNode::SeqScan { .. } | PlanNode::IndexScan { .. } => {
                vec![]
            }
            PlanNode::Filter { input, .. }
            | PlanNode::Projection { input, .. }
            | PlanNode::Sort { input, .. }
            | PlanNode::Limit { input, .. } => vec![input],
            PlanNode::NestedIndexJoin { left, .. } => vec![left],
            PlanNode::NestedLoopJoin { left, right, .. } => vec![left, right],
        }
    }

    /// Copy of this node with its children replaced, in `children()` order.
    /// Missing children keep the current ones.
    pub fn with_children(&self, children: Vec<PlanNodeRef>) -> PlanNode {
        let mut node = self.clone();
        let mut children = children.into_iter();
        match &mut node {
            PlanNode::Values { .. } | PlanNode::SeqScan { .. } | PlanNode::IndexScan { .. } => {}
            PlanNode::Filter { input, .. }
            | PlanNode::Projection { input, .. }
            | PlanNode::Sort { input, .. }
            | PlanNode::Limit { input, .. }
            | PlanNode::NestedIndexJoin { left: input, .. } => {
                if let Some(child) = children.next() {
                    *input = child;
                }
            }
            PlanNode::NestedLoopJoin { left, right, .. } => {
                if let Some(child) = children.next() {
                    *left = child;
                }
                if let Some(child) = children.next() {
                    *right = child;
                }
            }
        }
        node
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PlanNode::Values { .. } => "Values",
            PlanNode::SeqScan { .. } => "SeqScan",
            PlanNode::IndexScan { .. } => "IndexScan",
            PlanNode::Filter { .. } => "Filter",
            PlanNode::Projection { .. } => "Projection",
            PlanNode::NestedLoopJoin { .. } => "NestedLoopJoin",
            PlanNode::NestedIndexJoin { .. } => "NestedIndexJoin",
            PlanNode::Sort { .. } => "Sort",
            PlanNode::Limit { .. } => "Limit",
        }
    }

    /// Table read by a leaf scan
    pub fn scanned_table(&self) -> Option<&str> {
        match self {
            PlanNode::SeqScan { table_name, .. } | PlanNode::IndexScan { table_name, .. } => {
                Some(table_name.as_str())
            }
            _ => None,
        }
    }

    /// True if any node in the tree satisfies the predicate
    pub fn contains<F>(&self, f: &F) -> bool
    where
        F: Fn(&PlanNode) -> bool,
    {
        f(self) || self.children().into_iter().any(|c| c.contains(f))
    }

    /// Whether row order is part of this plan's result: the tree contains a
    /// `Sort`, or a `Limit` whose chosen rows depend on input order
    pub fn is_ordered(&self) -> bool {
        self.contains(&|n: &PlanNode| matches!(n, PlanNode::Sort { .. } | PlanNode::Limit { .. }))
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(|c| c.node_count())
            .sum::<usize>()
    }

    /// Multi-line indented rendering of the whole tree
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.to_string());
        out.push('\n');
        for child in self.children() {
            child.explain_into(out, depth + 1);
        }
    }
}

fn join_exprs(exprs: &[Expression]) -> String {
    exprs
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanNode::Values { rows, .. } => write!(f, "Values {{ rows={} }}", rows.len()),
            PlanNode::SeqScan {
                table_name,
                filter_predicate,
                ..
            } => match filter_predicate {
                Some(p) => write!(f, "SeqScan {{ table={}, filter={} }}", table_name, p),
                None => write!(f, "SeqScan {{ table={} }}", table_name),
            },
            PlanNode::IndexScan {
                table_name,
                index_name,
                filter_predicate,
                pred_keys,
                ..
            } => {
                write!(f, "IndexScan {{ table={}, index={}", table_name, index_name)?;
                if !pred_keys.is_empty() {
                    let keys: Vec<String> = pred_keys.iter().map(|k| k.to_string()).collect();
                    write!(f, ", keys=[{}]", keys.join(", "))?;
                }
                if let Some(p) = filter_predicate {
                    write!(f, ", filter={}", p)?;
                }
                write!(f, " }}")
            }
            PlanNode::Filter { predicate, .. } => write!(f, "Filter {{ predicate={} }}", predicate),
            PlanNode::Projection { expressions, .. } => {
                write!(f, "Projection {{ exprs=[{}] }}", join_exprs(expressions))
            }
            PlanNode::NestedLoopJoin {
                join_type,
                predicate,
                ..
            } => write!(
                f,
                "NestedLoopJoin {{ type={:?}, predicate={} }}",
                join_type, predicate
            ),
            PlanNode::NestedIndexJoin {
                join_type,
                key_predicate,
                inner_table,
                index_name,
                ..
            } => write!(
                f,
                "NestedIndexJoin {{ type={:?}, key={}, inner={}, index={} }}",
                join_type, key_predicate, inner_table, index_name
            ),
            PlanNode::Sort { order_bys, .. } => {
                let keys: Vec<String> = order_bys
                    .iter()
                    .map(|o| format!("{:?} {}", o.direction, o.expression))
                    .collect();
                write!(f, "Sort {{ order_bys=[{}] }}", keys.join(", "))
            }
            PlanNode::Limit { limit, .. } => write!(f, "Limit {{ limit={} }}", limit),
        }
    }
}
