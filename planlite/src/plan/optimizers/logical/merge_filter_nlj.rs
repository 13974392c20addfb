// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Fold filters into nested loop join predicates

use crate::plan::expression::{col, Expression};
use crate::plan::node::{JoinType, PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{rewrite_nodes, RewriteContext, RewriteRule, Transformed};

/// Moves a filter sitting directly on an inner nested loop join into the
/// join predicate.
///
/// The filter addresses the join's concatenated output as tuple 0; inside
/// the join, left columns become `#0.i` and right columns `#1.(i - width)`.
/// Left joins are skipped: filtering after a left join drops the
/// null-padded rows that a join predicate would keep.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeFilterNlj;

impl RewriteRule for MergeFilterNlj {
    fn name(&self) -> &'static str {
        "MergeFilterNlj"
    }

    fn description(&self) -> &'static str {
        "Push filter predicates into inner nested loop join conditions"
    }

    fn apply(&self, plan: &PlanNodeRef, _ctx: &RewriteContext<'_>) -> Transformed {
        rewrite_nodes(plan, merge_filter_nlj)
    }
}

fn merge_filter_nlj(node: &PlanNode) -> Option<PlanNode> {
    let PlanNode::Filter {
        predicate: filter, input, ..
    } = node
    else {
        return None;
    };

    let PlanNode::NestedLoopJoin {
        schema,
        join_type: JoinType::Inner,
        predicate,
        left,
        right,
    } = input.as_ref()
    else {
        return None;
    };

    let left_width = left.schema().len();
    let pushed = filter.map_columns(&|_, c| {
        if c < left_width {
            col(0, c)
        } else {
            col(1, c - left_width)
        }
    });

    let predicate = Expression::and_optional(Some(predicate.clone()), Some(pushed))
        .unwrap_or_else(Expression::true_constant);

    Some(PlanNode::NestedLoopJoin {
        schema: schema.clone(),
        join_type: JoinType::Inner,
        predicate,
        left: left.clone(),
        right: right.clone(),
    })
}
