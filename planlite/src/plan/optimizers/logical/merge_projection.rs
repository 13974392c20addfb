// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Merge redundant and adjacent projections

use std::sync::Arc;

use crate::plan::expression::Expression;
use crate::plan::node::{PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{transform_up, RewriteContext, RewriteRule, Transformed};

/// Removes identity projections and collapses a projection directly over
/// another projection into one node.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeProjection;

impl RewriteRule for MergeProjection {
    fn name(&self) -> &'static str {
        "MergeProjection"
    }

    fn description(&self) -> &'static str {
        "Remove identity projections and collapse stacked projections"
    }

    fn apply(&self, plan: &PlanNodeRef, _ctx: &RewriteContext<'_>) -> Transformed {
        transform_up(plan, &merge_projection)
    }
}

fn merge_projection(node: &PlanNodeRef) -> Option<PlanNodeRef> {
    let PlanNode::Projection {
        schema,
        expressions,
        input,
    } = node.as_ref()
    else {
        return None;
    };

    let collapsed = match input.as_ref() {
        PlanNode::Projection {
            expressions: inner_exprs,
            input: inner_input,
            ..
        } => {
            let exprs: Vec<Expression> = expressions
                .iter()
                .map(|e| e.map_columns(&|t, c| match inner_exprs.get(c) {
                    Some(inner) if t == 0 => inner.clone(),
                    _ => Expression::ColumnRef {
                        tuple_idx: t,
                        col_idx: c,
                    },
                }))
                .collect();
            Some(Arc::new(PlanNode::Projection {
                schema: schema.clone(),
                expressions: exprs,
                input: Arc::clone(inner_input),
            }))
        }
        _ => None,
    };

    let current = collapsed.as_ref().unwrap_or(node);
    match identity_input(current) {
        Some(child) => Some(child),
        None => collapsed,
    }
}

/// The projection's input, if the projection emits exactly the input columns
/// in order with the same types
fn identity_input(node: &PlanNodeRef) -> Option<PlanNodeRef> {
    let PlanNode::Projection {
        schema,
        expressions,
        input,
    } = node.as_ref()
    else {
        return None;
    };

    let child_schema = input.schema();
    if expressions.len() != child_schema.len()
        || schema.column_types() != child_schema.column_types()
    {
        return None;
    }

    let is_identity = expressions
        .iter()
        .enumerate()
        .all(|(i, e)| e.as_column_ref() == Some((0, i)));

    is_identity.then(|| Arc::clone(input))
}
