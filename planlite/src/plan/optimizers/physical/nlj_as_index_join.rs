// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Turn equi nested loop joins into index joins

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::plan::expression::{col, ComparisonOp, Expression};
use crate::plan::node::{PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{transform_up, RewriteContext, RewriteRule, Transformed};

/// Converts `NestedLoopJoin(left, SeqScan(inner))` with predicate
/// `left.col = inner.col` into a `NestedIndexJoin` when the inner table has
/// an index keyed on exactly that column.
///
/// The inner scan must not carry a filter; the index join reads inner rows
/// straight from the index.
#[derive(Debug, Default, Clone, Copy)]
pub struct NljAsIndexJoin;

impl RewriteRule for NljAsIndexJoin {
    fn name(&self) -> &'static str {
        "NljAsIndexJoin"
    }

    fn description(&self) -> &'static str {
        "Replace equi nested loop joins with index lookups on the inner table"
    }

    fn apply(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> Transformed {
        transform_up(plan, &|node: &PlanNodeRef| nlj_as_index_join(node, ctx.catalog))
    }
}

fn nlj_as_index_join(node: &PlanNodeRef, catalog: &Catalog) -> Option<PlanNodeRef> {
    let PlanNode::NestedLoopJoin {
        schema,
        join_type,
        predicate,
        left,
        right,
    } = node.as_ref()
    else {
        return None;
    };

    let PlanNode::SeqScan {
        schema: inner_schema,
        table_name,
        filter_predicate: None,
    } = right.as_ref()
    else {
        return None;
    };

    let (left_col, right_col) = equi_join_columns(predicate)?;
    let index = catalog.find_index(table_name, &[right_col])?;

    Some(Arc::new(PlanNode::NestedIndexJoin {
        schema: schema.clone(),
        join_type: *join_type,
        key_predicate: col(0, left_col),
        inner_table: table_name.clone(),
        index_name: index.name.clone(),
        inner_schema: inner_schema.clone(),
        left: Arc::clone(left),
    }))
}

/// `(left column, right column)` of a predicate `#0.a = #1.b` or `#1.b = #0.a`
fn equi_join_columns(predicate: &Expression) -> Option<(usize, usize)> {
    let Expression::Comparison {
        op: ComparisonOp::Equal,
        left,
        right,
    } = predicate
    else {
        return None;
    };

    match (left.as_column_ref()?, right.as_column_ref()?) {
        ((0, a), (1, b)) | ((1, b), (0, a)) => Some((a, b)),
        _ => None,
    }
}
