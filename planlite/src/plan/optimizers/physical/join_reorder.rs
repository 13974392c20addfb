// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Size-based join input swapping
//!
//! Not part of the starter rule sequence; available to custom compositions.

use std::sync::Arc;

use crate::plan::cardinality::CardinalityEstimator;
use crate::plan::expression::{col, Expression};
use crate::plan::node::{JoinType, PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{transform_up, RewriteContext, RewriteRule, Transformed};
use crate::types::Schema;

/// Puts the smaller table on the outer (left) side of an inner nested loop
/// join between two scans.
///
/// Both table sizes must be known and the left one strictly larger. The
/// swapped join is wrapped in a projection that restores the original
/// column order, so parents see the same columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct JoinReorder;

impl RewriteRule for JoinReorder {
    fn name(&self) -> &'static str {
        "JoinReorder"
    }

    fn description(&self) -> &'static str {
        "Put the smaller of two scanned tables on the outer side of an inner join"
    }

    fn apply(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> Transformed {
        transform_up(plan, &|node: &PlanNodeRef| join_reorder(node, ctx.cardinality))
    }
}

fn join_reorder(node: &PlanNodeRef, cardinality: &dyn CardinalityEstimator) -> Option<PlanNodeRef> {
    let PlanNode::NestedLoopJoin {
        schema,
        join_type: JoinType::Inner,
        predicate,
        left,
        right,
    } = node.as_ref()
    else {
        return None;
    };

    let left_rows = cardinality.estimated_cardinality(left.scanned_table()?)?;
    let right_rows = cardinality.estimated_cardinality(right.scanned_table()?)?;
    if left_rows <= right_rows {
        return None;
    }

    let left_width = left.schema().len();
    let right_width = right.schema().len();

    let swapped = Arc::new(PlanNode::NestedLoopJoin {
        schema: Schema::join(right.schema(), left.schema()),
        join_type: JoinType::Inner,
        predicate: predicate.map_columns(&|t, c| col(if t == 0 { 1 } else { 0 }, c)),
        left: Arc::clone(right),
        right: Arc::clone(left),
    });

    let restore: Vec<Expression> = (0..left_width)
        .map(|i| col(0, right_width + i))
        .chain((0..right_width).map(|j| col(0, j)))
        .collect();

    Some(Arc::new(PlanNode::Projection {
        schema: schema.clone(),
        expressions: restore,
        input: swapped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::plan::builders::PhysicalBuilder;
    use crate::plan::cardinality::SuffixCardinalityEstimator;
    use crate::plan::expression::eq;
    use crate::types::{Column, DataType};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .create_table(
                "big_10k",
                Schema::new(vec![
                    Column::new("id", DataType::Integer),
                    Column::new("v", DataType::Varchar),
                ]),
            )
            .unwrap();
        for table in ["small_100", "unknown"] {
            catalog
                .create_table(table, Schema::new(vec![Column::new("id", DataType::Integer)]))
                .unwrap();
        }
        catalog
    }

    fn apply(catalog: &Catalog, plan: &PlanNodeRef) -> Transformed {
        let estimator = SuffixCardinalityEstimator::default();
        JoinReorder.apply(plan, &RewriteContext::new(catalog, &estimator))
    }

    fn join(catalog: &Catalog, left: &str, right: &str) -> PlanNodeRef {
        PhysicalBuilder::scan(catalog, left)
            .unwrap()
            .join(
                PhysicalBuilder::scan(catalog, right).unwrap(),
                JoinType::Inner,
                eq(col(0, 0), col(1, 0)),
            )
            .build()
    }

    #[test]
    fn test_larger_left_side_is_swapped() {
        let catalog = catalog();
        let plan = join(&catalog, "big_10k", "small_100");
        let result = apply(&catalog, &plan);
        assert!(result.changed);

        let PlanNode::Projection {
            schema,
            expressions,
            input,
        } = result.plan.as_ref()
        else {
            panic!("Expected Projection, got {}", result.plan);
        };
        assert_eq!(schema, plan.schema());
        assert_eq!(expressions, &vec![col(0, 1), col(0, 2), col(0, 0)]);

        match input.as_ref() {
            PlanNode::NestedLoopJoin {
                left,
                right,
                predicate,
                ..
            } => {
                assert_eq!(left.scanned_table(), Some("small_100"));
                assert_eq!(right.scanned_table(), Some("big_10k"));
                assert_eq!(predicate, &eq(col(1, 0), col(0, 0)));
            }
            other => panic!("Expected NestedLoopJoin, got {}", other),
        }
    }

    #[test]
    fn test_smaller_left_side_untouched() {
        let catalog = catalog();
        let plan = join(&catalog, "small_100", "big_10k");
        assert!(!apply(&catalog, &plan).changed);
    }

    #[test]
    fn test_unknown_cardinality_untouched() {
        let catalog = catalog();
        assert!(!apply(&catalog, &join(&catalog, "big_10k", "unknown")).changed);
        assert!(!apply(&catalog, &join(&catalog, "unknown", "small_100")).changed);
    }

    #[test]
    fn test_second_application_is_stable() {
        let catalog = catalog();
        let once = apply(&catalog, &join(&catalog, "big_10k", "small_100")).plan;
        let twice = apply(&catalog, &once);
        assert!(!twice.changed);
        assert!(Arc::ptr_eq(&once, &twice.plan));
    }
}
