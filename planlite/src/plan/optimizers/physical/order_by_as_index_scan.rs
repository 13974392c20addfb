// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Replace sorts over indexed columns with ordered index scans

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::plan::node::{OrderBy, OrderDirection, PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{transform_up, RewriteContext, RewriteRule, Transformed};

/// Converts `Sort(SeqScan)` into a full `IndexScan` when every sort key is an
/// ascending column reference and the key list matches an index exactly.
/// A scan filter is carried over to the index scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderByAsIndexScan;

impl RewriteRule for OrderByAsIndexScan {
    fn name(&self) -> &'static str {
        "OrderByAsIndexScan"
    }

    fn description(&self) -> &'static str {
        "Eliminate sorts that an index already provides"
    }

    fn apply(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> Transformed {
        transform_up(plan, &|node: &PlanNodeRef| {
            order_by_as_index_scan(node, ctx.catalog)
        })
    }
}

fn order_by_as_index_scan(node: &PlanNodeRef, catalog: &Catalog) -> Option<PlanNodeRef> {
    let PlanNode::Sort {
        schema,
        order_bys,
        input,
    } = node.as_ref()
    else {
        return None;
    };

    let PlanNode::SeqScan {
        table_name,
        filter_predicate,
        ..
    } = input.as_ref()
    else {
        return None;
    };

    let keys = ascending_sort_columns(order_bys)?;
    let index = catalog.find_index(table_name, &keys)?;

    Some(Arc::new(PlanNode::IndexScan {
        schema: schema.clone(),
        table_name: table_name.clone(),
        index_name: index.name.clone(),
        filter_predicate: filter_predicate.clone(),
        pred_keys: vec![],
    }))
}

/// Column positions of an all-ascending, all-column sort key list
fn ascending_sort_columns(order_bys: &[OrderBy]) -> Option<Vec<usize>> {
    if order_bys.is_empty() {
        return None;
    }
    order_bys
        .iter()
        .map(|o| match (o.direction, o.expression.as_column_ref()) {
            (OrderDirection::Asc, Some((0, c))) => Some(c),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::builders::PhysicalBuilder;
    use crate::plan::cardinality::SuffixCardinalityEstimator;
    use crate::plan::expression::{arith, col, eq, lit, ArithmeticOp};
    use crate::types::{Column, DataType, Schema};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .create_table(
                "t",
                Schema::new(vec![
                    Column::new("a", DataType::Integer),
                    Column::new("b", DataType::Integer),
                ]),
            )
            .unwrap();
        catalog.create_index("t_a", "t", &["a"]).unwrap();
        catalog.create_index("t_b_a", "t", &["b", "a"]).unwrap();
        catalog
    }

    fn apply(catalog: &Catalog, plan: &PlanNodeRef) -> Transformed {
        let estimator = SuffixCardinalityEstimator::default();
        OrderByAsIndexScan.apply(plan, &RewriteContext::new(catalog, &estimator))
    }

    fn sorted(catalog: &Catalog, order_bys: Vec<OrderBy>) -> PlanNodeRef {
        PhysicalBuilder::scan(catalog, "t")
            .unwrap()
            .sort(order_bys)
            .build()
    }

    #[test]
    fn test_single_column_sort() {
        let catalog = catalog();
        let result = apply(&catalog, &sorted(&catalog, vec![OrderBy::asc(col(0, 0))]));
        assert!(result.changed);
        match result.plan.as_ref() {
            PlanNode::IndexScan {
                index_name,
                pred_keys,
                ..
            } => {
                assert_eq!(index_name, "t_a");
                assert!(pred_keys.is_empty());
            }
            other => panic!("Expected IndexScan, got {}", other),
        }
    }

    #[test]
    fn test_composite_sort_matches_composite_index() {
        let catalog = catalog();
        let plan = sorted(
            &catalog,
            vec![OrderBy::asc(col(0, 1)), OrderBy::asc(col(0, 0))],
        );
        let result = apply(&catalog, &plan);
        assert!(matches!(
            result.plan.as_ref(),
            PlanNode::IndexScan { index_name, .. } if index_name == "t_b_a"
        ));
    }

    #[test]
    fn test_non_matching_sorts_are_noops() {
        let catalog = catalog();
        let cases = vec![
            vec![OrderBy::desc(col(0, 0))],
            vec![OrderBy::asc(col(0, 1))],
            vec![OrderBy::asc(col(0, 0)), OrderBy::asc(col(0, 1))],
            vec![OrderBy::asc(arith(ArithmeticOp::Add, col(0, 0), lit(1)))],
            vec![],
        ];
        for order_bys in cases {
            assert!(!apply(&catalog, &sorted(&catalog, order_bys)).changed);
        }
    }

    #[test]
    fn test_scan_filter_is_carried() {
        let catalog = catalog();
        let scan = Arc::new(PlanNode::SeqScan {
            schema: catalog.table("t").unwrap().schema.clone(),
            table_name: "t".to_string(),
            filter_predicate: Some(eq(col(0, 1), lit(2))),
        });
        let plan = PhysicalBuilder::from_plan(scan)
            .sort(vec![OrderBy::asc(col(0, 0))])
            .build();
        match apply(&catalog, &plan).plan.as_ref() {
            PlanNode::IndexScan {
                filter_predicate, ..
            } => assert_eq!(filter_predicate, &Some(eq(col(0, 1), lit(2)))),
            other => panic!("Expected IndexScan, got {}", other),
        }
    }
}
