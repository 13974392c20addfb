// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Replace filtered sequential scans with index point lookups

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::plan::expression::{ComparisonOp, Expression, LogicOp};
use crate::plan::node::{PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{transform_up, RewriteContext, RewriteRule, Transformed};
use crate::types::Value;

/// Converts a `SeqScan` whose filter contains `col = const` (or an `OR` chain
/// of such equalities on one column) as a top-level conjunct into an
/// `IndexScan` doing point lookups, when a single-column index on that
/// column exists.
///
/// The full original predicate stays on the index scan as a residual
/// filter. Lookup keys are deduplicated so `a = 1 OR a = 1` reads each row
/// once; `col = NULL` never matches and is not treated as a lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeqScanAsIndexScan;

impl RewriteRule for SeqScanAsIndexScan {
    fn name(&self) -> &'static str {
        "SeqScanAsIndexScan"
    }

    fn description(&self) -> &'static str {
        "Use index point lookups for equality-filtered scans"
    }

    fn apply(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> Transformed {
        transform_up(plan, &|node: &PlanNodeRef| {
            seq_scan_as_index_scan(node, ctx.catalog)
        })
    }
}

fn seq_scan_as_index_scan(node: &PlanNodeRef, catalog: &Catalog) -> Option<PlanNodeRef> {
    let PlanNode::SeqScan {
        schema,
        table_name,
        filter_predicate: Some(predicate),
    } = node.as_ref()
    else {
        return None;
    };

    predicate.conjuncts().into_iter().find_map(|conjunct| {
        let (column, keys) = point_lookup_keys(conjunct)?;
        let index = catalog.find_index(table_name, &[column])?;
        Some(Arc::new(PlanNode::IndexScan {
            schema: schema.clone(),
            table_name: table_name.clone(),
            index_name: index.name.clone(),
            filter_predicate: Some(predicate.clone()),
            pred_keys: keys.into_iter().collect(),
        }))
    })
}

/// Column and lookup keys of `#0.c = v` or `v = #0.c`, or of an `OR` of such
/// equalities that all name the same column
fn point_lookup_keys(expr: &Expression) -> Option<(usize, BTreeSet<Value>)> {
    match expr {
        Expression::Comparison {
            op: ComparisonOp::Equal,
            left,
            right,
        } => {
            let (column, value) = match (left.as_column_ref(), right.as_constant()) {
                (Some((0, c)), Some(v)) => (c, v),
                _ => match (right.as_column_ref(), left.as_constant()) {
                    (Some((0, c)), Some(v)) => (c, v),
                    _ => return None,
                },
            };
            if value.is_null() {
                return None;
            }
            Some((column, BTreeSet::from([value.clone()])))
        }
        Expression::Logic {
            op: LogicOp::Or,
            left,
            right,
        } => {
            let (left_col, mut keys) = point_lookup_keys(left)?;
            let (right_col, right_keys) = point_lookup_keys(right)?;
            if left_col != right_col {
                return None;
            }
            keys.extend(right_keys);
            Some((left_col, keys))
        }
        _ => None,
    }
}
