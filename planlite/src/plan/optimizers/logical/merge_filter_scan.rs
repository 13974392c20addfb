// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Push filters into sequential scans

use crate::plan::expression::Expression;
use crate::plan::node::{PlanNode, PlanNodeRef};
use crate::plan::optimizers::rule::{rewrite_nodes, RewriteContext, RewriteRule, Transformed};

/// Replaces `Filter -> SeqScan` with a scan carrying the filter predicate,
/// ANDed with any predicate the scan already has.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeFilterScan;

impl RewriteRule for MergeFilterScan {
    fn name(&self) -> &'static str {
        "MergeFilterScan"
    }

    fn description(&self) -> &'static str {
        "Push filter predicates into the sequential scan they filter"
    }

    fn apply(&self, plan: &PlanNodeRef, _ctx: &RewriteContext<'_>) -> Transformed {
        rewrite_nodes(plan, merge_filter_scan)
    }
}

fn merge_filter_scan(node: &PlanNode) -> Option<PlanNode> {
    let PlanNode::Filter {
        predicate, input, ..
    } = node
    else {
        return None;
    };

    let PlanNode::SeqScan {
        schema,
        table_name,
        filter_predicate,
    } = input.as_ref()
    else {
        return None;
    };

    Some(PlanNode::SeqScan {
        schema: schema.clone(),
        table_name: table_name.clone(),
        filter_predicate: Expression::and_optional(
            filter_predicate.clone(),
            Some(predicate.clone()),
        ),
    })
}
