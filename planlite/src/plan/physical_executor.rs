// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Physical plan execution engine
//!
//! A straightforward, fully materializing interpreter for plan trees. It
//! exists so rewrites can be checked against real data: a plan and its
//! optimized form must produce the same rows.
//!
//! Index access reads the table rows grouped by key in key order, with row
//! ids ascending inside a key. Point lookups and index joins return rows in
//! row id order, which is the order a sequential scan would have produced.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, IndexInfo, TableInfo};
use crate::exec::{evaluate, passes, ExecutionError, Row};
use crate::plan::expression::Expression;
use crate::plan::node::{JoinType, OrderBy, OrderDirection, PlanNode, PlanNodeRef};
use crate::types::{Schema, Value};

/// Result of executing a plan
pub type ExecutionResult = Vec<Row>;

/// Physical plan executor
pub struct PhysicalExecutor<'a> {
    catalog: &'a Catalog,
}

impl<'a> PhysicalExecutor<'a> {
    /// Create a new physical executor
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Execute a plan and return its rows
    pub fn execute(&self, plan: &PlanNodeRef) -> Result<ExecutionResult, ExecutionError> {
        self.execute_node(plan)
    }

    fn execute_node(&self, node: &PlanNode) -> Result<ExecutionResult, ExecutionError> {
        match node {
            PlanNode::Values { rows, .. } => rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|expr| evaluate(expr, &[], None))
                        .collect::<Result<Row, _>>()
                })
                .collect(),

            PlanNode::SeqScan {
                table_name,
                filter_predicate,
                ..
            } => self.execute_seq_scan(table_name, filter_predicate.as_ref()),

            PlanNode::IndexScan {
                table_name,
                index_name,
                filter_predicate,
                pred_keys,
                ..
            } => self.execute_index_scan(
                table_name,
                index_name,
                filter_predicate.as_ref(),
                pred_keys,
            ),

            PlanNode::Filter {
                predicate, input, ..
            } => self.execute_filter(predicate, input),

            PlanNode::Projection {
                expressions, input, ..
            } => self.execute_project(expressions, input),

            PlanNode::NestedLoopJoin {
                join_type,
                predicate,
                left,
                right,
                ..
            } => self.execute_nested_loop_join(*join_type, predicate, left, right),

            PlanNode::NestedIndexJoin {
                join_type,
                key_predicate,
                inner_table,
                index_name,
                inner_schema,
                left,
                ..
            } => self.execute_nested_index_join(
                *join_type,
                key_predicate,
                inner_table,
                index_name,
                inner_schema,
                left,
            ),

            PlanNode::Sort {
                order_bys, input, ..
            } => self.execute_sort(order_bys, input),

            PlanNode::Limit { limit, input, .. } => {
                let rows = self.execute_node(input)?;
                Ok(rows.into_iter().take(*limit).collect())
            }
        }
    }

    fn table(&self, name: &str) -> Result<&'a TableInfo, ExecutionError> {
        self.catalog
            .table(name)
            .ok_or_else(|| ExecutionError::TableNotFound(name.to_string()))
    }

    fn index(&self, name: &str) -> Result<&'a IndexInfo, ExecutionError> {
        self.catalog
            .index(name)
            .ok_or_else(|| ExecutionError::IndexNotFound(name.to_string()))
    }

    fn execute_seq_scan(
        &self,
        table_name: &str,
        filter: Option<&Expression>,
    ) -> Result<ExecutionResult, ExecutionError> {
        let table = self.table(table_name)?;
        let mut results = Vec::new();
        for row in &table.rows {
            if Self::accepts(filter, row)? {
                results.push(row.clone());
            }
        }
        Ok(results)
    }

    fn execute_index_scan(
        &self,
        table_name: &str,
        index_name: &str,
        filter: Option<&Expression>,
        pred_keys: &[Value],
    ) -> Result<ExecutionResult, ExecutionError> {
        let table = self.table(table_name)?;
        let index = self.index(index_name)?;
        let entries = Self::build_index(table, index);

        let row_ids: Vec<usize> = if pred_keys.is_empty() {
            entries.into_values().flatten().collect()
        } else {
            let mut ids: Vec<usize> = pred_keys
                .iter()
                .filter(|key| !key.is_null())
                .filter_map(|key| entries.get(std::slice::from_ref(key)))
                .flatten()
                .copied()
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let mut results = Vec::new();
        for id in row_ids {
            let row = &table.rows[id];
            if Self::accepts(filter, row)? {
                results.push(row.clone());
            }
        }
        Ok(results)
    }

    fn execute_filter(
        &self,
        predicate: &Expression,
        input: &PlanNode,
    ) -> Result<ExecutionResult, ExecutionError> {
        let input_rows = self.execute_node(input)?;
        let mut results = Vec::new();

        for row in input_rows {
            if passes(predicate, &row, None)? {
                results.push(row);
            }
        }

        Ok(results)
    }

    fn execute_project(
        &self,
        expressions: &[Expression],
        input: &PlanNode,
    ) -> Result<ExecutionResult, ExecutionError> {
        let input_rows = self.execute_node(input)?;
        input_rows
            .iter()
            .map(|row| {
                expressions
                    .iter()
                    .map(|expr| evaluate(expr, row, None))
                    .collect::<Result<Row, _>>()
            })
            .collect()
    }

    fn execute_nested_loop_join(
        &self,
        join_type: JoinType,
        predicate: &Expression,
        left: &PlanNode,
        right: &PlanNode,
    ) -> Result<ExecutionResult, ExecutionError> {
        let left_rows = self.execute_node(left)?;
        let right_rows = self.execute_node(right)?;
        let right_width = right.schema().len();
        let mut results = Vec::new();

        for left_row in &left_rows {
            let mut matched = false;
            for right_row in &right_rows {
                if passes(predicate, left_row, Some(right_row.as_slice()))? {
                    matched = true;
                    results.push(Self::concat(left_row, right_row));
                }
            }
            if !matched && join_type == JoinType::Left {
                results.push(Self::pad_nulls(left_row, right_width));
            }
        }

        Ok(results)
    }

    fn execute_nested_index_join(
        &self,
        join_type: JoinType,
        key_predicate: &Expression,
        inner_table: &str,
        index_name: &str,
        inner_schema: &Schema,
        left: &PlanNode,
    ) -> Result<ExecutionResult, ExecutionError> {
        let left_rows = self.execute_node(left)?;
        let table = self.table(inner_table)?;
        let index = self.index(index_name)?;
        let entries = Self::build_index(table, index);
        let mut results = Vec::new();

        for left_row in &left_rows {
            let key = evaluate(key_predicate, left_row, None)?;
            let matches = if key.is_null() {
                None
            } else {
                entries.get(std::slice::from_ref(&key))
            };

            match matches {
                Some(ids) => {
                    for &id in ids {
                        results.push(Self::concat(left_row, &table.rows[id]));
                    }
                }
                None if join_type == JoinType::Left => {
                    results.push(Self::pad_nulls(left_row, inner_schema.len()));
                }
                None => {}
            }
        }

        Ok(results)
    }

    fn execute_sort(
        &self,
        order_bys: &[OrderBy],
        input: &PlanNode,
    ) -> Result<ExecutionResult, ExecutionError> {
        let input_rows = self.execute_node(input)?;

        let mut keyed = input_rows
            .into_iter()
            .map(|row| {
                let keys = order_bys
                    .iter()
                    .map(|o| evaluate(&o.expression, &row, None))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, ExecutionError>((keys, row))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Stable, so equal keys keep input order
        keyed.sort_by(|(a, _), (b, _)| {
            for ((a_val, b_val), order_by) in a.iter().zip(b).zip(order_bys) {
                let ordering = match order_by.direction {
                    OrderDirection::Asc => a_val.cmp(b_val),
                    OrderDirection::Desc => b_val.cmp(a_val),
                };
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });

        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    // ===== Helper Methods =====

    fn accepts(filter: Option<&Expression>, row: &[Value]) -> Result<bool, ExecutionError> {
        match filter {
            Some(predicate) => passes(predicate, row, None),
            None => Ok(true),
        }
    }

    /// Key -> row ids, row ids ascending within each key
    fn build_index(table: &TableInfo, index: &IndexInfo) -> BTreeMap<Vec<Value>, Vec<usize>> {
        let mut entries: BTreeMap<Vec<Value>, Vec<usize>> = BTreeMap::new();
        for (id, row) in table.rows.iter().enumerate() {
            let key = index
                .key_columns
                .iter()
                .map(|&c| row.get(c).cloned().unwrap_or(Value::Null))
                .collect();
            entries.entry(key).or_default().push(id);
        }
        entries
    }

    fn concat(left: &[Value], right: &[Value]) -> Row {
        left.iter().chain(right).cloned().collect()
    }

    fn pad_nulls(left: &[Value], width: usize) -> Row {
        left.iter()
            .cloned()
            .chain(std::iter::repeat(Value::Null).take(width))
            .collect()
    }
}
