// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Physical plan builder
//!
//! Fluent construction of plan trees. The builder derives every node's
//! output schema from its input so callers only supply expressions.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::plan::expression::Expression;
use crate::plan::node::{JoinType, OrderBy, PlanNode, PlanNodeRef};
use crate::plan::PlanningError;
use crate::types::{Column, DataType, Schema, Value};

/// Builder for physical plans
#[derive(Debug, Clone)]
pub struct PhysicalBuilder {
    root: PlanNodeRef,
}

impl PhysicalBuilder {
    /// Start from a sequential scan of a catalog table
    pub fn scan(catalog: &Catalog, table_name: &str) -> Result<Self, PlanningError> {
        let table = catalog
            .table(table_name)
            .ok_or_else(|| PlanningError::UnknownTable(table_name.to_string()))?;
        Ok(Self::from_node(PlanNode::SeqScan {
            schema: table.schema.clone(),
            table_name: table_name.to_string(),
            filter_predicate: None,
        }))
    }

    /// Start from literal rows
    pub fn values(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Expression::Constant).collect())
            .collect();
        Self::from_node(PlanNode::Values { schema, rows })
    }

    pub fn from_plan(plan: PlanNodeRef) -> Self {
        Self { root: plan }
    }

    fn from_node(node: PlanNode) -> Self {
        Self {
            root: Arc::new(node),
        }
    }

    fn schema(&self) -> &Schema {
        self.root.schema()
    }

    pub fn filter(self, predicate: Expression) -> Self {
        let schema = self.schema().clone();
        Self::from_node(PlanNode::Filter {
            schema,
            predicate,
            input: self.root,
        })
    }

    /// Project expressions, naming column references after their source
    /// column and everything else `expr_<position>`
    pub fn project(self, expressions: Vec<Expression>) -> Result<Self, PlanningError> {
        let mut columns = Vec::with_capacity(expressions.len());
        for (i, expr) in expressions.iter().enumerate() {
            let data_type = infer_type(expr, self.schema())?;
            let name = match expr.as_column_ref() {
                Some((_, c)) => self
                    .schema()
                    .column(c)
                    .map(|col| col.name.clone())
                    .unwrap_or_else(|| format!("expr_{}", i)),
                None => format!("expr_{}", i),
            };
            columns.push(Column::new(name, data_type));
        }
        Ok(self.project_with_schema(expressions, Schema::new(columns)))
    }

    /// Project expressions with an explicit output schema
    pub fn project_with_schema(self, expressions: Vec<Expression>, schema: Schema) -> Self {
        Self::from_node(PlanNode::Projection {
            schema,
            expressions,
            input: self.root,
        })
    }

    pub fn join(self, right: PhysicalBuilder, join_type: JoinType, predicate: Expression) -> Self {
        let schema = Schema::join(self.schema(), right.schema());
        Self::from_node(PlanNode::NestedLoopJoin {
            schema,
            join_type,
            predicate,
            left: self.root,
            right: right.root,
        })
    }

    /// Cross product, expressed as an inner join on `true`
    pub fn cross_join(self, right: PhysicalBuilder) -> Self {
        self.join(right, JoinType::Inner, Expression::true_constant())
    }

    pub fn sort(self, order_bys: Vec<OrderBy>) -> Self {
        let schema = self.schema().clone();
        Self::from_node(PlanNode::Sort {
            schema,
            order_bys,
            input: self.root,
        })
    }

    pub fn limit(self, limit: usize) -> Self {
        let schema = self.schema().clone();
        Self::from_node(PlanNode::Limit {
            schema,
            limit,
            input: self.root,
        })
    }

    pub fn build(self) -> PlanNodeRef {
        self.root
    }
}

/// Result type of an expression over a single input schema
pub fn infer_type(expr: &Expression, input: &Schema) -> Result<DataType, PlanningError> {
    match expr {
        Expression::ColumnRef { col_idx, .. } => input
            .column(*col_idx)
            .map(|c| c.data_type)
            .ok_or(PlanningError::ColumnOutOfRange {
                index: *col_idx,
                width: input.len(),
            }),
        // untyped NULL is treated as an integer
        Expression::Constant(v) => Ok(v.data_type().unwrap_or(DataType::Integer)),
        Expression::Comparison { .. } | Expression::Logic { .. } => Ok(DataType::Boolean),
        Expression::Arithmetic { .. } => Ok(DataType::Integer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::expression::{col, eq, lit};
    use crate::types::Column;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .create_table(
                "t",
                Schema::new(vec![
                    Column::new("a", DataType::Integer),
                    Column::new("b", DataType::Varchar),
                ]),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_build_simple_scan() {
        let plan = PhysicalBuilder::scan(&catalog(), "t").unwrap().build();
        match plan.as_ref() {
            PlanNode::SeqScan { table_name, .. } => assert_eq!(table_name, "t"),
            _ => panic!("Expected SeqScan node"),
        }
    }

    #[test]
    fn test_unknown_table() {
        let err = PhysicalBuilder::scan(&catalog(), "nope").unwrap_err();
        assert!(matches!(err, PlanningError::UnknownTable(name) if name == "nope"));
    }

    #[test]
    fn test_project_infers_names_and_types() {
        let plan = PhysicalBuilder::scan(&catalog(), "t")
            .unwrap()
            .project(vec![col(0, 1), eq(col(0, 0), lit(1))])
            .unwrap()
            .build();
        let schema = plan.schema();
        assert_eq!(schema.columns[0], Column::new("b", DataType::Varchar));
        assert_eq!(schema.columns[1], Column::new("expr_1", DataType::Boolean));
    }

    #[test]
    fn test_project_out_of_range_column() {
        let err = PhysicalBuilder::scan(&catalog(), "t")
            .unwrap()
            .project(vec![col(0, 5)])
            .unwrap_err();
        assert!(matches!(
            err,
            PlanningError::ColumnOutOfRange { index: 5, width: 2 }
        ));
    }

    #[test]
    fn test_join_schema() {
        let c = catalog();
        let plan = PhysicalBuilder::scan(&c, "t")
            .unwrap()
            .cross_join(PhysicalBuilder::scan(&c, "t").unwrap())
            .build();
        assert_eq!(plan.schema().len(), 4);
    }
}
