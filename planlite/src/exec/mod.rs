// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Expression evaluation
//!
//! Evaluation follows SQL three-valued logic: a comparison involving `NULL`
//! is unknown (`NULL`), `AND`/`OR` absorb unknowns where the other side
//! decides the result, and a filter keeps a row only when its predicate is
//! `TRUE`.

pub mod error;

use std::cmp::Ordering;

pub use error::ExecutionError;

use crate::plan::expression::{ArithmeticOp, ComparisonOp, Expression, LogicOp};
use crate::types::{DataType, Value};

/// A tuple of values, positionally matching a schema
pub type Row = Vec<Value>;

/// Evaluate `expr` against a left tuple and, inside joins, a right tuple
pub fn evaluate(
    expr: &Expression,
    left: &[Value],
    right: Option<&[Value]>,
) -> Result<Value, ExecutionError> {
    match expr {
        Expression::Constant(value) => Ok(value.clone()),

        Expression::ColumnRef { tuple_idx, col_idx } => {
            let tuple = match tuple_idx {
                0 => left,
                1 => right.ok_or(ExecutionError::MissingRightTuple)?,
                _ => {
                    return Err(ExecutionError::ColumnOutOfRange {
                        tuple_idx: *tuple_idx,
                        col_idx: *col_idx,
                    })
                }
            };
            tuple
                .get(*col_idx)
                .cloned()
                .ok_or(ExecutionError::ColumnOutOfRange {
                    tuple_idx: *tuple_idx,
                    col_idx: *col_idx,
                })
        }

        Expression::Comparison { op, left: l, right: r } => {
            let l = evaluate(l, left, right)?;
            let r = evaluate(r, left, right)?;
            compare(*op, &l, &r)
        }

        Expression::Logic { op, left: l, right: r } => {
            let l = as_truth(evaluate(l, left, right)?)?;
            let r = as_truth(evaluate(r, left, right)?)?;
            let result = match op {
                LogicOp::And => match (l, r) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                },
                LogicOp::Or => match (l, r) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                },
            };
            Ok(result.map_or(Value::Null, Value::Boolean))
        }

        Expression::Arithmetic { op, left: l, right: r } => {
            let l = evaluate(l, left, right)?;
            let r = evaluate(r, left, right)?;
            arithmetic(*op, &l, &r)
        }
    }
}

/// Whether `predicate` accepts the given tuples
pub fn passes(
    predicate: &Expression,
    left: &[Value],
    right: Option<&[Value]>,
) -> Result<bool, ExecutionError> {
    Ok(evaluate(predicate, left, right)?.is_true())
}

fn as_truth(value: Value) -> Result<Option<bool>, ExecutionError> {
    match value {
        Value::Null => Ok(None),
        Value::Boolean(b) => Ok(Some(b)),
        other => Err(ExecutionError::UnexpectedType {
            expected: DataType::Boolean,
            actual: other.to_string(),
        }),
    }
}

fn compare(op: ComparisonOp, left: &Value, right: &Value) -> Result<Value, ExecutionError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    if left.data_type() != right.data_type() {
        return Err(ExecutionError::TypeMismatch {
            op: format!("{:?}", op),
            left: left.to_string(),
            right: right.to_string(),
        });
    }

    let ordering = left.cmp(right);
    let result = match op {
        ComparisonOp::Equal => ordering == Ordering::Equal,
        ComparisonOp::NotEqual => ordering != Ordering::Equal,
        ComparisonOp::LessThan => ordering == Ordering::Less,
        ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
        ComparisonOp::GreaterThan => ordering == Ordering::Greater,
        ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
    };
    Ok(Value::Boolean(result))
}

fn arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Result<Value, ExecutionError> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
        (Value::Integer(a), Value::Integer(b)) => {
            let result = match op {
                ArithmeticOp::Add => a.checked_add(*b),
                ArithmeticOp::Subtract => a.checked_sub(*b),
                ArithmeticOp::Multiply => a.checked_mul(*b),
            };
            result
                .map(Value::Integer)
                .ok_or(ExecutionError::ArithmeticOverflow)
        }
        _ => Err(ExecutionError::TypeMismatch {
            op: format!("{:?}", op),
            left: left.to_string(),
            right: right.to_string(),
        }),
    }
}
