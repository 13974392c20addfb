// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Expressions carried by plan nodes
//!
//! Column references are positional. `tuple_idx` selects the input tuple:
//! 0 is the only input of a unary node (or the left input of a join), 1 is
//! the right input of a join. `col_idx` is the position in that tuple.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
}

/// A scalar expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    ColumnRef {
        tuple_idx: usize,
        col_idx: usize,
    },
    Constant(Value),
    Comparison {
        op: ComparisonOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logic {
        op: LogicOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

/// Column reference into tuple `tuple_idx`
pub fn col(tuple_idx: usize, col_idx: usize) -> Expression {
    Expression::ColumnRef { tuple_idx, col_idx }
}

pub fn lit(value: impl Into<Value>) -> Expression {
    Expression::Constant(value.into())
}

pub fn null() -> Expression {
    Expression::Constant(Value::Null)
}

pub fn cmp(op: ComparisonOp, left: Expression, right: Expression) -> Expression {
    Expression::Comparison {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn eq(left: Expression, right: Expression) -> Expression {
    cmp(ComparisonOp::Equal, left, right)
}

pub fn and(left: Expression, right: Expression) -> Expression {
    Expression::Logic {
        op: LogicOp::And,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn or(left: Expression, right: Expression) -> Expression {
    Expression::Logic {
        op: LogicOp::Or,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn arith(op: ArithmeticOp, left: Expression, right: Expression) -> Expression {
    Expression::Arithmetic {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

impl Expression {
    /// The constant `true`, used as the predicate of a cross join
    pub fn true_constant() -> Self {
        Expression::Constant(Value::Boolean(true))
    }

    pub fn is_true_constant(&self) -> bool {
        matches!(self, Expression::Constant(Value::Boolean(true)))
    }

    /// Split a predicate into its top-level `AND` operands
    pub fn conjuncts(&self) -> Vec<&Expression> {
        match self {
            Expression::Logic {
                op: LogicOp::And,
                left,
                right,
            } => {
                let mut out = left.conjuncts();
                out.extend(right.conjuncts());
                out
            }
            other => vec![other],
        }
    }

    /// AND two optional predicates together, dropping trivial `true` operands
    pub fn and_optional(left: Option<Expression>, right: Option<Expression>) -> Option<Expression> {
        let left = left.filter(|e| !e.is_true_constant());
        let right = right.filter(|e| !e.is_true_constant());
        match (left, right) {
            (Some(l), Some(r)) => Some(and(l, r)),
            (Some(e), None) | (None, Some(e)) => Some(e),
            (None, None) => None,
        }
    }

    /// Rebuild the expression, replacing every column reference with
    /// `f(tuple_idx, col_idx)`
    pub fn map_columns<F>(&self, f: &F) -> Expression
    where
        F: Fn(usize, usize) -> Expression,
    {
        match self {
            Expression::ColumnRef { tuple_idx, col_idx } => f(*tuple_idx, *col_idx),
            Expression::Constant(v) => Expression::Constant(v.clone()),
            Expression::Comparison { op, left, right } => Expression::Comparison {
                op: *op,
                left: Box::new(left.map_columns(f)),
                right: Box::new(right.map_columns(f)),
            },
            Expression::Logic { op, left, right } => Expression::Logic {
                op: *op,
                left: Box::new(left.map_columns(f)),
                right: Box::new(right.map_columns(f)),
            },
            Expression::Arithmetic { op, left, right } => Expression::Arithmetic {
                op: *op,
                left: Box::new(left.map_columns(f)),
                right: Box::new(right.map_columns(f)),
            },
        }
    }

    /// Column reference as `(tuple_idx, col_idx)`, if this is one
    pub fn as_column_ref(&self) -> Option<(usize, usize)> {
        match self {
            Expression::ColumnRef { tuple_idx, col_idx } => Some((*tuple_idx, *col_idx)),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Expression::Constant(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::ColumnRef { tuple_idx, col_idx } => write!(f, "#{}.{}", tuple_idx, col_idx),
            Expression::Constant(v) => write!(f, "{}", v),
            Expression::Comparison { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::Logic { op, left, right } => {
                let op = match op {
                    LogicOp::And => "AND",
                    LogicOp::Or => "OR",
                };
                write!(f, "({} {} {})", left, op, right)
            }
            Expression::Arithmetic { op, left, right } => {
                let op = match op {
                    ArithmeticOp::Add => "+",
                    ArithmeticOp::Subtract => "-",
                    ArithmeticOp::Multiply => "*",
                };
                write!(f, "({} {} {})", left, op, right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjuncts_flatten_nested_and() {
        let a = eq(col(0, 0), lit(1));
        let b = eq(col(0, 1), lit(2));
        let c = or(eq(col(0, 2), lit(3)), eq(col(0, 2), lit(4)));
        let pred = and(a.clone(), and(b.clone(), c.clone()));
        assert_eq!(pred.conjuncts(), vec![&a, &b, &c]);
    }

    #[test]
    fn test_and_optional_drops_true() {
        let p = eq(col(0, 0), lit(1));
        assert_eq!(
            Expression::and_optional(Some(Expression::true_constant()), Some(p.clone())),
            Some(p.clone())
        );
        assert_eq!(Expression::and_optional(None, None), None);
        assert_eq!(
            Expression::and_optional(Some(p.clone()), Some(p.clone())),
            Some(and(p.clone(), p))
        );
    }

    #[test]
    fn test_map_columns_swaps_tuples() {
        let pred = eq(col(0, 1), col(1, 0));
        let swapped = pred.map_columns(&|t, c| col(1 - t, c));
        assert_eq!(swapped, eq(col(1, 1), col(0, 0)));
    }

    #[test]
    fn test_display() {
        let pred = and(eq(col(0, 1), lit("x")), lit(true));
        assert_eq!(pred.to_string(), "((#0.1 = 'x') AND true)");
    }
}
