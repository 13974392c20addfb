// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Value and schema types shared by plans, the catalog and the executor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Integer,
    Varchar,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Varchar => write!(f, "VARCHAR"),
        }
    }
}

/// A single SQL value.
///
/// Values are totally ordered with `Null` sorting first, so they can be used
/// directly as index keys. Comparisons with SQL semantics (where `NULL`
/// compared with anything is unknown) live in the executor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Varchar(String),
}

impl Value {
    /// Data type of a non-null value
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Integer(_) => Some(DataType::Integer),
            Value::Varchar(_) => Some(DataType::Varchar),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True only for `Boolean(true)`; `NULL` and `false` both reject a row
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Boolean(true))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Varchar(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Varchar(v.to_string())
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Output schema of a table or a plan node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    /// Position of the first column with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_types(&self) -> Vec<DataType> {
        self.columns.iter().map(|c| c.data_type).collect()
    }

    /// Schema of a join output: left columns followed by right columns
    pub fn join(left: &Schema, right: &Schema) -> Schema {
        let mut columns = left.columns.clone();
        columns.extend(right.columns.iter().cloned());
        Schema { columns }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.data_type))
            .collect();
        write!(f, "({})", cols.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sorts_first() {
        let mut values = vec![Value::Integer(3), Value::Null, Value::Integer(-1)];
        values.sort();
        assert_eq!(
            values,
            vec![Value::Null, Value::Integer(-1), Value::Integer(3)]
        );
    }

    #[test]
    fn test_join_schema_concatenates() {
        let left = Schema::new(vec![Column::new("a", DataType::Integer)]);
        let right = Schema::new(vec![
            Column::new("b", DataType::Varchar),
            Column::new("c", DataType::Boolean),
        ]);
        let joined = Schema::join(&left, &right);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.index_of("c"), Some(2));
        assert_eq!(
            joined.column_types(),
            vec![DataType::Integer, DataType::Varchar, DataType::Boolean]
        );
    }

    #[test]
    fn test_value_json_is_untagged() {
        let row: Vec<Value> = serde_json::from_str(r#"[1, "x", true, null]"#).unwrap();
        assert_eq!(
            row,
            vec![
                Value::Integer(1),
                Value::Varchar("x".to_string()),
                Value::Boolean(true),
                Value::Null
            ]
        );
    }
}
