// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Loading catalogs, plans and optimizer configuration from disk

use std::fs;
use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;

use planlite::plan::optimizer::FORCE_STARTER_RULE_ENV;
use planlite::{
    plan_from_json_str, plan_from_path, Catalog, ConfigError, OptimizationStrategy, Optimizer,
    OptimizerConfig, PhysicalExecutor, PlanNode, Value,
};

const CATALOG_JSON: &str = r#"{
  "tables": [
    {
      "name": "items_100",
      "schema": {
        "columns": [
          { "name": "id", "data_type": "Integer" },
          { "name": "label", "data_type": "Varchar" }
        ]
      },
      "rows": [[1, "one"], [2, "two"], [3, null]]
    }
  ],
  "indexes": [
    { "name": "items_id", "table": "items_100", "key_columns": ["id"] }
  ]
}"#;

const PLAN_JSON: &str = r#"{
  "type": "Filter",
  "schema": {
    "columns": [
      { "name": "id", "data_type": "Integer" },
      { "name": "label", "data_type": "Varchar" }
    ]
  },
  "predicate": {
    "Comparison": {
      "op": "Equal",
      "left": { "ColumnRef": { "tuple_idx": 0, "col_idx": 0 } },
      "right": { "Constant": 2 }
    }
  },
  "input": {
    "type": "SeqScan",
    "schema": {
      "columns": [
        { "name": "id", "data_type": "Integer" },
        { "name": "label", "data_type": "Varchar" }
      ]
    },
    "table_name": "items_100",
    "filter_predicate": null
  }
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn test_load_catalog_and_plan_from_files() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::from_path(write(&dir, "catalog.json", CATALOG_JSON)).unwrap();
    let plan = plan_from_path(write(&dir, "plan.json", PLAN_JSON)).unwrap();

    let table = catalog.table("items_100").unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[2][1], Value::Null);
    assert_eq!(catalog.index("items_id").unwrap().key_columns, vec![0]);

    let catalog = Arc::new(catalog);
    let optimizer = Optimizer::new(Arc::clone(&catalog), OptimizerConfig::default());
    let optimized = optimizer.optimize(&plan);
    assert!(matches!(optimized.as_ref(), PlanNode::IndexScan { .. }));

    let rows = PhysicalExecutor::new(&catalog).execute(&optimized).unwrap();
    assert_eq!(rows, vec![vec![Value::Integer(2), Value::from("two")]]);
}

#[test]
fn test_plan_json_round_trip() {
    let plan = plan_from_json_str(PLAN_JSON).unwrap();
    let json = serde_json::to_string(plan.as_ref()).unwrap();
    assert_eq!(plan_from_json_str(&json).unwrap(), plan);
}

#[test]
fn test_load_errors() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        Catalog::from_path(dir.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
    assert!(matches!(
        plan_from_path(write(&dir, "bad.json", "{ not json")),
        Err(ConfigError::Json(_))
    ));

    let bad_index = CATALOG_JSON.replace(r#"["id"]"#, r#"["nope"]"#);
    assert!(matches!(
        Catalog::from_json_str(&bad_index),
        Err(ConfigError::Catalog(_))
    ));
}

#[test]
fn test_load_optimizer_config() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "optimizer.json",
        r#"{ "force_starter_rule": false, "enable_trace": true }"#,
    );
    let config = OptimizerConfig::from_path(path).unwrap();
    assert_eq!(config.strategy(), OptimizationStrategy::Custom);
    assert!(config.enable_trace);
}

#[test]
#[serial]
fn test_env_override_selects_custom_strategy() {
    std::env::set_var(FORCE_STARTER_RULE_ENV, "false");
    let config = OptimizerConfig::default().with_env_overrides();
    std::env::remove_var(FORCE_STARTER_RULE_ENV);

    assert_eq!(config.strategy(), OptimizationStrategy::Custom);
}

#[test]
#[serial]
fn test_invalid_env_override_is_ignored() {
    std::env::set_var(FORCE_STARTER_RULE_ENV, "maybe");
    let config = OptimizerConfig::default().with_env_overrides();
    std::env::remove_var(FORCE_STARTER_RULE_ENV);

    assert_eq!(config.strategy(), OptimizationStrategy::Starter);

    let config = OptimizerConfig::default().with_env_overrides();
    assert!(config.force_starter_rule);
}
