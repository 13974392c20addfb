// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use planlite::exec::Row;
use planlite::types::Column;
use planlite::{Catalog, DataType, PhysicalBuilder, PhysicalExecutor, PlanNodeRef, Schema, Value};

fn int(v: i64) -> Value {
    Value::Integer(v)
}

fn text(v: &str) -> Value {
    Value::from(v)
}

/// Catalog with three tables whose names follow the cardinality convention.
///
/// - `users_1k(id, name, age)` indexed on `id`, `age` and `(age, id)`
/// - `orders_10k(id, user_id, amount)` indexed on `id` and `user_id`
/// - `tags_100(tag, user_id)` without indexes
///
/// Key columns contain NULLs and duplicates on purpose.
pub fn fixture_catalog() -> Arc<Catalog> {
    let mut catalog = Catalog::new();

    catalog
        .create_table(
            "users_1k",
            Schema::new(vec![
                Column::new("id", DataType::Integer),
                Column::new("name", DataType::Varchar),
                Column::new("age", DataType::Integer),
            ]),
        )
        .expect("create users_1k");
    catalog
        .insert_rows(
            "users_1k",
            vec![
                vec![int(1), text("ann"), int(30)],
                vec![int(2), text("bob"), int(25)],
                vec![int(3), text("cy"), Value::Null],
                vec![int(4), text("dee"), int(30)],
                vec![int(5), text("eve"), int(41)],
                vec![int(6), text("fay"), int(25)],
                vec![int(7), text("gus"), int(19)],
                vec![int(3), text("cyd"), int(33)],
            ],
        )
        .expect("insert users_1k");

    catalog
        .create_table(
            "orders_10k",
            Schema::new(vec![
                Column::new("id", DataType::Integer),
                Column::new("user_id", DataType::Integer),
                Column::new("amount", DataType::Integer),
            ]),
        )
        .expect("create orders_10k");
    catalog
        .insert_rows(
            "orders_10k",
            vec![
                vec![int(10), int(1), int(100)],
                vec![int(11), int(2), int(250)],
                vec![int(12), int(1), int(75)],
                vec![int(13), Value::Null, int(60)],
                vec![int(14), int(5), int(500)],
                vec![int(15), int(9), int(20)],
                vec![int(16), int(3), int(300)],
                vec![int(17), int(4), Value::Null],
            ],
        )
        .expect("insert orders_10k");

    catalog
        .create_table(
            "tags_100",
            Schema::new(vec![
                Column::new("tag", DataType::Varchar),
                Column::new("user_id", DataType::Integer),
            ]),
        )
        .expect("create tags_100");
    catalog
        .insert_rows(
            "tags_100",
            vec![
                vec![text("x"), int(1)],
                vec![text("y"), int(3)],
                vec![text("z"), Value::Null],
            ],
        )
        .expect("insert tags_100");

    catalog.create_index("users_id", "users_1k", &["id"]).expect("users_id");
    catalog.create_index("users_age", "users_1k", &["age"]).expect("users_age");
    catalog
        .create_index("users_age_id", "users_1k", &["age", "id"])
        .expect("users_age_id");
    catalog.create_index("orders_id", "orders_10k", &["id"]).expect("orders_id");
    catalog
        .create_index("orders_user", "orders_10k", &["user_id"])
        .expect("orders_user");

    Arc::new(catalog)
}

pub fn scan(catalog: &Catalog, table: &str) -> PhysicalBuilder {
    PhysicalBuilder::scan(catalog, table).expect("table exists")
}

pub fn execute(catalog: &Catalog, plan: &PlanNodeRef) -> Vec<Row> {
    PhysicalExecutor::new(catalog)
        .execute(plan)
        .unwrap_or_else(|e| panic!("execution failed: {}\n{}", e, plan.explain()))
}

/// Assert both plans produce the same rows: as a sequence when the original
/// is ordered, as a multiset otherwise
pub fn assert_equivalent(catalog: &Catalog, original: &PlanNodeRef, rewritten: &PlanNodeRef) {
    assert_eq!(
        original.schema().column_types(),
        rewritten.schema().column_types(),
        "column types differ\noriginal:\n{}rewritten:\n{}",
        original.explain(),
        rewritten.explain()
    );

    let mut expected = execute(catalog, original);
    let mut actual = execute(catalog, rewritten);
    if !original.is_ordered() {
        expected.sort();
        actual.sort();
    }
    assert_eq!(
        expected,
        actual,
        "results differ\noriginal:\n{}rewritten:\n{}",
        original.explain(),
        rewritten.explain()
    );
}
