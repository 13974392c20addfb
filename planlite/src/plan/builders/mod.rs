// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Query plan builders

pub mod physical_builder;

pub use physical_builder::{infer_type, PhysicalBuilder};
