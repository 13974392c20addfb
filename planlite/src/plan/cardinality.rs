// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Table cardinality estimation
//!
//! There is no statistics subsystem, so table sizes are inferred from a
//! naming convention: a table called `orders_10k` is assumed to hold about
//! 10,000 rows. Rules that make size-based decisions (join reordering) go
//! through the [`CardinalityEstimator`] trait so a real statistics catalog
//! can replace the convention without touching them.

use std::fmt;

/// Source of estimated table sizes
pub trait CardinalityEstimator: Send + Sync + fmt::Debug {
    /// Estimated row count of `table_name`, or `None` when nothing is known.
    /// `None` never means zero.
    fn estimated_cardinality(&self, table_name: &str) -> Option<usize>;
}

/// Suffix table used by the naming convention, checked in order
pub const CARDINALITY_SUFFIXES: [(&str, usize); 6] = [
    ("_1m", 1_000_000),
    ("_100k", 100_000),
    ("_50k", 50_000),
    ("_10k", 10_000),
    ("_1k", 1_000),
    ("_100", 100),
];

/// Estimated cardinality of a table under the default naming convention
pub fn estimated_cardinality(table_name: &str) -> Option<usize> {
    CARDINALITY_SUFFIXES
        .iter()
        .find(|(suffix, _)| table_name.ends_with(suffix))
        .map(|(_, rows)| *rows)
}

/// Estimator that matches table names against an ordered suffix list.
/// The first matching suffix wins; matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixCardinalityEstimator {
    suffixes: Vec<(String, usize)>,
}

impl SuffixCardinalityEstimator {
    /// Estimator with a custom suffix list
    pub fn with_suffixes<S: Into<String>>(suffixes: Vec<(S, usize)>) -> Self {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|(suffix, rows)| (suffix.into(), rows))
                .collect(),
        }
    }
}

impl Default for SuffixCardinalityEstimator {
    fn default() -> Self {
        Self::with_suffixes(CARDINALITY_SUFFIXES.to_vec())
    }
}

impl CardinalityEstimator for SuffixCardinalityEstimator {
    fn estimated_cardinality(&self, table_name: &str) -> Option<usize> {
        self.suffixes
            .iter()
            .find(|(suffix, _)| table_name.ends_with(suffix.as_str()))
            .map(|(_, rows)| *rows)
    }
}
