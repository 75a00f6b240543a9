// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Function signatures and name handling.
//!
//! Names are stored exactly as seeded (dotted namespaces, original case);
//! every lookup canonicalizes both sides by lowercasing each dot-separated
//! segment, so `net.host`, `NET.HOST` and `Net.Host` all resolve to the
//! same entry while generated code can keep the seeded spelling.

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// Aggregate functions. This is a closed list: it gates both the
/// `is_aggregate` flag and the exclusion from `SAFE.` synthesis.
pub const AGGREGATE_FUNCTIONS: &[&str] = &[
    "AVG",
    "COUNT",
    "MAX",
    "MIN",
    "SUM",
    "STRING_AGG",
    "ARRAY_AGG",
    "BIT_AND",
    "BIT_OR",
    "BIT_XOR",
    "LOGICAL_AND",
    "LOGICAL_OR",
    "STDDEV",
    "STDDEV_POP",
    "STDDEV_SAMP",
    "VARIANCE",
    "VAR_POP",
    "VAR_SAMP",
];

/// Whether `name` (case-insensitive) is in the closed aggregate list.
pub fn is_aggregate(name: &str) -> bool {
    AGGREGATE_FUNCTIONS
        .iter()
        .any(|agg| agg.eq_ignore_ascii_case(name))
}

/// Lowercase each dot-separated segment of a function name.
pub fn canonical_name(name: &str) -> String {
    name.split('.')
        .map(|segment| segment.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(".")
}

/// One catalog entry: a function signature keyed by name and argument
/// tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Case-preserving dotted name as seeded.
    pub name: String,
    /// Ordered argument types; overloads differ by this tuple.
    pub args: Vec<DataType>,
    pub return_type: DataType,
    /// Whether the function may return NULL on non-null inputs.
    pub nullable: bool,
    pub is_aggregate: bool,
}

impl Function {
    /// New niladic function; the aggregate flag derives from the closed
    /// list above.
    pub fn new(name: impl Into<String>, return_type: DataType) -> Self {
        let name = name.into();
        let is_aggregate = is_aggregate(&name);
        Self {
            name,
            args: Vec::new(),
            return_type,
            nullable: false,
            is_aggregate,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = DataType>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The `SAFE.`-prefixed variant of this entry: identical signature,
    /// forced nullable.
    pub fn to_safe_variant(&self) -> Self {
        Self {
            name: format!("SAFE.{}", self.name),
            args: self.args.clone(),
            return_type: self.return_type,
            nullable: true,
            is_aggregate: self.is_aggregate,
        }
    }

    /// Whether this function matches the source spelling `name`.
    pub fn matches_name(&self, name: &str) -> bool {
        canonical_name(&self.name) == canonical_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_lowers_each_segment() {
        assert_eq!(canonical_name("NET.IPV4_TO_INT64"), "net.ipv4_to_int64");
        assert_eq!(canonical_name("Safe.Substr"), "safe.substr");
        assert_eq!(canonical_name("count"), "count");
    }

    #[test]
    fn aggregate_flag_derives_from_closed_list() {
        assert!(Function::new("SUM", DataType::Int64).is_aggregate);
        assert!(Function::new("sum", DataType::Int64).is_aggregate);
        assert!(!Function::new("SUBSTR", DataType::String).is_aggregate);
        // COUNT_IF is deliberately not in the aggregate exclusion list.
        assert!(!is_aggregate("COUNT_IF"));
    }

    #[test]
    fn safe_variant_keeps_signature_and_forces_nullable() {
        let base = Function::new("SUBSTR", DataType::String)
            .with_args([DataType::String, DataType::Int64]);
        let safe = base.to_safe_variant();
        assert_eq!(safe.name, "SAFE.SUBSTR");
        assert_eq!(safe.args, base.args);
        assert_eq!(safe.return_type, base.return_type);
        assert!(safe.nullable);
    }

    #[test]
    fn name_matching_is_case_insensitive_per_segment() {
        let f = Function::new("NET.HOST", DataType::String).with_args([DataType::String]);
        assert!(f.matches_name("net.host"));
        assert!(f.matches_name("Net.Host"));
        assert!(!f.matches_name("net.hostx"));
    }
}
