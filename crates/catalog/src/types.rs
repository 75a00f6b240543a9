// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The closed type vocabulary used by catalog signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Argument and return types of catalog functions.
///
/// The names render lowercase so they collide with the engine-neutral type
/// names the shared analyzer already understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    Bool,
    Int64,
    Float32,
    Float64,
    Numeric,
    String,
    Bytes,
    Date,
    Timestamp,
    Interval,
    Json,
    Array,
    /// Polymorphic slot; matches any argument and defers return typing to
    /// the analyzer.
    Any,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Numeric => "numeric",
            DataType::String => "string",
            DataType::Bytes => "bytes",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::Interval => "interval",
            DataType::Json => "json",
            DataType::Array => "array",
            DataType::Any => "any",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercase_engine_neutral() {
        assert_eq!(DataType::Int64.to_string(), "int64");
        assert_eq!(DataType::Timestamp.to_string(), "timestamp");
        assert_eq!(DataType::Any.to_string(), "any");
    }
}
