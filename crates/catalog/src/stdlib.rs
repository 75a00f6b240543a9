// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Spanner standard-library seed.
//!
//! Inventory follows the GoogleSQL function reference: math, string,
//! date/time, array, aggregate, conditional, JSON, hash/encoding, window,
//! bit and `NET.` functions, plus the `SAFE_*` arithmetic family. Numeric
//! polymorphism is expressed as one entry per argument-type tuple.
//!
//! `SAFE.` variants are *not* listed here; they are synthesized over this
//! seed at catalog construction time.

use crate::function::Function;
use crate::types::DataType as T;

/// The seeded (pre-`SAFE.`-synthesis) Spanner function set.
pub fn spanner_functions() -> Vec<Function> {
    let mut funcs = Vec::new();

    // Math
    for ty in [T::Int64, T::Float64, T::Numeric] {
        funcs.push(Function::new("ABS", ty).with_args([ty]));
    }
    funcs.push(Function::new("CEIL", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("CEIL", T::Numeric).with_args([T::Numeric]));
    funcs.push(Function::new("CEILING", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("FLOOR", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("FLOOR", T::Numeric).with_args([T::Numeric]));
    funcs.push(Function::new("ROUND", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("ROUND", T::Float64).with_args([T::Float64, T::Int64]));
    funcs.push(Function::new("SQRT", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("POW", T::Float64).with_args([T::Float64, T::Float64]));
    funcs.push(Function::new("POWER", T::Float64).with_args([T::Float64, T::Float64]));
    funcs.push(Function::new("MOD", T::Int64).with_args([T::Int64, T::Int64]));
    funcs.push(Function::new("LOG", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("LOG", T::Float64).with_args([T::Float64, T::Float64]));
    funcs.push(Function::new("LOG10", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("EXP", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("SIGN", T::Int64).with_args([T::Int64]));
    funcs.push(Function::new("SIGN", T::Int64).with_args([T::Float64]));
    funcs.push(Function::new("GREATEST", T::Any).with_args([T::Any]));
    funcs.push(Function::new("LEAST", T::Any).with_args([T::Any]));

    // SAFE_* arithmetic: nullable by definition, one entry per numeric type.
    for ty in [T::Int64, T::Float64, T::Numeric] {
        for name in ["SAFE_ADD", "SAFE_SUBTRACT", "SAFE_MULTIPLY", "SAFE_DIVIDE"] {
            funcs.push(Function::new(name, ty).with_args([ty, ty]).nullable());
        }
        funcs.push(Function::new("SAFE_NEGATE", ty).with_args([ty]).nullable());
    }

    // String
    funcs.push(Function::new("CONCAT", T::String).with_args([T::String, T::String]));
    funcs.push(Function::new("LENGTH", T::Int64).with_args([T::String]));
    funcs.push(Function::new("LENGTH", T::Int64).with_args([T::Bytes]));
    funcs.push(Function::new("BYTE_LENGTH", T::Int64).with_args([T::String]));
    funcs.push(Function::new("CHAR_LENGTH", T::Int64).with_args([T::String]));
    funcs.push(Function::new("LOWER", T::String).with_args([T::String]));
    funcs.push(Function::new("UPPER", T::String).with_args([T::String]));
    funcs.push(Function::new("SUBSTR", T::String).with_args([T::String, T::Int64]));
    funcs.push(Function::new("SUBSTR", T::String).with_args([T::String, T::Int64, T::Int64]));
    for name in ["TRIM", "LTRIM", "RTRIM"] {
        funcs.push(Function::new(name, T::String).with_args([T::String]));
        funcs.push(Function::new(name, T::String).with_args([T::String, T::String]));
    }
    funcs.push(Function::new("REPLACE", T::String).with_args([T::String, T::String, T::String]));
    funcs.push(Function::new("SPLIT", T::Array).with_args([T::String, T::String]));
    funcs.push(Function::new("STARTS_WITH", T::Bool).with_args([T::String, T::String]));
    funcs.push(Function::new("ENDS_WITH", T::Bool).with_args([T::String, T::String]));
    funcs.push(Function::new("STRPOS", T::Int64).with_args([T::String, T::String]));
    funcs.push(Function::new("REVERSE", T::String).with_args([T::String]));
    funcs.push(Function::new("REPEAT", T::String).with_args([T::String, T::Int64]));
    funcs.push(Function::new("LPAD", T::String).with_args([T::String, T::Int64, T::String]));
    funcs.push(Function::new("RPAD", T::String).with_args([T::String, T::Int64, T::String]));
    funcs.push(Function::new("FORMAT", T::String).with_args([T::String]));
    funcs.push(Function::new("REGEXP_CONTAINS", T::Bool).with_args([T::String, T::String]));
    funcs.push(
        Function::new("REGEXP_EXTRACT", T::String)
            .with_args([T::String, T::String])
            .nullable(),
    );
    funcs.push(Function::new("REGEXP_EXTRACT_ALL", T::Array).with_args([T::String, T::String]));
    funcs.push(
        Function::new("REGEXP_REPLACE", T::String).with_args([T::String, T::String, T::String]),
    );

    // Date/time
    funcs.push(Function::new("CURRENT_DATE", T::Date));
    funcs.push(Function::new("CURRENT_TIMESTAMP", T::Timestamp));
    funcs.push(Function::new("DATE", T::Date).with_args([T::Timestamp]));
    funcs.push(Function::new("DATE", T::Date).with_args([T::Int64, T::Int64, T::Int64]));
    funcs.push(Function::new("TIMESTAMP", T::Timestamp).with_args([T::String]));
    funcs.push(Function::new("EXTRACT", T::Int64).with_args([T::Any, T::Date]));
    funcs.push(Function::new("EXTRACT", T::Int64).with_args([T::Any, T::Timestamp]));
    funcs.push(Function::new("DATE_ADD", T::Date).with_args([T::Date, T::Interval]));
    funcs.push(Function::new("DATE_SUB", T::Date).with_args([T::Date, T::Interval]));
    funcs.push(Function::new("DATE_DIFF", T::Int64).with_args([T::Date, T::Date, T::Any]));
    funcs.push(Function::new("DATE_TRUNC", T::Date).with_args([T::Date, T::Any]));
    funcs.push(Function::new("TIMESTAMP_ADD", T::Timestamp).with_args([T::Timestamp, T::Interval]));
    funcs.push(Function::new("TIMESTAMP_SUB", T::Timestamp).with_args([T::Timestamp, T::Interval]));
    funcs.push(
        Function::new("TIMESTAMP_DIFF", T::Int64).with_args([T::Timestamp, T::Timestamp, T::Any]),
    );
    funcs.push(Function::new("TIMESTAMP_TRUNC", T::Timestamp).with_args([T::Timestamp, T::Any]));
    funcs.push(Function::new("FORMAT_DATE", T::String).with_args([T::String, T::Date]));
    funcs.push(Function::new("FORMAT_TIMESTAMP", T::String).with_args([T::String, T::Timestamp]));
    funcs.push(Function::new("PARSE_DATE", T::Date).with_args([T::String, T::String]));
    funcs.push(Function::new("PARSE_TIMESTAMP", T::Timestamp).with_args([T::String, T::String]));
    funcs.push(Function::new("UNIX_SECONDS", T::Int64).with_args([T::Timestamp]));
    funcs.push(Function::new("UNIX_MILLIS", T::Int64).with_args([T::Timestamp]));
    funcs.push(Function::new("TIMESTAMP_SECONDS", T::Timestamp).with_args([T::Int64]));
    funcs.push(Function::new("TIMESTAMP_MILLIS", T::Timestamp).with_args([T::Int64]));

    // Array
    funcs.push(Function::new("ARRAY_LENGTH", T::Int64).with_args([T::Array]));
    funcs.push(Function::new("ARRAY_TO_STRING", T::String).with_args([T::Array, T::String]));
    funcs.push(Function::new("ARRAY_CONCAT", T::Array).with_args([T::Array]));
    funcs.push(Function::new("ARRAY_REVERSE", T::Array).with_args([T::Array]));
    funcs.push(Function::new("ARRAY_FIRST", T::Any).with_args([T::Array]));
    funcs.push(Function::new("ARRAY_LAST", T::Any).with_args([T::Array]));
    funcs.push(Function::new("ARRAY_INCLUDES", T::Bool).with_args([T::Array, T::Any]));
    funcs.push(Function::new("GENERATE_ARRAY", T::Array).with_args([T::Int64, T::Int64]));

    // Aggregates
    funcs.push(Function::new("COUNT", T::Int64).with_args([T::Any]));
    funcs.push(Function::new("SUM", T::Int64).with_args([T::Int64]));
    funcs.push(Function::new("SUM", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("SUM", T::Numeric).with_args([T::Numeric]));
    funcs.push(Function::new("AVG", T::Float64).with_args([T::Int64]));
    funcs.push(Function::new("AVG", T::Float64).with_args([T::Float64]));
    funcs.push(Function::new("AVG", T::Numeric).with_args([T::Numeric]));
    funcs.push(Function::new("MIN", T::Any).with_args([T::Any]));
    funcs.push(Function::new("MAX", T::Any).with_args([T::Any]));
    funcs.push(Function::new("STRING_AGG", T::String).with_args([T::String]));
    funcs.push(Function::new("STRING_AGG", T::String).with_args([T::String, T::String]));
    funcs.push(Function::new("ARRAY_AGG", T::Array).with_args([T::Any]));
    funcs.push(Function::new("COUNT_IF", T::Int64).with_args([T::Bool]));
    funcs.push(Function::new("LOGICAL_AND", T::Bool).with_args([T::Bool]));
    funcs.push(Function::new("LOGICAL_OR", T::Bool).with_args([T::Bool]));
    for name in ["STDDEV", "STDDEV_POP", "STDDEV_SAMP", "VARIANCE", "VAR_POP", "VAR_SAMP"] {
        funcs.push(Function::new(name, T::Float64).with_args([T::Float64]));
    }

    // Type conversion
    funcs.push(Function::new("CAST", T::Any).with_args([T::Any]));
    funcs.push(Function::new("SAFE_CAST", T::Any).with_args([T::Any]).nullable());

    // Conditional
    funcs.push(Function::new("IF", T::Any).with_args([T::Bool, T::Any, T::Any]));
    funcs.push(Function::new("IFNULL", T::Any).with_args([T::Any, T::Any]));
    funcs.push(Function::new("NULLIF", T::Any).with_args([T::Any, T::Any]).nullable());
    funcs.push(Function::new("COALESCE", T::Any).with_args([T::Any]));

    // Spanner-specific
    funcs.push(Function::new("PENDING_COMMIT_TIMESTAMP", T::Timestamp));
    funcs.push(Function::new("GENERATE_UUID", T::String));
    funcs.push(Function::new("FARM_FINGERPRINT", T::Int64).with_args([T::String]));
    funcs.push(Function::new("FARM_FINGERPRINT", T::Int64).with_args([T::Bytes]));

    // Hash / encoding
    for name in ["MD5", "SHA1", "SHA256", "SHA512"] {
        funcs.push(Function::new(name, T::Bytes).with_args([T::Bytes]));
        funcs.push(Function::new(name, T::Bytes).with_args([T::String]));
    }
    funcs.push(Function::new("TO_BASE64", T::String).with_args([T::Bytes]));
    funcs.push(Function::new("FROM_BASE64", T::Bytes).with_args([T::String]));
    funcs.push(Function::new("TO_HEX", T::String).with_args([T::Bytes]));
    funcs.push(Function::new("FROM_HEX", T::Bytes).with_args([T::String]));

    // JSON
    funcs.push(Function::new("JSON_EXTRACT", T::Json).with_args([T::Json, T::String]));
    funcs.push(Function::new("JSON_EXTRACT_SCALAR", T::String).with_args([T::Json, T::String]));
    funcs.push(Function::new("JSON_QUERY", T::Json).with_args([T::Json, T::String]));
    funcs.push(Function::new("JSON_VALUE", T::String).with_args([T::Json, T::String]));
    funcs.push(Function::new("TO_JSON", T::Json).with_args([T::Any]));
    funcs.push(Function::new("TO_JSON_STRING", T::String).with_args([T::Any]));
    funcs.push(Function::new("PARSE_JSON", T::Json).with_args([T::String]));
    funcs.push(Function::new("JSON_EXTRACT_ARRAY", T::Array).with_args([T::Json, T::String]));
    funcs.push(
        Function::new("JSON_EXTRACT_STRING_ARRAY", T::Array).with_args([T::Json, T::String]),
    );

    // Window
    funcs.push(Function::new("ROW_NUMBER", T::Int64));
    funcs.push(Function::new("RANK", T::Int64));
    funcs.push(Function::new("DENSE_RANK", T::Int64));
    funcs.push(Function::new("PERCENT_RANK", T::Float64));
    funcs.push(Function::new("CUME_DIST", T::Float64));
    funcs.push(Function::new("NTILE", T::Int64).with_args([T::Int64]));
    funcs.push(Function::new("LAG", T::Any).with_args([T::Any]));
    funcs.push(Function::new("LAG", T::Any).with_args([T::Any, T::Int64]));
    funcs.push(Function::new("LEAD", T::Any).with_args([T::Any]));
    funcs.push(Function::new("LEAD", T::Any).with_args([T::Any, T::Int64]));
    funcs.push(Function::new("FIRST_VALUE", T::Any).with_args([T::Any]));
    funcs.push(Function::new("LAST_VALUE", T::Any).with_args([T::Any]));
    funcs.push(Function::new("NTH_VALUE", T::Any).with_args([T::Any, T::Int64]));

    // Bit. BIT_AND/OR/XOR sit in the aggregate list, so no SAFE. variants
    // get synthesized for them.
    funcs.push(Function::new("BIT_AND", T::Int64).with_args([T::Int64, T::Int64]));
    funcs.push(Function::new("BIT_OR", T::Int64).with_args([T::Int64, T::Int64]));
    funcs.push(Function::new("BIT_XOR", T::Int64).with_args([T::Int64, T::Int64]));
    funcs.push(Function::new("BIT_NOT", T::Int64).with_args([T::Int64]));
    funcs.push(Function::new("BIT_COUNT", T::Int64).with_args([T::Int64]));

    // NET
    funcs.push(Function::new("NET.IPV4_TO_INT64", T::Int64).with_args([T::Bytes]));
    funcs.push(Function::new("NET.IPV4_TO_INT64", T::Int64).with_args([T::String]));
    funcs.push(Function::new("NET.IPV4_FROM_INT64", T::Bytes).with_args([T::Int64]));
    funcs.push(Function::new("NET.INT64_TO_IPV4", T::String).with_args([T::Int64]));
    funcs.push(Function::new("NET.IP_FROM_STRING", T::Bytes).with_args([T::String]));
    funcs.push(Function::new("NET.IP_TO_STRING", T::String).with_args([T::Bytes]));
    funcs.push(
        Function::new("NET.SAFE_IP_FROM_STRING", T::Bytes)
            .with_args([T::String])
            .nullable(),
    );
    funcs.push(Function::new("NET.HOST", T::String).with_args([T::String]));
    funcs.push(Function::new("NET.PUBLIC_SUFFIX", T::String).with_args([T::String]).nullable());
    funcs.push(Function::new("NET.REG_DOMAIN", T::String).with_args([T::String]).nullable());

    funcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::canonical_name;

    #[test]
    fn seed_covers_the_required_inventory() {
        let funcs = spanner_functions();
        let has = |name: &str| funcs.iter().any(|f| f.matches_name(name));
        for name in [
            "ABS",
            "SUBSTR",
            "REGEXP_EXTRACT",
            "CURRENT_TIMESTAMP",
            "TIMESTAMP_DIFF",
            "ARRAY_LENGTH",
            "STRING_AGG",
            "SAFE_DIVIDE",
            "PENDING_COMMIT_TIMESTAMP",
            "GENERATE_UUID",
            "FARM_FINGERPRINT",
            "SHA256",
            "TO_BASE64",
            "JSON_VALUE",
            "ROW_NUMBER",
            "NTH_VALUE",
            "BIT_COUNT",
            "NET.IPV4_TO_INT64",
            "NET.HOST",
            "COUNT_IF",
        ] {
            assert!(has(name), "missing {name}");
        }
    }

    #[test]
    fn numeric_polymorphism_is_per_tuple() {
        let funcs = spanner_functions();
        let abs: Vec<_> = funcs.iter().filter(|f| f.matches_name("ABS")).collect();
        assert_eq!(abs.len(), 3);
        let tuples: Vec<_> = abs.iter().map(|f| f.args.clone()).collect();
        assert!(tuples.contains(&vec![T::Int64]));
        assert!(tuples.contains(&vec![T::Float64]));
        assert!(tuples.contains(&vec![T::Numeric]));
    }

    #[test]
    fn safe_arithmetic_family_is_nullable_with_matching_types() {
        let funcs = spanner_functions();
        for f in funcs.iter().filter(|f| f.matches_name("SAFE_ADD")) {
            assert!(f.nullable);
            assert_eq!(f.args.len(), 2);
            assert_eq!(f.args[0], f.args[1]);
            assert_eq!(f.return_type, f.args[0]);
        }
    }

    #[test]
    fn regexp_extract_is_nullable() {
        let funcs = spanner_functions();
        let f = funcs
            .iter()
            .find(|f| f.matches_name("REGEXP_EXTRACT"))
            .expect("seeded");
        assert!(f.nullable);
    }

    #[test]
    fn no_safe_dot_entries_in_the_raw_seed() {
        for f in spanner_functions() {
            assert!(
                !canonical_name(&f.name).starts_with("safe."),
                "seed must not contain {}",
                f.name
            );
        }
    }
}
