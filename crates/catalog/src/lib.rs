// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Spanner Function Catalog
//!
//! In-memory catalog of Spanner's standard library, consumed by the shared
//! analyzer to resolve function return types and nullability.
//!
//! ## Construction
//!
//! [`default_catalog`] builds a catalog with a single schema whose name is
//! the empty string (Spanner has no multi-schema concept by default),
//! seeded from [`stdlib::spanner_functions`] and then extended with
//! synthesized `SAFE.` variants:
//!
//! - every non-aggregate entry `F(args) → R` gains `SAFE.F(args) → R` with
//!   `nullable = true`, dotted names included (`SAFE.NET.HOST`);
//! - entries whose name already begins with `SAFE` are skipped;
//! - aggregates (the closed list in [`function::AGGREGATE_FUNCTIONS`]) are
//!   excluded.
//!
//! ## Lookup
//!
//! Callers pass names as they appeared in source; resolution lowercases
//! both sides of each dot-separated segment, so the original case survives
//! into generated code.

pub mod function;
pub mod stdlib;
pub mod types;

pub use function::{canonical_name, is_aggregate, Function, AGGREGATE_FUNCTIONS};
pub use types::DataType;

use serde::{Deserialize, Serialize};

/// A named function namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub funcs: Vec<Function>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            funcs: Vec::new(),
        }
    }

    /// All overloads matching `name` (case-insensitive per dot segment).
    pub fn funcs_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Function> {
        let wanted = canonical_name(name);
        self.funcs
            .iter()
            .filter(move |f| canonical_name(&f.name) == wanted)
    }

    /// Resolve one overload by name and exact argument-type tuple.
    pub fn resolve(&self, name: &str, args: &[DataType]) -> Option<&Function> {
        self.funcs_named(name).find(|f| f.args == args)
    }
}

/// The catalog surface handed to the shared analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub default_schema: String,
    pub schemas: Vec<Schema>,
}

impl Catalog {
    /// The schema named by `default_schema`.
    pub fn default_schema(&self) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == self.default_schema)
    }

    /// Resolve a function in the default schema.
    pub fn resolve(&self, name: &str, args: &[DataType]) -> Option<&Function> {
        self.default_schema()?.resolve(name, args)
    }
}

/// Append a `SAFE.` variant for every eligible entry in `funcs`.
fn synthesize_safe_variants(funcs: &mut Vec<Function>) {
    let safe: Vec<Function> = funcs
        .iter()
        .filter(|f| !f.is_aggregate)
        .filter(|f| !canonical_name(&f.name).starts_with("safe"))
        .map(Function::to_safe_variant)
        .collect();
    funcs.extend(safe);
}

/// Build the default Spanner catalog: one schema named `""` with the full
/// standard library and synthesized `SAFE.` entries.
pub fn default_catalog() -> Catalog {
    let mut funcs = stdlib::spanner_functions();
    synthesize_safe_variants(&mut funcs);
    Catalog {
        default_schema: String::new(),
        schemas: vec![Schema {
            name: String::new(),
            funcs,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_one_unnamed_schema() {
        let catalog = default_catalog();
        assert_eq!(catalog.default_schema, "");
        assert_eq!(catalog.schemas.len(), 1);
        assert_eq!(catalog.schemas[0].name, "");
        assert!(!catalog.schemas[0].funcs.is_empty());
    }

    #[test]
    fn safe_synthesis_covers_every_non_aggregate() {
        let catalog = default_catalog();
        let schema = catalog.default_schema().expect("schema");
        for f in schema.funcs.iter() {
            let canon = canonical_name(&f.name);
            if f.is_aggregate || canon.starts_with("safe") {
                continue;
            }
            let safe_name = format!("SAFE.{}", f.name);
            let safe = schema
                .resolve(&safe_name, &f.args)
                .unwrap_or_else(|| panic!("missing {safe_name}"));
            assert!(safe.nullable, "{safe_name} must be nullable");
            assert_eq!(safe.return_type, f.return_type);
        }
    }

    #[test]
    fn aggregates_have_no_safe_variants() {
        let catalog = default_catalog();
        let schema = catalog.default_schema().expect("schema");
        for agg in AGGREGATE_FUNCTIONS {
            let safe_name = format!("SAFE.{agg}");
            assert!(
                schema.funcs_named(&safe_name).next().is_none(),
                "unexpected {safe_name}"
            );
        }
    }

    #[test]
    fn safe_prefixed_seeds_are_not_doubled() {
        let catalog = default_catalog();
        let schema = catalog.default_schema().expect("schema");
        assert!(schema.funcs_named("SAFE.SAFE_DIVIDE").next().is_none());
        assert!(schema.funcs_named("SAFE.SAFE_CAST").next().is_none());
    }

    #[test]
    fn dotted_names_synthesize_dotted_safe_entries() {
        let catalog = default_catalog();
        let schema = catalog.default_schema().expect("schema");
        assert!(schema.funcs_named("SAFE.NET.HOST").next().is_some());
        assert!(schema.funcs_named("SAFE.NET.IPV4_TO_INT64").next().is_some());
    }

    #[test]
    fn lookup_is_case_insensitive_and_case_preserving() {
        let catalog = default_catalog();
        let schema = catalog.default_schema().expect("schema");
        let f = schema
            .resolve("safe.substr", &[DataType::String, DataType::Int64, DataType::Int64])
            .expect("resolved");
        assert_eq!(f.name, "SAFE.SUBSTR");
        assert!(f.nullable);
    }

    #[test]
    fn overload_resolution_uses_the_argument_tuple() {
        let catalog = default_catalog();
        let int_abs = catalog.resolve("ABS", &[DataType::Int64]).expect("abs int");
        assert_eq!(int_abs.return_type, DataType::Int64);
        let float_abs = catalog
            .resolve("ABS", &[DataType::Float64])
            .expect("abs float");
        assert_eq!(float_abs.return_type, DataType::Float64);
        assert!(catalog.resolve("ABS", &[DataType::String]).is_none());
    }
}
