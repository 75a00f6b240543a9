// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Spanner Lowering Layer
//!
//! This crate converts the Spanner dialect AST into the engine-neutral
//! (PostgreSQL-shaped) tree the shared analyzer consumes.
//!
//! ## Overview
//!
//! The lowering layer is responsible for:
//!
//! - Dialect AST → engine-neutral AST conversion with the exact container
//!   and wrapper shapes the analyzer's traversal requires
//! - Named-parameter discovery and numbering (`@name` → positional index,
//!   first occurrence wins)
//! - Rebasing byte positions from per-statement substrings onto the
//!   original buffer
//! - Graceful degradation: unsupported constructs become placeholder nodes
//!   instead of errors
//!
//! ## Lowering Process
//!
//! ```text
//! GoogleSQL text → dialect AST → Translator → engine-neutral AST → shared analyzer
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spansql_grammar::parse_statement;
//! use spansql_lowering::Translator;
//!
//! let stmt = parse_statement("SELECT id FROM users WHERE id = @id")?;
//! let mut translator = Translator::new(0);
//! let node = translator.translate_statement(&stmt);
//! let params = translator.into_params();
//! assert_eq!(params.name_for(1), Some("id"));
//! ```

pub mod params;
pub mod translate;

pub use params::ParamTracker;
pub use translate::Translator;
