// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Spanner Frontend
//!
//! The entry point the shared driver talks to: feed it a source buffer,
//! get back translated engine-neutral statements with precise byte spans.
//!
//! ## Pipeline
//!
//! ```text
//! source buffer
//!   → statement splitter (token-driven, comment-preserving)
//!   → dialect parser (per statement)
//!   → translator (fresh parameter tracker per statement)
//!   → Vec<RawStmt>
//! ```
//!
//! Statements whose root translates to a placeholder are skipped, which
//! keeps partially supported source files usable. Parse failures abort the
//! whole call with a [`FrontendError`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spansql_frontend::SpannerParser;
//!
//! let parser = SpannerParser::new();
//! let stmts = parser.parse("SELECT id FROM users WHERE id = @id;")?;
//! assert_eq!(stmts.len(), 1);
//! ```

pub mod error;
pub mod split;

pub use error::FrontendError;
pub use split::{split_statements, SplitStatement};

// The catalog travels with the frontend so the shared analyzer has a single
// crate to depend on.
pub use spansql_catalog::{default_catalog, Catalog};

use serde::{Deserialize, Serialize};
use spansql_ast::RawStmt;
use spansql_grammar::parse_statement;
use spansql_lowering::Translator;

/// Which lexical comment styles the dialect accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSyntax {
    pub dash: bool,
    pub slash_star: bool,
    pub hash: bool,
}

/// The Cloud Spanner parser façade.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpannerParser;

impl SpannerParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a source buffer into translated raw statements, in source
    /// order. Empty, whitespace-only and comment-only input produce an
    /// empty vector.
    pub fn parse(&self, source: &str) -> Result<Vec<RawStmt>, FrontendError> {
        let pieces = split_statements(source)?;
        let mut statements = Vec::with_capacity(pieces.len());

        for piece in pieces {
            let stmt = parse_statement(&piece.sql)?;

            // Dialect positions are relative to the statement substring;
            // the translator rebases them onto the full buffer.
            let mut translator = Translator::new(piece.sql_start);
            let node = translator.translate_statement(&stmt);
            if node.is_todo() {
                tracing::debug!(sql = %piece.sql, "skipping unsupported statement");
                continue;
            }

            statements.push(RawStmt {
                stmt: node,
                stmt_location: piece.start,
                stmt_len: piece.end - piece.start,
            });
        }

        Ok(statements)
    }

    /// Spanner accepts all three lexical comment styles.
    pub fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax {
            dash: true,
            slash_star: true,
            hash: true,
        }
    }

    /// Whether `identifier` is a *reserved* keyword (cannot appear as a
    /// bare identifier). Context keywords return false. Delegates to the
    /// dialect lexer's authoritative list.
    pub fn is_reserved_keyword(&self, identifier: &str) -> bool {
        spansql_grammar::is_keyword(identifier)
    }
}
