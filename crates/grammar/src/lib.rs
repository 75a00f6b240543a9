// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Spanner GoogleSQL Grammar
//!
//! Lexer, dialect AST and recursive-descent parser for Cloud Spanner's
//! GoogleSQL dialect. This crate knows nothing about the engine-neutral
//! tree; it is the boundary the rest of the toolchain treats as "the
//! dialect parser".
//!
//! ## Surfaces
//!
//! - [`Lexer`]: token stream with absolute byte ranges and comments
//!   attached to the following token. The statement splitter is built
//!   directly on this.
//! - [`parse_statement`] / [`parse_statements`]: produce [`ast`] trees.
//! - [`is_keyword`]: the authoritative reserved-keyword predicate. Context
//!   keywords are *not* reserved and lex as identifiers.
//! - [`ParseError`]: single or multiple syntax errors with 0-based
//!   positions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spansql_grammar::{parse_statement, ast::Statement};
//!
//! let stmt = parse_statement("SELECT id FROM users WHERE id = @id")?;
//! assert!(matches!(stmt, Statement::Query(_)));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{ParseError, Position, SyntaxError};
pub use lexer::Lexer;
pub use parser::{parse_statement, parse_statements, Parser};
pub use token::{is_keyword, Comment, Keyword, Sym, Token, TokenKind};
