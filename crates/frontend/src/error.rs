// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Adapter from dialect-parser errors to the engine-neutral error shape.
//!
//! The dialect parser reports 0-based positions in one of two shapes: a
//! single syntax error or a sequence of them. Both collapse to one
//! [`FrontendError`] whose message is always the literal `"syntax error"`,
//! whose detail is the first underlying message, and whose line/column are
//! 1-based.

use serde::{Deserialize, Serialize};
use spansql_grammar::{ParseError, SyntaxError};

/// The error surfaced to the shared driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}: {detail} at line {line}, column {column}")]
pub struct FrontendError {
    /// Always `"syntax error"` for parse failures.
    pub message: String,
    /// First underlying dialect message.
    pub detail: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl FrontendError {
    fn from_syntax(err: &SyntaxError) -> Self {
        Self {
            message: "syntax error".to_string(),
            detail: err.message.clone(),
            line: err.position.line as usize + 1,
            column: err.position.column as usize + 1,
        }
    }
}

impl From<SyntaxError> for FrontendError {
    fn from(err: SyntaxError) -> Self {
        Self::from_syntax(&err)
    }
}

impl From<ParseError> for FrontendError {
    fn from(err: ParseError) -> Self {
        match err.first() {
            Some(first) => Self::from_syntax(first),
            None => Self {
                message: "syntax error".to_string(),
                detail: String::new(),
                line: 1,
                column: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spansql_grammar::Position;

    #[test]
    fn positions_become_one_based() {
        let err = SyntaxError::new("unexpected token", Position { line: 0, column: 4 });
        let adapted = FrontendError::from(err);
        assert_eq!(adapted.message, "syntax error");
        assert_eq!(adapted.detail, "unexpected token");
        assert_eq!(adapted.line, 1);
        assert_eq!(adapted.column, 5);
    }

    #[test]
    fn multi_error_takes_the_first() {
        let errors = vec![
            SyntaxError::new("first", Position { line: 2, column: 0 }),
            SyntaxError::new("second", Position { line: 5, column: 1 }),
        ];
        let adapted = FrontendError::from(ParseError::Multiple(errors));
        assert_eq!(adapted.detail, "first");
        assert_eq!(adapted.line, 3);
        assert_eq!(adapted.column, 1);
    }

    #[test]
    fn display_reads_like_a_compiler_diagnostic() {
        let err = FrontendError {
            message: "syntax error".into(),
            detail: "expected expression".into(),
            line: 2,
            column: 7,
        };
        assert_eq!(
            err.to_string(),
            "syntax error: expected expression at line 2, column 7"
        );
    }
}
