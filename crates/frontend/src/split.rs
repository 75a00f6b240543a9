// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Token-driven statement splitting.
//!
//! The buffer is split on `;` tokens produced by the dialect lexer, never
//! on raw bytes, so a `;` inside a string or bytes literal can't terminate
//! a statement. Comments ride on the lexer's tokens, which is what keeps a
//! `-- name: GetUser :one` metadata comment attached to the statement that
//! follows it: the record's `start` is pulled back to the earliest
//! preceding comment.
//!
//! All offsets are absolute byte positions in the original buffer.

use spansql_grammar::{Comment, Lexer, SyntaxError, TokenKind};

/// One split statement and its spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitStatement {
    /// SQL text (comments before the first token and the terminating `;`
    /// excluded), trailing whitespace trimmed.
    pub sql: String,
    /// Byte offset of the first SQL token.
    pub sql_start: usize,
    /// Byte offset including preceding comments.
    pub start: usize,
    /// End offset: past the `;` terminator, or the end of the last token at
    /// end of input.
    pub end: usize,
    /// Comments observed since the previous terminator.
    pub comments: Vec<Comment>,
}

/// Split `content` into statement records.
///
/// Whitespace-only and comment-only segments produce no record. Errors are
/// lexical only (unclosed strings or comments).
pub fn split_statements(content: &str) -> Result<Vec<SplitStatement>, SyntaxError> {
    let mut lexer = Lexer::new(content);
    let mut statements = Vec::new();

    let mut current_comments: Vec<Comment> = Vec::new();
    let mut stmt_start: Option<usize> = None;
    let mut first_token_pos: Option<usize> = None;

    loop {
        let tok = lexer.next_token()?;

        for comment in &tok.comments {
            current_comments.push(*comment);
            // The record starts at the earliest comment seen.
            if stmt_start.map_or(true, |start| comment.pos < start) {
                stmt_start = Some(comment.pos);
            }
        }

        let is_semicolon = tok.kind == TokenKind::Sym(spansql_grammar::Sym::Semicolon);
        let is_eof = tok.is_eof();

        if !is_semicolon && !is_eof && first_token_pos.is_none() {
            first_token_pos = Some(tok.pos);
            if stmt_start.is_none() {
                stmt_start = Some(tok.pos);
            }
        }

        if is_semicolon || is_eof {
            if let (Some(sql_start), Some(start)) = (first_token_pos, stmt_start) {
                let sql = content[sql_start..tok.pos].trim_end();
                if !sql.is_empty() {
                    // `;` is part of the record; end of input is not.
                    let end = if is_semicolon { tok.end } else { tok.pos };
                    statements.push(SplitStatement {
                        sql: sql.to_string(),
                        sql_start,
                        start,
                        end,
                        comments: std::mem::take(&mut current_comments),
                    });
                }
            }

            if is_eof {
                break;
            }
            current_comments.clear();
            stmt_start = None;
            first_token_pos = None;
        }
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_semicolons() {
        let src = "SELECT 1; SELECT 2;";
        let stmts = split_statements(src).expect("split");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].sql, "SELECT 1");
        assert_eq!(stmts[1].sql, "SELECT 2");
    }

    #[test]
    fn record_spans_cover_comment_and_terminator() {
        let src = "-- name: GetUser :one\nSELECT id FROM users WHERE id = @id;";
        let stmts = split_statements(src).expect("split");
        assert_eq!(stmts.len(), 1);
        let stmt = &stmts[0];
        assert_eq!(stmt.start, 0);
        assert_eq!(stmt.sql_start, src.find("SELECT").expect("sql"));
        assert_eq!(stmt.end, src.len());
        assert_eq!(&src[stmt.start..stmt.end], src);
        assert_eq!(stmt.comments.len(), 1);
    }

    #[test]
    fn semicolon_in_string_does_not_split() {
        let src = "SELECT 'a;b' FROM t; SELECT 2";
        let stmts = split_statements(src).expect("split");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].sql, "SELECT 'a;b' FROM t");
    }

    #[test]
    fn final_statement_without_terminator_ends_at_last_token() {
        let src = "SELECT 1";
        let stmts = split_statements(src).expect("split");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].end, src.len());
    }

    #[test]
    fn comment_only_and_empty_segments_are_skipped() {
        assert!(split_statements("").expect("split").is_empty());
        assert!(split_statements("   \n\t").expect("split").is_empty());
        assert!(split_statements("-- just a comment\n").expect("split").is_empty());
        assert!(split_statements(";;;").expect("split").is_empty());
    }

    #[test]
    fn comments_reset_between_statements() {
        let src = "-- first\nSELECT 1;\n-- second\nSELECT 2;";
        let stmts = split_statements(src).expect("split");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].comments.len(), 1);
        assert_eq!(stmts[1].comments.len(), 1);
        let second = stmts[1].comments[0];
        assert_eq!(&src[second.pos..second.end], "-- second");
        assert_eq!(stmts[1].start, second.pos);
    }

    #[test]
    fn hash_and_block_comments_attach_too() {
        let src = "# one\n/* two */\nSELECT 1;";
        let stmts = split_statements(src).expect("split");
        assert_eq!(stmts[0].comments.len(), 2);
        assert_eq!(stmts[0].start, 0);
    }

    #[test]
    fn unclosed_string_surfaces_a_lexical_error() {
        assert!(split_statements("SELECT 'oops").is_err());
    }
}
