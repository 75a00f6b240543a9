// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Recursive-descent parser for the GoogleSQL dialect.
//!
//! The parser consumes the lexer's token stream with one token of lookahead
//! and produces the dialect AST. Reserved words arrive as keyword tokens;
//! context keywords (`INSERT`, `VALUES`, `OFFSET`, `RETURN`, …) arrive as
//! identifiers and are matched case-insensitively right where the grammar
//! needs them, which is exactly what makes them usable as column names
//! elsewhere.
//!
//! Spanner-only clauses with no analyzer-facing meaning (`TABLESAMPLE`,
//! `INTERLEAVE`, `STORING`, `ROW DELETION POLICY`, generated columns,
//! `OPTIONS`) are recognized and recorded or skipped, never parse errors.

use crate::ast::*;
use crate::error::{position_at, ParseError, SyntaxError};
use crate::lexer::Lexer;
use crate::token::{Keyword, Sym, Token, TokenKind};

/// Parse a single statement. A trailing `;` is permitted.
pub fn parse_statement(src: &str) -> Result<Statement, ParseError> {
    let mut parser = Parser::new(src)?;
    let stmt = parser.parse_statement()?;
    parser.expect_end()?;
    Ok(stmt)
}

/// Parse a `;`-separated sequence of statements, collecting every
/// statement-level error instead of stopping at the first one.
pub fn parse_statements(src: &str) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    let mut errors = Vec::new();
    for piece in split_on_terminators(src)? {
        match parse_statement(piece) {
            Ok(stmt) => statements.push(stmt),
            Err(ParseError::Syntax(e)) => errors.push(e),
            Err(ParseError::Multiple(mut es)) => errors.append(&mut es),
        }
    }
    match errors.len() {
        0 => Ok(statements),
        1 => Err(ParseError::Syntax(errors.remove(0))),
        _ => Err(ParseError::Multiple(errors)),
    }
}

/// Token-level statement split used by [`parse_statements`]. Comment
/// association is the statement splitter's job upstream; this only needs
/// `;`-safe boundaries.
fn split_on_terminators(src: &str) -> Result<Vec<&str>, ParseError> {
    let mut lexer = Lexer::new(src);
    let mut pieces = Vec::new();
    let mut start: Option<usize> = None;
    loop {
        let tok = lexer.next_token().map_err(ParseError::Syntax)?;
        match tok.kind {
            TokenKind::Eof => {
                if let Some(s) = start {
                    let piece = src[s..tok.pos].trim();
                    if !piece.is_empty() {
                        pieces.push(piece);
                    }
                }
                return Ok(pieces);
            }
            TokenKind::Sym(Sym::Semicolon) => {
                if let Some(s) = start.take() {
                    let piece = src[s..tok.pos].trim();
                    if !piece.is_empty() {
                        pieces.push(piece);
                    }
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(tok.pos);
                }
            }
        }
    }
}

/// Single-lookahead recursive-descent parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src);
        let cur = lexer.next_token().map_err(ParseError::Syntax)?;
        let peek = lexer.next_token().map_err(ParseError::Syntax)?;
        Ok(Self { lexer, cur, peek })
    }

    // --- token plumbing ---

    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token().map_err(ParseError::Syntax)?;
        let prev = std::mem::replace(&mut self.cur, std::mem::replace(&mut self.peek, next));
        Ok(prev)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        ParseError::Syntax(SyntaxError::new(
            message,
            position_at(self.lexer.source(), pos),
        ))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match &self.cur.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Keyword(kw) => format!("keyword {}", kw.as_str()),
            TokenKind::Ident { name, .. } => format!("identifier {name}"),
            TokenKind::Sym(s) => format!("'{s}'"),
            TokenKind::Param(name) => format!("@{name}"),
            TokenKind::Int { value, .. } => format!("integer {value}"),
            TokenKind::Float(value) => format!("float {value}"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Bytes(_) => "bytes literal".to_string(),
        };
        self.error_at(self.cur.pos, format!("expected {expected}, found {found}"))
    }

    fn cur_kw(&self, kw: Keyword) -> bool {
        self.cur.kind == TokenKind::Keyword(kw)
    }

    fn peek_kw(&self, kw: Keyword) -> bool {
        self.peek.kind == TokenKind::Keyword(kw)
    }

    fn eat_kw(&mut self, kw: Keyword) -> Result<bool, ParseError> {
        if self.cur_kw(kw) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_kw(&mut self, kw: Keyword) -> Result<Token, ParseError> {
        if self.cur_kw(kw) {
            self.bump()
        } else {
            Err(self.unexpected(kw.as_str()))
        }
    }

    fn cur_sym(&self, sym: Sym) -> bool {
        self.cur.kind == TokenKind::Sym(sym)
    }

    fn peek_sym(&self, sym: Sym) -> bool {
        self.peek.kind == TokenKind::Sym(sym)
    }

    fn eat_sym(&mut self, sym: Sym) -> Result<bool, ParseError> {
        if self.cur_sym(sym) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_sym(&mut self, sym: Sym) -> Result<Token, ParseError> {
        if self.cur_sym(sym) {
            self.bump()
        } else {
            Err(self.unexpected(sym.as_str()))
        }
    }

    /// Unquoted-identifier match for context keywords.
    fn cur_ctx(&self, word: &str) -> bool {
        matches!(
            &self.cur.kind,
            TokenKind::Ident { name, quoted: false } if name.eq_ignore_ascii_case(word)
        )
    }

    fn peek_ctx(&self, word: &str) -> bool {
        matches!(
            &self.peek.kind,
            TokenKind::Ident { name, quoted: false } if name.eq_ignore_ascii_case(word)
        )
    }

    fn eat_ctx(&mut self, word: &str) -> Result<bool, ParseError> {
        if self.cur_ctx(word) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_ctx(&mut self, word: &str) -> Result<Token, ParseError> {
        if self.cur_ctx(word) {
            self.bump()
        } else {
            Err(self.unexpected(word))
        }
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        match &self.cur.kind {
            TokenKind::Ident { name, .. } => {
                let ident = Ident::new(name.clone(), self.cur.pos);
                self.bump()?;
                Ok(ident)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn parse_path(&mut self) -> Result<Path, ParseError> {
        let mut idents = vec![self.parse_ident()?];
        while self.cur_sym(Sym::Dot) {
            self.bump()?;
            idents.push(self.parse_ident()?);
        }
        Ok(Path { idents })
    }

    /// Consume a balanced `( … )` group, contents included.
    fn skip_parens(&mut self) -> Result<(), ParseError> {
        let open = self.expect_sym(Sym::LParen)?;
        let mut depth = 1usize;
        loop {
            match &self.cur.kind {
                TokenKind::Sym(Sym::LParen) => depth += 1,
                TokenKind::Sym(Sym::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump()?;
                        return Ok(());
                    }
                }
                TokenKind::Eof => return Err(self.error_at(open.pos, "unclosed '('")),
                _ => {}
            }
            self.bump()?;
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        while self.eat_sym(Sym::Semicolon)? {}
        if self.cur.is_eof() {
            Ok(())
        } else {
            Err(self.unexpected("end of statement"))
        }
    }

    // --- statements ---

    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match &self.cur.kind {
            TokenKind::Keyword(Keyword::Select)
            | TokenKind::Keyword(Keyword::With)
            | TokenKind::Sym(Sym::LParen) => Ok(Statement::Query(QueryStatement {
                query: self.parse_query()?,
            })),
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Ident { .. } if self.cur_ctx("INSERT") => self.parse_insert(),
            TokenKind::Ident { .. } if self.cur_ctx("UPDATE") => self.parse_update(),
            TokenKind::Ident { .. } if self.cur_ctx("DELETE") => self.parse_delete(),
            TokenKind::Ident { .. } if self.cur_ctx("DROP") => self.parse_drop(),
            TokenKind::Ident { .. } if self.cur_ctx("ALTER") => self.parse_alter_table(),
            _ => Err(self.unexpected("statement")),
        }
    }

    // --- queries ---

    fn parse_query(&mut self) -> Result<Query, ParseError> {
        let with = if self.cur_kw(Keyword::With) {
            Some(self.parse_with()?)
        } else {
            None
        };

        let expr = self.parse_query_expr()?;

        let mut order_by = Vec::new();
        if self.eat_kw(Keyword::Order)? {
            self.expect_kw(Keyword::By)?;
            loop {
                let expr = self.parse_expr()?;
                let dir = if self.eat_kw(Keyword::Asc)? {
                    Some(Direction::Asc)
                } else if self.eat_kw(Keyword::Desc)? {
                    Some(Direction::Desc)
                } else {
                    None
                };
                order_by.push(OrderByItem { expr, dir });
                if !self.eat_sym(Sym::Comma)? {
                    break;
                }
            }
        }

        let limit = if self.eat_kw(Keyword::Limit)? {
            let count = self.parse_expr()?;
            let offset = if self.eat_ctx("OFFSET")? {
                Some(self.parse_expr()?)
            } else {
                None
            };
            Some(Limit { count, offset })
        } else {
            None
        };

        Ok(Query {
            with,
            expr,
            order_by,
            limit,
        })
    }

    fn parse_with(&mut self) -> Result<With, ParseError> {
        self.expect_kw(Keyword::With)?;
        let mut ctes = Vec::new();
        loop {
            let name = self.parse_ident()?;
            self.expect_kw(Keyword::As)?;
            self.expect_sym(Sym::LParen)?;
            let query = self.parse_query()?;
            self.expect_sym(Sym::RParen)?;
            ctes.push(Cte { name, query });
            if !self.eat_sym(Sym::Comma)? {
                break;
            }
        }
        Ok(With { ctes })
    }

    fn parse_query_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut left = self.parse_query_primary()?;
        loop {
            let op = if self.cur_kw(Keyword::Union) {
                SetOp::Union
            } else if self.cur_kw(Keyword::Intersect) {
                SetOp::Intersect
            } else if self.cur_kw(Keyword::Except) {
                SetOp::Except
            } else {
                return Ok(left);
            };
            self.bump()?;
            let distinct = if self.eat_kw(Keyword::All)? {
                false
            } else {
                self.eat_kw(Keyword::Distinct)?;
                true
            };
            let right = self.parse_query_primary()?;
            left = QueryExpr::Compound {
                op,
                distinct,
                queries: vec![left, right],
            };
        }
    }

    fn parse_query_primary(&mut self) -> Result<QueryExpr, ParseError> {
        if self.cur_sym(Sym::LParen) {
            self.bump()?;
            let query = self.parse_query()?;
            self.expect_sym(Sym::RParen)?;
            return Ok(QueryExpr::Sub(Box::new(query)));
        }
        Ok(QueryExpr::Select(Box::new(self.parse_select()?)))
    }

    fn parse_select(&mut self) -> Result<Select, ParseError> {
        self.expect_kw(Keyword::Select)?;

        let mut distinct = false;
        if self.eat_kw(Keyword::Distinct)? {
            distinct = true;
        } else {
            self.eat_kw(Keyword::All)?;
        }

        let select_as = if self.cur_kw(Keyword::As) {
            self.bump()?;
            if self.eat_kw(Keyword::Struct)? {
                Some(SelectAs::Struct)
            } else {
                self.expect_ctx("VALUE")?;
                Some(SelectAs::Value)
            }
        } else {
            None
        };

        let mut results = vec![self.parse_select_item()?];
        while self.eat_sym(Sym::Comma)? {
            results.push(self.parse_select_item()?);
        }

        let from = if self.eat_kw(Keyword::From)? {
            Some(self.parse_table_expr()?)
        } else {
            None
        };

        let where_clause = if self.eat_kw(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.eat_kw(Keyword::Group)? {
            self.expect_kw(Keyword::By)?;
            group_by.push(self.parse_expr()?);
            while self.eat_sym(Sym::Comma)? {
                group_by.push(self.parse_expr()?);
            }
        }

        let having = if self.eat_kw(Keyword::Having)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(Select {
            distinct,
            select_as,
            results,
            from,
            where_clause,
            group_by,
            having,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, ParseError> {
        if self.cur_sym(Sym::Star) {
            let pos = self.cur.pos;
            self.bump()?;
            let (except, replace) = self.parse_star_modifiers()?;
            return Ok(SelectItem::Star {
                pos,
                except,
                replace,
            });
        }

        let expr = self.parse_expr()?;

        // `expr.*` — the postfix walk leaves `.` unconsumed when `*` follows.
        if self.cur_sym(Sym::Dot) && self.peek_sym(Sym::Star) {
            self.bump()?;
            self.bump()?;
            let (except, replace) = self.parse_star_modifiers()?;
            return Ok(SelectItem::DotStar {
                expr,
                except,
                replace,
            });
        }

        if self.eat_kw(Keyword::As)? {
            let alias = self.parse_ident()?;
            return Ok(SelectItem::Alias { expr, alias });
        }
        if matches!(self.cur.kind, TokenKind::Ident { .. }) {
            let alias = self.parse_ident()?;
            return Ok(SelectItem::Alias { expr, alias });
        }
        Ok(SelectItem::Expr(expr))
    }

    fn parse_star_modifiers(
        &mut self,
    ) -> Result<(Vec<Ident>, Vec<StarReplaceItem>), ParseError> {
        let mut except = Vec::new();
        let mut replace = Vec::new();
        // `* EXCEPT (…)` — the paren disambiguates from the set operation.
        if self.cur_kw(Keyword::Except) && self.peek_sym(Sym::LParen) {
            self.bump()?;
            self.expect_sym(Sym::LParen)?;
            except.push(self.parse_ident()?);
            while self.eat_sym(Sym::Comma)? {
                except.push(self.parse_ident()?);
            }
            self.expect_sym(Sym::RParen)?;
        }
        if self.cur_ctx("REPLACE") && self.peek_sym(Sym::LParen) {
            self.bump()?;
            self.expect_sym(Sym::LParen)?;
            loop {
                let expr = self.parse_expr()?;
                self.expect_kw(Keyword::As)?;
                let name = self.parse_ident()?;
                replace.push(StarReplaceItem { expr, name });
                if !self.eat_sym(Sym::Comma)? {
                    break;
                }
            }
            self.expect_sym(Sym::RParen)?;
        }
        Ok((except, replace))
    }

    // --- FROM clause ---

    fn parse_table_expr(&mut self) -> Result<TableExpr, ParseError> {
        let mut left = self.parse_table_primary()?;
        loop {
            let op = if self.eat_sym(Sym::Comma)? {
                JoinOp::Comma
            } else if self.eat_kw(Keyword::Cross)? {
                self.expect_kw(Keyword::Join)?;
                JoinOp::Cross
            } else if self.eat_kw(Keyword::Inner)? {
                self.expect_kw(Keyword::Join)?;
                JoinOp::Inner
            } else if self.cur_kw(Keyword::Left)
                || self.cur_kw(Keyword::Right)
                || self.cur_kw(Keyword::Full)
            {
                let op = if self.eat_kw(Keyword::Left)? {
                    JoinOp::LeftOuter
                } else if self.eat_kw(Keyword::Right)? {
                    JoinOp::RightOuter
                } else {
                    self.expect_kw(Keyword::Full)?;
                    JoinOp::FullOuter
                };
                self.eat_kw(Keyword::Outer)?;
                self.expect_kw(Keyword::Join)?;
                op
            } else if self.eat_kw(Keyword::Join)? {
                JoinOp::Inner
            } else {
                return Ok(left);
            };

            let right = self.parse_table_primary()?;
            let cond = if self.eat_kw(Keyword::On)? {
                JoinCond::On(self.parse_expr()?)
            } else if self.eat_kw(Keyword::Using)? {
                self.expect_sym(Sym::LParen)?;
                let mut idents = vec![self.parse_ident()?];
                while self.eat_sym(Sym::Comma)? {
                    idents.push(self.parse_ident()?);
                }
                self.expect_sym(Sym::RParen)?;
                JoinCond::Using(idents)
            } else {
                JoinCond::None
            };

            left = TableExpr::Join(Box::new(Join {
                op,
                left,
                right,
                cond,
            }));
        }
    }

    fn parse_table_primary(&mut self) -> Result<TableExpr, ParseError> {
        if self.cur_kw(Keyword::Unnest) {
            return Ok(TableExpr::Unnest(self.parse_unnest()?));
        }

        if self.cur_sym(Sym::LParen) {
            if self.peek_kw(Keyword::Select) || self.peek_kw(Keyword::With) {
                self.bump()?;
                let query = self.parse_query()?;
                self.expect_sym(Sym::RParen)?;
                let alias = self.parse_table_alias()?;
                let sample = self.parse_tablesample()?;
                return Ok(TableExpr::SubQuery {
                    query: Box::new(query),
                    alias,
                    sample,
                });
            }
            self.bump()?;
            let inner = self.parse_table_expr()?;
            self.expect_sym(Sym::RParen)?;
            return Ok(TableExpr::Paren(Box::new(inner)));
        }

        let name = self.parse_path()?;
        let alias = self.parse_table_alias()?;
        let sample = self.parse_tablesample()?;
        Ok(TableExpr::Table {
            name,
            alias,
            sample,
        })
    }

    fn parse_table_alias(&mut self) -> Result<Option<Ident>, ParseError> {
        if self.eat_kw(Keyword::As)? {
            return Ok(Some(self.parse_ident()?));
        }
        if matches!(self.cur.kind, TokenKind::Ident { .. }) {
            return Ok(Some(self.parse_ident()?));
        }
        Ok(None)
    }

    fn parse_tablesample(&mut self) -> Result<Option<TableSample>, ParseError> {
        if !self.eat_kw(Keyword::Tablesample)? {
            return Ok(None);
        }
        let method = self.parse_ident()?;
        self.skip_parens()?;
        Ok(Some(TableSample {
            method: method.name.to_ascii_uppercase(),
        }))
    }

    fn parse_unnest(&mut self) -> Result<Unnest, ParseError> {
        let pos = self.cur.pos;
        self.expect_kw(Keyword::Unnest)?;
        self.expect_sym(Sym::LParen)?;
        let expr = self.parse_expr()?;
        self.expect_sym(Sym::RParen)?;

        // `[AS] alias` for the value column precedes WITH OFFSET.
        let alias = if self.cur_kw(Keyword::With) {
            None
        } else {
            self.parse_table_alias()?
        };

        let with_offset = if self.cur_kw(Keyword::With) && self.peek_ctx("OFFSET") {
            self.bump()?;
            self.bump()?;
            let offset_alias = if self.eat_kw(Keyword::As)? {
                Some(self.parse_ident()?)
            } else if matches!(self.cur.kind, TokenKind::Ident { .. }) {
                Some(self.parse_ident()?)
            } else {
                None
            };
            Some(WithOffset {
                alias: offset_alias,
            })
        } else {
            None
        };

        Ok(Unnest {
            pos,
            expr,
            alias,
            with_offset,
        })
    }

    // --- DML ---

    fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        self.expect_ctx("INSERT")?;
        self.eat_kw(Keyword::Into)?;
        let table = self.parse_path()?;

        let mut columns = Vec::new();
        if self.cur_sym(Sym::LParen)
            && !self.peek_kw(Keyword::Select)
            && !self.peek_kw(Keyword::With)
        {
            self.bump()?;
            columns.push(self.parse_ident()?);
            while self.eat_sym(Sym::Comma)? {
                columns.push(self.parse_ident()?);
            }
            self.expect_sym(Sym::RParen)?;
        }

        let input = if self.eat_ctx("VALUES")? {
            let mut rows = Vec::new();
            loop {
                self.expect_sym(Sym::LParen)?;
                let mut row = vec![self.parse_expr()?];
                while self.eat_sym(Sym::Comma)? {
                    row.push(self.parse_expr()?);
                }
                self.expect_sym(Sym::RParen)?;
                rows.push(row);
                if !self.eat_sym(Sym::Comma)? {
                    break;
                }
            }
            InsertInput::Values(rows)
        } else {
            InsertInput::Query(Box::new(self.parse_query()?))
        };

        let then_return = self.parse_then_return()?;
        Ok(Statement::Insert(Insert {
            table,
            columns,
            input,
            then_return,
        }))
    }

    fn parse_update(&mut self) -> Result<Statement, ParseError> {
        self.expect_ctx("UPDATE")?;
        let table = self.parse_path()?;
        let alias = if self.eat_kw(Keyword::As)? {
            Some(self.parse_ident()?)
        } else if matches!(self.cur.kind, TokenKind::Ident { .. }) {
            Some(self.parse_ident()?)
        } else {
            None
        };
        self.expect_kw(Keyword::Set)?;

        let mut items = Vec::new();
        loop {
            let mut path = vec![self.parse_ident()?];
            while self.eat_sym(Sym::Dot)? {
                path.push(self.parse_ident()?);
            }
            self.expect_sym(Sym::Eq)?;
            let value = self.parse_expr()?;
            items.push(UpdateItem { path, value });
            if !self.eat_sym(Sym::Comma)? {
                break;
            }
        }

        let where_clause = if self.eat_kw(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let then_return = self.parse_then_return()?;
        Ok(Statement::Update(Update {
            table,
            alias,
            items,
            where_clause,
            then_return,
        }))
    }

    fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        self.expect_ctx("DELETE")?;
        self.eat_kw(Keyword::From)?;
        let table = self.parse_path()?;
        let alias = if self.eat_kw(Keyword::As)? {
            Some(self.parse_ident()?)
        } else if matches!(self.cur.kind, TokenKind::Ident { .. }) {
            Some(self.parse_ident()?)
        } else {
            None
        };
        let where_clause = if self.eat_kw(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let then_return = self.parse_then_return()?;
        Ok(Statement::Delete(Delete {
            table,
            alias,
            where_clause,
            then_return,
        }))
    }

    fn parse_then_return(&mut self) -> Result<Option<ThenReturn>, ParseError> {
        if !self.cur_kw(Keyword::Then) {
            return Ok(None);
        }
        self.bump()?;
        self.expect_ctx("RETURN")?;
        let mut items = vec![self.parse_select_item()?];
        while self.eat_sym(Sym::Comma)? {
            items.push(self.parse_select_item()?);
        }
        Ok(Some(ThenReturn { items }))
    }

    // --- DDL ---

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_kw(Keyword::Create)?;

        if self.cur_kw(Keyword::Or) {
            self.bump()?;
            self.expect_ctx("REPLACE")?;
            return self.parse_create_view(true);
        }
        if self.cur_ctx("VIEW") {
            return self.parse_create_view(false);
        }
        if self.cur_ctx("TABLE") {
            return self.parse_create_table();
        }

        let unique = self.eat_ctx("UNIQUE")?;
        let null_filtered = self.eat_ctx("NULL_FILTERED")?;
        if self.cur_ctx("INDEX") {
            return self.parse_create_index(unique, null_filtered);
        }
        Err(self.unexpected("TABLE, INDEX or VIEW"))
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.cur_kw(Keyword::If) && self.peek_kw(Keyword::Not) {
            self.bump()?;
            self.bump()?;
            self.expect_kw(Keyword::Exists)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_if_exists(&mut self) -> Result<bool, ParseError> {
        if self.cur_kw(Keyword::If) && self.peek_kw(Keyword::Exists) {
            self.bump()?;
            self.bump()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        self.expect_ctx("TABLE")?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_path()?;
        self.expect_sym(Sym::LParen)?;

        let mut columns = Vec::new();
        if !self.cur_sym(Sym::RParen) {
            loop {
                if self.cur_ctx("CONSTRAINT") || self.cur_ctx("FOREIGN") || self.cur_ctx("CHECK")
                {
                    self.skip_table_constraint()?;
                } else {
                    columns.push(self.parse_column_def()?);
                }
                if !self.eat_sym(Sym::Comma)? {
                    break;
                }
            }
        }
        self.expect_sym(Sym::RParen)?;

        let mut primary_key = Vec::new();
        if self.eat_ctx("PRIMARY")? {
            self.expect_ctx("KEY")?;
            self.expect_sym(Sym::LParen)?;
            if !self.cur_sym(Sym::RParen) {
                loop {
                    primary_key.push(self.parse_index_key()?);
                    if !self.eat_sym(Sym::Comma)? {
                        break;
                    }
                }
            }
            self.expect_sym(Sym::RParen)?;
        }

        let mut interleave_in_parent = None;
        let mut row_deletion_policy = false;
        while self.eat_sym(Sym::Comma)? {
            if self.eat_ctx("INTERLEAVE")? {
                self.expect_kw(Keyword::In)?;
                self.expect_ctx("PARENT")?;
                interleave_in_parent = Some(self.parse_path()?);
                if self.eat_kw(Keyword::On)? {
                    self.expect_ctx("DELETE")?;
                    if !self.eat_ctx("CASCADE")? {
                        self.expect_kw(Keyword::No)?;
                        self.expect_ctx("ACTION")?;
                    }
                }
            } else if self.eat_ctx("ROW")? {
                self.expect_ctx("DELETION")?;
                self.expect_ctx("POLICY")?;
                self.skip_parens()?;
                row_deletion_policy = true;
            } else {
                return Err(self.unexpected("INTERLEAVE or ROW DELETION POLICY"));
            }
        }

        Ok(Statement::CreateTable(CreateTable {
            if_not_exists,
            name,
            columns,
            primary_key,
            interleave_in_parent,
            row_deletion_policy,
        }))
    }

    /// Table-level constraints are recognized and skipped through the next
    /// top-level `,` or the closing `)`.
    fn skip_table_constraint(&mut self) -> Result<(), ParseError> {
        let start = self.cur.pos;
        let mut depth = 0usize;
        loop {
            match &self.cur.kind {
                TokenKind::Sym(Sym::LParen) => depth += 1,
                TokenKind::Sym(Sym::RParen) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                TokenKind::Sym(Sym::Comma) if depth == 0 => return Ok(()),
                TokenKind::Eof => return Err(self.error_at(start, "unterminated constraint")),
                _ => {}
            }
            self.bump()?;
        }
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.parse_ident()?;
        let ty = self.parse_schema_type()?;

        let mut not_null = false;
        let mut default = None;
        loop {
            if self.cur_kw(Keyword::Not) && self.peek_kw(Keyword::Null) {
                self.bump()?;
                self.bump()?;
                not_null = true;
            } else if self.cur_kw(Keyword::Default) {
                self.bump()?;
                self.expect_sym(Sym::LParen)?;
                default = Some(self.parse_expr()?);
                self.expect_sym(Sym::RParen)?;
            } else if self.cur_kw(Keyword::As) {
                // Generated column: AS ( expr ) [STORED]
                self.bump()?;
                self.skip_parens()?;
                self.eat_ctx("STORED")?;
            } else if self.cur_ctx("OPTIONS") {
                self.bump()?;
                self.skip_parens()?;
            } else {
                break;
            }
        }

        Ok(ColumnDef {
            name,
            ty,
            not_null,
            default,
        })
    }

    fn parse_schema_type(&mut self) -> Result<SchemaType, ParseError> {
        if self.eat_kw(Keyword::Array)? {
            self.expect_sym(Sym::Lt)?;
            let item = self.parse_schema_type()?;
            self.expect_sym(Sym::Gt)?;
            return Ok(SchemaType::Array(Box::new(item)));
        }

        let name = self.parse_ident()?.name.to_ascii_uppercase();
        if (name == "STRING" || name == "BYTES") && self.cur_sym(Sym::LParen) {
            self.bump()?;
            let (size, max) = if self.eat_ctx("MAX")? {
                (None, true)
            } else if let TokenKind::Int { value, base } = self.cur.kind.clone() {
                self.bump()?;
                let parsed = u64::from_str_radix(&value, base)
                    .map_err(|_| self.error_at(self.cur.pos, "invalid size literal"))?;
                (Some(parsed), false)
            } else {
                return Err(self.unexpected("size or MAX"));
            };
            self.expect_sym(Sym::RParen)?;
            return Ok(SchemaType::Sized { name, size, max });
        }
        Ok(SchemaType::Scalar(name))
    }

    fn parse_index_key(&mut self) -> Result<IndexKey, ParseError> {
        let name = self.parse_path()?;
        let dir = if self.eat_kw(Keyword::Asc)? {
            Some(Direction::Asc)
        } else if self.eat_kw(Keyword::Desc)? {
            Some(Direction::Desc)
        } else {
            None
        };
        Ok(IndexKey { name, dir })
    }

    fn parse_create_index(
        &mut self,
        unique: bool,
        null_filtered: bool,
    ) -> Result<Statement, ParseError> {
        self.expect_ctx("INDEX")?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_path()?;
        self.expect_kw(Keyword::On)?;
        let table = self.parse_path()?;

        self.expect_sym(Sym::LParen)?;
        let mut keys = Vec::new();
        if !self.cur_sym(Sym::RParen) {
            loop {
                keys.push(self.parse_index_key()?);
                if !self.eat_sym(Sym::Comma)? {
                    break;
                }
            }
        }
        self.expect_sym(Sym::RParen)?;

        let mut storing = Vec::new();
        if self.eat_ctx("STORING")? {
            self.expect_sym(Sym::LParen)?;
            storing.push(self.parse_ident()?);
            while self.eat_sym(Sym::Comma)? {
                storing.push(self.parse_ident()?);
            }
            self.expect_sym(Sym::RParen)?;
        }

        let interleave_in = if self.eat_sym(Sym::Comma)? {
            self.expect_ctx("INTERLEAVE")?;
            self.expect_kw(Keyword::In)?;
            Some(self.parse_path()?)
        } else {
            None
        };

        Ok(Statement::CreateIndex(CreateIndex {
            unique,
            null_filtered,
            if_not_exists,
            name,
            table,
            keys,
            storing,
            interleave_in,
        }))
    }

    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        self.expect_ctx("DROP")?;
        if self.eat_ctx("TABLE")? {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_path()?;
            return Ok(Statement::DropTable(DropTable { if_exists, name }));
        }
        if self.eat_ctx("INDEX")? {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_path()?;
            return Ok(Statement::DropIndex(DropIndex { if_exists, name }));
        }
        if self.eat_ctx("VIEW")? {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_path()?;
            return Ok(Statement::DropView(DropView { if_exists, name }));
        }
        Err(self.unexpected("TABLE, INDEX or VIEW"))
    }

    fn parse_alter_table(&mut self) -> Result<Statement, ParseError> {
        self.expect_ctx("ALTER")?;
        self.expect_ctx("TABLE")?;
        let name = self.parse_path()?;

        let alteration = if self.eat_ctx("ADD")? {
            self.eat_ctx("COLUMN")?;
            self.parse_if_not_exists()?;
            TableAlteration::AddColumn {
                column: self.parse_column_def()?,
            }
        } else if self.cur_ctx("DROP") && self.peek_ctx("COLUMN") {
            self.bump()?;
            self.bump()?;
            TableAlteration::DropColumn {
                name: self.parse_ident()?,
            }
        } else if self.cur_ctx("ALTER") && self.peek_ctx("COLUMN") {
            self.bump()?;
            self.bump()?;
            let col = self.parse_ident()?;
            let op = if self.cur_kw(Keyword::Set) {
                self.bump()?;
                if self.eat_kw(Keyword::Default)? {
                    ColumnAlteration::SetDefault {
                        expr: self.parse_expr()?,
                    }
                } else {
                    self.expect_ctx("TYPE")?;
                    let ty = self.parse_schema_type()?;
                    let not_null = if self.cur_kw(Keyword::Not) && self.peek_kw(Keyword::Null) {
                        self.bump()?;
                        self.bump()?;
                        true
                    } else {
                        false
                    };
                    ColumnAlteration::SetType { ty, not_null }
                }
            } else if self.cur_ctx("DROP") && self.peek_kw(Keyword::Default) {
                self.bump()?;
                self.bump()?;
                ColumnAlteration::DropDefault
            } else {
                // Bare re-type form: ALTER COLUMN c STRING(MAX) [NOT NULL]
                let ty = self.parse_schema_type()?;
                let not_null = if self.cur_kw(Keyword::Not) && self.peek_kw(Keyword::Null) {
                    self.bump()?;
                    self.bump()?;
                    true
                } else {
                    false
                };
                ColumnAlteration::SetType { ty, not_null }
            };
            TableAlteration::AlterColumn { name: col, op }
        } else {
            // Anything else (SET ON DELETE, ADD ROW DELETION POLICY, …) is
            // recorded for the translator to surface as unsupported.
            let description = match &self.cur.kind {
                TokenKind::Ident { name, .. } => name.clone(),
                TokenKind::Keyword(kw) => kw.as_str().to_string(),
                _ => "alteration".to_string(),
            };
            while !self.cur.is_eof() && !self.cur_sym(Sym::Semicolon) {
                self.bump()?;
            }
            TableAlteration::Other { description }
        };

        Ok(Statement::AlterTable(AlterTable { name, alteration }))
    }

    fn parse_create_view(&mut self, or_replace: bool) -> Result<Statement, ParseError> {
        self.expect_ctx("VIEW")?;
        let name = self.parse_path()?;
        if self.eat_ctx("SQL")? {
            self.expect_ctx("SECURITY")?;
            if !self.eat_ctx("INVOKER")? {
                self.expect_ctx("DEFINER")?;
            }
        }
        self.expect_kw(Keyword::As)?;
        let query = self.parse_query()?;
        Ok(Statement::CreateView(CreateView {
            or_replace,
            name,
            query,
        }))
    }

    // --- expressions ---

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.cur_kw(Keyword::Or) {
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_and()?;
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.cur_kw(Keyword::And) {
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_not()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        // `x NOT LIKE/IN/BETWEEN …` is handled inside the comparison layer;
        // a NOT seen here is always prefix negation.
        if self.cur_kw(Keyword::Not) {
            let pos = self.cur.pos;
            self.bump()?;
            let expr = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(expr),
                pos,
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bit_or()?;
        loop {
            let op = match &self.cur.kind {
                TokenKind::Sym(Sym::Eq) => Some(BinaryOp::Eq),
                TokenKind::Sym(Sym::NotEq) => Some(BinaryOp::NotEq),
                TokenKind::Sym(Sym::Lt) => Some(BinaryOp::Lt),
                TokenKind::Sym(Sym::LtEq) => Some(BinaryOp::LtEq),
                TokenKind::Sym(Sym::Gt) => Some(BinaryOp::Gt),
                TokenKind::Sym(Sym::GtEq) => Some(BinaryOp::GtEq),
                TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
                _ => None,
            };
            if let Some(op) = op {
                let pos = self.cur.pos;
                self.bump()?;
                let right = self.parse_bit_or()?;
                left = Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    pos,
                };
                continue;
            }

            if self.cur_kw(Keyword::Not)
                && (self.peek_kw(Keyword::Like)
                    || self.peek_kw(Keyword::In)
                    || self.peek_kw(Keyword::Between))
            {
                self.bump()?;
                if self.eat_kw(Keyword::Like)? {
                    let pos = self.cur.pos;
                    let right = self.parse_bit_or()?;
                    left = Expr::Binary {
                        op: BinaryOp::NotLike,
                        left: Box::new(left),
                        right: Box::new(right),
                        pos,
                    };
                } else if self.eat_kw(Keyword::In)? {
                    left = Expr::In {
                        left: Box::new(left),
                        not: true,
                        cond: self.parse_in_condition()?,
                    };
                } else {
                    self.expect_kw(Keyword::Between)?;
                    left = self.parse_between(left, true)?;
                }
                continue;
            }

            if self.eat_kw(Keyword::In)? {
                left = Expr::In {
                    left: Box::new(left),
                    not: false,
                    cond: self.parse_in_condition()?,
                };
                continue;
            }

            if self.eat_kw(Keyword::Between)? {
                left = self.parse_between(left, false)?;
                continue;
            }

            if self.cur_kw(Keyword::Is) {
                let pos = self.cur.pos;
                self.bump()?;
                let not = self.eat_kw(Keyword::Not)?;
                if self.eat_kw(Keyword::Null)? {
                    left = Expr::IsNull {
                        left: Box::new(left),
                        not,
                        pos,
                    };
                } else if self.eat_kw(Keyword::True)? {
                    left = Expr::IsBool {
                        left: Box::new(left),
                        not,
                        value: true,
                        pos,
                    };
                } else if self.eat_kw(Keyword::False)? {
                    left = Expr::IsBool {
                        left: Box::new(left),
                        not,
                        value: false,
                        pos,
                    };
                } else {
                    return Err(self.unexpected("NULL, TRUE or FALSE"));
                }
                continue;
            }

            return Ok(left);
        }
    }

    fn parse_in_condition(&mut self) -> Result<InCond, ParseError> {
        if self.eat_kw(Keyword::Unnest)? {
            self.expect_sym(Sym::LParen)?;
            let expr = self.parse_expr()?;
            self.expect_sym(Sym::RParen)?;
            return Ok(InCond::Unnest(Box::new(expr)));
        }

        self.expect_sym(Sym::LParen)?;
        if self.cur_kw(Keyword::Select) || self.cur_kw(Keyword::With) {
            let query = self.parse_query()?;
            self.expect_sym(Sym::RParen)?;
            return Ok(InCond::SubQuery(Box::new(query)));
        }

        let mut values = vec![self.parse_expr()?];
        while self.eat_sym(Sym::Comma)? {
            values.push(self.parse_expr()?);
        }
        self.expect_sym(Sym::RParen)?;
        Ok(InCond::Values(values))
    }

    fn parse_between(&mut self, left: Expr, not: bool) -> Result<Expr, ParseError> {
        let low = self.parse_bit_or()?;
        self.expect_kw(Keyword::And)?;
        let high = self.parse_bit_or()?;
        Ok(Expr::Between {
            left: Box::new(left),
            not,
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    fn parse_bit_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bit_xor()?;
        while self.cur_sym(Sym::Pipe) {
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_bit_xor()?;
            left = Expr::Binary {
                op: BinaryOp::BitOr,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bit_and()?;
        while self.cur_sym(Sym::Caret) {
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_bit_and()?;
            left = Expr::Binary {
                op: BinaryOp::BitXor,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_shift()?;
        while self.cur_sym(Sym::Amp) {
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_shift()?;
            left = Expr::Binary {
                op: BinaryOp::BitAnd,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.cur.kind {
                TokenKind::Sym(Sym::Shl) => BinaryOp::Shl,
                TokenKind::Sym(Sym::Shr) => BinaryOp::Shr,
                _ => return Ok(left),
            };
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.cur.kind {
                TokenKind::Sym(Sym::Plus) => BinaryOp::Add,
                TokenKind::Sym(Sym::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cur.kind {
                TokenKind::Sym(Sym::Star) => BinaryOp::Mul,
                TokenKind::Sym(Sym::Slash) => BinaryOp::Div,
                TokenKind::Sym(Sym::Concat) => BinaryOp::Concat,
                _ => return Ok(left),
            };
            let pos = self.cur.pos;
            self.bump()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                pos,
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.cur.kind {
            TokenKind::Sym(Sym::Plus) => Some(UnaryOp::Plus),
            TokenKind::Sym(Sym::Minus) => Some(UnaryOp::Minus),
            TokenKind::Sym(Sym::Tilde) => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            let pos = self.cur.pos;
            self.bump()?;
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
                pos,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.cur_sym(Sym::Dot) {
                // Leave `.*` for the projection parser.
                if self.peek_sym(Sym::Star) {
                    return Ok(expr);
                }
                self.bump()?;
                let field = self.parse_ident()?;
                expr = match expr {
                    Expr::Ident(head) => Expr::Path(Path {
                        idents: vec![head, field],
                    }),
                    Expr::Path(mut path) => {
                        path.idents.push(field);
                        Expr::Path(path)
                    }
                    other => Expr::Selector {
                        expr: Box::new(other),
                        field,
                    },
                };
                continue;
            }

            if self.cur_sym(Sym::LParen) && matches!(expr, Expr::Ident(_) | Expr::Path(_)) {
                let func = match expr {
                    Expr::Ident(id) => Path { idents: vec![id] },
                    Expr::Path(path) => path,
                    _ => unreachable!(),
                };
                expr = self.parse_call(func)?;
                continue;
            }

            if self.cur_sym(Sym::LBracket) {
                self.bump()?;
                let (kind, index) = if (self.cur_ctx("OFFSET") || self.cur_ctx("ORDINAL"))
                    && self.peek_sym(Sym::LParen)
                {
                    let kind = if self.cur_ctx("OFFSET") {
                        IndexKind::Offset
                    } else {
                        IndexKind::Ordinal
                    };
                    self.bump()?;
                    self.expect_sym(Sym::LParen)?;
                    let index = self.parse_expr()?;
                    self.expect_sym(Sym::RParen)?;
                    (kind, index)
                } else {
                    (IndexKind::Plain, self.parse_expr()?)
                };
                self.expect_sym(Sym::RBracket)?;
                expr = Expr::Index {
                    expr: Box::new(expr),
                    index: Box::new(index),
                    kind,
                };
                continue;
            }

            return Ok(expr);
        }
    }

    fn parse_call(&mut self, func: Path) -> Result<Expr, ParseError> {
        self.expect_sym(Sym::LParen)?;

        // COUNT(*) gets a dedicated node.
        if self.cur_sym(Sym::Star) && self.peek_sym(Sym::RParen) {
            let last = func
                .idents
                .last()
                .map(|i| i.name.to_ascii_uppercase())
                .unwrap_or_default();
            if last != "COUNT" {
                return Err(self.error_at(self.cur.pos, "'*' is only valid in COUNT(*)"));
            }
            let pos = func.pos();
            self.bump()?;
            self.expect_sym(Sym::RParen)?;
            return Ok(Expr::CountStar { pos });
        }

        let distinct = self.eat_kw(Keyword::Distinct)?;
        let mut args = Vec::new();
        if !self.cur_sym(Sym::RParen) {
            args.push(self.parse_expr()?);
            while self.eat_sym(Sym::Comma)? {
                args.push(self.parse_expr()?);
            }
        }
        self.expect_sym(Sym::RParen)?;

        let over = if self.cur_kw(Keyword::Over) {
            self.bump()?;
            self.skip_parens()?;
            true
        } else {
            false
        };

        Ok(Expr::Call {
            func,
            args,
            distinct,
            over,
        })
    }

    fn parse_cast(&mut self, safe: bool) -> Result<Expr, ParseError> {
        let pos = self.cur.pos;
        self.bump()?; // CAST / SAFE_CAST
        self.expect_sym(Sym::LParen)?;
        let expr = self.parse_expr()?;
        self.expect_kw(Keyword::As)?;
        let ty = self.parse_type()?;
        self.expect_sym(Sym::RParen)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            ty,
            safe,
            pos,
        })
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        if self.eat_kw(Keyword::Array)? {
            self.expect_sym(Sym::Lt)?;
            let item = self.parse_type()?;
            self.expect_sym(Sym::Gt)?;
            return Ok(Type::Array(Box::new(item)));
        }
        if self.eat_kw(Keyword::Struct)? {
            self.expect_sym(Sym::Lt)?;
            let mut fields = Vec::new();
            if !self.cur_sym(Sym::Gt) {
                loop {
                    fields.push(self.parse_struct_type_field()?);
                    if !self.eat_sym(Sym::Comma)? {
                        break;
                    }
                }
            }
            self.expect_sym(Sym::Gt)?;
            return Ok(Type::Struct(fields));
        }

        let name = self.parse_ident()?.name.to_ascii_uppercase();
        // Parameterized scalars (STRING(10)) are legal in casts; the length
        // does not survive into the engine-neutral type.
        if self.cur_sym(Sym::LParen) {
            self.skip_parens()?;
        }
        Ok(Type::Simple(name))
    }

    fn parse_struct_type_field(&mut self) -> Result<StructTypeField, ParseError> {
        // `name TYPE` when two identifiers (or an identifier then a type
        // keyword) are adjacent; a lone type name otherwise.
        let named = matches!(self.cur.kind, TokenKind::Ident { .. })
            && (matches!(self.peek.kind, TokenKind::Ident { .. })
                || self.peek_kw(Keyword::Array)
                || self.peek_kw(Keyword::Struct));
        if named {
            let name = self.parse_ident()?;
            let ty = self.parse_type()?;
            Ok(StructTypeField {
                name: Some(name),
                ty,
            })
        } else {
            let ty = self.parse_type()?;
            Ok(StructTypeField { name: None, ty })
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let pos = self.cur.pos;
        match self.cur.kind.clone() {
            TokenKind::Int { value, base } => {
                self.bump()?;
                Ok(Expr::IntLit { value, base, pos })
            }
            TokenKind::Float(value) => {
                self.bump()?;
                Ok(Expr::FloatLit { value, pos })
            }
            TokenKind::String(value) => {
                self.bump()?;
                Ok(Expr::StringLit { value, pos })
            }
            TokenKind::Bytes(value) => {
                self.bump()?;
                Ok(Expr::BytesLit { value, pos })
            }
            TokenKind::Param(name) => {
                self.bump()?;
                Ok(Expr::Param { name, pos })
            }
            TokenKind::Keyword(Keyword::True) => {
                self.bump()?;
                Ok(Expr::BoolLit { value: true, pos })
            }
            TokenKind::Keyword(Keyword::False) => {
                self.bump()?;
                Ok(Expr::BoolLit { value: false, pos })
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.bump()?;
                Ok(Expr::NullLit { pos })
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.bump()?;
                Ok(Expr::Default { pos })
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast(false),
            TokenKind::Keyword(Keyword::If) => {
                if !self.peek_sym(Sym::LParen) {
                    return Err(self.unexpected("'(' after IF"));
                }
                self.bump()?;
                self.expect_sym(Sym::LParen)?;
                let cond = self.parse_expr()?;
                self.expect_sym(Sym::Comma)?;
                let then = self.parse_expr()?;
                self.expect_sym(Sym::Comma)?;
                let else_result = self.parse_expr()?;
                self.expect_sym(Sym::RParen)?;
                Ok(Expr::If {
                    cond: Box::new(cond),
                    then: Box::new(then),
                    else_result: Box::new(else_result),
                    pos,
                })
            }
            TokenKind::Keyword(Keyword::Extract) => {
                self.bump()?;
                self.expect_sym(Sym::LParen)?;
                let part = self.parse_ident()?;
                self.expect_kw(Keyword::From)?;
                let expr = self.parse_expr()?;
                // AT TIME ZONE only shifts the runtime clock; the extracted
                // part's type is unaffected.
                if self.eat_kw(Keyword::At)? {
                    self.expect_ctx("TIME")?;
                    self.expect_ctx("ZONE")?;
                    let _ = self.parse_expr()?;
                }
                self.expect_sym(Sym::RParen)?;
                Ok(Expr::Extract {
                    part,
                    expr: Box::new(expr),
                    pos,
                })
            }
            TokenKind::Keyword(Keyword::Exists) => {
                self.bump()?;
                self.expect_sym(Sym::LParen)?;
                let query = self.parse_query()?;
                self.expect_sym(Sym::RParen)?;
                Ok(Expr::ExistsSubQuery {
                    query: Box::new(query),
                    pos,
                })
            }
            TokenKind::Keyword(Keyword::Array) => self.parse_array_construct(),
            TokenKind::Keyword(Keyword::Struct) => self.parse_struct_literal(),
            TokenKind::Keyword(Keyword::Interval) => self.parse_interval(),
            TokenKind::Sym(Sym::LBracket) => {
                self.bump()?;
                let mut values = Vec::new();
                if !self.cur_sym(Sym::RBracket) {
                    values.push(self.parse_expr()?);
                    while self.eat_sym(Sym::Comma)? {
                        values.push(self.parse_expr()?);
                    }
                }
                self.expect_sym(Sym::RBracket)?;
                Ok(Expr::ArrayLit { values, pos })
            }
            TokenKind::Sym(Sym::LParen) => {
                self.bump()?;
                if self.cur_kw(Keyword::Select) || self.cur_kw(Keyword::With) {
                    let query = self.parse_query()?;
                    self.expect_sym(Sym::RParen)?;
                    return Ok(Expr::ScalarSubQuery {
                        query: Box::new(query),
                        pos,
                    });
                }
                let first = self.parse_expr()?;
                if self.cur_sym(Sym::Comma) {
                    let mut values = vec![first];
                    while self.eat_sym(Sym::Comma)? {
                        values.push(self.parse_expr()?);
                    }
                    self.expect_sym(Sym::RParen)?;
                    return Ok(Expr::TupleStruct { values, pos });
                }
                self.expect_sym(Sym::RParen)?;
                Ok(Expr::Paren(Box::new(first)))
            }
            TokenKind::Ident { ref name, quoted } => {
                let upper = name.to_ascii_uppercase();
                if !quoted {
                    // Typed literals: DATE '…', TIMESTAMP '…', NUMERIC '…',
                    // JSON '…'.
                    if let TokenKind::String(value) = self.peek.kind.clone() {
                        let lit = match upper.as_str() {
                            "DATE" => Some(Expr::DateLit { value, pos }),
                            "TIMESTAMP" => Some(Expr::TimestampLit { value, pos }),
                            "NUMERIC" => Some(Expr::NumericLit { value, pos }),
                            "JSON" => Some(Expr::JsonLit { value, pos }),
                            _ => None,
                        };
                        if let Some(lit) = lit {
                            self.bump()?;
                            self.bump()?;
                            return Ok(lit);
                        }
                    }
                    if upper == "SAFE_CAST" && self.peek_sym(Sym::LParen) {
                        return self.parse_cast(true);
                    }
                }
                let ident = self.parse_ident()?;
                Ok(Expr::Ident(ident))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        let pos = self.cur.pos;
        self.expect_kw(Keyword::Case)?;
        let operand = if self.cur_kw(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut whens = Vec::new();
        while self.cur_kw(Keyword::When) {
            let when_pos = self.cur.pos;
            self.bump()?;
            let cond = self.parse_expr()?;
            self.expect_kw(Keyword::Then)?;
            let then = self.parse_expr()?;
            whens.push(CaseWhen {
                cond,
                then,
                pos: when_pos,
            });
        }
        if whens.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let else_result = if self.eat_kw(Keyword::Else)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_kw(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            whens,
            else_result,
            pos,
        })
    }

    fn parse_array_construct(&mut self) -> Result<Expr, ParseError> {
        let pos = self.cur.pos;
        self.expect_kw(Keyword::Array)?;

        // ARRAY<T>[…]: the element type is re-derived by the analyzer.
        if self.cur_sym(Sym::Lt) {
            self.bump()?;
            let _ = self.parse_type()?;
            self.expect_sym(Sym::Gt)?;
        }

        if self.cur_sym(Sym::LParen) {
            self.bump()?;
            let query = self.parse_query()?;
            self.expect_sym(Sym::RParen)?;
            return Ok(Expr::ArraySubQuery {
                query: Box::new(query),
                pos,
            });
        }

        self.expect_sym(Sym::LBracket)?;
        let mut values = Vec::new();
        if !self.cur_sym(Sym::RBracket) {
            values.push(self.parse_expr()?);
            while self.eat_sym(Sym::Comma)? {
                values.push(self.parse_expr()?);
            }
        }
        self.expect_sym(Sym::RBracket)?;
        Ok(Expr::ArrayLit { values, pos })
    }

    fn parse_struct_literal(&mut self) -> Result<Expr, ParseError> {
        let pos = self.cur.pos;
        self.expect_kw(Keyword::Struct)?;

        if self.cur_sym(Sym::Lt) {
            self.bump()?;
            let mut fields = Vec::new();
            if !self.cur_sym(Sym::Gt) {
                loop {
                    let field = self.parse_struct_type_field()?;
                    fields.push(StructLitField {
                        name: field.name,
                        ty: field.ty,
                    });
                    if !self.eat_sym(Sym::Comma)? {
                        break;
                    }
                }
            }
            self.expect_sym(Sym::Gt)?;

            self.expect_sym(Sym::LParen)?;
            let mut values = Vec::new();
            if !self.cur_sym(Sym::RParen) {
                values.push(self.parse_expr()?);
                while self.eat_sym(Sym::Comma)? {
                    values.push(self.parse_expr()?);
                }
            }
            self.expect_sym(Sym::RParen)?;
            return Ok(Expr::TypedStruct {
                fields,
                values,
                pos,
            });
        }

        self.expect_sym(Sym::LParen)?;
        let mut args = Vec::new();
        if !self.cur_sym(Sym::RParen) {
            loop {
                let expr = self.parse_expr()?;
                if self.eat_kw(Keyword::As)? {
                    let alias = self.parse_ident()?;
                    args.push(StructArg::Alias { expr, alias });
                } else {
                    args.push(StructArg::Expr(expr));
                }
                if !self.eat_sym(Sym::Comma)? {
                    break;
                }
            }
        }
        self.expect_sym(Sym::RParen)?;
        Ok(Expr::TypelessStruct { args, pos })
    }

    fn parse_interval(&mut self) -> Result<Expr, ParseError> {
        let pos = self.cur.pos;
        self.expect_kw(Keyword::Interval)?;

        match self.cur.kind.clone() {
            TokenKind::String(value) => {
                self.bump()?;
                let start = self.parse_ident()?.name.to_ascii_uppercase();
                if self.eat_kw(Keyword::To)? {
                    let end = self.parse_ident()?.name.to_ascii_uppercase();
                    Ok(Expr::IntervalRange {
                        value,
                        start,
                        end,
                        pos,
                    })
                } else {
                    let lit_pos = pos;
                    Ok(Expr::IntervalSingle {
                        value: Box::new(Expr::StringLit {
                            value,
                            pos: lit_pos,
                        }),
                        part: start,
                        pos,
                    })
                }
            }
            _ => {
                let value = self.parse_unary()?;
                let part = self.parse_ident()?.name.to_ascii_uppercase();
                Ok(Expr::IntervalSingle {
                    value: Box::new(value),
                    part,
                    pos,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(src: &str) -> Statement {
        parse_statement(src).expect("parse")
    }

    fn select(src: &str) -> Select {
        match stmt(src) {
            Statement::Query(q) => match q.query.expr {
                QueryExpr::Select(s) => *s,
                other => panic!("expected select, got {other:?}"),
            },
            other => panic!("expected query, got {other:?}"),
        }
    }

    #[test]
    fn simple_select_with_params() {
        let s = select("SELECT id, name FROM users WHERE id = @user_id");
        assert_eq!(s.results.len(), 2);
        assert!(matches!(
            s.where_clause,
            Some(Expr::Binary {
                op: BinaryOp::Eq,
                ..
            })
        ));
    }

    #[test]
    fn select_star_and_dot_star() {
        let s = select("SELECT *, t.* FROM t");
        assert!(matches!(s.results[0], SelectItem::Star { .. }));
        assert!(matches!(s.results[1], SelectItem::DotStar { .. }));
    }

    #[test]
    fn star_except_replace_modifiers() {
        let s = select("SELECT * EXCEPT (secret) REPLACE (x + 1 AS x) FROM t");
        match &s.results[0] {
            SelectItem::Star {
                except, replace, ..
            } => {
                assert_eq!(except.len(), 1);
                assert_eq!(replace.len(), 1);
            }
            other => panic!("expected star: {other:?}"),
        }
    }

    #[test]
    fn order_limit_offset_attach_to_query() {
        let q = match stmt("SELECT a FROM t ORDER BY a DESC LIMIT 10 OFFSET 5") {
            Statement::Query(q) => q.query,
            _ => unreachable!(),
        };
        assert_eq!(q.order_by.len(), 1);
        assert_eq!(q.order_by[0].dir, Some(Direction::Desc));
        let limit = q.limit.expect("limit");
        assert!(limit.offset.is_some());
    }

    #[test]
    fn insert_values_and_then_return() {
        let s = stmt(
            "INSERT INTO users (id, name) VALUES (@id, @name) THEN RETURN id, name",
        );
        match s {
            Statement::Insert(insert) => {
                assert_eq!(insert.columns.len(), 2);
                assert!(matches!(insert.input, InsertInput::Values(ref rows) if rows.len() == 1));
                assert_eq!(insert.then_return.expect("then return").items.len(), 2);
            }
            other => panic!("expected insert: {other:?}"),
        }
    }

    #[test]
    fn insert_without_into_and_from_subquery() {
        let s = stmt("INSERT users (id) SELECT id FROM staged");
        assert!(matches!(
            s,
            Statement::Insert(Insert {
                input: InsertInput::Query(_),
                ..
            })
        ));
    }

    #[test]
    fn update_set_default_keyword() {
        let s = stmt("UPDATE users SET name = DEFAULT WHERE id = @id");
        match s {
            Statement::Update(update) => {
                assert!(matches!(update.items[0].value, Expr::Default { .. }));
                assert!(update.where_clause.is_some());
            }
            other => panic!("expected update: {other:?}"),
        }
    }

    #[test]
    fn delete_without_from() {
        assert!(matches!(stmt("DELETE users WHERE id = 1"), Statement::Delete(_)));
    }

    #[test]
    fn unnest_with_offset_aliases() {
        let s = select("SELECT value, pos FROM UNNEST(@arr) AS value WITH OFFSET AS pos");
        match s.from.expect("from") {
            TableExpr::Unnest(unnest) => {
                assert_eq!(unnest.alias.expect("alias").name, "value");
                let off = unnest.with_offset.expect("with offset");
                assert_eq!(off.alias.expect("offset alias").name, "pos");
            }
            other => panic!("expected unnest: {other:?}"),
        }
    }

    #[test]
    fn join_with_using_clause() {
        let s = select("SELECT a FROM t1 JOIN t2 USING (id, org)");
        match s.from.expect("from") {
            TableExpr::Join(join) => match join.cond {
                JoinCond::Using(idents) => assert_eq!(idents.len(), 2),
                other => panic!("expected using: {other:?}"),
            },
            other => panic!("expected join: {other:?}"),
        }
    }

    #[test]
    fn namespaced_and_safe_calls_keep_case() {
        let s = select("SELECT SAFE.SUBSTR(name, 0, -2), NET.IPV4_TO_INT64(ip) FROM t");
        let names: Vec<String> = s
            .results
            .iter()
            .map(|item| match item {
                SelectItem::Expr(Expr::Call { func, .. }) => func.dotted(),
                other => panic!("expected call: {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["SAFE.SUBSTR", "NET.IPV4_TO_INT64"]);
    }

    #[test]
    fn count_star_is_dedicated_node() {
        let s = select("SELECT COUNT(*) FROM t");
        assert!(matches!(s.results[0], SelectItem::Expr(Expr::CountStar { .. })));
    }

    #[test]
    fn star_in_non_count_call_is_rejected() {
        assert!(parse_statement("SELECT SUM(*) FROM t").is_err());
    }

    #[test]
    fn typed_struct_literal_and_field_access() {
        let s = select("SELECT STRUCT<id INT64, name STRING>(42, 'Alice').name");
        match &s.results[0] {
            SelectItem::Expr(Expr::Selector { expr, field }) => {
                assert_eq!(field.name, "name");
                assert!(matches!(**expr, Expr::TypedStruct { .. }));
            }
            other => panic!("expected selector: {other:?}"),
        }
    }

    #[test]
    fn array_index_forms() {
        for (src, kind) in [
            ("SELECT a[1] FROM t", IndexKind::Plain),
            ("SELECT a[OFFSET(1)] FROM t", IndexKind::Offset),
            ("SELECT a[ORDINAL(1)] FROM t", IndexKind::Ordinal),
        ] {
            let s = select(src);
            match &s.results[0] {
                SelectItem::Expr(Expr::Index { kind: k, .. }) => assert_eq!(*k, kind),
                other => panic!("expected index: {other:?}"),
            }
        }
    }

    #[test]
    fn in_forms() {
        let s = select("SELECT 1 FROM t WHERE a IN (1, 2) AND b IN (SELECT id FROM u) AND c IN UNNEST(@xs)");
        assert!(s.where_clause.is_some());
    }

    #[test]
    fn interval_literal_forms() {
        let single = select("SELECT INTERVAL 5 DAY");
        assert!(matches!(
            s_item(&single),
            Expr::IntervalSingle { part, .. } if part == "DAY"
        ));
        let range = select("SELECT INTERVAL '10:20' HOUR TO MINUTE");
        assert!(matches!(
            s_item(&range),
            Expr::IntervalRange { start, end, .. } if start == "HOUR" && end == "MINUTE"
        ));
    }

    fn s_item(s: &Select) -> &Expr {
        match &s.results[0] {
            SelectItem::Expr(e) => e,
            other => panic!("expected expr item: {other:?}"),
        }
    }

    #[test]
    fn typed_literals() {
        let s = select("SELECT DATE '2024-01-01', TIMESTAMP '2024-01-01 00:00:00', JSON '{}'");
        assert!(matches!(s.results[0], SelectItem::Expr(Expr::DateLit { .. })));
        assert!(matches!(
            s.results[1],
            SelectItem::Expr(Expr::TimestampLit { .. })
        ));
        assert!(matches!(s.results[2], SelectItem::Expr(Expr::JsonLit { .. })));
    }

    #[test]
    fn create_table_with_interleave_and_sizes() {
        let s = stmt(
            "CREATE TABLE orders (id INT64 NOT NULL, note STRING(100), tags ARRAY<STRING(MAX)>) \
             PRIMARY KEY (id), INTERLEAVE IN PARENT users ON DELETE CASCADE",
        );
        match s {
            Statement::CreateTable(t) => {
                assert_eq!(t.columns.len(), 3);
                assert!(t.columns[0].not_null);
                assert!(t.interleave_in_parent.is_some());
                assert_eq!(t.primary_key.len(), 1);
            }
            other => panic!("expected create table: {other:?}"),
        }
    }

    #[test]
    fn create_index_with_storing() {
        let s = stmt("CREATE UNIQUE INDEX idx ON users (name DESC) STORING (email)");
        match s {
            Statement::CreateIndex(i) => {
                assert!(i.unique);
                assert_eq!(i.keys[0].dir, Some(Direction::Desc));
                assert_eq!(i.storing.len(), 1);
            }
            other => panic!("expected create index: {other:?}"),
        }
    }

    #[test]
    fn alter_table_forms() {
        assert!(matches!(
            stmt("ALTER TABLE t ADD COLUMN c STRING(10)"),
            Statement::AlterTable(AlterTable {
                alteration: TableAlteration::AddColumn { .. },
                ..
            })
        ));
        assert!(matches!(
            stmt("ALTER TABLE t DROP COLUMN c"),
            Statement::AlterTable(AlterTable {
                alteration: TableAlteration::DropColumn { .. },
                ..
            })
        ));
        assert!(matches!(
            stmt("ALTER TABLE t ALTER COLUMN c SET DEFAULT 1"),
            Statement::AlterTable(AlterTable {
                alteration: TableAlteration::AlterColumn {
                    op: ColumnAlteration::SetDefault { .. },
                    ..
                },
                ..
            })
        ));
        assert!(matches!(
            stmt("ALTER TABLE t ALTER COLUMN c DROP DEFAULT"),
            Statement::AlterTable(AlterTable {
                alteration: TableAlteration::AlterColumn {
                    op: ColumnAlteration::DropDefault,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn create_or_replace_view() {
        let s = stmt("CREATE OR REPLACE VIEW v SQL SECURITY INVOKER AS SELECT id FROM t");
        assert!(matches!(
            s,
            Statement::CreateView(CreateView {
                or_replace: true,
                ..
            })
        ));
    }

    #[test]
    fn with_clause_and_compound_query() {
        let s = stmt("WITH a AS (SELECT 1) SELECT * FROM a UNION ALL SELECT * FROM a");
        match s {
            Statement::Query(q) => {
                assert!(q.query.with.is_some());
                assert!(matches!(q.query.expr, QueryExpr::Compound { .. }));
            }
            other => panic!("expected query: {other:?}"),
        }
    }

    #[test]
    fn tablesample_is_recognized() {
        let s = select("SELECT a FROM t TABLESAMPLE BERNOULLI (10 PERCENT)");
        match s.from.expect("from") {
            TableExpr::Table { sample, .. } => {
                assert_eq!(sample.expect("sample").method, "BERNOULLI");
            }
            other => panic!("expected table: {other:?}"),
        }
    }

    #[test]
    fn missing_projection_is_a_syntax_error() {
        let err = parse_statement("SELECT FROM users").unwrap_err();
        assert!(err.first().is_some());
    }

    #[test]
    fn multi_statement_errors_accumulate() {
        let err = parse_statements("SELECT FROM a; SELEKT 1").unwrap_err();
        match err {
            ParseError::Multiple(errors) => assert_eq!(errors.len(), 2),
            ParseError::Syntax(_) => panic!("expected multiple errors"),
        }
    }
}
