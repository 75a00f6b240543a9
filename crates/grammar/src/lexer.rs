// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! GoogleSQL lexer.
//!
//! The lexer walks the buffer byte by byte and produces [`Token`]s carrying
//! absolute byte ranges. Comments (`--`, `#`, `/* … */`) are not tokens;
//! they accumulate and ride along on the next token produced, which is the
//! contract the statement splitter builds on. A `;` inside a string or
//! bytes literal is consumed by the literal scan and can never look like a
//! statement terminator.
//!
//! Literal coverage: single- and double-quoted strings, triple-quoted
//! strings, `r`/`b`/`rb` prefixes, escape sequences, hex and decimal
//! integers (base recorded), floats, `@name` parameters and backtick-quoted
//! identifiers.

use crate::error::{position_at, SyntaxError};
use crate::token::{Comment, Keyword, Sym, Token, TokenKind};

/// Streaming lexer over a source buffer.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// The source buffer this lexer reads from.
    pub fn source(&self) -> &'a str {
        self.src
    }

    fn err(&self, message: impl Into<String>, at: usize) -> SyntaxError {
        SyntaxError::new(message, position_at(self.src, at))
    }

    fn byte(&self, at: usize) -> Option<u8> {
        self.src.as_bytes().get(at).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.byte(self.pos)
    }

    fn peek2(&self) -> Option<u8> {
        self.byte(self.pos + 1)
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.pos..].starts_with(pat)
    }

    /// Produce the next token, attaching any comments seen on the way.
    /// After the end of input, keeps returning EOF tokens.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let comments = self.skip_trivia()?;
        let start = self.pos;

        let Some(b) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos: start,
                end: start,
                comments,
            });
        };

        let kind = match b {
            b'`' => self.scan_quoted_ident()?,
            b'\'' | b'"' => self.scan_string(false, false)?,
            b'@' => self.scan_param()?,
            b'0'..=b'9' => self.scan_number()?,
            b'.' if self.peek2().is_some_and(|c| c.is_ascii_digit()) => self.scan_number()?,
            c if c == b'_' || c.is_ascii_alphabetic() => self.scan_word()?,
            _ => self.scan_symbol()?,
        };

        Ok(Token {
            kind,
            pos: start,
            end: self.pos,
            comments,
        })
    }

    /// Skip whitespace and collect comments until the next token byte.
    fn skip_trivia(&mut self) -> Result<Vec<Comment>, SyntaxError> {
        let mut comments = Vec::new();
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.pos += 1;
                }
                Some(b'-') if self.peek2() == Some(b'-') => {
                    comments.push(self.scan_line_comment());
                }
                Some(b'#') => {
                    comments.push(self.scan_line_comment());
                }
                Some(b'/') if self.peek2() == Some(b'*') => {
                    comments.push(self.scan_block_comment()?);
                }
                _ => return Ok(comments),
            }
        }
    }

    fn scan_line_comment(&mut self) -> Comment {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
        Comment {
            pos: start,
            end: self.pos,
        }
    }

    fn scan_block_comment(&mut self) -> Result<Comment, SyntaxError> {
        let start = self.pos;
        self.pos += 2; // "/*"
        loop {
            if self.starts_with("*/") {
                self.pos += 2;
                return Ok(Comment {
                    pos: start,
                    end: self.pos,
                });
            }
            if self.peek().is_none() {
                return Err(self.err("unclosed comment", start));
            }
            self.pos += 1;
        }
    }

    fn scan_quoted_ident(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        self.pos += 1; // opening backtick
        let name_start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'`' {
                let name = self.src[name_start..self.pos].to_string();
                self.pos += 1;
                if name.is_empty() {
                    return Err(self.err("empty quoted identifier", start));
                }
                return Ok(TokenKind::Ident { name, quoted: true });
            }
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
        Err(self.err("unclosed quoted identifier", start))
    }

    fn scan_param(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        self.pos += 1; // '@'
        let name_start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'_' || b.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == name_start {
            return Err(self.err("expected parameter name after '@'", start));
        }
        Ok(TokenKind::Param(self.src[name_start..self.pos].to_string()))
    }

    fn scan_number(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        if self.starts_with("0x") || self.starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(self.err("invalid hex literal", start));
            }
            return Ok(TokenKind::Int {
                value: self.src[digits_start..self.pos].to_string(),
                base: 16,
            });
        }

        let mut is_float = false;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if self.peek().is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                // Not an exponent after all (e.g. `1e` starting an identifier
                // would be malformed anyway, but `2east` never is a number).
                self.pos = mark;
            }
        }

        let text = &self.src[start..self.pos];
        if is_float {
            Ok(TokenKind::Float(text.to_string()))
        } else {
            Ok(TokenKind::Int {
                value: text.to_string(),
                base: 10,
            })
        }
    }

    fn scan_word(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'_' || b.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word = &self.src[start..self.pos];

        // String literal prefixes: r'…', b'…', rb'…', br'…' in any case.
        if word.len() <= 2
            && word.bytes().all(|b| matches!(b, b'r' | b'R' | b'b' | b'B'))
            && matches!(self.peek(), Some(b'\'') | Some(b'"'))
        {
            let raw = word.bytes().any(|b| matches!(b, b'r' | b'R'));
            let bytes = word.bytes().any(|b| matches!(b, b'b' | b'B'));
            return self.scan_string(raw, bytes);
        }

        if let Some(kw) = Keyword::lookup(word) {
            return Ok(TokenKind::Keyword(kw));
        }
        Ok(TokenKind::Ident {
            name: word.to_string(),
            quoted: false,
        })
    }

    fn scan_string(&mut self, raw: bool, bytes_lit: bool) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        let quote = self.peek().expect("caller checked quote");
        let triple = if quote == b'\'' {
            self.starts_with("'''")
        } else {
            self.starts_with("\"\"\"")
        };
        self.pos += if triple { 3 } else { 1 };

        let mut out: Vec<u8> = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.err("unclosed string literal", start));
            };

            if b == quote {
                if triple {
                    if self.byte(self.pos + 1) == Some(quote) && self.byte(self.pos + 2) == Some(quote)
                    {
                        self.pos += 3;
                        break;
                    }
                    out.push(b);
                    self.pos += 1;
                    continue;
                }
                self.pos += 1;
                break;
            }

            if b == b'\n' && !triple {
                return Err(self.err("unclosed string literal", start));
            }

            if b == b'\\' && !raw {
                self.pos += 1;
                let Some(esc) = self.peek() else {
                    return Err(self.err("unclosed string literal", start));
                };
                self.pos += 1;
                match esc {
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'r' => out.push(b'\r'),
                    b'\\' => out.push(b'\\'),
                    b'\'' => out.push(b'\''),
                    b'"' => out.push(b'"'),
                    b'`' => out.push(b'`'),
                    b'0' => out.push(0),
                    b'x' | b'X' => {
                        let hex_start = self.pos;
                        let hi = self.peek();
                        let lo = self.byte(self.pos + 1);
                        match (
                            hi.and_then(|c| (c as char).to_digit(16)),
                            lo.and_then(|c| (c as char).to_digit(16)),
                        ) {
                            (Some(h), Some(l)) => {
                                self.pos += 2;
                                out.push((h * 16 + l) as u8);
                            }
                            _ => return Err(self.err("invalid hex escape", hex_start)),
                        }
                    }
                    other => {
                        return Err(self.err(
                            format!("invalid escape sequence '\\{}'", other as char),
                            self.pos - 1,
                        ))
                    }
                }
                continue;
            }

            out.push(b);
            self.pos += 1;
        }

        if bytes_lit {
            Ok(TokenKind::Bytes(out))
        } else {
            match String::from_utf8(out) {
                Ok(s) => Ok(TokenKind::String(s)),
                Err(_) => Err(self.err("invalid UTF-8 in string literal", start)),
            }
        }
    }

    fn scan_symbol(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        let b = self.peek().expect("caller checked byte");
        let sym = match b {
            b'(' => Sym::LParen,
            b')' => Sym::RParen,
            b'[' => Sym::LBracket,
            b']' => Sym::RBracket,
            b',' => Sym::Comma,
            b';' => Sym::Semicolon,
            b'.' => Sym::Dot,
            b'+' => Sym::Plus,
            b'-' => Sym::Minus,
            b'*' => Sym::Star,
            b'/' => Sym::Slash,
            b'%' => Sym::Percent,
            b'^' => Sym::Caret,
            b'~' => Sym::Tilde,
            b'=' => Sym::Eq,
            b'&' => Sym::Amp,
            b'|' => {
                if self.peek2() == Some(b'|') {
                    self.pos += 1;
                    Sym::Concat
                } else {
                    Sym::Pipe
                }
            }
            b'!' => {
                if self.peek2() == Some(b'=') {
                    self.pos += 1;
                    Sym::NotEq
                } else {
                    return Err(self.err("unexpected character '!'", start));
                }
            }
            b'<' => match self.peek2() {
                Some(b'=') => {
                    self.pos += 1;
                    Sym::LtEq
                }
                Some(b'<') => {
                    self.pos += 1;
                    Sym::Shl
                }
                Some(b'>') => {
                    self.pos += 1;
                    Sym::NotEq
                }
                _ => Sym::Lt,
            },
            b'>' => match self.peek2() {
                Some(b'=') => {
                    self.pos += 1;
                    Sym::GtEq
                }
                Some(b'>') => {
                    self.pos += 1;
                    Sym::Shr
                }
                _ => Sym::Gt,
            },
            other => {
                return Err(self.err(
                    format!("unexpected character '{}'", other as char),
                    start,
                ))
            }
        };
        self.pos += 1;
        Ok(TokenKind::Sym(sym))
    }
}
