//! Tokenizer for RFC 4512 definition text.
//!
//! The grammar needs very few token kinds: parentheses, the `$` list
//! separator, quoted strings and bare words. Bare words cover keywords,
//! numeric OIDs, descriptors, `noidlen` forms such as `1.2.3{64}` and rule
//! IDs; the parser decides what each one means from context.

use crate::error::{SchemaError, SchemaResult};

/// Span of source text, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LParen,
    RParen,
    Dollar,
    /// `'...'`, span includes the quotes
    Quoted,
    /// Anything else up to whitespace or punctuation
    Word,
    Eof,
}

/// Token with kind and source span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Definition text lexer.
pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> SchemaResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span {
                start,
                end: self.pos,
            },
        }
    }

    fn next_token(&mut self) -> SchemaResult<Token> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(b) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        let kind = match b {
            b'(' => {
                self.pos += 1;
                TokenKind::LParen
            }
            b')' => {
                self.pos += 1;
                TokenKind::RParen
            }
            b'$' => {
                self.pos += 1;
                TokenKind::Dollar
            }
            b'\'' => {
                self.pos += 1;
                while self.peek().is_some_and(|b| b != b'\'') {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(SchemaError::parse(start, "unterminated quoted string"));
                }
                self.pos += 1;
                TokenKind::Quoted
            }
            _ => {
                while self.peek().is_some_and(|b| {
                    !b.is_ascii_whitespace() && !matches!(b, b'(' | b')' | b'$' | b'\'')
                }) {
                    self.pos += 1;
                }
                TokenKind::Word
            }
        };
        Ok(self.token(kind, start))
    }
}

/// Decode the body of a quoted string, resolving `\27` and `\5C` escapes.
pub fn unescape(raw: &str, offset: usize) -> SchemaResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('\\') {
        out.push_str(&rest[..at]);
        let escape = rest.get(at + 1..at + 3).unwrap_or_default();
        match escape.to_ascii_uppercase().as_str() {
            "27" => out.push('\''),
            "5C" => out.push('\\'),
            _ => return Err(SchemaError::parse(offset + at, "invalid escape in quoted string")),
        }
        rest = &rest[at + 3..];
    }
    out.push_str(rest);
    Ok(out)
}
