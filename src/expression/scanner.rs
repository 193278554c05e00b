//! Quoting-aware scanner for DAX formula text.
//!
//! This is not a DAX lexer. It only splits the text into the spans that
//! matter for renaming identifiers, and keeps every byte of the input in
//! exactly one token so that concatenating the token texts reproduces the
//! input.
//!
//! ## States
//!
//! - **quoted identifier** `'...'`: a table name; `''` is an escaped quote
//! - **bracketed reference** `[...]`: a column or measure; `]]` is escaped
//! - **string literal** `"..."`: opaque; `""` is escaped
//! - **comment** `// ...`, `-- ...`, `/* ... */`: opaque
//! - **word**: a maximal run of word characters (a bare table name,
//!   a function, a keyword or a number)
//!
//! An opening quote, bracket or block comment that is never closed turns
//! the rest of the input into a single [`TokenKind::Other`] token.

use std::borrow::Cow;

use super::identifier_utils::{is_word_char, unbracket_column, unquote_table_name};

/// Kind of span produced by [`ExpressionScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    QuotedIdentifier,
    Word,
    BracketedReference,
    StringLiteral,
    Comment,
    Whitespace,
    /// Punctuation, operators, or an unterminated quoted/bracketed tail
    Other,
}

/// A span of the scanned expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw source text, including any quotes or brackets.
    pub text: &'a str,
    /// Byte offset of `text` in the scanned expression.
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// True for tokens that can name a table: bare words and quoted identifiers.
    #[inline]
    pub fn is_table_candidate(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::QuotedIdentifier)
    }

    /// True for a single-quoted identifier.
    #[inline]
    pub fn is_quoted(&self) -> bool {
        self.kind == TokenKind::QuotedIdentifier
    }

    /// The identifier this token names, with quoting and escapes removed.
    ///
    /// Returns `None` for tokens that are not identifiers.
    pub fn identifier(&self) -> Option<Cow<'a, str>> {
        match self.kind {
            TokenKind::Word => Some(Cow::Borrowed(self.text)),
            TokenKind::QuotedIdentifier => Some(unquote_table_name(self.text)),
            TokenKind::BracketedReference => Some(unbracket_column(self.text)),
            _ => None,
        }
    }
}

/// Left-to-right scanner over a formula string.
pub struct ExpressionScanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> ExpressionScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    // ========================================================================
    // Position helpers
    // ========================================================================

    #[inline]
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Byte length of the span starting at the current position whose
    /// opening delimiter is `open` and closing delimiter is `close`, where a
    /// doubled `close` is an escape. `None` if the span never closes.
    fn delimited_len(&self, open: char, close: char) -> Option<usize> {
        let body = &self.rest()[open.len_utf8()..];
        let mut chars = body.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            if c == close {
                if matches!(chars.peek(), Some((_, next)) if *next == close) {
                    chars.next();
                    continue;
                }
                return Some(open.len_utf8() + idx + close.len_utf8());
            }
        }
        None
    }

    /// Byte length of a run of characters satisfying `pred`.
    fn run_len(&self, pred: impl Fn(char) -> bool) -> usize {
        self.rest()
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(idx, _)| idx)
            .unwrap_or(self.rest().len())
    }

    fn line_comment_len(&self) -> usize {
        self.rest().find('\n').unwrap_or(self.rest().len())
    }

    fn block_comment_len(&self) -> Option<usize> {
        self.rest()[2..].find("*/").map(|idx| idx + 4)
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let offset = self.pos;
        self.pos += len;
        Token {
            kind,
            text: &self.src[offset..self.pos],
            offset,
        }
    }

    fn emit_rest_as_other(&mut self) -> Token<'a> {
        let len = self.rest().len();
        self.emit(TokenKind::Other, len)
    }
}

impl<'a> Iterator for ExpressionScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let c = self.peek_char()?;
        let rest = self.rest();

        let token = match c {
            '\'' => match self.delimited_len('\'', '\'') {
                Some(len) => self.emit(TokenKind::QuotedIdentifier, len),
                None => self.emit_rest_as_other(),
            },
            '[' => match self.delimited_len('[', ']') {
                Some(len) => self.emit(TokenKind::BracketedReference, len),
                None => self.emit_rest_as_other(),
            },
            '"' => match self.delimited_len('"', '"') {
                Some(len) => self.emit(TokenKind::StringLiteral, len),
                None => self.emit_rest_as_other(),
            },
            '/' if rest.starts_with("//") => {
                let len = self.line_comment_len();
                self.emit(TokenKind::Comment, len)
            }
            '-' if rest.starts_with("--") => {
                let len = self.line_comment_len();
                self.emit(TokenKind::Comment, len)
            }
            '/' if rest.starts_with("/*") => match self.block_comment_len() {
                Some(len) => self.emit(TokenKind::Comment, len),
                None => self.emit_rest_as_other(),
            },
            c if c.is_whitespace() => {
                let len = self.run_len(char::is_whitespace);
                self.emit(TokenKind::Whitespace, len)
            }
            c if is_word_char(c) => {
                let len = self.run_len(is_word_char);
                self.emit(TokenKind::Word, len)
            }
            c => self.emit(TokenKind::Other, c.len_utf8()),
        };

        Some(token)
    }
}

/// Scan `expression` into tokens.
pub fn tokenize(expression: &str) -> Vec<Token<'_>> {
    ExpressionScanner::new(expression).collect()
}
