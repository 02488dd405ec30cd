// Formula lexer.
//
// Digit-leading stat spellings (`3PA`, `3P_PCT`) are recognized here as
// identifiers, so the parser never sees them as a number followed by a word.

use super::token::{Token, TokenKind};
use super::FormulaError;
use crate::stat::Stat;

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0 }
    }

    /// Lex the whole input. The returned vector always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, FormulaError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Byte offset where the word starting at `self.pos` ends.
    fn word_end(&self) -> usize {
        self.src[self.pos..]
            .find(|c: char| !is_word_char(c))
            .map_or(self.src.len(), |n| self.pos + n)
    }

    fn next_token(&mut self) -> Result<Token, FormulaError> {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        if c.is_ascii_alphabetic() || c == '_' {
            let end = self.word_end();
            self.pos = end;
            return Ok(Token::new(
                TokenKind::Ident(self.src[start..end].to_string()),
                start,
            ));
        }

        if c.is_ascii_digit() {
            let end = self.word_end();
            let word = &self.src[start..end];
            if word.bytes().any(|b| b.is_ascii_alphabetic() || b == b'_')
                && Stat::from_symbol(word).is_some()
            {
                self.pos = end;
                return Ok(Token::new(TokenKind::Ident(word.to_string()), start));
            }
            return self.number(start);
        }

        if c == '.' {
            return self.number(start);
        }

        let (kind, len) = match (c, self.peek_at(1)) {
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('<', Some('=')) => (TokenKind::LessEq, 2),
            ('<', _) => (TokenKind::Less, 1),
            ('>', Some('=')) => (TokenKind::GreaterEq, 2),
            ('>', _) => (TokenKind::Greater, 1),
            ('=', Some('=')) => (TokenKind::EqEq, 2),
            ('!', Some('=')) => (TokenKind::NotEq, 2),
            _ => return Err(FormulaError::UnexpectedChar { ch: c, pos: start }),
        };
        self.pos += len;
        Ok(Token::new(kind, start))
    }

    /// Lex `digits [. digits] [(e|E) [+|-] digits]`.
    fn number(&mut self, start: usize) -> Result<Token, FormulaError> {
        let bytes = self.src.as_bytes();
        let mut end = start;

        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut exp = end + 1;
            if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
                exp += 1;
            }
            if exp < bytes.len() && bytes[exp].is_ascii_digit() {
                while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                    exp += 1;
                }
                end = exp;
            }
        }

        let text = &self.src[start..end];
        let value: f64 = text.parse().map_err(|_| FormulaError::InvalidNumber {
            text: text.to_string(),
            pos: start,
        })?;
        self.pos = end;
        Ok(Token::new(TokenKind::Number(value), start))
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
