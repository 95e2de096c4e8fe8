//! Streaming lexer.
//!
//! [`Scanner`] walks a byte slice and yields one `Result<Token>` per lexeme,
//! followed by exactly one `EOF` token.  A bad byte produces an `Err` item and
//! scanning carries on with the next byte, so a single pass reports every
//! lexical problem in the file.
//!
//! ```rust
//! use treelox::scanner::Scanner;
//!
//! let (tokens, errors) = Scanner::new(b"print 7 % 3; // four").scan_all();
//! assert!(errors.is_empty());
//! assert_eq!(tokens.len(), 6);
//! ```

use std::iter::FusedIterator;

use log::{debug, info};
use memchr::memchr;
use phf::phf_map;

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

/// Reserved words, resolved with a compile‑time perfect hash.
static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

pub struct Scanner<'a> {
    src: &'a [u8],
    /// First byte of the lexeme being scanned.
    start: usize,
    /// One past the last byte consumed.
    curr: usize,
    line: usize,
    eof_emitted: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            eof_emitted: false,
        }
    }

    /// Drain the scanner, splitting tokens from lex errors.  The token
    /// vector always ends with `EOF`.
    pub fn scan_all(self) -> (Vec<Token>, Vec<LoxError>) {
        let mut tokens: Vec<Token> = Vec::new();
        let mut errors: Vec<LoxError> = Vec::new();

        for item in self {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        debug!(
            "scan_all produced {} token(s) and {} error(s)",
            tokens.len(),
            errors.len()
        );

        (tokens, errors)
    }

    // ── cursor ──────────────────────────────────────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Current byte, or `0` past the end.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.get(self.curr).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.src.get(self.curr + 1).copied().unwrap_or(0)
    }

    /// Pick `pair` when the next byte is `second` (consuming it), else `single`.
    #[inline(always)]
    fn pair_or(&mut self, second: u8, pair: TokenType, single: TokenType) -> TokenType {
        if self.peek() == second {
            self.curr += 1;
            pair
        } else {
            single
        }
    }

    fn text(&self, from: usize, to: usize) -> String {
        String::from_utf8_lossy(&self.src[from..to]).into_owned()
    }

    // ── lexing ──────────────────────────────────────────────────────────

    /// Consume one lexeme.  `Ok(None)` means trivia (whitespace, comment).
    fn scan_token(&mut self) -> Result<Option<TokenType>> {
        use TokenType::*;

        let kind: TokenType = match self.advance() {
            b'(' => LEFT_PAREN,
            b')' => RIGHT_PAREN,
            b'{' => LEFT_BRACE,
            b'}' => RIGHT_BRACE,
            b',' => COMMA,
            b'.' => DOT,
            b'-' => MINUS,
            b'+' => PLUS,
            b';' => SEMICOLON,
            b'*' => STAR,
            b'%' => MODULO,

            b'!' => self.pair_or(b'=', BANG_EQUAL, BANG),
            b'=' => self.pair_or(b'=', EQUAL_EQUAL, EQUAL),
            b'<' => self.pair_or(b'=', LESS_EQUAL, LESS),
            b'>' => self.pair_or(b'=', GREATER_EQUAL, GREATER),

            b'/' if self.peek() == b'/' => {
                self.skip_comment();
                return Ok(None);
            }
            b'/' => SLASH,

            b' ' | b'\r' | b'\t' => return Ok(None),

            b'\n' => {
                self.line += 1;
                return Ok(None);
            }

            b'"' => self.string()?,

            b'0'..=b'9' => self.number(),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            other => {
                self.skip_continuation_bytes(other);

                return Err(LoxError::lex(
                    self.line,
                    format!("Unexpected character: {}", self.text(self.start, self.curr)),
                ));
            }
        };

        Ok(Some(kind))
    }

    /// After a stray multi‑byte lead byte, consume the rest of its UTF‑8
    /// sequence so the character is reported once.
    fn skip_continuation_bytes(&mut self, lead: u8) {
        let width: usize = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };

        for _ in 1..width {
            if !matches!(self.peek(), 0x80..=0xBF) {
                break;
            }
            self.curr += 1;
        }
    }

    /// Jump to the end of the line; the newline itself is left for the line
    /// counter.
    fn skip_comment(&mut self) {
        self.curr = match memchr(b'\n', &self.src[self.curr..]) {
            Some(offset) => self.curr + offset,
            None => self.src.len(),
        };
    }

    /// String literals may span lines; the token carries the text between
    /// the quotes.
    fn string(&mut self) -> Result<TokenType> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(LoxError::lex(self.line, "Unterminated string."));
        }

        self.curr += 1;

        Ok(TokenType::STRING(self.text(self.start + 1, self.curr - 1)))
    }

    /// Digits with an optional fractional part.  A trailing `.` is left for
    /// the next token.
    fn number(&mut self) -> TokenType {
        while self.peek().is_ascii_digit() {
            self.curr += 1;
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.curr += 1;

            while self.peek().is_ascii_digit() {
                self.curr += 1;
            }
        }

        // only ASCII digits and one dot were consumed
        let value: f64 = self.text(self.start, self.curr).parse().unwrap_or(0.0);

        TokenType::NUMBER(value)
    }

    fn identifier(&mut self) -> TokenType {
        while matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.curr += 1;
        }

        KEYWORDS
            .get(&self.src[self.start..self.curr])
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.is_at_end() {
            self.start = self.curr;

            match self.scan_token() {
                Ok(Some(kind)) => {
                    let lexeme: String = self.text(self.start, self.curr);
                    debug!("Scanned {:?} on line {}", kind, self.line);

                    return Some(Ok(Token::new(kind, lexeme, self.line)));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }

        if self.eof_emitted {
            return None;
        }

        self.eof_emitted = true;
        Some(Ok(Token::new(TokenType::EOF, "", self.line)))
    }
}

impl FusedIterator for Scanner<'_> {}
