//! Parser-driven scanner.
//!
//! `scan` tokenizes in the ordinary expression context. Context-dependent tokens
//! (regular expressions, template continuations, JSX text, JSX names and
//! attribute strings) are produced by the `rescan_*` methods, which the parser calls
//! once it knows which reading applies. The scanner never fails: text it cannot
//! tokenize becomes a `TokenKind::Invalid` token.

use crate::text::{Span, is_line_terminator};
use crate::token::{PUNCTUATORS, TemplatePart, Token, TokenKind};

pub fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

pub fn is_ident_part(c: char) -> bool {
    is_ident_start(c)
        || c.is_ascii_digit()
        || c == '\u{200C}'
        || c == '\u{200D}'
        || (!c.is_ascii() && c.is_alphanumeric())
}

#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn token(&self, kind: TokenKind, start: usize, nl_before: bool) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32),
            nl_before,
            escaped: false,
        }
    }

    /// Skips whitespace, comments and a leading hashbang. Returns whether a line
    /// terminator was crossed.
    fn skip_trivia(&mut self) -> bool {
        let mut nl = false;
        if self.pos == 0 && self.src.starts_with("#!") {
            self.skip_line();
        }
        while let Some(c) = self.peek() {
            match c {
                c if is_line_terminator(c) => {
                    nl = true;
                    self.pos += c.len_utf8();
                }
                c if c.is_whitespace() || c == '\u{FEFF}' => self.pos += c.len_utf8(),
                '/' => match self.peek_nth(1) {
                    Some('/') => self.skip_line(),
                    Some('*') => {
                        let body_start = self.pos + 2;
                        match self.src[body_start..].find("*/") {
                            Some(rel) => {
                                let body = &self.src[body_start..body_start + rel];
                                if body.chars().any(is_line_terminator) {
                                    nl = true;
                                }
                                self.pos = body_start + rel + 2;
                            }
                            None => {
                                self.pos = self.src.len();
                            }
                        }
                    }
                    _ => break,
                },
                _ => break,
            }
        }
        nl
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Scans the next token in expression context.
    pub fn scan(&mut self) -> Token {
        let nl = self.skip_trivia();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Token::eof(start as u32, nl);
        };

        let kind = match c {
            c if is_ident_start(c) || c == '\\' => {
                let escaped = self.scan_identifier();
                if self.pos == start {
                    self.bump_char();
                    TokenKind::Invalid
                } else {
                    let mut tok = self.token(TokenKind::Ident, start, nl);
                    tok.escaped = escaped;
                    return tok;
                }
            }
            '0'..='9' => self.scan_number(),
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            '\'' | '"' => self.scan_string(c),
            '`' => {
                self.pos += 1;
                self.scan_template_body(TemplatePart::Full, TemplatePart::Head)
            }
            '#' if self.peek_nth(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.scan_identifier();
                TokenKind::PrivateName
            }
            _ => self.scan_punct(),
        };
        self.token(kind, start, nl)
    }

    /// Consumes identifier characters and unicode escapes. Returns whether an
    /// escape was seen.
    fn scan_identifier(&mut self) -> bool {
        let mut escaped = false;
        let mut first = true;
        while let Some(c) = self.peek() {
            if c == '\\' {
                if self.skip_unicode_escape() {
                    escaped = true;
                    first = false;
                    continue;
                }
                break;
            }
            let ok = if first {
                is_ident_start(c)
            } else {
                is_ident_part(c)
            };
            if !ok {
                break;
            }
            self.pos += c.len_utf8();
            first = false;
        }
        escaped
    }

    fn skip_unicode_escape(&mut self) -> bool {
        let rest = &self.src.as_bytes()[self.pos..];
        if !rest.starts_with(b"\\u") {
            return false;
        }
        let after = &rest[2..];
        if after.first() == Some(&b'{') {
            let Some(close) = after.iter().position(|&b| b == b'}') else {
                return false;
            };
            if close > 1 && after[1..close].iter().all(u8::is_ascii_hexdigit) {
                self.pos += 2 + close + 1;
                return true;
            }
            return false;
        }
        if after.len() >= 4 && after[..4].iter().all(u8::is_ascii_hexdigit) {
            self.pos += 6;
            return true;
        }
        false
    }

    fn eat_digits(&mut self, radix: u32) {
        while let Some(c) = self.peek() {
            if c == '_' || c.is_digit(radix) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let bytes = self.src.as_bytes();
        let radix = if bytes[self.pos] == b'0' {
            match bytes.get(self.pos + 1).map(u8::to_ascii_lowercase) {
                Some(b'x') => 16,
                Some(b'o') => 8,
                Some(b'b') => 2,
                _ => 10,
            }
        } else {
            10
        };

        if radix != 10 {
            self.pos += 2;
            self.eat_digits(radix);
        } else {
            self.eat_digits(10);
            if self.peek() == Some('.') {
                self.pos += 1;
                self.eat_digits(10);
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let save = self.pos;
                self.pos += 1;
                if matches!(self.peek(), Some('+' | '-')) {
                    self.pos += 1;
                }
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.eat_digits(10);
                } else {
                    self.pos = save;
                }
            }
        }
        if self.peek() == Some('n') {
            self.pos += 1;
        }
        TokenKind::Number
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => return TokenKind::Invalid,
                Some(c) if c == quote => {
                    self.pos += 1;
                    return TokenKind::String;
                }
                Some('\\') => {
                    self.pos += 1;
                    if self.src[self.pos..].starts_with("\r\n") {
                        self.pos += 2;
                    } else {
                        self.bump_char();
                    }
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
    }

    /// Scans template characters up to the closing backtick or the next `${`.
    fn scan_template_body(&mut self, end: TemplatePart, subst: TemplatePart) -> TokenKind {
        loop {
            match self.peek() {
                None => return TokenKind::Invalid,
                Some('`') => {
                    self.pos += 1;
                    return TokenKind::Template(end);
                }
                Some('\\') => {
                    self.pos += 1;
                    self.bump_char();
                }
                Some('$') if self.peek_nth(1) == Some('{') => {
                    self.pos += 2;
                    return TokenKind::Template(subst);
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
    }

    fn scan_punct(&mut self) -> TokenKind {
        let rest = &self.src[self.pos..];
        for p in PUNCTUATORS {
            if rest.starts_with(p) {
                // `a?.5:b` is a conditional, not optional chaining.
                if *p == "?." && rest[2..].starts_with(|c: char| c.is_ascii_digit()) {
                    continue;
                }
                self.pos += p.len();
                return TokenKind::Punct;
            }
        }
        self.bump_char();
        TokenKind::Invalid
    }

    /// Re-reads a `/` or `/=` token as a regular expression literal.
    pub fn rescan_regex(&mut self, tok: Token) -> Token {
        let start = tok.span.start as usize;
        self.pos = start + 1;
        let mut in_class = false;
        loop {
            match self.peek() {
                None => return self.token(TokenKind::Invalid, start, tok.nl_before),
                Some(c) if is_line_terminator(c) => {
                    return self.token(TokenKind::Invalid, start, tok.nl_before);
                }
                Some('\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(c) if !is_line_terminator(c) => self.pos += c.len_utf8(),
                        _ => return self.token(TokenKind::Invalid, start, tok.nl_before),
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some('/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        while self.peek().is_some_and(is_ident_part) {
            self.bump_char();
        }
        self.token(TokenKind::Regex, start, tok.nl_before)
    }

    /// Continues a template literal after the `}` closing a substitution.
    pub fn rescan_template_continuation(&mut self, tok: Token) -> Token {
        let start = tok.span.start as usize;
        self.pos = start + 1;
        let kind = self.scan_template_body(TemplatePart::Tail, TemplatePart::Middle);
        self.token(kind, start, tok.nl_before)
    }

    /// Scans JSX child content starting at `at`: text up to `{` or `<`, or one of
    /// those two punctuators.
    pub fn scan_jsx_child(&mut self, at: u32) -> Token {
        self.pos = at as usize;
        let start = self.pos;
        match self.peek() {
            None => Token::eof(at, false),
            Some('{' | '<') => {
                self.pos += 1;
                self.token(TokenKind::Punct, start, false)
            }
            Some(_) => {
                while let Some(c) = self.peek() {
                    if c == '{' || c == '<' {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                self.token(TokenKind::JsxText, start, false)
            }
        }
    }

    /// Extends an identifier token with `-`-joined parts (`aria-label`).
    pub fn rescan_jsx_identifier(&mut self, tok: Token) -> Token {
        if tok.kind != TokenKind::Ident {
            return tok;
        }
        self.pos = tok.span.end as usize;
        while self.peek().is_some_and(|c| c == '-' || is_ident_part(c)) {
            self.bump_char();
        }
        let mut out = self.token(TokenKind::Ident, tok.span.start as usize, tok.nl_before);
        out.escaped = tok.escaped;
        out
    }

    /// Re-reads a JSX attribute string, where backslashes are not escapes.
    pub fn rescan_jsx_string(&mut self, tok: Token) -> Token {
        let start = tok.span.start as usize;
        let Some(quote) = self.src[start..].chars().next() else {
            return tok;
        };
        if quote != '"' && quote != '\'' {
            return tok;
        }
        self.pos = start + 1;
        loop {
            match self.bump_char() {
                None => return self.token(TokenKind::Invalid, start, tok.nl_before),
                Some(c) if c == quote => {
                    return self.token(TokenKind::String, start, tok.nl_before);
                }
                Some(_) => {}
            }
        }
    }

    /// Splits a `>>`, `>=`, `>>=` ... token so that only its first `>` is consumed.
    pub fn rescan_gt(&mut self, tok: Token) -> Token {
        let start = tok.span.start as usize;
        if tok.kind != TokenKind::Punct || !self.src[start..].starts_with('>') {
            return tok;
        }
        self.pos = start + 1;
        self.token(TokenKind::Punct, start, tok.nl_before)
    }
}
