// SQL Lexer Implementation
//
// Tokenizes a SQL string into a flat token stream. Keywords are not
// recognized here; the parser matches identifier tokens against the
// reserved table case-insensitively. Every token carries its line,
// column and byte span so syntax errors can point at the source and so
// the parser can detect byte-adjacent tokens (the number-identifier
// implicit multiplication quirk).

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::dialect::Dialect;

/// SQL token types
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // Identifiers and literals
    Ident(String),
    QuotedIdent(String),
    Str(String),
    Int(i64),
    Float(f64),
    Hex(String),

    // Operators
    Eq,          // =
    DoubleEq,    // ==
    Spaceship,   // <=>
    Neq,         // != or <>
    Lt,          // <
    Lte,         // <=
    Gt,          // >
    Gte,         // >=
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    Concat,      // ||
    Amp,         // &
    Pipe,        // |
    Tilde,       // ~
    DoubleColon, // ::

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,

    // Special
    Eof,
    Illegal(String),
}

/// A token with its source position
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub line: usize,
    pub column: usize,
    /// Byte offset of the first character of the token.
    pub start: usize,
    /// Byte offset one past the last character of the token.
    pub end: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.literal)
    }
}

/// SQL lexer for breaking a query string into tokens
pub struct Lexer<'a> {
    input: Peekable<CharIndices<'a>>,
    len: usize,
    dialect: Dialect,
    line: usize,
    column: usize,
    pos: usize,
    ch: Option<char>,
    // Whether the previous token can be indexed with `[...]`; decides
    // whether `[` starts a subscript or a bracket-quoted identifier.
    prev_indexable: bool,
}

/// Tokenize the whole input, ending with an Eof token.
pub fn tokenize(input: &str, dialect: Dialect) -> Vec<Token> {
    let mut lexer = Lexer::new(input, dialect);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.token_type == TokenType::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, dialect: Dialect) -> Self {
        let mut lexer = Lexer {
            input: input.char_indices().peekable(),
            len: input.len(),
            dialect,
            line: 1,
            column: 0,
            pos: 0,
            ch: None,
            prev_indexable: false,
        };
        lexer.read_char();
        lexer
    }

    /// Advance to the next character of the input.
    fn read_char(&mut self) -> Option<char> {
        match self.input.next() {
            Some((pos, c)) => {
                self.pos = pos;
                self.ch = Some(c);
                self.column += 1;
                if c == '\n' {
                    self.line += 1;
                    self.column = 0;
                }
                Some(c)
            }
            None => {
                self.pos = self.len;
                self.ch = None;
                None
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().map(|&(_, c)| c)
    }

    /// Skip whitespace and all three comment forms.
    fn skip_whitespace(&mut self) {
        loop {
            match self.ch {
                Some(ch) if ch.is_whitespace() => {
                    self.read_char();
                }
                Some('-') => {
                    if self.peek_char() != Some('-') {
                        break;
                    }
                    self.skip_line_comment();
                }
                Some('#') => {
                    self.skip_line_comment();
                }
                Some('/') => {
                    if self.peek_char() != Some('*') {
                        break;
                    }
                    self.read_char(); // '*'
                    self.read_char();
                    loop {
                        match self.ch {
                            Some('*') => {
                                self.read_char();
                                if self.ch == Some('/') {
                                    self.read_char();
                                    break;
                                }
                            }
                            Some(_) => {
                                self.read_char();
                            }
                            // Unterminated block comment swallows the rest.
                            None => break,
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.ch {
            if ch == '\n' {
                self.read_char();
                break;
            }
            self.read_char();
        }
    }

    /// Read the current char plus all following chars matching the
    /// predicate, leaving the lexer positioned one past the run.
    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
        let mut text = String::new();
        if let Some(ch) = self.ch {
            text.push(ch);
        }
        while let Some(next) = self.peek_char() {
            if pred(next) {
                text.push(next);
                self.read_char();
            } else {
                break;
            }
        }
        self.read_char();
        text
    }

    fn read_identifier(&mut self) -> String {
        self.read_while(is_ident_char)
    }

    /// Read a quoted region delimited by `close`, with the delimiter
    /// doubled to escape it. Returns None when the input ends before
    /// the closing delimiter.
    fn read_quoted(&mut self, close: char) -> Option<String> {
        let mut value = String::new();
        self.read_char(); // skip the opening delimiter
        loop {
            match self.ch {
                Some(ch) if ch == close => {
                    if self.peek_char() == Some(close) {
                        value.push(close);
                        self.read_char();
                        self.read_char();
                    } else {
                        self.read_char();
                        return Some(value);
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.read_char();
                }
                None => return None,
            }
        }
    }

    /// Read a numeric token. Integer exponents without a dot or a
    /// negative exponent stay integers (`2e3` is the integer 2000).
    fn read_number(&mut self) -> TokenType {
        let mut text = String::new();
        let mut has_dot = self.ch == Some('.');
        if let Some(ch) = self.ch {
            text.push(ch);
        }
        while let Some(next) = self.peek_char() {
            if next.is_ascii_digit() {
                text.push(next);
                self.read_char();
            } else if next == '.' && !has_dot && !text.contains(['e', 'E']) {
                has_dot = true;
                text.push(next);
                self.read_char();
            } else if (next == 'e' || next == 'E') && !text.contains(['e', 'E']) {
                // Only an exponent when digits (optionally signed) follow.
                let mut probe = self.input.clone();
                probe.next();
                let after = probe.peek().map(|&(_, c)| c);
                let signed = matches!(after, Some('+') | Some('-'));
                let digits_follow = if signed {
                    let mut p2 = probe.clone();
                    p2.next();
                    matches!(p2.peek(), Some(&(_, c)) if c.is_ascii_digit())
                } else {
                    matches!(after, Some(c) if c.is_ascii_digit())
                };
                if !digits_follow {
                    break;
                }
                text.push(next);
                self.read_char();
                if signed {
                    text.push(self.peek_char().unwrap_or('+'));
                    self.read_char();
                }
            } else {
                break;
            }
        }
        self.read_char();

        if !has_dot && !text.contains('-') {
            if let Some(value) = parse_int_with_exponent(&text) {
                return TokenType::Int(value);
            }
        }
        match text.parse::<f64>() {
            Ok(value) => TokenType::Float(value),
            Err(_) => TokenType::Illegal(text),
        }
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let mut token = Token {
            token_type: TokenType::Eof,
            literal: String::new(),
            line: self.line,
            column: self.column,
            start: self.pos,
            end: self.pos,
        };

        let ch = match self.ch {
            Some(ch) => ch,
            None => {
                self.prev_indexable = false;
                return token;
            }
        };
        token.literal = ch.to_string();

        match ch {
            ';' => self.single(&mut token, TokenType::Semicolon),
            ',' => self.single(&mut token, TokenType::Comma),
            '(' => self.single(&mut token, TokenType::LParen),
            ')' => self.single(&mut token, TokenType::RParen),
            ']' => self.single(&mut token, TokenType::RBracket),
            '+' => self.single(&mut token, TokenType::Plus),
            '-' => self.single(&mut token, TokenType::Minus),
            '*' => self.single(&mut token, TokenType::Star),
            '/' => self.single(&mut token, TokenType::Slash),
            '%' => self.single(&mut token, TokenType::Percent),
            '&' => self.single(&mut token, TokenType::Amp),
            '~' => self.single(&mut token, TokenType::Tilde),
            '.' => {
                if matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                    let kind = self.read_number();
                    token.literal = number_literal(&kind, &token.literal);
                    self.finish(&mut token, kind);
                } else {
                    self.single(&mut token, TokenType::Dot);
                }
            }
            '|' => {
                if self.peek_char() == Some('|') {
                    self.read_char();
                    token.literal.push('|');
                    self.single(&mut token, TokenType::Concat);
                } else {
                    self.single(&mut token, TokenType::Pipe);
                }
            }
            ':' => {
                if self.peek_char() == Some(':') {
                    self.read_char();
                    token.literal.push(':');
                    self.single(&mut token, TokenType::DoubleColon);
                } else {
                    self.single(&mut token, TokenType::Illegal(":".to_string()));
                }
            }
            '=' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    token.literal.push('=');
                    self.single(&mut token, TokenType::DoubleEq);
                } else {
                    self.single(&mut token, TokenType::Eq);
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    token.literal.push('=');
                    self.single(&mut token, TokenType::Neq);
                } else {
                    self.single(&mut token, TokenType::Illegal("!".to_string()));
                }
            }
            '<' => match self.peek_char() {
                Some('=') => {
                    self.read_char();
                    token.literal.push('=');
                    if self.peek_char() == Some('>') {
                        self.read_char();
                        token.literal.push('>');
                        self.single(&mut token, TokenType::Spaceship);
                    } else {
                        self.single(&mut token, TokenType::Lte);
                    }
                }
                Some('>') => {
                    self.read_char();
                    token.literal.push('>');
                    self.single(&mut token, TokenType::Neq);
                }
                _ => self.single(&mut token, TokenType::Lt),
            },
            '>' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    token.literal.push('=');
                    self.single(&mut token, TokenType::Gte);
                } else {
                    self.single(&mut token, TokenType::Gt);
                }
            }
            '\'' => match self.read_quoted('\'') {
                Some(value) => {
                    token.literal = format!("'{}'", value);
                    self.finish(&mut token, TokenType::Str(value));
                }
                None => self.finish(&mut token, TokenType::Illegal("'".to_string())),
            },
            '`' => match self.read_quoted('`') {
                Some(value) => {
                    token.literal = format!("`{}`", value);
                    self.finish(&mut token, TokenType::QuotedIdent(value));
                }
                None => self.finish(&mut token, TokenType::Illegal("`".to_string())),
            },
            '"' => match self.read_quoted('"') {
                Some(value) => {
                    token.literal = format!("\"{}\"", value);
                    if self.dialect.double_quote_is_string() {
                        self.finish(&mut token, TokenType::Str(value));
                    } else {
                        self.finish(&mut token, TokenType::QuotedIdent(value));
                    }
                }
                None => self.finish(&mut token, TokenType::Illegal("\"".to_string())),
            },
            '[' => {
                if self.prev_indexable {
                    self.single(&mut token, TokenType::LBracket);
                } else {
                    match self.read_quoted(']') {
                        Some(value) => {
                            token.literal = format!("[{}]", value);
                            self.finish(&mut token, TokenType::QuotedIdent(value));
                        }
                        None => self.finish(&mut token, TokenType::Illegal("[".to_string())),
                    }
                }
            }
            _ => {
                if ch == '0' && matches!(self.peek_char(), Some('x') | Some('X')) {
                    self.read_char(); // 'x'
                    let digits = match self.peek_char() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            self.read_char();
                            self.read_while(|c| c.is_ascii_hexdigit())
                        }
                        _ => {
                            self.read_char();
                            String::new()
                        }
                    };
                    token.literal = format!("0x{}", digits);
                    if digits.is_empty() {
                        self.finish(&mut token, TokenType::Illegal("0x".to_string()));
                    } else {
                        self.finish(&mut token, TokenType::Hex(digits));
                    }
                } else if ch.is_ascii_digit() {
                    let kind = self.read_number();
                    token.literal = number_literal(&kind, &token.literal);
                    self.finish(&mut token, kind);
                } else if is_ident_start(ch) {
                    let identifier = self.read_identifier();
                    token.literal = identifier.clone();
                    self.finish(&mut token, TokenType::Ident(identifier));
                } else {
                    self.single(&mut token, TokenType::Illegal(ch.to_string()));
                }
            }
        }

        token
    }

    /// Finish a single-character (or already-consumed prefix) token and
    /// step past its last character.
    fn single(&mut self, token: &mut Token, kind: TokenType) {
        self.read_char();
        self.finish(token, kind);
    }

    /// Record the token's end span and kind; the lexer is already
    /// positioned one past the token.
    fn finish(&mut self, token: &mut Token, kind: TokenType) {
        token.end = self.pos;
        self.prev_indexable = match &kind {
            // A reserved word is never a value, so `[` after one opens a
            // bracket-quoted identifier.
            TokenType::Ident(word) => !crate::keywords::is_reserved(word),
            TokenType::QuotedIdent(_)
            | TokenType::Str(_)
            | TokenType::Int(_)
            | TokenType::Float(_)
            | TokenType::RParen
            | TokenType::RBracket => true,
            _ => false,
        };
        token.token_type = kind;
    }
}

fn number_literal(kind: &TokenType, fallback: &str) -> String {
    match kind {
        TokenType::Int(n) => n.to_string(),
        TokenType::Float(f) => f.to_string(),
        TokenType::Illegal(text) => text.clone(),
        _ => fallback.to_string(),
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || matches!(ch, '_' | '@' | '$')
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '@' | '$')
}

/// Parse `NNNeMM` (non-negative exponent, no dot) as an exact integer.
fn parse_int_with_exponent(text: &str) -> Option<i64> {
    let lower = text.to_lowercase();
    match lower.split_once('e') {
        None => lower.parse::<i64>().ok(),
        Some((mantissa, exp)) => {
            let base = mantissa.parse::<i64>().ok()?;
            let exp = exp.trim_start_matches('+').parse::<u32>().ok()?;
            base.checked_mul(10_i64.checked_pow(exp)?)
        }
    }
}
