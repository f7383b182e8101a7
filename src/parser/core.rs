// Parser core: token cursor and shared helpers.
//
// Statement, expression, and clause grammars live in the sibling
// modules; this file owns the cursor over the token stream, keyword
// matching, and error construction.

use thiserror::Error;

use crate::dialect::Dialect;
use crate::keywords;
use crate::lexer::{tokenize, Token, TokenType};

/// Parse error with the source position of the offending token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: expected {expected}, found {found}")]
    Syntax {
        offset: usize,
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// SQL parser over a pre-lexed token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) dialect: Dialect,
    pub(crate) depth: usize,
}

/// Expression nesting bound; deeper input is rejected rather than
/// overflowing the stack. Each level spends several real stack frames,
/// so the bound sits well under what a 2 MiB thread can absorb.
pub(crate) const MAX_EXPR_DEPTH: usize = 64;

impl Parser {
    pub fn new(sql: &str, dialect: Dialect) -> Self {
        log::debug!("parsing {} bytes as {}", sql.len(), dialect.name());
        let mut tokens = tokenize(sql, dialect);
        // One trailing semicolon is tolerated and stripped.
        if tokens.len() >= 2 {
            let last = tokens.len() - 2;
            if tokens[last].token_type == TokenType::Semicolon {
                tokens.remove(last);
            }
        }
        Parser { tokens, pos: 0, dialect, depth: 0 }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_token(&self) -> &Token {
        let at = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[at]
    }

    pub fn next_token(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    /// Cursor position for backtracking.
    pub fn checkpoint(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    pub fn current_token_is(&self, token_type: &TokenType) -> bool {
        self.current_token().token_type == *token_type
    }

    pub fn peek_token_is(&self, token_type: &TokenType) -> bool {
        self.peek_token().token_type == *token_type
    }

    /// Consume the current token if it matches, error otherwise.
    pub fn expect_token(&mut self, token_type: &TokenType) -> ParseResult<Token> {
        if self.current_token_is(token_type) {
            let token = self.current_token().clone();
            self.next_token();
            Ok(token)
        } else {
            Err(self.error(format!("{:?}", token_type)))
        }
    }

    /// Consume the current token if it matches.
    pub fn eat_token(&mut self, token_type: &TokenType) -> bool {
        if self.current_token_is(token_type) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Whether the current token is the given keyword (case-insensitive).
    pub fn at_keyword(&self, keyword: &str) -> bool {
        matches!(
            &self.current_token().token_type,
            TokenType::Ident(word) if word.eq_ignore_ascii_case(keyword)
        )
    }

    pub fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(
            &self.peek_token().token_type,
            TokenType::Ident(word) if word.eq_ignore_ascii_case(keyword)
        )
    }

    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume a whole keyword phrase, or none of it.
    pub fn eat_keywords(&mut self, phrase: &[&str]) -> bool {
        let checkpoint = self.checkpoint();
        for keyword in phrase {
            if !self.eat_keyword(keyword) {
                self.restore(checkpoint);
                return false;
            }
        }
        true
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(keyword.to_uppercase()))
        }
    }

    /// Build a syntax error pointing at the current token.
    pub fn error(&self, expected: impl Into<String>) -> ParseError {
        let token = self.current_token();
        let found = match &token.token_type {
            TokenType::Eof => "end of input".to_string(),
            _ => format!("'{}'", token.literal),
        };
        ParseError::Syntax {
            offset: token.start,
            line: token.line,
            column: token.column,
            expected: expected.into(),
            found,
        }
    }

    /// A bare identifier usable as a name: an unreserved word or any
    /// quoted identifier. Quoted segments keep embedded dots escaped so
    /// path joining stays reversible.
    pub fn identifier(&mut self) -> ParseResult<String> {
        let name = match &self.current_token().token_type {
            TokenType::Ident(word) if !keywords::is_reserved(word) => word.clone(),
            TokenType::QuotedIdent(word) => word.replace('.', "\\."),
            _ => return Err(self.error("identifier")),
        };
        self.next_token();
        Ok(name)
    }

    /// An identifier where reserved words are also acceptable, for
    /// positions that cannot start a clause (e.g. after a dot).
    pub fn any_identifier(&mut self) -> ParseResult<String> {
        let name = match &self.current_token().token_type {
            TokenType::Ident(word) => word.clone(),
            TokenType::QuotedIdent(word) => word.replace('.', "\\."),
            _ => return Err(self.error("identifier")),
        };
        self.next_token();
        Ok(name)
    }

    /// A dot-separated name path joined into a single string.
    pub fn dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.identifier()?;
        while self.current_token_is(&TokenType::Dot)
            && !self.peek_token_is(&TokenType::Star)
        {
            self.next_token();
            name.push('.');
            name.push_str(&self.any_identifier()?);
        }
        Ok(name)
    }

    /// Comma-separated identifier list.
    pub fn identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut names = vec![self.identifier()?];
        while self.eat_token(&TokenType::Comma) {
            names.push(self.identifier()?);
        }
        Ok(names)
    }

    /// Parenthesized comma-separated identifier list.
    pub fn paren_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        self.expect_token(&TokenType::LParen)?;
        let names = self.identifier_list()?;
        self.expect_token(&TokenType::RParen)?;
        Ok(names)
    }

    /// Require that all input was consumed.
    pub fn expect_end(&self) -> ParseResult<()> {
        if self.current_token_is(&TokenType::Eof) {
            Ok(())
        } else {
            Err(self.error("end of input"))
        }
    }

    pub(crate) fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_EXPR_DEPTH {
            return Err(self.error("shallower expression nesting"));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }
}
