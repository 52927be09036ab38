//! Parser for `OpenQASM` 2.0.

mod expression;
pub(crate) mod lowering;
mod statement;

use qforge_ir::Circuit;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM 2.0 source string into a Circuit.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parse_ast(source)?;
    lowering::lower_to_circuit(&program)
}

/// Parse a QASM 2.0 source string into an AST Program.
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        let tokens = tokenize(source)
            .into_iter()
            .map(|r| {
                r.map_err(|e| ParseError::InvalidToken {
                    text: e.text,
                    line: e.line,
                    column: e.column,
                })
            })
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last token at end of input.
    pub(super) fn line(&self) -> usize {
        self.position().0
    }

    /// Line and column of the current token.
    pub(super) fn position(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.column))
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Error for the current token, which was not what the grammar needed.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                line: self.line(),
                column: self.position().1,
                expected: expected.to_string(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    /// Expect a specific token.
    pub(super) fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.check(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        if !self.consume(&Token::OpenQasm) {
            return Err(ParseError::MissingHeader);
        }
        let version = self.parse_version()?;
        self.expect(&Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    /// Parse and check the version number.
    fn parse_version(&mut self) -> ParseResult<String> {
        let version = match self.advance() {
            Some(Token::Real(v)) => v,
            #[allow(clippy::cast_precision_loss)]
            Some(Token::Int(v)) => v as f64,
            Some(other) => return Err(ParseError::UnsupportedVersion(other.to_string())),
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };
        if version.trunc() != 2.0 {
            return Err(ParseError::UnsupportedVersion(format!("{version:?}")));
        }
        Ok(format!("{version:?}"))
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Identifier(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an integer literal.
    pub(super) fn parse_int_literal(&mut self) -> ParseResult<u64> {
        match self.peek() {
            Some(Token::Int(v)) => {
                let v = *v;
                self.pos += 1;
                Ok(v)
            }
            _ => Err(self.unexpected("integer")),
        }
    }
}
