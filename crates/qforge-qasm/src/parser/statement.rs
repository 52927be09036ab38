//! Statement parsing for QASM 2.0.

use super::Parser;
use crate::ast::{GateBodyOp, GateCall, GateDef, Operand, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.peek() {
            Some(Token::Include) => self.parse_include(),
            Some(Token::QReg) => self.parse_register(true),
            Some(Token::CReg) => self.parse_register(false),
            Some(Token::Gate) => self.parse_gate_def(),
            Some(Token::Opaque) => self.parse_opaque(),
            Some(Token::Measure) => self.parse_measure(),
            Some(Token::Reset) => self.parse_reset(),
            Some(Token::Barrier) => self.parse_barrier(),
            Some(Token::If) => self.parse_if(),
            Some(Token::Identifier(_)) => self.parse_gate_call().map(Statement::Gate),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// Parse include statement.
    fn parse_include(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.expect(&Token::Include)?;
        let path = match self.peek() {
            Some(Token::Str(s)) => s.clone(),
            _ => return Err(self.unexpected("string literal")),
        };
        self.pos += 1;
        self.expect(&Token::Semicolon)?;
        Ok(Statement::Include { path, line })
    }

    /// Parse `qreg name[size];` or `creg name[size];`.
    fn parse_register(&mut self, quantum: bool) -> ParseResult<Statement> {
        let line = self.line();
        self.pos += 1;
        let name = self.parse_identifier()?;
        self.expect(&Token::LBracket)?;
        let size = self.parse_int_literal()?;
        self.expect(&Token::RBracket)?;
        self.expect(&Token::Semicolon)?;
        Ok(if quantum {
            Statement::QReg { name, size, line }
        } else {
            Statement::CReg { name, size, line }
        })
    }

    /// Parse `gate name(params) a, b { body }`.
    fn parse_gate_def(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.expect(&Token::Gate)?;
        let name = self.parse_identifier()?;
        let params = self.parse_formal_params()?;
        let qubits = self.parse_identifier_list()?;
        self.expect(&Token::LBrace)?;

        let mut body = Vec::new();
        while !self.consume(&Token::RBrace) {
            let op_line = self.line();
            if self.consume(&Token::Barrier) {
                // Barriers inside a definition carry no semantics once inlined.
                self.parse_identifier_list()?;
                self.expect(&Token::Semicolon)?;
                continue;
            }
            let op_name = self.parse_identifier()?;
            let op_params = self.parse_actual_params()?;
            let args = self.parse_identifier_list()?;
            self.expect(&Token::Semicolon)?;
            body.push(GateBodyOp {
                name: op_name,
                params: op_params,
                args,
                line: op_line,
            });
        }

        Ok(Statement::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
            line,
        }))
    }

    /// Parse `opaque name(params) a, b;`.
    fn parse_opaque(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.expect(&Token::Opaque)?;
        let name = self.parse_identifier()?;
        let params = self.parse_formal_params()?;
        let qubits = self.parse_identifier_list()?;
        self.expect(&Token::Semicolon)?;
        Ok(Statement::Opaque {
            name,
            num_params: params.len(),
            num_qubits: qubits.len(),
            line,
        })
    }

    /// Parse an optional parenthesised list of formal parameter names.
    fn parse_formal_params(&mut self) -> ParseResult<Vec<String>> {
        if !self.consume(&Token::LParen) {
            return Ok(vec![]);
        }
        if self.consume(&Token::RParen) {
            return Ok(vec![]);
        }
        let params = self.parse_identifier_list()?;
        self.expect(&Token::RParen)?;
        Ok(params)
    }

    /// Parse a gate application.
    fn parse_gate_call(&mut self) -> ParseResult<GateCall> {
        let line = self.line();
        let name = self.parse_identifier()?;
        let params = self.parse_actual_params()?;
        let mut args = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_operand()?);
        }
        self.expect(&Token::Semicolon)?;
        Ok(GateCall {
            name,
            params,
            args,
            line,
        })
    }

    /// Parse `measure a -> b;`.
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.expect(&Token::Measure)?;
        let qubit = self.parse_operand()?;
        self.expect(&Token::Arrow)?;
        let bit = self.parse_operand()?;
        self.expect(&Token::Semicolon)?;
        Ok(Statement::Measure { qubit, bit, line })
    }

    /// Parse reset statement.
    fn parse_reset(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.expect(&Token::Reset)?;
        let operand = self.parse_operand()?;
        self.expect(&Token::Semicolon)?;
        Ok(Statement::Reset { operand, line })
    }

    /// Parse barrier statement.
    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        self.expect(&Token::Barrier)?;
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        self.expect(&Token::Semicolon)?;
        Ok(Statement::Barrier { operands, line })
    }

    /// Parse a classically conditioned operation far enough to skip it.
    fn parse_if(&mut self) -> ParseResult<Statement> {
        let (line, column) = self.position();
        self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        self.parse_identifier()?;
        self.expect(&Token::EqEq)?;
        self.parse_int_literal()?;
        self.expect(&Token::RParen)?;
        match self.parse_statement()? {
            Statement::Gate(_)
            | Statement::Measure { .. }
            | Statement::Reset { .. } => Ok(Statement::If { line }),
            _ => Err(ParseError::UnexpectedToken {
                line,
                column,
                expected: "quantum operation after if".into(),
                found: "declaration".into(),
            }),
        }
    }

    /// Parse `name` or `name[index]`.
    pub(super) fn parse_operand(&mut self) -> ParseResult<Operand> {
        let register = self.parse_identifier()?;
        let index = if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(&Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(Operand { register, index })
    }
}
