//! Expression parsing for QASM 2.0.

use super::Parser;
use crate::ast::{BinOp, Expression, MathFn};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.pos += 1;

            // `^` is right-associative.
            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression.
    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_unary_expr()?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    /// Parse primary expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let (line, column) = self.position();
        let token = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            #[allow(clippy::cast_precision_loss)]
            Token::Int(v) => Ok(Expression::Number(v as f64)),
            Token::Real(v) => Ok(Expression::Number(v)),
            Token::Pi => Ok(Expression::Pi),
            Token::Identifier(name) => {
                if self.consume(&Token::LParen) {
                    let func = MathFn::from_name(&name).ok_or_else(|| ParseError::Unsupported {
                        construct: format!("function '{name}'"),
                        line,
                    })?;
                    let arg = self.parse_expression()?;
                    self.expect(&Token::RParen)?;
                    Ok(Expression::Call {
                        func,
                        arg: Box::new(arg),
                    })
                } else {
                    Ok(Expression::Identifier(name))
                }
            }
            Token::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(ParseError::UnexpectedToken {
                line,
                column,
                expected: "expression".into(),
                found: other.to_string(),
            }),
        }
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Parse an optional parenthesised list of parameter expressions.
    pub(super) fn parse_actual_params(&mut self) -> ParseResult<Vec<Expression>> {
        if !self.consume(&Token::LParen) {
            return Ok(vec![]);
        }
        if self.consume(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        self.expect(&Token::RParen)?;
        Ok(exprs)
    }
}

/// Get operator precedence.
fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}
