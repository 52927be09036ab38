//! Lexer for `OpenQASM` 2.0.

use logos::Logos;

/// Tokens for `OpenQASM` 2.0.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qreg")]
    QReg,

    #[token("creg")]
    CReg,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    #[token("if")]
    If,

    #[token("pi")]
    Pi,

    // Literals
    #[regex(
        r"(?:[0-9]+\.[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+",
        |lex| lex.slice().parse::<f64>().ok()
    )]
    Real(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Int(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Str(String),

    // Identifiers, including the built-in `U` and `CX`
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    #[token("==")]
    EqEq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::QReg => write!(f, "qreg"),
            Token::CReg => write!(f, "creg"),
            Token::Gate => write!(f, "gate"),
            Token::Opaque => write!(f, "opaque"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::Barrier => write!(f, "barrier"),
            Token::If => write!(f, "if"),
            Token::Pi => write!(f, "pi"),
            Token::Real(v) => write!(f, "{v}"),
            Token::Int(v) => write!(f, "{v}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::EqEq => write!(f, "=="),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its 1-based source position.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// A lexing failure: the offending text and its position.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// Tokenize a QASM source string.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, LexError>> {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    // (line, column) of a byte offset, both 1-based
    let position = |offset: usize| {
        let line = line_starts.partition_point(|&start| start <= offset);
        let column = source[line_starts[line - 1]..offset].chars().count() + 1;
        (line, column)
    };

    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (line, column) = position(span.start);
        match result {
            Ok(token) => tokens.push(Ok(SpannedToken {
                token,
                line,
                column,
            })),
            Err(()) => tokens.push(Err(LexError {
                text: source[span].to_string(),
                line,
                column,
            })),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .into_iter()
            .filter_map(Result::ok)
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_header_tokens() {
        assert_eq!(
            kinds("OPENQASM 2.0;"),
            vec![Token::OpenQasm, Token::Real(2.0), Token::Semicolon]
        );
    }

    #[test]
    fn test_register_declaration() {
        assert_eq!(
            kinds("qreg q[2];"),
            vec![
                Token::QReg,
                Token::Identifier("q".into()),
                Token::LBracket,
                Token::Int(2),
                Token::RBracket,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_measure_arrow() {
        let tokens = kinds("measure q -> c;");
        assert_eq!(tokens[0], Token::Measure);
        assert_eq!(tokens[2], Token::Arrow);
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = kinds("// header comment\nh q[0]; // trailing\n");
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0], Token::Identifier("h".into()));
    }

    #[test]
    fn test_real_forms() {
        assert_eq!(kinds("1.5")[0], Token::Real(1.5));
        assert_eq!(kinds(".25")[0], Token::Real(0.25));
        assert_eq!(kinds("1e-3")[0], Token::Real(0.001));
        assert_eq!(kinds("2.5E2")[0], Token::Real(250.0));
        assert_eq!(kinds("7")[0], Token::Int(7));
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("pi_half")[0], Token::Identifier("pi_half".into()));
        assert_eq!(kinds("pi")[0], Token::Pi);
        assert_eq!(kinds("CX")[0], Token::Identifier("CX".into()));
    }

    #[test]
    fn test_line_numbers() {
        let tokens: Vec<_> = tokenize("OPENQASM 2.0;\n\nqreg q[1];")
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].line, 3);
        assert_eq!(tokens[3].column, 1);
        assert_eq!(tokens[4].column, 6);
    }

    #[test]
    fn test_invalid_token() {
        let results = tokenize("h q[0] $;");
        let err = results.into_iter().find_map(Result::err).unwrap();
        assert_eq!(err.text, "$");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 8);
    }
}
