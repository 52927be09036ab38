//! Error types for the QASM parser.

use thiserror::Error;

/// Errors that can occur during parsing.
///
/// Line and column numbers are 1-based and point at the token where the
/// problem was detected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The source does not start with an `OPENQASM` header.
    #[error("Missing OPENQASM header: source must start with 'OPENQASM 2.0;'")]
    MissingHeader,

    /// Header names a version other than 2.x.
    #[error("Unsupported OPENQASM version {0}, expected 2.x")]
    UnsupportedVersion(String),

    /// Lexer error (invalid token).
    #[error("Invalid token '{text}' at line {line}, column {column}")]
    InvalidToken {
        text: String,
        line: usize,
        column: usize,
    },

    /// Unexpected token.
    #[error("Unexpected token at line {line}, column {column}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Gate mnemonic not in the vocabulary and not defined in the program.
    #[error("Unknown gate '{name}' at line {line}")]
    UnknownGate { name: String, line: usize },

    /// Register used before declaration.
    #[error("Undefined register '{name}' at line {line}")]
    UndefinedRegister { name: String, line: usize },

    /// Identifier in a parameter expression that is not bound.
    #[error("Undefined parameter '{name}' at line {line}")]
    UndefinedParameter { name: String, line: usize },

    /// Register or gate declared twice.
    #[error("Duplicate definition of '{name}' at line {line}")]
    DuplicateDefinition { name: String, line: usize },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size} at line {line}")]
    IndexOutOfBounds {
        register: String,
        index: u64,
        size: u32,
        line: usize,
    },

    /// Wrong number of qubit arguments.
    #[error("Gate '{gate}' expects {expected} qubits, got {got} at line {line}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
        line: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got} at line {line}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
        line: usize,
    },

    /// Register operands of different sizes in one statement.
    #[error("Register size mismatch at line {line}: {message}")]
    RegisterSizeMismatch { message: String, line: usize },

    /// Numeric literal or parameter value that cannot be used.
    #[error("Invalid number at line {line}: {message}")]
    InvalidNumber { message: String, line: usize },

    /// Valid QASM that this parser does not support.
    #[error("Unsupported construct at line {line}: {construct}")]
    Unsupported { construct: String, line: usize },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    Ir(#[from] qforge_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
