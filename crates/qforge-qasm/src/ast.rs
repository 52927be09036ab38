//! Abstract Syntax Tree for `OpenQASM` 2.0.

/// A complete QASM program.
#[derive(Debug, Clone)]
pub struct Program {
    /// Version string from the header.
    pub version: String,
    /// Top-level statements.
    pub statements: Vec<Statement>,
}

/// A top-level statement.
#[derive(Debug, Clone)]
pub enum Statement {
    /// `include "file";`
    Include { path: String, line: usize },
    /// `qreg name[size];`
    QReg { name: String, size: u64, line: usize },
    /// `creg name[size];`
    CReg { name: String, size: u64, line: usize },
    /// `gate name(params) qubits { body }`
    GateDef(GateDef),
    /// `opaque name(params) qubits;`
    Opaque {
        name: String,
        num_params: usize,
        num_qubits: usize,
        line: usize,
    },
    /// Gate application.
    Gate(GateCall),
    /// `measure qubit -> bit;`
    Measure {
        qubit: Operand,
        bit: Operand,
        line: usize,
    },
    /// `reset operand;`
    Reset { operand: Operand, line: usize },
    /// `barrier operands;`
    Barrier { operands: Vec<Operand>, line: usize },
    /// `if (creg == n) ...`
    If { line: usize },
}

/// A register operand: a whole register or one element of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub register: String,
    pub index: Option<u64>,
}

/// A gate application.
#[derive(Debug, Clone)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub args: Vec<Operand>,
    pub line: usize,
}

/// A user gate definition.
#[derive(Debug, Clone)]
pub struct GateDef {
    pub name: String,
    pub params: Vec<String>,
    pub qubits: Vec<String>,
    pub body: Vec<GateBodyOp>,
    pub line: usize,
}

/// One operation inside a gate body. Arguments name the gate's formal qubits.
#[derive(Debug, Clone)]
pub struct GateBodyOp {
    pub name: String,
    pub params: Vec<Expression>,
    pub args: Vec<String>,
    pub line: usize,
}

/// A constant parameter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeric literal.
    Number(f64),
    /// The constant π.
    Pi,
    /// A formal parameter of an enclosing gate definition.
    Identifier(String),
    /// Unary negation.
    Neg(Box<Expression>),
    /// Binary operation.
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Built-in unary function.
    Call { func: MathFn, arg: Box<Expression> },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in functions of the QASM 2.0 expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFn {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
}

impl MathFn {
    /// Look up a function by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(MathFn::Sin),
            "cos" => Some(MathFn::Cos),
            "tan" => Some(MathFn::Tan),
            "exp" => Some(MathFn::Exp),
            "ln" => Some(MathFn::Ln),
            "sqrt" => Some(MathFn::Sqrt),
            _ => None,
        }
    }

    /// Apply the function.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            MathFn::Sin => x.sin(),
            MathFn::Cos => x.cos(),
            MathFn::Tan => x.tan(),
            MathFn::Exp => x.exp(),
            MathFn::Ln => x.ln(),
            MathFn::Sqrt => x.sqrt(),
        }
    }
}
