//! AST types for compiled templates and embedded expressions.

/// One piece of a compiled template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, emitted verbatim.
    Literal(String),

    /// An interpolation expression, evaluated and stringified at render time.
    Interpolation(Expr),
}

/// An expression inside an interpolation delimiter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(f64),

    /// A string literal (single- or double-quoted in source).
    Str(String),

    /// A boolean literal.
    Bool(bool),

    /// The `null` literal.
    Null,

    /// A free identifier, resolved against the context.
    Ident(String),

    /// The `this` keyword, resolved to the receiver.
    This,

    /// Member access: `object.field`.
    Member { object: Box<Expr>, field: String },

    /// Index access: `object[index]`.
    Index { object: Box<Expr>, index: Box<Expr> },

    /// A unary operation.
    Unary { op: UnaryOp, expr: Box<Expr> },

    /// A binary operation.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// The ternary conditional: `cond ? then : otherwise`.
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation: `!x`.
    Not,
    /// Numeric negation: `-x`.
    Neg,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}
