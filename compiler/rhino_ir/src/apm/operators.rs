//! Unary and binary operators.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Mul,
    Div,
    Rem,
    Add,
    Sub,

    // Comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// The source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// `*`, `%`, `+` and `-`: the operators whose result follows the
    /// int/num promotion rule. Division is excluded, it always yields `num`.
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Mul | Self::Rem | Self::Add | Self::Sub)
    }

    /// Operators that always produce `bool`.
    pub const fn is_boolean(self) -> bool {
        matches!(
            self,
            Self::Lt
                | Self::Gt
                | Self::LtEq
                | Self::GtEq
                | Self::Eq
                | Self::NotEq
                | Self::And
                | Self::Or
        )
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Pos => "+",
            Self::Neg => "-",
            Self::Not => "!",
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}
