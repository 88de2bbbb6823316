use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A real-valued function of up to three variables.
///
/// Trees are immutable once built. Evaluation only borrows the tree, so a
/// single `Expression` can be shared across threads and evaluated at many
/// points concurrently.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    // Binary real ops.
    Mul(Box<Expression>, Box<Expression>),
    Pow(Box<Expression>, Box<Expression>),

    // Unary real ops.
    Neg(Box<Expression>),

    // Constant.
    Literal(f64),

    // Input variable.
    Variable(Symbol),
}

/// One of the three variable names an expression may reference.
///
/// The discriminant is the index into the binding tuple passed to
/// [`Expression::evaluate`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Symbol {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::X, Symbol::Y, Symbol::Z];

    /// Position of this variable in the binding tuple.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|symbol| symbol.name() == name)
            .ok_or_else(|| Error::UnboundVariable {
                name: name.to_string(),
                bindings: None,
            })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator tags, shared by the printer and by evaluation errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    Neg,
    Mul,
    Pow,
}

impl Operator {
    pub fn sign(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Mul => "*",
            Self::Pow => "^",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sign())
    }
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Self::Literal(value)
    }

    /// Euler's number, printed as `e`.
    pub fn euler() -> Self {
        Self::Literal(std::f64::consts::E)
    }

    /// Looks `name` up in the fixed variable list `x, y, z`.
    pub fn var(name: &str) -> Result<Self, Error> {
        Ok(Self::Variable(name.parse()?))
    }

    pub fn x() -> Self {
        Self::Variable(Symbol::X)
    }

    pub fn neg(only: Expression) -> Self {
        Self::Neg(Box::new(only))
    }

    pub fn mul(lhs: Expression, rhs: Expression) -> Self {
        Self::Mul(Box::new(lhs), Box::new(rhs))
    }

    pub fn pow(base: Expression, exponent: Expression) -> Self {
        Self::Pow(Box::new(base), Box::new(exponent))
    }

    /// The operator at the root of this tree, if it is not a leaf.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Mul(..) => Some(Operator::Mul),
            Self::Pow(..) => Some(Operator::Pow),
            Self::Neg(_) => Some(Operator::Neg),
            Self::Literal(_) | Self::Variable(_) => None,
        }
    }

    /// Number of binding slots this expression needs, i.e. one past the
    /// highest variable index it references.
    pub fn arity(&self) -> usize {
        match self {
            Self::Mul(lhs, rhs) | Self::Pow(lhs, rhs) => lhs.arity().max(rhs.arity()),
            Self::Neg(only) => only.arity(),
            Self::Literal(_) => 0,
            Self::Variable(symbol) => symbol.index() + 1,
        }
    }
}

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output {
        Expression::Neg(Box::new(self))
    }
}

impl std::ops::Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Self::Output {
        Expression::Mul(Box::new(self), Box::new(rhs))
    }
}
