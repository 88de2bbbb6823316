use std::fmt;

use crate::expression::{Expression, Operator};

/// Renders the tree in the syntax accepted by [`Expression::parse`].
///
/// Binary operands that are themselves binary are parenthesized, so
/// `Pow(e, Mul(3, x))` renders as `e^(3*x)`. A literal equal to Euler's
/// number renders as `e`; non-finite literals render as `inf`, `-inf` and
/// `NaN`, which the parser reads back.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write_literal(*value, f),
            Self::Variable(symbol) => write!(f, "{symbol}"),
            Self::Neg(only) => {
                f.write_str(Operator::Neg.sign())?;
                write_operand(only, is_binary(only), f)
            }
            Self::Mul(lhs, rhs) => {
                write_operand(lhs, is_binary(lhs), f)?;
                f.write_str(Operator::Mul.sign())?;
                write_operand(rhs, is_binary(rhs), f)
            }
            Self::Pow(lhs, rhs) => {
                // `-x^2` reads as `-(x^2)`, so a negated or negative base needs
                // parentheses.
                let wrap_lhs = is_binary(lhs)
                    || match lhs.as_ref() {
                        Self::Neg(_) => true,
                        Self::Literal(value) => value.is_sign_negative(),
                        _ => false,
                    };
                write_operand(lhs, wrap_lhs, f)?;
                f.write_str(Operator::Pow.sign())?;
                write_operand(rhs, is_binary(rhs), f)
            }
        }
    }
}

fn is_binary(expr: &Expression) -> bool {
    matches!(expr.operator(), Some(Operator::Mul | Operator::Pow))
}

fn write_operand(expr: &Expression, parenthesize: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if parenthesize {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_literal(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value == std::f64::consts::E {
        f.write_str("e")
    } else {
        write!(f, "{value}")
    }
}
