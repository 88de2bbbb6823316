use crate::error::{Error, Result};
use crate::expression::{Expression, Operator};

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

impl Expression {
    /// Evaluates a single-variable function with `x` bound to `x`.
    pub fn evaluate_at(&self, x: f64) -> Result<f64> {
        self.evaluate(&[x])
    }

    /// Calculates the real value of the expression.
    ///
    /// `bindings[i]` is the value of the `i`-th variable of `x, y, z`. Extra
    /// trailing bindings are ignored; a missing one is an
    /// [`Error::UnboundVariable`].
    pub fn evaluate(&self, bindings: &[f64]) -> Result<f64> {
        match self {
            Self::Literal(value) => Ok(*value),
            Self::Variable(symbol) => {
                bindings
                    .get(symbol.index())
                    .copied()
                    .ok_or_else(|| Error::UnboundVariable {
                        name: symbol.name().to_string(),
                        bindings: Some(bindings.len()),
                    })
            }
            Self::Mul(lhs, rhs) => evaluate_binary_real_op(
                Operator::Mul,
                |lhs, rhs| lhs * rhs,
                lhs.as_ref(),
                rhs.as_ref(),
                bindings,
            ),
            Self::Neg(only) => {
                evaluate_unary_real_op(Operator::Neg, |only| -only, only.as_ref(), bindings)
            }
            Self::Pow(lhs, rhs) => evaluate_binary_real_op(
                Operator::Pow,
                |lhs, rhs| lhs.powf(rhs),
                lhs.as_ref(),
                rhs.as_ref(),
                bindings,
            ),
        }
    }

    /// Evaluates a single-variable function at every point of `xs`.
    ///
    /// Stops at the first failing point. With the `rayon` feature the points
    /// are evaluated in parallel.
    pub fn evaluate_many(&self, xs: &[f64]) -> Result<Vec<f64>> {
        #[cfg(feature = "rayon")]
        {
            xs.par_iter().map(|x| self.evaluate_at(*x)).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            xs.iter().map(|x| self.evaluate_at(*x)).collect()
        }
    }
}

fn evaluate_binary_real_op(
    op: Operator,
    apply: fn(f64, f64) -> f64,
    lhs: &Expression,
    rhs: &Expression,
    bindings: &[f64],
) -> Result<f64> {
    let lhs = lhs.evaluate(bindings)?;
    let rhs = rhs.evaluate(bindings)?;
    check_domain(op, &[lhs, rhs], apply(lhs, rhs))
}

fn evaluate_unary_real_op(
    op: Operator,
    apply: fn(f64) -> f64,
    only: &Expression,
    bindings: &[f64],
) -> Result<f64> {
    let only = only.evaluate(bindings)?;
    check_domain(op, &[only], apply(only))
}

/// NaN out of non-NaN operands, or infinity out of finite operands of a
/// power, means the operands were outside the operator's domain.
fn check_domain(op: Operator, operands: &[f64], output: f64) -> Result<f64> {
    let invalid = output.is_nan() && !operands.iter().any(|v| v.is_nan());
    let overflow =
        op == Operator::Pow && output.is_infinite() && operands.iter().all(|v| v.is_finite());
    if invalid || overflow {
        return Err(Error::NumericEvaluation {
            op,
            operands: operands.to_vec(),
        });
    }
    Ok(output)
}
