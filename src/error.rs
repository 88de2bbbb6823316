use thiserror::Error;

use crate::expression::Operator;
use crate::parse::ParseError;

/// Everything that can go wrong while building, evaluating or integrating an
/// [`Expression`](crate::Expression).
#[derive(Debug, Error)]
pub enum Error {
    /// The variable is not one of `x, y, z`, or the binding tuple is too short
    /// to contain it. `bindings` carries the tuple length when known.
    #[error("variable `{name}` is unbound (binding tuple length: {bindings:?})")]
    UnboundVariable {
        name: String,
        bindings: Option<usize>,
    },

    #[error("`{op}` is undefined for operands {operands:?}")]
    NumericEvaluation { op: Operator, operands: Vec<f64> },

    #[error("split count must be a positive integer, got `{0}`")]
    InvalidSplitCount(String),

    /// The subinterval width of a non-empty interval is not finite, e.g.
    /// `[-f64::MAX, f64::MAX]` or an infinite bound.
    #[error("interval [{start}, {end}] has no finite subinterval width")]
    InvalidInterval { start: f64, end: f64 },

    #[error("invalid sampling policy `{0}`, expected 1 (left), 2 (middle), 3 (right) or 4 (random)")]
    InvalidPolicy(String),

    #[error("failed to parse expression:\n{0}")]
    Parse(#[from] Box<ParseError>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
