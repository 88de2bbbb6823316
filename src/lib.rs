//! Expression trees and Riemann-sum quadrature.
//!
//! A function is an [`Expression`] tree built from constants, the variables
//! `x, y, z`, negation, multiplication and powers. A [`SamplingPlan`] splits an
//! interval into equal subintervals and picks one sample point in each,
//! according to a [`SamplingPolicy`]. [`integrate`] sums `f(point) * delta`.
//!
//! # Example
//!
//! ```rust
//! use riemann_expr::*;
//!
//! // f(x) = e^(3*x)
//! let f = Expression::pow(
//!     Expression::euler(),
//!     Expression::mul(Expression::constant(3.0), Expression::x()),
//! );
//! assert_eq!(f.to_string(), "e^(3*x)");
//!
//! let plan = build_plan(0.0, 0.5, 100_000, SamplingPolicy::Middle).unwrap();
//! let value = integrate(&f, &plan).unwrap();
//! let exact = (1.5f64.exp() - 1.0) / 3.0;
//! assert!((value - exact).abs() < 1e-3);
//! ```
//!
//! Trees can also be parsed from the syntax they print as:
//!
//! ```rust
//! use riemann_expr::*;
//!
//! let f = Expression::parse("e^-x").unwrap();
//! let engine = QuadratureEngine::new(1000, SamplingPolicy::Middle).unwrap();
//! let value = engine.integrate(&f, -1.0, 1.0).unwrap();
//! assert!((value - (1f64.exp() - (-1f64).exp())).abs() < 1e-3);
//! ```

mod display;
mod error;
mod evaluate;
mod expression;
mod parse;
mod quadrature;
mod report;

/// Uses the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use error::{Error, Result};
pub use expression::*;
pub use parse::ParseError;
pub use quadrature::*;
pub use report::*;
