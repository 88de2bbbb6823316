use std::fmt;

use crate::error::Result;
use crate::expression::Expression;
use crate::quadrature::{integrate, SamplingPlan};

/// Number of evenly spaced points in [`IntegralReport::curve`].
pub const CURVE_RESOLUTION: usize = 1000;

/// A definite integral of a single-variable function, `f(x)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Integral {
    function: Expression,
}

impl Integral {
    pub fn new(function: Expression) -> Self {
        Self { function }
    }

    pub fn function(&self) -> &Expression {
        &self.function
    }

    /// Chart title, e.g. `f(x) = e^(3*x)`.
    pub fn title(&self) -> String {
        format!("f(x) = {}", self.function)
    }

    pub fn evaluate(&self, plan: &SamplingPlan) -> Result<f64> {
        integrate(&self.function, plan)
    }

    /// Integrates over `plan` and collects everything a plotting collaborator
    /// needs to draw the rectangles and the curve they approximate.
    pub fn report(&self, plan: SamplingPlan) -> Result<IntegralReport> {
        let value = self.evaluate(&plan)?;

        let heights = self.function.evaluate_many(plan.points())?;
        let bars = plan
            .subinterval_starts()
            .zip(heights)
            .map(|(left, height)| Bar {
                left,
                width: plan.delta(),
                height,
            })
            .collect();

        let curve_xs = dense_grid(plan.start(), plan.end(), CURVE_RESOLUTION);
        let curve_ys = self.function.evaluate_many(&curve_xs)?;
        let curve = curve_xs.into_iter().zip(curve_ys).collect();

        Ok(IntegralReport {
            value,
            title: self.title(),
            plan,
            bars,
            curve,
        })
    }
}

/// `resolution` evenly spaced points covering `[start, end)`; empty if the
/// interval is.
fn dense_grid(start: f64, end: f64, resolution: usize) -> Vec<f64> {
    if end <= start || (end - start).is_nan() {
        return Vec::new();
    }
    let step = (end - start) / resolution as f64;
    (0..resolution).map(|i| start + i as f64 * step).collect()
}

/// One quadrature rectangle: `[left, left + width)` at height `f(sample)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Bar {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Result of [`Integral::report`].
#[derive(Clone, Debug, PartialEq)]
pub struct IntegralReport {
    pub value: f64,
    pub title: String,
    pub plan: SamplingPlan,
    pub bars: Vec<Bar>,
    /// `(x, f(x))` pairs over the plan's interval.
    pub curve: Vec<(f64, f64)>,
}

impl fmt::Display for IntegralReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function: {} Integration interval: {} Calculated value: {}",
            self.title, self.plan, self.value
        )
    }
}
