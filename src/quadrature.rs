//! Riemann-sum quadrature over a partitioned interval.
//!
//! A [`SamplingPlan`] splits `[start, end]` into `split_count` subintervals of
//! width `delta` and picks one sample point per subinterval according to a
//! [`SamplingPolicy`]. [`integrate`] then sums `f(point) * delta`.
//!
//! All randomness is consumed while building a plan. Integrating the same plan
//! twice evaluates the same points and returns bit-identical results.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use log::{debug, trace, warn};
use rand::Rng;

use crate::error::{Error, Result};
use crate::expression::{Expression, Symbol};

/// Which point of a subinterval `[s, s + delta)` represents it in the sum.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SamplingPolicy {
    Left,
    Middle,
    Right,
    Random,
}

impl SamplingPolicy {
    pub const ALL: [SamplingPolicy; 4] = [Self::Left, Self::Middle, Self::Right, Self::Random];

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
            Self::Random => "random",
        }
    }

    /// Picks the representative coordinate of `[start, start + delta)`.
    ///
    /// `Random` draws uniformly from the half-open subinterval; only that
    /// variant touches `rng`.
    pub fn sample<R: Rng>(self, start: f64, delta: f64, rng: &mut R) -> f64 {
        match self {
            Self::Left => start,
            Self::Middle => start + delta / 2.0,
            Self::Right => start + delta,
            Self::Random => {
                let end = start + delta;
                if end > start && (end - start).is_finite() {
                    rng.gen_range(start..end)
                } else {
                    start
                }
            }
        }
    }
}

/// The prompt selector: `1` left, `2` middle, `3` right, `4` random.
impl TryFrom<i64> for SamplingPolicy {
    type Error = Error;

    fn try_from(selector: i64) -> Result<Self> {
        match selector {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            4 => Ok(Self::Random),
            other => Err(Error::InvalidPolicy(other.to_string())),
        }
    }
}

/// Accepts either a policy name or its numeric selector.
impl FromStr for SamplingPolicy {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let input = input.trim();
        if let Ok(selector) = input.parse::<i64>() {
            return Self::try_from(selector);
        }
        match input.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "middle" | "mid" => Ok(Self::Middle),
            "right" => Ok(Self::Right),
            "random" => Ok(Self::Random),
            _ => Err(Error::InvalidPolicy(input.to_string())),
        }
    }
}

impl fmt::Display for SamplingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How subinterval starts are laid out along the interval.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Partition {
    /// The `i`-th subinterval starts at `start + i * delta`. Always yields
    /// exactly `split_count` points.
    #[default]
    Indexed,
    /// Steps `s += delta` while `s < end`. Rounding in the running sum can
    /// produce one point more or less than `split_count`, e.g. 11 points for
    /// `[0, 1]` split 10 ways. Kept for parity with results produced that way.
    Accumulated,
}

/// Sample points and width for one `(interval, split_count, policy)` triple.
///
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingPlan {
    start: f64,
    end: f64,
    split_count: NonZeroUsize,
    policy: SamplingPolicy,
    delta: f64,
    points: Vec<f64>,
}

impl SamplingPlan {
    fn generate<R: Rng>(
        start: f64,
        end: f64,
        split_count: NonZeroUsize,
        policy: SamplingPolicy,
        partition: Partition,
        rng: &mut R,
    ) -> Result<Self> {
        let delta = (end - start) / split_count.get() as f64;
        // An empty or reversed interval has no subintervals.
        let empty = end <= start || (end - start).is_nan();
        if !empty && !delta.is_finite() {
            return Err(Error::InvalidInterval { start, end });
        }
        let points: Vec<f64> = match partition {
            _ if empty => Vec::new(),
            Partition::Indexed => (0..split_count.get())
                .map(|i| policy.sample(start + i as f64 * delta, delta, &mut *rng))
                .collect(),
            Partition::Accumulated => {
                let mut points = Vec::with_capacity(split_count.get() + 1);
                let mut segment_start = start;
                while segment_start < end {
                    points.push(policy.sample(segment_start, delta, rng));
                    let next = segment_start + delta;
                    if next <= segment_start {
                        // delta vanished against segment_start
                        break;
                    }
                    segment_start = next;
                }
                if points.len() != split_count.get() {
                    warn!(
                        "accumulated partition of [{start}, {end}] produced {} points for split count {split_count}",
                        points.len()
                    );
                }
                points
            }
        };
        debug!(
            "built {policy} plan over [{start}, {end}]: split_count = {split_count}, delta = {delta}, points = {}",
            points.len()
        );
        Ok(Self {
            start,
            end,
            split_count,
            policy,
            delta,
            points,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn split_count(&self) -> usize {
        self.split_count.get()
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    /// Width of every subinterval, `(end - start) / split_count`.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// One sample coordinate per subinterval, left to right.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Left edge of the subinterval that `points()[i]` was drawn from.
    ///
    /// Exact for [`Partition::Indexed`]; an accumulated partition may have
    /// drifted from these edges by a few ulps.
    pub fn subinterval_starts(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.points.len()).map(move |i| self.start + i as f64 * self.delta)
    }
}

impl fmt::Display for SamplingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Validates a raw split count as read from a prompt.
pub fn parse_split_count(input: &str) -> Result<usize> {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(Error::InvalidSplitCount(input.to_string())),
    }
}

fn non_zero_split_count(split_count: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(split_count).ok_or_else(|| Error::InvalidSplitCount(split_count.to_string()))
}

/// Builds an indexed plan, drawing `Random` samples from the thread-local
/// generator.
pub fn build_plan(
    start: f64,
    end: f64,
    split_count: usize,
    policy: SamplingPolicy,
) -> Result<SamplingPlan> {
    build_plan_with_rng(
        start,
        end,
        split_count,
        policy,
        Partition::Indexed,
        &mut rand::thread_rng(),
    )
}

/// Builds a plan, drawing `Random` samples from `rng`.
pub fn build_plan_with_rng<R: Rng>(
    start: f64,
    end: f64,
    split_count: usize,
    policy: SamplingPolicy,
    partition: Partition,
    rng: &mut R,
) -> Result<SamplingPlan> {
    let split_count = non_zero_split_count(split_count)?;
    SamplingPlan::generate(start, end, split_count, policy, partition, rng)
}

/// Sums `f(point) * delta` over the plan's points, left to right.
///
/// Only `x` is bound, so a function of `y` or `z` fails before any sample is
/// evaluated. Otherwise the first failing evaluation aborts the whole sum.
pub fn integrate(f: &Expression, plan: &SamplingPlan) -> Result<f64> {
    let arity = f.arity();
    if arity > 1 && !plan.points().is_empty() {
        return Err(Error::UnboundVariable {
            name: Symbol::ALL[arity - 1].name().to_string(),
            bindings: Some(1),
        });
    }
    let mut integral_sum = 0.0;
    for &x in plan.points() {
        let y = f.evaluate_at(x)?;
        trace!("f({x}) = {y}");
        integral_sum += y * plan.delta();
    }
    debug!("integral of {f} over {plan} with {} = {integral_sum}", plan.policy());
    Ok(integral_sum)
}

/// Split count, policy and partition shared by every plan it builds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QuadratureEngine {
    split_count: NonZeroUsize,
    policy: SamplingPolicy,
    partition: Partition,
}

impl QuadratureEngine {
    pub fn new(split_count: usize, policy: SamplingPolicy) -> Result<Self> {
        Ok(Self {
            split_count: non_zero_split_count(split_count)?,
            policy,
            partition: Partition::default(),
        })
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn split_count(&self) -> usize {
        self.split_count.get()
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn build_plan(&self, start: f64, end: f64) -> Result<SamplingPlan> {
        self.build_plan_with_rng(start, end, &mut rand::thread_rng())
    }

    pub fn build_plan_with_rng<R: Rng>(
        &self,
        start: f64,
        end: f64,
        rng: &mut R,
    ) -> Result<SamplingPlan> {
        SamplingPlan::generate(
            start,
            end,
            self.split_count,
            self.policy,
            self.partition,
            rng,
        )
    }

    /// Builds a fresh plan over `[start, end]` and integrates `f` on it.
    pub fn integrate(&self, f: &Expression, start: f64, end: f64) -> Result<f64> {
        integrate(f, &self.build_plan(start, end)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn exp_x() -> Expression {
        Expression::pow(Expression::euler(), Expression::x())
    }

    fn plan(start: f64, end: f64, split_count: usize, policy: SamplingPolicy) -> SamplingPlan {
        build_plan(start, end, split_count, policy).unwrap()
    }

    #[test]
    fn policy_selectors() {
        assert_eq!(SamplingPolicy::try_from(1).unwrap(), SamplingPolicy::Left);
        assert_eq!(SamplingPolicy::try_from(2).unwrap(), SamplingPolicy::Middle);
        assert_eq!(SamplingPolicy::try_from(3).unwrap(), SamplingPolicy::Right);
        assert_eq!(SamplingPolicy::try_from(4).unwrap(), SamplingPolicy::Random);
        for bad in [0, 5, -1] {
            assert!(matches!(
                SamplingPolicy::try_from(bad),
                Err(Error::InvalidPolicy(_))
            ));
        }
        assert_eq!("Mid".parse::<SamplingPolicy>().unwrap(), SamplingPolicy::Middle);
        assert_eq!(" 3 ".parse::<SamplingPolicy>().unwrap(), SamplingPolicy::Right);
        assert!(matches!(
            "trapezoid".parse::<SamplingPolicy>(),
            Err(Error::InvalidPolicy(p)) if p == "trapezoid"
        ));
        for policy in SamplingPolicy::ALL {
            assert_eq!(policy.to_string().parse::<SamplingPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn invalid_split_count() {
        assert!(matches!(
            build_plan(0.0, 1.0, 0, SamplingPolicy::Left),
            Err(Error::InvalidSplitCount(n)) if n == "0"
        ));
        assert!(QuadratureEngine::new(0, SamplingPolicy::Middle).is_err());
        assert_eq!(parse_split_count(" 100 ").unwrap(), 100);
        for bad in ["0", "-3", "2.5", "ten", ""] {
            assert!(
                matches!(parse_split_count(bad), Err(Error::InvalidSplitCount(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn deterministic_policies_pick_expected_points() {
        let left = plan(0.0, 1.0, 4, SamplingPolicy::Left);
        assert_eq!(left.delta(), 0.25);
        assert_eq!(left.points(), &[0.0, 0.25, 0.5, 0.75]);

        let middle = plan(0.0, 1.0, 4, SamplingPolicy::Middle);
        assert_eq!(middle.points(), &[0.125, 0.375, 0.625, 0.875]);

        let right = plan(0.0, 1.0, 4, SamplingPolicy::Right);
        assert_eq!(right.points(), &[0.25, 0.5, 0.75, 1.0]);
        assert_eq!(
            right.subinterval_starts().collect::<Vec<_>>(),
            vec![0.0, 0.25, 0.5, 0.75]
        );
    }

    #[test]
    fn indexed_partition_has_exact_count() {
        for (start, end, n) in [(0.0, 1.0, 10), (0.0, 0.5, 7), (-1.0, 1.0, 3), (0.0, 1.0, 100_000)] {
            assert_eq!(plan(start, end, n, SamplingPolicy::Left).points().len(), n);
        }
    }

    #[test]
    fn accumulated_partition_drifts() {
        let mut rng = StdRng::seed_from_u64(0);
        let legacy = build_plan_with_rng(
            0.0,
            1.0,
            10,
            SamplingPolicy::Left,
            Partition::Accumulated,
            &mut rng,
        )
        .unwrap();
        // 0.1 summed ten times lands just below 1.0.
        assert_eq!(legacy.points().len(), 11);

        let exact = QuadratureEngine::new(3, SamplingPolicy::Left)
            .unwrap()
            .with_partition(Partition::Accumulated)
            .build_plan(0.0, 3.0)
            .unwrap();
        assert_eq!(exact.points(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn degenerate_interval() {
        for policy in SamplingPolicy::ALL {
            for (start, end) in [(2.0, 2.0), (1.0, -1.0)] {
                let p = plan(start, end, 10, policy);
                assert!(p.points().is_empty());
                assert!(p.delta() <= 0.0);
                assert_eq!(integrate(&exp_x(), &p).unwrap(), 0.0);

                let legacy = QuadratureEngine::new(10, policy)
                    .unwrap()
                    .with_partition(Partition::Accumulated)
                    .build_plan(start, end)
                    .unwrap();
                assert!(legacy.points().is_empty());
            }
        }
    }

    #[test]
    fn repeated_integration_is_bit_identical() {
        let f = Expression::pow(Expression::constant(5.0), Expression::x());
        for policy in SamplingPolicy::ALL {
            let p = plan(0.0, 3.0, 1000, policy);
            let first = integrate(&f, &p).unwrap();
            let second = integrate(&f, &p).unwrap();
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn rebuilt_deterministic_plans_agree() {
        let engine = QuadratureEngine::new(500, SamplingPolicy::Middle).unwrap();
        let a = engine.integrate(&exp_x(), 0.0, 1.0).unwrap();
        let b = engine.integrate(&exp_x(), 0.0, 1.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn random_points_stay_in_their_subinterval() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let p = build_plan_with_rng(
                -1.0,
                2.0,
                37,
                SamplingPolicy::Random,
                Partition::Indexed,
                &mut rng,
            )
            .unwrap();
            assert_eq!(p.points().len(), 37);
            for (s, x) in p.subinterval_starts().zip(p.points()) {
                assert!(s <= *x && *x < s + p.delta(), "{x} not in [{s}, {})", s + p.delta());
            }
        }
    }

    #[test]
    fn random_plans_follow_the_injected_rng() {
        let build = |seed| {
            QuadratureEngine::new(20, SamplingPolicy::Random)
                .unwrap()
                .build_plan_with_rng(0.0, 1.0, &mut StdRng::seed_from_u64(seed))
                .unwrap()
        };
        assert_eq!(build(7), build(7));
        assert_ne!(build(7).points(), build(8).points());
    }

    #[test]
    fn left_and_right_sums_converge_on_middle() {
        // e^x is increasing, so left < middle < right and both gaps shrink.
        let mut previous_gaps = (f64::INFINITY, f64::INFINITY);
        for n in [10, 20, 40, 80, 160] {
            let sum = |policy| integrate(&exp_x(), &plan(0.0, 1.0, n, policy)).unwrap();
            let left = sum(SamplingPolicy::Left);
            let middle = sum(SamplingPolicy::Middle);
            let right = sum(SamplingPolicy::Right);
            assert!(left < middle && middle < right);

            let gaps = (middle - left, right - middle);
            assert!(gaps.0 < previous_gaps.0 && gaps.1 < previous_gaps.1);
            // First-order convergence: the gap is about f'-average * delta / 2.
            assert!(gaps.0 < 1.0 / n as f64 && gaps.1 < 1.5 / n as f64);
            previous_gaps = gaps;
        }
    }

    #[test]
    fn constant_function_is_exact() {
        let f = Expression::constant(2.0);
        let p = plan(-1.0, 3.0, 8, SamplingPolicy::Random);
        assert_abs_diff_eq!(integrate(&f, &p).unwrap(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn evaluation_error_aborts_integration() {
        let sqrt = Expression::pow(Expression::x(), Expression::constant(0.5));
        let p = plan(-1.0, 1.0, 10, SamplingPolicy::Middle);
        assert!(matches!(
            integrate(&sqrt, &p),
            Err(Error::NumericEvaluation { .. })
        ));

        let uses_y = Expression::var("y").unwrap();
        assert!(matches!(
            integrate(&uses_y, &p),
            Err(Error::UnboundVariable { .. })
        ));
    }

    #[test]
    fn unbound_variables_fail_before_sampling() {
        // The first sample would hit the fractional power of -1 first.
        let f = Expression::mul(
            Expression::pow(Expression::x(), Expression::constant(0.5)),
            Expression::var("z").unwrap(),
        );
        let p = plan(-1.0, 1.0, 10, SamplingPolicy::Left);
        assert!(matches!(
            integrate(&f, &p),
            Err(Error::UnboundVariable { name, bindings: Some(1) }) if name == "z"
        ));

        let empty = plan(1.0, 1.0, 10, SamplingPolicy::Left);
        assert_eq!(integrate(&f, &empty).unwrap(), 0.0);
    }

    #[test]
    fn overflowing_interval_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        for policy in SamplingPolicy::ALL {
            for partition in [Partition::Indexed, Partition::Accumulated] {
                for (start, end) in [(-f64::MAX, f64::MAX), (0.0, f64::INFINITY)] {
                    assert!(matches!(
                        build_plan_with_rng(start, end, 1, policy, partition, &mut rng),
                        Err(Error::InvalidInterval { .. })
                    ));
                }
            }
        }
        let engine = QuadratureEngine::new(4, SamplingPolicy::Random).unwrap();
        assert!(engine.build_plan(f64::NEG_INFINITY, 0.0).is_err());

        // Wide but representable intervals still work.
        let wide = build_plan(-f64::MAX / 2.0, f64::MAX / 2.0, 2, SamplingPolicy::Random).unwrap();
        assert_eq!(wide.points().len(), 2);
        assert!(wide.points().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn plan_display() {
        assert_eq!(plan(-1.0, 0.5, 3, SamplingPolicy::Left).to_string(), "[-1, 0.5]");
    }
}
