//! Approximation of `e^{iθ}` by `u/√2^k` with `u` completed to an exact unitary.
//!
//! The search escalates `k` from `kmin`. At each `k` every `u ∈ Z[ω]` in the scaled epsilon
//! region whose conjugate `u•` lies in the scaled unit disk is a candidate. The first candidate,
//! in enumeration order, which passes the angular test and whose complementary norm
//! `2^k - |u|²` is a norm `t·t̄` gives the result.

use crate::diophantine::solve_norm_equation;
use crate::errors::{GridSynthError, GridSynthResult};
use crate::grid_op::GridOp;
use crate::grid_solvers::{solve_two_dim, EnumerationStrategy};
use crate::matrix::UnitaryMatrix;
use crate::numeric::{real_from_f64, real_to_f64, NumericContext, Real};
use crate::regions::{Ellipse, SearchState};
use crate::rings::{ZOmega, ZSqrt2};
use crate::skew::optimize_skew;
use num::bigint::BigInt;
use num::{Complex, One, Signed, Zero};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{event, Level};

/// Parameters of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    theta: f64,
    epsilon: f64,
    digits: u32,
    kmin: u32,
    kmax: u32,
    tol: Option<f64>,
}

impl SynthesisConfig {
    /// Approximate `e^{iθ}` to within `epsilon`.
    ///
    /// The precision defaults to `ceil(-log10 ε)` digits and `k` runs over `0..1000`.
    pub fn new(theta: f64, epsilon: f64) -> GridSynthResult<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(GridSynthError::config(format!(
                "epsilon must be positive and finite, got {}",
                epsilon
            )));
        }
        let digits = (-epsilon.log10()).ceil().max(1.0) as u32;
        let config = Self {
            theta,
            epsilon,
            digits,
            kmin: 0,
            kmax: 1000,
            tol: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the number of decimal digits of precision.
    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    /// Search `kmin <= k < kmax`.
    pub fn with_k_range(mut self, kmin: u32, kmax: u32) -> Self {
        self.kmin = kmin;
        self.kmax = kmax;
        self
    }

    /// Override the containment tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    /// Target angle.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Error budget.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Decimal digits of precision.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// The range of `k` searched.
    pub fn k_range(&self) -> std::ops::Range<u32> {
        self.kmin..self.kmax
    }

    /// Check every parameter.
    pub fn validate(&self) -> GridSynthResult<()> {
        if !self.theta.is_finite() {
            return Err(GridSynthError::config("theta must be finite"));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(GridSynthError::config("epsilon must be positive and finite"));
        }
        if self.digits == 0 {
            return Err(GridSynthError::config("digits must be positive"));
        }
        if self.kmin > self.kmax {
            return Err(GridSynthError::config(format!(
                "kmin {} exceeds kmax {}",
                self.kmin, self.kmax
            )));
        }
        if let Some(tol) = self.tol {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(GridSynthError::config("tolerance must be positive"));
            }
        }
        Ok(())
    }

    /// Build the numeric context for this search.
    pub fn context(&self) -> GridSynthResult<NumericContext> {
        let ctx = NumericContext::new(self.digits)?;
        match self.tol.and_then(real_from_f64) {
            Some(tol) => ctx.with_tol(tol),
            None => Ok(ctx),
        }
    }
}

/// Outcome of a search. Check [`RzApproximation::solution_found`] before using the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RzApproximation {
    matrix: UnitaryMatrix,
    found: bool,
    theta: f64,
    eps: f64,
    u_val: Complex<f64>,
    t_val: Complex<f64>,
    error: f64,
}

impl RzApproximation {
    fn not_found(config: &SynthesisConfig) -> Self {
        Self {
            matrix: UnitaryMatrix::empty(),
            found: false,
            theta: config.theta,
            eps: config.epsilon,
            u_val: Complex::zero(),
            t_val: Complex::zero(),
            error: f64::INFINITY,
        }
    }

    fn from_matrix(
        matrix: UnitaryMatrix,
        theta: &Real,
        config: &SynthesisConfig,
        ctx: &NumericContext,
    ) -> Self {
        let scale = ctx.pow_sqrt2(matrix.k);
        let [ux, uy] = matrix.u.to_plane(ctx);
        let [tx, ty] = matrix.t.to_plane(ctx);
        let (ux, uy) = (&ux / &scale, &uy / &scale);
        let (tx, ty) = (&tx / &scale, &ty / &scale);
        let (s, c) = ctx.sin_cos(theta);
        // |u - e^{iθ}|² + |t|²
        let dx = &ux - c;
        let dy = &uy - s;
        let err2 = &dx * &dx + &dy * &dy + &tx * &tx + &ty * &ty;
        Self {
            found: true,
            theta: config.theta,
            eps: config.epsilon,
            u_val: Complex::new(real_to_f64(&ux), real_to_f64(&uy)),
            t_val: Complex::new(real_to_f64(&tx), real_to_f64(&ty)),
            error: real_to_f64(&ctx.sqrt(&err2)),
            matrix,
        }
    }

    /// Whether a solution was found.
    pub fn solution_found(&self) -> bool {
        self.found
    }

    /// The solution, the empty record if none was found.
    pub fn matrix(&self) -> &UnitaryMatrix {
        &self.matrix
    }

    /// Numerator of the top left entry.
    pub fn u(&self) -> &ZOmega {
        &self.matrix.u
    }

    /// Numerator of the bottom left entry.
    pub fn t(&self) -> &ZOmega {
        &self.matrix.t
    }

    /// The denominator exponent `k`.
    pub fn scale_exponent(&self) -> u32 {
        self.matrix.k
    }

    /// The error budget searched with.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// The target angle.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// `u/√2^k`
    pub fn u_val(&self) -> Complex<f64> {
        self.u_val
    }

    /// `t/√2^k`
    pub fn t_val(&self) -> Complex<f64> {
        self.t_val
    }

    /// `√(|u/√2^k - e^{iθ}|² + |t/√2^k|²)`, infinite when no solution was found.
    pub fn error(&self) -> f64 {
        self.error
    }
}

/// Search with exact ellipse enumeration.
pub fn find_rz_approximation(config: &SynthesisConfig) -> GridSynthResult<RzApproximation> {
    find_rz_approximation_with(config, EnumerationStrategy::Ellipse)
}

/// Search with bounding box enumeration.
pub fn find_fast_rz_approximation(config: &SynthesisConfig) -> GridSynthResult<RzApproximation> {
    find_rz_approximation_with(config, EnumerationStrategy::BoundingBox)
}

/// `(√2^k, (-√2)^k)`
fn scale_pair(k: u32, ctx: &NumericContext) -> (Real, Real) {
    let s = ctx.pow_sqrt2(k);
    if k % 2 == 0 {
        (s.clone(), s)
    } else {
        (s.clone(), -s)
    }
}

/// Everything a candidate needs to be turned into a unitary.
struct Completion<'a> {
    g: &'a GridOp,
    ctx: &'a NumericContext,
    cos: Real,
    sin: Real,
    threshold: Real,
}

impl<'a> Completion<'a> {
    fn complete(&self, candidate: &ZOmega, k: u32) -> Option<UnitaryMatrix> {
        let mut u = self.g.apply(candidate);
        let [x, y] = u.to_plane(self.ctx);
        let proj = (x * &self.cos + y * &self.sin) / self.ctx.pow_sqrt2(k);
        if proj <= self.threshold {
            return None;
        }
        let mut k = k;
        while k > 0 {
            match u.reduce() {
                Some(r) => {
                    u = r;
                    k -= 1;
                }
                None => break,
            }
        }
        let xi = ZSqrt2::from_int(BigInt::one() << k as usize) - u.norm_sqr();
        let t = solve_norm_equation(&xi)?;
        Some(UnitaryMatrix::new(u, t, k))
    }
}

/// Search with the given enumeration strategy.
///
/// Both strategies return the same result.
pub fn find_rz_approximation_with(
    config: &SynthesisConfig,
    strategy: EnumerationStrategy,
) -> GridSynthResult<RzApproximation> {
    config.validate()?;
    let ctx = config.context()?;
    let theta = real_from_f64(config.theta)
        .ok_or_else(|| GridSynthError::config("theta must be finite"))?;
    let eps = real_from_f64(config.epsilon)
        .ok_or_else(|| GridSynthError::config("epsilon must be finite"))?;

    if theta.abs() < *ctx.tol() {
        event!(target: "qip_gridsynth", Level::INFO, "identity for vanishing angle");
        let identity = UnitaryMatrix::new(ZOmega::one(), ZOmega::zero(), 0);
        return Ok(RzApproximation::from_matrix(identity, &theta, config, &ctx));
    }

    let search_eps = Ellipse::region_epsilon(&eps, &ctx);
    let region = Ellipse::epsilon_region(&theta, &eps, &ctx)?;
    let state = SearchState::new(region, Ellipse::unit_disk());
    let (g, skewed) = optimize_skew(&state, &ctx)?;

    let (sin, cos) = ctx.sin_cos(&theta);
    let completion = Completion {
        g: &g,
        ctx: &ctx,
        cos,
        sin,
        threshold: Real::one() - &eps * &eps / Real::from_integer(BigInt::from(2)),
    };

    for k in config.k_range() {
        let (s_first, s_second) = scale_pair(k, &ctx);
        let scaled = skewed.rescale(&s_first, &s_second, &ctx);
        let candidates = solve_two_dim(&scaled, &search_eps, strategy, &ctx)?;
        event!(
            target: "qip_gridsynth",
            Level::DEBUG,
            k,
            candidates = candidates.len()
        );
        let found = find_map_first!(candidates, |c: &ZOmega| completion.complete(c, k));
        if let Some(matrix) = found {
            event!(
                target: "qip_gridsynth",
                Level::INFO,
                k = matrix.k,
                theta = config.theta,
                epsilon = config.epsilon,
                "found approximation"
            );
            return Ok(RzApproximation::from_matrix(matrix, &theta, config, &ctx));
        }
    }

    event!(
        target: "qip_gridsynth",
        Level::INFO,
        theta = config.theta,
        epsilon = config.epsilon,
        kmax = config.kmax,
        "no approximation found"
    );
    Ok(RzApproximation::not_found(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let c = SynthesisConfig::new(0.5, 1e-3).unwrap();
        assert_eq!(c.digits(), 3);
        assert_eq!(c.k_range(), 0..1000);
        let c = SynthesisConfig::new(0.5, 0.5).unwrap();
        assert_eq!(c.digits(), 1);
        let c = SynthesisConfig::new(0.5, 40.0).unwrap();
        assert_eq!(c.digits(), 1);
    }

    #[test]
    fn large_epsilon_is_accepted() {
        let c = SynthesisConfig::new(0.0, 1.5).unwrap();
        let r = find_rz_approximation(&c).unwrap();
        assert!(r.solution_found());
        assert_eq!(r.scale_exponent(), 0);

        let c = SynthesisConfig::new(0.8, 40.0).unwrap();
        let r = find_rz_approximation(&c).unwrap();
        assert!(r.solution_found());
        assert!(r.error() < 40.0);
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(SynthesisConfig::new(0.5, 0.0).is_err());
        assert!(SynthesisConfig::new(0.5, -1.0).is_err());
        assert!(SynthesisConfig::new(0.5, f64::INFINITY).is_err());
        assert!(SynthesisConfig::new(0.5, f64::NAN).is_err());
        assert!(SynthesisConfig::new(f64::INFINITY, 0.1).is_err());
        let c = SynthesisConfig::new(0.5, 0.1).unwrap();
        assert!(c.clone().with_k_range(5, 2).validate().is_err());
        assert!(c.clone().with_digits(0).validate().is_err());
        assert!(c.clone().with_tol(-1.0).validate().is_err());
        assert!(find_rz_approximation(&c.with_k_range(5, 2)).is_err());
    }

    #[test]
    fn scale_pairs_alternate_sign() {
        let ctx = NumericContext::new(2).unwrap();
        let (a, b) = scale_pair(4, &ctx);
        assert_eq!(a, b);
        assert_eq!(a, Real::from_integer(BigInt::from(4)));
        let (a, b) = scale_pair(3, &ctx);
        assert_eq!(a, -b);
        assert!(a.is_positive());
    }

    #[test]
    fn zero_angle_is_identity() {
        let c = SynthesisConfig::new(0.0, 1e-2).unwrap();
        let r = find_rz_approximation(&c).unwrap();
        assert!(r.solution_found());
        assert_eq!(r.scale_exponent(), 0);
        assert_eq!(*r.u(), ZOmega::one());
        assert!(r.t().is_zero());
        assert!(r.error() < 1e-12);
    }

    #[test]
    fn finds_solution_within_budget() {
        let c = SynthesisConfig::new(0.3, 1e-2).unwrap();
        let r = find_rz_approximation(&c).unwrap();
        assert!(r.solution_found());
        assert!(r.matrix().is_unitary());
        assert!(r.error() < 1e-2);
        let norm = r.u_val().norm_sqr() + r.t_val().norm_sqr();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_range_reports_not_found() {
        let c = SynthesisConfig::new(0.3, 1e-2).unwrap().with_k_range(0, 0);
        let r = find_rz_approximation(&c).unwrap();
        assert!(!r.solution_found());
        assert!(r.matrix().is_empty());
        assert!(r.error().is_infinite());
    }
}
