//! Reduction of the skew of a search state by special grid operators.
//!
//! A normalized ellipse has `D = [[e·λ^-z, b], [b, e·λ^z]]` with `e² - b² = 1`. The skew of a
//! pair is `b² + β²`. Each step picks one elementary operator from `(z, ζ, β)` and pulls the
//! pair back by it, which lowers the skew by a constant factor until it drops below 15.

use crate::errors::{GridSynthError, GridSynthResult};
use crate::grid_op::GridOp;
use crate::numeric::{real_to_f64, NumericContext, Real};
use crate::regions::SearchState;
use crate::rings::ZSqrt2;
use num::bigint::BigInt;
use num::{One, Signed, ToPrimitive, Zero};
use std::cmp::max;
use tracing::{event, Level};

const SKEW_TARGET: i64 = 15;
const MAX_STEPS: usize = 10_000;

fn ratio(n: i64, d: i64) -> Real {
    Real::new(BigInt::from(n), BigInt::from(d))
}

fn floor_to_i64(x: &Real) -> GridSynthResult<i64> {
    x.floor()
        .to_integer()
        .to_i64()
        .ok_or_else(|| GridSynthError::grid_op("step exponent out of range"))
}

/// Find a special grid operator `G` after which the pair `state` has skew below 15.
///
/// Returns `G` and `state` pulled back by it. The operator depends only on the two quadratic
/// forms, the same state always gives the same operator.
pub fn optimize_skew(
    state: &SearchState,
    ctx: &NumericContext,
) -> GridSynthResult<(GridOp, SearchState)> {
    let target = Real::from_integer(BigInt::from(SKEW_TARGET));
    let mut g = GridOp::identity()?;
    let mut current = state.normalize(ctx);
    let mut steps = 0;
    while current.skew() >= target {
        if steps == MAX_STEPS {
            event!(
                target: "qip_gridsynth::skew",
                Level::WARN,
                steps,
                skew = real_to_f64(&current.skew()),
                "skew reduction did not converge"
            );
            break;
        }
        let op = step_operator(&current, ctx)?;
        event!(
            target: "qip_gridsynth::skew",
            Level::TRACE,
            step = steps,
            skew = real_to_f64(&current.skew())
        );
        current = current.transform(&op, ctx).normalize(ctx);
        g = g.compose(&op);
        steps += 1;
    }
    event!(
        target: "qip_gridsynth::skew",
        Level::DEBUG,
        steps,
        skew = real_to_f64(&current.skew())
    );
    let out = state.transform(&g, ctx);
    Ok((g, out))
}

/// The operator for one step on a normalized state.
fn step_operator(state: &SearchState, ctx: &NumericContext) -> GridSynthResult<GridOp> {
    let (d00, d01, d11) = state.first.form();
    let (e00, e01, e11) = state.second.form();
    if d01.is_negative() {
        return GridOp::z();
    }
    let z = state.first.z(ctx);
    let zeta = state.second.z(ctx);
    if (&z + &zeta).is_negative() {
        return GridOp::x();
    }

    // Shift so that the bias ζ - z lies in (-1, 1].
    let bias = &zeta - &z;
    let k = floor_to_i64(&((Real::one() - bias) / ratio(2, 1)))?;
    let shift = Real::from_integer(BigInt::from(k));
    let zs = &z - &shift;
    let zetas = &zeta + &shift;
    let beta_nonneg = if k % 2 == 0 {
        !e01.is_negative()
    } else {
        !e01.is_positive()
    };

    // λ^zs and λ^ζs without exponentials.
    let lambda_zs = ctx.sqrt(&(d11 / d00)) * ZSqrt2::lambda_pow(-k).to_real(ctx);
    let lambda_zetas = ctx.sqrt(&(e11 / e00)) * ZSqrt2::lambda_pow(k).to_real(ctx);
    let lambda_min = if lambda_zs < lambda_zetas {
        lambda_zs
    } else {
        lambda_zetas
    };

    let band = |x: &Real| x.abs() <= ratio(4, 5);
    let op = if beta_nonneg {
        if band(&zs) && band(&zetas) {
            GridOp::r()?
        } else if zs <= ratio(3, 10) && zetas >= ratio(4, 5) {
            GridOp::k()?
        } else if zs >= ratio(3, 10) && zetas >= ratio(3, 10) {
            let n = max(1, floor_to_i64(&(lambda_min / ratio(2, 1)))?);
            GridOp::a_pow(n)?
        } else if zs >= ratio(4, 5) && zetas <= ratio(3, 10) {
            GridOp::k()?.conj_sqrt2()
        } else {
            GridOp::r()?
        }
    } else if band(&zs) && band(&zetas) {
        GridOp::r()?
    } else if zs >= ratio(-1, 5) && zetas >= ratio(-1, 5) {
        let n = max(1, floor_to_i64(&(lambda_min / ctx.sqrt2()))?);
        GridOp::b_pow(-n)?
    } else {
        GridOp::r()?
    };
    if k.is_zero() {
        Ok(op)
    } else {
        op.shift(k)
    }
}
