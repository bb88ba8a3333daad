//! Enumeration of ring elements inside pairs of regions.
//!
//! The one dimensional problem asks for every `α ∈ Z[√2]` with `α ∈ A` and `α• ∈ B`. The two
//! dimensional problem asks for every `u ∈ Z[ω]` with `u` in one ellipse and `u•` in another, it
//! is reduced to one dimensional problems for the real and imaginary parts. Since
//! `Z[ω] = Z[√2][i] ∪ (Z[√2][i] + ω)`, each search runs once per coset.

use crate::errors::GridSynthResult;
use crate::numeric::{NumericContext, Real};
use crate::regions::{Interval, SearchState, UprightRectangle};
use crate::rings::{ZOmega, ZSqrt2};
use num::bigint::BigInt;
use num::iter::range_inclusive;
use num::{One, ToPrimitive, Zero};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::{max, min};

/// How candidates for the two dimensional problem are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumerationStrategy {
    /// Solve for the imaginary part inside the exact slice of each ellipse.
    Ellipse,
    /// Pair every real part with every imaginary part of the bounding boxes.
    BoundingBox,
}

impl Default for EnumerationStrategy {
    fn default() -> Self {
        EnumerationStrategy::Ellipse
    }
}

/// Every `α ∈ Z[√2]` with `α ∈ a` and `α• ∈ b`, in increasing order.
pub fn solve_one_dim(
    a: &Interval<Real>,
    b: &Interval<Real>,
    ctx: &NumericContext,
) -> GridSynthResult<Vec<ZSqrt2>> {
    let af = a.fatten(ctx.slack());
    let bf = b.fatten(ctx.slack());

    // Scaling α by λⁿ scales α• by (λ•)ⁿ, choose n to bring the widths together.
    let ratio = bf.width() / af.width();
    let n = (ctx.ln(&ratio) / (Real::from_integer(BigInt::from(2)) * ctx.ln_lambda()))
        .round()
        .to_integer()
        .to_i64()
        .unwrap_or(0);
    let lambda_n = ZSqrt2::lambda_pow(n);
    let sa = af.rescale(&lambda_n.to_real(ctx));
    let sb = bf.rescale(&lambda_n.conj_sqrt2().to_real(ctx));

    // α - α• = 2b√2
    let two_sqrt2 = ctx.sqrt2() * Real::from_integer(BigInt::from(2));
    let b_lo = ((sa.lo() - sb.hi()) / &two_sqrt2).ceil().to_integer() - BigInt::one();
    let b_hi = ((sa.hi() - sb.lo()) / &two_sqrt2).floor().to_integer() + BigInt::one();

    let unscale = ZSqrt2::lambda_pow(-n);
    let mut out = vec![];
    for bb in range_inclusive(b_lo, b_hi) {
        let shift = Real::from_integer(bb.clone()) * ctx.sqrt2();
        let lo = max(sa.lo() - &shift, sb.lo() + &shift);
        let hi = min(sa.hi() - &shift, sb.hi() + &shift);
        if lo > hi {
            continue;
        }
        for aa in range_inclusive(lo.ceil().to_integer(), hi.floor().to_integer()) {
            let alpha = ZSqrt2::new(aa, bb.clone()) * &unscale;
            if a.contains(&alpha.to_real(ctx), ctx.tol())
                && b.contains(&alpha.conj_sqrt2().to_real(ctx), ctx.tol())
            {
                out.push(alpha);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Offset of the `+ω` coset along each axis.
fn coset_shift(offset: bool, ctx: &NumericContext) -> Real {
    if offset {
        ctx.inv_sqrt2().clone()
    } else {
        Real::zero()
    }
}

fn fattened_boxes(
    state: &SearchState,
    epsilon: &Real,
    ctx: &NumericContext,
) -> GridSynthResult<(UprightRectangle<Real>, UprightRectangle<Real>)> {
    Ok((
        state.first.bounding_box(ctx)?.fatten(epsilon),
        state.second.bounding_box(ctx)?.fatten(epsilon),
    ))
}

/// Whether `u` lies in the first ellipse and `u•` in the second.
fn in_state(state: &SearchState, u: &ZOmega, ctx: &NumericContext) -> bool {
    state.first.contains(&u.to_plane(ctx), ctx.tol())
        && state.second.contains(&u.conj_sqrt2().to_plane(ctx), ctx.tol())
}

fn recheck(state: &SearchState, candidates: Vec<ZOmega>, ctx: &NumericContext) -> Vec<ZOmega> {
    iter!(candidates)
        .filter(|u| in_state(state, u, ctx))
        .cloned()
        .collect()
}

/// Every `u ∈ Z[ω]` in the pair of ellipses, solving for the imaginary part in the ellipse
/// slices above each real part.
///
/// Results are ordered by coset, then real part, then imaginary part.
pub fn solve_two_dim_ellipse(
    state: &SearchState,
    epsilon: &Real,
    ctx: &NumericContext,
) -> GridSynthResult<Vec<ZOmega>> {
    let (box1, box2) = fattened_boxes(state, epsilon, ctx)?;
    let fat1 = state.first.fatten(epsilon, ctx);
    let fat2 = state.second.fatten(epsilon, ctx);
    let mut candidates = vec![];
    for offset in [false, true] {
        let h = coset_shift(offset, ctx);
        let xs = solve_one_dim(&box1.x.shift(&-&h), &box2.x.shift(&h), ctx)?;
        for x in xs {
            let px = x.to_real(ctx) + &h;
            let pxb = x.conj_sqrt2().to_real(ctx) - &h;
            let (s1, s2) = match (fat1.slice(&px, ctx)?, fat2.slice(&pxb, ctx)?) {
                (Some(s1), Some(s2)) => (s1, s2),
                _ => continue,
            };
            let ys = solve_one_dim(&s1.shift(&-&h), &s2.shift(&h), ctx)?;
            candidates.extend(ys.iter().map(|y| ZOmega::from_plane(&x, y, offset)));
        }
    }
    Ok(recheck(state, candidates, ctx))
}

/// Every `u ∈ Z[ω]` in the pair of ellipses, pairing all real and imaginary parts allowed by the
/// bounding boxes and filtering afterwards.
///
/// Same output as [`solve_two_dim_ellipse`], with cheaper enumeration but more rejected pairs.
pub fn solve_two_dim_bbox(
    state: &SearchState,
    epsilon: &Real,
    ctx: &NumericContext,
) -> GridSynthResult<Vec<ZOmega>> {
    let (box1, box2) = fattened_boxes(state, epsilon, ctx)?;
    let mut candidates = vec![];
    for offset in [false, true] {
        let h = coset_shift(offset, ctx);
        let xs = solve_one_dim(&box1.x.shift(&-&h), &box2.x.shift(&h), ctx)?;
        let ys = solve_one_dim(&box1.y.shift(&-&h), &box2.y.shift(&h), ctx)?;
        for x in &xs {
            candidates.extend(ys.iter().map(|y| ZOmega::from_plane(x, y, offset)));
        }
    }
    Ok(recheck(state, candidates, ctx))
}

/// Dispatch on the strategy.
pub fn solve_two_dim(
    state: &SearchState,
    epsilon: &Real,
    strategy: EnumerationStrategy,
    ctx: &NumericContext,
) -> GridSynthResult<Vec<ZOmega>> {
    match strategy {
        EnumerationStrategy::Ellipse => solve_two_dim_ellipse(state, epsilon, ctx),
        EnumerationStrategy::BoundingBox => solve_two_dim_bbox(state, epsilon, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::real_from_f64;
    use crate::regions::Ellipse;

    fn r(x: f64) -> Real {
        real_from_f64(x).unwrap()
    }

    fn interval(lo: f64, hi: f64) -> Interval<Real> {
        Interval::new(r(lo), r(hi)).unwrap()
    }

    /// Direct search over a box of coefficients.
    fn brute_force(a: &Interval<Real>, b: &Interval<Real>, ctx: &NumericContext) -> Vec<ZSqrt2> {
        let mut out = vec![];
        for x in -60i64..=60 {
            for y in -45i64..=45 {
                let alpha = ZSqrt2::new(x, y);
                if a.contains(&alpha.to_real(ctx), ctx.tol())
                    && b.contains(&alpha.conj_sqrt2().to_real(ctx), ctx.tol())
                {
                    out.push(alpha);
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn one_dim_small_example() {
        let ctx = NumericContext::new(3).unwrap();
        let sols = solve_one_dim(&interval(-1.0, 1.0), &interval(-1.0, 1.0), &ctx).unwrap();
        let expected: Vec<_> = (-1..=1).map(ZSqrt2::from_int).collect();
        assert_eq!(sols, expected);
        let sols = solve_one_dim(&interval(2.0, 3.0), &interval(-1.0, 0.0), &ctx).unwrap();
        // 1 + √2 ≈ 2.414 with conjugate ≈ -0.414
        assert_eq!(sols, vec![ZSqrt2::new(1, 1)]);
    }

    #[test]
    fn one_dim_matches_brute_force() {
        let ctx = NumericContext::new(3).unwrap();
        let cases = [
            ((-3.0, 4.0), (-2.5, 6.0)),
            ((10.0, 10.3), (-20.0, 15.0)),
            ((-0.01, 40.0), (0.0, 0.9)),
            ((5.5, 5.6), (5.5, 5.6)),
        ];
        for ((alo, ahi), (blo, bhi)) in cases {
            let a = interval(alo, ahi);
            let b = interval(blo, bhi);
            assert_eq!(solve_one_dim(&a, &b, &ctx).unwrap(), brute_force(&a, &b, &ctx));
        }
    }

    #[test]
    fn one_dim_endpoints_are_included() {
        let ctx = NumericContext::new(3).unwrap();
        let sols = solve_one_dim(&interval(1.0, 1.0), &interval(1.0, 1.0), &ctx).unwrap();
        assert_eq!(sols, vec![ZSqrt2::from_int(1)]);
    }

    fn disk_state(radius: f64) -> SearchState {
        let ctx = NumericContext::new(3).unwrap();
        let e = Ellipse::unit_disk().rescale(&r(radius), &ctx);
        SearchState::new(e.clone(), e)
    }

    #[test]
    fn strategies_agree() {
        let ctx = NumericContext::new(3).unwrap();
        let eps = r(0.01);
        for radius in [1.0, 2.5, 4.0] {
            let state = disk_state(radius);
            let e = solve_two_dim_ellipse(&state, &eps, &ctx).unwrap();
            let b = solve_two_dim_bbox(&state, &eps, &ctx).unwrap();
            assert_eq!(e, b);
            assert!(!e.is_empty());
        }
    }

    #[test]
    fn two_dim_is_complete_on_disks() {
        let ctx = NumericContext::new(3).unwrap();
        let radius = 2.0;
        let state = disk_state(radius);
        let found = solve_two_dim(&state, &r(0.01), EnumerationStrategy::Ellipse, &ctx).unwrap();
        // |u|² <= 4 and |u•|² <= 4 bounds every coefficient by 2.
        let mut expected = 0;
        for a in -2..=2 {
            for b in -2..=2 {
                for c in -2..=2 {
                    for d in -2..=2 {
                        let u = ZOmega::new(a, b, c, d);
                        if in_state(&state, &u, &ctx) {
                            expected += 1;
                            assert!(found.contains(&u), "missing {}", u);
                        }
                    }
                }
            }
        }
        assert_eq!(found.len(), expected);
    }

    #[test]
    fn unit_disk_contains_the_units() {
        let ctx = NumericContext::new(3).unwrap();
        let state = disk_state(1.0);
        let found = solve_two_dim_bbox(&state, &r(0.01), &ctx).unwrap();
        assert!(found.contains(&ZOmega::one()));
        assert!(found.contains(&ZOmega::omega()));
        assert!(found.contains(&ZOmega::zero()));
    }
}
