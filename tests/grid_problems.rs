extern crate num;
extern crate qip_gridsynth;
extern crate rand;

use num::Zero;

use qip_gridsynth::numeric::{real_from_f64, real_to_f64};
use qip_gridsynth::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn r(x: f64) -> Real {
    real_from_f64(x).unwrap()
}

fn interval(lo: f64, hi: f64) -> Interval<Real> {
    Interval::new(r(lo), r(hi)).unwrap()
}

fn brute_force(a: &Interval<Real>, b: &Interval<Real>, ctx: &NumericContext) -> Vec<ZSqrt2> {
    // |a| <= 30 and |a•| <= 30 bound the integer coefficients by 30 and 22.
    let mut out = vec![];
    for x in -30i64..=30 {
        for y in -22i64..=22 {
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

fn random_interval(rng: &mut StdRng, max_width: f64) -> Interval<Real> {
    let width = rng.gen_range(0.0..max_width);
    let lo = rng.gen_range(-30.0..(30.0 - width));
    interval(lo, lo + width)
}

#[test]
fn one_dim_is_complete() {
    let ctx = NumericContext::new(3).unwrap();
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..25 {
        let a = random_interval(&mut rng, 20.0);
        let b = random_interval(&mut rng, 20.0);
        assert_eq!(solve_one_dim(&a, &b, &ctx).unwrap(), brute_force(&a, &b, &ctx));
    }
}

#[test]
fn one_dim_handles_unbalanced_widths() {
    let ctx = NumericContext::new(3).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10 {
        let a = random_interval(&mut rng, 0.05);
        let b = random_interval(&mut rng, 55.0);
        assert_eq!(solve_one_dim(&a, &b, &ctx).unwrap(), brute_force(&a, &b, &ctx));
        assert_eq!(solve_one_dim(&b, &a, &ctx).unwrap(), brute_force(&b, &a, &ctx));
    }
}

#[test]
fn fatten_widens_by_twice_the_amount() {
    let a = interval(-1.5, 2.0);
    for d in [0.25, -0.25, 0.0] {
        let f = a.fatten(&r(d));
        assert_eq!(f.width(), a.width() + r(2.0 * d.abs()));
        assert!(f.lo() <= a.lo());
        assert!(f.hi() >= a.hi());
    }
}

#[test]
fn interval_arithmetic() {
    let a = interval(1.0, 3.0);
    assert_eq!(a.clone() + r(1.0), interval(2.0, 4.0));
    assert_eq!(a.clone() - r(1.0), interval(0.0, 2.0));
    assert_eq!(a.clone() * r(-2.0), interval(-6.0, -2.0));
    assert_eq!(a / r(2.0), interval(0.5, 1.5));
    assert!(Interval::new(r(1.0), r(0.0)).is_err());
}

#[test]
fn transformed_ellipse_contains_pulled_back_points() {
    let ctx = NumericContext::new(4).unwrap();
    let e = Ellipse::from_axes([r(0.3), r(-0.2)], &r(2.0), &r(0.5), &r(0.6), &ctx).unwrap();
    let ops = [
        GridOp::r().unwrap(),
        GridOp::k().unwrap(),
        GridOp::a_pow(2).unwrap(),
        GridOp::b_pow(-1).unwrap(),
        GridOp::z().unwrap().compose(&GridOp::x().unwrap()),
    ];
    let strict = r(1e-6);
    for g in ops {
        let pulled = e.transform(&g, &ctx);
        for a in -3..=3 {
            for b in -3..=3 {
                for c in -3..=3 {
                    let u = ZOmega::new(a, b, c, 0);
                    let inside = e.contains(&u.to_plane(&ctx), &strict);
                    let back = g.apply_inverse(&u);
                    assert_eq!(pulled.contains(&back.to_plane(&ctx), &strict), inside);
                }
            }
        }
    }
}

#[test]
fn grid_operator_roundtrip() {
    let ctx = NumericContext::new(4).unwrap();
    let e = Ellipse::epsilon_region(&r(1.2), &r(1e-2), &ctx).unwrap();
    let g = GridOp::a_pow(3)
        .unwrap()
        .compose(&GridOp::k().unwrap().shift(2).unwrap());
    let back = e.transform(&g, &ctx).transform(&g.inverse(), &ctx);
    let (d0, d1, d2) = e.form();
    let (b0, b1, b2) = back.form();
    for (x, y) in [(d0, b0), (d1, b1), (d2, b2)] {
        let rel = (real_to_f64(x) - real_to_f64(y)).abs() / (1.0 + real_to_f64(x).abs());
        assert!(rel < 1e-12);
    }
}

#[test]
fn norm_equation_solutions_are_exact() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut solved = 0;
    for _ in 0..300 {
        let xi = ZSqrt2::new(rng.gen_range(-200i64..=200), rng.gen_range(-140i64..=140));
        if let Some(t) = solve_norm_equation(&xi) {
            assert_eq!(t.norm_sqr(), xi);
            assert!(xi.is_zero() || xi.is_doubly_positive());
            solved += 1;
        }
    }
    assert!(solved > 0);
}
