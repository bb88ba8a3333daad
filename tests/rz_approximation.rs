extern crate qip_gridsynth;
extern crate rand;

use qip_gridsynth::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_almost_eq(a: f64, b: f64, prec: i32) {
    let mult = 10.0f64.powi(prec);
    let (a, b) = (a * mult, b * mult);
    let (a, b) = (a.round(), b.round());
    assert_eq!(a / mult, b / mult);
}

fn search(theta: f64, eps: f64) -> RzApproximation {
    let config = SynthesisConfig::new(theta, eps).unwrap();
    find_rz_approximation(&config).unwrap()
}

fn sampled_angles(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI))
        .collect()
}

#[test]
fn zero_angle_needs_no_denominator() {
    for eps in [1.5, 0.5, 1e-1, 1e-3] {
        let r = search(0.0, eps);
        assert!(r.solution_found());
        assert_eq!(r.scale_exponent(), 0);
        assert!(r.matrix().is_unitary());
    }
}

#[test]
fn solutions_are_unitary_and_close() {
    for theta in [0.1, 0.7854, 1.3, -0.4, 2.9, -3.0] {
        let r = search(theta, 1e-2);
        assert!(r.solution_found(), "theta = {}", theta);
        assert!(r.matrix().is_unitary());
        assert!(r.error() < 1e-2, "theta = {}, error = {}", theta, r.error());
        assert_eq!(r.theta(), theta);
        assert_eq!(r.eps(), 1e-2);

        let target = Complex::from_polar(1.0, theta);
        let diff = (r.u_val() - target).norm_sqr() + r.t_val().norm_sqr();
        assert_almost_eq(diff.sqrt(), r.error(), 10);
    }
}

#[test]
fn solutions_cannot_be_reduced() {
    for theta in [0.2, 1.1, -2.0] {
        let r = search(theta, 1e-2);
        let m = r.matrix();
        assert_eq!(m.reduced().k, m.k, "theta = {}", theta);
        assert!(m.k == 0 || !m.u.is_reducible());
    }
}

#[test]
fn matrix_entries_match_values() {
    let r = search(0.9, 1e-2);
    let ctx = NumericContext::new(2).unwrap();
    let [u, _, t, _] = r.matrix().entries(&ctx);
    assert_almost_eq(u.re, r.u_val().re, 12);
    assert_almost_eq(u.im, r.u_val().im, 12);
    assert_almost_eq(t.re, r.t_val().re, 12);
    assert_almost_eq(t.im, r.t_val().im, 12);
}

#[test]
fn strategies_give_identical_results() {
    let angles = sampled_angles(7, 12);
    for (i, theta) in angles.into_iter().enumerate() {
        let eps = [1e-1, 1e-2, 1e-3][i % 3];
        let config = SynthesisConfig::new(theta, eps).unwrap();
        let exact = find_rz_approximation(&config).unwrap();
        let fast = find_fast_rz_approximation(&config).unwrap();
        assert_eq!(exact, fast, "theta = {}, eps = {}", theta, eps);
    }
    let short = SynthesisConfig::new(1.0, 1e-3).unwrap().with_k_range(0, 3);
    assert_eq!(
        find_rz_approximation(&short).unwrap(),
        find_fast_rz_approximation(&short).unwrap()
    );
}

#[test]
fn smaller_epsilon_never_needs_smaller_k() {
    for theta in sampled_angles(11, 12) {
        let mut last = 0;
        for eps in [1e-1, 1e-2, 1e-3] {
            let r = search(theta, eps);
            assert!(r.solution_found());
            assert!(r.scale_exponent() >= last, "theta = {}, eps = {}", theta, eps);
            last = r.scale_exponent();
        }
    }
}

#[test]
fn budgets_of_one_or_more_are_valid() {
    for theta in [0.8, -2.9] {
        for eps in [1.0, 1.5, 3.0] {
            let r = search(theta, eps);
            assert!(r.solution_found(), "theta = {}, eps = {}", theta, eps);
            assert!(r.matrix().is_unitary());
            assert!(r.error() < eps);
        }
    }
}

#[test]
fn exhausted_range_is_not_an_error() {
    let config = SynthesisConfig::new(1.0, 1e-3).unwrap().with_k_range(0, 3);
    let r = find_rz_approximation(&config).unwrap();
    assert!(!r.solution_found());
    assert!(r.matrix().is_empty());
}

#[test]
fn explicit_precision_and_tolerance() {
    let config = SynthesisConfig::new(0.6, 1e-2)
        .unwrap()
        .with_digits(6)
        .with_tol(1e-30);
    let r = find_rz_approximation(&config).unwrap();
    assert!(r.solution_found());
    assert!(r.matrix().is_unitary());
    assert!(r.error() < 1e-2);
}
