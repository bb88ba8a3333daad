#[macro_use]
extern crate bencher;
extern crate qip_gridsynth;

use bencher::Bencher;

use qip_gridsynth::numeric::real_from_f64;
use qip_gridsynth::*;

fn bench_one_dim(b: &mut Bencher) {
    let ctx = NumericContext::new(10).unwrap();
    let lo = real_from_f64(-50.0).unwrap();
    let hi = real_from_f64(50.0).unwrap();
    let a = Interval::new(lo.clone(), hi.clone()).unwrap();
    let bb = Interval::new(lo, hi).unwrap();
    b.iter(|| solve_one_dim(&a, &bb, &ctx).unwrap());
}

fn bench_skew(b: &mut Bencher) {
    let ctx = NumericContext::new(10).unwrap();
    let theta = real_from_f64(0.7).unwrap();
    let eps = real_from_f64(1e-10).unwrap();
    let state = SearchState::new(
        Ellipse::epsilon_region(&theta, &eps, &ctx).unwrap(),
        Ellipse::unit_disk(),
    );
    b.iter(|| optimize_skew(&state, &ctx).unwrap());
}

fn bench_norm_equation(b: &mut Bencher) {
    let u = ZOmega::new(1234, -567, 89, 1011);
    let xi = u.norm_sqr();
    b.iter(|| solve_norm_equation(&xi));
}

fn bench_rz_exact(b: &mut Bencher) {
    let config = SynthesisConfig::new(0.3, 1e-4).unwrap();
    b.iter(|| find_rz_approximation(&config).unwrap());
}

fn bench_rz_fast(b: &mut Bencher) {
    let config = SynthesisConfig::new(0.3, 1e-4).unwrap();
    b.iter(|| find_fast_rz_approximation(&config).unwrap());
}

benchmark_group!(
    benches,
    bench_one_dim,
    bench_skew,
    bench_norm_equation,
    bench_rz_exact,
    bench_rz_fast
);
benchmark_main!(benches);
