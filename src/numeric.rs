use crate::errors::{GridSynthError, GridSynthResult};
use num::bigint::BigInt;
use num::rational::BigRational;
use num::{One, Signed, ToPrimitive, Zero};

/// Arbitrary precision scalar used for all geometric computation.
pub type Real = BigRational;

/// Extra bits carried through series evaluations.
const GUARD_BITS: u64 = 32;

/// Precision and constants shared by every stage of a search.
///
/// The context is built once from a number of decimal digits and never changes afterwards, every
/// component borrows it. Values produced by transcendental functions are rounded to `bits`
/// significant bits so that rational denominators stay bounded.
#[derive(Debug, Clone)]
pub struct NumericContext {
    digits: u32,
    bits: u64,
    tol: Real,
    slack: Real,
    pi: Real,
    sqrt2: Real,
    inv_sqrt2: Real,
    lambda: Real,
    ln2: Real,
    ln_lambda: Real,
}

impl NumericContext {
    /// Make a context for `digits` decimal digits of target accuracy.
    ///
    /// Arithmetic is carried out with `4*digits + 19` decimal digits, the containment tolerance is
    /// `10^-(4*digits + 17)`.
    pub fn new(digits: u32) -> GridSynthResult<Self> {
        if digits == 0 {
            return Err(GridSynthError::config(
                "precision must be at least one decimal digit",
            ));
        }
        let working = 4 * u64::from(digits) + 19;
        // ceil(working * log2(10))
        let bits = (working * 3322 + 999) / 1000;
        let tol_exp = u32::try_from(working - 2)
            .map_err(|_| GridSynthError::config("precision is too large"))?;
        let tol = Real::new(BigInt::one(), BigInt::from(10u32).pow(tol_exp));

        let wp = bits + GUARD_BITS;
        let two = Real::from_integer(BigInt::from(2));
        let sqrt2 = sqrt_to_bits(&two, bits);
        let inv_sqrt2 = round_to_bits(&(Real::one() / &sqrt2), bits);
        let lambda = round_to_bits(&(Real::one() + &sqrt2), bits);
        let pi = round_to_bits(&from_fixed(pi_fixed(wp), wp), bits);
        let ln2 = round_to_bits(&from_fixed(ln2_fixed(wp), wp), bits);
        let ln_lambda = round_to_bits(&ln_with(&lambda, &ln2, wp), bits);
        let slack = sqrt_to_bits(&tol, bits);

        Ok(Self {
            digits,
            bits,
            tol,
            slack,
            pi,
            sqrt2,
            inv_sqrt2,
            lambda,
            ln2,
            ln_lambda,
        })
    }

    /// Replace the containment tolerance, the enumeration slack follows it.
    pub fn with_tol(mut self, tol: Real) -> GridSynthResult<Self> {
        if !tol.is_positive() {
            return Err(GridSynthError::config("tolerance must be positive"));
        }
        self.slack = sqrt_to_bits(&tol, self.bits);
        self.tol = tol;
        Ok(self)
    }

    /// Decimal digits the context was built for.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Significant bits kept by rounding.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Tolerance band used by containment tests.
    pub fn tol(&self) -> &Real {
        &self.tol
    }

    /// Margin added to enumeration bounds so the tolerance band is never missed, `sqrt(tol)`.
    pub fn slack(&self) -> &Real {
        &self.slack
    }

    /// pi
    pub fn pi(&self) -> &Real {
        &self.pi
    }

    /// sqrt(2)
    pub fn sqrt2(&self) -> &Real {
        &self.sqrt2
    }

    /// 1/sqrt(2)
    pub fn inv_sqrt2(&self) -> &Real {
        &self.inv_sqrt2
    }

    /// The fundamental unit `1 + sqrt(2)`.
    pub fn lambda(&self) -> &Real {
        &self.lambda
    }

    /// Natural logarithm of lambda.
    pub fn ln_lambda(&self) -> &Real {
        &self.ln_lambda
    }

    /// Round `x` to the context precision.
    pub fn round(&self, x: &Real) -> Real {
        round_to_bits(x, self.bits)
    }

    /// Square root, negative inputs are clamped to zero.
    pub fn sqrt(&self, x: &Real) -> Real {
        sqrt_to_bits(x, self.bits)
    }

    /// `sqrt(2)^k`, exact for even `k`.
    pub fn pow_sqrt2(&self, k: u32) -> Real {
        let base = Real::from_integer(BigInt::one() << (k / 2) as usize);
        if k % 2 == 0 {
            base
        } else {
            self.round(&(base * &self.sqrt2))
        }
    }

    /// Returns `(sin x, cos x)`.
    pub fn sin_cos(&self, x: &Real) -> (Real, Real) {
        let wp = self.bits + GUARD_BITS;
        let two_pi = &self.pi * Real::from_integer(BigInt::from(2));
        let turns = (x / &two_pi).round();
        let r = x - turns * two_pi;
        let rf = to_fixed(&r, wp);

        let one = BigInt::one() << wp as usize;
        let r2 = (&rf * &rf) >> wp as usize;

        let mut cos = one.clone();
        let mut term = one;
        let mut n = 0u64;
        loop {
            n += 1;
            term = -((&term * &r2) >> wp as usize) / BigInt::from((2 * n - 1) * (2 * n));
            if term.is_zero() {
                break;
            }
            cos += &term;
        }

        let mut sin = rf.clone();
        let mut term = rf;
        let mut n = 0u64;
        loop {
            n += 1;
            term = -((&term * &r2) >> wp as usize) / BigInt::from((2 * n) * (2 * n + 1));
            if term.is_zero() {
                break;
            }
            sin += &term;
        }

        (
            self.round(&from_fixed(sin, wp)),
            self.round(&from_fixed(cos, wp)),
        )
    }

    /// Natural logarithm. `x` must be positive, other inputs give zero.
    pub fn ln(&self, x: &Real) -> Real {
        if !x.is_positive() {
            return Real::zero();
        }
        self.round(&ln_with(x, &self.ln2, self.bits + GUARD_BITS))
    }

    /// Angle of the point `(x, y)` in `(-pi, pi]`, zero at the origin.
    pub fn atan2(&self, y: &Real, x: &Real) -> Real {
        let half_pi = &self.pi / Real::from_integer(BigInt::from(2));
        let angle = if x.is_positive() {
            self.atan_right(y, x, &half_pi)
        } else if x.is_negative() {
            let mirrored = self.atan_right(y, &-x, &half_pi);
            if y.is_negative() {
                -&self.pi - mirrored
            } else {
                &self.pi - mirrored
            }
        } else if y.is_positive() {
            half_pi
        } else if y.is_negative() {
            -half_pi
        } else {
            Real::zero()
        };
        self.round(&angle)
    }

    /// atan2 for a positive `x`.
    fn atan_right(&self, y: &Real, x: &Real, half_pi: &Real) -> Real {
        if y.abs() <= *x {
            self.atan_unit(&(y / x))
        } else if y.is_positive() {
            half_pi - self.atan_unit(&(x / y))
        } else {
            -half_pi - self.atan_unit(&(x / y))
        }
    }

    /// atan for `|t| <= 1`, two argument halvings then the Taylor series.
    fn atan_unit(&self, t: &Real) -> Real {
        let wp = self.bits + GUARD_BITS;
        let mut t = t.clone();
        for _ in 0..2 {
            let denom = Real::one() + sqrt_to_bits(&(Real::one() + &t * &t), wp);
            t = round_to_bits(&(t / denom), wp);
        }
        let tf = to_fixed(&t, wp);
        let t2 = (&tf * &tf) >> wp as usize;
        let mut sum = tf.clone();
        let mut term = tf;
        let mut n = 0u64;
        loop {
            n += 1;
            term = -((&term * &t2) >> wp as usize);
            let contribution = &term / BigInt::from(2 * n + 1);
            if contribution.is_zero() {
                break;
            }
            sum += contribution;
        }
        from_fixed(sum * BigInt::from(4), wp)
    }
}

/// Convert a float to an exact rational.
pub fn real_from_f64(x: f64) -> Option<Real> {
    Real::from_float(x)
}

/// Nearest float to `x`, used only for reporting.
pub fn real_to_f64(x: &Real) -> f64 {
    if x.is_zero() {
        return 0.0;
    }
    let shift = 60 - magnitude(x);
    let scaled = mul_pow2(x, shift).round().to_integer();
    let mantissa = scaled.to_f64().unwrap_or(f64::NAN);
    match i32::try_from(shift) {
        Ok(shift) => mantissa * 2f64.powi(-shift),
        Err(_) if shift > 0 => 0.0,
        Err(_) => mantissa * f64::INFINITY,
    }
}

/// Approximate base 2 exponent of `|x|`.
fn magnitude(x: &Real) -> i64 {
    x.numer().bits() as i64 - x.denom().bits() as i64
}

/// `x * 2^e`
fn mul_pow2(x: &Real, e: i64) -> Real {
    if e >= 0 {
        Real::new(x.numer() << e as usize, x.denom().clone())
    } else {
        Real::new(x.numer().clone(), x.denom() << (-e) as usize)
    }
}

/// Round to `bits` significant bits.
fn round_to_bits(x: &Real, bits: u64) -> Real {
    if x.is_zero() {
        return Real::zero();
    }
    let shift = bits as i64 - magnitude(x);
    let rounded = mul_pow2(x, shift).round();
    mul_pow2(&rounded, -shift)
}

/// Square root with `bits` significant bits.
fn sqrt_to_bits(x: &Real, bits: u64) -> Real {
    if !x.is_positive() {
        return Real::zero();
    }
    let half_shift = (2 * bits as i64 - magnitude(x)).div_euclid(2);
    let n = mul_pow2(x, 2 * half_shift).floor().to_integer();
    mul_pow2(&Real::from_integer(n.sqrt()), -half_shift)
}

/// `floor(x * 2^wp)`
fn to_fixed(x: &Real, wp: u64) -> BigInt {
    mul_pow2(x, wp as i64).floor().to_integer()
}

fn from_fixed(v: BigInt, wp: u64) -> Real {
    Real::new(v, BigInt::one() << wp as usize)
}

/// `atan(1/n)` in fixed point.
fn atan_inv_fixed(n: u32, wp: u64) -> BigInt {
    let n = BigInt::from(n);
    let n2 = &n * &n;
    let mut term = (BigInt::one() << wp as usize) / &n;
    let mut sum = term.clone();
    let mut k = 0u64;
    loop {
        k += 1;
        term = term / &n2;
        if term.is_zero() {
            break;
        }
        let contribution = &term / BigInt::from(2 * k + 1);
        if k % 2 == 1 {
            sum -= contribution;
        } else {
            sum += contribution;
        }
    }
    sum
}

/// Machin's formula.
fn pi_fixed(wp: u64) -> BigInt {
    atan_inv_fixed(5, wp) * BigInt::from(16) - atan_inv_fixed(239, wp) * BigInt::from(4)
}

/// `2 atanh(y)` in fixed point for small `|y|`.
fn two_atanh_fixed(yf: BigInt, wp: u64) -> BigInt {
    let y2 = (&yf * &yf) >> wp as usize;
    let mut sum = yf.clone();
    let mut term = yf;
    let mut n = 0u64;
    loop {
        n += 1;
        term = (&term * &y2) >> wp as usize;
        let contribution = &term / BigInt::from(2 * n + 1);
        if contribution.is_zero() {
            break;
        }
        sum += contribution;
    }
    sum * BigInt::from(2)
}

/// `ln(2) = 2 atanh(1/3)`
fn ln2_fixed(wp: u64) -> BigInt {
    two_atanh_fixed((BigInt::one() << wp as usize) / BigInt::from(3), wp)
}

fn ln_with(x: &Real, ln2: &Real, wp: u64) -> Real {
    let e = magnitude(x);
    let m = mul_pow2(x, -e);
    let y = (&m - Real::one()) / (&m + Real::one());
    let ln_m = from_fixed(two_atanh_fixed(to_fixed(&y, wp), wp), wp);
    ln2 * Real::from_integer(BigInt::from(e)) + ln_m
}
