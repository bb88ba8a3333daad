use super::{div_round, EuclideanDomain, ZSqrt2};
use crate::numeric::{real_to_f64, NumericContext, Real};
use num::bigint::BigInt;
use num::integer::Integer;
use num::{Complex, One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// An element `a + bω + cω² + dω³` of `Z[ω]`, where `ω = e^{iπ/4}` and `ω⁴ = -1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZOmega {
    /// Coefficient of `1`.
    pub a: BigInt,
    /// Coefficient of `ω`.
    pub b: BigInt,
    /// Coefficient of `ω² = i`.
    pub c: BigInt,
    /// Coefficient of `ω³`.
    pub d: BigInt,
}

impl ZOmega {
    /// Make `a + bω + cω² + dω³`.
    pub fn new<A, B, C, D>(a: A, b: B, c: C, d: D) -> Self
    where
        A: Into<BigInt>,
        B: Into<BigInt>,
        C: Into<BigInt>,
        D: Into<BigInt>,
    {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    /// Embed an integer.
    pub fn from_int<A: Into<BigInt>>(a: A) -> Self {
        Self::new(a, 0, 0, 0)
    }

    /// `ω`
    pub fn omega() -> Self {
        Self::new(0, 1, 0, 0)
    }

    /// `i = ω²`
    pub fn i() -> Self {
        Self::new(0, 0, 1, 0)
    }

    /// `δ = 1 + ω`, a prime of norm 2.
    pub fn delta() -> Self {
        Self::new(1, 1, 0, 0)
    }

    /// Embed `x ∈ Z[√2]` using `√2 = ω - ω³`.
    pub fn from_zsqrt2(x: &ZSqrt2) -> Self {
        Self::new(x.a.clone(), x.b.clone(), 0, -&x.b)
    }

    /// The element with real part `α` and imaginary part `β`, plus `ω` when `offset` is set.
    ///
    /// Every element of `Z[ω]` has exactly one such representation.
    pub fn from_plane(alpha: &ZSqrt2, beta: &ZSqrt2, offset: bool) -> Self {
        let o = if offset { BigInt::one() } else { BigInt::zero() };
        Self::new(
            alpha.a.clone(),
            &alpha.b + &beta.b + o,
            beta.a.clone(),
            &beta.b - &alpha.b,
        )
    }

    /// Back to `Z[√2]`, only for real elements.
    pub fn to_zsqrt2(&self) -> Option<ZSqrt2> {
        if self.c.is_zero() && self.d == -&self.b {
            Some(ZSqrt2::new(self.a.clone(), self.b.clone()))
        } else {
            None
        }
    }

    /// Complex conjugate `(a, -d, -c, -b)`.
    pub fn conj(&self) -> Self {
        Self::new(self.a.clone(), -&self.d, -&self.c, -&self.b)
    }

    /// The √2-conjugate `ω ↦ -ω`, written `u•`.
    pub fn conj_sqrt2(&self) -> Self {
        Self::new(self.a.clone(), -&self.b, self.c.clone(), -&self.d)
    }

    /// `u·ū`, always in `Z[√2]`.
    pub fn norm_sqr(&self) -> ZSqrt2 {
        let (a, b, c, d) = (&self.a, &self.b, &self.c, &self.d);
        ZSqrt2::new(
            a * a + b * b + c * c + d * d,
            a * b + b * c + c * d - d * a,
        )
    }

    /// The integral norm `N(u·ū)`, never negative.
    pub fn norm(&self) -> BigInt {
        self.norm_sqr().norm()
    }

    /// Whether `√2` divides this element.
    pub fn is_reducible(&self) -> bool {
        (&self.a + &self.c).is_even() && (&self.b + &self.d).is_even()
    }

    /// Divide by `√2`, lowering the denominator exponent of `u/√2^k` by one. `None` if not
    /// reducible.
    pub fn reduce(&self) -> Option<Self> {
        if !self.is_reducible() {
            return None;
        }
        Some(Self::new(
            (&self.b - &self.d) / 2,
            (&self.a + &self.c) / 2,
            (&self.b + &self.d) / 2,
            (&self.c - &self.a) / 2,
        ))
    }

    /// Exact quotient by an integer.
    pub fn div_int(&self, n: &BigInt) -> Option<Self> {
        if n.is_zero() {
            return None;
        }
        let coeffs = [&self.a, &self.b, &self.c, &self.d];
        if coeffs.iter().all(|x| x.is_multiple_of(n)) {
            Some(Self::new(&self.a / n, &self.b / n, &self.c / n, &self.d / n))
        } else {
            None
        }
    }

    /// Exact quotient `self / d`, or `None` if `d` does not divide `self`.
    pub fn div_exact(&self, d: &Self) -> Option<Self> {
        let n = d.norm();
        (self * Self::norm_cofactor(d)).div_int(&n)
    }

    /// `d̄·(d·d̄)•`, so that `d` times it is the integral norm of `d`.
    fn norm_cofactor(d: &Self) -> Self {
        d.conj() * Self::from_zsqrt2(&d.norm_sqr().conj_sqrt2())
    }

    /// Position in the plane, `(a + (b-d)/√2, c + (b+d)/√2)`.
    pub fn to_plane(&self, ctx: &NumericContext) -> [Real; 2] {
        let int = |x: &BigInt| Real::from_integer(x.clone());
        let re = int(&self.a) + int(&(&self.b - &self.d)) * ctx.inv_sqrt2();
        let im = int(&self.c) + int(&(&self.b + &self.d)) * ctx.inv_sqrt2();
        [re, im]
    }

    /// Complex value for reporting.
    pub fn to_complex(&self, ctx: &NumericContext) -> Complex<f64> {
        let [re, im] = self.to_plane(ctx);
        Complex::new(real_to_f64(&re), real_to_f64(&im))
    }
}

impl<'a, 'b> Add<&'b ZOmega> for &'a ZOmega {
    type Output = ZOmega;
    fn add(self, rhs: &'b ZOmega) -> ZOmega {
        ZOmega::new(
            &self.a + &rhs.a,
            &self.b + &rhs.b,
            &self.c + &rhs.c,
            &self.d + &rhs.d,
        )
    }
}

impl<'a, 'b> Sub<&'b ZOmega> for &'a ZOmega {
    type Output = ZOmega;
    fn sub(self, rhs: &'b ZOmega) -> ZOmega {
        ZOmega::new(
            &self.a - &rhs.a,
            &self.b - &rhs.b,
            &self.c - &rhs.c,
            &self.d - &rhs.d,
        )
    }
}

impl<'a, 'b> Mul<&'b ZOmega> for &'a ZOmega {
    type Output = ZOmega;
    fn mul(self, rhs: &'b ZOmega) -> ZOmega {
        let (a0, a1, a2, a3) = (&self.a, &self.b, &self.c, &self.d);
        let (b0, b1, b2, b3) = (&rhs.a, &rhs.b, &rhs.c, &rhs.d);
        ZOmega::new(
            a0 * b0 - a1 * b3 - a2 * b2 - a3 * b1,
            a0 * b1 + a1 * b0 - a2 * b3 - a3 * b2,
            a0 * b2 + a1 * b1 + a2 * b0 - a3 * b3,
            a0 * b3 + a1 * b2 + a2 * b1 + a3 * b0,
        )
    }
}

forward_binop!(impl Add, add for ZOmega);
forward_binop!(impl Sub, sub for ZOmega);
forward_binop!(impl Mul, mul for ZOmega);

impl Neg for ZOmega {
    type Output = ZOmega;
    fn neg(self) -> ZOmega {
        ZOmega::new(-self.a, -self.b, -self.c, -self.d)
    }
}

impl<'a> Neg for &'a ZOmega {
    type Output = ZOmega;
    fn neg(self) -> ZOmega {
        ZOmega::new(-&self.a, -&self.b, -&self.c, -&self.d)
    }
}

impl Zero for ZOmega {
    fn zero() -> Self {
        Self::from_int(0)
    }

    fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero() && self.c.is_zero() && self.d.is_zero()
    }
}

impl One for ZOmega {
    fn one() -> Self {
        Self::from_int(1)
    }
}

impl EuclideanDomain for ZOmega {
    fn euclid_norm(&self) -> BigInt {
        self.norm()
    }

    fn div_rem_round(&self, other: &Self) -> (Self, Self) {
        let n = other.norm();
        let w = self * Self::norm_cofactor(other);
        let q = Self::new(
            div_round(&w.a, &n),
            div_round(&w.b, &n),
            div_round(&w.c, &n),
            div_round(&w.d, &n),
        );
        let r = self - &q * other;
        (q, r)
    }
}

impl fmt::Display for ZOmega {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} + {}ω + {}ω² + {}ω³",
            self.a, self.b, self.c, self.d
        )
    }
}
