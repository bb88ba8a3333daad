use super::{div_round, EuclideanDomain};
use crate::numeric::{NumericContext, Real};
use num::bigint::BigInt;
use num::integer::Integer;
use num::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// An element `a + b√2` of the ring `Z[√2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZSqrt2 {
    /// Integer part.
    pub a: BigInt,
    /// Coefficient of `√2`.
    pub b: BigInt,
}

impl ZSqrt2 {
    /// Make `a + b√2`.
    pub fn new<A: Into<BigInt>, B: Into<BigInt>>(a: A, b: B) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Embed an integer.
    pub fn from_int<A: Into<BigInt>>(a: A) -> Self {
        Self::new(a, 0)
    }

    /// `√2`
    pub fn sqrt2() -> Self {
        Self::new(0, 1)
    }

    /// The fundamental unit `λ = 1 + √2`.
    pub fn lambda() -> Self {
        Self::new(1, 1)
    }

    /// `λ^-1 = -1 + √2`
    pub fn lambda_inv() -> Self {
        Self::new(-1, 1)
    }

    /// `λ^n` for any integer `n`.
    pub fn lambda_pow(n: i64) -> Self {
        let base = if n >= 0 {
            Self::lambda()
        } else {
            Self::lambda_inv()
        };
        let mut acc = Self::one();
        for _ in 0..n.unsigned_abs() {
            acc = acc * &base;
        }
        acc
    }

    /// The √2-conjugate `a - b√2`, written `x•`.
    pub fn conj_sqrt2(&self) -> Self {
        Self::new(self.a.clone(), -&self.b)
    }

    /// The integral norm `x·x• = a² - 2b²`.
    pub fn norm(&self) -> BigInt {
        &self.a * &self.a - BigInt::from(2) * &self.b * &self.b
    }

    /// Whether the norm is `±1`.
    pub fn is_unit(&self) -> bool {
        self.norm().abs().is_one()
    }

    /// Exact sign of the real value `a + b√2`.
    pub fn signum(&self) -> Ordering {
        let za = self.a.cmp(&BigInt::zero());
        let zb = self.b.cmp(&BigInt::zero());
        match (za, zb) {
            (Ordering::Equal, _) => zb,
            (_, Ordering::Equal) => za,
            _ if za == zb => za,
            _ => {
                // Opposite signs, the larger of a² and 2b² decides.
                let a2 = &self.a * &self.a;
                let b2 = BigInt::from(2) * &self.b * &self.b;
                match a2.cmp(&b2) {
                    Ordering::Greater => za,
                    Ordering::Less => zb,
                    Ordering::Equal => Ordering::Equal,
                }
            }
        }
    }

    /// Whether the value is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.signum() == Ordering::Greater
    }

    /// Whether both `x` and `x•` are strictly positive.
    pub fn is_doubly_positive(&self) -> bool {
        self.is_positive() && self.conj_sqrt2().is_positive()
    }

    /// Whether `√2` divides this element.
    pub fn is_divisible_by_sqrt2(&self) -> bool {
        self.a.is_even()
    }

    /// Divide by `√2` if possible.
    pub fn div_sqrt2(&self) -> Option<Self> {
        if self.is_divisible_by_sqrt2() {
            Some(Self::new(self.b.clone(), &self.a / 2))
        } else {
            None
        }
    }

    /// Exact quotient `self / d`, or `None` if `d` does not divide `self`.
    pub fn div_exact(&self, d: &Self) -> Option<Self> {
        let n = d.norm();
        if n.is_zero() {
            return None;
        }
        let w = self * d.conj_sqrt2();
        if w.a.is_multiple_of(&n) && w.b.is_multiple_of(&n) {
            Some(Self::new(&w.a / &n, &w.b / &n))
        } else {
            None
        }
    }

    /// Whether `d` divides this element.
    pub fn is_divisible_by(&self, d: &Self) -> bool {
        self.div_exact(d).is_some()
    }

    /// Real value under the context's approximation of `√2`.
    pub fn to_real(&self, ctx: &NumericContext) -> Real {
        Real::from_integer(self.a.clone()) + Real::from_integer(self.b.clone()) * ctx.sqrt2()
    }
}

impl PartialOrd for ZSqrt2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZSqrt2 {
    fn cmp(&self, other: &Self) -> Ordering {
        (self - other).signum()
    }
}

impl<'a, 'b> Add<&'b ZSqrt2> for &'a ZSqrt2 {
    type Output = ZSqrt2;
    fn add(self, rhs: &'b ZSqrt2) -> ZSqrt2 {
        ZSqrt2::new(&self.a + &rhs.a, &self.b + &rhs.b)
    }
}

impl<'a, 'b> Sub<&'b ZSqrt2> for &'a ZSqrt2 {
    type Output = ZSqrt2;
    fn sub(self, rhs: &'b ZSqrt2) -> ZSqrt2 {
        ZSqrt2::new(&self.a - &rhs.a, &self.b - &rhs.b)
    }
}

impl<'a, 'b> Mul<&'b ZSqrt2> for &'a ZSqrt2 {
    type Output = ZSqrt2;
    fn mul(self, rhs: &'b ZSqrt2) -> ZSqrt2 {
        ZSqrt2::new(
            &self.a * &rhs.a + BigInt::from(2) * &self.b * &rhs.b,
            &self.a * &rhs.b + &self.b * &rhs.a,
        )
    }
}

forward_binop!(impl Add, add for ZSqrt2);
forward_binop!(impl Sub, sub for ZSqrt2);
forward_binop!(impl Mul, mul for ZSqrt2);

impl Neg for ZSqrt2 {
    type Output = ZSqrt2;
    fn neg(self) -> ZSqrt2 {
        ZSqrt2::new(-self.a, -self.b)
    }
}

impl<'a> Neg for &'a ZSqrt2 {
    type Output = ZSqrt2;
    fn neg(self) -> ZSqrt2 {
        ZSqrt2::new(-&self.a, -&self.b)
    }
}

impl Zero for ZSqrt2 {
    fn zero() -> Self {
        Self::new(0, 0)
    }

    fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }
}

impl One for ZSqrt2 {
    fn one() -> Self {
        Self::new(1, 0)
    }
}

impl EuclideanDomain for ZSqrt2 {
    fn euclid_norm(&self) -> BigInt {
        self.norm().abs()
    }

    fn div_rem_round(&self, other: &Self) -> (Self, Self) {
        let n = other.norm();
        let w = self * other.conj_sqrt2();
        let q = Self::new(div_round(&w.a, &n), div_round(&w.b, &n));
        let r = self - &q * other;
        (q, r)
    }
}

impl fmt::Display for ZSqrt2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.b.is_negative() {
            write!(f, "{}-{}√2", self.a, -&self.b)
        } else {
            write!(f, "{}+{}√2", self.a, self.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_and_norm() {
        let x = ZSqrt2::new(3, 2);
        let y = ZSqrt2::new(-1, 5);
        assert_eq!(&x * &y, ZSqrt2::new(17, 13));
        assert_eq!((&x * &y).norm(), x.norm() * y.norm());
        assert_eq!(&x * x.conj_sqrt2(), ZSqrt2::from_int(x.norm()));
    }

    #[test]
    fn exact_sign() {
        assert!(ZSqrt2::new(-1, 1).is_positive());
        assert!(!ZSqrt2::new(1, -1).is_positive());
        assert!(ZSqrt2::new(3, -2).is_positive());
        assert!(!ZSqrt2::new(-3, 2).is_positive());
        assert_eq!(ZSqrt2::zero().signum(), Ordering::Equal);
        assert!(ZSqrt2::new(-1, 1) < ZSqrt2::new(1, 0));
        assert!(ZSqrt2::new(0, 1) > ZSqrt2::new(1, 0));
    }

    #[test]
    fn lambda_powers() {
        assert_eq!(ZSqrt2::lambda_pow(2), ZSqrt2::new(3, 2));
        assert_eq!(ZSqrt2::lambda_pow(-2), ZSqrt2::new(3, -2));
        assert_eq!(ZSqrt2::lambda_pow(5) * ZSqrt2::lambda_pow(-5), ZSqrt2::one());
        assert!(ZSqrt2::lambda_pow(2).is_doubly_positive());
        assert!(!ZSqrt2::lambda().is_doubly_positive());
    }

    #[test]
    fn divisions() {
        let x = ZSqrt2::new(4, 3);
        assert_eq!(x.div_sqrt2(), Some(ZSqrt2::new(3, 2)));
        assert_eq!(ZSqrt2::new(3, 3).div_sqrt2(), None);
        let d = ZSqrt2::new(3, 1);
        assert_eq!((&x * &d).div_exact(&d), Some(x.clone()));
        assert_eq!(ZSqrt2::new(1, 0).div_exact(&ZSqrt2::from_int(2)), None);
        assert!(ZSqrt2::from_int(7).is_divisible_by(&ZSqrt2::new(3, 1)));
    }

    #[test]
    fn euclidean_remainder_is_smaller() {
        let a = ZSqrt2::new(101, -37);
        let b = ZSqrt2::new(7, 3);
        let (q, r) = a.div_rem_round(&b);
        assert_eq!(&q * &b + &r, a);
        assert!(r.euclid_norm() < b.euclid_norm());
    }

    #[test]
    fn formatting() {
        assert_eq!(ZSqrt2::new(1, -2).to_string(), "1-2√2");
        assert_eq!(ZSqrt2::new(0, 3).to_string(), "0+3√2");
    }
}
