//! Exact arithmetic in `Z[√2]` and `Z[ω]`, `ω = e^{iπ/4}`.
//!
//! Both rings are Euclidean, the division rounds every coefficient of the exact quotient to the
//! nearest integer.

use num::bigint::BigInt;
use num::integer::Integer;
use num::{Signed, Zero};

/// Implements the owned and mixed reference forms of a binary operator in terms of the
/// `&T op &T` implementation.
macro_rules! forward_binop {
    (impl $imp:ident, $method:ident for $t:ty) => {
        impl std::ops::$imp<$t> for $t {
            type Output = $t;
            fn $method(self, rhs: $t) -> $t {
                std::ops::$imp::$method(&self, &rhs)
            }
        }

        impl<'a> std::ops::$imp<&'a $t> for $t {
            type Output = $t;
            fn $method(self, rhs: &'a $t) -> $t {
                std::ops::$imp::$method(&self, rhs)
            }
        }

        impl<'a> std::ops::$imp<$t> for &'a $t {
            type Output = $t;
            fn $method(self, rhs: $t) -> $t {
                std::ops::$imp::$method(self, &rhs)
            }
        }
    };
}
pub(crate) use forward_binop;

mod zomega;
mod zsqrt2;

pub use self::zomega::ZOmega;
pub use self::zsqrt2::ZSqrt2;

/// A ring with a division that leaves a remainder of strictly smaller norm.
pub trait EuclideanDomain: Sized + Clone + Zero {
    /// Absolute value of the integral norm.
    fn euclid_norm(&self) -> BigInt;
    /// Returns `(q, r)` with `self = q*other + r`. `other` must be nonzero.
    fn div_rem_round(&self, other: &Self) -> (Self, Self);
}

/// Greatest common divisor up to a unit.
///
/// Returns `None` if some division step fails to decrease the norm, which cannot happen for the
/// rings in this module but guards against malformed inputs.
pub fn euclid_gcd<T: EuclideanDomain>(a: &T, b: &T) -> Option<T> {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let (_, r) = a.div_rem_round(&b);
        if r.euclid_norm() >= b.euclid_norm() {
            return None;
        }
        a = b;
        b = r;
    }
    Some(a)
}

/// `x / n` rounded to the nearest integer, ties toward positive infinity.
pub(crate) fn div_round(x: &BigInt, n: &BigInt) -> BigInt {
    let (x, n) = if n.is_negative() {
        (-x, -n)
    } else {
        (x.clone(), n.clone())
    };
    let two = BigInt::from(2);
    (x * &two + &n).div_floor(&(n * &two))
}
