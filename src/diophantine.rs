//! The norm equation `t·t̄ = ξ` for `ξ ∈ Z[√2]` and `t ∈ Z[ω]`.
//!
//! A solution exists iff `ξ` is zero or doubly positive and every prime of `Z[√2]` dividing `ξ`
//! that stays prime in `Z[ω]` does so with even multiplicity. The solver factors the integer
//! `ξ·ξ•`, lifts each rational prime to a prime of `Z[ω]` and assembles `t` from those. Failure
//! to factor within the effort bound is reported the same way as a missing solution.

use crate::arith::{factorize, residue_mod8, sqrt_mod};
use crate::rings::{euclid_gcd, ZOmega, ZSqrt2};
use num::bigint::BigInt;
use num::{One, Signed, Zero};

/// Default bound on the work spent splitting a composite.
pub const FACTOR_EFFORT: u64 = 1 << 16;

/// Find `t` with `t·t̄ = ξ` exactly, or `None`.
pub fn solve_norm_equation(xi: &ZSqrt2) -> Option<ZOmega> {
    solve_norm_equation_with_effort(xi, FACTOR_EFFORT)
}

/// As [`solve_norm_equation`] with an explicit factoring effort.
pub fn solve_norm_equation_with_effort(xi: &ZSqrt2, effort: u64) -> Option<ZOmega> {
    if xi.is_zero() {
        return Some(ZOmega::zero());
    }
    if !xi.is_doubly_positive() {
        return None;
    }
    let factors = factorize(&xi.norm(), effort)?;
    let mut rem = xi.clone();
    let mut t = ZOmega::one();
    for (p, _) in &factors {
        match residue_mod8(p) {
            2 => split_two(&mut rem, &mut t),
            3 | 5 => split_inert(p, &mut rem, &mut t)?,
            1 => split_one(p, &mut rem, &mut t)?,
            7 => split_seven(p, &mut rem, &mut t)?,
            _ => return None,
        }
    }

    // What is left is a doubly positive unit λ^{2m}, absorb λ^m into t.
    if !rem.is_unit() || !rem.is_doubly_positive() {
        return None;
    }
    let lambda = ZOmega::from_zsqrt2(&ZSqrt2::lambda());
    let lambda_inv = ZOmega::from_zsqrt2(&ZSqrt2::lambda_inv());
    while !rem.is_one() {
        if rem.b.is_positive() {
            rem = rem * ZSqrt2::lambda_pow(-2);
            t = t * &lambda;
        } else {
            rem = rem * ZSqrt2::lambda_pow(2);
            t = t * &lambda_inv;
        }
    }

    if t.norm_sqr() == *xi {
        Some(t)
    } else {
        None
    }
}

/// `2 = δ·δ̄` up to a unit, with `δ = 1 + ω`.
fn split_two(rem: &mut ZSqrt2, t: &mut ZOmega) {
    let delta_norm = ZSqrt2::new(2, 1);
    while rem.is_divisible_by_sqrt2() {
        match rem.div_exact(&delta_norm) {
            Some(r) => *rem = r,
            None => break,
        }
        *t = &*t * ZOmega::delta();
    }
}

/// Remove `s·s̄` from `rem` while `d` divides it, multiplying `s` into `t`.
fn take_factor(d: &ZSqrt2, s: &ZOmega, rem: &mut ZSqrt2, t: &mut ZOmega) -> Option<()> {
    let ss = s.norm_sqr();
    while rem.is_divisible_by(d) {
        *rem = rem.div_exact(&ss)?;
        *t = &*t * s;
    }
    Some(())
}

/// Primes `p ≡ 3, 5 (mod 8)` stay prime in `Z[√2]` and split in `Z[ω]`.
fn split_inert(p: &BigInt, rem: &mut ZSqrt2, t: &mut ZOmega) -> Option<()> {
    let generator = if residue_mod8(p) == 3 {
        // x + i√2 with x² = -2
        let x = sqrt_mod(&BigInt::from(-2), p)?;
        ZOmega::new(x, 1, 0, 1)
    } else {
        // x + i with x² = -1
        let x = sqrt_mod(&BigInt::from(-1), p)?;
        ZOmega::new(x, 0, 1, 0)
    };
    let s = euclid_gcd(&ZOmega::from_int(p.clone()), &generator)?;
    if s.norm() != p * p {
        return None;
    }
    take_factor(&ZSqrt2::from_int(p.clone()), &s, rem, t)
}

/// A prime of `Z[√2]` above `p` for `p ≡ ±1 (mod 8)`.
fn split_prime(p: &BigInt) -> Option<ZSqrt2> {
    let x = sqrt_mod(&BigInt::from(2), p)?;
    let eta = euclid_gcd(&ZSqrt2::from_int(p.clone()), &ZSqrt2::new(x, 1))?;
    if eta.norm().abs() == *p {
        Some(eta)
    } else {
        None
    }
}

/// Primes `p ≡ 1 (mod 8)` split completely, each factor `η` of `p` is `s·s̄` up to a unit.
fn split_one(p: &BigInt, rem: &mut ZSqrt2, t: &mut ZOmega) -> Option<()> {
    let eta = split_prime(p)?;
    let h = sqrt_mod(&BigInt::from(-1), p)?;
    let h_plus_i = ZOmega::new(h, 0, 1, 0);
    for e in [eta.conj_sqrt2(), eta] {
        let s = euclid_gcd(&ZOmega::from_zsqrt2(&e), &h_plus_i)?;
        if s.norm_sqr().norm().abs() != *p {
            return None;
        }
        take_factor(&e, &s, rem, t)?;
    }
    Some(())
}

/// Primes `p ≡ 7 (mod 8)` split in `Z[√2]` but each factor stays prime in `Z[ω]`, so it must
/// appear squared.
fn split_seven(p: &BigInt, rem: &mut ZSqrt2, t: &mut ZOmega) -> Option<()> {
    let eta = split_prime(p)?;
    for e in [eta.conj_sqrt2(), eta] {
        let e2 = &e * &e;
        let lift = ZOmega::from_zsqrt2(&e);
        while let Some(r) = rem.div_exact(&e2) {
            *rem = r;
            *t = &*t * &lift;
        }
        if rem.is_divisible_by(&e) {
            return None;
        }
    }
    Some(())
}
