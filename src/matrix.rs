use crate::numeric::NumericContext;
use crate::rings::{ZOmega, ZSqrt2};
use num::bigint::BigInt;
use num::{Complex, One, Zero};
use std::fmt;

/// An exact unitary
/// `1/√2^k [[u, -t̄ ω^l], [t, ū ω^l]]`
/// with `u, t ∈ Z[ω]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitaryMatrix {
    /// Top left entry before scaling.
    pub u: ZOmega,
    /// Bottom left entry before scaling.
    pub t: ZOmega,
    /// Denominator exponent.
    pub k: u32,
    /// Phase exponent of the second column, taken mod 8.
    pub l: u8,
}

impl UnitaryMatrix {
    /// Make the matrix with phase exponent zero.
    pub fn new(u: ZOmega, t: ZOmega, k: u32) -> Self {
        Self { u, t, k, l: 0 }
    }

    /// Set the phase exponent.
    pub fn with_phase(mut self, l: u8) -> Self {
        self.l = l % 8;
        self
    }

    /// The record standing for "no solution".
    pub fn empty() -> Self {
        Self::new(ZOmega::zero(), ZOmega::zero(), 0)
    }

    /// Whether this is the empty record.
    pub fn is_empty(&self) -> bool {
        self.u.is_zero() && self.t.is_zero() && self.k == 0
    }

    /// Whether `u·ū + t·t̄ = 2^k` holds exactly.
    pub fn is_unitary(&self) -> bool {
        let total = self.u.norm_sqr() + self.t.norm_sqr();
        total == ZSqrt2::from_int(BigInt::one() << self.k as usize)
    }

    /// Divide both entries by `√2` while possible.
    pub fn reduced(&self) -> Self {
        let mut m = self.clone();
        while m.k > 0 {
            match (m.u.reduce(), m.t.reduce()) {
                (Some(u), Some(t)) => {
                    m.u = u;
                    m.t = t;
                    m.k -= 1;
                }
                _ => break,
            }
        }
        m
    }

    /// The four entries, row major, as complex floats.
    pub fn entries(&self, ctx: &NumericContext) -> [Complex<f64>; 4] {
        let scale = 2f64.powf(-(self.k as f64) / 2.0);
        let phase = Complex::from_polar(1.0, std::f64::consts::FRAC_PI_4 * f64::from(self.l));
        let u = self.u.to_complex(ctx) * scale;
        let t = self.t.to_complex(ctx) * scale;
        [u, -t.conj() * phase, t, u.conj() * phase]
    }
}

impl fmt::Display for UnitaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "1/√2^{} [[{}, -({})*ω^{}], [{}, ({})*ω^{}]]",
            self.k,
            self.u,
            self.t.conj(),
            self.l,
            self.t,
            self.u.conj(),
            self.l
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_unitary() {
        let m = UnitaryMatrix::new(ZOmega::one(), ZOmega::zero(), 0);
        assert!(m.is_unitary());
        assert!(!m.is_empty());
        assert!(UnitaryMatrix::empty().is_empty());
        assert!(!UnitaryMatrix::empty().is_unitary());
    }

    #[test]
    fn hadamard_like_matrix() {
        // 1/√2 [[1, -1], [1, 1]]
        let m = UnitaryMatrix::new(ZOmega::one(), ZOmega::one(), 1);
        assert!(m.is_unitary());
        let ctx = NumericContext::new(2).unwrap();
        let e = m.entries(&ctx);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((e[0].re - h).abs() < 1e-12);
        assert!((e[1].re + h).abs() < 1e-12);
        assert!((e[3].re - h).abs() < 1e-12);
    }

    #[test]
    fn reduction_keeps_unitarity() {
        let two = ZOmega::from_int(2);
        let m = UnitaryMatrix::new(two.clone(), two * ZOmega::omega(), 3);
        assert!(m.is_unitary());
        let r = m.reduced();
        assert_eq!(r.k, 1);
        assert!(r.is_unitary());
    }

    #[test]
    fn phase_wraps() {
        let m = UnitaryMatrix::empty().with_phase(11);
        assert_eq!(m.l, 3);
    }
}
