//! Integer number theory for the norm equation: primality, factoring and square roots modulo a
//! prime.

use num::bigint::BigInt;
use num::integer::Integer;
use num::{One, Signed, ToPrimitive, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
const TRIAL_LIMIT: u32 = 1 << 12;
const RHO_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Miller-Rabin with the first twelve primes as bases, exact below `3.3·10²⁴`.
pub fn is_probable_prime(n: &BigInt) -> bool {
    if *n < BigInt::from(2) {
        return false;
    }
    for p in SMALL_PRIMES.iter() {
        let p = BigInt::from(*p);
        if *n == p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }
    let n_minus_one = n - BigInt::one();
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }
    'bases: for p in SMALL_PRIMES.iter() {
        let mut x = BigInt::from(*p).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x).mod_floor(n);
            if x == n_minus_one {
                continue 'bases;
            }
        }
        return false;
    }
    true
}

/// Find a nontrivial factor of the odd composite `n` with Brent's variant of Pollard's rho.
///
/// Gives up after roughly `effort` multiplications.
fn pollard_brent(n: &BigInt, rng: &mut StdRng, effort: u64) -> Option<BigInt> {
    let m = 128u64;
    let mut spent = 0u64;
    while spent < effort {
        let c = BigInt::from(rng.gen::<u64>()).mod_floor(n);
        let mut y = BigInt::from(rng.gen::<u64>()).mod_floor(n);
        let f = |v: &BigInt| (v * v + &c).mod_floor(n);
        let mut g = BigInt::one();
        let mut r = 1u64;
        let mut q = BigInt::one();
        let mut x = y.clone();
        let mut ys = y.clone();
        while g.is_one() && spent < effort {
            x = y.clone();
            for _ in 0..r {
                y = f(&y);
            }
            let mut k = 0u64;
            while k < r && g.is_one() {
                ys = y.clone();
                for _ in 0..m.min(r - k) {
                    y = f(&y);
                    q = (q * (&x - &y).abs()).mod_floor(n);
                }
                g = q.gcd(n);
                k += m;
            }
            spent += r;
            r *= 2;
        }
        if g == *n {
            // Overshot, back up one step at a time.
            loop {
                ys = f(&ys);
                g = (&x - &ys).abs().gcd(n);
                if !g.is_one() {
                    break;
                }
            }
        }
        if !g.is_one() && g != *n {
            return Some(g);
        }
    }
    None
}

/// Prime factorization of a positive integer as `(prime, multiplicity)` pairs in increasing
/// order, `None` if `n` is not positive or factoring exceeds `effort`.
pub fn factorize(n: &BigInt, effort: u64) -> Option<Vec<(BigInt, u32)>> {
    if !n.is_positive() {
        return None;
    }
    let mut primes: Vec<BigInt> = vec![];
    let mut rest = n.clone();
    for p in 2..TRIAL_LIMIT {
        let bp = BigInt::from(p);
        if &bp * &bp > rest {
            break;
        }
        while rest.is_multiple_of(&bp) {
            rest /= &bp;
            primes.push(bp.clone());
        }
    }

    let mut rng = StdRng::seed_from_u64(RHO_SEED);
    let mut stack = vec![];
    if !rest.is_one() {
        stack.push(rest);
    }
    while let Some(m) = stack.pop() {
        if is_probable_prime(&m) {
            primes.push(m);
            continue;
        }
        let f = pollard_brent(&m, &mut rng, effort)?;
        stack.push(&m / &f);
        stack.push(f);
    }

    primes.sort();
    let mut out: Vec<(BigInt, u32)> = vec![];
    for p in primes {
        if let Some(last) = out.last_mut() {
            if last.0 == p {
                last.1 += 1;
                continue;
            }
        }
        out.push((p, 1));
    }
    Some(out)
}

/// A square root of `a` modulo the odd prime `p` by Tonelli-Shanks, `None` for non-residues.
pub fn sqrt_mod(a: &BigInt, p: &BigInt) -> Option<BigInt> {
    let a = a.mod_floor(p);
    if a.is_zero() {
        return Some(a);
    }
    let p_minus_one = p - BigInt::one();
    let half = &p_minus_one >> 1u32;
    if a.modpow(&half, p) != BigInt::one() {
        return None;
    }
    let mut q = p_minus_one.clone();
    let mut s = 0u32;
    while q.is_even() {
        q >>= 1u32;
        s += 1;
    }
    let mut z = BigInt::from(2);
    while z.modpow(&half, p) != p_minus_one {
        z += BigInt::one();
    }
    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + BigInt::one()) >> 1u32), p);
    while !t.is_one() {
        let mut i = 0u32;
        let mut t2 = t.clone();
        while !t2.is_one() {
            t2 = (&t2 * &t2).mod_floor(p);
            i += 1;
            if i == m {
                return None;
            }
        }
        let mut b = c.clone();
        for _ in 0..(m - i - 1) {
            b = (&b * &b).mod_floor(p);
        }
        m = i;
        c = (&b * &b).mod_floor(p);
        t = (t * &c).mod_floor(p);
        r = (r * &b).mod_floor(p);
    }
    Some(r)
}

/// `n mod 8` for a positive `n`.
pub fn residue_mod8(n: &BigInt) -> u32 {
    n.mod_floor(&BigInt::from(8)).to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primality() {
        let primes = [2u64, 3, 5, 97, 7919, 1_000_000_007, 2_305_843_009_213_693_951];
        for p in primes {
            assert!(is_probable_prime(&BigInt::from(p)), "{}", p);
        }
        let composites = [0u64, 1, 4, 91, 561, 1_000_000_007 * 3, 3_215_031_751];
        for c in composites {
            assert!(!is_probable_prime(&BigInt::from(c)), "{}", c);
        }
    }

    #[test]
    fn factorization_recovers_product() {
        let cases: [u64; 5] = [
            1,
            2 * 2 * 3 * 7,
            1_000_003 * 1_000_033,
            4093 * 4093 * 8191,
            (1 << 20) * 65_537,
        ];
        for n in cases {
            let n = BigInt::from(n);
            let f = factorize(&n, 1 << 20).unwrap();
            let mut prod = BigInt::one();
            for (p, e) in &f {
                assert!(is_probable_prime(p));
                prod *= p.pow(*e);
            }
            assert_eq!(prod, n);
            assert!(f.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn factorization_of_large_semiprime() {
        let p = BigInt::from(2_147_483_647u64);
        let q = BigInt::from(1_000_000_007u64);
        let f = factorize(&(&p * &q), 1 << 22).unwrap();
        assert_eq!(f, vec![(q, 1), (p, 1)]);
    }

    #[test]
    fn factorization_rejects_nonpositive() {
        assert!(factorize(&BigInt::zero(), 10).is_none());
        assert!(factorize(&BigInt::from(-6), 10).is_none());
    }

    #[test]
    fn modular_square_roots() {
        for (a, p) in [(-1i64, 13i64), (2, 7), (-2, 11), (2, 17), (-1, 1_000_000_009), (10, 13)] {
            let p = BigInt::from(p);
            let a = BigInt::from(a);
            let r = sqrt_mod(&a, &p).unwrap();
            assert_eq!((&r * &r - &a).mod_floor(&p), BigInt::zero());
        }
        assert!(sqrt_mod(&BigInt::from(-1), &BigInt::from(7)).is_none());
        assert!(sqrt_mod(&BigInt::from(2), &BigInt::from(5)).is_none());
    }

    #[test]
    fn square_roots_for_every_residue() {
        // 257 and 65537 have p - 1 = 2^s, the longest Tonelli-Shanks chains.
        for p in [3i64, 5, 7, 41, 73, 257, 65_537] {
            let p = BigInt::from(p);
            let mut residues = 0;
            for a in 1..60i64 {
                let a = BigInt::from(a);
                if let Some(r) = sqrt_mod(&a, &p) {
                    assert_eq!((&r * &r - &a).mod_floor(&p), BigInt::zero(), "{} mod {}", a, p);
                    residues += 1;
                } else {
                    let half = (&p - BigInt::one()) >> 1u32;
                    assert_ne!(a.modpow(&half, &p), BigInt::one(), "{} mod {}", a, p);
                }
            }
            assert!(residues > 0);
        }
    }

    #[test]
    fn residues() {
        assert_eq!(residue_mod8(&BigInt::from(17)), 1);
        assert_eq!(residue_mod8(&BigInt::from(23)), 7);
    }
}
