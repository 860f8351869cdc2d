use num_integer::Integer as _;

use super::*;
use crate::error::{Error, Result};
use crate::primes::is_prime;

/// The prime field F_p. Elements are the residues `0..p` stored as `u64`.
///
/// The modulus is limited to 32 bits, so the product of two residues always
/// fits in a `u64` before it is reduced.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fp {
    p: u64,
}

impl Fp {
    /// Create the field with `p` elements.
    /// Fails if `p` is not a prime or does not fit in 32 bits.
    pub fn new(p: u64) -> Result<Self> {
        if p > u32::MAX as u64 {
            return Err(Error::ModulusTooLarge(p));
        }
        if !is_prime(p) {
            return Err(Error::NotPrime(p));
        }
        Ok(Self { p })
    }

    /// Returns the modulus.
    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// Iterates over all elements of the field in increasing order.
    pub fn elements(&self) -> std::ops::Range<u64> {
        0..self.p
    }

    /// Reduces an arbitrary integer to its residue in `0..p`.
    /// Negative integers are mapped with floor semantics, so `-1` becomes
    /// `p - 1`.
    pub fn element_from_i64(&self, n: i64) -> u64 {
        n.mod_floor(&(self.p as i64)) as u64
    }

    /// The multiplicative inverse of a non-zero element.
    pub fn inverse(&self, e: &u64) -> Option<u64> {
        if *e == 0 {
            return None;
        }
        let ExtendedGcd { x, .. } = (*e as i64).extended_gcd(&(self.p as i64));
        Some(self.element_from_i64(x))
    }
}

impl Ring for Fp {
    type Element = u64;

    fn neg_assign(&self, e: &mut Self::Element) {
        if *e != 0 {
            *e = self.p - *e;
        }
    }

    fn add_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        *l += r;
        if *l >= self.p {
            *l -= self.p;
        }
    }

    fn sub_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        if *r > *l {
            *l += self.p;
        }
        *l -= r;
    }

    fn mul_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        *l = *l * r % self.p;
    }

    fn element_from_usize(&self, n: usize) -> Self::Element {
        n as u64 % self.p
    }
}

impl Field for Fp {
    fn div_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        let inv = self.inverse(r).expect("division by zero in a prime field");
        self.mul_assign(l, &inv);
    }
}

impl std::fmt::Debug for Fp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fp({})", self.p)
    }
}

#[cfg(test)]
mod test_prime_field {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn rejects_non_primes() {
        assert!(matches!(Fp::new(0), Err(Error::NotPrime(0))));
        assert!(matches!(Fp::new(1), Err(Error::NotPrime(1))));
        assert!(matches!(Fp::new(9), Err(Error::NotPrime(9))));
        assert!(matches!(
            Fp::new(1 << 33),
            Err(Error::ModulusTooLarge(_))
        ));
        assert_eq!(Fp::new(97).unwrap().modulus(), 97);
    }

    #[test]
    fn subtraction_stays_non_negative() {
        let r = Fp::new(7).unwrap();
        assert_eq!(r.sub(2, &5), 4);
        assert_eq!(r.sub(0, &6), 1);
        assert_eq!(r.mul_sub(1, &3, &2), 2);
        assert_eq!(r.element_from_i64(-1), 6);
        assert_eq!(r.element_from_i64(-15), 6);
        assert_eq!(r.neg(0), 0);
    }

    #[test]
    fn test_inverse_mod_p() {
        let rng = &mut StdRng::seed_from_u64(0);
        for p in [2, 3, 5, 13, 97, 65521] {
            let r = Fp::new(p).unwrap();
            assert_eq!(r.inverse(&0), None);
            for _ in 0..100 {
                let e = rng.random_range(1..p);
                let inv = r.inverse(&e).unwrap();
                assert_eq!(r.mul(e, &inv), 1, "{e} * {inv} != 1 mod {p}");
            }
        }
    }

    #[test]
    fn arithmetic_matches_integers() {
        let rng = &mut StdRng::seed_from_u64(0);
        let p = 4294967291;
        let r = Fp::new(p).unwrap();
        for _ in 0..1000 {
            let a = rng.random_range(0..p);
            let b = rng.random_range(0..p);
            assert_eq!(r.add(a, &b) as u128, (a as u128 + b as u128) % p as u128);
            assert_eq!(r.mul(a, &b) as u128, (a as u128 * b as u128) % p as u128);
            assert_eq!(r.add(r.sub(a, &b), &b), a);
        }
    }
}
