//! The reversed Dickson polynomials D_n(1, x) over a prime field and the
//! sets of values they take.
//!
//! The polynomials are defined by the recurrence
//! `D_0 = 2`, `D_1 = 1`, `D_n = D_{n-1} - x * D_{n-2}`.
//! Nothing here expands the polynomials unless asked to by [`dickson_poly`],
//! the values are computed by running the recurrence for each residue.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::poly::Poly;
use crate::rings::{Fp, Ring};

/// The set of values of D_n(1, x) as x ranges over F_p.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueSet {
    p: u64,
    n: u64,
    values: BTreeSet<u64>,
}

impl ValueSet {
    fn collect(n: u64, r: &Fp, values: impl IntoIterator<Item = u64>) -> Self {
        Self { p: r.modulus(), n, values: values.into_iter().collect() }
    }

    /// The prime.
    pub fn p(&self) -> u64 {
        self.p
    }

    /// The index of the polynomial.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// The distinct values.
    pub fn values(&self) -> &BTreeSet<u64> {
        &self.values
    }

    /// The number of distinct values. This is always in `1..=p`.
    pub fn cardinality(&self) -> usize {
        self.values.len()
    }

    /// Does D_n(1, x) permute F_p?
    pub fn is_permutation(&self) -> bool {
        self.cardinality() as u64 == self.p
    }
}

/// One step of the recurrence: `curr - x * prev`.
fn step(prev: u64, curr: u64, x: u64, r: &Fp) -> u64 {
    r.mul_sub(curr, &x, &prev)
}

/// Evaluates D_n(1, x) mod p.
///
/// `x` may be any integer, it is reduced mod p first.
pub fn eval(n: u64, x: u64, r: &Fp) -> u64 {
    let x = x % r.modulus();
    let mut prev = r.element_from_usize(2);
    if n == 0 {
        return prev;
    }

    let mut curr = Fp::one();
    for _ in 1..n {
        let next = step(prev, curr, x, r);
        prev = curr;
        curr = next;
    }

    curr
}

/// Computes the value set of D_n(1, x) over the field `r`.
pub fn value_set(n: u64, r: &Fp) -> ValueSet {
    ValueSet::collect(n, r, r.elements().map(|x| eval(n, x, r)))
}

/// Computes the value set of D_n(1, x) over F_p.
///
/// ```
/// use dickson::compute_value_set;
///
/// // n = p^2 - 1
/// let vs = compute_value_set(24, 5).unwrap();
/// assert_eq!(vs.values().iter().copied().collect::<Vec<_>>(), [1, 2]);
/// assert!(!vs.is_permutation());
///
/// assert!(compute_value_set(24, 6).is_err());
/// ```
pub fn compute_value_set(n: u64, p: u64) -> Result<ValueSet> {
    Ok(value_set(n, &Fp::new(p)?))
}

/// Iterates over the value sets for `n = 0, 1, 2, ...`.
///
/// Instead of restarting the recurrence for every index like [`value_set`]
/// does, this keeps the last two terms for every residue, so each step
/// costs `O(p)`. The iterator never ends.
pub struct Sweep<'a> {
    r: &'a Fp,
    n: u64,
    /// D_{n-1}(1, x) for all x, or D_0 before the first step.
    prev: Vec<u64>,
    /// D_n(1, x) for all x, or D_1 before the first step.
    curr: Vec<u64>,
}

impl<'a> Sweep<'a> {
    pub fn new(r: &'a Fp) -> Self {
        let p = r.modulus() as usize;
        Self {
            r,
            n: 0,
            prev: vec![r.element_from_usize(2); p],
            curr: vec![Fp::one(); p],
        }
    }
}

impl Iterator for Sweep<'_> {
    type Item = ValueSet;

    fn next(&mut self) -> Option<ValueSet> {
        let n = self.n;
        self.n += 1;

        let terms = match n {
            0 => &self.prev,
            1 => &self.curr,
            _ => {
                let r = self.r;
                for ((prev, curr), x) in self.prev.iter_mut()
                    .zip(self.curr.iter_mut())
                    .zip(r.elements())
                {
                    let next = step(*prev, *curr, x, r);
                    *prev = *curr;
                    *curr = next;
                }
                &self.curr
            },
        };

        Some(ValueSet::collect(n, self.r, terms.iter().copied()))
    }
}

/// Computes the polynomial D_n(1, x) in F_p[x] itself.
pub fn dickson_poly(n: u64, r: &Fp) -> Poly<Fp> {
    let mut prev = Poly::constant(r.element_from_usize(2));
    if n == 0 {
        return prev;
    }

    let mut curr = Poly::constant(Fp::one());
    for _ in 1..n {
        prev.mul_var();
        let next = curr.sub(&prev, r);
        prev = curr;
        curr = next;
    }

    curr
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::primes::odd_primes;

    fn values(n: u64, p: u64) -> Vec<u64> {
        compute_value_set(n, p).unwrap().values().iter().copied().collect()
    }

    #[test]
    fn initial_terms() {
        for p in [2, 3, 5, 7, 97] {
            assert_eq!(values(0, p), [2 % p]);
            assert_eq!(values(1, p), [1]);
        }
        assert_eq!(compute_value_set(0, 5).unwrap().cardinality(), 1);
    }

    #[test]
    fn small_indices() {
        // D_2 = 1 - 2x, a bijection for odd p.
        let vs = compute_value_set(2, 7).unwrap();
        assert!(vs.is_permutation());
        // D_3 = 1 - 3x, constant mod 3.
        assert_eq!(values(3, 3), [1]);
        // D_4 = 1 - 4x + 2x^2
        let r = Fp::new(11).unwrap();
        for x in r.elements() {
            let expected = r.element_from_i64(1 - 4 * x as i64 + 2 * (x * x) as i64);
            assert_eq!(eval(4, x, &r), expected);
        }
    }

    #[test]
    fn p_equals_five() {
        assert_eq!(values(24, 5), [1, 2]);
        assert_eq!(values(13, 5), [1, 4]);
        assert_eq!(values(17, 5), [1, 4]);
        // Not (p^2 + 2p - 1)/2, despite being close to it.
        assert_eq!(values(14, 5), [0, 1, 3, 4]);
    }

    #[test]
    fn cardinality_in_range() {
        for p in odd_primes(5..=97) {
            let r = Fp::new(p).unwrap();
            for vs in Sweep::new(&r).take((p * p) as usize) {
                assert!((1..=p as usize).contains(&vs.cardinality()));
                assert_eq!(vs.is_permutation(), vs.cardinality() as u64 == p);
                assert!(vs.values().iter().all(|&v| v < p));
            }
        }
    }

    #[test]
    fn sweep_matches_value_set() {
        for p in [2, 3, 5, 13] {
            let r = Fp::new(p).unwrap();
            for (n, vs) in Sweep::new(&r).take(2 * (p * p) as usize).enumerate() {
                assert_eq!(vs.n(), n as u64);
                assert_eq!(vs, value_set(n as u64, &r), "p = {p}, n = {n}");
            }
        }
    }

    #[test]
    fn idempotent() {
        let rng = &mut StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let n = rng.random_range(0..2000);
            assert_eq!(compute_value_set(n, 31).unwrap(), compute_value_set(n, 31).unwrap());
        }
    }

    #[test]
    fn polynomial_agrees_with_recurrence() {
        let rng = &mut StdRng::seed_from_u64(0);
        for p in [2, 3, 7, 19] {
            let r = Fp::new(p).unwrap();
            for _ in 0..20 {
                let n = rng.random_range(0..60);
                let poly = dickson_poly(n, &r);
                assert!(poly.degree() <= (n / 2) as usize);
                for x in r.elements() {
                    assert_eq!(poly.eval(&x, &r), eval(n, x, &r), "D_{n}({x}) mod {p}");
                }
            }
        }
    }

    #[test]
    fn eval_reduces_x() {
        let r = Fp::new(7).unwrap();
        assert_eq!(eval(9, 3, &r), eval(9, 10, &r));
    }
}
