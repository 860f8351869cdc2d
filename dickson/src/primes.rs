//! Small primes.
//!
//! Everything here works by trial division, which is plenty for the primes
//! the value tables are built for.

use num_integer::{Integer as _, Roots as _};

/// Is `n` a prime?
///
/// ```
/// use dickson::primes::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(97));
/// assert!(!is_prime(1));
/// assert!(!is_prime(91));
/// ```
pub fn is_prime(n: u64) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n.is_even() {
        return false;
    }
    (3..=n.sqrt()).step_by(2).all(|d| n % d != 0)
}

/// The odd primes in the given range, in increasing order.
pub fn odd_primes(range: std::ops::RangeInclusive<u64>) -> Vec<u64> {
    range.filter(|&p| p != 2 && is_prime(p)).collect()
}

/// Is `p` the smaller prime of a twin prime pair, i.e. is `p + 2` a prime as
/// well?
pub fn is_twin_prime(p: u64) -> bool {
    is_prime(p) && is_prime(p + 2)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn odd_primes_up_to_97() {
        let primes = odd_primes(0..=97);
        assert_eq!(primes.len(), 24);
        assert_eq!(primes.first(), Some(&3));
        assert_eq!(primes.last(), Some(&97));
        assert!(primes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(odd_primes(24..=28), Vec::<u64>::new());
    }

    #[test]
    fn primality_agrees_with_sieve() {
        let mut sieve = vec![true; 10_000];
        sieve[0] = false;
        sieve[1] = false;
        for i in 2..100 {
            if sieve[i] {
                for j in (i * i..10_000).step_by(i) {
                    sieve[j] = false;
                }
            }
        }
        for (n, &prime) in sieve.iter().enumerate() {
            assert_eq!(is_prime(n as u64), prime, "is_prime({n})");
        }
    }

    #[test]
    fn twin_primes() {
        let twins: Vec<_> = (0..=73).filter(|&p| is_twin_prime(p)).collect();
        assert_eq!(twins, [3, 5, 11, 17, 29, 41, 59, 71]);
        assert!(!is_twin_prime(7));
        assert!(!is_twin_prime(9));
    }
}
