//! Fitting polynomials n(p) to observed indices.
//!
//! Everything is computed over [`Q`], so a closed form that is exactly
//! right comes out with its exact coefficients and a mean square error of
//! exactly zero. Only [`rmse`] goes through floating point.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::pattern::{IndexMap, Label, Pattern, classify, general_case};
use crate::poly::Poly;
use crate::primes::is_twin_prime;
use crate::rings::{Field, Q, Ring, RingElement};

/// A least-squares fit.
#[derive(Clone, Debug)]
pub struct Fit {
    /// The fitted polynomial in `p`.
    pub poly: Poly<Q>,
    /// The mean of the squared residuals.
    pub mean_square: BigRational,
    /// The number of points the fit is based on.
    pub points: usize,
}

impl Fit {
    pub fn rmse(&self) -> f64 {
        rmse(&self.mean_square)
    }
}

/// The mean of the squares. Zero if there are no values.
pub fn mean_square(values: &[BigRational]) -> BigRational {
    if values.is_empty() {
        return Q::zero();
    }
    let sum = values.iter().fold(Q::zero(), |acc, v| acc + v * v);
    sum / BigRational::from(BigInt::from(values.len()))
}

/// The square root of a mean square error.
pub fn rmse(mean_square: &BigRational) -> f64 {
    let numer = mean_square.numer().to_f64().unwrap_or(f64::INFINITY);
    let denom = mean_square.denom().to_f64().unwrap_or(f64::INFINITY);
    (numer / denom).sqrt()
}

/// Solves `a * x = b` for a square, invertible `a` by Gauss-Jordan
/// elimination. Returns `None` if `a` is singular.
pub fn solve<F: Field>(
    mut a: Vec<Vec<F::Element>>,
    mut b: Vec<F::Element>,
    f: &F,
) -> Option<Vec<F::Element>> {
    let n = b.len();
    debug_assert!(a.len() == n && a.iter().all(|row| row.len() == n));

    for c in 0..n {
        // Any non-zero pivot will do, the arithmetic is exact.
        let pivot = (c..n).find(|&r| !a[r][c].is_zero())?;
        a.swap(c, pivot);
        b.swap(c, pivot);

        // Normalize the pivot row.
        let inv = f.div(F::one(), &a[c][c]);
        for e in &mut a[c][c..] {
            f.mul_assign(e, &inv);
        }
        f.mul_assign(&mut b[c], &inv);

        // Eliminate the column everywhere else.
        for r in (0..n).filter(|&r| r != c) {
            let m = a[r][c].clone();
            if m.is_zero() {
                continue;
            }
            for k in c..n {
                let pivot_entry = a[c][k].clone();
                f.mul_sub_assign(&mut a[r][k], &m, &pivot_entry);
            }
            let pivot_rhs = b[c].clone();
            f.mul_sub_assign(&mut b[r], &m, &pivot_rhs);
        }
    }

    Some(b)
}

/// Fits a polynomial of the given degree to the points `(p, n)` by least
/// squares.
///
/// The normal equations `(A^T A) c = A^T y` with the Vandermonde matrix `A`
/// are solved exactly. This needs at least `degree + 1` distinct `p`.
pub fn fit_polynomial(points: &[(u64, u64)], degree: usize) -> Result<Fit> {
    let mut distinct: Vec<u64> = points.iter().map(|&(p, _)| p).collect();
    distinct.sort_unstable();
    distinct.dedup();
    let needed = degree + 1;
    let underdetermined = || Error::UnderdeterminedFit {
        degree,
        needed,
        got: distinct.len(),
    };
    if distinct.len() < needed {
        return Err(underdetermined());
    }

    let q = &Q;

    // power_sums[k] = sum p^k, rhs[j] = sum n * p^j
    let mut power_sums = vec![Q::zero(); 2 * degree + 1];
    let mut rhs = vec![Q::zero(); needed];
    for &(p, n) in points {
        let p = q.element_from_usize(p as usize);
        let n = q.element_from_usize(n as usize);
        let mut pow = Q::one();
        for (k, sum) in power_sums.iter_mut().enumerate() {
            if k < needed {
                q.mul_add_assign(&mut rhs[k], &n, &pow);
            }
            q.add_assign(sum, &pow);
            q.mul_assign(&mut pow, &p);
        }
    }

    let normal = (0..needed)
        .map(|j| power_sums[j..j + needed].to_vec())
        .collect();
    let coeffs = solve(normal, rhs, q).ok_or_else(underdetermined)?;
    let poly = Poly::<Q>::from_vec(coeffs).truncated();

    let residuals: Vec<BigRational> = points
        .iter()
        .map(|&(p, n)| {
            let p = q.element_from_usize(p as usize);
            q.sub(q.element_from_usize(n as usize), &poly.eval(&p, q))
        })
        .collect();

    Ok(Fit {
        poly,
        mean_square: mean_square(&residuals),
        points: points.len(),
    })
}

/// The points `(p, n)` the closed forms are derived from, named.
///
/// The third index behaves differently for twin primes, so those get a
/// series of their own. Primes `p <= 3` are left out.
pub fn derive_series(groups: &IndexMap) -> Vec<(&'static str, Vec<(u64, u64)>)> {
    let mut series = vec![
        ("Pattern 1 (p^2 + 1)/2", Vec::new()),
        ("Pattern 2 p^2 - 1", Vec::new()),
        ("Third index, twin primes", Vec::new()),
        ("Third index, other primes", Vec::new()),
    ];

    for (&p, ns) in groups.iter().filter(|&(&p, _)| general_case(p)) {
        for (n, label) in classify(p, ns) {
            let i = match label {
                Label::Pattern(Pattern::HalfSquarePlusOne) => 0,
                Label::Pattern(Pattern::SquareMinusOne) => 1,
                _ if is_twin_prime(p) => 2,
                _ => 3,
            };
            series[i].1.push((p, n));
        }
    }

    series
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pattern::Pattern;
    use crate::primes::odd_primes;
    use crate::rings::Fp;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    fn points(pattern: Pattern) -> Vec<(u64, u64)> {
        odd_primes(5..=97).into_iter().map(|p| (p, pattern.index(p))).collect()
    }

    #[test]
    fn exact_closed_forms() {
        let fit = fit_polynomial(&points(Pattern::HalfSquarePlusOne), 2).unwrap();
        assert_eq!(fit.poly.coeffs, [q(1, 2), q(0, 1), q(1, 2)]);
        assert_eq!(fit.poly.display("p").to_string(), "(1/2)p^2 + 1/2");
        assert!(fit.mean_square.is_zero());
        assert_eq!(fit.rmse(), 0.0);

        let fit = fit_polynomial(&points(Pattern::SquareMinusOne), 3).unwrap();
        assert_eq!(fit.poly.display("p").to_string(), "p^2 - 1");
        assert_eq!(fit.rmse(), 0.0);

        let fit = fit_polynomial(&points(Pattern::HalfSquarePlusTwoP), 2).unwrap();
        assert_eq!(fit.poly.display("p").to_string(), "(1/2)p^2 + p - 1/2");
        assert_eq!(fit.points, 23);
    }

    #[test]
    fn least_squares_line() {
        // The best line through (1, 0), (2, 2), (3, 1) is n = p/2, with
        // residuals -1/2, 1, -1/2.
        let fit = fit_polynomial(&[(1, 0), (2, 2), (3, 1)], 1).unwrap();
        assert_eq!(fit.poly.coeffs, [q(0, 1), q(1, 2)]);
        assert_eq!(fit.mean_square, q(1, 2));
        assert!((fit.rmse() - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn underdetermined() {
        let err = fit_polynomial(&[(5, 13), (5, 13), (7, 25)], 2).unwrap_err();
        assert!(matches!(err, Error::UnderdeterminedFit { degree: 2, needed: 3, got: 2 }));
        assert!(fit_polynomial(&[], 0).is_err());
    }

    #[test]
    fn solve_mod_p() {
        // 2x + y = 3, x + 3y = 0 over F_7.
        let r = Fp::new(7).unwrap();
        let x = solve(vec![vec![2, 1], vec![1, 3]], vec![3, 0], &r).unwrap();
        assert_eq!(x, [6, 5]);
        assert!(solve(vec![vec![1, 2], vec![2, 4]], vec![1, 2], &r).is_none());
    }

    #[test]
    fn third_index_by_twin_primes() {
        let groups = IndexMap::from([
            (3, vec![4, 5, 7, 8]),
            (5, vec![13, 17, 24]),
            (7, vec![25, 31, 48]),
        ]);
        let series = derive_series(&groups);
        assert_eq!(series[0].1, [(5, 13), (7, 25)]);
        assert_eq!(series[1].1, [(5, 24), (7, 48)]);
        assert_eq!(series[2].1, [(5, 17)]);
        assert_eq!(series[3].1, [(7, 31)]);
    }

    #[test]
    fn mean_square_of_residuals() {
        assert!(mean_square(&[]).is_zero());
        assert_eq!(mean_square(&[q(-12, 1), q(0, 1)]), q(72, 1));
        assert_eq!(rmse(&q(72, 1)), 72f64.sqrt());
    }
}
