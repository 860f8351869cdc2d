//! Polynomials.

use crate::rings::{Ring, RingElement};

/// Represents a polynomial with coefficients in a ring.
///
/// `coeffs[0] + coeffs[1]*x + coeffs[2]*x*x + ...`
#[derive(Clone, Debug)]
pub struct Poly<R: Ring> {
    pub coeffs: Vec<R::Element>,
}

impl<R: Ring> PartialEq for Poly<R> {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs
    }
}

impl<R: Ring> Poly<R> {
    /// Returns the constant zero polynomial.
    pub const fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Returns the constant polynomial.
    pub fn constant(c: R::Element) -> Self {
        Self { coeffs: vec![c] }.truncated()
    }

    /// Returns a polynomial from a list of coefficients,
    /// starting with the constant one.
    pub fn from_vec(v: Vec<R::Element>) -> Self {
        Self { coeffs: v }
    }

    /// Returns the degree of the polynomial.
    /// The degree of the zero polynomial is zero here!
    pub fn degree(&self) -> usize {
        match self.coeffs.len() {
            0 => 0,
            n => n - 1,
        }
    }

    /// Returns the number of coefficient.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Checks whether a truncated polynomial is zero.
    pub fn is_zero(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate the polynomial at a using Horner's method.
    pub fn eval(&self, a: &R::Element, r: &R) -> R::Element {
        // Iterate over the coefficients in reverse order.
        let mut iter = self.coeffs.iter().rev();

        // The last coefficient is the initial value.
        let mut v = iter.next().map_or_else(R::zero, |c| c.clone());
        for c in iter {
            v = r.mul(v, a);
            v = r.add(v, c);
        }

        v
    }

    /// Truncates leading zero coefficients.
    pub fn truncate(&mut self) {
        while self.coeffs.last().is_some_and(RingElement::is_zero) {
            self.coeffs.pop();
        }
    }

    /// Returns the truncated polynomial.
    pub fn truncated(mut self) -> Self {
        self.truncate();
        self
    }

    /// Returns a struct that can be used to display the polynomial.
    pub fn display<'a>(&'a self, var: &'a str) -> DisplayPoly<'a, R> {
        DisplayPoly { poly: self, var }
    }

    /// Subtract one polynomial from another.
    pub fn sub(&self, rhs: &Self, ring: &R) -> Self {
        // Subtract the rhs for the coefficients that exist in both.
        let mut coeffs = Vec::with_capacity(self.len().max(rhs.len()));
        self.coeffs
            .iter()
            .zip(rhs.coeffs.iter())
            .for_each(|(l, r)| coeffs.push(ring.sub(l.clone(), r)));

        // Push the remaining coefficients or their additive inverses
        // depending on what polynomial has the more coefficients.
        if self.len() >= rhs.len() {
            coeffs.extend_from_slice(&self.coeffs[rhs.len()..]);
        } else {
            for c in &rhs.coeffs[self.len()..] {
                coeffs.push(ring.neg(c.clone()));
            }
        }

        Poly { coeffs }.truncated()
    }

    /// Multiplies the polynomial by the variable.
    pub fn mul_var(&mut self) {
        if !self.is_zero() {
            self.coeffs.insert(0, R::zero());
        }
    }
}

pub struct DisplayPoly<'a, R: Ring> {
    poly: &'a Poly<R>,
    var: &'a str,
}

impl<'a, R: Ring> std::fmt::Display for DisplayPoly<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut iter = self
            .poly
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero());

        // Rationals print as `1/2`, which needs parentheses in front of the
        // variable. Negative coefficients are written as a subtraction.
        fn write_term<E: RingElement>(
            f: &mut std::fmt::Formatter<'_>,
            e: usize,
            c: &E,
            var: &str,
            first: bool,
        ) -> std::fmt::Result {
            let c = c.to_string();
            let c = match c.strip_prefix('-') {
                Some(abs) if first => {
                    f.write_str("-")?;
                    abs
                },
                Some(abs) => {
                    f.write_str(" - ")?;
                    abs
                },
                None if first => &c,
                None => {
                    f.write_str(" + ")?;
                    &c
                },
            };

            if e == 0 {
                return f.write_str(c);
            }

            if c.contains('/') {
                write!(f, "({c})")?;
            } else if c != "1" {
                f.write_str(c)?;
            }

            f.write_str(var)?;

            if e > 1 {
                write!(f, "^{e}")?;
            }

            Ok(())
        }

        match iter.next() {
            None => return f.write_str("0"),
            Some((e, c)) => write_term(f, e, c, self.var, true)?,
        };

        for (e, c) in iter {
            write_term(f, e, c, self.var, false)?;
        }

        Ok(())
    }
}

impl<R: Ring> std::fmt::Display for Poly<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.display("x").fmt(f)
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;
    use num_rational::BigRational;

    use super::*;
    use crate::rings::{Fp, Q};

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn display() {
        let r = Fp::new(7).unwrap();
        let p = Poly::<Fp>::from_vec(vec![1, 0, 3, 1]);
        assert_eq!(p.to_string(), "x^3 + 3x^2 + 1");
        assert_eq!(Poly::<Fp>::zero().to_string(), "0");
        assert_eq!(Poly::<Fp>::constant(r.element_from_usize(7)).to_string(), "0");

        let p = Poly::<Q>::from_vec(vec![q(1, 2), q(-3, 1), q(1, 2)]);
        assert_eq!(p.display("p").to_string(), "(1/2)p^2 - 3p + 1/2");
        let p = Poly::<Q>::from_vec(vec![q(-1, 2), q(-1, 1)]);
        assert_eq!(p.display("p").to_string(), "-p - 1/2");
    }

    #[test]
    fn eval_and_sub() {
        let r = Fp::new(5).unwrap();
        let p = Poly::<Fp>::from_vec(vec![2, 0, 1]);
        let q = Poly::<Fp>::from_vec(vec![1, 4]);
        let d = p.sub(&q, &r);
        assert_eq!(d.coeffs, [1, 1, 1]);
        for x in r.elements() {
            assert_eq!(d.eval(&x, &r), r.sub(p.eval(&x, &r), &q.eval(&x, &r)));
        }

        // Leading terms cancel.
        assert!(p.sub(&p, &r).is_zero());

        let mut x = q.clone();
        x.mul_var();
        assert_eq!(x.coeffs, [0, 1, 4]);
        assert_eq!(x.degree(), 2);
    }
}
