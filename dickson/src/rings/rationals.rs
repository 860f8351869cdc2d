use super::*;

/// The rational numbers, with elements stored as [`BigRational`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Q;

impl Ring for Q {
    type Element = BigRational;

    fn neg_assign(&self, e: &mut Self::Element) {
        *e = -std::mem::take(e);
    }

    fn add_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        *l += r;
    }

    fn sub_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        *l -= r;
    }

    fn mul_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        *l *= r;
    }

    fn element_from_usize(&self, n: usize) -> Self::Element {
        BigInt::from(n).into()
    }
}

impl Field for Q {
    fn div_assign(&self, l: &mut Self::Element, r: &Self::Element) {
        *l /= r;
    }
}
