/// An element of a ring.
/// This exists mostly for convenience, so we can call `e.is_zero` on ring
/// elements, even though every operation that needs the modulus lives on the
/// [`Ring`] itself.
pub trait RingElement: 'static + Clone + PartialEq + std::fmt::Debug + std::fmt::Display {
    /// Returns the "zero" element of the ring.
    fn zero() -> Self;

    /// Is the given element "zero"?
    fn is_zero(&self) -> bool;

    /// Returns the "one" element of the ring.
    /// Rings mod 1 would make this wrong, which is why [`super::Fp`] refuses
    /// to be constructed with a modulus smaller than 2.
    fn one() -> Self;
}

macro_rules! impl_ring_element {
    ($t:ty) => {
        impl RingElement for $t {
            fn zero() -> Self {
                Zero::zero()
            }

            fn is_zero(&self) -> bool {
                Zero::is_zero(self)
            }

            fn one() -> Self {
                One::one()
            }
        }
    };
}

pub(crate) use impl_ring_element;

/// A ring.
///
/// The ring value carries whatever is needed to do arithmetic on its
/// elements, e.g. the modulus for [`super::Fp`]. For [`super::Q`] it is
/// empty.
pub trait Ring: 'static + Clone + PartialEq + Eq + std::fmt::Debug {
    /// The type of the elements of the ring.
    type Element: RingElement;

    /// Returns the "zero" element of the ring.
    fn zero() -> Self::Element {
        Self::Element::zero()
    }

    /// Returns the "one" element of the ring.
    fn one() -> Self::Element {
        Self::Element::one()
    }

    /// Negates the element in place.
    fn neg_assign(&self, e: &mut Self::Element);

    /// Negates the element, i.e. computes `0 - e`.
    fn neg(&self, mut e: Self::Element) -> Self::Element {
        self.neg_assign(&mut e);
        e
    }

    /// Add an element to another element.
    fn add_assign(&self, l: &mut Self::Element, r: &Self::Element);

    /// Add two elements.
    fn add(&self, mut l: Self::Element, r: &Self::Element) -> Self::Element {
        self.add_assign(&mut l, r);
        l
    }

    /// Subtract one element from another.
    fn sub_assign(&self, l: &mut Self::Element, r: &Self::Element);

    /// Subtract one element from another.
    fn sub(&self, mut l: Self::Element, r: &Self::Element) -> Self::Element {
        self.sub_assign(&mut l, r);
        l
    }

    /// Multiply two elements.
    fn mul_assign(&self, l: &mut Self::Element, r: &Self::Element);

    /// Multiply two elements.
    fn mul(&self, mut l: Self::Element, r: &Self::Element) -> Self::Element {
        self.mul_assign(&mut l, r);
        l
    }

    /// Multiply two elements and add the result to another element.
    fn mul_add_assign(
        &self,
        acc: &mut Self::Element,
        a: &Self::Element,
        b: &Self::Element,
    ) {
        self.add_assign(acc, &self.mul(a.clone(), b))
    }

    /// [`Ring::mul_add_assign`] but with [`Ring::sub`].
    fn mul_sub_assign(
        &self,
        acc: &mut Self::Element,
        a: &Self::Element,
        b: &Self::Element,
    ) {
        self.sub_assign(acc, &self.mul(a.clone(), b));
    }

    /// Computes `acc - a * b`.
    /// This is the shape of the Dickson recurrence step.
    fn mul_sub(
        &self,
        mut acc: Self::Element,
        a: &Self::Element,
        b: &Self::Element,
    ) -> Self::Element {
        self.mul_sub_assign(&mut acc, a, b);
        acc
    }

    /// Converts the `usize` `n` into an element.
    /// The element is the result of adding `1` `n`-times to itself.
    fn element_from_usize(&self, n: usize) -> Self::Element;
}

/// A field.
pub trait Field: Ring {
    /// Divide an element by a non-zero element.
    fn div_assign(&self, l: &mut Self::Element, r: &Self::Element);

    /// Divide an element by a non-zero element.
    fn div(&self, mut l: Self::Element, r: &Self::Element) -> Self::Element {
        self.div_assign(&mut l, r);
        l
    }
}
