//! The number systems the Dickson computations run in.
//!
//! [`Ring`] stores information about the ring we are working in and all
//! operations on elements go through it. For [`Fp`] it holds the prime
//! modulus, which is only known at runtime; for [`Q`] it is empty.
//!
//! [`Fp`] is where the polynomials are evaluated, [`Q`] is where the closed
//! forms for the indices are fitted exactly.

mod prime_field;
mod rationals;
mod traits;

pub use prime_field::*;
pub use rationals::*;
pub use traits::*;

use num_bigint::BigInt;
use num_integer::ExtendedGcd;
use num_rational::BigRational;
use num_traits::{One, Zero};

impl_ring_element!(u64);
impl_ring_element!(BigRational);
