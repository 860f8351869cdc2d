//! Value sets of the reversed Dickson polynomials D_n(1, x) over prime
//! fields, and the indices n for which they have exactly two elements.

pub mod error;
pub mod fit;
pub mod pattern;
pub mod plot;
pub mod poly;
pub mod primes;
pub mod rings;
pub mod sequence;
pub mod table;

pub use error::{Error, Result};
pub use sequence::{ValueSet, compute_value_set};
