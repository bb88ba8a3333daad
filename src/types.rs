use num::{Num, Signed};
use std::fmt::Debug;

/// A scalar type which can bound an interval. Any signed number type with an ordering works,
/// the search itself uses [`crate::numeric::Real`].
pub trait Bound: Num + Signed + PartialOrd + Clone + Debug {}

impl<T> Bound for T where T: Num + Signed + PartialOrd + Clone + Debug {}
