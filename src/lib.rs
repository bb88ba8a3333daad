#![forbid(unsafe_code)]
#![deny(
    missing_debug_implementations,
    unstable_features,
    unused_import_braces,
    missing_docs
)]

//! Exact synthesis of single qubit z-rotations over Clifford+T.
//!
//! Given an angle `θ` and a precision `ε` the search finds `u, t ∈ Z[ω]` and the smallest `k`
//! such that
//! ```text
//! U = 1/√2^k [[u, -t̄], [t, ū]]
//! ```
//! is unitary and `u/√2^k` lies within `ε` of `e^{iθ}`. Every such matrix is exactly
//! representable with Clifford+T gates, and `k` governs the T count.
//!
//! All geometry is computed with exact rationals rounded to the precision carried by a
//! [`NumericContext`], ring arithmetic is exact.
//!
//! # Example
//! ```
//! use qip_gridsynth::*;
//!
//! # fn main() -> GridSynthResult<()> {
//! let config = SynthesisConfig::new(0.3, 1e-2)?;
//! let result = find_rz_approximation(&config)?;
//! assert!(result.solution_found());
//! assert!(result.matrix().is_unitary());
//! assert!(result.error() < 1e-2);
//! println!("k = {}: {}", result.scale_exponent(), result.matrix());
//! # Ok(())
//! # }
//! ```
//!
//! With the `parallel` feature (on by default) candidate checks and region filtering run on
//! rayon. The result is identical either way.

#[macro_use]
mod rayon_helper;

/// Errors for the search and its building blocks.
pub mod errors;
/// Scalar bounds for regions.
pub mod types;
/// Rounded real arithmetic.
pub mod numeric;
pub mod rings;
/// Exact unitaries with entries in `Z[ω]/√2^k`.
pub mod matrix;
pub mod regions;
/// Special grid operators.
pub mod grid_op;
pub mod skew;
pub mod grid_solvers;
pub mod arith;
pub mod diophantine;
pub mod rz_approximation;

pub use self::diophantine::solve_norm_equation;
pub use self::errors::{GridSynthError, GridSynthResult};
pub use self::grid_op::GridOp;
pub use self::grid_solvers::{solve_one_dim, solve_two_dim, EnumerationStrategy};
pub use self::matrix::UnitaryMatrix;
pub use self::numeric::{NumericContext, Real};
pub use self::regions::{Ellipse, Interval, SearchState, UprightRectangle};
pub use self::rings::{ZOmega, ZSqrt2};
pub use self::rz_approximation::{
    find_fast_rz_approximation, find_rz_approximation, find_rz_approximation_with,
    RzApproximation, SynthesisConfig,
};
pub use self::skew::optimize_skew;
pub use num::Complex;
