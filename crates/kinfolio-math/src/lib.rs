//! # Kinfolio Math
//!
//! Numerical building blocks for the Kinfolio portfolio analytics library.
//!
//! This crate provides:
//!
//! - **Statistics**: Moments, covariance, Pearson correlation, percentiles
//! - **Linear Algebra**: Covariance matrices and quadratic forms over `nalgebra`
//! - **Optimization**: Minimization over the probability simplex, with an
//!   optional linear equality constraint
//!
//! ## Design Philosophy
//!
//! - **Explicit degeneracy**: Undefined statistics come back as `None`, never NaN
//! - **Bounded work**: Every iterative routine has a hard iteration cap
//! - **Plain slices**: Inputs are `&[f64]` so callers need not adopt `nalgebra`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod linear_algebra;
pub mod optimization;
pub mod stats;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{covariance_matrix, quadratic_form};
    pub use crate::optimization::{
        minimize_on_simplex, minimize_on_simplex_with_equality, project_onto_simplex,
        LinearConstraint, OptimizationConfig, OptimizationResult,
    };
    pub use crate::stats::{correlation, covariance, mean, percentile, std_dev, variance, Ddof};
}

pub use error::{MathError, MathResult};
