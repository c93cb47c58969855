//! `adakmv` is a Rust crate designed to estimate the number of distinct elements in a stream or dataset in an efficient manner.
//!
//! This library uses an adaptive K-Minimum-Values sketch: it retains the smallest hash values seen,
//! optionally growing an overflow buffer of pseudo-records, and derives the estimate from the largest retained value.
mod error;
pub mod estimator;
pub mod record_set;
#[cfg(feature = "with_serde")]
mod serde;

pub use error::Error;
pub use estimator::{AdaKmv, CardinalityEstimatorTrait};
pub use record_set::RecordSet;
