//! Errors returned by `RecordSet` and `AdaKmv` operations.

use std::fmt::{Display, Formatter};

/// Error kinds surfaced by the sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The sketch holds no values, so it has no maximum.
    EmptySketch,
    /// The largest retained value is zero, which makes the normalized distance zero.
    DivisionByZero,
    /// 32-bit hashes are not accepted, widen them to 64 bits first.
    UnsupportedOperation,
    /// Merge operand is a different estimator type.
    IncompatibleEstimator,
    /// Reading the legacy byte layout back into a sketch.
    NotImplemented,
    /// Record set parts violate a size or ordering invariant.
    InvalidRecordSet(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptySketch => write!(f, "no records in record set"),
            Error::DivisionByZero => write!(f, "maximum retained value is zero"),
            Error::UnsupportedOperation => write!(f, "32-bit hashed values are not supported"),
            Error::IncompatibleEstimator => {
                write!(f, "cannot merge estimators of different types")
            }
            Error::NotImplemented => write!(f, "reading serialized bytes is not implemented"),
            Error::InvalidRecordSet(reason) => write!(f, "invalid record set: {}", reason),
        }
    }
}

impl std::error::Error for Error {}
