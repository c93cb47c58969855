//! AdaKMV estimator allows to estimate number of distinct elements
//! in the stream or dataset by retaining the smallest hash values observed
//! and is defined by two runtime parameters:
//! - `replacement_threshold` (k): number of smallest hash values kept as records.
//! - `max_size`: cap on records plus pseudo-records, equal to `k` for a fixed-size
//!   sketch or larger for an adaptive one.
//!
//! # Data-structure design rationale
//!
//! ## Memory footprint
//! Retained values are stored in two ordered sets, 8 bytes per value plus tree
//! overhead, bounded by `max_size`.
//!
//! ## Accuracy
//! - Until `k` values are retained the estimate is the exact number of distinct
//!   hashes seen (within hash collisions chance).
//! - Afterwards the classical KMV estimator `n = size / (max / MAX_HASH)` is used,
//!   where `max` is the largest retained value. Expected error is roughly `1 / sqrt(k)`:
//!     k = 256: 6.25%
//!     k = 1024: 3.12%
//!     k = 4096: 1.56%
//! - Adaptive sketches keep displaced values as pseudo-records and count them
//!   into `size`, lowering the error as the stream grows.
//!
//! # Hashing
//! Items are hashed with `H` (default `WyHash`). Signed hashes are folded onto
//! the non-negative half of the hash space with `unsigned_abs` before being offered.
//!
//! # Legacy byte layout
//! `to_bytes` writes a 4-byte big-endian header holding `current_size * 8`,
//! followed by each record (not pseudo-record) in ascending order as 8-byte
//! big-endian integers. There is no reader for this layout; use the `with_serde`
//! feature for a lossless round trip.
//!
//! # Concurrency
//! There is no internal synchronization. Keep one sketch per shard or thread and
//! merge afterwards; `merge` only reads its operands and builds a fresh estimator.

use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

use wyhash::WyHash;

use crate::error::Error;
use crate::record_set::RecordSet;

/// Largest hash value after folding, used to normalize the retained maximum into `(0, 1]`
const MAX_HASH: u64 = i64::MAX.unsigned_abs();
/// Replacement threshold used by `AdaKmv::default`
pub const DEFAULT_REPLACEMENT_THRESHOLD: usize = 1024;
/// Bytes accounted per retained value by `size_of`
const RECORD_BYTES: usize = 8;

/// Operations shared by cardinality estimators.
pub trait CardinalityEstimatorTrait: Any + Debug {
    /// Offer a hashable item, returning whether the estimator state changed
    fn offer<T: Hash + ?Sized>(&mut self, item: &T) -> bool
    where
        Self: Sized;

    /// Offer an already hashed item
    fn offer_hashed(&mut self, hash: i64) -> bool;

    /// Offer a 32-bit hash
    fn offer_hashed_i32(&mut self, hash: i32) -> Result<bool, Error>;

    /// Return cardinality estimate
    fn cardinality(&self) -> Result<u64, Error>;

    /// Merge `self` and `others` into a new estimator, leaving all inputs untouched
    fn merge(
        &self,
        others: &[&dyn CardinalityEstimatorTrait],
    ) -> Result<Box<dyn CardinalityEstimatorTrait>, Error>;

    /// Return approximate memory size in bytes
    fn size_of(&self) -> usize;

    /// Serialize estimator into bytes
    fn to_bytes(&self) -> Vec<u8>;

    fn as_any(&self) -> &dyn Any;
}

/// Adaptive K-Minimum-Values cardinality estimator
pub struct AdaKmv<H: Hasher + Default = WyHash> {
    record_set: RecordSet,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl<H: Hasher + Default> AdaKmv<H> {
    /// Creates new fixed-size estimator keeping `threshold` smallest hashes
    ///
    /// # Panics
    ///
    /// If `threshold` is zero.
    #[inline]
    pub fn new(threshold: usize) -> Self {
        Self::from_record_set(RecordSet::new(threshold, threshold))
    }

    /// Creates new adaptive estimator keeping `threshold` records and
    /// up to `max_size` values in total
    ///
    /// # Panics
    ///
    /// If `threshold` is zero or `max_size` is below `threshold`.
    #[inline]
    pub fn with_max_size(threshold: usize, max_size: usize) -> Self {
        Self::from_record_set(RecordSet::new(threshold, max_size))
    }

    /// Creates estimator around existing `RecordSet`
    #[inline]
    pub fn from_record_set(record_set: RecordSet) -> Self {
        Self {
            record_set,
            build_hasher: BuildHasherDefault::default(),
        }
    }

    /// Reading the legacy byte layout is not supported, as it carries neither
    /// parameters nor pseudo-records.
    pub fn from_bytes(_bytes: &[u8]) -> Result<Self, Error> {
        Err(Error::NotImplemented)
    }

    /// Offer a hashable item into `AdaKmv`
    #[inline]
    pub fn offer<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let mut hasher = self.build_hasher.build_hasher();
        item.hash(&mut hasher);
        let hash = hasher.finish();
        self.offer_hashed(hash as i64)
    }

    /// Offer hash into `AdaKmv`
    #[inline]
    pub fn offer_hashed(&mut self, hash: i64) -> bool {
        self.record_set.offer(hash.unsigned_abs())
    }

    /// Always fails with `Error::UnsupportedOperation`; widen with `i64::from` instead.
    #[inline]
    pub fn offer_hashed_i32(&mut self, _hash: i32) -> Result<bool, Error> {
        Err(Error::UnsupportedOperation)
    }

    /// Return cardinality estimate
    pub fn cardinality(&self) -> Result<u64, Error> {
        let size = self.record_set.current_size();
        if size < self.record_set.replacement_threshold() {
            return Ok(size as u64);
        }

        let max = self.record_set.max_value()?;
        if max == 0 {
            return Err(Error::DivisionByZero);
        }
        let distance = max as f64 / MAX_HASH as f64;
        Ok((1.0 / distance * size as f64).floor() as u64)
    }

    /// Merge copy of `self` with `others`.
    /// Operands may use different thresholds and max sizes.
    pub fn merge<'a>(&self, others: impl IntoIterator<Item = &'a AdaKmv<H>>) -> AdaKmv<H>
    where
        H: 'a,
    {
        let mut merged = self.clone();
        for other in others {
            merged.record_set.merge(&other.record_set);
        }
        merged
    }

    /// Return approximate memory size of retained values
    #[inline]
    pub fn size_of(&self) -> usize {
        self.record_set.current_size() * RECORD_BYTES
    }

    /// Serialize records using the legacy byte layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let records = self.record_set.records();
        let mut bytes = Vec::with_capacity(4 + records.len() * RECORD_BYTES);
        bytes.extend_from_slice(&(self.size_of() as u32).to_be_bytes());
        for record in records {
            bytes.extend_from_slice(&record.to_be_bytes());
        }
        bytes
    }

    #[inline]
    pub fn record_set(&self) -> &RecordSet {
        &self.record_set
    }

    #[inline]
    pub fn replacement_threshold(&self) -> usize {
        self.record_set.replacement_threshold()
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.record_set.max_size()
    }

    #[inline]
    pub fn is_adaptive(&self) -> bool {
        self.record_set.is_adaptive()
    }
}

impl<H: Hasher + Default + 'static> CardinalityEstimatorTrait for AdaKmv<H> {
    fn offer<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        AdaKmv::offer(self, item)
    }

    fn offer_hashed(&mut self, hash: i64) -> bool {
        AdaKmv::offer_hashed(self, hash)
    }

    fn offer_hashed_i32(&mut self, hash: i32) -> Result<bool, Error> {
        AdaKmv::offer_hashed_i32(self, hash)
    }

    fn cardinality(&self) -> Result<u64, Error> {
        AdaKmv::cardinality(self)
    }

    fn merge(
        &self,
        others: &[&dyn CardinalityEstimatorTrait],
    ) -> Result<Box<dyn CardinalityEstimatorTrait>, Error> {
        // every operand is checked before any merging happens
        let others = others
            .iter()
            .map(|other| {
                other
                    .as_any()
                    .downcast_ref::<AdaKmv<H>>()
                    .ok_or(Error::IncompatibleEstimator)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(AdaKmv::merge(self, others)))
    }

    fn size_of(&self) -> usize {
        AdaKmv::size_of(self)
    }

    fn to_bytes(&self) -> Vec<u8> {
        AdaKmv::to_bytes(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<H: Hasher + Default> Default for AdaKmv<H> {
    fn default() -> Self {
        Self::new(DEFAULT_REPLACEMENT_THRESHOLD)
    }
}

impl<H: Hasher + Default> Clone for AdaKmv<H> {
    /// Deep copy of `AdaKmv`
    fn clone(&self) -> Self {
        Self::from_record_set(self.record_set.clone())
    }
}

impl<H: Hasher + Default> PartialEq for AdaKmv<H> {
    /// Compare estimators by retained values, ignoring parameters and counters
    fn eq(&self, rhs: &Self) -> bool {
        self.record_set.records() == rhs.record_set.records()
            && self.record_set.pseudo_records() == rhs.record_set.pseudo_records()
    }
}

impl<H: Hasher + Default> Debug for AdaKmv<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let estimate = match self.cardinality() {
            Ok(estimate) => estimate.to_string(),
            Err(e) => format!("{:?}", e),
        };
        write!(
            f,
            "{{ records: {}, pseudo_records: {}, estimate: {}, size: {} }}",
            self.record_set.records().len(),
            self.record_set.pseudo_records().len(),
            estimate,
            self.size_of()
        )
    }
}
