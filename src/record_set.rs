//! ## Record set
//! Ordered, size-bounded store of the smallest distinct hash values seen so far.
//!
//! Values are split into two ordered sets:
//! - `records`         - up to `replacement_threshold` smallest values (the KMV working set)
//! - `pseudo_records`  - overflow values displaced from `records`, all larger than any record
//!
//! The total number of retained values never exceeds `max_size`. With
//! `max_size == replacement_threshold` this is a plain fixed-size KMV sketch, otherwise
//! the sketch keeps growing its overflow buffer up to `max_size` as smaller values arrive.

use std::collections::BTreeSet;

use crate::error::Error;

/// Ordered store of records and pseudo-records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    /// Number of smallest values kept in `records`
    replacement_threshold: usize,
    /// Maximum number of values kept in `records` and `pseudo_records` combined
    max_size: usize,
    /// Number of insertions into `records` since creation
    record_counter: usize,
    records: BTreeSet<u64>,
    pseudo_records: BTreeSet<u64>,
}

impl RecordSet {
    /// Create new empty `RecordSet`
    ///
    /// # Panics
    ///
    /// If `replacement_threshold` is zero or `max_size` is below `replacement_threshold`.
    pub fn new(replacement_threshold: usize, max_size: usize) -> Self {
        assert!(
            replacement_threshold > 0,
            "replacement threshold must be positive"
        );
        assert!(
            max_size >= replacement_threshold,
            "max size must be at least {}, got {}",
            replacement_threshold,
            max_size
        );
        Self {
            replacement_threshold,
            max_size,
            record_counter: 0,
            records: BTreeSet::new(),
            pseudo_records: BTreeSet::new(),
        }
    }

    /// Create `RecordSet` from previously captured parts, validating every size
    /// and ordering invariant maintained by `offer`.
    pub fn from_parts(
        replacement_threshold: usize,
        record_counter: usize,
        max_size: usize,
        records: BTreeSet<u64>,
        pseudo_records: BTreeSet<u64>,
    ) -> Result<Self, Error> {
        if replacement_threshold == 0 {
            return Err(Error::InvalidRecordSet("replacement threshold is zero"));
        }
        if max_size < replacement_threshold {
            return Err(Error::InvalidRecordSet("max size below replacement threshold"));
        }
        if records.len() > replacement_threshold {
            return Err(Error::InvalidRecordSet("records exceed replacement threshold"));
        }
        if records.len() + pseudo_records.len() > max_size {
            return Err(Error::InvalidRecordSet("records exceed max size"));
        }
        if !pseudo_records.is_empty() && records.len() < replacement_threshold {
            return Err(Error::InvalidRecordSet("pseudo-records without full records"));
        }
        if let (Some(&max), Some(&min)) = (records.last(), pseudo_records.first()) {
            if min <= max {
                return Err(Error::InvalidRecordSet("pseudo-record not above records"));
            }
        }

        Ok(Self {
            replacement_threshold,
            max_size,
            record_counter,
            records,
            pseudo_records,
        })
    }

    /// Offer a value to the set.
    /// Returns true if the value was retained, false otherwise.
    pub fn offer(&mut self, value: u64) -> bool {
        if self.contains(value) {
            return false;
        }

        let mut affected = false;
        if self.records.len() < self.replacement_threshold
            || self.records.last().is_some_and(|&max| value < max)
        {
            self.records.insert(value);
            self.record_counter += 1;
            affected = true;
        } else if self.pseudo_records.last().is_some_and(|&max| value < max) {
            self.pseudo_records.insert(value);
            self.pseudo_records.pop_last();
            affected = true;
        }

        // demote largest record once records outgrow the threshold
        if self.records.len() > self.replacement_threshold {
            if let Some(max) = self.records.pop_last() {
                self.pseudo_records.insert(max);
            }
        }

        if self.current_size() > self.max_size {
            self.pseudo_records.pop_last();
        }

        affected
    }

    /// Offer all records of `other` to `self`.
    /// Pseudo-records of `other` are not considered.
    pub fn merge(&mut self, other: &RecordSet) {
        for &value in &other.records {
            self.offer(value);
        }
    }

    /// Return whether `value` is retained either as record or pseudo-record
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        self.records.contains(&value) || self.pseudo_records.contains(&value)
    }

    /// Return largest retained value
    pub fn max_value(&self) -> Result<u64, Error> {
        self.pseudo_records
            .last()
            .or_else(|| self.records.last())
            .copied()
            .ok_or(Error::EmptySketch)
    }

    /// Return total number of retained values
    #[inline]
    pub fn current_size(&self) -> usize {
        self.records.len() + self.pseudo_records.len()
    }

    #[inline]
    pub fn replacement_threshold(&self) -> usize {
        self.replacement_threshold
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn record_counter(&self) -> usize {
        self.record_counter
    }

    /// Return whether the set may grow beyond `replacement_threshold`
    #[inline]
    pub fn is_adaptive(&self) -> bool {
        self.max_size > self.replacement_threshold
    }

    #[inline]
    pub fn records(&self) -> &BTreeSet<u64> {
        &self.records
    }

    #[inline]
    pub fn pseudo_records(&self) -> &BTreeSet<u64> {
        &self.pseudo_records
    }
}
