//! # Serde module for AdaKmv
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `AdaKmv`. It uses `serde`'s custom serialization and deserialization mechanisms.
//!
//! Unlike the legacy `to_bytes` layout, the complete record set state is captured:
//! `(replacement_threshold, max_size, record_counter, records, pseudo_records)`.
//!
//! During deserialization the tuple is validated through `RecordSet::from_parts`, so a
//! payload that violates any record set invariant is rejected instead of producing a
//! sketch with wrong estimates.
//!
//! Refer to the serde documentation for more details on custom serialization and deserialization:
//! - [Serialization](https://serde.rs/impl-serialize.html)
//! - [Deserialization](https://serde.rs/impl-deserialize.html)
use std::collections::BTreeSet;
use std::hash::Hasher;

use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::estimator::AdaKmv;
use crate::record_set::RecordSet;

impl<H: Hasher + Default> Serialize for AdaKmv<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let record_set = self.record_set();
        let mut tup = serializer.serialize_tuple(5)?;
        tup.serialize_element(&record_set.replacement_threshold())?;
        tup.serialize_element(&record_set.max_size())?;
        tup.serialize_element(&record_set.record_counter())?;
        tup.serialize_element(record_set.records())?;
        tup.serialize_element(record_set.pseudo_records())?;
        tup.end()
    }
}

impl<'de, H: Hasher + Default> Deserialize<'de> for AdaKmv<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (replacement_threshold, max_size, record_counter, records, pseudo_records): (
            usize,
            usize,
            usize,
            BTreeSet<u64>,
            BTreeSet<u64>,
        ) = Deserialize::deserialize(deserializer)?;
        let record_set = RecordSet::from_parts(
            replacement_threshold,
            record_counter,
            max_size,
            records,
            pseudo_records,
        )
        .map_err(|e| Error::custom(format!("{:?}", e)))?;
        Ok(AdaKmv::from_record_set(record_set))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;
    use wyhash::WyHash;

    #[test_case(16, 16, 0; "empty set")]
    #[test_case(16, 16, 1; "single element")]
    #[test_case(16, 16, 100; "fixed above threshold")]
    #[test_case(16, 64, 10000; "adaptive")]
    fn test_serde(threshold: usize, max_size: usize, n: usize) {
        let mut original = AdaKmv::<WyHash>::with_max_size(threshold, max_size);
        for i in 0..n {
            let item = &format!("item{}", i);
            original.offer(&item);
        }

        let serialized = serde_json::to_string(&original).expect("serialization failed");
        assert!(
            !serialized.is_empty(),
            "serialized string should not be empty"
        );

        let deserialized: AdaKmv<WyHash> =
            serde_json::from_str(&serialized).expect("deserialization failed");

        assert_eq!(original.record_set(), deserialized.record_set());
        assert_eq!(original.cardinality(), deserialized.cardinality());
    }

    #[test]
    fn test_serde_format() {
        let mut e = AdaKmv::<WyHash>::with_max_size(2, 3);
        for h in [40, 30, 20, 10] {
            e.offer_hashed(h);
        }
        assert_eq!(serde_json::to_string(&e).unwrap(), "[2,3,4,[10,20],[30]]");
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let invalid_json = "{ invalid_json_string }";
        let result: Result<AdaKmv<WyHash>, _> = serde_json::from_str(invalid_json);

        assert!(
            result.is_err(),
            "Deserialization should fail for invalid JSON"
        );
    }

    #[test_case("[0,4,0,[],[]]"; "zero threshold")]
    #[test_case("[4,2,0,[],[]]"; "max size below threshold")]
    #[test_case("[2,4,0,[1,2,3],[]]"; "too many records")]
    #[test_case("[2,3,0,[1,2],[3,4]]"; "too many values")]
    #[test_case("[2,4,0,[1,5],[3]]"; "unordered pseudo-records")]
    #[test_case("[2,4,0,[1,2]]"; "missing element")]
    #[test_case("[2,4,0,[-1,2],[]]"; "negative record")]
    fn test_failed_deserialization(input: &str) {
        let result: Result<AdaKmv<WyHash>, _> = serde_json::from_str(input);
        assert!(result.is_err());
    }
}
