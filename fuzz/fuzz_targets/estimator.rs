#![no_main]

use adakmv::AdaKmv;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // first two bytes pick the sketch parameters
    let threshold = usize::from(data[0] % 32) + 1;
    let max_size = threshold + usize::from(data[1] % 32);
    let data = &data[2..];
    if data.is_empty() {
        return;
    }

    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut estimator1 = AdaKmv::<wyhash::WyHash>::with_max_size(threshold, max_size);
    for chunk in first_half.chunks(4) {
        estimator1.offer(&chunk);
        assert!(estimator1.record_set().records().len() <= threshold);
        assert!(estimator1.record_set().current_size() <= max_size);
        assert!(estimator1.size_of() > 0);
    }

    let mut estimator2 = AdaKmv::<wyhash::WyHash>::new(threshold);
    for chunk in second_half.chunks(4) {
        estimator2.offer(&chunk);
        assert!(estimator2.record_set().current_size() <= threshold);
    }

    let snapshot = estimator2.clone();
    let merged = estimator1.merge([&estimator2]);
    assert_eq!(estimator2, snapshot);
    assert!(merged.record_set().current_size() <= max_size);
    if let Ok(estimate) = merged.cardinality() {
        assert!(estimate > 0);
    }
});
