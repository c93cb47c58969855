#![no_main]

use adakmv::AdaKmv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = serde_json::from_slice::<AdaKmv>(data) {
        let max_size = estimator.max_size();
        estimator.offer(&1);
        assert!(estimator.record_set().current_size() <= max_size);
        assert!(estimator.record_set().records().len() <= estimator.replacement_threshold());
    }
});
