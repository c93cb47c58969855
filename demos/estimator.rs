use adakmv::AdaKmv;

fn main() {
    let mut estimator1 = AdaKmv::<wyhash::WyHash>::new(64);
    for i in 0..10 {
        estimator1.offer(&i);
    }
    println!("estimator1 estimate = {:?}", estimator1.cardinality());

    let mut estimator2 = AdaKmv::<wyhash::WyHash>::with_max_size(64, 256);
    for i in 10..100_000 {
        estimator2.offer(&i);
    }
    println!("estimator2 estimate = {:?}", estimator2.cardinality());
    println!("estimator2 = {:?}", estimator2);

    let merged = estimator1.merge([&estimator2]);
    println!("merged estimate = {:?}", merged.cardinality());
}
