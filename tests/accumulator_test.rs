// tests/accumulator_test.rs
use mc_sde::distributions::Distribution;
use mc_sde::rng::RngFactory;
use mc_sde::stats::experiments::{integral_experiment, pi_experiment, power_integral_experiment};
use mc_sde::{ExactResult, ExperimentAccumulator, Exponential, Histogram, Lifecycle, SdeError};
use proptest::prelude::*;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

proptest! {
    #[test]
    fn prop_histogram_counts_every_value(
        values in prop::collection::vec(prop::num::f64::ANY, 0..200),
        left in -100.0f64..100.0,
        width in 1e-3f64..100.0,
        bins in 1usize..50,
    ) {
        let histogram = Histogram::new(&values, left, left + width, bins).unwrap();
        prop_assert_eq!(histogram.counts().len(), bins + 2);
        prop_assert_eq!(histogram.total(), values.len());
    }

    #[test]
    fn prop_accumulator_histogram_is_complete(
        values in prop::collection::vec(-10.0f64..10.0, 1..100),
        bins in 1usize..20,
    ) {
        let n = values.len();
        let shared = Arc::new(values);
        let source = Arc::clone(&shared);
        let acc = ExperimentAccumulator::new(n, move |i| source[i]).unwrap();
        let histogram = acc.histogram(-5.0, 5.0, bins).unwrap();
        prop_assert_eq!(histogram.counts().iter().sum::<usize>(), n);
        prop_assert_eq!(histogram.below(), shared.iter().filter(|&&x| x < -5.0).count());
        prop_assert_eq!(histogram.above(), shared.iter().filter(|&&x| x >= 5.0).count());
    }
}

#[test]
fn test_results_are_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let factory = RngFactory::new(5);
    let exp = Exponential::new(0.2).unwrap();
    let acc = ExperimentAccumulator::new(32, move |trial| {
        counter.fetch_add(1, Ordering::SeqCst);
        let mut rng = factory.stream(trial as u64);
        exp.sample_mean(1_000, &mut rng)
    })
    .unwrap();

    assert_eq!(acc.lifecycle(), Lifecycle::Uninitialized);
    let first = acc.results();
    let second = acc.results();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first, second);
    assert_eq!(acc.lifecycle(), Lifecycle::Ready);

    let _ = (acc.average(), acc.std_deviation(), acc.min_max(), acc.summary());
    assert_eq!(calls.load(Ordering::SeqCst), 32);
}

#[test]
fn test_pi_experiment_statistics() {
    let acc = pi_experiment(100, 10_000, 2718).unwrap();
    assert_eq!(acc.exact_result(), Some(&ExactResult::Scalar(PI)));

    let average = acc.average();
    assert!((average - PI).abs() < 0.02, "average {}", average);

    // per-trial standard deviation 4·√(p(1-p)/n) with p = π/4
    let p = PI / 4.0;
    let expected_std = 4.0 * (p * (1.0 - p) / 10_000.0).sqrt();
    assert!((acc.std_deviation() / expected_std - 1.0).abs() < 0.25);

    let (min, max) = acc.min_max();
    assert!(min <= average && average <= max);

    let errors = acc.absolute_errors().unwrap();
    assert_eq!(errors.len(), 100);
    let average_error = acc.average_absolute_error().unwrap();
    assert!(average_error > 0.0 && average_error < 0.05, "{}", average_error);

    let histogram = acc.histogram(3.0, 3.3, 6).unwrap();
    assert_eq!(histogram.total(), 100);
}

#[test]
fn test_per_trial_exact_results() {
    let acc = ExperimentAccumulator::new(4, |i| (i * i) as f64)
        .unwrap()
        .with_exact_result(ExactResult::PerTrial(vec![0.0, 1.0, 4.0, 10.0]));
    assert_eq!(acc.absolute_errors().unwrap(), vec![0.0, 0.0, 0.0, 1.0]);
    assert_eq!(acc.average_absolute_error().unwrap(), 0.25);
}

#[test]
fn test_length_mismatch_is_recoverable() {
    let acc = power_integral_experiment(1.0, 10, 1_000, 1)
        .unwrap()
        .with_exact_result(ExactResult::PerTrial(vec![0.5; 9]));

    match acc.average_absolute_error() {
        Err(SdeError::LengthMismatch { expected, actual }) => {
            assert_eq!((expected, actual), (10, 9));
        }
        other => panic!("expected a length mismatch, got {:?}", other),
    }

    // the remaining statistics are still available
    assert!((acc.average() - 0.5).abs() < 0.02);
    assert_eq!(acc.results().len(), 10);
}

#[test]
fn test_integral_experiment_error_decreases_with_drawings() {
    let exact = std::f64::consts::E - 1.0;
    let error = |drawings: usize| {
        integral_experiment(|x| x.exp(), 50, drawings, 31)
            .unwrap()
            .with_exact_result(ExactResult::Scalar(exact))
            .average_absolute_error()
            .unwrap()
    };
    let coarse = error(100);
    let fine = error(10_000);
    assert!(fine < coarse / 3.0, "coarse {} fine {}", coarse, fine);
}
