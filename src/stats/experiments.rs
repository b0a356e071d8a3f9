// src/stats/experiments.rs
//! Ready-made Monte Carlo experiments
//!
//! Each builder returns an [`ExperimentAccumulator`] whose trial `i` draws
//! from the independent stream `RngFactory::new(seed).stream(i)`, so two
//! accumulators built with the same arguments produce identical outcomes.

use super::accumulator::{ExactResult, ExperimentAccumulator};
use super::running::RunningStats;
use crate::distributions::{Distribution, Uniform};
use crate::error::{validation::*, SdeError, SdeResult};
use crate::rng::{self, RngFactory};
use std::f64::consts::PI;

/// Upper bound on the number of drawings inside a single trial
const MAX_DRAWINGS: usize = 1_000_000_000;

/// `4 · P(U₁² + U₂² ≤ 1)` estimated from `points` uniform points per trial
pub fn pi_experiment(trials: usize, points: usize, seed: u64) -> SdeResult<ExperimentAccumulator> {
    validate_count("points", points, MAX_DRAWINGS)?;
    let factory = RngFactory::new(seed);
    let accumulator = ExperimentAccumulator::new(trials, move |trial| {
        let mut rng = factory.stream(trial as u64);
        let mut inside = RunningStats::new();
        for _ in 0..points {
            let x = rng::get_uniform_draw(&mut rng);
            let y = rng::get_uniform_draw(&mut rng);
            inside.push(if x * x + y * y <= 1.0 { 1.0 } else { 0.0 });
        }
        4.0 * inside.mean()
    })?;
    Ok(accumulator.with_exact_result(ExactResult::Scalar(PI)))
}

/// `∫₀¹ f(x) dx` estimated from `drawings` uniform points per trial
pub fn integral_experiment<F>(
    f: F,
    trials: usize,
    drawings: usize,
    seed: u64,
) -> SdeResult<ExperimentAccumulator>
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    validate_count("drawings", drawings, MAX_DRAWINGS)?;
    let factory = RngFactory::new(seed);
    let unit = Uniform::unit();
    ExperimentAccumulator::new(trials, move |trial| {
        let mut rng = factory.stream(trial as u64);
        unit.sample_mean_of(drawings, &f, &mut rng)
    })
}

/// `∫₀¹ xᵖ dx = 1 / (1 + p)`, with the exact value attached
pub fn power_integral_experiment(
    exponent: f64,
    trials: usize,
    drawings: usize,
    seed: u64,
) -> SdeResult<ExperimentAccumulator> {
    validate_finite("exponent", exponent)?;
    if exponent <= -1.0 {
        return Err(SdeError::InvalidParameters {
            parameter: "exponent".to_string(),
            value: exponent,
            constraint: "must be greater than -1 for the integral to converge".to_string(),
        });
    }
    let accumulator = integral_experiment(move |x| x.powf(exponent), trials, drawings, seed)?;
    Ok(accumulator.with_exact_result(ExactResult::Scalar(1.0 / (1.0 + exponent))))
}

/// `∫∫_{[0,1]²} f(x, y) dx dy` estimated from `drawings` uniform points per trial
pub fn integral_2d_experiment<F>(
    f: F,
    trials: usize,
    drawings: usize,
    seed: u64,
) -> SdeResult<ExperimentAccumulator>
where
    F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
    validate_count("drawings", drawings, MAX_DRAWINGS)?;
    let factory = RngFactory::new(seed);
    ExperimentAccumulator::new(trials, move |trial| {
        let mut rng = factory.stream(trial as u64);
        let mut stats = RunningStats::new();
        for _ in 0..drawings {
            let x = rng::get_uniform_draw(&mut rng);
            let y = rng::get_uniform_draw(&mut rng);
            stats.push(f(x, y));
        }
        stats.mean()
    })
}
