// src/stats/accumulator.rs
//! Statistics of Repeated Monte Carlo Experiments
//!
//! An experiment is any function `trial index → scalar outcome` (a price
//! estimate, an approximation of π, an integral). The accumulator runs it for
//! every trial exactly once, on first access, and derives summary statistics
//! from the cached outcomes.
//!
//! Trials run in parallel; the experiment receives the trial index and is
//! expected to derive its randomness from it (see [`crate::rng::RngFactory`]),
//! which keeps the outcomes independent of the thread count.

use super::histogram::Histogram;
use super::running::RunningStats;
use crate::error::{validation::validate_count, SdeError, SdeResult};
use crate::lazy::{Lazily, Lifecycle};
use crate::math_utils::Timer;
use rayon::prelude::*;
use std::fmt;
use tracing::debug;

/// Upper bound on the number of trials accepted by the accumulator
const MAX_TRIALS: usize = 100_000_000;

type Experiment = Box<dyn Fn(usize) -> f64 + Send + Sync>;

/// Known value an experiment is trying to estimate
#[derive(Debug, Clone, PartialEq)]
pub enum ExactResult {
    /// Same exact value for every trial
    Scalar(f64),
    /// One exact value per trial
    PerTrial(Vec<f64>),
}

pub struct ExperimentAccumulator {
    trials: usize,
    experiment: Experiment,
    exact: Option<ExactResult>,
    results: Lazily<Vec<f64>>,
}

impl ExperimentAccumulator {
    pub fn new<F>(trials: usize, experiment: F) -> SdeResult<Self>
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        validate_count("trials", trials, MAX_TRIALS)?;
        Ok(Self {
            trials,
            experiment: Box::new(experiment),
            exact: None,
            results: Lazily::new(),
        })
    }

    pub fn with_exact_result(mut self, exact: ExactResult) -> Self {
        self.exact = Some(exact);
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn exact_result(&self) -> Option<&ExactResult> {
        self.exact.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.results.lifecycle()
    }

    /// Outcomes in trial order, generated on the first call only
    pub fn results(&self) -> &[f64] {
        self.results.get_or_generate(|| {
            let timer = Timer::new();
            debug!(trials = self.trials, "running experiment");
            let outcomes: Vec<f64> = (0..self.trials)
                .into_par_iter()
                .map(|trial| (self.experiment)(trial))
                .collect();
            debug!(
                trials = self.trials,
                elapsed_ms = timer.elapsed_ms(),
                "experiment finished"
            );
            outcomes
        })
    }

    pub fn summary(&self) -> RunningStats {
        self.results().iter().copied().collect()
    }

    pub fn average(&self) -> f64 {
        self.summary().mean()
    }

    /// Population standard deviation of the outcomes
    pub fn std_deviation(&self) -> f64 {
        self.summary().std_dev()
    }

    pub fn min_max(&self) -> (f64, f64) {
        let stats = self.summary();
        (stats.min(), stats.max())
    }

    pub fn histogram(&self, left: f64, right: f64, bins: usize) -> SdeResult<Histogram> {
        Histogram::new(self.results(), left, right, bins)
    }

    /// `|outcome - exact|` for every trial
    pub fn absolute_errors(&self) -> SdeResult<Vec<f64>> {
        let results = self.results();
        match &self.exact {
            None => Err(SdeError::InvalidConfiguration {
                field: "exact_result".to_string(),
                reason: "no exact result was supplied".to_string(),
            }),
            Some(ExactResult::Scalar(exact)) => {
                Ok(results.iter().map(|x| (x - exact).abs()).collect())
            }
            Some(ExactResult::PerTrial(exact)) => {
                if exact.len() != results.len() {
                    return Err(SdeError::LengthMismatch {
                        expected: results.len(),
                        actual: exact.len(),
                    });
                }
                Ok(results
                    .iter()
                    .zip(exact)
                    .map(|(x, e)| (x - e).abs())
                    .collect())
            }
        }
    }

    pub fn average_absolute_error(&self) -> SdeResult<f64> {
        let errors = self.absolute_errors()?;
        Ok(errors.into_iter().collect::<RunningStats>().mean())
    }
}

impl fmt::Debug for ExperimentAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentAccumulator")
            .field("trials", &self.trials)
            .field("exact", &self.exact)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}
