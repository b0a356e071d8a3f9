// src/mc/mc_engine.rs
//! SDE Path Ensemble Engine
//!
//! # Stepping Rule
//!
//! Every path starts at `X_0` and is advanced by the active scheme:
//! ```text
//! X_i = T( T⁻¹(X_{i-1}) + drift(X_{i-1}, i) + diffusion(X_{i-1}, i) )
//! ```
//! where the diffusion reads the Brownian increment `ΔW[i-1]` of the driving
//! factor. The loop is identical for every scheme.
//!
//! # Lifecycle
//!
//! The ensemble is built on first access (`Uninitialized → Generating →
//! Ready`), path by path in parallel, and cached. Once ready the engine is
//! immutable and every accessor is a read of the cached array.
//!
//! # Numerical Degeneracy
//!
//! Non-finite values (overflow for extreme drift and horizon, `ln` of a
//! non-positive value) are not guarded against. They are counted after
//! generation, logged at `warn` level and reported by
//! [`SdeSimulationEngine::check_finite`].

use crate::brownian::BrownianDriver;
use crate::distributions::NormalSampling;
use crate::error::{validation::*, SdeError, SdeResult};
use crate::lazy::{Lazily, Lifecycle};
use crate::math_utils::Timer;
use crate::models::{Gbm, SDEModel};
use crate::solvers::{DiscretizationScheme, SchemeKind, StepContext};
use crate::time_grid::TimeGrid;
use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Upper bound on the number of Brownian factors accepted by the config
const MAX_FACTORS: usize = 1_000;

/// Configuration of a geometric Brownian motion simulation on a uniform grid
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub paths: usize,
    pub steps: usize,
    pub initial_time: f64,
    /// Length of the simulated horizon
    pub t: f64,
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub seed: u64,
    pub factors: usize,
    pub scheme: SchemeKind,
    pub normal_sampling: NormalSampling,
}

impl SimulationConfig {
    pub fn validate(&self) -> SdeResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        validate_finite("initial_time", self.initial_time)?;
        validate_positive("t", self.t)?;
        validate_finite("t", self.t)?;
        validate_positive("s0", self.s0)?;
        validate_finite("s0", self.s0)?;
        validate_finite("mu", self.mu)?;
        validate_positive("sigma", self.sigma)?;
        validate_finite("sigma", self.sigma)?;
        validate_count("factors", self.factors, MAX_FACTORS)?;
        Ok(())
    }

    pub fn time_grid(&self) -> SdeResult<TimeGrid> {
        TimeGrid::from_horizon(self.initial_time, self.initial_time + self.t, self.steps)
    }

    /// Brownian driver described by this configuration, not yet generated
    pub fn brownian_driver(&self) -> SdeResult<Arc<BrownianDriver>> {
        self.validate()?;
        let grid = Arc::new(self.time_grid()?);
        let driver = BrownianDriver::new(grid, self.paths, self.factors, self.seed)?
            .with_sampling(self.normal_sampling);
        Ok(Arc::new(driver))
    }

    /// Engine simulating `Gbm { mu, sigma }` with the configured scheme
    pub fn build(&self) -> SdeResult<SdeSimulationEngine<Box<dyn DiscretizationScheme>>> {
        self.validate()?;
        self.build_with_model(Gbm::new(self.mu, self.sigma)?)
    }

    /// Engine simulating an arbitrary model with the configured grid, driver and scheme
    pub fn build_with_model<M: SDEModel + 'static>(
        &self,
        model: M,
    ) -> SdeResult<SdeSimulationEngine<Box<dyn DiscretizationScheme>>> {
        let driver = self.brownian_driver()?;
        SdeSimulationEngine::new(driver, self.scheme.build(model), self.s0)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            paths: 10_000,
            steps: 100,
            initial_time: 0.0,
            t: 1.0,
            s0: 100.0,
            mu: 0.0,
            sigma: 0.25,
            seed: 1897,
            factors: 1,
            scheme: SchemeKind::Euler,
            normal_sampling: NormalSampling::Ziggurat,
        }
    }
}

/// Lazily generated ensemble of SDE paths, shape `(times, paths)`
pub struct SdeSimulationEngine<S> {
    driver: Arc<BrownianDriver>,
    scheme: S,
    initial_value: f64,
    factor: usize,
    ensemble: Lazily<Array2<f64>>,
}

impl<S: DiscretizationScheme> SdeSimulationEngine<S> {
    pub fn new(driver: Arc<BrownianDriver>, scheme: S, initial_value: f64) -> SdeResult<Self> {
        validate_finite("initial_value", initial_value)?;
        if !scheme.inverse_transform(initial_value).is_finite() {
            return Err(SdeError::InvalidParameters {
                parameter: "initial_value".to_string(),
                value: initial_value,
                constraint: format!("outside the domain of the {} transform", scheme.name()),
            });
        }
        Ok(Self {
            driver,
            scheme,
            initial_value,
            factor: 0,
            ensemble: Lazily::new(),
        })
    }

    /// Drives the paths with another factor of the Brownian driver
    pub fn with_factor(mut self, factor: usize) -> SdeResult<Self> {
        let factors = self.driver.number_of_factors();
        if factor >= factors {
            return Err(SdeError::IndexOutOfRange {
                what: "factor",
                index: factor,
                len: factors,
            });
        }
        self.factor = factor;
        Ok(self)
    }

    pub fn grid(&self) -> &TimeGrid {
        self.driver.grid()
    }

    pub fn driver(&self) -> &Arc<BrownianDriver> {
        &self.driver
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn number_of_paths(&self) -> usize {
        self.driver.number_of_paths()
    }

    pub fn time_horizon(&self) -> f64 {
        self.grid().horizon()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.ensemble.lifecycle()
    }

    /// The full ensemble, generated on first access
    pub fn paths(&self) -> &Array2<f64> {
        self.ensemble.get_or_generate(|| self.generate())
    }

    /// Values of all paths at grid point `time_index`
    pub fn process_at_time_index(&self, time_index: usize) -> SdeResult<ArrayView1<'_, f64>> {
        let times = self.grid().number_of_times();
        if time_index >= times {
            return Err(SdeError::IndexOutOfRange {
                what: "time index",
                index: time_index,
                len: times,
            });
        }
        Ok(self.paths().index_axis(Axis(0), time_index))
    }

    /// Values of all paths at grid time `time`
    pub fn process_at_time(&self, time: f64) -> SdeResult<ArrayView1<'_, f64>> {
        let time_index = self.grid().time_index(time)?;
        self.process_at_time_index(time_index)
    }

    /// One simulated trajectory over the whole grid
    pub fn path_for_simulation(&self, path: usize) -> SdeResult<ArrayView1<'_, f64>> {
        let paths = self.number_of_paths();
        if path >= paths {
            return Err(SdeError::IndexOutOfRange {
                what: "path",
                index: path,
                len: paths,
            });
        }
        Ok(self.paths().index_axis(Axis(1), path))
    }

    /// Values of all paths at the horizon
    pub fn final_value(&self) -> ArrayView1<'_, f64> {
        let last = self.grid().number_of_steps();
        self.paths().index_axis(Axis(0), last)
    }

    /// Brownian increment `ΔW[step]` of the driving factor across paths
    pub fn brownian_increment(&self, step: usize) -> SdeResult<ArrayView1<'_, f64>> {
        self.driver.increment(step, self.factor)
    }

    pub fn non_finite_count(&self) -> usize {
        self.paths().iter().filter(|x| !x.is_finite()).count()
    }

    /// Fails when the ensemble holds NaN or infinite values
    pub fn check_finite(&self) -> SdeResult<()> {
        match first_non_finite(self.paths()) {
            None => Ok(()),
            Some((time_index, path)) => Err(SdeError::NumericalInstability {
                method: self.scheme.name().to_string(),
                reason: format!(
                    "{} non-finite values, first at time index {} of path {}",
                    self.non_finite_count(),
                    time_index,
                    path
                ),
            }),
        }
    }

    fn generate(&self) -> Array2<f64> {
        let timer = Timer::new();
        let grid = self.grid();
        let times = grid.times();
        let steps = grid.number_of_steps();
        let paths = self.number_of_paths();
        let factor = self.factor;
        let scheme = &self.scheme;
        let x0 = self.initial_value;
        debug!(scheme = scheme.name(), steps, paths, "generating path ensemble");

        let increments = self.driver.increments();

        let trajectories: Vec<Vec<f64>> = (0..paths)
            .into_par_iter()
            .map(|p| {
                let mut values = Vec::with_capacity(steps + 1);
                values.push(x0);
                let mut x = x0;
                for i in 1..=steps {
                    let step = StepContext {
                        time_index: i,
                        t: times[i - 1],
                        dt: times[i] - times[i - 1],
                        dw: increments[[i - 1, factor, p]],
                    };
                    x = scheme.transform(
                        scheme.inverse_transform(x)
                            + scheme.drift(x, &step)
                            + scheme.diffusion(x, &step),
                    );
                    values.push(x);
                }
                values
            })
            .collect();

        let ensemble = Array2::from_shape_fn((steps + 1, paths), |(i, p)| trajectories[p][i]);

        if let Some((time_index, path)) = first_non_finite(&ensemble) {
            let count = ensemble.iter().filter(|x| !x.is_finite()).count();
            warn!(
                scheme = scheme.name(),
                count,
                time_index,
                path,
                "path ensemble contains non-finite values"
            );
        }
        debug!(
            scheme = scheme.name(),
            steps,
            paths,
            elapsed_ms = timer.elapsed_ms(),
            "path ensemble ready"
        );
        ensemble
    }
}

/// `(time_index, path)` of the earliest non-finite value
fn first_non_finite(ensemble: &Array2<f64>) -> Option<(usize, usize)> {
    ensemble
        .indexed_iter()
        .find(|(_, x)| !x.is_finite())
        .map(|(index, _)| index)
}

impl<S: DiscretizationScheme> fmt::Debug for SdeSimulationEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdeSimulationEngine")
            .field("scheme", &self.scheme.name())
            .field("initial_value", &self.initial_value)
            .field("factor", &self.factor)
            .field("paths", &self.number_of_paths())
            .field("steps", &self.grid().number_of_steps())
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}
