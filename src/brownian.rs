// src/brownian.rs
//! Multi-Factor Brownian Motion
//!
//! # Construction
//!
//! For every path `p` and factor `f` independently:
//! ```text
//! ΔW[i][f][p] = √(t_{i+1} - t_i) · Z,   Z ~ N(0,1)
//! W[0][f][p]  = 0
//! W[i][f][p]  = Σ_{k<i} ΔW[k][f][p]
//! ```
//! Tensors are indexed `(time step, factor, path)`.
//!
//! # Determinism
//!
//! Path `p` draws from its own stream `RngFactory::new(seed).stream(p)`,
//! factor by factor, step by step. The tensors depend only on
//! `(grid, paths, factors, seed, sampling)`, never on the thread count.
//!
//! # Correlation
//!
//! Factors are independent. Correlating them is up to the caller, e.g. with
//! [`correlate_factors`].

use crate::distributions::{Normal, NormalSampling};
use crate::error::{validation::*, SdeError, SdeResult};
use crate::lazy::{Lazily, Lifecycle};
use crate::math_utils::Timer;
use crate::rng::RngFactory;
use crate::time_grid::TimeGrid;
use nalgebra::DMatrix;
use ndarray::{s, Array3, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Upper bound on the number of Brownian factors
const MAX_FACTORS: usize = 1_000;

#[derive(Debug)]
struct BrownianTensors {
    increments: Array3<f64>,
    paths: Array3<f64>,
}

/// Lazily generated Brownian increments and paths over a [`TimeGrid`]
#[derive(Debug)]
pub struct BrownianDriver {
    grid: Arc<TimeGrid>,
    paths: usize,
    factors: usize,
    seed: u64,
    sampling: NormalSampling,
    tensors: Lazily<BrownianTensors>,
}

impl BrownianDriver {
    pub fn new(grid: Arc<TimeGrid>, paths: usize, factors: usize, seed: u64) -> SdeResult<Self> {
        validate_paths(paths)?;
        validate_count("factors", factors, MAX_FACTORS)?;
        Ok(Self {
            grid,
            paths,
            factors,
            seed,
            sampling: NormalSampling::default(),
            tensors: Lazily::new(),
        })
    }

    /// Selects how the standard normal draws are produced
    pub fn with_sampling(mut self, sampling: NormalSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn grid(&self) -> &Arc<TimeGrid> {
        &self.grid
    }

    pub fn number_of_paths(&self) -> usize {
        self.paths
    }

    pub fn number_of_factors(&self) -> usize {
        self.factors
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sampling(&self) -> NormalSampling {
        self.sampling
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.tensors.lifecycle()
    }

    /// `ΔW` with shape `(steps, factors, paths)`
    pub fn increments(&self) -> &Array3<f64> {
        &self.tensors().increments
    }

    /// `W` with shape `(times, factors, paths)`
    pub fn paths(&self) -> &Array3<f64> {
        &self.tensors().paths
    }

    /// `ΔW[step][factor][·]` across all paths
    pub fn increment(&self, step: usize, factor: usize) -> SdeResult<ArrayView1<'_, f64>> {
        self.check_step(step)?;
        self.check_factor(factor)?;
        Ok(self.increments().slice(s![step, factor, ..]))
    }

    /// `W[time_index][factor][·]` across all paths
    pub fn path(&self, time_index: usize, factor: usize) -> SdeResult<ArrayView1<'_, f64>> {
        self.check_time(time_index)?;
        self.check_factor(factor)?;
        Ok(self.paths().slice(s![time_index, factor, ..]))
    }

    /// Single increment `ΔW[step][factor][path]`
    pub fn increment_at(&self, step: usize, factor: usize, path: usize) -> SdeResult<f64> {
        self.check_step(step)?;
        self.check_factor(factor)?;
        self.check_path(path)?;
        Ok(self.increments()[[step, factor, path]])
    }

    /// One realized trajectory `t ↦ W_t` of one factor
    pub fn path_for_simulation(&self, factor: usize, path: usize) -> SdeResult<ArrayView1<'_, f64>> {
        self.check_factor(factor)?;
        self.check_path(path)?;
        Ok(self.paths().slice(s![.., factor, path]))
    }

    /// `W` of one factor with shape `(times, paths)`
    pub fn paths_for_factor(&self, factor: usize) -> SdeResult<ArrayView2<'_, f64>> {
        self.check_factor(factor)?;
        Ok(self.paths().index_axis(Axis(1), factor))
    }

    fn tensors(&self) -> &BrownianTensors {
        self.tensors.get_or_generate(|| self.generate())
    }

    fn generate(&self) -> BrownianTensors {
        let timer = Timer::new();
        let steps = self.grid.number_of_steps();
        let factors = self.factors;
        let paths = self.paths;
        debug!(steps, factors, paths, seed = self.seed, "generating Brownian increments");

        let sqrt_dt: Vec<f64> = self.grid.step_lengths().iter().map(|dt| dt.sqrt()).collect();
        let normal = Normal::standard().with_sampling(self.sampling);
        let factory = RngFactory::new(self.seed);

        // factor-major draws of one path: draws[f * steps + i]
        let draws: Vec<Vec<f64>> = (0..paths)
            .into_par_iter()
            .map(|p| {
                let mut rng = factory.stream(p as u64);
                let mut buffer = vec![0.0; factors * steps];
                normal.fill(&mut buffer, &mut rng);
                for (k, value) in buffer.iter_mut().enumerate() {
                    *value *= sqrt_dt[k % steps];
                }
                buffer
            })
            .collect();

        let increments =
            Array3::from_shape_fn((steps, factors, paths), |(i, f, p)| draws[p][f * steps + i]);

        let mut cumulative = Array3::<f64>::zeros((steps + 1, factors, paths));
        for i in 0..steps {
            let next = &cumulative.index_axis(Axis(0), i) + &increments.index_axis(Axis(0), i);
            cumulative.index_axis_mut(Axis(0), i + 1).assign(&next);
        }

        debug!(
            steps,
            factors,
            paths,
            elapsed_ms = timer.elapsed_ms(),
            "Brownian increments ready"
        );
        BrownianTensors {
            increments,
            paths: cumulative,
        }
    }

    fn check_step(&self, step: usize) -> SdeResult<()> {
        check_index("time step", step, self.grid.number_of_steps())
    }

    fn check_time(&self, time_index: usize) -> SdeResult<()> {
        check_index("time index", time_index, self.grid.number_of_times())
    }

    fn check_factor(&self, factor: usize) -> SdeResult<()> {
        check_index("factor", factor, self.factors)
    }

    fn check_path(&self, path: usize) -> SdeResult<()> {
        check_index("path", path, self.paths)
    }
}

fn check_index(what: &'static str, index: usize, len: usize) -> SdeResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(SdeError::IndexOutOfRange { what, index, len })
    }
}

/// Mixes independent factors into correlated ones.
///
/// With `L` the lower Cholesky factor of `correlation`,
/// ```text
/// ΔW̃[i][f][p] = Σ_{g ≤ f} L[f][g] · ΔW[i][g][p]
/// ```
/// For two factors this is `W̃₂ = ρ W₁ + √(1-ρ²) W₂`.
pub fn correlate_factors(
    increments: &Array3<f64>,
    correlation: &DMatrix<f64>,
) -> SdeResult<Array3<f64>> {
    let (steps, factors, paths) = increments.dim();
    if correlation.nrows() != factors || correlation.ncols() != factors {
        return Err(SdeError::InvalidConfiguration {
            field: "correlation".to_string(),
            reason: format!(
                "expected a {}x{} matrix, got {}x{}",
                factors,
                factors,
                correlation.nrows(),
                correlation.ncols()
            ),
        });
    }
    for f in 0..factors {
        for g in 0..factors {
            validate_correlation("correlation", correlation[(f, g)])?;
        }
        if (correlation[(f, f)] - 1.0).abs() > 1e-12 {
            return Err(SdeError::InvalidParameters {
                parameter: "correlation".to_string(),
                value: correlation[(f, f)],
                constraint: "diagonal entries must equal 1".to_string(),
            });
        }
    }

    let lower = correlation
        .clone()
        .cholesky()
        .ok_or_else(|| SdeError::NumericalInstability {
            method: "correlate_factors".to_string(),
            reason: "correlation matrix is not positive definite".to_string(),
        })?
        .l();

    let mut mixed = Array3::<f64>::zeros((steps, factors, paths));
    for f in 0..factors {
        let mut target = mixed.index_axis_mut(Axis(1), f);
        for g in 0..=f {
            let weight = lower[(f, g)];
            if weight != 0.0 {
                target.scaled_add(weight, &increments.index_axis(Axis(1), g));
            }
        }
    }
    Ok(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn driver(paths: usize, factors: usize, seed: u64) -> BrownianDriver {
        let grid = Arc::new(TimeGrid::uniform(0.0, 10, 0.1).unwrap());
        BrownianDriver::new(grid, paths, factors, seed).unwrap()
    }

    #[test]
    fn test_shapes_and_origin() {
        let bm = driver(7, 3, 1);
        assert_eq!(bm.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(bm.increments().dim(), (10, 3, 7));
        assert_eq!(bm.paths().dim(), (11, 3, 7));
        assert_eq!(bm.lifecycle(), Lifecycle::Ready);
        assert!(bm.path(0, 2).unwrap().iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_paths_are_prefix_sums() {
        let bm = driver(5, 2, 3);
        for f in 0..2 {
            for p in 0..5 {
                let trajectory = bm.path_for_simulation(f, p).unwrap();
                let mut running = 0.0;
                for i in 0..10 {
                    running += bm.increment_at(i, f, p).unwrap();
                    assert_abs_diff_eq!(trajectory[i + 1], running, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_checked_accessors() {
        let bm = driver(4, 2, 5);
        assert!(bm.increment(10, 0).is_err());
        assert!(bm.increment(9, 0).is_ok());
        assert!(bm.path(11, 0).is_err());
        assert!(bm.path(10, 0).is_ok());
        assert!(matches!(
            bm.path_for_simulation(2, 0),
            Err(SdeError::IndexOutOfRange { what: "factor", index: 2, len: 2 })
        ));
        assert!(bm.paths_for_factor(1).is_ok());
        assert!(BrownianDriver::new(bm.grid().clone(), 0, 1, 0).is_err());
        assert!(BrownianDriver::new(bm.grid().clone(), 1, 0, 0).is_err());
    }

    #[test]
    fn test_correlate_two_factors() {
        let bm = driver(20_000, 2, 8);
        let rho = 0.6;
        let correlation = DMatrix::from_row_slice(2, 2, &[1.0, rho, rho, 1.0]);
        let mixed = correlate_factors(bm.increments(), &correlation).unwrap();

        // first factor is untouched
        assert_eq!(
            mixed.index_axis(Axis(1), 0),
            bm.increments().index_axis(Axis(1), 0)
        );

        let w1: ndarray::ArrayView1<f64> = mixed.slice(s![0, 0, ..]);
        let w2: ndarray::ArrayView1<f64> = mixed.slice(s![0, 1, ..]);
        let covariance = w1.dot(&w2) / 20_000.0;
        assert!((covariance - rho * 0.1).abs() < 0.005, "covariance {}", covariance);
    }

    #[test]
    fn test_correlate_rejects_bad_matrices() {
        let bm = driver(3, 3, 8);
        let wrong_size = DMatrix::<f64>::identity(2, 2);
        assert!(correlate_factors(bm.increments(), &wrong_size).is_err());

        let not_psd = DMatrix::from_row_slice(
            3,
            3,
            &[1.0, 0.9, -0.9, 0.9, 1.0, 0.9, -0.9, 0.9, 1.0],
        );
        assert!(matches!(
            correlate_factors(bm.increments(), &not_psd),
            Err(SdeError::NumericalInstability { .. })
        ));
    }
}
