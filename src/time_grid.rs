// src/time_grid.rs
//! Time Discretization
//!
//! A strictly increasing sequence `t₀ < t₁ < … < tₙ`. Steps need not be
//! uniform. The grid is immutable and is shared (behind an `Arc`) by the
//! Brownian driver and the simulation engine.

use crate::error::{validation::*, SdeError, SdeResult};

/// Relative tolerance of the time → index lookup
const TIME_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Grid from explicit times, which must be finite and strictly increasing
    pub fn new(times: Vec<f64>) -> SdeResult<Self> {
        if times.len() < 2 {
            return Err(SdeError::InvalidConfiguration {
                field: "times".to_string(),
                reason: format!("need at least two times, got {}", times.len()),
            });
        }
        for (i, &t) in times.iter().enumerate() {
            validate_finite("time", t)?;
            if i > 0 && t <= times[i - 1] {
                return Err(SdeError::InvalidConfiguration {
                    field: "times".to_string(),
                    reason: format!(
                        "times must be strictly increasing (t[{}] = {} ≤ t[{}] = {})",
                        i,
                        t,
                        i - 1,
                        times[i - 1]
                    ),
                });
            }
        }
        Ok(Self { times })
    }

    /// `steps` equal steps of length `dt` starting at `start`
    pub fn uniform(start: f64, steps: usize, dt: f64) -> SdeResult<Self> {
        validate_finite("start", start)?;
        validate_steps(steps)?;
        validate_positive("dt", dt)?;
        validate_finite("dt", dt)?;
        Self::new((0..=steps).map(|i| start + i as f64 * dt).collect())
    }

    /// `steps` equal steps covering `[start, horizon]`
    pub fn from_horizon(start: f64, horizon: f64, steps: usize) -> SdeResult<Self> {
        validate_finite("horizon", horizon)?;
        validate_steps(steps)?;
        if horizon <= start {
            return Err(SdeError::InvalidParameters {
                parameter: "horizon".to_string(),
                value: horizon,
                constraint: format!("must be greater than start = {}", start),
            });
        }
        let dt = (horizon - start) / steps as f64;
        let mut times: Vec<f64> = (0..steps).map(|i| start + i as f64 * dt).collect();
        // pin the last point so that `time_index(horizon)` is exact
        times.push(horizon);
        Self::new(times)
    }

    pub fn number_of_times(&self) -> usize {
        self.times.len()
    }

    pub fn number_of_steps(&self) -> usize {
        self.times.len() - 1
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn time(&self, index: usize) -> SdeResult<f64> {
        self.times
            .get(index)
            .copied()
            .ok_or(SdeError::IndexOutOfRange {
                what: "time index",
                index,
                len: self.times.len(),
            })
    }

    /// `t[i+1] - t[i]`
    pub fn step_length(&self, index: usize) -> SdeResult<f64> {
        if index + 1 >= self.times.len() {
            return Err(SdeError::IndexOutOfRange {
                what: "time step",
                index,
                len: self.number_of_steps(),
            });
        }
        Ok(self.times[index + 1] - self.times[index])
    }

    /// All step lengths, in order
    pub fn step_lengths(&self) -> Vec<f64> {
        self.times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn initial_time(&self) -> f64 {
        self.times[0]
    }

    pub fn horizon(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Index of the grid point equal to `time` (up to a relative tolerance)
    pub fn time_index(&self, time: f64) -> SdeResult<usize> {
        if !time.is_finite() {
            return Err(SdeError::TimeNotInGrid { time });
        }
        let tolerance = TIME_TOLERANCE * self.horizon().abs().max(1.0);
        let candidate = self.times.partition_point(|&t| t < time - tolerance);
        match self.times.get(candidate) {
            Some(&t) if (t - time).abs() <= tolerance => Ok(candidate),
            _ => Err(SdeError::TimeNotInGrid { time }),
        }
    }
}
