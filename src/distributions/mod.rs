// src/distributions/mod.rs
//! Continuous Probability Distributions and Inversion Sampling
//!
//! # Inversion Sampling
//!
//! If `F` is a continuous, strictly increasing distribution function and
//! `U ~ Uniform(0,1)`, then
//! ```text
//! X = F⁻¹(U),   F⁻¹(p) = inf { x : F(x) ≥ p }
//! ```
//! has distribution `F`. A concrete law only has to provide its density,
//! distribution function, quantile function and analytic moments; sampling,
//! transformed sampling and sample statistics come for free from the
//! [`Distribution`] trait.
//!
//! # Boundary Behaviour
//!
//! For unbounded supports the quantile diverges at the ends of `[0, 1)`:
//! `quantile(0)` is `-∞` for the normal law, and `quantile(p → 1)` grows
//! without bound for both normal and exponential laws. Callers must tolerate
//! extreme draws.

pub mod confidence;
pub mod exponential;
pub mod importance;
pub mod normal;
pub mod uniform;

pub use exponential::Exponential;
pub use normal::{Normal, NormalSampling};
pub use uniform::Uniform;

use crate::rng;
use crate::stats::running::RunningStats;
use rand::Rng;

/// A continuous probability law with an (approximately) invertible CDF
pub trait Distribution {
    /// Probability density at `x`
    fn density(&self, x: f64) -> f64;

    /// P(X ≤ x)
    fn cdf(&self, x: f64) -> f64;

    /// Generalized inverse of [`cdf`](Self::cdf) for `p ∈ [0, 1)`
    fn quantile(&self, p: f64) -> f64;

    fn analytic_mean(&self) -> f64;

    fn analytic_std_dev(&self) -> f64;

    /// One draw by inversion: `quantile(U)`, `U ~ Uniform[0, 1)`
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64
    where
        Self: Sized,
    {
        self.quantile(rng::get_uniform_draw(rng))
    }

    /// One draw of `f(X)`
    fn sample_of<R, F>(&self, f: F, rng: &mut R) -> f64
    where
        Self: Sized,
        R: Rng + ?Sized,
        F: Fn(f64) -> f64,
    {
        f(self.sample(rng))
    }

    /// Sample mean of `n` fresh draws.
    ///
    /// Nothing is cached: every call draws a new sample, so repeated calls
    /// return different values.
    fn sample_mean<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> f64
    where
        Self: Sized,
    {
        self.sample_stats_of(n, |x| x, rng).mean()
    }

    /// Sample mean of `f(X)` over `n` fresh draws
    fn sample_mean_of<R, F>(&self, n: usize, f: F, rng: &mut R) -> f64
    where
        Self: Sized,
        R: Rng + ?Sized,
        F: Fn(f64) -> f64,
    {
        self.sample_stats_of(n, f, rng).mean()
    }

    /// Sample standard deviation of `n` fresh draws
    fn sample_std_dev<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> f64
    where
        Self: Sized,
    {
        self.sample_stats_of(n, |x| x, rng).std_dev()
    }

    /// Sample standard deviation of `f(X)` over `n` fresh draws
    fn sample_std_dev_of<R, F>(&self, n: usize, f: F, rng: &mut R) -> f64
    where
        Self: Sized,
        R: Rng + ?Sized,
        F: Fn(f64) -> f64,
    {
        self.sample_stats_of(n, f, rng).std_dev()
    }

    /// Estimates `E[f(X)]` under this law by sampling from `proposal` and
    /// reweighting with the density ratio. See [`importance::weighted_mean`].
    fn sample_mean_weighted<Q, R, F>(&self, n: usize, f: F, proposal: &Q, rng: &mut R) -> f64
    where
        Self: Sized,
        Q: Distribution,
        R: Rng + ?Sized,
        F: Fn(f64) -> f64,
    {
        importance::weighted_mean(self, proposal, n, f, rng)
    }

    /// Running statistics of `f(X)` over `n` fresh draws
    fn sample_stats_of<R, F>(&self, n: usize, f: F, rng: &mut R) -> RunningStats
    where
        Self: Sized,
        R: Rng + ?Sized,
        F: Fn(f64) -> f64,
    {
        let mut stats = RunningStats::new();
        for _ in 0..n {
            stats.push(f(self.sample(rng)));
        }
        stats
    }
}
